/// Account module
///
/// The account record, the store capability it lives behind, and the
/// lifecycle use case that enforces sign-up, sign-in and status rules.

mod memory;
mod model;
mod postgres;
mod store;
mod usecase;

pub use memory::InMemoryAccountStore;
pub use model::{Account, AccountIdentity, AccountStatus, NewAccount};
pub use postgres::PgAccountStore;
pub use store::AccountStore;
pub use usecase::{AccountUseCase, SignUpCandidate};
