/// Authentication module
///
/// Handles JWT issuance/validation and password hashing.

mod claims;
mod password;
mod signer;

pub use claims::Claims;
pub use password::{BcryptHasher, CredentialHasher, MAX_SECRET_BYTES};
pub use signer::{JwtSigner, TokenKind, TokenPair, TokenSigner};
