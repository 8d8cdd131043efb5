mod accounts;
mod auth;
mod health_check;

pub use accounts::{change_account_status, current_account, get_account_by_email, get_account_by_id};
pub use auth::{refresh, sign_in, sign_up, REFRESH_COOKIE};
pub use health_check::{health_check, version};
