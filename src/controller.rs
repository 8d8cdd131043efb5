/// Account Controller
///
/// Transport-agnostic glue between wire models and the core: validates input
/// shape, calls the account use case, and composes token pairs from the
/// signer. Route handlers (and any other transport) only talk to this type.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::account::{Account, AccountIdentity, AccountStatus, AccountUseCase, SignUpCandidate};
use crate::auth::{TokenKind, TokenSigner};
use crate::error::{AccountError, AppError, TokenError, ValidationError};
use crate::validators::{
    is_valid_account_id, is_valid_email, is_valid_name, is_valid_password, is_valid_status,
};

/// Sign-up request
#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpRequest {
    pub email: String,
    pub password: String,
    pub name: String,
}

/// Sign-in request
#[derive(Debug, Serialize, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}

/// Token refresh request; the token may also arrive in the `rt` cookie
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: Option<String>,
}

/// Status change request
#[derive(Debug, Serialize, Deserialize)]
pub struct ChangeStatusRequest {
    pub status: String,
}

/// Account as exposed to clients. Never carries the digest.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AccountResponse {
    pub id: String,
    pub email: String,
    pub name: String,
    pub status: AccountStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<&Account> for AccountResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id.to_string(),
            email: account.email.clone(),
            name: account.name.clone(),
            status: account.status,
            created_at: account.created_at,
            updated_at: account.updated_at,
        }
    }
}

/// Account plus a fresh token pair
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub account: AccountResponse,
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

#[derive(Clone)]
pub struct AccountController {
    use_case: AccountUseCase,
    signer: Arc<dyn TokenSigner>,
}

impl AccountController {
    pub fn new(use_case: AccountUseCase, signer: Arc<dyn TokenSigner>) -> Self {
        Self { use_case, signer }
    }

    pub fn signer(&self) -> Arc<dyn TokenSigner> {
        self.signer.clone()
    }

    pub async fn sign_up(&self, request: SignUpRequest) -> Result<AuthResponse, AppError> {
        let email = is_valid_email(&request.email)?;
        is_valid_password(&request.password)?;
        let name = is_valid_name(&request.name)?;

        let account = self
            .use_case
            .sign_up(SignUpCandidate {
                email,
                password: request.password,
                name,
            })
            .await?;

        self.authenticate(&account)
    }

    /// Only emptiness is checked on the password here, so a policy change
    /// never locks out existing accounts.
    pub async fn sign_in(&self, request: SignInRequest) -> Result<AuthResponse, AppError> {
        let email = is_valid_email(&request.email)?;
        if request.password.is_empty() {
            return Err(ValidationError::EmptyField("password").into());
        }

        let account = self.use_case.sign_in(&email, &request.password).await?;

        self.authenticate(&account)
    }

    /// Exchanges a refresh token for a new pair, re-reading the account so a
    /// blocked account cannot keep refreshing.
    pub async fn refresh(&self, refresh_token: &str) -> Result<AuthResponse, AppError> {
        if refresh_token.is_empty() {
            return Err(AppError::MissingToken);
        }

        let identity = self.signer.decrypt_as(refresh_token, TokenKind::Refresh)?;

        let account = self
            .use_case
            .ensure_active(identity.id)
            .await
            .map_err(|e| match e {
                AccountError::AccountIsNotExist => AppError::Token(TokenError::NonValid),
                other => AppError::Account(other),
            })?;

        self.authenticate(&account)
    }

    pub async fn current_account(
        &self,
        identity: &AccountIdentity,
    ) -> Result<AccountResponse, AppError> {
        let account = self.use_case.get_one_by_uuid(identity.id).await?;
        Ok(AccountResponse::from(&account))
    }

    pub async fn get_by_email(&self, email: &str) -> Result<AccountResponse, AppError> {
        let email = is_valid_email(email)?;
        let account = self.use_case.get_one_by_email(&email).await?;
        Ok(AccountResponse::from(&account))
    }

    pub async fn get_by_uuid(&self, id: &str) -> Result<AccountResponse, AppError> {
        let id = is_valid_account_id(id)?;
        let account = self.use_case.get_one_by_uuid(id).await?;
        Ok(AccountResponse::from(&account))
    }

    pub async fn change_status(
        &self,
        id: &str,
        request: ChangeStatusRequest,
    ) -> Result<(), AppError> {
        let id = is_valid_account_id(id)?;
        let status = is_valid_status(&request.status)?;
        self.use_case.change_account_status(id, status).await?;
        Ok(())
    }

    fn authenticate(&self, account: &Account) -> Result<AuthResponse, AppError> {
        let pair = self.signer.issue_token_pair(&account.identity())?;
        Ok(AuthResponse {
            account: AccountResponse::from(account),
            access_token: pair.access,
            refresh_token: pair.refresh,
            token_type: "Bearer".to_string(),
            expires_in: self.signer.access_expiry(),
        })
    }
}
