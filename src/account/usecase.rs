/// Account Lifecycle Use Case
///
/// Business rules around account creation, authentication and status
/// transitions. Holds no mutable state: every call is a short chain of store
/// and hasher calls, so one instance serves any number of concurrent requests.

use std::sync::Arc;
use uuid::Uuid;

use super::model::{Account, AccountStatus, NewAccount};
use super::store::AccountStore;
use crate::auth::CredentialHasher;
use crate::error::{AccountError, HashError, StoreError};

/// Shape-validated sign-up input; `password` is still plaintext here.
#[derive(Clone)]
pub struct SignUpCandidate {
    pub email: String,
    pub password: String,
    pub name: String,
}

#[derive(Clone)]
pub struct AccountUseCase {
    store: Arc<dyn AccountStore>,
    hasher: Arc<dyn CredentialHasher>,
}

impl AccountUseCase {
    pub fn new(store: Arc<dyn AccountStore>, hasher: Arc<dyn CredentialHasher>) -> Self {
        Self { store, hasher }
    }

    /// Creates an active account.
    ///
    /// # Errors
    /// `AccountAlreadyExist` when the email is taken, including when a
    /// concurrent sign-up wins the race between the existence check and the
    /// insert.
    pub async fn sign_up(&self, candidate: SignUpCandidate) -> Result<Account, AccountError> {
        if self.store.exists_by_email(&candidate.email).await? {
            tracing::info!(email = %candidate.email, "Sign-up for an existing email");
            return Err(AccountError::AccountAlreadyExist);
        }

        let password_hash = self.hasher.hash(&candidate.password).await?;
        let now = chrono::Utc::now().timestamp();

        let account = self
            .store
            .insert(NewAccount {
                id: Uuid::new_v4(),
                email: candidate.email,
                password_hash,
                name: candidate.name,
                status: AccountStatus::Active,
                created_at: now,
                updated_at: now,
            })
            .await
            .map_err(|e| match e {
                StoreError::Duplicate(email) => {
                    tracing::info!(email = %email, "Sign-up lost the uniqueness race");
                    AccountError::AccountAlreadyExist
                }
                other => AccountError::Store(other),
            })?;

        tracing::info!(account_id = %account.id, "Account created");
        Ok(account)
    }

    /// Verifies credentials and returns the account.
    ///
    /// # Errors
    /// - `EmailIsWrong`: no account for `email`
    /// - `AccountIsNotActive`: account is suspended or blocked
    /// - `PasswordIsWrong`: secret does not match
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Account, AccountError> {
        let account = self.store.get_by_email(email).await.map_err(|e| match e {
            StoreError::NotFoundByEmail(_) => AccountError::EmailIsWrong,
            other => AccountError::Store(other),
        })?;

        if !account.is_active() {
            tracing::info!(
                account_id = %account.id,
                status = %account.status,
                "Sign-in attempt on an inactive account"
            );
            return Err(AccountError::AccountIsNotActive);
        }

        self.hasher
            .compare(password, &account.password_hash)
            .await
            .map_err(|e| match e {
                HashError::Mismatch => AccountError::PasswordIsWrong,
                other => AccountError::Hasher(other),
            })?;

        Ok(account)
    }

    pub async fn get_one_by_email(&self, email: &str) -> Result<Account, AccountError> {
        Ok(self.store.get_by_email(email).await?)
    }

    pub async fn get_one_by_uuid(&self, id: Uuid) -> Result<Account, AccountError> {
        Ok(self.store.get_by_id(id).await?)
    }

    /// # Errors
    /// `AccountIsNotExist` when no account has `id`; store errors unchanged.
    pub async fn change_account_status(
        &self,
        id: Uuid,
        status: AccountStatus,
    ) -> Result<(), AccountError> {
        if !self.store.exists_by_id(id).await? {
            return Err(AccountError::AccountIsNotExist);
        }

        self.store.set_status(id, status).await?;

        tracing::info!(account_id = %id, status = %status, "Account status changed");
        Ok(())
    }

    /// Re-reads an account named by a presented token and checks it may still
    /// authenticate.
    pub async fn ensure_active(&self, id: Uuid) -> Result<Account, AccountError> {
        let account = self.store.get_by_id(id).await.map_err(|e| match e {
            StoreError::NotFoundById(_) => AccountError::AccountIsNotExist,
            other => AccountError::Store(other),
        })?;

        if !account.is_active() {
            return Err(AccountError::AccountIsNotActive);
        }
        Ok(account)
    }
}
