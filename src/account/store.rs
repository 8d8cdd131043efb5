use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Account, AccountStatus, NewAccount};
use crate::error::StoreError;

/// Durable account records, keyed by id and by email.
///
/// Implementations must enforce email uniqueness atomically and report a
/// losing write as `StoreError::Duplicate`.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Fails with `StoreError::NotFoundByEmail` when no account matches.
    async fn get_by_email(&self, email: &str) -> Result<Account, StoreError>;

    /// Fails with `StoreError::NotFoundById` when no account matches.
    async fn get_by_id(&self, id: Uuid) -> Result<Account, StoreError>;

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError>;

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, StoreError>;

    /// Writes the record with its caller-assigned id and timestamps.
    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError>;

    /// Sets the status and bumps `updated_at`.
    async fn set_status(&self, id: Uuid, status: AccountStatus) -> Result<(), StoreError>;
}
