use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::model::{Account, AccountStatus, NewAccount};
use super::store::AccountStore;
use crate::error::StoreError;

#[derive(Default)]
struct StoreData {
    accounts: HashMap<Uuid, Account>,
    // email -> id
    emails: HashMap<String, Uuid>,
}

/// In-memory account store (tests and local runs without Postgres)
#[derive(Default)]
pub struct InMemoryAccountStore {
    data: Mutex<StoreData>,
}

impl InMemoryAccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.data.lock().await.accounts.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn get_by_email(&self, email: &str) -> Result<Account, StoreError> {
        let data = self.data.lock().await;
        data.emails
            .get(email)
            .and_then(|id| data.accounts.get(id))
            .cloned()
            .ok_or_else(|| StoreError::NotFoundByEmail(email.to_string()))
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Account, StoreError> {
        let data = self.data.lock().await;
        data.accounts
            .get(&id)
            .cloned()
            .ok_or(StoreError::NotFoundById(id))
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        Ok(self.data.lock().await.emails.contains_key(email))
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        Ok(self.data.lock().await.accounts.contains_key(&id))
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let mut data = self.data.lock().await;
        if data.emails.contains_key(&account.email) {
            return Err(StoreError::Duplicate(account.email));
        }

        let account = Account::from(account);
        data.emails.insert(account.email.clone(), account.id);
        data.accounts.insert(account.id, account.clone());
        Ok(account)
    }

    async fn set_status(&self, id: Uuid, status: AccountStatus) -> Result<(), StoreError> {
        let mut data = self.data.lock().await;
        let account = data
            .accounts
            .get_mut(&id)
            .ok_or(StoreError::NotFoundById(id))?;
        account.status = status;
        account.updated_at = chrono::Utc::now().timestamp();
        Ok(())
    }
}
