/// PostgreSQL account store
///
/// Expects the `accounts` table from `migrations/`; the unique index on
/// `email` is what turns concurrent sign-ups into `StoreError::Duplicate`.

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::model::{Account, AccountStatus, NewAccount};
use super::store::AccountStore;
use crate::error::StoreError;

const UNIQUE_VIOLATION: &str = "23505";

#[derive(sqlx::FromRow)]
struct AccountRow {
    id: Uuid,
    email: String,
    password_hash: String,
    name: String,
    status: i16,
    created_at: i64,
    updated_at: i64,
}

impl TryFrom<AccountRow> for Account {
    type Error = StoreError;

    fn try_from(row: AccountRow) -> Result<Self, Self::Error> {
        let status = AccountStatus::try_from(row.status).map_err(|code| {
            StoreError::Corrupt(format!("account {} has unknown status {}", row.id, code))
        })?;
        Ok(Account {
            id: row.id,
            email: row.email,
            password_hash: row.password_hash,
            name: row.name,
            status,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

pub struct PgAccountStore {
    pool: PgPool,
}

impl PgAccountStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().as_deref() == Some(UNIQUE_VIOLATION),
        _ => false,
    }
}

#[async_trait]
impl AccountStore for PgAccountStore {
    async fn get_by_email(&self, email: &str) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, name, status, created_at, updated_at
            FROM accounts
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| StoreError::NotFoundByEmail(email.to_string()))?;

        Account::try_from(row)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            SELECT id, email, password_hash, name, status, created_at, updated_at
            FROM accounts
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(StoreError::NotFoundById(id))?;

        Account::try_from(row)
    }

    async fn exists_by_email(&self, email: &str) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE email = $1)",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn exists_by_id(&self, id: Uuid) -> Result<bool, StoreError> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM accounts WHERE id = $1)",
        )
        .bind(id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    async fn insert(&self, account: NewAccount) -> Result<Account, StoreError> {
        let row = sqlx::query_as::<_, AccountRow>(
            r#"
            INSERT INTO accounts (id, email, password_hash, name, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, email, password_hash, name, status, created_at, updated_at
            "#,
        )
        .bind(account.id)
        .bind(&account.email)
        .bind(&account.password_hash)
        .bind(&account.name)
        .bind(account.status.code())
        .bind(account.created_at)
        .bind(account.updated_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                StoreError::Duplicate(account.email.clone())
            } else {
                StoreError::Database(e)
            }
        })?;

        Account::try_from(row)
    }

    async fn set_status(&self, id: Uuid, status: AccountStatus) -> Result<(), StoreError> {
        let result = sqlx::query(
            r#"
            UPDATE accounts
            SET status = $1, updated_at = $2
            WHERE id = $3
            "#,
        )
        .bind(status.code())
        .bind(chrono::Utc::now().timestamp())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFoundById(id));
        }
        Ok(())
    }
}
