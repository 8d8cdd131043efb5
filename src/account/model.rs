use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Account status; only `Active` accounts may sign in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountStatus {
    Active,
    Suspended,
    Blocked,
}

impl AccountStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountStatus::Active => "active",
            AccountStatus::Suspended => "suspended",
            AccountStatus::Blocked => "blocked",
        }
    }

    /// Column value in the `accounts.status` SMALLINT column.
    pub fn code(&self) -> i16 {
        match self {
            AccountStatus::Active => 0,
            AccountStatus::Suspended => 1,
            AccountStatus::Blocked => 2,
        }
    }
}

impl TryFrom<i16> for AccountStatus {
    type Error = i16;

    fn try_from(code: i16) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(AccountStatus::Active),
            1 => Ok(AccountStatus::Suspended),
            2 => Ok(AccountStatus::Blocked),
            other => Err(other),
        }
    }
}

impl FromStr for AccountStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(AccountStatus::Active),
            "suspended" => Ok(AccountStatus::Suspended),
            "blocked" => Ok(AccountStatus::Blocked),
            _ => Err(()),
        }
    }
}

impl fmt::Display for AccountStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored account.
#[derive(Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub status: AccountStatus,
    /// Unix timestamp (seconds)
    pub created_at: i64,
    /// Unix timestamp (seconds), bumped on every mutation
    pub updated_at: i64,
}

impl Account {
    pub fn is_active(&self) -> bool {
        self.status == AccountStatus::Active
    }

    pub fn identity(&self) -> AccountIdentity {
        AccountIdentity {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }
}

impl fmt::Debug for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Account")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password_hash", &"[redacted]")
            .field("name", &self.name)
            .field("status", &self.status)
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// The part of an account that travels inside a token.
///
/// Carries no status and no digest: a decoded token is not a full account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountIdentity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
}

/// A record ready to be written by `AccountStore::insert`.
#[derive(Clone)]
pub struct NewAccount {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub name: String,
    pub status: AccountStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

impl From<NewAccount> for Account {
    fn from(new: NewAccount) -> Self {
        Self {
            id: new.id,
            email: new.email,
            password_hash: new.password_hash,
            name: new.name,
            status: new.status,
            created_at: new.created_at,
            updated_at: new.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes_round_trip() {
        for status in [AccountStatus::Active, AccountStatus::Suspended, AccountStatus::Blocked] {
            assert_eq!(AccountStatus::try_from(status.code()), Ok(status));
            assert_eq!(status.as_str().parse::<AccountStatus>(), Ok(status));
        }
        assert_eq!(AccountStatus::try_from(7), Err(7));
        assert!("Deleted".parse::<AccountStatus>().is_err());
    }

    #[test]
    fn test_only_active_is_active() {
        let mut account = Account {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            password_hash: "$2b$04$digest".to_string(),
            name: "Name".to_string(),
            status: AccountStatus::Active,
            created_at: 0,
            updated_at: 0,
        };
        assert!(account.is_active());

        account.status = AccountStatus::Suspended;
        assert!(!account.is_active());
        account.status = AccountStatus::Blocked;
        assert!(!account.is_active());
    }

    #[test]
    fn test_debug_redacts_digest() {
        let account = Account {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            password_hash: "$2b$04$digest".to_string(),
            name: "Name".to_string(),
            status: AccountStatus::Active,
            created_at: 0,
            updated_at: 0,
        };
        assert!(!format!("{:?}", account).contains("digest"));
    }
}
