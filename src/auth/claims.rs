/// JWT Claims structure
///
/// Identity claims (`name`, `email`, `accountID`) plus the registered claims
/// of RFC 7519.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::account::AccountIdentity;
use crate::configuration::JwtSettings;
use crate::error::TokenError;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Claims {
    /// Account display name
    pub name: String,
    /// Account email
    pub email: String,
    /// Account id (UUID string)
    #[serde(rename = "accountID")]
    pub account_id: String,
    /// Issuer
    pub iss: String,
    /// Subject
    pub sub: String,
    /// Audience
    pub aud: Vec<String>,
    /// Expiration time (Unix timestamp)
    pub exp: i64,
    /// Not before (Unix timestamp)
    pub nbf: i64,
    /// Issued at (Unix timestamp)
    pub iat: i64,
    /// Unique token id
    pub jti: String,
}

impl Claims {
    /// Claims for `identity`, valid from `now` for `lifetime_seconds`.
    pub fn new(identity: &AccountIdentity, config: &JwtSettings, now: i64, lifetime_seconds: i64) -> Self {
        Self {
            name: identity.name.clone(),
            email: identity.email.clone(),
            account_id: identity.id.to_string(),
            iss: config.issuer.clone(),
            sub: config.subject.clone(),
            aud: config.audience.clone(),
            exp: now.saturating_add(lifetime_seconds),
            nbf: now,
            iat: now,
            jti: Uuid::new_v4().to_string(),
        }
    }

    /// Rebuilds the identity the token was issued for.
    ///
    /// # Errors
    /// `TokenError::NonValid` if `accountID` is not a UUID or an identity
    /// claim is empty.
    pub fn identity(&self) -> Result<AccountIdentity, TokenError> {
        let id = Uuid::parse_str(&self.account_id).map_err(|_| TokenError::NonValid)?;
        if self.email.is_empty() {
            return Err(TokenError::NonValid);
        }
        Ok(AccountIdentity {
            id,
            email: self.email.clone(),
            name: self.name.clone(),
        })
    }

    /// Expired once `now` reaches `exp`.
    pub fn is_expired_at(&self, now: i64) -> bool {
        now >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> JwtSettings {
        JwtSettings {
            salt: "test-salt".to_string(),
            issuer: "runbot-auth".to_string(),
            subject: "account".to_string(),
            audience: vec!["runbot".to_string()],
            expires_in: 3600,
        }
    }

    fn identity() -> AccountIdentity {
        AccountIdentity {
            id: Uuid::new_v4(),
            email: "a@b.com".to_string(),
            name: "Name".to_string(),
        }
    }

    #[test]
    fn test_claims_creation() {
        let identity = identity();
        let claims = Claims::new(&identity, &config(), 1_000, 3600);

        assert_eq!(claims.account_id, identity.id.to_string());
        assert_eq!(claims.email, "a@b.com");
        assert_eq!(claims.name, "Name");
        assert_eq!(claims.iss, "runbot-auth");
        assert_eq!(claims.sub, "account");
        assert_eq!(claims.aud, vec!["runbot".to_string()]);
        assert_eq!(claims.exp, 4_600);
        assert_eq!(claims.nbf, 1_000);
        assert_eq!(claims.iat, 1_000);
    }

    #[test]
    fn test_expiry_saturates_instead_of_overflowing() {
        let claims = Claims::new(&identity(), &config(), 1_000, i64::MAX);
        assert_eq!(claims.exp, i64::MAX);
    }

    #[test]
    fn test_each_token_gets_its_own_id() {
        let identity = identity();
        let first = Claims::new(&identity, &config(), 0, 60);
        let second = Claims::new(&identity, &config(), 0, 60);
        assert_ne!(first.jti, second.jti);
    }

    #[test]
    fn test_identity_extraction() {
        let identity = identity();
        let claims = Claims::new(&identity, &config(), 0, 60);
        assert_eq!(claims.identity().unwrap(), identity);
    }

    #[test]
    fn test_invalid_account_id() {
        let mut claims = Claims::new(&identity(), &config(), 0, 60);
        claims.account_id = "invalid-uuid".to_string();
        assert!(matches!(claims.identity(), Err(TokenError::NonValid)));
    }

    #[test]
    fn test_serialized_claim_names() {
        let claims = Claims::new(&identity(), &config(), 0, 60);
        let value = serde_json::to_value(&claims).unwrap();
        assert!(value.get("accountID").is_some());
        assert!(value.get("account_id").is_none());
    }

    #[test]
    fn test_expiry_boundary() {
        let claims = Claims::new(&identity(), &config(), 100, 50);
        assert!(!claims.is_expired_at(149));
        assert!(claims.is_expired_at(150));
        assert!(claims.is_expired_at(151));
    }
}
