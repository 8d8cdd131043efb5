/// JWT Token Issuance and Validation
///
/// Access tokens are signed with HS256, refresh tokens with HS512, both with
/// the configured salt. Tokens are stateless: verification is signature,
/// registered claims and expiry, nothing else.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, decode_header, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};

use crate::account::AccountIdentity;
use crate::auth::claims::Claims;
use crate::configuration::JwtSettings;
use crate::error::{ConfigError, TokenError};

/// Refresh tokens live this many times longer than access tokens.
const REFRESH_MULTIPLIER: i64 = 10;

/// The only family `decrypt` accepts.
const HMAC_FAMILY: [Algorithm; 3] = [Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn algorithm(&self) -> Algorithm {
        match self {
            TokenKind::Access => Algorithm::HS256,
            TokenKind::Refresh => Algorithm::HS512,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
}

/// Converts identities into signed credentials and back.
pub trait TokenSigner: Send + Sync {
    fn issue_access_token(&self, identity: &AccountIdentity) -> Result<String, TokenError>;

    fn issue_refresh_token(&self, identity: &AccountIdentity) -> Result<String, TokenError>;

    /// Verifies a token signed with any HMAC algorithm.
    fn decrypt(&self, token: &str) -> Result<AccountIdentity, TokenError>;

    /// Verifies a token signed with exactly the algorithm of `kind`.
    fn decrypt_as(&self, token: &str, kind: TokenKind) -> Result<AccountIdentity, TokenError>;

    /// Access token lifetime in seconds.
    fn access_expiry(&self) -> i64;

    /// Refresh token lifetime in seconds.
    fn refresh_expiry(&self) -> i64 {
        self.access_expiry().saturating_mul(REFRESH_MULTIPLIER)
    }

    fn issue_token_pair(&self, identity: &AccountIdentity) -> Result<TokenPair, TokenError> {
        Ok(TokenPair {
            access: self.issue_access_token(identity)?,
            refresh: self.issue_refresh_token(identity)?,
        })
    }
}

pub struct JwtSigner {
    config: JwtSettings,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
}

impl JwtSigner {
    /// # Errors
    /// Returns a configuration error if the salt or audience is empty or the
    /// expiry is outside 1 second to one year.
    pub fn new(config: &JwtSettings) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config: config.clone(),
            encoding_key: EncodingKey::from_secret(config.salt.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.salt.as_bytes()),
        })
    }

    fn lifetime(&self, kind: TokenKind) -> i64 {
        match kind {
            TokenKind::Access => self.access_expiry(),
            TokenKind::Refresh => self.refresh_expiry(),
        }
    }

    fn issue(&self, identity: &AccountIdentity, kind: TokenKind) -> Result<String, TokenError> {
        let now = Utc::now().timestamp();
        let claims = Claims::new(identity, &self.config, now, self.lifetime(kind));

        encode(&Header::new(kind.algorithm()), &claims, &self.encoding_key).map_err(|e| {
            tracing::error!(error = %e, "Token signing failed");
            TokenError::Signing(e)
        })
    }

    fn validation(&self, algorithms: &[Algorithm]) -> Validation {
        let mut validation = Validation::new(algorithms[0]);
        validation.algorithms = algorithms.to_vec();
        validation.leeway = 0;
        validation.validate_nbf = true;
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&self.config.audience);
        validation.sub = Some(self.config.subject.clone());
        validation.set_required_spec_claims(&["exp", "nbf", "iss", "sub", "aud"]);
        validation
    }

    fn verify(&self, token: &str, algorithms: &[Algorithm]) -> Result<AccountIdentity, TokenError> {
        let header = decode_header(token).map_err(TokenError::Rejected)?;
        if !algorithms.contains(&header.alg) {
            tracing::warn!(alg = ?header.alg, "Token signed with an unexpected algorithm");
            return Err(TokenError::Rejected(ErrorKind::InvalidAlgorithm.into()));
        }

        let data = decode::<Claims>(token, &self.decoding_key, &self.validation(algorithms))
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => TokenError::Expired,
                ErrorKind::Json(_) | ErrorKind::MissingRequiredClaim(_) => TokenError::NonValid,
                _ => TokenError::Rejected(e),
            })?;

        // The library still accepts a token at exactly `exp`.
        if data.claims.is_expired_at(Utc::now().timestamp()) {
            return Err(TokenError::Expired);
        }

        data.claims.identity()
    }
}

impl TokenSigner for JwtSigner {
    fn issue_access_token(&self, identity: &AccountIdentity) -> Result<String, TokenError> {
        self.issue(identity, TokenKind::Access)
    }

    fn issue_refresh_token(&self, identity: &AccountIdentity) -> Result<String, TokenError> {
        self.issue(identity, TokenKind::Refresh)
    }

    fn decrypt(&self, token: &str) -> Result<AccountIdentity, TokenError> {
        self.verify(token, &HMAC_FAMILY)
    }

    fn decrypt_as(&self, token: &str, kind: TokenKind) -> Result<AccountIdentity, TokenError> {
        self.verify(token, &[kind.algorithm()])
    }

    fn access_expiry(&self) -> i64 {
        self.config.expires_in
    }
}
