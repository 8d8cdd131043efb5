/// Password Hashing and Verification
///
/// One-way bcrypt digests behind the `CredentialHasher` capability. bcrypt is
/// CPU bound, so both operations run on tokio's blocking pool.

use async_trait::async_trait;
use bcrypt::{hash, verify, DEFAULT_COST};

use crate::error::HashError;

/// bcrypt ignores everything past this many bytes.
pub const MAX_SECRET_BYTES: usize = 72;

#[async_trait]
pub trait CredentialHasher: Send + Sync {
    /// Digest of `plaintext`; never equal to it.
    async fn hash(&self, plaintext: &str) -> Result<String, HashError>;

    /// `Ok(())` when `plaintext` matches `digest`, `HashError::Mismatch` otherwise.
    async fn compare(&self, plaintext: &str, digest: &str) -> Result<(), HashError>;
}

#[derive(Debug, Clone)]
pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(DEFAULT_COST)
    }
}

#[async_trait]
impl CredentialHasher for BcryptHasher {
    async fn hash(&self, plaintext: &str) -> Result<String, HashError> {
        if plaintext.len() > MAX_SECRET_BYTES {
            return Err(HashError::SecretTooLong(plaintext.len()));
        }
        let plaintext = plaintext.to_owned();
        let cost = self.cost;
        let digest = tokio::task::spawn_blocking(move || hash(plaintext, cost)).await??;
        Ok(digest)
    }

    /// A secret longer than any storable one cannot match.
    async fn compare(&self, plaintext: &str, digest: &str) -> Result<(), HashError> {
        if plaintext.len() > MAX_SECRET_BYTES {
            return Err(HashError::Mismatch);
        }
        let plaintext = plaintext.to_owned();
        let digest = digest.to_owned();
        let matched = tokio::task::spawn_blocking(move || verify(plaintext, &digest)).await??;
        if matched {
            Ok(())
        } else {
            Err(HashError::Mismatch)
        }
    }
}
