//! Argon2id hashing for credentials and refresh tokens.

use argon2::{
    Algorithm, Argon2, Params, ParamsBuilder, Version,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use password_hash::Error as PasswordHashError;
use rand::{TryRngCore, rngs::OsRng};
use thiserror::Error;
use zeroize::Zeroizing;

/// Centralized cryptographic helper for authentication-sensitive hashing.
///
/// One primitive, two uses: Argon2id with a server-side pepper hashes both
/// login passwords and raw refresh tokens before they touch the store.
/// Keeping the parameters in one place guarantees consistent choices and
/// makes pepper rotation a single-site change.
#[derive(Debug)]
pub struct AuthCrypto {
    argon2: Argon2<'static>,
    pepper: Zeroizing<Vec<u8>>,
}

#[derive(Debug, Error)]
pub enum AuthCryptoError {
    #[error("password pepper must not be empty")]
    EmptyPepper,
    #[error("invalid Argon2 parameters: {0}")]
    InvalidArgon2Params(String),
    #[error("password hashing error: {0}")]
    PasswordHash(String),
}

impl From<PasswordHashError> for AuthCryptoError {
    fn from(err: PasswordHashError) -> Self {
        AuthCryptoError::PasswordHash(err.to_string())
    }
}

impl AuthCrypto {
    /// Defaults target ~64 MiB memory and 3 iterations, a solid server
    /// baseline without dedicated tuning.
    const DEFAULT_MEMORY_KIB: u32 = 64 * 1024; // 64 MiB
    const DEFAULT_ITERATIONS: u32 = 3;
    const DEFAULT_PARALLELISM: u32 = 1;
    const SALT_LENGTH: usize = password_hash::Salt::RECOMMENDED_LENGTH;

    /// Build a helper with default Argon2id parameters.
    pub fn new(pepper: impl AsRef<[u8]>) -> Result<Self, AuthCryptoError> {
        Self::with_params(
            pepper,
            ParamsBuilder::new()
                .m_cost(Self::DEFAULT_MEMORY_KIB)
                .t_cost(Self::DEFAULT_ITERATIONS)
                .p_cost(Self::DEFAULT_PARALLELISM)
                .output_len(32)
                .build()
                .map_err(|err| AuthCryptoError::InvalidArgon2Params(err.to_string()))?,
        )
    }

    /// Build a helper with caller-specified Argon2 parameters (useful for
    /// tests and constrained environments).
    pub fn with_params(
        pepper: impl AsRef<[u8]>,
        params: Params,
    ) -> Result<Self, AuthCryptoError> {
        let pepper = pepper.as_ref();
        if pepper.is_empty() {
            return Err(AuthCryptoError::EmptyPepper);
        }

        let argon2 = Argon2::new(Algorithm::Argon2id, Version::default(), params);

        Ok(Self {
            argon2,
            pepper: Zeroizing::new(pepper.to_vec()),
        })
    }

    /// Hash a secret using Argon2id with a random salt and the shared
    /// pepper. The resulting PHC string is suitable for storage.
    pub fn hash(&self, secret: &str) -> Result<String, AuthCryptoError> {
        let material = self.peppered(secret);

        // Use the workspace's rand crate so minimal builds avoid depending
        // on password_hash's optional rand_core shim.
        let mut salt_bytes = [0u8; Self::SALT_LENGTH];
        OsRng
            .try_fill_bytes(&mut salt_bytes)
            .map_err(|err| AuthCryptoError::PasswordHash(err.to_string()))?;
        let salt = SaltString::encode_b64(&salt_bytes).map_err(AuthCryptoError::from)?;
        let hash = self.argon2.hash_password(&material, &salt)?.to_string();
        Ok(hash)
    }

    /// Verify a secret against a stored PHC string, applying the shared
    /// pepper. A malformed stored hash verifies as `false` rather than
    /// erroring, so callers can treat it as a plain mismatch.
    pub fn verify(&self, secret: &str, stored_hash: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(stored_hash) else {
            return false;
        };
        let material = self.peppered(secret);
        self.argon2.verify_password(&material, &parsed).is_ok()
    }

    fn peppered(&self, secret: &str) -> Zeroizing<Vec<u8>> {
        let mut material = Zeroizing::new(Vec::with_capacity(secret.len() + self.pepper.len()));
        material.extend_from_slice(secret.as_bytes());
        material.extend_from_slice(&self.pepper);
        material
    }
}
