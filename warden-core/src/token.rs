//! Signed token issuance and validation.
//!
//! Access and refresh tokens are self-contained HS256 JWTs carrying the
//! same `{ sub, email }` payload but signed with independent secrets and
//! expirations. Raw tokens never reach the store; the service persists an
//! Argon2 hash of the refresh token instead.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use uuid::Uuid;

use crate::user::{Claims, TokenPair};

/// Seconds an access token stays valid.
pub const ACCESS_TOKEN_TTL_SECS: i64 = 15 * 60;
/// Seconds a refresh token stays valid.
pub const REFRESH_TOKEN_TTL_SECS: i64 = 7 * 24 * 60 * 60;

struct SigningKey {
    encoding: EncodingKey,
    decoding: DecodingKey,
    ttl: Duration,
}

impl SigningKey {
    fn new(secret: &[u8], ttl_secs: i64) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            ttl: Duration::seconds(ttl_secs),
        }
    }
}

/// Issues and validates the two token kinds with independent secrets.
pub struct TokenSigner {
    access: SigningKey,
    refresh: SigningKey,
}

impl std::fmt::Debug for TokenSigner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenSigner").finish_non_exhaustive()
    }
}

impl TokenSigner {
    /// Build a signer with the default TTLs (access 15 minutes, refresh
    /// 7 days). The two secrets must come from distinct configuration
    /// values so a leaked refresh secret cannot mint access tokens.
    pub fn new(access_secret: &[u8], refresh_secret: &[u8]) -> Self {
        Self::with_ttls(
            access_secret,
            refresh_secret,
            ACCESS_TOKEN_TTL_SECS,
            REFRESH_TOKEN_TTL_SECS,
        )
    }

    /// Build a signer with caller-chosen TTLs (useful for expiry tests).
    pub fn with_ttls(
        access_secret: &[u8],
        refresh_secret: &[u8],
        access_ttl_secs: i64,
        refresh_ttl_secs: i64,
    ) -> Self {
        Self {
            access: SigningKey::new(access_secret, access_ttl_secs),
            refresh: SigningKey::new(refresh_secret, refresh_ttl_secs),
        }
    }

    /// Sign a fresh access/refresh pair for the given identity.
    pub fn issue_pair(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<TokenPair, jsonwebtoken::errors::Error> {
        let access_token = Self::sign(&self.access, user_id, email)?;
        let refresh_token = Self::sign(&self.refresh, user_id, email)?;

        Ok(TokenPair {
            access_token,
            refresh_token,
        })
    }

    /// Decode and validate an access token, including its expiry.
    pub fn decode_access(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with(&self.access, token)
    }

    /// Decode and validate a refresh token, including its expiry.
    ///
    /// A decodable refresh token is necessary but not sufficient: the
    /// service still verifies it against the stored hash, which is what
    /// enforces single-use rotation.
    pub fn decode_refresh(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        Self::decode_with(&self.refresh, token)
    }

    fn sign(
        key: &SigningKey,
        user_id: Uuid,
        email: &str,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            email: email.to_string(),
            iat: now.timestamp(),
            exp: (now + key.ttl).timestamp(),
            jti: Uuid::new_v4().to_string(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &key.encoding)
    }

    fn decode_with(
        key: &SigningKey,
        token: &str,
    ) -> Result<Claims, jsonwebtoken::errors::Error> {
        let validation = Validation::new(Algorithm::HS256);
        decode::<Claims>(token, &key.decoding, &validation).map(|data| data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ACCESS_SECRET: &[u8] = b"access-secret-for-tests-only";
    const REFRESH_SECRET: &[u8] = b"refresh-secret-for-tests-only";

    fn signer() -> TokenSigner {
        TokenSigner::new(ACCESS_SECRET, REFRESH_SECRET)
    }

    #[test]
    fn pair_decodes_to_the_same_identity() {
        let user_id = Uuid::now_v7();
        let pair = signer()
            .issue_pair(user_id, "amara@example.com")
            .expect("issue pair");

        let access = signer().decode_access(&pair.access_token).expect("access");
        let refresh = signer()
            .decode_refresh(&pair.refresh_token)
            .expect("refresh");

        assert_eq!(access.sub, user_id);
        assert_eq!(refresh.sub, user_id);
        assert_eq!(access.email, "amara@example.com");
        assert_eq!(refresh.email, access.email);

        // Distinct secrets and TTLs: the strings must differ.
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn back_to_back_pairs_are_distinct() {
        // Issuance timestamps have second granularity, so two pairs signed
        // in quick succession would collide without the jti claim. Rotation
        // depends on the replacement being a different string.
        let signer = signer();
        let user_id = Uuid::now_v7();

        let first = signer
            .issue_pair(user_id, "amara@example.com")
            .expect("first pair");
        let second = signer
            .issue_pair(user_id, "amara@example.com")
            .expect("second pair");

        assert_ne!(first.access_token, second.access_token);
        assert_ne!(first.refresh_token, second.refresh_token);
    }

    #[test]
    fn tokens_do_not_cross_validate() {
        let pair = signer()
            .issue_pair(Uuid::now_v7(), "amara@example.com")
            .expect("issue pair");

        assert!(signer().decode_access(&pair.refresh_token).is_err());
        assert!(signer().decode_refresh(&pair.access_token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        // Validation applies a default leeway, so expire well past it.
        let signer = TokenSigner::with_ttls(ACCESS_SECRET, REFRESH_SECRET, -300, -300);
        let pair = signer
            .issue_pair(Uuid::now_v7(), "amara@example.com")
            .expect("issue pair");

        assert!(signer.decode_access(&pair.access_token).is_err());
        assert!(signer.decode_refresh(&pair.refresh_token).is_err());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(signer().decode_access("not.a.jwt").is_err());
    }
}
