//! Orchestration of register, login, logout, and refresh.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::crypto::AuthCrypto;
use crate::error::AuthError;
use crate::repository::UserRepository;
use crate::token::TokenSigner;
use crate::user::{NewUser, TokenPair};

/// The authentication component.
///
/// Pure orchestration over three collaborators: the user store, the
/// Argon2 helper, and the token signer. Every operation is a short-lived
/// request/response unit with no shared mutable state; concurrent
/// refreshes for the same user are last-write-wins by design (one live
/// session per user).
pub struct AuthService {
    users: Arc<dyn UserRepository>,
    crypto: Arc<AuthCrypto>,
    tokens: Arc<TokenSigner>,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService").finish_non_exhaustive()
    }
}

impl AuthService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        crypto: Arc<AuthCrypto>,
        tokens: Arc<TokenSigner>,
    ) -> Self {
        Self {
            users,
            crypto,
            tokens,
        }
    }

    /// Create an account and start its first session.
    ///
    /// A duplicate email fails with [`AuthError::EmailTaken`] before any
    /// token is minted; the store's unique index guarantees no partial row
    /// survives the attempt.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
    ) -> Result<TokenPair, AuthError> {
        let password_hash = self.crypto.hash(password)?;
        let user = self
            .users
            .insert(NewUser::new(name, email, password_hash))
            .await?;

        debug!(user_id = %user.id, "registered new user");
        self.issue_and_persist(user.id, &user.email).await
    }

    /// Verify credentials and start a fresh session.
    ///
    /// An unknown email and a wrong password are deliberately the same
    /// failure, so responses cannot be used to probe which accounts exist.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenPair, AuthError> {
        let user = self
            .users
            .find_by_email(email)
            .await?
            .ok_or(AuthError::AccessDenied)?;

        if !self.crypto.verify(password, &user.password_hash) {
            return Err(AuthError::AccessDenied);
        }

        debug!(user_id = %user.id, "login verified");
        self.issue_and_persist(user.id, &user.email).await
    }

    /// Invalidate the stored refresh session, if any.
    ///
    /// Idempotent: unknown ids and already-cleared sessions still return
    /// `true`, since the caller's goal (no live session) already holds.
    pub async fn logout(&self, user_id: Uuid) -> Result<bool, AuthError> {
        self.users.clear_refresh_token_hash(user_id).await?;
        Ok(true)
    }

    /// Exchange a refresh token for a new pair, rotating the session.
    ///
    /// The presented raw token must verify against the stored hash; on
    /// success the hash is overwritten, so the old refresh token is
    /// permanently spent even though it would still decode.
    pub async fn refresh(
        &self,
        user_id: Uuid,
        presented_refresh_token: &str,
    ) -> Result<TokenPair, AuthError> {
        let user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::AccessDenied)?;

        // No stored hash means logged out; same denial as a bad token.
        let stored_hash = user
            .refresh_token_hash
            .as_deref()
            .ok_or(AuthError::AccessDenied)?;

        if !self.crypto.verify(presented_refresh_token, stored_hash) {
            return Err(AuthError::AccessDenied);
        }

        debug!(user_id = %user.id, "rotating refresh session");
        self.issue_and_persist(user.id, &user.email).await
    }

    /// Sign a pair and persist the refresh half's hash, replacing any
    /// previous session. Shared by register, login, and refresh.
    async fn issue_and_persist(
        &self,
        user_id: Uuid,
        email: &str,
    ) -> Result<TokenPair, AuthError> {
        let pair = self.tokens.issue_pair(user_id, email)?;
        let refresh_hash = self.crypto.hash(&pair.refresh_token)?;
        self.users
            .set_refresh_token_hash(user_id, &refresh_hash)
            .await?;
        Ok(pair)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::authz::{RoleGate, UserDirectory};
    use crate::crypto::test_params;
    use crate::repository::InMemoryUserRepository;
    use crate::user::Role;

    const ACCESS_SECRET: &[u8] = b"at-secret-for-tests";
    const REFRESH_SECRET: &[u8] = b"rt-secret-for-tests";

    struct Harness {
        repo: Arc<InMemoryUserRepository>,
        crypto: Arc<AuthCrypto>,
        auth: AuthService,
        directory: UserDirectory,
        tokens: Arc<TokenSigner>,
    }

    fn harness() -> Harness {
        let repo = Arc::new(InMemoryUserRepository::new());
        let crypto =
            Arc::new(AuthCrypto::with_params(b"test-pepper", test_params::fast()).unwrap());
        let tokens = Arc::new(TokenSigner::new(ACCESS_SECRET, REFRESH_SECRET));
        let auth = AuthService::new(repo.clone(), crypto.clone(), tokens.clone());
        let directory = UserDirectory::new(repo.clone());
        Harness {
            repo,
            crypto,
            auth,
            directory,
            tokens,
        }
    }

    async fn register_amara(h: &Harness) -> TokenPair {
        h.auth
            .register("Amara", "amara@example.com", "super-secret")
            .await
            .expect("register")
    }

    async fn user_id(h: &Harness, email: &str) -> Uuid {
        h.repo
            .find_by_email(email)
            .await
            .unwrap()
            .expect("user exists")
            .id
    }

    #[tokio::test]
    async fn duplicate_register_conflicts_and_leaves_no_row() {
        let h = harness();
        register_amara(&h).await;

        let second = h
            .auth
            .register("Other Amara", "amara@example.com", "different-secret")
            .await;
        assert!(matches!(second, Err(AuthError::EmailTaken)));

        // Only the first registration persisted.
        let all = h.repo.list_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Amara");
    }

    #[tokio::test]
    async fn login_failures_are_undifferentiated() {
        let h = harness();
        register_amara(&h).await;

        let unknown = h.auth.login("nobody@example.com", "super-secret").await;
        assert!(matches!(unknown, Err(AuthError::AccessDenied)));

        let wrong_password = h.auth.login("amara@example.com", "super-secret-a").await;
        assert!(matches!(wrong_password, Err(AuthError::AccessDenied)));
    }

    #[tokio::test]
    async fn register_persists_a_verifiable_refresh_hash() {
        let h = harness();
        let pair = register_amara(&h).await;

        let user = h
            .repo
            .find_by_email("amara@example.com")
            .await
            .unwrap()
            .unwrap();
        let stored = user.refresh_token_hash.expect("hash stored");

        assert!(h.crypto.verify(&pair.refresh_token, &stored));
        assert!(!h.crypto.verify(&pair.access_token, &stored));
        assert!(!h.crypto.verify("some-other-token", &stored));
    }

    #[tokio::test]
    async fn login_rotates_the_stored_session() {
        let h = harness();
        let first = register_amara(&h).await;
        let id = user_id(&h, "amara@example.com").await;

        let second = h
            .auth
            .login("amara@example.com", "super-secret")
            .await
            .expect("login");

        // The registration-era refresh token is spent; the new one works.
        assert!(matches!(
            h.auth.refresh(id, &first.refresh_token).await,
            Err(AuthError::AccessDenied)
        ));
        h.auth
            .refresh(id, &second.refresh_token)
            .await
            .expect("fresh token refreshes");
    }

    #[tokio::test]
    async fn refresh_is_single_use() {
        let h = harness();
        let pair = register_amara(&h).await;
        let id = user_id(&h, "amara@example.com").await;

        let rotated = h
            .auth
            .refresh(id, &pair.refresh_token)
            .await
            .expect("first refresh");

        // Rotation must hand out a different token even when both were
        // issued within the same second, or the replay below would verify.
        assert_ne!(pair.refresh_token, rotated.refresh_token);

        // Replaying the spent token must fail.
        assert!(matches!(
            h.auth.refresh(id, &pair.refresh_token).await,
            Err(AuthError::AccessDenied)
        ));

        // The replacement works exactly once in turn.
        h.auth
            .refresh(id, &rotated.refresh_token)
            .await
            .expect("rotated token refreshes");
        assert!(matches!(
            h.auth.refresh(id, &rotated.refresh_token).await,
            Err(AuthError::AccessDenied)
        ));
    }

    #[tokio::test]
    async fn refresh_denies_unknown_users() {
        let h = harness();
        let denied = h.auth.refresh(Uuid::now_v7(), "whatever").await;
        assert!(matches!(denied, Err(AuthError::AccessDenied)));
    }

    #[tokio::test]
    async fn logout_is_idempotent() {
        let h = harness();

        // Unknown id still succeeds.
        assert!(h.auth.logout(Uuid::now_v7()).await.unwrap());

        register_amara(&h).await;
        let id = user_id(&h, "amara@example.com").await;
        assert!(h.auth.logout(id).await.unwrap());
        // Second logout with no live session is still fine.
        assert!(h.auth.logout(id).await.unwrap());
    }

    #[tokio::test]
    async fn logout_invalidates_the_refresh_session() {
        let h = harness();
        let pair = register_amara(&h).await;
        let id = user_id(&h, "amara@example.com").await;

        assert!(h.auth.logout(id).await.unwrap());

        let denied = h.auth.refresh(id, &pair.refresh_token).await;
        assert!(matches!(denied, Err(AuthError::AccessDenied)));
    }

    #[tokio::test]
    async fn issued_pair_round_trips_through_the_signer() {
        let h = harness();
        let pair = register_amara(&h).await;
        let id = user_id(&h, "amara@example.com").await;

        let access = h.tokens.decode_access(&pair.access_token).unwrap();
        let refresh = h.tokens.decode_refresh(&pair.refresh_token).unwrap();

        assert_eq!(access.sub, id);
        assert_eq!(refresh.sub, id);
        assert_eq!(access.email, "amara@example.com");
        assert_eq!(refresh.email, access.email);
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[tokio::test]
    async fn listing_is_gated_on_the_admin_role() {
        let h = harness();
        register_amara(&h).await;
        h.auth
            .register("Bola", "bola@example.com", "another-secret")
            .await
            .unwrap();

        let amara = user_id(&h, "amara@example.com").await;
        let bola = user_id(&h, "bola@example.com").await;

        // Plain users get no privileged result.
        assert!(h.directory.list_all_users(amara).await.unwrap().is_none());

        h.repo.set_role(amara, Role::Admin).await;
        let listed = h
            .directory
            .list_all_users(amara)
            .await
            .unwrap()
            .expect("admin sees the listing");
        assert_eq!(listed.len(), 2);
        assert!(listed.iter().any(|u| u.id == bola));

        // Unknown requesters are denied, not erred.
        assert!(
            h.directory
                .list_all_users(Uuid::now_v7())
                .await
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn role_gate_matches_any_required_role() {
        let admin_only = RoleGate::new(&[Role::Admin]);
        assert!(admin_only.allows(Role::Admin));
        assert!(!admin_only.allows(Role::User));

        let anyone = RoleGate::new(&[Role::User, Role::Admin]);
        assert!(anyone.allows(Role::User));
        assert!(anyone.allows(Role::Admin));
    }
}
