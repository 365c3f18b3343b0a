//! Role-based authorization.
//!
//! The role requirement is declared as plain data on the operation and
//! checked by a plain function; nothing here inspects handlers at runtime.

use std::sync::Arc;

use uuid::Uuid;

use crate::error::AuthError;
use crate::repository::UserRepository;
use crate::user::{Role, User};

/// An allow/deny decision comparing a caller's role against an
/// operation's required roles.
#[derive(Debug, Clone, Copy)]
pub struct RoleGate {
    required: &'static [Role],
}

impl RoleGate {
    pub const fn new(required: &'static [Role]) -> Self {
        Self { required }
    }

    pub fn allows(&self, actor: Role) -> bool {
        self.required.contains(&actor)
    }
}

/// Gate protecting the privileged user listing.
const ADMIN_ONLY: RoleGate = RoleGate::new(&[Role::Admin]);

/// The authorization component: resolves a caller's role and gates
/// privileged reads on it.
pub struct UserDirectory {
    users: Arc<dyn UserRepository>,
}

impl std::fmt::Debug for UserDirectory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserDirectory").finish_non_exhaustive()
    }
}

impl UserDirectory {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Return every user when the requester holds the admin role.
    ///
    /// Denial is `Ok(None)`, not an error: the check itself stays
    /// mechanical and cheap, and the HTTP boundary decides that "no
    /// privileged result" means 403. Store failures still propagate.
    pub async fn list_all_users(
        &self,
        requesting_user_id: Uuid,
    ) -> Result<Option<Vec<User>>, AuthError> {
        let Some(role) = self.users.role_of(requesting_user_id).await? else {
            return Ok(None);
        };

        if !ADMIN_ONLY.allows(role) {
            return Ok(None);
        }

        Ok(Some(self.users.list_all().await?))
    }
}
