//! Role check for protected operations.
//!
//! Every denial is the same opaque `AuthorizationError`; the reason is only
//! visible in logs.

use thiserror::Error;
use uuid::Uuid;

use crate::repos::{RepoError, User, UserStore};
use crate::services::auth::Role;
use crate::services::session::Session;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("the role of the user did not match")]
pub struct AuthorizationError;

/// Loads the user bound to `session`, logging why none could be loaded.
pub async fn load_session_user(session: Option<&Session>, users: &dyn UserStore) -> Option<User> {
    let Some(session) = session else {
        tracing::debug!("no active session");
        return None;
    };

    let Some(user_id) = session.user_id else {
        tracing::debug!("session is not bound to a user");
        return None;
    };

    fetch_user(users, user_id).await
}

async fn fetch_user(users: &dyn UserStore, user_id: Uuid) -> Option<User> {
    match users.get_by_id(user_id).await {
        Ok(user) => Some(user),
        Err(RepoError::NotFound) => {
            tracing::warn!(%user_id, "session user no longer exists");
            None
        }
        Err(err) => {
            tracing::error!(%user_id, error = ?err, "user store failure");
            None
        }
    }
}

/// Grants access only when `user` is present and one of its roles implies `required`.
pub fn check_role(user: Option<&User>, required: Role) -> Result<(), AuthorizationError> {
    let Some(user) = user else {
        tracing::debug!(%required, "authorization denied: no user");
        return Err(AuthorizationError);
    };

    if !user.is_granted_for(required) {
        tracing::info!(
            user_id = %user.id,
            %required,
            granted = ?user.roles,
            "authorization denied: insufficient role"
        );
        return Err(AuthorizationError);
    }

    Ok(())
}
