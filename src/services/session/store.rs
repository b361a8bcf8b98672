use async_trait::async_trait;
use uuid::Uuid;

use crate::services::cache::CacheError;
use crate::services::session::Session;

/// Session storage backend.
///
/// Shared by every request; implementations handle their own consistency.
/// The request context never propagates these errors, it logs them and
/// behaves as if no session exists.
#[async_trait]
pub trait SessionStore: Send + Sync + 'static {
    fn backend_name(&self) -> &'static str;

    // Only active sessions are returned; ended or expired ones read as `None`.
    async fn lookup(&self, token: &str) -> Result<Option<Session>, SessionStoreError>;

    async fn create(&self, user_id: Option<Uuid>) -> Result<Session, SessionStoreError>;

    // `Ok(true)` when a session was removed.
    async fn delete(&self, token: &str) -> Result<bool, SessionStoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("session payload error: {0}")]
    Payload(#[from] serde_json::Error),

    #[error("random source unavailable: {0}")]
    Random(getrandom::Error),

    #[error("could not allocate a unique session token")]
    TokenCollision,
}
