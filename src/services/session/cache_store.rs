use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::Utc;
use sha2::{Digest, Sha256};
use std::{sync::Arc, time::Duration};
use uuid::Uuid;

use crate::services::cache::CacheClient;
use crate::services::session::store::{SessionStore, SessionStoreError};
use crate::services::session::{Session, generate_token};

const CREATE_ATTEMPTS: usize = 3;

/// Session store on top of any `CacheClient` (Valkey in production).
///
/// Sessions are stored as JSON under `<prefix>:<base64url(sha256(token))>` so
/// raw tokens never appear in the keyspace. The cache TTL matches the session
/// lifetime.
#[derive(Clone)]
pub struct CacheSessionStore<C: CacheClient> {
    cache: Arc<C>,
    prefix: String,
    ttl: Duration,
}

impl<C: CacheClient> CacheSessionStore<C> {
    pub fn new(cache: Arc<C>, prefix: impl Into<String>, ttl: Duration) -> Self {
        Self {
            cache,
            prefix: prefix.into(),
            ttl,
        }
    }

    pub fn key(&self, token: &str) -> String {
        let digest = Sha256::digest(token.as_bytes());
        format!("{}:{}", self.prefix, URL_SAFE_NO_PAD.encode(digest))
    }

    fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::from_std(self.ttl).unwrap_or_else(|_| chrono::Duration::days(365))
    }
}

#[async_trait]
impl<C: CacheClient> SessionStore for CacheSessionStore<C> {
    fn backend_name(&self) -> &'static str {
        self.cache.backend_name()
    }

    async fn lookup(&self, token: &str) -> Result<Option<Session>, SessionStoreError> {
        let Some(raw) = self.cache.get_string(&self.key(token)).await? else {
            return Ok(None);
        };

        let session: Session = serde_json::from_str(&raw)?;

        // The key is derived from the token, but guard against a mismatched payload anyway.
        if session.token != token || !session.is_active(Utc::now()) {
            return Ok(None);
        }

        Ok(Some(session))
    }

    async fn create(&self, user_id: Option<Uuid>) -> Result<Session, SessionStoreError> {
        for _ in 0..CREATE_ATTEMPTS {
            let token = generate_token().map_err(SessionStoreError::Random)?;
            let session = Session::new(token, user_id, self.session_ttl(), Utc::now());
            let payload = serde_json::to_string(&session)?;

            if self
                .cache
                .set_if_absent_with_ttl(&self.key(&session.token), &payload, self.ttl)
                .await?
            {
                return Ok(session);
            }

            tracing::warn!(backend = self.backend_name(), "session token collision, retrying");
        }

        Err(SessionStoreError::TokenCollision)
    }

    async fn delete(&self, token: &str) -> Result<bool, SessionStoreError> {
        let removed = self.cache.del(&self.key(token)).await?;
        Ok(removed > 0)
    }
}
