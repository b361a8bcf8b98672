//! Key/value cache interface backing the session store.
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

pub type CacheResult<T> = Result<T, CacheError>;

/// Cache-layer errors (transport/command/value).
///
/// Kept independent from `AppError`: the session layer logs these and reports
/// "no session" instead of propagating them.
#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache connection error: {0}")]
    BackendConnection(String),
    #[error("cache command error: {0}")]
    BackendCommand(String),
    #[error("cache value error: {0}")]
    InvalidValue(String),
}

/// A minimal, string-based cache interface.
///
/// Sessions only need `GET`, `SET NX` + TTL and `DEL`.
/// Implementations must be cheap to clone (typically `Arc<...>` inside).
#[async_trait]
pub trait CacheClient: Clone + Send + Sync + 'static {
    // Backend name for logs.
    fn backend_name(&self) -> &'static str;

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>>;

    // Set value if the key does not exist, with TTL.
    //
    // Returns:
    // - `Ok(true)`  if the key was set
    // - `Ok(false)` if the key already exists
    async fn set_if_absent_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> CacheResult<bool>;

    // Returns number of deleted keys.
    async fn del(&self, key: &str) -> CacheResult<u64>;
}

pub fn ttl_seconds(seconds: u64) -> Duration {
    Duration::from_secs(seconds)
}
