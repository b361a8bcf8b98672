use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crate::services::cache::client::{CacheClient, CacheError, CacheResult};

/// Process-local cache with the same semantics as `ValkeyClient`.
///
/// Expired entries are dropped when their key is read and swept on every
/// insert. Only suitable for a single instance (development, tests).
#[derive(Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, Entry>>>,
}

struct Entry {
    value: String,
    expires_at: Instant,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> CacheResult<MutexGuard<'_, HashMap<String, Entry>>> {
        self.entries
            .lock()
            .map_err(|_| CacheError::BackendCommand("memory cache lock poisoned".into()))
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.entries.lock().map_or(0, |entries| entries.len())
    }

    fn purge_expired(entries: &mut HashMap<String, Entry>, key: &str, now: Instant) {
        if entries.get(key).is_some_and(|e| e.expires_at <= now) {
            entries.remove(key);
        }
    }
}

#[async_trait]
impl CacheClient for MemoryCache {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn get_string(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self.lock()?;
        Self::purge_expired(&mut entries, key, Instant::now());

        Ok(entries.get(key).map(|e| e.value.clone()))
    }

    async fn set_if_absent_with_ttl(
        &self,
        key: &str,
        value: &str,
        ttl: Duration,
    ) -> CacheResult<bool> {
        let now = Instant::now();
        let mut entries = self.lock()?;
        entries.retain(|_, e| e.expires_at > now);

        if entries.contains_key(key) {
            return Ok(false);
        }

        // Same clamp as the Valkey backend (EX takes whole seconds).
        let ttl = Duration::from_secs(ttl.as_secs().max(1));
        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at: now + ttl,
            },
        );

        Ok(true)
    }

    async fn del(&self, key: &str) -> CacheResult<u64> {
        let mut entries = self.lock()?;
        Self::purge_expired(&mut entries, key, Instant::now());

        Ok(entries.remove(key).map_or(0, |_| 1))
    }
}
