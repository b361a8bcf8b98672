//! In-memory collaborators and counters for tests.

use async_trait::async_trait;
use base64::Engine as _;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::context::{RequestContext, SessionCookieConfig};
use crate::repos::{RepoError, RepoResult, User, UserStore};
use crate::services::auth::Role;
use crate::services::cache::{CacheError, MemoryCache};
use crate::services::locale::{Locale, LocaleSignals, LocaleStore, StaticLocaleStore};
use crate::services::session::{CacheSessionStore, Session, SessionStore, SessionStoreError};
use crate::state::AppState;

pub const COOKIE_NAME: &str = "sid";

pub fn session_cookie(token: &str) -> String {
    format!("{COOKIE_NAME}={token}")
}

pub fn basic_header(username: &str, password: &str) -> String {
    let encoded = base64::engine::general_purpose::STANDARD.encode(format!("{username}:{password}"));
    format!("Basic {encoded}")
}

fn injected_failure() -> CacheError {
    CacheError::BackendConnection("injected failure".into())
}

/// Session store over `MemoryCache` that counts calls and can be told to fail.
pub struct CountingSessionStore {
    inner: CacheSessionStore<MemoryCache>,
    lookups: AtomicUsize,
    deletes: AtomicUsize,
    failing: AtomicBool,
}

impl CountingSessionStore {
    pub fn new() -> Self {
        Self {
            inner: CacheSessionStore::new(
                Arc::new(MemoryCache::new()),
                "session",
                Duration::from_secs(3600),
            ),
            lookups: AtomicUsize::new(0),
            deletes: AtomicUsize::new(0),
            failing: AtomicBool::new(false),
        }
    }

    pub fn inner(&self) -> &CacheSessionStore<MemoryCache> {
        &self.inner
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> Result<(), SessionStoreError> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(injected_failure().into());
        }
        Ok(())
    }
}

#[async_trait]
impl SessionStore for CountingSessionStore {
    fn backend_name(&self) -> &'static str {
        "counting"
    }

    async fn lookup(&self, token: &str) -> Result<Option<Session>, SessionStoreError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.lookup(token).await
    }

    async fn create(&self, user_id: Option<Uuid>) -> Result<Session, SessionStoreError> {
        self.check()?;
        self.inner.create(user_id).await
    }

    async fn delete(&self, token: &str) -> Result<bool, SessionStoreError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.inner.delete(token).await
    }
}

/// User store keyed by id, with plaintext passwords.
#[derive(Default)]
pub struct MemoryUserStore {
    users: Mutex<HashMap<Uuid, (User, String)>>,
    fetches: AtomicUsize,
    failing: AtomicBool,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, user_name: &str, password: &str, roles: Vec<Role>) -> User {
        let user = User {
            id: Uuid::new_v4(),
            user_name: user_name.to_string(),
            roles,
        };
        self.users
            .lock()
            .unwrap()
            .insert(user.id, (user.clone(), password.to_string()));
        user
    }

    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    fn check(&self) -> RepoResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepoError::Db(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn get_by_id(&self, id: Uuid) -> RepoResult<User> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        self.users
            .lock()
            .unwrap()
            .get(&id)
            .map(|(user, _)| user.clone())
            .ok_or(RepoError::NotFound)
    }

    async fn verify_credentials(
        &self,
        user_name: &str,
        password: &str,
    ) -> RepoResult<Option<User>> {
        self.check()?;
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|(user, pw)| user.user_name == user_name && pw == password)
            .map(|(user, _)| user.clone()))
    }
}

/// Locale store (en default, de) that counts resolutions.
pub struct CountingLocaleStore {
    inner: StaticLocaleStore,
    resolutions: AtomicUsize,
}

impl CountingLocaleStore {
    pub fn new() -> Self {
        let inner = StaticLocaleStore::new("en")
            .with_language("en", [("greeting".to_string(), "Hello".to_string())].into())
            .with_language("de", [("greeting".to_string(), "Hallo".to_string())].into());

        Self {
            inner,
            resolutions: AtomicUsize::new(0),
        }
    }

    pub fn resolutions(&self) -> usize {
        self.resolutions.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl LocaleStore for CountingLocaleStore {
    async fn resolve(&self, signals: &LocaleSignals) -> Locale {
        self.resolutions.fetch_add(1, Ordering::SeqCst);
        self.inner.resolve(signals).await
    }
}

/// Shared stores plus an `AppState` wired to them.
pub struct Harness {
    pub sessions: Arc<CountingSessionStore>,
    pub users: Arc<MemoryUserStore>,
    pub locales: Arc<CountingLocaleStore>,
    pub state: AppState,
}

impl Harness {
    pub fn new() -> Self {
        let sessions = Arc::new(CountingSessionStore::new());
        let users = Arc::new(MemoryUserStore::new());
        let locales = Arc::new(CountingLocaleStore::new());

        let state = AppState::new(
            sessions.clone(),
            users.clone(),
            locales.clone(),
            SessionCookieConfig {
                name: COOKIE_NAME.to_string(),
                max_age_seconds: 3600,
                secure: false,
            },
        );

        Self {
            sessions,
            users,
            locales,
            state,
        }
    }

    pub fn context(&self, headers: axum::http::HeaderMap) -> RequestContext {
        RequestContext::new(headers, &self.state)
    }
}
