/*!
 * Per-request context
 *
 * Responsibility:
 * - One `RequestContext` per request, built from the request headers and `AppState`
 * - Memoized accessors for session, user (authorization) and locale
 * - Credential accessors over the `Authorization` header
 *
 * Notes:
 * - Accessors take `&mut self`; the context is owned by a single handler, so the caches
 *   need no locking even across `.await`
 * - Store failures never leave this module: they are logged and read as "absent"
 */

pub mod cookie;
mod memo;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, header, request::Parts};
use std::convert::Infallible;
use std::sync::Arc;

use crate::repos::{User, UserStore};
use crate::services::auth::{
    AuthorizationError, BasicCredentials, BearerToken, Role, authorize, extract_basic_auth,
    extract_bearer_token,
};
use crate::services::locale::{Locale, LocaleSignals, LocaleStore};
use crate::services::session::{Session, SessionStore};
use crate::state::AppState;

pub use cookie::{CookieUpdate, SessionCookieConfig, SetSessionCookie};
pub use memo::Memo;

pub struct RequestContext {
    headers: HeaderMap,
    session_key: Option<String>,

    sessions: Arc<dyn SessionStore>,
    users: Arc<dyn UserStore>,
    locales: Arc<dyn LocaleStore>,
    cookie_config: SessionCookieConfig,

    session: Memo<Option<Session>>,
    user: Memo<Option<User>>,
    locale: Memo<Locale>,
    cookie_update: Option<CookieUpdate>,
}

impl RequestContext {
    pub fn new(headers: HeaderMap, state: &AppState) -> Self {
        let session_key = cookie::read_cookie(&headers, &state.session_cookie.name);

        Self {
            headers,
            session_key,
            sessions: state.sessions.clone(),
            users: state.users.clone(),
            locales: state.locales.clone(),
            cookie_config: state.session_cookie.clone(),
            session: Memo::new(),
            user: Memo::new(),
            locale: Memo::new(),
            cookie_update: None,
        }
    }

    pub fn users(&self) -> &dyn UserStore {
        self.users.as_ref()
    }

    // --- credentials ---

    fn authorization(&self) -> Option<&str> {
        self.headers
            .get(header::AUTHORIZATION)
            .and_then(|v| std::str::from_utf8(v.as_bytes()).ok())
    }

    /// Token from `Authorization: Bearer <token>`.
    pub fn session_token(&self) -> Option<BearerToken> {
        self.authorization().and_then(extract_bearer_token)
    }

    /// Credentials from `Authorization: Basic <base64>`.
    pub fn basic_auth(&self) -> Option<BasicCredentials> {
        self.authorization().and_then(extract_basic_auth)
    }

    // --- locale ---

    pub async fn locale(&mut self) -> &Locale {
        let headers = &self.headers;
        let locales = &self.locales;

        self.locale
            .get_or_resolve(|| async move {
                let signals = LocaleSignals::from_headers(headers);
                locales.resolve(&signals).await
            })
            .await
    }

    pub async fn lang(&mut self) -> &str {
        self.locale().await.lang()
    }

    // --- session ---

    async fn resolve_session(&mut self) -> Option<Session> {
        let key = self.session_key.as_deref();
        let sessions = &self.sessions;

        self.session
            .get_or_resolve(|| async move {
                let key = key?;
                match sessions.lookup(key).await {
                    Ok(session) => session,
                    Err(err) => {
                        tracing::warn!(
                            backend = sessions.backend_name(),
                            error = %err,
                            "session lookup failed, treating as absent"
                        );
                        None
                    }
                }
            })
            .await
            .clone()
    }

    /// Current session; creates an anonymous one when absent and `create` is set.
    pub async fn session(&mut self, create: bool) -> Option<Session> {
        let current = self.resolve_session().await;
        if current.is_some() || !create {
            return current;
        }

        self.create_session(None).await
    }

    /// Current session if already bound to `user`, otherwise a fresh session
    /// bound to `user` that replaces any current one.
    pub async fn session_with_user(&mut self, user: &User) -> Option<Session> {
        if let Some(current) = self.resolve_session().await {
            if current.is_bound_to(user.id) {
                return Some(current);
            }
            self.discard(&current).await;
        }

        let session = self.create_session(Some(user.id)).await?;
        self.user.set(Some(user.clone()));
        Some(session)
    }

    /// Deletes the current session, if any. Idempotent.
    ///
    /// A session cookie that names no live session is cleared as well.
    pub async fn end_session(&mut self) {
        if let Some(current) = self.resolve_session().await {
            self.discard(&current).await;
        } else if self.session_key.is_some() {
            self.cookie_update = Some(CookieUpdate::Clear);
        }

        self.session.set(None);
        self.user.set(None);
    }

    async fn create_session(&mut self, user_id: Option<uuid::Uuid>) -> Option<Session> {
        match self.sessions.create(user_id).await {
            Ok(session) => {
                self.cookie_update = Some(CookieUpdate::Set {
                    token: session.token.clone(),
                });
                self.session.set(Some(session.clone()));
                self.user.invalidate();
                Some(session)
            }
            Err(err) => {
                tracing::warn!(
                    backend = self.sessions.backend_name(),
                    error = %err,
                    "session creation failed"
                );
                None
            }
        }
    }

    async fn discard(&mut self, session: &Session) {
        if let Err(err) = self.sessions.delete(&session.token).await {
            tracing::warn!(
                backend = self.sessions.backend_name(),
                error = %err,
                "session deletion failed"
            );
        }
        self.cookie_update = Some(CookieUpdate::Clear);
        self.session.set(None);
        self.user.invalidate();
    }

    /// Pending `Set-Cookie` for the response (nothing when the session did not change).
    pub fn session_cookie(&self) -> SetSessionCookie {
        SetSessionCookie(
            self.cookie_update
                .as_ref()
                .and_then(|update| update.to_header_value(&self.cookie_config)),
        )
    }

    // --- authorization ---

    /// User bound to the current session, fetched at most once per session resolution.
    pub async fn current_user(&mut self) -> Option<User> {
        let session = self.resolve_session().await;
        let users = &self.users;

        self.user
            .get_or_resolve(|| async move {
                authorize::load_session_user(session.as_ref(), users.as_ref()).await
            })
            .await
            .clone()
    }

    pub async fn ensure_role(&mut self, required: Role) -> Result<(), AuthorizationError> {
        let user = self.current_user().await;
        authorize::check_role(user.as_ref(), required)
    }
}

impl FromRequestParts<AppState> for RequestContext {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        Ok(Self::new(parts.headers.clone(), state))
    }
}
