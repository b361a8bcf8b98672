/*
 * Responsibility
 * - Shared application state handed to every request (AppState)
 * - Holds the injected stores; each RequestContext is built from it
 * - Clone is cheap (Arc inside)
 */
use std::sync::Arc;

use crate::context::SessionCookieConfig;
use crate::repos::UserStore;
use crate::services::locale::LocaleStore;
use crate::services::session::SessionStore;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<dyn SessionStore>,
    pub users: Arc<dyn UserStore>,
    pub locales: Arc<dyn LocaleStore>,
    pub session_cookie: SessionCookieConfig,
}

impl AppState {
    pub fn new(
        sessions: Arc<dyn SessionStore>,
        users: Arc<dyn UserStore>,
        locales: Arc<dyn LocaleStore>,
        session_cookie: SessionCookieConfig,
    ) -> Self {
        Self {
            sessions,
            users,
            locales,
            session_cookie,
        }
    }
}
