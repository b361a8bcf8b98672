/*
 * Responsibility
 * - v1 URL layout
 * - Handlers take a RequestContext; no route-level auth layer is needed
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use crate::api::v1::handlers::{
    admin,
    health::health,
    me::{lang, me},
    session::{login, logout},
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/session", post(login).delete(logout))
        .route("/me", get(me))
        .route("/lang", get(lang))
        .route("/admin/ping", get(admin::ping))
}
