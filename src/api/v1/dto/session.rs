/*
 * Responsibility
 * - Response DTOs for /session, /me and /lang
 */
use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::services::auth::Role;

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub lang: String,
}

/// Which `Authorization` scheme the caller presented, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentedCredential {
    Bearer,
    Basic,
    None,
}

#[derive(Debug, Serialize)]
pub struct MeResponse {
    pub id: Uuid,
    pub user_name: String,
    pub roles: Vec<Role>,
    pub lang: String,
    pub credential: PresentedCredential,
}

#[derive(Debug, Serialize)]
pub struct LangResponse {
    pub lang: String,
    pub greeting: String,
}
