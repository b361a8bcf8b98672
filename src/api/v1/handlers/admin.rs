/*
 * Responsibility
 * - Admin-only endpoints guarded by ensure_role
 */
use axum::Json;
use serde_json::{Value, json};

use crate::{context::RequestContext, error::AppError, services::auth::Role};

pub async fn ping(mut ctx: RequestContext) -> Result<Json<Value>, AppError> {
    ctx.ensure_role(Role::Admin).await?;

    Ok(Json(json!({"status": "ok"})))
}
