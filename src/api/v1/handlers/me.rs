/*
 * Responsibility
 * - GET /me: the user bound to the session cookie
 * - GET /lang: resolved language for this request
 */
use axum::Json;

use crate::{
    api::v1::dto::session::{LangResponse, MeResponse, PresentedCredential},
    context::RequestContext,
    error::AppError,
};

pub async fn me(mut ctx: RequestContext) -> Result<Json<MeResponse>, AppError> {
    let user = ctx.current_user().await.ok_or(AppError::Unauthorized)?;

    let credential = if ctx.session_token().is_some() {
        PresentedCredential::Bearer
    } else if ctx.basic_auth().is_some() {
        PresentedCredential::Basic
    } else {
        PresentedCredential::None
    };

    Ok(Json(MeResponse {
        id: user.id,
        user_name: user.user_name,
        roles: user.roles,
        lang: ctx.lang().await.to_string(),
        credential,
    }))
}

pub async fn lang(mut ctx: RequestContext) -> Json<LangResponse> {
    let locale = ctx.locale().await;

    Json(LangResponse {
        lang: locale.lang().to_string(),
        greeting: locale.translate("greeting").to_string(),
    })
}
