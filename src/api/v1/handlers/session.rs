/*
 * Responsibility
 * - POST /session: login with Basic credentials, bind a session to the user
 * - DELETE /session: logout
 * - Both return the session cookie change as a response part
 */
use axum::{Json, http::StatusCode, response::IntoResponse};

use crate::{
    api::v1::dto::session::SessionResponse, context::RequestContext, error::AppError,
};

pub async fn login(mut ctx: RequestContext) -> Result<impl IntoResponse, AppError> {
    let creds = ctx.basic_auth().ok_or(AppError::Unauthorized)?;

    let user = ctx
        .users()
        .verify_credentials(&creds.username, &creds.password)
        .await?
        .ok_or_else(|| {
            tracing::info!(user_name = %creds.username, "login rejected");
            AppError::Unauthorized
        })?;

    let session = ctx
        .session_with_user(&user)
        .await
        .ok_or(AppError::Unavailable)?;
    let lang = ctx.lang().await.to_string();

    tracing::info!(user_id = %user.id, "login");

    Ok((
        StatusCode::CREATED,
        ctx.session_cookie(),
        Json(SessionResponse {
            user_id: user.id,
            expires_at: session.expires_at,
            lang,
        }),
    ))
}

pub async fn logout(mut ctx: RequestContext) -> impl IntoResponse {
    ctx.end_session().await;
    (StatusCode::NO_CONTENT, ctx.session_cookie(), ())
}
