/*
 * Responsibility
 * - forward-auth 判定 (preflight 素通し → token 抽出 → introspection → policy)
 * - ALLOW: 204 + X-Auth-User / DENY: 401 (body なし)
 *
 * Notes
 * - introspection の失敗は error、policy による拒否は info でログに出す
 *   (呼び出し側から見るとどちらも 401 で区別しない)
 */
use axum::{
    extract::State,
    http::{HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};

use crate::api::extractors::{RequestContext, X_AUTH_USER};
use crate::error::AppError;
use crate::services::policy::Verdict;
use crate::state::AppState;

pub async fn forward_auth(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> Result<Response, AppError> {
    if ctx.is_preflight() {
        return Ok(StatusCode::NO_CONTENT.into_response());
    }

    let Some(token) = ctx.bearer_token() else {
        tracing::debug!("request carries no bearer token");
        return Err(AppError::Unauthorized);
    };

    let claims = match state.introspector.introspect(token).await {
        Ok(claims) => claims,
        Err(err) => {
            tracing::error!(reason = %err, "failed to introspect token");
            return Err(AppError::Unauthorized);
        }
    };

    match state.policy.evaluate(&claims, ctx.tenant_id.as_deref()) {
        Verdict::Allow { user } => {
            tracing::debug!(
                user = %user,
                expires_at = ?claims.expires_at(),
                "token accepted"
            );
            allow(&user)
        }
        Verdict::Deny(reason) => {
            tracing::info!(reason = %reason, "rejected token");
            Err(AppError::Unauthorized)
        }
    }
}

fn allow(user: &str) -> Result<Response, AppError> {
    let mut res = StatusCode::NO_CONTENT.into_response();
    if user.is_empty() {
        return Ok(res);
    }

    let value = HeaderValue::from_bytes(user.as_bytes()).map_err(|_| {
        tracing::error!("username cannot be encoded as an X-Auth-User header");
        AppError::Unauthorized
    })?;
    res.headers_mut().insert(X_AUTH_USER, value);

    Ok(res)
}
