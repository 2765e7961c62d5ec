/*
 * Responsibility
 * - URL 構造の定義
 * - forward-auth は proxy から任意の path / method で呼ばれるため fallback 一本にする
 */
use axum::Router;

use crate::api::handlers::forward_auth::forward_auth;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new().fallback(forward_auth)
}
