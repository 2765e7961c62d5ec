/*
 * Responsibility
 * - request 境界の AppError (IntoResponse: 401 / body なし)
 * - 起動時の StartupError と exit code の対応
 *
 * Notes
 * - DENY の理由は server 側のログにだけ出す。response には claim の内容を一切載せない
 */
use std::io;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::config::ConfigError;
use crate::services::introspection::IntrospectionError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
        }
    }
}

/// Fatal errors before (or while) serving. Each maps to a process exit code.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("invalid introspection setup: {0}")]
    Introspection(#[from] IntrospectionError),
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },
    #[error("server error: {0}")]
    Serve(#[source] io::Error),
}

impl StartupError {
    /// 2 for configuration problems, 1 for listener problems.
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Config(_) | Self::Introspection(_) => 2,
            Self::Bind { .. } | Self::Serve(_) => 1,
        }
    }
}
