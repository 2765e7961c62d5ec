/*
 * Responsibility
 * - handler / policy から見える「転送リクエストのコンテキスト」の型
 * - header の解釈 (Bearer 除去など) は core 側の責務
 */
use std::fmt;

use axum::http::HeaderName;

pub const X_TENANT_ID: HeaderName = HeaderName::from_static("x-tenant-id");
pub const X_FORWARDED_METHOD: HeaderName = HeaderName::from_static("x-forwarded-method");
pub const X_AUTH_USER: HeaderName = HeaderName::from_static("x-auth-user");

/// Headers of the request the proxy is asking about.
///
/// - `bearer_token` is the `Authorization` value with an optional `Bearer ` prefix removed.
///   `None` when the header is missing, not visible ASCII, or empty after stripping.
/// - `tenant_id` is the raw `X-Tenant-Id` value (may be empty).
/// - `forwarded_method` is the original method reported by the proxy.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct RequestContext {
    pub bearer_token: Option<String>,
    pub tenant_id: Option<String>,
    pub forwarded_method: Option<String>,
}

impl RequestContext {
    /// CORS preflight forwarded by the proxy. Never authenticated.
    pub fn is_preflight(&self) -> bool {
        self.forwarded_method.as_deref() == Some("OPTIONS")
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }
}

impl fmt::Debug for RequestContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the token
        f.debug_struct("RequestContext")
            .field("has_bearer_token", &self.bearer_token.is_some())
            .field("tenant_id", &self.tenant_id)
            .field("forwarded_method", &self.forwarded_method)
            .finish()
    }
}
