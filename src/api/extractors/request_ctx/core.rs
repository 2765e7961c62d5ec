use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, HeaderName, header, request::Parts};

use super::{RequestContext, X_FORWARDED_METHOD, X_TENANT_ID};

const BEARER_PREFIX: &str = "Bearer ";

/// 転送リクエストの header から RequestContext を組み立てる extractor
/// header が欠けていても reject しない (401 にするかどうかは handler / policy が決める)
impl<S> FromRequestParts<S> for RequestContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(RequestContext::from_headers(&parts.headers))
    }
}

impl RequestContext {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self {
            bearer_token: header_str(headers, &header::AUTHORIZATION).and_then(extract_bearer),
            tenant_id: header_str(headers, &X_TENANT_ID).map(str::to_string),
            forwarded_method: header_str(headers, &X_FORWARDED_METHOD).map(str::to_string),
        }
    }
}

// First value only; values that are not visible ASCII are treated as absent.
fn header_str<'a>(headers: &'a HeaderMap, name: &HeaderName) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

// Without the prefix the whole value is used as the token.
fn extract_bearer(value: &str) -> Option<String> {
    let token = value.strip_prefix(BEARER_PREFIX).unwrap_or(value);
    if token.is_empty() {
        return None;
    }
    Some(token.to_string())
}
