//! OAuth2 token introspection client (RFC 7662) for ZITADEL.
//!
//! - One POST per call, no retry. Callers decide how to fail (the forward-auth
//!   handler fails closed).
//! - The Basic credential is computed once at construction.
//! - The timeout is a constructor parameter so tests can shorten it.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD};
use reqwest::header::{self, HeaderValue};
use thiserror::Error;
use url::Url;

use super::Claims;

/// Introspection endpoint relative to the identity provider host.
pub const INTROSPECTION_PATH: &str = "/oauth/v2/introspect";

#[derive(Debug, Error)]
pub enum IntrospectionError {
    #[error("invalid introspection endpoint: {0}")]
    InvalidEndpoint(String),
    #[error("invalid client credentials")]
    InvalidCredentials,
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("introspection request timed out after {0:?}")]
    Timeout(Duration),
    #[error("introspection request failed: {0}")]
    Transport(#[source] reqwest::Error),
    #[error("introspection endpoint answered with status {0}")]
    Status(reqwest::StatusCode),
    #[error("failed to decode introspection response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Seam between the request handler and the identity provider.
///
/// Implementations must be cheap to share (`Arc<dyn TokenIntrospector>`).
#[async_trait]
pub trait TokenIntrospector: Send + Sync {
    async fn introspect(&self, token: &str) -> Result<Claims, IntrospectionError>;
}

/// Confidential-client credentials used to authenticate to the endpoint.
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientCredentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    fn basic_authorization(&self) -> Result<HeaderValue, IntrospectionError> {
        let encoded = STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        let mut value = HeaderValue::from_str(&format!("Basic {encoded}"))
            .map_err(|_| IntrospectionError::InvalidCredentials)?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .finish_non_exhaustive()
    }
}

pub struct IntrospectionClient {
    http: reqwest::Client,
    endpoint: Url,
    authorization: HeaderValue,
    timeout: Duration,
}

impl fmt::Debug for IntrospectionClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the Basic credential
        f.debug_struct("IntrospectionClient")
            .field("endpoint", &self.endpoint.as_str())
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl IntrospectionClient {
    pub fn new(
        host: &str,
        credentials: &ClientCredentials,
        timeout: Duration,
    ) -> Result<Self, IntrospectionError> {
        let endpoint = introspection_endpoint(host)?;
        let authorization = credentials.basic_authorization()?;

        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(IntrospectionError::Client)?;

        Ok(Self {
            http,
            endpoint,
            authorization,
            timeout,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn transport_error(&self, err: reqwest::Error) -> IntrospectionError {
        if err.is_timeout() {
            IntrospectionError::Timeout(self.timeout)
        } else {
            IntrospectionError::Transport(err)
        }
    }
}

#[async_trait]
impl TokenIntrospector for IntrospectionClient {
    async fn introspect(&self, token: &str) -> Result<Claims, IntrospectionError> {
        let res = self
            .http
            .post(self.endpoint.clone())
            .header(header::AUTHORIZATION, self.authorization.clone())
            .form(&[("token", token)])
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = res.status();
        if !status.is_success() {
            return Err(IntrospectionError::Status(status));
        }

        let body = res.bytes().await.map_err(|e| self.transport_error(e))?;
        let claims: Claims = serde_json::from_slice(&body)?;

        tracing::debug!(
            endpoint = %self.endpoint,
            active = claims.active,
            "token introspected"
        );

        Ok(claims)
    }
}

/// Join the provider host with the introspection path.
///
/// Trailing slashes on the host are tolerated and a base path is kept:
/// `https://idp/base/` becomes `https://idp/base/oauth/v2/introspect`.
pub fn introspection_endpoint(host: &str) -> Result<Url, IntrospectionError> {
    let mut url = Url::parse(host.trim())
        .map_err(|e| IntrospectionError::InvalidEndpoint(format!("{host}: {e}")))?;

    if !matches!(url.scheme(), "http" | "https") {
        return Err(IntrospectionError::InvalidEndpoint(format!(
            "{host}: unsupported scheme"
        )));
    }

    url.path_segments_mut()
        .map_err(|_| IntrospectionError::InvalidEndpoint(format!("{host}: cannot be a base")))?
        .pop_if_empty()
        .extend(INTROSPECTION_PATH.split('/').filter(|s| !s.is_empty()));

    Ok(url)
}
