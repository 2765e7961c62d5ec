//! Forward-auth adapter: introspects opaque ZITADEL tokens for a reverse proxy
//! and answers 204 (with `X-Auth-User`) or 401.

pub mod api;
pub mod app;
pub mod config;
pub mod error;
pub mod middleware;
pub mod services;
pub mod state;
