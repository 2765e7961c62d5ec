/*!
 * Forward-auth request context extractor
 *
 * Responsibility:
 * - proxy から転送されてきた header (Authorization / X-Tenant-Id / X-Forwarded-Method) を
 *   handler と policy が使う RequestContext にまとめる
 * - HTTP / axum 依存は core に閉じ込め、型定義は types に分離する
 *
 * Public API:
 * - RequestContext
 * - header 名の定数
 */

mod core;
mod types;

pub use types::{RequestContext, X_AUTH_USER, X_FORWARDED_METHOD, X_TENANT_ID};
