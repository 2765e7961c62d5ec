/*
 * Responsibility
 * - 環境変数からの設定読み込み (ZITADEL_HOST, PROJECT_ID, CLIENT_ID/SECRET など)
 * - 設定値のバリデーション (不足・不正なら起動失敗)
 * - 起動後は read-only。request 処理中に環境変数を読むことはない
 */
use std::fmt;
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

const DEFAULT_LISTEN_ADDR: &str = ":7800";
const DEFAULT_INTROSPECTION_TIMEOUT_SECONDS: u64 = 10;

#[derive(Clone)]
pub struct Config {
    pub listen_addr: String,
    pub app_env: AppEnv,

    // Identity provider (ZITADEL)
    pub zitadel_host: String,
    pub project_id: String,
    pub client_id: String,
    pub client_secret: String,

    pub verify_tenant: bool,
    pub introspection_timeout: Duration,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print the client secret
        f.debug_struct("Config")
            .field("listen_addr", &self.listen_addr)
            .field("app_env", &self.app_env)
            .field("zitadel_host", &self.zitadel_host)
            .field("project_id", &self.project_id)
            .field("client_id", &self.client_id)
            .field("verify_tenant", &self.verify_tenant)
            .field("introspection_timeout", &self.introspection_timeout)
            .finish_non_exhaustive()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    ///
    /// `from_env` is a thin wrapper over this; tests feed a map instead of
    /// mutating the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| -> Result<String, ConfigError> {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let zitadel_host = required("ZITADEL_HOST")?;
        let project_id = required("PROJECT_ID")?;
        let client_id = required("CLIENT_ID")?;
        let client_secret = required("CLIENT_SECRET")?;

        let verify_tenant = match lookup("VERIFY_TENANT") {
            Some(v) if !v.trim().is_empty() => {
                parse_bool(v.trim()).ok_or(ConfigError::Invalid("VERIFY_TENANT"))?
            }
            _ => true,
        };

        let listen = lookup("LISTEN_ADDR")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_LISTEN_ADDR.to_string());
        let listen_addr =
            parse_listen_addr(listen.trim()).ok_or(ConfigError::Invalid("LISTEN_ADDR"))?;

        let introspection_timeout_seconds = match lookup("INTROSPECTION_TIMEOUT_SECONDS") {
            Some(v) if !v.trim().is_empty() => v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or(ConfigError::Invalid("INTROSPECTION_TIMEOUT_SECONDS"))?,
            _ => DEFAULT_INTROSPECTION_TIMEOUT_SECONDS,
        };

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        Ok(Self {
            listen_addr,
            app_env,
            zitadel_host,
            project_id,
            client_id,
            client_secret,
            verify_tenant,
            introspection_timeout: Duration::from_secs(introspection_timeout_seconds),
        })
    }
}

// Accepts the usual spellings: 1/t/T/TRUE/true/True and 0/f/F/FALSE/false/False.
fn parse_bool(value: &str) -> Option<bool> {
    match value {
        "1" | "t" | "T" | "TRUE" | "true" | "True" => Some(true),
        "0" | "f" | "F" | "FALSE" | "false" | "False" => Some(false),
        _ => None,
    }
}

// `:7800` binds every interface. Otherwise `host:port`, where the host may be a
// name (resolved at bind time), an IPv4 address or a bracketed IPv6 address.
fn parse_listen_addr(value: &str) -> Option<String> {
    if let Some(port) = value.strip_prefix(':') {
        return port.parse::<u16>().ok().map(|port| format!("0.0.0.0:{port}"));
    }

    let (host, port) = value.rsplit_once(':')?;
    if host.is_empty() || port.parse::<u16>().is_err() {
        return None;
    }
    if host.contains(':') && !(host.starts_with('[') && host.ends_with(']')) {
        return None;
    }

    Some(value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    fn required_vars() -> Vec<(&'static str, &'static str)> {
        vec![
            ("ZITADEL_HOST", "https://auth.example.com"),
            ("PROJECT_ID", "proj-1"),
            ("CLIENT_ID", "forward-auth"),
            ("CLIENT_SECRET", "s3cret"),
        ]
    }

    #[test]
    fn defaults_apply_when_optional_values_are_absent() {
        let config = Config::from_lookup(lookup_from(&required_vars())).unwrap();

        assert_eq!(config.listen_addr, "0.0.0.0:7800");
        assert!(config.verify_tenant);
        assert_eq!(config.introspection_timeout, Duration::from_secs(10));
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.project_id, "proj-1");
    }

    #[test]
    fn each_required_value_is_reported_when_missing() {
        for key in ["ZITADEL_HOST", "PROJECT_ID", "CLIENT_ID", "CLIENT_SECRET"] {
            let vars: Vec<_> = required_vars()
                .into_iter()
                .filter(|(k, _)| *k != key)
                .collect();

            let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
            assert_eq!(err, ConfigError::Missing(key));
        }
    }

    #[test]
    fn empty_required_value_counts_as_missing() {
        let vars: Vec<_> = required_vars()
            .into_iter()
            .map(|(k, v)| if k == "PROJECT_ID" { (k, "  ") } else { (k, v) })
            .collect();

        let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("PROJECT_ID"));
    }

    #[test]
    fn verify_tenant_accepts_boolean_spellings() {
        for (raw, expected) in [("false", false), ("0", false), ("F", false), ("TRUE", true)] {
            let mut vars = required_vars();
            vars.push(("VERIFY_TENANT", raw));

            let config = Config::from_lookup(lookup_from(&vars)).unwrap();
            assert_eq!(config.verify_tenant, expected, "VERIFY_TENANT={raw}");
        }
    }

    #[test]
    fn malformed_verify_tenant_is_rejected() {
        let mut vars = required_vars();
        vars.push(("VERIFY_TENANT", "maybe"));

        let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("VERIFY_TENANT"));
    }

    #[test]
    fn listen_addr_accepts_port_only_and_full_forms() {
        for (raw, expected) in [
            ("127.0.0.1:9000", "127.0.0.1:9000"),
            (":8080", "0.0.0.0:8080"),
            ("localhost:7800", "localhost:7800"),
            ("[::1]:7800", "[::1]:7800"),
        ] {
            let mut vars = required_vars();
            vars.push(("LISTEN_ADDR", raw));

            let config = Config::from_lookup(lookup_from(&vars)).unwrap();
            assert_eq!(config.listen_addr, expected, "LISTEN_ADDR={raw}");
        }
    }

    #[test]
    fn malformed_listen_addr_is_rejected() {
        for raw in ["nowhere", "localhost:notaport", ":99999", ":7800x", "::1:7800"] {
            let mut vars = required_vars();
            vars.push(("LISTEN_ADDR", raw));

            let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
            assert_eq!(err, ConfigError::Invalid("LISTEN_ADDR"), "LISTEN_ADDR={raw}");
        }
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let mut vars = required_vars();
        vars.push(("INTROSPECTION_TIMEOUT_SECONDS", "0"));

        let err = Config::from_lookup(lookup_from(&vars)).unwrap_err();
        assert_eq!(err, ConfigError::Invalid("INTROSPECTION_TIMEOUT_SECONDS"));
    }

    #[test]
    fn debug_output_hides_client_secret() {
        let config = Config::from_lookup(lookup_from(&required_vars())).unwrap();
        let rendered = format!("{config:?}");

        assert!(!rendered.contains("s3cret"));
        assert!(rendered.contains("forward-auth"));
    }
}
