use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};

/// Token claims returned by the introspection endpoint (RFC 7662).
///
/// NOTE:
/// - Every field is optional on the wire. Missing fields (and `null`) fall back to
///   the zero value, so an empty object decodes to an inactive token.
/// - `exp` / `iat` / `nbf` are informational only. `active` is authoritative.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Claims {
    #[serde(deserialize_with = "nullable")]
    pub active: bool,
    #[serde(rename = "aud", deserialize_with = "audience")]
    pub audience: BTreeSet<String>,

    #[serde(deserialize_with = "nullable")]
    pub client_id: String,
    #[serde(deserialize_with = "nullable")]
    pub username: String,
    #[serde(rename = "iss", deserialize_with = "nullable")]
    pub issuer: String,
    #[serde(rename = "sub", deserialize_with = "nullable")]
    pub subject: String,
    #[serde(rename = "jti", deserialize_with = "nullable")]
    pub token_id: String,

    #[serde(deserialize_with = "nullable")]
    pub scope: String,
    #[serde(deserialize_with = "nullable")]
    pub token_type: String,

    #[serde(rename = "exp", deserialize_with = "nullable")]
    pub expires: i64,
    #[serde(rename = "iat", deserialize_with = "nullable")]
    pub issued_at: i64,
    #[serde(rename = "nbf", deserialize_with = "nullable")]
    pub not_before: i64,

    #[serde(rename = "urn:zitadel:iam:user:metadata", deserialize_with = "nullable")]
    pub metadata: HashMap<String, String>,
}

impl Claims {
    /// Tenant carried in the user metadata. Absent key reads as empty.
    pub fn tenant(&self) -> &str {
        self.metadata.get("tenant").map(String::as_str).unwrap_or("")
    }

    pub fn has_audience(&self, audience: &str) -> bool {
        self.audience.contains(audience)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        timestamp(self.expires)
    }
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    if secs == 0 {
        return None;
    }
    DateTime::from_timestamp(secs, 0)
}

fn nullable<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// `aud` is either a single string or an array of strings.
fn audience<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Aud {
        One(String),
        Many(Vec<String>),
    }

    Ok(match Option::<Aud>::deserialize(deserializer)? {
        Some(Aud::One(s)) => BTreeSet::from([s]),
        Some(Aud::Many(v)) => v.into_iter().collect(),
        None => BTreeSet::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_active_zitadel_response() {
        let body = json!({
            "active": true,
            "aud": ["proj-1", "client-1"],
            "client_id": "client-1",
            "exp": 1_900_000_000,
            "iat": 1_800_000_000,
            "iss": "https://auth.example.com",
            "jti": "tok-1",
            "scope": "openid profile",
            "token_type": "Bearer",
            "username": "kiwi",
            "urn:zitadel:iam:user:metadata": { "tenant": "t-1" }
        });

        let claims: Claims = serde_json::from_value(body).unwrap();

        assert!(claims.active);
        assert!(claims.has_audience("proj-1"));
        assert!(claims.has_audience("client-1"));
        assert_eq!(claims.username, "kiwi");
        assert_eq!(claims.issuer, "https://auth.example.com");
        assert_eq!(claims.token_id, "tok-1");
        assert_eq!(claims.tenant(), "t-1");
        assert_eq!(
            claims.expires_at().map(|t| t.timestamp()),
            Some(1_900_000_000)
        );
    }

    #[test]
    fn inactive_response_defaults_everything_else() {
        let claims: Claims = serde_json::from_value(json!({ "active": false })).unwrap();

        assert_eq!(claims, Claims::default());
        assert_eq!(claims.tenant(), "");
        assert!(claims.expires_at().is_none());
    }

    #[test]
    fn empty_object_is_inactive() {
        let claims: Claims = serde_json::from_str("{}").unwrap();
        assert!(!claims.active);
    }

    #[test]
    fn null_fields_fall_back_to_defaults() {
        let body = json!({
            "active": true,
            "aud": null,
            "username": null,
            "urn:zitadel:iam:user:metadata": null
        });

        let claims: Claims = serde_json::from_value(body).unwrap();

        assert!(claims.active);
        assert!(claims.audience.is_empty());
        assert!(claims.metadata.is_empty());
        assert_eq!(claims.username, "");
    }

    #[test]
    fn single_string_audience_is_accepted() {
        let claims: Claims =
            serde_json::from_value(json!({ "active": true, "aud": "proj-1" })).unwrap();

        assert!(claims.has_audience("proj-1"));
        assert_eq!(claims.audience.len(), 1);
    }

    #[test]
    fn audience_membership_is_exact() {
        let claims: Claims =
            serde_json::from_value(json!({ "active": true, "aud": ["proj-10", "PROJ-1"] }))
                .unwrap();

        assert!(!claims.has_audience("proj-1"));
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let claims: Claims = serde_json::from_value(json!({
            "active": true,
            "urn:zitadel:iam:user:resourceowner:id": "org-1",
            "email": "kiwi@example.com"
        }))
        .unwrap();

        assert!(claims.active);
    }

    #[test]
    fn wrong_shape_fails_to_decode() {
        assert!(serde_json::from_str::<Claims>("not json").is_err());
        assert!(serde_json::from_str::<Claims>(r#"{"active":"yes"}"#).is_err());
        assert!(serde_json::from_str::<Claims>(r#"{"aud":42}"#).is_err());
    }
}
