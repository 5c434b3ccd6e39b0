//! Authority wire types.
//!
//! `POST {base}/auth/check` with an `X-API-KEY` header and an
//! `AuthorizationRequest` body; the authority answers with an
//! `AuthorizationVerdict`.

use crate::identity::Identity;
use serde::{Deserialize, Serialize};

/// Path appended to the authority base URL.
pub const CHECK_PATH: &str = "/auth/check";

/// Header carrying the installer API key.
pub const API_KEY_HEADER: &str = "X-API-KEY";

/// Body of the authorization check, sent verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationRequest {
    pub license_key: String,
    pub public_ip: String,
    pub machine_id: String,
}

impl AuthorizationRequest {
    pub fn new(license_key: impl Into<String>, identity: &Identity) -> Self {
        Self {
            license_key: license_key.into(),
            public_ip: identity.public_ip.clone(),
            machine_id: identity.machine_id.clone(),
        }
    }
}

/// The authority's decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationVerdict {
    pub allowed: bool,
    #[serde(default)]
    pub message: String,
}

impl AuthorizationVerdict {
    /// Both the transport status and the verdict must agree.
    pub fn grants(&self, status: u16) -> bool {
        status == 200 && self.allowed
    }
}

/// `{base}/auth/check`, tolerating a trailing slash on the base.
pub fn check_url(base: &str) -> String {
    format!("{}{}", base.trim_end_matches('/'), CHECK_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_field_names() {
        let identity = Identity {
            public_ip: "203.0.113.9".to_string(),
            machine_id: "abc123".to_string(),
        };
        let request = AuthorizationRequest::new("LIC-0001", &identity);
        let value: serde_json::Value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["license_key"], "LIC-0001");
        assert_eq!(value["public_ip"], "203.0.113.9");
        assert_eq!(value["machine_id"], "abc123");
        assert_eq!(value.as_object().unwrap().len(), 3);
    }

    #[test]
    fn test_verdict_grants_only_on_200_and_allowed() {
        let allowed = AuthorizationVerdict {
            allowed: true,
            message: "OK".to_string(),
        };
        let refused = AuthorizationVerdict {
            allowed: false,
            message: "License is inactive".to_string(),
        };
        assert!(allowed.grants(200));
        assert!(!allowed.grants(201));
        assert!(!allowed.grants(403));
        assert!(!refused.grants(200));
    }

    #[test]
    fn test_verdict_message_optional() {
        let verdict: AuthorizationVerdict = serde_json::from_str(r#"{"allowed":true}"#).unwrap();
        assert!(verdict.allowed);
        assert!(verdict.message.is_empty());
    }

    #[test]
    fn test_check_url() {
        assert_eq!(
            check_url("https://api.example.com/v1"),
            "https://api.example.com/v1/auth/check"
        );
        assert_eq!(
            check_url("https://api.example.com/v1/"),
            "https://api.example.com/v1/auth/check"
        );
    }
}
