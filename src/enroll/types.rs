//! Core types for the enrollment/verification flow.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ─── Wire types ──────────────────────────────────────────────────────

/// Payload returned by the credential service for a provisioning request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvisioningResult {
    /// Renderable QR fragment (markup string) to be displayed verbatim.
    pub qrcode: String,
    /// Plaintext shared secret for manual entry into an authenticator app.
    pub secret: String,
}

/// Verdict returned by the credential service for a verification request.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MatchResult {
    pub matched: bool,
}

// ─── Alerts ──────────────────────────────────────────────────────────

/// Visual tone of an alert banner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertTone {
    Success,
    Danger,
}

/// A dismissible banner shown in the page's alert area.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub tone: AlertTone,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl Alert {
    pub fn new(tone: AlertTone, message: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            tone,
            message: message.into(),
            created_at: Utc::now(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self::new(AlertTone::Success, message)
    }

    pub fn danger(message: impl Into<String>) -> Self {
        Self::new(AlertTone::Danger, message)
    }
}

// ─── Config ──────────────────────────────────────────────────────────

/// Configuration for talking to the credential service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollConfig {
    /// Base URL of the credential service, e.g. http://localhost:8080
    pub base_url: String,
    /// Path of the provisioning/verification endpoint.
    #[serde(default = "default_endpoint_path")]
    pub endpoint_path: String,
    /// Timeout in seconds applied to both requests.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint_path() -> String {
    "/cgi-bin/qrcode.cgi".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for EnrollConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            endpoint_path: default_endpoint_path(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

// ─── Error type ──────────────────────────────────────────────────────

/// Error kind for this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnrollErrorKind {
    InvalidInput,
    InvalidState,
    ConfigError,
    ConnectionError,
    Timeout,
    Cancelled,
    ServerError,
    ParseError,
}

/// Crate-level error.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnrollError {
    pub kind: EnrollErrorKind,
    pub message: String,
    pub status_code: Option<u16>,
}

impl EnrollError {
    pub fn new(kind: EnrollErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status_code: None,
        }
    }

    pub fn with_status(mut self, code: u16) -> Self {
        self.status_code = Some(code);
        self
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::new(EnrollErrorKind::InvalidInput, msg)
    }

    pub fn invalid_state(msg: impl Into<String>) -> Self {
        Self::new(EnrollErrorKind::InvalidState, msg)
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::new(EnrollErrorKind::ConfigError, msg)
    }

    pub fn connection_error(msg: impl Into<String>) -> Self {
        Self::new(EnrollErrorKind::ConnectionError, msg)
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::new(EnrollErrorKind::Timeout, msg)
    }

    pub fn cancelled(msg: impl Into<String>) -> Self {
        Self::new(EnrollErrorKind::Cancelled, msg)
    }

    pub fn server_error(msg: impl Into<String>) -> Self {
        Self::new(EnrollErrorKind::ServerError, msg)
    }

    pub fn parse_error(msg: impl Into<String>) -> Self {
        Self::new(EnrollErrorKind::ParseError, msg)
    }
}

impl fmt::Display for EnrollError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:?}] {}", self.kind, self.message)?;
        if let Some(code) = self.status_code {
            write!(f, " (HTTP {})", code)?;
        }
        Ok(())
    }
}

impl std::error::Error for EnrollError {}

impl From<EnrollError> for String {
    fn from(e: EnrollError) -> String {
        e.to_string()
    }
}

impl From<reqwest::Error> for EnrollError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::timeout(format!("Request timed out: {}", e))
        } else if e.is_connect() {
            Self::connection_error(format!("Connection failed: {}", e))
        } else {
            Self::server_error(format!("HTTP error: {}", e))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Wire types ───────────────────────────────────────────────

    #[test]
    fn provisioning_result_wire_fields() {
        let json = r#"{"qrcode":"<svg>...</svg>","secret":"ABCD1234"}"#;
        let p: ProvisioningResult = serde_json::from_str(json).unwrap();
        assert_eq!(p.qrcode, "<svg>...</svg>");
        assert_eq!(p.secret, "ABCD1234");
    }

    #[test]
    fn match_result_wire_fields() {
        let m: MatchResult = serde_json::from_str(r#"{"matched":false}"#).unwrap();
        assert!(!m.matched);
        let m: MatchResult = serde_json::from_str(r#"{"matched":true}"#).unwrap();
        assert!(m.matched);
    }

    // ── Alerts ───────────────────────────────────────────────────

    #[test]
    fn alert_constructors() {
        let ok = Alert::success("Success!");
        assert_eq!(ok.tone, AlertTone::Success);
        assert_eq!(ok.message, "Success!");
        assert!(!ok.id.is_empty());

        let bad = Alert::danger("Try again?");
        assert_eq!(bad.tone, AlertTone::Danger);
        assert_ne!(ok.id, bad.id);
    }

    #[test]
    fn alert_tone_serde() {
        assert_eq!(serde_json::to_string(&AlertTone::Danger).unwrap(), "\"danger\"");
        let back: AlertTone = serde_json::from_str("\"success\"").unwrap();
        assert_eq!(back, AlertTone::Success);
    }

    // ── Config ───────────────────────────────────────────────────

    #[test]
    fn config_defaults() {
        let cfg = EnrollConfig::default();
        assert!(cfg.base_url.is_empty());
        assert_eq!(cfg.endpoint_path, "/cgi-bin/qrcode.cgi");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn config_partial_deserialization_fills_defaults() {
        let cfg: EnrollConfig =
            serde_json::from_str(r#"{"baseUrl":"http://localhost:8080"}"#).unwrap();
        assert_eq!(cfg.base_url, "http://localhost:8080");
        assert_eq!(cfg.endpoint_path, "/cgi-bin/qrcode.cgi");
        assert_eq!(cfg.timeout_secs, 30);
    }

    #[test]
    fn config_serde_roundtrip() {
        let cfg = EnrollConfig {
            base_url: "http://example.com".into(),
            endpoint_path: "/otp".into(),
            timeout_secs: 5,
        };
        let json = serde_json::to_string(&cfg).unwrap();
        assert!(json.contains("baseUrl"));
        let back: EnrollConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(back.endpoint_path, "/otp");
        assert_eq!(back.timeout_secs, 5);
    }

    // ── Error ────────────────────────────────────────────────────

    #[test]
    fn error_display() {
        let err = EnrollError::server_error("upstream unavailable").with_status(502);
        let s = err.to_string();
        assert!(s.contains("ServerError"));
        assert!(s.contains("upstream unavailable"));
        assert!(s.contains("502"));
    }

    #[test]
    fn error_display_without_status() {
        let err = EnrollError::invalid_input("empty username");
        assert!(!err.to_string().contains("HTTP"));
    }

    #[test]
    fn error_into_string() {
        let err = EnrollError::cancelled("aborted");
        let s: String = err.into();
        assert!(s.contains("Cancelled"));
    }
}
