use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::types::*;

/// Low-level HTTP client for the credential service.
///
/// The service exposes a single CGI-style endpoint:
/// `GET ?username=<name>` provisions a shared secret plus a QR fragment,
/// `POST` with a form body `username=<v>&access_code=<v>` verifies a code.
#[derive(Debug)]
pub struct CredentialApiClient {
    client: Client,
    base_url: String,
    endpoint_path: String,
    timeout: Duration,
}

impl CredentialApiClient {
    // ── Constructors ────────────────────────────────────────────────

    pub fn new(
        base_url: &str,
        endpoint_path: &str,
        timeout_secs: u64,
    ) -> Result<Self, EnrollError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| {
                EnrollError::connection_error(format!("Failed to create HTTP client: {}", e))
            })?;

        let base = base_url.trim_end_matches('/').to_string();
        let path = if endpoint_path.starts_with('/') {
            endpoint_path.to_string()
        } else {
            format!("/{}", endpoint_path)
        };

        Ok(Self {
            client,
            base_url: base,
            endpoint_path: path,
            timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn from_config(config: &EnrollConfig) -> Result<Self, EnrollError> {
        if config.base_url.is_empty() {
            return Err(EnrollError::config_error("Base URL is required"));
        }
        url::Url::parse(&config.base_url)
            .map_err(|e| EnrollError::config_error(format!("Invalid base URL: {}", e)))?;
        Self::new(&config.base_url, &config.endpoint_path, config.timeout_secs)
    }

    // ── URL builder ─────────────────────────────────────────────────

    fn url(&self) -> String {
        format!("{}{}", self.base_url, self.endpoint_path)
    }

    // ── Generic execute ─────────────────────────────────────────────

    async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, EnrollError> {
        let resp = builder
            .timeout(self.timeout)
            .send()
            .await
            .map_err(EnrollError::from)?;

        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await.map_err(EnrollError::from)?;
            serde_json::from_str::<T>(&body).map_err(|e| {
                EnrollError::parse_error(format!(
                    "Failed to parse response: {}; body: {}",
                    e,
                    &body[..body.len().min(200)]
                ))
            })
        } else {
            let code = status.as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(match status {
                StatusCode::BAD_REQUEST => {
                    EnrollError::invalid_input(format!("Service rejected request: {}", body))
                        .with_status(code)
                }
                StatusCode::NOT_FOUND => {
                    EnrollError::server_error("Credential endpoint not found").with_status(code)
                }
                _ => EnrollError::server_error(format!("HTTP {}: {}", code, body))
                    .with_status(code),
            })
        }
    }

    // ── Operations ──────────────────────────────────────────────────

    /// GET with a `username` query: provision a secret and QR code.
    /// The username is percent-encoded when placed in the query string.
    pub async fn fetch_provisioning(
        &self,
        username: &str,
    ) -> Result<ProvisioningResult, EnrollError> {
        let req = self.client.get(self.url()).query(&[("username", username)]);
        self.execute(req).await
    }

    /// POST with a form body `{username, access_code}`: verify a code.
    pub async fn verify_access_code(
        &self,
        username: &str,
        access_code: &str,
    ) -> Result<MatchResult, EnrollError> {
        let req = self
            .client
            .post(self.url())
            .form(&[("username", username), ("access_code", access_code)]);
        self.execute(req).await
    }

    // ── Accessors ───────────────────────────────────────────────────

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint_path(&self) -> &str {
        &self.endpoint_path
    }
}
