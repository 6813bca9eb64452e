//! High-level controller for the enrollment/verification flow.
//! Owns the UI state, the stored provisioning data, the alert feed, and
//! the HTTP client; exposes the operations a frontend binds to.

use std::sync::Arc;
use tokio::sync::{Mutex, Notify};

use serde::{Deserialize, Serialize};

use crate::enroll::api_client::CredentialApiClient;
use crate::enroll::types::*;
use crate::enroll::ui_state::{render, ControlSet, UiState};

/// Thread-safe controller state shared with a host UI shell.
pub type EnrollServiceState = Arc<Mutex<EnrollService>>;

/// Cloneable handle that aborts the in-flight request.
/// Usable without holding the controller lock.
#[derive(Clone)]
pub struct CancelHandle {
    inner: Arc<Notify>,
}

impl CancelHandle {
    pub fn cancel(&self) {
        self.inner.notify_waiters();
    }
}

/// Central enrollment/verification controller.
pub struct EnrollService {
    client: CredentialApiClient,
    state: UiState,
    provisioning: Option<ProvisioningResult>,
    alerts: Vec<Alert>,
    cancel: Arc<Notify>,
}

impl EnrollService {
    /// Create a new controller wrapped in `Arc<Mutex<_>>` for a host shell.
    pub fn new(config: &EnrollConfig) -> Result<EnrollServiceState, EnrollError> {
        let client = CredentialApiClient::from_config(config)?;
        Ok(Arc::new(Mutex::new(Self::with_client(client))))
    }

    fn with_client(client: CredentialApiClient) -> Self {
        Self {
            client,
            state: UiState::Idle,
            provisioning: None,
            alerts: Vec::new(),
            cancel: Arc::new(Notify::new()),
        }
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Flow operations
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// Submit the username form and request provisioning.
    ///
    /// Only issued when the trimmed username is non-empty and the flow is
    /// Idle. Every failure path returns the flow to Idle with a danger
    /// alert so the submit control stays actionable.
    pub async fn submit_enrollment(
        &mut self,
        username: &str,
    ) -> Result<ProvisioningResult, EnrollError> {
        let username = username.trim();
        if username.is_empty() {
            return Err(EnrollError::invalid_input("Username must not be empty"));
        }
        if self.state != UiState::Idle {
            return Err(EnrollError::invalid_state(format!(
                "Cannot enroll from state {}",
                self.state
            )));
        }

        self.state = UiState::Enrolling;
        let result = tokio::select! {
            r = self.client.fetch_provisioning(username) => r,
            _ = self.cancel.notified() => {
                Err(EnrollError::cancelled("Enrollment request cancelled"))
            }
        };

        match result {
            Ok(provisioning) => {
                self.state = UiState::Provisioned;
                self.provisioning = Some(provisioning.clone());
                Ok(provisioning)
            }
            Err(e) => {
                log::warn!("enrollment request failed: {}", e);
                self.state = UiState::Idle;
                self.push_alert(Alert::danger(format!("Enrollment failed: {}", e.message)));
                Err(e)
            }
        }
    }

    /// Reveal the access-code entry ("try it").
    pub fn try_it(&mut self) -> Result<ControlSet, EnrollError> {
        if self.state != UiState::Provisioned {
            return Err(EnrollError::invalid_state(format!(
                "Nothing to try from state {}",
                self.state
            )));
        }
        self.state = UiState::Verifying;
        Ok(render(self.state))
    }

    /// Submit username and access code for verification.
    ///
    /// A verdict (matched or not) moves the flow to Verified and pushes
    /// the matching alert; a transport failure keeps the access-code form
    /// up with a danger alert. The login action stays usable either way.
    pub async fn submit_verification(
        &mut self,
        username: &str,
        access_code: &str,
    ) -> Result<MatchResult, EnrollError> {
        let username = username.trim();
        let access_code = access_code.trim();
        if username.is_empty() || access_code.is_empty() {
            return Err(EnrollError::invalid_input(
                "Username and access code must not be empty",
            ));
        }
        if !matches!(self.state, UiState::Verifying | UiState::Verified) {
            return Err(EnrollError::invalid_state(format!(
                "Cannot verify from state {}",
                self.state
            )));
        }

        let result = tokio::select! {
            r = self.client.verify_access_code(username, access_code) => r,
            _ = self.cancel.notified() => {
                Err(EnrollError::cancelled("Verification request cancelled"))
            }
        };

        match result {
            Ok(verdict) => {
                self.state = UiState::Verified;
                if verdict.matched {
                    self.push_alert(Alert::success("Success!"));
                } else {
                    self.push_alert(Alert::danger("Try again?"));
                }
                Ok(verdict)
            }
            Err(e) => {
                log::warn!("verification request failed: {}", e);
                self.push_alert(Alert::danger(format!("Verification failed: {}", e.message)));
                Err(e)
            }
        }
    }

    /// Start over: clear transient data and return to the username form.
    pub fn reset(&mut self) {
        self.state = UiState::Idle;
        self.provisioning = None;
        self.alerts.clear();
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Alerts
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    /// The current alert feed, oldest first.
    pub fn alerts(&self) -> &[Alert] {
        &self.alerts
    }

    /// Dismiss an alert by id. Returns `false` if no such alert exists.
    pub fn dismiss_alert(&mut self, id: &str) -> bool {
        let before = self.alerts.len();
        self.alerts.retain(|a| a.id != id);
        self.alerts.len() != before
    }

    fn push_alert(&mut self, alert: Alert) {
        self.alerts.push(alert);
    }

    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
    //  Observation
    // ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    pub fn state(&self) -> UiState {
        self.state
    }

    /// Control set for the current state.
    pub fn controls(&self) -> ControlSet {
        render(self.state)
    }

    /// Provisioning data from the last successful enrollment, if any.
    pub fn provisioning(&self) -> Option<&ProvisioningResult> {
        self.provisioning.as_ref()
    }

    /// Handle for aborting an in-flight request from another task.
    pub fn cancel_handle(&self) -> CancelHandle {
        CancelHandle {
            inner: self.cancel.clone(),
        }
    }

    /// Everything a frontend needs to draw the page.
    pub fn snapshot(&self) -> FlowSnapshot {
        FlowSnapshot {
            state: self.state,
            controls: render(self.state),
            provisioning: self.provisioning.clone(),
            alerts: self.alerts.clone(),
        }
    }
}

/// Serializable snapshot returned by [`EnrollService::snapshot`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlowSnapshot {
    pub state: UiState,
    pub controls: ControlSet,
    pub provisioning: Option<ProvisioningResult>,
    pub alerts: Vec<Alert>,
}
