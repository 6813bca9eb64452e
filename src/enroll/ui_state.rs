//! UI state machine for the enrollment page.
//!
//! The page is modelled as an explicit state value plus a pure `render`
//! function mapping each state to the set of visible/enabled controls,
//! so the whole flow is testable without a DOM.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Observable states of the enrollment page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UiState {
    /// Username form on screen, nothing else.
    Idle,
    /// Provisioning request in flight.
    Enrolling,
    /// QR code, secret, and instructions on screen; try-it available.
    Provisioned,
    /// Access-code entry on screen; login available.
    Verifying,
    /// A verdict has been received; retry remains possible.
    Verified,
}

impl fmt::Display for UiState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Enrolling => write!(f, "enrolling"),
            Self::Provisioned => write!(f, "provisioned"),
            Self::Verifying => write!(f, "verifying"),
            Self::Verified => write!(f, "verified"),
        }
    }
}

/// Visibility/enabled flags for every control on the page.
///
/// One flag per panel of the original layout: username form, QR panel,
/// secret panel, instructions, try-it action, access-code entry, login
/// action.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlSet {
    pub submit_form_visible: bool,
    pub submit_enabled: bool,
    pub qr_visible: bool,
    pub secret_visible: bool,
    pub instructions_visible: bool,
    pub try_it_visible: bool,
    pub try_it_enabled: bool,
    pub access_code_visible: bool,
    pub login_visible: bool,
    pub login_enabled: bool,
}

impl ControlSet {
    /// Everything hidden and disabled.
    pub fn hidden() -> Self {
        Self {
            submit_form_visible: false,
            submit_enabled: false,
            qr_visible: false,
            secret_visible: false,
            instructions_visible: false,
            try_it_visible: false,
            try_it_enabled: false,
            access_code_visible: false,
            login_visible: false,
            login_enabled: false,
        }
    }
}

/// Map a state to its control set.
///
/// Pure and total; the single source of truth for what is on screen in
/// each state.
pub fn render(state: UiState) -> ControlSet {
    match state {
        UiState::Idle => ControlSet {
            submit_form_visible: true,
            submit_enabled: true,
            ..ControlSet::hidden()
        },
        // Submit is disabled and the form hidden while the request runs.
        UiState::Enrolling => ControlSet::hidden(),
        UiState::Provisioned => ControlSet {
            qr_visible: true,
            secret_visible: true,
            instructions_visible: true,
            try_it_visible: true,
            try_it_enabled: true,
            ..ControlSet::hidden()
        },
        // Verified keeps the access-code form up so the user can retry
        // immediately; the verdict itself is carried by the alert feed.
        UiState::Verifying | UiState::Verified => ControlSet {
            access_code_visible: true,
            login_visible: true,
            login_enabled: true,
            ..ControlSet::hidden()
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idle_shows_only_submit_form() {
        let c = render(UiState::Idle);
        assert!(c.submit_form_visible);
        assert!(c.submit_enabled);
        assert!(!c.qr_visible);
        assert!(!c.secret_visible);
        assert!(!c.instructions_visible);
        assert!(!c.try_it_visible);
        assert!(!c.access_code_visible);
        assert!(!c.login_visible);
    }

    #[test]
    fn enrolling_disables_everything() {
        assert_eq!(render(UiState::Enrolling), ControlSet::hidden());
    }

    #[test]
    fn provisioned_reveals_secret_qr_instructions_and_try_it() {
        let c = render(UiState::Provisioned);
        assert!(c.qr_visible);
        assert!(c.secret_visible);
        assert!(c.instructions_visible);
        assert!(c.try_it_visible);
        assert!(c.try_it_enabled);
        // The submission form stays hidden.
        assert!(!c.submit_form_visible);
        assert!(!c.submit_enabled);
        assert!(!c.access_code_visible);
        assert!(!c.login_visible);
    }

    #[test]
    fn verifying_hides_provisioning_panels_and_reveals_login() {
        let c = render(UiState::Verifying);
        assert!(!c.qr_visible);
        assert!(!c.secret_visible);
        assert!(!c.instructions_visible);
        assert!(!c.try_it_visible);
        assert!(c.access_code_visible);
        assert!(c.login_visible);
        assert!(c.login_enabled);
    }

    #[test]
    fn verified_keeps_login_actionable_for_retry() {
        let c = render(UiState::Verified);
        assert!(c.access_code_visible);
        assert!(c.login_visible);
        assert!(c.login_enabled);
        assert_eq!(c, render(UiState::Verifying));
    }

    #[test]
    fn state_display() {
        assert_eq!(UiState::Idle.to_string(), "idle");
        assert_eq!(UiState::Provisioned.to_string(), "provisioned");
    }

    #[test]
    fn state_serde() {
        assert_eq!(serde_json::to_string(&UiState::Enrolling).unwrap(), "\"enrolling\"");
        let back: UiState = serde_json::from_str("\"verified\"").unwrap();
        assert_eq!(back, UiState::Verified);
    }

    #[test]
    fn control_set_serde_camel_case() {
        let json = serde_json::to_string(&render(UiState::Idle)).unwrap();
        assert!(json.contains("submitFormVisible"));
        assert!(json.contains("loginEnabled"));
    }
}
