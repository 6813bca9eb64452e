//! Enrollment flow: sub-modules.

pub mod api_client;
pub mod service;
pub mod types;
pub mod ui_state;

// Re-export top-level items for convenience.
pub use api_client::CredentialApiClient;
pub use service::{CancelHandle, EnrollService, EnrollServiceState, FlowSnapshot};
pub use types::*;
pub use ui_state::{render, ControlSet, UiState};
