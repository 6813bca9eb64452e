//! # TOTP Enroll – Two-Factor Enrollment & Verification Flow
//!
//! Client-side controller for a TOTP enrollment page, driven against an
//! external credential service:
//!
//! - **UI state machine** – explicit page states with a pure render
//!   function mapping state to visible/enabled controls (no DOM needed)
//! - **Provisioning** – requests a QR fragment and shared secret for a
//!   username
//! - **Verification** – posts an access code and reports the match
//!   verdict through success/danger alerts
//! - **Alert feed** – dismissible banners with ids and timestamps
//! - **Robust requests** – timeout-bounded, cancellable HTTP calls with
//!   transport failures surfaced distinctly from a "no match" verdict

pub mod enroll;
