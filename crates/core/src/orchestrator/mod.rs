//! Reservation orchestrator for one-shot booking runs.
//!
//! The orchestrator drives a run through its stages sequentially:
//! - **Login**: credentials in, wait for the session redirect
//! - **Schedule**: open the week view, match the class card
//! - **Reserve**: poll the details page until the button appears

mod config;
mod runner;
mod types;

pub use config::OrchestratorConfig;
pub use runner::ReservationRunner;
pub use types::{OrchestratorError, RunOutcome, Stage};
