//! Types for the reservation orchestrator.

use std::fmt;
use thiserror::Error;

use crate::browser::SessionError;

/// Stages of one reservation run, in the order they are entered.
/// A run only moves forward; there are no backward transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Idle,
    LoggedIn,
    ScheduleLoaded,
    CardMatched,
    DetailsPageOpen,
    ReserveAttempted,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Idle => "idle",
            Stage::LoggedIn => "logged_in",
            Stage::ScheduleLoaded => "schedule_loaded",
            Stage::CardMatched => "card_matched",
            Stage::DetailsPageOpen => "details_page_open",
            Stage::ReserveAttempted => "reserve_attempted",
        };
        f.write_str(name)
    }
}

/// How a run ends when it does not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    /// The class was reserved and confirmed.
    Reserved,
    /// Only the waitlist was offered. A legitimate end state, not an error.
    Waitlisted,
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunOutcome::Reserved => f.write_str("reserved"),
            RunOutcome::Waitlisted => f.write_str("waitlisted"),
        }
    }
}

/// Errors that can occur during a reservation run.
#[derive(Debug, Error)]
pub enum OrchestratorError {
    /// The page never left the login URL after submitting credentials.
    #[error("login did not settle within {timeout_ms}ms")]
    LoginTimeout { timeout_ms: u64 },

    /// The schedule grid never rendered a class cell.
    #[error("schedule did not render any class cell within {timeout_ms}ms")]
    ScheduleTimeout { timeout_ms: u64 },

    /// The schedule rendered with an unexpected column layout.
    #[error("expected at least {expected} day columns, found {found}")]
    ScheduleLayout { expected: usize, found: usize },

    /// No card in the target day column matched the configured strings.
    #[error("no class card matched the configured strings ({scanned} cards scanned)")]
    NoMatchingCard {
        scanned: usize,
        /// Text of the first few scanned cards, for operator debugging.
        previews: Vec<String>,
    },

    /// The details page never loaded after clicking the card link.
    #[error("details page did not load within {timeout_ms}ms")]
    DetailsTimeout { timeout_ms: u64 },

    /// Reserve was clicked but the Finish button never appeared.
    #[error("finish button did not appear within {timeout_ms}ms")]
    FinishTimeout { timeout_ms: u64 },

    /// Neither Reserve nor Waitlist showed up within the poll budget.
    #[error("no reserve or waitlist button after {attempts} attempts over {waited_ms}ms")]
    ReserveTimedOut { attempts: u32, waited_ms: u64 },

    /// The configured details URL pattern does not compile.
    #[error("invalid details URL pattern: {0}")]
    InvalidDetailsPattern(String),

    /// Browser session error.
    #[error("browser session error: {0}")]
    Session(#[from] SessionError),
}
