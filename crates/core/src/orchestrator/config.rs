//! Orchestrator configuration.

use serde::{Deserialize, Serialize};

/// Configuration for the reservation orchestrator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Block until the computed open instant before polling for Reserve.
    /// Disable to drive the whole flow immediately (dry runs, rehearsals).
    #[serde(default = "default_wait_until_open")]
    pub wait_until_open: bool,

    /// Delay between Reserve/Waitlist checks (milliseconds).
    /// The page is reloaded between checks.
    #[serde(default = "default_reserve_poll_interval")]
    pub reserve_poll_interval_ms: u64,

    /// Total budget for the Reserve poll (milliseconds).
    /// When it runs out the run fails; there is no second attempt.
    #[serde(default = "default_reserve_max_wait")]
    pub reserve_max_wait_ms: u64,

    /// How long the post-submit page may take to leave the login URL
    /// (milliseconds).
    #[serde(default = "default_login_timeout")]
    pub login_timeout_ms: u64,

    /// How long the schedule grid may take to render its first class cell
    /// (milliseconds).
    #[serde(default = "default_schedule_timeout")]
    pub schedule_timeout_ms: u64,

    /// How long the class details page may take to load after clicking a
    /// card (milliseconds).
    #[serde(default = "default_details_timeout")]
    pub details_timeout_ms: u64,

    /// How long the Finish button may take to appear after clicking
    /// Reserve (milliseconds).
    #[serde(default = "default_finish_timeout")]
    pub finish_timeout_ms: u64,

    /// How long to watch for a cookie-consent banner before deciding there
    /// is none (milliseconds).
    #[serde(default = "default_cookie_banner_timeout")]
    pub cookie_banner_timeout_ms: u64,
}

fn default_wait_until_open() -> bool {
    true
}

fn default_reserve_poll_interval() -> u64 {
    350
}

fn default_reserve_max_wait() -> u64 {
    300_000 // 5 minutes
}

fn default_login_timeout() -> u64 {
    30_000
}

fn default_schedule_timeout() -> u64 {
    20_000
}

fn default_details_timeout() -> u64 {
    15_000
}

fn default_finish_timeout() -> u64 {
    15_000
}

fn default_cookie_banner_timeout() -> u64 {
    6_000
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            wait_until_open: default_wait_until_open(),
            reserve_poll_interval_ms: default_reserve_poll_interval(),
            reserve_max_wait_ms: default_reserve_max_wait(),
            login_timeout_ms: default_login_timeout(),
            schedule_timeout_ms: default_schedule_timeout(),
            details_timeout_ms: default_details_timeout(),
            finish_timeout_ms: default_finish_timeout(),
            cookie_banner_timeout_ms: default_cookie_banner_timeout(),
        }
    }
}
