pub mod browser;
pub mod config;
pub mod orchestrator;
pub mod planner;
pub mod schedule;
pub mod testing;
pub mod wait;

pub use browser::{Locator, Session, SessionError, WebDriverSession};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, SanitizedConfig,
};
pub use orchestrator::{OrchestratorError, ReservationRunner, RunOutcome, Stage};
pub use planner::{BookingWindow, Weekday};
