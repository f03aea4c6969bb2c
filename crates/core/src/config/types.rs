use chrono::{NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::orchestrator::OrchestratorConfig;
use crate::planner::Weekday;

/// Root configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub credentials: CredentialsConfig,
    #[serde(default)]
    pub site: SiteConfig,
    #[serde(default)]
    pub booking: BookingConfig,
    #[serde(default)]
    pub orchestrator: OrchestratorConfig,
    #[serde(default)]
    pub webdriver: WebDriverConfig,
}

/// Site login credentials.
///
/// Usually supplied through the environment
/// (`RALLYBOT_CREDENTIALS_EMAIL` / `RALLYBOT_CREDENTIALS_PASSWORD`)
/// rather than the file; validation rejects a run without both.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct CredentialsConfig {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Everything about the target site that is not a secret.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteConfig {
    /// Login page URL.
    #[serde(default = "default_login_url")]
    pub login_url: String,
    /// Base URL of the club's schedule page.
    #[serde(default = "default_club_path")]
    pub club_path: String,
    /// `location` query filter.
    #[serde(default = "default_location")]
    pub location: String,
    /// `interest` query filter.
    #[serde(default = "default_interest")]
    pub interest: String,
    /// Schedule view mode.
    #[serde(default = "default_mode")]
    pub mode: String,
    /// Include the `teamMemberView` query flag.
    #[serde(default = "default_true")]
    pub team_member_view: bool,
    /// Regex the class details page URL must match (case-insensitive).
    #[serde(default = "default_details_url_pattern")]
    pub details_url_pattern: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            login_url: default_login_url(),
            club_path: default_club_path(),
            location: default_location(),
            interest: default_interest(),
            mode: default_mode(),
            team_member_view: default_true(),
            details_url_pattern: default_details_url_pattern(),
        }
    }
}

fn default_login_url() -> String {
    "https://my.lifetime.life/login.html?resource=%2Fclubs%2Fva%2Ffairfax.html".to_string()
}

fn default_club_path() -> String {
    "https://my.lifetime.life/clubs/va/fairfax/classes.html".to_string()
}

fn default_location() -> String {
    "Fairfax".to_string()
}

fn default_interest() -> String {
    "Pickleball Open Play".to_string()
}

fn default_mode() -> String {
    "week".to_string()
}

fn default_details_url_pattern() -> String {
    r"class-details\.html".to_string()
}

fn default_true() -> bool {
    true
}

/// Which class to book and when its reservations open.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BookingConfig {
    /// Weekday of the class being chased.
    #[serde(default = "default_weekday")]
    pub weekday: Weekday,
    /// Strings the class tile text must contain, verbatim.
    #[serde(default = "default_must_include")]
    pub must_include: Vec<String>,
    /// Wall-clock time reservations open (e.g. "17:51:00").
    #[serde(default = "default_open_time")]
    pub open_time: NaiveTime,
    /// How many days before the class reservations open.
    #[serde(default = "default_opens_days_before")]
    pub opens_days_before: u32,
    /// How many minutes before the open instant to start browser work.
    #[serde(default = "default_ready_lead_minutes")]
    pub ready_lead_minutes: u32,
    /// How far ahead of the open instant a run still counts as in-window
    /// (hours). Outside the window the run is a clean no-op.
    #[serde(default = "default_window_hours")]
    pub window_hours: u32,
    /// Replace "now" for all planning (e.g. "2026-02-22T12:00:00").
    /// A rehearsal knob; leave unset for real runs.
    #[serde(default)]
    pub now_override: Option<NaiveDateTime>,
}

impl Default for BookingConfig {
    fn default() -> Self {
        Self {
            weekday: default_weekday(),
            must_include: default_must_include(),
            open_time: default_open_time(),
            opens_days_before: default_opens_days_before(),
            ready_lead_minutes: default_ready_lead_minutes(),
            window_hours: default_window_hours(),
            now_override: None,
        }
    }
}

fn default_weekday() -> Weekday {
    Weekday::Saturday
}

fn default_must_include() -> Vec<String> {
    vec![
        "3:30 PM".to_string(),
        "5:00".to_string(),
        "Pickleball Open Play".to_string(),
    ]
}

fn default_open_time() -> NaiveTime {
    NaiveTime::from_hms_opt(17, 51, 0).unwrap()
}

fn default_opens_days_before() -> u32 {
    8
}

fn default_ready_lead_minutes() -> u32 {
    1
}

fn default_window_hours() -> u32 {
    24
}

/// WebDriver endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebDriverConfig {
    /// chromedriver URL (e.g. "http://localhost:9515").
    #[serde(default = "default_server_url")]
    pub server_url: String,
    /// Run the browser headless.
    #[serde(default = "default_true")]
    pub headless: bool,
}

impl Default for WebDriverConfig {
    fn default() -> Self {
        Self {
            server_url: default_server_url(),
            headless: default_true(),
        }
    }
}

fn default_server_url() -> String {
    "http://localhost:9515".to_string()
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub credentials: SanitizedCredentials,
    pub site: SiteConfig,
    pub booking: BookingConfig,
    pub orchestrator: OrchestratorConfig,
    pub webdriver: WebDriverConfig,
}

/// Sanitized credentials (password hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCredentials {
    pub email: String,
    pub password_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            credentials: SanitizedCredentials {
                email: config.credentials.email.clone(),
                password_configured: !config.credentials.password.is_empty(),
            },
            site: config.site.clone(),
            booking: config.booking.clone(),
            orchestrator: config.orchestrator.clone(),
            webdriver: config.webdriver.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_empty_config_uses_defaults() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.booking.weekday, Weekday::Saturday);
        assert_eq!(config.booking.opens_days_before, 8);
        assert_eq!(
            config.booking.open_time,
            NaiveTime::from_hms_opt(17, 51, 0).unwrap()
        );
        assert_eq!(config.booking.must_include.len(), 3);
        assert!(config.site.team_member_view);
        assert_eq!(config.webdriver.server_url, "http://localhost:9515");
        assert!(config.webdriver.headless);
        assert!(config.credentials.email.is_empty());
        assert!(config.booking.now_override.is_none());
    }

    #[test]
    fn test_deserialize_booking_section() {
        let toml = r#"
[booking]
weekday = "monday"
must_include = ["8:00", "10:00", "Pickleball Open Play"]
open_time = "20:00:00"
opens_days_before = 1
now_override = "2026-02-22T12:00:00"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.booking.weekday, Weekday::Monday);
        assert_eq!(config.booking.must_include[0], "8:00");
        assert_eq!(
            config.booking.open_time,
            NaiveTime::from_hms_opt(20, 0, 0).unwrap()
        );
        assert_eq!(config.booking.opens_days_before, 1);
        let now = config.booking.now_override.unwrap();
        assert_eq!(now.to_string(), "2026-02-22 12:00:00");
        // Unspecified fields keep their defaults.
        assert_eq!(config.booking.ready_lead_minutes, 1);
        assert_eq!(config.booking.window_hours, 24);
    }

    #[test]
    fn test_deserialize_orchestrator_section() {
        let toml = r#"
[orchestrator]
wait_until_open = false
reserve_poll_interval_ms = 400
reserve_max_wait_ms = 45000
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert!(!config.orchestrator.wait_until_open);
        assert_eq!(config.orchestrator.reserve_poll_interval_ms, 400);
        assert_eq!(config.orchestrator.reserve_max_wait_ms, 45_000);
    }

    #[test]
    fn test_deserialize_credentials_from_file() {
        let toml = r#"
[credentials]
email = "member@example.com"
password = "hunter2"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.credentials.email, "member@example.com");
        assert_eq!(config.credentials.password, "hunter2");
    }

    #[test]
    fn test_sanitized_config_hides_password() {
        let config = Config {
            credentials: CredentialsConfig {
                email: "member@example.com".to_string(),
                password: "hunter2".to_string(),
            },
            ..Config::default()
        };
        let sanitized = SanitizedConfig::from(&config);
        assert_eq!(sanitized.credentials.email, "member@example.com");
        assert!(sanitized.credentials.password_configured);

        let rendered = format!("{:?}", sanitized);
        assert!(!rendered.contains("hunter2"));
    }
}
