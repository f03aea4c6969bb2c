use regex_lite::Regex;

use super::{types::Config, ConfigError};

/// Validate configuration
/// Currently validates:
/// - Both credentials present (the run is pointless without them)
/// - Match set has at least one non-empty string
/// - Timing values are usable (non-zero poll, poll within budget)
/// - Details URL pattern compiles
/// - Site and webdriver URLs are non-empty
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Credentials: fail fast, before any browser work
    if config.credentials.email.is_empty() {
        return Err(ConfigError::ValidationError(
            "credentials.email is required (set RALLYBOT_CREDENTIALS_EMAIL)".to_string(),
        ));
    }
    if config.credentials.password.is_empty() {
        return Err(ConfigError::ValidationError(
            "credentials.password is required (set RALLYBOT_CREDENTIALS_PASSWORD)".to_string(),
        ));
    }

    // Booking validation
    if config.booking.must_include.is_empty() {
        return Err(ConfigError::ValidationError(
            "booking.must_include needs at least one string".to_string(),
        ));
    }
    if config.booking.must_include.iter().any(|s| s.is_empty()) {
        return Err(ConfigError::ValidationError(
            "booking.must_include entries cannot be empty".to_string(),
        ));
    }
    if config.booking.opens_days_before > 30 {
        return Err(ConfigError::ValidationError(
            "booking.opens_days_before cannot exceed 30".to_string(),
        ));
    }
    if config.booking.window_hours == 0 {
        return Err(ConfigError::ValidationError(
            "booking.window_hours cannot be 0".to_string(),
        ));
    }

    // Orchestrator timing validation
    if config.orchestrator.reserve_poll_interval_ms == 0 {
        return Err(ConfigError::ValidationError(
            "orchestrator.reserve_poll_interval_ms cannot be 0".to_string(),
        ));
    }
    if config.orchestrator.reserve_max_wait_ms < config.orchestrator.reserve_poll_interval_ms {
        return Err(ConfigError::ValidationError(
            "orchestrator.reserve_max_wait_ms cannot be smaller than the poll interval"
                .to_string(),
        ));
    }

    // Site validation
    if config.site.login_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "site.login_url cannot be empty".to_string(),
        ));
    }
    if config.site.club_path.is_empty() {
        return Err(ConfigError::ValidationError(
            "site.club_path cannot be empty".to_string(),
        ));
    }
    if let Err(e) = Regex::new(&config.site.details_url_pattern) {
        return Err(ConfigError::ValidationError(format!(
            "site.details_url_pattern is not a valid regex: {}",
            e
        )));
    }

    // WebDriver validation
    if config.webdriver.server_url.is_empty() {
        return Err(ConfigError::ValidationError(
            "webdriver.server_url cannot be empty".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, CredentialsConfig};

    fn config_with_credentials() -> Config {
        Config {
            credentials: CredentialsConfig {
                email: "member@example.com".to_string(),
                password: "hunter2".to_string(),
            },
            ..Config::default()
        }
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(validate_config(&config_with_credentials()).is_ok());
    }

    #[test]
    fn test_validate_missing_email_fails() {
        let mut config = config_with_credentials();
        config.credentials.email.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
        assert!(err.to_string().contains("credentials.email"));
    }

    #[test]
    fn test_validate_missing_password_fails() {
        let mut config = config_with_credentials();
        config.credentials.password.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("credentials.password"));
    }

    #[test]
    fn test_validate_empty_match_set_fails() {
        let mut config = config_with_credentials();
        config.booking.must_include.clear();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("must_include"));
    }

    #[test]
    fn test_validate_zero_poll_interval_fails() {
        let mut config = config_with_credentials();
        config.orchestrator.reserve_poll_interval_ms = 0;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("reserve_poll_interval_ms"));
    }

    #[test]
    fn test_validate_budget_smaller_than_interval_fails() {
        let mut config = config_with_credentials();
        config.orchestrator.reserve_poll_interval_ms = 1000;
        config.orchestrator.reserve_max_wait_ms = 500;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("reserve_max_wait_ms"));
    }

    #[test]
    fn test_validate_bad_details_pattern_fails() {
        let mut config = config_with_credentials();
        config.site.details_url_pattern = "class-details(".to_string();
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("details_url_pattern"));
    }

    #[test]
    fn test_validate_excessive_open_offset_fails() {
        let mut config = config_with_credentials();
        config.booking.opens_days_before = 31;
        let err = validate_config(&config).unwrap_err();
        assert!(err.to_string().contains("opens_days_before"));
    }
}
