use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Local;
use tracing::{debug, error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use rallybot_core::planner::{to_iso_date, within_window};
use rallybot_core::schedule::{build_schedule_url, card_summary};
use rallybot_core::wait::sleep_until_wall;
use rallybot_core::{
    load_config, validate_config, BookingWindow, OrchestratorError, ReservationRunner, RunOutcome,
    SanitizedConfig, Session, WebDriverSession,
};

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("rallybot {}", VERSION);

    // Determine config path
    let config_path = std::env::var("RALLYBOT_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("config.toml"));

    // Load configuration
    info!("Loading configuration from {:?}", config_path);
    let config = load_config(&config_path)
        .with_context(|| format!("Failed to load config from {:?}", config_path))?;

    // Validate configuration
    validate_config(&config).context("Configuration validation failed")?;

    info!("Configuration loaded successfully");
    debug!("Effective config: {:?}", SanitizedConfig::from(&config));

    // Plan the run
    let now = config
        .booking
        .now_override
        .unwrap_or_else(|| Local::now().naive_local());
    if config.booking.now_override.is_some() {
        warn!("Clock overridden to {} for this run", now);
    }

    let window = BookingWindow::plan(&config.booking, now);
    info!(
        "Targeting the {} class on {}",
        config.booking.weekday, window.class_date
    );
    info!(
        "Reservations open {}, browser work starts {}",
        window.open_at, window.ready_at
    );
    info!(
        "Schedule URL: {}",
        build_schedule_url(&config.site, &to_iso_date(window.class_date))
    );

    if config.orchestrator.wait_until_open {
        // Outside the window this run is a no-op, not a failure: a cron
        // firing on the wrong day should exit clean.
        let horizon = chrono::Duration::hours(i64::from(config.booking.window_hours));
        let grace = chrono::Duration::milliseconds(config.orchestrator.reserve_max_wait_ms as i64);
        if !within_window(now, window.open_at, horizon, grace) {
            info!(
                "Reservations open {}, outside the {}h window; nothing to do",
                window.open_at, config.booking.window_hours
            );
            return Ok(());
        }

        info!("Waiting until {} to start browser work", window.ready_at);
        sleep_until_wall(window.ready_at).await;
    }

    // Connect the browser
    info!("Connecting to WebDriver at {}", config.webdriver.server_url);
    let session: Arc<dyn Session> = Arc::new(
        WebDriverSession::connect(&config.webdriver)
            .await
            .context("Failed to connect to WebDriver")?,
    );

    let mut runner = ReservationRunner::new(
        Arc::clone(&session),
        config.credentials.clone(),
        config.site.clone(),
        config.booking.clone(),
        config.orchestrator.clone(),
    )?;

    let result = runner.run(&window).await;

    // Quit the browser whichever way the run went
    if let Err(e) = session.close().await {
        warn!("Failed to close browser session: {}", e);
    }

    match result {
        Ok(RunOutcome::Reserved) => {
            info!(
                "Reserved the {} class on {}",
                config.booking.weekday, window.class_date
            );
            Ok(())
        }
        Ok(RunOutcome::Waitlisted) => {
            info!(
                "The {} class on {} is full with a waitlist open; nothing was booked",
                config.booking.weekday, window.class_date
            );
            Ok(())
        }
        Err(OrchestratorError::NoMatchingCard { scanned, previews }) => {
            error!(
                "No card in the {} column matched {:?} ({} scanned)",
                config.booking.weekday, config.booking.must_include, scanned
            );
            for (i, preview) in previews.iter().enumerate() {
                error!("Card {}: {}", i, card_summary(preview));
            }
            anyhow::bail!("no class card matched the configured strings");
        }
        Err(e) => {
            error!("Reservation run failed in stage {}: {}", runner.stage(), e);
            Err(e.into())
        }
    }
}
