//! Reservation runner implementation.
//!
//! Drives one booking attempt through the stages sequentially:
//! log in, open the week schedule, match the class card, open its
//! details page, then poll the Reserve button until it appears or
//! the budget runs out. There is no parallelism; every stage gates
//! the next.

use std::sync::Arc;
use std::time::Duration;

use regex_lite::Regex;
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::browser::{selectors, Locator, Session};
use crate::config::{BookingConfig, CredentialsConfig, SiteConfig};
use crate::planner::{to_iso_date, BookingWindow};
use crate::schedule::{build_schedule_url, card_matches, card_summary};
use crate::wait::sleep_until_wall;

use super::config::OrchestratorConfig;
use super::types::{OrchestratorError, RunOutcome, Stage};

/// How often visibility and URL checks are re-polled while waiting.
const VISIBILITY_POLL: Duration = Duration::from_millis(100);

/// How many card texts to keep when no card matches.
const PREVIEW_CARDS: usize = 8;

/// Pause after dismissing the cookie banner so the overlay can clear.
const COOKIE_SETTLE: Duration = Duration::from_millis(400);

/// A week view renders one column per day.
const EXPECTED_DAY_COLUMNS: usize = 7;

/// Drives a single reservation attempt end to end.
///
/// One runner performs one run and is then done. Every stage must
/// succeed before the next one starts; the first failure aborts the
/// run, leaving [`ReservationRunner::stage`] at the last stage reached.
pub struct ReservationRunner {
    session: Arc<dyn Session>,
    credentials: CredentialsConfig,
    site: SiteConfig,
    booking: BookingConfig,
    config: OrchestratorConfig,
    details_url: Regex,
    stage: Stage,
}

impl ReservationRunner {
    pub fn new(
        session: Arc<dyn Session>,
        credentials: CredentialsConfig,
        site: SiteConfig,
        booking: BookingConfig,
        config: OrchestratorConfig,
    ) -> Result<Self, OrchestratorError> {
        let pattern = format!("(?i){}", site.details_url_pattern);
        let details_url = Regex::new(&pattern)
            .map_err(|e| OrchestratorError::InvalidDetailsPattern(e.to_string()))?;
        Ok(Self {
            session,
            credentials,
            site,
            booking,
            config,
            details_url,
            stage: Stage::Idle,
        })
    }

    /// The stage the run last entered.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Runs the whole reservation flow against the planned window.
    pub async fn run(&mut self, window: &BookingWindow) -> Result<RunOutcome, OrchestratorError> {
        info!(
            "Starting reservation run for {} via {}",
            window.class_date,
            self.session.name()
        );
        self.log_in().await?;
        self.open_schedule(window).await?;
        let card_index = self.find_card().await?;
        self.open_details(card_index).await?;
        // The banner can reappear on the details page
        self.dismiss_cookie_banner().await;
        self.wait_for_open(window).await;
        let outcome = self.reserve().await?;
        info!("Reservation run finished: {}", outcome);
        Ok(outcome)
    }

    /// Logs in and waits for the page to leave the login URL.
    async fn log_in(&mut self) -> Result<(), OrchestratorError> {
        info!("Logging in at {}", self.site.login_url);
        self.session.navigate(&self.site.login_url).await?;

        let username = Locator::css(selectors::USERNAME_FIELD);
        if !self
            .wait_visible(&username, self.config.login_timeout_ms)
            .await?
        {
            return Err(OrchestratorError::LoginTimeout {
                timeout_ms: self.config.login_timeout_ms,
            });
        }
        self.session.fill(&username, &self.credentials.email).await?;
        self.session
            .fill(
                &Locator::css(selectors::PASSWORD_FIELD),
                &self.credentials.password,
            )
            .await?;
        self.session
            .click(&Locator::css(selectors::LOGIN_SUBMIT))
            .await?;

        // The site redirects away from the login page once the session
        // cookie is set; a page still on login.html means no session.
        if !self
            .wait_url_leaves(selectors::LOGIN_PATH_FRAGMENT, self.config.login_timeout_ms)
            .await?
        {
            return Err(OrchestratorError::LoginTimeout {
                timeout_ms: self.config.login_timeout_ms,
            });
        }
        self.transition(Stage::LoggedIn);
        Ok(())
    }

    /// Opens the week view for the class date and checks the grid layout.
    async fn open_schedule(&mut self, window: &BookingWindow) -> Result<(), OrchestratorError> {
        let url = build_schedule_url(&self.site, &to_iso_date(window.class_date));
        info!("Opening schedule {}", url);
        self.session.navigate(&url).await?;
        self.dismiss_cookie_banner().await;

        let cell = Locator::css(selectors::SCHEDULE_CELL);
        if !self
            .wait_visible(&cell, self.config.schedule_timeout_ms)
            .await?
        {
            return Err(OrchestratorError::ScheduleTimeout {
                timeout_ms: self.config.schedule_timeout_ms,
            });
        }

        let found = self
            .session
            .count(&Locator::css(selectors::DAY_COLUMNS))
            .await?;
        if found < EXPECTED_DAY_COLUMNS {
            return Err(OrchestratorError::ScheduleLayout {
                expected: EXPECTED_DAY_COLUMNS,
                found,
            });
        }
        self.transition(Stage::ScheduleLoaded);
        Ok(())
    }

    /// Scans the target day column for the first card containing every
    /// configured string. Returns the card's index within its column.
    async fn find_card(&mut self) -> Result<usize, OrchestratorError> {
        let day_index = self.booking.weekday.index();
        let cards = Locator::xpath(selectors::day_cards(day_index));
        let texts = self.session.read_texts(&cards).await?;
        debug!(
            "Scanning {} cards in the {} column",
            texts.len(),
            self.booking.weekday
        );

        for (i, text) in texts.iter().enumerate() {
            if card_matches(text, &self.booking.must_include) {
                info!(
                    "Matched card {} in the {} column: {}",
                    i,
                    self.booking.weekday,
                    card_summary(text)
                );
                self.transition(Stage::CardMatched);
                return Ok(i);
            }
        }

        warn!(
            "No card matched {:?}, dumping the first {} of {}",
            self.booking.must_include,
            texts.len().min(PREVIEW_CARDS),
            texts.len()
        );
        for (i, text) in texts.iter().take(PREVIEW_CARDS).enumerate() {
            warn!("Card {}: {}", i, card_summary(text));
        }
        Err(OrchestratorError::NoMatchingCard {
            scanned: texts.len(),
            previews: texts.iter().take(PREVIEW_CARDS).cloned().collect(),
        })
    }

    /// Clicks into the matched card and waits for the details page URL.
    async fn open_details(&mut self, card_index: usize) -> Result<(), OrchestratorError> {
        let day_index = self.booking.weekday.index();
        let link = Locator::xpath(selectors::card_link(day_index, card_index));
        debug!("Opening details for card {}", card_index);
        self.session.click(&link).await?;

        if !self.wait_url_matches(self.config.details_timeout_ms).await? {
            return Err(OrchestratorError::DetailsTimeout {
                timeout_ms: self.config.details_timeout_ms,
            });
        }
        self.transition(Stage::DetailsPageOpen);
        Ok(())
    }

    /// Dismisses the consent banner when one shows up. Never fatal: an
    /// absent banner and a failed click both leave the run going.
    async fn dismiss_cookie_banner(&self) {
        let accept = Locator::button_contains(selectors::COOKIE_ACCEPT_LABEL);
        match self
            .wait_visible(&accept, self.config.cookie_banner_timeout_ms)
            .await
        {
            Ok(true) => {
                if let Err(e) = self.session.click(&accept).await {
                    debug!("Cookie banner click failed: {}", e);
                    return;
                }
                debug!("Dismissed cookie banner");
                tokio::time::sleep(COOKIE_SETTLE).await;
            }
            Ok(false) => debug!("No cookie banner"),
            Err(e) => debug!("Cookie banner check failed: {}", e),
        }
    }

    /// Holds on the details page until the reservation window opens.
    async fn wait_for_open(&self, window: &BookingWindow) {
        if !self.config.wait_until_open {
            debug!("Open-time wait disabled, reserving immediately");
            return;
        }
        info!("Holding on the details page until {}", window.open_at);
        sleep_until_wall(window.open_at).await;
    }

    /// Polls for the Reserve button, reloading between attempts.
    ///
    /// A visible Waitlist button ends the run as [`RunOutcome::Waitlisted`]
    /// right away; the button is only observed, never clicked. Only when
    /// neither button appears before the poll budget runs out does the
    /// run fail.
    async fn reserve(&mut self) -> Result<RunOutcome, OrchestratorError> {
        self.transition(Stage::ReserveAttempted);
        let reserve = Locator::button(selectors::RESERVE_LABEL);
        let waitlist = Locator::button_contains(selectors::WAITLIST_LABEL);
        let poll = Duration::from_millis(self.config.reserve_poll_interval_ms);
        let started = Instant::now();
        let deadline = started + Duration::from_millis(self.config.reserve_max_wait_ms);
        let mut attempts: u32 = 0;

        loop {
            attempts += 1;
            if self.session.is_visible(&reserve).await? {
                info!("Reserve button visible on attempt {}", attempts);
                return self.confirm(&reserve).await;
            }
            if self.session.is_visible(&waitlist).await? {
                info!(
                    "Waitlist shown on attempt {}, Reserve not available; stopping",
                    attempts
                );
                return Ok(RunOutcome::Waitlisted);
            }
            if Instant::now() + poll >= deadline {
                return Err(OrchestratorError::ReserveTimedOut {
                    attempts,
                    waited_ms: started.elapsed().as_millis() as u64,
                });
            }
            tokio::time::sleep(poll).await;
            // A fresh render is another chance for the button to show;
            // a failed reload still leaves the current page pollable.
            if let Err(e) = self.session.reload().await {
                warn!("Reload between reserve attempts failed: {}", e);
            }
        }
    }

    /// Clicks Reserve and confirms through the Finish dialog.
    async fn confirm(&self, reserve: &Locator) -> Result<RunOutcome, OrchestratorError> {
        self.session.click(reserve).await?;
        let finish = Locator::button(selectors::FINISH_LABEL);
        if !self
            .wait_visible(&finish, self.config.finish_timeout_ms)
            .await?
        {
            return Err(OrchestratorError::FinishTimeout {
                timeout_ms: self.config.finish_timeout_ms,
            });
        }
        self.session.click(&finish).await?;
        info!("Reservation confirmed");
        Ok(RunOutcome::Reserved)
    }

    fn transition(&mut self, next: Stage) {
        info!(from = %self.stage, to = %next, "Stage transition");
        self.stage = next;
    }

    async fn wait_visible(
        &self,
        locator: &Locator,
        timeout_ms: u64,
    ) -> Result<bool, OrchestratorError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.session.is_visible(locator).await? {
                return Ok(true);
            }
            if Instant::now() + VISIBILITY_POLL >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(VISIBILITY_POLL).await;
        }
    }

    async fn wait_url_leaves(
        &self,
        fragment: &str,
        timeout_ms: u64,
    ) -> Result<bool, OrchestratorError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            let url = self.session.current_url().await?;
            if !url.contains(fragment) {
                return Ok(true);
            }
            if Instant::now() + VISIBILITY_POLL >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(VISIBILITY_POLL).await;
        }
    }

    async fn wait_url_matches(&self, timeout_ms: u64) -> Result<bool, OrchestratorError> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            let url = self.session.current_url().await?;
            if self.details_url.is_match(&url) {
                return Ok(true);
            }
            if Instant::now() + VISIBILITY_POLL >= deadline {
                return Ok(false);
            }
            tokio::time::sleep(VISIBILITY_POLL).await;
        }
    }
}
