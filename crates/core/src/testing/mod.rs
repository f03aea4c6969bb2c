//! Testing utilities and mock implementations for E2E tests.
//!
//! This module provides a mock browser session, allowing the whole
//! reservation flow to be tested without a WebDriver server.
//!
//! # Example
//!
//! ```rust,ignore
//! use rallybot_core::testing::{fixtures, MockSession};
//!
//! let session = MockSession::new();
//!
//! // Script the page
//! session.set_texts(&cards, fixtures::monday_cards()).await;
//! session.set_visible(&reserve_button).await;
//!
//! // Use as Arc<dyn Session> in a ReservationRunner...
//! ```

mod mock_session;

pub use mock_session::{MockSession, RecordedCall};

/// Test fixtures and helper functions.
pub mod fixtures {
    /// Render a class card's text the way the schedule grid does:
    /// time range, class title and club name on separate lines.
    pub fn card_text(time_range: &str, title: &str) -> String {
        format!("{}\n{}\nFairfax", time_range, title)
    }

    /// A day column with one card matching
    /// `["8:00", "10:00", "Pickleball Open Play"]` at index 2.
    pub fn monday_cards() -> Vec<String> {
        vec![
            card_text("6:00 - 7:00 AM", "Sunrise Yoga Flow"),
            card_text("7:15 - 8:00 AM", "Cycle Power"),
            card_text("8:00 - 10:00 AM", "Pickleball Open Play: All Levels"),
            card_text("10:30 - 11:30 AM", "Aqua Fit"),
            card_text("5:00 - 6:00 PM", "Pickleball Clinic"),
        ]
    }

    /// A day column where nothing matches the booking defaults.
    pub fn cards_without_match(count: usize) -> Vec<String> {
        (0..count)
            .map(|i| card_text(&format!("{}:00 - {}:45 AM", 6 + i, 6 + i), "Studio Cycle"))
            .collect()
    }
}
