//! The browser capability seam.
//!
//! Everything the reservation flow needs from a browser fits in the
//! `Session` trait: navigate, fill, click, check visibility, read text.
//! The orchestrator depends only on this trait, so any automation backend
//! (or a scripted mock) can sit behind it.

use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

/// How to address elements on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// CSS selector.
    Css(String),
    /// XPath expression.
    XPath(String),
    /// Visible button whose trimmed label equals this string
    /// (ASCII case-insensitive).
    Button(String),
    /// Visible button whose label contains this string
    /// (ASCII case-insensitive).
    ButtonContains(String),
}

impl Locator {
    pub fn css(selector: impl Into<String>) -> Self {
        Locator::Css(selector.into())
    }

    pub fn xpath(expr: impl Into<String>) -> Self {
        Locator::XPath(expr.into())
    }

    pub fn button(label: impl Into<String>) -> Self {
        Locator::Button(label.into())
    }

    pub fn button_contains(label: impl Into<String>) -> Self {
        Locator::ButtonContains(label.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Css(selector) => write!(f, "css:{}", selector),
            Locator::XPath(expr) => write!(f, "xpath:{}", expr),
            Locator::Button(label) => write!(f, "button:{}", label),
            Locator::ButtonContains(label) => write!(f, "button~:{}", label),
        }
    }
}

/// Errors surfaced by a browser session.
#[derive(Debug, Clone, Error)]
pub enum SessionError {
    #[error("Browser backend error: {0}")]
    Driver(String),

    #[error("No element for {0}")]
    NotFound(String),
}

/// One browser session driving one page.
///
/// Queries over absent elements are not errors: `is_visible` answers
/// `Ok(false)`, `count` answers `Ok(0)` and `read_texts` answers an empty
/// vec. Only `fill` and `click` require their target to exist.
#[async_trait]
pub trait Session: Send + Sync {
    /// Backend name for logging.
    fn name(&self) -> &str;

    /// Load a URL in the page.
    async fn navigate(&self, url: &str) -> Result<(), SessionError>;

    /// Reload the current page.
    async fn reload(&self) -> Result<(), SessionError>;

    /// URL currently loaded in the page.
    async fn current_url(&self) -> Result<String, SessionError>;

    /// Clear a field and type a value into it.
    async fn fill(&self, locator: &Locator, value: &str) -> Result<(), SessionError>;

    /// Click the first displayed match.
    async fn click(&self, locator: &Locator) -> Result<(), SessionError>;

    /// Whether any match is currently displayed.
    async fn is_visible(&self, locator: &Locator) -> Result<bool, SessionError>;

    /// Number of matches, displayed or not.
    async fn count(&self, locator: &Locator) -> Result<usize, SessionError>;

    /// Rendered text of every match, in document order.
    async fn read_texts(&self, locator: &Locator) -> Result<Vec<String>, SessionError>;

    /// Tear the session down. The session is unusable afterwards.
    async fn close(&self) -> Result<(), SessionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_locator_display_is_compact() {
        assert_eq!(
            Locator::css("div.calendar > div.day").to_string(),
            "css:div.calendar > div.day"
        );
        assert_eq!(Locator::button("Reserve").to_string(), "button:Reserve");
        assert_eq!(
            Locator::button_contains("Waitlist").to_string(),
            "button~:Waitlist"
        );
    }

    #[test]
    fn test_locator_equality() {
        assert_eq!(Locator::button("Reserve"), Locator::button("Reserve"));
        assert_ne!(Locator::button("Reserve"), Locator::button_contains("Reserve"));
    }
}
