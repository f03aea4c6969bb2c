//! WebDriver-backed browser session.

use async_trait::async_trait;
use thirtyfour::error::WebDriverError;
use thirtyfour::{By, ChromiumLikeCapabilities, DesiredCapabilities, WebDriver, WebElement};
use tracing::debug;

use super::traits::{Locator, Session, SessionError};
use crate::config::WebDriverConfig;

impl From<WebDriverError> for SessionError {
    fn from(e: WebDriverError) -> Self {
        SessionError::Driver(e.to_string())
    }
}

/// `Session` implementation over a chromedriver endpoint.
pub struct WebDriverSession {
    driver: WebDriver,
}

impl WebDriverSession {
    /// Start a browser session against the configured endpoint.
    pub async fn connect(config: &WebDriverConfig) -> Result<Self, SessionError> {
        let mut caps = DesiredCapabilities::chrome();
        if config.headless {
            caps.set_headless()?;
        }
        let driver = WebDriver::new(&config.server_url, caps).await?;
        debug!(server_url = %config.server_url, "webdriver session started");
        Ok(Self { driver })
    }

    async fn find(&self, locator: &Locator) -> Result<Vec<WebElement>, SessionError> {
        Ok(self.driver.find_all(by(locator)).await?)
    }

    async fn first_displayed(
        &self,
        locator: &Locator,
    ) -> Result<Option<WebElement>, SessionError> {
        for element in self.find(locator).await? {
            // An element that goes stale mid-check reads as not displayed.
            if element.is_displayed().await.unwrap_or(false) {
                return Ok(Some(element));
            }
        }
        Ok(None)
    }
}

#[async_trait]
impl Session for WebDriverSession {
    fn name(&self) -> &str {
        "webdriver"
    }

    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        self.driver.goto(url).await?;
        Ok(())
    }

    async fn reload(&self) -> Result<(), SessionError> {
        self.driver.refresh().await?;
        Ok(())
    }

    async fn current_url(&self) -> Result<String, SessionError> {
        Ok(self.driver.current_url().await?.to_string())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<(), SessionError> {
        let element = self
            .first_displayed(locator)
            .await?
            .ok_or_else(|| SessionError::NotFound(locator.to_string()))?;
        element.clear().await?;
        element.send_keys(value).await?;
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<(), SessionError> {
        let element = self
            .first_displayed(locator)
            .await?
            .ok_or_else(|| SessionError::NotFound(locator.to_string()))?;
        element.click().await?;
        Ok(())
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool, SessionError> {
        Ok(self.first_displayed(locator).await?.is_some())
    }

    async fn count(&self, locator: &Locator) -> Result<usize, SessionError> {
        Ok(self.find(locator).await?.len())
    }

    async fn read_texts(&self, locator: &Locator) -> Result<Vec<String>, SessionError> {
        let elements = self.find(locator).await?;
        let mut texts = Vec::with_capacity(elements.len());
        for element in elements {
            texts.push(element.text().await?);
        }
        Ok(texts)
    }

    async fn close(&self) -> Result<(), SessionError> {
        self.driver.clone().quit().await?;
        Ok(())
    }
}

fn by(locator: &Locator) -> By {
    match locator {
        Locator::Css(selector) => By::Css(selector.clone()),
        Locator::XPath(expr) => By::XPath(expr.clone()),
        Locator::Button(label) => By::XPath(button_xpath(label, true)),
        Locator::ButtonContains(label) => By::XPath(button_xpath(label, false)),
    }
}

const XPATH_LOWERCASE: &str = "translate(normalize-space(.), \
'ABCDEFGHIJKLMNOPQRSTUVWXYZ', 'abcdefghijklmnopqrstuvwxyz')";

/// XPath matching `<button>` elements (and `role="button"` lookalikes) by
/// label, compared in lowercase.
fn button_xpath(label: &str, exact: bool) -> String {
    let needle = label.to_ascii_lowercase();
    if exact {
        format!(
            "//button[{lc} = '{needle}'] | //*[@role='button'][{lc} = '{needle}']",
            lc = XPATH_LOWERCASE,
            needle = needle
        )
    } else {
        format!(
            "//button[contains({lc}, '{needle}')] | \
//*[@role='button'][contains({lc}, '{needle}')]",
            lc = XPATH_LOWERCASE,
            needle = needle
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_button_xpath_exact_lowercases_the_label() {
        let xpath = button_xpath("Reserve", true);
        assert!(xpath.contains("= 'reserve'"));
        assert!(!xpath.contains("Reserve"));
        assert!(xpath.contains("//button["));
        assert!(xpath.contains("//*[@role='button']["));
    }

    #[test]
    fn test_button_xpath_contains_uses_substring_match() {
        let xpath = button_xpath("Accept All", false);
        assert!(xpath.contains("contains("));
        assert!(xpath.contains("'accept all'"));
    }

    #[test]
    fn test_button_xpath_exact_has_no_contains() {
        let xpath = button_xpath("Finish", true);
        // normalize-space comparison only; no substring matching.
        assert!(!xpath.contains("contains(translate"));
    }

    #[test]
    fn test_headless_toggle_applies_to_chrome_caps() {
        let mut caps = DesiredCapabilities::chrome();
        assert!(caps.set_headless().is_ok());
    }
}
