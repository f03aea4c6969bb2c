//! Mock browser session for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::browser::{Locator, Session, SessionError};

/// A recorded session call for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    Navigate(String),
    Reload,
    Fill(String, String),
    Click(String),
    Close,
}

/// Mock implementation of the [`Session`] trait.
///
/// Pages are modeled as per-locator state keyed by the locator's
/// string form. Visibility, texts and counts are all configured up
/// front; clicks can change the current URL or reveal other elements,
/// which is enough to script a whole reservation flow.
///
/// Like the real session, `fill` and `click` fail on an element that
/// was never made visible, while the read-only calls just report
/// absence.
#[derive(Debug, Default)]
pub struct MockSession {
    /// Current page URL.
    url: Arc<RwLock<String>>,
    /// Locators currently visible.
    visible: Arc<RwLock<HashMap<String, bool>>>,
    /// Locators that become visible once this many reloads happened.
    visible_after_reloads: Arc<RwLock<HashMap<String, usize>>>,
    /// Clicking the key locator makes the value locator visible.
    reveal_on_click: Arc<RwLock<HashMap<String, String>>>,
    /// Clicking the key locator navigates to the value URL.
    url_on_click: Arc<RwLock<HashMap<String, String>>>,
    /// Texts returned by `read_texts` per locator.
    texts: Arc<RwLock<HashMap<String, Vec<String>>>>,
    /// Counts returned by `count` per locator.
    counts: Arc<RwLock<HashMap<String, usize>>>,
    /// Every call made against the session, in order.
    calls: Arc<RwLock<Vec<RecordedCall>>>,
    /// If set, the next session call fails with this error.
    next_error: Arc<RwLock<Option<SessionError>>>,
}

impl MockSession {
    /// Create a new mock session on a blank page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark a locator as visible.
    pub async fn set_visible(&self, locator: &Locator) {
        self.visible.write().await.insert(locator.to_string(), true);
    }

    /// Mark a locator as hidden again.
    pub async fn set_hidden(&self, locator: &Locator) {
        self.visible
            .write()
            .await
            .insert(locator.to_string(), false);
    }

    /// Make a locator visible only after the page reloaded `reloads` times.
    pub async fn set_visible_after_reloads(&self, locator: &Locator, reloads: usize) {
        self.visible_after_reloads
            .write()
            .await
            .insert(locator.to_string(), reloads);
    }

    /// Make clicking `trigger` reveal `target`.
    pub async fn set_reveal_on_click(&self, trigger: &Locator, target: &Locator) {
        self.reveal_on_click
            .write()
            .await
            .insert(trigger.to_string(), target.to_string());
    }

    /// Make clicking `trigger` change the page URL.
    pub async fn set_url_on_click(&self, trigger: &Locator, url: &str) {
        self.url_on_click
            .write()
            .await
            .insert(trigger.to_string(), url.to_string());
    }

    /// Set the texts `read_texts` returns for a locator.
    pub async fn set_texts(&self, locator: &Locator, texts: Vec<String>) {
        self.texts.write().await.insert(locator.to_string(), texts);
    }

    /// Set the count `count` returns for a locator.
    pub async fn set_count(&self, locator: &Locator, count: usize) {
        self.counts.write().await.insert(locator.to_string(), count);
    }

    /// Configure the next session call to fail with the given error.
    pub async fn set_next_error(&self, error: SessionError) {
        *self.next_error.write().await = Some(error);
    }

    /// Every call made against the session so far.
    pub async fn recorded_calls(&self) -> Vec<RecordedCall> {
        self.calls.read().await.clone()
    }

    /// How many times the page was reloaded.
    pub async fn reload_count(&self) -> usize {
        self.calls
            .read()
            .await
            .iter()
            .filter(|c| **c == RecordedCall::Reload)
            .count()
    }

    /// Locator strings clicked, in order.
    pub async fn clicks(&self) -> Vec<String> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Click(locator) => Some(locator.clone()),
                _ => None,
            })
            .collect()
    }

    /// Locator and value pairs filled, in order.
    pub async fn fills(&self) -> Vec<(String, String)> {
        self.calls
            .read()
            .await
            .iter()
            .filter_map(|c| match c {
                RecordedCall::Fill(locator, value) => Some((locator.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    /// Whether the session was closed.
    pub async fn closed(&self) -> bool {
        self.calls.read().await.contains(&RecordedCall::Close)
    }

    async fn take_error(&self) -> Option<SessionError> {
        self.next_error.write().await.take()
    }

    async fn lookup_visible(&self, key: &str) -> bool {
        if self.visible.read().await.get(key).copied().unwrap_or(false) {
            return true;
        }
        if let Some(needed) = self.visible_after_reloads.read().await.get(key) {
            return self.reload_count().await >= *needed;
        }
        false
    }
}

#[async_trait]
impl Session for MockSession {
    fn name(&self) -> &str {
        "mock"
    }

    async fn navigate(&self, url: &str) -> Result<(), SessionError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.calls
            .write()
            .await
            .push(RecordedCall::Navigate(url.to_string()));
        *self.url.write().await = url.to_string();
        Ok(())
    }

    async fn reload(&self) -> Result<(), SessionError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.calls.write().await.push(RecordedCall::Reload);
        Ok(())
    }

    async fn current_url(&self) -> Result<String, SessionError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(self.url.read().await.clone())
    }

    async fn fill(&self, locator: &Locator, value: &str) -> Result<(), SessionError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        let key = locator.to_string();
        if !self.lookup_visible(&key).await {
            return Err(SessionError::NotFound(key));
        }
        self.calls
            .write()
            .await
            .push(RecordedCall::Fill(key, value.to_string()));
        Ok(())
    }

    async fn click(&self, locator: &Locator) -> Result<(), SessionError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        let key = locator.to_string();
        if !self.lookup_visible(&key).await {
            return Err(SessionError::NotFound(key));
        }
        self.calls.write().await.push(RecordedCall::Click(key.clone()));

        if let Some(target) = self.reveal_on_click.read().await.get(&key) {
            self.visible.write().await.insert(target.clone(), true);
        }
        if let Some(url) = self.url_on_click.read().await.get(&key) {
            *self.url.write().await = url.clone();
        }
        Ok(())
    }

    async fn is_visible(&self, locator: &Locator) -> Result<bool, SessionError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(self.lookup_visible(&locator.to_string()).await)
    }

    async fn count(&self, locator: &Locator) -> Result<usize, SessionError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(self
            .counts
            .read()
            .await
            .get(&locator.to_string())
            .copied()
            .unwrap_or(0))
    }

    async fn read_texts(&self, locator: &Locator) -> Result<Vec<String>, SessionError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        Ok(self
            .texts
            .read()
            .await
            .get(&locator.to_string())
            .cloned()
            .unwrap_or_default())
    }

    async fn close(&self) -> Result<(), SessionError> {
        if let Some(err) = self.take_error().await {
            return Err(err);
        }
        self.calls.write().await.push(RecordedCall::Close);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_navigate_sets_url() {
        let session = MockSession::new();
        session.navigate("https://example.com/a").await.unwrap();
        assert_eq!(session.current_url().await.unwrap(), "https://example.com/a");
        assert_eq!(
            session.recorded_calls().await,
            vec![RecordedCall::Navigate("https://example.com/a".to_string())]
        );
    }

    #[tokio::test]
    async fn test_click_requires_visibility() {
        let session = MockSession::new();
        let button = Locator::button("Reserve");

        let result = session.click(&button).await;
        assert!(matches!(result, Err(SessionError::NotFound(_))));

        session.set_visible(&button).await;
        session.click(&button).await.unwrap();
        assert_eq!(session.clicks().await, vec![button.to_string()]);
    }

    #[tokio::test]
    async fn test_click_reveals_target() {
        let session = MockSession::new();
        let reserve = Locator::button("Reserve");
        let finish = Locator::button("Finish");
        session.set_visible(&reserve).await;
        session.set_reveal_on_click(&reserve, &finish).await;

        assert!(!session.is_visible(&finish).await.unwrap());
        session.click(&reserve).await.unwrap();
        assert!(session.is_visible(&finish).await.unwrap());
    }

    #[tokio::test]
    async fn test_visible_after_reloads() {
        let session = MockSession::new();
        let button = Locator::button("Reserve");
        session.set_visible_after_reloads(&button, 2).await;

        assert!(!session.is_visible(&button).await.unwrap());
        session.reload().await.unwrap();
        assert!(!session.is_visible(&button).await.unwrap());
        session.reload().await.unwrap();
        assert!(session.is_visible(&button).await.unwrap());
        assert_eq!(session.reload_count().await, 2);
    }

    #[tokio::test]
    async fn test_set_hidden_masks_a_visible_element() {
        let session = MockSession::new();
        let button = Locator::button("Reserve");
        session.set_visible(&button).await;
        assert!(session.is_visible(&button).await.unwrap());

        session.set_hidden(&button).await;
        assert!(!session.is_visible(&button).await.unwrap());
        assert!(matches!(
            session.click(&button).await,
            Err(SessionError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_error_injection_is_consumed() {
        let session = MockSession::new();
        session
            .set_next_error(SessionError::Driver("socket closed".to_string()))
            .await;

        assert!(session.reload().await.is_err());
        assert!(session.reload().await.is_ok());
    }

    #[tokio::test]
    async fn test_absent_elements_read_as_empty() {
        let session = MockSession::new();
        let cards = Locator::xpath("//div");
        assert!(!session.is_visible(&cards).await.unwrap());
        assert_eq!(session.count(&cards).await.unwrap(), 0);
        assert!(session.read_texts(&cards).await.unwrap().is_empty());
    }
}
