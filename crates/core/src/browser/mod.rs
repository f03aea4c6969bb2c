//! Browser interaction: the capability trait the orchestrator drives, the
//! target site's selector contract, and the WebDriver backend.

pub mod selectors;
mod traits;
mod webdriver;

pub use traits::{Locator, Session, SessionError};
pub use webdriver::WebDriverSession;
