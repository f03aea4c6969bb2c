//! The target site's DOM contract: selectors, labels, and the XPath
//! builders for addressing schedule cards by position.
//!
//! Everything here is tied to one specific site layout. When the site
//! changes its markup, this file is where the bot gets fixed.

/// Username field on the login page.
pub const USERNAME_FIELD: &str = "#account-username";

/// Password field on the login page.
pub const PASSWORD_FIELD: &str = "input[type='password']";

/// Submit button on the login page.
pub const LOGIN_SUBMIT: &str = "button[type='submit']";

/// URL fragment identifying the login page. Once the browser leaves a URL
/// containing this, the login has settled.
pub const LOGIN_PATH_FRAGMENT: &str = "login.html";

/// Any class tile on the schedule grid.
pub const SCHEDULE_CELL: &str = "[data-testid='classCell']";

/// Day columns of the schedule grid, one per weekday.
pub const DAY_COLUMNS: &str = "div.calendar > div.day";

/// Label of the reserve button on the details page.
pub const RESERVE_LABEL: &str = "Reserve";

/// Label of the confirmation button that follows Reserve.
pub const FINISH_LABEL: &str = "Finish";

/// Label fragment of the waitlist button shown when the class is full.
pub const WAITLIST_LABEL: &str = "Waitlist";

/// Label fragment of the cookie-consent accept button.
pub const COOKIE_ACCEPT_LABEL: &str = "Accept All";

// XPath equivalent of DAY_COLUMNS; parenthesized so the matched set can
// be indexed positionally, like a locator's nth().
const DAY_COLUMN_XPATH: &str = "//div[contains(concat(' ', normalize-space(@class), ' '), ' calendar ')]\
/div[contains(concat(' ', normalize-space(@class), ' '), ' day ')]";

/// XPath for every class cell inside one day column (0-based index).
pub fn day_cards(day_index: usize) -> String {
    format!(
        "({})[{}]//*[@data-testid='classCell']",
        DAY_COLUMN_XPATH,
        day_index + 1
    )
}

/// XPath for the class link inside one card of one day column
/// (both indices 0-based).
pub fn card_link(day_index: usize, card_index: usize) -> String {
    format!(
        "(({})[{}])//*[@data-testid='classLink']",
        day_cards(day_index),
        card_index + 1
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_cards_indexes_from_one() {
        let xpath = day_cards(0);
        assert!(xpath.contains(")[1]"));
        assert!(xpath.ends_with("//*[@data-testid='classCell']"));

        let monday = day_cards(1);
        assert!(monday.contains(")[2]"));
    }

    #[test]
    fn test_card_link_nests_both_indices() {
        let xpath = card_link(1, 0);
        // Day column index 2, card index 1.
        assert!(xpath.contains(")[2]"));
        assert!(xpath.contains(")[1])"));
        assert!(xpath.ends_with("//*[@data-testid='classLink']"));
    }

    #[test]
    fn test_xpath_parentheses_balance() {
        for xpath in [day_cards(3), card_link(6, 7)] {
            let open = xpath.matches('(').count();
            let close = xpath.matches(')').count();
            assert_eq!(open, close, "unbalanced parens in {xpath}");
        }
    }
}
