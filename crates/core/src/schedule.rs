//! Schedule URL construction and class card matching.

use crate::config::SiteConfig;

/// Build the schedule page URL for one selected date.
///
/// Query parameters are emitted in the order the site's own links use:
/// `teamMemberView` (when enabled), `mode`, `selectedDate`, `interest`,
/// `location`. Values are percent-encoded, spaces included.
pub fn build_schedule_url(site: &SiteConfig, selected_date: &str) -> String {
    let mut params: Vec<(&str, &str)> = Vec::with_capacity(5);
    if site.team_member_view {
        params.push(("teamMemberView", "true"));
    }
    params.push(("mode", &site.mode));
    params.push(("selectedDate", selected_date));
    params.push(("interest", &site.interest));
    params.push(("location", &site.location));

    let query = params
        .iter()
        .map(|(key, value)| format!("{}={}", key, urlencoding::encode(value)))
        .collect::<Vec<_>>()
        .join("&");

    format!("{}?{}", site.club_path.trim_end_matches('/'), query)
}

/// True iff every required string is a literal substring of `card_text`.
///
/// Matching is exact: no case folding and no whitespace collapsing, so the
/// configured strings must reproduce the rendered tile text verbatim,
/// including time formatting like `3:30 PM`. An empty set matches any card.
pub fn card_matches(card_text: &str, must_include: &[String]) -> bool {
    must_include.iter().all(|s| card_text.contains(s.as_str()))
}

/// One-line form of a card's multi-line tile text, for log output.
pub fn card_summary(card_text: &str) -> String {
    card_text.replace('\n', " | ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_site() -> SiteConfig {
        SiteConfig::default()
    }

    #[test]
    fn test_build_schedule_url_includes_selected_date() {
        let url = build_schedule_url(&test_site(), "2026-03-02");
        assert!(url.starts_with(
            "https://my.lifetime.life/clubs/va/fairfax/classes.html?"
        ));
        assert!(url.contains("selectedDate=2026-03-02"));
        assert!(url.contains("mode=week"));
        assert!(url.contains("teamMemberView=true"));
    }

    #[test]
    fn test_build_schedule_url_percent_encodes_multi_word_values() {
        let url = build_schedule_url(&test_site(), "2026-03-02");
        assert!(url.contains("interest=Pickleball%20Open%20Play"));
        assert!(url.contains("location=Fairfax"));
        assert!(!url.contains(' '));
    }

    #[test]
    fn test_build_schedule_url_without_team_member_view() {
        let site = SiteConfig {
            team_member_view: false,
            ..test_site()
        };
        let url = build_schedule_url(&site, "2026-03-02");
        assert!(!url.contains("teamMemberView"));
        assert!(url.contains("selectedDate=2026-03-02"));
    }

    #[test]
    fn test_card_matches_requires_every_substring() {
        let text = "8:00 AM - 10:00 AM\nPickleball Open Play: All Levels\nCourt 5";
        let all = vec![
            "8:00".to_string(),
            "10:00".to_string(),
            "Pickleball Open Play".to_string(),
        ];
        assert!(card_matches(text, &all));

        let missing = vec!["8:00".to_string(), "Advanced".to_string()];
        assert!(!card_matches(text, &missing));
    }

    #[test]
    fn test_card_matches_is_case_sensitive() {
        let text = "Pickleball Open Play";
        assert!(!card_matches(text, &["pickleball".to_string()]));
        assert!(card_matches(text, &["Pickleball".to_string()]));
    }

    #[test]
    fn test_card_matches_empty_set_is_vacuously_true() {
        assert!(card_matches("anything at all", &[]));
        assert!(card_matches("", &[]));
    }

    #[test]
    fn test_card_matches_order_insensitive() {
        let text = "Pickleball Open Play 3:30 PM";
        let reversed = vec!["3:30 PM".to_string(), "Pickleball".to_string()];
        assert!(card_matches(text, &reversed));
    }

    #[test]
    fn test_card_summary_flattens_to_one_line() {
        let text = "8:00 - 10:00 AM\nPickleball Open Play: All Levels\nFairfax";
        assert_eq!(
            card_summary(text),
            "8:00 - 10:00 AM | Pickleball Open Play: All Levels | Fairfax"
        );
        assert_eq!(card_summary("already flat"), "already flat");
    }
}
