//! Text scoring and rejection predicates.
//!
//! The blacklist runs before scoring: an element whose text also contains an
//! allowed keyword is still rejected if any blacklisted term appears.

use crate::keywords::{
    BLACKLIST, CHROME_CLASS_HINTS, LABEL_MATCHES, SCORE_CONTAINS_ACCEPT_ALL, SCORE_EXACT_ACCEPT,
    SCORE_EXACT_ACCEPT_ALL, SCORE_EXACT_APPLY, SCORE_LABEL_MATCH, SCORE_PREFIX_ACCEPT_ALL,
    TRANSITIONAL_HINT,
};

/// Lowercases, trims, and collapses runs of whitespace.
pub fn normalize(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

fn contains_any(haystack: &str, needles: &[&str]) -> bool {
    needles.iter().any(|n| haystack.contains(n))
}

/// True when text, label, or title carries a blacklisted substring.
pub fn is_blacklisted(text: &str, label: Option<&str>, title: Option<&str>) -> bool {
    contains_any(&normalize(text), BLACKLIST)
        || label.is_some_and(|l| contains_any(&normalize(l), BLACKLIST))
        || title.is_some_and(|t| contains_any(&normalize(t), BLACKLIST))
}

/// The score ladder. Zero means "not a candidate"; callers must discard
/// zero-scoring elements before doing any further (style) work.
pub fn keyword_score(text: &str, label: Option<&str>, title: Option<&str>) -> u8 {
    let text = normalize(text);

    if text == "accept all" {
        return SCORE_EXACT_ACCEPT_ALL;
    }

    let label_hit = |value: Option<&str>| {
        value.is_some_and(|v| LABEL_MATCHES.contains(&normalize(v).as_str()))
    };
    if label_hit(label) || label_hit(title) {
        return SCORE_LABEL_MATCH;
    }

    if text.starts_with("accept all") {
        return SCORE_PREFIX_ACCEPT_ALL;
    }
    if text == "accept" {
        return SCORE_EXACT_ACCEPT;
    }
    if text == "apply" {
        return SCORE_EXACT_APPLY;
    }
    if text.contains("accept all") {
        return SCORE_CONTAINS_ACCEPT_ALL;
    }

    0
}

/// Rejects status-bar, tab, and breadcrumb chrome by class hint. Tabs are
/// matched on whole class tokens so "table"/"tabindex-holder" survive.
pub fn is_editor_chrome(classes: &str) -> bool {
    let classes = normalize(classes);
    if contains_any(&classes, CHROME_CLASS_HINTS) {
        return true;
    }
    classes
        .split(' ')
        .any(|token| token == "tab" || token == "tabs" || token.starts_with("tab-"))
}

/// True for a button already showing its transitional "accepting…" label.
pub fn is_mid_accept(text: &str, label: Option<&str>) -> bool {
    normalize(text).contains(TRANSITIONAL_HINT)
        || label.is_some_and(|l| normalize(l).contains(TRANSITIONAL_HINT))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace_and_case() {
        assert_eq!(normalize("  Accept\n  All  "), "accept all");
    }

    #[test]
    fn score_ladder() {
        assert_eq!(keyword_score("Accept all", None, None), 100);
        assert_eq!(keyword_score("", Some("Accept"), None), 95);
        assert_eq!(keyword_score("", None, Some("apply")), 95);
        assert_eq!(keyword_score("Accept all changes", None, None), 90);
        assert_eq!(keyword_score("Accept", None, None), 80);
        assert_eq!(keyword_score("Apply", None, None), 75);
        assert_eq!(keyword_score("Click to accept all edits", None, None), 65);
        assert_eq!(keyword_score("Run command", None, None), 0);
    }

    #[test]
    fn exact_accept_all_text_beats_label_match() {
        assert_eq!(keyword_score("Accept all", Some("apply"), None), 100);
    }

    #[test]
    fn blacklist_applies_to_all_three_fields() {
        assert!(is_blacklisted("Discard changes", None, None));
        assert!(is_blacklisted("Accept", Some("close panel"), None));
        assert!(is_blacklisted("Accept", None, Some("Chat history")));
        assert!(!is_blacklisted("Accept all", Some("Accept all"), None));
    }

    #[test]
    fn chrome_detection_matches_tokens_not_substrings() {
        assert!(is_editor_chrome("statusbar-item"));
        assert!(is_editor_chrome("monaco-breadcrumb"));
        assert!(is_editor_chrome("tab active"));
        assert!(is_editor_chrome("tabs-container"));
        assert!(is_editor_chrome("tab-label"));
        assert!(!is_editor_chrome("editor-table"));
        assert!(!is_editor_chrome("action-button"));
    }

    #[test]
    fn transitional_label_detected() {
        assert!(is_mid_accept("Accepting…", None));
        assert!(is_mid_accept("", Some("Accepting all changes")));
        assert!(!is_mid_accept("Accept all", None));
    }
}
