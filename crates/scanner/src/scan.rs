//! The scan cycle: walk a root, pick the single best candidate, click it.

use autopilot_protocol::ClickReport;

use crate::keywords::{CONFIDENT_SCORE, MAX_DEPTH, STYLE_CHECK_THRESHOLD};
use crate::score::{is_blacklisted, is_editor_chrome, is_mid_accept, keyword_score};
use crate::tree::{ScanElement, ScanRoot};

/// Longest text snippet carried in a [`ClickReport`].
const SNIPPET_LEN: usize = 60;

struct Candidate<'a> {
    element: &'a dyn ScanElement,
    report: ClickReport,
}

/// Runs one scan cycle against `root`.
///
/// Walks the whole tree (nested frames and shadow roots included, bounded at
/// [`MAX_DEPTH`]), keeps the single highest-scoring surviving element, clicks
/// it, and returns its descriptor. Returns `None` when nothing qualifies.
/// Stateless: a repeated scan over an unchanged tree yields the same result.
pub fn run_scan(root: &dyn ScanRoot) -> Option<ClickReport> {
    let best = best_candidate(root, 0)?;
    best.element.click();
    Some(best.report)
}

fn best_candidate(root: &dyn ScanRoot, depth: usize) -> Option<Candidate<'_>> {
    if depth > MAX_DEPTH {
        return None;
    }

    let mut best: Option<Candidate> = None;
    for element in root.elements() {
        if let Some(candidate) = evaluate(element) {
            if best
                .as_ref()
                .is_none_or(|b| candidate.report.score > b.report.score)
            {
                best = Some(candidate);
            }
        }
    }

    // Sub-results only replace the running best when strictly better.
    for child in root.child_roots() {
        if let Some(candidate) = best_candidate(child, depth + 1) {
            if best
                .as_ref()
                .is_none_or(|b| candidate.report.score > b.report.score)
            {
                best = Some(candidate);
            }
        }
    }

    best
}

fn evaluate(element: &dyn ScanElement) -> Option<Candidate<'_>> {
    if !element.is_on_screen() {
        return None;
    }

    let text = element.text();
    let label = element.label();
    let title = element.title();

    // Blacklist precedes scoring: a "Discard" button whose tooltip mentions
    // "accept" must never become a candidate.
    if is_blacklisted(text, label, title) {
        return None;
    }

    let score = keyword_score(text, label, title);
    if score == 0 {
        return None;
    }

    // Style reads are the expensive part; only confirmed keyword matches
    // reach this point.
    if score >= STYLE_CHECK_THRESHOLD {
        let style = element.computed_style()?;
        if style.hidden() {
            return None;
        }
        let interactive = style.cursor_pointer
            || style.parent_cursor_pointer
            || element.is_native_button()
            || score >= CONFIDENT_SCORE;
        if !interactive {
            return None;
        }
    }

    if is_editor_chrome(element.classes()) {
        return None;
    }
    if is_mid_accept(text, label) {
        return None;
    }

    Some(Candidate {
        element,
        report: ClickReport {
            tag: element.tag().to_lowercase(),
            text: text.trim().chars().take(SNIPPET_LEN).collect(),
            label: label.map(str::to_string),
            title: title.map(str::to_string),
            score,
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{ComputedStyle, SimElement, SimRoot};

    #[test]
    fn exact_accept_all_with_pointer_is_clicked_at_100() {
        let root = SimRoot::new()
            .with_element(SimElement::new("button", "Accept all").pointer_cursor());

        let report = run_scan(&root).expect("candidate");
        assert_eq!(report.score, 100);
        assert_eq!(report.tag, "button");
        assert_eq!(
            root.element(0).dispatched_events(),
            vec!["mousedown", "mouseup", "click"]
        );
    }

    #[test]
    fn accept_beats_apply() {
        let root = SimRoot::new()
            .with_element(SimElement::new("a", "Apply").pointer_cursor())
            .with_element(SimElement::new("a", "Accept").pointer_cursor());

        let report = run_scan(&root).expect("candidate");
        assert_eq!(report.score, 80);
        assert_eq!(report.text, "Accept");
        assert!(!root.element(0).was_clicked());
        assert!(root.element(1).was_clicked());
    }

    #[test]
    fn statusbar_chrome_is_rejected_despite_matching_text() {
        let root = SimRoot::new().with_element(
            SimElement::new("div", "Accept All Changes")
                .with_classes("statusbar-item left")
                .pointer_cursor(),
        );

        assert!(run_scan(&root).is_none());
        assert!(!root.element(0).was_clicked());
    }

    #[test]
    fn blacklisted_text_is_never_scored_even_with_allowed_keyword() {
        let root = SimRoot::new().with_element(
            SimElement::new("button", "Accept and delete original").pointer_cursor(),
        );

        assert!(run_scan(&root).is_none());
        // Blacklist fires before scoring, so no style read happens either.
        assert_eq!(root.element(0).style_read_count(), 0);
    }

    #[test]
    fn zero_score_elements_skip_the_style_check() {
        let root = SimRoot::new()
            .with_element(SimElement::new("div", "Some random toolbar text"))
            .with_element(SimElement::new("button", "Accept").pointer_cursor());

        run_scan(&root).expect("candidate");
        assert_eq!(root.element(0).style_read_count(), 0);
        assert_eq!(root.element(1).style_read_count(), 1);
    }

    #[test]
    fn scan_is_idempotent_without_tree_changes() {
        let root = SimRoot::new()
            .with_element(SimElement::new("button", "Accept all").pointer_cursor());

        let first = run_scan(&root).expect("candidate");
        let second = run_scan(&root).expect("candidate");
        assert_eq!(first, second);
    }

    #[test]
    fn off_screen_elements_are_skipped() {
        let root = SimRoot::new()
            .with_element(SimElement::new("button", "Accept all").pointer_cursor().off_screen());

        assert!(run_scan(&root).is_none());
    }

    #[test]
    fn hidden_style_rejects_candidate() {
        for style in [
            ComputedStyle { visibility_hidden: true, cursor_pointer: true, ..Default::default() },
            ComputedStyle { display_none: true, cursor_pointer: true, ..Default::default() },
            ComputedStyle { opacity_zero: true, cursor_pointer: true, ..Default::default() },
        ] {
            let root = SimRoot::new()
                .with_element(SimElement::new("button", "Accept all").with_style(style));
            assert!(run_scan(&root).is_none());
        }
    }

    #[test]
    fn non_interactive_mid_score_is_rejected() {
        // "accept all" buried in longer text scores 65: no pointer, no native
        // button, below the confident override.
        let root = SimRoot::new()
            .with_element(SimElement::new("div", "Click to accept all pending edits"));

        assert!(run_scan(&root).is_none());
    }

    #[test]
    fn confident_score_overrides_missing_pointer_cursor() {
        let root = SimRoot::new().with_element(SimElement::new("div", "Accept all"));

        let report = run_scan(&root).expect("candidate");
        assert_eq!(report.score, 100);
    }

    #[test]
    fn native_button_counts_as_interactive() {
        // 65 needs interactivity evidence; a real button provides it.
        let root = SimRoot::new()
            .with_element(SimElement::new("button", "Click to accept all edits").native_button());

        assert_eq!(run_scan(&root).expect("candidate").score, 65);
    }

    #[test]
    fn unreadable_style_is_treated_as_non_interactive() {
        let root = SimRoot::new()
            .with_element(SimElement::new("button", "Accept all").unreadable_style());

        assert!(run_scan(&root).is_none());
    }

    #[test]
    fn transitional_accepting_label_is_rejected() {
        let root = SimRoot::new()
            .with_element(SimElement::new("button", "Accepting…").with_label("Accept all"));

        assert!(run_scan(&root).is_none());
    }

    #[test]
    fn nested_root_result_replaces_weaker_outer_candidate() {
        let frame = SimRoot::new()
            .with_element(SimElement::new("button", "Accept all").pointer_cursor());
        let root = SimRoot::new()
            .with_element(SimElement::new("a", "Apply").pointer_cursor())
            .with_child_root(frame);

        let report = run_scan(&root).expect("candidate");
        assert_eq!(report.score, 100);
        assert!(!root.element(0).was_clicked());
        assert!(root.child(0).element(0).was_clicked());
    }

    #[test]
    fn nested_tie_does_not_replace_outer_candidate() {
        let frame = SimRoot::new()
            .with_element(SimElement::new("a", "Accept").pointer_cursor());
        let root = SimRoot::new()
            .with_element(SimElement::new("a", "Accept").pointer_cursor())
            .with_child_root(frame);

        run_scan(&root).expect("candidate");
        assert!(root.element(0).was_clicked());
        assert!(!root.child(0).element(0).was_clicked());
    }

    #[test]
    fn recursion_stops_at_depth_limit() {
        let mut inner = SimRoot::new()
            .with_element(SimElement::new("button", "Accept all").pointer_cursor());
        for _ in 0..crate::keywords::MAX_DEPTH + 1 {
            inner = SimRoot::new().with_child_root(inner);
        }

        assert!(run_scan(&inner).is_none());
    }

    #[test]
    fn only_the_winner_is_clicked() {
        let root = SimRoot::new()
            .with_element(SimElement::new("button", "Accept all").pointer_cursor())
            .with_element(SimElement::new("button", "Accept").pointer_cursor())
            .with_element(SimElement::new("button", "Apply").pointer_cursor());

        run_scan(&root).expect("candidate");
        let clicked = (0..3).filter(|&i| root.element(i).was_clicked()).count();
        assert_eq!(clicked, 1);
    }

    #[test]
    fn label_match_on_icon_button_scores_95() {
        let root = SimRoot::new().with_element(
            SimElement::new("div", "").with_label("Accept All").pointer_cursor(),
        );

        let report = run_scan(&root).expect("candidate");
        assert_eq!(report.score, 95);
        assert_eq!(report.label.as_deref(), Some("Accept All"));
    }
}
