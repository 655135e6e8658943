//! Keyword tables and score ladder shared by the Rust heuristic and the
//! generated in-page script.

/// Recursion ceiling for the tree walk. Deeply nested frame/shadow chains
/// past this depth are ignored rather than risked.
pub const MAX_DEPTH: usize = 20;

/// Exact visible text "accept all".
pub const SCORE_EXACT_ACCEPT_ALL: u8 = 100;
/// Exact accessible-label or title match on one of [`LABEL_MATCHES`].
pub const SCORE_LABEL_MATCH: u8 = 95;
/// Visible text starting with "accept all".
pub const SCORE_PREFIX_ACCEPT_ALL: u8 = 90;
/// Exact visible text "accept".
pub const SCORE_EXACT_ACCEPT: u8 = 80;
/// Exact visible text "apply".
pub const SCORE_EXACT_APPLY: u8 = 75;
/// Visible text containing "accept all" somewhere.
pub const SCORE_CONTAINS_ACCEPT_ALL: u8 = 65;

/// Scores at or above this trigger the computed-style check; anything below
/// is rejected without touching styles at all.
pub const STYLE_CHECK_THRESHOLD: u8 = 60;

/// Scores at or above this are confident enough to override ambiguous
/// cursor styling when deciding interactivity.
pub const CONFIDENT_SCORE: u8 = 90;

/// Substrings that disqualify an element outright, checked against text,
/// accessible label and title before any scoring. These mark structural or
/// destructive UI that must never be auto-clicked.
pub const BLACKLIST: &[&str] = &[
    "discard",
    "cancel",
    "delete",
    "reject",
    "deny",
    "dismiss",
    "close",
    "undo",
    "revert",
    "stop",
    "history",
    "chat",
    "agent",
    "settings",
    "terminal",
    "output",
    "problems",
    "search",
];

/// Accessible-label / title values that identify an acceptance control even
/// when the visible text is an icon or empty.
pub const LABEL_MATCHES: &[&str] = &["accept", "accept all", "apply"];

/// Class-attribute substrings marking editor chrome (never action buttons).
/// Tab containers are handled separately by whole-token matching so that
/// e.g. "table" is not swept up.
pub const CHROME_CLASS_HINTS: &[&str] = &["statusbar", "status-bar", "breadcrumb"];

/// A button already mid-acceptance shows this transitional label; clicking
/// it again would double-apply.
pub const TRANSITIONAL_HINT: &str = "accepting";

/// Substrings the diagnostic (inspect) scan reports on, regardless of score.
pub const DIAGNOSTIC_KEYWORDS: &[&str] = &["accept", "apply", "review"];

/// How long the confirmation outline stays on a clicked element.
pub const OUTLINE_DURATION_MS: u32 = 500;
