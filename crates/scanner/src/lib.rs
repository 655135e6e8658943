//! Heuristic detection and clicking of "accept suggestion" buttons.
//!
//! The heuristic is defined once, as pure functions over an abstract element
//! tree ([`tree::ScanRoot`] / [`tree::ScanElement`]), and mirrored into a
//! JavaScript payload ([`script::scan_script`]) that runs inside a debuggable
//! page. Both sides share the same keyword tables and score ladder from
//! [`keywords`], so the in-memory model in [`tree`] is a testable mirror of
//! what the in-page script does.
//!
//! No I/O happens in this crate. Sending the payload over a debug session and
//! reading back the [`ClickReport`] is `autopilot-runtime`'s job.

pub mod keywords;
pub mod scan;
pub mod score;
pub mod script;
pub mod tree;

pub use autopilot_protocol::ClickReport;
pub use scan::run_scan;
pub use script::{inspect_script, scan_script};
pub use tree::{ComputedStyle, ScanElement, ScanRoot, SimElement, SimRoot};
