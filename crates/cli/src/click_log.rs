//! Append-only log of accepted suggestions.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use autopilot_scanner::ClickReport;

/// Writes one human-readable line per click. The file is opened per append
/// so the log survives daemon restarts and external truncation.
pub struct ClickLog {
    path: PathBuf,
}

impl ClickLog {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn append(&self, session: &str, report: &ClickReport) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let stamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
        writeln!(
            file,
            "[{stamp}] {session} <{tag}> \"{text}\" (score {score})",
            tag = report.tag,
            text = report.text,
            score = report.score,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(text: &str, score: u8) -> ClickReport {
        ClickReport {
            tag: "div".into(),
            text: text.into(),
            label: None,
            title: None,
            score,
        }
    }

    #[test]
    fn appends_one_line_per_click() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clicks.log");
        let log = ClickLog::new(path.clone());

        log.append("9000:A", &report("Accept all", 100)).unwrap();
        log.append("9000:B", &report("Accept", 80)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("9000:A <div> \"Accept all\" (score 100)"));
        assert!(lines[1].contains("9000:B <div> \"Accept\" (score 80)"));
    }

    #[test]
    fn survives_external_truncation() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clicks.log");
        let log = ClickLog::new(path.clone());

        log.append("9000:A", &report("Accept", 80)).unwrap();
        std::fs::write(&path, "").unwrap();
        log.append("9000:A", &report("Apply", 75)).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.contains("Apply"));
    }
}
