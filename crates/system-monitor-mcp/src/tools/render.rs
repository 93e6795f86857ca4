//! Shared pieces of the plain-text tool reports.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use system_monitor::format::format_timestamp;

const DIVIDER: &str = "━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━";

/// A text report built section by section.
pub(crate) struct Report {
    out: String,
}

impl Report {
    pub(crate) fn new(title: &str) -> Self {
        let mut report = Self { out: String::new() };
        report.section(title);
        report
    }

    /// Start a titled section. Sections after the first are separated by a blank line.
    pub(crate) fn section(&mut self, title: &str) -> &mut Self {
        if !self.out.is_empty() {
            self.out.push('\n');
        }
        let _ = writeln!(self.out, "{title}");
        let _ = writeln!(self.out, "{DIVIDER}");
        self
    }

    pub(crate) fn field(&mut self, label: &str, value: impl std::fmt::Display) -> &mut Self {
        let _ = writeln!(self.out, "{label}: {value}");
        self
    }

    pub(crate) fn line(&mut self, text: impl std::fmt::Display) -> &mut Self {
        let _ = writeln!(self.out, "{text}");
        self
    }

    pub(crate) fn finish(mut self, updated: &DateTime<Utc>) -> String {
        let _ = writeln!(self.out, "\n📅 Updated: {}", format_timestamp(updated));
        self.out
    }
}
