//! Plain-text rendering of the visible call tree
//!
//! One line per row, indented two spaces per level:
//!
//! ```text
//! 1200ms [-] a()
//!   300ms [25.0%] [+] b()
//! ```

use crate::percentage::display_share;
use crate::view::VisibleRow;
use std::fmt::Write;

/// Text output formatter
#[derive(Debug, Default)]
pub struct TextOutput {
    rows: Vec<VisibleRow>,
    show_severity: bool,
}

impl TextOutput {
    pub fn new(rows: Vec<VisibleRow>) -> Self {
        Self {
            rows,
            show_severity: false,
        }
    }

    /// Append the duration bucket to every line
    pub fn with_severity(mut self, show: bool) -> Self {
        self.show_severity = show;
        self
    }

    fn marker(row: &VisibleRow) -> Option<&'static str> {
        match (row.has_children, row.expanded) {
            (false, _) => None,
            (true, false) => Some("[+]"),
            (true, true) => Some("[-]"),
        }
    }

    fn format_row(&self, row: &VisibleRow) -> String {
        let mut line = format!("{}{}", "  ".repeat(row.depth), row.duration);
        if !row.id.is_root() {
            let _ = write!(line, " [{}]", display_share(row.percent.as_ref()));
        }
        if let Some(marker) = Self::marker(row) {
            let _ = write!(line, " {}", marker);
        }
        let _ = write!(line, " {}", row.name);
        if self.show_severity {
            let _ = write!(line, " ({})", row.severity);
        }
        line
    }

    pub fn to_text(&self) -> String {
        let mut out = String::new();
        for row in &self.rows {
            out.push_str(&self.format_row(row));
            out.push('\n');
        }
        out
    }
}
