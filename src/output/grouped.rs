//! Grouped output formatter
//!
//! Compact per-lesson listing with severity symbols.

use super::{group_by_lesson, OutputFormatter};
use crate::auditor::ContentAuditReport;
use crate::diagnostic::{Diagnostic, Severity};
use colored::*;

/// Formatter that groups findings by lesson
pub struct GroupedFormatter {
    /// Show colors (when supported)
    pub use_colors: bool,
}

impl GroupedFormatter {
    /// Create a new grouped formatter
    pub fn new() -> Self {
        Self { use_colors: true }
    }

    /// Disable colors
    pub fn without_colors(mut self) -> Self {
        self.use_colors = false;
        self
    }

    fn severity_symbol(&self, severity: Severity) -> String {
        let symbol = match severity {
            Severity::Error => "[E]",
            Severity::Warning => "[W]",
        };
        if !self.use_colors {
            return symbol.to_string();
        }
        match severity {
            Severity::Error => symbol.red().to_string(),
            Severity::Warning => symbol.yellow().to_string(),
        }
    }
}

impl Default for GroupedFormatter {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputFormatter for GroupedFormatter {
    fn format(&self, report: &ContentAuditReport) -> String {
        let mut output = String::new();

        for (lesson, entries) in group_by_lesson(report) {
            output.push_str(&format!("\n{}\n", lesson));
            output.push_str(&format!(
                "{}\n",
                "─".repeat(lesson.chars().count().min(80))
            ));

            for entry in entries {
                for diag in entry.diagnostics() {
                    output.push_str(&self.format_diagnostic(diag));
                }
            }
        }

        let summary = &report.summary;
        if summary.total_errors + summary.total_warnings > 0 {
            output.push_str(&format!(
                "\n{} error(s), {} warning(s) in {} unit(s)\n",
                summary.total_errors, summary.total_warnings, summary.total_checked
            ));
        }

        output
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let mut line = format!(
            "  {} {}: {} ({})",
            self.severity_symbol(diagnostic.severity),
            diagnostic.location,
            diagnostic.message,
            diagnostic.rule_id
        );
        if diagnostic.occurrences > 1 {
            line.push_str(&format!(" x{}", diagnostic.occurrences));
        }
        line.push('\n');
        line
    }
}
