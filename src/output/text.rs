//! Human-readable text output formatter

use super::{group_by_lesson, plural, OutputFormatter};
use crate::auditor::ContentAuditReport;
use crate::diagnostic::{Diagnostic, Severity};
use colored::*;

/// Text formatter with optional color support
pub struct TextFormatter {
    /// Enable colored output
    pub colored: bool,

    /// Show expected/actual forms under each finding
    pub show_forms: bool,

    /// Show statistics
    pub show_stats: bool,
}

impl Default for TextFormatter {
    fn default() -> Self {
        Self {
            colored: true,
            show_forms: true,
            show_stats: true,
        }
    }
}

impl TextFormatter {
    /// Create a new text formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Disable colors
    pub fn without_color(mut self) -> Self {
        self.colored = false;
        self
    }

    fn severity_str(&self, severity: Severity) -> ColoredString {
        let s = format!("{}", severity);
        if !self.colored {
            return s.normal();
        }
        match severity {
            Severity::Error => s.red().bold(),
            Severity::Warning => s.yellow().bold(),
        }
    }

    fn paint(&self, s: String, f: fn(ColoredString) -> ColoredString) -> String {
        if self.colored {
            f(s.normal()).to_string()
        } else {
            s
        }
    }
}

impl OutputFormatter for TextFormatter {
    fn format(&self, report: &ContentAuditReport) -> String {
        let mut output = String::new();

        for (lesson, entries) in group_by_lesson(report) {
            if self.colored {
                output.push_str(&format!("{}\n", lesson.underline()));
            } else {
                output.push_str(&format!("{}\n", lesson));
            }

            for entry in entries {
                for diag in entry.diagnostics() {
                    output.push_str(&self.format_diagnostic(diag));
                }
            }
            output.push('\n');
        }

        if self.show_stats {
            let summary = &report.summary;
            output.push_str(&format!(
                "{} checked",
                plural(summary.total_checked, "unit")
            ));

            let mut counts = Vec::new();
            if summary.total_errors > 0 {
                counts.push(self.paint(plural(summary.total_errors, "error"), |s| s.red()));
            }
            if summary.total_warnings > 0 {
                counts.push(self.paint(plural(summary.total_warnings, "warning"), |s| {
                    s.yellow()
                }));
            }

            if counts.is_empty() {
                output.push_str(": no agreement problems found");
            } else {
                output.push_str(&format!(": {}", counts.join(", ")));
                if summary.total_occurrences > summary.total_errors + summary.total_warnings {
                    output.push_str(&format!(
                        " ({})",
                        plural(summary.total_occurrences, "occurrence")
                    ));
                }
            }
            output.push('\n');
        }

        output
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        let mut output = String::new();

        let count = if diag.occurrences > 1 {
            format!(" (x{})", diag.occurrences)
        } else {
            String::new()
        };
        output.push_str(&format!(
            "  {}: {}[{}]: {}{}\n",
            diag.location,
            self.severity_str(diag.severity),
            self.paint(diag.rule_id.to_string(), |s| s.cyan()),
            diag.message,
            count
        ));

        if self.show_forms && (diag.expected.is_some() || diag.actual.is_some()) {
            let arrow = self.paint("=".to_string(), |s| s.blue());
            if let Some(expected) = &diag.expected {
                output.push_str(&format!(
                    "     {} expected: {}\n",
                    arrow,
                    self.paint(expected.clone(), |s| s.green())
                ));
            }
            if let Some(actual) = &diag.actual {
                output.push_str(&format!("     {} actual:   {}\n", arrow, actual));
            }
        }

        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sample_report;

    #[test]
    fn test_format_diagnostic() {
        let formatter = TextFormatter::new().without_color();
        let report = sample_report();
        let diag = &report.entries[0].errors[0];

        let output = formatter.format_diagnostic(diag);
        assert!(output.contains("l2-p1#phrases[2].adjective"));
        assert!(output.contains("error[AGREEMENT_MISMATCH]"));
        assert!(output.contains("(x3)"));
        assert!(output.contains("expected: голема"));
        assert!(output.contains("actual:   голем"));
    }

    #[test]
    fn test_format_report() {
        let formatter = TextFormatter::new().without_color();
        let output = formatter.format(&sample_report());

        let lesson2 = output.find("lesson-2").unwrap();
        let lesson1 = output.find("lesson-1").unwrap();
        assert!(lesson2 < lesson1);
        assert!(output.contains("4 units checked: 2 errors, 1 warning (5 occurrences)"));
        assert!(!output.contains('\u{1b}'));
    }

    #[test]
    fn test_clean_report() {
        let formatter = TextFormatter::new().without_color();
        let output = formatter.format(&ContentAuditReport::default());
        assert_eq!(output, "0 units checked: no agreement problems found\n");
    }
}
