//! GitHub Actions output formatter
//!
//! Outputs findings in GitHub Actions workflow command format:
//! ::error title={rule}::{content_id}#{field}: {message}

use super::OutputFormatter;
use crate::auditor::ContentAuditReport;
use crate::diagnostic::{Diagnostic, Severity};

/// Formatter for GitHub Actions annotations
pub struct GithubFormatter {
    /// Whether to include summary
    pub show_summary: bool,
}

impl GithubFormatter {
    /// Create a new GitHub formatter
    pub fn new() -> Self {
        Self { show_summary: true }
    }

    /// Disable summary output
    pub fn without_summary(mut self) -> Self {
        self.show_summary = false;
        self
    }
}

impl Default for GithubFormatter {
    fn default() -> Self {
        Self::new()
    }
}

fn escape_data(s: &str) -> String {
    s.replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

impl OutputFormatter for GithubFormatter {
    fn format(&self, report: &ContentAuditReport) -> String {
        let mut output = String::new();

        for diag in report.diagnostics() {
            output.push_str(&self.format_diagnostic(diag));
            output.push('\n');
        }

        if self.show_summary {
            let summary = &report.summary;
            output.push_str(&format!(
                "::notice::Grammar audit complete: {} error(s), {} warning(s) in {} unit(s)\n",
                summary.total_errors, summary.total_warnings, summary.total_checked
            ));

            if !summary.by_rule_id.is_empty() {
                output.push_str("::group::Findings by rule\n");
                for (rule_id, count) in &summary.by_rule_id {
                    output.push_str(&format!("{}: {}\n", rule_id, count));
                }
                output.push_str("::endgroup::\n");
            }
        }

        output
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        let level = match diagnostic.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };

        let mut message = format!("{}: {}", diagnostic.location, diagnostic.message);
        if diagnostic.occurrences > 1 {
            message.push_str(&format!(" ({} occurrences)", diagnostic.occurrences));
        }

        format!(
            "::{} title={}::{}",
            level,
            diagnostic.rule_id,
            escape_data(&message)
        )
    }
}
