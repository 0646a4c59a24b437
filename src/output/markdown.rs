//! Markdown reviewer document
//!
//! One table per lesson plus a summary. The body carries no timestamps so
//! successive audits diff cleanly.

use super::{group_by_lesson, OutputFormatter};
use crate::auditor::ContentAuditReport;
use crate::diagnostic::Diagnostic;

const TABLE_HEADER: &str = "| Content | Field | Severity | Rule | Expected | Actual | Count |\n\
                            |---|---|---|---|---|---|---|\n";

#[derive(Default)]
pub struct MarkdownFormatter {
    /// Document title
    pub title: Option<String>,
}

impl MarkdownFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }
}

/// Make a value safe inside a table cell
fn cell(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('|', "\\|")
        .replace('\n', " ")
}

/// Code span whose fence is longer than any backtick run in the value
fn optional_cell(value: Option<&str>) -> String {
    let Some(value) = value else {
        return "-".to_string();
    };
    let value = cell(value);
    let longest_run = value.split(|c: char| c != '`').map(str::len).max().unwrap_or(0);
    let fence = "`".repeat(longest_run + 1);
    let pad = if value.starts_with('`') || value.ends_with('`') {
        " "
    } else {
        ""
    };
    format!("{fence}{pad}{value}{pad}{fence}")
}

impl OutputFormatter for MarkdownFormatter {
    fn format(&self, report: &ContentAuditReport) -> String {
        let mut output = format!(
            "# {}\n\n",
            self.title.as_deref().unwrap_or("Grammar Audit Report")
        );

        let groups = group_by_lesson(report);
        if groups.is_empty() {
            output.push_str("No agreement problems found.\n\n");
        }

        for (lesson, entries) in groups {
            output.push_str(&format!("## {}\n\n", cell(lesson)));
            output.push_str(TABLE_HEADER);
            for entry in entries {
                for diag in entry.diagnostics() {
                    output.push_str(&self.format_diagnostic(diag));
                    output.push('\n');
                }
            }
            output.push('\n');
        }

        let summary = &report.summary;
        output.push_str("## Summary\n\n| Metric | Value |\n|---|---|\n");
        output.push_str(&format!("| Units checked | {} |\n", summary.total_checked));
        output.push_str(&format!("| Errors | {} |\n", summary.total_errors));
        output.push_str(&format!("| Warnings | {} |\n", summary.total_warnings));
        output.push_str(&format!("| Occurrences | {} |\n", summary.total_occurrences));

        if !summary.by_rule_id.is_empty() {
            output.push_str("\n| Rule | Findings |\n|---|---|\n");
            for (rule_id, count) in &summary.by_rule_id {
                output.push_str(&format!("| {} | {} |\n", rule_id, count));
            }
        }

        output
    }

    fn format_diagnostic(&self, diag: &Diagnostic) -> String {
        format!(
            "| {} | {} | {} | {} | {} | {} | {} |",
            cell(&diag.location.content_id),
            cell(&diag.location.field),
            diag.severity,
            diag.rule_id,
            optional_cell(diag.expected.as_deref()),
            optional_cell(diag.actual.as_deref()),
            diag.occurrences
        )
    }
}
