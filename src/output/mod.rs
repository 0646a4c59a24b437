//! Output formatters for audit reports

mod github;
mod grouped;
mod json;
mod markdown;
mod text;

pub use github::GithubFormatter;
pub use grouped::GroupedFormatter;
pub use json::JsonFormatter;
pub use markdown::MarkdownFormatter;
pub use text::TextFormatter;

use crate::auditor::{ContentAuditEntry, ContentAuditReport};
use crate::config::OutputFormat;
use crate::diagnostic::Diagnostic;

/// Output formatter trait
pub trait OutputFormatter: Send + Sync {
    /// Format the entire report
    fn format(&self, report: &ContentAuditReport) -> String;

    /// Format a single diagnostic
    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String;
}

/// Settings shared by the formatter constructors
#[derive(Debug, Clone)]
pub struct FormatOptions {
    pub colored: bool,
    pub statistics: bool,
    /// Markdown document title
    pub title: Option<String>,
    /// Seconds since the epoch, placed outside the report body
    pub generated_at: Option<String>,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            colored: false,
            statistics: true,
            title: None,
            generated_at: None,
        }
    }
}

/// Build the formatter for a configured output format
pub fn create_formatter(format: OutputFormat, options: &FormatOptions) -> Box<dyn OutputFormatter> {
    match format {
        OutputFormat::Text => {
            let mut formatter = TextFormatter::new();
            if !options.colored {
                formatter = formatter.without_color();
            }
            formatter.show_stats = options.statistics;
            Box::new(formatter)
        }
        OutputFormat::Markdown => match &options.title {
            Some(title) => Box::new(MarkdownFormatter::new().with_title(title)),
            None => Box::new(MarkdownFormatter::new()),
        },
        OutputFormat::Grouped => {
            let formatter = GroupedFormatter::new();
            if options.colored {
                Box::new(formatter)
            } else {
                Box::new(formatter.without_colors())
            }
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new().pretty();
            match &options.generated_at {
                Some(stamp) => Box::new(formatter.with_timestamp(stamp)),
                None => Box::new(formatter),
            }
        }
        OutputFormat::Github => {
            let formatter = GithubFormatter::new();
            if options.statistics {
                Box::new(formatter)
            } else {
                Box::new(formatter.without_summary())
            }
        }
    }
}

/// Heading used for units without a lesson
pub(crate) const NO_LESSON: &str = "(no lesson)";

/// Entries with findings, grouped by lesson in order of first appearance
pub(crate) fn group_by_lesson(
    report: &ContentAuditReport,
) -> Vec<(&str, Vec<&ContentAuditEntry>)> {
    let mut groups: Vec<(&str, Vec<&ContentAuditEntry>)> = Vec::new();
    for entry in report.entries.iter().filter(|e| !e.is_clean()) {
        let lesson = entry.lesson.as_deref().unwrap_or(NO_LESSON);
        match groups.iter_mut().find(|(name, _)| *name == lesson) {
            Some((_, entries)) => entries.push(entry),
            None => groups.push((lesson, vec![entry])),
        }
    }
    groups
}

fn plural(count: usize, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

#[cfg(test)]
pub(crate) fn sample_report() -> ContentAuditReport {
    use crate::auditor::AuditSummary;
    use crate::diagnostic::Location;
    use crate::rule::RuleId;

    let mismatch = |id: &str| {
        Diagnostic::new(
            RuleId::AgreementMismatch,
            "'голем' does not agree with 'куќа'",
            Location::new(id, "phrases[2].adjective"),
        )
        .with_expected("голема")
        .with_actual("голем")
    };
    let entry = |id: &str, lesson: Option<&str>| ContentAuditEntry {
        content_id: id.to_string(),
        lesson: lesson.map(str::to_string),
        metadata: None,
        errors: Vec::new(),
        warnings: Vec::new(),
    };

    let mut first = entry("l2-p1", Some("lesson-2"));
    let mut repeated = mismatch("l2-p1");
    repeated.occurrences = 3;
    first.errors.push(repeated);

    let mut second = entry("l1-p4", Some("lesson-1"));
    second.warnings.push(Diagnostic::new(
        RuleId::MissingDictionaryEntry,
        "Head noun 'непознатзбор' is not in the dictionary",
        Location::new("l1-p4", "adjective"),
    ));

    let mut third = entry("l2-p9", Some("lesson-2"));
    third.errors.push(mismatch("l2-p9"));

    let mut report = ContentAuditReport {
        entries: vec![first, entry("l1-p1", Some("lesson-1")), second, third],
        summary: AuditSummary {
            total_checked: 4,
            ..AuditSummary::default()
        },
    };
    report.recompute_summary();
    report
}
