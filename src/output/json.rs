//! JSON output formatter
//!
//! The report is nested under `report`; a generation timestamp, when set,
//! sits beside it so the report body stays comparable across runs.

use super::OutputFormatter;
use crate::auditor::ContentAuditReport;
use crate::diagnostic::Diagnostic;
use serde::Serialize;

/// JSON formatter for machine-readable output
#[derive(Default)]
pub struct JsonFormatter {
    /// Pretty print with indentation
    pub pretty: bool,
    /// Envelope metadata, outside the report body
    pub generated_at: Option<String>,
}

impl JsonFormatter {
    /// Create a new JSON formatter
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable pretty printing
    pub fn pretty(mut self) -> Self {
        self.pretty = true;
        self
    }

    pub fn with_timestamp(mut self, generated_at: &str) -> Self {
        self.generated_at = Some(generated_at.to_string());
        self
    }

    fn to_json<T: Serialize>(&self, value: &T) -> String {
        let result = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        result.unwrap_or_default()
    }
}

#[derive(Serialize)]
struct JsonEnvelope<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    generated_at: Option<&'a str>,
    report: &'a ContentAuditReport,
}

impl OutputFormatter for JsonFormatter {
    fn format(&self, report: &ContentAuditReport) -> String {
        self.to_json(&JsonEnvelope {
            generated_at: self.generated_at.as_deref(),
            report,
        })
    }

    fn format_diagnostic(&self, diagnostic: &Diagnostic) -> String {
        self.to_json(diagnostic)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::sample_report;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_report_round_trips() {
        let report = sample_report();
        let output = JsonFormatter::new().format(&report);

        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert!(value.get("generated_at").is_none());
        let parsed: ContentAuditReport =
            serde_json::from_value(value["report"].clone()).unwrap();
        assert_eq!(parsed, report);
    }

    #[test]
    fn test_timestamp_outside_body() {
        let report = sample_report();
        let plain = JsonFormatter::new().format(&report);
        let stamped = JsonFormatter::new().with_timestamp("1700000000").format(&report);

        let plain: serde_json::Value = serde_json::from_str(&plain).unwrap();
        let stamped: serde_json::Value = serde_json::from_str(&stamped).unwrap();
        assert_eq!(stamped["generated_at"], "1700000000");
        assert_eq!(plain["report"], stamped["report"]);
    }

    #[test]
    fn test_summary_shape() {
        let output = JsonFormatter::new().format(&sample_report());
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        let summary = &value["report"]["summary"];

        assert_eq!(summary["total_checked"], 4);
        assert_eq!(summary["total_errors"], 2);
        assert_eq!(summary["by_rule_id"]["AGREEMENT_MISMATCH"], 2);
    }

    #[test]
    fn test_format_diagnostic() {
        let report = sample_report();
        let output = JsonFormatter::new().format_diagnostic(&report.entries[0].errors[0]);
        assert!(output.contains("\"occurrences\":3"));
        assert!(output.contains("\"expected\":\"голема\""));
    }
}
