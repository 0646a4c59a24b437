//! Diagnostic types for validation results

use crate::rule::RuleId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity level for diagnostics
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reduced confidence; does not invalidate content by itself
    #[default]
    Warning,
    /// Contract violation
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "warning"),
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "warning" | "warn" => Ok(Severity::Warning),
            "error" | "err" => Ok(Severity::Error),
            _ => Err(format!("Unknown severity: {}", s)),
        }
    }
}

/// Where in the corpus a finding was made
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Content unit id
    pub content_id: String,
    /// Field path of the checked text
    pub field: String,
}

impl Location {
    pub fn new(content_id: &str, field: &str) -> Self {
        Self {
            content_id: content_id.to_string(),
            field: field.to_string(),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.content_id, self.field)
    }
}

/// Key under which repeated findings collapse into one report row
pub type DedupKey = (RuleId, Option<String>, Option<String>, String);

/// A validation finding (error or warning)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Rule that produced this diagnostic
    pub rule_id: RuleId,
    /// Severity level
    pub severity: Severity,
    /// Human-readable message
    pub message: String,
    /// Corpus location
    pub location: Location,
    /// Form the paradigm requires, verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    /// Form the content carries, verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
    /// How many times this exact finding was seen
    #[serde(default = "one")]
    pub occurrences: usize,
}

fn one() -> usize {
    1
}

impl Diagnostic {
    /// Create a diagnostic with the rule's default severity
    pub fn new(rule_id: RuleId, message: &str, location: Location) -> Self {
        Self {
            rule_id,
            severity: rule_id.default_severity(),
            message: message.to_string(),
            location,
            expected: None,
            actual: None,
            occurrences: 1,
        }
    }

    pub fn with_expected(mut self, expected: &str) -> Self {
        self.expected = Some(expected.to_string());
        self
    }

    pub fn with_actual(mut self, actual: &str) -> Self {
        self.actual = Some(actual.to_string());
        self
    }

    pub fn dedup_key(&self) -> DedupKey {
        (
            self.rule_id,
            self.expected.clone(),
            self.actual.clone(),
            self.location.content_id.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Error > Severity::Warning);
    }

    #[test]
    fn test_severity_from_str() {
        assert_eq!("error".parse::<Severity>(), Ok(Severity::Error));
        assert_eq!("WARN".parse::<Severity>(), Ok(Severity::Warning));
        assert!("info".parse::<Severity>().is_err());
    }

    #[test]
    fn test_diagnostic_creation() {
        let diag = Diagnostic::new(
            RuleId::AgreementMismatch,
            "Test message",
            Location::new("u1", "adjective"),
        )
        .with_expected("голема")
        .with_actual("голем");

        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.occurrences, 1);
        assert_eq!(diag.location.to_string(), "u1#adjective");
    }

    #[test]
    fn test_dedup_key_ignores_field_and_message() {
        let a = Diagnostic::new(RuleId::AgreementMismatch, "a", Location::new("u1", "x"))
            .with_expected("голема")
            .with_actual("голем");
        let b = Diagnostic::new(RuleId::AgreementMismatch, "b", Location::new("u1", "y"))
            .with_expected("голема")
            .with_actual("голем");
        let c = Diagnostic::new(RuleId::AgreementMismatch, "a", Location::new("u2", "x"))
            .with_expected("голема")
            .with_actual("голем");

        assert_eq!(a.dedup_key(), b.dedup_key());
        assert_ne!(a.dedup_key(), c.dedup_key());
    }

    #[test]
    fn test_serialized_shape() {
        let diag = Diagnostic::new(
            RuleId::MissingMetadata,
            "msg",
            Location::new("u1", "adjective"),
        );
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"rule_id\":\"MISSING_METADATA\""));
        assert!(json.contains("\"severity\":\"warning\""));
        assert!(!json.contains("expected"));
    }
}
