//! Baseline system for hold-the-line auditing
//!
//! Lets a team adopt the gate without fixing legacy content first.
//! New findings are reported, but existing (baselined) findings are ignored.

use crate::auditor::ContentAuditReport;
use crate::diagnostic::Diagnostic;
use crate::rule::RuleId;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BaselineError {
    #[error("Failed to read baseline {file}: {source}")]
    Read {
        file: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to write baseline {file}: {source}")]
    Write {
        file: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid baseline {file}: {source}")]
    Parse {
        file: PathBuf,
        source: serde_json::Error,
    },
}

/// A known finding that should be ignored
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct BaselineIssue {
    pub rule_id: RuleId,
    pub content_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actual: Option<String>,
}

impl BaselineIssue {
    pub fn from_diagnostic(diag: &Diagnostic) -> Self {
        Self {
            rule_id: diag.rule_id,
            content_id: diag.location.content_id.clone(),
            expected: diag.expected.clone(),
            actual: diag.actual.clone(),
        }
    }
}

/// Baseline containing all ignored findings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Baseline {
    /// Version of the baseline format
    #[serde(default = "default_version")]
    pub version: String,
    pub issues: Vec<BaselineIssue>,
    /// When the baseline was created
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    /// When the baseline was last updated
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_version() -> String {
    "1".to_string()
}

impl Baseline {
    /// Create an empty baseline
    pub fn new() -> Self {
        Self {
            version: default_version(),
            issues: Vec::new(),
            created_at: Some(current_timestamp()),
            updated_at: None,
        }
    }

    /// Load baseline from a JSON file
    pub fn load(path: &Path) -> Result<Self, BaselineError> {
        let content = std::fs::read_to_string(path).map_err(|source| BaselineError::Read {
            file: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&content).map_err(|source| BaselineError::Parse {
            file: path.to_path_buf(),
            source,
        })
    }

    /// Load a baseline, or start an empty one if the file does not exist yet
    pub fn load_or_new(path: &Path) -> Result<Self, BaselineError> {
        if path.exists() {
            Self::load(path)
        } else {
            log::info!("No baseline at {}; starting a new one", path.display());
            Ok(Self::new())
        }
    }

    /// Save baseline to a JSON file
    pub fn save(&mut self, path: &Path) -> Result<(), BaselineError> {
        self.updated_at = Some(current_timestamp());
        let content = serde_json::to_string_pretty(self).map_err(|source| BaselineError::Parse {
            file: path.to_path_buf(),
            source,
        })?;
        std::fs::write(path, content).map_err(|source| BaselineError::Write {
            file: path.to_path_buf(),
            source,
        })
    }

    /// Record every finding of a report
    pub fn add_report(&mut self, report: &ContentAuditReport) {
        let mut known: HashSet<BaselineIssue> = self.issues.iter().cloned().collect();
        for diag in report.diagnostics() {
            let issue = BaselineIssue::from_diagnostic(diag);
            if known.insert(issue.clone()) {
                self.issues.push(issue);
            }
        }
    }

    /// Drop baselined findings from a report and recompute its summary
    pub fn filter_report(&self, report: &mut ContentAuditReport) -> usize {
        let index: HashSet<&BaselineIssue> = self.issues.iter().collect();
        let mut removed = 0;

        for entry in &mut report.entries {
            for list in [&mut entry.errors, &mut entry.warnings] {
                let before = list.len();
                list.retain(|d| !index.contains(&BaselineIssue::from_diagnostic(d)));
                removed += before - list.len();
            }
        }

        report.recompute_summary();
        removed
    }

    /// Get count of baselined issues
    pub fn issue_count(&self) -> usize {
        self.issues.len()
    }

    /// Get count of baselined issues by rule
    pub fn count_by_rule(&self) -> BTreeMap<RuleId, usize> {
        let mut counts = BTreeMap::new();
        for issue in &self.issues {
            *counts.entry(issue.rule_id).or_default() += 1;
        }
        counts
    }
}

/// Seconds since the Unix epoch
pub fn current_timestamp() -> String {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs().to_string())
        .unwrap_or_default()
}
