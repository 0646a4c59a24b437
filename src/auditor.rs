//! Corpus auditor
//!
//! Runs the rule engine over every unit of a corpus and folds the results
//! into a [`ContentAuditReport`]. Validation is a stateless map (optionally on
//! a rayon pool); aggregation is a single ordered pass, so parallel and
//! sequential runs produce identical reports.

use crate::config::Config;
use crate::corpus::ContentUnit;
use crate::diagnostic::{DedupKey, Diagnostic, Severity};
use crate::dictionary::Lexicon;
use crate::engine::{RuleEngine, UnitValidation};
use crate::extractor::LinguisticMetadata;
use crate::rule::RuleId;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::time::Instant;

/// Findings for one content unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAuditEntry {
    pub content_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lesson: Option<String>,
    pub metadata: Option<LinguisticMetadata>,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl ContentAuditEntry {
    /// Errors then warnings
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.errors.iter().chain(self.warnings.iter())
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

/// Aggregate counts over a report
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuditSummary {
    /// Units audited
    pub total_checked: usize,
    /// Unique error findings
    pub total_errors: usize,
    /// Unique warning findings
    pub total_warnings: usize,
    /// Sum of occurrence counters over all findings
    pub total_occurrences: usize,
    /// Unique findings per rule
    pub by_rule_id: BTreeMap<RuleId, usize>,
}

impl AuditSummary {
    pub fn has_errors(&self) -> bool {
        self.total_errors > 0
    }

    pub fn has_warnings(&self) -> bool {
        self.total_warnings > 0
    }
}

/// The result of auditing a corpus
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentAuditReport {
    /// One entry per unit, in corpus order
    pub entries: Vec<ContentAuditEntry>,
    pub summary: AuditSummary,
}

impl ContentAuditReport {
    /// Every finding, in entry order
    pub fn diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
        self.entries.iter().flat_map(ContentAuditEntry::diagnostics)
    }

    /// Rebuild the summary from the entries. `total_checked` is kept.
    pub fn recompute_summary(&mut self) {
        let mut summary = AuditSummary {
            total_checked: self.summary.total_checked,
            ..AuditSummary::default()
        };
        for entry in &self.entries {
            summary.total_errors += entry.errors.len();
            summary.total_warnings += entry.warnings.len();
            for diag in entry.diagnostics() {
                summary.total_occurrences += diag.occurrences;
                *summary.by_rule_id.entry(diag.rule_id).or_default() += 1;
            }
        }
        self.summary = summary;
    }
}

/// Runs the engine over a corpus
pub struct Auditor<'a> {
    engine: RuleEngine<'a>,
    parallel: bool,
    jobs: usize,
    disabled: BTreeSet<RuleId>,
    severity: BTreeMap<RuleId, Severity>,
}

impl<'a> Auditor<'a> {
    pub fn new(lexicon: &'a Lexicon, config: &Config) -> Self {
        let disabled = RuleId::ALL
            .into_iter()
            .filter(|id| !config.is_rule_enabled(*id))
            .collect();
        let severity = RuleId::ALL
            .into_iter()
            .map(|id| (id, config.severity_for(id)))
            .collect();

        Self {
            engine: RuleEngine::new(lexicon, config.definiteness_policy()),
            parallel: config.engine.parallel,
            jobs: config.engine.jobs,
            disabled,
            severity,
        }
    }

    /// Force single-threaded validation
    pub fn sequential(mut self) -> Self {
        self.parallel = false;
        self
    }

    pub fn with_jobs(mut self, jobs: usize) -> Self {
        self.parallel = true;
        self.jobs = jobs;
        self
    }

    /// Audit a corpus
    pub fn audit_all(&self, units: &[ContentUnit]) -> ContentAuditReport {
        let start = Instant::now();

        let validations = self.validate_all(units);
        let report = reduce(units, validations);

        log::info!(
            "Audited {} units in {:.2}s: {} errors, {} warnings",
            report.summary.total_checked,
            start.elapsed().as_secs_f64(),
            report.summary.total_errors,
            report.summary.total_warnings
        );
        report
    }

    fn validate_all(&self, units: &[ContentUnit]) -> Vec<UnitValidation> {
        if !self.parallel || units.len() < 2 {
            return units.iter().map(|u| self.validate(u)).collect();
        }

        let threads = if self.jobs > 0 {
            self.jobs
        } else {
            num_cpus::get()
        };
        match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
            Ok(pool) => pool.install(|| units.par_iter().map(|u| self.validate(u)).collect()),
            Err(e) => {
                log::warn!("Could not start thread pool ({}); validating sequentially", e);
                units.iter().map(|u| self.validate(u)).collect()
            }
        }
    }

    /// Validate one unit and apply rule configuration
    fn validate(&self, unit: &ContentUnit) -> UnitValidation {
        let mut validation = self.engine.validate(unit);
        validation
            .diagnostics
            .retain(|d| !self.disabled.contains(&d.rule_id));
        for diag in &mut validation.diagnostics {
            if let Some(severity) = self.severity.get(&diag.rule_id) {
                diag.severity = *severity;
            }
        }
        validation
    }
}

/// Where a recorded finding lives: entry index, severity list, index in list
type Slot = (usize, Severity, usize);

/// Fold validations into entries in corpus order, collapsing repeats
fn reduce(units: &[ContentUnit], validations: Vec<UnitValidation>) -> ContentAuditReport {
    let mut entries: Vec<ContentAuditEntry> = Vec::with_capacity(units.len());
    let mut seen: HashMap<DedupKey, Slot> = HashMap::new();

    for (unit, validation) in units.iter().zip(validations) {
        let index = entries.len();
        let mut entry = ContentAuditEntry {
            content_id: unit.id.clone(),
            lesson: unit.lesson.clone(),
            metadata: validation.metadata,
            errors: Vec::new(),
            warnings: Vec::new(),
        };

        for diag in validation.diagnostics {
            let key = diag.dedup_key();
            if let Some(&(at, severity, pos)) = seen.get(&key) {
                let target = if at == index {
                    &mut entry
                } else {
                    &mut entries[at]
                };
                let list = match severity {
                    Severity::Error => &mut target.errors,
                    Severity::Warning => &mut target.warnings,
                };
                list[pos].occurrences += diag.occurrences;
                continue;
            }

            let list = match diag.severity {
                Severity::Error => &mut entry.errors,
                Severity::Warning => &mut entry.warnings,
            };
            seen.insert(key, (index, diag.severity, list.len()));
            list.push(diag);
        }

        entries.push(entry);
    }

    let mut report = ContentAuditReport {
        entries,
        summary: AuditSummary {
            total_checked: units.len(),
            ..AuditSummary::default()
        },
    };
    report.recompute_summary();
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dictionary::{AdjectiveParadigm, NounEntry};
    use crate::grammar::Gender;

    fn lexicon() -> Lexicon {
        let mut lexicon = Lexicon::new();
        lexicon
            .nouns
            .insert(NounEntry::new("куќа", Gender::Feminine))
            .unwrap();
        lexicon
            .nouns
            .insert(NounEntry::new("град", Gender::Masculine))
            .unwrap();
        lexicon
            .adjectives
            .insert(AdjectiveParadigm::new("голем").with_regular_forms(
                ["голем", "големиот"],
                ["голема", "големата"],
                ["големо", "големото"],
                ["големи", "големите"],
            ))
            .unwrap();
        lexicon
    }

    fn corpus() -> Vec<ContentUnit> {
        vec![
            ContentUnit::new("a", "голема")
                .in_lesson("l1")
                .with_noun("куќа")
                .with_adjective("голем"),
            ContentUnit::new("b", "голем")
                .in_lesson("l1")
                .with_noun("куќа")
                .with_adjective("голем"),
            ContentUnit::new("c", "голема").in_lesson("l2"),
            ContentUnit::new("d", "големиот")
                .in_lesson("l2")
                .with_noun("град")
                .definite(true),
        ]
    }

    #[test]
    fn test_one_entry_per_unit_in_order() {
        let lexicon = lexicon();
        let report = Auditor::new(&lexicon, &Config::new()).audit_all(&corpus());

        let ids: Vec<&str> = report
            .entries
            .iter()
            .map(|e| e.content_id.as_str())
            .collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
        assert_eq!(report.summary.total_checked, 4);
        assert_eq!(report.summary.total_errors, 1);
        assert_eq!(report.summary.total_warnings, 1);
        assert_eq!(report.summary.by_rule_id[&RuleId::AgreementMismatch], 1);
        assert_eq!(report.summary.by_rule_id[&RuleId::MissingMetadata], 1);
        assert!(report.entries[0].is_clean());
        assert!(report.entries[2].metadata.is_none());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let lexicon = lexicon();
        let units: Vec<ContentUnit> = (0..200)
            .map(|i| {
                let text = if i % 3 == 0 { "голем" } else { "голема" };
                ContentUnit::new(&format!("u{}", i % 17), text)
                    .with_noun("куќа")
                    .with_adjective("голем")
            })
            .collect();

        let config = Config::new();
        let sequential = Auditor::new(&lexicon, &config)
            .sequential()
            .audit_all(&units);
        let parallel = Auditor::new(&lexicon, &config)
            .with_jobs(4)
            .audit_all(&units);
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_repeated_defect_collapses() {
        let lexicon = lexicon();
        let mut units = Vec::new();
        for i in 0..100 {
            if i % 5 < 2 {
                units.push(
                    ContentUnit::new("lesson-4/phrase-2", "голем")
                        .with_noun("куќа")
                        .with_adjective("голем"),
                );
            } else {
                units.push(
                    ContentUnit::new(&format!("ok-{}", i), "голема")
                        .with_noun("куќа")
                        .with_adjective("голем"),
                );
            }
        }

        let report = Auditor::new(&lexicon, &Config::new()).audit_all(&units);
        let rows: Vec<&Diagnostic> = report.diagnostics().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].occurrences, 40);
        assert_eq!(report.summary.total_errors, 1);
        assert_eq!(report.summary.total_occurrences, 40);
        assert_eq!(report.entries.len(), 100);
    }

    #[test]
    fn test_same_unit_same_defect_collapses() {
        let lexicon = lexicon();
        let units = vec![ContentUnit::new("x", "голем")
            .with_noun("куќа")
            .with_adjective("голем")];
        let mut units = [units.clone(), units].concat();
        units.push(ContentUnit::new("y", "голем").with_noun("куќа"));

        let report = Auditor::new(&lexicon, &Config::new()).audit_all(&units);
        assert_eq!(report.entries[0].errors[0].occurrences, 2);
        assert!(report.entries[1].is_clean());
        // Different content id is a separate finding
        assert_eq!(report.entries[2].errors.len(), 1);
    }

    #[test]
    fn test_disabled_rule_filtered() {
        let lexicon = lexicon();
        let mut config = Config::new();
        config.rules.disabled.push("MISSING_METADATA".to_string());

        let report = Auditor::new(&lexicon, &config).audit_all(&corpus());
        assert_eq!(report.summary.total_warnings, 0);
        assert!(!report
            .summary
            .by_rule_id
            .contains_key(&RuleId::MissingMetadata));
    }

    #[test]
    fn test_severity_override_moves_finding() {
        let lexicon = lexicon();
        let mut config = Config::new();
        config
            .rules
            .severity
            .insert("AGREEMENT_MISMATCH".to_string(), Severity::Warning);

        let report = Auditor::new(&lexicon, &config).audit_all(&corpus());
        assert_eq!(report.summary.total_errors, 0);
        assert_eq!(report.summary.total_warnings, 2);
        assert_eq!(report.entries[1].warnings[0].rule_id, RuleId::AgreementMismatch);
    }

    #[test]
    fn test_empty_corpus() {
        let lexicon = lexicon();
        let report = Auditor::new(&lexicon, &Config::new()).audit_all(&[]);
        assert!(report.entries.is_empty());
        assert_eq!(report.summary, AuditSummary::default());
    }

    #[test]
    fn test_recompute_summary_after_removal() {
        let lexicon = lexicon();
        let mut report = Auditor::new(&lexicon, &Config::new()).audit_all(&corpus());
        report.entries[1].errors.clear();
        report.recompute_summary();

        assert_eq!(report.summary.total_checked, 4);
        assert_eq!(report.summary.total_errors, 0);
        assert!(!report.summary.has_errors());
        assert!(report.summary.has_warnings());
    }
}
