//! Rule identifiers and the rule catalog

use crate::diagnostic::Severity;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable identifier of an agreement rule.
///
/// Serialized as the SCREAMING_SNAKE_CASE strings downstream tooling filters on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RuleId {
    MissingMetadata,
    MissingDictionaryEntry,
    UnknownAdjective,
    AgreementMismatch,
    InvalidParadigmForm,
}

impl RuleId {
    pub const ALL: [RuleId; 5] = [
        RuleId::MissingMetadata,
        RuleId::MissingDictionaryEntry,
        RuleId::UnknownAdjective,
        RuleId::AgreementMismatch,
        RuleId::InvalidParadigmForm,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::MissingMetadata => "MISSING_METADATA",
            RuleId::MissingDictionaryEntry => "MISSING_DICTIONARY_ENTRY",
            RuleId::UnknownAdjective => "UNKNOWN_ADJECTIVE",
            RuleId::AgreementMismatch => "AGREEMENT_MISMATCH",
            RuleId::InvalidParadigmForm => "INVALID_PARADIGM_FORM",
        }
    }

    /// Severity used unless the configuration overrides it
    pub fn default_severity(&self) -> Severity {
        match self {
            RuleId::MissingMetadata | RuleId::MissingDictionaryEntry | RuleId::UnknownAdjective => {
                Severity::Warning
            }
            RuleId::AgreementMismatch | RuleId::InvalidParadigmForm => Severity::Error,
        }
    }

    pub fn rule(&self) -> Rule {
        match self {
            RuleId::MissingMetadata => Rule {
                id: *self,
                name: "Missing metadata",
                category: RuleCategory::Metadata,
                description: "The content unit declares no metadata and names no head noun, so agreement cannot be checked.",
                rationale: "Units that cannot be checked silently bypass the gate; they are surfaced so authors can tag them.",
                example_bad: "{ id: l01-p02, adjective_text: голема }",
                example_good: "{ id: l01-p02, noun_lemma: куќа, adjective_text: голема }",
            },
            RuleId::MissingDictionaryEntry => Rule {
                id: *self,
                name: "Noun not in dictionary",
                category: RuleCategory::Lexicon,
                description: "The head noun was not declared and is missing from the noun dictionary; the unit was not compared.",
                rationale: "Without gender the expected form is unknown. Add the noun to the lexicon or declare its gender.",
                example_bad: "{ noun_lemma: непознатзбор, adjective_text: голем }",
                example_good: "{ declared: { noun_lemma: непознатзбор, gender: masculine, number: singular }, adjective_text: голем }",
            },
            RuleId::UnknownAdjective => Rule {
                id: *self,
                name: "Adjective not in dictionary",
                category: RuleCategory::Lexicon,
                description: "No adjective paradigm matches the unit's adjective lemma or surface form; the unit was not compared.",
                rationale: "Agreement needs a paradigm. Add the adjective to the lexicon or give its lemma explicitly.",
                example_bad: "{ noun_lemma: куќа, adjective_text: шарена }",
                example_good: "{ noun_lemma: куќа, adjective_lemma: голем, adjective_text: голема }",
            },
            RuleId::AgreementMismatch => Rule {
                id: *self,
                name: "Agreement mismatch",
                category: RuleCategory::Agreement,
                description: "The adjective's surface form does not match the paradigm form for the noun's gender, number and definiteness.",
                rationale: "Learners copy what they see; a wrong ending teaches the wrong agreement pattern.",
                example_bad: "куќа (feminine, definite) + голем",
                example_good: "куќа (feminine, definite) + големата",
            },
            RuleId::InvalidParadigmForm => Rule {
                id: *self,
                name: "Incomplete paradigm",
                category: RuleCategory::Lexicon,
                description: "The adjective paradigm has no form for the required combination and is not marked invariant.",
                rationale: "This is a dictionary defect, not a content defect: fill the missing cell or mark the adjective invariant.",
                example_bad: "розов without neuter.plural.indefinite",
                example_good: "розов with neuter.plural.indefinite: розови",
            },
        }
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RuleId {
    type Err = String;

    /// Accepts the canonical id as well as kebab/lower-case spellings
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let canonical = s.trim().to_uppercase().replace('-', "_");
        RuleId::ALL
            .into_iter()
            .find(|id| id.as_str() == canonical)
            .ok_or_else(|| format!("Unknown rule: {}", s))
    }
}

/// Rule category for grouping related rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleCategory {
    /// The content itself is wrong
    Agreement,
    /// The dictionaries are missing data
    Lexicon,
    /// The unit lacks tagging
    Metadata,
}

impl fmt::Display for RuleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleCategory::Agreement => write!(f, "agreement"),
            RuleCategory::Lexicon => write!(f, "lexicon"),
            RuleCategory::Metadata => write!(f, "metadata"),
        }
    }
}

/// Documentation for one rule, shown by `--list-rules` and `--explain`
#[derive(Debug, Clone, Serialize)]
pub struct Rule {
    pub id: RuleId,
    pub name: &'static str,
    pub category: RuleCategory,
    pub description: &'static str,
    pub rationale: &'static str,
    pub example_bad: &'static str,
    pub example_good: &'static str,
}

impl Rule {
    pub fn severity(&self) -> Severity {
        self.id.default_severity()
    }
}

/// All rules in catalog order
pub fn catalog() -> Vec<Rule> {
    RuleId::ALL.iter().map(RuleId::rule).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_id_strings_are_stable() {
        assert_eq!(RuleId::MissingMetadata.as_str(), "MISSING_METADATA");
        assert_eq!(
            RuleId::MissingDictionaryEntry.as_str(),
            "MISSING_DICTIONARY_ENTRY"
        );
        assert_eq!(RuleId::AgreementMismatch.as_str(), "AGREEMENT_MISMATCH");
        assert_eq!(
            RuleId::InvalidParadigmForm.as_str(),
            "INVALID_PARADIGM_FORM"
        );
    }

    #[test]
    fn test_serde_matches_as_str() {
        for id in RuleId::ALL {
            let json = serde_json::to_string(&id).unwrap();
            assert_eq!(json, format!("\"{}\"", id.as_str()));
        }
    }

    #[test]
    fn test_rule_id_from_str() {
        assert_eq!(
            "agreement-mismatch".parse::<RuleId>(),
            Ok(RuleId::AgreementMismatch)
        );
        assert_eq!(
            "MISSING_METADATA".parse::<RuleId>(),
            Ok(RuleId::MissingMetadata)
        );
        assert!("no-such-rule".parse::<RuleId>().is_err());
    }

    #[test]
    fn test_default_severities() {
        assert_eq!(RuleId::AgreementMismatch.default_severity(), Severity::Error);
        assert_eq!(RuleId::InvalidParadigmForm.default_severity(), Severity::Error);
        assert_eq!(RuleId::MissingMetadata.default_severity(), Severity::Warning);
        assert_eq!(
            RuleId::MissingDictionaryEntry.default_severity(),
            Severity::Warning
        );
    }

    #[test]
    fn test_catalog_covers_all_rules() {
        let rules = catalog();
        assert_eq!(rules.len(), RuleId::ALL.len());
        assert!(rules.iter().all(|r| !r.description.is_empty()));
    }
}
