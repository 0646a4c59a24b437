//! Grammar rule engine
//!
//! Validates one content unit against the lexicon. The engine is a pure
//! function of its inputs and never fails: every problem becomes a
//! [`Diagnostic`] on the unit being checked.

use crate::corpus::ContentUnit;
use crate::diagnostic::{Diagnostic, Location};
use crate::dictionary::{AdjectiveParadigm, Lexicon};
use crate::extractor::{DefinitenessPolicy, Extraction, LinguisticMetadata, MetadataExtractor};
use crate::grammar::FormKey;
use crate::normalize::normalize_form;
use crate::rule::RuleId;

/// Result of validating a single unit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnitValidation {
    pub metadata: Option<LinguisticMetadata>,
    pub diagnostics: Vec<Diagnostic>,
}

impl UnitValidation {
    fn clean(metadata: LinguisticMetadata) -> Self {
        Self {
            metadata: Some(metadata),
            diagnostics: Vec::new(),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// The agreement checker
pub struct RuleEngine<'a> {
    lexicon: &'a Lexicon,
    extractor: MetadataExtractor<'a>,
}

impl<'a> RuleEngine<'a> {
    pub fn new(lexicon: &'a Lexicon, policy: DefinitenessPolicy) -> Self {
        Self {
            lexicon,
            extractor: MetadataExtractor::new(lexicon, policy),
        }
    }

    pub fn validate(&self, unit: &ContentUnit) -> UnitValidation {
        let location = Location::new(&unit.id, &unit.field);

        let metadata = match self.extractor.extract(unit) {
            Extraction::Declared(m) | Extraction::Inferred(m) => m,
            Extraction::UnknownNoun { lemma } => {
                let diag = Diagnostic::new(
                    RuleId::MissingDictionaryEntry,
                    &format!(
                        "Head noun '{}' is not in the dictionary; agreement not checked",
                        lemma
                    ),
                    location,
                )
                .with_actual(&lemma);
                return UnitValidation {
                    metadata: None,
                    diagnostics: vec![diag],
                };
            }
            Extraction::Missing => {
                let diag = Diagnostic::new(
                    RuleId::MissingMetadata,
                    "No declared metadata and no head noun; unit skipped",
                    location,
                );
                return UnitValidation {
                    metadata: None,
                    diagnostics: vec![diag],
                };
            }
        };

        let Some(paradigm) = self.resolve_paradigm(unit) else {
            let lemma = unit
                .adjective_lemma
                .as_deref()
                .unwrap_or(unit.adjective_text.as_str());
            let diag = Diagnostic::new(
                RuleId::UnknownAdjective,
                &format!(
                    "Adjective '{}' has no paradigm in the dictionary; agreement not checked",
                    lemma.trim()
                ),
                location,
            )
            .with_actual(&unit.adjective_text);
            return UnitValidation {
                metadata: Some(metadata),
                diagnostics: vec![diag],
            };
        };

        if paradigm.invariant {
            return UnitValidation::clean(metadata);
        }

        let key = FormKey::new(metadata.gender, metadata.number, metadata.definiteness);
        let Some(expected) = paradigm.form(key) else {
            let diag = Diagnostic::new(
                RuleId::InvalidParadigmForm,
                &format!(
                    "Paradigm '{}' has no {} {} {} form",
                    paradigm.lemma, key.gender, key.number, key.definiteness
                ),
                location,
            )
            .with_expected(&key.to_string())
            .with_actual(&unit.adjective_text);
            return UnitValidation {
                metadata: Some(metadata),
                diagnostics: vec![diag],
            };
        };

        if normalize_form(expected) == normalize_form(&unit.adjective_text) {
            return UnitValidation::clean(metadata);
        }

        let head = if metadata.noun_lemma.is_empty() {
            "the head noun".to_string()
        } else {
            format!("'{}'", metadata.noun_lemma)
        };
        let diag = Diagnostic::new(
            RuleId::AgreementMismatch,
            &format!(
                "'{}' does not agree with {} ({} {} {}): expected '{}'",
                unit.adjective_text.trim(),
                head,
                key.gender,
                key.number,
                key.definiteness,
                expected
            ),
            location,
        )
        .with_expected(expected)
        .with_actual(&unit.adjective_text);

        UnitValidation {
            metadata: Some(metadata),
            diagnostics: vec![diag],
        }
    }

    /// Paradigm by explicit lemma, else by reverse lookup of the authored text
    fn resolve_paradigm(&self, unit: &ContentUnit) -> Option<&'a AdjectiveParadigm> {
        let adjectives = &self.lexicon.adjectives;
        match unit.adjective_lemma.as_deref() {
            Some(lemma) if !lemma.trim().is_empty() => adjectives.paradigm(lemma),
            _ => adjectives
                .lemma_for_form(&unit.adjective_text)
                .and_then(|lemma| adjectives.paradigm(lemma)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::corpus::DeclaredMetadata;
    use crate::diagnostic::Severity;
    use crate::dictionary::NounEntry;
    use crate::grammar::{Definiteness, Gender, GrammaticalNumber};

    fn lexicon() -> Lexicon {
        let mut lexicon = Lexicon::new();
        lexicon
            .nouns
            .insert(NounEntry::new("куќа", Gender::Feminine))
            .unwrap();
        lexicon
            .nouns
            .insert(NounEntry::new("село", Gender::Neuter))
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
            .adjectives
            .insert(AdjectiveParadigm::new("розов").with_form(
                FormKey::new(
                    Gender::Masculine,
                    GrammaticalNumber::Singular,
                    Definiteness::Indefinite,
                ),
                "розов",
            ))
            .unwrap();
        lexicon
            .adjectives
            .insert(AdjectiveParadigm::invariant("браон"))
            .unwrap();
        lexicon
    }

    fn engine(lexicon: &Lexicon) -> RuleEngine<'_> {
        RuleEngine::new(lexicon, DefinitenessPolicy::default())
    }

    #[test]
    fn test_agreement_ok() {
        let lexicon = lexicon();
        let unit = ContentUnit::new("u1", "големата")
            .with_noun("куќа")
            .with_adjective("голем")
            .definite(true);

        let result = engine(&lexicon).validate(&unit);
        assert!(result.is_clean());
        assert_eq!(
            result.metadata.unwrap().definiteness,
            Definiteness::Definite
        );
    }

    #[test]
    fn test_agreement_mismatch_keeps_verbatim_strings() {
        let lexicon = lexicon();
        let unit = ContentUnit::new("u1", " Голем")
            .with_noun("куќа")
            .with_adjective("голем");

        let result = engine(&lexicon).validate(&unit);
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.rule_id, RuleId::AgreementMismatch);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.expected.as_deref(), Some("голема"));
        assert_eq!(diag.actual.as_deref(), Some(" Голем"));
        assert_eq!(diag.location, Location::new("u1", "adjective"));
    }

    #[test]
    fn test_comparison_is_normalized() {
        let lexicon = lexicon();
        let unit = ContentUnit::new("u1", "  ГОЛЕМА! ")
            .with_noun("куќа")
            .with_adjective("голем");

        assert!(engine(&lexicon).validate(&unit).is_clean());
    }

    #[test]
    fn test_adjective_resolved_from_surface() {
        let lexicon = lexicon();
        let unit = ContentUnit::new("u1", "големи").with_noun("село");

        let result = engine(&lexicon).validate(&unit);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].expected.as_deref(), Some("големо"));
    }

    #[test]
    fn test_unknown_adjective() {
        let lexicon = lexicon();
        let unit = ContentUnit::new("u1", "шарена").with_noun("куќа");

        let result = engine(&lexicon).validate(&unit);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].rule_id, RuleId::UnknownAdjective);
        assert_eq!(result.diagnostics[0].severity, Severity::Warning);
        assert!(result.metadata.is_some());
    }

    #[test]
    fn test_invalid_paradigm_form() {
        let lexicon = lexicon();
        let unit = ContentUnit::new("u1", "розови")
            .with_adjective("розов")
            .with_declared(DeclaredMetadata::new(
                "село",
                Gender::Neuter,
                GrammaticalNumber::Plural,
            ));

        let result = engine(&lexicon).validate(&unit);
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.rule_id, RuleId::InvalidParadigmForm);
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.expected.as_deref(), Some("neuter.plural.indefinite"));
    }

    #[test]
    fn test_invariant_adjective_never_flagged() {
        let lexicon = lexicon();
        let engine = engine(&lexicon);
        for gender in Gender::ALL {
            for number in GrammaticalNumber::ALL {
                for definite in [false, true] {
                    let unit = ContentUnit::new("u1", "нешто сосема друго")
                        .with_adjective("браон")
                        .definite(definite)
                        .with_declared(DeclaredMetadata::new("x", gender, number));
                    assert!(engine.validate(&unit).is_clean());
                }
            }
        }
    }

    #[test]
    fn test_missing_dictionary_entry_skips_comparison() {
        let lexicon = lexicon();
        let unit = ContentUnit::new("u1", "голем")
            .with_noun("непознатзбор")
            .with_adjective("голем");

        let result = engine(&lexicon).validate(&unit);
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].rule_id, RuleId::MissingDictionaryEntry);
        assert!(result.metadata.is_none());
    }

    #[test]
    fn test_missing_metadata() {
        let lexicon = lexicon();
        let result = engine(&lexicon).validate(&ContentUnit::new("u1", "голем"));
        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.diagnostics[0].rule_id, RuleId::MissingMetadata);
    }

    #[test]
    fn test_empty_adjective_text_does_not_panic() {
        let lexicon = lexicon();
        let unit = ContentUnit::new("u1", "")
            .with_noun("куќа")
            .with_adjective("голем");

        let result = engine(&lexicon).validate(&unit);
        assert_eq!(result.diagnostics[0].rule_id, RuleId::AgreementMismatch);
    }

    #[test]
    fn test_declared_gender_without_noun_lemma() {
        let lexicon = lexicon();
        let declared = DeclaredMetadata {
            gender: Some(Gender::Neuter),
            number: Some(GrammaticalNumber::Plural),
            ..DeclaredMetadata::default()
        };
        let unit = ContentUnit::new("u1", "голема")
            .with_adjective("голем")
            .with_declared(declared);

        let result = engine(&lexicon).validate(&unit);
        assert_eq!(result.diagnostics.len(), 1);
        let diag = &result.diagnostics[0];
        assert_eq!(diag.rule_id, RuleId::AgreementMismatch);
        assert_eq!(diag.expected.as_deref(), Some("големи"));
        assert!(diag.message.contains("the head noun"));
    }

    #[test]
    fn test_validate_is_deterministic() {
        let lexicon = lexicon();
        let engine = engine(&lexicon);
        let unit = ContentUnit::new("u1", "голем")
            .with_noun("куќа")
            .with_adjective("голем");
        assert_eq!(engine.validate(&unit), engine.validate(&unit));
    }
}
