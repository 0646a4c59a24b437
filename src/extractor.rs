//! Linguistic metadata extraction
//!
//! Turns a [`ContentUnit`] into an [`Extraction`]: author-declared facts win,
//! otherwise the head noun is looked up in the noun dictionary.

use crate::corpus::ContentUnit;
use crate::dictionary::{Lexicon, NounEntry};
use crate::grammar::{Definiteness, Gender, GrammaticalNumber};
use crate::normalize::normalize_form;
use serde::{Deserialize, Serialize};

/// Where the unit's grammatical facts came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetadataSource {
    Declared,
    Inferred,
}

/// Grammatical facts for one content unit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinguisticMetadata {
    pub noun_lemma: String,
    pub gender: Gender,
    pub number: GrammaticalNumber,
    pub definiteness: Definiteness,
    pub source: MetadataSource,
}

/// Outcome of extraction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    Declared(LinguisticMetadata),
    Inferred(LinguisticMetadata),
    /// A head noun was named but the dictionary does not know it
    UnknownNoun { lemma: String },
    /// Nothing to go on
    Missing,
}

impl Extraction {
    pub fn metadata(&self) -> Option<&LinguisticMetadata> {
        match self {
            Extraction::Declared(m) | Extraction::Inferred(m) => Some(m),
            Extraction::UnknownNoun { .. } | Extraction::Missing => None,
        }
    }
}

/// How definiteness is resolved when a unit says nothing about it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DefinitenessPolicy {
    pub default: Definiteness,
}

impl DefinitenessPolicy {
    pub fn new(default: Definiteness) -> Self {
        Self { default }
    }

    /// Declared definiteness, then the article requirement flag, then the default
    pub fn resolve(&self, unit: &ContentUnit) -> Definiteness {
        if let Some(d) = unit.declared.as_ref().and_then(|d| d.definiteness) {
            return d;
        }
        match unit.requires_definite_article {
            Some(true) => Definiteness::Definite,
            Some(false) => Definiteness::Indefinite,
            None => self.default,
        }
    }
}

pub struct MetadataExtractor<'a> {
    lexicon: &'a Lexicon,
    policy: DefinitenessPolicy,
}

impl<'a> MetadataExtractor<'a> {
    pub fn new(lexicon: &'a Lexicon, policy: DefinitenessPolicy) -> Self {
        Self { lexicon, policy }
    }

    pub fn extract(&self, unit: &ContentUnit) -> Extraction {
        let definiteness = self.policy.resolve(unit);

        if let Some(declared) = &unit.declared {
            if let Some(gender) = declared.gender {
                return Extraction::Declared(LinguisticMetadata {
                    noun_lemma: declared.noun_lemma.clone(),
                    gender,
                    number: declared.number.unwrap_or(GrammaticalNumber::Singular),
                    definiteness,
                    source: MetadataSource::Declared,
                });
            }
        }

        // A declaration without gender still names the noun to look up
        let lemma = unit
            .declared
            .as_ref()
            .map(|d| d.noun_lemma.as_str())
            .filter(|l| !l.trim().is_empty())
            .or(unit.noun_lemma.as_deref())
            .filter(|l| !l.trim().is_empty());

        let Some(lemma) = lemma else {
            return Extraction::Missing;
        };

        match self.lexicon.lookup_noun(lemma) {
            Some(entry) => {
                let number = unit
                    .declared
                    .as_ref()
                    .and_then(|d| d.number)
                    .unwrap_or_else(|| infer_number(entry, unit.noun_text.as_deref()));
                Extraction::Inferred(LinguisticMetadata {
                    noun_lemma: entry.lemma.clone(),
                    gender: entry.gender,
                    number,
                    definiteness,
                    source: MetadataSource::Inferred,
                })
            }
            None => Extraction::UnknownNoun {
                lemma: lemma.to_string(),
            },
        }
    }
}

/// Postposed articles (plain, proximal, distal) a plural noun can carry
const PLURAL_ARTICLES: [&str; 6] = ["те", "ве", "не", "та", "ва", "на"];

/// Infer number from the noun as authored.
///
/// Plural when the text is the listed irregular plural, or when a declining
/// noun's text differs from its lemma and carries a regular plural ending.
/// Both checks also look through a definite article (`куќите`, `селата`).
fn infer_number(entry: &NounEntry, noun_text: Option<&str>) -> GrammaticalNumber {
    let Some(text) = noun_text.map(normalize_form).filter(|t| !t.is_empty()) else {
        return GrammaticalNumber::Singular;
    };

    let stems: Vec<&str> = std::iter::once(text.as_str())
        .chain(
            PLURAL_ARTICLES
                .iter()
                .chain(["то", "во", "но"].iter())
                .filter_map(|article| text.strip_suffix(article)),
        )
        .filter(|stem| !stem.is_empty())
        .collect();

    if let Some(plural) = &entry.irregular_plural {
        let plural = normalize_form(plural);
        if stems.iter().any(|stem| *stem == plural) {
            return GrammaticalNumber::Plural;
        }
    }

    let lemma = normalize_form(&entry.lemma);
    if !entry.declines_for_number || text == lemma {
        return GrammaticalNumber::Singular;
    }

    let bare_plural = |stem: &str| {
        stem != lemma
            && (stem.ends_with('и') || (entry.gender == Gender::Neuter && stem.ends_with('а')))
    };
    let article_plural = PLURAL_ARTICLES
        .iter()
        .filter_map(|article| text.strip_suffix(article))
        .any(bare_plural);

    if bare_plural(&text) || article_plural {
        GrammaticalNumber::Plural
    } else {
        GrammaticalNumber::Singular
    }
}
