//! Lexical dictionaries: nouns and adjective paradigms
//!
//! A [`Lexicon`] is loaded once per process and handed to the engine by
//! reference. Lexicon files are YAML or JSON:
//!
//! ```yaml
//! nouns:
//!   - lemma: куќа
//!     gender: feminine
//! adjectives:
//!   - lemma: голем
//!     singular:
//!       masculine: { indefinite: голем, definite: големиот }
//!       feminine: { indefinite: голема, definite: големата }
//!       neuter: { indefinite: големо, definite: големото }
//!     plural: { indefinite: големи, definite: големите }
//!   - lemma: браон
//!     invariant: true
//! ```

use crate::grammar::{Definiteness, FormKey, Gender, GrammaticalNumber};
use crate::normalize::{normalize_form, normalize_lemma};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Seed lexicon compiled into the binary
const BUILTIN_LEXICON: &str = include_str!("../data/lexicon.yaml");

#[derive(Error, Debug)]
pub enum DictionaryError {
    #[error("Failed to read lexicon {file}: {source}")]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse lexicon {file}: {source}")]
    ParseYaml {
        file: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Failed to parse lexicon {file}: {source}")]
    ParseJson {
        file: PathBuf,
        source: serde_json::Error,
    },
    #[error("Unknown lexicon file format: {0}")]
    UnknownFormat(PathBuf),
    #[error("Invalid form key '{key}' in paradigm '{lemma}': {reason}")]
    InvalidFormKey {
        lemma: String,
        key: String,
        reason: String,
    },
    #[error("Duplicate {kind} lemma: {lemma}")]
    DuplicateLemma { kind: &'static str, lemma: String },
}

/// A noun and its grammatical identity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NounEntry {
    pub lemma: String,
    pub gender: Gender,
    /// False for nouns with no distinct plural (mass nouns, abstracts)
    #[serde(default = "default_true")]
    pub declines_for_number: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub irregular_plural: Option<String>,
}

fn default_true() -> bool {
    true
}

impl NounEntry {
    pub fn new(lemma: &str, gender: Gender) -> Self {
        Self {
            lemma: lemma.to_string(),
            gender,
            declines_for_number: true,
            irregular_plural: None,
        }
    }

    pub fn with_irregular_plural(mut self, plural: &str) -> Self {
        self.irregular_plural = Some(plural.to_string());
        self
    }

    pub fn without_number(mut self) -> Self {
        self.declines_for_number = false;
        self
    }
}

/// Surface forms of one adjective across gender, number and definiteness
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdjectiveParadigm {
    pub lemma: String,
    /// Same surface for every combination; never looked up by form
    pub invariant: bool,
    forms: BTreeMap<FormKey, String>,
}

impl AdjectiveParadigm {
    pub fn new(lemma: &str) -> Self {
        Self {
            lemma: lemma.to_string(),
            invariant: false,
            forms: BTreeMap::new(),
        }
    }

    pub fn invariant(lemma: &str) -> Self {
        Self {
            invariant: true,
            ..Self::new(lemma)
        }
    }

    pub fn with_form(mut self, key: FormKey, form: &str) -> Self {
        self.forms.insert(key, form.to_string());
        self
    }

    /// Register the standard four-way singular/plural pattern
    pub fn with_regular_forms(
        mut self,
        masculine: [&str; 2],
        feminine: [&str; 2],
        neuter: [&str; 2],
        plural: [&str; 2],
    ) -> Self {
        use GrammaticalNumber::{Plural, Singular};
        for (gender, pair) in [
            (Gender::Masculine, masculine),
            (Gender::Feminine, feminine),
            (Gender::Neuter, neuter),
        ] {
            self.insert_pair(gender, Singular, pair);
            self.insert_pair(gender, Plural, plural);
        }
        self
    }

    fn insert_pair(&mut self, gender: Gender, number: GrammaticalNumber, pair: [&str; 2]) {
        self.forms.insert(
            FormKey::new(gender, number, Definiteness::Indefinite),
            pair[0].to_string(),
        );
        self.forms.insert(
            FormKey::new(gender, number, Definiteness::Definite),
            pair[1].to_string(),
        );
    }

    pub fn form(&self, key: FormKey) -> Option<&str> {
        self.forms.get(&key).map(String::as_str)
    }

    pub fn forms(&self) -> impl Iterator<Item = (&FormKey, &String)> {
        self.forms.iter()
    }

    /// Keys a non-invariant paradigm fails to cover
    pub fn missing_keys(&self) -> Vec<FormKey> {
        if self.invariant {
            return Vec::new();
        }
        FormKey::all()
            .filter(|key| !self.forms.contains_key(key))
            .collect()
    }
}

/// Noun lookup table
#[derive(Debug, Clone, Default)]
pub struct NounDictionary {
    entries: BTreeMap<String, NounEntry>,
}

impl NounDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, entry: NounEntry) -> Result<(), DictionaryError> {
        let key = normalize_lemma(&entry.lemma);
        if self.entries.contains_key(&key) {
            return Err(DictionaryError::DuplicateLemma {
                kind: "noun",
                lemma: entry.lemma,
            });
        }
        self.entries.insert(key, entry);
        Ok(())
    }

    pub fn lookup(&self, lemma: &str) -> Option<&NounEntry> {
        self.entries.get(&normalize_lemma(lemma))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &NounEntry> {
        self.entries.values()
    }
}

/// Adjective paradigm lookup table with a surface-form reverse index
#[derive(Debug, Clone, Default)]
pub struct AdjectiveDictionary {
    paradigms: BTreeMap<String, AdjectiveParadigm>,
    /// normalized surface -> normalized lemma; `None` marks a surface shared by two lemmas
    surfaces: HashMap<String, Option<String>>,
}

impl AdjectiveDictionary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, paradigm: AdjectiveParadigm) -> Result<(), DictionaryError> {
        let key = normalize_lemma(&paradigm.lemma);
        if self.paradigms.contains_key(&key) {
            return Err(DictionaryError::DuplicateLemma {
                kind: "adjective",
                lemma: paradigm.lemma,
            });
        }

        let surfaces = std::iter::once(paradigm.lemma.as_str())
            .chain(paradigm.forms.values().map(String::as_str));
        for surface in surfaces {
            let normalized = normalize_form(surface);
            match self.surfaces.get(&normalized) {
                None => {
                    self.surfaces.insert(normalized, Some(key.clone()));
                }
                Some(Some(owner)) if *owner != key => {
                    self.surfaces.insert(normalized, None);
                }
                Some(_) => {}
            }
        }

        self.paradigms.insert(key, paradigm);
        Ok(())
    }

    pub fn paradigm(&self, lemma: &str) -> Option<&AdjectiveParadigm> {
        self.paradigms.get(&normalize_lemma(lemma))
    }

    /// Expected surface form, or `None` when the lemma or the cell is unknown
    pub fn lookup_form(
        &self,
        lemma: &str,
        gender: Gender,
        number: GrammaticalNumber,
        definiteness: Definiteness,
    ) -> Option<&str> {
        self.paradigm(lemma)?
            .form(FormKey::new(gender, number, definiteness))
    }

    /// Find the lemma owning a surface form. Ambiguous surfaces resolve to `None`.
    pub fn lemma_for_form(&self, surface: &str) -> Option<&str> {
        let lemma = self.surfaces.get(&normalize_form(surface))?.as_ref()?;
        self.paradigms.get(lemma).map(|p| p.lemma.as_str())
    }

    pub fn len(&self) -> usize {
        self.paradigms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paradigms.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &AdjectiveParadigm> {
        self.paradigms.values()
    }
}

/// A gap in a non-invariant paradigm
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParadigmGap {
    pub lemma: String,
    pub missing: Vec<FormKey>,
}

/// Both dictionaries, loaded together
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    pub nouns: NounDictionary,
    pub adjectives: AdjectiveDictionary,
}

// On-disk shapes

#[derive(Debug, Default, Deserialize)]
struct LexiconFile {
    #[serde(default)]
    nouns: Vec<NounEntry>,
    #[serde(default)]
    adjectives: Vec<AdjectiveRecord>,
}

#[derive(Debug, Deserialize)]
struct AdjectiveRecord {
    lemma: String,
    #[serde(default)]
    invariant: bool,
    #[serde(default)]
    singular: SingularForms,
    #[serde(default)]
    plural: Option<DefinitenessForms>,
    /// Explicit cells keyed `gender.number.definiteness`, applied last
    #[serde(default)]
    forms: BTreeMap<String, String>,
}

#[derive(Debug, Default, Deserialize)]
struct SingularForms {
    masculine: Option<DefinitenessForms>,
    feminine: Option<DefinitenessForms>,
    neuter: Option<DefinitenessForms>,
}

#[derive(Debug, Default, Deserialize)]
struct DefinitenessForms {
    indefinite: Option<String>,
    definite: Option<String>,
}

impl DefinitenessForms {
    fn cells(&self) -> impl Iterator<Item = (Definiteness, &String)> {
        [
            (Definiteness::Indefinite, self.indefinite.as_ref()),
            (Definiteness::Definite, self.definite.as_ref()),
        ]
        .into_iter()
        .filter_map(|(d, form)| form.map(|f| (d, f)))
    }
}

impl AdjectiveRecord {
    fn into_paradigm(self) -> Result<AdjectiveParadigm, DictionaryError> {
        let mut paradigm = if self.invariant {
            AdjectiveParadigm::invariant(&self.lemma)
        } else {
            AdjectiveParadigm::new(&self.lemma)
        };

        let singular = [
            (Gender::Masculine, &self.singular.masculine),
            (Gender::Feminine, &self.singular.feminine),
            (Gender::Neuter, &self.singular.neuter),
        ];
        for (gender, forms) in singular {
            if let Some(forms) = forms {
                for (definiteness, form) in forms.cells() {
                    let key = FormKey::new(gender, GrammaticalNumber::Singular, definiteness);
                    paradigm.forms.insert(key, form.clone());
                }
            }
        }

        // Plural does not distinguish gender
        if let Some(plural) = &self.plural {
            for gender in Gender::ALL {
                for (definiteness, form) in plural.cells() {
                    let key = FormKey::new(gender, GrammaticalNumber::Plural, definiteness);
                    paradigm.forms.insert(key, form.clone());
                }
            }
        }

        for (raw_key, form) in self.forms {
            let key: FormKey =
                raw_key
                    .parse()
                    .map_err(|reason| DictionaryError::InvalidFormKey {
                        lemma: self.lemma.clone(),
                        key: raw_key.clone(),
                        reason,
                    })?;
            paradigm.forms.insert(key, form);
        }

        Ok(paradigm)
    }
}

impl Lexicon {
    pub fn new() -> Self {
        Self::default()
    }

    /// The seed lexicon shipped with the crate
    pub fn builtin() -> Result<Self, DictionaryError> {
        Self::from_yaml_str(BUILTIN_LEXICON, Path::new("<builtin>"))
    }

    pub fn from_yaml_str(content: &str, origin: &Path) -> Result<Self, DictionaryError> {
        let file: LexiconFile =
            serde_yaml::from_str(content).map_err(|source| DictionaryError::ParseYaml {
                file: origin.to_path_buf(),
                source,
            })?;
        Self::from_file(file)
    }

    pub fn from_json_str(content: &str, origin: &Path) -> Result<Self, DictionaryError> {
        let file: LexiconFile =
            serde_json::from_str(content).map_err(|source| DictionaryError::ParseJson {
                file: origin.to_path_buf(),
                source,
            })?;
        Self::from_file(file)
    }

    fn from_file(file: LexiconFile) -> Result<Self, DictionaryError> {
        let mut lexicon = Self::new();
        for noun in file.nouns {
            lexicon.nouns.insert(noun)?;
        }
        for record in file.adjectives {
            lexicon.adjectives.insert(record.into_paradigm()?)?;
        }
        Ok(lexicon)
    }

    /// Load a lexicon file, choosing the parser by extension
    pub fn load_file(path: &Path) -> Result<Self, DictionaryError> {
        let content = fs::read_to_string(path).map_err(|source| DictionaryError::Io {
            file: path.to_path_buf(),
            source,
        })?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
        let lexicon = match ext {
            "yaml" | "yml" => Self::from_yaml_str(&content, path)?,
            "json" => Self::from_json_str(&content, path)?,
            _ => return Err(DictionaryError::UnknownFormat(path.to_path_buf())),
        };

        log::debug!(
            "Loaded lexicon {}: {} nouns, {} adjectives",
            path.display(),
            lexicon.nouns.len(),
            lexicon.adjectives.len()
        );
        Ok(lexicon)
    }

    /// Merge another lexicon in; redefining a lemma is an error
    pub fn merge(&mut self, other: Lexicon) -> Result<(), DictionaryError> {
        for (_, noun) in other.nouns.entries {
            self.nouns.insert(noun)?;
        }
        for (_, paradigm) in other.adjectives.paradigms {
            self.adjectives.insert(paradigm)?;
        }
        Ok(())
    }

    /// Build a lexicon from the seed data (optional) plus files, in order
    pub fn load(paths: &[PathBuf], include_builtin: bool) -> Result<Self, DictionaryError> {
        let mut lexicon = if include_builtin {
            Self::builtin()?
        } else {
            Self::new()
        };
        for path in paths {
            lexicon.merge(Self::load_file(path)?)?;
        }
        Ok(lexicon)
    }

    pub fn lookup_noun(&self, lemma: &str) -> Option<&NounEntry> {
        self.nouns.lookup(lemma)
    }

    pub fn lookup_adjective_form(
        &self,
        lemma: &str,
        gender: Gender,
        number: GrammaticalNumber,
        definiteness: Definiteness,
    ) -> Option<&str> {
        self.adjectives
            .lookup_form(lemma, gender, number, definiteness)
    }

    /// Paradigms that are neither complete nor marked invariant
    pub fn validate(&self) -> Vec<ParadigmGap> {
        self.adjectives
            .iter()
            .filter_map(|paradigm| {
                let missing = paradigm.missing_keys();
                if missing.is_empty() {
                    None
                } else {
                    Some(ParadigmGap {
                        lemma: paradigm.lemma.clone(),
                        missing,
                    })
                }
            })
            .collect()
    }
}
