//! Content units and corpus file loading
//!
//! A corpus file is JSON or YAML holding either a bare list of units or a
//! lesson wrapper:
//!
//! ```yaml
//! lesson: lesson-03-home
//! units:
//!   - id: l03-p07
//!     field: phrases[7].adjective
//!     noun_lemma: куќа
//!     requires_definite_article: true
//!     adjective_lemma: голем
//!     adjective_text: големата
//! ```

use crate::grammar::{Definiteness, Gender, GrammaticalNumber};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CorpusError {
    #[error("Failed to read corpus {file}: {source}")]
    Io {
        file: PathBuf,
        source: std::io::Error,
    },
    #[error("Failed to parse corpus {file}: {source}")]
    ParseYaml {
        file: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Failed to parse corpus {file}: {source}")]
    ParseJson {
        file: PathBuf,
        source: serde_json::Error,
    },
    #[error("Unknown corpus file format: {0}")]
    UnknownFormat(PathBuf),
    #[error("Invalid pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        source: glob::PatternError,
    },
    #[error("No corpus files matched: {pattern}")]
    NoMatch { pattern: String },
}

/// Author-declared grammatical facts for a unit's head noun
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredMetadata {
    /// May be empty when gender is declared directly
    #[serde(default)]
    pub noun_lemma: String,
    /// Without a declared gender the dictionary is consulted
    #[serde(default)]
    pub gender: Option<Gender>,
    #[serde(default)]
    pub number: Option<GrammaticalNumber>,
    #[serde(default)]
    pub definiteness: Option<Definiteness>,
}

impl DeclaredMetadata {
    pub fn new(noun_lemma: &str, gender: Gender, number: GrammaticalNumber) -> Self {
        Self {
            noun_lemma: noun_lemma.to_string(),
            gender: Some(gender),
            number: Some(number),
            definiteness: None,
        }
    }

    pub fn with_definiteness(mut self, definiteness: Definiteness) -> Self {
        self.definiteness = Some(definiteness);
        self
    }
}

/// One checkable noun-adjective pairing in authored content
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentUnit {
    pub id: String,
    #[serde(default)]
    pub lesson: Option<String>,
    /// Path of the checked text inside the source record
    #[serde(default = "default_field")]
    pub field: String,
    #[serde(default)]
    pub declared: Option<DeclaredMetadata>,
    #[serde(default)]
    pub noun_lemma: Option<String>,
    /// Surface form of the noun as authored, used to infer number
    #[serde(default)]
    pub noun_text: Option<String>,
    #[serde(default)]
    pub requires_definite_article: Option<bool>,
    #[serde(default)]
    pub adjective_lemma: Option<String>,
    #[serde(default)]
    pub adjective_text: String,
}

fn default_field() -> String {
    "adjective".to_string()
}

impl ContentUnit {
    pub fn new(id: &str, adjective_text: &str) -> Self {
        Self {
            id: id.to_string(),
            field: default_field(),
            adjective_text: adjective_text.to_string(),
            ..Self::default()
        }
    }

    pub fn in_lesson(mut self, lesson: &str) -> Self {
        self.lesson = Some(lesson.to_string());
        self
    }

    pub fn with_field(mut self, field: &str) -> Self {
        self.field = field.to_string();
        self
    }

    pub fn with_declared(mut self, declared: DeclaredMetadata) -> Self {
        self.declared = Some(declared);
        self
    }

    pub fn with_noun(mut self, lemma: &str) -> Self {
        self.noun_lemma = Some(lemma.to_string());
        self
    }

    pub fn with_noun_text(mut self, text: &str) -> Self {
        self.noun_text = Some(text.to_string());
        self
    }

    pub fn with_adjective(mut self, lemma: &str) -> Self {
        self.adjective_lemma = Some(lemma.to_string());
        self
    }

    pub fn definite(mut self, required: bool) -> Self {
        self.requires_definite_article = Some(required);
        self
    }
}

#[derive(Debug, Deserialize)]
struct LessonFile {
    #[serde(default)]
    lesson: Option<String>,
    units: Vec<ContentUnit>,
}

impl LessonFile {
    fn into_units(self) -> Vec<ContentUnit> {
        let lesson = self.lesson;
        self.units
            .into_iter()
            .map(|mut unit| {
                if unit.lesson.is_none() {
                    unit.lesson = lesson.clone();
                }
                unit
            })
            .collect()
    }
}

// The document shape is checked first so unit-level errors keep their own message
fn parse_yaml(content: &str, path: &Path) -> Result<Vec<ContentUnit>, CorpusError> {
    let err = |source: serde_yaml::Error| CorpusError::ParseYaml {
        file: path.to_path_buf(),
        source,
    };
    let value: serde_yaml::Value = serde_yaml::from_str(content).map_err(err)?;
    if value.is_sequence() {
        serde_yaml::from_str(content).map_err(err)
    } else {
        serde_yaml::from_str::<LessonFile>(content)
            .map(LessonFile::into_units)
            .map_err(err)
    }
}

fn parse_json(content: &str, path: &Path) -> Result<Vec<ContentUnit>, CorpusError> {
    let err = |source: serde_json::Error| CorpusError::ParseJson {
        file: path.to_path_buf(),
        source,
    };
    let value: serde_json::Value = serde_json::from_str(content).map_err(err)?;
    if value.is_array() {
        serde_json::from_str(content).map_err(err)
    } else {
        serde_json::from_str::<LessonFile>(content)
            .map(LessonFile::into_units)
            .map_err(err)
    }
}

/// Load the units of one corpus file, in file order
pub fn load_corpus_file(path: &Path) -> Result<Vec<ContentUnit>, CorpusError> {
    let content = fs::read_to_string(path).map_err(|source| CorpusError::Io {
        file: path.to_path_buf(),
        source,
    })?;

    match path.extension().and_then(|e| e.to_str()).unwrap_or("") {
        "yaml" | "yml" => parse_yaml(&content, path),
        "json" => parse_json(&content, path),
        _ => Err(CorpusError::UnknownFormat(path.to_path_buf())),
    }
}

/// Expand file arguments and glob patterns, keeping argument order.
///
/// Every pattern must match at least one file.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>, CorpusError> {
    let mut files = Vec::new();
    for pattern in patterns {
        let paths = glob::glob(pattern).map_err(|source| CorpusError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;
        let mut matched = false;
        for entry in paths.flatten().filter(|p| p.is_file()) {
            matched = true;
            if !files.contains(&entry) {
                files.push(entry);
            }
        }
        if !matched {
            return Err(CorpusError::NoMatch {
                pattern: pattern.clone(),
            });
        }
    }
    Ok(files)
}

/// Concatenate corpus files into one ordered corpus
pub fn load_corpus(files: &[PathBuf]) -> Result<Vec<ContentUnit>, CorpusError> {
    let mut corpus = Vec::new();
    for file in files {
        let units = load_corpus_file(file)?;
        log::debug!("Loaded {} units from {}", units.len(), file.display());
        corpus.extend(units);
    }
    Ok(corpus)
}
