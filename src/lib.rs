//! mk-grammar - Macedonian agreement checker for learning content
//!
//! Verifies that adjectives in authored lesson content agree with their head
//! noun in gender, number and definiteness, and produces audit reports used to
//! gate content before it reaches learners.
//!
//! # Architecture
//!
//! ```text
//! corpus -> MetadataExtractor -> RuleEngine (per unit) -> Auditor -> OutputFormatter
//! ```
//!
//! The [`Lexicon`] is loaded once and passed by reference to everything that
//! needs it. The engine is a pure function of a unit, the lexicon and the
//! configuration; the auditor fans units out over a rayon pool and folds the
//! results back in corpus order.
//!
//! # Example
//!
//! ```
//! use mk_grammar::{Auditor, Config, ContentUnit, Lexicon, RuleId};
//!
//! let lexicon = Lexicon::builtin().unwrap();
//! let corpus = vec![ContentUnit::new("l03-p07", "голем")
//!     .with_noun("куќа")
//!     .with_adjective("голем")
//!     .definite(true)];
//!
//! let report = Auditor::new(&lexicon, &Config::new()).audit_all(&corpus);
//! let finding = &report.entries[0].errors[0];
//! assert_eq!(finding.rule_id, RuleId::AgreementMismatch);
//! assert_eq!(finding.expected.as_deref(), Some("големата"));
//! ```

pub mod auditor;
pub mod baseline;
pub mod config;
pub mod corpus;
pub mod diagnostic;
pub mod dictionary;
pub mod engine;
pub mod extractor;
pub mod grammar;
pub mod normalize;
pub mod output;
pub mod policy;
pub mod rule;

// Re-export main types
pub use auditor::{AuditSummary, Auditor, ContentAuditEntry, ContentAuditReport};
pub use baseline::Baseline;
pub use config::{Config, OutputFormat};
pub use corpus::{ContentUnit, DeclaredMetadata};
pub use diagnostic::{Diagnostic, Location, Severity};
pub use dictionary::{AdjectiveParadigm, Lexicon, NounEntry};
pub use engine::{RuleEngine, UnitValidation};
pub use extractor::{DefinitenessPolicy, Extraction, LinguisticMetadata, MetadataExtractor};
pub use grammar::{Definiteness, FormKey, Gender, GrammaticalNumber};
pub use output::OutputFormatter;
pub use policy::ExitPolicy;
pub use rule::{Rule, RuleCategory, RuleId};
