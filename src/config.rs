//! Configuration for the grammar auditor
//!
//! Reads configuration from:
//! - `.mkgrammarrc.yaml` / `.mkgrammarrc.json` (project-level)
//! - `~/.mkgrammarrc.yaml` (user-level)
//!
//! CLI flags are merged on top with [`Config::merge_cli`].

use crate::diagnostic::Severity;
use crate::extractor::DefinitenessPolicy;
use crate::grammar::Definiteness;
use crate::rule::RuleId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Validate units on a thread pool
    pub parallel: bool,

    /// Number of parallel jobs (0 = auto-detect)
    pub jobs: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            jobs: 0,
        }
    }
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,

    /// Color mode
    pub color: ColorMode,

    /// Show the summary block
    pub statistics: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            color: ColorMode::Auto,
            statistics: true,
        }
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Markdown,
    Grouped,
    Json,
    Github,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            "grouped" => Ok(OutputFormat::Grouped),
            "json" => Ok(OutputFormat::Json),
            "github" => Ok(OutputFormat::Github),
            _ => Err(format!("Unknown output format: {}", s)),
        }
    }
}

/// Color mode options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

/// Rule configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Disabled rules
    pub disabled: Vec<String>,

    /// Severity overrides (rule_id -> severity)
    pub severity: BTreeMap<String, Severity>,
}

/// Agreement policy settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    /// Definiteness assumed when a unit says nothing about it
    pub default_definiteness: Definiteness,
}

/// Lexicon sources
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DictionaryConfig {
    /// Extra lexicon files, merged in order
    pub paths: Vec<PathBuf>,

    /// Start from the built-in seed lexicon
    pub builtin: bool,
}

impl Default for DictionaryConfig {
    fn default() -> Self {
        Self {
            paths: Vec::new(),
            builtin: true,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Engine settings
    pub engine: EngineConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Rule configuration
    pub rules: RulesConfig,

    /// Agreement policy
    pub policy: PolicyConfig,

    /// Lexicon sources
    pub dictionaries: DictionaryConfig,
}

/// Flags given on the command line; `None` leaves the configured value alone
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub format: Option<OutputFormat>,
    pub jobs: Option<usize>,
    pub sequential: bool,
    pub disabled_rules: Vec<String>,
    pub default_definiteness: Option<Definiteness>,
    pub dictionaries: Vec<PathBuf>,
    pub no_builtin: bool,
    pub no_color: bool,
}

const CONFIG_NAMES: [&str; 6] = [
    ".mkgrammarrc.yaml",
    ".mkgrammarrc.yml",
    ".mkgrammarrc.json",
    "mkgrammar.yaml",
    "mkgrammar.yml",
    "mkgrammar.json",
];

impl Config {
    /// Create default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        let mut config: Self = match ext {
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "json" => serde_json::from_str(&content)?,
            _ => {
                return Err(ConfigError::Invalid(format!(
                    "Unknown config file format: {}",
                    ext
                )))
            }
        };

        // Lexicon paths are relative to the config file
        let base_dir = path.parent().unwrap_or(Path::new("."));
        for dict in &mut config.dictionaries.paths {
            if dict.is_relative() {
                *dict = base_dir.join(&*dict);
            }
        }

        config.validate()?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from default locations
    pub fn load_default() -> Result<Self, ConfigError> {
        // Check current directory
        for name in &CONFIG_NAMES {
            let path = PathBuf::from(name);
            if path.exists() {
                return Self::load(&path);
            }
        }

        // Check home directory
        if let Some(home) = dirs::home_dir() {
            for name in &CONFIG_NAMES {
                let path = home.join(name);
                if path.exists() {
                    return Self::load(&path);
                }
            }
        }

        Ok(Self::default())
    }

    /// Reject rule ids that name no rule
    pub fn validate(&self) -> Result<(), ConfigError> {
        let ids = self.rules.disabled.iter().chain(self.rules.severity.keys());
        for id in ids {
            id.parse::<RuleId>().map_err(ConfigError::Invalid)?;
        }
        if self.engine.jobs > 1024 {
            return Err(ConfigError::Invalid(format!(
                "engine.jobs out of range: {}",
                self.engine.jobs
            )));
        }
        Ok(())
    }

    /// Merge CLI arguments into configuration
    pub fn merge_cli(&mut self, cli: CliOverrides) {
        if let Some(f) = cli.format {
            self.output.format = f;
        }
        if let Some(j) = cli.jobs {
            self.engine.jobs = j;
        }
        if cli.sequential {
            self.engine.parallel = false;
        }
        self.rules.disabled.extend(cli.disabled_rules);
        if let Some(d) = cli.default_definiteness {
            self.policy.default_definiteness = d;
        }
        self.dictionaries.paths.extend(cli.dictionaries);
        if cli.no_builtin {
            self.dictionaries.builtin = false;
        }
        if cli.no_color {
            self.output.color = ColorMode::Never;
        }
    }

    /// Check if a rule is enabled
    pub fn is_rule_enabled(&self, rule_id: RuleId) -> bool {
        !self
            .rules
            .disabled
            .iter()
            .any(|id| id.parse::<RuleId>() == Ok(rule_id))
    }

    /// Get severity override for a rule
    pub fn get_severity_override(&self, rule_id: RuleId) -> Option<Severity> {
        self.rules
            .severity
            .iter()
            .find(|(id, _)| id.parse::<RuleId>() == Ok(rule_id))
            .map(|(_, severity)| *severity)
    }

    /// Severity a finding of this rule is reported at
    pub fn severity_for(&self, rule_id: RuleId) -> Severity {
        self.get_severity_override(rule_id)
            .unwrap_or_else(|| rule_id.default_severity())
    }

    pub fn definiteness_policy(&self) -> DefinitenessPolicy {
        DefinitenessPolicy::new(self.policy.default_definiteness)
    }
}
