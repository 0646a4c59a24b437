//! mk-grammar CLI
//!
//! Audits lesson content for noun-adjective agreement and gates CI on the result.

use anyhow::{bail, Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use mk_grammar::baseline::Baseline;
use mk_grammar::config::{CliOverrides, ColorMode, Config, OutputFormat};
use mk_grammar::corpus::{expand_patterns, load_corpus};
use mk_grammar::output::{create_formatter, FormatOptions};
use mk_grammar::rule::{catalog, Rule, RuleId};
use mk_grammar::{Auditor, Definiteness, ExitPolicy, Lexicon, Severity};
use std::io::IsTerminal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "mk-grammar",
    version,
    about = "Macedonian noun-adjective agreement checker",
    long_about = "Audits authored lesson content for gender, number and definiteness agreement \
                  between adjectives and their head nouns."
)]
struct Cli {
    /// Corpus files or glob patterns (JSON or YAML)
    #[arg(required_unless_present_any = ["list_rules", "explain", "check_lexicon"])]
    corpus: Vec<String>,

    /// Exit 1 when any error is found
    #[arg(long)]
    ci: bool,

    /// Exit 1 when any error or warning is found (implies --ci)
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<Format>,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Additional lexicon file (repeatable)
    #[arg(short, long = "dictionary")]
    dictionaries: Vec<PathBuf>,

    /// Do not load the built-in seed lexicon
    #[arg(long)]
    no_builtin: bool,

    /// Number of parallel jobs (0 = auto)
    #[arg(short, long)]
    jobs: Option<usize>,

    /// Validate units on a single thread
    #[arg(long)]
    sequential: bool,

    /// Disable specific rules (comma-separated)
    #[arg(long, value_delimiter = ',')]
    disable: Vec<String>,

    /// Definiteness assumed when a unit does not say
    #[arg(long)]
    default_definiteness: Option<Definiteness>,

    /// Use baseline file to ignore known findings (creates if not found)
    #[arg(long)]
    baseline: Option<PathBuf>,

    /// Record current findings in the baseline
    #[arg(long, requires = "baseline")]
    update_baseline: bool,

    /// Write the report to a file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Add a generation timestamp outside the report body (json)
    #[arg(long)]
    timestamp: bool,

    /// Document title (markdown)
    #[arg(long)]
    title: Option<String>,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// List available rules and exit
    #[arg(long)]
    list_rules: bool,

    /// Show detailed information about a specific rule
    #[arg(long, value_name = "RULE")]
    explain: Option<String>,

    /// Report incomplete adjective paradigms in the lexicon and exit
    #[arg(long)]
    check_lexicon: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Markdown,
    Grouped,
    Json,
    Github,
}

impl From<Format> for OutputFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Text => OutputFormat::Text,
            Format::Markdown => OutputFormat::Markdown,
            Format::Grouped => OutputFormat::Grouped,
            Format::Json => OutputFormat::Json,
            Format::Github => OutputFormat::Github,
        }
    }
}

fn severity_label(severity: Severity) -> colored::ColoredString {
    match severity {
        Severity::Error => "error".red(),
        Severity::Warning => "warning".yellow(),
    }
}

fn list_rules() {
    println!("{}", "Available rules".bold());
    println!();
    for rule in catalog() {
        println!(
            "  {:<26} {:<8} {:<10} {}",
            rule.id.as_str().cyan(),
            severity_label(rule.severity()),
            rule.category,
            rule.name
        );
    }
}

/// Print detailed rule explanation
fn explain_rule(rule: &Rule) {
    println!("{}", "Rule Details".bold());
    println!();
    println!("  {}: {}", "ID".bold(), rule.id.as_str().cyan());
    println!("  {}: {}", "Name".bold(), rule.name);
    println!("  {}: {}", "Severity".bold(), severity_label(rule.severity()));
    println!("  {}: {}", "Category".bold(), rule.category);

    println!();
    println!("  {}", "Description".bold());
    println!("  {}", rule.description);

    println!();
    println!("  {}", "Rationale".bold());
    println!("  {}", rule.rationale);

    println!();
    println!("  {} {}", "Example".bold(), "(incorrect)".red());
    println!("    {}", rule.example_bad);

    println!();
    println!("  {} {}", "Example".bold(), "(correct)".green());
    println!("    {}", rule.example_good);
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => Config::load_default().context("Failed to load config")?,
    };

    config.merge_cli(CliOverrides {
        format: cli.format.map(OutputFormat::from),
        jobs: cli.jobs,
        sequential: cli.sequential,
        disabled_rules: cli.disable.clone(),
        default_definiteness: cli.default_definiteness,
        dictionaries: cli.dictionaries.clone(),
        no_builtin: cli.no_builtin,
        no_color: cli.no_color,
    });
    config.validate().context("Invalid configuration")?;
    Ok(config)
}

fn load_lexicon(config: &Config) -> Result<Lexicon> {
    let lexicon = Lexicon::load(&config.dictionaries.paths, config.dictionaries.builtin)
        .context("Failed to load lexicon")?;
    if lexicon.nouns.is_empty() && lexicon.adjectives.is_empty() {
        log::warn!("Lexicon is empty; every unit will be reported as unchecked");
    }
    log::info!(
        "Lexicon: {} nouns, {} adjectives",
        lexicon.nouns.len(),
        lexicon.adjectives.len()
    );
    Ok(lexicon)
}

fn check_lexicon(lexicon: &Lexicon) -> i32 {
    let gaps = lexicon.validate();
    if gaps.is_empty() {
        println!(
            "All {} adjective paradigms are complete or invariant",
            lexicon.adjectives.len()
        );
        return 0;
    }

    for gap in &gaps {
        let missing: Vec<String> = gap.missing.iter().map(|k| k.to_string()).collect();
        println!(
            "{}: {} missing {}",
            "incomplete".yellow().bold(),
            gap.lemma.cyan(),
            missing.join(", ")
        );
    }
    println!("\n{} incomplete paradigm(s)", gaps.len());
    1
}

fn apply_color(mode: ColorMode, to_file: bool) -> bool {
    let enabled = match mode {
        ColorMode::Always => !to_file,
        ColorMode::Never => false,
        ColorMode::Auto => !to_file && std::io::stdout().is_terminal(),
    };
    colored::control::set_override(enabled);
    enabled
}

fn run(cli: &Cli) -> Result<i32> {
    if cli.list_rules {
        list_rules();
        return Ok(0);
    }

    if let Some(rule_id) = &cli.explain {
        let id: RuleId = match rule_id.parse() {
            Ok(id) => id,
            Err(e) => bail!("{} (use --list-rules to see available rules)", e),
        };
        explain_rule(&id.rule());
        return Ok(0);
    }

    let config = load_config(cli)?;
    let lexicon = load_lexicon(&config)?;

    if cli.check_lexicon {
        return Ok(check_lexicon(&lexicon));
    }

    let files = expand_patterns(&cli.corpus)?;
    let corpus = load_corpus(&files)?;
    log::info!("Loaded {} units from {} file(s)", corpus.len(), files.len());

    let mut report = Auditor::new(&lexicon, &config).audit_all(&corpus);

    if let Some(baseline_path) = &cli.baseline {
        let mut baseline = Baseline::load_or_new(baseline_path)?;
        if cli.update_baseline || !baseline_path.exists() {
            baseline.add_report(&report);
            baseline.save(baseline_path)?;
            eprintln!(
                "Baseline {} now holds {} finding(s)",
                baseline_path.display(),
                baseline.issue_count()
            );
            for (rule_id, count) in baseline.count_by_rule() {
                log::info!("  {}: {}", rule_id, count);
            }
        }
        let removed = baseline.filter_report(&mut report);
        if removed > 0 {
            log::info!("Filtered out {} baselined finding(s)", removed);
        }
    }

    let options = FormatOptions {
        colored: apply_color(config.output.color, cli.output.is_some()),
        statistics: config.output.statistics,
        title: cli.title.clone(),
        generated_at: cli.timestamp.then(mk_grammar::baseline::current_timestamp),
    };
    let rendered = create_formatter(config.output.format, &options).format(&report);

    match &cli.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            eprintln!("Report written to {}", path.display());
        }
        None => print!("{}", rendered),
    }

    Ok(ExitPolicy::from_flags(cli.ci, cli.strict).exit_code(&report.summary))
}

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "info" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    if cli.no_color {
        colored::control::set_override(false);
    }

    match run(&cli) {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            std::process::exit(2);
        }
    }
}
