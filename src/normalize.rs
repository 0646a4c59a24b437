//! Text normalization shared by dictionary lookups and form comparison

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid regex"));

static PUNCTUATION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\p{P}").expect("valid regex"));

/// Normalize a lookup key: trim, collapse internal whitespace, lower-case
pub fn normalize_lemma(s: &str) -> String {
    WHITESPACE.replace_all(s.trim(), " ").to_lowercase()
}

/// Normalize a surface form for comparison.
///
/// Same as [`normalize_lemma`] but punctuation is dropped first, so a form
/// authored as `„голема“,` compares equal to `голема`.
pub fn normalize_form(s: &str) -> String {
    let stripped = PUNCTUATION.replace_all(s, "");
    normalize_lemma(&stripped)
}
