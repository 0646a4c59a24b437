//! Grammatical categories that drive agreement
//!
//! Macedonian adjectives agree with their head noun in gender, number and
//! definiteness. In the plural the gender distinction collapses, but paradigms
//! are still keyed by all three categories so a lexicon can record exceptions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Grammatical gender
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Masculine,
    Feminine,
    Neuter,
}

/// Grammatical number
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GrammaticalNumber {
    Singular,
    Plural,
}

/// Definiteness, realized in Macedonian by a suffixed article
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Definiteness {
    #[default]
    Indefinite,
    Definite,
}

impl Gender {
    pub const ALL: [Gender; 3] = [Gender::Masculine, Gender::Feminine, Gender::Neuter];

    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Masculine => "masculine",
            Gender::Feminine => "feminine",
            Gender::Neuter => "neuter",
        }
    }
}

impl GrammaticalNumber {
    pub const ALL: [GrammaticalNumber; 2] = [GrammaticalNumber::Singular, GrammaticalNumber::Plural];

    pub fn as_str(&self) -> &'static str {
        match self {
            GrammaticalNumber::Singular => "singular",
            GrammaticalNumber::Plural => "plural",
        }
    }
}

impl Definiteness {
    pub const ALL: [Definiteness; 2] = [Definiteness::Indefinite, Definiteness::Definite];

    pub fn as_str(&self) -> &'static str {
        match self {
            Definiteness::Indefinite => "indefinite",
            Definiteness::Definite => "definite",
        }
    }
}

impl fmt::Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for GrammaticalNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Definiteness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Gender {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "masculine" | "masc" | "m" => Ok(Gender::Masculine),
            "feminine" | "fem" | "f" => Ok(Gender::Feminine),
            "neuter" | "neut" | "n" => Ok(Gender::Neuter),
            _ => Err(format!("Unknown gender: {}", s)),
        }
    }
}

impl FromStr for GrammaticalNumber {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "singular" | "sg" => Ok(GrammaticalNumber::Singular),
            "plural" | "pl" => Ok(GrammaticalNumber::Plural),
            _ => Err(format!("Unknown number: {}", s)),
        }
    }
}

impl FromStr for Definiteness {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "indefinite" | "indef" => Ok(Definiteness::Indefinite),
            "definite" | "def" => Ok(Definiteness::Definite),
            _ => Err(format!("Unknown definiteness: {}", s)),
        }
    }
}

/// One cell of an adjective paradigm
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FormKey {
    pub gender: Gender,
    pub number: GrammaticalNumber,
    pub definiteness: Definiteness,
}

impl FormKey {
    pub fn new(gender: Gender, number: GrammaticalNumber, definiteness: Definiteness) -> Self {
        Self {
            gender,
            number,
            definiteness,
        }
    }

    /// Every combination, in a stable order
    pub fn all() -> impl Iterator<Item = FormKey> {
        Gender::ALL.into_iter().flat_map(|gender| {
            GrammaticalNumber::ALL.into_iter().flat_map(move |number| {
                Definiteness::ALL
                    .into_iter()
                    .map(move |definiteness| FormKey::new(gender, number, definiteness))
            })
        })
    }
}

/// Renders as `gender.number.definiteness`, the same shape the lexicon files use
impl fmt::Display for FormKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.gender, self.number, self.definiteness)
    }
}

impl FromStr for FormKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.split('.').collect();
        if parts.len() != 3 {
            return Err(format!(
                "Invalid form key '{}': expected gender.number.definiteness",
                s
            ));
        }
        Ok(FormKey::new(
            parts[0].parse()?,
            parts[1].parse()?,
            parts[2].parse()?,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gender_from_str() {
        assert_eq!("feminine".parse::<Gender>(), Ok(Gender::Feminine));
        assert_eq!("M".parse::<Gender>(), Ok(Gender::Masculine));
        assert_eq!(" neut ".parse::<Gender>(), Ok(Gender::Neuter));
        assert!("common".parse::<Gender>().is_err());
    }

    #[test]
    fn test_number_and_definiteness_from_str() {
        assert_eq!("pl".parse::<GrammaticalNumber>(), Ok(GrammaticalNumber::Plural));
        assert_eq!("def".parse::<Definiteness>(), Ok(Definiteness::Definite));
        assert!("dual".parse::<GrammaticalNumber>().is_err());
    }

    #[test]
    fn test_definiteness_default() {
        assert_eq!(Definiteness::default(), Definiteness::Indefinite);
    }

    #[test]
    fn test_form_key_display_parse() {
        let key = FormKey::new(
            Gender::Neuter,
            GrammaticalNumber::Plural,
            Definiteness::Indefinite,
        );
        assert_eq!(key.to_string(), "neuter.plural.indefinite");
        assert_eq!("neuter.plural.indefinite".parse::<FormKey>(), Ok(key));
        assert!("neuter.plural".parse::<FormKey>().is_err());
    }

    #[test]
    fn test_form_key_all() {
        let keys: Vec<FormKey> = FormKey::all().collect();
        assert_eq!(keys.len(), 12);
        let unique: std::collections::HashSet<_> = keys.iter().collect();
        assert_eq!(unique.len(), 12);
    }

    #[test]
    fn test_serde_lowercase() {
        let json = serde_json::to_string(&Gender::Feminine).unwrap();
        assert_eq!(json, "\"feminine\"");
        let parsed: Definiteness = serde_json::from_str("\"definite\"").unwrap();
        assert_eq!(parsed, Definiteness::Definite);
    }
}
