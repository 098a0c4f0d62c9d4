// SPDX-License-Identifier: PMPL-1.0-or-later

//! The public `Language` record and its supporting vocabulary.
//!
//! A [`Language`] is the denormalized join of the four ISO 639-3 reference
//! tables (codes, name index, macrolanguages, retirements), keyed by the
//! three-letter 639-3 identifier. Records are assembled once at registry
//! construction and never mutated; equality and hashing are defined solely
//! by the identifier.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};
use thiserror::Error;

use crate::resolve;

/// Raised when no probe in the applicable match order succeeds.
///
/// Carries the original raw input verbatim for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{input:?} is not an ISO 639 language code or name")]
pub struct LanguageNotFoundError {
    pub input: String,
}

impl LanguageNotFoundError {
    pub fn new(input: &str) -> Self {
        Self {
            input: input.to_owned(),
        }
    }
}

/// Controls how user input is compared against the reference tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchMode {
    /// Case- and whitespace-sensitive.
    Exact,
    /// Case-insensitive, with leading/trailing whitespace trimmed.
    Lenient,
}

/// Scope of a language code (the `Scope` column of the codes table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Scope {
    Individual,
    Macrolanguage,
    Special,
}

impl Scope {
    /// Single-letter tag used in the SIL code tables.
    pub fn code(&self) -> &'static str {
        match self {
            Scope::Individual => "I",
            Scope::Macrolanguage => "M",
            Scope::Special => "S",
        }
    }

    pub fn from_code(code: &str) -> Option<Scope> {
        match code {
            "I" => Some(Scope::Individual),
            "M" => Some(Scope::Macrolanguage),
            "S" => Some(Scope::Special),
            _ => None,
        }
    }
}

/// Type of a language (the `Language_Type` column of the codes table).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LanguageType {
    Ancient,
    Constructed,
    Extinct,
    Historical,
    Living,
    Special,
}

impl LanguageType {
    pub fn code(&self) -> &'static str {
        match self {
            LanguageType::Ancient => "A",
            LanguageType::Constructed => "C",
            LanguageType::Extinct => "E",
            LanguageType::Historical => "H",
            LanguageType::Living => "L",
            LanguageType::Special => "S",
        }
    }

    pub fn from_code(code: &str) -> Option<LanguageType> {
        match code {
            "A" => Some(LanguageType::Ancient),
            "C" => Some(LanguageType::Constructed),
            "E" => Some(LanguageType::Extinct),
            "H" => Some(LanguageType::Historical),
            "L" => Some(LanguageType::Living),
            "S" => Some(LanguageType::Special),
            _ => None,
        }
    }
}

/// Whether an identifier is currently part of the standard or retired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    Active,
    Retired,
}

impl Status {
    pub fn code(&self) -> &'static str {
        match self {
            Status::Active => "A",
            Status::Retired => "R",
        }
    }

    pub fn from_code(code: &str) -> Option<Status> {
        match code {
            "A" => Some(Status::Active),
            "R" => Some(Status::Retired),
            _ => None,
        }
    }
}

/// Why an identifier was retired (the `Ret_Reason` column).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetireReason {
    Change,
    Duplicate,
    NonExistent,
    Split,
    Merge,
}

impl RetireReason {
    pub fn code(&self) -> &'static str {
        match self {
            RetireReason::Change => "C",
            RetireReason::Duplicate => "D",
            RetireReason::NonExistent => "N",
            RetireReason::Split => "S",
            RetireReason::Merge => "M",
        }
    }

    pub fn from_code(code: &str) -> Option<RetireReason> {
        match code {
            "C" => Some(RetireReason::Change),
            "D" => Some(RetireReason::Duplicate),
            "N" => Some(RetireReason::NonExistent),
            "S" => Some(RetireReason::Split),
            "M" => Some(RetireReason::Merge),
            _ => None,
        }
    }
}

/// An alternative name of a language, as a (print, inverted) pair from the
/// name index table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Name {
    pub print: String,
    pub inverted: String,
}

impl Name {
    pub fn new(print: &str, inverted: &str) -> Self {
        Self {
            print: print.to_owned(),
            inverted: inverted.to_owned(),
        }
    }
}

/// A language in the ISO 639-3 charts.
///
/// Exactly one of the two statuses holds: [`Status::Active`] records carry
/// the codes-table fields and no retirement fields; [`Status::Retired`]
/// records carry the retirement fields, a scope fixed to `Individual`, and
/// `None` for every codes-only field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Language {
    // From the codes table
    pub part3: String,
    pub part2b: Option<String>,
    pub part2t: Option<String>,
    pub part1: Option<String>,
    pub scope: Scope,
    pub kind: Option<LanguageType>,
    pub status: Status,
    pub name: String,
    pub comment: Option<String>,

    // From the name index table
    pub other_names: Option<Vec<Name>>,

    // From the macrolanguages table
    pub macrolanguage: Option<String>,

    // From the retirements table
    pub retire_reason: Option<RetireReason>,
    pub retire_change_to: Option<String>,
    pub retire_remedy: Option<String>,
    pub retire_date: Option<NaiveDate>,
}

// Two records with the same identifier are the same language, even when
// constructed independently.
impl PartialEq for Language {
    fn eq(&self, other: &Self) -> bool {
        self.part3 == other.part3
    }
}

impl Eq for Language {}

impl Hash for Language {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.part3.hash(state);
    }
}

impl Language {
    /// Resolve a language code or name leniently (trimmed, case-insensitive).
    ///
    /// Probes, in order: active 639-3 identifiers, 639-2 bibliographic
    /// codes, 639-2 terminological codes, 639-1 codes, retired 639-3
    /// identifiers, reference names, print names, inverted names. The order
    /// biases towards the input being a code rather than a name, and a
    /// current code rather than a legacy or retired one.
    ///
    /// # Examples
    /// ```
    /// use iso639::Language;
    /// assert_eq!(Language::matching("FRA").unwrap().part3, "fra");
    /// assert_eq!(Language::matching("fre").unwrap().part3, "fra");
    /// ```
    pub fn matching(input: &str) -> Result<&'static Language, LanguageNotFoundError> {
        resolve::match_language(input, MatchMode::Lenient)
    }

    /// Like [`Language::matching`], but case- and whitespace-sensitive.
    pub fn matching_exact(input: &str) -> Result<&'static Language, LanguageNotFoundError> {
        resolve::match_language(input, MatchMode::Exact)
    }

    /// Resolve an ISO 639-3 identifier (active or retired). Exact.
    pub fn from_part3(input: &str) -> Result<&'static Language, LanguageNotFoundError> {
        resolve::registry().from_part3(input)
    }

    /// Resolve an ISO 639-2 bibliographic code. Exact.
    pub fn from_part2b(input: &str) -> Result<&'static Language, LanguageNotFoundError> {
        resolve::registry().from_part2b(input)
    }

    /// Resolve an ISO 639-2 terminological code. Exact.
    pub fn from_part2t(input: &str) -> Result<&'static Language, LanguageNotFoundError> {
        resolve::registry().from_part2t(input)
    }

    /// Resolve an ISO 639-1 code. Exact.
    pub fn from_part1(input: &str) -> Result<&'static Language, LanguageNotFoundError> {
        resolve::registry().from_part1(input)
    }

    /// Resolve a reference, print, or inverted language name. Exact.
    pub fn from_name(input: &str) -> Result<&'static Language, LanguageNotFoundError> {
        resolve::registry().from_name(input)
    }

    /// Every language in the catalog, one record per distinct identifier
    /// across the codes and retirements tables. No ordering guarantee.
    pub fn all() -> impl Iterator<Item = &'static Language> {
        resolve::all_languages()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scope_letters_round_trip() {
        for scope in [Scope::Individual, Scope::Macrolanguage, Scope::Special] {
            assert_eq!(Scope::from_code(scope.code()), Some(scope));
        }
        assert_eq!(Scope::from_code("X"), None);
    }

    #[test]
    fn language_type_letters_round_trip() {
        for kind in [
            LanguageType::Ancient,
            LanguageType::Constructed,
            LanguageType::Extinct,
            LanguageType::Historical,
            LanguageType::Living,
            LanguageType::Special,
        ] {
            assert_eq!(LanguageType::from_code(kind.code()), Some(kind));
        }
        assert_eq!(LanguageType::from_code(""), None);
    }

    #[test]
    fn retire_reason_letters_round_trip() {
        for reason in [
            RetireReason::Change,
            RetireReason::Duplicate,
            RetireReason::NonExistent,
            RetireReason::Split,
            RetireReason::Merge,
        ] {
            assert_eq!(RetireReason::from_code(reason.code()), Some(reason));
        }
        assert_eq!(RetireReason::from_code("Z"), None);
    }

    #[test]
    fn name_pair_fields() {
        let name = Name::new("foo", "bar");
        assert_eq!(name.print, "foo");
        assert_eq!(name.inverted, "bar");
    }

    #[test]
    fn not_found_error_carries_raw_input() {
        let err = LanguageNotFoundError::new("  FRA ");
        assert_eq!(err.input, "  FRA ");
        assert!(err.to_string().contains("\"  FRA \""));
    }
}
