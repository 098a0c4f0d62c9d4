// SPDX-License-Identifier: PMPL-1.0-or-later

//! The lookup engine: secondary indices, ordered-fallback matching, and
//! record assembly.
//!
//! A [`Registry`] owns the parsed [`Dataset`], six secondary indices
//! (legacy code and name columns mapped back to the canonical 639-3
//! identifier), the eagerly assembled catalog of [`Language`] records, and
//! a memoization cache for the general matcher. The process-wide registry
//! is published once through a `LazyLock`; everything behind it is
//! immutable, so concurrent reads need no synchronization beyond the
//! cache's own lock.
//!
//! Index keys are stored exactly as they appear in the tables. Lenient
//! matching normalizes the query, never the keys: the trimmed query and its
//! lowercased form are hash-probed first, and only if both miss does a
//! case-insensitive scan of the index run. That scan is a first-call cost;
//! the cache makes every repeat of the same (input, mode) pair O(1).

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

use anyhow::Result;

use crate::data::{CodeRow, Dataset, RetirementRow};
use crate::language::{Language, LanguageNotFoundError, MatchMode, Name, Scope, Status};

/// One probe step of the matching algorithm. Mirrors the source columns of
/// the reference tables; the set is closed and ordered by `FULL_ORDER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Probe {
    CodeId,
    Part2b,
    Part2t,
    Part1,
    RetiredId,
    RefName,
    PrintName,
    InvertedName,
}

/// The general matcher's probe order. Inputs are assumed more likely to be
/// codes than names, and among codes, current ones more likely than legacy
/// (639-2, 639-1) ones, which in turn are more likely than retired ones.
const FULL_ORDER: [Probe; 8] = [
    Probe::CodeId,
    Probe::Part2b,
    Probe::Part2t,
    Probe::Part1,
    Probe::RetiredId,
    Probe::RefName,
    Probe::PrintName,
    Probe::InvertedName,
];

const NAME_ORDER: [Probe; 3] = [Probe::RefName, Probe::PrintName, Probe::InvertedName];

/// Secondary indices over the dataset, each mapping an exact column value
/// to the canonical part3 identifier.
///
/// Collisions (two rows producing the same key) resolve last-write-wins in
/// table row order. The source data is assumed collision-free for the code
/// columns; name columns do collide occasionally, which makes those
/// matches row-order dependent — an accepted quirk of the source tables.
#[derive(Debug)]
struct Indices {
    by_part2b: HashMap<String, String>,
    by_part2t: HashMap<String, String>,
    by_part1: HashMap<String, String>,
    by_ref_name: HashMap<String, String>,
    by_print_name: HashMap<String, String>,
    by_inverted_name: HashMap<String, String>,
}

impl Indices {
    /// One linear pass over the codes table, one over the name index.
    fn build(dataset: &Dataset) -> Indices {
        let mut by_part2b = HashMap::new();
        let mut by_part2t = HashMap::new();
        let mut by_part1 = HashMap::new();
        let mut by_ref_name = HashMap::new();
        for row in dataset.codes() {
            if let Some(part2b) = &row.part2b {
                by_part2b.insert(part2b.clone(), row.id.clone());
            }
            if let Some(part2t) = &row.part2t {
                by_part2t.insert(part2t.clone(), row.id.clone());
            }
            if let Some(part1) = &row.part1 {
                by_part1.insert(part1.clone(), row.id.clone());
            }
            by_ref_name.insert(row.ref_name.clone(), row.id.clone());
        }

        let mut by_print_name = HashMap::new();
        let mut by_inverted_name = HashMap::new();
        for row in dataset.names() {
            by_print_name.insert(row.print_name.clone(), row.id.clone());
            by_inverted_name.insert(row.inverted_name.clone(), row.id.clone());
        }

        Indices {
            by_part2b,
            by_part2t,
            by_part1,
            by_ref_name,
            by_print_name,
            by_inverted_name,
        }
    }
}

/// The process-lifetime lookup context: dataset, indices, assembled
/// catalog, and the (input, mode) memoization cache.
#[derive(Debug)]
pub struct Registry {
    dataset: Dataset,
    indices: Indices,
    languages: HashMap<String, Language>,
    memo: RwLock<HashMap<(String, MatchMode), String>>,
}

impl Registry {
    /// Build the registry from the embedded tables. Fails if any table is
    /// malformed; lookups are never served from a partial dataset.
    pub fn new() -> Result<Registry> {
        let dataset = Dataset::from_embedded()?;
        let indices = Indices::build(&dataset);

        // Assemble the full catalog eagerly, one record per identifier
        // across codes and retirements.
        let mut languages = HashMap::with_capacity(dataset.code_count() + dataset.retirement_count());
        for row in dataset.codes() {
            languages.insert(row.id.clone(), assemble_active(&dataset, row));
        }
        for row in dataset.retirements() {
            // An identifier present in both tables is active.
            languages
                .entry(row.id.clone())
                .or_insert_with(|| assemble_retired(&dataset, row));
        }

        Ok(Registry {
            dataset,
            indices,
            languages,
            memo: RwLock::new(HashMap::new()),
        })
    }

    /// The general ordered-fallback matcher. Memoized per (input, mode).
    pub fn match_language(
        &self,
        input: &str,
        mode: MatchMode,
    ) -> Result<&Language, LanguageNotFoundError> {
        if let Some(part3) = self
            .memo
            .read()
            .expect("match cache lock poisoned")
            .get(&(input.to_owned(), mode))
        {
            return self.language(part3, input);
        }

        let part3 = self.resolve(input, mode, &FULL_ORDER)?;
        self.memo
            .write()
            .expect("match cache lock poisoned")
            .insert((input.to_owned(), mode), part3.clone());
        self.language(&part3, input)
    }

    /// Probe only the 639-3 identifiers, active then retired. Exact.
    pub fn from_part3(&self, input: &str) -> Result<&Language, LanguageNotFoundError> {
        let part3 = self.resolve(input, MatchMode::Exact, &[Probe::CodeId, Probe::RetiredId])?;
        self.language(&part3, input)
    }

    /// Probe only the 639-2 bibliographic codes. Exact.
    pub fn from_part2b(&self, input: &str) -> Result<&Language, LanguageNotFoundError> {
        let part3 = self.resolve(input, MatchMode::Exact, &[Probe::Part2b])?;
        self.language(&part3, input)
    }

    /// Probe only the 639-2 terminological codes. Exact.
    pub fn from_part2t(&self, input: &str) -> Result<&Language, LanguageNotFoundError> {
        let part3 = self.resolve(input, MatchMode::Exact, &[Probe::Part2t])?;
        self.language(&part3, input)
    }

    /// Probe only the 639-1 codes. Exact.
    pub fn from_part1(&self, input: &str) -> Result<&Language, LanguageNotFoundError> {
        let part3 = self.resolve(input, MatchMode::Exact, &[Probe::Part1])?;
        self.language(&part3, input)
    }

    /// Probe only the name columns: reference, print, then inverted. Exact.
    pub fn from_name(&self, input: &str) -> Result<&Language, LanguageNotFoundError> {
        let part3 = self.resolve(input, MatchMode::Exact, &NAME_ORDER)?;
        self.language(&part3, input)
    }

    /// Every assembled record, no ordering guarantee.
    pub fn languages(&self) -> impl Iterator<Item = &Language> {
        self.languages.values()
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    /// Resolve a raw input to a part3 identifier by probing in order,
    /// short-circuiting on the first hit.
    fn resolve(
        &self,
        input: &str,
        mode: MatchMode,
        order: &[Probe],
    ) -> Result<String, LanguageNotFoundError> {
        for probe in order {
            let hit = match probe {
                Probe::CodeId => self.probe_id(input, mode, |id| self.dataset.code(id).is_some()),
                Probe::RetiredId => {
                    self.probe_id(input, mode, |id| self.dataset.retirement(id).is_some())
                }
                Probe::Part2b => probe_index(&self.indices.by_part2b, input, mode),
                Probe::Part2t => probe_index(&self.indices.by_part2t, input, mode),
                Probe::Part1 => probe_index(&self.indices.by_part1, input, mode),
                Probe::RefName => probe_index(&self.indices.by_ref_name, input, mode),
                Probe::PrintName => probe_index(&self.indices.by_print_name, input, mode),
                Probe::InvertedName => probe_index(&self.indices.by_inverted_name, input, mode),
            };
            if let Some(part3) = hit {
                return Ok(part3);
            }
        }
        Err(LanguageNotFoundError::new(input))
    }

    /// Membership test against a primary-identifier table. The identifier
    /// is its own key, so lenient mode only needs the lowercased form.
    fn probe_id(
        &self,
        input: &str,
        mode: MatchMode,
        contains: impl Fn(&str) -> bool,
    ) -> Option<String> {
        match mode {
            MatchMode::Exact => contains(input).then(|| input.to_owned()),
            MatchMode::Lenient => {
                let candidate = input.trim().to_lowercase();
                contains(&candidate).then_some(candidate)
            }
        }
    }

    fn language(
        &self,
        part3: &str,
        input: &str,
    ) -> Result<&Language, LanguageNotFoundError> {
        self.languages
            .get(part3)
            .ok_or_else(|| LanguageNotFoundError::new(input))
    }
}

/// Probe one secondary index. Exact mode is a single hash lookup. Lenient
/// mode trims the query, tries it and its lowercased form, then falls back
/// to a case-insensitive scan of the stored keys.
fn probe_index(index: &HashMap<String, String>, input: &str, mode: MatchMode) -> Option<String> {
    match mode {
        MatchMode::Exact => index.get(input).cloned(),
        MatchMode::Lenient => {
            let trimmed = input.trim();
            if let Some(part3) = index.get(trimmed) {
                return Some(part3.clone());
            }
            let lowered = trimmed.to_lowercase();
            if let Some(part3) = index.get(lowered.as_str()) {
                return Some(part3.clone());
            }
            index
                .iter()
                .find(|(key, _)| key.to_lowercase() == lowered)
                .map(|(_, part3)| part3.clone())
        }
    }
}

/// Join the four tables for an active identifier.
fn assemble_active(dataset: &Dataset, row: &CodeRow) -> Language {
    Language {
        part3: row.id.clone(),
        part2b: row.part2b.clone(),
        part2t: row.part2t.clone(),
        part1: row.part1.clone(),
        scope: row.scope,
        kind: Some(row.kind),
        status: Status::Active,
        name: row.ref_name.clone(),
        comment: row.comment.clone(),
        other_names: other_names(dataset, &row.id, &row.ref_name),
        macrolanguage: macrolanguage(dataset, &row.id),
        retire_reason: None,
        retire_change_to: None,
        retire_remedy: None,
        retire_date: None,
    }
}

/// Join the tables for a retired identifier: scope is fixed to Individual
/// and every codes-only field is absent.
fn assemble_retired(dataset: &Dataset, row: &RetirementRow) -> Language {
    Language {
        part3: row.id.clone(),
        part2b: None,
        part2t: None,
        part1: None,
        scope: Scope::Individual,
        kind: None,
        status: Status::Retired,
        name: row.ref_name.clone(),
        comment: None,
        other_names: other_names(dataset, &row.id, &row.ref_name),
        macrolanguage: macrolanguage(dataset, &row.id),
        retire_reason: Some(row.reason),
        retire_change_to: row.change_to.clone(),
        retire_remedy: row.remedy.clone(),
        retire_date: Some(row.effective),
    }
}

/// Name index entries for an identifier, minus any whose print and
/// inverted forms both equal the reference name (a redundant self
/// reference). `None` when nothing remains.
fn other_names(dataset: &Dataset, part3: &str, ref_name: &str) -> Option<Vec<Name>> {
    let names: Vec<Name> = dataset
        .name_entries(part3)
        .filter(|row| !(row.print_name == ref_name && row.inverted_name == ref_name))
        .map(|row| Name::new(&row.print_name, &row.inverted_name))
        .collect();
    if names.is_empty() {
        None
    } else {
        Some(names)
    }
}

fn macrolanguage(dataset: &Dataset, part3: &str) -> Option<String> {
    dataset
        .macrolanguage_for(part3)
        .map(|row| row.macro_id.clone())
}

static REGISTRY: LazyLock<Registry> = LazyLock::new(|| {
    // A malformed embedded dataset is unrecoverable; refuse to serve.
    Registry::new().unwrap_or_else(|err| panic!("ISO 639-3 dataset failed to load: {err:#}"))
});

/// The process-wide registry, built once on first use.
pub fn registry() -> &'static Registry {
    &REGISTRY
}

/// Resolve a language code or name against the process-wide registry.
pub fn match_language(
    input: &str,
    mode: MatchMode,
) -> Result<&'static Language, LanguageNotFoundError> {
    registry().match_language(input, mode)
}

/// Every language in the catalog, one per identifier across the codes and
/// retirements tables.
pub fn all_languages() -> impl Iterator<Item = &'static Language> {
    registry().languages()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_order_prefers_active_codes() {
        let registry = registry();
        // "nor" is an active 639-3 identifier and a 639-2 code for the same
        // language; the membership probe must win before any index runs.
        let part3 = registry.resolve("nor", MatchMode::Exact, &FULL_ORDER).unwrap();
        assert_eq!(part3, "nor");
    }

    #[test]
    fn retired_ids_resolve_before_names() {
        let registry = registry();
        let part3 = registry.resolve("bvs", MatchMode::Exact, &FULL_ORDER).unwrap();
        assert_eq!(part3, "bvs");
    }

    #[test]
    fn lenient_probe_normalizes_the_query_not_the_keys() {
        let registry = registry();
        assert!(registry.indices.by_ref_name.contains_key("French"));
        assert!(!registry.indices.by_ref_name.contains_key("french"));

        assert_eq!(
            probe_index(&registry.indices.by_ref_name, "  french ", MatchMode::Lenient).as_deref(),
            Some("fra")
        );
        assert_eq!(
            probe_index(&registry.indices.by_ref_name, "FRENCH", MatchMode::Lenient).as_deref(),
            Some("fra")
        );
        assert_eq!(
            probe_index(&registry.indices.by_ref_name, "french", MatchMode::Exact),
            None
        );
    }

    #[test]
    fn legacy_code_indices_skip_absent_fields() {
        let registry = registry();
        // "yue" has no 639-2 or 639-1 code; nothing may map to it.
        assert!(!registry.indices.by_part2b.values().any(|v| v == "yue"));
        assert!(!registry.indices.by_part1.values().any(|v| v == "yue"));
        assert_eq!(registry.indices.by_part2b.get("fre").map(String::as_str), Some("fra"));
        assert_eq!(registry.indices.by_part2t.get("fra").map(String::as_str), Some("fra"));
    }

    #[test]
    fn memo_cache_returns_the_same_record() {
        let registry = registry();
        let first = registry.match_language("German", MatchMode::Lenient).unwrap();
        let second = registry.match_language("German", MatchMode::Lenient).unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(registry
            .memo
            .read()
            .unwrap()
            .contains_key(&("German".to_owned(), MatchMode::Lenient)));
    }

    #[test]
    fn assembly_suppresses_redundant_self_names() {
        let registry = registry();
        let eng = registry.from_part3("eng").unwrap();
        assert!(eng.other_names.is_none());

        let spa = registry.from_part3("spa").unwrap();
        let other = spa.other_names.as_ref().unwrap();
        assert_eq!(other.len(), 1);
        assert_eq!(other[0], Name::new("Castilian", "Castilian"));
    }
}
