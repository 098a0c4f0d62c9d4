// SPDX-License-Identifier: PMPL-1.0-or-later

//! The four ISO 639-3 reference tables.
//!
//! The tables ship as tab-separated files in the SIL column layout
//! (<https://iso639-3.sil.org/code_tables/download_tables>), embedded at
//! compile time. [`Dataset::from_embedded`] parses them once into memory;
//! every lookup afterwards is an exact-key hash probe.
//!
//! Parsing refuses to produce a partial dataset: a missing header, a row
//! with the wrong column count, an empty required field, an unknown tag
//! letter, or an unparseable retirement date all fail the load. Empty cells
//! in optional columns decode to `None`.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use std::collections::HashMap;

use crate::language::{LanguageType, RetireReason, Scope, Status};

const CODES_TSV: &str = include_str!("../../data/iso-639-3.tab");
const NAME_INDEX_TSV: &str = include_str!("../../data/iso-639-3_Name_Index.tab");
const MACROLANGUAGES_TSV: &str = include_str!("../../data/iso-639-3-macrolanguages.tab");
const RETIREMENTS_TSV: &str = include_str!("../../data/iso-639-3_Retirements.tab");

const CODES_COLUMNS: [&str; 8] = [
    "Id",
    "Part2b",
    "Part2t",
    "Part1",
    "Scope",
    "Language_Type",
    "Ref_Name",
    "Comment",
];
const NAME_INDEX_COLUMNS: [&str; 3] = ["Id", "Print_Name", "Inverted_Name"];
const MACROLANGUAGES_COLUMNS: [&str; 3] = ["M_Id", "I_Id", "I_Status"];
const RETIREMENTS_COLUMNS: [&str; 6] = [
    "Id",
    "Ref_Name",
    "Ret_Reason",
    "Change_To",
    "Ret_Remedy",
    "Effective",
];

/// A row of the codes table: one active 639-3 identifier.
#[derive(Debug, Clone)]
pub struct CodeRow {
    pub id: String,
    pub part2b: Option<String>,
    pub part2t: Option<String>,
    pub part1: Option<String>,
    pub scope: Scope,
    pub kind: LanguageType,
    pub ref_name: String,
    pub comment: Option<String>,
}

/// A row of the name index table: an alternative (print, inverted) name.
#[derive(Debug, Clone)]
pub struct NameRow {
    pub id: String,
    pub print_name: String,
    pub inverted_name: String,
}

/// A row of the macrolanguages table: individual-to-macrolanguage link.
#[derive(Debug, Clone)]
pub struct MacrolanguageRow {
    pub macro_id: String,
    pub individual_id: String,
    pub status: Status,
}

/// A row of the retirements table: one retired 639-3 identifier.
#[derive(Debug, Clone)]
pub struct RetirementRow {
    pub id: String,
    pub ref_name: String,
    pub reason: RetireReason,
    pub change_to: Option<String>,
    pub remedy: Option<String>,
    pub effective: NaiveDate,
}

/// The parsed reference tables, keyed for O(1) exact lookups.
///
/// Rows are also kept in table order: the resolver's secondary indices
/// depend on row order for their last-write-wins collision policy.
#[derive(Debug)]
pub struct Dataset {
    codes: Vec<CodeRow>,
    codes_by_id: HashMap<String, usize>,
    names: Vec<NameRow>,
    names_by_id: HashMap<String, Vec<usize>>,
    macrolanguages: Vec<MacrolanguageRow>,
    macrolanguage_by_individual: HashMap<String, usize>,
    retirements: Vec<RetirementRow>,
    retirements_by_id: HashMap<String, usize>,
}

impl Dataset {
    /// Parse the embedded tables. Any malformed row fails the whole load.
    pub fn from_embedded() -> Result<Dataset> {
        let codes = parse_codes(CODES_TSV).context("parsing the codes table")?;
        let names = parse_name_index(NAME_INDEX_TSV).context("parsing the name index table")?;
        let macrolanguages = parse_macrolanguages(MACROLANGUAGES_TSV)
            .context("parsing the macrolanguages table")?;
        let retirements =
            parse_retirements(RETIREMENTS_TSV).context("parsing the retirements table")?;

        let mut codes_by_id = HashMap::with_capacity(codes.len());
        for (i, row) in codes.iter().enumerate() {
            codes_by_id.insert(row.id.clone(), i);
        }

        let mut names_by_id: HashMap<String, Vec<usize>> = HashMap::new();
        for (i, row) in names.iter().enumerate() {
            names_by_id.entry(row.id.clone()).or_default().push(i);
        }

        // At most one macrolanguage per individual code; first link wins if
        // the source data ever carries duplicates.
        let mut macrolanguage_by_individual = HashMap::with_capacity(macrolanguages.len());
        for (i, row) in macrolanguages.iter().enumerate() {
            macrolanguage_by_individual
                .entry(row.individual_id.clone())
                .or_insert(i);
        }

        let mut retirements_by_id = HashMap::with_capacity(retirements.len());
        for (i, row) in retirements.iter().enumerate() {
            retirements_by_id.insert(row.id.clone(), i);
        }

        Ok(Dataset {
            codes,
            codes_by_id,
            names,
            names_by_id,
            macrolanguages,
            macrolanguage_by_individual,
            retirements,
            retirements_by_id,
        })
    }

    pub fn code(&self, id: &str) -> Option<&CodeRow> {
        self.codes_by_id.get(id).map(|&i| &self.codes[i])
    }

    pub fn retirement(&self, id: &str) -> Option<&RetirementRow> {
        self.retirements_by_id.get(id).map(|&i| &self.retirements[i])
    }

    pub fn macrolanguage_for(&self, individual_id: &str) -> Option<&MacrolanguageRow> {
        self.macrolanguage_by_individual
            .get(individual_id)
            .map(|&i| &self.macrolanguages[i])
    }

    /// Name index entries for an identifier, in table order. Possibly empty.
    pub fn name_entries(&self, id: &str) -> impl Iterator<Item = &NameRow> {
        self.names_by_id
            .get(id)
            .into_iter()
            .flatten()
            .map(move |&i| &self.names[i])
    }

    /// Codes rows in table order.
    pub fn codes(&self) -> &[CodeRow] {
        &self.codes
    }

    /// Name index rows in table order.
    pub fn names(&self) -> &[NameRow] {
        &self.names
    }

    /// Retirement rows in table order.
    pub fn retirements(&self) -> &[RetirementRow] {
        &self.retirements
    }

    pub fn code_count(&self) -> usize {
        self.codes.len()
    }

    pub fn name_count(&self) -> usize {
        self.names.len()
    }

    pub fn macrolanguage_count(&self) -> usize {
        self.macrolanguages.len()
    }

    pub fn retirement_count(&self) -> usize {
        self.retirements.len()
    }
}

/// Split a TSV table into per-row field vectors, validating the header and
/// the column count of every row.
fn parse_rows<'a, const N: usize>(src: &'a str, columns: &[&str; N]) -> Result<Vec<[&'a str; N]>> {
    let mut lines = src.lines();
    let header = lines.next().context("table is empty, no header row")?;
    let header_fields: Vec<&str> = header.trim_end_matches('\r').split('\t').collect();
    if header_fields != columns {
        bail!(
            "unexpected header {:?}, expected {:?}",
            header_fields,
            columns
        );
    }

    let mut rows = Vec::new();
    for (line_no, line) in lines.enumerate() {
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        let fields: Vec<&str> = line.split('\t').collect();
        let fields: [&str; N] = fields.try_into().map_err(|fields: Vec<&str>| {
            anyhow::anyhow!(
                "row {}: expected {} columns, found {}",
                line_no + 2,
                N,
                fields.len()
            )
        })?;
        rows.push(fields);
    }
    Ok(rows)
}

fn required(value: &str, column: &str, id: &str) -> Result<String> {
    if value.is_empty() {
        bail!("row {:?}: required column {} is empty", id, column);
    }
    Ok(value.to_owned())
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_owned())
    }
}

fn parse_codes(src: &str) -> Result<Vec<CodeRow>> {
    let mut out = Vec::new();
    for [id, part2b, part2t, part1, scope, kind, ref_name, comment] in
        parse_rows(src, &CODES_COLUMNS)?
    {
        let id = required(id, "Id", id)?;
        let scope = Scope::from_code(scope)
            .with_context(|| format!("row {:?}: unknown scope {:?}", id, scope))?;
        let kind = LanguageType::from_code(kind)
            .with_context(|| format!("row {:?}: unknown language type {:?}", id, kind))?;
        out.push(CodeRow {
            part2b: optional(part2b),
            part2t: optional(part2t),
            part1: optional(part1),
            scope,
            kind,
            ref_name: required(ref_name, "Ref_Name", &id)?,
            comment: optional(comment),
            id,
        });
    }
    Ok(out)
}

fn parse_name_index(src: &str) -> Result<Vec<NameRow>> {
    let mut out = Vec::new();
    for [id, print_name, inverted_name] in parse_rows(src, &NAME_INDEX_COLUMNS)? {
        let id = required(id, "Id", id)?;
        out.push(NameRow {
            print_name: required(print_name, "Print_Name", &id)?,
            inverted_name: required(inverted_name, "Inverted_Name", &id)?,
            id,
        });
    }
    Ok(out)
}

fn parse_macrolanguages(src: &str) -> Result<Vec<MacrolanguageRow>> {
    let mut out = Vec::new();
    for [macro_id, individual_id, status] in parse_rows(src, &MACROLANGUAGES_COLUMNS)? {
        let individual_id = required(individual_id, "I_Id", individual_id)?;
        let status = Status::from_code(status).with_context(|| {
            format!("row {:?}: unknown individual status {:?}", individual_id, status)
        })?;
        out.push(MacrolanguageRow {
            macro_id: required(macro_id, "M_Id", &individual_id)?,
            individual_id,
            status,
        });
    }
    Ok(out)
}

fn parse_retirements(src: &str) -> Result<Vec<RetirementRow>> {
    let mut out = Vec::new();
    for [id, ref_name, reason, change_to, remedy, effective] in
        parse_rows(src, &RETIREMENTS_COLUMNS)?
    {
        let id = required(id, "Id", id)?;
        let reason = RetireReason::from_code(reason)
            .with_context(|| format!("row {:?}: unknown retirement reason {:?}", id, reason))?;
        let effective = NaiveDate::parse_from_str(effective, "%Y-%m-%d")
            .with_context(|| format!("row {:?}: bad effective date {:?}", id, effective))?;
        out.push(RetirementRow {
            ref_name: required(ref_name, "Ref_Name", &id)?,
            reason,
            change_to: optional(change_to),
            remedy: optional(remedy),
            effective,
            id,
        });
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn embedded_tables_parse() {
        let dataset = Dataset::from_embedded().unwrap();
        assert!(dataset.code_count() > 100);
        assert!(dataset.retirement_count() > 0);
        assert!(dataset.macrolanguage_count() > 0);
        // Every active code owns at least its reference-name entry.
        assert!(dataset.name_count() >= dataset.code_count());
    }

    #[test]
    fn code_lookup_is_exact() {
        let dataset = Dataset::from_embedded().unwrap();
        let fra = dataset.code("fra").unwrap();
        assert_eq!(fra.part2b.as_deref(), Some("fre"));
        assert_eq!(fra.part2t.as_deref(), Some("fra"));
        assert_eq!(fra.part1.as_deref(), Some("fr"));
        assert_eq!(fra.scope, Scope::Individual);
        assert_eq!(fra.kind, LanguageType::Living);
        assert_eq!(fra.ref_name, "French");
        assert!(fra.comment.is_none());

        assert!(dataset.code("FRA").is_none());
        assert!(dataset.code("fre").is_none());
    }

    #[test]
    fn retirement_lookup() {
        let dataset = Dataset::from_embedded().unwrap();
        let bvs = dataset.retirement("bvs").unwrap();
        assert_eq!(bvs.ref_name, "Belgian Sign Language");
        assert_eq!(bvs.reason, RetireReason::Split);
        assert_eq!(bvs.effective, NaiveDate::from_ymd_opt(2007, 7, 18).unwrap());
        assert!(bvs.change_to.is_none());
        assert!(bvs.remedy.as_deref().unwrap().starts_with("Split into"));

        // Retired identifiers never appear among the active codes.
        for row in dataset.retirements() {
            assert!(dataset.code(&row.id).is_none(), "{} is in both tables", row.id);
        }
    }

    #[test]
    fn macrolanguage_links() {
        let dataset = Dataset::from_embedded().unwrap();
        let yue = dataset.macrolanguage_for("yue").unwrap();
        assert_eq!(yue.macro_id, "zho");
        assert_eq!(yue.status, Status::Active);
        assert!(dataset.macrolanguage_for("fra").is_none());
    }

    #[test]
    fn name_entries_preserve_table_order() {
        let dataset = Dataset::from_embedded().unwrap();
        let spa: Vec<&NameRow> = dataset.name_entries("spa").collect();
        assert_eq!(spa.len(), 2);
        assert_eq!(spa[0].print_name, "Spanish");
        assert_eq!(spa[1].print_name, "Castilian");
        assert_eq!(dataset.name_entries("bvs").count(), 0);
    }

    #[test]
    fn malformed_tables_are_rejected() {
        let bad_header = "Id\tPart2b\nfra\tfre\n";
        assert!(parse_codes(bad_header).is_err());

        let bad_scope = "Id\tPart2b\tPart2t\tPart1\tScope\tLanguage_Type\tRef_Name\tComment\n\
                         fra\tfre\tfra\tfr\tX\tL\tFrench\t\n";
        assert!(parse_codes(bad_scope).is_err());

        let missing_name = "Id\tPart2b\tPart2t\tPart1\tScope\tLanguage_Type\tRef_Name\tComment\n\
                            fra\tfre\tfra\tfr\tI\tL\t\t\n";
        assert!(parse_codes(missing_name).is_err());

        let bad_date = "Id\tRef_Name\tRet_Reason\tChange_To\tRet_Remedy\tEffective\n\
                        bvs\tBelgian Sign Language\tS\t\t\t18-07-2007\n";
        assert!(parse_retirements(bad_date).is_err());

        let short_row = "Id\tPrint_Name\tInverted_Name\nfra\tFrench\n";
        assert!(parse_name_index(short_row).is_err());
    }
}
