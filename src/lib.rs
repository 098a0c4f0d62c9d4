// SPDX-License-Identifier: PMPL-1.0-or-later

//! iso639 — resolve language codes and names to ISO 639-3 records.
//!
//! The crate joins the four SIL reference tables (codes, name index,
//! macrolanguages, retirements) into one denormalized [`Language`] entity
//! and resolves free-form input against them with an ordered-fallback
//! matcher: current codes before legacy codes, legacy codes before retired
//! codes, codes before names.
//!
//! ```
//! use iso639::Language;
//!
//! let french = Language::matching("fre").unwrap();
//! assert_eq!(french.part3, "fra");
//! assert_eq!(french.name, "French");
//!
//! // Narrow entry points are exact and probe a single source.
//! assert_eq!(Language::from_part1("fr").unwrap(), french);
//! assert!(Language::from_part3("FRA").is_err());
//! ```
//!
//! The reference dataset is embedded at compile time and parsed once, on
//! first use. All lookup state is immutable after that, so the crate is
//! safe for unsynchronized concurrent reads.

pub mod data;
pub mod language;
pub mod resolve;

pub use language::{
    Language, LanguageNotFoundError, LanguageType, MatchMode, Name, RetireReason, Scope, Status,
};
pub use resolve::{all_languages, match_language};

use chrono::NaiveDate;
use std::sync::LazyLock;

/// Release date of the embedded ISO 639-3 dataset snapshot. Tracks the
/// upstream data release, not the crate version.
pub static DATA_LAST_UPDATED: LazyLock<NaiveDate> =
    LazyLock::new(|| NaiveDate::from_ymd_opt(2025, 1, 15).expect("valid snapshot date"));
