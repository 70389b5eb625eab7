//! Slug and catalog id generation.

use super::Catalog;
use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;

pub const CATALOG_ID_PREFIX: &str = "DPI";

lazy_static! {
    static ref NON_SLUG_CHARS: Regex = Regex::new(r"[^a-z0-9\s-]").unwrap();
    static ref WHITESPACE_RUNS: Regex = Regex::new(r"\s+").unwrap();
    static ref HYPHEN_RUNS: Regex = Regex::new(r"-+").unwrap();
}

/// Normalizes a title into a URL-safe slug made of `[a-z0-9-]`.
///
/// Does not check uniqueness, the catalog store does that on append.
pub fn generate_slug(title: &str) -> String {
    let lowered = title.to_lowercase();
    let stripped = NON_SLUG_CHARS.replace_all(&lowered, "");
    let hyphenated = WHITESPACE_RUNS.replace_all(&stripped, "-");
    let collapsed = HYPHEN_RUNS.replace_all(&hyphenated, "-");
    collapsed.trim_matches('-').to_string()
}

/// Next catalog id for the year of `today`, formatted `DPI-<year>-<seq>`.
///
/// The sequence is one past the larger of the number of ids already issued
/// for the year and the highest sequence number found among them, so ids
/// stay unique after records are deleted or reordered.
pub fn generate_catalog_id(catalog: &Catalog, today: NaiveDate) -> String {
    let year = today.year();
    let year_prefix = format!("{}-{}-", CATALOG_ID_PREFIX, year);

    let mut count = 0u32;
    let mut highest = 0u32;
    for release in catalog.releases.iter() {
        if let Some(seq) = release.catalog_id.strip_prefix(&year_prefix) {
            count += 1;
            if let Ok(seq) = seq.parse::<u32>() {
                highest = highest.max(seq);
            }
        }
    }

    format!("{}{:04}", year_prefix, count.max(highest) + 1)
}
