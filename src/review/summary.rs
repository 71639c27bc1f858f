/*!
 * Views over a finished result list: ordering, category filtering and counts.
 */

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use super::record::{ErrorCategory, ErrorRecord};

/// Display order for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    /// Page ascending (default)
    #[default]
    PageAsc,
    /// Page descending
    PageDesc,
    /// Grouped by category label
    #[serde(rename = "type")]
    Category,
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PageAsc => write!(f, "page-asc"),
            Self::PageDesc => write!(f, "page-desc"),
            Self::Category => write!(f, "type"),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "page-asc" | "page" => Ok(Self::PageAsc),
            "page-desc" => Ok(Self::PageDesc),
            "type" | "category" => Ok(Self::Category),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// Sort records in place; ties keep their merge order
pub fn sort_records(records: &mut [ErrorRecord], order: SortOrder) {
    match order {
        SortOrder::PageAsc => records.sort_by_key(|r| r.page),
        SortOrder::PageDesc => records.sort_by(|a, b| b.page.cmp(&a.page)),
        SortOrder::Category => records.sort_by(|a, b| a.error_type.label().cmp(b.error_type.label())),
    }
}

/// Keep only records in `categories`; an empty selection keeps everything
pub fn filter_by_categories(records: Vec<ErrorRecord>, categories: &[ErrorCategory]) -> Vec<ErrorRecord> {
    if categories.is_empty() {
        return records;
    }
    records
        .into_iter()
        .filter(|r| categories.contains(&r.error_type))
        .collect()
}

/// Number of records per category, categories in canonical order
pub fn category_counts(records: &[ErrorRecord]) -> BTreeMap<ErrorCategory, usize> {
    let mut counts = BTreeMap::new();
    for record in records {
        *counts.entry(record.error_type).or_insert(0) += 1;
    }
    counts
}
