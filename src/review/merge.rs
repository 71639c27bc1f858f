/*!
 * Merging and deduplication of findings across review passes.
 *
 * Passes are independent and frequently report the same correction with
 * different phrasing, markup or category. Records are keyed on the page and
 * the normalized suggested fix; the first record seen for a key wins.
 */

use log::debug;
use std::collections::HashSet;

use super::normalize::normalize;
use super::record::ErrorRecord;

/// Identity of a finding for deduplication purposes
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MergeKey {
    pub page: u32,
    pub fix: String,
}

impl MergeKey {
    /// Key for a record; the category is deliberately not part of it
    pub fn of(record: &ErrorRecord) -> Self {
        Self {
            page: record.page,
            fix: normalize(&record.suggested_fix),
        }
    }
}

/// Counters describing a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Records offered to the merger
    pub received: usize,
    /// Records dropped as invalid (blank field or no-op correction)
    pub invalid: usize,
    /// Records dropped as duplicates of an earlier record
    pub duplicates: usize,
    /// Records kept
    pub kept: usize,
}

/// Whether a record describes a real correction
pub fn is_valid(record: &ErrorRecord) -> bool {
    if record.current_content.trim().is_empty() || record.suggested_fix.trim().is_empty() {
        return false;
    }
    normalize(&record.current_content) != normalize(&record.suggested_fix)
}

/// Merge records in arrival order, keeping the first of each key
pub fn merge<I>(records: I) -> Vec<ErrorRecord>
where
    I: IntoIterator<Item = ErrorRecord>,
{
    merge_with_stats(records).0
}

/// Merge per-pass batches; batch order is pass order
pub fn merge_batches(batches: Vec<Vec<ErrorRecord>>) -> Vec<ErrorRecord> {
    merge(batches.into_iter().flatten())
}

/// Merge records and report what was dropped
pub fn merge_with_stats<I>(records: I) -> (Vec<ErrorRecord>, MergeStats)
where
    I: IntoIterator<Item = ErrorRecord>,
{
    let mut seen: HashSet<MergeKey> = HashSet::new();
    let mut stats = MergeStats::default();
    let mut kept = Vec::new();

    for record in records {
        stats.received += 1;

        if !is_valid(&record) {
            debug!(
                "Dropping no-op or incomplete finding {} on page {}",
                record.id, record.page
            );
            stats.invalid += 1;
            continue;
        }

        if !seen.insert(MergeKey::of(&record)) {
            debug!("Dropping duplicate finding {} on page {}", record.id, record.page);
            stats.duplicates += 1;
            continue;
        }

        kept.push(record);
    }

    stats.kept = kept.len();
    (kept, stats)
}
