/*!
 * Tests for result ordering, filtering and counts
 */

use proofmark::review::{category_counts, filter_by_categories, sort_records, ErrorCategory, SortOrder};
use crate::common;

fn sample() -> Vec<proofmark::ErrorRecord> {
    vec![
        common::record("a", 3, "됬다", "됐다", ErrorCategory::Spelling),
        common::record("b", 1, "멘토진를", "멘토진을", ErrorCategory::Particle),
        common::record("c", 3, "할수", "할 수", ErrorCategory::Spacing),
        common::record("d", 2, "햇다", "했다", ErrorCategory::Typo),
    ]
}

fn ids(records: &[proofmark::ErrorRecord]) -> Vec<&str> {
    records.iter().map(|r| r.id.as_str()).collect()
}

/// Page order keeps merge order for findings on the same page
#[test]
fn test_sortRecords_byPage_shouldBeStable() {
    let mut records = sample();
    sort_records(&mut records, SortOrder::PageAsc);
    assert_eq!(ids(&records), vec!["b", "d", "a", "c"]);

    sort_records(&mut records, SortOrder::PageDesc);
    assert_eq!(ids(&records), vec!["a", "c", "d", "b"]);
}

/// Category order groups by Korean label
#[test]
fn test_sortRecords_byCategory_shouldOrderByLabel() {
    let mut records = sample();
    sort_records(&mut records, SortOrder::Category);

    let labels: Vec<&str> = records.iter().map(|r| r.error_type.label()).collect();
    assert_eq!(labels, vec!["띄어쓰기 오류", "맞춤법 오류", "오탈자", "조사 오류"]);
}

/// Sort selectors parse from their command line names
#[test]
fn test_sortOrder_fromStr_shouldAcceptAliases() {
    assert_eq!("page".parse::<SortOrder>().unwrap(), SortOrder::PageAsc);
    assert_eq!("PAGE-DESC".parse::<SortOrder>().unwrap(), SortOrder::PageDesc);
    assert_eq!("category".parse::<SortOrder>().unwrap(), SortOrder::Category);
    assert!("newest".parse::<SortOrder>().is_err());
}

/// Empty selection keeps everything, otherwise only selected categories
#[test]
fn test_filterByCategories_shouldKeepSelectedOnly() {
    assert_eq!(filter_by_categories(sample(), &[]).len(), 4);

    let filtered = filter_by_categories(sample(), &[ErrorCategory::Spacing, ErrorCategory::Typo]);
    assert_eq!(ids(&filtered), vec!["c", "d"]);
}

/// Counts cover only categories that occur
#[test]
fn test_categoryCounts_shouldCountPerCategory() {
    let mut records = sample();
    records.push(common::record("e", 4, "햇다", "했다", ErrorCategory::Typo));

    let counts = category_counts(&records);

    assert_eq!(counts.len(), 4);
    assert_eq!(counts[&ErrorCategory::Typo], 2);
    assert_eq!(counts.get(&ErrorCategory::Redundancy), None);
}
