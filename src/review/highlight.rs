/*!
 * Diff-based emphasis annotation.
 *
 * When the proofreading collaborator forgets to mark the changed span, the
 * highlighter trims the common prefix and suffix of the two fragments and
 * wraps what remains in emphasis markers.
 */

use super::normalize::{has_emphasis, EMPHASIS};
use super::record::ErrorRecord;

/// A current/fix pair after annotation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightedPair {
    /// Current (erroneous) text
    pub current: String,
    /// Suggested fix
    pub fix: String,
}

impl HighlightedPair {
    fn unchanged(current: &str, fix: &str) -> Self {
        Self {
            current: current.to_string(),
            fix: fix.to_string(),
        }
    }
}

/// Wrap the differing middle spans of `current` and `fix` in emphasis markers.
///
/// Offsets are counted in chars, so Hangul and other multi-byte text splits
/// on character boundaries. Existing emphasis in either input is kept as is.
/// Nothing is injected for identical strings or when one string extends the
/// other at a word boundary. An insertion or deletion inside a word widens
/// both spans to that whole word so the change stays visible.
pub fn highlight(current: &str, fix: &str) -> HighlightedPair {
    if has_emphasis(current) || has_emphasis(fix) {
        return HighlightedPair::unchanged(current, fix);
    }

    let current_chars: Vec<char> = current.chars().collect();
    let fix_chars: Vec<char> = fix.chars().collect();

    let prefix_len = current_chars
        .iter()
        .zip(fix_chars.iter())
        .take_while(|(a, b)| a == b)
        .count();

    // Suffix is measured on the tails left after the prefix, so the two
    // regions never overlap.
    let mut suffix_len = current_chars[prefix_len..]
        .iter()
        .rev()
        .zip(fix_chars[prefix_len..].iter().rev())
        .take_while(|(a, b)| a == b)
        .count();

    let current_empty = current_chars.len() - suffix_len == prefix_len;
    let fix_empty = fix_chars.len() - suffix_len == prefix_len;
    let mut start = prefix_len;

    if current_empty && fix_empty {
        return HighlightedPair::unchanged(current, fix);
    }

    if current_empty || fix_empty {
        let shorter = if current_empty { &current_chars } else { &fix_chars };
        if is_word_boundary(shorter, prefix_len) {
            return HighlightedPair::unchanged(current, fix);
        }
        // Prefix and suffix are shared, so either side gives the same edges.
        start = word_start(&current_chars, prefix_len);
        suffix_len = word_end_suffix(&current_chars, suffix_len);
    }

    let current_end = current_chars.len() - suffix_len;
    let fix_end = fix_chars.len() - suffix_len;

    HighlightedPair {
        current: wrap_span(&current_chars, start, current_end),
        fix: wrap_span(&fix_chars, start, fix_end),
    }
}

fn is_word_boundary(chars: &[char], pos: usize) -> bool {
    pos == 0
        || pos == chars.len()
        || chars[pos - 1].is_whitespace()
        || chars[pos].is_whitespace()
}

fn word_start(chars: &[char], mut pos: usize) -> usize {
    while pos > 0 && !chars[pos - 1].is_whitespace() {
        pos -= 1;
    }
    pos
}

fn word_end_suffix(chars: &[char], mut suffix_len: usize) -> usize {
    while suffix_len > 0 && !chars[chars.len() - suffix_len].is_whitespace() {
        suffix_len -= 1;
    }
    suffix_len
}

fn wrap_span(chars: &[char], start: usize, end: usize) -> String {
    let mut out = String::with_capacity(chars.len() * 4 + EMPHASIS.len() * 2);
    out.extend(&chars[..start]);
    out.push_str(EMPHASIS);
    out.extend(&chars[start..end]);
    out.push_str(EMPHASIS);
    out.extend(&chars[end..]);
    out
}

/// Add emphasis to a merged record that carries none.
///
/// Emphasis supplied by the collaborator on either field is authoritative;
/// such records are returned as they are.
pub fn annotate(mut record: ErrorRecord) -> ErrorRecord {
    if has_emphasis(&record.current_content) || has_emphasis(&record.suggested_fix) {
        return record;
    }

    let pair = highlight(&record.current_content, &record.suggested_fix);
    record.current_content = pair.current;
    record.suggested_fix = pair.fix;
    record
}

/// Annotate every record in order
pub fn annotate_all(records: Vec<ErrorRecord>) -> Vec<ErrorRecord> {
    records.into_iter().map(annotate).collect()
}
