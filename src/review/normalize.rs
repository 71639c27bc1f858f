/*!
 * Text canonicalization for comparing findings across passes.
 *
 * Findings coming back from different passes describe the same correction
 * with slightly different markup and spacing. `normalize` reduces a fragment
 * to a comparison key; `strip_emphasis` produces the display form used by
 * exports.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// Paired delimiter marking the erroneous or corrected span
pub const EMPHASIS: &str = "**";

/// Regex for a complete emphasis pair around non-asterisk content
static EMPHASIS_PAIR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\*\*([^*]+)\*\*").expect("Invalid emphasis pair regex")
});

/// Canonicalize a text fragment for equality comparison.
///
/// The steps run in a fixed order so every pass produces identical keys:
/// delimiter removal, whitespace collapse, trim, lowercase.
pub fn normalize(text: &str) -> String {
    let without_markers = text.replace(EMPHASIS, "");

    let mut collapsed = String::with_capacity(without_markers.len());
    let mut in_whitespace = false;
    for c in without_markers.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                collapsed.push(' ');
                in_whitespace = true;
            }
        } else {
            collapsed.push(c);
            in_whitespace = false;
        }
    }

    collapsed.trim().to_lowercase()
}

/// Remove emphasis pairs while keeping their content
pub fn strip_emphasis(text: &str) -> String {
    EMPHASIS_PAIR_REGEX.replace_all(text, "$1").into_owned()
}

/// Remove every delimiter occurrence, paired or not
pub fn remove_markers(text: &str) -> String {
    text.replace(EMPHASIS, "")
}

/// Whether the text carries the emphasis delimiter
pub fn has_emphasis(text: &str) -> bool {
    text.contains(EMPHASIS)
}
