/*!
 * Parsing of proofreading collaborator replies.
 *
 * The collaborator is asked for a bare JSON object but often wraps it in a
 * code fence or adds prose around it. The outermost `{ ... }` block is
 * extracted and its `errors` array read; anything structurally wrong makes
 * the whole pass contribute nothing.
 */

use log::{debug, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use super::record::RawCandidate;

/// Outermost JSON object, spanning newlines
static JSON_OBJECT_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)\{.*\}").expect("Invalid JSON object regex")
});

/// Reasons a reply could not be turned into candidates
#[derive(Error, Debug, PartialEq)]
pub enum MalformedResponse {
    /// No `{ ... }` block in the reply
    #[error("no JSON object found in response")]
    NoJson,

    /// The block is not valid JSON
    #[error("invalid JSON: {0}")]
    InvalidJson(String),

    /// The object has no `errors` array
    #[error("response has no \"errors\" array")]
    MissingErrors,
}

/// Extract candidates from a reply, or explain why it is malformed.
///
/// Individual array items that do not fit the candidate shape are skipped.
pub fn parse_candidates(text: &str) -> Result<Vec<RawCandidate>, MalformedResponse> {
    let block = JSON_OBJECT_REGEX
        .find(text.trim())
        .ok_or(MalformedResponse::NoJson)?;

    let value: Value = serde_json::from_str(block.as_str())
        .map_err(|e| MalformedResponse::InvalidJson(e.to_string()))?;

    let items = value
        .get("errors")
        .and_then(Value::as_array)
        .ok_or(MalformedResponse::MissingErrors)?;

    let candidates = items
        .iter()
        .filter_map(|item| match serde_json::from_value::<RawCandidate>(item.clone()) {
            Ok(candidate) => Some(candidate),
            Err(e) => {
                debug!("Skipping candidate with unexpected shape: {}", e);
                None
            }
        })
        .collect();

    Ok(candidates)
}

/// Like `parse_candidates`, but a malformed reply yields an empty list
pub fn candidates_or_empty(text: &str, pass: u8) -> Vec<RawCandidate> {
    match parse_candidates(text) {
        Ok(candidates) => candidates,
        Err(e) => {
            warn!("Pass {} returned a malformed response ({}); ignoring it", pass, e);
            Vec::new()
        }
    }
}
