/*!
 * Multi-pass proofreading.
 *
 * The review runs three sequential passes over the document, converts the
 * collaborator's candidates into records, merges them across passes and
 * annotates the changed span where the collaborator did not:
 * - `normalize`: comparison form of text fragments
 * - `highlight`: diff-based emphasis markers
 * - `record`: error records and categories
 * - `merge`: cross-pass deduplication
 * - `profiles`: per-pass instructions
 * - `response`: parsing of collaborator replies
 * - `collaborator`: the proofreading capability and its provider adapter
 * - `orchestrator`: session state machine
 * - `summary`: sorting, filtering and counts for display
 */

pub mod collaborator;
pub mod highlight;
pub mod merge;
pub mod normalize;
pub mod orchestrator;
pub mod profiles;
pub mod record;
pub mod response;
pub mod summary;

pub use collaborator::{ProviderReviewer, ReviewCollaborator};
pub use highlight::{annotate, highlight, HighlightedPair};
pub use merge::{merge, merge_batches, merge_with_stats, MergeStats};
pub use normalize::normalize;
pub use orchestrator::{ReviewOrchestrator, ReviewOutcome, ReviewProgress, ReviewState};
pub use profiles::{PassIndex, PassProfile, PASS_COUNT};
pub use record::{ErrorCategory, ErrorRecord, RawCandidate};
pub use summary::{category_counts, filter_by_categories, sort_records, SortOrder};
