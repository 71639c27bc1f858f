/*!
 * Review session orchestration.
 *
 * A session walks a small state machine:
 *
 * `Idle -> Extracting -> Reviewing(1) -> Reviewing(2) -> Reviewing(3) -> Completed`
 *
 * with `Error` reachable from any non-terminal state. Passes run strictly one
 * after another; the first provider failure ends the session without a
 * partial result.
 */

use log::{debug, error, info};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use super::collaborator::ReviewCollaborator;
use super::highlight::annotate_all;
use super::merge::{merge_with_stats, MergeStats};
use super::profiles::{PassIndex, PASS_COUNT};
use super::record::{record_id, ErrorRecord, RawCandidate};
use crate::document::{PageText, ParsedDocument, TextExtractor};
use crate::errors::{DocumentError, ReviewError};

/// Where a session currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewState {
    Idle,
    Extracting,
    Reviewing { pass: PassIndex },
    Completed,
    Error,
}

impl fmt::Display for ReviewState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Idle => write!(f, "idle"),
            Self::Extracting => write!(f, "extracting"),
            Self::Reviewing { pass } => write!(f, "reviewing (pass {})", pass.number()),
            Self::Completed => write!(f, "completed"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Snapshot sent to the progress callback on every transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewProgress {
    /// New state
    pub state: ReviewState,
    /// Pass being run, 0 outside of the review phase
    pub current_pass: u8,
    /// Always the number of passes in a session
    pub total_passes: u8,
    /// Status line for display
    pub message: String,
}

/// Progress observer
pub type ProgressCallback = Box<dyn Fn(ReviewProgress) + Send + Sync>;

/// Result of a completed session
#[derive(Debug, Clone)]
pub struct ReviewOutcome {
    /// Merged, annotated findings in first-seen order
    pub records: Vec<ErrorRecord>,
    /// Valid records produced by each pass before merging
    pub pass_counts: [usize; PASS_COUNT],
    /// Merge counters
    pub stats: MergeStats,
    /// Wall time of the review phase
    pub duration: Duration,
}

impl ReviewOutcome {
    /// Whether the document came back clean
    pub fn is_clean(&self) -> bool {
        self.records.is_empty()
    }
}

/// Drives review sessions against a collaborator
pub struct ReviewOrchestrator<C: ReviewCollaborator> {
    collaborator: C,
    state: ReviewState,
    progress_callback: Option<ProgressCallback>,
}

impl<C: ReviewCollaborator> ReviewOrchestrator<C> {
    /// Create an idle orchestrator
    pub fn new(collaborator: C) -> Self {
        Self {
            collaborator,
            state: ReviewState::Idle,
            progress_callback: None,
        }
    }

    /// Observe state transitions
    pub fn with_progress(mut self, callback: ProgressCallback) -> Self {
        self.progress_callback = Some(callback);
        self
    }

    /// Current state
    pub fn state(&self) -> ReviewState {
        self.state
    }

    fn transition(&mut self, state: ReviewState, message: impl Into<String>) {
        let message = message.into();
        debug!("Review state: {} -> {} ({})", self.state, state, message);
        self.state = state;

        if let Some(ref callback) = self.progress_callback {
            let current_pass = match state {
                ReviewState::Reviewing { pass } => pass.number(),
                _ => 0,
            };
            callback(ReviewProgress {
                state,
                current_pass,
                total_passes: PASS_COUNT as u8,
                message,
            });
        }
    }

    /// Return a reused orchestrator to idle before a new session
    fn reset(&mut self) {
        if self.state != ReviewState::Idle {
            self.transition(ReviewState::Idle, "새 검토 준비");
        }
    }

    fn fail(&mut self, err: ReviewError) -> ReviewError {
        error!("Review failed: {}", err);
        self.transition(ReviewState::Error, err.user_message());
        err
    }

    /// Extract a document and review it.
    ///
    /// Extraction runs on the blocking pool.
    pub async fn review_document<E>(
        &mut self,
        extractor: Arc<E>,
        bytes: Vec<u8>,
    ) -> Result<(ParsedDocument, ReviewOutcome), ReviewError>
    where
        E: TextExtractor + 'static,
    {
        self.reset();
        self.transition(ReviewState::Extracting, "PDF에서 텍스트 추출 중...");

        let extracted = tokio::task::spawn_blocking(move || extractor.extract(&bytes))
            .await
            .map_err(|e| DocumentError::Unreadable(format!("Extraction task failed: {}", e)))
            .and_then(|result| result);

        let document = match extracted {
            Ok(document) => document,
            Err(e) => return Err(self.fail(ReviewError::Document(e))),
        };
        info!("Extracted {} pages", document.total_pages);

        let outcome = self.run_passes(&document.pages).await?;
        Ok((document, outcome))
    }

    /// Run all passes over already extracted pages
    pub async fn review(&mut self, pages: &[PageText]) -> Result<ReviewOutcome, ReviewError> {
        self.reset();
        self.run_passes(pages).await
    }

    async fn run_passes(&mut self, pages: &[PageText]) -> Result<ReviewOutcome, ReviewError> {
        if pages.is_empty() {
            return Err(self.fail(ReviewError::NoPages));
        }

        let start_time = Instant::now();
        let mut batches: Vec<Vec<ErrorRecord>> = Vec::with_capacity(PASS_COUNT);
        let mut pass_counts = [0usize; PASS_COUNT];

        for pass in PassIndex::ALL {
            let profile = pass.profile();
            self.transition(ReviewState::Reviewing { pass }, profile.progress_message);

            let result = self.collaborator.review_pass(pages, profile).await;
            let candidates = match result {
                Ok(candidates) => candidates,
                Err(source) => {
                    return Err(self.fail(ReviewError::Provider {
                        pass: pass.number(),
                        source,
                    }));
                }
            };

            let records = to_records(pass, candidates);
            pass_counts[usize::from(pass.number() - 1)] = records.len();
            batches.push(records);
        }

        let (merged, stats) = merge_with_stats(batches.into_iter().flatten());
        let records = annotate_all(merged);
        let duration = start_time.elapsed();

        info!(
            "Review finished in {:.1}s: {} received, {} invalid, {} duplicates, {} kept",
            duration.as_secs_f64(),
            stats.received,
            stats.invalid,
            stats.duplicates,
            stats.kept
        );
        self.transition(
            ReviewState::Completed,
            format!("검토 완료: {}개의 오류 발견", records.len()),
        );

        Ok(ReviewOutcome {
            records,
            pass_counts,
            stats,
            duration,
        })
    }

    /// Run a single pass by its 1-based number, without merging
    pub async fn run_pass(
        &self,
        pages: &[PageText],
        pass_number: i64,
    ) -> Result<Vec<ErrorRecord>, ReviewError> {
        let pass = PassIndex::try_from(pass_number)?;
        if pages.is_empty() {
            return Err(ReviewError::NoPages);
        }

        let candidates = self
            .collaborator
            .review_pass(pages, pass.profile())
            .await
            .map_err(|source| ReviewError::Provider {
                pass: pass.number(),
                source,
            })?;
        Ok(to_records(pass, candidates))
    }
}

/// Turn one pass's candidates into records, dropping incomplete ones
fn to_records(pass: PassIndex, candidates: Vec<RawCandidate>) -> Vec<ErrorRecord> {
    let offered = candidates.len();
    let records: Vec<ErrorRecord> = candidates
        .into_iter()
        .enumerate()
        .filter_map(|(index, candidate)| {
            ErrorRecord::from_candidate(candidate, record_id(pass.number(), index))
        })
        .collect();

    if records.len() < offered {
        debug!(
            "Pass {}: dropped {} incomplete candidates",
            pass.number(),
            offered - records.len()
        );
    }
    records
}
