/*!
 * # Proofmark - Korean document proofreading with AI
 *
 * A Rust library that reviews the text of PDF documents for Korean spelling,
 * grammar and notation errors using a language model.
 *
 * ## Features
 *
 * - Extract per-page text from PDF files
 * - Review the document in three sequential passes, each with its own focus:
 *   - particles, spacing and typos
 *   - loanword notation, punctuation and numerals
 *   - terminology consistency, word choice and repetition
 * - Merge and deduplicate the findings of all passes
 * - Emphasize the changed span of every finding
 * - Export the findings as an Excel workbook or a UTF-8 CSV file
 *
 * ## Architecture
 *
 * The library is organized in these main modules:
 * - `app_config`: Configuration management
 * - `document`: PDF validation and text extraction
 * - `review`: Multi-pass proofreading:
 *   - `review::orchestrator`: Session state machine running the passes
 *   - `review::merge`: Cross-pass deduplication
 *   - `review::highlight`: Diff-based emphasis of changed spans
 * - `export`: Spreadsheet and CSV export
 * - `file_utils`: File system operations
 * - `app_controller`: Main application controller
 * - `providers`: Client implementations for LLM providers:
 *   - `providers::anthropic`: Anthropic API client
 *   - `providers::mock`: Scriptable provider for tests
 * - `errors`: Custom error types for the application
 *
 * ## License
 *
 * This project is licensed under the MIT License
 */

// Global lints configuration
// These lints will be allowed but not auto-fixed
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::redundant_closure_for_method_calls)]

// Public modules
pub mod app_config;
pub mod app_controller;
pub mod document;
pub mod errors;
pub mod export;
pub mod file_utils;
pub mod providers;
pub mod review;

// Re-export main types for easier usage
pub use app_config::Config;
pub use app_controller::{Controller, FileOutcome, FolderSummary};
pub use document::{PageText, ParsedDocument, PdfTextExtractor, TextExtractor};
pub use errors::{AppError, DocumentError, ExportError, ProviderError, ReviewError};
pub use export::ExportFormat;
pub use review::{ErrorCategory, ErrorRecord, ReviewOrchestrator, ReviewOutcome, SortOrder};
