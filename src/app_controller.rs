use anyhow::{anyhow, Result};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::Config;
use crate::document::PdfTextExtractor;
use crate::errors::AppError;
use crate::export::{self, ExportFormat};
use crate::file_utils::FileManager;
use crate::providers::anthropic::Anthropic;
use crate::review::orchestrator::{ReviewOrchestrator, ReviewOutcome, ReviewProgress, ReviewState};
use crate::review::summary::{category_counts, filter_by_categories, sort_records};
use crate::review::{ErrorCategory, ErrorRecord, ProviderReviewer, ReviewCollaborator, PASS_COUNT};

// @module: Application controller for document review

/// Name of the folder-mode summary log
pub const ISSUES_LOG: &str = "proofmark.issues.log";

/// What happened to a single input file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Findings were written to this path
    Exported(PathBuf),
    /// The review found nothing to export
    Clean,
    /// An export already existed and overwriting was not requested
    Skipped(PathBuf),
}

/// Counters for a folder run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FolderSummary {
    pub exported: usize,
    pub clean: usize,
    pub skipped: usize,
    pub errors: usize,
}

/// Main application controller for document review
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Proofreading collaborator shared by every session
    collaborator: Arc<dyn ReviewCollaborator>,
    // @field: Categories kept in the output; empty keeps all
    categories: Vec<ErrorCategory>,
}

impl Controller {
    // @method: Create a controller talking to the configured Anthropic endpoint
    pub fn with_config(config: Config) -> Result<Self> {
        let provider = Anthropic::new(
            config.provider.api_key.clone(),
            config.provider.endpoint.clone(),
            config.provider.model.clone(),
            Duration::from_secs(config.provider.timeout_secs),
        )
        .with_generation(config.provider.max_tokens, config.provider.temperature);

        Ok(Self::with_collaborator(config, Arc::new(ProviderReviewer::new(provider))))
    }

    /// Create a controller around an existing collaborator
    pub fn with_collaborator(config: Config, collaborator: Arc<dyn ReviewCollaborator>) -> Self {
        Self {
            config,
            collaborator,
            categories: Vec::new(),
        }
    }

    /// Restrict output to the given categories
    pub fn with_category_filter(mut self, categories: Vec<ErrorCategory>) -> Self {
        self.categories = categories;
        self
    }

    /// Export format in use
    pub fn export_format(&self) -> ExportFormat {
        self.config.export.format
    }

    /// Run the main workflow with an input PDF and output directory
    pub async fn run(&self, input_file: PathBuf, output_dir: PathBuf, force_overwrite: bool) -> Result<FileOutcome> {
        let multi_progress = MultiProgress::new();
        self.run_with_progress(input_file, output_dir, &multi_progress, force_overwrite).await
    }

    /// Run the controller with progress reporting
    async fn run_with_progress(
        &self,
        input_file: PathBuf,
        output_dir: PathBuf,
        multi_progress: &MultiProgress,
        force_overwrite: bool,
    ) -> Result<FileOutcome> {
        if !FileManager::file_exists(&input_file) {
            return Err(anyhow!("Input file does not exist: {:?}", input_file));
        }

        FileManager::ensure_dir(&output_dir)?;

        let output_path = self.output_path_for(&input_file, &output_dir);
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping file, results already exist at {} (use -f to force overwrite)",
                output_path.display()
            );
            return Ok(FileOutcome::Skipped(output_path));
        }

        let bytes = FileManager::read_bytes(&input_file)?;

        let progress_bar = multi_progress.add(ProgressBar::new(PASS_COUNT as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} passes {msg}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        progress_bar.set_style(template_result.progress_chars("█▓▒░"));

        info!(
            "Reviewing {} with {}",
            input_file.display(),
            self.config.provider.model
        );

        let pb = progress_bar.clone();
        let mut orchestrator = ReviewOrchestrator::new(Arc::clone(&self.collaborator))
            .with_progress(Box::new(move |progress: ReviewProgress| {
                match progress.state {
                    ReviewState::Reviewing { pass } => pb.set_position(u64::from(pass.number() - 1)),
                    ReviewState::Completed => pb.set_position(u64::from(progress.total_passes)),
                    _ => {}
                }
                pb.set_message(progress.message);
            }));

        let result = orchestrator
            .review_document(Arc::new(PdfTextExtractor::new()), bytes)
            .await;
        progress_bar.finish_and_clear();

        let (document, outcome) = match result {
            Ok(done) => done,
            Err(e) => {
                error!("{}", e.user_message());
                return Err(AppError::Review(e).into());
            }
        };
        debug!("Document has {} pages", document.total_pages);

        let records = self.select(outcome.records.clone());
        Self::log_summary(&outcome, &records);

        if records.is_empty() {
            info!("No errors found in {}", input_file.display());
            return Ok(FileOutcome::Clean);
        }

        let payload = export::export(&records, self.config.export.format).map_err(AppError::Export)?;
        FileManager::write_bytes(&output_path, &payload)?;
        info!("Success: {}", output_path.display());

        Ok(FileOutcome::Exported(output_path))
    }

    /// Apply the category filter and configured order
    fn select(&self, records: Vec<ErrorRecord>) -> Vec<ErrorRecord> {
        let mut records = filter_by_categories(records, &self.categories);
        sort_records(&mut records, self.config.export.sort);
        records
    }

    fn log_summary(outcome: &ReviewOutcome, records: &[ErrorRecord]) {
        info!(
            "Review completed in {}: passes found {} / {} / {}, {} after merging",
            Self::format_duration(outcome.duration),
            outcome.pass_counts[0],
            outcome.pass_counts[1],
            outcome.pass_counts[2],
            outcome.records.len()
        );

        for (category, count) in category_counts(records) {
            info!("  {}: {}", category, count);
        }

        for record in records {
            debug!(
                "[p.{}] {} | {} -> {} ({})",
                record.page, record.location, record.current_content, record.suggested_fix, record.error_type
            );
        }
    }

    /// Export path for an input file
    pub fn output_path_for(&self, input_file: &Path, output_dir: &Path) -> PathBuf {
        let base = self
            .config
            .export
            .file_name
            .clone()
            .unwrap_or_else(|| export::default_file_name(chrono::Local::now().date_naive()));
        FileManager::generate_output_path(
            input_file,
            output_dir,
            &base,
            self.config.export.format.extension(),
        )
    }

    // Format duration in a human-readable format (HH:MM:SS)
    fn format_duration(duration: Duration) -> String {
        let total_seconds = duration.as_secs();
        let hours = total_seconds / 3600;
        let minutes = (total_seconds % 3600) / 60;
        let seconds = total_seconds % 60;

        if hours > 0 {
            format!("{}h {}m {}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {}s", minutes, seconds)
        } else {
            format!("{}.{:03}s", seconds, duration.subsec_millis())
        }
    }

    /// Run the workflow in folder mode, reviewing every PDF under a directory.
    ///
    /// Each file is written next to its input unless `output_dir` is given.
    /// A failing file is logged and counted; the run continues.
    pub async fn run_folder(
        &self,
        input_dir: PathBuf,
        output_dir: Option<PathBuf>,
        force_overwrite: bool,
    ) -> Result<FolderSummary> {
        let start_time = std::time::Instant::now();

        if !FileManager::dir_exists(&input_dir) {
            return Err(anyhow!("Input directory does not exist: {:?}", input_dir));
        }

        let pdf_files = FileManager::find_files(&input_dir, "pdf")?;
        if pdf_files.is_empty() {
            return Err(anyhow!("No PDF files found in directory: {:?}", input_dir));
        }

        let multi_progress = MultiProgress::new();
        let folder_pb = multi_progress.add(ProgressBar::new(pdf_files.len() as u64));
        let template_result = ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg} {eta}")
            .or_else(|_| ProgressStyle::default_bar().template("{spinner} [{elapsed_precise}] [{bar:40}] {pos}/{len} ({percent}%) {msg}"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        folder_pb.set_style(template_result.progress_chars("█▓▒░"));
        folder_pb.set_message("Processing files");

        let mut summary = FolderSummary::default();

        for pdf_file in &pdf_files {
            let file_name = pdf_file
                .file_name()
                .map(|f| f.to_string_lossy().to_string())
                .unwrap_or_else(|| "unknown".to_string());
            folder_pb.set_message(format!("Processing: {}", file_name));

            let file_output_dir = match &output_dir {
                Some(dir) => dir.clone(),
                None => pdf_file.parent().map(Path::to_path_buf).unwrap_or_else(|| input_dir.clone()),
            };

            match self
                .run_with_progress(pdf_file.clone(), file_output_dir, &multi_progress, force_overwrite)
                .await
            {
                Ok(FileOutcome::Exported(_)) => summary.exported += 1,
                Ok(FileOutcome::Clean) => summary.clean += 1,
                Ok(FileOutcome::Skipped(_)) => summary.skipped += 1,
                Err(e) => {
                    error!("Error processing file {}: {}", file_name, e);
                    summary.errors += 1;
                }
            }

            folder_pb.inc(1);
        }

        folder_pb.finish_with_message("Folder processing complete");

        let summary_message = format!(
            "Folder processing completed: {} exported, {} clean, {} skipped, {} errors",
            summary.exported, summary.clean, summary.skipped, summary.errors
        );
        info!("{}", summary_message);

        let log_file_path = input_dir.join(ISSUES_LOG);
        let entry = format!(
            "{} - {} - Duration: {}",
            input_dir.display(),
            summary_message,
            Self::format_duration(start_time.elapsed())
        );
        if let Err(e) = FileManager::append_to_log_file(&log_file_path, &entry) {
            warn!("Failed to write folder log: {}", e);
        }

        Ok(summary)
    }
}
