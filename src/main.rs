// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{info, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::io::Write;
use std::path::{Path, PathBuf};

use proofmark::app_config::{self, Config};
use proofmark::app_controller::{Controller, FileOutcome};
use proofmark::export::ExportFormat;
use proofmark::review::{ErrorCategory, SortOrder};

/// CLI Wrapper for ExportFormat to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliExportFormat {
    Xlsx,
    Csv,
}

impl From<CliExportFormat> for ExportFormat {
    fn from(cli_format: CliExportFormat) -> Self {
        match cli_format {
            CliExportFormat::Xlsx => ExportFormat::Xlsx,
            CliExportFormat::Csv => ExportFormat::Csv,
        }
    }
}

/// CLI Wrapper for SortOrder to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliSortOrder {
    PageAsc,
    PageDesc,
    Type,
}

impl From<CliSortOrder> for SortOrder {
    fn from(cli_sort: CliSortOrder) -> Self {
        match cli_sort {
            CliSortOrder::PageAsc => SortOrder::PageAsc,
            CliSortOrder::PageDesc => SortOrder::PageDesc,
            CliSortOrder::Type => SortOrder::Category,
        }
    }
}

/// CLI Wrapper for LogLevel to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliLogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<CliLogLevel> for app_config::LogLevel {
    fn from(cli_level: CliLogLevel) -> Self {
        match cli_level {
            CliLogLevel::Error => app_config::LogLevel::Error,
            CliLogLevel::Warn => app_config::LogLevel::Warn,
            CliLogLevel::Info => app_config::LogLevel::Info,
            CliLogLevel::Debug => app_config::LogLevel::Debug,
            CliLogLevel::Trace => app_config::LogLevel::Trace,
        }
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Proofread PDF documents (default command)
    #[command(alias = "check")]
    Review(ReviewArgs),

    /// Generate shell completions for proofmark
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug, Clone)]
struct ReviewArgs {
    /// Input PDF file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Force overwrite of existing result files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Result file format
    #[arg(long, value_enum)]
    format: Option<CliExportFormat>,

    /// Directory for result files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Row order of the results
    #[arg(long, value_enum)]
    sort: Option<CliSortOrder>,

    /// Only keep findings of this category (repeatable, e.g. --only 띄어쓰기 오류)
    #[arg(long = "only", value_name = "CATEGORY")]
    only: Vec<String>,

    /// Model name to use for the review
    #[arg(short, long)]
    model: Option<String>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// Proofmark - Korean document proofreading with AI
///
/// Reviews the text of PDF documents in three passes and exports the
/// findings as a spreadsheet.
#[derive(Parser, Debug)]
#[command(name = "proofmark")]
#[command(version)]
#[command(about = "AI-powered Korean proofreading for PDF documents")]
#[command(long_about = "Proofmark extracts the text of PDF documents, reviews it in three passes with an AI model and exports the findings.

EXAMPLES:
    proofmark report.pdf                         # Review using default config
    proofmark -f report.pdf                      # Force overwrite existing results
    proofmark --format csv report.pdf            # Export as CSV instead of xlsx
    proofmark --sort type report.pdf             # Group findings by category
    proofmark --only '띄어쓰기 오류' report.pdf  # Keep spacing findings only
    proofmark -o results/ /documents/            # Process an entire directory
    proofmark completions bash > proofmark.bash  # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically. The API key can also come from ANTHROPIC_API_KEY.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input PDF file or directory to process
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Force overwrite of existing result files
    #[arg(short, long)]
    force_overwrite: bool,

    /// Result file format
    #[arg(long, value_enum)]
    format: Option<CliExportFormat>,

    /// Directory for result files (defaults to the input's directory)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Row order of the results
    #[arg(long, value_enum)]
    sort: Option<CliSortOrder>,

    /// Only keep findings of this category (repeatable)
    #[arg(long = "only", value_name = "CATEGORY")]
    only: Vec<String>,

    /// Model name to use for the review
    #[arg(short, long)]
    model: Option<String>,

    /// Anthropic API key
    #[arg(long, env = "ANTHROPIC_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

// @struct: Custom logger implementation
struct CustomLogger {
    level: LevelFilter,
}

impl CustomLogger {
    // @creates: New logger with specified level
    fn new(level: LevelFilter) -> Self {
        CustomLogger { level }
    }

    // @initializes: Global logger
    fn init(level: LevelFilter) -> Result<(), SetLoggerError> {
        let logger = Box::new(CustomLogger::new(level));
        log::set_boxed_logger(logger)?;
        log::set_max_level(level);
        Ok(())
    }

    // @returns: Emoji and ANSI color for log level
    fn style_for_level(level: Level) -> (&'static str, &'static str) {
        match level {
            Level::Error => ("❌ ", "\x1B[1;31m"),
            Level::Warn => ("🚧 ", "\x1B[1;33m"),
            Level::Info => (" ", "\x1B[1;32m"),
            Level::Debug => ("🔍 ", "\x1B[1;36m"),
            Level::Trace => ("📋 ", "\x1B[1;35m"),
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S.%3f");
            let (emoji, color) = Self::style_for_level(record.level());

            let mut stderr = std::io::stderr();
            let _ = writeln!(stderr, "{}{} {} {}\x1B[0m", color, now, emoji, record.args());
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Start at trace so the level can be lowered once the config is known
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    let cli = CommandLineOptions::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "proofmark", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Review(args)) => run_review(args).await,
        None => {
            // Default behavior - use top-level args
            let input_path = cli.input_path.ok_or_else(|| {
                anyhow!("INPUT_PATH is required when no subcommand is specified")
            })?;

            let review_args = ReviewArgs {
                input_path,
                force_overwrite: cli.force_overwrite,
                format: cli.format,
                output_dir: cli.output_dir,
                sort: cli.sort,
                only: cli.only,
                model: cli.model,
                api_key: cli.api_key,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_review(review_args).await
        }
    }
}

/// Apply command line overrides on top of the loaded configuration
fn apply_overrides(config: &mut Config, options: &ReviewArgs) {
    if let Some(format) = &options.format {
        config.export.format = format.clone().into();
    }

    if let Some(sort) = &options.sort {
        config.export.sort = sort.clone().into();
    }

    if let Some(model) = &options.model {
        config.provider.model = model.clone();
    }

    if let Some(api_key) = options.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
        config.provider.api_key = api_key.clone();
    }

    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }
}

fn parse_categories(labels: &[String]) -> Result<Vec<ErrorCategory>> {
    labels
        .iter()
        .map(|label| {
            label.parse::<ErrorCategory>().map_err(|e| {
                let known: Vec<&str> = ErrorCategory::ALL.iter().map(|c| c.label()).collect();
                anyhow!("{} (known categories: {})", e, known.join(", "))
            })
        })
        .collect()
}

async fn run_review(options: ReviewArgs) -> Result<()> {
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let mut config = Config::load_or_create(Path::new(&options.config_path))?;
    apply_overrides(&mut config, &options);

    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    let categories = parse_categories(&options.only)?;
    let controller = Controller::with_config(config)?.with_category_filter(categories);

    if options.input_path.is_file() {
        let output_dir = options.output_dir.clone().unwrap_or_else(|| {
            options
                .input_path
                .parent()
                .unwrap_or(Path::new("."))
                .to_path_buf()
        });

        match controller
            .run(options.input_path.clone(), output_dir, options.force_overwrite)
            .await?
        {
            FileOutcome::Exported(path) => info!("Results written to {}", path.display()),
            FileOutcome::Clean => info!("No errors found, nothing to export"),
            FileOutcome::Skipped(path) => info!("Kept existing results at {}", path.display()),
        }
    } else if options.input_path.is_dir() {
        let summary = controller
            .run_folder(
                options.input_path.clone(),
                options.output_dir.clone(),
                options.force_overwrite,
            )
            .await?;

        if summary.errors > 0 {
            return Err(anyhow!("{} file(s) failed to process", summary.errors));
        }
    } else {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    Ok(())
}
