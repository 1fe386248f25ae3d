// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::too_many_arguments)]

use anyhow::{anyhow, Context, Result};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{generate, Shell};
use log::{warn, Level, LevelFilter, Log, Metadata, Record, SetLoggerError};
use std::fs::File;
use std::io::BufReader;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::app_config::{Config, TranslationProvider};
use crate::reconcile::RetrySelection;
use app_controller::Controller;

mod app_config;
mod app_controller;
mod assembler;
mod errors;
mod extraction;
mod file_utils;
mod glossary;
mod providers;
mod quality;
mod reconcile;
mod segmenter;
mod titles;
mod translation;
mod workspace;

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    OpenAI,
    Anthropic,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::OpenAI => TranslationProvider::OpenAI,
            CliTranslationProvider::Anthropic => TranslationProvider::Anthropic,
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
    /// Translate a document using AI providers (default command)
    #[command(alias = "translate")]
    Translate(TranslateArgs),

    /// Re-translate diverged or failed batches and reassemble the document
    Retry(RetryArgs),

    /// Generate shell completions for bookwai
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input PDF or text file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: PathBuf,

    /// Output directory for batch artifacts and the assembled document
    #[arg(short, long, default_value = "out")]
    output_dir: PathBuf,

    /// Re-translate batches even if a translation artifact exists
    #[arg(short, long)]
    force: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language (e.g. 'English')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language (e.g. 'French')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Pages grouped into one translation batch
    #[arg(long)]
    pages_per_batch: Option<usize>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

#[derive(Parser, Debug)]
struct RetryArgs {
    /// Batch ids to re-translate (e.g. 3 7 12)
    #[arg(value_name = "BATCH_ID", conflicts_with = "all_diverged")]
    batch_ids: Vec<u32>,

    /// Re-translate every batch that is currently diverged or failed
    #[arg(long)]
    all_diverged: bool,

    /// Output directory of the original run
    #[arg(short, long, default_value = "out")]
    output_dir: PathBuf,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// bookwai - Book-length document translation With AI
///
/// Translates long PDF documents batch by batch with LLM providers,
/// keeping terminology consistent and re-translating only damaged batches.
#[derive(Parser, Debug)]
#[command(name = "bookwai")]
#[command(author = "bookwai contributors")]
#[command(version = "1.0.0")]
#[command(about = "AI-powered long-document translation tool")]
#[command(long_about = "bookwai splits a long document into page batches, translates them with an AI provider and reassembles a single translated document.

EXAMPLES:
    bookwai book.pdf                            # Translate using default config
    bookwai -o mybook book.pdf                  # Keep artifacts under ./mybook
    bookwai -p anthropic -m claude-3-haiku book.pdf
    bookwai -s English -t French book.pdf       # Set languages explicitly
    bookwai retry 3 7 -o mybook                 # Re-translate batches 3 and 7
    bookwai retry --all-diverged -o mybook      # Re-translate every damaged batch
    bookwai completions bash > bookwai.bash     # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config. If the config file doesn't exist, a default one
    will be created automatically.

SUPPORTED PROVIDERS:
    openai    - OpenAI API or any compatible endpoint (requires API key)
    anthropic - Anthropic API (requires API key)")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input PDF or text file to translate
    #[arg(value_name = "INPUT_PATH")]
    input_path: Option<PathBuf>,

    /// Output directory for batch artifacts and the assembled document
    #[arg(short, long, default_value = "out")]
    output_dir: PathBuf,

    /// Re-translate batches even if a translation artifact exists
    #[arg(short, long)]
    force: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Model name to use for translation
    #[arg(short, long)]
    model: Option<String>,

    /// Source language (e.g. 'English')
    #[arg(short, long)]
    source_language: Option<String>,

    /// Target language (e.g. 'French')
    #[arg(short, long)]
    target_language: Option<String>,

    /// Pages grouped into one translation batch
    #[arg(long)]
    pages_per_batch: Option<usize>,

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

    // @returns: ANSI color for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let now = chrono::Local::now().format("%H:%M:%S%.3f");
            let color = Self::get_color_for_level(record.level());
            let mut stderr = std::io::stderr();
            let _ = writeln!(
                stderr,
                "{}{} {:5} {}\x1B[0m",
                color,
                now,
                record.level(),
                record.args()
            );
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize the logger once with info level by default
    // We'll update the level after loading the config if needed
    CustomLogger::init(LevelFilter::Info)?;

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "bookwai", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Retry(args)) => run_retry(args).await,
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            // Default behavior - use top-level args for backwards compatibility
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT_PATH is required when no subcommand is specified"))?;

            let translate_args = TranslateArgs {
                input_path,
                output_dir: cli.output_dir,
                force: cli.force,
                provider: cli.provider,
                model: cli.model,
                source_language: cli.source_language,
                target_language: cli.target_language,
                pages_per_batch: cli.pages_per_batch,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

/// Load the configuration file, creating a default one if missing, and
/// apply CLI overrides.
fn load_config(
    config_path: &str,
    provider: Option<CliTranslationProvider>,
    model: Option<String>,
    log_level: Option<CliLogLevel>,
) -> Result<Config> {
    let mut config = if Path::new(config_path).exists() {
        let file = File::open(config_path)
            .context(format!("Failed to open config file: {}", config_path))?;
        let reader = BufReader::new(file);
        serde_json::from_reader(reader)
            .context(format!("Failed to parse config file: {}", config_path))?
    } else {
        warn!("Config file not found at '{}', creating default config.", config_path);
        let config = Config::default();
        let config_json = serde_json::to_string_pretty(&config)
            .context("Failed to serialize default config to JSON")?;
        std::fs::write(config_path, config_json)
            .context(format!("Failed to write default config to file: {}", config_path))?;
        config
    };

    if let Some(provider) = provider {
        config.translation.provider = provider.into();
    }
    if let Some(model) = model {
        let provider_str = config.translation.provider.to_lowercase_string();
        if let Some(provider_config) = config
            .translation
            .available_providers
            .iter_mut()
            .find(|p| p.provider_type == provider_str)
        {
            provider_config.model = model;
        }
    }
    if let Some(log_level) = log_level {
        config.log_level = log_level.into();
    }

    apply_log_level(&config);
    Ok(config)
}

fn apply_log_level(config: &Config) {
    let level = match config.log_level {
        app_config::LogLevel::Error => LevelFilter::Error,
        app_config::LogLevel::Warn => LevelFilter::Warn,
        app_config::LogLevel::Info => LevelFilter::Info,
        app_config::LogLevel::Debug => LevelFilter::Debug,
        app_config::LogLevel::Trace => LevelFilter::Trace,
    };
    log::set_max_level(level);
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    let mut config = load_config(
        &options.config_path,
        options.provider,
        options.model,
        options.log_level,
    )?;

    if let Some(source_lang) = options.source_language {
        config.source_language = source_lang;
    }
    if let Some(target_lang) = options.target_language {
        config.target_language = target_lang;
    }
    if let Some(pages) = options.pages_per_batch {
        config.pipeline.pages_per_batch = pages;
    }

    config.validate().context("Configuration validation failed")?;

    if !options.input_path.is_file() {
        return Err(anyhow!("Input path does not exist: {:?}", options.input_path));
    }

    let controller = Controller::with_config(config, &options.output_dir)?;
    let summary = controller
        .run_translate(&options.input_path, options.force)
        .await?;

    if !summary.is_clean() {
        warn!(
            "Finished with outstanding batches {:?}; run 'bookwai retry --all-diverged -o {:?}' to reconcile",
            summary.outstanding(),
            options.output_dir
        );
    }
    Ok(())
}

async fn run_retry(options: RetryArgs) -> Result<()> {
    let config = load_config(
        &options.config_path,
        options.provider,
        options.model,
        options.log_level,
    )?;
    config.validate().context("Configuration validation failed")?;

    let selection = if options.all_diverged {
        RetrySelection::AllDiverged
    } else if options.batch_ids.is_empty() {
        return Err(anyhow!("Specify batch ids or --all-diverged"));
    } else {
        RetrySelection::Ids(options.batch_ids)
    };

    let controller = Controller::with_config(config, &options.output_dir)?;
    let summary = controller.run_retry(selection).await?;

    if !summary.is_clean() {
        warn!("Outstanding batches remain: {:?}", summary.outstanding());
    }
    Ok(())
}
