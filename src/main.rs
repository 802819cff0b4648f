// Module-specific lints configuration
#![allow(clippy::uninlined_format_args)]

use anyhow::{Context, Result, anyhow};
use clap::{CommandFactory, Parser, Subcommand, ValueEnum};
use clap_complete::{Shell, generate};
use indicatif::ProgressBar;
use log::{Level, LevelFilter, Log, Metadata, Record, SetLoggerError, error, info, warn};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use std::io::Write;
use std::path::PathBuf;

use celltrans::app_config::{self, Config, TranslationProvider};
use celltrans::app_controller::{Controller, RunStatus};
use celltrans::file_utils::DailyLogFile;
use celltrans::language_utils::target_language_name;
use celltrans::translation::CancellationToken;

/// Progress bar currently on screen; log lines are printed around it
static ACTIVE_BAR: Lazy<Mutex<Option<ProgressBar>>> = Lazy::new(|| Mutex::new(None));

/// Daily log file, when file logging is enabled
static LOG_FILE: Lazy<Mutex<Option<DailyLogFile>>> = Lazy::new(|| Mutex::new(None));

/// CLI Wrapper for TranslationProvider to implement ValueEnum
#[derive(Debug, Clone, ValueEnum)]
enum CliTranslationProvider {
    Google,
    LibreTranslate,
}

impl From<CliTranslationProvider> for TranslationProvider {
    fn from(cli_provider: CliTranslationProvider) -> Self {
        match cli_provider {
            CliTranslationProvider::Google => TranslationProvider::Google,
            CliTranslationProvider::LibreTranslate => TranslationProvider::LibreTranslate,
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
    /// Translate a workbook (default command)
    Translate(TranslateArgs),

    /// Generate shell completions for celltrans
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Parser, Debug)]
struct TranslateArgs {
    /// Input .xlsx workbook
    #[arg(value_name = "INPUT")]
    input_path: PathBuf,

    /// Output workbook (default: <input>_translated.xlsx next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Provider endpoint URL
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Configuration file path
    #[arg(short, long, default_value = "conf.json")]
    config_path: String,

    /// Set logging level
    #[arg(short, long, value_enum)]
    log_level: Option<CliLogLevel>,
}

/// celltrans - translate spreadsheet cells into Korean, keeping the formatting
#[derive(Parser, Debug)]
#[command(name = "celltrans")]
#[command(version)]
#[command(about = "Format-preserving spreadsheet translator")]
#[command(long_about = "celltrans translates every text cell of an .xlsx workbook into Korean and writes a copy
that keeps column widths, row heights, cell styles and merged ranges.

EXAMPLES:
    celltrans report.xlsx                          # Translate using default config
    celltrans -f report.xlsx                       # Force overwrite of report_translated.xlsx
    celltrans -o out.xlsx report.xlsx              # Choose the output path
    celltrans -p libretranslate -e http://localhost:5000 report.xlsx
    celltrans completions bash > celltrans.bash    # Generate bash completions

CONFIGURATION:
    Configuration is stored in conf.json by default. You can specify a different
    config file with --config-path. If the config file doesn't exist, a default one
    will be created automatically.

Press Ctrl-C to stop a run; no output is written for a stopped run.")]
struct CommandLineOptions {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Input .xlsx workbook
    #[arg(value_name = "INPUT")]
    input_path: Option<PathBuf>,

    /// Output workbook (default: <input>_translated.xlsx next to the input)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    force_overwrite: bool,

    /// Translation provider to use
    #[arg(short, long, value_enum)]
    provider: Option<CliTranslationProvider>,

    /// Provider endpoint URL
    #[arg(short, long)]
    endpoint: Option<String>,

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

    // @returns: Marker for log level
    fn get_marker_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "✖",
            Level::Warn => "!",
            Level::Info => " ",
            Level::Debug => "·",
            Level::Trace => "…",
        }
    }

    // @returns: ANSI colour for log level
    fn get_color_for_level(level: Level) -> &'static str {
        match level {
            Level::Error => "\x1B[1;31m",
            Level::Warn => "\x1B[1;33m",
            Level::Info => "\x1B[1;32m",
            Level::Debug => "\x1B[1;36m",
            Level::Trace => "\x1B[1;35m",
        }
    }

    fn write_stderr(record: &Record) {
        let now = chrono::Local::now().format("%H:%M:%S.%3f");
        let mut stderr = std::io::stderr();
        let _ = writeln!(
            stderr,
            "{}{} {} {}\x1B[0m",
            Self::get_color_for_level(record.level()),
            now,
            Self::get_marker_for_level(record.level()),
            record.args()
        );
    }

    fn write_file(record: &Record) {
        if let Some(file) = LOG_FILE.lock().as_mut() {
            let line = format!("{:<5} {} - {}", record.level(), record.target(), record.args());
            let _ = file.append(&line);
        }
    }
}

impl Log for CustomLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            let bar = ACTIVE_BAR.lock().clone();
            match bar {
                Some(bar) => bar.suspend(|| Self::write_stderr(record)),
                None => Self::write_stderr(record),
            }
            Self::write_file(record);
        }
    }

    fn flush(&self) {
        let _ = std::io::stderr().flush();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Accept everything here; the effective level is set with set_max_level
    CustomLogger::init(LevelFilter::Trace)?;
    log::set_max_level(LevelFilter::Info);

    // Parse command line arguments using clap
    let cli = CommandLineOptions::parse();

    // Handle subcommands
    match cli.command {
        Some(Commands::Completions { shell }) => {
            let mut cmd = CommandLineOptions::command();
            generate(shell, &mut cmd, "celltrans", &mut std::io::stdout());
            Ok(())
        }
        Some(Commands::Translate(args)) => run_translate(args).await,
        None => {
            let input_path = cli
                .input_path
                .ok_or_else(|| anyhow!("INPUT is required when no subcommand is specified"))?;

            let translate_args = TranslateArgs {
                input_path,
                output: cli.output,
                force_overwrite: cli.force_overwrite,
                provider: cli.provider,
                endpoint: cli.endpoint,
                config_path: cli.config_path,
                log_level: cli.log_level,
            };
            run_translate(translate_args).await
        }
    }
}

async fn run_translate(options: TranslateArgs) -> Result<()> {
    // If log level is set via command line, apply it immediately
    if let Some(cmd_log_level) = &options.log_level {
        let level: app_config::LogLevel = cmd_log_level.clone().into();
        log::set_max_level(level.to_level_filter());
    }

    let (mut config, created) = Config::load_or_create(&options.config_path)?;
    if created {
        warn!("Config file not found at '{}', created default config.", options.config_path);
    }

    // Override config with CLI options if provided
    if let Some(provider) = &options.provider {
        config.translation.provider = provider.clone().into();
    }
    if let Some(endpoint) = &options.endpoint {
        config.translation.endpoint = endpoint.clone();
    }
    if let Some(log_level) = &options.log_level {
        config.log_level = log_level.clone().into();
    }

    // Validate the configuration after loading and overriding
    config.validate().context("Configuration validation failed")?;
    log::set_max_level(config.log_level.to_level_filter());

    if let Some(dir) = &config.log_dir {
        *LOG_FILE.lock() = Some(DailyLogFile::new(dir, "celltrans")?);
    }

    let controller = Controller::with_config(config.clone()).map_err(|e| anyhow!("{}", e))?;

    info!(
        "Translating {:?} into {} using {}",
        options.input_path,
        target_language_name(),
        config.translation.provider.display_name()
    );

    if let Err(e) = controller.test_connection().await {
        warn!("Connection test failed: {}. Cells that cannot be translated keep their original text.", e);
    }

    let cancel = CancellationToken::new();
    let ctrl_c_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Stop requested; finishing the current cell");
            ctrl_c_token.cancel();
        }
    });

    let progress_bar = Controller::create_progress_bar();
    *ACTIVE_BAR.lock() = Some(progress_bar.clone());
    let sink = Controller::progress_bar_sink(progress_bar.clone());

    let result = controller
        .run(&options.input_path, options.output.clone(), options.force_overwrite, &cancel, &sink)
        .await;

    progress_bar.finish_and_clear();
    *ACTIVE_BAR.lock() = None;

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            error!("{}", e);
            return Err(anyhow!(e));
        }
    };

    if report.status == RunStatus::SkippedExisting {
        return Ok(());
    }

    let stats = report.stats;
    info!(
        "Translated {} / skipped {} / total {} cells in {}",
        stats.translated_count,
        stats.skipped_count,
        stats.total_cells,
        Controller::format_duration(report.elapsed)
    );
    if stats.error_count > 0 {
        warn!("{} cell(s) could not be translated and kept their original text", stats.error_count);
    }
    match report.status {
        RunStatus::Completed => info!("Status: {} - output: {:?}", report.status.label(), report.output_path),
        _ => info!("Status: {}", report.status.label()),
    }

    Ok(())
}
