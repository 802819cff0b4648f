use indicatif::{ProgressBar, ProgressStyle};
use log::{info, warn};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::app_config::{Config, TranslationProvider};
use crate::errors::{AppError, DocumentError};
use crate::file_utils::{FileManager, FileType};
use crate::language_utils::TARGET_LANGUAGE;
use crate::providers::google::GoogleTranslate;
use crate::providers::libretranslate::LibreTranslate;
use crate::providers::{Provider, TranslateRequest};
use crate::translation::{
    CancellationToken, DocumentTranslator, ProgressSink, ProgressSnapshot, RunOutcome, SheetTranslator,
    StatsSnapshot, TranslationClient,
};
use crate::workbook::XlsxDocument;

// @module: Application controller for workbook translation

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    /// Every sheet was translated and the output written
    Completed,
    /// Cancelled before completion; nothing was written
    Stopped,
    /// The output already existed and overwriting was not requested
    SkippedExisting,
}

impl RunStatus {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::Stopped => "stopped",
            Self::SkippedExisting => "skipped",
        }
    }
}

/// Summary of a controller run
#[derive(Debug, Clone)]
pub struct RunReport {
    pub status: RunStatus,
    pub stats: StatsSnapshot,
    pub output_path: PathBuf,
    pub elapsed: Duration,
}

/// Main application controller for workbook translation
pub struct Controller {
    // @field: App configuration
    config: Config,
    // @field: Backend used for every cell
    provider: Arc<dyn Provider>,
}

impl Controller {
    // @method: Create a new controller with the given configuration
    pub fn with_config(config: Config) -> Result<Self, AppError> {
        config.validate().map_err(|e| AppError::Config(e.to_string()))?;
        let provider = Self::build_provider(&config);
        Ok(Self { config, provider })
    }

    /// Create a controller around an already built provider
    pub fn with_provider(config: Config, provider: Arc<dyn Provider>) -> Self {
        Self { config, provider }
    }

    /// Instantiate the provider named by the configuration
    pub fn build_provider(config: &Config) -> Arc<dyn Provider> {
        let translation = &config.translation;
        let connect = translation.connect_timeout();
        let read = translation.read_timeout();
        match translation.provider {
            TranslationProvider::Google => Arc::new(GoogleTranslate::new(translation.get_endpoint(), connect, read)),
            TranslationProvider::LibreTranslate => Arc::new(LibreTranslate::new(
                translation.get_endpoint(),
                translation.api_key.clone(),
                connect,
                read,
            )),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Send a probe translation through the provider
    pub async fn test_connection(&self) -> Result<(), AppError> {
        info!("Testing connection to {}", self.provider.name());
        self.provider.test_connection().await?;
        let probe = self
            .provider
            .translate(TranslateRequest::new("Hello", TARGET_LANGUAGE))
            .await?;
        info!("Connection OK ({} -> {})", "Hello", probe);
        Ok(())
    }

    /// Translate `input_file` and write the result.
    ///
    /// The output goes to `output_file`, or `<stem>_translated.xlsx` next to the
    /// input. Nothing is written unless the run completes.
    pub async fn run(
        &self,
        input_file: &Path,
        output_file: Option<PathBuf>,
        force_overwrite: bool,
        cancel: &CancellationToken,
        progress: &dyn ProgressSink,
    ) -> Result<RunReport, AppError> {
        let start_time = Instant::now();

        if !FileManager::file_exists(input_file) {
            return Err(DocumentError::NotFound(input_file.to_path_buf()).into());
        }
        if FileManager::detect_file_type(input_file)? != FileType::Workbook {
            return Err(DocumentError::UnsupportedFormat(format!(
                "{:?} (only .xlsx workbooks are supported)",
                input_file
            ))
            .into());
        }

        let output_path = output_file.unwrap_or_else(|| FileManager::generate_output_path(input_file, None));
        if output_path.exists() && !force_overwrite {
            warn!(
                "Skipping file, output already exists: {:?} (use -f to force overwrite)",
                output_path
            );
            return Ok(RunReport {
                status: RunStatus::SkippedExisting,
                stats: StatsSnapshot::default(),
                output_path,
                elapsed: start_time.elapsed(),
            });
        }

        let mut document = XlsxDocument::open(input_file)?;
        let workbook = document.workbook()?;
        info!("Opened {:?}: {} sheet(s)", input_file, workbook.len());

        let outcome = self
            .document_translator()
            .translate_document(&workbook, cancel, progress)
            .await?;

        let (status, stats) = match outcome {
            RunOutcome::Completed { workbook: output, stats } => {
                document.apply(&output)?;
                document.save(&output_path)?;
                info!("Success: {:?}", output_path);
                (RunStatus::Completed, stats)
            }
            RunOutcome::Cancelled { stats } => {
                warn!("Translation stopped; no output written");
                (RunStatus::Stopped, stats)
            }
        };

        Ok(RunReport {
            status,
            stats,
            output_path,
            elapsed: start_time.elapsed(),
        })
    }

    fn document_translator(&self) -> DocumentTranslator {
        let client = TranslationClient::from_config(Arc::clone(&self.provider), &self.config.translation);
        DocumentTranslator::new(
            SheetTranslator::new(client, TARGET_LANGUAGE),
            self.config.progress.clone(),
        )
    }

    /// Progress bar drawn on stderr
    pub fn create_progress_bar() -> ProgressBar {
        let progress_bar = ProgressBar::new(0);
        progress_bar.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} cells ({eta}) {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .progress_chars("#>-"),
        );
        progress_bar
    }

    /// Sink that mirrors progress snapshots onto a progress bar
    pub fn progress_bar_sink(progress_bar: ProgressBar) -> impl ProgressSink {
        move |snapshot: ProgressSnapshot| {
            progress_bar.set_length(snapshot.total as u64);
            progress_bar.set_position(snapshot.processed as u64);
            if let Some(detail) = snapshot.detail {
                progress_bar.set_message(detail);
            }
        }
    }

    /// Format a duration as `1h 02m 03s`, `2m 03s` or `3.4s`
    pub fn format_duration(duration: Duration) -> String {
        let total_secs = duration.as_secs();
        let hours = total_secs / 3600;
        let minutes = (total_secs % 3600) / 60;
        let seconds = total_secs % 60;

        if hours > 0 {
            format!("{}h {:02}m {:02}s", hours, minutes, seconds)
        } else if minutes > 0 {
            format!("{}m {:02}s", minutes, seconds)
        } else {
            format!("{:.1}s", duration.as_secs_f64())
        }
    }
}
