use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::default::Default;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::time::Duration;
use url::Url;

use crate::providers::google::DEFAULT_GOOGLE_ENDPOINT;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Translation backend settings
    #[serde(default)]
    pub translation: TranslationConfig,

    /// Progress reporting settings
    #[serde(default)]
    pub progress: ProgressConfig,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Directory for daily log files; stderr only when unset
    #[serde(default)]
    pub log_dir: Option<String>,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: Google translate web endpoint
    #[default]
    Google,
    // @provider: LibreTranslate server
    LibreTranslate,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::Google => "Google",
            Self::LibreTranslate => "LibreTranslate",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::Google => "google".to_string(),
            Self::LibreTranslate => "libretranslate".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "libretranslate" => Ok(Self::LibreTranslate),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Service URL; empty means the provider default
    #[serde(default = "String::new")]
    pub endpoint: String,

    /// API key, for servers that require one
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Ceiling for establishing a connection, in seconds
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,

    /// Ceiling for receiving the response, in seconds
    #[serde(default = "default_read_timeout_secs")]
    pub read_timeout_secs: u64,

    /// Attempts per cell, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Backoff base for retries (in milliseconds), doubled on each retry
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Delay in milliseconds after each successful request
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            provider: TranslationProvider::default(),
            endpoint: String::new(),
            api_key: String::new(),
            connect_timeout_secs: default_connect_timeout_secs(),
            read_timeout_secs: default_read_timeout_secs(),
            max_attempts: default_max_attempts(),
            retry_backoff_ms: default_retry_backoff_ms(),
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
        }
    }
}

impl TranslationConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    /// Ceiling for one whole request: connecting plus reading the response
    ///
    /// reqwest 0.11 has no per-read timeout, so the read ceiling is only enforced
    /// as part of this total.
    pub fn request_timeout(&self) -> Duration {
        self.connect_timeout() + self.read_timeout()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if !self.endpoint.is_empty() {
            return self.endpoint.clone();
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::Google => DEFAULT_GOOGLE_ENDPOINT.to_string(),
            TranslationProvider::LibreTranslate => String::new(),
        }
    }
}

/// Progress reporting settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ProgressConfig {
    /// Emit after every this many processed cells
    #[serde(default = "default_progress_every_cells")]
    pub every_cells: usize,

    /// Emit at least this often (in milliseconds) while cells are processed
    #[serde(default = "default_progress_interval_ms")]
    pub interval_ms: u64,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            every_cells: default_progress_every_cells(),
            interval_ms: default_progress_interval_ms(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn to_level_filter(self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_connect_timeout_secs() -> u64 {
    5
}

fn default_read_timeout_secs() -> u64 {
    30
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_rate_limit_delay_ms() -> u64 {
    10
}

fn default_progress_every_cells() -> usize {
    10
}

fn default_progress_interval_ms() -> u64 {
    500
}

impl Config {
    /// Load the configuration, writing a default file first when none exists
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<(Self, bool)> {
        let path = path.as_ref();
        if path.exists() {
            let file = File::open(path).context(format!("Failed to open config file: {:?}", path))?;
            let reader = BufReader::new(file);
            let config: Config =
                serde_json::from_reader(reader).context(format!("Failed to parse config file: {:?}", path))?;
            return Ok((config, false));
        }

        let config = Config::default();
        config.save(path)?;
        Ok((config, true))
    }

    /// Write the configuration as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let config_json = serde_json::to_string_pretty(self).context("Failed to serialize config to JSON")?;
        std::fs::write(path, config_json).context(format!("Failed to write config to file: {:?}", path))?;
        Ok(())
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        let translation = &self.translation;

        if translation.connect_timeout_secs == 0 || translation.read_timeout_secs == 0 {
            return Err(anyhow!("Connect and read timeouts must be greater than zero"));
        }

        if translation.max_attempts == 0 {
            return Err(anyhow!("max_attempts must be at least 1"));
        }

        if self.progress.every_cells == 0 {
            return Err(anyhow!("progress.every_cells must be at least 1"));
        }

        let endpoint = translation.get_endpoint();
        if endpoint.is_empty() {
            return Err(anyhow!(
                "An endpoint is required for the {} provider",
                translation.provider.display_name()
            ));
        }
        Url::parse(&endpoint).context(format!("Invalid endpoint URL: {}", endpoint))?;

        Ok(())
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            translation: TranslationConfig::default(),
            progress: ProgressConfig::default(),
            log_level: LogLevel::default(),
            log_dir: None,
        }
    }
}
