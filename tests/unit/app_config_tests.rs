/*!
 * Tests for application configuration functionality
 */

use std::str::FromStr;
use std::time::Duration;

use celltrans::app_config::{Config, LogLevel, TranslationConfig, TranslationProvider};
use crate::common;

/// Test default configuration values
#[test]
fn test_default_config_withNoParameters_shouldHaveCorrectDefaults() {
    let config = Config::default();

    assert_eq!(config.translation.provider, TranslationProvider::Google);
    assert_eq!(config.translation.connect_timeout_secs, 5);
    assert_eq!(config.translation.read_timeout_secs, 30);
    assert_eq!(config.translation.max_attempts, 3);
    assert_eq!(config.translation.retry_backoff_ms, 1000);
    assert_eq!(config.translation.rate_limit_delay_ms, 10);
    assert_eq!(config.progress.every_cells, 10);
    assert_eq!(config.progress.interval_ms, 500);
    assert_eq!(config.log_level, LogLevel::Info);
    assert!(config.log_dir.is_none());
    assert!(config.validate().is_ok());
}

/// Test configuration validation
#[test]
fn test_config_validation_withVariousConfigs_shouldValidateCorrectly() {
    let mut config = Config::default();
    config.translation.read_timeout_secs = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.max_attempts = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.progress.every_cells = 0;
    assert!(config.validate().is_err());

    let mut config = Config::default();
    config.translation.endpoint = "not a url".to_string();
    assert!(config.validate().is_err());
}

/// LibreTranslate has no public default and needs an explicit endpoint
#[test]
fn test_config_validation_withLibreTranslateAndNoEndpoint_shouldFail() {
    let mut config = Config::default();
    config.translation.provider = TranslationProvider::LibreTranslate;
    assert!(config.validate().is_err());

    config.translation.endpoint = "http://localhost:5000".to_string();
    assert!(config.validate().is_ok());
    assert_eq!(config.translation.get_endpoint(), "http://localhost:5000");
}

/// Test endpoint fallback for the default provider
#[test]
fn test_get_endpoint_withEmptyEndpoint_shouldUseProviderDefault() {
    let config = Config::default();
    assert_eq!(config.translation.get_endpoint(), "https://translate.googleapis.com");
}

/// Test provider name parsing and formatting
#[test]
fn test_translation_provider_withStrings_shouldParseAndDisplay() {
    assert_eq!(TranslationProvider::from_str("google").unwrap(), TranslationProvider::Google);
    assert_eq!(
        TranslationProvider::from_str("LibreTranslate").unwrap(),
        TranslationProvider::LibreTranslate
    );
    assert!(TranslationProvider::from_str("ollama").is_err());

    assert_eq!(TranslationProvider::LibreTranslate.to_string(), "libretranslate");
    assert_eq!(TranslationProvider::LibreTranslate.display_name(), "LibreTranslate");
}

/// A missing config file is created with defaults, then read back as-is
#[test]
fn test_load_or_create_withMissingFile_shouldWriteDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = temp_dir.path().join("conf.json");

    let (config, created) = Config::load_or_create(&path).unwrap();
    assert!(created);
    assert!(path.exists());
    assert_eq!(config, Config::default());

    let (reloaded, created) = Config::load_or_create(&path).unwrap();
    assert!(!created);
    assert_eq!(reloaded, config);
}

/// Partial files fill the missing fields with defaults
#[test]
fn test_load_or_create_withPartialJson_shouldApplyDefaults() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(
        temp_dir.path(),
        "conf.json",
        br#"{"translation": {"provider": "libretranslate", "endpoint": "http://lt.local"}, "log_level": "debug"}"#,
    )
    .unwrap();

    let (config, created) = Config::load_or_create(&path).unwrap();
    assert!(!created);
    assert_eq!(config.translation.provider, TranslationProvider::LibreTranslate);
    assert_eq!(config.translation.endpoint, "http://lt.local");
    assert_eq!(config.translation.max_attempts, 3);
    assert_eq!(config.progress.every_cells, 10);
    assert_eq!(config.log_level, LogLevel::Debug);
}

/// Malformed JSON is reported instead of being replaced
#[test]
fn test_load_or_create_withMalformedJson_shouldFail() {
    let temp_dir = common::create_temp_dir().unwrap();
    let path = common::create_test_file(temp_dir.path(), "conf.json", b"{ not json").unwrap();

    assert!(Config::load_or_create(&path).is_err());
    assert_eq!(std::fs::read(&path).unwrap(), b"{ not json");
}

/// Test log level mapping
#[test]
fn test_log_level_withEachVariant_shouldMapToFilter() {
    assert_eq!(LogLevel::Error.to_level_filter(), log::LevelFilter::Error);
    assert_eq!(LogLevel::Warn.to_level_filter(), log::LevelFilter::Warn);
    assert_eq!(LogLevel::Info.to_level_filter(), log::LevelFilter::Info);
    assert_eq!(LogLevel::Debug.to_level_filter(), log::LevelFilter::Debug);
    assert_eq!(LogLevel::Trace.to_level_filter(), log::LevelFilter::Trace);
}

/// Test that the whole-request ceiling covers both connecting and reading
#[test]
fn test_request_timeout_withCustomCeilings_shouldSumConnectAndRead() {
    let config = TranslationConfig {
        connect_timeout_secs: 2,
        read_timeout_secs: 7,
        ..Default::default()
    };

    assert_eq!(config.connect_timeout(), Duration::from_secs(2));
    assert_eq!(config.read_timeout(), Duration::from_secs(7));
    assert_eq!(config.request_timeout(), Duration::from_secs(9));
    assert_eq!(TranslationConfig::default().request_timeout(), Duration::from_secs(35));
}
