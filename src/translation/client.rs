/*!
 * Retrying client adapter around a translation provider.
 *
 * Each call is bounded by a timeout, transient network failures are retried
 * with exponential backoff, and a failure that survives the retries turns into a
 * pass-through of the original text instead of an error.
 */

use log::{debug, error, warn};
use std::sync::Arc;
use std::time::Duration;

use crate::app_config::TranslationConfig;
use crate::errors::ProviderError;
use crate::providers::{Provider, TranslateRequest};
use crate::translation::stats::RunStatistics;

/// How often and how patiently a call is retried
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Attempts in total, including the first
    pub max_attempts: u32,
    /// Wait after the first failed attempt; doubles for each further one
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Wait after the failed attempt with 0-based index `attempt`
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(2u32.saturating_pow(attempt))
    }

    /// Whether a failure on attempt `attempt` should be retried
    pub fn should_retry(&self, error: &ProviderError, attempt: u32) -> bool {
        error.is_transient() && attempt + 1 < self.max_attempts
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(3, Duration::from_secs(1))
    }
}

/// Outcome of translating one text; never fatal to the run
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationResult {
    Translated(String),
    Failed { original: String, reason: ProviderError },
}

impl TranslationResult {
    /// Text to place in the output cell
    pub fn into_text(self) -> String {
        match self {
            Self::Translated(text) => text,
            Self::Failed { original, .. } => original,
        }
    }

    pub fn is_translated(&self) -> bool {
        matches!(self, Self::Translated(_))
    }
}

/// Client adapter shared by all sheets of a run
#[derive(Debug, Clone)]
pub struct TranslationClient {
    provider: Arc<dyn Provider>,
    policy: RetryPolicy,
    attempt_timeout: Duration,
    rate_limit_delay: Duration,
}

impl TranslationClient {
    pub fn new(
        provider: Arc<dyn Provider>,
        policy: RetryPolicy,
        attempt_timeout: Duration,
        rate_limit_delay: Duration,
    ) -> Self {
        Self {
            provider,
            policy,
            attempt_timeout,
            rate_limit_delay,
        }
    }

    /// Build a client from the translation section of the configuration
    pub fn from_config(provider: Arc<dyn Provider>, config: &TranslationConfig) -> Self {
        Self::new(
            provider,
            RetryPolicy::new(config.max_attempts, Duration::from_millis(config.retry_backoff_ms)),
            config.request_timeout(),
            Duration::from_millis(config.rate_limit_delay_ms),
        )
    }

    pub fn policy(&self) -> RetryPolicy {
        self.policy
    }

    /// Upper bound on a single provider call
    pub fn attempt_timeout(&self) -> Duration {
        self.attempt_timeout
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Translate `text` into `target_language`.
    ///
    /// Updates `translated_count` on success and `error_count` on a terminal
    /// failure. After a success the configured spacing delay is observed before
    /// returning.
    pub async fn translate(&self, text: &str, target_language: &str, stats: &RunStatistics) -> TranslationResult {
        let request = TranslateRequest::new(text, target_language);
        let mut attempt = 0;

        loop {
            match self.attempt(request.clone()).await {
                Ok(translated) => {
                    stats.record_translated();
                    debug!("Translated '{}' -> '{}'", text, translated);
                    tokio::time::sleep(self.rate_limit_delay).await;
                    return TranslationResult::Translated(translated);
                }
                Err(e) if self.policy.should_retry(&e, attempt) => {
                    let wait = self.policy.delay_for(attempt);
                    warn!(
                        "Attempt {}/{} for '{}' failed: {}. Retrying in {:?}",
                        attempt + 1,
                        self.policy.max_attempts,
                        text,
                        e,
                        wait
                    );
                    tokio::time::sleep(wait).await;
                    attempt += 1;
                }
                Err(e) => {
                    error!("Translation of '{}' failed after {} attempt(s): {}", text, attempt + 1, e);
                    stats.record_error();
                    return TranslationResult::Failed {
                        original: text.to_string(),
                        reason: e,
                    };
                }
            }
        }
    }

    async fn attempt(&self, request: TranslateRequest) -> Result<String, ProviderError> {
        match tokio::time::timeout(self.attempt_timeout, self.provider.translate(request)).await {
            Ok(Ok(text)) if text.is_empty() => Err(ProviderError::ParseError("Empty translation returned".to_string())),
            Ok(result) => result,
            Err(_) => Err(ProviderError::Timeout(format!(
                "No response within {:?}",
                self.attempt_timeout
            ))),
        }
    }
}
