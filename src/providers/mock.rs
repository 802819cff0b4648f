/*!
 * Mock provider implementations for testing.
 *
 * This module provides a mock provider that simulates different behaviors:
 * - `MockProvider::working()` - Always succeeds with translated text
 * - `MockProvider::failing(error)` - Always fails with the given error
 * - `MockProvider::fail_times(n, error)` - Fails the first `n` calls, then succeeds
 * - `MockProvider::failing_for(text, error)` - Fails only for one input text
 * - `MockProvider::slow(delay_ms)` - Succeeds after a delay
 */

use async_trait::async_trait;
use parking_lot::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::errors::ProviderError;
use crate::providers::{Provider, TranslateRequest};

/// Behavior mode for the mock provider
#[derive(Debug, Clone, PartialEq)]
pub enum MockBehavior {
    /// Always succeeds with a translation
    Working,
    /// Always fails with the given error
    Failing(ProviderError),
    /// Fails the first `times` calls with the given error, then succeeds
    FailTimes { times: usize, error: ProviderError },
    /// Fails whenever the request text equals `text`
    FailingFor { text: String, error: ProviderError },
    /// Simulates slow response (for timeout testing)
    Slow { delay_ms: u64 },
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Request counter, shared between clones
    request_count: Arc<AtomicUsize>,
    /// Every request received, in order
    requests: Arc<Mutex<Vec<TranslateRequest>>>,
    /// Custom response generator (optional)
    custom_response: Option<fn(&TranslateRequest) -> String>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            requests: Arc::new(Mutex::new(Vec::new())),
            custom_response: None,
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a failing mock provider that always errors
    pub fn failing(error: ProviderError) -> Self {
        Self::new(MockBehavior::Failing(error))
    }

    /// Create a mock that fails `times` times before succeeding
    pub fn fail_times(times: usize, error: ProviderError) -> Self {
        Self::new(MockBehavior::FailTimes { times, error })
    }

    /// Create a mock that fails only for one input text
    pub fn failing_for(text: impl Into<String>, error: ProviderError) -> Self {
        Self::new(MockBehavior::FailingFor {
            text: text.into(),
            error,
        })
    }

    /// Create a mock that answers after `delay_ms`
    pub fn slow(delay_ms: u64) -> Self {
        Self::new(MockBehavior::Slow { delay_ms })
    }

    /// Set a custom response generator
    pub fn with_custom_response(mut self, generator: fn(&TranslateRequest) -> String) -> Self {
        self.custom_response = Some(generator);
        self
    }

    /// Number of translate calls received so far
    pub fn request_count(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    /// Texts received so far, in call order
    pub fn requested_texts(&self) -> Vec<String> {
        self.requests.lock().iter().map(|request| request.text.clone()).collect()
    }

    /// Default translation: the text tagged with a Hangul marker
    pub fn default_translation(request: &TranslateRequest) -> String {
        format!("번역 {}", request.text)
    }

    fn respond(&self, request: &TranslateRequest) -> String {
        match self.custom_response {
            Some(generator) => generator(request),
            None => Self::default_translation(request),
        }
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior.clone(),
            request_count: Arc::clone(&self.request_count),
            requests: Arc::clone(&self.requests),
            custom_response: self.custom_response,
        }
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn translate(&self, request: TranslateRequest) -> Result<String, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        match &self.behavior {
            MockBehavior::Working => Ok(self.respond(&request)),

            MockBehavior::Failing(error) => Err(error.clone()),

            MockBehavior::FailTimes { times, error } => {
                if count < *times {
                    Err(error.clone())
                } else {
                    Ok(self.respond(&request))
                }
            }

            MockBehavior::FailingFor { text, error } => {
                if &request.text == text {
                    Err(error.clone())
                } else {
                    Ok(self.respond(&request))
                }
            }

            MockBehavior::Slow { delay_ms } => {
                tokio::time::sleep(tokio::time::Duration::from_millis(*delay_ms)).await;
                Ok(self.respond(&request))
            }
        }
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        match &self.behavior {
            MockBehavior::Failing(error) => Err(error.clone()),
            _ => Ok(()),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
