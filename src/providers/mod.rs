/*!
 * Provider implementations for different translation services.
 *
 * This module contains client implementations for the supported backends:
 * - Google: the public `translate_a/single` endpoint
 * - LibreTranslate: a self-hosted or public LibreTranslate server
 * - Mock: scripted behaviour for tests
 */

use async_trait::async_trait;
use log::warn;
use reqwest::Client;
use std::fmt::Debug;
use std::time::Duration;

use crate::errors::ProviderError;

/// A single text translation request
#[derive(Debug, Clone, PartialEq)]
pub struct TranslateRequest {
    /// Text to translate, already trimmed
    pub text: String,
    /// ISO 639-1 code of the target language
    pub target_language: String,
}

impl TranslateRequest {
    pub fn new(text: impl Into<String>, target_language: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_language: target_language.into(),
        }
    }
}

/// Common trait for all translation backends
///
/// Implementations own transport, authentication and their own timeouts. The
/// trait is object safe so the pipeline can hold an `Arc<dyn Provider>`.
#[async_trait]
pub trait Provider: Send + Sync + Debug {
    /// Translate one piece of text
    ///
    /// # Arguments
    /// * `request` - The text and target language
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or a classified error
    async fn translate(&self, request: TranslateRequest) -> Result<String, ProviderError>;

    /// Test the connection to the provider
    async fn test_connection(&self) -> Result<(), ProviderError>;

    /// Short name used in log lines
    fn name(&self) -> &str;
}

/// HTTP client shared by the remote backends
///
/// reqwest 0.11 only offers connect and whole-request timeouts, so a slow read is
/// cut off once `connect + read` has elapsed.
pub(crate) fn http_client(connect_timeout: Duration, read_timeout: Duration) -> Client {
    Client::builder()
        .connect_timeout(connect_timeout)
        .timeout(connect_timeout + read_timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!("Falling back to a default HTTP client: {}", e);
            Client::new()
        })
}

/// Map a non-success HTTP status to a provider error
pub(crate) fn status_error(status: reqwest::StatusCode, body: String) -> ProviderError {
    if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
        ProviderError::RateLimitExceeded(body)
    } else {
        ProviderError::ApiError {
            status_code: status.as_u16(),
            message: body,
        }
    }
}

pub mod google;
pub mod libretranslate;
pub mod mock;
