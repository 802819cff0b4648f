use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use super::{Provider, TranslateRequest, http_client, status_error};
use crate::errors::ProviderError;

/// Default endpoint of the public Google translate API
pub const DEFAULT_GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com";

/// Google client for the keyless `translate_a/single` endpoint
#[derive(Debug)]
pub struct GoogleTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Base URL, without the path
    endpoint: String,
}

impl GoogleTranslate {
    /// Create a new Google client with the given connect and read ceilings
    pub fn new(endpoint: impl Into<String>, connect_timeout: Duration, read_timeout: Duration) -> Self {
        let endpoint = endpoint.into();
        Self {
            client: http_client(connect_timeout, read_timeout),
            endpoint: if endpoint.is_empty() {
                DEFAULT_GOOGLE_ENDPOINT.to_string()
            } else {
                endpoint
            },
        }
    }

    fn api_url(&self) -> String {
        format!("{}/translate_a/single", self.endpoint.trim_end_matches('/'))
    }

    /// Concatenate the translated segments of a `translate_a/single` response
    ///
    /// The payload is a nested array whose first element lists the segments, each
    /// segment holding the translated text at index 0.
    pub fn extract_text(payload: &Value) -> Result<String, ProviderError> {
        let segments = payload
            .get(0)
            .and_then(Value::as_array)
            .ok_or_else(|| ProviderError::ParseError("Response has no segment list".to_string()))?;

        let text: String = segments
            .iter()
            .filter_map(|segment| segment.get(0).and_then(Value::as_str))
            .collect();

        if text.is_empty() {
            return Err(ProviderError::ParseError("Response contained no translated text".to_string()));
        }
        Ok(text)
    }
}

#[async_trait]
impl Provider for GoogleTranslate {
    async fn translate(&self, request: TranslateRequest) -> Result<String, ProviderError> {
        let response = self
            .client
            .get(self.api_url())
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", request.target_language.as_str()),
                ("dt", "t"),
                ("q", request.text.as_str()),
            ])
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Google translate error ({}): {}", status, error_text);
            return Err(status_error(status, error_text));
        }

        let payload = response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        Self::extract_text(&payload)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate(TranslateRequest::new("Hello", "ko")).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "google"
    }
}
