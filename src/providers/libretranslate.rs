use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::{Provider, TranslateRequest, http_client, status_error};
use crate::errors::ProviderError;

/// LibreTranslate client
#[derive(Debug)]
pub struct LibreTranslate {
    /// HTTP client for API requests
    client: Client,
    /// Server base URL
    endpoint: String,
    /// API key, empty for servers that do not require one
    api_key: String,
}

/// Request body of `POST /translate`
#[derive(Debug, Serialize)]
pub struct LibreTranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

/// Successful response body
#[derive(Debug, Deserialize)]
pub struct LibreTranslateResponse {
    #[serde(rename = "translatedText")]
    pub translated_text: String,
}

impl LibreTranslate {
    /// Create a new LibreTranslate client
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        connect_timeout: Duration,
        read_timeout: Duration,
    ) -> Self {
        Self {
            client: http_client(connect_timeout, read_timeout),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}/translate", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl Provider for LibreTranslate {
    async fn translate(&self, request: TranslateRequest) -> Result<String, ProviderError> {
        let body = LibreTranslateRequest {
            q: &request.text,
            source: "auto",
            target: &request.target_language,
            format: "text",
            api_key: Some(self.api_key.as_str()).filter(|key| !key.is_empty()),
        };

        let response = self
            .client
            .post(self.api_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| ProviderError::from_reqwest(&e))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("LibreTranslate error ({}): {}", status, error_text);
            return Err(status_error(status, error_text));
        }

        let parsed = response
            .json::<LibreTranslateResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        if parsed.translated_text.is_empty() {
            return Err(ProviderError::ParseError("Response contained no translated text".to_string()));
        }
        Ok(parsed.translated_text)
    }

    async fn test_connection(&self) -> Result<(), ProviderError> {
        self.translate(TranslateRequest::new("Hello", "ko")).await?;
        Ok(())
    }

    fn name(&self) -> &str {
        "libretranslate"
    }
}
