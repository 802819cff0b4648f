/*!
 * Error types for the celltrans application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur when talking to a translation backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ProviderError {
    /// The connect or read phase exceeded its ceiling
    #[error("Request timed out: {0}")]
    Timeout(String),

    /// Error establishing or maintaining a connection
    #[error("Connection error: {0}")]
    ConnectionError(String),

    /// Error when making an API request fails
    #[error("API request failed: {0}")]
    RequestFailed(String),

    /// Error when parsing an API response fails
    #[error("Failed to parse API response: {0}")]
    ParseError(String),

    /// Error returned by the API itself
    #[error("API responded with error: {status_code} - {message}")]
    ApiError {
        /// HTTP status code
        status_code: u16,
        /// Error message from the API
        message: String,
    },

    /// Quota or rate rejection from the service
    #[error("Rate limit exceeded: {0}")]
    RateLimitExceeded(String),
}

impl ProviderError {
    /// Whether the failure belongs to the transient network class that is worth retrying.
    ///
    /// Only timeouts and dropped/refused connections qualify; everything the service
    /// answered explicitly is permanent for the current request.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Timeout(_) | Self::ConnectionError(_))
    }

    /// Classify a reqwest transport error
    pub fn from_reqwest(error: &reqwest::Error) -> Self {
        if error.is_timeout() {
            Self::Timeout(error.to_string())
        } else if error.is_connect() || error.is_request() {
            Self::ConnectionError(error.to_string())
        } else if error.is_decode() || error.is_body() {
            Self::ParseError(error.to_string())
        } else {
            Self::RequestFailed(error.to_string())
        }
    }
}

/// Errors that stop the translation of a sheet or document
#[derive(Error, Debug)]
pub enum TranslationError {
    /// The run was stopped through its cancellation token
    #[error("Translation cancelled by request")]
    Cancelled,

    /// Error from the provider API
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),
}

/// Errors raised while reading or writing a workbook
#[derive(Error, Debug)]
pub enum DocumentError {
    /// The input path does not exist
    #[error("Source document not found: {0}")]
    NotFound(PathBuf),

    /// The input exists but cannot be parsed as a workbook
    #[error("Unreadable document {path}: {message}")]
    Unreadable { path: PathBuf, message: String },

    /// Only plain .xlsx packages are accepted
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// Two sheets share a name
    #[error("Duplicate sheet name: {0}")]
    DuplicateSheetName(String),

    /// The output sheet has no counterpart in the source package
    #[error("Sheet not found in document: {0}")]
    SheetNotFound(String),

    /// The output document could not be written
    #[error("Failed to write document {path}: {message}")]
    Write { path: PathBuf, message: String },
}

/// Errors raised when a style record cannot be copied onto a cell
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleError {
    /// A colour that is not a 6 or 8 digit hexadecimal ARGB value
    #[error("Invalid colour value: {0}")]
    InvalidColor(String),

    /// A font size that is not a positive finite number
    #[error("Invalid font size: {0}")]
    InvalidFontSize(f64),

    /// A cell range that cannot be parsed or is inverted
    #[error("Invalid cell range: {0}")]
    InvalidRange(String),

    /// A merged range that intersects one already applied
    #[error("Merged range {range} overlaps {other}")]
    OverlappingMerge { range: String, other: String },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from the configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error from a provider
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    /// Error from translation
    #[error("Translation error: {0}")]
    Translation(#[from] TranslationError),

    /// Error from document reading or writing
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
