/*!
 * Tests for error types
 */

use std::path::PathBuf;

use celltrans::errors::{AppError, DocumentError, ProviderError, StyleError, TranslationError};

/// Only network-class failures are transient
#[test]
fn test_is_transient_withEachVariant_shouldOnlyAcceptNetworkFailures() {
    assert!(ProviderError::Timeout("read".to_string()).is_transient());
    assert!(ProviderError::ConnectionError("refused".to_string()).is_transient());

    assert!(!ProviderError::RequestFailed("bad".to_string()).is_transient());
    assert!(!ProviderError::ParseError("garbage".to_string()).is_transient());
    assert!(!ProviderError::RateLimitExceeded("quota".to_string()).is_transient());
    assert!(
        !ProviderError::ApiError {
            status_code: 500,
            message: "boom".to_string()
        }
        .is_transient()
    );
}

/// Test provider error messages
#[test]
fn test_provider_error_display_withApiError_shouldIncludeStatus() {
    let error = ProviderError::ApiError {
        status_code: 403,
        message: "forbidden".to_string(),
    };
    assert_eq!(error.to_string(), "API responded with error: 403 - forbidden");
}

/// Test conversions into the application error
#[test]
fn test_app_error_from_withNestedErrors_shouldWrapMessages() {
    let error: AppError = TranslationError::Provider(ProviderError::Timeout("read".to_string())).into();
    assert!(matches!(error, AppError::Translation(_)));
    assert!(error.to_string().contains("Request timed out: read"));

    let error: AppError = DocumentError::NotFound(PathBuf::from("missing.xlsx")).into();
    assert!(matches!(error, AppError::Document(DocumentError::NotFound(_))));
    assert!(error.to_string().contains("missing.xlsx"));

    let error: AppError = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied").into();
    assert!(matches!(error, AppError::File(_)));

    let error: AppError = anyhow::anyhow!("something odd").into();
    assert!(matches!(error, AppError::Unknown(ref message) if message == "something odd"));
}

/// Test cancellation and style messages
#[test]
fn test_error_display_withCancelAndOverlap_shouldDescribeProblem() {
    assert_eq!(TranslationError::Cancelled.to_string(), "Translation cancelled by request");
    let error = StyleError::OverlappingMerge {
        range: "A1:B2".to_string(),
        other: "B2:C3".to_string(),
    };
    assert_eq!(error.to_string(), "Merged range A1:B2 overlaps B2:C3");
}
