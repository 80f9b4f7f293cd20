/*!
 * Tests for error types and conversions
 */

use autosound::errors::{AppError, ProviderError, ScriptError};

#[test]
fn test_providerError_apiError_shouldDisplayStatusAndMessage() {
    let error = ProviderError::ApiError {
        status_code: 422,
        message: "Invalid voice".to_string(),
    };
    let display = format!("{}", error);
    assert!(display.contains("422"));
    assert!(display.contains("Invalid voice"));
}

#[test]
fn test_providerError_isRetryable_shouldOnlyFlagTransientErrors() {
    assert!(ProviderError::RateLimitExceeded("slow down".to_string()).is_retryable());
    assert!(ProviderError::ConnectionError("reset".to_string()).is_retryable());
    assert!(ProviderError::Timeout(30).is_retryable());
    assert!(ProviderError::ApiError { status_code: 503, message: String::new() }.is_retryable());

    assert!(!ProviderError::ApiError { status_code: 400, message: String::new() }.is_retryable());
    assert!(!ProviderError::AuthenticationError("bad key".to_string()).is_retryable());
    assert!(!ProviderError::ParseError("garbage".to_string()).is_retryable());
}

#[test]
fn test_scriptError_display_shouldDescribeProblem() {
    assert!(ScriptError::EmptyDocument.to_string().contains("empty"));
    assert!(ScriptError::UnsupportedFormat("x.pdf".to_string()).to_string().contains("x.pdf"));
}

#[test]
fn test_appError_fromConversions_shouldWrapSources() {
    let app: AppError = ScriptError::EmptyDocument.into();
    assert!(matches!(app, AppError::Script(ScriptError::EmptyDocument)));

    let app: AppError = ProviderError::Timeout(5).into();
    assert!(app.to_string().contains("5 seconds"));

    let app: AppError = std::io::Error::new(std::io::ErrorKind::NotFound, "missing").into();
    assert!(matches!(app, AppError::File(_)));

    let app: AppError = anyhow::anyhow!("odd").into();
    assert!(matches!(app, AppError::Unknown(_)));
}
