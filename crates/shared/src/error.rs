//! Application-wide error types.
//!
//! Engine errors convert into [`AppError`] so that external surfaces (API
//! handlers, report exporters, the CLI) can map every failure to a stable
//! code and status without knowing the engine's error enums.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Input rejected by validation (e.g. an unbalanced journal entry).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation (e.g. editing an approved entry).
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Derived data failed an integrity check. Fatal to the report being produced.
    #[error("Data integrity violation: {0}")]
    Integrity(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the HTTP status code for this error.
    #[must_use]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::Validation(_) => 400,
            Self::NotFound(_) => 404,
            Self::BusinessRule(_) => 422,
            Self::Integrity(_) | Self::Configuration(_) | Self::Internal(_) => 500,
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Integrity(_) => "INTEGRITY_VIOLATION",
            Self::Configuration(_) => "CONFIGURATION_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the error must abort the report being rendered
    /// instead of being shown to the user as a recoverable message.
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Integrity(_) | Self::Internal(_))
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::Configuration(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(AppError::Validation(String::new()), 400, "VALIDATION_ERROR")]
    #[case(AppError::BusinessRule(String::new()), 422, "BUSINESS_RULE_VIOLATION")]
    #[case(AppError::NotFound(String::new()), 404, "NOT_FOUND")]
    #[case(AppError::Integrity(String::new()), 500, "INTEGRITY_VIOLATION")]
    #[case(AppError::Configuration(String::new()), 500, "CONFIGURATION_ERROR")]
    #[case(AppError::Internal(String::new()), 500, "INTERNAL_ERROR")]
    fn test_status_and_error_codes(
        #[case] error: AppError,
        #[case] status: u16,
        #[case] code: &str,
    ) {
        assert_eq!(error.status_code(), status);
        assert_eq!(error.error_code(), code);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::Validation("msg".into()).to_string(),
            "Validation error: msg"
        );
        assert_eq!(
            AppError::BusinessRule("msg".into()).to_string(),
            "Business rule violation: msg"
        );
        assert_eq!(
            AppError::Integrity("msg".into()).to_string(),
            "Data integrity violation: msg"
        );
    }

    #[test]
    fn test_only_integrity_and_internal_are_fatal() {
        assert!(AppError::Integrity(String::new()).is_fatal());
        assert!(AppError::Internal(String::new()).is_fatal());
        assert!(!AppError::Validation(String::new()).is_fatal());
        assert!(!AppError::BusinessRule(String::new()).is_fatal());
        assert!(!AppError::Configuration(String::new()).is_fatal());
    }

    #[test]
    fn test_from_config_error() {
        let err: AppError = config::ConfigError::Message("bad".into()).into();
        assert!(matches!(err, AppError::Configuration(_)));
        assert_eq!(err.error_code(), "CONFIGURATION_ERROR");
    }
}
