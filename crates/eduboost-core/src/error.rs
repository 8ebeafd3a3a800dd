//! Engine error types.
//!
//! Every engine operation returns these so callers (the service layer and
//! the CLI) can tell rejected input apart from collaborator failures
//! without string matching.

use thiserror::Error;

/// Errors produced by the scoring and recommendation engine.
#[derive(Debug, Error, PartialEq)]
pub enum EngineError {
    /// The request cannot be evaluated at all (e.g. no performance records).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A raw input field is outside its documented range.
    #[error("validation failed for `{field}`: {message}")]
    Validation { field: String, message: String },

    /// The injected resource catalog failed to answer a query.
    #[error("resource catalog error: {0}")]
    Catalog(String),
}

impl EngineError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        EngineError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Returns `true` if the error was caused by the caller's input rather
    /// than by a collaborator.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            EngineError::InvalidInput(_) | EngineError::Validation { .. }
        )
    }
}

/// Reject non-finite values and values outside `min..=max`.
pub(crate) fn check_range(field: &str, value: f64, min: f64, max: f64) -> Result<(), EngineError> {
    if !value.is_finite() {
        return Err(EngineError::validation(field, "must be a finite number"));
    }
    if value < min || value > max {
        return Err(EngineError::validation(
            field,
            format!("{value} is outside {min}..={max}"),
        ));
    }
    Ok(())
}
