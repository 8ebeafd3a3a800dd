//! Provider error types.

use thiserror::Error;

/// Errors that can occur when fetching student data.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// No records exist for the student.
    #[error("student not found: {0}")]
    StudentNotFound(String),

    /// The student id cannot name a record (e.g. contains a path separator).
    #[error("invalid student id: {0:?}")]
    InvalidStudentId(String),

    /// Authentication failed (missing or rejected API token).
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The API returned an error response.
    #[error("API error (HTTP {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request timed out.
    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// A network error occurred.
    #[error("network error: {0}")]
    NetworkError(String),

    /// A record file or response body could not be decoded.
    #[error("malformed data in {source_name}: {message}")]
    MalformedData {
        source_name: String,
        message: String,
    },
}

impl ProviderError {
    pub(crate) fn malformed(source_name: impl Into<String>, message: impl ToString) -> Self {
        ProviderError::MalformedData {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }
}

/// Reject ids that are empty or could escape a data directory.
pub(crate) fn check_student_id(student_id: &str) -> Result<(), ProviderError> {
    let bad = student_id.trim().is_empty()
        || student_id.contains(['/', '\\'])
        || student_id.contains("..");
    if bad {
        return Err(ProviderError::InvalidStudentId(student_id.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn student_id_checks() {
        assert!(check_student_id("STU001").is_ok());
        assert!(check_student_id("").is_err());
        assert!(check_student_id("../etc/passwd").is_err());
        assert!(check_student_id("a/b").is_err());
        assert!(check_student_id("a\\b").is_err());
    }
}
