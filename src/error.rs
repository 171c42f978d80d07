//! Error types for filedepot.

use thiserror::Error;

use crate::auth::PasswordError;

/// Common error type for filedepot operations.
#[derive(Error, Debug)]
pub enum DepotError {
    /// The caller's username does not resolve to a registered user.
    #[error("unknown user")]
    Unauthorized,

    /// Resource not found.
    ///
    /// Also raised when file metadata exists but the bytes are missing from
    /// storage: from the caller's point of view the artifact is simply not
    /// retrievable, and the two cases are deliberately not distinguished.
    #[error("{0} not found")]
    NotFound(String),

    /// Username is already taken.
    #[error("username \"{0}\" is already registered")]
    AlreadyRegistered(String),

    /// Unknown username on login.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// The metadata store rejected a commit because a uniqueness or
    /// concurrency check failed.
    #[error("commit conflict: {0}")]
    Conflict(String),

    /// The metadata store failed to persist staged changes.
    #[error("persistence error: {0}")]
    Persistence(String),

    /// The operation was canceled while a commit was in flight.
    #[error("operation canceled")]
    Canceled,

    /// Filesystem I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Validation error for user input.
    #[error("validation error: {0}")]
    Validation(String),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Password hashing or verification error.
    #[error("password error: {0}")]
    Password(#[from] PasswordError),
}

impl DepotError {
    /// Whether this error is a commit-time failure of the metadata store.
    ///
    /// These are the kinds the file lifecycle service compensates on: after
    /// a failed create commit the just-written bytes are deleted before the
    /// error propagates.
    pub fn is_commit_failure(&self) -> bool {
        matches!(
            self,
            DepotError::Conflict(_) | DepotError::Persistence(_) | DepotError::Canceled
        )
    }
}

/// Result type alias for filedepot operations.
pub type Result<T> = std::result::Result<T, DepotError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = DepotError::NotFound("file".to_string());
        assert_eq!(err.to_string(), "file not found");
    }

    #[test]
    fn test_already_registered_display() {
        let err = DepotError::AlreadyRegistered("alice".to_string());
        assert_eq!(err.to_string(), "username \"alice\" is already registered");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DepotError = io_err.into();
        assert!(matches!(err, DepotError::Io(_)));
        assert!(err.to_string().contains("missing"));
    }

    #[test]
    fn test_commit_failure_kinds() {
        assert!(DepotError::Conflict("dup".into()).is_commit_failure());
        assert!(DepotError::Persistence("disk".into()).is_commit_failure());
        assert!(DepotError::Canceled.is_commit_failure());

        assert!(!DepotError::Unauthorized.is_commit_failure());
        assert!(!DepotError::NotFound("file".into()).is_commit_failure());
        assert!(!DepotError::InvalidCredentials.is_commit_failure());
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "io");
        assert!(!DepotError::Io(io_err).is_commit_failure());
    }

    #[test]
    fn test_result_alias() {
        fn sample_ok() -> Result<i32> {
            Ok(42)
        }

        assert_eq!(sample_ok().unwrap(), 42);
    }
}
