//! Error types for video library lookups.

use std::io;

/// Failure while resolving or reading something under the videos root.
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    /// The requested video directory or file does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The request tried to reach outside the videos root.
    #[error("forbidden path: {0}")]
    Forbidden(String),

    /// The videos root itself is missing or unusable.
    #[error("misconfigured: {0}")]
    Misconfigured(String),

    /// Any other filesystem failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl LibraryError {
    /// HTTP status code this error maps to
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::NotFound(_) => 404,
            Self::Forbidden(_) => 403,
            Self::Misconfigured(_) | Self::Io(_) => 500,
        }
    }
}

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, LibraryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(LibraryError::NotFound("a".into()).status_code(), 404);
        assert_eq!(LibraryError::Forbidden("..".into()).status_code(), 403);
        assert_eq!(LibraryError::Misconfigured("root".into()).status_code(), 500);
        let io = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        assert_eq!(LibraryError::from(io).status_code(), 500);
    }

    #[test]
    fn test_display() {
        let err = LibraryError::NotFound("videos/missing".into());
        assert_eq!(err.to_string(), "not found: videos/missing");
    }
}
