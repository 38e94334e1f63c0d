//! Error types for entry handles and the primitive provider.
//!
//! Two conditions are deliberately *not* errors and are modelled as values
//! elsewhere: a path that resolves to no entry (`open` returns `Ok(None)`)
//! and a listing requested from an entry that does not exist (the getter
//! returns `Ok(None)`). Everything in this module represents an operation
//! that was attempted and could not be performed.

use thiserror::Error;

/// Errors from file and directory primitive operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FsError {
    #[error("No such file or directory: {path}")]
    NotFound { path: String },

    #[error("Permission denied: {path}")]
    PermissionDenied { path: String },

    #[error("I/O error: {message}")]
    Io { message: String },
}

/// Errors from archive operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArchiveError {
    #[error("Archive is corrupted or invalid: {reason}")]
    Corrupted { reason: String },

    #[error("No such archive member: {name}")]
    MemberNotFound { name: String },

    #[error("Failed to extract archive: {reason}")]
    ExtractFailed { reason: String },

    #[error("Failed to write archive: {reason}")]
    WriteFailed { reason: String },

    #[error("Failed to add to archive: {reason}")]
    AddFailed { reason: String },

    /// The session was released by `close`; the handle can no longer be used.
    #[error("Archive session is closed")]
    SessionClosed,

    #[error("Filesystem error: {0}")]
    Fs(#[from] FsError),
}

/// Result type for file and directory operations
pub type FsResult<T> = Result<T, FsError>;

/// Result type for archive operations
pub type ArchiveResult<T> = Result<T, ArchiveError>;

impl From<std::io::Error> for FsError {
    fn from(err: std::io::Error) -> Self {
        FsError::Io {
            message: err.to_string(),
        }
    }
}

impl FsError {
    /// Map an I/O error to the taxonomy, keeping the path for the common kinds
    pub(crate) fn from_io(path: &str, err: std::io::Error) -> Self {
        match err.kind() {
            std::io::ErrorKind::NotFound => FsError::NotFound {
                path: path.to_string(),
            },
            std::io::ErrorKind::PermissionDenied => FsError::PermissionDenied {
                path: path.to_string(),
            },
            _ => FsError::Io {
                message: format!("{path}: {err}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fs_error_display() {
        let err = FsError::NotFound {
            path: "/missing/file.txt".to_string(),
        };
        assert_eq!(err.to_string(), "No such file or directory: /missing/file.txt");

        let err = FsError::PermissionDenied {
            path: "/etc/shadow".to_string(),
        };
        assert!(err.to_string().contains("Permission denied"));
    }

    #[test]
    fn test_archive_error_display() {
        let err = ArchiveError::MemberNotFound {
            name: "docs/readme.md".to_string(),
        };
        assert!(err.to_string().contains("docs/readme.md"));

        assert_eq!(
            ArchiveError::SessionClosed.to_string(),
            "Archive session is closed"
        );
    }

    #[test]
    fn test_fs_error_conversion() {
        let fs_err = FsError::NotFound {
            path: "/a.zip".to_string(),
        };
        let archive_err: ArchiveError = fs_err.clone().into();
        assert_eq!(archive_err, ArchiveError::Fs(fs_err));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::Other, "disk on fire");
        let fs_err: FsError = io_err.into();
        match fs_err {
            FsError::Io { message } => assert!(message.contains("disk on fire")),
            other => panic!("Unexpected conversion: {other:?}"),
        }
    }
}
