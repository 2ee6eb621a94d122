//! Persistence errors. Every variant names the file involved.

use std::io;
use std::path::PathBuf;

use pwrap_zkp::RawError;
use thiserror::Error;

/// Error while saving or loading an artifact.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A file or directory could not be opened, created, or written.
    #[error("failed to {operation} {path}: {source}")]
    Io {
        /// What was attempted: `open`, `create`, `write`, ...
        operation: &'static str,
        /// The file or directory.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },

    /// A binary artifact is truncated or malformed.
    #[error("malformed {path}: {source}")]
    Raw {
        /// The artifact.
        path: PathBuf,
        /// Decoding or encoding error.
        source: RawError,
    },

    /// A JSON artifact is malformed.
    #[error("malformed {path}: {source}")]
    Json {
        /// The artifact.
        path: PathBuf,
        /// Parse or encode error.
        source: serde_json::Error,
    },

    /// A binary artifact has data after the encoded value.
    #[error("malformed {path}: trailing bytes after encoded value")]
    TrailingBytes {
        /// The artifact.
        path: PathBuf,
    },
}

impl StoreError {
    pub(crate) fn io(operation: &'static str, path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io {
            operation,
            path,
            source,
        }
    }

    /// Whether the artifact simply does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Io { source, .. } if source.kind() == io::ErrorKind::NotFound)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_names_operation_and_path() {
        let err = StoreError::io("open", "/data/groth16/r1cs.bin")(io::Error::from(
            io::ErrorKind::NotFound,
        ));
        assert!(err.is_not_found());
        assert!(err
            .to_string()
            .starts_with("failed to open /data/groth16/r1cs.bin: "));
    }

    #[test]
    fn trailing_bytes_display() {
        let err = StoreError::TrailingBytes {
            path: "pk.bin".into(),
        };
        assert_eq!(
            err.to_string(),
            "malformed pk.bin: trailing bytes after encoded value"
        );
        assert!(!err.is_not_found());
    }
}
