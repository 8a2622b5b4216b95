//! Error types for container I/O.

use std::path::PathBuf;

use thiserror::Error;

/// Container read/write error.
#[derive(Error, Debug)]
pub enum RootError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a path.
    #[error("I/O error at {}: {source}", path.display())]
    Path {
        /// Offending path.
        path: PathBuf,
        /// Underlying cause.
        #[source]
        source: std::io::Error,
    },

    /// File does not start with the container magic.
    #[error("not a histogram container (bad magic)")]
    BadMagic,

    /// Header version this reader does not understand.
    #[error("unsupported container version {0}")]
    UnsupportedVersion(u32),

    /// Read past the end of a buffer.
    #[error("buffer underflow at offset {offset}: need {need} bytes, have {have}")]
    BufferUnderflow {
        /// Cursor position.
        offset: usize,
        /// Bytes requested.
        need: usize,
        /// Bytes available.
        have: usize,
    },

    /// Malformed record or object payload.
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// Compression failure.
    #[error("compression error: {0}")]
    Compression(String),

    /// Decompression failure.
    #[error("decompression error: {0}")]
    Decompression(String),

    /// No key with the requested name/path.
    #[error("key not found: {0}")]
    KeyNotFound(String),

    /// Object class not handled by this crate.
    #[error("unsupported class: {0}")]
    UnsupportedClass(String),
}

impl RootError {
    /// Attach a path to an I/O error.
    pub fn at_path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RootError::Path { path: path.into(), source }
    }
}

/// Result type alias for container operations.
pub type Result<T> = std::result::Result<T, RootError>;

impl From<RootError> for tc_core::Error {
    fn from(e: RootError) -> Self {
        match e {
            RootError::Io(source) => tc_core::Error::Io(source),
            RootError::Path { path, source } => tc_core::Error::Path { path, source },
            other => tc_core::Error::Storage(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_into_core_error() {
        let e: tc_core::Error = RootError::KeyNotFound("cat1/sig9".into()).into();
        assert!(matches!(e, tc_core::Error::Storage(ref m) if m.contains("cat1/sig9")));

        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let e: tc_core::Error = RootError::at_path("/nope/x.root", io).into();
        assert!(e.to_string().contains("/nope/x.root"));
    }
}
