//! Error types for ToyCombine

use std::path::PathBuf;

use thiserror::Error;

/// ToyCombine error type
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// I/O error tied to a specific filesystem path
    #[error("I/O error at {}: {source}", path.display())]
    Path {
        /// Offending path
        path: PathBuf,
        /// Underlying cause
        #[source]
        source: std::io::Error,
    },

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration (binning, fractions, topology)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Computation error
    #[error("Computation error: {0}")]
    Computation(String),

    /// Histogram container read/write failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Plot rendering failure
    #[error("Render error: {0}")]
    Render(String),

    /// An external tool exited unsuccessfully
    #[error("external tool failed ({}): {command}{}", exit_label(*code), stderr_tail(stderr))]
    ExternalTool {
        /// Command line as executed
        command: String,
        /// Exit code (`None` when terminated by a signal)
        code: Option<i32>,
        /// Captured standard error
        stderr: String,
    },
}

impl Error {
    /// Attach a path to an `std::io::Error`.
    pub fn at_path(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Path { path: path.into(), source }
    }
}

fn exit_label(code: Option<i32>) -> String {
    match code {
        Some(c) => format!("exit code {c}"),
        None => "terminated by signal".to_string(),
    }
}

fn stderr_tail(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        return String::new();
    }
    let last: Vec<&str> = trimmed.lines().rev().take(5).collect();
    let tail: Vec<&str> = last.into_iter().rev().collect();
    format!("\n{}", tail.join("\n"))
}

/// Result type alias
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn external_tool_message_includes_command_and_code() {
        let e = Error::ExternalTool {
            command: "text2workspace.py -m 125 output/datacard.txt".into(),
            code: Some(2),
            stderr: "line one\nImportError: no module named HiggsAnalysis\n".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("exit code 2"), "{msg}");
        assert!(msg.contains("text2workspace.py -m 125"), "{msg}");
        assert!(msg.contains("ImportError"), "{msg}");
    }

    #[test]
    fn path_error_reports_path() {
        let e = Error::at_path(
            "/nonexistent/input",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(e.to_string().contains("/nonexistent/input"));
    }
}
