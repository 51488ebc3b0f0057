//! Unified error types for the growth metrics pipeline.
//!
//! Error codes:
//! - IO_001: Input event log could not be read
//! - IO_002: Output table could not be written
//! - CFG_001: Invalid configuration

use std::path::PathBuf;

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// I/O error codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoErrorCode {
    /// IO_001: Reading the input failed
    Read,
    /// IO_002: Writing an output failed
    Write,
}

impl IoErrorCode {
    /// Get the error code string.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Read => "IO_001",
            Self::Write => "IO_002",
        }
    }
}

/// Unified error type for the pipeline.
///
/// Per-row problems never surface here; they are dropped by the normalizer
/// and counted. Everything in this enum aborts the run.
#[derive(Debug, Error)]
pub enum Error {
    /// Input or output I/O failure with code.
    #[error("[{code}] {path}: {message}")]
    Io {
        code: &'static str,
        path: PathBuf,
        message: String,
    },

    #[error("[CFG_001] invalid configuration: {0}")]
    Config(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Create an I/O error for a path.
    pub fn io(code: IoErrorCode, path: impl Into<PathBuf>, msg: impl ToString) -> Self {
        Self::Io {
            code: code.code(),
            path: path.into(),
            message: msg.to_string(),
        }
    }

    /// Create an input read error.
    pub fn read(path: impl Into<PathBuf>, msg: impl ToString) -> Self {
        Self::io(IoErrorCode::Read, path, msg)
    }

    /// Create an output write error.
    pub fn write(path: impl Into<PathBuf>, msg: impl ToString) -> Self {
        Self::io(IoErrorCode::Write, path, msg)
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Get the error code if this is a coded error.
    pub fn error_code(&self) -> Option<&'static str> {
        match self {
            Self::Io { code, .. } => Some(code),
            Self::Config(_) => Some("CFG_001"),
            Self::Internal(_) => None,
        }
    }
}
