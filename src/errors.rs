// SPDX-License-Identifier: GPL-3.0-only

//! Error types for the tracker
//!
//! The per-frame pipeline itself never fails: a missing frame or an empty
//! foreground simply leaves the outputs unchanged or empty. Errors only come
//! from the surfaces around it (opening recordings, loading configuration,
//! writing exports).

use std::fmt;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Main application error type
#[derive(Debug, Clone)]
pub enum AppError {
    /// Depth source errors
    Source(SourceError),
    /// Configuration errors
    Config(String),
    /// Mesh or diagnostic export errors
    Export(String),
    /// Storage/filesystem errors
    Storage(String),
    /// Generic error with message
    Other(String),
}

/// Depth source errors
#[derive(Debug, Clone)]
pub enum SourceError {
    /// Recording could not be opened
    OpenFailed(String),
    /// File is not a depth recording
    InvalidHeader(String),
    /// Frame dimensions do not match the source
    DimensionMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },
    /// Reading frame data failed
    ReadFailed(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Source(e) => write!(f, "Depth source error: {}", e),
            AppError::Config(msg) => write!(f, "Configuration error: {}", msg),
            AppError::Export(msg) => write!(f, "Export error: {}", msg),
            AppError::Storage(msg) => write!(f, "Storage error: {}", msg),
            AppError::Other(msg) => write!(f, "{}", msg),
        }
    }
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceError::OpenFailed(msg) => write!(f, "Failed to open recording: {}", msg),
            SourceError::InvalidHeader(msg) => write!(f, "Invalid recording header: {}", msg),
            SourceError::DimensionMismatch { expected, actual } => write!(
                f,
                "Frame is {}x{}, expected {}x{}",
                actual.0, actual.1, expected.0, expected.1
            ),
            SourceError::ReadFailed(msg) => write!(f, "Failed to read frame: {}", msg),
        }
    }
}

impl std::error::Error for AppError {}
impl std::error::Error for SourceError {}

impl From<SourceError> for AppError {
    fn from(err: SourceError) -> Self {
        AppError::Source(err)
    }
}

impl From<String> for AppError {
    fn from(msg: String) -> Self {
        AppError::Other(msg)
    }
}

impl From<&str> for AppError {
    fn from(msg: &str) -> Self {
        AppError::Other(msg.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<std::io::Error> for SourceError {
    fn from(err: std::io::Error) -> Self {
        SourceError::ReadFailed(err.to_string())
    }
}
