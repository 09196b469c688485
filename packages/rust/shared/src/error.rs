//! Error types for Course Summary.
//!
//! Library crates use [`CourseSummaryError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all Course Summary operations.
#[derive(Debug, thiserror::Error)]
pub enum CourseSummaryError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Network/HTTP error while talking to the summarization service.
    #[error("network error: {0}")]
    Network(String),

    /// HTML or selector parsing error.
    #[error("parse error: {message}")]
    Parse { message: String },

    /// The summarization service rejected the request or answered with
    /// something we cannot use.
    #[error("{0}")]
    Summarization(String),

    /// Filesystem I/O error.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Data validation error.
    #[error("validation error: {message}")]
    Validation { message: String },

    /// Extraction found no text at all; there is nothing to summarize.
    #[error("no course content found")]
    EmptyContent,

    /// An embedded frame could not be read (cross-origin or otherwise).
    #[error("frame access denied: {src}")]
    FrameAccessDenied { src: String },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, CourseSummaryError>;

impl CourseSummaryError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Create a parse error from any displayable message.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse {
            message: msg.into(),
        }
    }

    /// Create a validation error from any displayable message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation {
            message: msg.into(),
        }
    }

    /// Create a frame-access error for the given frame source.
    pub fn frame_denied(src: impl Into<String>) -> Self {
        Self::FrameAccessDenied { src: src.into() }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
