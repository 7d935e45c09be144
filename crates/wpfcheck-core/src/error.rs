//! Error types and error code constants for wpfcheck.
//!
//! This module provides a unified error type (`CheckError`) that bridges
//! domain-specific errors from the subsystems (configuration, file
//! collection, parsing) into a common format suitable for JSON output.
//!
//! ## Error Code Mapping
//!
//! Exit codes:
//! - `2`: Invalid arguments (bad input from caller)
//! - `3`: Resolution errors (file not found, unreadable input)
//! - `5`: Findings reported (analysis completed and found violations)
//! - `10`: Internal errors (bugs, unexpected state)
//!
//! Analysis itself never fails on unrecognized code: the core reports
//! "not found" for shapes it does not understand. Only host-level problems
//! surface here.

use std::fmt;

use thiserror::Error;

use crate::cancel::Cancelled;
use crate::config::ConfigError;

// ============================================================================
// Output Error Codes
// ============================================================================

/// Error codes for JSON output and process exit status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum OutputErrorCode {
    /// Invalid arguments from caller (bad input, malformed configuration).
    InvalidArguments = 2,
    /// Resolution errors (file not found, unreadable input).
    ResolutionError = 3,
    /// Analysis finished and reported findings.
    FindingsReported = 5,
    /// Internal errors (bugs, unexpected state, cancelled runs).
    InternalError = 10,
}

impl OutputErrorCode {
    /// Get the numeric code value.
    pub fn code(&self) -> u8 {
        *self as u8
    }
}

impl fmt::Display for OutputErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ============================================================================
// Unified Error Type
// ============================================================================

/// Unified error type for CLI output.
#[derive(Debug, Error)]
pub enum CheckError {
    /// Invalid arguments from caller.
    #[error("invalid arguments: {message}")]
    InvalidArguments { message: String },

    /// Configuration file could not be loaded.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound { path: String },

    /// A source file could not be parsed at all.
    #[error("parse error in {path}: {message}")]
    Parse { path: String, message: String },

    /// The run was cancelled before completion.
    #[error("analysis cancelled")]
    Cancelled,

    /// Internal error (bug or unexpected state).
    #[error("internal error: {message}")]
    InternalError { message: String },
}

// ============================================================================
// Error Code Mapping
// ============================================================================

impl From<&CheckError> for OutputErrorCode {
    fn from(err: &CheckError) -> Self {
        match err {
            CheckError::InvalidArguments { .. } => OutputErrorCode::InvalidArguments,
            CheckError::Config(_) => OutputErrorCode::InvalidArguments,
            CheckError::FileNotFound { .. } => OutputErrorCode::ResolutionError,
            CheckError::Parse { .. } => OutputErrorCode::ResolutionError,
            CheckError::Cancelled => OutputErrorCode::InternalError,
            CheckError::InternalError { .. } => OutputErrorCode::InternalError,
        }
    }
}

impl From<Cancelled> for CheckError {
    fn from(_: Cancelled) -> Self {
        CheckError::Cancelled
    }
}

// ============================================================================
// Convenience Constructors
// ============================================================================

impl CheckError {
    /// Create an invalid arguments error.
    pub fn invalid_args(message: impl Into<String>) -> Self {
        CheckError::InvalidArguments {
            message: message.into(),
        }
    }

    /// Create a file not found error.
    pub fn file_not_found(path: impl Into<String>) -> Self {
        CheckError::FileNotFound { path: path.into() }
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        CheckError::InternalError {
            message: message.into(),
        }
    }

    /// Get the error code for this error.
    pub fn error_code(&self) -> OutputErrorCode {
        OutputErrorCode::from(self)
    }
}
