//! Core infrastructure for wpfcheck.
//!
//! This crate provides language-agnostic infrastructure shared by the
//! syntax, analysis, and front-end crates:
//! - Error types and exit codes
//! - Cooperative cancellation
//! - Spans, locations, and text position conversion
//! - JSON output types for CLI responses
//! - Configuration file loading

pub mod cancel;
pub mod config;
pub mod error;
pub mod output;
pub mod text;
pub mod types;

pub use cancel::{CancellationToken, Cancelled};
pub use types::{Location, Span};
