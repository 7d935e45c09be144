//! wpfcheck: WPF dependency-property checks for C# source.
//!
//! The analysis itself lives in the workspace crates:
//! - `wpfcheck-core`: errors, cancellation, locations, output, configuration
//! - `wpfcheck-syntax`: tree-sitter parsing into an owned syntax model
//! - `wpfcheck-analysis`: semantic model, walkers and resolvers
//!
//! This crate hosts them for files on disk: [`files`] collects sources,
//! [`checks`] turns resolver results into findings, and [`cli`] runs whole
//! commands for the `wpfcheck` binary.

pub use wpfcheck_core::config;
pub use wpfcheck_core::error;
pub use wpfcheck_core::output;

pub mod checks;
pub mod cli;
pub mod files;

pub use checks::{CheckId, Checker};
pub use cli::{parse_sources, run_check, run_registrations, RunOptions};
