//! Configuration handling for wpfcheck.
//!
//! Configuration lives in `wpfcheck.toml` at the workspace root:
//!
//! ```toml
//! [wpfcheck]
//! disabled = ["WPF0003"]
//! exclude = ["generated/**", "**/*.g.cs"]
//! format = "json"
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use globset::{Glob, GlobSet, GlobSetBuilder};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::output::OutputFormat;

/// Name of the configuration file looked up in the workspace root.
pub const CONFIG_FILE_NAME: &str = "wpfcheck.toml";

/// Directories that are never analyzed.
pub const DEFAULT_EXCLUDES: &[&str] = &["**/bin/**", "**/obj/**", "**/.git/**", "**/.vs/**"];

/// Errors that can occur while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("invalid configuration in {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// An exclusion glob is malformed.
    #[error("invalid exclude pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// Top-level configuration file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// wpfcheck settings.
    #[serde(default)]
    pub wpfcheck: CheckConfig,
}

/// Core wpfcheck settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct CheckConfig {
    /// Check ids that are not reported.
    #[serde(default)]
    pub disabled: Vec<String>,

    /// Workspace-relative globs excluded from analysis, in addition to
    /// [`DEFAULT_EXCLUDES`].
    #[serde(default)]
    pub exclude: Vec<String>,

    /// Default output format.
    #[serde(default)]
    pub format: Option<OutputFormat>,
}

impl Config {
    /// Load configuration from an explicit file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content, path)
    }

    /// Parse configuration text. `path` is only used for error messages.
    pub fn parse(content: &str, path: &Path) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Load `wpfcheck.toml` from `root` if present, otherwise defaults.
    pub fn discover(root: &Path) -> Result<Self, ConfigError> {
        let candidate = root.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!("loading configuration from {}", candidate.display());
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    /// Whether the check with `id` is disabled (case-insensitive).
    pub fn is_disabled(&self, id: &str) -> bool {
        self.wpfcheck
            .disabled
            .iter()
            .any(|d| d.eq_ignore_ascii_case(id))
    }

    /// Build the exclusion matcher: default exclusions plus configured globs.
    pub fn exclude_matcher(&self) -> Result<GlobSet, ConfigError> {
        let mut builder = GlobSetBuilder::new();
        let patterns = DEFAULT_EXCLUDES
            .iter()
            .map(|p| p.to_string())
            .chain(self.wpfcheck.exclude.iter().cloned());
        for pattern in patterns {
            let glob = Glob::new(&pattern).map_err(|e| ConfigError::InvalidPattern {
                pattern: pattern.clone(),
                reason: e.to_string(),
            })?;
            builder.add(glob);
        }
        builder.build().map_err(|e| ConfigError::InvalidPattern {
            pattern: self.wpfcheck.exclude.join(", "),
            reason: e.to_string(),
        })
    }
}
