//! Error types for loading and querying result stores and configuration.
//!
//! Malformed violation data is never an error: the aggregator degrades it to
//! empty or `"unknown"` values. Only failures of the store itself (unreadable
//! exports, broken JSON, backend query failures) and explicitly requested
//! configuration files surface here.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by a [`ResultStore`](crate::store::ResultStore).
#[derive(Debug, Error)]
pub enum StoreError {
    /// The export file could not be read
    #[error("Failed to read result export {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The export was not valid JSON (or JSON Lines)
    #[error("Failed to parse result export {}{}: {source}", .path.display(), line_suffix(.line))]
    Parse {
        path: PathBuf,
        line: Option<usize>,
        #[source]
        source: serde_json::Error,
    },

    /// The export parsed but does not contain result records
    #[error("Invalid result export {}: {message}", .path.display())]
    InvalidFormat { path: PathBuf, message: String },

    /// A store backend failed to answer a query
    #[error("Query failed: {message}")]
    Query { message: String },
}

impl StoreError {
    /// Create a query error for store backends
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query {
            message: message.into(),
        }
    }

    /// Create an invalid-format error with path context
    pub fn invalid_format(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            path: path.into(),
            message: message.into(),
        }
    }
}

fn line_suffix(line: &Option<usize>) -> String {
    line.map(|l| format!(" (line {l})")).unwrap_or_default()
}

/// Errors raised while loading an explicitly requested configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}
