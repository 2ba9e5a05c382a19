//! Error types for loading, scoring, and external lookups.

use std::path::PathBuf;

use thiserror::Error;

/// Feedback records rejected at the loading boundary.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("failed to read feedback file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("feedback document is not a JSON array of records: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{} invalid feedback record(s):\n  - {}", .0.len(), .0.join("\n  - "))]
    InvalidRecords(Vec<String>),
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum EngineError {
    #[error("no feedback supplied for product '{0}'")]
    EmptyGroup(String),

    #[error("feedback {id} belongs to '{found}', not '{expected}'")]
    ProductMismatch {
        id: i64,
        expected: String,
        found: String,
    },
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("config I/O error ({}): {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config parse error ({}): {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config validation failed:\n  - {}", .0.join("\n  - "))]
    Validation(Vec<String>),
}

#[derive(Error, Debug)]
pub enum ChiError {
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("unreadable CHI payload: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("CHI API returned HTTP {0}: {1}")]
    Api(u16, String),

    #[error("CHI API reported failure for product {0}")]
    Unsuccessful(i64),
}
