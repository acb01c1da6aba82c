//! Error types for the journal.
//!
//! Most of these never reach the user: the store and the insight client
//! degrade to empty results after logging. They exist so the failure is
//! typed up to the point where it is swallowed.

use std::path::PathBuf;

use thiserror::Error;

/// Failures of the local key-value store.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failures of a single insight request.
#[derive(Error, Debug)]
pub enum InsightError {
    #[error("No entries to analyze")]
    NoEntries,

    #[error("No API key configured")]
    MissingApiKey,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Response contained no text candidate")]
    EmptyResponse,

    #[error("Malformed insight JSON: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Failures while turning an image file into a data URI.
#[derive(Error, Debug)]
pub enum PhotoError {
    #[error("Could not read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not an image ({mime})")]
    NotAnImage { path: PathBuf, mime: String },
}

/// Failures while loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Could not read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Could not determine a data directory")]
    NoDataDir,
}
