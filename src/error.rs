//! Error types for the backup and compare pipelines.
//!
//! Each pipeline stage maps to its own variant so a failure can be diagnosed
//! from the message alone, without re-running with extra instrumentation.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while resolving configuration from flags, environment and file.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required settings: {}", .0.join(", "))]
    MissingSettings(Vec<&'static str>),

    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// Failures while building one snapshot.
#[derive(Debug, Error)]
pub enum BackupError {
    #[error("failed to create backup directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The fetch capability failed; the cause is opaque to the builder and
    /// passed through unretried.
    #[error("failed to fetch playlist items: {0}")]
    Fetch(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failures while comparing the two most recent snapshots.
#[derive(Debug, Error)]
pub enum CompareError {
    #[error("failed to read backup directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("need at least two snapshots to compare, found {found}")]
    InsufficientSnapshots { found: usize },

    #[error("failed to read snapshot {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Failures from the YouTube API collaborator.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("playlist request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("playlist request rejected with status {status}: {body}")]
    Api { status: u16, body: String },

    #[error(transparent)]
    Auth(#[from] AuthError),
}

/// Failures in the OAuth token flow.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("token request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("token exchange rejected with status {status}: {body}")]
    Exchange { status: u16, body: String },

    #[error("failed to build authorization url: {0}")]
    BuildUrl(String),

    #[error("failed to read authorization code: {0}")]
    ReadCode(#[source] io::Error),

    #[error("failed to persist token {path}: {source}")]
    StoreToken {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
