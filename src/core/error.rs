//! Error types for the hard failures a session can hit.
//!
//! Invalid player commands are not errors; they are reported through
//! `FlipOutcome` and `RestrictError` in the session module.

use std::path::PathBuf;

use crate::cards::CardId;

/// Failures starting or restoring a session.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("card catalog is empty, no round can be formed")]
    EmptyCatalog,
    #[error("snapshot does not fit catalog: {0}")]
    SnapshotMismatch(String),
}

/// Failures building a card catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("card {0} is already in the catalog")]
    DuplicateId(CardId),
}

/// Failures loading a session configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Failures encoding or decoding a saved session.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("snapshot codec failed: {0}")]
    Codec(#[from] bincode::Error),
}
