//! Error types for tallymanlib

use std::path::PathBuf;
use thiserror::Error;

use crate::languages::Category;

/// Errors that can occur while building or running a tally
#[derive(Error, Debug)]
pub enum TallymanError {
    /// The analysis root is not a directory
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// Attempted to reclassify a non-docs language as specs.
    ///
    /// This is a caller bug, not bad input: only docs-category languages
    /// have a specs variant.
    #[error("cannot reclassify '{name}' ({category}) as specs: only docs languages qualify")]
    InvalidReclassification { name: String, category: Category },

    /// Failed to read a configuration file
    #[error("failed to read config '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to parse a configuration file
    #[error("failed to parse config '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Failed to write a configuration file
    #[error("failed to write config '{path}': {source}")]
    ConfigWrite {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Failed to serialize configuration to TOML
    #[error("failed to serialize config: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
