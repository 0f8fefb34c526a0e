//! Error types for parameter, state and preset operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors from the parameter collaborator.
#[derive(Debug, Error)]
pub enum ParamsError {
    /// Failed to read a file
    #[error("failed to read file '{path}': {source}")]
    ReadFile {
        /// Path of the file that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a file
    #[error("failed to write file '{path}': {source}")]
    WriteFile {
        /// Path of the file that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to create directory
    #[error("failed to create directory '{path}': {source}")]
    CreateDir {
        /// Path of the directory that could not be created.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse TOML
    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    /// Failed to serialize TOML
    #[error("failed to serialize TOML: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// State blob is not valid JSON
    #[error("invalid state JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// State blob parsed but has the wrong shape
    #[error("invalid state: {0}")]
    InvalidState(String),

    /// Layout slot count out of range
    #[error("invalid slot count {count} (expected 1..={max})")]
    InvalidSlotCount {
        /// Requested slot count.
        count: usize,
        /// Largest supported slot count.
        max: usize,
    },
}

impl ParamsError {
    /// Create a read file error.
    pub fn read_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ParamsError::ReadFile {
            path: path.into(),
            source,
        }
    }

    /// Create a write file error.
    pub fn write_file(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ParamsError::WriteFile {
            path: path.into(),
            source,
        }
    }

    /// Create a create directory error.
    pub fn create_dir(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ParamsError::CreateDir {
            path: path.into(),
            source,
        }
    }
}
