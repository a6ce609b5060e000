//! Typed errors for the fatal failure paths.
//!
//! Malformed reports are never errors; the scanner degrades them to
//! zero statistics instead.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrendsError {
    /// A root or month directory could not be opened.
    #[error("cannot read directory {path}: {source}")]
    DirectoryUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// An output file could not be written.
    #[error("cannot write {path}: {source}")]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A configured matcher cannot be compiled.
    #[error("invalid matcher {name:?}: {reason}")]
    InvalidMatcher { name: String, reason: String },
}

impl TrendsError {
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryUnreadable {
            path: path.into(),
            source,
        }
    }

    pub fn unwritable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::OutputUnwritable {
            path: path.into(),
            source,
        }
    }
}
