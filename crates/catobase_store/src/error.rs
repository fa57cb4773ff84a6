//! Error types for the Catobase store

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Catobase error type
#[derive(Error, Debug)]
pub enum CatobaseError {
    #[error("Category listing already exists: {}", .0.display())]
    AlreadyExists(PathBuf),

    #[error("Category listing not found: {}", .0.display())]
    ListingNotFound(PathBuf),

    #[error("File not found: {}", .0.display())]
    SubjectNotFound(PathBuf),

    #[error("Registry not found: {}", .0.display())]
    RegistryNotFound(PathBuf),

    #[error("some categories do not exist: {}", .missing.join(","))]
    InvalidCategories { missing: Vec<String> },

    #[error("Invalid label '{label}': {reason}")]
    InvalidLabel { label: String, reason: &'static str },

    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Config error: {0}")]
    Config(String),
}

impl CatobaseError {
    /// Wrap an I/O error with a short description of the failed operation.
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        CatobaseError::Io {
            context: context.into(),
            source,
        }
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, CatobaseError>;
