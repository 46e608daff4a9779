//! Error types for spec generation and conversion

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for spec operations
pub type Result<T> = std::result::Result<T, SpecError>;

/// Errors that can occur while building, converting or storing a spec
#[derive(Error, Debug)]
pub enum SpecError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spec has no linux section")]
    MissingLinux,

    #[error("Invalid spec: {0}")]
    InvalidSpec(String),

    #[error("File {} exists. Remove it first", .0.display())]
    ConfigExists(PathBuf),

    #[error("No config.json in bundle {}", .0.display())]
    BundleNotFound(PathBuf),
}
