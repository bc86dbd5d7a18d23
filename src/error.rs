//! Error types for the schema compiler

use std::path::PathBuf;
use thiserror::Error;

use crate::analysis::Diagnostics;

/// Result type for compiler operations
pub type Result<T> = std::result::Result<T, ForgeError>;

/// Compiler errors.
///
/// Schema problems are not errors of this type: they are collected as
/// [`Diagnostics`] and only surface here when a caller demands a clean build.
#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid declaration graph in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(#[from] config_crate::ConfigError),

    #[error("Schema analysis failed with {} error(s)", .0.error_count())]
    Analysis(Diagnostics),

    #[error("Generated file is out of date: {file}")]
    Drift { file: PathBuf },
}
