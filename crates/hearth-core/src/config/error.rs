//! # Hearth Config Errors
//!
//! Failures raised while loading a configuration file or writing into the
//! configuration tree.
use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error reading config '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unknown or unsupported config format for path: {path}")]
    UnsupportedFormat { path: PathBuf },

    #[error("Failed to parse {format} config: {message}")]
    Parse { format: &'static str, message: String },

    #[error("Config root must be a table/object, found {found}")]
    NotAnObject { found: String },

    #[error("Cannot set '{key}': segment '{segment}' is not a table")]
    NotATable { key: String, segment: String },
}
