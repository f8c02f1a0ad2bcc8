//! # Hearth Runtime Settings Errors
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Invalid value for runtime setting '{key}': {reason}")]
    InvalidValue { key: String, reason: String },

    #[error("Runtime settings must be a table, found {found}")]
    NotATable { found: String },
}
