//! # Hearth Kernel Errors
//!
//! Defines the kernel-wide [`Error`] enum and its `Result` alias.
//!
//! Every subsystem keeps its own typed error (container, routing,
//! configuration, runtime settings) and converts into [`Error`] through
//! `#[from]` variants. Provider failures are wrapped with the lifecycle phase
//! they happened in.
use std::result::Result as StdResult;

use thiserror::Error as ThisError;

use crate::config::error::ConfigError;
use crate::container::error::ContainerError;
use crate::routing::error::RoutingError;
use crate::settings::error::SettingsError;

/// Custom error type for Hearth applications
#[derive(Debug, ThisError)]
pub enum Error {
    /// Binding or resolution failure in the service container
    #[error("Container error: {0}")]
    Container(#[from] ContainerError),

    /// Routing failure, including the recoverable route miss
    #[error("Routing error: {0}")]
    Routing(#[from] RoutingError),

    /// Configuration loading or lookup failure
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Runtime settings could not be applied
    #[error("Settings error: {0}")]
    Settings(#[from] SettingsError),

    /// Error occurring while a provider runs one of its lifecycle phases.
    #[error("Kernel lifecycle error during {phase} of provider '{provider}': {message}")]
    KernelLifecycleError {
        phase: KernelLifecyclePhase,
        provider: String,
        message: String,
        #[source]
        source: Option<Box<Error>>,
    },

    /// Generic error with message
    #[error("Error: {0}")]
    Other(String),
}

/// Represents a specific phase in the kernel's lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ThisError)]
pub enum KernelLifecyclePhase {
    #[error("Init")]
    Init,
    #[error("Register")]
    Register,
    #[error("Boot")]
    Boot,
}

/// Shorthand for Result with our Error type
pub type Result<T> = StdResult<T, Error>;

impl Error {
    /// Wrap a provider failure with the phase it happened in.
    pub fn lifecycle(
        phase: KernelLifecyclePhase,
        provider: impl Into<String>,
        source: Error,
    ) -> Self {
        Error::KernelLifecycleError {
            phase,
            provider: provider.into(),
            message: source.to_string(),
            source: Some(Box::new(source)),
        }
    }

    /// Whether this error, or one it wraps, is a container `NotFound`.
    pub fn is_not_found(&self) -> bool {
        match self {
            Error::Container(ContainerError::NotFound { .. }) => true,
            Error::KernelLifecycleError { source: Some(inner), .. } => inner.is_not_found(),
            _ => false,
        }
    }

    /// Whether this error is the router's "no matching route" signal.
    pub fn is_route_not_found(&self) -> bool {
        matches!(self, Error::Routing(RoutingError::RouteNotFound { .. }))
    }
}

impl From<&str> for Error {
    fn from(msg: &str) -> Self {
        Error::Other(msg.to_string())
    }
}

impl From<String> for Error {
    fn from(msg: String) -> Self {
        Error::Other(msg)
    }
}
