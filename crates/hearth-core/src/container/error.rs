//! # Hearth Container Errors
//!
//! Defines [`ContainerError`], the failures raised while binding or resolving
//! services. `NotFound` is the distinguished kind callers probe for; the
//! others signal a misconfigured container.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("No binding found for '{id}'")]
    NotFound { id: String },

    #[error("Alias cycle detected while resolving '{id}'. Chain: {chain:?}")]
    AliasCycle { id: String, chain: Vec<String> },

    #[error("Binding '{id}' does not hold a value of type {expected}")]
    TypeMismatch { id: String, expected: &'static str },

    #[error("Singleton cache lock poisoned while resolving '{id}'")]
    CachePoisoned { id: String },
}
