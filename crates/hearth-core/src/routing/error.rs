//! # Hearth Routing Errors
//!
//! [`RoutingError::RouteNotFound`] is the one failure the kernel recovers
//! from while handling a request; everything else propagates.
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RoutingError {
    #[error("No route matches {method} {path}")]
    RouteNotFound { method: String, path: String },

    #[error("Route {method} {path} is already registered")]
    DuplicateRoute { method: String, path: String },
}
