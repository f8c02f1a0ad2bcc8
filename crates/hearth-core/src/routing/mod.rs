//! # Hearth Routing Seam
//!
//! The kernel does not match routes itself. It resolves a [`Router`] from the
//! container under [`ROUTER_ID`](crate::kernel::constants::ROUTER_ID), asks it
//! for a [`DispatchTarget`], and dispatches that target.
//!
//! A router signals "nothing matched" with
//! [`RoutingError::RouteNotFound`](error::RoutingError::RouteNotFound); the
//! kernel turns that one failure into a fallback response.
//!
//! [`RouteTable`](table::RouteTable) is the exact-match router bound by the
//! standard services provider.
pub mod error;
pub mod table;

use std::sync::Arc;

use crate::http::{Request, Response};
use crate::kernel::error::Result;

pub use error::RoutingError;
pub use table::RouteTable;

/// The outcome of a successful route: something that can produce a response.
pub trait DispatchTarget: Send + Sync {
    /// Short label used in logs and hooks, e.g. `GET /health`.
    fn describe(&self) -> String;

    fn dispatch(&self) -> Result<Response>;
}

/// Maps a request to a dispatch target.
pub trait Router: Send + Sync {
    fn route(&self, request: &Request) -> Result<Box<dyn DispatchTarget>>;
}

/// How a router is stored in the container.
pub type SharedRouter = Arc<dyn Router>;
