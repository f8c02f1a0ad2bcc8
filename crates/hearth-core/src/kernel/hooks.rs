//! Extension points around request handling.
//!
//! A hook that returns `Ok(Some(response))` short-circuits the rest of
//! [`Application::handle`](crate::kernel::Application::handle):
//!
//! - `before_handle` runs after boot and before routing. A response here skips
//!   routing, dispatch and `after_handle`.
//! - `after_route` runs once a route matched. A response here skips dispatch
//!   and `after_handle`.
//! - `after_handle` runs on the dispatched response and on the not-found
//!   fallback. Its only effect is side effects; an error still propagates.
use crate::http::{Request, Response};
use crate::kernel::bootstrap::Application;
use crate::kernel::error::Result;
use crate::routing::DispatchTarget;

pub trait RequestHooks: Send + Sync {
    fn before_handle(&self, _app: &Application, _request: &Request) -> Result<Option<Response>> {
        Ok(None)
    }

    fn after_route(
        &self,
        _app: &Application,
        _request: &Request,
        _target: &dyn DispatchTarget,
    ) -> Result<Option<Response>> {
        Ok(None)
    }

    fn after_handle(
        &self,
        _app: &Application,
        _request: &Request,
        _response: &Response,
    ) -> Result<()> {
        Ok(())
    }
}

/// Hooks that never intervene.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoHooks;

impl RequestHooks for NoHooks {}
