use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::http::{Request, Response};
use crate::kernel::error::Result;
use crate::routing::error::RoutingError;
use crate::routing::{DispatchTarget, Router};

/// A route handler.
pub type Handler = Arc<dyn Fn(&Request) -> Result<Response> + Send + Sync>;

/// Exact-match router keyed by method and path.
///
/// Paths are compared after trimming a trailing `/` (the root path `/` is kept
/// as is). Methods are compared uppercased.
#[derive(Clone, Default)]
pub struct RouteTable {
    routes: BTreeMap<(String, String), Handler>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler. Fails if the method and path are already taken.
    pub fn add<F>(&mut self, method: &str, path: &str, handler: F) -> Result<()>
    where
        F: Fn(&Request) -> Result<Response> + Send + Sync + 'static,
    {
        let key = (method.to_uppercase(), normalize(path));
        if self.routes.contains_key(&key) {
            return Err(RoutingError::DuplicateRoute {
                method: key.0,
                path: key.1,
            }
            .into());
        }
        log::debug!("Adding route {} {}", key.0, key.1);
        self.routes.insert(key, Arc::new(handler));
        Ok(())
    }

    /// Registered `(method, path)` pairs in sorted order.
    pub fn routes(&self) -> Vec<(String, String)> {
        self.routes.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes())
            .finish()
    }
}

impl Router for RouteTable {
    fn route(&self, request: &Request) -> Result<Box<dyn DispatchTarget>> {
        let method = request.method.to_uppercase();
        let path = normalize(&request.path);
        match self.routes.get(&(method.clone(), path.clone())) {
            Some(handler) => Ok(Box::new(MatchedRoute {
                method,
                path,
                handler: Arc::clone(handler),
                request: request.clone(),
            })),
            None => Err(RoutingError::RouteNotFound { method, path }.into()),
        }
    }
}

/// A handler paired with the request it matched.
pub struct MatchedRoute {
    method: String,
    path: String,
    handler: Handler,
    request: Request,
}

impl DispatchTarget for MatchedRoute {
    fn describe(&self) -> String {
        format!("{} {}", self.method, self.path)
    }

    fn dispatch(&self) -> Result<Response> {
        (self.handler)(&self.request)
    }
}

fn normalize(path: &str) -> String {
    // Query strings never take part in matching.
    let path = path.split('?').next().unwrap_or_default();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
