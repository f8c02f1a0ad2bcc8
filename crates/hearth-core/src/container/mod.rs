//! # Hearth Service Container
//!
//! The `container` module maps string identifiers to services. It is the
//! registry every provider writes into during registration and every request
//! reads from while it is being handled.
//!
//! ## Binding kinds
//!
//! - **Values**: an already-built instance, returned as-is on every lookup.
//! - **Singleton factories**: invoked on first lookup; the result is cached and
//!   returned for every later lookup.
//! - **Transient factories**: invoked on every lookup.
//! - **Aliases**: an identifier that forwards to another identifier.
//!
//! Identifiers are plain strings. Type-keyed bindings use
//! [`Container::key_of`], which yields the Rust type name of `T`.
//!
//! Lookups of unknown identifiers fail with
//! [`ContainerError::NotFound`](error::ContainerError::NotFound); use
//! [`Container::has`] to probe without failing.
pub mod error;

use std::any::{Any, type_name};
use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::{Arc, Mutex};

use crate::kernel::error::Result;
pub use error::ContainerError;

/// A resolved service instance as stored in the container.
pub type Instance = Arc<dyn Any + Send + Sync>;

/// A factory producing a service instance. Factories receive the container so
/// they can resolve their own dependencies.
pub type Factory = Arc<dyn Fn(&Container) -> Result<Instance> + Send + Sync>;

/// What a binding produces: a ready value or a factory to invoke.
#[derive(Clone)]
pub enum Concrete {
    Value(Instance),
    Factory(Factory),
}

impl Concrete {
    /// Wrap an owned value.
    pub fn value<T: Any + Send + Sync>(value: T) -> Self {
        Concrete::Value(Arc::new(value))
    }

    /// Wrap a typed factory closure.
    pub fn factory<T, F>(factory: F) -> Self
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        let factory: Factory = Arc::new(move |container: &Container| {
            factory(container).map(|v| Arc::new(v) as Instance)
        });
        Concrete::Factory(factory)
    }
}

impl fmt::Debug for Concrete {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Concrete::Value(_) => f.write_str("Concrete::Value(..)"),
            Concrete::Factory(_) => f.write_str("Concrete::Factory(..)"),
        }
    }
}

#[derive(Clone)]
struct Binding {
    concrete: Concrete,
    singleton: bool,
}

/// Identifier-keyed service registry with alias forwarding and a lazily
/// populated singleton cache.
#[derive(Default)]
pub struct Container {
    bindings: HashMap<String, Binding>,
    aliases: HashMap<String, String>,
    // Keyed by the alias-resolved identifier so aliases share one instance.
    instances: Mutex<HashMap<String, Instance>>,
}

impl Container {
    /// Create an empty container.
    pub fn new() -> Self {
        Self::default()
    }

    /// Identifier used for type-keyed bindings of `T`.
    pub fn key_of<T: ?Sized + 'static>() -> &'static str {
        type_name::<T>()
    }

    /// Register a binding for `id`, replacing any binding or alias already
    /// registered under it. `singleton` only matters for factories.
    pub fn set(&mut self, id: impl Into<String>, concrete: Concrete, singleton: bool) {
        let id = id.into();
        log::debug!("Binding '{}' ({:?}, singleton: {})", id, concrete, singleton);
        self.aliases.remove(&id);
        self.drop_cached(&id);
        self.bindings.insert(id, Binding { concrete, singleton });
    }

    /// Bind an owned value.
    pub fn set_value<T: Any + Send + Sync>(&mut self, id: impl Into<String>, value: T) {
        self.set(id, Concrete::value(value), true);
    }

    /// Bind a factory whose first result is cached.
    pub fn set_factory<T, F>(&mut self, id: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.set(id, Concrete::factory(factory), true);
    }

    /// Bind a factory that runs on every lookup.
    pub fn set_transient<T, F>(&mut self, id: impl Into<String>, factory: F)
    where
        T: Any + Send + Sync,
        F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
    {
        self.set(id, Concrete::factory(factory), false);
    }

    /// Make `alias` forward to `target`. The target does not have to be bound
    /// yet. Any direct binding under `alias` is replaced.
    pub fn alias(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        let alias = alias.into();
        let target = target.into();
        log::debug!("Aliasing '{}' -> '{}'", alias, target);
        self.bindings.remove(&alias);
        self.drop_cached(&alias);
        self.aliases.insert(alias, target);
    }

    /// Whether `id` resolves to a binding. Never fails; an alias cycle counts
    /// as unbound.
    pub fn has(&self, id: &str) -> bool {
        match self.canonical(id) {
            Ok(key) => self.bindings.contains_key(key),
            Err(_) => false,
        }
    }

    /// Resolve `id` to its instance.
    pub fn get(&self, id: &str) -> Result<Instance> {
        let key = self.canonical(id)?;
        let binding = self
            .bindings
            .get(key)
            .ok_or_else(|| ContainerError::NotFound { id: id.to_string() })?;

        match (&binding.concrete, binding.singleton) {
            (Concrete::Value(value), _) => Ok(Arc::clone(value)),
            (Concrete::Factory(factory), false) => factory(self),
            (Concrete::Factory(factory), true) => {
                if let Some(cached) = self.cached(key)? {
                    return Ok(cached);
                }
                // The lock is released while the factory runs so it can
                // resolve its own dependencies.
                let instance = factory(self)?;
                let mut instances = self
                    .instances
                    .lock()
                    .map_err(|_| ContainerError::CachePoisoned { id: key.to_string() })?;
                Ok(Arc::clone(instances.entry(key.to_string()).or_insert(instance)))
            }
        }
    }

    /// Resolve `id` and downcast it to `T`.
    pub fn make<T: Any + Send + Sync>(&self, id: &str) -> Result<Arc<T>> {
        self.get(id)?.downcast::<T>().map_err(|_| {
            ContainerError::TypeMismatch {
                id: id.to_string(),
                expected: type_name::<T>(),
            }
            .into()
        })
    }

    /// Remove the binding or alias registered under `id` along with any cached
    /// instance. Returns whether anything was removed.
    pub fn forget(&mut self, id: &str) -> bool {
        self.drop_cached(id);
        let had_binding = self.bindings.remove(id).is_some();
        let had_alias = self.aliases.remove(id).is_some();
        had_binding || had_alias
    }

    /// Whether a singleton instance for `id` has already been built.
    pub fn is_resolved(&self, id: &str) -> bool {
        match self.canonical(id) {
            Ok(key) => self.cached(key).ok().flatten().is_some(),
            Err(_) => false,
        }
    }

    /// All bound identifiers, aliases included, in sorted order.
    pub fn ids(&self) -> Vec<String> {
        self.bindings
            .keys()
            .chain(self.aliases.keys())
            .cloned()
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Follow the alias chain starting at `id` to the identifier that holds
    /// the actual binding (or would, if it existed).
    fn canonical<'a>(&'a self, id: &'a str) -> std::result::Result<&'a str, ContainerError> {
        let mut current = id;
        let mut chain: Vec<&str> = Vec::new();
        while let Some(target) = self.aliases.get(current) {
            chain.push(current);
            if chain.contains(&target.as_str()) {
                let mut chain: Vec<String> = chain.into_iter().map(str::to_string).collect();
                chain.push(target.clone());
                return Err(ContainerError::AliasCycle { id: id.to_string(), chain });
            }
            current = target.as_str();
        }
        Ok(current)
    }

    fn cached(&self, key: &str) -> std::result::Result<Option<Instance>, ContainerError> {
        let instances = self
            .instances
            .lock()
            .map_err(|_| ContainerError::CachePoisoned { id: key.to_string() })?;
        Ok(instances.get(key).cloned())
    }

    fn drop_cached(&mut self, id: &str) {
        // `&mut self` rules out other lockers; a poisoned cache is still ours to clear.
        let instances = match self.instances.get_mut() {
            Ok(instances) => instances,
            Err(poisoned) => poisoned.into_inner(),
        };
        instances.remove(id);
    }
}

impl fmt::Debug for Container {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Container")
            .field("ids", &self.ids())
            .finish()
    }
}
