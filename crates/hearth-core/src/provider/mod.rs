//! # Hearth Service Providers
//!
//! Providers are how services get into an [`Application`]'s container. Every
//! provider has a register phase; providers that also need to wire services
//! together implement [`BootableProvider`] and expose it through
//! [`ServiceProvider::as_bootable`].
//!
//! ## Phases
//!
//! 1. **Register**: runs as soon as the provider is added. Only bind here
//!    (`set`, `alias`); do not resolve services other providers may not have
//!    declared yet.
//! 2. **Boot**: runs once, after every provider registered so far, in
//!    registration order. Resolving services is safe here.
//!
//! The [`builtin`] submodule holds the two providers every application
//! registers during init.
pub mod builtin;

use crate::kernel::bootstrap::Application;
use crate::kernel::error::Result;

/// Base provider capability.
pub trait ServiceProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Declare services in the application's container.
    fn register(&self, app: &mut Application) -> Result<()>;

    /// Capability query for the boot phase. Boot-capable providers return
    /// `Some(self)`.
    fn as_bootable(&self) -> Option<&dyn BootableProvider> {
        None
    }
}

/// Providers with a boot phase.
pub trait BootableProvider: ServiceProvider {
    fn boot(&self, app: &mut Application) -> Result<()>;
}
