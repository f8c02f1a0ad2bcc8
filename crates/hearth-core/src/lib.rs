//! # Hearth Core
//!
//! Application bootstrap layer: a service [`Container`], a two-phase provider
//! protocol ([`ServiceProvider`] / [`BootableProvider`]) and the
//! [`Application`] that runs providers and handles requests.
pub mod config;
pub mod container;
pub mod http;
pub mod kernel;
pub mod provider;
pub mod routing;
pub mod settings;

pub use config::Config;
pub use container::{Concrete, Container};
pub use http::{Request, Response};
pub use kernel::error::Error as KernelError;
pub use kernel::{Application, ExecutionContext, RequestHooks};
pub use provider::{BootableProvider, ServiceProvider};
pub use routing::{DispatchTarget, RouteTable, Router};
