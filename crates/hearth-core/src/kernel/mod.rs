//! # Hearth Kernel
//!
//! The `kernel` module coordinates an application's lifecycle. It owns the
//! service container, runs providers through their register and boot phases,
//! and drives each request through routing and dispatch.
//!
//! ## Key Responsibilities & Components:
//!
//! - **Application Lifecycle**: [`Application`](bootstrap::Application) in the
//!   `bootstrap` submodule applies runtime settings, registers the built-in
//!   providers, boots providers once, and handles requests.
//! - **Request Hooks**: [`RequestHooks`](hooks::RequestHooks) lets hosts
//!   short-circuit or observe request handling.
//! - **Core Constants**: well-known container ids, config keys and the
//!   fallback response live in `constants`.
//! - **Error Handling**: the kernel [`Error`](error::Error) aggregates every
//!   subsystem error; `Result` is the matching alias.
pub mod bootstrap;
pub mod constants;
pub mod error;
pub mod hooks;

pub use bootstrap::{AppState, Application, ExecutionContext};
pub use error::{Error, KernelLifecyclePhase, Result};
pub use hooks::{NoHooks, RequestHooks};

#[cfg(test)]
mod tests;
