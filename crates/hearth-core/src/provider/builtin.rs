//! Providers registered by every [`Application`] during init, before any
//! application-specific provider.
use std::sync::Once;

use crate::container::Container;
use crate::http::Response;
use crate::kernel::bootstrap::Application;
use crate::kernel::constants;
use crate::kernel::error::{Error, Result};
use crate::provider::{BootableProvider, ServiceProvider};
use crate::routing::RouteTable;

/// Converts failures that escaped request handling into 500 responses.
#[derive(Debug, Clone, Default)]
pub struct ErrorHandler {
    debug: bool,
}

impl ErrorHandler {
    pub fn new(debug: bool) -> Self {
        Self { debug }
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Log `error` and build the response shown to the client. The error text
    /// is only exposed in debug mode.
    pub fn render(&self, error: &Error) -> Response {
        log::error!("Unhandled error: {}", error);
        let body = if self.debug {
            format!("Internal Server Error: {}", error)
        } else {
            "Internal Server Error".to_string()
        };
        Response::new(500, body)
    }
}

/// Binds the [`ErrorHandler`] and, when `app.panic_hook` is set, installs a
/// panic hook that reports panics through `log` at boot.
#[derive(Debug, Default, Clone, Copy)]
pub struct ErrorHandlerProvider;

impl ServiceProvider for ErrorHandlerProvider {
    fn name(&self) -> &'static str {
        "error-handler"
    }

    fn register(&self, app: &mut Application) -> Result<()> {
        let debug = app.config().get_or(constants::DEBUG_CONFIG_KEY, false);
        let container = app.container_mut();
        container.set_value(constants::ERROR_HANDLER_ID, ErrorHandler::new(debug));
        container.alias(Container::key_of::<ErrorHandler>(), constants::ERROR_HANDLER_ID);
        Ok(())
    }

    fn as_bootable(&self) -> Option<&dyn BootableProvider> {
        Some(self)
    }
}

impl BootableProvider for ErrorHandlerProvider {
    fn boot(&self, app: &mut Application) -> Result<()> {
        if app.config().get_or(constants::PANIC_HOOK_CONFIG_KEY, false) {
            install_panic_hook();
        }
        Ok(())
    }
}

fn install_panic_hook() {
    static INSTALLED: Once = Once::new();
    INSTALLED.call_once(|| {
        let previous = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            log::error!("Panic: {}", info);
            previous(info);
        }));
        log::debug!("Panic hook installed");
    });
}

/// Binds the services every application relies on: configuration,
/// environment label, applied runtime settings and an empty default router.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardServicesProvider;

impl ServiceProvider for StandardServicesProvider {
    fn name(&self) -> &'static str {
        "standard-services"
    }

    fn register(&self, app: &mut Application) -> Result<()> {
        let config = app.config().clone();
        let environment = app.environment().to_string();
        let settings = app.settings().clone();

        let container = app.container_mut();
        container.set_value(constants::CONFIG_ID, config);
        container.alias(Container::key_of::<crate::config::Config>(), constants::CONFIG_ID);
        container.set_value(constants::ENVIRONMENT_ID, environment);
        container.set_value(constants::SETTINGS_ID, settings);

        // Application providers registered later replace this.
        app.bind_router(RouteTable::new());
        Ok(())
    }
}
