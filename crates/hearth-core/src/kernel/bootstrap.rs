use std::io::IsTerminal;
use std::path::Path;
use std::sync::Arc;

use crate::config::Config;
use crate::container::Container;
use crate::http::{Request, Response};
use crate::kernel::constants;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::kernel::hooks::{NoHooks, RequestHooks};
use crate::provider::builtin::{ErrorHandler, ErrorHandlerProvider, StandardServicesProvider};
use crate::provider::ServiceProvider;
use crate::routing::{Router, SharedRouter};
use crate::settings::{RuntimeSettings, apply_settings};

/// Where the application is running, decided once at init.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionContext {
    Cli,
    Server,
}

impl ExecutionContext {
    /// `HEARTH_CONTEXT` (`cli` or `server`) wins; otherwise an interactive
    /// stdin means CLI.
    pub fn detect() -> Self {
        match std::env::var(constants::CONTEXT_ENV_VAR).ok().as_deref() {
            Some("cli") => ExecutionContext::Cli,
            Some("server") => ExecutionContext::Server,
            _ if std::io::stdin().is_terminal() => ExecutionContext::Cli,
            _ => ExecutionContext::Server,
        }
    }
}

/// Lifecycle position of an [`Application`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Constructed,
    Initialized,
    Booting,
    Booted,
}

/// Main application struct: owns the container, the ordered provider list and
/// the request hooks.
pub struct Application {
    container: Container,
    config: Config,
    environment: String,
    cli: bool,
    state: AppState,
    providers: Vec<Arc<dyn ServiceProvider>>,
    // Providers before this index have already been booted.
    next_boot: usize,
    settings: RuntimeSettings,
    hooks: Box<dyn RequestHooks>,
}

impl Application {
    /// Create and initialize an application, detecting the execution context.
    pub fn new(config: Config) -> Result<Self> {
        Self::with_context(config, ExecutionContext::detect())
    }

    /// Create and initialize an application from a configuration file.
    pub fn load(path: &Path) -> Result<Self> {
        Self::new(Config::load(path)?)
    }

    /// Create and initialize an application for an explicit context.
    pub fn with_context(config: Config, context: ExecutionContext) -> Result<Self> {
        let environment = config.get_or(
            constants::ENV_CONFIG_KEY,
            constants::DEFAULT_ENVIRONMENT.to_string(),
        );
        let mut app = Application {
            container: Container::new(),
            config,
            environment,
            cli: context == ExecutionContext::Cli,
            state: AppState::Constructed,
            providers: Vec::new(),
            next_boot: 0,
            settings: RuntimeSettings::new(),
            hooks: Box::new(NoHooks),
        };
        app.init()?;
        Ok(app)
    }

    /// Replace the request hooks.
    pub fn with_hooks<H: RequestHooks + 'static>(mut self, hooks: H) -> Self {
        self.hooks = Box::new(hooks);
        self
    }

    fn init(&mut self) -> Result<()> {
        log::info!(
            "Initializing {} v{} (environment: {}, cli: {})",
            constants::APP_NAME,
            constants::APP_VERSION,
            self.environment,
            self.cli
        );

        if let Some(runtime) = self.config.get_value(constants::RUNTIME_SETTINGS_KEY) {
            let applied = apply_settings(&mut self.settings, runtime).map_err(|e| {
                Error::lifecycle(KernelLifecyclePhase::Init, "runtime-settings", e.into())
            })?;
            log::debug!("Applied {} runtime settings", applied);
        }

        self.register(ErrorHandlerProvider)?;
        self.register(StandardServicesProvider)?;

        self.state = AppState::Initialized;
        Ok(())
    }

    /// Add a provider and run its register phase immediately.
    pub fn register<P: ServiceProvider + 'static>(&mut self, provider: P) -> Result<()> {
        self.register_shared(Arc::new(provider))
    }

    /// Add a shared provider and run its register phase immediately. A
    /// provider added after boot has finished is booted right away.
    pub fn register_shared(&mut self, provider: Arc<dyn ServiceProvider>) -> Result<()> {
        log::info!("Registering provider: {}", provider.name());
        self.providers.push(Arc::clone(&provider));
        provider
            .register(self)
            .map_err(|e| Error::lifecycle(KernelLifecyclePhase::Register, provider.name(), e))?;

        if self.state == AppState::Booted {
            log::debug!("Application already booted, booting late provider {}", provider.name());
            if let Err(e) = self.boot_pending() {
                // Leaves the failed provider for the next boot() to retry.
                self.state = AppState::Initialized;
                return Err(e);
            }
        }
        Ok(())
    }

    /// Run the boot phase of every boot-capable provider, in registration
    /// order. Calling it again, or from inside a provider's boot, does nothing.
    /// After a failed boot the next call resumes at the provider that failed.
    pub fn boot(&mut self) -> Result<()> {
        if self.state != AppState::Initialized {
            return Ok(());
        }
        log::info!("Booting {} providers...", self.providers.len());
        self.state = AppState::Booting;
        match self.boot_pending() {
            Ok(()) => {
                self.state = AppState::Booted;
                log::info!("Application booted.");
                Ok(())
            }
            Err(e) => {
                self.state = AppState::Initialized;
                Err(e)
            }
        }
    }

    fn boot_pending(&mut self) -> Result<()> {
        while self.next_boot < self.providers.len() {
            let provider = Arc::clone(&self.providers[self.next_boot]);
            if let Some(bootable) = provider.as_bootable() {
                log::debug!("Booting provider: {}", provider.name());
                bootable
                    .boot(self)
                    .map_err(|e| Error::lifecycle(KernelLifecyclePhase::Boot, provider.name(), e))?;
            }
            self.next_boot += 1;
        }
        Ok(())
    }

    /// Handle one request.
    ///
    /// The request is bound under its type key and the `request` alias for the
    /// duration of the call. A route miss becomes the 404 fallback; every other
    /// failure propagates.
    pub fn handle(&mut self, request: Request) -> Result<Response> {
        let request_id = Container::key_of::<Request>();
        self.container.set_value(request_id, request.clone());
        self.container.alias(constants::REQUEST_ALIAS, request_id);

        let result = self.handle_bound(&request);

        self.container.forget(constants::REQUEST_ALIAS);
        self.container.forget(request_id);
        result
    }

    fn handle_bound(&mut self, request: &Request) -> Result<Response> {
        self.boot()?;

        if let Some(response) = self.hooks.before_handle(self, request)? {
            log::debug!("before_handle short-circuited {} {}", request.method, request.path);
            return Ok(response);
        }

        let router = self.container.make::<SharedRouter>(constants::ROUTER_ID)?;
        let response = match router.route(request) {
            Ok(target) => {
                let short_circuit = self.hooks.after_route(self, request, target.as_ref())?;
                if let Some(response) = short_circuit {
                    log::debug!("after_route short-circuited {}", target.describe());
                    return Ok(response);
                }
                log::debug!("Dispatching {}", target.describe());
                target.dispatch()?
            }
            Err(e) if e.is_route_not_found() => {
                log::warn!("{}", e);
                Response::new(constants::NOT_FOUND_STATUS, constants::NOT_FOUND_BODY)
            }
            Err(e) => return Err(e),
        };

        self.hooks.after_handle(self, request, &response)?;
        Ok(response)
    }

    /// Bind `router` as the router consulted by [`handle`](Self::handle).
    pub fn bind_router<R: Router + 'static>(&mut self, router: R) {
        let router: SharedRouter = Arc::new(router);
        self.container.set_value(constants::ROUTER_ID, router);
    }

    /// Convert a propagated failure into a response using the registered
    /// error handler.
    pub fn render_error(&self, error: &Error) -> Response {
        match self.container.make::<ErrorHandler>(constants::ERROR_HANDLER_ID) {
            Ok(handler) => handler.render(error),
            Err(e) => {
                log::warn!("No error handler available ({}), using plain 500", e);
                ErrorHandler::default().render(error)
            }
        }
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut Container {
        &mut self.container
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Runtime settings applied during init.
    pub fn settings(&self) -> &RuntimeSettings {
        &self.settings
    }

    pub fn environment(&self) -> &str {
        &self.environment
    }

    pub fn is_environment(&self, environment: &str) -> bool {
        self.environment == environment
    }

    pub fn is_cli(&self) -> bool {
        self.cli
    }

    pub fn state(&self) -> AppState {
        self.state
    }

    pub fn is_booted(&self) -> bool {
        self.state == AppState::Booted
    }

    /// Names of registered providers in registration order.
    pub fn provider_names(&self) -> Vec<&'static str> {
        self.providers.iter().map(|p| p.name()).collect()
    }
}

impl std::fmt::Debug for Application {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Application")
            .field("environment", &self.environment)
            .field("cli", &self.cli)
            .field("state", &self.state)
            .field("providers", &self.provider_names())
            .field("container", &self.container)
            .finish()
    }
}
