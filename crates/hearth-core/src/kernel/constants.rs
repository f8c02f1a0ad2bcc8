/// Application name
pub const APP_NAME: &str = "Hearth";

/// Application version
pub const APP_VERSION: &str = "0.1.0";

/// Environment label used when `app.env` is not configured
pub const DEFAULT_ENVIRONMENT: &str = "production";

/// Environment variable that forces the execution context (`cli` or `server`)
pub const CONTEXT_ENV_VAR: &str = "HEARTH_CONTEXT";

// --- Config keys ---

/// Environment label
pub const ENV_CONFIG_KEY: &str = "app.env";

/// Include error messages in rendered error responses
pub const DEBUG_CONFIG_KEY: &str = "app.debug";

/// Install a panic hook that reports panics through `log`
pub const PANIC_HOOK_CONFIG_KEY: &str = "app.panic_hook";

/// Nested runtime settings applied during init
pub const RUNTIME_SETTINGS_KEY: &str = "runtime";

// --- Container ids ---

/// Alias under which the current request is bound while it is handled
pub const REQUEST_ALIAS: &str = "request";

/// Router consulted by `Application::handle`
pub const ROUTER_ID: &str = "router";

/// Application configuration
pub const CONFIG_ID: &str = "config";

/// Environment label as a `String`
pub const ENVIRONMENT_ID: &str = "app.env";

/// Runtime settings applied during init
pub const SETTINGS_ID: &str = "runtime.settings";

/// Error handler registered by the built-in error provider
pub const ERROR_HANDLER_ID: &str = "error.handler";

// --- Fallback response ---

/// Status of the response produced when no route matches
pub const NOT_FOUND_STATUS: u16 = 404;

/// Body of the response produced when no route matches
pub const NOT_FOUND_BODY: &str = "Not Found";
