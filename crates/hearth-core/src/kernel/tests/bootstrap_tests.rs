use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde_json::json;
use tempfile::tempdir;

use crate::config::Config;
use crate::kernel::bootstrap::{AppState, Application, ExecutionContext};
use crate::kernel::constants;
use crate::kernel::error::{Error, KernelLifecyclePhase, Result};
use crate::kernel::tests::common::{
    BootingProvider, Journal, PlainProvider, entries, journal, record, test_app,
};
use crate::provider::{BootableProvider, ServiceProvider};

#[test]
fn test_new_application_is_initialized() {
    let app = test_app();

    assert_eq!(app.state(), AppState::Initialized);
    assert!(!app.is_booted());
    assert_eq!(app.environment(), constants::DEFAULT_ENVIRONMENT);
    assert!(app.is_environment("production"));
    assert!(!app.is_cli());
}

#[test]
fn test_environment_and_context_from_construction() {
    let mut config = Config::new();
    config.set("app.env", "local").unwrap();
    let app = Application::with_context(config, ExecutionContext::Cli).unwrap();

    assert_eq!(app.environment(), "local");
    assert!(app.is_cli());
}

#[test]
fn test_register_runs_immediately() {
    let log = journal();
    let mut app = test_app();

    app.register(PlainProvider { name: "first", journal: log.clone() }).unwrap();
    assert_eq!(entries(&log), vec!["register:first"]);
    assert!(app.container().has("first"));
    assert_eq!(app.provider_names(), vec!["error-handler", "standard-services", "first"]);
}

#[test]
fn test_boot_runs_bootable_providers_in_order() {
    let log = journal();
    let mut app = test_app();

    app.register(BootingProvider { name: "p1", journal: log.clone() }).unwrap();
    app.register(PlainProvider { name: "plain", journal: log.clone() }).unwrap();
    app.register(BootingProvider { name: "p2", journal: log.clone() }).unwrap();
    app.boot().unwrap();

    assert_eq!(
        entries(&log),
        vec!["register:p1", "register:plain", "register:p2", "boot:p1", "boot:p2"]
    );
    assert!(app.is_booted());
    assert_eq!(app.state(), AppState::Booted);
}

#[test]
fn test_boot_is_idempotent() {
    let log = journal();
    let mut app = test_app();
    app.register(BootingProvider { name: "once", journal: log.clone() }).unwrap();

    for _ in 0..5 {
        app.boot().unwrap();
    }

    let boots = entries(&log).into_iter().filter(|e| e.starts_with("boot:")).count();
    assert_eq!(boots, 1);
}

/// Resolves, at boot, a service that a later provider registers.
struct NeedsLater {
    journal: Journal,
}

impl ServiceProvider for NeedsLater {
    fn name(&self) -> &'static str {
        "needs-later"
    }

    fn register(&self, _app: &mut Application) -> Result<()> {
        Ok(())
    }

    fn as_bootable(&self) -> Option<&dyn BootableProvider> {
        Some(self)
    }
}

impl BootableProvider for NeedsLater {
    fn boot(&self, app: &mut Application) -> Result<()> {
        let later = app.container().make::<String>("later")?;
        record(&self.journal, format!("saw:{}", later));
        Ok(())
    }
}

#[test]
fn test_boot_sees_services_from_later_providers() {
    let log = journal();
    let mut app = test_app();

    app.register(NeedsLater { journal: log.clone() }).unwrap();
    app.register(PlainProvider { name: "later", journal: log.clone() }).unwrap();
    app.boot().unwrap();

    assert_eq!(entries(&log), vec!["register:later", "saw:later"]);
}

#[test]
fn test_late_provider_boots_immediately_once() {
    let log = journal();
    let mut app = test_app();
    app.boot().unwrap();

    app.register(BootingProvider { name: "late", journal: log.clone() }).unwrap();
    assert_eq!(entries(&log), vec!["register:late", "boot:late"]);

    app.boot().unwrap();
    assert_eq!(entries(&log).len(), 2);
}

/// Calls back into `boot` and registers another provider while booting.
struct Reentrant {
    journal: Journal,
}

impl ServiceProvider for Reentrant {
    fn name(&self) -> &'static str {
        "reentrant"
    }

    fn register(&self, _app: &mut Application) -> Result<()> {
        Ok(())
    }

    fn as_bootable(&self) -> Option<&dyn BootableProvider> {
        Some(self)
    }
}

impl BootableProvider for Reentrant {
    fn boot(&self, app: &mut Application) -> Result<()> {
        assert_eq!(app.state(), AppState::Booting);
        app.boot()?;
        record(&self.journal, "boot:reentrant");
        app.register(BootingProvider { name: "nested", journal: self.journal.clone() })
    }
}

#[test]
fn test_reentrant_boot_is_noop_and_nested_providers_boot() {
    let log = journal();
    let mut app = test_app();
    app.register(Reentrant { journal: log.clone() }).unwrap();
    app.boot().unwrap();

    assert_eq!(entries(&log), vec!["boot:reentrant", "register:nested", "boot:nested"]);
    assert!(app.is_booted());
}

struct FailsOnce {
    failed: Arc<AtomicBool>,
    journal: Journal,
}

impl ServiceProvider for FailsOnce {
    fn name(&self) -> &'static str {
        "fails-once"
    }

    fn register(&self, _app: &mut Application) -> Result<()> {
        Ok(())
    }

    fn as_bootable(&self) -> Option<&dyn BootableProvider> {
        Some(self)
    }
}

impl BootableProvider for FailsOnce {
    fn boot(&self, _app: &mut Application) -> Result<()> {
        if !self.failed.swap(true, Ordering::SeqCst) {
            return Err(Error::Other("not ready".to_string()));
        }
        record(&self.journal, "boot:fails-once");
        Ok(())
    }
}

#[test]
fn test_failed_boot_reports_phase_and_resumes() {
    let log = journal();
    let mut app = test_app();
    app.register(BootingProvider { name: "before", journal: log.clone() }).unwrap();
    app.register(FailsOnce { failed: Arc::new(AtomicBool::new(false)), journal: log.clone() })
        .unwrap();
    app.register(BootingProvider { name: "after", journal: log.clone() }).unwrap();

    match app.boot() {
        Err(Error::KernelLifecycleError { phase, provider, .. }) => {
            assert_eq!(phase, KernelLifecyclePhase::Boot);
            assert_eq!(provider, "fails-once");
        }
        other => panic!("Expected boot failure, got {:?}", other),
    }
    assert!(!app.is_booted());

    app.boot().unwrap();
    assert_eq!(
        entries(&log),
        vec!["register:before", "register:after", "boot:before", "boot:fails-once", "boot:after"]
    );
}

#[test]
fn test_failed_late_boot_is_retried_by_boot() {
    let log = journal();
    let mut app = test_app();
    app.boot().unwrap();

    let err = app
        .register(FailsOnce { failed: Arc::new(AtomicBool::new(false)), journal: log.clone() })
        .unwrap_err();
    assert!(matches!(
        err,
        Error::KernelLifecycleError { phase: KernelLifecyclePhase::Boot, .. }
    ));
    assert!(!app.is_booted());
    assert_eq!(app.state(), AppState::Initialized);

    // An unrelated registration does not boot anything while not booted.
    app.register(PlainProvider { name: "bystander", journal: log.clone() }).unwrap();
    assert_eq!(entries(&log), vec!["register:bystander"]);

    app.boot().unwrap();
    assert!(app.is_booted());
    assert_eq!(entries(&log), vec!["register:bystander", "boot:fails-once"]);

    app.boot().unwrap();
    let boots = entries(&log).into_iter().filter(|e| e == "boot:fails-once").count();
    assert_eq!(boots, 1);
}

struct Unregistrable;

impl ServiceProvider for Unregistrable {
    fn name(&self) -> &'static str {
        "unregistrable"
    }

    fn register(&self, app: &mut Application) -> Result<()> {
        // Resolving during register is exactly what goes wrong here.
        app.container().make::<String>("declared-later")?;
        Ok(())
    }
}

#[test]
fn test_register_failure_is_wrapped() {
    let mut app = test_app();
    let err = app.register(Unregistrable).unwrap_err();

    assert!(matches!(
        err,
        Error::KernelLifecycleError { phase: KernelLifecyclePhase::Register, .. }
    ));
    assert!(err.is_not_found());
}

#[test]
fn test_runtime_settings_applied_at_init() {
    let config = Config::from_value(json!({
        "runtime": { "a": { "b": 1, "c": 2 } }
    }))
    .unwrap();
    let app = Application::with_context(config, ExecutionContext::Server).unwrap();

    assert_eq!(app.settings().keys(), vec!["a.b", "a.c"]);
}

#[test]
fn test_invalid_runtime_settings_fail_init() {
    let config = Config::from_value(json!({ "runtime": "not-a-table" })).unwrap();
    match Application::with_context(config, ExecutionContext::Server) {
        Err(Error::KernelLifecycleError { phase, .. }) => {
            assert_eq!(phase, KernelLifecyclePhase::Init)
        }
        Err(other) => panic!("Unexpected error: {:?}", other),
        Ok(_) => panic!("Init should fail"),
    }
}

#[test]
fn test_load_from_file() {
    let dir = tempdir().expect("Failed to create temporary directory");
    let path = dir.path().join("hearth.json");
    fs::write(&path, r#"{ "app": { "env": "testing" } }"#).unwrap();

    let app = Application::load(&path).unwrap();
    assert_eq!(app.environment(), "testing");
    assert_eq!(app.state(), AppState::Initialized);
}
