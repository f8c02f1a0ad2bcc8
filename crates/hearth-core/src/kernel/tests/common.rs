use std::sync::{Arc, Mutex};

use crate::config::Config;
use crate::kernel::bootstrap::{Application, ExecutionContext};
use crate::kernel::error::Result;
use crate::provider::{BootableProvider, ServiceProvider};

/// Shared, ordered record of lifecycle calls.
pub type Journal = Arc<Mutex<Vec<String>>>;

pub fn journal() -> Journal {
    Arc::new(Mutex::new(Vec::new()))
}

pub fn entries(journal: &Journal) -> Vec<String> {
    journal.lock().unwrap().clone()
}

pub fn record(journal: &Journal, entry: impl Into<String>) {
    journal.lock().unwrap().push(entry.into());
}

pub fn test_app() -> Application {
    Application::with_context(Config::new(), ExecutionContext::Server)
        .expect("Application::with_context failed")
}

/// Register-only provider.
pub struct PlainProvider {
    pub name: &'static str,
    pub journal: Journal,
}

impl ServiceProvider for PlainProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn register(&self, app: &mut Application) -> Result<()> {
        record(&self.journal, format!("register:{}", self.name));
        app.container_mut().set_value(self.name, self.name.to_string());
        Ok(())
    }
}

/// Provider with a boot phase that resolves its own binding.
pub struct BootingProvider {
    pub name: &'static str,
    pub journal: Journal,
}

impl ServiceProvider for BootingProvider {
    fn name(&self) -> &'static str {
        self.name
    }

    fn register(&self, app: &mut Application) -> Result<()> {
        record(&self.journal, format!("register:{}", self.name));
        app.container_mut().set_value(self.name, self.name.to_string());
        Ok(())
    }

    fn as_bootable(&self) -> Option<&dyn BootableProvider> {
        Some(self)
    }
}

impl BootableProvider for BootingProvider {
    fn boot(&self, app: &mut Application) -> Result<()> {
        let value = app.container().make::<String>(self.name)?;
        record(&self.journal, format!("boot:{}", value));
        Ok(())
    }
}
