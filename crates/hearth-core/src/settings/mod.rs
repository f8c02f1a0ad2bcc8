//! # Hearth Runtime Settings
//!
//! Runtime settings arrive as a nested table (the `runtime` section of the
//! configuration). [`apply_settings`] flattens it and hands every leaf to a
//! [`SettingsApplier`] under its dot-joined path, so `{log: {max_level: "warn"}}`
//! becomes one application of `log.max_level`.
//!
//! [`RuntimeSettings`] is the applier the kernel uses. It records every leaf
//! and acts on the settings it knows about.
pub mod error;

use std::collections::BTreeMap;
use std::str::FromStr;

use serde_json::{Map, Value};

use crate::config::type_label;
pub use error::SettingsError;

/// Setting that adjusts the global `log` level filter.
pub const LOG_MAX_LEVEL: &str = "log.max_level";

/// Receives flattened runtime settings one leaf at a time.
pub trait SettingsApplier {
    fn apply(&mut self, key: &str, value: &Value) -> Result<(), SettingsError>;
}

/// Apply every leaf of `settings` to `applier`, joining nested keys with `.`.
/// Arrays count as leaves. Returns the number of leaves applied.
pub fn apply_settings(
    applier: &mut dyn SettingsApplier,
    settings: &Value,
) -> Result<usize, SettingsError> {
    match settings {
        Value::Null => Ok(0),
        Value::Object(table) => apply_table(applier, "", table),
        other => Err(SettingsError::NotATable {
            found: type_label(other).to_string(),
        }),
    }
}

fn apply_table(
    applier: &mut dyn SettingsApplier,
    prefix: &str,
    table: &Map<String, Value>,
) -> Result<usize, SettingsError> {
    let mut applied = 0;
    for (name, value) in table {
        let key = if prefix.is_empty() {
            name.clone()
        } else {
            format!("{}.{}", prefix, name)
        };
        applied += match value {
            Value::Object(nested) => apply_table(applier, &key, nested)?,
            leaf => {
                applier.apply(&key, leaf)?;
                1
            }
        };
    }
    Ok(applied)
}

/// Applier that records every setting it was given.
#[derive(Debug, Clone, Default)]
pub struct RuntimeSettings {
    applied: BTreeMap<String, Value>,
}

impl RuntimeSettings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value applied under `key`, if any
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.applied.get(key)
    }

    /// Applied keys in sorted order
    pub fn keys(&self) -> Vec<&str> {
        self.applied.keys().map(String::as_str).collect()
    }

    pub fn len(&self) -> usize {
        self.applied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.applied.is_empty()
    }
}

impl SettingsApplier for RuntimeSettings {
    fn apply(&mut self, key: &str, value: &Value) -> Result<(), SettingsError> {
        if key == LOG_MAX_LEVEL {
            let level = value
                .as_str()
                .and_then(|level| log::LevelFilter::from_str(level).ok())
                .ok_or_else(|| SettingsError::InvalidValue {
                    key: key.to_string(),
                    reason: format!("expected a log level name, got {}", value),
                })?;
            log::set_max_level(level);
        }
        log::debug!("Runtime setting {} = {}", key, value);
        self.applied.insert(key.to_string(), value.clone());
        Ok(())
    }
}
