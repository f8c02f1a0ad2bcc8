//! # Hearth Configuration
//!
//! [`Config`] is a tree of values addressed with dotted keys (`app.env`,
//! `runtime.log.max_level`). It is built in memory or loaded from a file whose
//! format is picked from its extension, see [`ConfigFormat`].
//!
//! The kernel reads these keys:
//!
//! - `app.env`: environment label, defaults to `production`.
//! - `app.debug`: whether rendered errors include their message.
//! - `runtime`: nested runtime settings applied once during init.
pub mod error;

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub use error::ConfigError;

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    /// JSON format (.json)
    Json,
    /// YAML format (.yaml, .yml) - requires "yaml-config" feature
    #[cfg(feature = "yaml-config")]
    Yaml,
    /// TOML format (.toml) - requires "toml-config" feature
    #[cfg(feature = "toml-config")]
    Toml,
}

impl ConfigFormat {
    /// Get the file extension for this format
    pub fn extension(&self) -> &'static str {
        match self {
            ConfigFormat::Json => "json",
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => "yaml",
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => "toml",
        }
    }

    /// Determine format from file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| match ext.to_lowercase().as_str() {
                "json" => Some(ConfigFormat::Json),
                #[cfg(feature = "yaml-config")]
                "yaml" | "yml" => Some(ConfigFormat::Yaml),
                #[cfg(feature = "toml-config")]
                "toml" => Some(ConfigFormat::Toml),
                _ => None,
            })
    }
}

/// Application configuration tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Config {
    root: Value,
}

impl Config {
    /// Create an empty configuration
    pub fn new() -> Self {
        Self {
            root: Value::Object(Map::new()),
        }
    }

    /// Wrap an existing value. The root must be an object; `null` is read as
    /// an empty configuration.
    pub fn from_value(root: Value) -> Result<Self, ConfigError> {
        match root {
            Value::Object(_) => Ok(Self { root }),
            Value::Null => Ok(Self::new()),
            other => Err(ConfigError::NotAnObject {
                found: type_label(&other).to_string(),
            }),
        }
    }

    /// Parse configuration text in the given format
    pub fn parse(data: &str, format: ConfigFormat) -> Result<Self, ConfigError> {
        let root: Value = match format {
            ConfigFormat::Json => serde_json::from_str(data).map_err(|e| ConfigError::Parse {
                format: "JSON",
                message: e.to_string(),
            })?,
            #[cfg(feature = "yaml-config")]
            ConfigFormat::Yaml => serde_yaml::from_str(data).map_err(|e| ConfigError::Parse {
                format: "YAML",
                message: e.to_string(),
            })?,
            #[cfg(feature = "toml-config")]
            ConfigFormat::Toml => toml::from_str(data).map_err(|e| ConfigError::Parse {
                format: "TOML",
                message: e.to_string(),
            })?,
        };
        Self::from_value(root)
    }

    /// Load a configuration file, picking the format from its extension.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let format = ConfigFormat::from_path(path).ok_or_else(|| ConfigError::UnsupportedFormat {
            path: path.to_path_buf(),
        })?;
        let data = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::info!("Loading {} configuration from {}", format.extension(), path.display());
        Self::parse(&data, format)
    }

    /// Check if a dotted key exists
    pub fn has(&self, key: &str) -> bool {
        self.get_value(key).is_some()
    }

    /// Raw value at a dotted key
    pub fn get_value(&self, key: &str) -> Option<&Value> {
        key.split('.')
            .try_fold(&self.root, |node, segment| node.as_object()?.get(segment))
    }

    /// Get a configuration value, `None` when missing or of the wrong shape
    pub fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.get_value(key)
            .and_then(|value| serde_json::from_value(value.clone()).ok())
    }

    /// Get a configuration value with default
    pub fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.get(key).unwrap_or(default)
    }

    /// Set a value at a dotted key, creating intermediate tables.
    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), ConfigError> {
        let value = serde_json::to_value(value).map_err(|e| ConfigError::Parse {
            format: "JSON",
            message: e.to_string(),
        })?;

        let mut segments: Vec<&str> = key.split('.').collect();
        let leaf = segments.pop().unwrap_or(key);
        let mut node = &mut self.root;
        for segment in segments {
            let table = node.as_object_mut().ok_or_else(|| ConfigError::NotATable {
                key: key.to_string(),
                segment: segment.to_string(),
            })?;
            node = table
                .entry(segment.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
        }
        let table = node.as_object_mut().ok_or_else(|| ConfigError::NotATable {
            key: key.to_string(),
            segment: leaf.to_string(),
        })?;
        table.insert(leaf.to_string(), value);
        Ok(())
    }

    /// Merge with another config; tables merge recursively, other values in
    /// `other` win.
    pub fn merge(&mut self, other: &Config) {
        merge_values(&mut self.root, &other.root);
    }

    /// Top-level keys
    pub fn keys(&self) -> Vec<String> {
        self.root
            .as_object()
            .map(|table| table.keys().cloned().collect())
            .unwrap_or_default()
    }

    /// The whole tree
    pub fn as_value(&self) -> &Value {
        &self.root
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn merge_values(base: &mut Value, overlay: &Value) {
    match (base, overlay) {
        (Value::Object(base), Value::Object(overlay)) => {
            for (key, value) in overlay {
                match base.get_mut(key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base.insert(key.clone(), value.clone());
                    }
                }
            }
        }
        (base, overlay) => *base = overlay.clone(),
    }
}

pub(crate) fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "table",
    }
}
