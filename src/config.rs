//! Configuration for the file-operations bridge.
//!
//! This module provides a layered configuration system that supports:
//! - Default values
//! - TOML configuration file
//! - Environment variable overrides
//! - Programmatic setup options (merged last, highest precedence)
//!
//! # Environment Variables
//!
//! Environment variables must be prefixed with `LSP_FILEOPS_` and use double
//! underscores to separate nested levels:
//! - `LSP_FILEOPS_DEBUG=true` sets `debug`
//! - `LSP_FILEOPS_TIMEOUT_MS=5000` sets `timeout_ms`
//! - `LSP_FILEOPS_OPERATIONS__WILL_RENAME_FILES=false` sets
//!   `operations.will_rename_files`
//!
//! Unknown keys in any layer are ignored; a value of the wrong type surfaces
//! once at setup time as a configuration error, never at dispatch time.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

use crate::registry::Operation;

/// Name of the configuration file searched for from the current directory up.
pub const CONFIG_FILE_NAME: &str = ".lsp-fileops.toml";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Settings {
    /// Global debug mode. Forces debug-level logging unless `RUST_LOG` is set.
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Timeout for "will" requests in milliseconds. Surfaced read-only for
    /// handler modules; the bridge itself never waits on anything.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Per-operation enablement flags.
    #[serde(default)]
    pub operations: OperationsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Enablement flags for the six workspace file operations.
///
/// Flags merge individually: disabling one operation in an override layer
/// leaves the other five at their defaults.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct OperationsConfig {
    #[serde(default = "default_true")]
    pub will_rename_files: bool,

    #[serde(default = "default_true")]
    pub did_rename_files: bool,

    #[serde(default = "default_true")]
    pub will_create_files: bool,

    #[serde(default = "default_true")]
    pub did_create_files: bool,

    #[serde(default = "default_true")]
    pub will_delete_files: bool,

    #[serde(default = "default_true")]
    pub did_delete_files: bool,
}

impl OperationsConfig {
    /// Whether the given operation is enabled.
    pub fn enabled(&self, op: Operation) -> bool {
        match op {
            Operation::WillRename => self.will_rename_files,
            Operation::DidRename => self.did_rename_files,
            Operation::WillCreate => self.will_create_files,
            Operation::DidCreate => self.did_create_files,
            Operation::WillDelete => self.will_delete_files,
            Operation::DidDelete => self.did_delete_files,
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is not set: error, warn, info,
    /// debug, or trace.
    #[serde(default = "default_log_level")]
    pub default: String,

    /// Per-module level overrides, e.g. `router = "debug"`.
    #[serde(default)]
    pub modules: HashMap<String, String>,
}

// Default value functions
fn default_false() -> bool {
    false
}
fn default_true() -> bool {
    true
}
fn default_timeout_ms() -> u64 {
    10_000
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            timeout_ms: default_timeout_ms(),
            operations: OperationsConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for OperationsConfig {
    fn default() -> Self {
        Self {
            will_rename_files: true,
            did_rename_files: true,
            will_create_files: true,
            did_create_files: true,
            will_delete_files: true,
            did_delete_files: true,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            default: default_log_level(),
            modules: HashMap::new(),
        }
    }
}

/// Programmatic overrides passed to setup. Merged over every other layer.
///
/// Only fields that were explicitly set are merged; everything else keeps the
/// value from the lower layers.
#[derive(Debug, Default, Clone, Serialize)]
pub struct SetupOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debug: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,

    #[serde(skip_serializing_if = "HashMap::is_empty")]
    pub operations: HashMap<String, bool>,
}

impl SetupOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the debug flag.
    pub fn debug(mut self, debug: bool) -> Self {
        self.debug = Some(debug);
        self
    }

    /// Set the "will" request timeout in milliseconds.
    pub fn timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = Some(timeout_ms);
        self
    }

    /// Enable or disable a single operation, leaving the others untouched.
    pub fn operation(mut self, op: Operation, enabled: bool) -> Self {
        self.operations.insert(op.config_key().to_string(), enabled);
        self
    }
}

impl Settings {
    /// Resolve configuration from all sources.
    ///
    /// Layering, lowest to highest precedence: built-in defaults, the nearest
    /// `.lsp-fileops.toml` (searched from the current directory up), the
    /// `LSP_FILEOPS_` environment, then `options`.
    pub fn resolve(options: &SetupOptions) -> Result<Self, Box<figment::Error>> {
        let config_path =
            Self::find_workspace_config().unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
        Self::figment(config_path, options)
            .extract()
            .map_err(Box::new)
    }

    /// Resolve configuration from a specific file plus `options`.
    pub fn resolve_from(
        path: impl AsRef<std::path::Path>,
        options: &SetupOptions,
    ) -> Result<Self, Box<figment::Error>> {
        Self::figment(path.as_ref().to_path_buf(), options)
            .extract()
            .map_err(Box::new)
    }

    fn figment(config_path: PathBuf, options: &SetupOptions) -> Figment {
        Figment::new()
            // Start with defaults
            .merge(Serialized::defaults(Settings::default()))
            // Layer in config file if it exists
            .merge(Toml::file(config_path))
            // Layer in environment variables with LSP_FILEOPS_ prefix.
            // Double underscore (__) separates nested levels; single
            // underscore remains as is within field names.
            .merge(
                Env::prefixed("LSP_FILEOPS_")
                    .map(|key| key.as_str().to_lowercase().replace("__", ".").into()),
            )
            // Programmatic overrides win over everything
            .merge(Serialized::defaults(options.clone()))
    }

    /// Find the nearest configuration file, searching from the current
    /// directory up to the filesystem root.
    fn find_workspace_config() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        for ancestor in current.ancestors() {
            let candidate = ancestor.join(CONFIG_FILE_NAME);
            if candidate.is_file() {
                return Some(candidate);
            }
        }

        None
    }

    /// Save the current configuration to a file.
    pub fn save(
        &self,
        path: impl AsRef<std::path::Path>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        if let Some(parent) = path.as_ref().parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let toml_string = toml::to_string_pretty(self)?;
        std::fs::write(path, toml_string)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = Settings::default();

        assert!(!settings.debug);
        assert_eq!(settings.timeout_ms, 10_000);
        for op in Operation::ALL {
            assert!(settings.operations.enabled(op), "{op} should default on");
        }
    }

    #[test]
    fn test_option_overrides_merge_individually() {
        let options = SetupOptions::new()
            .debug(true)
            .operation(Operation::WillDelete, false);

        let settings = Settings::resolve_from("/nonexistent/config.toml", &options).unwrap();

        assert!(settings.debug);
        assert!(!settings.operations.enabled(Operation::WillDelete));
        // The other five keep their defaults
        assert!(settings.operations.enabled(Operation::DidDelete));
        assert!(settings.operations.enabled(Operation::WillRename));
    }

    #[test]
    fn test_unknown_keys_are_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(
            &path,
            r#"
            timeout_ms = 5000
            not_a_real_key = "whatever"

            [operations]
            did_create_files = false
            "#,
        )
        .unwrap();

        let settings = Settings::resolve_from(&path, &SetupOptions::new()).unwrap();

        assert_eq!(settings.timeout_ms, 5000);
        assert!(!settings.operations.enabled(Operation::DidCreate));
        assert!(settings.operations.enabled(Operation::WillCreate));
    }

    #[test]
    fn test_type_mismatch_is_a_setup_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        std::fs::write(&path, "timeout_ms = \"soon\"\n").unwrap();

        assert!(Settings::resolve_from(&path, &SetupOptions::new()).is_err());
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("settings.toml");

        let mut settings = Settings::default();
        settings.operations.will_rename_files = false;
        settings.save(&path).unwrap();

        let loaded = Settings::resolve_from(&path, &SetupOptions::new()).unwrap();
        assert!(!loaded.operations.enabled(Operation::WillRename));
    }
}
