// src/utils/config.rs
//! Collector configuration
//!
//! Values are layered: built-in defaults, then an optional `simtrace.toml`
//! in the working directory, then `SIMTRACE__*` environment variables
//! (e.g. `SIMTRACE__LOG__FILTER=debug`).

use crate::utils::errors::{Result, TraceError};
use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::Path;

/// Base name of the optional configuration file
const CONFIG_FILE_NAME: &str = "simtrace";

/// Environment variable prefix
const ENV_PREFIX: &str = "SIMTRACE";

/// Collector configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CollectorConfig {
    /// Name given to the background worker thread
    pub worker_thread_name: String,

    /// Number of events the pending buffer reserves up front.
    /// This is an allocation hint, not a bound.
    pub initial_queue_capacity: usize,

    /// Version string reported to the sink in the metadata record
    pub component_version: String,

    /// Logging configuration
    pub log: LogConfig,
}

impl Default for CollectorConfig {
    fn default() -> Self {
        Self {
            worker_thread_name: "simtrace-worker".to_string(),
            initial_queue_capacity: 1024,
            component_version: crate::VERSION.to_string(),
            log: LogConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// `EnvFilter` directive used when `RUST_LOG` is not set
    pub filter: String,

    /// Emit JSON lines instead of human readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: false,
        }
    }
}

impl CollectorConfig {
    /// Load configuration from `simtrace.toml` (optional) and the environment
    pub fn load() -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(File::with_name(CONFIG_FILE_NAME).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from an explicit file; the format follows the extension
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config: Self = Config::builder()
            .add_source(File::from(path.as_ref()).required(true))
            .build()?
            .try_deserialize()?;

        config.validate()?;
        Ok(config)
    }

    /// Check invariants that serde cannot express
    pub fn validate(&self) -> Result<()> {
        if self.worker_thread_name.trim().is_empty() {
            return Err(TraceError::Config(
                "worker_thread_name must not be empty".to_string(),
            ));
        }

        if self.worker_thread_name.contains('\0') {
            return Err(TraceError::Config(
                "worker_thread_name must not contain NUL bytes".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_config(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_defaults() {
        let config = CollectorConfig::default();
        assert_eq!(config.worker_thread_name, "simtrace-worker");
        assert_eq!(config.component_version, crate::VERSION);
        assert_eq!(config.log.filter, "info");
        assert!(!config.log.json);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file_overrides() {
        let file = write_config(
            r#"
            worker_thread_name = "kernel-trace"
            component_version = "3.0.0"

            [log]
            json = true
            "#,
        );

        let config = CollectorConfig::from_file(file.path()).unwrap();
        assert_eq!(config.worker_thread_name, "kernel-trace");
        assert_eq!(config.component_version, "3.0.0");
        assert!(config.log.json);
        // untouched keys keep their defaults
        assert_eq!(config.initial_queue_capacity, 1024);
        assert_eq!(config.log.filter, "info");
    }

    #[test]
    fn test_empty_thread_name_rejected() {
        let file = write_config(r#"worker_thread_name = "  ""#);

        let result = CollectorConfig::from_file(file.path());
        assert!(matches!(result, Err(TraceError::Config(_))));
    }

    #[test]
    fn test_load_reads_environment() {
        // Only test in the crate touching SIMTRACE__* variables
        std::env::set_var("SIMTRACE__LOG__FILTER", "simtrace=trace");
        std::env::set_var("SIMTRACE__WORKER_THREAD_NAME", "env-worker");
        let loaded = CollectorConfig::load();
        std::env::remove_var("SIMTRACE__LOG__FILTER");
        std::env::remove_var("SIMTRACE__WORKER_THREAD_NAME");

        let config = loaded.unwrap();
        assert_eq!(config.log.filter, "simtrace=trace");
        assert_eq!(config.worker_thread_name, "env-worker");
        assert_eq!(config.component_version, crate::VERSION);
    }

    #[test]
    fn test_missing_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = CollectorConfig::from_file(dir.path().join("absent.toml"));
        assert!(result.is_err());
    }
}
