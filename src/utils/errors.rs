// src/utils/errors.rs
//! Error types for the trace collector
//!
//! Only lifecycle and configuration paths can fail. Recording itself never
//! returns an error: unknown events are skipped, environment lookups fall
//! back to sentinels and a missing monotonic clock terminates the process.

use thiserror::Error;

/// Collector error
#[derive(Debug, Error)]
pub enum TraceError {
    /// Configuration could not be loaded or is invalid
    #[error("Configuration error: {0}")]
    Config(String),

    /// The background worker thread could not be spawned
    #[error("Failed to spawn worker thread: {0}")]
    WorkerSpawnFailed(String),

    /// The background worker panicked while dispatching
    #[error("Worker thread panicked: {0}")]
    WorkerPanicked(String),

    /// `start()` was called while the worker is running
    #[error("Collector is already running")]
    AlreadyRunning,

    /// The sink was lost with a panicked worker
    #[error("No sink available; it was lost when the worker terminated abnormally")]
    SinkUnavailable,
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, TraceError>;

impl From<config::ConfigError> for TraceError {
    fn from(err: config::ConfigError) -> Self {
        TraceError::Config(err.to_string())
    }
}
