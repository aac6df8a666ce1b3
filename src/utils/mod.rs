// src/utils/mod.rs
//! Common utilities: error types and configuration

pub mod config;
pub mod errors;

pub use config::{CollectorConfig, LogConfig};
pub use errors::{Result, TraceError};
