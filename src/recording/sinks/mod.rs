// src/recording/sinks/mod.rs
//! Bundled sink implementations
//!
//! - **LogSink**: forwards every record to `tracing`
//! - **MemorySink**: keeps every protocol call in memory for inspection

pub mod log;
pub mod memory;

pub use self::log::LogSink;
pub use self::memory::{MemorySink, SinkCall, SinkLog};
