// src/lib.rs
//! Simtrace: event collection for discrete-event simulation kernels
//!
//! Simulation callbacks (object construction, process scheduling, event
//! notification, channel updates) are recorded on the caller's thread and
//! delivered in batches, in arrival order, to a pluggable sink running on
//! one background thread.
//!
//! # Architecture
//!
//! - **recording**: ids, event model, queue, worker, sink protocol
//! - **observability**: logging setup and metric names
//! - **utils**: configuration and errors
//!
//! # Example
//!
//! ```no_run
//! use simtrace::{CollectorConfig, LogSink, ManualSimClock, TraceCollector};
//! use std::sync::Arc;
//!
//! # fn main() -> simtrace::Result<()> {
//! let mut collector = TraceCollector::new(CollectorConfig::default(), Box::new(LogSink::new()))?;
//! collector.start()?;
//!
//! let tracer = collector.tracer(Arc::new(ManualSimClock::default()));
//! let top = tracer.next_id();
//! tracer.module_created(top, "top", "my_module");
//!
//! collector.stop()?;
//! # Ok(())
//! # }
//! ```

pub mod observability;
pub mod recording;
pub mod utils;

// Re-export commonly used types
pub use recording::{
    EventKind, LogSink, ManualSimClock, MemorySink, MetaInfo, ModulePhase, ObjectId, ProcessKind,
    RealTime, SimClock, SimTime, TraceCollector, TraceEvent, TraceSink, Tracer,
};
pub use utils::config::CollectorConfig;
pub use utils::errors::{Result, TraceError};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const GIT_HASH: &str = env!("GIT_HASH");

/// Library build information
pub struct BuildInfo {
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub rustc_version: &'static str,
}

impl BuildInfo {
    pub fn current() -> Self {
        Self {
            version: VERSION,
            git_hash: GIT_HASH,
            build_timestamp: env!("BUILD_TIMESTAMP"),
            rustc_version: env!("RUSTC_VERSION"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_build_info() {
        let info = BuildInfo::current();
        assert!(!info.version.is_empty());
        assert!(!info.git_hash.is_empty());
    }
}
