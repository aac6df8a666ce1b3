// src/observability/mod.rs
//! Logging and metrics
//!
//! The collector logs through `tracing` and reports counters through
//! `metrics`. Neither a subscriber nor a metrics recorder is installed
//! implicitly; hosts either bring their own or call [`init_tracing`].

use crate::utils::config::LogConfig;
use tracing_subscriber::EnvFilter;

/// Counter: events accepted by the queue
pub const EVENTS_ENQUEUED: &str = "simtrace_events_enqueued_total";

/// Counter: events handed to a sink handler
pub const EVENTS_DISPATCHED: &str = "simtrace_events_dispatched_total";

/// Counter: events skipped because their kind is not recognized
pub const EVENTS_SKIPPED: &str = "simtrace_events_skipped_total";

/// Counter: batches dispatched
pub const BATCHES: &str = "simtrace_batches_total";

/// Histogram: events per batch
pub const BATCH_SIZE: &str = "simtrace_batch_size";

/// Install a global `tracing` subscriber.
///
/// `RUST_LOG` takes precedence over `config.filter`. Returns `false` when a
/// global subscriber was already set, in which case nothing changes.
pub fn init_tracing(config: &LogConfig) -> bool {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.filter))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_thread_names(true)
        .with_target(true);

    let result = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };

    result.is_ok()
}
