// src/recording/mod.rs
//! Event recording
//!
//! This module turns kernel callbacks into batched sink calls:
//!
//! - **Tracer**: producer handle used at simulation call sites
//! - **Event Queue**: mutex + condvar buffer drained by full swaps
//! - **Recorder**: background worker and start/stop lifecycle
//! - **Sink**: protocol the worker dispatches into
//! - **Meta**: run metadata and environment introspection
//!
//! # Architecture
//!
//! ```text
//! kernel callback → Tracer::process_start() → EventQueue (push + notify)
//!                                                  ↓
//!                                    worker: swap whole queue → batch
//!                                                  ↓
//!                          begin_batch(n) → n × handler → end_batch(n)
//!                                                  ↓
//!                                              TraceSink
//! ```

pub mod clock;
pub mod event;
pub mod event_queue;
pub mod id;
pub mod meta;
pub mod recorder;
pub mod sink;
pub mod sinks;
pub mod tracer;

// Re-export commonly used types
pub use clock::{ManualSimClock, MonotonicClock, RealTime, SimClock, SimTime};
pub use event::{EventKind, ModulePhase, ProcessKind, TraceEvent};
pub use event_queue::{Batch, EventQueue, QueueStats};
pub use id::{IdGenerator, LazyObjectId, ObjectId};
pub use meta::{EnvironmentInfo, MetaInfo, SystemEnvironment, UnknownEnvironment};
pub use recorder::{CollectorStats, RecorderStats, TraceCollector};
pub use sink::{dispatch, TraceSink};
pub use sinks::{LogSink, MemorySink, SinkCall, SinkLog};
pub use tracer::Tracer;
