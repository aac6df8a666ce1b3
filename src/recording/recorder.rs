// src/recording/recorder.rs
//! Trace collector: background worker and lifecycle
//!
//! The collector owns the shared queue and a single worker thread. The
//! worker waits for events, swaps the queue contents into a private batch
//! and hands every event to the sink in arrival order, without holding the
//! queue lock.
//!
//! `stop()` requests shutdown and joins the worker. The worker always takes
//! one last batch after shutdown is requested, so everything enqueued
//! before `stop()` reaches the sink before `stop()` returns.

use crate::observability;
use crate::recording::clock::{MonotonicClock, SimClock};
use crate::recording::event::TraceEvent;
use crate::recording::event_queue::{Batch, EventQueue, QueueStats};
use crate::recording::id::IdGenerator;
use crate::recording::meta::{EnvironmentInfo, MetaInfo, SystemEnvironment};
use crate::recording::sink::{dispatch, TraceSink};
use crate::recording::tracer::Tracer;
use crate::utils::config::CollectorConfig;
use crate::utils::errors::{Result, TraceError};
use crate::BuildInfo;
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info};

/// Trace collector
pub struct TraceCollector {
    config: CollectorConfig,
    queue: Arc<EventQueue>,
    ids: Arc<IdGenerator>,
    clock: Arc<MonotonicClock>,
    environment: Arc<dyn EnvironmentInfo>,
    stats: Arc<CollectorStats>,
    sink: Option<Box<dyn TraceSink>>,
    worker: Option<JoinHandle<Box<dyn TraceSink>>>,
}

impl TraceCollector {
    /// Create a stopped collector using the host environment
    pub fn new(config: CollectorConfig, sink: Box<dyn TraceSink>) -> Result<Self> {
        Self::with_environment(config, sink, Arc::new(SystemEnvironment::default()))
    }

    /// Create a stopped collector with an explicit environment provider
    pub fn with_environment(
        config: CollectorConfig,
        sink: Box<dyn TraceSink>,
        environment: Arc<dyn EnvironmentInfo>,
    ) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            queue: Arc::new(EventQueue::new(config.initial_queue_capacity)),
            ids: Arc::new(IdGenerator::new()),
            clock: Arc::new(MonotonicClock::new()),
            environment,
            stats: Arc::new(CollectorStats::default()),
            sink: Some(sink),
            worker: None,
            config,
        })
    }

    /// Start the background worker
    pub fn start(&mut self) -> Result<()> {
        if self.worker.is_some() {
            return Err(TraceError::AlreadyRunning);
        }

        let sink = self.sink.take().ok_or(TraceError::SinkUnavailable)?;

        let build = BuildInfo::current();
        info!(
            version = build.version,
            git_hash = build.git_hash,
            thread = %self.config.worker_thread_name,
            "Starting trace collector"
        );

        self.queue.reopen();

        let worker = CollectorWorker {
            queue: Arc::clone(&self.queue),
            environment: Arc::clone(&self.environment),
            stats: Arc::clone(&self.stats),
            version: self.config.component_version.clone(),
        };

        let handle = thread::Builder::new()
            .name(self.config.worker_thread_name.clone())
            .spawn(move || worker.run(sink))
            .map_err(|e| TraceError::WorkerSpawnFailed(e.to_string()))?;

        self.worker = Some(handle);
        Ok(())
    }

    /// Stop the worker after it drained everything already enqueued.
    ///
    /// Blocks until the worker has exited. Calling `stop()` on a stopped
    /// collector does nothing.
    pub fn stop(&mut self) -> Result<()> {
        let Some(handle) = self.worker.take() else {
            return Ok(());
        };

        info!("Stopping trace collector");
        self.queue.request_shutdown();

        match handle.join() {
            Ok(sink) => {
                self.sink = Some(sink);
                let stats = self.stats.snapshot();
                info!(
                    events = stats.events_dispatched,
                    skipped = stats.events_skipped,
                    batches = stats.batches,
                    "Trace collector stopped"
                );
                Ok(())
            }
            Err(panic) => Err(TraceError::WorkerPanicked(panic_message(&*panic))),
        }
    }

    /// Whether the worker is running.
    ///
    /// A worker that died from a sink panic reports `false`; `stop()` still
    /// has to be called to collect the panic.
    pub fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Producer handle bound to this collector's queue
    pub fn tracer(&self, sim_clock: Arc<dyn SimClock>) -> Tracer {
        Tracer::new(
            Arc::clone(&self.queue),
            Arc::clone(&self.ids),
            Arc::clone(&self.clock),
            sim_clock,
        )
    }

    /// Identifier generator shared by every tracer of this collector
    pub fn ids(&self) -> &Arc<IdGenerator> {
        &self.ids
    }

    /// Enqueue an event directly
    pub fn record(&self, event: TraceEvent) {
        self.queue.push(event);
        metrics::counter!(observability::EVENTS_ENQUEUED).increment(1);
    }

    /// Collector statistics
    pub fn stats(&self) -> RecorderStats {
        self.stats.snapshot()
    }

    /// Queue statistics
    pub fn queue_stats(&self) -> QueueStats {
        self.queue.stats()
    }

    /// Stop and hand back the sink
    pub fn into_sink(mut self) -> Result<Box<dyn TraceSink>> {
        self.stop()?;
        self.sink.take().ok_or(TraceError::SinkUnavailable)
    }
}

impl Drop for TraceCollector {
    fn drop(&mut self) {
        if let Err(e) = self.stop() {
            error!("Failed to stop trace collector: {}", e);
        }
    }
}

/// State moved onto the worker thread
struct CollectorWorker {
    queue: Arc<EventQueue>,
    environment: Arc<dyn EnvironmentInfo>,
    stats: Arc<CollectorStats>,
    version: String,
}

impl CollectorWorker {
    fn run(self, mut sink: Box<dyn TraceSink>) -> Box<dyn TraceSink> {
        sink.init();

        let meta = MetaInfo::capture(self.environment.as_ref(), &self.version);
        debug!(path = %meta.path, user = %meta.user, pid = meta.pid, "Captured trace metadata");
        sink.deliver_meta(&meta);

        loop {
            let Batch { events, shutdown } = self.queue.wait_batch();

            if !events.is_empty() {
                self.process_batch(&mut *sink, events);
            }

            if shutdown {
                break;
            }
        }

        sink.shutdown();
        sink
    }

    fn process_batch(&self, sink: &mut dyn TraceSink, events: Vec<TraceEvent>) {
        let size = events.len();
        let start = Instant::now();

        sink.begin_batch(size);

        let mut skipped = 0u64;
        for event in events {
            if !dispatch(sink, event) {
                skipped += 1;
            }
        }

        sink.end_batch(size);

        let dispatched = size as u64 - skipped;
        self.stats.record_batch(size, dispatched, skipped);

        metrics::counter!(observability::BATCHES).increment(1);
        metrics::counter!(observability::EVENTS_DISPATCHED).increment(dispatched);
        metrics::counter!(observability::EVENTS_SKIPPED).increment(skipped);
        metrics::histogram!(observability::BATCH_SIZE).record(size as f64);

        debug!("Dispatched batch of {} events in {:?}", size, start.elapsed());
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// Counters updated by the worker
#[derive(Debug, Default)]
pub struct CollectorStats {
    events_dispatched: AtomicU64,
    events_skipped: AtomicU64,
    batches: AtomicU64,
    largest_batch: AtomicU64,
}

impl CollectorStats {
    fn record_batch(&self, size: usize, dispatched: u64, skipped: u64) {
        self.events_dispatched.fetch_add(dispatched, Ordering::Relaxed);
        self.events_skipped.fetch_add(skipped, Ordering::Relaxed);
        self.batches.fetch_add(1, Ordering::Relaxed);
        self.largest_batch.fetch_max(size as u64, Ordering::Relaxed);
    }

    fn snapshot(&self) -> RecorderStats {
        RecorderStats {
            events_dispatched: self.events_dispatched.load(Ordering::Relaxed),
            events_skipped: self.events_skipped.load(Ordering::Relaxed),
            batches: self.batches.load(Ordering::Relaxed),
            largest_batch: self.largest_batch.load(Ordering::Relaxed),
        }
    }
}

/// Collector statistics snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecorderStats {
    pub events_dispatched: u64,
    pub events_skipped: u64,
    pub batches: u64,
    pub largest_batch: u64,
}

impl RecorderStats {
    pub fn avg_batch_size(&self) -> f64 {
        if self.batches == 0 {
            0.0
        } else {
            (self.events_dispatched + self.events_skipped) as f64 / self.batches as f64
        }
    }
}
