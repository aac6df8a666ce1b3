// src/recording/event_queue.rs
//! Shared event queue
//!
//! A single pending buffer guarded by one mutex and one condition variable.
//! Producers append; the one consumer swaps the whole buffer out in O(1).
//! Since pushes and swaps are serialized by the same lock, batches
//! partition the arrival order without reordering it.
//!
//! The queue is unbounded: a consumer that falls behind lets it grow.

use crate::recording::event::TraceEvent;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU64, Ordering};

struct QueueState {
    /// Events in arrival order
    pending: Vec<TraceEvent>,

    /// Set by `request_shutdown`, cleared by `reopen`
    shutdown: bool,
}

/// Events taken from the queue in one swap
#[derive(Debug)]
pub struct Batch {
    /// Events in arrival order
    pub events: Vec<TraceEvent>,

    /// Shutdown had been requested when the batch was taken
    pub shutdown: bool,
}

/// Mutex + condvar event queue
pub struct EventQueue {
    state: Mutex<QueueState>,
    ready: Condvar,
    push_count: AtomicU64,
    batch_count: AtomicU64,
}

impl EventQueue {
    /// Create a new event queue reserving room for `capacity` events
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Mutex::new(QueueState {
                pending: Vec::with_capacity(capacity),
                shutdown: false,
            }),
            ready: Condvar::new(),
            push_count: AtomicU64::new(0),
            batch_count: AtomicU64::new(0),
        }
    }

    /// Append an event and wake the consumer
    pub fn push(&self, event: TraceEvent) {
        let mut state = self.state.lock();
        state.pending.push(event);
        self.push_count.fetch_add(1, Ordering::Relaxed);
        self.ready.notify_one();
    }

    /// Block until events are pending or shutdown is requested, then take
    /// everything pending.
    pub fn wait_batch(&self) -> Batch {
        let mut state = self.state.lock();
        while state.pending.is_empty() && !state.shutdown {
            self.ready.wait(&mut state);
        }

        let events = std::mem::take(&mut state.pending);
        if !events.is_empty() {
            self.batch_count.fetch_add(1, Ordering::Relaxed);
        }
        let shutdown = state.shutdown;
        drop(state);

        Batch { events, shutdown }
    }

    /// Take everything pending without blocking
    pub fn try_take(&self) -> Vec<TraceEvent> {
        let mut state = self.state.lock();
        let events = std::mem::take(&mut state.pending);
        if !events.is_empty() {
            self.batch_count.fetch_add(1, Ordering::Relaxed);
        }
        events
    }

    /// Ask the consumer to drain what is pending and exit
    pub fn request_shutdown(&self) {
        self.state.lock().shutdown = true;
        self.ready.notify_all();
    }

    /// Clear a previous shutdown request so a new consumer can attach
    pub fn reopen(&self) {
        self.state.lock().shutdown = false;
    }

    /// Whether shutdown has been requested
    pub fn is_shutdown(&self) -> bool {
        self.state.lock().shutdown
    }

    /// Number of pending events
    pub fn len(&self) -> usize {
        self.state.lock().pending.len()
    }

    /// Check if no events are pending
    pub fn is_empty(&self) -> bool {
        self.state.lock().pending.is_empty()
    }

    /// Get queue statistics
    ///
    /// Counters only change while the state lock is held, so the snapshot
    /// is consistent: `current_size <= push_count` always.
    pub fn stats(&self) -> QueueStats {
        let state = self.state.lock();
        QueueStats {
            push_count: self.push_count.load(Ordering::Relaxed),
            batch_count: self.batch_count.load(Ordering::Relaxed),
            current_size: state.pending.len(),
        }
    }
}

/// Queue statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueueStats {
    /// Total events pushed
    pub push_count: u64,

    /// Total non-empty batches taken
    pub batch_count: u64,

    /// Events currently pending
    pub current_size: usize,
}

impl QueueStats {
    /// Average events per batch taken so far
    pub fn avg_batch_size(&self) -> f64 {
        if self.batch_count == 0 {
            0.0
        } else {
            let taken = self.push_count.saturating_sub(self.current_size as u64);
            taken as f64 / self.batch_count as f64
        }
    }
}
