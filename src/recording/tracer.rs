// src/recording/tracer.rs
//! Producer API
//!
//! A [`Tracer`] is the handle simulation call sites use to record events.
//! It is cheap to clone and safe to share between kernel threads. Every
//! method stamps the event, moves it into the collector's queue and
//! returns; none of them wait for the worker.

use crate::observability;
use crate::recording::clock::{MonotonicClock, RealTime, SimClock, SimTime};
use crate::recording::event::{EventKind, ModulePhase, ProcessKind, TraceEvent};
use crate::recording::event_queue::EventQueue;
use crate::recording::id::{IdGenerator, LazyObjectId, ObjectId};
use std::sync::Arc;

struct TracerInner {
    queue: Arc<EventQueue>,
    ids: Arc<IdGenerator>,
    clock: Arc<MonotonicClock>,
    sim_clock: Arc<dyn SimClock>,
}

/// Handle for recording kernel events
#[derive(Clone)]
pub struct Tracer {
    inner: Arc<TracerInner>,
}

impl Tracer {
    pub(crate) fn new(
        queue: Arc<EventQueue>,
        ids: Arc<IdGenerator>,
        clock: Arc<MonotonicClock>,
        sim_clock: Arc<dyn SimClock>,
    ) -> Self {
        Self {
            inner: Arc::new(TracerInner {
                queue,
                ids,
                clock,
                sim_clock,
            }),
        }
    }

    /// Issue a fresh object id
    pub fn next_id(&self) -> ObjectId {
        self.inner.ids.next()
    }

    /// Id stored in `slot`, issuing one on first use
    pub fn id_of(&self, slot: &LazyObjectId) -> ObjectId {
        slot.get_or_assign(&self.inner.ids)
    }

    /// Current real time
    pub fn real_time(&self) -> RealTime {
        self.inner.clock.now()
    }

    /// Current simulated time
    pub fn sim_time(&self) -> SimTime {
        self.inner.sim_clock.now()
    }

    /// Enqueue a prebuilt event
    pub fn record(&self, event: TraceEvent) {
        self.inner.queue.push(event);
        metrics::counter!(observability::EVENTS_ENQUEUED).increment(1);
    }

    pub fn module_created(
        &self,
        id: ObjectId,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) {
        self.record(TraceEvent::ModuleCreated {
            subject: id,
            name: name.into(),
            type_name: type_name.into(),
        });
    }

    pub fn process_created(&self, id: ObjectId, name: impl Into<String>, kind: ProcessKind) {
        self.record(TraceEvent::ProcessCreated {
            subject: id,
            name: name.into(),
            process_kind: kind,
        });
    }

    pub fn port_created(&self, id: ObjectId, name: impl Into<String>) {
        self.record(TraceEvent::PortCreated {
            subject: id,
            name: name.into(),
        });
    }

    pub fn event_created(&self, id: ObjectId, name: impl Into<String>) {
        self.record(TraceEvent::EventCreated {
            subject: id,
            name: name.into(),
        });
    }

    pub fn channel_created(
        &self,
        id: ObjectId,
        name: impl Into<String>,
        type_name: impl Into<String>,
    ) {
        self.record(TraceEvent::ChannelCreated {
            subject: id,
            name: name.into(),
            type_name: type_name.into(),
        });
    }

    pub fn module_phase_started(&self, id: ObjectId, phase: ModulePhase) {
        self.record(TraceEvent::ModulePhaseStarted {
            subject: id,
            phase,
            real_time: self.real_time(),
        });
    }

    pub fn module_phase_finished(&self, id: ObjectId, phase: ModulePhase) {
        self.record(TraceEvent::ModulePhaseFinished {
            subject: id,
            phase,
            real_time: self.real_time(),
        });
    }

    pub fn process_start(&self, id: ObjectId) {
        self.record_timed(EventKind::ProcessStart, id);
    }

    pub fn process_yield(&self, id: ObjectId) {
        self.record_timed(EventKind::ProcessYield, id);
    }

    pub fn event_notify_immediate(&self, id: ObjectId) {
        self.record_timed(EventKind::EventNotifyImmediate, id);
    }

    pub fn event_notify_delta(&self, id: ObjectId) {
        self.record_timed(EventKind::EventNotifyDelta, id);
    }

    /// Timed notification; `delay` is relative to the current simulated time
    pub fn event_notify_timed(&self, id: ObjectId, delay: SimTime) {
        self.record(TraceEvent::EventNotifyTimed {
            subject: id,
            real_time: self.real_time(),
            sim_time: self.sim_time(),
            delay,
        });
    }

    pub fn event_cancel(&self, id: ObjectId) {
        self.record_timed(EventKind::EventCancel, id);
    }

    pub fn channel_update_start(&self, id: ObjectId) {
        self.record_timed(EventKind::ChannelUpdateStart, id);
    }

    pub fn channel_update_complete(&self, id: ObjectId) {
        self.record_timed(EventKind::ChannelUpdateComplete, id);
    }

    fn record_timed(&self, kind: EventKind, id: ObjectId) {
        let real_time = self.real_time();
        let sim_time = self.sim_time();
        let event = TraceEvent::timed(kind, id, real_time, sim_time);
        debug_assert!(event.is_some(), "{} has no timed payload", kind);
        if let Some(event) = event {
            self.record(event);
        }
    }
}
