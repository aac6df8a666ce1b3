// src/recording/sinks/memory.rs
//! In-memory sink
//!
//! Records every protocol call as a [`SinkCall`]. The shared [`SinkLog`]
//! stays readable from other threads while the sink lives on the worker.

use crate::recording::clock::{RealTime, SimTime};
use crate::recording::event::{ModulePhase, ProcessKind, TraceEvent};
use crate::recording::id::ObjectId;
use crate::recording::meta::MetaInfo;
use crate::recording::sink::TraceSink;
use parking_lot::Mutex;
use std::sync::Arc;

/// One call made on a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Init,
    Meta(MetaInfo),
    BeginBatch(usize),
    EndBatch(usize),
    /// A handler call, rebuilt into the event it was dispatched from
    Event(TraceEvent),
    Shutdown,
}

/// Shared view of the calls a [`MemorySink`] received
#[derive(Debug, Clone, Default)]
pub struct SinkLog {
    calls: Arc<Mutex<Vec<SinkCall>>>,
}

impl SinkLog {
    /// Every call so far, in order
    pub fn calls(&self) -> Vec<SinkCall> {
        self.calls.lock().clone()
    }

    /// Handler calls only, in dispatch order
    pub fn events(&self) -> Vec<TraceEvent> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                SinkCall::Event(event) => Some(event.clone()),
                _ => None,
            })
            .collect()
    }

    /// Sizes passed to `begin_batch`, in order
    pub fn batch_sizes(&self) -> Vec<usize> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                SinkCall::BeginBatch(n) => Some(*n),
                _ => None,
            })
            .collect()
    }

    /// Metadata records delivered so far
    pub fn metas(&self) -> Vec<MetaInfo> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                SinkCall::Meta(meta) => Some(meta.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.calls.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.calls.lock().is_empty()
    }

    pub fn clear(&self) {
        self.calls.lock().clear();
    }

    fn push(&self, call: SinkCall) {
        self.calls.lock().push(call);
    }
}

/// Sink that records every call in memory
#[derive(Debug, Default)]
pub struct MemorySink {
    log: SinkLog,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handle on the recorded calls
    pub fn log(&self) -> SinkLog {
        self.log.clone()
    }

    fn event(&self, event: TraceEvent) {
        self.log.push(SinkCall::Event(event));
    }
}

impl TraceSink for MemorySink {
    fn init(&mut self) {
        self.log.push(SinkCall::Init);
    }

    fn deliver_meta(&mut self, meta: &MetaInfo) {
        self.log.push(SinkCall::Meta(meta.clone()));
    }

    fn begin_batch(&mut self, n: usize) {
        self.log.push(SinkCall::BeginBatch(n));
    }

    fn end_batch(&mut self, n: usize) {
        self.log.push(SinkCall::EndBatch(n));
    }

    fn shutdown(&mut self) {
        self.log.push(SinkCall::Shutdown);
    }

    fn module_created(&mut self, id: ObjectId, name: &str, type_name: &str) {
        self.event(TraceEvent::ModuleCreated {
            subject: id,
            name: name.to_string(),
            type_name: type_name.to_string(),
        });
    }

    fn process_created(&mut self, id: ObjectId, name: &str, kind: ProcessKind) {
        self.event(TraceEvent::ProcessCreated {
            subject: id,
            name: name.to_string(),
            process_kind: kind,
        });
    }

    fn port_created(&mut self, id: ObjectId, name: &str) {
        self.event(TraceEvent::PortCreated {
            subject: id,
            name: name.to_string(),
        });
    }

    fn event_created(&mut self, id: ObjectId, name: &str) {
        self.event(TraceEvent::EventCreated {
            subject: id,
            name: name.to_string(),
        });
    }

    fn channel_created(&mut self, id: ObjectId, name: &str, type_name: &str) {
        self.event(TraceEvent::ChannelCreated {
            subject: id,
            name: name.to_string(),
            type_name: type_name.to_string(),
        });
    }

    fn module_phase_started(&mut self, id: ObjectId, phase: ModulePhase, real_time: RealTime) {
        self.event(TraceEvent::ModulePhaseStarted {
            subject: id,
            phase,
            real_time,
        });
    }

    fn module_phase_finished(&mut self, id: ObjectId, phase: ModulePhase, real_time: RealTime) {
        self.event(TraceEvent::ModulePhaseFinished {
            subject: id,
            phase,
            real_time,
        });
    }

    fn process_start(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.event(TraceEvent::ProcessStart {
            subject: id,
            real_time,
            sim_time,
        });
    }

    fn process_yield(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.event(TraceEvent::ProcessYield {
            subject: id,
            real_time,
            sim_time,
        });
    }

    fn event_notify_immediate(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.event(TraceEvent::EventNotifyImmediate {
            subject: id,
            real_time,
            sim_time,
        });
    }

    fn event_notify_delta(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.event(TraceEvent::EventNotifyDelta {
            subject: id,
            real_time,
            sim_time,
        });
    }

    fn event_notify_timed(
        &mut self,
        id: ObjectId,
        real_time: RealTime,
        sim_time: SimTime,
        delay: SimTime,
    ) {
        self.event(TraceEvent::EventNotifyTimed {
            subject: id,
            real_time,
            sim_time,
            delay,
        });
    }

    fn event_cancel(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.event(TraceEvent::EventCancel {
            subject: id,
            real_time,
            sim_time,
        });
    }

    fn channel_update_start(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.event(TraceEvent::ChannelUpdateStart {
            subject: id,
            real_time,
            sim_time,
        });
    }

    fn channel_update_complete(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.event(TraceEvent::ChannelUpdateComplete {
            subject: id,
            real_time,
            sim_time,
        });
    }
}
