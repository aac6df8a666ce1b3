// src/recording/sink.rs
//! Sink protocol
//!
//! A [`TraceSink`] is the backend the worker thread feeds. Per session the
//! worker calls, in order:
//!
//! ```text
//! init → deliver_meta → (begin_batch(n) → n × handler → end_batch(n))* → shutdown
//! ```
//!
//! Handlers return nothing. Whatever a backend does on failure is its own
//! business; the worker always moves on to the next event.

use crate::recording::clock::{RealTime, SimTime};
use crate::recording::event::{ModulePhase, ProcessKind, TraceEvent};
use crate::recording::id::ObjectId;
use crate::recording::meta::MetaInfo;
use tracing::warn;

/// Consumer of dispatched trace events
pub trait TraceSink: Send {
    /// Backend setup, called once per session before `deliver_meta`
    fn init(&mut self) {}

    /// Run metadata, called once per session before the first batch
    fn deliver_meta(&mut self, meta: &MetaInfo);

    /// A batch of `n` events follows
    fn begin_batch(&mut self, n: usize);

    /// The batch of `n` events announced by `begin_batch` is complete
    fn end_batch(&mut self, n: usize);

    /// Called once after the final batch of a session
    fn shutdown(&mut self) {}

    fn module_created(&mut self, id: ObjectId, name: &str, type_name: &str);

    fn process_created(&mut self, id: ObjectId, name: &str, kind: ProcessKind);

    fn port_created(&mut self, id: ObjectId, name: &str);

    fn event_created(&mut self, id: ObjectId, name: &str);

    fn channel_created(&mut self, id: ObjectId, name: &str, type_name: &str);

    fn module_phase_started(&mut self, id: ObjectId, phase: ModulePhase, real_time: RealTime);

    fn module_phase_finished(&mut self, id: ObjectId, phase: ModulePhase, real_time: RealTime);

    fn process_start(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime);

    fn process_yield(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime);

    fn event_notify_immediate(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime);

    fn event_notify_delta(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime);

    fn event_notify_timed(
        &mut self,
        id: ObjectId,
        real_time: RealTime,
        sim_time: SimTime,
        delay: SimTime,
    );

    fn event_cancel(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime);

    fn channel_update_start(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime);

    fn channel_update_complete(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime);
}

impl<S: TraceSink + ?Sized> TraceSink for Box<S> {
    fn init(&mut self) {
        (**self).init()
    }

    fn deliver_meta(&mut self, meta: &MetaInfo) {
        (**self).deliver_meta(meta)
    }

    fn begin_batch(&mut self, n: usize) {
        (**self).begin_batch(n)
    }

    fn end_batch(&mut self, n: usize) {
        (**self).end_batch(n)
    }

    fn shutdown(&mut self) {
        (**self).shutdown()
    }

    fn module_created(&mut self, id: ObjectId, name: &str, type_name: &str) {
        (**self).module_created(id, name, type_name)
    }

    fn process_created(&mut self, id: ObjectId, name: &str, kind: ProcessKind) {
        (**self).process_created(id, name, kind)
    }

    fn port_created(&mut self, id: ObjectId, name: &str) {
        (**self).port_created(id, name)
    }

    fn event_created(&mut self, id: ObjectId, name: &str) {
        (**self).event_created(id, name)
    }

    fn channel_created(&mut self, id: ObjectId, name: &str, type_name: &str) {
        (**self).channel_created(id, name, type_name)
    }

    fn module_phase_started(&mut self, id: ObjectId, phase: ModulePhase, real_time: RealTime) {
        (**self).module_phase_started(id, phase, real_time)
    }

    fn module_phase_finished(&mut self, id: ObjectId, phase: ModulePhase, real_time: RealTime) {
        (**self).module_phase_finished(id, phase, real_time)
    }

    fn process_start(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        (**self).process_start(id, real_time, sim_time)
    }

    fn process_yield(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        (**self).process_yield(id, real_time, sim_time)
    }

    fn event_notify_immediate(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        (**self).event_notify_immediate(id, real_time, sim_time)
    }

    fn event_notify_delta(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        (**self).event_notify_delta(id, real_time, sim_time)
    }

    fn event_notify_timed(
        &mut self,
        id: ObjectId,
        real_time: RealTime,
        sim_time: SimTime,
        delay: SimTime,
    ) {
        (**self).event_notify_timed(id, real_time, sim_time, delay)
    }

    fn event_cancel(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        (**self).event_cancel(id, real_time, sim_time)
    }

    fn channel_update_start(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        (**self).channel_update_start(id, real_time, sim_time)
    }

    fn channel_update_complete(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        (**self).channel_update_complete(id, real_time, sim_time)
    }
}

/// Hand one event to its handler, consuming it.
///
/// Owned text lives until the handler returns and is dropped right after.
/// Returns `false` when the event was skipped because its kind is unknown.
pub fn dispatch<S: TraceSink + ?Sized>(sink: &mut S, event: TraceEvent) -> bool {
    match event {
        TraceEvent::ModuleCreated {
            subject,
            name,
            type_name,
        } => sink.module_created(subject, &name, &type_name),
        TraceEvent::ProcessCreated {
            subject,
            name,
            process_kind,
        } => sink.process_created(subject, &name, process_kind),
        TraceEvent::PortCreated { subject, name } => sink.port_created(subject, &name),
        TraceEvent::EventCreated { subject, name } => sink.event_created(subject, &name),
        TraceEvent::ChannelCreated {
            subject,
            name,
            type_name,
        } => sink.channel_created(subject, &name, &type_name),
        TraceEvent::ModulePhaseStarted {
            subject,
            phase,
            real_time,
        } => sink.module_phase_started(subject, phase, real_time),
        TraceEvent::ModulePhaseFinished {
            subject,
            phase,
            real_time,
        } => sink.module_phase_finished(subject, phase, real_time),
        TraceEvent::ProcessStart {
            subject,
            real_time,
            sim_time,
        } => sink.process_start(subject, real_time, sim_time),
        TraceEvent::ProcessYield {
            subject,
            real_time,
            sim_time,
        } => sink.process_yield(subject, real_time, sim_time),
        TraceEvent::EventNotifyImmediate {
            subject,
            real_time,
            sim_time,
        } => sink.event_notify_immediate(subject, real_time, sim_time),
        TraceEvent::EventNotifyDelta {
            subject,
            real_time,
            sim_time,
        } => sink.event_notify_delta(subject, real_time, sim_time),
        TraceEvent::EventNotifyTimed {
            subject,
            real_time,
            sim_time,
            delay,
        } => sink.event_notify_timed(subject, real_time, sim_time, delay),
        TraceEvent::EventCancel {
            subject,
            real_time,
            sim_time,
        } => sink.event_cancel(subject, real_time, sim_time),
        TraceEvent::ChannelUpdateStart {
            subject,
            real_time,
            sim_time,
        } => sink.channel_update_start(subject, real_time, sim_time),
        TraceEvent::ChannelUpdateComplete {
            subject,
            real_time,
            sim_time,
        } => sink.channel_update_complete(subject, real_time, sim_time),
        TraceEvent::Unrecognized { subject, raw_kind } => {
            warn!(
                raw_kind,
                subject = subject.get(),
                "ignoring trace event of unknown kind {}",
                raw_kind
            );
            return false;
        }
    }

    true
}
