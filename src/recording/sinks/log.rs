// src/recording/sinks/log.rs
//! Sink that writes every record to `tracing`
//!
//! Elaboration records (creation, phases, metadata) are logged at `info`,
//! scheduling records at `debug`, all under the `simtrace::events` target.
//! Handy for watching a run with `RUST_LOG=simtrace::events=debug`.

use crate::recording::clock::{RealTime, SimTime};
use crate::recording::event::{EventKind, ModulePhase, ProcessKind};
use crate::recording::id::ObjectId;
use crate::recording::meta::MetaInfo;
use crate::recording::sink::TraceSink;
use tracing::{debug, info};

/// Sink logging through `tracing`
#[derive(Debug, Default)]
pub struct LogSink {
    events_logged: u64,
    batches_logged: u64,
}

impl LogSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Handler calls seen so far
    pub fn events_logged(&self) -> u64 {
        self.events_logged
    }

    /// Batches seen so far
    pub fn batches_logged(&self) -> u64 {
        self.batches_logged
    }

    fn timed(&mut self, kind: EventKind, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.events_logged += 1;
        debug!(
            target: "simtrace::events",
            kind = kind.as_str(),
            id = id.get(),
            real_ns = real_time.as_nanos(),
            sim_ps = sim_time.as_picos(),
            "{}",
            kind
        );
    }
}

impl TraceSink for LogSink {
    fn deliver_meta(&mut self, meta: &MetaInfo) {
        info!(
            target: "simtrace::events",
            path = %meta.path,
            user = %meta.user,
            version = %meta.version,
            pid = meta.pid,
            created_at = %meta.created_at,
            "trace session metadata"
        );
    }

    fn begin_batch(&mut self, n: usize) {
        debug!(target: "simtrace::events", size = n, "batch begin");
    }

    fn end_batch(&mut self, n: usize) {
        self.batches_logged += 1;
        debug!(target: "simtrace::events", size = n, "batch end");
    }

    fn shutdown(&mut self) {
        info!(
            target: "simtrace::events",
            events = self.events_logged,
            batches = self.batches_logged,
            "trace session finished"
        );
    }

    fn module_created(&mut self, id: ObjectId, name: &str, type_name: &str) {
        self.events_logged += 1;
        info!(target: "simtrace::events", id = id.get(), name, type_name, "module_created");
    }

    fn process_created(&mut self, id: ObjectId, name: &str, kind: ProcessKind) {
        self.events_logged += 1;
        info!(
            target: "simtrace::events",
            id = id.get(),
            name,
            kind = kind.as_str(),
            "process_created"
        );
    }

    fn port_created(&mut self, id: ObjectId, name: &str) {
        self.events_logged += 1;
        info!(target: "simtrace::events", id = id.get(), name, "port_created");
    }

    fn event_created(&mut self, id: ObjectId, name: &str) {
        self.events_logged += 1;
        info!(target: "simtrace::events", id = id.get(), name, "event_created");
    }

    fn channel_created(&mut self, id: ObjectId, name: &str, type_name: &str) {
        self.events_logged += 1;
        info!(target: "simtrace::events", id = id.get(), name, type_name, "channel_created");
    }

    fn module_phase_started(&mut self, id: ObjectId, phase: ModulePhase, real_time: RealTime) {
        self.events_logged += 1;
        info!(
            target: "simtrace::events",
            id = id.get(),
            phase = phase.as_str(),
            real_ns = real_time.as_nanos(),
            "module_phase_started"
        );
    }

    fn module_phase_finished(&mut self, id: ObjectId, phase: ModulePhase, real_time: RealTime) {
        self.events_logged += 1;
        info!(
            target: "simtrace::events",
            id = id.get(),
            phase = phase.as_str(),
            real_ns = real_time.as_nanos(),
            "module_phase_finished"
        );
    }

    fn process_start(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.timed(EventKind::ProcessStart, id, real_time, sim_time);
    }

    fn process_yield(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.timed(EventKind::ProcessYield, id, real_time, sim_time);
    }

    fn event_notify_immediate(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.timed(EventKind::EventNotifyImmediate, id, real_time, sim_time);
    }

    fn event_notify_delta(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.timed(EventKind::EventNotifyDelta, id, real_time, sim_time);
    }

    fn event_notify_timed(
        &mut self,
        id: ObjectId,
        real_time: RealTime,
        sim_time: SimTime,
        delay: SimTime,
    ) {
        self.events_logged += 1;
        debug!(
            target: "simtrace::events",
            id = id.get(),
            real_ns = real_time.as_nanos(),
            sim_ps = sim_time.as_picos(),
            delay_ps = delay.as_picos(),
            "event_notify_timed"
        );
    }

    fn event_cancel(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.timed(EventKind::EventCancel, id, real_time, sim_time);
    }

    fn channel_update_start(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.timed(EventKind::ChannelUpdateStart, id, real_time, sim_time);
    }

    fn channel_update_complete(&mut self, id: ObjectId, real_time: RealTime, sim_time: SimTime) {
        self.timed(EventKind::ChannelUpdateComplete, id, real_time, sim_time);
    }
}
