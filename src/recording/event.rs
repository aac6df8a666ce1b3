// src/recording/event.rs
//! Trace event model
//!
//! Each [`TraceEvent`] variant carries the subject id plus exactly the
//! payload its kind defines. Text is owned by the event and released when
//! the event is dropped after dispatch.

use crate::recording::clock::{RealTime, SimTime};
use crate::recording::id::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a trace event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    ModuleCreated,
    ProcessCreated,
    PortCreated,
    EventCreated,
    ChannelCreated,
    ModulePhaseStarted,
    ModulePhaseFinished,
    ProcessStart,
    ProcessYield,
    EventNotifyImmediate,
    EventNotifyDelta,
    EventNotifyTimed,
    EventCancel,
    ChannelUpdateStart,
    ChannelUpdateComplete,
}

impl EventKind {
    /// All kinds, in tag order
    pub const ALL: [EventKind; 15] = [
        EventKind::ModuleCreated,
        EventKind::ProcessCreated,
        EventKind::PortCreated,
        EventKind::EventCreated,
        EventKind::ChannelCreated,
        EventKind::ModulePhaseStarted,
        EventKind::ModulePhaseFinished,
        EventKind::ProcessStart,
        EventKind::ProcessYield,
        EventKind::EventNotifyImmediate,
        EventKind::EventNotifyDelta,
        EventKind::EventNotifyTimed,
        EventKind::EventCancel,
        EventKind::ChannelUpdateStart,
        EventKind::ChannelUpdateComplete,
    ];

    /// Stable numeric tag used by kernel bindings
    pub fn as_raw(self) -> u32 {
        self as u32
    }

    /// Decode a numeric tag; `None` for tags this version does not know
    pub fn from_raw(raw: u32) -> Option<Self> {
        Self::ALL.get(raw as usize).copied()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::ModuleCreated => "module_created",
            EventKind::ProcessCreated => "process_created",
            EventKind::PortCreated => "port_created",
            EventKind::EventCreated => "event_created",
            EventKind::ChannelCreated => "channel_created",
            EventKind::ModulePhaseStarted => "module_phase_started",
            EventKind::ModulePhaseFinished => "module_phase_finished",
            EventKind::ProcessStart => "process_start",
            EventKind::ProcessYield => "process_yield",
            EventKind::EventNotifyImmediate => "event_notify_immediate",
            EventKind::EventNotifyDelta => "event_notify_delta",
            EventKind::EventNotifyTimed => "event_notify_timed",
            EventKind::EventCancel => "event_cancel",
            EventKind::ChannelUpdateStart => "channel_update_start",
            EventKind::ChannelUpdateComplete => "channel_update_complete",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scheduling flavor of a simulation process
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessKind {
    Method,
    Thread,
    #[serde(rename = "CTHREAD")]
    CThread,
}

impl ProcessKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ProcessKind::Method => "METHOD",
            ProcessKind::Thread => "THREAD",
            ProcessKind::CThread => "CTHREAD",
        }
    }
}

impl fmt::Display for ProcessKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Elaboration / startup phase of a module
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ModulePhase {
    Construction,
    BeforeEndOfElaboration,
    EndOfElaboration,
    StartOfSimulation,
}

impl ModulePhase {
    pub fn as_str(self) -> &'static str {
        match self {
            ModulePhase::Construction => "CONSTRUCTION",
            ModulePhase::BeforeEndOfElaboration => "BEFORE_END_OF_ELABORATION",
            ModulePhase::EndOfElaboration => "END_OF_ELABORATION",
            ModulePhase::StartOfSimulation => "START_OF_SIMULATION",
        }
    }
}

impl fmt::Display for ModulePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A recorded kernel event
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    ModuleCreated {
        subject: ObjectId,
        name: String,
        type_name: String,
    },
    ProcessCreated {
        subject: ObjectId,
        name: String,
        process_kind: ProcessKind,
    },
    PortCreated {
        subject: ObjectId,
        name: String,
    },
    EventCreated {
        subject: ObjectId,
        name: String,
    },
    ChannelCreated {
        subject: ObjectId,
        name: String,
        type_name: String,
    },
    ModulePhaseStarted {
        subject: ObjectId,
        phase: ModulePhase,
        real_time: RealTime,
    },
    ModulePhaseFinished {
        subject: ObjectId,
        phase: ModulePhase,
        real_time: RealTime,
    },
    ProcessStart {
        subject: ObjectId,
        real_time: RealTime,
        sim_time: SimTime,
    },
    ProcessYield {
        subject: ObjectId,
        real_time: RealTime,
        sim_time: SimTime,
    },
    EventNotifyImmediate {
        subject: ObjectId,
        real_time: RealTime,
        sim_time: SimTime,
    },
    EventNotifyDelta {
        subject: ObjectId,
        real_time: RealTime,
        sim_time: SimTime,
    },
    EventNotifyTimed {
        subject: ObjectId,
        real_time: RealTime,
        sim_time: SimTime,
        delay: SimTime,
    },
    EventCancel {
        subject: ObjectId,
        real_time: RealTime,
        sim_time: SimTime,
    },
    ChannelUpdateStart {
        subject: ObjectId,
        real_time: RealTime,
        sim_time: SimTime,
    },
    ChannelUpdateComplete {
        subject: ObjectId,
        real_time: RealTime,
        sim_time: SimTime,
    },
    /// Event produced by a newer kernel binding; never dispatched
    Unrecognized { subject: ObjectId, raw_kind: u32 },
}

impl TraceEvent {
    /// Kind of this event; `None` for [`TraceEvent::Unrecognized`]
    pub fn kind(&self) -> Option<EventKind> {
        let kind = match self {
            TraceEvent::ModuleCreated { .. } => EventKind::ModuleCreated,
            TraceEvent::ProcessCreated { .. } => EventKind::ProcessCreated,
            TraceEvent::PortCreated { .. } => EventKind::PortCreated,
            TraceEvent::EventCreated { .. } => EventKind::EventCreated,
            TraceEvent::ChannelCreated { .. } => EventKind::ChannelCreated,
            TraceEvent::ModulePhaseStarted { .. } => EventKind::ModulePhaseStarted,
            TraceEvent::ModulePhaseFinished { .. } => EventKind::ModulePhaseFinished,
            TraceEvent::ProcessStart { .. } => EventKind::ProcessStart,
            TraceEvent::ProcessYield { .. } => EventKind::ProcessYield,
            TraceEvent::EventNotifyImmediate { .. } => EventKind::EventNotifyImmediate,
            TraceEvent::EventNotifyDelta { .. } => EventKind::EventNotifyDelta,
            TraceEvent::EventNotifyTimed { .. } => EventKind::EventNotifyTimed,
            TraceEvent::EventCancel { .. } => EventKind::EventCancel,
            TraceEvent::ChannelUpdateStart { .. } => EventKind::ChannelUpdateStart,
            TraceEvent::ChannelUpdateComplete { .. } => EventKind::ChannelUpdateComplete,
            TraceEvent::Unrecognized { .. } => return None,
        };
        Some(kind)
    }

    /// Id of the entity this event is about
    pub fn subject(&self) -> ObjectId {
        match self {
            TraceEvent::ModuleCreated { subject, .. }
            | TraceEvent::ProcessCreated { subject, .. }
            | TraceEvent::PortCreated { subject, .. }
            | TraceEvent::EventCreated { subject, .. }
            | TraceEvent::ChannelCreated { subject, .. }
            | TraceEvent::ModulePhaseStarted { subject, .. }
            | TraceEvent::ModulePhaseFinished { subject, .. }
            | TraceEvent::ProcessStart { subject, .. }
            | TraceEvent::ProcessYield { subject, .. }
            | TraceEvent::EventNotifyImmediate { subject, .. }
            | TraceEvent::EventNotifyDelta { subject, .. }
            | TraceEvent::EventNotifyTimed { subject, .. }
            | TraceEvent::EventCancel { subject, .. }
            | TraceEvent::ChannelUpdateStart { subject, .. }
            | TraceEvent::ChannelUpdateComplete { subject, .. }
            | TraceEvent::Unrecognized { subject, .. } => *subject,
        }
    }

    /// Build the timestamp-only event for `kind`.
    ///
    /// Returns `None` for kinds whose payload is not `(real, sim)`.
    pub fn timed(
        kind: EventKind,
        subject: ObjectId,
        real_time: RealTime,
        sim_time: SimTime,
    ) -> Option<Self> {
        let event = match kind {
            EventKind::ProcessStart => TraceEvent::ProcessStart {
                subject,
                real_time,
                sim_time,
            },
            EventKind::ProcessYield => TraceEvent::ProcessYield {
                subject,
                real_time,
                sim_time,
            },
            EventKind::EventNotifyImmediate => TraceEvent::EventNotifyImmediate {
                subject,
                real_time,
                sim_time,
            },
            EventKind::EventNotifyDelta => TraceEvent::EventNotifyDelta {
                subject,
                real_time,
                sim_time,
            },
            EventKind::EventCancel => TraceEvent::EventCancel {
                subject,
                real_time,
                sim_time,
            },
            EventKind::ChannelUpdateStart => TraceEvent::ChannelUpdateStart {
                subject,
                real_time,
                sim_time,
            },
            EventKind::ChannelUpdateComplete => TraceEvent::ChannelUpdateComplete {
                subject,
                real_time,
                sim_time,
            },
            _ => return None,
        };
        Some(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn id(raw: u64) -> ObjectId {
        ObjectId::from_raw(raw)
    }

    #[test]
    fn test_raw_tags_are_stable() {
        for (index, kind) in EventKind::ALL.iter().enumerate() {
            assert_eq!(kind.as_raw(), index as u32);
            assert_eq!(EventKind::from_raw(index as u32), Some(*kind));
        }
        assert_eq!(EventKind::from_raw(15), None);
        assert_eq!(EventKind::from_raw(u32::MAX), None);
        assert_eq!(EventKind::from_raw(11), Some(EventKind::EventNotifyTimed));
    }

    #[test]
    fn test_enum_names() {
        assert_eq!(ProcessKind::CThread.as_str(), "CTHREAD");
        assert_eq!(ProcessKind::Method.to_string(), "METHOD");
        assert_eq!(
            ModulePhase::BeforeEndOfElaboration.as_str(),
            "BEFORE_END_OF_ELABORATION"
        );
        assert_eq!(EventKind::EventNotifyDelta.to_string(), "event_notify_delta");
    }

    #[test]
    fn test_kind_and_subject() {
        let event = TraceEvent::ChannelCreated {
            subject: id(9),
            name: "fifo".to_string(),
            type_name: "sc_fifo".to_string(),
        };
        assert_eq!(event.kind(), Some(EventKind::ChannelCreated));
        assert_eq!(event.subject(), id(9));

        let unknown = TraceEvent::Unrecognized {
            subject: id(3),
            raw_kind: 99,
        };
        assert_eq!(unknown.kind(), None);
        assert_eq!(unknown.subject(), id(3));
    }

    #[test]
    fn test_timed_constructor() {
        let real = RealTime::from_nanos(10);
        let sim = SimTime::from_picos(20);

        let event = TraceEvent::timed(EventKind::EventCancel, id(1), real, sim).unwrap();
        assert_eq!(
            event,
            TraceEvent::EventCancel {
                subject: id(1),
                real_time: real,
                sim_time: sim
            }
        );

        assert!(TraceEvent::timed(EventKind::PortCreated, id(1), real, sim).is_none());
        assert!(TraceEvent::timed(EventKind::EventNotifyTimed, id(1), real, sim).is_none());
    }

    #[test]
    fn test_serde_shape() {
        let event = TraceEvent::ProcessCreated {
            subject: id(4),
            name: "top.proc".to_string(),
            process_kind: ProcessKind::CThread,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "process_created");
        assert_eq!(json["subject"], 4);
        assert_eq!(json["process_kind"], "CTHREAD");

        let back: TraceEvent = serde_json::from_value(json).unwrap();
        assert_eq!(back, event);
    }
}
