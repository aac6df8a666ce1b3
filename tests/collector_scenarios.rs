// tests/collector_scenarios.rs
//! End-to-end collector behavior: ordering, batching, drain on stop

use proptest::prelude::*;
use simtrace::recording::meta::{UnknownEnvironment, UNKNOWN, UNKNOWN_PID};
use simtrace::recording::{SinkCall, SinkLog};
use simtrace::{
    CollectorConfig, EventKind, ManualSimClock, MemorySink, ModulePhase, ObjectId, ProcessKind,
    RealTime, SimTime, TraceCollector, TraceEvent, Tracer,
};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::thread;

fn setup() -> (TraceCollector, Tracer, SinkLog) {
    let sink = MemorySink::new();
    let log = sink.log();
    let config = CollectorConfig {
        component_version: "2.3.4".to_string(),
        ..Default::default()
    };
    let collector =
        TraceCollector::with_environment(config, Box::new(sink), Arc::new(UnknownEnvironment))
            .unwrap();
    let tracer = collector.tracer(Arc::new(ManualSimClock::default()));
    (collector, tracer, log)
}

/// Assert every begin_batch(n) is closed by end_batch(n) with exactly n
/// handler calls in between; returns the batch sizes.
fn assert_brackets(calls: &[SinkCall]) -> Vec<usize> {
    let mut sizes = Vec::new();
    let mut open: Option<(usize, usize)> = None;

    for call in calls {
        match call {
            SinkCall::BeginBatch(n) => {
                assert!(open.is_none(), "nested begin_batch");
                open = Some((*n, 0));
            }
            SinkCall::Event(_) => {
                let (_, seen) = open.as_mut().expect("handler call outside a batch");
                *seen += 1;
            }
            SinkCall::EndBatch(n) => {
                let (expected, seen) = open.take().expect("end_batch without begin_batch");
                assert_eq!(*n, expected);
                assert_eq!(seen, expected);
                sizes.push(expected);
            }
            SinkCall::Init | SinkCall::Meta(_) | SinkCall::Shutdown => {
                assert!(open.is_none(), "{:?} inside a batch", call);
            }
        }
    }

    assert!(open.is_none(), "unterminated batch");
    sizes
}

#[test]
fn single_module_created_event() {
    let (mut collector, tracer, log) = setup();
    collector.start().unwrap();

    let id = tracer.next_id();
    tracer.module_created(id, "top", "my_module");
    collector.stop().unwrap();

    let calls = log.calls();
    assert_eq!(calls.len(), 6);
    assert_eq!(calls[0], SinkCall::Init);
    match &calls[1] {
        SinkCall::Meta(meta) => {
            assert_eq!(meta.version, "2.3.4");
            assert_eq!(meta.path, UNKNOWN);
            assert_eq!(meta.user, UNKNOWN);
            assert_eq!(meta.pid, UNKNOWN_PID);
        }
        other => panic!("expected metadata, got {:?}", other),
    }
    assert_eq!(calls[2], SinkCall::BeginBatch(1));
    assert_eq!(
        calls[3],
        SinkCall::Event(TraceEvent::ModuleCreated {
            subject: id,
            name: "top".to_string(),
            type_name: "my_module".to_string(),
        })
    );
    assert_eq!(calls[4], SinkCall::EndBatch(1));
    assert_eq!(calls[5], SinkCall::Shutdown);
}

#[test]
fn thousand_events_single_producer() {
    let (mut collector, tracer, log) = setup();
    collector.start().unwrap();

    let ids: Vec<ObjectId> = (0..1000).map(|_| tracer.next_id()).collect();
    for id in &ids {
        tracer.port_created(*id, format!("top.port_{}", id));
    }
    collector.stop().unwrap();

    let events = log.events();
    assert_eq!(events.len(), 1000);
    let subjects: Vec<ObjectId> = events.iter().map(|e| e.subject()).collect();
    assert_eq!(subjects, ids);

    let sizes = assert_brackets(&log.calls());
    assert_eq!(sizes.iter().sum::<usize>(), 1000);
    assert_eq!(collector.stats().events_dispatched, 1000);
}

#[test]
fn unknown_kind_is_skipped() {
    let (mut collector, tracer, log) = setup();
    collector.start().unwrap();

    let id = tracer.next_id();
    tracer.record(TraceEvent::Unrecognized {
        subject: id,
        raw_kind: 4096,
    });
    tracer.port_created(id, "top.in");
    collector.stop().unwrap();

    assert_eq!(
        log.events(),
        vec![TraceEvent::PortCreated {
            subject: id,
            name: "top.in".to_string(),
        }]
    );
    assert_eq!(collector.stats().events_skipped, 1);
}

#[test]
fn concurrent_id_generation() {
    let (collector, tracer, _log) = setup();

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let tracer = tracer.clone();
            thread::spawn(move || (0..10_000).map(|_| tracer.next_id().get()).collect::<Vec<_>>())
        })
        .collect();

    let mut seen = HashSet::new();
    for handle in handles {
        for id in handle.join().unwrap() {
            assert!(seen.insert(id), "duplicate id {}", id);
        }
    }

    assert_eq!(seen, (1..=20_000).collect::<HashSet<u64>>());
    assert_eq!(collector.ids().issued(), 20_000);
}

#[test]
fn stop_twice_is_noop() {
    let (mut collector, tracer, log) = setup();
    collector.start().unwrap();
    tracer.event_created(tracer.next_id(), "ev");

    collector.stop().unwrap();
    let calls_after_first_stop = log.calls();

    collector.stop().unwrap();
    assert_eq!(log.calls(), calls_after_first_stop);
    assert!(!collector.is_running());
}

#[test]
fn stop_without_start_is_noop() {
    let (mut collector, _tracer, log) = setup();
    collector.stop().unwrap();
    assert!(log.is_empty());
}

#[test]
fn metadata_delivered_once_before_first_batch() {
    let (mut collector, tracer, log) = setup();
    collector.start().unwrap();

    for _ in 0..50 {
        tracer.process_start(tracer.next_id());
    }
    collector.stop().unwrap();

    let calls = log.calls();
    let meta_positions: Vec<usize> = calls
        .iter()
        .enumerate()
        .filter(|(_, call)| matches!(call, SinkCall::Meta(_)))
        .map(|(index, _)| index)
        .collect();
    let first_batch = calls
        .iter()
        .position(|call| matches!(call, SinkCall::BeginBatch(_)))
        .unwrap();

    assert_eq!(meta_positions.len(), 1);
    assert!(meta_positions[0] < first_batch);
    assert_eq!(calls.last(), Some(&SinkCall::Shutdown));
}

#[test]
fn interleaved_producers_keep_global_order() {
    let (mut collector, tracer, log) = setup();
    collector.start().unwrap();

    // Id issue and enqueue happen under one lock, so the id sequence is
    // the global enqueue order.
    let order = Arc::new(Mutex::new(()));
    let handles: Vec<_> = (0..4)
        .map(|_| {
            let tracer = tracer.clone();
            let order = Arc::clone(&order);
            thread::spawn(move || {
                for _ in 0..2_500 {
                    let _guard = order.lock().unwrap();
                    let id = tracer.next_id();
                    tracer.event_notify_delta(id);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    collector.stop().unwrap();

    let subjects: Vec<u64> = log.events().iter().map(|e| e.subject().get()).collect();
    assert_eq!(subjects, (1..=10_000).collect::<Vec<_>>());

    let sizes = assert_brackets(&log.calls());
    assert_eq!(sizes.iter().sum::<usize>(), 10_000);
}

#[test]
fn events_enqueued_before_start_are_delivered() {
    let (mut collector, tracer, log) = setup();

    let id = tracer.next_id();
    tracer.module_phase_started(id, ModulePhase::BeforeEndOfElaboration);
    tracer.module_phase_finished(id, ModulePhase::BeforeEndOfElaboration);

    collector.start().unwrap();
    collector.stop().unwrap();

    let kinds: Vec<_> = log.events().iter().filter_map(|e| e.kind()).collect();
    assert_eq!(
        kinds,
        vec![EventKind::ModulePhaseStarted, EventKind::ModulePhaseFinished]
    );
}

#[test]
fn drop_drains_queue() {
    let (mut collector, tracer, log) = setup();
    collector.start().unwrap();
    tracer.process_created(tracer.next_id(), "top.main", ProcessKind::CThread);

    drop(collector);

    assert_eq!(log.events().len(), 1);
    assert_eq!(log.calls().last(), Some(&SinkCall::Shutdown));
}

fn build_event(selector: u8, id: ObjectId) -> TraceEvent {
    let real = RealTime::from_nanos(selector as u64);
    let sim = SimTime::from_picos(selector as u64 * 1_000);
    match selector % 8 {
        0 => TraceEvent::ModuleCreated {
            subject: id,
            name: format!("m{}", id),
            type_name: "mod".to_string(),
        },
        1 => TraceEvent::ProcessCreated {
            subject: id,
            name: format!("p{}", id),
            process_kind: ProcessKind::Thread,
        },
        2 => TraceEvent::ChannelCreated {
            subject: id,
            name: format!("c{}", id),
            type_name: "sc_signal".to_string(),
        },
        3 => TraceEvent::ModulePhaseStarted {
            subject: id,
            phase: ModulePhase::StartOfSimulation,
            real_time: real,
        },
        4 => TraceEvent::EventNotifyTimed {
            subject: id,
            real_time: real,
            sim_time: sim,
            delay: SimTime::from_nanos(1),
        },
        5 => TraceEvent::ProcessYield {
            subject: id,
            real_time: real,
            sim_time: sim,
        },
        6 => TraceEvent::ChannelUpdateComplete {
            subject: id,
            real_time: real,
            sim_time: sim,
        },
        _ => TraceEvent::EventCancel {
            subject: id,
            real_time: real,
            sim_time: sim,
        },
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn dispatch_order_equals_enqueue_order(
        selectors in proptest::collection::vec(any::<u8>(), 0..300)
    ) {
        let (mut collector, tracer, log) = setup();
        collector.start().unwrap();

        let expected: Vec<TraceEvent> = selectors
            .iter()
            .map(|selector| build_event(*selector, tracer.next_id()))
            .collect();
        for event in expected.iter().cloned() {
            tracer.record(event);
        }
        collector.stop().unwrap();

        prop_assert_eq!(log.events(), expected);
        let sizes = assert_brackets(&log.calls());
        prop_assert_eq!(sizes.iter().sum::<usize>(), selectors.len());
    }
}
