// benches/recording_bench.rs
//! Producer-side overhead of recording events

use criterion::{black_box, criterion_group, criterion_main, BatchSize, Criterion, Throughput};
use simtrace::recording::{EventQueue, TraceSink, UnknownEnvironment};
use simtrace::{CollectorConfig, LogSink, ManualSimClock, ObjectId, TraceCollector, TraceEvent};
use std::sync::Arc;

fn collector() -> TraceCollector {
    // LogSink without a subscriber installed does no I/O
    let sink: Box<dyn TraceSink> = Box::new(LogSink::new());
    let mut collector = TraceCollector::with_environment(
        CollectorConfig::default(),
        sink,
        Arc::new(UnknownEnvironment),
    )
    .unwrap();
    collector.start().unwrap();
    collector
}

fn bench_tracer(c: &mut Criterion) {
    let mut group = c.benchmark_group("tracer");
    group.throughput(Throughput::Elements(1));

    let collector = collector();
    let tracer = collector.tracer(Arc::new(ManualSimClock::default()));
    let id = tracer.next_id();

    group.bench_function("process_start", |b| {
        b.iter(|| tracer.process_start(black_box(id)))
    });

    group.bench_function("module_created", |b| {
        b.iter(|| tracer.module_created(black_box(id), "top.sub", "my_module"))
    });

    group.bench_function("next_id", |b| b.iter(|| black_box(tracer.next_id())));

    group.finish();
}

fn bench_queue_swap(c: &mut Criterion) {
    let mut group = c.benchmark_group("event_queue");
    group.throughput(Throughput::Elements(1_000));

    group.bench_function("push_1000_then_swap", |b| {
        b.iter_batched(
            || EventQueue::new(1_000),
            |queue| {
                for raw in 0..1_000u64 {
                    queue.push(TraceEvent::EventNotifyDelta {
                        subject: ObjectId::from_raw(raw),
                        real_time: Default::default(),
                        sim_time: Default::default(),
                    });
                }
                black_box(queue.try_take())
            },
            BatchSize::SmallInput,
        )
    });

    group.finish();
}

criterion_group!(benches, bench_tracer, bench_queue_swap);
criterion_main!(benches);
