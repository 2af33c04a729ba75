//! # Relay Bus Benchmarks
//!
//! | Case | What it measures |
//! |------|------------------|
//! | publish fan-out | snapshot + sequential dispatch over N handlers |
//! | subscribe churn | duplicate check + removal on a growing sequence |
//! | once | wrapper creation, invocation and self-removal |

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use relay_bus::{EventBus, HandlerRef, MemorySink};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

fn bench_publish_fan_out(c: &mut Criterion) {
    let mut group = c.benchmark_group("publish-fan-out");

    for size in [1usize, 10, 100, 1_000] {
        let bus: EventBus<&'static str, u64> = EventBus::with_sink(Arc::new(MemorySink::new()));
        let total = Arc::new(AtomicU64::new(0));
        for _ in 0..size {
            let total = total.clone();
            bus.subscribe(
                "tick",
                HandlerRef::infallible(move |n: &u64| {
                    total.fetch_add(*n, Ordering::Relaxed);
                }),
            );
        }

        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::new("handlers", size), &size, |b, _| {
            b.iter(|| bus.publish("tick", black_box(&1)))
        });
    }

    group.finish();
}

fn bench_subscribe_churn(c: &mut Criterion) {
    let mut group = c.benchmark_group("subscribe-churn");

    for size in [10usize, 100] {
        let handlers: Vec<HandlerRef<u64>> = (0..size)
            .map(|_| HandlerRef::infallible(|_: &u64| {}))
            .collect();

        group.bench_with_input(BenchmarkId::new("subscribe-unsubscribe", size), &size, |b, _| {
            b.iter(|| {
                let bus: EventBus<&'static str, u64> = EventBus::new();
                for h in &handlers {
                    bus.subscribe("e", h.clone());
                }
                for h in &handlers {
                    bus.unsubscribe("e", h);
                }
                black_box(bus.has_subscribers("e"))
            })
        });
    }

    group.finish();
}

fn bench_once(c: &mut Criterion) {
    let bus: EventBus<&'static str, u64> = EventBus::new();
    let handler = HandlerRef::infallible(|_: &u64| {});

    c.bench_function("once-register-and-fire", |b| {
        b.iter(|| {
            bus.once("e", handler.clone());
            bus.publish("e", black_box(&1));
        })
    });
}

criterion_group!(benches, bench_publish_fan_out, bench_subscribe_churn, bench_once);
criterion_main!(benches);
