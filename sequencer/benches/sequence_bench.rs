//! Benchmarks for sequence execution.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use request_sequencer::prelude::*;
use serde_json::{json, Value};

fn chain(steps: usize) -> Sequencer<Value, Value> {
    (0..steps).fold(Sequencer::new(), |seq, _| {
        seq.next(|prev| async move {
            let prev = prev.and_then(|v| v.as_u64()).unwrap_or_default();
            Ok(json!(prev + 1))
        })
    })
}

fn sequence_benchmark(c: &mut Criterion) {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("benchmark runtime");

    let mut group = c.benchmark_group("chain");
    for steps in [1_usize, 16, 128] {
        group.bench_with_input(BenchmarkId::from_parameter(steps), &steps, |b, &steps| {
            b.iter(|| {
                runtime.block_on(async {
                    let outcome = chain(steps)
                        .end(|settled| Ok(settled.into_value()))
                        .await;
                    black_box(outcome)
                })
            });
        });
    }
    group.finish();

    c.bench_function("foreach_256_items", |b| {
        b.iter(|| {
            runtime.block_on(async {
                let items: Vec<u64> = (0..256).collect();
                let outcome = Sequencer::<Value, Value>::new()
                    .foreach(items, |item: u64, _| async move { Ok(json!(item * 2)) })
                    .end(|settled| Ok(settled.into_value()))
                    .await;
                black_box(outcome)
            })
        });
    });
}

criterion_group!(benches, sequence_benchmark);
criterion_main!(benches);
