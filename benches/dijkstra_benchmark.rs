use std::time::Duration;

use cgr_route::contact::Contact;
use cgr_route::routing::{cgr_dijkstra, cmr_dijkstra};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A synthetic multi-hop chain `0 -> 1 -> ... -> n`, each contact open for
/// the whole horizon so neither search is short-circuited by a closed
/// window.
fn chain_plan(hops: u32) -> Vec<Contact> {
    (0..hops)
        .map(|i| Contact::with_confidence_and_owlt(i, i + 1, 0, 100_000, 1_000, 1.0, 1))
        .collect()
}

pub fn cgr_benchmark(c: &mut Criterion) {
    let _ = tracing_subscriber::fmt::try_init();
    let root = Contact::root(0, 0);
    let mut plan = chain_plan(50);
    let destination = 50;

    c.bench_function("cgr_dijkstra/50-hop chain", |b| {
        b.iter(|| cgr_dijkstra(black_box(&root), black_box(destination), black_box(&mut plan)))
    });
}

pub fn cmr_benchmark(c: &mut Criterion) {
    let root = Contact::root(0, 0);
    let plan = chain_plan(50);
    let destination = 50;

    c.bench_function("cmr_dijkstra/50-hop chain", |b| {
        b.iter(|| cmr_dijkstra(black_box(&root), black_box(destination), black_box(&plan)))
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default().measurement_time(Duration::from_secs(10));
    targets = cgr_benchmark, cmr_benchmark
}
criterion_main!(benches);
