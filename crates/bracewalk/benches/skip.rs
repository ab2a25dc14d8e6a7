//! Benchmark – skipping structures versus walking them
#![allow(missing_docs)]

use std::{fmt::Write, ops::ControlFlow, time::Duration};

use bracewalk::{Abort, CONTINUE, Event, EventRecorder, Notation};
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};

/// One small `head` field followed by a large `body` structure.
fn make_payload(records: usize) -> String {
    let mut s = String::from("head={v=1}\nbody={\n");
    for i in 0..records {
        writeln!(s, "  r{i}={{x={i} y=\"{{not a brace}}\" l={{1 2 3}}}}").unwrap();
    }
    s.push_str("}\ntail=1\n");
    s
}

fn run(notation: &Notation, payload: &str, skip_body: bool) -> usize {
    let mut recorder = EventRecorder::with_abort(|event, _| match event {
        Event::EnterField(name) if skip_body && name == "body" => {
            ControlFlow::Break(Abort::Frames(0))
        }
        _ => CONTINUE,
    });
    notation.parse(payload.as_bytes(), &mut recorder).unwrap();
    recorder.events().len()
}

fn bench_skip(c: &mut Criterion) {
    let notation = Notation::default();
    let mut group = c.benchmark_group("skip");

    for &records in &[100usize, 10_000] {
        let payload = make_payload(records);
        for (name, skip) in [("walk", false), ("skip", true)] {
            group.bench_with_input(BenchmarkId::new(name, records), &payload, |b, p| {
                b.iter(|| black_box(run(&notation, black_box(p), skip)));
            });
        }
    }
    group.finish();
}

fn criterion() -> Criterion {
    let mut c = Criterion::default();
    if cfg!(feature = "bench-fast") {
        c = c
            .warm_up_time(Duration::from_millis(10))
            .measurement_time(Duration::from_millis(100))
            .sample_size(10);
    } else {
        c = c
            .warm_up_time(Duration::from_secs(3))
            .measurement_time(Duration::from_secs(10));
    }
    c
}

criterion_group! { name = benches; config = criterion(); targets = bench_skip }
criterion_main!(benches);
