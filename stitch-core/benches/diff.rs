//! Sequence diff benchmarks.
//!
//! Run with `cargo bench -p stitch-core --bench diff`.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use stitch_core::diff::diff;

/// `len` elements with every `stride`-th one replaced.
fn scattered_edits(len: u32, stride: u32) -> (Vec<u32>, Vec<u32>) {
    let old: Vec<u32> = (0..len).collect();
    let new = old
        .iter()
        .map(|&v| if v % stride == 0 { v + len } else { v })
        .collect();
    (new, old)
}

fn bench_append(c: &mut Criterion) {
    let old: Vec<u32> = (0..1_000).collect();
    let mut new = old.clone();
    new.push(1_000);

    c.bench_function("diff/append_1k", |b| {
        b.iter(|| diff(black_box(&new), black_box(&old)))
    });
}

fn bench_scattered(c: &mut Criterion) {
    let mut group = c.benchmark_group("diff/scattered");
    for len in [16u32, 64, 256, 1024] {
        let (new, old) = scattered_edits(len, 7);
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, _| {
            b.iter(|| diff(black_box(&new), black_box(&old)))
        });
    }
    group.finish();
}

fn bench_reverse(c: &mut Criterion) {
    let old: Vec<u32> = (0..256).collect();
    let new: Vec<u32> = old.iter().rev().copied().collect();

    c.bench_function("diff/reverse_256", |b| {
        b.iter(|| diff(black_box(&new), black_box(&old)))
    });
}

criterion_group!(benches, bench_append, bench_scattered, bench_reverse);
criterion_main!(benches);
