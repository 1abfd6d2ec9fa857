//! Criterion benches for the solve pipeline (group "rsmt").
//!
//! - FST generation alone, 20 and 50 terminals.
//! - Full solve with the default root-only configuration.
//!
//! Instances come from fixed replay tokens so runs are comparable.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rsmt::api::rfst;
use rsmt::prelude::*;

fn instance(count: usize, index: u64) -> Vec<Point> {
    let cfg = TerminalCfg {
        count,
        grid: 1000,
        span: 1000.0,
    };
    draw_terminals(cfg, ReplayToken { seed: 2024, index })
}

fn bench_fst(c: &mut Criterion) {
    let mut group = c.benchmark_group("rsmt");
    for count in [20, 50] {
        let pts = instance(count, 0);
        group.bench_with_input(BenchmarkId::new("rfst", count), &pts, |b, pts| {
            b.iter(|| rfst(pts))
        });
    }
    group.finish();
}

fn bench_solve(c: &mut Criterion) {
    let mut group = c.benchmark_group("rsmt");
    group.sample_size(10);
    for count in [10, 25] {
        let pts = instance(count, 1);
        group.bench_with_input(BenchmarkId::new("solve_root_only", count), &pts, |b, pts| {
            b.iter(|| rsmt(pts).map(|r| r.length))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fst, bench_solve);
criterion_main!(benches);
