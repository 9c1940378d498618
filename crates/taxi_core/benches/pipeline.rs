//! Benchmarks for the post-fetch pipeline using Criterion.rs.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::SeedableRng;
use taxi_core::normalize::normalize_records;
use taxi_core::test_helpers::raw_trip;
use taxi_core::{ResultBundle, DISPLAY_CAP};

fn bench_normalize_and_assemble(c: &mut Criterion) {
    let sizes = vec![("small", 100), ("limit", 2_000), ("large", 20_000)];

    let mut group = c.benchmark_group("normalize_and_assemble");
    for (name, count) in sizes {
        let records: Vec<_> = (0..count)
            .map(|idx| {
                let hour = idx % 24;
                raw_trip(
                    5.0 + (idx % 60) as f64,
                    (idx % 25) as f64 * 1.1,
                    &format!("2014-01-15T{:02}:15:00.000", hour),
                    if idx % 3 == 0 { "CSH" } else { "CRD" },
                )
            })
            .collect();

        group.bench_with_input(BenchmarkId::from_parameter(name), &records, |b, records| {
            b.iter(|| {
                let set = normalize_records(records);
                let mut rng = StdRng::seed_from_u64(42);
                black_box(ResultBundle::assemble(&set, DISPLAY_CAP, &mut rng));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_normalize_and_assemble);
criterion_main!(benches);
