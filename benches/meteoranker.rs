use criterion::{black_box, criterion_group, criterion_main, Criterion};
use meteoranker::{RegionTable, Statistics};

fn bench_meteoranker(c: &mut Criterion) {
    let values: Vec<f64> = (0..160).map(|i| 20.0 + (i % 17) as f64 * 0.7).collect();
    c.bench_function("statistics_compute", |b| {
        b.iter(|| Statistics::compute(black_box(&values)))
    });

    let table = RegionTable::default();
    c.bench_function("region_resolve", |b| {
        b.iter(|| table.resolve(black_box("Észak-Magyarország")))
    });
}

criterion_group!(benches, bench_meteoranker);
criterion_main!(benches);
