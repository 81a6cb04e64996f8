use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use stock_screener::{sort_records, SortDirection, SortField, StockRecord};

/// Random universe where roughly one value in ten is missing.
fn random_records(count: usize) -> Vec<StockRecord> {
    let mut rng = StdRng::seed_from_u64(42);
    let maybe = |rng: &mut StdRng, low: f64, high: f64| {
        rng.gen_bool(0.9).then(|| rng.gen_range(low..high))
    };

    (0..count)
        .map(|idx| StockRecord {
            name: Some(format!("Company {:05}", count - idx)),
            price: maybe(&mut rng, 1.0, 900.0),
            percent_change: maybe(&mut rng, -15.0, 15.0),
            average_volume: maybe(&mut rng, 1e4, 1e8),
            market_cap: maybe(&mut rng, 1e7, 3e12),
            ..StockRecord::new(&format!("SYM{idx:05}"))
        })
        .collect()
}

fn bench_sort_records(c: &mut Criterion) {
    let batch_size: usize = 10_000;
    let records = random_records(batch_size);

    let mut group = c.benchmark_group("sort_records");
    group.throughput(Throughput::Elements(batch_size as u64));

    for field in SortField::ALL {
        group.bench_with_input(BenchmarkId::from_parameter(field), &field, |b, &field| {
            b.iter(|| {
                let sorted = sort_records(black_box(&records), field, SortDirection::Descending);
                assert_eq!(sorted.len(), batch_size);
                sorted
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_sort_records);
criterion_main!(benches);
