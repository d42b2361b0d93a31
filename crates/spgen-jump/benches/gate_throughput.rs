use criterion::{black_box, criterion_group, criterion_main, Criterion};
use spgen_core::{ChannelSet, TimeSeriesRow, TWO_PI};
use spgen_jump::{extract_from_rows, JumpConfig};

fn sample_trajectory(channels: usize, rows: usize) -> Vec<TimeSeriesRow> {
    let step = 0.25e-12;
    (0..rows)
        .map(|i| {
            let phases = (0..channels)
                .map(|c| {
                    let slips = (i / (200 + 37 * c)) as f64;
                    0.1 * c as f64 + TWO_PI * slips
                })
                .collect();
            TimeSeriesRow::new(i as f64 * step, phases)
        })
        .collect()
}

fn bench_extract(c: &mut Criterion) {
    let labels: Vec<String> = (0..16).map(|i| format!("B{i}")).collect();
    let channels = ChannelSet::new(labels).unwrap();
    let rows = sample_trajectory(channels.len(), 20_000);
    let config = JumpConfig::default();
    c.bench_function("extract_16ch_20k_rows", |b| {
        b.iter(|| {
            let out = extract_from_rows(channels.clone(), black_box(&rows), &config).unwrap();
            black_box(out.table.len())
        })
    });
}

criterion_group!(benches, bench_extract);
criterion_main!(benches);
