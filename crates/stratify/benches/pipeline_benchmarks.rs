//! Reshape and sampling benchmarks.
//!
//! Measures the full file → sample path and the sampler alone across
//! extract widths.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::io::Write;
use stratify::{CleanRecord, CleanTable, StratifiedSampler, Stratify};
use tempfile::NamedTempFile;

/// Generate a one-row wide extract with `entities` estimate/MOE column pairs.
fn generate_extract(entities: usize) -> String {
    let mut headers = vec!["Label (Grouping)".to_string()];
    let mut values = vec!["Median household income (dollars)".to_string()];

    for i in 0..entities {
        headers.push(format!("\"County {}, State!!Estimate\"", i));
        headers.push(format!("\"County {}, State!!Margin of Error\"", i));
        let income = 25_000 + (i * 104_729) % 90_000;
        values.push(format!("\"{},{:03}\"", income / 1000, income % 1000));
        values.push(format!("\"±{}\"", 100 + i % 4_000));
    }

    format!("{}\n{}\n", headers.join(","), values.join(","))
}

fn generate_table(entities: usize) -> CleanTable {
    CleanTable::from_records(
        (0..entities)
            .map(|i| CleanRecord {
                entity: format!("County {}", i),
                income: (25_000 + (i * 104_729) % 90_000) as f64,
                moe: "100".to_string(),
            })
            .collect(),
    )
}

/// Benchmark the full parse, reshape and sample path.
fn bench_run(c: &mut Criterion) {
    let mut group = c.benchmark_group("run");

    for entities in [100, 1_000, 3_200].iter() {
        let data = generate_extract(*entities);

        group.throughput(Throughput::Bytes(data.len() as u64));
        group.bench_with_input(BenchmarkId::new("entities", entities), &data, |b, data| {
            b.iter_with_setup(
                || {
                    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
                    temp.write_all(data.as_bytes()).unwrap();
                    temp
                },
                |temp| {
                    let stratify = Stratify::new();
                    black_box(stratify.run(temp.path()).unwrap())
                },
            )
        });
    }

    group.finish();
}

/// Benchmark the sampler on an in-memory table.
fn bench_sample(c: &mut Criterion) {
    let mut group = c.benchmark_group("sample");

    for entities in [100, 1_000, 10_000].iter() {
        let table = generate_table(*entities);

        group.throughput(Throughput::Elements(*entities as u64));
        group.bench_with_input(BenchmarkId::new("entities", entities), &table, |b, table| {
            let sampler = StratifiedSampler::new();
            b.iter(|| black_box(sampler.sample(table).unwrap()))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_run, bench_sample);
criterion_main!(benches);
