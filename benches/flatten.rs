use criterion::{black_box, criterion_group, criterion_main, Criterion};
use serde_json::{json, Value};

use jsontab::{build_header, flatten_rows, scan_records, to_csv, Table};

fn sample_records(count: usize) -> Vec<Value> {
    (0..count)
        .map(|i| {
            json!({
                "id": i,
                "name": format!("record-{i}"),
                "stats": {"hp": 10 + i, "mp": i % 7},
                "items": [
                    {"id": i * 10, "label": "Potion"},
                    {"id": i * 10 + 1, "label": "Elixir"},
                ]
            })
        })
        .collect()
}

fn bench_scan(c: &mut Criterion) {
    let records = sample_records(1_000);
    c.bench_function("scan_1k_records", |b| {
        b.iter(|| scan_records(black_box(&records)))
    });
}

fn bench_flatten(c: &mut Criterion) {
    let records = sample_records(1_000);
    let header = build_header(&scan_records(&records));
    c.bench_function("flatten_1k_records", |b| {
        b.iter(|| flatten_rows(black_box(&records), black_box(&header)))
    });
}

fn bench_csv_encode(c: &mut Criterion) {
    let records = sample_records(1_000);
    let header = build_header(&scan_records(&records));
    let rows = flatten_rows(&records, &header);
    let table = Table::new(header, rows);
    c.bench_function("csv_encode_1k_rows", |b| b.iter(|| to_csv(black_box(&table))));
}

criterion_group!(benches, bench_scan, bench_flatten, bench_csv_encode);
criterion_main!(benches);
