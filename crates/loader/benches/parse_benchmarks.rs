//! Benchmarks for the parsing pipeline.
//!
//! Covers secure parsing (batch gate plus per-line validation), the relaxed
//! parser used by the simple loader, and `.env` export.

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use simpleenvs::{SecureParser, parse_relaxed, to_env_format};

fn generate_env_content(count: usize) -> String {
    (0..count)
        .map(|i| match i % 4 {
            0 => format!("SERVICE_{}_HOST=host-{}.internal\n", i, i),
            1 => format!("SERVICE_{}_PORT={}\n", i, 8000 + i),
            2 => format!("SERVICE_{}_ENABLED={}\n", i, i % 3 == 0),
            _ => format!("# comment {}\nSERVICE_{}_NAME=\"service number {}\"\n", i, i, i),
        })
        .collect()
}

fn bench_secure_parse_100(c: &mut Criterion) {
    let content = generate_env_content(100);
    let parser = SecureParser::new(true);
    c.bench_function("secure_parse_100", |b| {
        b.iter(|| black_box(parser.parse_str(black_box(&content))))
    });
}

fn bench_secure_parse_5k(c: &mut Criterion) {
    let content = generate_env_content(5_000);
    let parser = SecureParser::new(true);
    c.bench_function("secure_parse_5k", |b| {
        b.iter(|| black_box(parser.parse_str(black_box(&content))))
    });
}

fn bench_relaxed_parse_5k(c: &mut Criterion) {
    let content = generate_env_content(5_000);
    c.bench_function("relaxed_parse_5k", |b| {
        b.iter(|| black_box(parse_relaxed(black_box(&content))))
    });
}

fn bench_export_5k(c: &mut Criterion) {
    let map = parse_relaxed(&generate_env_content(5_000));
    c.bench_function("export_env_5k", |b| {
        b.iter(|| black_box(to_env_format(black_box(&map))))
    });
}

criterion_group!(
    benches,
    bench_secure_parse_100,
    bench_secure_parse_5k,
    bench_relaxed_parse_5k,
    bench_export_5k
);
criterion_main!(benches);
