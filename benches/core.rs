//! Criterion benchmarks for the Lite³ core.
//!
//! Run with:
//!   cargo bench --bench core
//!
//! Covers the three hot paths: keyed set throughput (split-heavy), keyed
//! get over a populated arena, and JSON decode of a mid-sized document.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

fn populated_object(n: usize) -> (Vec<u8>, usize, Vec<String>) {
    let keys: Vec<String> = (0..n).map(|i| format!("key_{:05}", i)).collect();
    let mut buf = vec![0u8; 4 * 1024 * 1024];
    let mut pos = 0;
    lite3::init_object(&mut buf, &mut pos).unwrap();
    for (i, k) in keys.iter().enumerate() {
        lite3::set_i64(&mut buf, &mut pos, 0, k, i as i64).unwrap();
    }
    (buf, pos, keys)
}

fn sample_document(records: usize) -> Vec<u8> {
    let mut doc = String::from(r#"{"records": ["#);
    for i in 0..records {
        if i > 0 {
            doc.push(',');
        }
        doc.push_str(&format!(
            r#"{{"id": {i}, "score": {i}.25, "label": "record-{i}", "active": {}}}"#,
            i % 2 == 0
        ));
    }
    doc.push_str("]}");
    doc.into_bytes()
}

fn bench_set(c: &mut Criterion) {
    let mut group = c.benchmark_group("set");
    for &n in &[64usize, 1024] {
        let keys: Vec<String> = (0..n).map(|i| format!("key_{:05}", i)).collect();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("set_i64", n), &keys, |b, keys| {
            let mut buf = vec![0u8; 4 * 1024 * 1024];
            b.iter(|| {
                let mut pos = 0;
                lite3::init_object(&mut buf, &mut pos).unwrap();
                for (i, k) in keys.iter().enumerate() {
                    lite3::set_i64(&mut buf, &mut pos, 0, k, i as i64).unwrap();
                }
            })
        });
    }
    group.finish();
}

fn bench_get(c: &mut Criterion) {
    let mut group = c.benchmark_group("get");
    for &n in &[64usize, 1024] {
        let (buf, pos, keys) = populated_object(n);
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("get_i64", n), &keys, |b, keys| {
            b.iter(|| {
                let mut acc = 0i64;
                for k in keys {
                    acc = acc.wrapping_add(lite3::get_i64(&buf, pos, 0, k).unwrap());
                }
                acc
            })
        });
    }
    group.finish();
}

fn bench_decode(c: &mut Criterion) {
    let mut group = c.benchmark_group("json");
    for &records in &[100usize, 1000] {
        let doc = sample_document(records);
        group.throughput(Throughput::Bytes(doc.len() as u64));
        group.bench_with_input(BenchmarkId::new("decode", records), &doc, |b, doc| {
            b.iter(|| lite3::json::decode_to_buf(doc).unwrap())
        });

        let decoded = lite3::json::decode_to_buf(&doc).unwrap();
        group.bench_with_input(BenchmarkId::new("encode", records), &decoded, |b, decoded| {
            b.iter(|| lite3::json::encode_to_string(decoded.bytes(), decoded.position()).unwrap())
        });
    }
    group.finish();
}

criterion_group!(benches, bench_set, bench_get, bench_decode);
criterion_main!(benches);
