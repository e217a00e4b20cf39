use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// Synthetic record array: wide objects with mixed scalar and string
/// members, the shape the two-pass builder is tuned for.
fn record_array(records: usize) -> String {
    let mut out = String::from("[");
    for i in 0..records {
        if i > 0 {
            out.push(',');
        }
        out.push_str(&format!(
            r#"{{"id": {i}, "name": "record-{i}", "active": {}, "score": {}.5, "tags": ["a", "b\n{i}"]}}"#,
            i % 2 == 0,
            i % 100
        ));
    }
    out.push(']');
    out
}

fn nested_array(depth: usize) -> String {
    format!("{}1{}", "[".repeat(depth), "]".repeat(depth))
}

fn bench_parse(c: &mut Criterion) {
    let records = record_array(1000);
    let nested = nested_array(64);

    let mut group = c.benchmark_group("parse");
    group.bench_function("measure_records", |b| {
        b.iter(|| {
            let sizes = flatjson::measure(black_box(&records)).expect("measure failed");
            black_box(sizes);
        });
    });
    group.bench_function("parse_records", |b| {
        b.iter(|| {
            let doc = flatjson::parse(black_box(&records)).expect("parse failed");
            black_box(doc);
        });
    });
    group.bench_function("parse_records_json", |b| {
        b.iter(|| {
            let value: serde_json::Value =
                serde_json::from_str(black_box(&records)).expect("json parse failed");
            black_box(value);
        });
    });
    group.bench_function("parse_nested", |b| {
        b.iter(|| {
            let doc = flatjson::parse(black_box(&nested)).expect("parse failed");
            black_box(doc);
        });
    });
    group.finish();
}

fn bench_encode(c: &mut Criterion) {
    let doc = flatjson::parse(&record_array(1000)).expect("parse failed");

    let mut group = c.benchmark_group("encode");
    group.bench_function("to_string_records", |b| {
        b.iter(|| {
            let text = flatjson::to_string(black_box(doc.root()));
            black_box(text);
        });
    });
    group.finish();
}

criterion_group!(benches, bench_parse, bench_encode);
criterion_main!(benches);
