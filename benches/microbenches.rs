//! Criterion microbenches for boxscope parsing and export.
//!
//! Run with: `cargo bench`
//!
//! These benchmarks measure the performance of:
//! - COCO JSON parsing through the dispatch layer
//! - YOLO label-file parsing and denormalization
//! - COCO-Text export serialization

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::fmt::Write;
use std::hint::black_box;

use boxscope::export::export_coco_text;
use boxscope::formats::{parse_file, ParseContext};

/// Synthesized COCO document with `n` annotations spread over 10 images.
fn coco_fixture(n: usize) -> String {
    let mut images = String::new();
    for id in 1..=10 {
        let _ = write!(
            images,
            "{}{{\"id\": {id}, \"file_name\": \"img_{id}.jpg\", \"width\": 640, \"height\": 480}}",
            if id > 1 { "," } else { "" }
        );
    }
    let mut annotations = String::new();
    for id in 1..=n {
        let _ = write!(
            annotations,
            "{}{{\"id\": {id}, \"image_id\": {}, \"category_id\": 1, \"bbox\": [{}, {}, 30, 40]}}",
            if id > 1 { "," } else { "" },
            id % 10 + 1,
            id % 600,
            id % 440,
        );
    }
    format!(
        "{{\"images\": [{images}], \"categories\": [{{\"id\": 1, \"name\": \"thing\"}}], \
         \"annotations\": [{annotations}]}}"
    )
}

fn yolo_fixture(n: usize) -> String {
    let mut text = String::new();
    for i in 0..n {
        let _ = writeln!(text, "{} 0.5 0.5 0.{:02} 0.{:02}", i % 80, i % 90 + 10, i % 80 + 10);
    }
    text
}

fn ctx() -> ParseContext<'static> {
    ParseContext {
        natural_size: Some((640, 480)),
        image_name: Some("img_1.jpg"),
    }
}

/// Benchmark COCO parsing through format dispatch.
fn bench_coco_parse(c: &mut Criterion) {
    let fixture = coco_fixture(1_000);
    let mut group = c.benchmark_group("coco_parse");
    group.throughput(Throughput::Bytes(fixture.len() as u64));

    group.bench_function("parse_file", |b| {
        b.iter(|| {
            let result = parse_file("ann.json", black_box(&fixture), ctx()).unwrap();
            black_box(result)
        })
    });

    group.finish();
}

/// Benchmark YOLO line parsing and denormalization.
fn bench_yolo_parse(c: &mut Criterion) {
    let fixture = yolo_fixture(1_000);
    let mut group = c.benchmark_group("yolo_parse");
    group.throughput(Throughput::Bytes(fixture.len() as u64));

    group.bench_function("parse_file", |b| {
        b.iter(|| {
            let result = parse_file("labels.txt", black_box(&fixture), ctx()).unwrap();
            black_box(result)
        })
    });

    group.finish();
}

/// Benchmark COCO-Text export writing.
///
/// The fixture is parsed once outside the timed region; only
/// serialization is measured.
fn bench_export(c: &mut Criterion) {
    let fixture = coco_fixture(1_000);
    let parsed = parse_file("ann.json", &fixture, ctx())
        .unwrap()
        .unwrap();

    let mut group = c.benchmark_group("export");
    group.throughput(Throughput::Elements(parsed.boxes.len() as u64));

    group.bench_function("export_coco_text", |b| {
        b.iter(|| {
            let json = export_coco_text(
                black_box(&parsed.boxes),
                Some("img_1.jpg"),
                Some((640, 480)),
            )
            .unwrap();
            black_box(json)
        })
    });

    group.finish();
}

criterion_group!(benches, bench_coco_parse, bench_yolo_parse, bench_export);
criterion_main!(benches);
