//! Benchmarks for HRON parsing.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use hron_core::{
    lines, parse, parse_tree, write_object, LineSlice, ParseOptions, Visitor,
};

/// Visitor that counts events, to measure the raw scan with no building.
#[derive(Default)]
struct CountEvents(usize);

impl<'a> Visitor<'a> for CountEvents {
    fn value_begin(&mut self, _: LineSlice<'a>) {
        self.0 += 1;
    }
    fn value_line(&mut self, _: LineSlice<'a>) {
        self.0 += 1;
    }
    fn object_begin(&mut self, _: LineSlice<'a>) {
        self.0 += 1;
    }
}

/// Benchmark simple cases for baseline measurements.
fn bench_scan_simple(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_simple");

    group.bench_function("empty", |b| {
        b.iter(|| {
            let mut counter = CountEvents::default();
            parse(
                &ParseOptions::default(),
                lines(black_box("")),
                &mut counter,
            );
            counter.0
        })
    });

    let comments = "# comment 1\n# comment 2\n# comment 3\n";
    group.throughput(Throughput::Bytes(comments.len() as u64));
    group.bench_function("comments_only", |b| {
        b.iter(|| {
            let mut counter = CountEvents::default();
            parse(
                &ParseOptions::default(),
                lines(black_box(comments)),
                &mut counter,
            );
            counter.0
        })
    });

    let nested = "@html\n\t@head\n\t\t=title\n\t\t\tPage\n\t@body\n\t\t=h1\n\t\t\tHello\n";
    group.throughput(Throughput::Bytes(nested.len() as u64));
    group.bench_function("nested_objects", |b| {
        b.iter(|| {
            let mut counter = CountEvents::default();
            parse(
                &ParseOptions::default(),
                lines(black_box(nested)),
                &mut counter,
            );
            counter.0
        })
    });

    group.finish();
}

/// Benchmark scaling with input size, scan only.
fn bench_scan_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan_scaling");

    for size in [100, 1000, 10000] {
        let input = generate_test_input(size);
        group.throughput(Throughput::Bytes(input.len() as u64));
        group.bench_function(format!("{}_lines", size), |b| {
            b.iter(|| {
                let mut counter = CountEvents::default();
                parse(
                    &ParseOptions::default(),
                    lines(black_box(&input)),
                    &mut counter,
                );
                counter.0
            })
        });
    }

    group.finish();
}

/// Benchmark the full tree build and the write-back.
fn bench_tree(c: &mut Criterion) {
    let input = generate_test_input(1000);
    let tree = parse_tree(&input, &ParseOptions::default()).unwrap();

    let mut group = c.benchmark_group("tree");
    group.throughput(Throughput::Bytes(input.len() as u64));

    group.bench_function("build_1000_lines", |b| {
        b.iter(|| parse_tree(black_box(&input), &ParseOptions::default()).unwrap())
    });

    group.bench_function("write_1000_lines", |b| {
        b.iter(|| write_object(black_box(&tree)))
    });

    group.finish();
}

/// Generate test input of approximately n lines.
fn generate_test_input(lines: usize) -> String {
    let mut input = String::with_capacity(lines * 24);
    for i in 0..lines / 4 {
        input.push_str(&format!("@record{}\n", i));
        input.push_str("\t=key\n");
        input.push_str(&format!("\t\tvalue {}\n", i));
        input.push_str("# a comment line\n");
    }
    input
}

criterion_group!(benches, bench_scan_simple, bench_scan_scaling, bench_tree);
criterion_main!(benches);
