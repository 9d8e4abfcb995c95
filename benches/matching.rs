use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use frex::compile;

const LITERAL: &str = "abc";
const STAR_DOT_SCAN: &str = ".*abc";
const CLASS_REPEAT: &str = "[ab]*c";
const NEGATED_TAIL: &str = "(a(z.)*)[bc]*d*{e}f?g";

fn bench_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");
    for pattern in [LITERAL, STAR_DOT_SCAN, CLASS_REPEAT, NEGATED_TAIL] {
        group.bench_function(pattern, |b| {
            b.iter(|| compile(black_box(pattern.as_bytes())).unwrap())
        });
    }
    group.finish();
}

fn bench_exec(c: &mut Criterion) {
    let haystack = "x".repeat(512) + "abc";

    let mut group = c.benchmark_group("exec");

    let literal = compile(LITERAL.as_bytes()).unwrap();
    group.bench_function("literal_anchored_miss", |b| {
        b.iter(|| literal.exec(black_box(haystack.as_bytes())))
    });

    let scan = compile(STAR_DOT_SCAN.as_bytes()).unwrap();
    group.bench_function("star_dot_scan_to_tail", |b| {
        b.iter(|| scan.exec(black_box(haystack.as_bytes())))
    });

    let class_repeat = compile(CLASS_REPEAT.as_bytes()).unwrap();
    let class_haystack = "ab".repeat(256) + "c";
    group.bench_function("class_repeat", |b| {
        b.iter(|| class_repeat.exec(black_box(class_haystack.as_bytes())))
    });

    group.finish();
}

criterion_group!(benches, bench_compile, bench_exec);
criterion_main!(benches);
