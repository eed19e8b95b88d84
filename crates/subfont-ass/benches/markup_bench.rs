use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use subfont_ass::{plain_text, rewrite_font_overrides, runs, Document};

fn bench_plain_text(c: &mut Criterion) {
    let mut group = c.benchmark_group("plain_text");

    for size in [100, 1000, 10000] {
        let text = "a".repeat(size);

        group.throughput(Throughput::Bytes(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &text, |b, text| {
            b.iter(|| plain_text(black_box(text)));
        });
    }
    group.finish();
}

fn bench_override_heavy(c: &mut Criterion) {
    let mut group = c.benchmark_group("override_heavy");

    let patterns = vec![
        ("simple", r"{\i1}Italic{\i0} text"),
        ("font", r"{\fnNoto Sans CJK JP\fs40}日本語{\r}back"),
        ("karaoke", r"{\k20}ka{\k15}ra{\k30}o{\k10}ke"),
        ("drawing", r"{\p1}m 0 0 l 100 0 100 100 0 100{\p0}label"),
    ];

    for (name, pattern) in patterns {
        let text = pattern.repeat(100);

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::new("runs", name), &text, |b, text| {
            b.iter(|| runs(black_box(text)));
        });
        group.bench_with_input(BenchmarkId::new("rewrite", name), &text, |b, text| {
            b.iter(|| rewrite_font_overrides(black_box(text), |n| n.to_uppercase()));
        });
    }
    group.finish();
}

fn bench_document_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("document_parse");

    let header = "[V4+ Styles]\nFormat: Name, Fontname, Fontsize\nStyle: Default,Arial,20\n\n[Events]\nFormat: Layer, Start, End, Style, Text\n";
    let dialogue = "Dialogue: 0,0:00:01.00,0:00:02.00,Default,{\\fnArial}Hello\\Nworld\n";

    for count in [10, 100, 1000] {
        let text = format!("{}{}", header, dialogue.repeat(count));

        group.throughput(Throughput::Bytes(text.len() as u64));
        group.bench_with_input(BenchmarkId::from_parameter(count), &text, |b, text| {
            b.iter(|| Document::parse(black_box(text)));
        });
    }
    group.finish();
}

criterion_group!(benches, bench_plain_text, bench_override_heavy, bench_document_parse);

criterion_main!(benches);
