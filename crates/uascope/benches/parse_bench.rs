use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use std::hint::black_box;
use uascope::UserAgentAnalyzer;

const CORPUS: &[&str] = &[
    "Mozilla/5.0 (Windows; U; Windows NT 5.1; en-US; rv:1.8.1.11) Gecko/20071127 Firefox/2.0.0.11",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/103.0.0.0 Safari/537.36",
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/100.0.4896.127 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.5 Safari/605.1.15",
    "Mozilla/5.0 (iPhone; CPU iPhone OS 16_6 like Mac OS X) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/16.5 Mobile/15E148 Safari/604.1",
    "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/112.0.0.0 Mobile Safari/537.36",
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
    "curl/7.68.0",
];

fn bench_cold_parse(c: &mut Criterion) {
    let analyzer = UserAgentAnalyzer::builder()
        .disable_caching()
        .immediate_initialization()
        .build()
        .expect("analyzer builds");

    let mut group = c.benchmark_group("parse_cold");
    group.throughput(Throughput::Elements(CORPUS.len() as u64));
    group.bench_function("corpus", |b| {
        b.iter(|| {
            for ua in CORPUS {
                black_box(analyzer.parse(black_box(ua)));
            }
        })
    });
    group.finish();
}

fn bench_cached_parse(c: &mut Criterion) {
    let analyzer = UserAgentAnalyzer::builder()
        .cache_size(10_000)
        .immediate_initialization()
        .build()
        .expect("analyzer builds");
    for ua in CORPUS {
        analyzer.parse(ua);
    }

    let mut group = c.benchmark_group("parse_cached");
    group.throughput(Throughput::Elements(CORPUS.len() as u64));
    group.bench_function("corpus", |b| {
        b.iter(|| {
            for ua in CORPUS {
                black_box(analyzer.parse(black_box(ua)));
            }
        })
    });
    group.finish();
}

fn bench_single_agents(c: &mut Criterion) {
    let analyzer = UserAgentAnalyzer::builder()
        .disable_caching()
        .immediate_initialization()
        .build()
        .expect("analyzer builds");

    let mut group = c.benchmark_group("parse_single");
    for (label, ua) in [
        ("firefox", CORPUS[0]),
        ("chrome", CORPUS[2]),
        ("robot", CORPUS[6]),
        ("empty", ""),
    ] {
        group.bench_with_input(BenchmarkId::from_parameter(label), ua, |b, ua| {
            b.iter(|| black_box(analyzer.parse(black_box(ua))));
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_cold_parse,
    bench_cached_parse,
    bench_single_agents
);
criterion_main!(benches);
