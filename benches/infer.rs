use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rulescribe::{
    build, merge, parse_token, Config, DocBlock, Inferrer, Method, PresencePolicy, RawRuleSet,
    Route,
};

fn wide_form(n: usize) -> RawRuleSet {
    (0..n).fold(RawRuleSet::structured(), |raw, i| {
        raw.field(format!("field_{i}"), "required|string|max:255")
            .field(format!("items_{i}.*.name"), "string|between:1,64")
            .field(format!("items_{i}.*.qty"), "integer|min:1")
    })
}

fn bench_parse_token(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_token");
    for token in ["required", "max:255", "in:draft,published,archived", "regex:/^x$/"] {
        group.bench_with_input(BenchmarkId::from_parameter(token), token, |b, token| {
            b.iter(|| parse_token(token));
        });
    }
    group.finish();
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");
    for n in [10, 100, 500] {
        let rules = wide_form(n).resolve(32).unwrap();
        group.bench_with_input(BenchmarkId::from_parameter(n), &rules, |b, rules| {
            b.iter(|| build(rules));
        });
    }
    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let structured = wide_form(100).resolve(32).unwrap();
    let inline = wide_form(50).resolve(32).unwrap();
    c.bench_function("merge_two_sources", |b| {
        b.iter(|| {
            merge(
                vec![structured.clone(), inline.clone()],
                PresencePolicy::LatestSource,
            )
        });
    });
}

fn bench_describe(c: &mut Criterion) {
    let inferrer = Inferrer::new(Config::default(), false);
    let sources = vec![wide_form(100), RawRuleSet::inline().field("avatar", "image")];
    let route = Route::new(Method::Post, "/orders");
    let doc = DocBlock::new().summary("Create an order.");
    c.bench_function("describe_post_100_fields", |b| {
        b.iter(|| inferrer.describe(&route, &sources, &doc));
    });
}

criterion_group!(
    benches,
    bench_parse_token,
    bench_build,
    bench_merge,
    bench_describe
);
criterion_main!(benches);
