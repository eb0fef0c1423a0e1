use criterion::{black_box, criterion_group, criterion_main, Criterion};

use html5pull::Tokenizer;

fn pattern(c: &mut Criterion, name: &str, pattern: &str, repeat: usize) {
    let input: String = pattern.repeat(repeat);
    c.bench_function(name, |b| {
        b.iter(|| {
            for token in Tokenizer::new(black_box(&input)).infallible() {
                black_box(token);
            }
        })
    });
}

fn patterns(c: &mut Criterion) {
    pattern(c, "data_10000", "a", 10_000);
    pattern(c, "tags_10000", "<a></a>", 10_000);
    pattern(c, "attributes_10000", "<a href=\"x\" class=y>", 10_000);
    pattern(c, "comments_10000", "<!-- -->", 10_000);
    pattern(c, "entities_10000", "&amp;&notin;&#65;", 10_000);
    pattern(c, "script_1000", "<script>if (a < b) { c(); }<!--d--></script>", 1_000);
}

criterion_group!(benches, patterns);
criterion_main!(benches);
