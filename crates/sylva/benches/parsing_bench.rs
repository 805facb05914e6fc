//! Parsing benchmarks over the bundled ClickHouse grammar.

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;
use sylva::grammars::clickhouse;
use sylva::incremental::InputEdit;
use sylva::parser::{Parser, ParserConfig};
use sylva::{Language, TextRange, TextSize};

const SMALL_QUERY: &str = "SELECT id, name FROM users WHERE id = 42";

fn large_query(statements: usize) -> String {
    let mut text = String::new();
    for i in 0..statements {
        text.push_str(&format!(
            "SELECT col{i}, count(*) AS n FROM events_{i} \
             WHERE ts >= 1000 AND region != 'test' \
             GROUP BY col{i} ORDER BY n DESC LIMIT 100;\n"
        ));
    }
    text
}

fn bench_language_load(c: &mut Criterion) {
    c.bench_function("language_load", |b| {
        b.iter(|| {
            let language = clickhouse::language().expect("grammar loads");
            black_box(language)
        });
    });
}

fn bench_full_parse(c: &mut Criterion) {
    let language = clickhouse::language().expect("grammar loads");

    c.bench_function("full_parse_small", |b| {
        let mut parser = uncached_parser(&language);
        b.iter(|| {
            let result = parser.parse(black_box(SMALL_QUERY));
            black_box(result.tree)
        });
    });

    let mut group = c.benchmark_group("full_parse_batch");
    for statements in [10usize, 100] {
        let text = large_query(statements);
        group.bench_with_input(
            BenchmarkId::from_parameter(statements),
            &text,
            |b, text| {
                let mut parser = uncached_parser(&language);
                b.iter(|| {
                    let result = parser.parse(black_box(text));
                    black_box(result.tree)
                });
            },
        );
    }
    group.finish();
}

fn bench_incremental_parse(c: &mut Criterion) {
    let language = clickhouse::language().expect("grammar loads");
    let text = large_query(100);
    let anchor = text.find("events_50").expect("anchor present");
    let edited = text.replacen("events_50", "events_xx", 1);

    c.bench_function("incremental_parse_small_edit", |b| {
        let mut parser = uncached_parser(&language);
        let base = parser.parse(&text).tree;
        b.iter(|| {
            let mut tree = base.clone();
            tree.edit(InputEdit::replace(
                TextRange::at(
                    TextSize::from(u32::try_from(anchor).expect("fits")),
                    TextSize::of("events_50"),
                ),
                TextSize::of("events_xx"),
            ));
            let result = parser.parse_with(black_box(&edited), Some(&tree));
            black_box(result.tree)
        });
    });
}

fn bench_error_recovery(c: &mut Criterion) {
    let language = clickhouse::language().expect("grammar loads");
    let broken = "SELECT id name FROM WHERE users GROUP LIMIT ; SELECT FROM";

    c.bench_function("parse_with_recovery", |b| {
        let mut parser = uncached_parser(&language);
        b.iter(|| {
            let result = parser.parse(black_box(broken));
            black_box((result.tree, result.errors))
        });
    });
}

fn bench_tree_traversal(c: &mut Criterion) {
    let language = clickhouse::language().expect("grammar loads");
    let mut parser = Parser::bind(&language).expect("parser binds");
    let tree = parser.parse(&large_query(100)).tree;

    c.bench_function("tree_preorder_walk", |b| {
        b.iter(|| {
            let mut cursor = tree.walk();
            let mut count = 0usize;
            while cursor.goto_next() {
                count += 1;
            }
            black_box(count)
        });
    });

    c.bench_function("tree_text_reconstruction", |b| {
        b.iter(|| black_box(tree.text()));
    });
}

// the parse cache would turn repeated iterations into hash lookups
fn uncached_parser(language: &Language) -> Parser {
    let config = ParserConfig {
        cache_capacity: 0,
        ..ParserConfig::default()
    };
    Parser::with_config(language, config).expect("parser binds")
}

criterion_group!(
    benches,
    bench_language_load,
    bench_full_parse,
    bench_incremental_parse,
    bench_error_recovery,
    bench_tree_traversal,
);
criterion_main!(benches);
