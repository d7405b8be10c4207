//! Spec build and render throughput benchmarks
//!
//! Measures building specs of growing size with:
//! - Plain nested elements (tree building only)
//! - Namespaced elements with callables (scope threading and thunk evaluation)
//! - The full render path (JSON in, XML out)
//!
//! Run benchmarks: `cargo bench --bench build_throughput`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use mixup::{MarkupBuilder, NodeId, RenderBuilder, Spec, Tree, TreeBackend};
use serde_json::{Value, json};
use std::hint::black_box;

/// A table with `rows` rows of four cells each
fn table_spec(rows: usize) -> Value {
    let rows: Vec<Value> = (0..rows)
        .map(|i| {
            json!({
                "#tr": [
                    { "#td": i, "class": "id" },
                    { "#td": format!("Record {}", i) },
                    { "#td": i * 100, "style": { "text-align": "right" } },
                    { "#td": { "#a": "open", "href": format!("/records/{}", i) } }
                ]
            })
        })
        .collect();
    json!({ "#table": [{ "#tbody": rows }], "xmlns": "http://www.w3.org/1999/xhtml" })
}

/// The same table built from callables over the args
fn templated_spec(rows: usize) -> Spec<NodeId> {
    let row = Spec::func(|args: &[Spec<NodeId>]| {
        Spec::map([
            ("#svg:g", Spec::list(vec![Spec::map([("#svg:text", args[0].clone())])])),
            ("svg:class", Spec::from("row")),
        ])
    });
    Spec::map([
        ("#svg:svg", Spec::list((0..rows).map(|_| row.clone()))),
        ("xmlns:svg", Spec::from("http://www.w3.org/2000/svg")),
    ])
}

fn benchmark_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build");

    for rows in [10, 100, 1000] {
        group.throughput(Throughput::Elements(rows as u64));
        let spec = Spec::from(table_spec(rows));

        group.bench_with_input(BenchmarkId::new("table_rows", rows), &spec, |b, spec| {
            b.iter(|| {
                let mut tree = Tree::new();
                let doc = tree.create_document();
                MarkupBuilder::new(&mut tree)
                    .build(doc, spec.clone(), vec![])
                    .expect("Failed to build spec");
                black_box(tree.len())
            });
        });
    }

    group.finish();
}

fn benchmark_templated(c: &mut Criterion) {
    let mut group = c.benchmark_group("templated");

    for rows in [10, 100, 1000] {
        group.throughput(Throughput::Elements(rows as u64));
        let spec = templated_spec(rows);

        group.bench_with_input(BenchmarkId::new("svg_rows", rows), &spec, |b, spec| {
            b.iter(|| {
                let mut tree = Tree::new();
                let doc = tree.create_document();
                MarkupBuilder::new(&mut tree)
                    .build(doc, spec.clone(), vec![Spec::from("label")])
                    .expect("Failed to build spec");
                black_box(tree.len())
            });
        });
    }

    group.finish();
}

fn benchmark_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("render");
    let renderer = RenderBuilder::new().build();

    for rows in [10, 100, 1000] {
        group.throughput(Throughput::Elements(rows as u64));
        let source = table_spec(rows).to_string();

        group.bench_with_input(BenchmarkId::new("json_to_xml", rows), &source, |b, source| {
            b.iter(|| black_box(renderer.render_str(source).expect("Failed to render")));
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_build, benchmark_templated, benchmark_render);
criterion_main!(benches);
