//! Layout engine micro-benchmarks
//!
//! Measures layout and draw time for tables, flex rows and grids of growing size.

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use quire::idf::{IRNode, NodeMetadata, TableCell, TableNode, TableRow, TableSection};
use quire::style::stylesheet::ElementStyle;
use quire::traits::RecordingCanvas;
use quire::{EngineBuilder, LayoutEngine};
use serde_json::json;
use std::hint::black_box;

fn engine() -> LayoutEngine {
    EngineBuilder::new().build()
}

fn style(value: serde_json::Value) -> ElementStyle {
    serde_json::from_value(value).expect("Invalid benchmark style")
}

fn render(engine: &LayoutEngine, root: &IRNode) -> usize {
    let mut canvas = RecordingCanvas::new();
    engine
        .render(root, &mut canvas, None)
        .expect("Failed to render document")
        .page_count
}

fn table_document(rows: usize) -> IRNode {
    let cell_style = style(json!({ "border": "0.5pt solid #333333", "padding": 2 }));
    let cell = |text: String| TableCell {
        meta: NodeMetadata::with_style(cell_style.clone()),
        ..TableCell::text(text)
    };
    let row = |i: usize| TableRow {
        cells: (1..=3).map(|c| cell(format!("Row {} Col {}", i, c))).collect(),
    };
    let table = TableNode {
        meta: NodeMetadata::with_style(style(json!({ "borderCollapse": "collapse" }))),
        header: Some(TableSection {
            rows: vec![TableRow {
                cells: (1..=3).map(|c| cell(format!("Col {}", c))).collect(),
            }],
        }),
        body: TableSection {
            rows: (0..rows).map(row).collect(),
        },
        ..Default::default()
    };
    IRNode::Root(vec![IRNode::Table(Box::new(table))])
}

fn flex_document(items: usize) -> IRNode {
    let item_style = style(json!({ "flexGrow": 1, "width": { "pt": 80 } }));
    let children = (0..items)
        .map(|i| IRNode::Block {
            meta: NodeMetadata::with_style(item_style.clone()),
            children: vec![IRNode::paragraph(format!("Item {} with some wrapping text", i))],
        })
        .collect();
    IRNode::Root(vec![IRNode::FlexContainer {
        meta: NodeMetadata::with_style(style(json!({ "flexWrap": "wrap", "columnGap": 4 }))),
        children,
    }])
}

fn grid_document(items: usize) -> IRNode {
    let children = (0..items).map(|i| IRNode::paragraph(format!("Cell {}", i))).collect();
    IRNode::Root(vec![IRNode::GridContainer {
        meta: NodeMetadata::with_style(style(json!({
            "gridTemplateColumns": "repeat(auto-fill, 100pt)",
            "rowGap": 2
        }))),
        children,
    }])
}

fn benchmark_layout_tables(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_tables");
    let engine = engine();

    for row_count in [10, 100, 500] {
        let doc = table_document(row_count);
        group.bench_with_input(BenchmarkId::new("rows", row_count), &doc, |b, doc| {
            b.iter(|| black_box(render(&engine, doc)));
        });
    }

    group.finish();
}

fn benchmark_layout_flex(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_flex");
    let engine = engine();

    for item_count in [10, 100, 500] {
        let doc = flex_document(item_count);
        group.bench_with_input(BenchmarkId::new("items", item_count), &doc, |b, doc| {
            b.iter(|| black_box(render(&engine, doc)));
        });
    }

    group.finish();
}

fn benchmark_layout_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_grid");
    let engine = engine();

    for item_count in [10, 100, 500] {
        let doc = grid_document(item_count);
        group.bench_with_input(BenchmarkId::new("items", item_count), &doc, |b, doc| {
            b.iter(|| black_box(render(&engine, doc)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_layout_tables,
    benchmark_layout_flex,
    benchmark_layout_grid
);
criterion_main!(benches);
