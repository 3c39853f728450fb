use crate::interface::LayoutStatus;
use crate::nodes::RenderNode;
use crate::nodes::table::TableRenderer;
use crate::test_utils::{build_node, create_test_engine, engine_with_page, layout_in, render_nodes};
use quire_idf::{IRNode, NodeMetadata, TableCell, TableNode, TableRow, TableSection};
use quire_style::border::Border;
use quire_style::stylesheet::ElementStyle;
use quire_style::table::BorderCollapse;

fn bordered() -> ElementStyle {
    ElementStyle {
        border: Some(Border::solid(2.0)),
        ..Default::default()
    }
}

fn cell(text: &str) -> TableCell {
    TableCell {
        meta: NodeMetadata::with_style(bordered()),
        ..TableCell::text(text)
    }
}

fn rows(count: usize, cols: usize) -> Vec<TableRow> {
    (0..count)
        .map(|r| TableRow {
            cells: (0..cols).map(|c| cell(&format!("r{}c{}", r, c))).collect(),
        })
        .collect()
}

fn table(header: Option<Vec<TableRow>>, body: Vec<TableRow>) -> IRNode {
    let style = ElementStyle {
        border_collapse: Some(BorderCollapse::Collapse),
        ..bordered()
    };
    IRNode::Table(Box::new(TableNode {
        meta: NodeMetadata::with_style(style),
        header: header.map(|rows| TableSection { rows }),
        body: TableSection { rows: body },
        ..Default::default()
    }))
}

fn as_table(node: &RenderNode) -> &TableRenderer {
    match node {
        RenderNode::Table(t) => t,
        other => panic!("expected a table, got {}", other.kind()),
    }
}

#[test]
fn split_boundary_shares_one_border_on_both_fragments() {
    let engine = create_test_engine();
    let mut node = build_node(&engine, table(None, rows(3, 2)));

    // Room for the first row only.
    let result = layout_in(&engine, &mut node, 200.0, 25.0).unwrap();
    assert_eq!(result.status, LayoutStatus::Partial);

    let split = result.split.unwrap();
    let split_grid = as_table(&split).placed.as_ref().unwrap().grid.clone().unwrap();
    assert_eq!(split_grid.horizontal.len(), 2);

    let mut overflow = result.overflow.unwrap();
    let rest = layout_in(&engine, &mut overflow, 200.0, 500.0).unwrap();
    assert_eq!(rest.status, LayoutStatus::Full);
    let rest_grid = as_table(&overflow).placed.as_ref().unwrap().grid.clone().unwrap();
    assert_eq!(rest_grid.horizontal.len(), 3);

    let outgoing = split_grid.horizontal.last().unwrap();
    let incoming = &rest_grid.horizontal[0];
    assert_eq!(outgoing, incoming);
    assert!(outgoing.iter().all(|b| *b == Some(Border::solid(2.0))));
}

#[test]
fn header_repeats_on_every_fragment() {
    let engine = create_test_engine();
    let mut node = build_node(&engine, table(Some(rows(1, 2)), rows(4, 2)));

    let result = layout_in(&engine, &mut node, 200.0, 40.0).unwrap();
    assert_eq!(result.status, LayoutStatus::Partial);

    let mut overflow = result.overflow.unwrap();
    layout_in(&engine, &mut overflow, 200.0, 500.0).unwrap();
    for fragment in [result.split.as_ref().unwrap(), &overflow] {
        let placed = as_table(fragment).placed.as_ref().unwrap();
        assert_eq!(placed.sections[0].rows.len(), 1, "header row on every fragment");
        assert!(!placed.sections[1].rows.is_empty());
    }
}

#[test]
fn split_table_draws_every_cell_once() {
    let engine = engine_with_page(200.0, 60.0);
    let (canvas, tags, summary) = render_nodes(&engine, vec![table(None, rows(5, 2))]).unwrap();

    assert!(summary.page_count >= 2);
    let text = canvas.all_text();
    for r in 0..5 {
        for c in 0..2 {
            let label = format!("r{}c{}", r, c);
            assert_eq!(text.matches(&label).count(), 1, "{} drawn once", label);
        }
    }
    assert!(tags.is_balanced());
}
