use crate::interface::{LayoutStatus, Renderer};
use crate::nodes::RenderNode;
use crate::test_utils::{build_node, create_paragraph, create_test_engine, layout_in};
use quire_idf::{IRNode, NodeMetadata};
use quire_style::grid::GridTemplate;
use quire_style::stylesheet::ElementStyle;
use quire_types::Rect;

fn grid(columns: &str, children: Vec<IRNode>) -> IRNode {
    let style = ElementStyle {
        grid_template_columns: Some(columns.parse::<GridTemplate>().unwrap()),
        ..Default::default()
    };
    IRNode::GridContainer {
        meta: NodeMetadata::with_style(style),
        children,
    }
}

fn cells(count: usize) -> Vec<IRNode> {
    (0..count).map(|i| create_paragraph(&format!("cell {}", i))).collect()
}

fn placed_boxes(node: &RenderNode) -> Vec<Rect> {
    let RenderNode::Grid(grid) = node else {
        panic!("expected a grid container, got {}", node.kind());
    };
    grid.placed
        .iter()
        .filter_map(|n| n.occupied_area())
        .map(|a| a.bbox)
        .collect()
}

#[test]
fn fr_column_takes_what_the_fixed_column_leaves() {
    let engine = create_test_engine();
    let mut node = build_node(&engine, grid("1fr 100pt", cells(2)));

    let result = layout_in(&engine, &mut node, 400.0, 500.0).unwrap();

    assert_eq!(result.status, LayoutStatus::Full);
    let boxes = placed_boxes(&node);
    assert_eq!(boxes.len(), 2);
    assert!((boxes[0].width - 300.0).abs() < 1e-3);
    assert!((boxes[1].width - 100.0).abs() < 1e-3);
    assert!((boxes[1].left() - 300.0).abs() < 1e-3);
}

#[test]
fn auto_fill_repeats_as_many_tracks_as_fit() {
    let engine = create_test_engine();
    let mut node = build_node(&engine, grid("repeat(auto-fill, 100pt)", cells(3)));

    layout_in(&engine, &mut node, 350.0, 500.0).unwrap();

    let boxes = placed_boxes(&node);
    assert_eq!(boxes.len(), 3);
    let tops: Vec<f32> = boxes.iter().map(|b| b.top()).collect();
    assert!(tops.iter().all(|t| (t - tops[0]).abs() < 1e-3));
    assert!((boxes[2].left() - 200.0).abs() < 1e-3);
}

#[test]
fn rows_that_do_not_fit_continue_in_the_overflow() {
    let engine = create_test_engine();
    let mut node = build_node(&engine, grid("1fr 1fr", cells(6)));

    // Two 14.4pt rows fit in 30pt, the third does not.
    let result = layout_in(&engine, &mut node, 200.0, 30.0).unwrap();

    assert_eq!(result.status, LayoutStatus::Partial);
    let split = result.split.expect("split fragment");
    assert_eq!(placed_boxes(&split).len(), 4);

    let mut overflow = result.overflow.expect("overflow fragment");
    let rest = layout_in(&engine, &mut overflow, 200.0, 500.0).unwrap();
    assert_eq!(rest.status, LayoutStatus::Full);
    let boxes = placed_boxes(&overflow);
    assert_eq!(boxes.len(), 2);
    assert!((boxes[0].top() - 1000.0).abs() < 1e-3);
}
