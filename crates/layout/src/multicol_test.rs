use crate::interface::LayoutStatus;
use crate::nodes::RenderNode;
use crate::nodes::multicol::MulticolRenderer;
use crate::test_utils::{build_node, create_test_engine, init_logging, layout_in};
use crate::{LayoutConfig, LayoutEngine};
use quire_idf::{IRNode, ImageSource, NodeMetadata};
use quire_style::stylesheet::{ElementStyle, Stylesheet};

fn picture(height: f32) -> IRNode {
    IRNode::Image {
        meta: NodeMetadata::default(),
        source: ImageSource::new(format!("h{}.png", height), 50.0, height),
    }
}

/// Two columns without a gap holding pictures 40, 20, 5 and 45pt tall.
fn two_columns() -> IRNode {
    let style = ElementStyle {
        column_count: Some(2),
        column_gap: Some(0.0),
        ..Default::default()
    };
    IRNode::MultiColumn {
        meta: NodeMetadata::with_style(style),
        children: [40.0, 20.0, 5.0, 45.0].into_iter().map(picture).collect(),
    }
}

fn as_multicol(node: &RenderNode) -> &MulticolRenderer {
    match node {
        RenderNode::Multicol(m) => m,
        other => panic!("expected a multi-column container, got {}", other.kind()),
    }
}

#[test]
fn height_search_steps_by_the_smallest_shortage() {
    let engine = create_test_engine();
    let mut node = build_node(&engine, two_columns());

    // First guess 55: the left column lacks 5pt for the 20pt picture, the
    // right one 15pt for the 45pt picture. Stepping by 5 balances at 60.
    let result = layout_in(&engine, &mut node, 200.0, 500.0).unwrap();

    assert_eq!(result.status, LayoutStatus::Full);
    assert!((result.occupied_height() - 60.0).abs() < 1e-2, "height {}", result.occupied_height());
    let columns = &as_multicol(&node).columns;
    assert_eq!(columns.len(), 2);
    assert_eq!(columns[0].len(), 2);
    assert_eq!(columns[1].len(), 2);
}

#[test]
fn exhausted_search_fills_columns_to_the_available_height() {
    init_logging();
    let config = LayoutConfig {
        max_relayout_count: 1,
        ..Default::default()
    };
    let engine = LayoutEngine::new(Stylesheet::default(), config);
    let mut node = build_node(&engine, two_columns());

    let result = layout_in(&engine, &mut node, 200.0, 500.0).unwrap();

    assert_eq!(result.status, LayoutStatus::Full);
    assert!((result.occupied_height() - 110.0).abs() < 1e-2, "height {}", result.occupied_height());
    assert_eq!(as_multicol(&node).columns.len(), 1);
}
