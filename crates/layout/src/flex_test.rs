use crate::interface::{LayoutStatus, Renderer};
use crate::nodes::RenderNode;
use crate::test_utils::{build_node, create_paragraph, create_test_engine, layout_in, styled_block, styled_paragraph};
use quire_idf::{IRNode, ImageSource, NodeMetadata};
use quire_style::dimension::Dimension;
use quire_style::flex::{FlexDirection, FlexWrap, JustifyContent};
use quire_style::stylesheet::ElementStyle;

fn flex(style: ElementStyle, children: Vec<IRNode>) -> IRNode {
    IRNode::FlexContainer {
        meta: NodeMetadata::with_style(style),
        children,
    }
}

fn item(grow: f32, width: Option<f32>) -> IRNode {
    let style = ElementStyle {
        flex_grow: Some(grow),
        width: width.map(Dimension::Pt),
        ..Default::default()
    };
    styled_block(style, vec![create_paragraph("x")])
}

fn placed_boxes(node: &RenderNode) -> Vec<quire_types::Rect> {
    let RenderNode::Flex(flex) = node else {
        panic!("expected a flex container, got {}", node.kind());
    };
    flex.placed
        .iter()
        .filter_map(|n| n.occupied_area())
        .map(|a| a.bbox)
        .collect()
}

#[test]
fn single_growing_item_fills_the_container() {
    let engine = create_test_engine();
    let mut node = build_node(&engine, flex(ElementStyle::default(), vec![item(1.0, None)]));

    let result = layout_in(&engine, &mut node, 300.0, 500.0).unwrap();

    assert_eq!(result.status, LayoutStatus::Full);
    let boxes = placed_boxes(&node);
    assert_eq!(boxes.len(), 1);
    assert!((boxes[0].width - 300.0).abs() < 1e-3);
}

#[test]
fn grow_factors_share_the_free_space() {
    let engine = create_test_engine();
    let mut node = build_node(
        &engine,
        flex(ElementStyle::default(), vec![item(1.0, Some(50.0)), item(2.0, Some(100.0))]),
    );

    layout_in(&engine, &mut node, 300.0, 500.0).unwrap();

    let boxes = placed_boxes(&node);
    assert!((boxes[0].width - 100.0).abs() < 1e-3);
    assert!((boxes[1].width - 200.0).abs() < 1e-3);
    assert!((boxes[0].width + boxes[1].width - 300.0).abs() < 1e-3);
    assert!((boxes[1].left() - 100.0).abs() < 1e-3);
}

#[test]
fn oversized_items_shrink_to_fit_without_wrapping() {
    let engine = create_test_engine();
    let mut node = build_node(
        &engine,
        flex(ElementStyle::default(), vec![item(0.0, Some(200.0)), item(0.0, Some(200.0))]),
    );

    layout_in(&engine, &mut node, 300.0, 500.0).unwrap();

    let boxes = placed_boxes(&node);
    assert!((boxes[0].width - 150.0).abs() < 1e-3);
    assert!((boxes[1].width - 150.0).abs() < 1e-3);
}

#[test]
fn wrapping_starts_a_new_line() {
    let engine = create_test_engine();
    let style = ElementStyle {
        flex_wrap: Some(FlexWrap::Wrap),
        ..Default::default()
    };
    let mut node = build_node(&engine, flex(style, vec![item(0.0, Some(200.0)), item(0.0, Some(200.0))]));

    layout_in(&engine, &mut node, 300.0, 500.0).unwrap();

    let boxes = placed_boxes(&node);
    assert_eq!(boxes.len(), 2);
    assert!((boxes[1].left() - boxes[0].left()).abs() < 1e-3);
    assert!(boxes[1].top() <= boxes[0].bottom() + 1e-3);
}

#[test]
fn space_between_pushes_the_last_item_to_the_end() {
    let engine = create_test_engine();
    let style = ElementStyle {
        justify_content: Some(JustifyContent::SpaceBetween),
        ..Default::default()
    };
    let mut node = build_node(&engine, flex(style, vec![item(0.0, Some(50.0)), item(0.0, Some(50.0))]));

    layout_in(&engine, &mut node, 300.0, 500.0).unwrap();

    let boxes = placed_boxes(&node);
    assert!(boxes[0].left().abs() < 1e-3);
    assert!((boxes[1].right() - 300.0).abs() < 1e-3);
}

fn fixed_height(height: f32) -> IRNode {
    let style = ElementStyle {
        height: Some(Dimension::Pt(height)),
        ..Default::default()
    };
    styled_block(style, Vec::new())
}

#[test]
fn column_reverse_packs_items_against_the_bottom() {
    let engine = create_test_engine();
    let style = ElementStyle {
        flex_direction: Some(FlexDirection::ColumnReverse),
        height: Some(Dimension::Pt(200.0)),
        ..Default::default()
    };
    let mut node = build_node(
        &engine,
        flex(style, vec![fixed_height(10.0), fixed_height(20.0), fixed_height(30.0)]),
    );

    let result = layout_in(&engine, &mut node, 300.0, 500.0).unwrap();

    assert_eq!(result.status, LayoutStatus::Full);
    let boxes = placed_boxes(&node);
    let first = boxes.iter().find(|b| (b.height - 10.0).abs() < 1e-3).unwrap();
    let last = boxes.iter().find(|b| (b.height - 30.0).abs() < 1e-3).unwrap();
    // The container spans 1000 down to 800.
    assert!((first.bottom() - 800.0).abs() < 1e-3, "first item ends at {}", first.bottom());
    assert!((last.top() - 860.0).abs() < 1e-3, "last item starts at {}", last.top());
    assert!(last.bottom() >= first.top() - 1e-3);
}

#[test]
fn items_after_a_split_item_break_at_its_height() {
    let engine = create_test_engine();
    let picture = |h: f32| IRNode::Image {
        meta: NodeMetadata::default(),
        source: ImageSource::new("p.png", 50.0, h),
    };
    let pictures = styled_block(
        ElementStyle {
            width: Some(Dimension::Pt(50.0)),
            ..Default::default()
        },
        vec![picture(30.0), picture(30.0)],
    );
    // Fifteen words, three to a 100pt line.
    let words = "aaaa bbbb cccc dddd eeee ffff gggg hhhh iiii jjjj kkkk llll mmmm nnnn oooo";
    let text = styled_paragraph(
        words,
        ElementStyle {
            width: Some(Dimension::Pt(100.0)),
            ..Default::default()
        },
    );
    let mut node = build_node(&engine, flex(ElementStyle::default(), vec![pictures, text]));

    // 50pt would hold three lines; the pictures break after 30pt.
    let result = layout_in(&engine, &mut node, 200.0, 50.0).unwrap();

    assert_eq!(result.status, LayoutStatus::Partial);
    let split = result.split.unwrap();
    let RenderNode::Flex(split) = &split else {
        panic!("expected a flex container, got {}", split.kind());
    };
    let RenderNode::Paragraph(paragraph) = &split.placed[1] else {
        panic!("expected a paragraph, got {}", split.placed[1].kind());
    };
    assert_eq!(paragraph.lines.len(), 2);

    let RenderNode::Flex(overflow) = result.overflow.unwrap() else {
        panic!("expected a flex container");
    };
    assert_eq!(overflow.carried.len(), 2);
}
