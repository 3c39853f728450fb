use crate::interface::{LayoutArea, LayoutContext, LayoutStatus, Renderer};
use crate::nodes::RenderNode;
use crate::test_utils::{build_node, create_test_engine, engine_with_page, layout_in, render_nodes, styled_paragraph};
use quire_style::stylesheet::ElementStyle;
use quire_style::text::TextAlign;
use quire_types::Rect;

const TEXT: &str = "alpha beta gamma delta epsilon zeta eta theta iota kappa lambda mu";

fn paragraph(orphans: usize, widows: usize) -> ElementStyle {
    ElementStyle {
        orphans: Some(orphans),
        widows: Some(widows),
        ..Default::default()
    }
}

fn line_count(node: &RenderNode) -> usize {
    match node {
        RenderNode::Paragraph(p) => p.lines.len(),
        other => panic!("expected a paragraph, got {}", other.kind()),
    }
}

#[test]
fn text_wraps_into_several_lines() {
    let engine = create_test_engine();
    let mut node = build_node(&engine, styled_paragraph(TEXT, ElementStyle::default()));

    let result = layout_in(&engine, &mut node, 100.0, 500.0).unwrap();

    assert_eq!(result.status, LayoutStatus::Full);
    assert!(line_count(&node) >= 4);
    let height = result.occupied_height();
    assert!((height - 14.4 * line_count(&node) as f32).abs() < 1e-2);
}

#[test]
fn single_orphan_moves_the_paragraph_to_the_next_area() {
    let engine = create_test_engine();
    let mut node = build_node(&engine, styled_paragraph(TEXT, paragraph(2, 1)));

    // Room for one line only, and the paragraph is not first in the area.
    let area = LayoutArea::new(1, Rect::from_top_left(0.0, 1000.0, 100.0, 20.0));
    let mut floats = Vec::new();
    let mut ctx = LayoutContext::new(&engine, area, &mut floats);
    ctx.first_in_area = false;
    let result = node.layout(&mut ctx).unwrap();

    assert_eq!(result.status, LayoutStatus::Nothing);
    assert_eq!(result.cause_of_nothing, Some(node.id()));
}

#[test]
fn forced_placement_keeps_a_single_orphan() {
    let engine = create_test_engine();
    let mut node = build_node(&engine, styled_paragraph(TEXT, paragraph(2, 1)));

    let area = LayoutArea::new(1, Rect::from_top_left(0.0, 1000.0, 100.0, 20.0));
    let mut floats = Vec::new();
    let mut ctx = LayoutContext::new(&engine, area, &mut floats);
    ctx.forced_placement = true;
    let result = node.layout(&mut ctx).unwrap();

    assert_eq!(result.status, LayoutStatus::Partial);
    assert_eq!(line_count(result.split.as_ref().unwrap()), 1);
}

#[test]
fn two_lines_satisfy_orphans_of_two() {
    let engine = create_test_engine();
    let mut node = build_node(&engine, styled_paragraph(TEXT, paragraph(2, 1)));

    let result = layout_in(&engine, &mut node, 100.0, 30.0).unwrap();

    assert_eq!(result.status, LayoutStatus::Partial);
    assert_eq!(line_count(result.split.as_ref().unwrap()), 2);
    let mut rest = result.overflow.unwrap();
    let result = layout_in(&engine, &mut rest, 100.0, 500.0).unwrap();
    assert_eq!(result.status, LayoutStatus::Full);
}

#[test]
fn widows_pull_lines_into_the_next_area() {
    let engine = create_test_engine();
    let mut node = build_node(&engine, styled_paragraph(TEXT, paragraph(1, 2)));
    let mut measure = node.clone();
    layout_in(&engine, &mut measure, 100.0, 500.0).unwrap();
    let total = line_count(&measure);

    // Leave exactly one line for the next area; the widow rule pulls one more.
    let height = 14.4 * (total - 1) as f32 + 1.0;
    let result = layout_in(&engine, &mut node, 100.0, height).unwrap();

    assert_eq!(result.status, LayoutStatus::Partial);
    assert_eq!(line_count(result.split.as_ref().unwrap()), total - 2);
}

#[test]
fn centered_lines_sit_in_the_middle() {
    let engine = engine_with_page(100.0, 200.0);
    let style = ElementStyle {
        text_align: Some(TextAlign::Center),
        ..Default::default()
    };
    let (canvas, _, summary) = render_nodes(&engine, vec![styled_paragraph("abcd", style)]).unwrap();

    assert_eq!(summary.page_count, 1);
    let runs = canvas.texts(0);
    // Four glyphs at 6pt each, centered in 100pt.
    assert!((runs[0].origin.x - 38.0).abs() < 1e-2, "text starts at {}", runs[0].origin.x);
}
