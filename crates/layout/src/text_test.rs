use crate::test_utils::{create_paragraph, engine_with_page, render_nodes, styled_paragraph};
use quire_idf::{IRNode, InlineNode, NodeMetadata};
use quire_style::stylesheet::ElementStyle;
use quire_style::text::{BaseDirection, TabAlignment, TabStop, TextAlign};
use quire_traits::UnicodeBidiTypography;
use std::sync::Arc;

fn baselines(canvas: &quire_traits::RecordingCanvas) -> Vec<f32> {
    let mut ys: Vec<f32> = canvas.texts(0).iter().map(|r| r.origin.y).collect();
    ys.dedup_by(|a, b| (*a - *b).abs() < 0.01);
    ys
}

#[test]
fn test_text_wrapping() {
    let engine = engine_with_page(200.0, 500.0);
    let text = "This is a very very long line of text that is absolutely guaranteed to wrap at least once.";

    let (canvas, _, _) = render_nodes(&engine, vec![create_paragraph(text)]).unwrap();

    let ys = baselines(&canvas);
    assert!(ys.len() > 1, "expected several lines, got {:?}", ys);
    assert!((ys[0] - ys[1] - 14.4).abs() < 0.01);
    assert!(canvas.all_text().contains("guaranteed"));
}

#[test]
fn test_explicit_line_break() {
    let engine = engine_with_page(400.0, 500.0);

    let (canvas, _, _) = render_nodes(&engine, vec![create_paragraph("first\nsecond")]).unwrap();

    let runs = canvas.texts(0);
    let first = runs.iter().find(|r| r.text.contains("first")).unwrap();
    let second = runs.iter().find(|r| r.text.contains("second")).unwrap();
    assert!(second.origin.y < first.origin.y);
    assert!((second.origin.x - first.origin.x).abs() < 0.01);
}

#[test]
fn test_tab_advances_to_default_pitch() {
    let engine = engine_with_page(400.0, 500.0);
    let paragraph = IRNode::Paragraph {
        meta: NodeMetadata::default(),
        children: vec![
            InlineNode::Text("a".to_string()),
            InlineNode::Tab,
            InlineNode::Text("b".to_string()),
        ],
    };

    let (canvas, _, _) = render_nodes(&engine, vec![paragraph]).unwrap();

    let runs = canvas.texts(0);
    let b = runs.iter().find(|r| r.text == "b").unwrap();
    assert!((b.origin.x - 50.0).abs() < 0.01, "tab stop at {}", b.origin.x);
}

#[test]
fn test_right_aligned_text_ends_at_the_edge() {
    let engine = engine_with_page(100.0, 500.0);
    let style = ElementStyle {
        text_align: Some(TextAlign::Right),
        ..Default::default()
    };

    let (canvas, _, _) = render_nodes(&engine, vec![styled_paragraph("abcd", style)]).unwrap();

    let run = &canvas.texts(0)[0];
    assert!((run.origin.x - 76.0).abs() < 0.01);
}

#[test]
fn justified_lines_split_free_space_by_the_spacing_ratio() {
    let engine = engine_with_page(100.0, 500.0);
    let style = ElementStyle {
        text_align: Some(TextAlign::Justify),
        spacing_ratio: Some(0.75),
        ..Default::default()
    };

    let (canvas, _, _) = render_nodes(&engine, vec![styled_paragraph("aa bb cc dd ee ff gg", style)]).unwrap();

    // "aa bb cc dd ee" is 84pt wide: 16pt over 4 spaces and 13 glyph gaps.
    let runs = canvas.texts(0);
    assert_eq!(runs[0].text, "aa bb cc dd ee");
    assert!((runs[0].word_spacing - 1.92).abs() < 1e-3, "word spacing {}", runs[0].word_spacing);
    assert!((runs[0].char_spacing - 0.64).abs() < 1e-3, "char spacing {}", runs[0].char_spacing);
    let spread = 4.0 * runs[0].word_spacing + 13.0 * runs[0].char_spacing;
    assert!((spread - 16.0).abs() < 1e-3);

    let last = runs.last().unwrap();
    assert_eq!(last.text, "ff gg");
    assert_eq!(last.char_spacing, 0.0);
    assert_eq!(last.word_spacing, 0.0);
}

fn tabbed(stop: TabStop, after: &str) -> IRNode {
    let style = ElementStyle {
        tab_stops: Some(vec![stop]),
        ..Default::default()
    };
    IRNode::Paragraph {
        meta: NodeMetadata::with_style(style),
        children: vec![
            InlineNode::Text("a".to_string()),
            InlineNode::Tab,
            InlineNode::Text(after.to_string()),
        ],
    }
}

fn start_of(canvas: &quire_traits::RecordingCanvas, text: &str) -> f32 {
    canvas.texts(0).iter().find(|r| r.text == text).unwrap().origin.x
}

#[test]
fn right_tab_stop_ends_the_following_text_on_the_stop() {
    let engine = engine_with_page(400.0, 500.0);
    let stop = TabStop::new(100.0, TabAlignment::Right);

    let (canvas, _, _) = render_nodes(&engine, vec![tabbed(stop, "bcd")]).unwrap();

    assert!((start_of(&canvas, "bcd") - 82.0).abs() < 0.01);
}

#[test]
fn center_tab_stop_centers_the_following_text() {
    let engine = engine_with_page(400.0, 500.0);
    let stop = TabStop::new(100.0, TabAlignment::Center);

    let (canvas, _, _) = render_nodes(&engine, vec![tabbed(stop, "bcd")]).unwrap();

    assert!((start_of(&canvas, "bcd") - 91.0).abs() < 0.01);
}

#[test]
fn anchor_tab_stop_aligns_the_anchor_character() {
    let engine = engine_with_page(400.0, 500.0);
    let stop = TabStop::anchored(100.0, '.');

    let (canvas, _, _) = render_nodes(&engine, vec![tabbed(stop, "12.50")]).unwrap();

    // "12" sits before the stop, the decimal point on it.
    assert!((start_of(&canvas, "12.50") - 88.0).abs() < 0.01);
}

#[test]
fn right_to_left_runs_are_reversed_and_mirrored() {
    let engine = engine_with_page(400.0, 500.0).with_typography(Arc::new(UnicodeBidiTypography));
    let style = ElementStyle {
        base_direction: Some(BaseDirection::LeftToRight),
        ..Default::default()
    };

    let (canvas, _, _) =
        render_nodes(&engine, vec![styled_paragraph("x \u{05D0}\u{05D1}[\u{05D2}", style)]).unwrap();

    let runs = canvas.texts(0);
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].text, "x ");
    assert_eq!(runs[1].text, "\u{05D2}]\u{05D1}\u{05D0}");
    assert!((runs[1].origin.x - 12.0).abs() < 0.01);
}
