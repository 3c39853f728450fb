mod common;

use common::fixtures::{block, flex, paragraph};
use common::{TestResult, approx, engine, render};
use quire::types::Color;
use serde_json::json;

const RED: Color = Color::rgb(255, 0, 0);

fn item(style: serde_json::Value, text: &str) -> quire::idf::IRNode {
    block(style, vec![paragraph(text)])
}

#[test]
fn growing_item_fills_the_line() -> TestResult {
    let engine = engine(300.0, 200.0);
    let doc = vec![flex(json!({}), vec![item(json!({"flexGrow": 1, "backgroundColor": "#ff0000"}), "grow")])];

    let out = render(&engine, doc)?;

    let fills = out.fills_of(0, RED);
    assert_eq!(fills.len(), 1);
    assert!(approx(fills[0].width, 300.0), "item is {}pt wide", fills[0].width);
    assert!(approx(fills[0].left(), 0.0));
    Ok(())
}

#[test]
fn space_between_pins_the_outer_items_to_the_edges() -> TestResult {
    let engine = engine(300.0, 200.0);
    let sized = || item(json!({"width": {"pt": 50}, "backgroundColor": "#ff0000"}), "x");
    let doc = vec![flex(json!({"justifyContent": "space-between"}), vec![sized(), sized(), sized()])];

    let out = render(&engine, doc)?;

    let fills = out.fills_of(0, RED);
    assert_eq!(fills.len(), 3);
    assert!(approx(fills[0].left(), 0.0));
    assert!(approx(fills[1].left(), 125.0), "middle item at {}", fills[1].left());
    assert!(approx(fills[2].right(), 300.0));
    Ok(())
}

#[test]
fn wrapped_lines_stack_vertically() -> TestResult {
    let engine = engine(300.0, 400.0);
    let sized = |text| item(json!({"width": {"pt": 200}}), text);
    let doc = vec![flex(json!({"flexWrap": "wrap"}), vec![sized("first"), sized("second")])];

    let out = render(&engine, doc)?;

    let (_, first) = out.find_text("first").expect("first item drawn");
    let (_, second) = out.find_text("second").expect("second item drawn");
    assert!(second.origin.y < first.origin.y);
    assert!(approx(second.origin.x, first.origin.x));
    Ok(())
}

#[test]
fn paragraphs_become_flex_items() -> TestResult {
    let engine = engine(300.0, 200.0);
    let doc = vec![flex(json!({}), vec![paragraph("left"), paragraph("right")])];

    let out = render(&engine, doc)?;

    let (_, left) = out.find_text("left").expect("left drawn");
    let (_, right) = out.find_text("right").expect("right drawn");
    assert!(approx(left.origin.y, right.origin.y), "items share one line");
    assert!(right.origin.x > left.origin.x);
    assert!(out.tags.is_balanced());
    Ok(())
}
