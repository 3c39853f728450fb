mod common;

use common::fixtures::{block, grid, paragraph};
use common::{TestResult, approx, engine, render};
use quire::types::Color;
use serde_json::json;

const RED: Color = Color::rgb(255, 0, 0);
const BLUE: Color = Color::rgb(0, 0, 255);

#[test]
fn fr_track_takes_the_remaining_width() -> TestResult {
    let engine = engine(400.0, 300.0);
    let doc = vec![grid(
        json!({"gridTemplateColumns": "1fr 100pt"}),
        vec![
            block(json!({"backgroundColor": "#ff0000"}), vec![paragraph("flexible")]),
            block(json!({"backgroundColor": "#0000ff"}), vec![paragraph("fixed")]),
        ],
    )];

    let out = render(&engine, doc)?;

    let red = out.fills_of(0, RED);
    let blue = out.fills_of(0, BLUE);
    assert!(approx(red[0].width, 300.0), "fr track is {}pt", red[0].width);
    assert!(approx(blue[0].width, 100.0));
    assert!(approx(blue[0].left(), 300.0));
    Ok(())
}

#[test]
fn explicitly_placed_items_claim_their_cells_first() -> TestResult {
    let engine = engine(400.0, 300.0);
    let doc = vec![grid(
        json!({"gridTemplateColumns": "100pt 100pt"}),
        vec![
            block(json!({"backgroundColor": "#ff0000"}), vec![paragraph("auto")]),
            block(
                json!({"backgroundColor": "#0000ff", "gridColumnStart": 1, "gridRowStart": 1}),
                vec![paragraph("pinned")],
            ),
        ],
    )];

    let out = render(&engine, doc)?;

    let pinned = out.fills_of(0, BLUE)[0];
    let auto = out.fills_of(0, RED)[0];
    assert!(approx(pinned.left(), 0.0));
    assert!(approx(auto.left(), 100.0), "auto item at {}", auto.left());
    assert!(approx(auto.top(), pinned.top()));
    Ok(())
}

#[test]
fn tall_grid_continues_on_the_next_page() -> TestResult {
    let engine = engine(200.0, 50.0);
    let cells = (0..8).map(|i| paragraph(&format!("cell{}", i))).collect();
    let doc = vec![grid(json!({"gridTemplateColumns": "1fr 1fr"}), cells)];

    let out = render(&engine, doc)?;

    assert!(out.summary.page_count >= 2);
    let text = out.canvas.all_text();
    for i in 0..8 {
        assert_eq!(text.matches(&format!("cell{}", i)).count(), 1);
    }
    let (page, _) = out.find_text("cell7").expect("last cell drawn");
    assert!(page > 0);
    assert!(out.tags.is_balanced());
    Ok(())
}
