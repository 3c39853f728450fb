mod common;

use common::fixtures::{paragraph, table};
use common::{TestResult, engine, render};
use quire::traits::TagRole;
use serde_json::json;

fn collapsed() -> serde_json::Value {
    json!({"borderCollapse": "collapse", "border": "2pt solid #000000"})
}

#[test]
fn every_cell_is_drawn_once_across_pages() -> TestResult {
    let engine = engine(200.0, 80.0);
    let doc = vec![table(collapsed(), json!({"border": "2pt solid #000000"}), None, 8, 2)];

    let out = render(&engine, doc)?;

    assert!(out.summary.page_count >= 2);
    let text = out.canvas.all_text();
    for r in 0..8 {
        for c in 0..2 {
            assert_eq!(text.matches(&format!("r{}c{}", r, c)).count(), 1);
        }
    }
    Ok(())
}

#[test]
fn header_is_repeated_on_every_page() -> TestResult {
    let engine = engine(200.0, 80.0);
    let doc = vec![table(json!({}), json!({}), Some(&["Name", "Qty"]), 8, 2)];

    let out = render(&engine, doc)?;

    let pages = out.summary.page_count;
    assert!(pages >= 2);
    for page in 0..pages {
        let texts = out.canvas.texts(page);
        assert!(texts.iter().any(|r| r.text == "Name"), "header on page {}", page + 1);
    }
    Ok(())
}

#[test]
fn split_fragments_both_stroke_the_boundary_border() -> TestResult {
    let engine = engine(200.0, 80.0);
    let doc = vec![table(collapsed(), json!({"border": "2pt solid #000000"}), None, 8, 2)];

    let out = render(&engine, doc)?;

    // Each fragment closes its own grid with a horizontal 2pt rule.
    for page in 0..2 {
        let horizontal: Vec<_> = out
            .canvas
            .lines(page)
            .into_iter()
            .filter(|(from, to, _)| (from.y - to.y).abs() < 1e-3)
            .collect();
        assert!(horizontal.len() >= 2, "page {} has {} rules", page + 1, horizontal.len());
        assert!(horizontal.iter().all(|(_, _, w)| (*w - 2.0).abs() < 1e-3));
    }
    Ok(())
}

#[test]
fn table_tags_follow_sections_and_rows() -> TestResult {
    let engine = engine(300.0, 400.0);
    let doc = vec![
        paragraph("before"),
        table(json!({}), json!({}), Some(&["A", "B"]), 2, 2),
    ];

    let out = render(&engine, doc)?;

    let roles = out.tags.roles();
    assert!(out.tags.is_balanced());
    for role in [TagRole::Table, TagRole::THead, TagRole::TBody, TagRole::TR, TagRole::TH, TagRole::TD] {
        assert!(roles.contains(&role), "missing {:?}", role);
    }
    assert_eq!(out.tags.find(TagRole::TH).len(), 2);
    assert_eq!(out.tags.find(TagRole::TD).len(), 4);
    Ok(())
}
