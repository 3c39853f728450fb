mod common;

use common::fixtures::list;
use common::{TestResult, engine, render};
use quire::traits::TagRole;
use serde_json::json;

#[test]
fn ordered_list_numbers_from_its_start_value() -> TestResult {
    let engine = engine(300.0, 300.0);
    let doc = vec![list(json!({"listStyleType": "decimal", "padding": {"left": 20}}), Some(3), &["alpha", "beta"])];

    let out = render(&engine, doc)?;

    let (_, three) = out.find_text("3.").expect("first marker");
    let (_, four) = out.find_text("4.").expect("second marker");
    let (_, alpha) = out.find_text("alpha").expect("first item body");
    assert!(three.origin.x < alpha.origin.x, "outside marker sits left of the body");
    assert!(four.origin.y < three.origin.y);
    Ok(())
}

#[test]
fn list_tags_carry_label_and_body() -> TestResult {
    let engine = engine(300.0, 300.0);
    let doc = vec![list(json!({"listStyleType": "lower-roman"}), None, &["one", "two", "three"])];

    let out = render(&engine, doc)?;

    assert!(out.tags.is_balanced());
    let lists = out.tags.find(TagRole::L);
    assert_eq!(lists.len(), 1);
    assert_eq!(lists[0].list_numbering, Some("LowerRoman"));
    assert_eq!(out.tags.find(TagRole::LI).len(), 3);
    assert_eq!(out.tags.find(TagRole::Lbl).len(), 3);
    assert_eq!(out.tags.find(TagRole::LBody).len(), 3);
    assert!(out.canvas.all_text().contains("iii."));
    Ok(())
}

#[test]
fn long_lists_continue_on_the_next_page() -> TestResult {
    let engine = engine(300.0, 60.0);
    let items: Vec<String> = (0..6).map(|i| format!("item{}", i)).collect();
    let labels: Vec<&str> = items.iter().map(String::as_str).collect();
    let doc = vec![list(json!({"listStyleType": "decimal", "padding": {"left": 20}}), None, &labels)];

    let out = render(&engine, doc)?;

    assert_eq!(out.summary.page_count, 2);
    let (page, _) = out.find_text("item5").expect("last item drawn");
    assert_eq!(page, 1);
    let (page, _) = out.find_text("6.").expect("last marker drawn");
    assert_eq!(page, 1);
    Ok(())
}
