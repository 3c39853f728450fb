use crate::style::{ComputedStyle, compute_style, get_default_style};
use quire_style::boxes::FloatSide;
use quire_style::dimension::{Dimension, Margins};
use quire_style::font::FontWeight;
use quire_style::list::ListStyleType;
use quire_style::stylesheet::ElementStyle;
use quire_style::text::TextAlign;
use quire_traits::FontDescriptor;
use quire_types::Color;
use std::sync::Arc;

#[test]
fn test_style_inheritance() {
    let mut parent = (*get_default_style()).clone();
    parent.text.font = FontDescriptor::new("Times New Roman");
    parent.text.font_size = 20.0;
    parent.text.line_height = 24.0;
    parent.text.color = Color::rgb(10, 20, 30);
    parent.text.text_align = TextAlign::Center;
    parent.list.style_type = ListStyleType::LowerRoman;
    parent.misc.orphans = 3;
    let parent = Arc::new(parent);

    let computed = compute_style(&[], None, &parent);

    assert_eq!(&*computed.text.font.family, "Times New Roman");
    assert_eq!(computed.text.font_size, 20.0);
    assert_eq!(computed.text.line_height, 24.0);
    assert_eq!(computed.text.color, Color::rgb(10, 20, 30));
    assert_eq!(computed.text.text_align, TextAlign::Center);
    assert_eq!(computed.list.style_type, ListStyleType::LowerRoman);
    assert_eq!(computed.misc.orphans, 3);
}

#[test]
fn test_style_non_inheritance() {
    let mut parent = ComputedStyle::default();
    parent.box_model.margin = Margins::all(50.0);
    parent.box_model.padding = Margins::all(30.0);
    parent.box_model.width = Some(Dimension::Pt(100.0));
    parent.misc.background_color = Some(Color::rgb(255, 0, 0));
    parent.misc.float = FloatSide::Left;
    parent.flex.grow = 2.0;
    let parent = Arc::new(parent);

    let computed = compute_style(&[], None, &parent);

    assert_eq!(computed.box_model.margin, Margins::default());
    assert_eq!(computed.box_model.padding, Margins::default());
    assert_eq!(computed.box_model.width, None);
    assert_eq!(computed.misc.background_color, None);
    assert!(!computed.is_floating());
    assert_eq!(computed.flex.grow, 0.0);
}

#[test]
fn test_line_height_auto_calculation() {
    let parent = get_default_style();
    let style_override = ElementStyle {
        font_size: Some(10.0),
        ..Default::default()
    };

    let computed = compute_style(&[], Some(&style_override), &parent);
    assert_eq!(computed.text.font_size, 10.0);
    assert!((computed.text.line_height - 12.0).abs() < 0.01);

    let explicit = ElementStyle {
        font_size: Some(10.0),
        line_height: Some(20.0),
        ..Default::default()
    };
    let computed = compute_style(&[], Some(&explicit), &parent);
    assert_eq!(computed.text.line_height, 20.0);
}

#[test]
fn test_style_cascade_precedence() {
    let mut parent = ComputedStyle::default();
    parent.text.font_size = 10.0;
    parent.text.color = Color::rgb(255, 0, 0);
    let parent = Arc::new(parent);

    let first = Arc::new(ElementStyle {
        font_size: Some(20.0),
        font_weight: Some(FontWeight::Bold),
        ..Default::default()
    });
    let second = Arc::new(ElementStyle {
        font_size: Some(30.0),
        ..Default::default()
    });
    let style_override = ElementStyle {
        color: Some(Color::rgb(0, 0, 255)),
        font_size: Some(40.0),
        ..Default::default()
    };

    let computed = compute_style(&[first, second], Some(&style_override), &parent);

    assert_eq!(computed.text.font_size, 40.0);
    assert_eq!(computed.text.color, Color::rgb(0, 0, 255));
    assert_eq!(computed.text.font.weight, FontWeight::Bold);
}

#[test]
fn test_shorthand_border_fills_every_side() {
    use quire_style::border::Border;

    let style_override = ElementStyle {
        border: Some(Border::solid(1.0)),
        border_left: Some(Border::solid(3.0)),
        ..Default::default()
    };
    let computed = compute_style(&[], Some(&style_override), &get_default_style());
    assert_eq!(computed.border.widths(), [1.0, 1.0, 1.0, 3.0]);
    assert_eq!(computed.border_x(), 4.0);
}

#[test]
fn test_json_style_resolves_like_a_struct() {
    let style: ElementStyle = serde_json::from_str(
        r#"{
            "fontSize": 16,
            "margin": "4pt 8pt",
            "listStyleType": "upper-alpha",
            "width": {"percent": 50}
        }"#,
    )
    .unwrap();

    let computed = compute_style(&[], Some(&style), &get_default_style());

    assert_eq!(computed.text.font_size, 16.0);
    assert_eq!(computed.box_model.margin, Margins::new(4.0, 8.0, 4.0, 8.0));
    assert_eq!(computed.list.style_type, ListStyleType::UpperAlpha);
    assert_eq!(computed.box_model.width, Some(Dimension::Percent(50.0)));
}
