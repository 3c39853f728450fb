//! The stylesheet: named element styles and page masters.

use crate::border::Border;
use crate::boxes::{Clear, FloatSide, Overflow};
use crate::dimension::{Dimension, Margins, PageSize};
use crate::flex::{AlignContent, AlignItems, AlignSelf, FlexDirection, FlexWrap, JustifyContent};
use crate::font::{FontStyle, FontWeight};
use crate::grid::{GridAutoFlow, GridLine, GridTemplate};
use crate::list::{ListStylePosition, ListStyleType};
use crate::table::{BorderCollapse, TableLayout, VerticalAlign};
use crate::text::{BaseDirection, TabStop, TextAlign, TextDecoration};
use quire_types::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    /// Named page layouts.
    pub page_masters: HashMap<String, PageLayout>,
    /// The master used for the first page.
    pub default_page_master_name: Option<String>,
    /// Named element styles, referenced from nodes by class name.
    pub styles: HashMap<String, Arc<ElementStyle>>,
}

impl Stylesheet {
    /// Returns the default page layout, or an A4 layout if none is defined.
    pub fn default_page_layout(&self) -> &PageLayout {
        static FALLBACK_LAYOUT: PageLayout = PageLayout {
            size: PageSize::A4,
            margins: None,
            columns: None,
            column_gap: None,
        };
        self.default_page_master_name
            .as_ref()
            .and_then(|name| self.page_masters.get(name))
            .or_else(|| self.page_masters.values().next())
            .unwrap_or(&FALLBACK_LAYOUT)
    }

    pub fn style_by_class_name(&self, class_name: &str) -> Option<&Arc<ElementStyle>> {
        self.styles.get(class_name)
    }
}

/// Page geometry for the document renderer.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margins: Option<Margins>,
    /// Number of document-level columns per page.
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_gap: Option<f32>,
}

#[derive(Deserialize, Serialize, Default, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    // Font & Text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align_last: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widows: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orphans: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_direction: Option<BaseDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub character_spacing: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_spacing: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_ratio: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_stops: Option<Vec<TabStop>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tab_default: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_line_indent: Option<f32>,

    // Box Model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_right: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margins>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Margins>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<Dimension>,

    // Positioning & Pagination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float: Option<FloatSide>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear: Option<Clear>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_together: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_with_next: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub forced_placement: Option<bool>,

    // Images
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_scale: Option<bool>,

    // List Properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_style_type: Option<ListStyleType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_style_position: Option<ListStylePosition>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_symbol_indent: Option<f32>,

    // Table Properties
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_spacing: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_collapse: Option<BorderCollapse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_layout: Option<TableLayout>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vertical_align: Option<VerticalAlign>,

    // Flexbox Container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_direction: Option<FlexDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_wrap: Option<FlexWrap>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<JustifyContent>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<AlignItems>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_content: Option<AlignContent>,

    // Flexbox Item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_grow: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_shrink: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_basis: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_self: Option<AlignSelf>,

    // Gaps (flex, grid, multicol)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub row_gap: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_gap: Option<f32>,

    // Grid Container
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_template_columns: Option<GridTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_template_rows: Option<GridTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_auto_columns: Option<GridTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_auto_rows: Option<GridTemplate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_auto_flow: Option<GridAutoFlow>,

    // Grid Item
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_column_start: Option<GridLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_column_end: Option<GridLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_row_start: Option<GridLine>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grid_row_end: Option<GridLine>,

    // Multi-column
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub column_width: Option<f32>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{TrackListItem, TrackSize};

    #[test]
    fn element_style_from_json() {
        let style: ElementStyle = serde_json::from_str(
            r#"{
                "fontSize": 12,
                "margin": "4pt 8pt",
                "borderTop": "1pt solid #ff0000",
                "flexGrow": 1,
                "gridTemplateColumns": "1fr 100pt",
                "gridColumnStart": "span 2",
                "float": "left"
            }"#,
        )
        .unwrap();
        assert_eq!(style.font_size, Some(12.0));
        assert_eq!(style.margin, Some(Margins::new(4.0, 8.0, 4.0, 8.0)));
        assert_eq!(style.border_top.unwrap().color, Color::rgb(255, 0, 0));
        assert_eq!(style.flex_grow, Some(1.0));
        assert_eq!(
            style.grid_template_columns.unwrap().0,
            vec![
                TrackListItem::Track(TrackSize::Fr(1.0)),
                TrackListItem::Track(TrackSize::Length(100.0))
            ]
        );
        assert_eq!(style.grid_column_start, Some(GridLine::Span(2)));
        assert_eq!(style.float, Some(FloatSide::Left));
    }

    #[test]
    fn fallback_page_layout_is_a4() {
        let sheet = Stylesheet::default();
        assert_eq!(sheet.default_page_layout().size, PageSize::A4);
    }
}
