use quire_style::border::Border;
use quire_style::boxes::{Clear, FloatSide, Overflow};
use quire_style::dimension::{Dimension, Margins};
use quire_style::flex::{AlignContent, AlignItems, AlignSelf, FlexDirection, FlexWrap, JustifyContent};
use quire_style::grid::{GridAutoFlow, GridLine, GridTemplate};
use quire_style::list::{ListStylePosition, ListStyleType};
use quire_style::stylesheet::ElementStyle;
use quire_style::table::{BorderCollapse, TableLayout, VerticalAlign};
use quire_style::text::{BaseDirection, TabStop, TextAlign, TextDecoration};
use quire_traits::FontDescriptor;
use quire_types::Color;
use std::sync::Arc;

// Grouped Style Structures

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxModel {
    pub margin: Margins,
    pub padding: Margins,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub min_width: Option<Dimension>,
    pub max_width: Option<Dimension>,
    pub min_height: Option<Dimension>,
    pub max_height: Option<Dimension>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BorderModel {
    pub top: Option<Border>,
    pub right: Option<Border>,
    pub bottom: Option<Border>,
    pub left: Option<Border>,
}

impl BorderModel {
    pub fn uniform(border: Border) -> Self {
        Self {
            top: Some(border),
            right: Some(border),
            bottom: Some(border),
            left: Some(border),
        }
    }

    /// Side widths in `[top, right, bottom, left]` order.
    pub fn widths(&self) -> [f32; 4] {
        let w = |b: &Option<Border>| b.as_ref().filter(|b| b.is_visible()).map_or(0.0, |b| b.width);
        [w(&self.top), w(&self.right), w(&self.bottom), w(&self.left)]
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextModel {
    pub font: FontDescriptor,
    pub font_size: f32,
    pub line_height: f32,
    pub text_align: TextAlign,
    pub text_align_last: Option<TextAlign>,
    pub text_decoration: TextDecoration,
    pub color: Color,
    pub base_direction: BaseDirection,
    pub character_spacing: f32,
    pub word_spacing: f32,
    pub spacing_ratio: Option<f32>,
    pub tab_stops: Arc<[TabStop]>,
    pub tab_default: Option<f32>,
    pub first_line_indent: f32,
}

impl Default for TextModel {
    fn default() -> Self {
        Self {
            font: FontDescriptor::default(),
            font_size: 12.0,
            line_height: 14.4,
            text_align: TextAlign::Left,
            text_align_last: None,
            text_decoration: TextDecoration::None,
            color: Color::default(),
            base_direction: BaseDirection::NoBidi,
            character_spacing: 0.0,
            word_spacing: 0.0,
            spacing_ratio: None,
            tab_stops: Arc::from(Vec::new()),
            tab_default: None,
            first_line_indent: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FlexModel {
    pub direction: FlexDirection,
    pub wrap: FlexWrap,
    pub justify_content: JustifyContent,
    pub align_items: AlignItems,
    pub align_content: AlignContent,
    // Item properties
    pub order: i32,
    pub grow: f32,
    pub shrink: f32,
    pub basis: Dimension,
    pub align_self: AlignSelf,
}

impl Default for FlexModel {
    fn default() -> Self {
        Self {
            direction: FlexDirection::default(),
            wrap: FlexWrap::default(),
            justify_content: JustifyContent::default(),
            align_items: AlignItems::default(),
            align_content: AlignContent::default(),
            order: 0,
            grow: 0.0,
            shrink: 1.0,
            basis: Dimension::Auto,
            align_self: AlignSelf::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridModel {
    pub template_columns: GridTemplate,
    pub template_rows: GridTemplate,
    pub auto_columns: GridTemplate,
    pub auto_rows: GridTemplate,
    pub auto_flow: GridAutoFlow,
    // Item properties
    pub column_start: GridLine,
    pub column_end: GridLine,
    pub row_start: GridLine,
    pub row_end: GridLine,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListModel {
    pub style_type: ListStyleType,
    pub style_position: ListStylePosition,
    /// Gap between the marker and the item body.
    pub symbol_indent: f32,
}

impl Default for ListModel {
    fn default() -> Self {
        Self {
            style_type: ListStyleType::default(),
            style_position: ListStylePosition::default(),
            symbol_indent: 6.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TableModel {
    pub border_spacing: f32,
    pub border_collapse: BorderCollapse,
    pub table_layout: TableLayout,
    pub vertical_align: VerticalAlign,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MiscModel {
    pub widows: usize,
    pub orphans: usize,
    pub background_color: Option<Color>,
    pub float: FloatSide,
    pub clear: Clear,
    pub overflow: Overflow,
    pub keep_together: bool,
    pub keep_with_next: bool,
    pub forced_placement: bool,
    pub auto_scale: bool,
    pub row_gap: f32,
    pub column_gap: f32,
    pub column_count: Option<u32>,
    pub column_width: Option<f32>,
}

impl Default for MiscModel {
    fn default() -> Self {
        Self {
            widows: 2,
            orphans: 2,
            background_color: None,
            float: FloatSide::None,
            clear: Clear::None,
            overflow: Overflow::Visible,
            keep_together: false,
            keep_with_next: false,
            forced_placement: false,
            auto_scale: false,
            row_gap: 0.0,
            column_gap: 0.0,
            column_count: None,
            column_width: None,
        }
    }
}

/// Fully resolved style of one renderer. Computed once at build time and shared.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedStyle {
    pub box_model: BoxModel,
    pub border: BorderModel,
    pub text: TextModel,
    pub flex: FlexModel,
    pub grid: GridModel,
    pub list: ListModel,
    pub table: TableModel,
    pub misc: MiscModel,
}

impl ComputedStyle {
    /// Returns the total width of horizontal padding.
    pub fn padding_x(&self) -> f32 {
        self.box_model.padding.left + self.box_model.padding.right
    }

    /// Returns the total height of vertical padding.
    pub fn padding_y(&self) -> f32 {
        self.box_model.padding.top + self.box_model.padding.bottom
    }

    /// Returns the total width of horizontal borders.
    pub fn border_x(&self) -> f32 {
        self.border_left_width() + self.border_right_width()
    }

    /// Returns the total height of vertical borders.
    pub fn border_y(&self) -> f32 {
        self.border_top_width() + self.border_bottom_width()
    }

    pub fn border_top_width(&self) -> f32 {
        self.border.widths()[0]
    }

    pub fn border_right_width(&self) -> f32 {
        self.border.widths()[1]
    }

    pub fn border_bottom_width(&self) -> f32 {
        self.border.widths()[2]
    }

    pub fn border_left_width(&self) -> f32 {
        self.border.widths()[3]
    }

    /// Horizontal space taken by margins, borders and padding.
    pub fn horizontal_extras(&self) -> f32 {
        self.box_model.margin.horizontal() + self.border_x() + self.padding_x()
    }

    pub fn is_floating(&self) -> bool {
        self.misc.float.is_floating()
    }

    pub fn font_size(&self) -> f32 {
        self.text.font_size
    }

    pub fn spacing_ratio(&self, default: f32) -> f32 {
        self.text.spacing_ratio.unwrap_or(default).clamp(0.0, 1.0)
    }
}

/// Computes the style for a node by inheriting from its parent, applying any named
/// style from the stylesheet, and finally applying any inline style overrides.
pub fn compute_style(
    style_sets: &[Arc<ElementStyle>],
    style_override: Option<&ElementStyle>,
    parent_style: &Arc<ComputedStyle>,
) -> Arc<ComputedStyle> {
    if style_sets.is_empty() && style_override.is_none() {
        return Arc::new(inherit_only(parent_style));
    }

    let mut merged = ElementStyle::default();
    for style_def in style_sets {
        merge_element_styles(&mut merged, style_def);
    }
    if let Some(override_style_def) = style_override {
        merge_element_styles(&mut merged, override_style_def);
    }

    let parent_text = &parent_style.text;
    let font = FontDescriptor {
        family: merged
            .font_family
            .as_deref()
            .map(Arc::from)
            .unwrap_or_else(|| parent_text.font.family.clone()),
        weight: merged.font_weight.unwrap_or(parent_text.font.weight),
        style: merged.font_style.unwrap_or(parent_text.font.style),
    };

    let computed = ComputedStyle {
        text: TextModel {
            font,
            font_size: merged.font_size.unwrap_or(parent_text.font_size),
            line_height: merged.line_height.unwrap_or_else(|| {
                merged
                    .font_size
                    .map(|fs| fs * 1.2)
                    .unwrap_or(parent_text.line_height)
            }),
            text_align: merged.text_align.unwrap_or(parent_text.text_align),
            text_align_last: merged.text_align_last.or(parent_text.text_align_last),
            text_decoration: merged.text_decoration.unwrap_or(parent_text.text_decoration),
            color: merged.color.unwrap_or(parent_text.color),
            base_direction: merged.base_direction.unwrap_or(parent_text.base_direction),
            character_spacing: merged.character_spacing.unwrap_or(parent_text.character_spacing),
            word_spacing: merged.word_spacing.unwrap_or(parent_text.word_spacing),
            spacing_ratio: merged.spacing_ratio.or(parent_text.spacing_ratio),
            tab_stops: merged
                .tab_stops
                .map(|mut stops| {
                    stops.sort_by(|a, b| a.position.total_cmp(&b.position));
                    Arc::from(stops)
                })
                .unwrap_or_else(|| parent_text.tab_stops.clone()),
            tab_default: merged.tab_default.or(parent_text.tab_default),
            first_line_indent: merged.first_line_indent.unwrap_or(parent_text.first_line_indent),
        },
        list: ListModel {
            style_type: merged.list_style_type.unwrap_or(parent_style.list.style_type),
            style_position: merged
                .list_style_position
                .unwrap_or(parent_style.list.style_position),
            symbol_indent: merged.list_symbol_indent.unwrap_or(parent_style.list.symbol_indent),
        },
        table: TableModel {
            border_spacing: merged.border_spacing.unwrap_or(parent_style.table.border_spacing),
            border_collapse: merged.border_collapse.unwrap_or(parent_style.table.border_collapse),
            table_layout: merged.table_layout.unwrap_or_default(),
            vertical_align: merged.vertical_align.unwrap_or_default(),
        },
        misc: MiscModel {
            widows: merged.widows.unwrap_or(parent_style.misc.widows),
            orphans: merged.orphans.unwrap_or(parent_style.misc.orphans),
            background_color: merged.background_color,
            float: merged.float.unwrap_or_default(),
            clear: merged.clear.unwrap_or_default(),
            overflow: merged.overflow.unwrap_or_default(),
            keep_together: merged.keep_together.unwrap_or(false),
            keep_with_next: merged.keep_with_next.unwrap_or(false),
            forced_placement: merged.forced_placement.unwrap_or(false),
            auto_scale: merged.auto_scale.unwrap_or(false),
            row_gap: merged.row_gap.unwrap_or(0.0),
            column_gap: merged.column_gap.unwrap_or(0.0),
            column_count: merged.column_count,
            column_width: merged.column_width,
        },
        // Non-inherited properties
        box_model: BoxModel {
            margin: merged.margin.unwrap_or_default(),
            padding: merged.padding.unwrap_or_default(),
            width: merged.width,
            height: merged.height,
            min_width: merged.min_width,
            max_width: merged.max_width,
            min_height: merged.min_height,
            max_height: merged.max_height,
        },
        border: BorderModel {
            top: merged.border_top.or(merged.border),
            right: merged.border_right.or(merged.border),
            bottom: merged.border_bottom.or(merged.border),
            left: merged.border_left.or(merged.border),
        },
        flex: FlexModel {
            direction: merged.flex_direction.unwrap_or_default(),
            wrap: merged.flex_wrap.unwrap_or_default(),
            justify_content: merged.justify_content.unwrap_or_default(),
            align_items: merged.align_items.unwrap_or_default(),
            align_content: merged.align_content.unwrap_or_default(),
            order: merged.order.unwrap_or_default(),
            grow: merged.flex_grow.unwrap_or_default(),
            shrink: merged.flex_shrink.unwrap_or(1.0),
            basis: merged.flex_basis.unwrap_or_default(),
            align_self: merged.align_self.unwrap_or_default(),
        },
        grid: GridModel {
            template_columns: merged.grid_template_columns.unwrap_or_default(),
            template_rows: merged.grid_template_rows.unwrap_or_default(),
            auto_columns: merged.grid_auto_columns.unwrap_or_default(),
            auto_rows: merged.grid_auto_rows.unwrap_or_default(),
            auto_flow: merged.grid_auto_flow.unwrap_or_default(),
            column_start: merged.grid_column_start.unwrap_or_default(),
            column_end: merged.grid_column_end.unwrap_or_default(),
            row_start: merged.grid_row_start.unwrap_or_default(),
            row_end: merged.grid_row_end.unwrap_or_default(),
        },
    };

    Arc::new(computed)
}

/// The parent's style with every non-inherited group reset.
fn inherit_only(parent_style: &ComputedStyle) -> ComputedStyle {
    let mut computed = parent_style.clone();

    // Reset non-inherited box model properties
    computed.box_model = BoxModel::default();
    computed.border = BorderModel::default();
    computed.flex = FlexModel::default();
    computed.grid = GridModel::default();
    computed.table.table_layout = TableLayout::default();
    computed.table.vertical_align = VerticalAlign::default();
    computed.misc = MiscModel {
        widows: parent_style.misc.widows,
        orphans: parent_style.misc.orphans,
        ..MiscModel::default()
    };

    computed
}

/// Returns the default style for the document root.
pub fn get_default_style() -> Arc<ComputedStyle> {
    Arc::new(ComputedStyle::default())
}

macro_rules! merge_fields {
    ($base:ident, $to_apply:ident, $($field:ident),+ $(,)?) => {
        $(
            if $to_apply.$field.is_some() {
                $base.$field = $to_apply.$field.clone();
            }
        )+
    };
}

/// Merges properties from `to_apply` into `base`.
pub(crate) fn merge_element_styles(base: &mut ElementStyle, to_apply: &ElementStyle) {
    merge_fields!(
        base, to_apply,
        // Font & Text
        font_family, font_size, font_weight, font_style, line_height, text_align,
        text_align_last, color, text_decoration, widows, orphans, base_direction,
        character_spacing, word_spacing, spacing_ratio, tab_stops, tab_default,
        first_line_indent,
        // Box Model
        background_color, border, border_top, border_right, border_bottom, border_left,
        margin, padding, width, height, min_width, max_width, min_height, max_height,
        // Positioning & Pagination
        float, clear, overflow, keep_together, keep_with_next, forced_placement,
        auto_scale,
        // Lists and tables
        list_style_type, list_style_position, list_symbol_indent, border_spacing,
        border_collapse, table_layout, vertical_align,
        // Flexbox
        flex_direction, flex_wrap, justify_content, align_items, align_content, order,
        flex_grow, flex_shrink, flex_basis, align_self,
        // Grid and columns
        row_gap, column_gap, grid_template_columns, grid_template_rows, grid_auto_columns,
        grid_auto_rows, grid_auto_flow, grid_column_start, grid_column_end,
        grid_row_start, grid_row_end, column_count, column_width,
    );
}
