//! nom parsers for CSS-like style values, plus the property dispatcher used for inline styles.

use crate::border::{Border, BorderStyle};
use crate::dimension::{Dimension, Margins, PageSize};
use crate::grid::{GridLine, RepeatCount, TrackListItem, TrackSize};
use crate::stylesheet::ElementStyle;
use crate::text::{TabAlignment, TabStop};
use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{anychar, char, digit1, hex_digit1, space0, space1};
use nom::combinator::{map, map_res, opt, recognize, value};
use nom::error::Error as NomError;
use nom::multi::separated_list1;
use nom::sequence::{delimited, preceded, separated_pair, terminated};
use nom::{IResult, Parser};
use quire_types::Color;
use serde::de::{DeserializeOwned, IntoDeserializer, value::StrDeserializer};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum StyleParseError {
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid value for '{property}': {value}")]
    InvalidValue { property: String, value: String },
}

fn ws<'a, O, F>(inner: F) -> impl Parser<&'a str, Output = O, Error = NomError<&'a str>>
where
    F: Parser<&'a str, Output = O, Error = NomError<&'a str>>,
{
    delimited(space0, inner, space0)
}

fn parse_f32(input: &str) -> IResult<&str, f32> {
    map_res(
        recognize((
            opt(alt((char('+'), char('-')))),
            alt((
                recognize((digit1, opt((char('.'), digit1)))),
                recognize((char('.'), digit1)),
            )),
        )),
        |s: &str| s.parse::<f32>(),
    )
    .parse(input)
}

fn parse_unit(input: &str) -> IResult<&str, f32> {
    alt((
        value(1.0, tag_no_case("pt")),
        value(0.75, tag_no_case("px")),
        value(72.0, tag_no_case("in")),
        value(28.346_457, tag_no_case("cm")),
        value(2.834_645_7, tag_no_case("mm")),
    ))
    .parse(input)
}

/// Parses a length with an optional unit (`12pt`, `1in`, `10mm`). Unitless values are points.
pub fn parse_length(input: &str) -> IResult<&str, f32> {
    map((parse_f32, opt(parse_unit)), |(v, unit)| {
        v * unit.unwrap_or(1.0)
    })
    .parse(input)
}

/// Parses a length, a percentage, or `auto`.
pub fn parse_dimension(input: &str) -> IResult<&str, Dimension> {
    alt((
        value(Dimension::Auto, tag_no_case("auto")),
        map(terminated(parse_f32, char('%')), Dimension::Percent),
        map(parse_length, Dimension::Pt),
    ))
    .parse(input)
}

/// Parses `#RGB` or `#RRGGBB`.
pub fn parse_color(input: &str) -> IResult<&str, Color> {
    map_res(recognize((char('#'), hex_digit1)), |s: &str| {
        s.parse::<Color>()
    })
    .parse(input)
}

pub fn parse_border_style(input: &str) -> IResult<&str, BorderStyle> {
    alt((
        value(BorderStyle::Solid, tag_no_case("solid")),
        value(BorderStyle::Dashed, tag_no_case("dashed")),
        value(BorderStyle::Dotted, tag_no_case("dotted")),
        value(BorderStyle::Double, tag_no_case("double")),
        value(BorderStyle::None, tag_no_case("none")),
    ))
    .parse(input)
}

/// Parses a border shorthand such as `2pt solid #00ff00`. The color defaults to black.
pub fn border_value(input: &str) -> IResult<&str, Border> {
    map(
        (ws(parse_length), ws(parse_border_style), opt(ws(parse_color))),
        |(width, style, color)| Border::new(width, style, color.unwrap_or(Color::BLACK)),
    )
    .parse(input)
}

pub fn parse_border(input: &str) -> Result<Border, StyleParseError> {
    if input.trim().eq_ignore_ascii_case("none") {
        return Ok(Border::new(0.0, BorderStyle::None, Color::BLACK));
    }
    run_parser(border_value, input)
}

/// Parses the 1, 2 or 4 value shorthand for margins and padding.
pub fn parse_shorthand_margins(input: &str) -> Result<Margins, StyleParseError> {
    let parts = run_parser(separated_list1(space1, parse_length), input)?;
    match parts.as_slice() {
        [all] => Ok(Margins::all(*all)),
        [y, x] => Ok(Margins::new(*y, *x, *y, *x)),
        [top, right, bottom, left] => Ok(Margins::new(*top, *right, *bottom, *left)),
        _ => Err(StyleParseError::Parse(format!(
            "Invalid number of values for margin/padding shorthand: got {}, expected 1, 2, or 4.",
            parts.len()
        ))),
    }
}

pub fn parse_page_size(s: &str) -> Result<PageSize, StyleParseError> {
    match s.trim().to_ascii_lowercase().as_str() {
        "a4" => Ok(PageSize::A4),
        "letter" => Ok(PageSize::Letter),
        "legal" => Ok(PageSize::Legal),
        _ => Err(StyleParseError::InvalidValue {
            property: "size".to_string(),
            value: s.to_string(),
        }),
    }
}

/// Parses one track sizing function, recursing into `minmax()`.
pub fn track_size(input: &str) -> IResult<&str, TrackSize> {
    alt((
        value(TrackSize::Auto, tag_no_case("auto")),
        value(TrackSize::MinContent, tag_no_case("min-content")),
        value(TrackSize::MaxContent, tag_no_case("max-content")),
        map(
            delimited(
                (tag_no_case("fit-content"), space0, char('(')),
                ws(parse_dimension),
                char(')'),
            ),
            TrackSize::FitContent,
        ),
        map(
            delimited(
                (tag_no_case("minmax"), space0, char('(')),
                separated_pair(ws(track_size), char(','), ws(track_size)),
                char(')'),
            ),
            |(min, max)| TrackSize::minmax(min, max),
        ),
        map(terminated(parse_f32, tag_no_case("fr")), TrackSize::Fr),
        map(terminated(parse_f32, char('%')), TrackSize::Percent),
        map(parse_length, TrackSize::Length),
    ))
    .parse(input)
}

fn repeat_count(input: &str) -> IResult<&str, RepeatCount> {
    alt((
        value(RepeatCount::AutoFill, tag_no_case("auto-fill")),
        value(RepeatCount::AutoFit, tag_no_case("auto-fit")),
        map(map_res(digit1, |s: &str| s.parse::<u32>()), RepeatCount::Count),
    ))
    .parse(input)
}

fn track_repeat(input: &str) -> IResult<&str, TrackListItem> {
    map(
        delimited(
            (tag_no_case("repeat"), space0, char('(')),
            separated_pair(
                ws(repeat_count),
                char(','),
                ws(separated_list1(space1, track_size)),
            ),
            char(')'),
        ),
        |(count, tracks)| TrackListItem::Repeat { count, tracks },
    )
    .parse(input)
}

/// Parses a `grid-template-*` track list. `none` yields an empty list.
///
/// At most one `auto-fill`/`auto-fit` repetition is allowed, and its tracks must have a
/// definite size.
pub fn parse_track_list(input: &str) -> Result<Vec<TrackListItem>, StyleParseError> {
    if input.trim().eq_ignore_ascii_case("none") {
        return Ok(Vec::new());
    }
    let items = run_parser(
        separated_list1(
            space1,
            alt((track_repeat, map(track_size, TrackListItem::Track))),
        ),
        input,
    )?;

    let auto_repeats: Vec<&TrackListItem> = items.iter().filter(|i| i.is_auto_repeat()).collect();
    if auto_repeats.len() > 1 {
        return Err(StyleParseError::Parse(format!(
            "Only one auto-fill/auto-fit repetition is allowed: '{}'",
            input
        )));
    }
    let definite = match auto_repeats.first() {
        Some(TrackListItem::Repeat { tracks, .. }) => tracks.iter().all(TrackSize::is_fixed),
        _ => true,
    };
    if !definite {
        return Err(StyleParseError::Parse(format!(
            "Auto repetitions need definite track sizes: '{}'",
            input
        )));
    }
    if items.iter().any(|i| {
        matches!(
            i,
            TrackListItem::Repeat {
                count: RepeatCount::Count(0),
                ..
            }
        )
    }) {
        return Err(StyleParseError::Parse(format!(
            "Repeat count must be positive: '{}'",
            input
        )));
    }
    Ok(items)
}

fn grid_line(input: &str) -> IResult<&str, GridLine> {
    alt((
        value(GridLine::Auto, tag_no_case("auto")),
        map(
            preceded(
                (tag_no_case("span"), space1),
                map_res(digit1, |s: &str| s.parse::<u32>()),
            ),
            GridLine::Span,
        ),
        map(
            map_res(recognize((opt(char('-')), digit1)), |s: &str| {
                s.parse::<i32>()
            }),
            GridLine::Line,
        ),
    ))
    .parse(input)
}

/// Parses `auto`, `span N` or a (possibly negative, non-zero) line number.
pub fn parse_grid_line(input: &str) -> Result<GridLine, StyleParseError> {
    match run_parser(grid_line, input)? {
        GridLine::Line(0) | GridLine::Span(0) => Err(StyleParseError::InvalidValue {
            property: "grid-line".to_string(),
            value: input.to_string(),
        }),
        line => Ok(line),
    }
}

fn tab_alignment(input: &str) -> IResult<&str, (TabAlignment, Option<char>)> {
    alt((
        value((TabAlignment::Left, None), tag_no_case("left")),
        value((TabAlignment::Right, None), tag_no_case("right")),
        value((TabAlignment::Center, None), tag_no_case("center")),
        map(
            delimited((tag_no_case("anchor"), char('(')), anychar, char(')')),
            |c| (TabAlignment::Anchor, Some(c)),
        ),
    ))
    .parse(input)
}

/// Parses a comma separated list of tab stops, e.g. `100pt, 200pt right, 300pt anchor(.)`.
pub fn parse_tab_stops(input: &str) -> Result<Vec<TabStop>, StyleParseError> {
    let stop = map(
        (parse_length, opt(preceded(space1, tab_alignment))),
        |(position, alignment)| {
            let (alignment, anchor) = alignment.unwrap_or((TabAlignment::Left, None));
            TabStop {
                position,
                alignment,
                anchor,
            }
        },
    );
    run_parser(separated_list1(ws(char(',')), stop), input)
}

/// Runs a nom parser over the whole (trimmed) input.
pub fn run_parser<'a, T, F>(mut parser: F, input: &'a str) -> Result<T, StyleParseError>
where
    F: Parser<&'a str, Output = T, Error = NomError<&'a str>>,
{
    match parser.parse(input.trim()) {
        Ok(("", parsed)) => Ok(parsed),
        Ok((rem, _)) => Err(StyleParseError::Parse(format!(
            "Unexpected trailing input '{}' in '{}'",
            rem, input
        ))),
        Err(e) => Err(StyleParseError::Parse(e.to_string())),
    }
}

/// Parses a kebab-case keyword into any unit-variant style enum.
pub fn parse_keyword<T: DeserializeOwned>(property: &str, value: &str) -> Result<T, StyleParseError> {
    let de: StrDeserializer<'_, serde::de::value::Error> = value.trim().into_deserializer();
    T::deserialize(de).map_err(|_| StyleParseError::InvalidValue {
        property: property.to_string(),
        value: value.to_string(),
    })
}

fn parse_number<T: std::str::FromStr>(property: &str, value: &str) -> Result<T, StyleParseError> {
    value
        .trim()
        .parse::<T>()
        .map_err(|_| StyleParseError::InvalidValue {
            property: property.to_string(),
            value: value.to_string(),
        })
}

fn parse_flag(property: &str, value: &str) -> Result<bool, StyleParseError> {
    match value.trim() {
        "true" | "yes" | "always" => Ok(true),
        "false" | "no" | "auto" => Ok(false),
        _ => Err(StyleParseError::InvalidValue {
            property: property.to_string(),
            value: value.to_string(),
        }),
    }
}

fn parse_line_pair(value: &str) -> Result<(GridLine, GridLine), StyleParseError> {
    match value.split_once('/') {
        Some((start, end)) => Ok((parse_grid_line(start)?, parse_grid_line(end)?)),
        None => Ok((parse_grid_line(value)?, GridLine::Auto)),
    }
}

fn edge(margins: &mut Option<Margins>) -> &mut Margins {
    margins.get_or_insert_with(Default::default)
}

/// Applies a single `name: value` declaration to an `ElementStyle`.
///
/// Unknown property names are ignored.
pub fn apply_style_property(
    style: &mut ElementStyle,
    name: &str,
    value: &str,
) -> Result<(), StyleParseError> {
    match name {
        "font-family" => style.font_family = Some(value.trim().to_string()),
        "font-size" => style.font_size = Some(run_parser(parse_length, value)?),
        "font-weight" => {
            style.font_weight = Some(value.parse().map_err(|_| {
                StyleParseError::InvalidValue {
                    property: name.to_string(),
                    value: value.to_string(),
                }
            })?)
        }
        "font-style" => style.font_style = Some(parse_keyword(name, value)?),
        "line-height" => style.line_height = Some(run_parser(parse_length, value)?),
        "text-align" => style.text_align = Some(parse_keyword(name, value)?),
        "text-align-last" => style.text_align_last = Some(parse_keyword(name, value)?),
        "text-decoration" => style.text_decoration = Some(parse_keyword(name, value)?),
        "color" => style.color = Some(run_parser(parse_color, value)?),
        "widows" => style.widows = Some(parse_number(name, value)?),
        "orphans" => style.orphans = Some(parse_number(name, value)?),
        "direction" | "base-direction" => {
            style.base_direction = Some(parse_keyword(name, value)?)
        }
        "letter-spacing" | "character-spacing" => {
            style.character_spacing = Some(run_parser(parse_length, value)?)
        }
        "word-spacing" => style.word_spacing = Some(run_parser(parse_length, value)?),
        "spacing-ratio" => style.spacing_ratio = Some(parse_number(name, value)?),
        "tab-stops" => style.tab_stops = Some(parse_tab_stops(value)?),
        "tab-default" => style.tab_default = Some(run_parser(parse_length, value)?),
        "text-indent" => style.first_line_indent = Some(run_parser(parse_length, value)?),

        "background-color" => style.background_color = Some(run_parser(parse_color, value)?),
        "border" => style.border = Some(parse_border(value)?),
        "border-top" => style.border_top = Some(parse_border(value)?),
        "border-right" => style.border_right = Some(parse_border(value)?),
        "border-bottom" => style.border_bottom = Some(parse_border(value)?),
        "border-left" => style.border_left = Some(parse_border(value)?),
        "margin" => style.margin = Some(parse_shorthand_margins(value)?),
        "margin-top" => edge(&mut style.margin).top = run_parser(parse_length, value)?,
        "margin-right" => edge(&mut style.margin).right = run_parser(parse_length, value)?,
        "margin-bottom" => edge(&mut style.margin).bottom = run_parser(parse_length, value)?,
        "margin-left" => edge(&mut style.margin).left = run_parser(parse_length, value)?,
        "padding" => style.padding = Some(parse_shorthand_margins(value)?),
        "padding-top" => edge(&mut style.padding).top = run_parser(parse_length, value)?,
        "padding-right" => edge(&mut style.padding).right = run_parser(parse_length, value)?,
        "padding-bottom" => edge(&mut style.padding).bottom = run_parser(parse_length, value)?,
        "padding-left" => edge(&mut style.padding).left = run_parser(parse_length, value)?,
        "width" => style.width = Some(run_parser(parse_dimension, value)?),
        "height" => style.height = Some(run_parser(parse_dimension, value)?),
        "min-width" => style.min_width = Some(run_parser(parse_dimension, value)?),
        "max-width" => style.max_width = Some(run_parser(parse_dimension, value)?),
        "min-height" => style.min_height = Some(run_parser(parse_dimension, value)?),
        "max-height" => style.max_height = Some(run_parser(parse_dimension, value)?),

        "float" => style.float = Some(parse_keyword(name, value)?),
        "clear" => style.clear = Some(parse_keyword(name, value)?),
        "overflow" => style.overflow = Some(parse_keyword(name, value)?),
        "keep-together" => style.keep_together = Some(parse_flag(name, value)?),
        "keep-with-next" => style.keep_with_next = Some(parse_flag(name, value)?),
        "forced-placement" => style.forced_placement = Some(parse_flag(name, value)?),
        "auto-scale" => style.auto_scale = Some(parse_flag(name, value)?),

        "list-style-type" => style.list_style_type = Some(parse_keyword(name, value)?),
        "list-style-position" => style.list_style_position = Some(parse_keyword(name, value)?),
        "list-symbol-indent" => {
            style.list_symbol_indent = Some(run_parser(parse_length, value)?)
        }

        "border-spacing" => style.border_spacing = Some(run_parser(parse_length, value)?),
        "border-collapse" => style.border_collapse = Some(parse_keyword(name, value)?),
        "table-layout" => style.table_layout = Some(parse_keyword(name, value)?),
        "vertical-align" => style.vertical_align = Some(parse_keyword(name, value)?),

        "flex-direction" => style.flex_direction = Some(parse_keyword(name, value)?),
        "flex-wrap" => style.flex_wrap = Some(parse_keyword(name, value)?),
        "justify-content" => style.justify_content = Some(parse_keyword(name, value)?),
        "align-items" => style.align_items = Some(parse_keyword(name, value)?),
        "align-content" => style.align_content = Some(parse_keyword(name, value)?),
        "align-self" => style.align_self = Some(parse_keyword(name, value)?),
        "order" => style.order = Some(parse_number(name, value)?),
        "flex-grow" => style.flex_grow = Some(parse_number(name, value)?),
        "flex-shrink" => style.flex_shrink = Some(parse_number(name, value)?),
        "flex-basis" => style.flex_basis = Some(run_parser(parse_dimension, value)?),

        "gap" => {
            let gap = run_parser(parse_length, value)?;
            style.row_gap = Some(gap);
            style.column_gap = Some(gap);
        }
        "row-gap" => style.row_gap = Some(run_parser(parse_length, value)?),
        "column-gap" => style.column_gap = Some(run_parser(parse_length, value)?),

        "grid-template-columns" => style.grid_template_columns = Some(value.parse()?),
        "grid-template-rows" => style.grid_template_rows = Some(value.parse()?),
        "grid-auto-columns" => style.grid_auto_columns = Some(value.parse()?),
        "grid-auto-rows" => style.grid_auto_rows = Some(value.parse()?),
        "grid-auto-flow" => {
            style.grid_auto_flow = Some(parse_keyword(name, &value.trim().replace(' ', "-"))?)
        }
        "grid-column-start" => style.grid_column_start = Some(parse_grid_line(value)?),
        "grid-column-end" => style.grid_column_end = Some(parse_grid_line(value)?),
        "grid-row-start" => style.grid_row_start = Some(parse_grid_line(value)?),
        "grid-row-end" => style.grid_row_end = Some(parse_grid_line(value)?),
        "grid-column" => {
            let (start, end) = parse_line_pair(value)?;
            style.grid_column_start = Some(start);
            style.grid_column_end = Some(end);
        }
        "grid-row" => {
            let (start, end) = parse_line_pair(value)?;
            style.grid_row_start = Some(start);
            style.grid_row_end = Some(end);
        }

        "column-count" => style.column_count = Some(parse_number(name, value)?),
        "column-width" => style.column_width = Some(run_parser(parse_length, value)?),
        _ => {}
    };
    Ok(())
}

/// Parses an inline `key: value; ...` declaration block.
pub fn parse_inline_css(css: &str, style: &mut ElementStyle) -> Result<(), StyleParseError> {
    for declaration in css.split(';') {
        if let Some((key, value)) = declaration.split_once(':') {
            apply_style_property(style, key.trim(), value.trim())?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boxes::FloatSide;
    use crate::grid::GridAutoFlow;

    #[test]
    fn test_parse_length() {
        assert_eq!(run_parser(parse_length, "12pt").unwrap(), 12.0);
        assert_eq!(run_parser(parse_length, " 1in ").unwrap(), 72.0);
        assert_eq!(run_parser(parse_length, "10").unwrap(), 10.0);
        assert_eq!(run_parser(parse_length, "-.5pt").unwrap(), -0.5);
        assert!(run_parser(parse_length, "abc").is_err());
    }

    #[test]
    fn test_parse_dimension() {
        assert_eq!(run_parser(parse_dimension, "12pt").unwrap(), Dimension::Pt(12.0));
        assert_eq!(run_parser(parse_dimension, "50%").unwrap(), Dimension::Percent(50.0));
        assert_eq!(run_parser(parse_dimension, "auto").unwrap(), Dimension::Auto);
        assert!(run_parser(parse_dimension, "50p").is_err());
    }

    #[test]
    fn test_parse_shorthand_margins() {
        assert_eq!(parse_shorthand_margins("10pt").unwrap(), Margins::all(10.0));
        assert_eq!(
            parse_shorthand_margins("10pt 20pt").unwrap(),
            Margins::new(10.0, 20.0, 10.0, 20.0)
        );
        assert_eq!(
            parse_shorthand_margins("10 20 30 40").unwrap(),
            Margins::new(10.0, 20.0, 30.0, 40.0)
        );
        assert!(parse_shorthand_margins("10 20 30").is_err());
    }

    #[test]
    fn test_parse_color_and_border() {
        assert_eq!(run_parser(parse_color, "#f00").unwrap(), Color::rgb(255, 0, 0));
        assert!(run_parser(parse_color, "red").is_err());

        let border = parse_border("2pt dashed #00ff00").unwrap();
        assert_eq!(border.width, 2.0);
        assert_eq!(border.style, BorderStyle::Dashed);
        assert_eq!(border.color, Color::rgb(0, 255, 0));

        let implicit = parse_border("1pt solid").unwrap();
        assert_eq!(implicit.color, Color::BLACK);
        assert!(!parse_border("none").unwrap().is_visible());
    }

    #[test]
    fn test_parse_track_list() {
        let tracks = parse_track_list("100pt 1fr minmax(50pt, 2fr) fit-content(30%)").unwrap();
        assert_eq!(
            tracks,
            vec![
                TrackListItem::Track(TrackSize::Length(100.0)),
                TrackListItem::Track(TrackSize::Fr(1.0)),
                TrackListItem::Track(TrackSize::minmax(
                    TrackSize::Length(50.0),
                    TrackSize::Fr(2.0)
                )),
                TrackListItem::Track(TrackSize::FitContent(Dimension::Percent(30.0))),
            ]
        );

        let repeated = parse_track_list("repeat(auto-fill, 60pt) auto").unwrap();
        assert_eq!(
            repeated[0],
            TrackListItem::Repeat {
                count: RepeatCount::AutoFill,
                tracks: vec![TrackSize::Length(60.0)],
            }
        );
        assert_eq!(repeated[1], TrackListItem::Track(TrackSize::Auto));

        assert!(parse_track_list("repeat(auto-fit, 1fr)").is_err());
        assert!(parse_track_list("repeat(auto-fit, 10pt) repeat(auto-fill, 10pt)").is_err());
        assert!(parse_track_list("repeat(0, 10pt)").is_err());
        assert!(parse_track_list("none").unwrap().is_empty());
    }

    #[test]
    fn test_parse_grid_line() {
        assert_eq!(parse_grid_line("span 3").unwrap(), GridLine::Span(3));
        assert_eq!(parse_grid_line("-1").unwrap(), GridLine::Line(-1));
        assert_eq!(parse_grid_line("auto").unwrap(), GridLine::Auto);
        assert!(parse_grid_line("0").is_err());
    }

    #[test]
    fn test_parse_tab_stops() {
        let stops = parse_tab_stops("100pt, 200pt right, 300pt anchor(.)").unwrap();
        assert_eq!(stops.len(), 3);
        assert_eq!(stops[0].alignment, TabAlignment::Left);
        assert_eq!(stops[1].alignment, TabAlignment::Right);
        assert_eq!(stops[2], TabStop::anchored(300.0, '.'));
    }

    #[test]
    fn test_inline_css() {
        let mut style = ElementStyle::default();
        parse_inline_css(
            "float: right; grid-column: 2 / span 2; grid-auto-flow: row dense; margin-top: 4pt",
            &mut style,
        )
        .unwrap();
        assert_eq!(style.float, Some(FloatSide::Right));
        assert_eq!(style.grid_column_start, Some(GridLine::Line(2)));
        assert_eq!(style.grid_column_end, Some(GridLine::Span(2)));
        assert_eq!(style.grid_auto_flow, Some(GridAutoFlow::RowDense));
        assert_eq!(style.margin.unwrap().top, 4.0);
    }

    #[test]
    fn test_invalid_keyword_reports_property() {
        let mut style = ElementStyle::default();
        let err = apply_style_property(&mut style, "flex-direction", "sideways").unwrap_err();
        assert_eq!(
            err,
            StyleParseError::InvalidValue {
                property: "flex-direction".to_string(),
                value: "sideways".to_string()
            }
        );
    }
}
