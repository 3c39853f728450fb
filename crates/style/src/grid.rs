//! Grid container and grid item properties.
use crate::parsers;
use serde::{Deserialize, Deserializer, Serialize, de};

/// A single track sizing function.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum TrackSize {
    Length(f32),
    Percent(f32),
    /// A flexible `fr` track.
    Fr(f32),
    Auto,
    MinContent,
    MaxContent,
    /// `fit-content(limit)`, with the limit in points or percent.
    FitContent(crate::Dimension),
    MinMax(Box<TrackSize>, Box<TrackSize>),
}

impl TrackSize {
    pub fn minmax(min: TrackSize, max: TrackSize) -> Self {
        TrackSize::MinMax(Box::new(min), Box::new(max))
    }

    /// The flex factor of the max sizing function, if it is flexible.
    pub fn flex_factor(&self) -> Option<f32> {
        match self {
            TrackSize::Fr(f) => Some(*f),
            TrackSize::MinMax(_, max) => max.flex_factor(),
            _ => None,
        }
    }

    /// True when no part of the sizing function depends on content.
    pub fn is_fixed(&self) -> bool {
        match self {
            TrackSize::Length(_) | TrackSize::Percent(_) => true,
            TrackSize::MinMax(min, max) => min.is_fixed() || max.is_fixed(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum RepeatCount {
    Count(u32),
    AutoFill,
    AutoFit,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum TrackListItem {
    Track(TrackSize),
    Repeat {
        count: RepeatCount,
        tracks: Vec<TrackSize>,
    },
}

impl TrackListItem {
    pub fn is_auto_repeat(&self) -> bool {
        matches!(
            self,
            TrackListItem::Repeat {
                count: RepeatCount::AutoFill | RepeatCount::AutoFit,
                ..
            }
        )
    }
}

/// A parsed `grid-template-rows` or `grid-template-columns` value.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct GridTemplate(pub Vec<TrackListItem>);

impl GridTemplate {
    pub fn items(&self) -> &[TrackListItem] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::str::FromStr for GridTemplate {
    type Err = parsers::StyleParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parsers::parse_track_list(s).map(GridTemplate)
    }
}

impl<'de> Deserialize<'de> for GridTemplate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(de::Error::custom)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "kebab-case")]
pub enum GridAutoFlow {
    #[default]
    Row,
    Column,
    RowDense,
    ColumnDense,
}

impl GridAutoFlow {
    pub fn is_column(&self) -> bool {
        matches!(self, GridAutoFlow::Column | GridAutoFlow::ColumnDense)
    }

    pub fn is_dense(&self) -> bool {
        matches!(self, GridAutoFlow::RowDense | GridAutoFlow::ColumnDense)
    }
}

/// One end of a grid item's placement. Lines are 1-based; negative lines count from the end.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Default)]
pub enum GridLine {
    #[default]
    Auto,
    Line(i32),
    Span(u32),
}

impl<'de> Deserialize<'de> for GridLine {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum GridLineDef {
            Num(i32),
            Str(String),
        }

        match GridLineDef::deserialize(deserializer)? {
            GridLineDef::Num(n) => Ok(GridLine::Line(n)),
            GridLineDef::Str(s) => parsers::parse_grid_line(&s).map_err(de::Error::custom),
        }
    }
}
