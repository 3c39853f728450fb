//! Defines primitives for size, position, and spacing.
use crate::parsers;
use serde::{Deserialize, Deserializer, Serialize, Serializer, de, ser::SerializeMap};
use std::hash::{Hash, Hasher};

/// A length that may be absolute, relative to a containing block, or automatic.
#[derive(Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub enum Dimension {
    Pt(f32),
    Percent(f32),
    #[default]
    Auto,
}

impl Hash for Dimension {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            Dimension::Pt(v) => {
                0u8.hash(state);
                v.to_bits().hash(state);
            }
            Dimension::Percent(v) => {
                1u8.hash(state);
                v.to_bits().hash(state);
            }
            Dimension::Auto => 2u8.hash(state),
        }
    }
}

impl Eq for Dimension {}

impl Dimension {
    /// Resolves against the size of the containing block.
    ///
    /// Percentages against an indefinite base and `auto` resolve to `None`.
    pub fn resolve(&self, base: Option<f32>) -> Option<f32> {
        match *self {
            Dimension::Pt(v) => Some(v),
            Dimension::Percent(p) => base.map(|b| b * p / 100.0),
            Dimension::Auto => None,
        }
    }

    pub fn is_auto(&self) -> bool {
        matches!(self, Dimension::Auto)
    }

    pub fn is_percent(&self) -> bool {
        matches!(self, Dimension::Percent(_))
    }

    pub fn points(&self) -> Option<f32> {
        match *self {
            Dimension::Pt(v) => Some(v),
            _ => None,
        }
    }
}

/// Four edge values in top/right/bottom/left order, used for margins and padding.
#[derive(Serialize, Debug, Default, Clone, Copy, PartialEq)]
pub struct Margins {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Hash for Margins {
    fn hash<H: Hasher>(&self, state: &mut H) {
        for v in self.as_array() {
            v.to_bits().hash(state);
        }
    }
}

impl Eq for Margins {}

impl Margins {
    pub fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    pub fn all(value: f32) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn x(value: f32) -> Self {
        Self::new(0.0, value, 0.0, value)
    }

    pub fn y(value: f32) -> Self {
        Self::new(value, 0.0, value, 0.0)
    }

    pub fn horizontal(&self) -> f32 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f32 {
        self.top + self.bottom
    }

    /// Values in the fixed top, right, bottom, left order.
    pub fn as_array(&self) -> [f32; 4] {
        [self.top, self.right, self.bottom, self.left]
    }
}

impl<'de> Deserialize<'de> for Margins {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum MarginsDef {
            Shorthand(String),
            Uniform(f32),
            Sides {
                #[serde(default)]
                top: f32,
                #[serde(default)]
                right: f32,
                #[serde(default)]
                bottom: f32,
                #[serde(default)]
                left: f32,
            },
        }

        match MarginsDef::deserialize(deserializer)? {
            MarginsDef::Shorthand(s) => {
                parsers::parse_shorthand_margins(&s).map_err(de::Error::custom)
            }
            MarginsDef::Uniform(v) => Ok(Margins::all(v)),
            MarginsDef::Sides {
                top,
                right,
                bottom,
                left,
            } => Ok(Margins::new(top, right, bottom, left)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PageSize {
    #[default]
    A4,
    Letter,
    Legal,
    Custom {
        width: f32,
        height: f32,
    },
}

impl PageSize {
    pub fn dimensions_pt(&self) -> (f32, f32) {
        match self {
            PageSize::A4 => (595.28, 841.89),
            PageSize::Letter => (612.0, 792.0),
            PageSize::Legal => (612.0, 1008.0),
            PageSize::Custom { width, height } => (*width, *height),
        }
    }
}

impl Serialize for PageSize {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            PageSize::A4 => serializer.serialize_str("A4"),
            PageSize::Letter => serializer.serialize_str("Letter"),
            PageSize::Legal => serializer.serialize_str("Legal"),
            PageSize::Custom { width, height } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("width", width)?;
                map.serialize_entry("height", height)?;
                map.end()
            }
        }
    }
}

impl<'de> Deserialize<'de> for PageSize {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum PageSizeDef {
            Named(String),
            Custom { width: f32, height: f32 },
        }

        match PageSizeDef::deserialize(deserializer)? {
            PageSizeDef::Named(s) => parsers::parse_page_size(&s).map_err(de::Error::custom),
            PageSizeDef::Custom { width, height } => Ok(PageSize::Custom { width, height }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_needs_definite_base() {
        assert_eq!(Dimension::Percent(50.0).resolve(Some(300.0)), Some(150.0));
        assert_eq!(Dimension::Percent(50.0).resolve(None), None);
        assert_eq!(Dimension::Pt(12.0).resolve(None), Some(12.0));
        assert_eq!(Dimension::Auto.resolve(Some(10.0)), None);
    }

    #[test]
    fn margins_deserialize_from_all_forms() {
        let m: Margins = serde_json::from_str("\"10pt 20pt\"").unwrap();
        assert_eq!(m, Margins::new(10.0, 20.0, 10.0, 20.0));
        let m: Margins = serde_json::from_str("5").unwrap();
        assert_eq!(m, Margins::all(5.0));
        let m: Margins = serde_json::from_str(r#"{"top": 1, "left": 4}"#).unwrap();
        assert_eq!(m, Margins::new(1.0, 0.0, 0.0, 4.0));
    }

    #[test]
    fn page_size_deserializes_named_and_custom() {
        let p: PageSize = serde_json::from_str("\"letter\"").unwrap();
        assert_eq!(p, PageSize::Letter);
        let p: PageSize = serde_json::from_str(r#"{"width": 300, "height": 200}"#).unwrap();
        assert_eq!(p.dimensions_pt(), (300.0, 200.0));
    }
}
