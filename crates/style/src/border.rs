use quire_types::Color;
use serde::{Deserialize, Deserializer, Serialize, de};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BorderStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Double,
    None,
}

/// One border edge. Width is in points.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Default)]
pub struct Border {
    pub width: f32,
    pub style: BorderStyle,
    pub color: Color,
}

impl Border {
    pub fn new(width: f32, style: BorderStyle, color: Color) -> Self {
        Self {
            width,
            style,
            color,
        }
    }

    pub fn solid(width: f32) -> Self {
        Self::new(width, BorderStyle::Solid, Color::BLACK)
    }

    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.style != BorderStyle::None
    }
}

impl Hash for Border {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.to_bits().hash(state);
        self.style.hash(state);
        self.color.hash(state);
    }
}

impl Eq for Border {}

impl<'de> Deserialize<'de> for Border {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum BorderDef {
            Shorthand(String),
            Full {
                width: f32,
                #[serde(default)]
                style: BorderStyle,
                #[serde(default)]
                color: Color,
            },
        }

        match BorderDef::deserialize(deserializer)? {
            BorderDef::Shorthand(s) => crate::parsers::parse_border(&s).map_err(de::Error::custom),
            BorderDef::Full {
                width,
                style,
                color,
            } => Ok(Border::new(width, style, color)),
        }
    }
}
