//! Float, clearance, and overflow properties.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum FloatSide {
    #[default]
    None,
    Left,
    Right,
}

impl FloatSide {
    pub fn is_floating(&self) -> bool {
        !matches!(self, FloatSide::None)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Clear {
    #[default]
    None,
    Left,
    Right,
    Both,
}

impl Clear {
    pub fn clears(&self, side: FloatSide) -> bool {
        match (self, side) {
            (Clear::Both, FloatSide::Left | FloatSide::Right) => true,
            (Clear::Left, FloatSide::Left) | (Clear::Right, FloatSide::Right) => true,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
}
