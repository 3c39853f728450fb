//! Inline formatting properties: alignment, direction, and tab stops.
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    /// Justifies every line except the last one of a paragraph.
    Justify,
    /// Justifies the last line too.
    JustifyAll,
}

impl TextAlign {
    pub fn is_justified(&self) -> bool {
        matches!(self, TextAlign::Justify | TextAlign::JustifyAll)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}

/// Paragraph base direction for the bidi algorithm.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum BaseDirection {
    /// Bidi processing is disabled; text is laid out in logical order.
    #[default]
    NoBidi,
    /// The direction is taken from the first strong character.
    DefaultBidi,
    LeftToRight,
    RightToLeft,
}

impl BaseDirection {
    pub fn is_bidi(&self) -> bool {
        !matches!(self, BaseDirection::NoBidi)
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, BaseDirection::RightToLeft)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum TabAlignment {
    #[default]
    Left,
    Right,
    Center,
    /// Aligns the first occurrence of the stop's anchor character on the stop.
    Anchor,
}

/// A tab stop measured from the left edge of the line.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TabStop {
    pub position: f32,
    #[serde(default)]
    pub alignment: TabAlignment,
    #[serde(default)]
    pub anchor: Option<char>,
}

impl TabStop {
    pub fn new(position: f32, alignment: TabAlignment) -> Self {
        Self {
            position,
            alignment,
            anchor: None,
        }
    }

    pub fn anchored(position: f32, anchor: char) -> Self {
        Self {
            position,
            alignment: TabAlignment::Anchor,
            anchor: Some(anchor),
        }
    }
}

impl Hash for TabStop {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.position.to_bits().hash(state);
        self.alignment.hash(state);
        self.anchor.hash(state);
    }
}

impl Eq for TabStop {}
