//! List marker properties.
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ListStyleType {
    #[default]
    Disc,
    Circle,
    Square,
    Decimal,
    LowerAlpha,
    UpperAlpha,
    LowerRoman,
    UpperRoman,
    None,
}

impl ListStyleType {
    pub fn is_ordered(&self) -> bool {
        matches!(
            self,
            ListStyleType::Decimal
                | ListStyleType::LowerAlpha
                | ListStyleType::UpperAlpha
                | ListStyleType::LowerRoman
                | ListStyleType::UpperRoman
        )
    }

    /// The numbering name written to the `L` tag's `ListNumbering` attribute.
    pub fn numbering_name(&self) -> &'static str {
        match self {
            ListStyleType::Disc => "Disc",
            ListStyleType::Circle => "Circle",
            ListStyleType::Square => "Square",
            ListStyleType::Decimal => "Decimal",
            ListStyleType::LowerAlpha => "LowerAlpha",
            ListStyleType::UpperAlpha => "UpperAlpha",
            ListStyleType::LowerRoman => "LowerRoman",
            ListStyleType::UpperRoman => "UpperRoman",
            ListStyleType::None => "None",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ListStylePosition {
    Inside,
    #[default]
    Outside,
}
