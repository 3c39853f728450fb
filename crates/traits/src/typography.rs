//! Optional bidi capability: level resolution, line reordering and glyph
//! mirroring. Injected at engine construction; `NoTypography` is the degraded
//! default that leaves text in logical order.

use quire_style::text::BaseDirection;
use std::fmt::Debug;
use unicode_bidi::{BidiInfo, Level};

pub trait Typography: Send + Sync + Debug {
    /// False when the implementation cannot resolve bidi levels.
    fn is_available(&self) -> bool;

    /// One embedding level per character of `text`, or `None` when unsupported.
    fn bidi_levels(&self, text: &[char], base: BaseDirection) -> Option<Vec<u8>>;

    /// Logical indices of one line's resolved `levels` in visual order (rule L2).
    fn visual_order(&self, levels: &[u8]) -> Option<Vec<usize>>;

    /// The Bidi_Mirrored counterpart of `ch`, if it has one.
    fn mirrored(&self, ch: char) -> Option<char>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoTypography;

impl Typography for NoTypography {
    fn is_available(&self) -> bool {
        false
    }

    fn bidi_levels(&self, _text: &[char], _base: BaseDirection) -> Option<Vec<u8>> {
        None
    }

    fn visual_order(&self, _levels: &[u8]) -> Option<Vec<usize>> {
        None
    }

    fn mirrored(&self, _ch: char) -> Option<char> {
        None
    }
}

/// Resolves levels with the Unicode Bidirectional Algorithm from `unicode-bidi`.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnicodeBidiTypography;

impl Typography for UnicodeBidiTypography {
    fn is_available(&self) -> bool {
        true
    }

    fn bidi_levels(&self, text: &[char], base: BaseDirection) -> Option<Vec<u8>> {
        let default_level = match base {
            BaseDirection::NoBidi => return None,
            BaseDirection::DefaultBidi => None,
            BaseDirection::LeftToRight => Some(Level::ltr()),
            BaseDirection::RightToLeft => Some(Level::rtl()),
        };
        let s: String = text.iter().collect();
        let info = BidiInfo::new(&s, default_level);
        log::trace!("Resolved {} bidi paragraphs for {} chars", info.paragraphs.len(), text.len());
        // `levels` is indexed by byte; take the level of each char's first byte.
        let levels = s
            .char_indices()
            .map(|(byte, _)| info.levels[byte].number())
            .collect();
        Some(levels)
    }

    fn visual_order(&self, levels: &[u8]) -> Option<Vec<usize>> {
        let levels = levels
            .iter()
            .map(|&l| Level::new(l).ok())
            .collect::<Option<Vec<Level>>>()?;
        Some(BidiInfo::reorder_visual(&levels))
    }

    fn mirrored(&self, ch: char) -> Option<char> {
        unicode_bidi_mirroring::get_mirrored(ch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hebrew_run_is_odd_inside_ltr_paragraph() {
        let text: Vec<char> = "ab \u{05D0}\u{05D1}".chars().collect();
        let levels = UnicodeBidiTypography
            .bidi_levels(&text, BaseDirection::LeftToRight)
            .unwrap();
        assert_eq!(levels.len(), text.len());
        assert_eq!(levels[0], 0);
        assert_eq!(levels[3] % 2, 1);
        assert_eq!(levels[4] % 2, 1);
    }

    #[test]
    fn rtl_run_inside_ltr_is_reversed() {
        // a b [R1 R2] c
        let order = UnicodeBidiTypography.visual_order(&[0, 0, 1, 1, 0]).unwrap();
        assert_eq!(order, vec![0, 1, 3, 2, 4]);
    }

    #[test]
    fn nested_ltr_inside_rtl_keeps_its_order() {
        // R1 [L1 L2] R2 at base level 1
        let order = UnicodeBidiTypography.visual_order(&[1, 2, 2, 1]).unwrap();
        assert_eq!(order, vec![3, 1, 2, 0]);
    }

    #[test]
    fn brackets_mirror_both_ways() {
        for (open, close) in [('(', ')'), ('[', ']'), ('{', '}'), ('«', '»'), ('⟨', '⟩')] {
            assert_eq!(UnicodeBidiTypography.mirrored(open), Some(close));
            assert_eq!(UnicodeBidiTypography.mirrored(close), Some(open));
        }
        assert_eq!(UnicodeBidiTypography.mirrored('a'), None);
    }

    #[test]
    fn no_typography_declines() {
        assert!(!NoTypography.is_available());
        assert!(NoTypography.bidi_levels(&['a'], BaseDirection::RightToLeft).is_none());
        assert!(NoTypography.visual_order(&[0, 1]).is_none());
        assert!(NoTypography.mirrored('(').is_none());
    }
}
