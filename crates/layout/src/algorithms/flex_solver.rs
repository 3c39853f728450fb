//! Main-axis sizing of flex items: line collection, flexible length
//! resolution and `justify-content` offsets.
//!
//! All sizes here are outer sizes (margins, borders and padding included).

use quire_style::flex::JustifyContent;
use std::ops::Range;

const EPS: f32 = 1e-3;

/// Main-axis inputs of one flex item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FlexItemInfo {
    pub basis: f32,
    pub min: f32,
    pub max: f32,
    pub grow: f32,
    pub shrink: f32,
}

impl FlexItemInfo {
    pub fn new(basis: f32, grow: f32, shrink: f32) -> Self {
        Self {
            basis,
            min: 0.0,
            max: f32::INFINITY,
            grow,
            shrink,
        }
    }

    pub fn with_limits(mut self, min: f32, max: f32) -> Self {
        self.min = min.max(0.0);
        self.max = max.max(self.min);
        self
    }

    /// The flex basis clamped by the item's min and max sizes.
    pub fn hypothetical(&self) -> f32 {
        self.basis.clamp(self.min, self.max)
    }
}

/// Splits items into flex lines. Without wrapping every item lands on one line.
pub fn collect_lines(items: &[FlexItemInfo], available: f32, gap: f32, wrap: bool) -> Vec<Range<usize>> {
    if items.is_empty() {
        return Vec::new();
    }
    if !wrap {
        return vec![0..items.len()];
    }
    let mut lines = Vec::new();
    let mut start = 0;
    let mut used = 0.0;
    for (i, item) in items.iter().enumerate() {
        let size = item.hypothetical();
        if i > start && used + gap + size > available + EPS {
            lines.push(start..i);
            start = i;
            used = size;
        } else if i == start {
            used = size;
        } else {
            used += gap + size;
        }
    }
    lines.push(start..items.len());
    lines
}

/// Resolves the target sizes of one line's items for `available` main space
/// (gaps already removed).
///
/// Free space is handed out by grow or shrink factor; items clamped by their
/// min or max size are frozen and the distribution repeats for the rest until
/// no item violates its limits.
pub fn resolve_flexible_lengths(items: &[FlexItemInfo], available: f32) -> Vec<f32> {
    let hypothetical_sum: f32 = items.iter().map(FlexItemInfo::hypothetical).sum();
    let growing = hypothetical_sum < available;
    let mut target: Vec<f32> = items.iter().map(FlexItemInfo::hypothetical).collect();
    let mut frozen: Vec<bool> = items
        .iter()
        .map(|item| {
            let factor = if growing { item.grow } else { item.shrink };
            factor == 0.0
                || (growing && item.basis > item.hypothetical())
                || (!growing && item.basis < item.hypothetical())
        })
        .collect();

    let used = |target: &[f32], frozen: &[bool]| -> f32 {
        items
            .iter()
            .zip(target.iter().zip(frozen))
            .map(|(item, (t, f))| if *f { *t } else { item.basis })
            .sum()
    };
    let initial_free = available - used(&target, &frozen);

    for _ in 0..=items.len() {
        if frozen.iter().all(|f| *f) {
            break;
        }
        let remaining = available - used(&target, &frozen);
        let factor_sum: f32 = items
            .iter()
            .zip(&frozen)
            .filter(|(_, f)| !**f)
            .map(|(item, _)| if growing { item.grow } else { item.shrink })
            .sum();
        let free = if factor_sum < 1.0 {
            let scaled = initial_free * factor_sum;
            if scaled.abs() < remaining.abs() { scaled } else { remaining }
        } else {
            remaining
        };

        if growing {
            for (i, item) in items.iter().enumerate().filter(|(i, _)| !frozen[*i]) {
                target[i] = item.basis + free * item.grow / factor_sum;
            }
        } else {
            let scaled_sum: f32 = items
                .iter()
                .zip(&frozen)
                .filter(|(_, f)| !**f)
                .map(|(item, _)| item.shrink * item.basis)
                .sum();
            for (i, item) in items.iter().enumerate().filter(|(i, _)| !frozen[*i]) {
                target[i] = if scaled_sum > 0.0 {
                    item.basis - free.abs() * item.shrink * item.basis / scaled_sum
                } else {
                    item.basis
                };
            }
        }

        let mut violation = 0.0;
        let mut clamped_up = vec![false; items.len()];
        let mut clamped_down = vec![false; items.len()];
        for (i, item) in items.iter().enumerate().filter(|(i, _)| !frozen[*i]) {
            let clamped = target[i].clamp(item.min, item.max);
            clamped_up[i] = clamped > target[i];
            clamped_down[i] = clamped < target[i];
            violation += clamped - target[i];
            target[i] = clamped;
        }

        if violation.abs() < EPS {
            frozen.iter_mut().for_each(|f| *f = true);
        } else if violation > 0.0 {
            for (f, up) in frozen.iter_mut().zip(&clamped_up) {
                *f |= *up;
            }
        } else {
            for (f, down) in frozen.iter_mut().zip(&clamped_down) {
                *f |= *down;
            }
        }
    }
    target
}

/// Leading offset and extra space between items for `justify-content`.
///
/// The space-distributing keywords fall back to `flex-start` when the free
/// space is negative.
pub fn justify_offsets(justify: JustifyContent, free: f32, count: usize) -> (f32, f32) {
    if count == 0 {
        return (0.0, 0.0);
    }
    let n = count as f32;
    match justify {
        JustifyContent::FlexStart => (0.0, 0.0),
        JustifyContent::FlexEnd => (free, 0.0),
        JustifyContent::Center => (free / 2.0, 0.0),
        _ if free < 0.0 => {
            log::debug!("Negative free space; {:?} falls back to flex-start", justify);
            (0.0, 0.0)
        }
        JustifyContent::SpaceBetween if count > 1 => (0.0, free / (n - 1.0)),
        JustifyContent::SpaceBetween => (0.0, 0.0),
        JustifyContent::SpaceAround => (free / n / 2.0, free / n),
        JustifyContent::SpaceEvenly => (free / (n + 1.0), free / (n + 1.0)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_growing_item_fills_the_line() {
        let items = [FlexItemInfo::new(50.0, 1.0, 1.0)];
        assert_eq!(resolve_flexible_lengths(&items, 300.0), vec![300.0]);
    }

    #[test]
    fn grow_is_distributed_by_factor() {
        let items = [FlexItemInfo::new(0.0, 1.0, 1.0), FlexItemInfo::new(0.0, 3.0, 1.0)];
        assert_eq!(resolve_flexible_lengths(&items, 400.0), vec![100.0, 300.0]);
    }

    #[test]
    fn max_clamp_freezes_and_redistributes() {
        let items = [
            FlexItemInfo::new(0.0, 1.0, 1.0).with_limits(0.0, 50.0),
            FlexItemInfo::new(0.0, 1.0, 1.0),
        ];
        assert_eq!(resolve_flexible_lengths(&items, 300.0), vec![50.0, 250.0]);
    }

    #[test]
    fn shrink_is_weighted_by_basis() {
        let items = [FlexItemInfo::new(100.0, 0.0, 1.0), FlexItemInfo::new(300.0, 0.0, 1.0)];
        let sizes = resolve_flexible_lengths(&items, 200.0);
        assert!((sizes[0] - 50.0).abs() < 1e-3);
        assert!((sizes[1] - 150.0).abs() < 1e-3);
    }

    #[test]
    fn min_clamp_stops_shrinking() {
        let items = [
            FlexItemInfo::new(100.0, 0.0, 1.0).with_limits(90.0, f32::INFINITY),
            FlexItemInfo::new(100.0, 0.0, 1.0),
        ];
        let sizes = resolve_flexible_lengths(&items, 150.0);
        assert!((sizes[0] - 90.0).abs() < 1e-3);
        assert!((sizes[1] - 60.0).abs() < 1e-3);
    }

    #[test]
    fn wrapping_starts_a_new_line_on_overflow() {
        let items = [FlexItemInfo::new(120.0, 0.0, 1.0); 3];
        assert_eq!(collect_lines(&items, 250.0, 10.0, true), vec![0..2, 2..3]);
        assert_eq!(collect_lines(&items, 250.0, 10.0, false), vec![0..3]);
    }

    #[test]
    fn space_keywords_fall_back_to_start_on_negative_space() {
        assert_eq!(justify_offsets(JustifyContent::SpaceBetween, -20.0, 3), (0.0, 0.0));
        assert_eq!(justify_offsets(JustifyContent::SpaceBetween, 20.0, 3), (0.0, 10.0));
        assert_eq!(justify_offsets(JustifyContent::SpaceEvenly, 30.0, 2), (10.0, 10.0));
        assert_eq!(justify_offsets(JustifyContent::Center, -20.0, 3), (-10.0, 0.0));
    }
}
