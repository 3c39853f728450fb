//! Expands `grid-template-*` track lists, resolving `repeat()` counts.

use quire_style::grid::{GridTemplate, RepeatCount, TrackListItem, TrackSize};

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpandedTemplate {
    pub tracks: Vec<TrackSize>,
    /// Tracks generated by `repeat(auto-fit, ..)`; they collapse when empty.
    pub auto_fit: Vec<usize>,
}

impl ExpandedTemplate {
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }
}

/// Size of a track whose size does not depend on content, if any.
fn definite_size(track: &TrackSize, available: Option<f32>) -> Option<f32> {
    match track {
        TrackSize::Length(v) => Some(*v),
        TrackSize::Percent(p) => available.map(|a| a * p / 100.0),
        TrackSize::MinMax(min, max) => definite_size(max, available).or_else(|| definite_size(min, available)),
        _ => None,
    }
}

/// Number of repetitions of `tracks` that fit next to `fixed` other tracks
/// totalling `fixed_size`. At least one.
fn repeat_count(tracks: &[TrackSize], available: Option<f32>, gap: f32, fixed_size: f32, fixed: usize) -> usize {
    let Some(available) = available else {
        log::warn!("Auto-repeated tracks need a definite container size; repeating once");
        return 1;
    };
    let sizes: Option<Vec<f32>> = tracks.iter().map(|t| definite_size(t, Some(available))).collect();
    let repeat_size = match sizes {
        Some(sizes) => sizes.iter().sum::<f32>() + gap * tracks.len() as f32,
        None => {
            log::warn!("Auto-repeated tracks must have definite sizes; repeating once");
            return 1;
        }
    };
    if repeat_size <= 0.0 {
        return 1;
    }
    let room = available - fixed_size - gap * fixed as f32 + gap;
    ((room / repeat_size).floor() as usize).max(1)
}

/// Expands `template` into a flat track list for a container `available`
/// points long on this axis.
pub fn expand_template(template: &GridTemplate, available: Option<f32>, gap: f32) -> ExpandedTemplate {
    let mut fixed_size = 0.0;
    let mut fixed = 0;
    for item in template.items() {
        match item {
            TrackListItem::Track(t) => {
                fixed_size += definite_size(t, available).unwrap_or(0.0);
                fixed += 1;
            }
            TrackListItem::Repeat {
                count: RepeatCount::Count(n),
                tracks,
            } => {
                for _ in 0..*n {
                    fixed_size += tracks.iter().filter_map(|t| definite_size(t, available)).sum::<f32>();
                    fixed += tracks.len();
                }
            }
            TrackListItem::Repeat { .. } => {}
        }
    }

    let mut out = ExpandedTemplate::default();
    let mut seen_auto = false;
    for item in template.items() {
        match item {
            TrackListItem::Track(t) => out.tracks.push(t.clone()),
            TrackListItem::Repeat { count, tracks } => {
                let n = match count {
                    RepeatCount::Count(n) => *n as usize,
                    RepeatCount::AutoFill | RepeatCount::AutoFit if seen_auto => {
                        log::warn!("Only one auto-repeat is allowed per track list; repeating once");
                        1
                    }
                    RepeatCount::AutoFill | RepeatCount::AutoFit => {
                        seen_auto = true;
                        repeat_count(tracks, available, gap, fixed_size, fixed)
                    }
                };
                for _ in 0..n {
                    for t in tracks {
                        if *count == RepeatCount::AutoFit {
                            out.auto_fit.push(out.tracks.len());
                        }
                        out.tracks.push(t.clone());
                    }
                }
            }
        }
    }
    out
}
