//! Track sizing for one grid axis.
//!
//! Every track carries a base size and a growth limit. Sizing runs in
//! passes: fixed initialization, intrinsic contributions of single-span
//! items, distribution of multi-span shortfalls, maximization into free
//! space, expansion of `fr` tracks, and finally stretching of `auto`
//! tracks. Base sizes never shrink between passes and the growth limit never
//! drops below the base size.

use quire_style::grid::TrackSize;

const EPS: f32 = 1e-3;

#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub sizing: TrackSize,
    pub base: f32,
    pub limit: f32,
    /// Empty `auto-fit` track; sized zero and ignored by gap placement.
    pub collapsed: bool,
}

impl Track {
    pub fn new(sizing: TrackSize) -> Self {
        Self {
            sizing,
            base: 0.0,
            limit: f32::INFINITY,
            collapsed: false,
        }
    }

    pub fn collapsed(sizing: TrackSize) -> Self {
        Self {
            collapsed: true,
            ..Self::new(sizing)
        }
    }

    fn min_fn(&self) -> &TrackSize {
        match &self.sizing {
            TrackSize::MinMax(min, _) => min,
            TrackSize::Fr(_) | TrackSize::FitContent(_) => &TrackSize::Auto,
            other => other,
        }
    }

    fn max_fn(&self) -> &TrackSize {
        match &self.sizing {
            TrackSize::MinMax(_, max) => max,
            other => other,
        }
    }

    fn flex(&self) -> Option<f32> {
        if self.collapsed {
            return None;
        }
        self.max_fn().flex_factor()
    }

    fn has_intrinsic_min(&self) -> bool {
        matches!(self.min_fn(), TrackSize::Auto | TrackSize::MinContent | TrackSize::MaxContent)
    }

    fn has_intrinsic_max(&self) -> bool {
        matches!(
            self.max_fn(),
            TrackSize::Auto | TrackSize::MinContent | TrackSize::MaxContent | TrackSize::FitContent(_)
        )
    }

    fn grow_base(&mut self, base: f32) {
        self.base = self.base.max(base);
        if self.limit < self.base {
            self.limit = self.base;
        }
    }

    fn grow_limit(&mut self, limit: f32) {
        self.limit = if self.limit.is_infinite() {
            limit
        } else {
            self.limit.max(limit)
        };
        if self.limit < self.base {
            self.limit = self.base;
        }
    }
}

/// An item's size contribution to the tracks it spans.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contribution {
    pub start: usize,
    pub span: usize,
    pub min: f32,
    pub max: f32,
}

fn resolve_fixed(size: &TrackSize, available: Option<f32>) -> Option<f32> {
    match size {
        TrackSize::Length(v) => Some(*v),
        TrackSize::Percent(p) => available.map(|a| a * p / 100.0),
        _ => None,
    }
}

fn initialize(tracks: &mut [Track], available: Option<f32>) {
    for track in tracks.iter_mut() {
        if track.collapsed {
            track.base = 0.0;
            track.limit = 0.0;
            continue;
        }
        if matches!(track.min_fn(), TrackSize::Percent(_)) && available.is_none() {
            log::debug!("Percentage track in an indefinite container sized as auto");
        }
        track.base = resolve_fixed(track.min_fn(), available).unwrap_or(0.0).max(0.0);
        track.limit = match track.max_fn() {
            TrackSize::Fr(_) => f32::INFINITY,
            max => resolve_fixed(max, available).unwrap_or(f32::INFINITY),
        };
        if track.limit < track.base {
            track.limit = track.base;
        }
    }
}

fn single_span(tracks: &mut [Track], items: &[Contribution], available: Option<f32>) {
    for item in items.iter().filter(|c| c.span == 1) {
        let Some(track) = tracks.get_mut(item.start) else { continue };
        if track.collapsed {
            continue;
        }
        match track.min_fn() {
            TrackSize::Auto | TrackSize::MinContent => track.grow_base(item.min),
            TrackSize::MaxContent => track.grow_base(item.max),
            _ => {}
        }
        let limit = match track.max_fn() {
            TrackSize::MinContent => Some(item.min),
            TrackSize::MaxContent | TrackSize::Auto => Some(item.max),
            TrackSize::FitContent(cap) => {
                let cap = cap.resolve(available).unwrap_or(f32::INFINITY);
                Some(item.max.min(cap).max(item.min))
            }
            _ => None,
        };
        if let Some(limit) = limit {
            track.grow_limit(limit);
        }
    }
}

/// Hands `extra` out equally among `targets`, capping each at `cap(track)`
/// and redistributing what a capped track could not take.
fn distribute(tracks: &mut [Track], targets: &[usize], mut extra: f32, cap: impl Fn(&Track) -> f32) {
    let mut open: Vec<usize> = targets.to_vec();
    while extra > EPS && !open.is_empty() {
        let share = extra / open.len() as f32;
        let mut next = Vec::new();
        for &i in &open {
            let room = (cap(&tracks[i]) - tracks[i].base).max(0.0);
            let take = share.min(room);
            tracks[i].grow_base(tracks[i].base + take);
            extra -= take;
            if room > share + EPS {
                next.push(i);
            }
        }
        if next.len() == open.len() && extra <= EPS {
            break;
        }
        open = next;
    }
}

fn multi_span(tracks: &mut [Track], items: &[Contribution], gap: f32) {
    let mut spanning: Vec<&Contribution> = items.iter().filter(|c| c.span > 1).collect();
    spanning.sort_by_key(|c| c.span);
    for item in spanning {
        let end = (item.start + item.span).min(tracks.len());
        let range: Vec<usize> = (item.start..end).filter(|&i| !tracks[i].collapsed).collect();
        if range.is_empty() {
            continue;
        }
        let gaps = gap * (range.len() - 1) as f32;
        let flexible: Vec<usize> = range.iter().copied().filter(|&i| tracks[i].flex().is_some()).collect();

        let current: f32 = range.iter().map(|&i| tracks[i].base).sum::<f32>() + gaps;
        let shortfall = item.min - current;
        if shortfall > EPS {
            let mut targets: Vec<usize> = if flexible.is_empty() {
                range.iter().copied().filter(|&i| tracks[i].has_intrinsic_min()).collect()
            } else {
                flexible.clone()
            };
            if targets.is_empty() {
                targets = range.clone();
            }
            distribute(tracks, &targets, shortfall, |_| f32::INFINITY);
        }

        if flexible.is_empty() {
            let limits: f32 = range
                .iter()
                .map(|&i| if tracks[i].limit.is_finite() { tracks[i].limit } else { tracks[i].base })
                .sum::<f32>()
                + gaps;
            let missing = item.max - limits;
            let targets: Vec<usize> = range.iter().copied().filter(|&i| tracks[i].has_intrinsic_max()).collect();
            if missing > EPS && !targets.is_empty() {
                let each = missing / targets.len() as f32;
                for i in targets {
                    let current = if tracks[i].limit.is_finite() { tracks[i].limit } else { tracks[i].base };
                    tracks[i].grow_limit(current + each);
                }
            }
        }
    }
}

fn used(tracks: &[Track], gap: f32) -> f32 {
    let open = tracks.iter().filter(|t| !t.collapsed).count();
    tracks.iter().map(|t| t.base).sum::<f32>() + gap * open.saturating_sub(1) as f32
}

fn maximize(tracks: &mut [Track], available: f32, gap: f32) {
    let free = available - used(tracks, gap);
    if free <= EPS {
        return;
    }
    let targets: Vec<usize> = (0..tracks.len())
        .filter(|&i| !tracks[i].collapsed && tracks[i].flex().is_none() && tracks[i].limit > tracks[i].base)
        .collect();
    distribute(tracks, &targets, free, |t| t.limit);
}

/// Size of one `fr` given `space` shared by the flexible tracks. Tracks whose
/// base exceeds their share are treated as inflexible and the search repeats.
fn flex_fraction(tracks: &[Track], flexible: &[usize], space: f32) -> f32 {
    let mut inflexible = vec![false; tracks.len()];
    loop {
        let mut leftover = space;
        let mut factors = 0.0;
        for &i in flexible {
            if inflexible[i] {
                leftover -= tracks[i].base;
            } else {
                factors += tracks[i].flex().unwrap_or(0.0);
            }
        }
        let fr = leftover.max(0.0) / factors.max(1.0);
        let mut changed = false;
        for &i in flexible {
            if !inflexible[i] && tracks[i].flex().unwrap_or(0.0) * fr < tracks[i].base {
                inflexible[i] = true;
                changed = true;
            }
        }
        if !changed {
            return fr;
        }
    }
}

fn expand_flexible(tracks: &mut [Track], available: Option<f32>, gap: f32) {
    let flexible: Vec<usize> = (0..tracks.len()).filter(|&i| tracks[i].flex().is_some()).collect();
    if flexible.is_empty() {
        return;
    }
    let fr = match available {
        Some(available) => {
            let fixed: f32 = (0..tracks.len())
                .filter(|i| !flexible.contains(i))
                .map(|i| tracks[i].base)
                .sum();
            let open = tracks.iter().filter(|t| !t.collapsed).count();
            let space = available - fixed - gap * open.saturating_sub(1) as f32;
            flex_fraction(tracks, &flexible, space)
        }
        None => flexible
            .iter()
            .map(|&i| {
                let f = tracks[i].flex().unwrap_or(0.0);
                if f > 1.0 { tracks[i].base / f } else { tracks[i].base }
            })
            .fold(0.0, f32::max),
    };
    for i in flexible {
        let f = tracks[i].flex().unwrap_or(0.0);
        tracks[i].grow_base(f * fr);
        tracks[i].limit = tracks[i].base;
    }
}

fn stretch_auto(tracks: &mut [Track], available: f32, gap: f32) {
    let free = available - used(tracks, gap);
    let targets: Vec<usize> = (0..tracks.len())
        .filter(|&i| !tracks[i].collapsed && matches!(tracks[i].max_fn(), TrackSize::Auto))
        .collect();
    if free <= EPS || targets.is_empty() {
        return;
    }
    let each = free / targets.len() as f32;
    for i in targets {
        let base = tracks[i].base + each;
        tracks[i].grow_base(base);
    }
}

/// Sizes `tracks` in place. `available` is the container's inner length on
/// this axis when definite. The final size of each track is its `base`.
pub fn size_tracks(tracks: &mut [Track], items: &[Contribution], available: Option<f32>, gap: f32) {
    initialize(tracks, available);
    single_span(tracks, items, available);
    multi_span(tracks, items, gap);
    for track in tracks.iter_mut() {
        if track.limit.is_infinite() && track.flex().is_none() {
            track.limit = track.base;
        }
    }
    match available {
        Some(available) => {
            maximize(tracks, available, gap);
            expand_flexible(tracks, Some(available), gap);
            stretch_auto(tracks, available, gap);
        }
        None => {
            for track in tracks.iter_mut().filter(|t| t.flex().is_none()) {
                track.base = track.limit.max(track.base);
            }
            expand_flexible(tracks, None, gap);
        }
    }
}

/// Start offset of each track from the start of the grid, and the total
/// length. Collapsed tracks take no gap.
pub fn track_offsets(tracks: &[Track], gap: f32) -> (Vec<f32>, f32) {
    let mut offsets = Vec::with_capacity(tracks.len());
    let mut pos = 0.0;
    let mut first = true;
    for track in tracks {
        if !track.collapsed && !first {
            pos += gap;
        }
        offsets.push(pos);
        if !track.collapsed {
            pos += track.base;
            first = false;
        }
    }
    (offsets, pos)
}

/// Length covered by `span` tracks from `start`, gaps between them included.
pub fn span_length(tracks: &[Track], offsets: &[f32], start: usize, span: usize) -> f32 {
    let end = (start + span).min(tracks.len());
    if start >= end {
        return 0.0;
    }
    let last = end - 1;
    offsets[last] + tracks[last].base - offsets[start]
}
