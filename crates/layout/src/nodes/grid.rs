//! Grid containers.
//!
//! Placement and column sizing run once, on the first fragment. Rows are
//! sized per fragment from the items still to place, and the grid breaks
//! between rows. Items crossing the break, or a first row taller than the
//! area, continue in the next fragment from its first row.

use super::frame::{BoxFrame, BoxGeometry, FrameOptions, outer_min_max};
use super::{RenderNode, block_attributes};
use crate::algorithms::grid::{
    Contribution, ExpandedTemplate, GridArea, ItemLines, Track, expand_template, place_items, size_tracks,
    span_length, track_offsets,
};
use crate::interface::{DrawContext, LayoutArea, LayoutContext, LayoutResult, LayoutStatus, MinMaxWidth, Renderer};
use crate::painting::box_painter::paint_box;
use crate::perf;
use crate::style::ComputedStyle;
use crate::{LayoutEngine, LayoutError};
use quire_style::flex::AlignItems;
use quire_style::grid::{GridTemplate, TrackListItem, TrackSize};
use quire_traits::TagRole;
use quire_types::{AnchorId, Rect, RendererId};
use std::sync::Arc;

const MEASURE_HEIGHT: f32 = 1.0e6;

#[derive(Debug, Clone)]
pub struct GridEntry {
    pub node: RenderNode,
    pub area: GridArea,
}

/// Placement and column geometry shared by every fragment of a grid.
#[derive(Debug, Clone)]
struct ResolvedGrid {
    columns: Arc<[Track]>,
    column_offsets: Arc<[f32]>,
    /// Row tracks from the current fragment's first row on; sized per fragment.
    rows: Vec<Track>,
    entries: Vec<GridEntry>,
}

#[derive(Debug, Clone)]
pub struct GridRenderer {
    pub id: RendererId,
    pub style: Arc<ComputedStyle>,
    pub anchor: Option<AnchorId>,
    pub items: Vec<RenderNode>,
    resolved: Option<ResolvedGrid>,
    pub continuation: bool,
    pub fixed_height: Option<f32>,
    pub placed: Vec<RenderNode>,
    pub geometry: Option<BoxGeometry>,
}

fn implicit_tracks(auto: &GridTemplate) -> Vec<TrackSize> {
    let tracks: Vec<TrackSize> = auto
        .items()
        .iter()
        .flat_map(|item| match item {
            TrackListItem::Track(t) => vec![t.clone()],
            TrackListItem::Repeat { tracks, .. } => tracks.clone(),
        })
        .collect();
    if tracks.is_empty() { vec![TrackSize::Auto] } else { tracks }
}

/// Explicit tracks followed by implicit ones up to `count`. Empty auto-fit
/// tracks come back collapsed.
fn build_tracks(
    explicit: &ExpandedTemplate,
    auto: &GridTemplate,
    count: usize,
    covered: impl Fn(usize) -> bool,
) -> Vec<Track> {
    let implicit = implicit_tracks(auto);
    (0..count)
        .map(|i| {
            let sizing = match explicit.tracks.get(i) {
                Some(t) => t.clone(),
                None => implicit[(i - explicit.len()) % implicit.len()].clone(),
            };
            if explicit.auto_fit.contains(&i) && !covered(i) {
                Track::collapsed(sizing)
            } else {
                Track::new(sizing)
            }
        })
        .collect()
}

fn item_lines(node: &RenderNode) -> ItemLines {
    let grid = &node.style().grid;
    ItemLines {
        row_start: grid.row_start,
        row_end: grid.row_end,
        column_start: grid.column_start,
        column_end: grid.column_end,
    }
}

enum Boundary {
    /// Rows before this index are placed; the rest continue.
    Before(usize),
    /// The first row does not fit and is split inside.
    Inside,
}

impl GridRenderer {
    pub fn new(style: Arc<ComputedStyle>, items: Vec<RenderNode>) -> Self {
        let fixed_height = super::frame::style_fixed_height(&style);
        Self {
            id: RendererId::next(),
            style,
            anchor: None,
            items,
            resolved: None,
            continuation: false,
            fixed_height,
            placed: Vec::new(),
            geometry: None,
        }
    }

    pub fn with_anchor(mut self, anchor: Option<AnchorId>) -> Self {
        self.anchor = anchor;
        self
    }

    /// Places the items and sizes the columns for a content box `width` wide.
    fn resolve(&self, engine: &LayoutEngine, width: f32) -> Result<ResolvedGrid, LayoutError> {
        let grid = &self.style.grid;
        let column_gap = self.style.misc.column_gap;
        let row_height = self.fixed_height.filter(|_| !self.continuation);
        let columns = expand_template(&grid.template_columns, Some(width), column_gap);
        let rows = expand_template(&grid.template_rows, row_height, self.style.misc.row_gap);

        let lines: Vec<ItemLines> = self.items.iter().map(item_lines).collect();
        let placement = place_items(
            &lines,
            rows.len(),
            columns.len(),
            grid.auto_flow,
            engine.config().max_grid_growth,
        );
        let areas = &placement.areas;
        let mut column_tracks = build_tracks(&columns, &grid.auto_columns, placement.cols, |c| {
            areas.iter().any(|a| a.col <= c && c < a.col_end())
        });
        let row_tracks = build_tracks(&rows, &grid.auto_rows, placement.rows, |r| {
            areas.iter().any(|a| a.row <= r && r < a.row_end())
        });

        let mut contributions = Vec::with_capacity(self.items.len());
        let mut entries = Vec::with_capacity(self.items.len());
        for (item, area) in self.items.iter().zip(areas) {
            let mm = item.min_max_width(engine)?;
            contributions.push(Contribution {
                start: area.col,
                span: area.col_span,
                min: mm.min,
                max: mm.max,
            });
            let mut node = item.clone();
            node.release_width();
            entries.push(GridEntry { node, area: *area });
        }
        size_tracks(&mut column_tracks, &contributions, Some(width), column_gap);
        let (offsets, total) = track_offsets(&column_tracks, column_gap);
        if total > width + engine.config().float_epsilon {
            log::warn!("Grid columns of {} need {:.1}pt but only {:.1}pt are available", self.id, total, width);
        }
        entries.sort_by_key(|e| (e.area.row, e.area.col));

        Ok(ResolvedGrid {
            columns: column_tracks.into(),
            column_offsets: offsets.into(),
            rows: row_tracks,
            entries,
        })
    }

    /// Left offset and width of the columns under `area`.
    fn column_slot(resolved: &ResolvedGrid, area: &GridArea) -> (f32, f32) {
        let x = resolved.column_offsets.get(area.col).copied().unwrap_or(0.0);
        let w = span_length(&resolved.columns, &resolved.column_offsets, area.col, area.col_span);
        (x, w)
    }

    /// Sizes the rows of this fragment from the natural heights of its items.
    fn size_rows(&self, ctx: &LayoutContext, content: Rect, resolved: &ResolvedGrid) -> Result<Vec<Track>, LayoutError> {
        let page = ctx.area.page_number;
        let mut contributions = Vec::with_capacity(resolved.entries.len());
        for entry in &resolved.entries {
            let (x, w) = Self::column_slot(resolved, &entry.area);
            let mut trial = entry.node.clone();
            let mut floats = Vec::new();
            let area = Rect::from_top_left(content.left() + x, content.top(), w, MEASURE_HEIGHT);
            let mut mctx = ctx.isolated(LayoutArea::new(page, area), &mut floats);
            mctx.clipped_height = false;
            let h = trial.layout(&mut mctx)?.occupied_height();
            contributions.push(Contribution {
                start: entry.area.row,
                span: entry.area.row_span,
                min: h,
                max: h,
            });
        }
        let mut rows = resolved.rows.clone();
        let definite = self.fixed_height.filter(|_| !self.continuation);
        size_tracks(&mut rows, &contributions, definite, self.style.misc.row_gap);
        Ok(rows)
    }

    fn layout_grid(
        &self,
        ctx: &mut LayoutContext,
        content: Rect,
        resolved: &ResolvedGrid,
    ) -> Result<(Vec<RenderNode>, Option<ResolvedGrid>, f32, Option<RendererId>), LayoutError> {
        let page = ctx.area.page_number;
        let eps = ctx.config().float_epsilon;
        let row_gap = self.style.misc.row_gap;
        let engine = ctx.engine;
        let rows = perf::measure(engine.profiler(), "grid_track_sizing", || {
            self.size_rows(ctx, content, resolved)
        })?;
        let (row_offsets, total) = track_offsets(&rows, row_gap);

        let mut boundary = Boundary::Before(rows.len());
        for (r, track) in rows.iter().enumerate() {
            if row_offsets[r] + track.base > content.height + eps {
                boundary = if r > 0 { Boundary::Before(r) } else { Boundary::Inside };
                break;
            }
        }
        if matches!(boundary, Boundary::Inside) && !(ctx.first_in_area || ctx.forced_placement) {
            let cause = resolved.entries.first().map(|e| e.node.id());
            return Ok((Vec::new(), Some(resolved.clone()), 0.0, cause));
        }
        let cut = match boundary {
            Boundary::Before(r) => r,
            Boundary::Inside => 0,
        };
        let break_line = match boundary {
            Boundary::Before(r) if r < rows.len() => span_length(&rows, &row_offsets, 0, r),
            Boundary::Before(_) => total,
            Boundary::Inside => content.height,
        };

        let mut placed = Vec::new();
        let mut pending = Vec::new();
        let mut cause = None;
        let mut used: f32 = match boundary {
            Boundary::Inside => 0.0,
            _ => break_line,
        };
        for entry in &resolved.entries {
            let area = entry.area;
            let starts_here = match boundary {
                Boundary::Before(r) => area.row < r,
                Boundary::Inside => area.row == 0,
            };
            if !starts_here {
                let mut rest = entry.clone();
                rest.area.row -= cut;
                pending.push(rest);
                continue;
            }

            let (x, w) = Self::column_slot(resolved, &area);
            let top_offset = row_offsets[area.row];
            let crosses = area.row_end() > cut && !matches!(boundary, Boundary::Inside);
            let span_height = span_length(&rows, &row_offsets, area.row, area.row_span);
            let bottom_offset = if crosses || matches!(boundary, Boundary::Inside) {
                break_line
            } else {
                top_offset + span_height
            };
            let cell = Rect::from_top_left(
                content.left() + x,
                content.top() - top_offset,
                w,
                (bottom_offset - top_offset).max(0.0),
            );
            let cell_height = if matches!(boundary, Boundary::Inside) { None } else { Some(cell.height) };
            let align = entry.node.style().flex.align_self.resolve(self.style.flex.align_items);
            let stretch = align == AlignItems::Stretch && entry.node.style().box_model.height.is_none();

            let mut node = entry.node.clone();
            let result = {
                let first_in_area = ctx.first_in_area && area.row == 0;
                let forced_placement = ctx.forced_placement && area.row == 0;
                let mut cctx = ctx.child(LayoutArea::new(page, cell));
                cctx.first_in_area = first_in_area;
                cctx.forced_placement = forced_placement;
                cctx.min_height = cell_height.filter(|_| stretch);
                node.layout(&mut cctx)?
            };
            let rest_area = GridArea {
                row: 0,
                row_span: area.row_end().saturating_sub(cut).max(1),
                ..area
            };
            match (result.status, result.split, result.overflow) {
                (LayoutStatus::Full, _, _) => {
                    let h = result.occupied_area.map_or(0.0, |a| a.bbox.height);
                    if let Some(full) = cell_height.filter(|_| !stretch) {
                        match align {
                            AlignItems::FlexEnd => node.translate(0.0, -(full - h)),
                            AlignItems::Center => node.translate(0.0, -(full - h) / 2.0),
                            _ => {}
                        }
                    }
                    used = used.max(top_offset + h);
                    placed.push(node);
                }
                (LayoutStatus::Partial, Some(split), Some(rest)) => {
                    if let Some(a) = split.occupied_area() {
                        used = used.max(content.top() - a.bbox.bottom());
                    }
                    placed.push(split);
                    pending.push(GridEntry { node: rest, area: rest_area });
                }
                _ => {
                    cause = cause.or(result.cause_of_nothing);
                    pending.push(GridEntry {
                        node: entry.node.clone(),
                        area: rest_area,
                    });
                }
            }
        }

        if pending.is_empty() {
            return Ok((placed, None, used, cause));
        }
        let next_rows = match boundary {
            Boundary::Before(r) => resolved.rows[r.min(resolved.rows.len())..].to_vec(),
            Boundary::Inside => resolved.rows.clone(),
        };
        let row_count = pending.iter().map(|e| e.area.row_end()).max().unwrap_or(0);
        let mut next_rows = next_rows;
        while next_rows.len() < row_count {
            next_rows.push(Track::new(TrackSize::Auto));
        }
        pending.sort_by_key(|e| (e.area.row, e.area.col));
        let next = ResolvedGrid {
            columns: resolved.columns.clone(),
            column_offsets: resolved.column_offsets.clone(),
            rows: next_rows,
            entries: pending,
        };
        Ok((placed, Some(next), used, cause))
    }
}

impl Renderer for GridRenderer {
    fn id(&self) -> RendererId {
        self.id
    }

    fn layout(&mut self, ctx: &mut LayoutContext) -> Result<LayoutResult<Self>, LayoutError> {
        let page = ctx.area.page_number;
        let frame = BoxFrame::open(
            &self.style,
            ctx.area.bbox,
            FrameOptions {
                margin_before: ctx.margin_before,
                continuation: self.continuation,
                fixed_height: self.fixed_height,
                ..Default::default()
            },
        );
        if !frame.top_fits(ctx.config().float_epsilon) && !ctx.forced_placement {
            return Ok(LayoutResult::nothing(self.id));
        }
        let content = frame.content_area();
        let resolved = match &self.resolved {
            Some(r) => r.clone(),
            None => self.resolve(ctx.engine, content.width)?,
        };

        let float_mark = ctx.floats.len();
        let outer_clipped = ctx.clipped_height;
        ctx.clipped_height = outer_clipped || frame.is_clipped();
        let outcome = self.layout_grid(ctx, content, &resolved);
        ctx.clipped_height = outer_clipped;
        let (placed, rest, used, cause) = outcome?;

        if placed.is_empty() && rest.is_some() {
            ctx.floats.truncate(float_mark);
            return Ok(LayoutResult::nothing(cause.unwrap_or(self.id)));
        }

        let complete = rest.is_none() && frame.fixed_height_remainder().is_none();
        let geom = frame.close(page, used, complete, ctx.min_height);
        let occupied = LayoutArea::new(page, geom.margin_box);
        if complete {
            self.placed = placed;
            self.geometry = Some(geom);
            return Ok(LayoutResult::full(occupied));
        }

        let mut split = self.clone();
        split.placed = placed;
        split.geometry = Some(geom);

        let mut overflow = self.clone();
        overflow.resolved = Some(rest.unwrap_or(ResolvedGrid {
            entries: Vec::new(),
            rows: Vec::new(),
            ..resolved
        }));
        overflow.continuation = true;
        overflow.fixed_height = frame.fixed_height_remainder();
        overflow.placed = Vec::new();
        overflow.geometry = None;
        Ok(LayoutResult::partial(occupied, split, overflow))
    }

    fn draw(&self, ctx: &mut DrawContext) -> Result<(), LayoutError> {
        let Some(geom) = self.geometry else {
            return Ok(());
        };
        if let Some(anchor) = &self.anchor {
            ctx.register_anchor(anchor, geom.page_number, geom.border_box.top());
        }
        ctx.open_tag(self.id, TagRole::Div, block_attributes(&self.style, &geom))?;
        paint_box(&mut *ctx.canvas, &self.style, &geom)?;
        for item in &self.placed {
            item.draw(ctx)?;
        }
        ctx.close_tag(self.id)
    }

    fn next_renderer(&self) -> Self {
        let mut next = self.clone();
        next.id = RendererId::next();
        next.resolved = None;
        next.placed = Vec::new();
        next.geometry = None;
        next
    }

    fn min_max_width(&self, engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        let grid = &self.style.grid;
        let gap = self.style.misc.column_gap;
        let columns = expand_template(&grid.template_columns, None, gap);
        let lines: Vec<ItemLines> = self.items.iter().map(item_lines).collect();
        let placement = place_items(&lines, 0, columns.len(), grid.auto_flow, engine.config().max_grid_growth);

        let mut mins = Vec::with_capacity(self.items.len());
        let mut maxes = Vec::with_capacity(self.items.len());
        for (item, area) in self.items.iter().zip(&placement.areas) {
            let mm = item.min_max_width(engine)?;
            mins.push(Contribution {
                start: area.col,
                span: area.col_span,
                min: mm.min,
                max: mm.min,
            });
            maxes.push(Contribution {
                start: area.col,
                span: area.col_span,
                min: mm.max,
                max: mm.max,
            });
        }
        let total = |contributions: &[Contribution]| {
            let mut tracks = build_tracks(&columns, &grid.auto_columns, placement.cols, |_| true);
            size_tracks(&mut tracks, contributions, None, gap);
            track_offsets(&tracks, gap).1
        };
        Ok(outer_min_max(&self.style, MinMaxWidth::new(total(&mins), total(&maxes))))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.geometry.map(|g| LayoutArea::new(g.page_number, g.margin_box))
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(g) = self.geometry.as_mut() {
            g.translate(dx, dy);
        }
        for item in &mut self.placed {
            item.translate(dx, dy);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn implicit_tracks_cycle_through_auto_template() {
        let explicit = expand_template(&"100pt".parse().unwrap(), Some(500.0), 0.0);
        let auto: GridTemplate = "20pt 30pt".parse().unwrap();
        let tracks = build_tracks(&explicit, &auto, 4, |_| true);
        let sizes: Vec<TrackSize> = tracks.into_iter().map(|t| t.sizing).collect();
        assert_eq!(
            sizes,
            vec![
                TrackSize::Length(100.0),
                TrackSize::Length(20.0),
                TrackSize::Length(30.0),
                TrackSize::Length(20.0)
            ]
        );
    }

    #[test]
    fn empty_auto_fit_tracks_collapse() {
        let explicit = expand_template(&"repeat(auto-fit, 100pt)".parse().unwrap(), Some(300.0), 0.0);
        let tracks = build_tracks(&explicit, &GridTemplate::default(), 3, |c| c == 0);
        let collapsed: Vec<bool> = tracks.iter().map(|t| t.collapsed).collect();
        assert_eq!(collapsed, vec![false, true, true]);
    }
}
