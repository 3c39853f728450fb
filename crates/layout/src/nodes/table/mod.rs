//! Tables: header, body and footer sections of rows on a shared column grid.
//!
//! Body rows paginate one at a time. The header and footer are repeated on
//! every fragment. A fragment that ends inside a row span, or inside a row
//! that had to be split, hands the remaining cell content to the next fragment
//! as carried cells.

pub mod borders;
pub mod cell;
pub mod widths;

pub use borders::{CollapsedTableBorders, SeparatedTableBorders, TableBorders, collapse};
pub use cell::CellRenderer;

use self::widths::{CellWidthInfo, auto_layout, column_min_max, fixed_layout};
use super::block::BlockRenderer;
use super::block_attributes;
use super::frame::{BoxFrame, BoxGeometry, FrameOptions, outer_min_max};
use crate::interface::{DrawContext, LayoutArea, LayoutContext, LayoutResult, LayoutStatus, MinMaxWidth, Renderer};
use crate::painting::border_runs::{BorderGrid, draw_border_grid};
use crate::painting::box_painter::paint_box;
use crate::style::ComputedStyle;
use crate::{LayoutEngine, LayoutError, perf};
use quire_style::border::Border;
use quire_style::dimension::Dimension;
use quire_style::table::{BorderCollapse, TableLayout};
use quire_traits::{TagAttributes, TagRole};
use quire_types::{AnchorId, Rect, RendererId};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionKind {
    Header,
    Body,
    Footer,
}

impl SectionKind {
    fn role(self) -> TagRole {
        match self {
            SectionKind::Header => TagRole::THead,
            SectionKind::Body => TagRole::TBody,
            SectionKind::Footer => TagRole::TFoot,
        }
    }
}

/// A cell as handed over by the tree builder, before slot assignment.
#[derive(Debug, Clone)]
pub struct CellSpec {
    pub style: Arc<ComputedStyle>,
    pub anchor: Option<AnchorId>,
    pub content: BlockRenderer,
    pub col_span: usize,
    pub row_span: usize,
}

#[derive(Debug)]
struct Slot {
    spec: CellSpec,
    row: usize,
    col: usize,
}

/// Assigns grid slots to the cells of one section, row by row, skipping slots
/// already covered by row spans. Returns the slotted cells, the row count and
/// the number of columns used.
fn assign_slots(rows: Vec<Vec<CellSpec>>) -> Result<(Vec<Slot>, usize, usize), LayoutError> {
    let mut occupied: Vec<Vec<bool>> = Vec::new();
    let mut slots = Vec::new();
    let row_count = rows.len();

    for (r, row) in rows.into_iter().enumerate() {
        let mut col = 0;
        for mut spec in row {
            if spec.col_span == 0 || spec.row_span == 0 {
                return Err(LayoutError::StructureViolation {
                    renderer: "table",
                    message: format!("cell in row {} has a zero span", r),
                });
            }
            if r + spec.row_span > row_count {
                log::warn!(
                    "Cell in row {} spans {} rows but only {} remain; truncating its row span",
                    r,
                    spec.row_span,
                    row_count - r
                );
                spec.row_span = row_count - r;
            }
            while occupied.get(r).and_then(|cells| cells.get(col)).copied().unwrap_or(false) {
                col += 1;
            }
            for rr in r..r + spec.row_span {
                if occupied.len() <= rr {
                    occupied.resize(rr + 1, Vec::new());
                }
                let cells = &mut occupied[rr];
                if cells.len() < col + spec.col_span {
                    cells.resize(col + spec.col_span, false);
                }
                cells[col..col + spec.col_span].iter_mut().for_each(|o| *o = true);
            }
            let span = spec.col_span;
            slots.push(Slot { spec, row: r, col });
            col += span;
        }
    }

    let row_count = remove_empty_rows(&mut slots, row_count);
    let columns = slots.iter().map(|s| s.col + s.spec.col_span).max().unwrap_or(0);
    Ok((slots, row_count, columns))
}

/// Deletes rows in which no cell starts and shortens the row spans crossing
/// them. Returns the new row count.
fn remove_empty_rows(slots: &mut [Slot], mut row_count: usize) -> usize {
    for r in (0..row_count).rev() {
        if slots.iter().any(|s| s.row == r) {
            continue;
        }
        log::debug!("Removing table row {} that has no cells of its own", r);
        for slot in slots.iter_mut() {
            // A span crossing `r` from above covers at least two rows.
            if slot.row < r && slot.row + slot.spec.row_span > r {
                slot.spec.row_span -= 1;
            } else if slot.row > r {
                slot.row -= 1;
            }
        }
        row_count -= 1;
    }
    row_count
}

fn border_array(style: &ComputedStyle) -> [Option<Border>; 4] {
    [style.border.top, style.border.right, style.border.bottom, style.border.left]
}

fn width_of(border: Option<Border>) -> f32 {
    border.filter(|b| b.is_visible()).map_or(0.0, |b| b.width)
}

/// Rows of one table section with their resolved borders.
#[derive(Debug, Clone)]
pub struct TableSection {
    pub id: RendererId,
    pub kind: SectionKind,
    pub row_ids: Arc<[RendererId]>,
    pub cells: Arc<[CellRenderer]>,
    pub borders: Arc<dyn TableBorders>,
}

impl TableSection {
    fn from_slots(
        kind: SectionKind,
        slots: Vec<Slot>,
        row_count: usize,
        columns: usize,
        outer: [Option<Border>; 4],
        collapsed: bool,
    ) -> Self {
        let borders: Arc<dyn TableBorders> = if collapsed {
            let mut grid = CollapsedTableBorders::new(row_count, columns, outer);
            for s in &slots {
                grid.add_cell(s.row, s.col, s.spec.row_span, s.spec.col_span, border_array(&s.spec.style));
            }
            Arc::new(grid)
        } else {
            let mut grid = SeparatedTableBorders::new(row_count, columns);
            for s in &slots {
                grid.add_cell(s.row, s.col, s.spec.row_span, s.spec.col_span, border_array(&s.spec.style));
            }
            Arc::new(grid)
        };

        let cells: Vec<CellRenderer> = slots
            .into_iter()
            .map(|s| {
                let mut cell = CellRenderer::new(s.spec.style, s.spec.content, s.row, s.col);
                cell.anchor = s.spec.anchor;
                cell.row_span = s.spec.row_span;
                cell.col_span = s.spec.col_span;
                cell.is_header = kind == SectionKind::Header;
                if collapsed {
                    cell.insets = collapsed_insets(borders.as_ref(), &cell);
                } else {
                    cell.borders = borders.cell_borders(cell.row, cell.col);
                    cell.insets = cell.borders.map(width_of);
                }
                cell
            })
            .collect();

        Self {
            id: RendererId::next(),
            kind,
            row_ids: (0..row_count).map(|_| RendererId::next()).collect(),
            cells: cells.into(),
            borders,
        }
    }

    pub fn row_count(&self) -> usize {
        self.row_ids.len()
    }
}

/// Half of the widest collapsed border on each side of the cell.
fn collapsed_insets(borders: &dyn TableBorders, cell: &CellRenderer) -> [f32; 4] {
    let cols = cell.col..cell.col + cell.col_span;
    let rows = cell.row..cell.end_row();
    let widest = |it: &mut dyn Iterator<Item = Option<Border>>| it.map(width_of).fold(0.0, f32::max) / 2.0;
    [
        widest(&mut cols.clone().map(|c| borders.horizontal_border(cell.row, c))),
        widest(&mut rows.clone().map(|r| borders.vertical_border(r, cell.col + cell.col_span))),
        widest(&mut cols.map(|c| borders.horizontal_border(cell.end_row(), c))),
        widest(&mut rows.map(|r| borders.vertical_border(r, cell.col))),
    ]
}

/// Horizontal positions of the columns of one placed fragment.
#[derive(Debug, Clone)]
struct ColumnGrid {
    lefts: Vec<f32>,
    widths: Arc<[f32]>,
    spacing: f32,
}

impl ColumnGrid {
    fn new(left: f32, widths: Arc<[f32]>, spacing: f32) -> Self {
        let mut lefts = Vec::with_capacity(widths.len());
        let mut x = left + spacing;
        for w in widths.iter() {
            lefts.push(x);
            x += w + spacing;
        }
        Self { lefts, widths, spacing }
    }

    /// Left edge and width of `span` columns starting at `col`.
    fn span(&self, col: usize, span: usize) -> (f32, f32) {
        let last = (col + span).min(self.widths.len()).saturating_sub(1);
        let left = self.lefts.get(col).copied().unwrap_or_default();
        let right = self.lefts.get(last).copied().unwrap_or_default() + self.widths.get(last).copied().unwrap_or_default();
        (left, (right - left).max(0.0))
    }

    /// Column lines of a collapsed grid.
    fn lines(&self) -> Vec<f32> {
        let mut xs = self.lefts.clone();
        if let (Some(l), Some(w)) = (self.lefts.last(), self.widths.last()) {
            xs.push(l + w);
        }
        xs
    }
}

#[derive(Debug, Clone)]
pub struct PlacedRow {
    pub id: RendererId,
    pub row: usize,
    pub top: f32,
    pub bottom: f32,
    /// Cells whose fragment starts in this row.
    pub cells: Vec<CellRenderer>,
}

impl PlacedRow {
    fn translate(&mut self, dx: f32, dy: f32) {
        self.top += dy;
        self.bottom += dy;
        self.cells.iter_mut().for_each(|c| c.translate(dx, dy));
    }
}

#[derive(Debug, Clone)]
pub struct PlacedSection {
    pub id: RendererId,
    pub kind: SectionKind,
    pub rows: Vec<PlacedRow>,
}

#[derive(Debug, Clone)]
pub struct PlacedTable {
    pub geometry: BoxGeometry,
    pub sections: Vec<PlacedSection>,
    /// Collapsed borders; `None` in the separated model.
    pub grid: Option<BorderGrid>,
}

struct RowsRequest<'r> {
    start: usize,
    carried: &'r [CellRenderer],
    top: f32,
    /// Lowest y the rows may reach.
    limit: f32,
    /// The first row may be split when it does not fit.
    allow_split: bool,
    forced: bool,
    first_in_area: bool,
}

#[derive(Debug, Default)]
struct RowsOutcome {
    rows: Vec<PlacedRow>,
    /// First row not completely placed.
    boundary: usize,
    carried: Vec<CellRenderer>,
    /// y below the last placed row, row spacing included.
    cursor: f32,
    cause: Option<RendererId>,
}

impl RowsOutcome {
    fn is_complete(&self, row_count: usize) -> bool {
        self.boundary >= row_count && self.carried.is_empty()
    }
}

struct Pending {
    original: CellRenderer,
    cell: CellRenderer,
    status: LayoutStatus,
    overflow: Option<CellRenderer>,
    top: f32,
    last_row: usize,
}

impl Pending {
    fn placed_content(&self) -> bool {
        match self.status {
            LayoutStatus::Partial => true,
            LayoutStatus::Full => !self.original.content.children.is_empty(),
            LayoutStatus::Nothing => false,
        }
    }
}

fn layout_cell(
    ctx: &mut LayoutContext,
    cell: &CellRenderer,
    area: Rect,
    first_in_area: bool,
    forced: bool,
) -> Result<(LayoutStatus, CellRenderer, Option<CellRenderer>, Option<RendererId>), LayoutError> {
    let page = ctx.area.page_number;
    let mut placed = cell.clone();
    let result = {
        let mut cctx = ctx.child(LayoutArea::new(page, area));
        cctx.first_in_area = first_in_area;
        cctx.forced_placement = forced;
        placed.layout(&mut cctx)?
    };
    Ok(match (result.status, result.split, result.overflow) {
        (LayoutStatus::Full, _, _) => (LayoutStatus::Full, placed, None, None),
        (LayoutStatus::Partial, Some(split), Some(rest)) => (LayoutStatus::Partial, split, Some(rest), None),
        _ => (LayoutStatus::Nothing, cell.clone(), None, result.cause_of_nothing),
    })
}

/// Lays out an empty copy of `cell` so its background and borders still show.
fn place_shell(ctx: &mut LayoutContext, cell: &CellRenderer, area: Rect) -> Result<CellRenderer, LayoutError> {
    let (_, shell, _, _) = layout_cell(ctx, &cell.emptied(), area, true, true)?;
    Ok(shell)
}

/// Places rows of `section` from `req.start` downwards until one does not fit.
fn layout_rows(
    ctx: &mut LayoutContext,
    section: &TableSection,
    grid: &ColumnGrid,
    req: RowsRequest,
) -> Result<RowsOutcome, LayoutError> {
    let eps = ctx.config().float_epsilon;
    let row_count = section.row_count();
    let mut rows: Vec<(usize, f32, f32)> = Vec::new();
    let mut done: Vec<CellRenderer> = Vec::new();
    let mut pending: Vec<Pending> = Vec::new();
    let mut carried = Vec::new();
    let mut cursor = req.top;
    let mut cause = None;
    let mut boundary = row_count;

    for r in req.start..row_count {
        let row_top = cursor;
        let first_row = rows.is_empty();
        let starting: Vec<CellRenderer> = if r == req.start {
            req.carried
                .iter()
                .cloned()
                .chain(
                    section
                        .cells
                        .iter()
                        .filter(|c| c.row == r && !req.carried.iter().any(|k| k.id == c.id))
                        .cloned(),
                )
                .collect()
        } else {
            section.cells.iter().filter(|c| c.row == r).cloned().collect()
        };

        let mut failed = false;
        for original in starting {
            let (left, width) = grid.span(original.col, original.col_span);
            let area = Rect::new(left, req.limit, width, (row_top - req.limit).max(0.0));
            let forced = req.forced && first_row;
            let (status, cell, overflow, why) =
                layout_cell(ctx, &original, area, req.first_in_area && first_row, forced)?;
            if status == LayoutStatus::Nothing {
                failed = true;
                cause = cause.or(why);
            }
            pending.push(Pending {
                last_row: original.end_row().min(row_count).saturating_sub(1).max(r),
                original,
                cell,
                status,
                overflow,
                top: row_top,
            });
        }

        let mut bottom = row_top;
        for p in pending.iter().filter(|p| p.last_row == r) {
            if p.status != LayoutStatus::Full {
                failed = true;
                cause = cause.or(Some(p.cell.id));
            }
            if let Some(b) = p.cell.bottom() {
                bottom = bottom.min(b);
            }
        }

        if failed || bottom < req.limit - eps {
            boundary = r;
            break;
        }
        rows.push((r, row_top, bottom));
        let (finished, open): (Vec<_>, Vec<_>) = pending.into_iter().partition(|p| p.last_row == r);
        pending = open;
        for mut p in finished {
            p.cell.fit_to(bottom);
            done.push(p.cell);
        }
        cursor = bottom - grid.spacing;
    }

    if boundary < row_count {
        let r = boundary;
        if let Some(&(_, _, edge_y)) = rows.last() {
            // Break before row `r`; spans crossing into it are cut at the last placed row.
            for p in pending.into_iter().filter(|p| p.original.first_row < r) {
                let (left, width) = grid.span(p.original.col, p.original.col_span);
                let area = Rect::new(left, edge_y, width, (p.top - edge_y).max(0.0));
                let (status, mut placed, overflow, _) = layout_cell(ctx, &p.original, area, false, false)?;
                let carry = match (status, overflow) {
                    (LayoutStatus::Partial, Some(mut rest)) => {
                        rest.first_row = r;
                        rest
                    }
                    (LayoutStatus::Full, _) => p.original.continued_at(r, p.original.emptied().content),
                    _ => {
                        placed = place_shell(ctx, &p.original, area)?;
                        let mut rest = p.original.clone();
                        rest.first_row = r;
                        rest
                    }
                };
                placed.fit_to(edge_y);
                done.push(placed);
                carried.push(carry);
            }
        } else if req.allow_split && pending.iter().any(Pending::placed_content) {
            log::debug!("Splitting table row {} across areas", r);
            let row_top = req.top;
            let bottom = pending
                .iter()
                .filter(|p| p.status != LayoutStatus::Nothing)
                .filter_map(|p| p.cell.bottom())
                .fold(row_top, f32::min);
            for p in pending {
                let (mut placed, carry) = match (p.status, p.overflow) {
                    (LayoutStatus::Partial, Some(rest)) => (p.cell, rest),
                    (LayoutStatus::Full, _) => {
                        let rest = p.original.continued_at(r, p.original.emptied().content);
                        (p.cell, rest)
                    }
                    _ => {
                        let (left, width) = grid.span(p.original.col, p.original.col_span);
                        let area = Rect::new(left, bottom, width, (row_top - bottom).max(0.0));
                        (place_shell(ctx, &p.original, area)?, p.original)
                    }
                };
                placed.fit_to(bottom);
                done.push(placed);
                carried.push(carry);
            }
            rows.push((r, row_top, bottom));
            cursor = bottom - grid.spacing;
        }
    }

    let rows = rows
        .into_iter()
        .map(|(row, top, bottom)| PlacedRow {
            id: section.row_ids[row],
            row,
            top,
            bottom,
            cells: done.iter().filter(|c| c.first_row == row).cloned().collect(),
        })
        .collect();
    Ok(RowsOutcome {
        rows,
        boundary,
        carried,
        cursor,
        cause,
    })
}

#[derive(Debug, Clone)]
pub struct TableRenderer {
    pub id: RendererId,
    pub style: Arc<ComputedStyle>,
    pub anchor: Option<AnchorId>,
    pub columns: Arc<[Option<Dimension>]>,
    pub column_count: usize,
    pub header: Option<TableSection>,
    pub body: TableSection,
    pub footer: Option<TableSection>,
    /// First body row of this fragment.
    pub start_row: usize,
    /// Cells continuing into `start_row` from the previous fragment.
    pub carried: Vec<CellRenderer>,
    /// Horizontal edge the previous fragment ended on.
    pub split_edge: Option<usize>,
    pub continuation: bool,
    pub placed: Option<PlacedTable>,
    widths: Option<(f32, Arc<[f32]>)>,
}

impl TableRenderer {
    pub fn new(
        style: Arc<ComputedStyle>,
        columns: Vec<Option<Dimension>>,
        header: Option<Vec<Vec<CellSpec>>>,
        body: Vec<Vec<CellSpec>>,
        footer: Option<Vec<Vec<CellSpec>>>,
    ) -> Result<Self, LayoutError> {
        let collapsed = style.table.border_collapse == BorderCollapse::Collapse;
        let header = header.map(assign_slots).transpose()?;
        let body = assign_slots(body)?;
        let footer = footer.map(assign_slots).transpose()?;
        let column_count = [header.as_ref(), Some(&body), footer.as_ref()]
            .into_iter()
            .flatten()
            .map(|(_, _, cols)| *cols)
            .fold(columns.len(), usize::max);

        let table = border_array(&style);
        let outer = |top: bool, bottom: bool| {
            [table[0].filter(|_| top), table[1], table[2].filter(|_| bottom), table[3]]
        };
        let (has_header, has_footer) = (header.is_some(), footer.is_some());
        let header = header.map(|(slots, rows, _)| {
            TableSection::from_slots(SectionKind::Header, slots, rows, column_count, outer(true, false), collapsed)
        });
        let footer = footer.map(|(slots, rows, _)| {
            TableSection::from_slots(SectionKind::Footer, slots, rows, column_count, outer(false, true), collapsed)
        });
        let (slots, rows, _) = body;
        let body = TableSection::from_slots(
            SectionKind::Body,
            slots,
            rows,
            column_count,
            outer(!has_header, !has_footer),
            collapsed,
        );

        Ok(Self {
            id: RendererId::next(),
            style,
            anchor: None,
            columns: columns.into(),
            column_count,
            header,
            body,
            footer,
            start_row: 0,
            carried: Vec::new(),
            split_edge: None,
            continuation: false,
            placed: None,
            widths: None,
        })
    }

    pub fn with_anchor(mut self, anchor: Option<AnchorId>) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn is_collapsed(&self) -> bool {
        self.style.table.border_collapse == BorderCollapse::Collapse
    }

    fn spacing(&self) -> f32 {
        if self.is_collapsed() {
            0.0
        } else {
            self.style.table.border_spacing
        }
    }

    fn sections(&self) -> impl Iterator<Item = &TableSection> {
        self.header.iter().chain(std::iter::once(&self.body)).chain(self.footer.iter())
    }

    fn section(&self, kind: SectionKind) -> Option<&TableSection> {
        match kind {
            SectionKind::Header => self.header.as_ref(),
            SectionKind::Body => Some(&self.body),
            SectionKind::Footer => self.footer.as_ref(),
        }
    }

    fn cell_infos(&self, engine: &LayoutEngine) -> Result<Vec<CellWidthInfo>, LayoutError> {
        let mut infos = Vec::new();
        let mut offset = 0;
        for section in self.sections() {
            for cell in section.cells.iter() {
                let mm = cell.min_max_width(engine)?;
                infos.push(CellWidthInfo {
                    row: offset + cell.row,
                    col: cell.col,
                    col_span: cell.col_span,
                    min: mm.min,
                    max: mm.max,
                    width: cell.style.box_model.width,
                });
            }
            offset += section.row_count();
        }
        Ok(infos)
    }

    /// Column widths for a content box of width `available`, cached per width.
    fn column_widths(&mut self, engine: &LayoutEngine, available: f32) -> Result<Arc<[f32]>, LayoutError> {
        let available = (available - self.spacing() * (self.column_count + 1) as f32).max(0.0);
        if let Some((width, cached)) = &self.widths
            && (width - available).abs() <= engine.config().epsilon
        {
            return Ok(cached.clone());
        }
        let widths = perf::measure(engine.profiler(), "table_widths", || -> Result<Vec<f32>, LayoutError> {
            let infos = self.cell_infos(engine)?;
            Ok(match self.style.table.table_layout {
                TableLayout::Fixed => fixed_layout(available, &self.columns, &infos, self.column_count),
                TableLayout::Auto => auto_layout(
                    available,
                    &self.columns,
                    &infos,
                    self.column_count,
                    engine.config().epsilon,
                ),
            })
        })?;
        let widths: Arc<[f32]> = widths.into();
        self.widths = Some((available, widths.clone()));
        Ok(widths)
    }

    fn frame_options(&self, margin_before: f32) -> FrameOptions {
        let borders = self.is_collapsed().then(|| self.style.border.widths().map(|w| w / 2.0));
        FrameOptions {
            margin_before,
            continuation: self.continuation,
            borders,
            ..Default::default()
        }
    }

    fn body_top_edge(&self, col: usize) -> Option<Border> {
        match self.split_edge {
            Some(edge) => self.body.borders.split_border(edge, col),
            None => self.body.borders.horizontal_border(self.start_row, col),
        }
    }

    /// Resolves the collapsed borders of a placed fragment. `split_at` is the
    /// edge the body was split on, if it continues elsewhere.
    fn border_grid(&self, grid: &ColumnGrid, sections: &[PlacedSection], split_at: Option<usize>) -> BorderGrid {
        let cols = self.column_count;
        let mut out = BorderGrid {
            xs: grid.lines(),
            ..Default::default()
        };
        let mut above: Option<Vec<Option<Border>>> = None;

        for placed in sections {
            let Some(section) = self.section(placed.kind) else { continue };
            let (Some(first), Some(last)) = (placed.rows.first(), placed.rows.last()) else {
                continue;
            };
            let top: Vec<Option<Border>> = (0..cols)
                .map(|c| match placed.kind {
                    SectionKind::Body => self.body_top_edge(c),
                    _ => section.borders.horizontal_border(first.row, c),
                })
                .collect();
            let top = match above.take() {
                // Repeated headers and footers win ties at their junction with the body.
                Some(prev) => prev
                    .into_iter()
                    .zip(top)
                    .map(|(p, t)| match placed.kind {
                        SectionKind::Footer => collapse(p, t, true),
                        _ => collapse(t, p, true),
                    })
                    .collect(),
                None => {
                    out.ys.push(first.top);
                    top
                }
            };
            out.horizontal.push(top);

            for (i, row) in placed.rows.iter().enumerate() {
                out.vertical.push((0..=cols).map(|k| section.borders.vertical_border(row.row, k)).collect());
                out.ys.push(row.bottom);
                if let Some(next) = placed.rows.get(i + 1) {
                    out.horizontal.push((0..cols).map(|c| section.borders.horizontal_border(next.row, c)).collect());
                }
            }

            let bottom = (0..cols)
                .map(|c| match (placed.kind, split_at) {
                    (SectionKind::Body, Some(edge)) => section.borders.split_border(edge, c),
                    _ => section.borders.horizontal_border(last.row + 1, c),
                })
                .collect();
            above = Some(bottom);
        }
        if let Some(bottom) = above {
            out.horizontal.push(bottom);
        }
        out
    }
}

impl Renderer for TableRenderer {
    fn id(&self) -> RendererId {
        self.id
    }

    fn layout(&mut self, ctx: &mut LayoutContext) -> Result<LayoutResult<Self>, LayoutError> {
        let page = ctx.area.page_number;
        let frame = BoxFrame::open(&self.style, ctx.area.bbox, self.frame_options(ctx.margin_before));
        if !frame.top_fits(ctx.config().float_epsilon) && !ctx.forced_placement {
            return Ok(LayoutResult::nothing(self.id));
        }
        let content = frame.content_area();
        let widths = self.column_widths(ctx.engine, content.width)?;
        let spacing = self.spacing();
        let grid = ColumnGrid::new(content.left(), widths, spacing);
        let forced = ctx.forced_placement;
        let mut sections = Vec::new();
        let mut cursor = content.top() - spacing;

        let repeated = |ctx: &mut LayoutContext, section: &TableSection, top: f32| {
            layout_rows(
                ctx,
                section,
                &grid,
                RowsRequest {
                    start: 0,
                    carried: &[],
                    top,
                    limit: content.bottom(),
                    allow_split: forced,
                    forced,
                    first_in_area: ctx.first_in_area,
                },
            )
        };

        if let Some(header) = &self.header {
            let out = repeated(ctx, header, cursor)?;
            if !out.is_complete(header.row_count()) {
                if !forced {
                    return Ok(LayoutResult::nothing(out.cause.unwrap_or(self.id)));
                }
                if !ctx.measuring {
                    log::warn!("Header of table {} does not fit its area; placing what fits", self.id);
                }
            }
            cursor = out.cursor;
            sections.push(PlacedSection {
                id: header.id,
                kind: SectionKind::Header,
                rows: out.rows,
            });
        }

        let mut footer_rows = None;
        let mut footer_height = 0.0;
        if let Some(footer) = &self.footer {
            let top = content.top() - spacing;
            let out = repeated(ctx, footer, top)?;
            if !out.is_complete(footer.row_count()) {
                if !forced {
                    return Ok(LayoutResult::nothing(out.cause.unwrap_or(self.id)));
                }
                if !ctx.measuring {
                    log::warn!("Footer of table {} does not fit its area; placing what fits", self.id);
                }
            }
            footer_height = top - out.cursor;
            footer_rows = Some((top, out.rows));
        }

        let body = layout_rows(
            ctx,
            &self.body,
            &grid,
            RowsRequest {
                start: self.start_row,
                carried: &self.carried,
                top: cursor,
                limit: content.bottom() + footer_height,
                allow_split: ctx.first_in_area || forced,
                forced,
                first_in_area: ctx.first_in_area,
            },
        )?;
        let has_body_rows = self.start_row < self.body.row_count() || !self.carried.is_empty();
        if body.rows.is_empty() && has_body_rows {
            return Ok(LayoutResult::nothing(body.cause.unwrap_or(self.id)));
        }
        let complete = body.is_complete(self.body.row_count());
        cursor = body.cursor;
        sections.push(PlacedSection {
            id: self.body.id,
            kind: SectionKind::Body,
            rows: body.rows,
        });

        if let (Some(footer), Some((top, mut rows))) = (&self.footer, footer_rows) {
            let dy = cursor - top;
            rows.iter_mut().for_each(|r| r.translate(0.0, dy));
            cursor -= footer_height;
            sections.push(PlacedSection {
                id: footer.id,
                kind: SectionKind::Footer,
                rows,
            });
        }

        let used = content.top() - cursor;
        let geom = frame.close(page, used, complete, ctx.min_height);
        let split_at = (!complete).then_some(body.boundary);
        let border_grid = self.is_collapsed().then(|| self.border_grid(&grid, &sections, split_at));
        let placed = PlacedTable {
            geometry: geom,
            sections,
            grid: border_grid,
        };
        let occupied = LayoutArea::new(page, geom.margin_box);

        if complete {
            self.placed = Some(placed);
            return Ok(LayoutResult::full(occupied));
        }
        let mut split = self.clone();
        split.placed = Some(placed);

        let mut overflow = self.clone();
        overflow.start_row = body.boundary;
        overflow.carried = body.carried;
        overflow.split_edge = split_at;
        overflow.continuation = true;
        overflow.placed = None;
        Ok(LayoutResult::partial(occupied, split, overflow))
    }

    fn draw(&self, ctx: &mut DrawContext) -> Result<(), LayoutError> {
        let Some(placed) = &self.placed else {
            return Ok(());
        };
        let geom = placed.geometry;
        if let Some(anchor) = &self.anchor {
            ctx.register_anchor(anchor, geom.page_number, geom.border_box.top());
        }
        ctx.open_tag(self.id, TagRole::Table, block_attributes(&self.style, &geom))?;
        if self.is_collapsed() {
            if let Some(color) = self.style.misc.background_color {
                ctx.canvas.fill_rect(geom.border_box, color)?;
            }
        } else {
            paint_box(&mut *ctx.canvas, &self.style, &geom)?;
        }
        for section in &placed.sections {
            ctx.open_tag(section.id, section.kind.role(), TagAttributes::default())?;
            for row in &section.rows {
                ctx.open_tag(row.id, TagRole::TR, TagAttributes::default())?;
                for cell in &row.cells {
                    cell.draw(ctx)?;
                }
                ctx.close_tag(row.id)?;
            }
            ctx.close_tag(section.id)?;
        }
        if let Some(grid) = &placed.grid {
            draw_border_grid(&mut *ctx.canvas, grid)?;
        }
        ctx.close_tag(self.id)
    }

    fn next_renderer(&self) -> Self {
        let mut next = self.clone();
        next.id = RendererId::next();
        next.placed = None;
        next
    }

    fn min_max_width(&self, engine: &LayoutEngine) -> Result<MinMaxWidth, LayoutError> {
        let infos = self.cell_infos(engine)?;
        let (min, max) = column_min_max(&infos, self.column_count, engine.config().epsilon);
        let fixed: f32 = self
            .columns
            .iter()
            .map(|d| d.and_then(|d| d.points()).unwrap_or(0.0))
            .sum();
        let spacing = self.spacing() * (self.column_count + 1) as f32;
        let content = MinMaxWidth::new(
            min.iter().sum::<f32>().max(fixed) + spacing,
            max.iter().sum::<f32>().max(fixed) + spacing,
        );
        Ok(outer_min_max(&self.style, content))
    }

    fn occupied_area(&self) -> Option<LayoutArea> {
        self.placed
            .as_ref()
            .map(|p| LayoutArea::new(p.geometry.page_number, p.geometry.margin_box))
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        if let Some(placed) = self.placed.as_mut() {
            placed.geometry.translate(dx, dy);
            for section in &mut placed.sections {
                section.rows.iter_mut().for_each(|r| r.translate(dx, dy));
            }
            if let Some(grid) = placed.grid.as_mut() {
                grid.translate(dx, dy);
            }
        }
    }
}
