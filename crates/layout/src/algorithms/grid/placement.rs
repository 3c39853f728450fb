//! Grid item placement.
//!
//! Items with a definite row and column are placed first. Items locked to a
//! row (a column under `grid-auto-flow: column`) come next, each taking the
//! first free slot in its track; sparse packing keeps one cursor per track.
//! The rest follow in document order through the auto-placement cursor,
//! which walks rows for `grid-auto-flow: row` and columns for `column`.
//! Sparse packing never moves the cursor backwards; dense packing restarts it
//! for every item.
//!
//! Placement runs in flow-relative coordinates: the "major" axis is the one
//! that grows with implicit tracks (rows for row flow), the "minor" axis is
//! the one the cursor sweeps.

use std::collections::HashMap;

use quire_style::grid::{GridAutoFlow, GridLine};

/// A placed item's cell range, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridArea {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
}

impl GridArea {
    pub fn row_end(&self) -> usize {
        self.row + self.row_span
    }

    pub fn col_end(&self) -> usize {
        self.col + self.col_span
    }
}

/// The `grid-row-*` and `grid-column-*` values of one item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ItemLines {
    pub row_start: GridLine,
    pub row_end: GridLine,
    pub column_start: GridLine,
    pub column_end: GridLine,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridPlacement {
    /// One area per input item, in input order.
    pub areas: Vec<GridArea>,
    pub rows: usize,
    pub cols: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct AxisSpan {
    start: Option<usize>,
    span: usize,
}

fn line_index(line: i32, explicit: usize) -> Option<usize> {
    match line {
        0 => {
            log::warn!("Grid line 0 is invalid; placing the item automatically");
            None
        }
        l if l > 0 => Some(l as usize - 1),
        l => {
            let index = explicit as i64 + 1 + l as i64;
            if index < 0 {
                log::warn!("Grid line {} is before the first track; clamping to the start", l);
            }
            Some(index.max(0) as usize)
        }
    }
}

fn resolve_axis(start: GridLine, end: GridLine, explicit: usize) -> AxisSpan {
    use GridLine::*;
    let line = |l| line_index(l, explicit);
    match (start, end) {
        (Line(a), Line(b)) => match (line(a), line(b)) {
            (Some(s), Some(e)) => {
                let (s, e) = if e < s { (e, s) } else { (s, e) };
                AxisSpan {
                    start: Some(s),
                    span: (e - s).max(1),
                }
            }
            (Some(s), None) | (None, Some(s)) => AxisSpan { start: Some(s), span: 1 },
            (None, None) => AxisSpan { start: None, span: 1 },
        },
        (Line(a), Span(n)) => AxisSpan {
            start: line(a),
            span: n.max(1) as usize,
        },
        (Line(a), Auto) => AxisSpan { start: line(a), span: 1 },
        (Span(n), Line(b)) => {
            let span = n.max(1) as usize;
            AxisSpan {
                start: line(b).map(|e| e.saturating_sub(span)),
                span,
            }
        }
        (Auto, Line(b)) => AxisSpan {
            start: line(b).map(|e| e.saturating_sub(1)),
            span: 1,
        },
        (Span(n), _) | (Auto, Span(n)) => AxisSpan {
            start: None,
            span: n.max(1) as usize,
        },
        (Auto, Auto) => AxisSpan { start: None, span: 1 },
    }
}

/// Occupancy matrix indexed `[major][minor]`; rows past the end are vacant.
struct Occupancy {
    cells: Vec<Vec<bool>>,
    minors: usize,
}

impl Occupancy {
    fn new(majors: usize, minors: usize) -> Self {
        Self {
            cells: vec![vec![false; minors]; majors],
            minors,
        }
    }

    fn majors(&self) -> usize {
        self.cells.len()
    }

    fn grow_minor(&mut self, minors: usize) {
        if minors > self.minors {
            self.minors = minors;
            self.cells.iter_mut().for_each(|row| row.resize(minors, false));
        }
    }

    fn is_vacant(&self, major: usize, minor: usize, major_span: usize, minor_span: usize) -> bool {
        if minor + minor_span > self.minors {
            return false;
        }
        (major..major + major_span).all(|m| match self.cells.get(m) {
            Some(row) => row[minor..minor + minor_span].iter().all(|c| !c),
            None => true,
        })
    }

    /// The first minor index at or after `from` where the item fits in
    /// `major`, or a new minor track past the end.
    fn first_vacant_minor(&self, major: usize, from: usize, major_span: usize, minor_span: usize) -> usize {
        let last = self.minors.saturating_sub(minor_span);
        (from..=last)
            .find(|&m| self.is_vacant(major, m, major_span, minor_span))
            .unwrap_or(self.minors.max(from))
    }

    fn occupy(&mut self, major: usize, minor: usize, major_span: usize, minor_span: usize) {
        self.grow_minor(minor + minor_span);
        let minors = self.minors;
        if self.cells.len() < major + major_span {
            self.cells.resize(major + major_span, vec![false; minors]);
        }
        for row in &mut self.cells[major..major + major_span] {
            row[minor..minor + minor_span].iter_mut().for_each(|c| *c = true);
        }
    }
}

struct AutoPlacer {
    grid: Occupancy,
    cursor: (usize, usize),
    dense: bool,
    growth: usize,
    max_growth: usize,
    capped: bool,
}

impl AutoPlacer {
    /// Places an item whose major position is automatic.
    fn place(&mut self, major: AxisSpan, minor: AxisSpan) -> (usize, usize) {
        if self.dense {
            self.cursor = (0, 0);
        }
        let before = self.grid.majors();
        let (maj, min) = if self.capped {
            (before, minor.start.unwrap_or(0))
        } else {
            self.find(major, minor)
        };
        self.grid.occupy(maj, min, major.span, minor.span);

        let grown = self.grid.majors().saturating_sub(before);
        self.growth += grown;
        if !self.capped && self.growth > self.max_growth {
            log::warn!(
                "Grid grew by more than {} tracks during auto-placement; appending remaining items",
                self.max_growth
            );
            self.capped = true;
        }
        if !self.dense {
            self.cursor = (maj, min + minor.span);
        }
        (maj, min)
    }

    fn find(&self, major: AxisSpan, minor: AxisSpan) -> (usize, usize) {
        let (cur_major, cur_minor) = self.cursor;
        match minor.start {
            None => {
                let last = self.grid.minors.saturating_sub(minor.span);
                for maj in cur_major.. {
                    let from = if maj == cur_major { cur_minor } else { 0 };
                    if let Some(min) = (from..=last).find(|&m| self.grid.is_vacant(maj, m, major.span, minor.span)) {
                        return (maj, min);
                    }
                    if maj >= self.grid.majors() && from == 0 {
                        return (maj, 0);
                    }
                }
                unreachable!("rows past the grid are always vacant")
            }
            Some(min) => {
                let from = if min < cur_minor { cur_major + 1 } else { cur_major };
                let maj = (from..)
                    .find(|&m| self.grid.is_vacant(m, min, major.span, minor.span))
                    .unwrap_or(from);
                (maj, min)
            }
        }
    }
}

/// Places `items` into a grid with `explicit_rows` × `explicit_cols`
/// template tracks. Implicit tracks are added as needed; auto-placement
/// growth beyond `max_growth` tracks stops the search and appends the
/// remaining items after the last track.
pub fn place_items(
    items: &[ItemLines],
    explicit_rows: usize,
    explicit_cols: usize,
    flow: GridAutoFlow,
    max_growth: usize,
) -> GridPlacement {
    let column_flow = flow.is_column();
    let spans: Vec<(AxisSpan, AxisSpan)> = items
        .iter()
        .map(|item| {
            let rows = resolve_axis(item.row_start, item.row_end, explicit_rows);
            let cols = resolve_axis(item.column_start, item.column_end, explicit_cols);
            if column_flow { (cols, rows) } else { (rows, cols) }
        })
        .collect();

    let (mut majors, mut minors) = if column_flow {
        (explicit_cols, explicit_rows)
    } else {
        (explicit_rows, explicit_cols)
    };
    for (major, minor) in &spans {
        minors = minors.max(minor.start.unwrap_or(0) + minor.span);
        if let Some(start) = major.start {
            majors = majors.max(start + major.span);
        }
    }

    let mut placer = AutoPlacer {
        grid: Occupancy::new(majors, minors),
        cursor: (0, 0),
        dense: flow.is_dense(),
        growth: 0,
        max_growth,
        capped: false,
    };
    let mut placed: Vec<Option<(usize, usize)>> = vec![None; items.len()];

    for (i, (major, minor)) in spans.iter().enumerate() {
        if let (Some(maj), Some(min)) = (major.start, minor.start) {
            placer.grid.occupy(maj, min, major.span, minor.span);
            placed[i] = Some((maj, min));
        }
    }
    let mut track_cursors: HashMap<usize, usize> = HashMap::new();
    for (i, (major, minor)) in spans.iter().enumerate() {
        if let (Some(maj), None) = (major.start, minor.start) {
            let from = if placer.dense {
                0
            } else {
                track_cursors.get(&maj).copied().unwrap_or(0)
            };
            let min = placer.grid.first_vacant_minor(maj, from, major.span, minor.span);
            placer.grid.occupy(maj, min, major.span, minor.span);
            track_cursors.insert(maj, min + minor.span);
            placed[i] = Some((maj, min));
        }
    }
    for (i, (major, minor)) in spans.iter().enumerate() {
        if placed[i].is_none() {
            placed[i] = Some(placer.place(*major, *minor));
        }
    }

    let areas = placed
        .into_iter()
        .zip(&spans)
        .map(|(pos, (major, minor))| {
            let (maj, min) = pos.unwrap_or((0, 0));
            if column_flow {
                GridArea {
                    row: min,
                    col: maj,
                    row_span: minor.span,
                    col_span: major.span,
                }
            } else {
                GridArea {
                    row: maj,
                    col: min,
                    row_span: major.span,
                    col_span: minor.span,
                }
            }
        })
        .collect();

    let (majors, minors) = (placer.grid.majors(), placer.grid.minors);
    let (rows, cols) = if column_flow { (minors, majors) } else { (majors, minors) };
    GridPlacement { areas, rows, cols }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn auto() -> ItemLines {
        ItemLines::default()
    }

    fn at(row: i32, col: i32) -> ItemLines {
        ItemLines {
            row_start: GridLine::Line(row),
            column_start: GridLine::Line(col),
            ..Default::default()
        }
    }

    fn col_span(n: u32) -> ItemLines {
        ItemLines {
            column_start: GridLine::Span(n),
            ..Default::default()
        }
    }

    fn in_row(row: i32) -> ItemLines {
        ItemLines {
            row_start: GridLine::Line(row),
            ..Default::default()
        }
    }

    fn in_col(col: i32) -> ItemLines {
        ItemLines {
            column_start: GridLine::Line(col),
            ..Default::default()
        }
    }

    fn cells(p: &GridPlacement) -> Vec<(usize, usize)> {
        p.areas.iter().map(|a| (a.row, a.col)).collect()
    }

    #[test]
    fn explicit_items_are_placed_before_auto_items() {
        let p = place_items(&[auto(), at(1, 1), auto()], 0, 2, GridAutoFlow::Row, 1000);
        assert_eq!(cells(&p), vec![(0, 1), (0, 0), (1, 0)]);
        assert_eq!((p.rows, p.cols), (2, 2));
    }

    #[test]
    fn row_locked_items_go_before_fully_auto_items() {
        let p = place_items(&[auto(), in_row(1), in_row(1)], 0, 3, GridAutoFlow::Row, 1000);
        assert_eq!(cells(&p), vec![(0, 2), (0, 0), (0, 1)]);
        assert_eq!((p.rows, p.cols), (1, 3));
    }

    #[test]
    fn sparse_row_locked_items_never_step_back_in_their_row() {
        let items = [at(1, 3), in_row(1), in_row(1), in_row(2)];
        let sparse = place_items(&items, 0, 3, GridAutoFlow::Row, 1000);
        assert_eq!(cells(&sparse), vec![(0, 2), (0, 0), (0, 1), (1, 0)]);

        let wide = ItemLines {
            column_start: GridLine::Span(2),
            ..in_row(1)
        };
        let holey = [at(1, 2), wide, in_row(1)];
        let sparse = place_items(&holey, 0, 4, GridAutoFlow::Row, 1000);
        assert_eq!(cells(&sparse), vec![(0, 1), (0, 2), (0, 4)]);
        assert_eq!(sparse.cols, 5);

        let dense = place_items(&holey, 0, 4, GridAutoFlow::RowDense, 1000);
        assert_eq!(cells(&dense), vec![(0, 1), (0, 2), (0, 0)]);
        assert_eq!(dense.cols, 4);
    }

    #[test]
    fn column_locked_items_go_first_in_column_flow() {
        let p = place_items(&[auto(), in_col(1)], 2, 0, GridAutoFlow::Column, 1000);
        assert_eq!(cells(&p), vec![(1, 0), (0, 0)]);
    }

    #[test]
    fn sparse_flow_leaves_holes_dense_fills_them() {
        let items = [auto(), col_span(2), auto()];
        let sparse = place_items(&items, 0, 2, GridAutoFlow::Row, 1000);
        assert_eq!(cells(&sparse), vec![(0, 0), (1, 0), (2, 0)]);

        let dense = place_items(&items, 0, 2, GridAutoFlow::RowDense, 1000);
        assert_eq!(cells(&dense), vec![(0, 0), (1, 0), (0, 1)]);
    }

    #[test]
    fn column_flow_fills_columns_first() {
        let p = place_items(&[auto(), auto(), auto()], 2, 0, GridAutoFlow::Column, 1000);
        assert_eq!(cells(&p), vec![(0, 0), (1, 0), (0, 1)]);
        assert_eq!((p.rows, p.cols), (2, 2));
    }

    #[test]
    fn negative_lines_count_from_the_end() {
        let item = ItemLines {
            column_start: GridLine::Line(-2),
            column_end: GridLine::Line(-1),
            row_start: GridLine::Line(1),
            ..Default::default()
        };
        let p = place_items(&[item], 1, 3, GridAutoFlow::Row, 1000);
        assert_eq!(p.areas[0].col, 2);
        assert_eq!(p.areas[0].col_span, 1);
    }

    #[test]
    fn wide_spans_add_implicit_columns() {
        let p = place_items(&[col_span(3)], 0, 2, GridAutoFlow::Row, 1000);
        assert_eq!(p.cols, 3);
        assert_eq!(p.areas[0].col_span, 3);
    }

    #[test]
    fn growth_cap_still_places_every_item() {
        let items = vec![auto(); 10];
        let p = place_items(&items, 0, 1, GridAutoFlow::Row, 3);
        assert_eq!(p.areas.len(), 10);
        assert_eq!(p.rows, 10);
        let mut rows: Vec<usize> = p.areas.iter().map(|a| a.row).collect();
        rows.dedup();
        assert_eq!(rows.len(), 10);
    }
}
