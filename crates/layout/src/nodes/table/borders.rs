//! Border resolution for table grids.
//!
//! Horizontal borders are indexed by `(edge, col)` where edge `0` is the top of
//! the first row and edge `rows` the bottom of the last one. Vertical borders
//! are indexed by `(row, edge)` likewise.

use quire_style::border::Border;
use std::collections::HashMap;
use std::fmt::Debug;

pub trait TableBorders: Debug + Send + Sync {
    fn row_count(&self) -> usize;
    fn column_count(&self) -> usize;
    fn horizontal_border(&self, edge: usize, col: usize) -> Option<Border>;
    fn vertical_border(&self, row: usize, edge: usize) -> Option<Border>;

    /// Border drawn at horizontal `edge` when the table is split there. Both
    /// fragments draw this same border.
    fn split_border(&self, edge: usize, col: usize) -> Option<Border>;

    fn is_collapsed(&self) -> bool;

    /// Borders a single cell draws itself, `[top, right, bottom, left]`.
    fn cell_borders(&self, _row: usize, _col: usize) -> [Option<Border>; 4] {
        [None; 4]
    }
}

fn visible(border: Option<Border>) -> Option<Border> {
    border.filter(|b| b.is_visible())
}

/// Resolves two competing borders: the wider one wins. On a tie the existing
/// border is kept unless the candidate has priority.
pub fn collapse(existing: Option<Border>, candidate: Option<Border>, priority: bool) -> Option<Border> {
    match (visible(existing), visible(candidate)) {
        (None, c) => c,
        (e, None) => e,
        (Some(e), Some(c)) => {
            if c.width > e.width || (c.width == e.width && priority) {
                Some(c)
            } else {
                Some(e)
            }
        }
    }
}

/// Borders of a grid in the collapsing border model.
#[derive(Debug, Clone)]
pub struct CollapsedTableBorders {
    rows: usize,
    cols: usize,
    horizontal: Vec<Vec<Option<Border>>>,
    vertical: Vec<Vec<Option<Border>>>,
    /// The table's own borders, `[top, right, bottom, left]`.
    table: [Option<Border>; 4],
}

impl CollapsedTableBorders {
    pub fn new(rows: usize, cols: usize, table: [Option<Border>; 4]) -> Self {
        let mut borders = Self {
            rows,
            cols,
            horizontal: vec![vec![None; cols]; rows + 1],
            vertical: vec![vec![None; cols + 1]; rows],
            table,
        };
        for c in 0..cols {
            borders.horizontal[0][c] = visible(table[0]);
            borders.horizontal[rows][c] = visible(table[2]);
        }
        for r in 0..rows {
            borders.vertical[r][0] = visible(table[3]);
            borders.vertical[r][cols] = visible(table[1]);
        }
        borders
    }

    /// Merges the outer borders of a cell covering `rows x cols` into the grid.
    pub fn add_cell(
        &mut self,
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
        borders: [Option<Border>; 4],
    ) {
        let row_end = (row + row_span).min(self.rows);
        let col_end = (col + col_span).min(self.cols);
        for c in col..col_end {
            self.set_horizontal(row, c, borders[0], false);
            self.set_horizontal(row_end, c, borders[2], false);
        }
        for r in row..row_end {
            self.set_vertical(r, col, borders[3], false);
            self.set_vertical(r, col_end, borders[1], false);
        }
    }

    pub fn set_horizontal(&mut self, edge: usize, col: usize, border: Option<Border>, priority: bool) {
        if let Some(slot) = self.horizontal.get_mut(edge).and_then(|row| row.get_mut(col)) {
            *slot = collapse(*slot, border, priority);
        }
    }

    pub fn set_vertical(&mut self, row: usize, edge: usize, border: Option<Border>, priority: bool) {
        if let Some(slot) = self.vertical.get_mut(row).and_then(|r| r.get_mut(edge)) {
            *slot = collapse(*slot, border, priority);
        }
    }
}

impl TableBorders for CollapsedTableBorders {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.cols
    }

    fn horizontal_border(&self, edge: usize, col: usize) -> Option<Border> {
        self.horizontal.get(edge).and_then(|r| r.get(col)).copied().flatten()
    }

    fn vertical_border(&self, row: usize, edge: usize) -> Option<Border> {
        self.vertical.get(row).and_then(|r| r.get(edge)).copied().flatten()
    }

    fn split_border(&self, edge: usize, col: usize) -> Option<Border> {
        let inner = self.horizontal_border(edge, col);
        collapse(collapse(inner, self.table[2], false), self.table[0], false)
    }

    fn is_collapsed(&self) -> bool {
        true
    }
}

/// Borders of a grid in the separated border model. Every cell keeps its own
/// borders; a slot claimed by two cells keeps the first claim.
#[derive(Debug, Clone, Default)]
pub struct SeparatedTableBorders {
    rows: usize,
    cols: usize,
    slots: HashMap<(usize, usize), [Option<Border>; 4]>,
}

impl SeparatedTableBorders {
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            slots: HashMap::new(),
        }
    }

    /// Records the borders of a cell on every slot it covers. Returns false if
    /// a slot was already claimed; the colliding write is dropped.
    pub fn add_cell(
        &mut self,
        row: usize,
        col: usize,
        row_span: usize,
        col_span: usize,
        borders: [Option<Border>; 4],
    ) -> bool {
        let mut clean = true;
        for r in row..(row + row_span).min(self.rows) {
            for c in col..(col + col_span).min(self.cols) {
                if self.slots.contains_key(&(r, c)) {
                    log::warn!(
                        "Table cell at row {}, column {} overlaps another cell; dropping its borders there",
                        row,
                        col
                    );
                    clean = false;
                    continue;
                }
                self.slots.insert((r, c), borders);
            }
        }
        clean
    }
}

impl TableBorders for SeparatedTableBorders {
    fn row_count(&self) -> usize {
        self.rows
    }

    fn column_count(&self) -> usize {
        self.cols
    }

    fn horizontal_border(&self, edge: usize, col: usize) -> Option<Border> {
        let below = self.slots.get(&(edge, col)).and_then(|b| b[0]);
        let above = edge
            .checked_sub(1)
            .and_then(|r| self.slots.get(&(r, col)))
            .and_then(|b| b[2]);
        visible(below.or(above))
    }

    fn vertical_border(&self, row: usize, edge: usize) -> Option<Border> {
        let right = self.slots.get(&(row, edge)).and_then(|b| b[3]);
        let left = edge
            .checked_sub(1)
            .and_then(|c| self.slots.get(&(row, c)))
            .and_then(|b| b[1]);
        visible(right.or(left))
    }

    fn split_border(&self, edge: usize, col: usize) -> Option<Border> {
        self.horizontal_border(edge, col)
    }

    fn is_collapsed(&self) -> bool {
        false
    }

    fn cell_borders(&self, row: usize, col: usize) -> [Option<Border>; 4] {
        self.slots.get(&(row, col)).copied().unwrap_or([None; 4])
    }
}
