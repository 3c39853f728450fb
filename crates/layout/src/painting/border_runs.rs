//! Strokes a resolved grid of collapsed table borders.
//!
//! Consecutive edges with an identical border are merged into one run. Runs on
//! the outer horizontal edges reach half the outer vertical border width past
//! the grid so the table corners close.

use super::box_painter::stroke;
use quire_style::border::Border;
use quire_traits::{Canvas, CanvasError};
use quire_types::Point;

/// Borders of one placed table fragment.
///
/// `xs` holds the column lines left to right and `ys` the row lines top to
/// bottom. `horizontal[e][c]` is the border on line `ys[e]` over column `c`;
/// `vertical[r][k]` is the border on line `xs[k]` beside row `r`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BorderGrid {
    pub xs: Vec<f32>,
    pub ys: Vec<f32>,
    pub horizontal: Vec<Vec<Option<Border>>>,
    pub vertical: Vec<Vec<Option<Border>>>,
}

impl BorderGrid {
    pub fn translate(&mut self, dx: f32, dy: f32) {
        self.xs.iter_mut().for_each(|x| *x += dx);
        self.ys.iter_mut().for_each(|y| *y += dy);
    }

    fn vertical_width(&self, k: usize) -> f32 {
        self.vertical
            .iter()
            .filter_map(|row| row.get(k).copied().flatten())
            .map(|b| b.width)
            .fold(0.0, f32::max)
    }
}

fn runs(edges: &[Option<Border>]) -> Vec<(usize, usize, Border)> {
    let mut out = Vec::new();
    let mut i = 0;
    while i < edges.len() {
        let Some(border) = edges[i].filter(|b| b.is_visible()) else {
            i += 1;
            continue;
        };
        let start = i;
        while i < edges.len() && edges[i] == Some(border) {
            i += 1;
        }
        out.push((start, i, border));
    }
    out
}

pub fn draw_border_grid(canvas: &mut dyn Canvas, grid: &BorderGrid) -> Result<(), CanvasError> {
    let last_x = grid.xs.len().saturating_sub(1);
    let left_ext = grid.vertical_width(0) / 2.0;
    let right_ext = grid.vertical_width(last_x) / 2.0;

    for (e, edges) in grid.horizontal.iter().enumerate() {
        let Some(&y) = grid.ys.get(e) else { continue };
        for (start, end, border) in runs(edges) {
            let (Some(&x0), Some(&x1)) = (grid.xs.get(start), grid.xs.get(end)) else {
                continue;
            };
            let x0 = if start == 0 { x0 - left_ext } else { x0 };
            let x1 = if end == last_x { x1 + right_ext } else { x1 };
            stroke(canvas, Point::new(x0, y), Point::new(x1, y), &border)?;
        }
    }

    for k in 0..grid.xs.len() {
        let column: Vec<Option<Border>> = grid
            .vertical
            .iter()
            .map(|row| row.get(k).copied().flatten())
            .collect();
        for (start, end, border) in runs(&column) {
            let (Some(&y0), Some(&y1)) = (grid.ys.get(start), grid.ys.get(end)) else {
                continue;
            };
            let x = grid.xs[k];
            stroke(canvas, Point::new(x, y0), Point::new(x, y1), &border)?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use quire_traits::RecordingCanvas;
    use quire_types::Size;

    fn uniform(rows: usize, cols: usize, width: f32) -> BorderGrid {
        let b = Some(Border::solid(width));
        BorderGrid {
            xs: (0..=cols).map(|c| c as f32 * 100.0).collect(),
            ys: (0..=rows).map(|r| 500.0 - r as f32 * 20.0).collect(),
            horizontal: vec![vec![b; cols]; rows + 1],
            vertical: vec![vec![b; cols + 1]; rows],
        }
    }

    #[test]
    fn equal_edges_merge_into_runs() {
        let mut canvas = RecordingCanvas::new();
        canvas.begin_page(1, Size::new(600.0, 600.0)).unwrap();
        draw_border_grid(&mut canvas, &uniform(2, 3, 2.0)).unwrap();
        let lines = canvas.lines(0);
        assert_eq!(lines.len(), 3 + 4);
        let top = lines.iter().find(|(a, b, _)| a.y == 500.0 && b.y == 500.0).unwrap();
        assert_eq!(top.0.x, -1.0);
        assert_eq!(top.1.x, 301.0);
    }

    #[test]
    fn style_changes_break_runs() {
        let mut grid = uniform(1, 2, 1.0);
        grid.horizontal[0][1] = Some(Border::solid(3.0));
        grid.vertical[0][1] = None;
        let mut canvas = RecordingCanvas::new();
        canvas.begin_page(1, Size::new(600.0, 600.0)).unwrap();
        draw_border_grid(&mut canvas, &grid).unwrap();
        let top: Vec<_> = canvas.lines(0).into_iter().filter(|(a, b, _)| a.y == 500.0 && b.y == 500.0).collect();
        assert_eq!(top.len(), 2);
        assert_eq!(canvas.lines(0).len(), 2 + 1 + 2);
    }
}
