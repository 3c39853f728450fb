//! Column width resolution for tables.
//!
//! Both algorithms conserve the table width: the returned widths always add up
//! to the available width, unless the columns' minimum widths already exceed it.

use quire_style::dimension::Dimension;

/// Width facts about one cell, as seen by the width solver.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CellWidthInfo {
    pub row: usize,
    pub col: usize,
    pub col_span: usize,
    /// Narrowest width the cell can take without overflowing.
    pub min: f32,
    /// Width the cell takes without any line breaks.
    pub max: f32,
    /// Width requested by the cell's style.
    pub width: Option<Dimension>,
}

/// Fixed table layout: column declarations and the first row decide.
///
/// Columns without a width share what is left. When every column has a
/// width, the difference to the available width is shared by all of them.
pub fn fixed_layout(
    available: f32,
    declared: &[Option<Dimension>],
    cells: &[CellWidthInfo],
    columns: usize,
) -> Vec<f32> {
    let mut widths: Vec<Option<f32>> = (0..columns)
        .map(|c| {
            declared
                .get(c)
                .copied()
                .flatten()
                .and_then(|d| d.resolve(Some(available)))
        })
        .collect();

    for cell in cells.iter().filter(|c| c.row == 0) {
        let span = cell.col..(cell.col + cell.col_span).min(columns);
        if span.is_empty() || widths[span.clone()].iter().any(Option::is_some) {
            continue;
        }
        if let Some(w) = cell.width.and_then(|d| d.resolve(Some(available))) {
            let share = w / span.len() as f32;
            for slot in &mut widths[span] {
                *slot = Some(share);
            }
        }
    }

    let specified: f32 = widths.iter().flatten().sum();
    let unspecified = widths.iter().filter(|w| w.is_none()).count();
    let rest = available - specified;

    if unspecified > 0 && rest >= 0.0 {
        let share = rest / unspecified as f32;
        return widths.into_iter().map(|w| w.unwrap_or(share)).collect();
    }

    let mut resolved: Vec<f32> = widths.into_iter().map(|w| w.unwrap_or(0.0)).collect();
    if unspecified == 0 && rest >= 0.0 {
        let share = rest / columns.max(1) as f32;
        resolved.iter_mut().for_each(|w| *w += share);
    } else if specified > 0.0 {
        log::warn!(
            "Fixed column widths ({}pt) exceed the table width ({}pt); shrinking them",
            specified,
            available
        );
        let factor = available.max(0.0) / specified;
        resolved.iter_mut().for_each(|w| *w *= factor);
    }
    resolved
}

/// Per-column minimum and maximum content widths. Spanning cells spread their
/// excess evenly over the columns they span.
pub fn column_min_max(cells: &[CellWidthInfo], columns: usize, epsilon: f32) -> (Vec<f32>, Vec<f32>) {
    let mut min = vec![0.0f32; columns];
    let mut max = vec![0.0f32; columns];
    for cell in cells.iter().filter(|c| c.col_span == 1 && c.col < columns) {
        min[cell.col] = min[cell.col].max(cell.min);
        max[cell.col] = max[cell.col].max(cell.max);
    }
    for cell in cells.iter().filter(|c| c.col_span > 1 && c.col < columns) {
        let span = cell.col..(cell.col + cell.col_span).min(columns);
        let n = span.len() as f32;
        let span_min: f32 = min[span.clone()].iter().sum();
        let span_max: f32 = max[span.clone()].iter().sum();
        if cell.min > span_min + epsilon {
            let extra = (cell.min - span_min) / n;
            min[span.clone()].iter_mut().for_each(|m| *m += extra);
        }
        if cell.max > span_max + epsilon {
            let extra = (cell.max - span_max) / n;
            max[span].iter_mut().for_each(|m| *m += extra);
        }
    }
    for (lo, hi) in min.iter().zip(max.iter_mut()) {
        *hi = hi.max(*lo);
    }
    (min, max)
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum ColumnKind {
    Auto,
    Fixed(f32),
    Percent(f32),
}

/// Automatic table layout driven by the cells' content widths.
pub fn auto_layout(
    available: f32,
    declared: &[Option<Dimension>],
    cells: &[CellWidthInfo],
    columns: usize,
    epsilon: f32,
) -> Vec<f32> {
    if columns == 0 {
        return Vec::new();
    }
    let (min, mut max) = column_min_max(cells, columns, epsilon);
    let mut kind = vec![ColumnKind::Auto; columns];

    let apply_dimension = |kind: &mut ColumnKind, d: Dimension| match (d, *kind) {
        (Dimension::Pt(w), ColumnKind::Fixed(f)) => *kind = ColumnKind::Fixed(f.max(w)),
        (Dimension::Pt(w), ColumnKind::Auto) => *kind = ColumnKind::Fixed(w),
        (Dimension::Percent(p), ColumnKind::Percent(q)) => *kind = ColumnKind::Percent(p.max(q)),
        (Dimension::Percent(p), _) => *kind = ColumnKind::Percent(p),
        _ => {}
    };

    for cell in cells.iter().filter(|c| c.col_span == 1 && c.col < columns) {
        if let Some(d) = cell.width {
            apply_dimension(&mut kind[cell.col], d);
        }
    }
    for cell in cells.iter().filter(|c| c.col_span > 1 && c.col < columns) {
        if let Some(d) = cell.width {
            let span = cell.col..(cell.col + cell.col_span).min(columns);
            spread_spanning_width(&mut kind, &min, &max, span, d, available, epsilon);
        }
    }
    for (c, d) in declared.iter().enumerate().take(columns) {
        if let Some(d) = d {
            apply_dimension(&mut kind[c], *d);
        }
    }

    let mut percent_total = 0.0;
    for k in kind.iter_mut() {
        if let ColumnKind::Percent(p) = *k {
            let capped = p.min(100.0 - percent_total).max(0.0);
            if capped < p {
                log::warn!("Column percentages exceed 100%; capping {}% to {}%", p, capped);
            }
            percent_total += capped;
            *k = ColumnKind::Percent(capped);
        }
    }

    for c in 0..columns {
        max[c] = max[c].max(min[c]);
        if let ColumnKind::Fixed(w) = kind[c] {
            max[c] = w.max(min[c]);
        }
    }

    let sum_min: f32 = min.iter().sum();
    if available <= sum_min + epsilon {
        if available < sum_min - epsilon {
            log::warn!(
                "Table content needs {}pt but only {}pt are available; the table will overflow",
                sum_min,
                available
            );
            return min;
        }
        let mut widths = min;
        fix_rounding(&mut widths, available);
        return widths;
    }

    let mut widths: Vec<f32> = (0..columns)
        .map(|c| match kind[c] {
            ColumnKind::Auto => min[c],
            ColumnKind::Fixed(w) => w.max(min[c]),
            ColumnKind::Percent(p) => (available * p / 100.0).max(min[c]),
        })
        .collect();

    let mut remaining = available - widths.iter().sum::<f32>();
    if remaining < -epsilon {
        let flexible: f32 = (0..columns)
            .filter(|c| kind[*c] != ColumnKind::Auto)
            .map(|c| widths[c] - min[c])
            .sum();
        if flexible > epsilon {
            let factor = (-remaining / flexible).min(1.0);
            for c in (0..columns).filter(|c| kind[*c] != ColumnKind::Auto) {
                widths[c] -= (widths[c] - min[c]) * factor;
            }
        }
        remaining = available - widths.iter().sum::<f32>();
    }

    if remaining > epsilon {
        let autos: Vec<usize> = (0..columns).filter(|c| kind[*c] == ColumnKind::Auto).collect();
        let need: f32 = autos.iter().map(|&c| max[c] - widths[c]).sum();
        if need > epsilon && need >= remaining {
            for &c in &autos {
                widths[c] += remaining * (max[c] - widths[c]) / need;
            }
        } else {
            for &c in &autos {
                widths[c] = max[c];
            }
            let leftover = available - widths.iter().sum::<f32>();
            let targets: Vec<usize> = if !autos.is_empty() {
                autos
            } else {
                let fixed: Vec<usize> = (0..columns)
                    .filter(|c| matches!(kind[*c], ColumnKind::Fixed(_)))
                    .collect();
                if fixed.is_empty() { (0..columns).collect() } else { fixed }
            };
            distribute_proportionally(&mut widths, &targets, leftover);
        }
    }

    fix_rounding(&mut widths, available);
    widths
}

/// Shares what a spanning cell declares, less what its fixed and percent
/// columns already take, over its auto columns in proportion to their
/// flexibility (max - min). Columns without flexibility split it evenly.
fn spread_spanning_width(
    kind: &mut [ColumnKind],
    min: &[f32],
    max: &[f32],
    span: std::ops::Range<usize>,
    declared: Dimension,
    available: f32,
    epsilon: f32,
) {
    let autos: Vec<usize> = span.clone().filter(|c| kind[*c] == ColumnKind::Auto).collect();
    if autos.is_empty() {
        return;
    }
    let flexibility: Vec<f32> = autos.iter().map(|&c| (max[c] - min[c]).max(0.0)).collect();
    let total_flex: f32 = flexibility.iter().sum();
    let share = |i: usize| {
        if total_flex > epsilon {
            flexibility[i] / total_flex
        } else {
            1.0 / autos.len() as f32
        }
    };

    match declared {
        Dimension::Pt(w) => {
            let settled: f32 = span
                .map(|c| match kind[c] {
                    ColumnKind::Fixed(f) => f,
                    ColumnKind::Percent(p) => available * p / 100.0,
                    ColumnKind::Auto => 0.0,
                })
                .sum();
            let base: f32 = autos.iter().map(|&c| min[c]).sum();
            let extra = (w - settled - base).max(0.0);
            for (i, &c) in autos.iter().enumerate() {
                kind[c] = ColumnKind::Fixed(min[c] + extra * share(i));
            }
        }
        Dimension::Percent(p) => {
            let settled: f32 = span
                .map(|c| match kind[c] {
                    ColumnKind::Fixed(f) if available > epsilon => f / available * 100.0,
                    ColumnKind::Percent(q) => q,
                    _ => 0.0,
                })
                .sum();
            let rest = p - settled;
            if rest <= epsilon {
                return;
            }
            for (i, &c) in autos.iter().enumerate() {
                kind[c] = ColumnKind::Percent(rest * share(i));
            }
        }
        _ => {}
    }
}

fn distribute_proportionally(widths: &mut [f32], targets: &[usize], amount: f32) {
    if targets.is_empty() {
        return;
    }
    let total: f32 = targets.iter().map(|&c| widths[c]).sum();
    for &c in targets {
        let share = if total > 0.0 {
            widths[c] / total
        } else {
            1.0 / targets.len() as f32
        };
        widths[c] += amount * share;
    }
}

/// Puts the float error of the distribution on the last column.
fn fix_rounding(widths: &mut [f32], available: f32) {
    let diff = available - widths.iter().sum::<f32>();
    if let Some(last) = widths.last_mut() {
        *last = (*last + diff).max(0.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    fn cell(col: usize, min: f32, max: f32) -> CellWidthInfo {
        CellWidthInfo {
            row: 0,
            col,
            col_span: 1,
            min,
            max,
            width: None,
        }
    }

    fn assert_conserves(widths: &[f32], total: f32) {
        let sum: f32 = widths.iter().sum();
        assert!((sum - total).abs() < 1e-3, "{:?} sums to {}, expected {}", widths, sum, total);
    }

    #[test]
    fn fixed_layout_shares_rest_among_unspecified() {
        let declared = [Some(Dimension::Pt(100.0)), None, None];
        let widths = fixed_layout(400.0, &declared, &[], 3);
        assert_eq!(widths, vec![100.0, 150.0, 150.0]);
    }

    #[test]
    fn fixed_layout_spreads_difference_when_all_specified() {
        let declared = [Some(Dimension::Pt(100.0)), Some(Dimension::Pt(100.0))];
        let widths = fixed_layout(300.0, &declared, &[], 2);
        assert_eq!(widths, vec![150.0, 150.0]);
    }

    #[test]
    fn fixed_layout_uses_first_row_cells() {
        let mut first = cell(0, 0.0, 0.0);
        first.width = Some(Dimension::Percent(25.0));
        let widths = fixed_layout(400.0, &[], &[first], 2);
        assert_eq!(widths, vec![100.0, 300.0]);
    }

    #[test]
    fn auto_layout_freezes_at_minimum_when_narrow() {
        let cells = [cell(0, 80.0, 200.0), cell(1, 120.0, 300.0)];
        let widths = auto_layout(200.0, &[], &cells, 2, EPS);
        assert_eq!(widths, vec![80.0, 120.0]);
    }

    #[test]
    fn auto_layout_grows_towards_max_content() {
        let cells = [cell(0, 50.0, 100.0), cell(1, 50.0, 300.0)];
        let widths = auto_layout(500.0, &[], &cells, 2, EPS);
        assert_conserves(&widths, 500.0);
        assert!(widths[1] > widths[0]);

        let widths = auto_layout(250.0, &[], &cells, 2, EPS);
        assert_conserves(&widths, 250.0);
        assert!(widths[0] <= 100.0 && widths[1] <= 300.0);
    }

    #[test]
    fn auto_layout_caps_percentages_at_hundred() {
        let declared = [Some(Dimension::Percent(80.0)), Some(Dimension::Percent(50.0)), None];
        let cells = [cell(0, 10.0, 10.0), cell(1, 10.0, 10.0), cell(2, 0.0, 0.0)];
        let widths = auto_layout(1000.0, &declared, &cells, 3, EPS);
        assert_conserves(&widths, 1000.0);
        assert!((widths[0] - 800.0).abs() < 1.0);
        assert!(widths[1] < 500.0);
    }

    #[test]
    fn spanning_percentage_is_shared_by_its_columns() {
        let mut wide = cell(0, 0.0, 0.0);
        wide.col_span = 2;
        wide.width = Some(Dimension::Percent(50.0));
        let cells = [wide, cell(0, 10.0, 10.0), cell(1, 10.0, 10.0), cell(2, 10.0, 10.0)];
        let widths = auto_layout(1000.0, &[], &cells, 3, EPS);
        assert_conserves(&widths, 1000.0);
        assert!((widths[0] - 250.0).abs() < 1e-2, "{:?}", widths);
        assert!((widths[1] - 250.0).abs() < 1e-2, "{:?}", widths);
    }

    #[test]
    fn spanning_fixed_width_follows_flexibility() {
        let mut wide = cell(0, 0.0, 0.0);
        wide.col_span = 2;
        wide.width = Some(Dimension::Pt(300.0));
        let cells = [wide, cell(0, 10.0, 10.0), cell(1, 10.0, 110.0), cell(2, 10.0, 10.0)];
        let widths = auto_layout(1000.0, &[], &cells, 3, EPS);
        assert_conserves(&widths, 1000.0);
        assert!((widths[0] - 10.0).abs() < 1e-2, "{:?}", widths);
        assert!((widths[1] - 290.0).abs() < 1e-2, "{:?}", widths);
    }

    #[test]
    fn spanning_cell_spreads_its_minimum() {
        let mut wide = cell(0, 300.0, 300.0);
        wide.col_span = 2;
        let cells = [cell(0, 50.0, 50.0), cell(1, 50.0, 50.0), wide];
        let widths = auto_layout(300.0, &[], &cells, 2, EPS);
        assert_eq!(widths, vec![150.0, 150.0]);
    }
}
