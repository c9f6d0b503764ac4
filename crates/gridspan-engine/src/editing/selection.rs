use serde::{Deserialize, Serialize};

use crate::matrix::Matrix;
use crate::model::Grid;

/// Two grid coordinates marking the corners of the current selection.
///
/// The corners are whatever the surrounding cursor subsystem handed us:
/// `start` is not necessarily above or left of `end`. The `min_*`/`max_*`
/// accessors give the bounding box; [`SelectionRect::normalize`] grows that
/// box until it no longer slices through any spanning cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionRect {
    /// `(row_index, column_index)` of the first corner.
    pub start: (usize, usize),
    /// `(row_index, column_index)` of the second corner.
    pub end: (usize, usize),
}

impl SelectionRect {
    pub fn new(start: (usize, usize), end: (usize, usize)) -> Self {
        Self { start, end }
    }

    /// A selection collapsed onto a single coordinate.
    pub fn cell(row: usize, column: usize) -> Self {
        Self::new((row, column), (row, column))
    }

    pub fn min_row(&self) -> usize {
        self.start.0.min(self.end.0)
    }

    pub fn max_row(&self) -> usize {
        self.start.0.max(self.end.0)
    }

    pub fn min_column(&self) -> usize {
        self.start.1.min(self.end.1)
    }

    pub fn max_column(&self) -> usize {
        self.start.1.max(self.end.1)
    }

    /// Clamp both corners into the matrix bounds. Selections are advisory
    /// input from the editor shell; out-of-range coordinates are not an
    /// error, they just snap to the nearest edge.
    pub(crate) fn clamped(self, matrix: &Matrix) -> Self {
        if matrix.is_empty() {
            return Self::cell(0, 0);
        }
        let last_row = matrix.row_count() - 1;
        let last_col = matrix.column_count() - 1;
        let clamp = |(r, c): (usize, usize)| (r.min(last_row), c.min(last_col));
        Self::new(clamp(self.start), clamp(self.end))
    }

    /// Grow the bounding box to the minimal rectangle that does not clip any
    /// spanning cell.
    ///
    /// Runs the expansion as a fixed-point loop: scan the four edges for
    /// positions whose cell reaches outside the rectangle, grow by the
    /// largest overflow on each side, repeat until all four overflows are
    /// zero. The rectangle only grows and the matrix is finite, so the loop
    /// is bounded by the matrix area.
    pub fn normalize(self, grid: &Grid, matrix: &Matrix) -> Self {
        if matrix.is_empty() {
            return Self::cell(0, 0);
        }
        let rect = self.clamped(matrix);
        let (mut min_r, mut max_r) = (rect.min_row(), rect.max_row());
        let (mut min_c, mut max_c) = (rect.min_column(), rect.max_column());

        let mut budget = matrix.row_count() * matrix.column_count();
        loop {
            let mut grow_left = 0;
            let mut grow_right = 0;
            for r in min_r..=max_r {
                let left = &matrix.rows[r][min_c];
                grow_left = grow_left.max(left.offset_column);
                let right = &matrix.rows[r][max_c];
                let colspan = grid.cell(right.cell).colspan;
                grow_right = grow_right.max(colspan - right.offset_column - 1);
            }
            let mut grow_up = 0;
            let mut grow_down = 0;
            for c in min_c..=max_c {
                let top = &matrix.rows[min_r][c];
                grow_up = grow_up.max(top.offset_row);
                let bottom = &matrix.rows[max_r][c];
                let rowspan = grid.cell(bottom.cell).rowspan;
                grow_down = grow_down.max(rowspan - bottom.offset_row - 1);
            }

            let stable = grow_left == 0 && grow_right == 0 && grow_up == 0 && grow_down == 0;
            if stable {
                break;
            }
            // A consistent projection stabilizes long before the area bound;
            // exhausting it means the matrix offsets disagree with the spans.
            debug_assert!(budget > 0, "selection normalization did not converge");
            if budget == 0 {
                break;
            }
            budget -= 1;
            min_c -= grow_left;
            max_c += grow_right;
            min_r -= grow_up;
            max_r += grow_down;
        }

        Self::new((min_r, min_c), (max_r, max_c))
    }

    pub(crate) fn shifted_rows(self, delta: isize) -> Self {
        Self::new(
            (self.start.0.saturating_add_signed(delta), self.start.1),
            (self.end.0.saturating_add_signed(delta), self.end.1),
        )
    }

    pub(crate) fn shifted_columns(self, delta: isize) -> Self {
        Self::new(
            (self.start.0, self.start.1.saturating_add_signed(delta)),
            (self.end.0, self.end.1.saturating_add_signed(delta)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CellSpec;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bounding_box_ignores_corner_order() {
        let rect = SelectionRect::new((3, 1), (0, 4));
        assert_eq!(rect.min_row(), 0);
        assert_eq!(rect.max_row(), 3);
        assert_eq!(rect.min_column(), 1);
        assert_eq!(rect.max_column(), 4);
    }

    #[test]
    fn test_clamp_snaps_to_matrix_edges() {
        let grid = Grid::new(2, 2);
        let matrix = Matrix::project(&grid);
        let rect = SelectionRect::new((0, 0), (9, 9)).clamped(&matrix);
        assert_eq!(rect, SelectionRect::new((0, 0), (1, 1)));
    }

    #[test]
    fn test_normalize_plain_rectangle_is_identity() {
        let grid = Grid::new(3, 3);
        let matrix = Matrix::project(&grid);
        let rect = SelectionRect::new((0, 1), (1, 2));
        assert_eq!(rect.normalize(&grid, &matrix), rect);
    }

    #[test]
    fn test_normalize_expands_over_spanning_cell() {
        // A 2x2 span in the top-left of a 3x3 grid; a corner inside the span
        // must pull the whole span into the rectangle.
        let grid = Grid::from_rows(vec![
            vec![CellSpec::spanned(2, 2), CellSpec::plain()],
            vec![CellSpec::plain()],
            vec![CellSpec::plain(), CellSpec::plain(), CellSpec::plain()],
        ])
        .unwrap();
        let matrix = Matrix::project(&grid);
        let rect = SelectionRect::new((1, 1), (1, 1)).normalize(&grid, &matrix);
        assert_eq!(rect, SelectionRect::new((0, 0), (1, 1)));
    }

    #[test]
    fn test_normalize_chains_expansions() {
        // [ A B B ]   A spans down, B spans right. Selecting (1,0)-(1,1)
        // [ A D E ]   first grows up to include A's anchor row, which then
        //             drags B's full width in.
        let grid = Grid::from_rows(vec![
            vec![CellSpec::spanned(2, 1), CellSpec::spanned(1, 2)],
            vec![CellSpec::plain(), CellSpec::plain()],
        ])
        .unwrap();
        let matrix = Matrix::project(&grid);
        let rect = SelectionRect::new((1, 0), (1, 1)).normalize(&grid, &matrix);
        assert_eq!(rect, SelectionRect::new((0, 0), (1, 2)));
    }

    #[test]
    fn test_normalize_converges_on_full_grid_span() {
        let grid = Grid::from_rows(vec![vec![CellSpec::spanned(3, 3)]]).unwrap();
        let matrix = Matrix::project(&grid);
        let rect = SelectionRect::cell(1, 1).normalize(&grid, &matrix);
        assert_eq!(rect, SelectionRect::new((0, 0), (2, 2)));
        // An already-stable rectangle is a fixed point.
        assert_eq!(rect.normalize(&grid, &matrix), rect);
    }

    #[test]
    fn test_normalize_stays_minimal() {
        // The span sits outside the selection, so nothing should grow.
        let grid = Grid::from_rows(vec![
            vec![CellSpec::spanned(2, 1), CellSpec::plain(), CellSpec::plain()],
            vec![CellSpec::plain(), CellSpec::plain()],
        ])
        .unwrap();
        let matrix = Matrix::project(&grid);
        let rect = SelectionRect::new((0, 1), (1, 2)).normalize(&grid, &matrix);
        assert_eq!(rect, SelectionRect::new((0, 1), (1, 2)));
    }
}
