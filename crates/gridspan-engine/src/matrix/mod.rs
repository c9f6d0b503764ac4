//! Dense projection of the sparse grid store.
//!
//! The grid store only keeps anchor cells; every other coordinate a span
//! covers exists solely here. The matrix is a cache: it is rebuilt in full
//! after every structural mutation and never patched incrementally.

pub mod invariants;

use std::collections::HashSet;

use crate::model::{CellId, Grid};

/// One logical `(row, column)` coordinate of the grid, mapped to the cell
/// occupying it.
///
/// Many positions may reference the same cell, one per unit of its span;
/// exactly one of them (the anchor) has `offset_row == offset_column == 0`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct GridPosition {
    /// The occupying cell.
    pub cell: CellId,
    /// Logical row of this coordinate.
    pub row_index: usize,
    /// Logical column of this coordinate.
    pub column_index: usize,
    /// Row offset within the occupying cell's span; 0 at the anchor row.
    pub offset_row: usize,
    /// Column offset within the occupying cell's span; 0 at the anchor column.
    pub offset_column: usize,
    /// Nearest cell anchored in the same grid row to the left, if any.
    /// Used by the edit commands to splice new cells in at the right index.
    pub before_cell: Option<CellId>,
    /// Nearest cell anchored in the same grid row to the right, if any.
    pub after_cell: Option<CellId>,
}

impl GridPosition {
    fn seed(cell: CellId) -> Self {
        Self::projected(cell, 0, 0)
    }

    fn projected(cell: CellId, offset_row: usize, offset_column: usize) -> Self {
        Self {
            cell,
            row_index: 0,
            column_index: 0,
            offset_row,
            offset_column,
            before_cell: None,
            after_cell: None,
        }
    }

    /// Whether this position is the cell's top-left corner.
    pub fn is_anchor(&self) -> bool {
        self.offset_row == 0 && self.offset_column == 0
    }
}

/// The rectangular projection of a [`Grid`]: one position per logical
/// coordinate in the bounding rectangle.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Matrix {
    pub(crate) rows: Vec<Vec<GridPosition>>,
}

impl Matrix {
    /// Expand the sparse grid into its dense projection. Pure; an empty grid
    /// yields an empty matrix.
    ///
    /// Each matrix row is seeded from the grid row's anchors, then column
    /// indices are swept outward: a position whose cell spans further right
    /// inserts a projection at the next column of the same row, and a
    /// position whose cell spans further down inserts one at the same column
    /// of the next row (synthesizing a trailing row when the span overhangs
    /// the last stored row). A per-coordinate marker stops a later sweep from
    /// re-inserting a projection it already placed. Sweeps repeat until one
    /// completes with no insertion.
    pub fn project(grid: &Grid) -> Self {
        let mut rows: Vec<Vec<GridPosition>> = grid
            .rows()
            .iter()
            .map(|row| row.cells().iter().map(|&id| GridPosition::seed(id)).collect())
            .collect();

        let mut projected: HashSet<(usize, usize)> = HashSet::new();
        loop {
            let mut inserted = false;
            let mut c = 0;
            loop {
                let width = rows.iter().map(Vec::len).max().unwrap_or(0);
                if c >= width {
                    break;
                }
                let mut r = 0;
                while r < rows.len() {
                    let Some(pos) = rows[r].get(c).copied() else {
                        r += 1;
                        continue;
                    };
                    let cell = grid.cell(pos.cell);
                    // Span continues rightward: project into the next column.
                    if pos.offset_column + 1 < cell.colspan && !projected.contains(&(r, c + 1)) {
                        rows[r].insert(
                            c + 1,
                            GridPosition::projected(pos.cell, pos.offset_row, pos.offset_column + 1),
                        );
                        projected.insert((r, c + 1));
                        inserted = true;
                    }
                    // Span continues downward: project into the next row.
                    if pos.offset_row + 1 < cell.rowspan {
                        if r + 1 == rows.len() {
                            rows.push(Vec::new());
                        }
                        if c <= rows[r + 1].len() && !projected.contains(&(r + 1, c)) {
                            rows[r + 1].insert(
                                c,
                                GridPosition::projected(
                                    pos.cell,
                                    pos.offset_row + 1,
                                    pos.offset_column,
                                ),
                            );
                            projected.insert((r + 1, c));
                            inserted = true;
                        }
                    }
                    r += 1;
                }
                c += 1;
            }
            if !inserted {
                break;
            }
        }

        // Final placement pass: coordinates and row-local neighbor links.
        for (r, row) in rows.iter_mut().enumerate() {
            let links: Vec<(Option<CellId>, Option<CellId>)> = (0..row.len())
                .map(|i| {
                    let me = row[i].cell;
                    let before = row[..i]
                        .iter()
                        .rev()
                        .find(|p| p.offset_row == 0 && p.cell != me)
                        .map(|p| p.cell);
                    let after = row[i + 1..]
                        .iter()
                        .find(|p| p.offset_row == 0 && p.cell != me)
                        .map(|p| p.cell);
                    (before, after)
                })
                .collect();
            for (i, pos) in row.iter_mut().enumerate() {
                pos.row_index = r;
                pos.column_index = i;
                (pos.before_cell, pos.after_cell) = links[i];
            }
        }

        Self { rows }
    }

    /// Logical row count, including rows that exist only because a rowspan
    /// overhangs the last stored grid row.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Logical column count. Zero for an empty matrix.
    pub fn column_count(&self) -> usize {
        self.rows.first().map(Vec::len).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Vec<GridPosition>] {
        &self.rows
    }

    pub fn position(&self, row: usize, column: usize) -> Option<&GridPosition> {
        self.rows.get(row).and_then(|r| r.get(column))
    }
}
