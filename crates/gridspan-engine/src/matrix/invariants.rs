//! Structural invariant checks for a grid and its projection.
//!
//! A violation here can only come from a defect in an edit command or in the
//! projector itself, so everything asserts; nothing is recoverable.

use std::collections::HashSet;

use crate::matrix::Matrix;
use crate::model::Grid;

pub fn check(grid: &Grid, matrix: &Matrix) {
    let width = matrix.column_count();
    for (r, row) in matrix.rows().iter().enumerate() {
        assert_eq!(
            row.len(),
            width,
            "matrix row {} has {} positions, expected {}",
            r,
            row.len(),
            width
        );
        for (c, pos) in row.iter().enumerate() {
            assert_eq!(
                (pos.row_index, pos.column_index),
                (r, c),
                "position at ({r}, {c}) recorded as ({}, {})",
                pos.row_index,
                pos.column_index
            );
            let cell = grid.cell(pos.cell);
            assert!(
                pos.offset_row < cell.rowspan && pos.offset_column < cell.colspan,
                "offset ({}, {}) outside spans ({}, {}) at ({r}, {c})",
                pos.offset_row,
                pos.offset_column,
                cell.rowspan,
                cell.colspan
            );
        }
    }

    // Every stored anchor projects to exactly one anchor position, and its
    // whole span is covered by positions referencing it with the right
    // offsets.
    let mut seen = HashSet::new();
    for row in grid.rows() {
        for &id in row.cells() {
            assert!(seen.insert(id), "cell {id:?} anchored in more than one row");
            let cell = grid.cell(id);
            assert!(
                cell.rowspan >= 1 && cell.colspan >= 1,
                "cell {id:?} has a zero span"
            );
            let anchor = matrix
                .rows()
                .iter()
                .flatten()
                .find(|p| p.cell == id && p.is_anchor())
                .unwrap_or_else(|| panic!("cell {id:?} has no anchor position"));
            for i in 0..cell.rowspan {
                for j in 0..cell.colspan {
                    let pos = matrix
                        .position(anchor.row_index + i, anchor.column_index + j)
                        .unwrap_or_else(|| {
                            panic!("span of cell {id:?} leaves the matrix at offset ({i}, {j})")
                        });
                    assert_eq!(pos.cell, id, "span of cell {id:?} broken at offset ({i}, {j})");
                    assert_eq!(
                        (pos.offset_row, pos.offset_column),
                        (i, j),
                        "wrong offsets inside cell {id:?}"
                    );
                }
            }
        }
    }

    // No position references a cell the store no longer anchors.
    for pos in matrix.rows().iter().flatten() {
        assert!(
            seen.contains(&pos.cell),
            "matrix references unanchored cell {:?}",
            pos.cell
        );
    }
}
