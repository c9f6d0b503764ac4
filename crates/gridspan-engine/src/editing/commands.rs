use serde::{Deserialize, Serialize};

use crate::editing::SelectionRect;
use crate::matrix::{GridPosition, Matrix};
use crate::model::{CellId, Grid};

/// Structural commands that can be applied to the table
///
/// Insert and delete work off the selection's raw bounding box; merge and
/// split normalize the rectangle first so it never slices through a span.
/// Delete commands target the row/column adjacent to the selection on the
/// named side and are boundary no-ops when no such row/column exists.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Cmd {
    AddColumnToLeft,
    AddColumnToRight,
    AddRowToTop,
    AddRowToBottom,
    MergeCells,
    SplitCells,
    DeleteTopRow,
    DeleteBottomRow,
    DeleteLeftColumn,
    DeleteRightColumn,
}

/// What a command did: the tracked selection and whether the store changed.
pub(crate) struct Outcome {
    pub selection: SelectionRect,
    pub dirty: bool,
}

impl Outcome {
    fn noop(selection: SelectionRect) -> Self {
        Self {
            selection,
            dirty: false,
        }
    }

    fn mutated(selection: SelectionRect) -> Self {
        Self {
            selection,
            dirty: true,
        }
    }
}

/// Apply `cmd` to the grid store, reading the matrix captured before the
/// mutation. The caller owns rebuilding the matrix afterwards.
pub(crate) fn dispatch(grid: &mut Grid, matrix: &Matrix, cmd: Cmd, rect: SelectionRect) -> Outcome {
    if matrix.is_empty() {
        return Outcome::noop(rect);
    }
    match cmd {
        Cmd::AddColumnToLeft => add_column_left(grid, matrix, rect),
        Cmd::AddColumnToRight => add_column_right(grid, matrix, rect),
        Cmd::AddRowToTop => add_row(grid, matrix, rect.min_row(), rect.shifted_rows(1)),
        Cmd::AddRowToBottom => add_row(grid, matrix, rect.max_row() + 1, rect),
        Cmd::MergeCells => merge_cells(grid, matrix, rect),
        Cmd::SplitCells => split_cells(grid, matrix, rect),
        Cmd::DeleteTopRow => delete_top_row(grid, matrix, rect),
        Cmd::DeleteBottomRow => delete_bottom_row(grid, matrix, rect),
        Cmd::DeleteLeftColumn => delete_left_column(grid, matrix, rect),
        Cmd::DeleteRightColumn => delete_right_column(grid, matrix, rect),
    }
}

/// Insert a cell into a stored row at the slot a matrix position describes:
/// before the nearest cell anchored to its right, or at the end when no such
/// neighbor exists.
fn splice_at_position(grid: &mut Grid, row_index: usize, pos: &GridPosition, id: CellId) {
    grid.ensure_rows(row_index + 1);
    let row = &mut grid.rows[row_index];
    let at = pos
        .after_cell
        .and_then(|after| row.position_of(after))
        .unwrap_or(row.len());
    row.cells.insert(at, id);
}

/// Index of a cell inside the row it anchors in. Anchors always resolve;
/// anything else means the store and matrix disagree, which is fatal.
fn anchor_index(grid: &Grid, row_index: usize, cell: CellId) -> usize {
    grid.rows[row_index]
        .position_of(cell)
        .expect("anchor cell missing from its row")
}

fn add_column_left(grid: &mut Grid, matrix: &Matrix, rect: SelectionRect) -> Outcome {
    let target = rect.min_column();
    for r in 0..matrix.row_count() {
        let pos = matrix.rows[r][target];
        if pos.offset_column > 0 {
            // Mid-span: the new column lands inside the cell. Widen it once,
            // at its anchor row; covered rows get nothing.
            if pos.offset_row == 0 {
                grid.cell_mut(pos.cell).colspan += 1;
            }
            continue;
        }
        let id = grid.fresh_cell();
        if pos.offset_row == 0 {
            // Plain column boundary with the occupant anchored right here.
            let at = anchor_index(grid, r, pos.cell);
            grid.rows[r].cells.insert(at, id);
        } else {
            // Occupant is anchored in a row above; splice by neighbor links.
            splice_at_position(grid, r, &pos, id);
        }
    }
    Outcome::mutated(rect.shifted_columns(1))
}

fn add_column_right(grid: &mut Grid, matrix: &Matrix, rect: SelectionRect) -> Outcome {
    let target = rect.max_column();
    for r in 0..matrix.row_count() {
        let pos = matrix.rows[r][target];
        if pos.offset_column + 1 < grid.cell(pos.cell).colspan {
            // Span continues past the target: the new column lands inside it.
            if pos.offset_row == 0 {
                grid.cell_mut(pos.cell).colspan += 1;
            }
            continue;
        }
        let id = grid.fresh_cell();
        if pos.offset_row == 0 {
            let at = anchor_index(grid, r, pos.cell) + 1;
            grid.rows[r].cells.insert(at, id);
        } else {
            splice_at_position(grid, r, &pos, id);
        }
    }
    Outcome::mutated(rect)
}

/// Insert a new row so it ends up at logical index `boundary`.
///
/// Cells spanning across the boundary grow by one row; every other column of
/// the new row gets a fresh 1x1 cell. At the grid's top or bottom edge no
/// span can cross, so the row is entirely fresh.
fn add_row(grid: &mut Grid, matrix: &Matrix, boundary: usize, selection: SelectionRect) -> Outcome {
    let width = matrix.column_count();
    let mut assembled = crate::model::Row::default();

    if boundary == 0 || boundary >= matrix.row_count() {
        for _ in 0..width {
            let id = grid.fresh_cell();
            assembled.cells.push(id);
        }
        grid.ensure_rows(matrix.row_count());
        let at = boundary.min(grid.rows.len());
        grid.insert_row_at(at, assembled);
    } else {
        for c in 0..width {
            let pos = matrix.rows[boundary][c];
            if pos.offset_row > 0 {
                // A span crosses the boundary; stretch it once, at its
                // leftmost column within this row.
                if pos.offset_column == 0 {
                    grid.cell_mut(pos.cell).rowspan += 1;
                }
            } else {
                let id = grid.fresh_cell();
                assembled.cells.push(id);
            }
        }
        grid.ensure_rows(boundary);
        grid.insert_row_at(boundary, assembled);
    }
    Outcome::mutated(selection)
}

fn delete_top_row(grid: &mut Grid, matrix: &Matrix, rect: SelectionRect) -> Outcome {
    if rect.min_row() == 0 {
        return Outcome::noop(rect);
    }
    delete_row(grid, matrix, rect.min_row() - 1);
    Outcome::mutated(rect.shifted_rows(-1))
}

fn delete_bottom_row(grid: &mut Grid, matrix: &Matrix, rect: SelectionRect) -> Outcome {
    if rect.max_row() + 1 >= matrix.row_count() {
        return Outcome::noop(rect);
    }
    delete_row(grid, matrix, rect.max_row() + 1);
    Outcome::mutated(rect)
}

/// Remove logical row `target` from the store.
///
/// Every cell crossing the row is visited exactly once, at its leftmost
/// column within it. A cell anchored in the row either dies with it
/// (`rowspan == 1`) or survives relocated one row down with its span
/// shortened; a cell merely passing through just shrinks.
fn delete_row(grid: &mut Grid, matrix: &Matrix, target: usize) {
    for c in 0..matrix.column_count() {
        let pos = matrix.rows[target][c];
        if pos.offset_column != 0 {
            continue;
        }
        if pos.offset_row == 0 {
            let survives = grid.cell(pos.cell).rowspan > 1;
            grid.rows[target].remove(pos.cell);
            if survives {
                grid.cell_mut(pos.cell).rowspan -= 1;
                let below = matrix.rows[target + 1][c];
                splice_at_position(grid, target + 1, &below, pos.cell);
            } else {
                grid.destroy(pos.cell);
            }
        } else {
            grid.cell_mut(pos.cell).rowspan -= 1;
        }
    }
    if target < grid.rows.len() {
        grid.remove_row_at(target);
    }
}

fn delete_left_column(grid: &mut Grid, matrix: &Matrix, rect: SelectionRect) -> Outcome {
    if rect.min_column() == 0 {
        return Outcome::noop(rect);
    }
    delete_column(grid, matrix, rect.min_column() - 1);
    Outcome::mutated(rect.shifted_columns(-1))
}

fn delete_right_column(grid: &mut Grid, matrix: &Matrix, rect: SelectionRect) -> Outcome {
    if rect.max_column() + 1 >= matrix.column_count() {
        return Outcome::noop(rect);
    }
    delete_column(grid, matrix, rect.max_column() + 1);
    Outcome::mutated(rect)
}

/// Remove logical column `target` from the store.
///
/// Spanning cells shrink by one column; the row sequence encodes no column
/// positions, so shrinking alone keeps the cell in its slot. Cells confined
/// to the column are removed outright.
fn delete_column(grid: &mut Grid, matrix: &Matrix, target: usize) {
    for r in 0..matrix.row_count() {
        let pos = matrix.rows[r][target];
        if pos.offset_row != 0 {
            continue;
        }
        if grid.cell(pos.cell).colspan > 1 {
            grid.cell_mut(pos.cell).colspan -= 1;
        } else {
            grid.rows[r].remove(pos.cell);
            grid.destroy(pos.cell);
        }
    }
}

fn merge_cells(grid: &mut Grid, matrix: &Matrix, rect: SelectionRect) -> Outcome {
    let rect = rect.normalize(grid, matrix);
    let (min_r, max_r) = (rect.min_row(), rect.max_row());
    let (min_c, max_c) = (rect.min_column(), rect.max_column());

    let mut anchors = Vec::new();
    for r in min_r..=max_r {
        for c in min_c..=max_c {
            let pos = matrix.rows[r][c];
            if pos.is_anchor() {
                anchors.push(pos);
            }
        }
    }

    // Normalization puts the top-left cell's anchor exactly at the corner,
    // so collapsing there lands on the surviving cell.
    let collapsed = SelectionRect::cell(min_r, min_c);
    let Some((survivor, absorbed)) = anchors.split_first() else {
        return Outcome::noop(collapsed);
    };
    if absorbed.is_empty() {
        return Outcome::noop(collapsed);
    }

    let cell = grid.cell_mut(survivor.cell);
    cell.rowspan = max_r - min_r + 1;
    cell.colspan = max_c - min_c + 1;

    for pos in absorbed {
        grid.rows[pos.row_index].remove(pos.cell);
        // The absorbed content handles are discarded, not concatenated into
        // the survivor. Merging is destructive for everything but the
        // top-left cell's payload.
        grid.destroy(pos.cell);
    }

    // A row emptied by the merge keeps its slot while stored rows follow it,
    // so those rows still seed the logical rows below the merged span. Only
    // trailing emptied rows are dropped; their coordinates live on as
    // projections of the surviving span.
    while grid.rows.last().is_some_and(|row| row.is_empty()) {
        grid.rows.pop();
    }

    Outcome::mutated(collapsed)
}

fn split_cells(grid: &mut Grid, matrix: &Matrix, rect: SelectionRect) -> Outcome {
    let rect = rect.normalize(grid, matrix);
    let mut dirty = false;
    for r in rect.min_row()..=rect.max_row() {
        for c in rect.min_column()..=rect.max_column() {
            let pos = matrix.rows[r][c];
            if pos.is_anchor() {
                continue;
            }
            // Collapse the originating cell back to 1x1; repeated visits to
            // the same cell are idempotent.
            let cell = grid.cell_mut(pos.cell);
            cell.rowspan = 1;
            cell.colspan = 1;
            // Materialize a fresh cell at this exact slot. Rows that only
            // existed as rowspan projections get stored rows first.
            let id = grid.fresh_cell();
            splice_at_position(grid, r, &pos, id);
            dirty = true;
        }
    }
    if dirty {
        Outcome::mutated(rect)
    } else {
        Outcome::noop(rect)
    }
}
