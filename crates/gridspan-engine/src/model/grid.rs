use thiserror::Error;

use crate::model::cell::{Cell, CellId, CellSpec, ContentHandle};

#[derive(Debug, Error)]
pub enum GridError {
    #[error("cell at row {row}, column {column} has a zero span")]
    InvalidSpan { row: usize, column: usize },
    #[error("grid has no cells")]
    Empty,
}

/// One grid row: the ordered anchor cells whose top-left corner lies in it.
///
/// A row is generally shorter than the grid's logical column count because
/// spans anchored in other rows fill the remaining coordinates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Row {
    pub(crate) cells: Vec<CellId>,
}

impl Row {
    /// Anchor cells in left-to-right order.
    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub(crate) fn position_of(&self, id: CellId) -> Option<usize> {
        self.cells.iter().position(|&c| c == id)
    }

    pub(crate) fn remove(&mut self, id: CellId) -> bool {
        match self.position_of(id) {
            Some(i) => {
                self.cells.remove(i);
                true
            }
            None => false,
        }
    }
}

/// The sparse, authoritative grid store: ordered rows of anchor cells plus
/// the cell arena they index into.
///
/// Only the structural edit commands mutate a `Grid`; everything a reader
/// needs comes from projecting it into a [`Matrix`](crate::matrix::Matrix),
/// which must be rebuilt after every mutation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    pub(crate) rows: Vec<Row>,
    /// Arena of cells addressed by `CellId`. Destroyed cells leave a `None`
    /// slot behind; ids are never reused.
    pub(crate) cells: Vec<Option<Cell>>,
}

impl Grid {
    /// Build a fresh `rows x cols` grid of 1x1 cells, each with its own new
    /// content handle. Zero in either dimension yields an empty grid.
    pub fn new(rows: usize, cols: usize) -> Self {
        let mut grid = Self::default();
        if rows == 0 || cols == 0 {
            return grid;
        }
        for _ in 0..rows {
            let mut row = Row::default();
            for _ in 0..cols {
                let id = grid.alloc(Cell::new(ContentHandle::fresh()));
                row.cells.push(id);
            }
            grid.rows.push(row);
        }
        grid
    }

    /// Import the at-rest representation produced by an external parser.
    ///
    /// Rows may be irregular (shorter than the logical column count); spans
    /// anchored in other rows are expected to fill the gaps. Spans of zero
    /// are rejected.
    pub fn from_rows(rows: Vec<Vec<CellSpec>>) -> Result<Self, GridError> {
        if rows.iter().all(|r| r.is_empty()) {
            return Err(GridError::Empty);
        }
        let mut grid = Self::default();
        for (r, specs) in rows.into_iter().enumerate() {
            let mut row = Row::default();
            for (c, spec) in specs.into_iter().enumerate() {
                if spec.rowspan == 0 || spec.colspan == 0 {
                    return Err(GridError::InvalidSpan { row: r, column: c });
                }
                let id = grid.alloc(Cell {
                    rowspan: spec.rowspan,
                    colspan: spec.colspan,
                    content: spec.content,
                });
                row.cells.push(id);
            }
            grid.rows.push(row);
        }
        Ok(grid)
    }

    /// Emit the at-rest representation for the external renderer.
    pub fn to_rows(&self) -> Vec<Vec<CellSpec>> {
        self.rows
            .iter()
            .map(|row| {
                row.cells
                    .iter()
                    .map(|&id| {
                        let cell = self.cell(id);
                        CellSpec {
                            rowspan: cell.rowspan,
                            colspan: cell.colspan,
                            content: cell.content,
                        }
                    })
                    .collect()
            })
            .collect()
    }

    /// Number of stored rows. The logical row count can be larger when a
    /// rowspan overhangs the last stored row; see
    /// [`Matrix::row_count`](crate::matrix::Matrix::row_count).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Look up a live cell. Referencing a destroyed cell means an edit
    /// command corrupted the store, which is a fatal programming error.
    pub fn cell(&self, id: CellId) -> &Cell {
        self.cells[id.0 as usize]
            .as_ref()
            .expect("cell id refers to a destroyed cell")
    }

    pub(crate) fn cell_mut(&mut self, id: CellId) -> &mut Cell {
        self.cells[id.0 as usize]
            .as_mut()
            .expect("cell id refers to a destroyed cell")
    }

    pub(crate) fn alloc(&mut self, cell: Cell) -> CellId {
        let id = CellId(self.cells.len() as u32);
        self.cells.push(Some(cell));
        id
    }

    /// Allocate a 1x1 cell with fresh content, as split/insert do.
    pub(crate) fn fresh_cell(&mut self) -> CellId {
        self.alloc(Cell::new(ContentHandle::fresh()))
    }

    /// Drop a cell from the arena. Its content handle is discarded with it.
    pub(crate) fn destroy(&mut self, id: CellId) {
        self.cells[id.0 as usize] = None;
    }

    pub(crate) fn insert_row_at(&mut self, index: usize, row: Row) {
        self.rows.insert(index, row);
    }

    pub(crate) fn remove_row_at(&mut self, index: usize) -> Row {
        self.rows.remove(index)
    }

    /// Make sure stored rows exist up to logical row `count`. Rows that only
    /// existed as rowspan projections are materialized empty.
    pub(crate) fn ensure_rows(&mut self, count: usize) {
        while self.rows.len() < count {
            self.rows.push(Row::default());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_new_grid_dimensions() {
        let grid = Grid::new(3, 2);
        assert_eq!(grid.row_count(), 3);
        for row in grid.rows() {
            assert_eq!(row.len(), 2);
        }
    }

    #[test]
    fn test_new_grid_zero_dimension_is_empty() {
        assert_eq!(Grid::new(0, 4).row_count(), 0);
        assert_eq!(Grid::new(4, 0).row_count(), 0);
    }

    #[test]
    fn test_from_rows_rejects_zero_span() {
        let mut spec = CellSpec::plain();
        spec.colspan = 0;
        let result = Grid::from_rows(vec![vec![CellSpec::plain(), spec]]);
        assert!(matches!(
            result,
            Err(GridError::InvalidSpan { row: 0, column: 1 })
        ));
    }

    #[test]
    fn test_from_rows_rejects_empty() {
        assert!(matches!(Grid::from_rows(vec![]), Err(GridError::Empty)));
        assert!(matches!(
            Grid::from_rows(vec![vec![], vec![]]),
            Err(GridError::Empty)
        ));
    }

    #[test]
    fn test_at_rest_round_trip() {
        let rows = vec![
            vec![CellSpec::spanned(2, 1), CellSpec::plain()],
            vec![CellSpec::plain()],
        ];
        let grid = Grid::from_rows(rows.clone()).unwrap();
        assert_eq!(grid.to_rows(), rows);
    }

    #[test]
    fn test_destroyed_cells_leave_arena_slots() {
        let mut grid = Grid::new(1, 2);
        let id = grid.rows()[0].cells()[0];
        grid.rows[0].remove(id);
        grid.destroy(id);
        // The other cell is untouched and still addressable.
        let other = grid.rows()[0].cells()[0];
        assert_eq!(grid.cell(other).rowspan, 1);
    }
}
