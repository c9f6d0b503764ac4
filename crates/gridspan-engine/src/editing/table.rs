use crate::editing::{Cmd, Patch, SelectionRect, commands};
use crate::matrix::Matrix;
use crate::model::{CellSpec, Grid, GridError};

/// An editable table: the grid store plus the session state around it.
///
/// `Table` owns the authoritative [`Grid`], the current [`SelectionRect`],
/// a version counter for change detection, and the cached [`Matrix`]
/// projection. The cache is rebuilt after every mutating command and is
/// otherwise safe to read repeatedly.
#[derive(Clone, Debug)]
pub struct Table {
    grid: Grid,
    matrix: Matrix,
    selection: SelectionRect,
    version: u64,
}

impl Table {
    /// A fresh `rows x cols` table of 1x1 cells, selection at the top-left.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self::with_grid(Grid::new(rows, cols))
    }

    /// Import a table from its at-rest representation.
    pub fn from_rows(rows: Vec<Vec<CellSpec>>) -> Result<Self, GridError> {
        Ok(Self::with_grid(Grid::from_rows(rows)?))
    }

    fn with_grid(grid: Grid) -> Self {
        let matrix = Matrix::project(&grid);
        // Imports go through the same consistency sweep as commands; a grid
        // whose rows don't tile is caught here, not at the first edit.
        #[cfg(debug_assertions)]
        crate::matrix::invariants::check(&grid, &matrix);
        Self {
            grid,
            matrix,
            selection: SelectionRect::cell(0, 0),
            version: 0,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// The current projection. Valid until the next mutating command.
    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Emit the at-rest representation for the external renderer.
    pub fn to_rows(&self) -> Vec<Vec<CellSpec>> {
        self.grid.to_rows()
    }

    /// Logical row count, spans included.
    pub fn row_count(&self) -> usize {
        self.matrix.row_count()
    }

    /// Logical column count.
    pub fn column_count(&self) -> usize {
        self.matrix.column_count()
    }

    pub fn selection(&self) -> SelectionRect {
        self.selection
    }

    /// Set the selection rectangle for the next command. Coordinates outside
    /// the grid snap to the nearest edge.
    pub fn set_selection(&mut self, rect: SelectionRect) {
        self.selection = rect.clamped(&self.matrix);
    }

    /// Apply a structural command against the current selection.
    ///
    /// Mutating commands rebuild the matrix before returning, so the table
    /// is always ready for the next read or command. Boundary no-ops leave
    /// the store, the cache, and the version untouched.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        let rect = self.selection.clamped(&self.matrix);
        let outcome = commands::dispatch(&mut self.grid, &self.matrix, cmd, rect);

        if outcome.dirty {
            self.matrix = Matrix::project(&self.grid);
            #[cfg(debug_assertions)]
            crate::matrix::invariants::check(&self.grid, &self.matrix);
            self.version += 1;
        }
        self.selection = outcome.selection.clamped(&self.matrix);

        Patch {
            new_selection: self.selection,
            dirty: outcome.dirty,
            version: self.version,
        }
    }

    pub fn version(&self) -> u64 {
        self.version
    }
}
