pub mod cell;
pub mod grid;

pub use cell::{Cell, CellId, CellSpec, ContentHandle};
pub use grid::{Grid, GridError, Row};
