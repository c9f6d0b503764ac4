pub mod editing;
pub mod matrix;
pub mod model;

// Re-export key types for easier usage
pub use editing::{Cmd, Patch, SelectionRect, Table};
pub use matrix::{GridPosition, Matrix};
pub use model::{Cell, CellId, CellSpec, ContentHandle, Grid, GridError, Row};
