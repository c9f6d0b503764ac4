use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque per-cell payload owned by the surrounding document model.
///
/// The engine creates a fresh handle for every cell it materializes and
/// discards the handle of every cell it destroys, but never inspects what
/// the handle refers to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHandle(Uuid);

impl ContentHandle {
    /// Allocate a handle for a brand-new empty cell payload.
    pub fn fresh() -> Self {
        Self(Uuid::new_v4())
    }
}

/// Stable identifier for a cell in the grid's arena.
///
/// Matrix positions alias cells through ids rather than references, so the
/// edit commands can adjust a spanning cell from any of its projected
/// positions without aliased-mutation hazards.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CellId(pub(crate) u32);

/// An anchor cell: its row/column spans plus the opaque content payload.
///
/// A cell is owned by exactly one row (the row its top-left corner lies in);
/// every other grid coordinate it covers exists only as a projection in the
/// matrix.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cell {
    /// Number of logical grid rows this cell occupies, always >= 1.
    pub rowspan: usize,
    /// Number of logical grid columns this cell occupies, always >= 1.
    pub colspan: usize,
    /// Payload handle, created and discarded here but never read.
    pub content: ContentHandle,
}

impl Cell {
    /// A plain 1x1 cell wrapping the given content.
    pub fn new(content: ContentHandle) -> Self {
        Self {
            rowspan: 1,
            colspan: 1,
            content,
        }
    }
}

/// At-rest form of a cell: what an external parser hands us when importing
/// existing tabular markup, and what an external renderer reads back to emit
/// `<td rowspan=.. colspan=..>` markup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSpec {
    pub rowspan: usize,
    pub colspan: usize,
    pub content: ContentHandle,
}

impl CellSpec {
    /// A 1x1 cell with freshly allocated content.
    pub fn plain() -> Self {
        Self::spanned(1, 1)
    }

    /// A spanning cell with freshly allocated content.
    pub fn spanned(rowspan: usize, colspan: usize) -> Self {
        Self {
            rowspan,
            colspan,
            content: ContentHandle::fresh(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_handles_are_distinct() {
        let a = ContentHandle::fresh();
        let b = ContentHandle::fresh();
        assert_ne!(a, b);
    }

    #[test]
    fn test_new_cell_is_one_by_one() {
        let cell = Cell::new(ContentHandle::fresh());
        assert_eq!(cell.rowspan, 1);
        assert_eq!(cell.colspan, 1);
    }
}
