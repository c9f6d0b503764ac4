/*!
 * # Structural table editing
 *
 * This module is the write side of the engine. The architecture splits
 * cleanly into:
 *
 * ### 1. Single source of truth: the grid store
 * - The table lives in one [`Grid`](crate::model::Grid): ordered rows of
 *   anchor cells plus the cell arena.
 * - Only the commands in this module mutate it; readers go through the
 *   projected [`Matrix`](crate::matrix::Matrix).
 *
 * ### 2. Command-based editing
 * - Every structural edit is a variant of the [`Cmd`] enum, applied
 *   through [`Table::apply`], which returns a [`Patch`] describing the new
 *   selection and whether the store changed.
 * - Commands read the matrix captured before the mutation and splice the
 *   store through cell ids, so a spanning cell can be adjusted from any of
 *   its projected positions exactly once.
 *
 * ### 3. Read API: rebuilt projections
 * - The matrix is a cache over an immutable snapshot of the store. After a
 *   mutating command it is discarded and rebuilt in full; a matrix captured
 *   before a mutation must never be used to issue another command.
 *
 * ### 4. Selection normalization
 * - [`SelectionRect`] carries two arbitrary corners. Merge and split first
 *   grow the rectangle until it no longer slices through any spanning cell;
 *   insert and delete work off the raw bounding box.
 *
 * Everything here is single-threaded and synchronous: the surrounding editor
 * session owns the table exclusively, and every command is atomic over the
 * store.
 */

pub mod commands;
pub mod patch;
pub mod selection;
pub mod table;

pub use commands::Cmd;
pub use patch::Patch;
pub use selection::SelectionRect;
pub use table::Table;
