use crate::editing::SelectionRect;

/// Result of applying a structural command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Patch {
    /// Selection after the command, shifted to track the mutation.
    pub new_selection: SelectionRect,
    /// Whether the grid store changed; tells the renderer to re-derive its
    /// layout. Boundary no-ops leave this false.
    pub dirty: bool,
    pub version: u64,
}
