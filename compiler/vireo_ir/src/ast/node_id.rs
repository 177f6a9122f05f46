//! Node IDs and ranges for the flat AST.
//!
//! Cross-node links are `u32` indices into the [`NodeArena`] rather than
//! pointers, so a speculative or background sub-parse can be discarded (or
//! spliced) without dangling references.
//!
//! [`NodeArena`]: crate::NodeArena

use std::fmt;

/// Index into the node arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct NodeId(u32);

impl NodeId {
    /// Invalid node ID (sentinel value).
    pub const INVALID: NodeId = NodeId(u32::MAX);

    /// Create a new `NodeId`.
    #[inline]
    pub const fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Get the index into the arena.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this is a valid ID.
    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "NodeId({})", self.0)
        } else {
            write!(f, "NodeId::INVALID")
        }
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::INVALID
    }
}

/// Range of node IDs in the arena's flattened list storage.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(C)]
pub struct NodeRange {
    pub start: u32,
    pub len: u32,
}

impl NodeRange {
    /// Empty range.
    pub const EMPTY: NodeRange = NodeRange { start: 0, len: 0 };

    /// Create a new range.
    #[inline]
    pub const fn new(start: u32, len: u32) -> Self {
        NodeRange { start, len }
    }

    /// Number of nodes in the range.
    #[inline]
    pub const fn len(&self) -> usize {
        self.len as usize
    }

    /// Check if the range is empty.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }
}

impl fmt::Debug for NodeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeRange({}+{})", self.start, self.len)
    }
}

impl Default for NodeRange {
    fn default() -> Self {
        Self::EMPTY
    }
}

/// Index into the arena's function side table.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct FuncId(u32);

impl FuncId {
    /// Invalid function ID (sentinel value).
    pub const INVALID: FuncId = FuncId(u32::MAX);

    #[inline]
    pub const fn new(index: u32) -> Self {
        FuncId(index)
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub const fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }
}

impl fmt::Debug for FuncId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "FuncId({})", self.0)
        } else {
            write!(f, "FuncId::INVALID")
        }
    }
}

impl Default for FuncId {
    fn default() -> Self {
        Self::INVALID
    }
}
