//! Centralized limits for tree walks.
//!
//! Program trees arrive from an editor or from a JSON document, so nothing
//! upstream guarantees they are acyclic. Upward walks (parent chains) are
//! bounded here; downward walks are bounded by the arena loader, which
//! rejects documents nested deeper than [`MAX_TREE_DEPTH`], and grow their
//! stack on demand.

/// Maximum number of ancestors visited when collecting the names in scope at
/// a block.
///
/// A well-formed tree never comes close; hitting the limit means a parent
/// link points back into the block's own subtree.
pub const MAX_PARENT_CHAIN_DEPTH: usize = 10_000;

/// Maximum nesting depth accepted when a program document is loaded into an
/// arena. Inputs and `next` links both count.
///
/// The loader, analyzer, free-variable computer and renamer recurse once per
/// nesting level; each recursive step goes through
/// [`crate::stack::ensure_stack`], so the depth bounds memory, not the
/// thread's stack.
pub const MAX_TREE_DEPTH: usize = 4_096;

/// Remaining stack below which a recursive walk moves to a new segment.
pub const STACK_RED_ZONE: usize = 128 * 1024;

/// Size of each stack segment allocated by a deep walk.
pub const STACK_SEGMENT_SIZE: usize = 2 * 1024 * 1024;
