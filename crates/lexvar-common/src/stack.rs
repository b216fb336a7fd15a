//! On-demand stack growth for recursive tree walks.

use crate::limits::{STACK_RED_ZONE, STACK_SEGMENT_SIZE};

/// Run `f`, switching to a fresh stack segment first when less than
/// [`STACK_RED_ZONE`] bytes of the current one remain.
///
/// Wrap the body of every function that recurses once per tree level.
#[inline]
pub fn ensure_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(STACK_RED_ZONE, STACK_SEGMENT_SIZE, f)
}
