//! Rank (null-path length) type for leftist heap nodes.
//!
//! # Why u8?
//!
//! A node of rank `r` sits on top of a complete binary tree of depth `r - 1`,
//! so its subtree holds at least `2ʳ - 1` nodes. The rank of any node is
//! therefore bounded by `log₂(size + 1)`:
//! - 2⁶⁴ items → max rank 64
//! - 2²⁵⁵ items → max rank 255
//!
//! `u8` covers every tree that could fit in memory, and keeps the per-node
//! bookkeeping next to `size` without padding up to a second word.
//!
//! # Runtime Checks
//!
//! [`checked_increment`] panics if the theoretical limit is exceeded, which
//! would indicate a bug in node construction rather than a large heap.

/// Type alias for a node's null-path length.
///
/// A null subtree has rank 0; every real node has rank at least 1.
pub type Rank = u8;

/// Maximum valid rank value.
pub const MAX_RANK: Rank = u8::MAX;

/// Safely increment a rank value, panicking on overflow.
///
/// # Panics
///
/// Panics if `rank == MAX_RANK`. This cannot happen for a tree whose ranks
/// are derived from its children, since it would require more than 2²⁵⁵
/// items.
///
/// # Example
///
/// ```rust
/// use comparison_heap::rank::{checked_increment, Rank};
///
/// let rank: Rank = 5;
/// assert_eq!(checked_increment(rank), 6);
/// ```
#[inline]
pub fn checked_increment(rank: Rank) -> Rank {
    rank.checked_add(1).expect(
        "rank overflow: this should be impossible since rank is at most \
         log₂(size + 1) and u8::MAX (255) covers trees of 2²⁵⁵ items",
    )
}

/// Upper bound on the rank of a subtree holding `size` nodes.
///
/// Used by tests and instrumentation to check the right-spine bound that
/// keeps merges at `O(log n)` oracle calls.
#[inline]
pub fn rank_bound(size: usize) -> Rank {
    // floor(log2(size + 1)), computed without floats
    let bits = usize::BITS - (size.saturating_add(1)).leading_zeros() - 1;
    bits as Rank
}
