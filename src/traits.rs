//! The comparison oracle and the error types shared by the heap.
//!
//! The heap has no built-in notion of order. Every ordering decision is
//! delegated to an [`Oracle`], which is typically a person answering
//! "which of these two is more important?". Oracles are expensive, so the
//! engine asks as few questions as the leftist structure allows and never
//! repeats a pair within one merge.

use std::io;

use thiserror::Error;

/// Decides relative priority between two keys.
///
/// `is_higher(a, b)` returns `true` when `a` should come before `b`.
/// The engine assumes answers are consistent for the duration of a single
/// operation; it neither caches nor double-checks them.
///
/// Any `FnMut(&str, &str) -> bool` is an oracle:
///
/// ```rust
/// use comparison_heap::ComparisonHeap;
///
/// let mut heap = ComparisonHeap::new(|a: &str, b: &str| a < b);
/// heap.insert("write tests");
/// heap.insert("buy milk");
/// assert_eq!(heap.peek(), Some("buy milk"));
/// ```
pub trait Oracle {
    /// Returns true if `a` has a higher priority than `b`.
    fn is_higher(&mut self, a: &str, b: &str) -> bool;
}

impl<F> Oracle for F
where
    F: FnMut(&str, &str) -> bool,
{
    fn is_higher(&mut self, a: &str, b: &str) -> bool {
        self(a, b)
    }
}

/// Oracle wrapper that counts how many questions were asked.
///
/// Used to check the `O(log n)` comparison bound of merges, and handy for
/// front-ends that want to report how much effort an insert took.
#[derive(Debug, Clone, Default)]
pub struct CountingOracle<O> {
    inner: O,
    calls: usize,
}

impl<O: Oracle> CountingOracle<O> {
    /// Wraps `inner` with a zeroed counter.
    pub fn new(inner: O) -> Self {
        Self { inner, calls: 0 }
    }

    /// Number of comparisons answered since construction or the last reset.
    pub fn calls(&self) -> usize {
        self.calls
    }

    /// Resets the counter to zero and returns its previous value.
    pub fn reset(&mut self) -> usize {
        std::mem::take(&mut self.calls)
    }

    /// Unwraps the inner oracle.
    pub fn into_inner(self) -> O {
        self.inner
    }
}

impl<O: Oracle> Oracle for CountingOracle<O> {
    fn is_higher(&mut self, a: &str, b: &str) -> bool {
        self.calls += 1;
        let answer = self.inner.is_higher(a, b);
        tracing::trace!(a, b, answer, calls = self.calls, "oracle consulted");
        answer
    }
}

/// Error type for index-addressed heap operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum HeapError {
    /// The pre-order index does not name an item; `len == 0` means the heap is empty.
    #[error("index {index} is out of range for a heap of {len} items")]
    IndexOutOfRange {
        /// The rejected index
        index: usize,
        /// Number of items in the heap at the time of the call
        len: usize,
    },
}

/// Error type for rebuilding a heap from its pre-order token stream.
#[derive(Debug, Error)]
pub enum PreorderError {
    /// The stream ended before every node received both of its child tokens.
    #[error("pre-order stream ended after {consumed} tokens with the tree incomplete")]
    Truncated {
        /// Tokens read before the stream ran out
        consumed: usize,
    },
    /// A non-blank token followed the complete tree.
    #[error("unexpected token {token:?} after the end of the tree at position {position}")]
    TrailingTokens {
        /// Zero-based position of the offending token
        position: usize,
        /// The offending token
        token: String,
    },
    /// The underlying reader failed.
    #[error("failed to read pre-order stream")]
    Io(#[from] io::Error),
}
