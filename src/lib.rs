//! Comparison Heap: a to-do list ranked by pairwise choices
//!
//! This crate keeps a set of text items in priority order when the only way
//! to learn that order is to ask someone "which of these two matters more?".
//! Questions are expensive, so the items live in a persistent height-biased
//! leftist tree: inserting an item or removing one asks O(log n) questions,
//! and answers are remembered by the shape of the tree itself.
//!
//! # Features
//!
//! - **Oracle-driven ordering**: any [`Oracle`] (including a plain closure)
//!   decides priority; nothing is assumed about the keys
//! - **Pre-order addressing**: index 0 is the top item, the rest follow the
//!   rendered tree, see [`display`]
//! - **Persistent structure**: operations copy only the path they change, so
//!   snapshots are O(1)
//! - **Plain-text storage**: a pre-order token stream with blank lines for
//!   null children, see [`persist`]
//!
//! # Example
//!
//! ```rust
//! use comparison_heap::ComparisonHeap;
//!
//! let mut heap = ComparisonHeap::new(|a: &str, b: &str| a < b);
//! heap.insert("b: reply to email");
//! heap.insert("c: tidy desk");
//! heap.insert("a: pay rent");
//!
//! assert_eq!(heap.peek(), Some("a: pay rent"));
//! let (key, index) = heap.move_item(0).unwrap();
//! assert_eq!((key.as_str(), index), ("a: pay rent", 0));
//! ```

pub mod display;
pub mod heap;
pub mod node;
pub mod persist;
pub mod preorder;
pub mod rank;
pub mod traits;
pub mod tree;

// Re-export the main types for convenience
pub use display::Row;
pub use heap::ComparisonHeap;
pub use node::{InvariantViolation, Node, BLANK_KEY, LINE_BREAK_REPLACEMENT};
pub use preorder::{Preorder, NULL_TOKEN};
pub use traits::{CountingOracle, HeapError, Oracle, PreorderError};
pub use tree::Tree;
