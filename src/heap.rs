//! The comparison heap engine.
//!
//! [`ComparisonHeap`] owns the current [`Tree`] and the [`Oracle`] that
//! orders it. Every structural operation builds a new tree from the old one
//! and rebinds the root, so [`snapshot`](ComparisonHeap::snapshot) is free
//! and a snapshot can later be put back with
//! [`restore`](ComparisonHeap::restore).
//!
//! Items are addressed by pre-order index: index 0 is always the current
//! highest-priority item, and the rest follow the order of
//! [`rows`](ComparisonHeap::rows). Indices shift after any insert, delete or
//! move, so callers should re-read them before reuse.
//!
//! # Example
//!
//! ```rust
//! use comparison_heap::ComparisonHeap;
//!
//! // Stand-in for a person: shorter tasks first.
//! let mut heap = ComparisonHeap::new(|a: &str, b: &str| a.len() < b.len());
//! heap.insert("file taxes");
//! heap.insert("nap");
//! assert_eq!(heap.peek(), Some("nap"));
//!
//! heap.rename(0, "long nap").unwrap();
//! assert_eq!(heap.peek(), Some("long nap"));
//!
//! assert_eq!(heap.delete(0).unwrap(), "long nap");
//! assert_eq!(heap.len(), 1);
//! ```

use tracing::debug;

use crate::display::Row;
use crate::preorder::Preorder;
use crate::traits::{HeapError, Oracle, PreorderError};
use crate::tree::Tree;

/// A to-do heap ordered by an injected oracle.
#[derive(Debug, Clone)]
pub struct ComparisonHeap<O> {
    tree: Tree,
    oracle: O,
}

impl<O: Oracle> ComparisonHeap<O> {
    /// Creates an empty heap.
    pub fn new(oracle: O) -> Self {
        Self::with_tree(Tree::new(), oracle)
    }

    /// Creates a heap over an existing tree, e.g. one loaded from disk.
    pub fn with_tree(tree: Tree, oracle: O) -> Self {
        Self { tree, oracle }
    }

    /// Rebuilds a heap from a pre-order token stream.
    pub fn from_preorder<I, S>(tokens: I, oracle: O) -> Result<Self, PreorderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(Self::with_tree(Tree::from_preorder(tokens)?, oracle))
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns true iff an item exists at `index`.
    pub fn is_valid_index(&self, index: usize) -> bool {
        self.tree.is_valid_index(index)
    }

    /// The highest-priority item.
    pub fn peek(&self) -> Option<&str> {
        self.tree.peek()
    }

    /// The item at `index`.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.tree.get(index)
    }

    /// Inserts an item and returns its pre-order index.
    ///
    /// Asks the oracle O(log n) times. An empty key is stored as a single
    /// space.
    pub fn insert(&mut self, key: &str) -> usize {
        let (tree, index) = self.tree.insert(key, &mut self.oracle);
        self.tree = tree;
        debug!(key, index, len = self.tree.len(), "inserted item");
        index
    }

    /// Deletes the item at `index` and returns its key.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::IndexOutOfRange`] if `index >= len()`; the heap is
    /// left unchanged.
    pub fn delete(&mut self, index: usize) -> Result<String, HeapError> {
        let (tree, key) = self.tree.delete(index, &mut self.oracle)?;
        self.tree = tree;
        debug!(key = %key, index, len = self.tree.len(), "deleted item");
        Ok(key)
    }

    /// Deletes the item at `index` and inserts it again, so the oracle ranks
    /// it afresh. Returns the key and its new index.
    ///
    /// Earlier answers involving this item are forgotten: the tree is the
    /// only record of past comparisons.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::IndexOutOfRange`] if `index >= len()`; the heap is
    /// left unchanged.
    pub fn move_item(&mut self, index: usize) -> Result<(String, usize), HeapError> {
        let (tree, key, new_index) = self.tree.move_item(index, &mut self.oracle)?;
        self.tree = tree;
        debug!(key = %key, from = index, to = new_index, "moved item");
        Ok((key, new_index))
    }

    /// Changes the text of the item at `index` without moving it.
    ///
    /// # Errors
    ///
    /// Returns [`HeapError::IndexOutOfRange`] if `index >= len()`; the heap is
    /// left unchanged.
    pub fn rename(&mut self, index: usize, key: &str) -> Result<(), HeapError> {
        self.tree = self.tree.rename(index, key)?;
        debug!(key, index, "renamed item");
        Ok(())
    }

    /// Melds every item of `other` into this heap.
    pub fn merge(&mut self, other: &Tree) {
        self.tree = self.tree.merge(other, &mut self.oracle);
        debug!(added = other.len(), len = self.tree.len(), "merged heaps");
    }

    /// The current tree.
    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    /// An O(1) copy of the current state that later operations cannot alter.
    pub fn snapshot(&self) -> Tree {
        self.tree.clone()
    }

    /// Replaces the current tree, returning the one it replaced.
    pub fn restore(&mut self, tree: Tree) -> Tree {
        std::mem::replace(&mut self.tree, tree)
    }

    /// Lazy pre-order token stream, `""` marking null children.
    pub fn to_preorder(&self) -> Preorder<'_> {
        self.tree.to_preorder()
    }

    /// Rows of the indexed text rendering.
    pub fn rows(&self) -> Vec<Row> {
        self.tree.rows()
    }

    pub fn oracle(&self) -> &O {
        &self.oracle
    }

    pub fn oracle_mut(&mut self) -> &mut O {
        &mut self.oracle
    }

    /// Splits the heap into its tree and oracle.
    pub fn into_parts(self) -> (Tree, O) {
        (self.tree, self.oracle)
    }
}
