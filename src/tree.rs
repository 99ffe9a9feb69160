//! Persistent leftist tree ordered by an external oracle.
//!
//! A [`Tree`] is an immutable value. Operations that change the structure
//! return a new tree that shares every untouched subtree with the old one,
//! so cloning is O(1) and any earlier tree remains a valid snapshot.
//!
//! # Time Complexity
//!
//! | Operation | Oracle calls  | Work     |
//! |-----------|---------------|----------|
//! | `merge`   | O(log n)      | O(log n) |
//! | `insert`  | O(log n)      | O(n)     |
//! | `delete`  | O(log n)      | O(depth) |
//! | `rename`  | 0             | O(depth) |
//! | `get`     | 0             | O(depth) |
//!
//! `insert` spends O(n) only to report the new item's index.
//!
//! # Example
//!
//! ```rust
//! use comparison_heap::Tree;
//!
//! let mut by_length = |a: &str, b: &str| a.len() < b.len();
//! let (tree, _) = Tree::new().insert("medium", &mut by_length);
//! let (tree, index) = tree.insert("tiny", &mut by_length);
//! assert_eq!(index, 0);
//!
//! let (smaller, removed) = tree.delete(0, &mut by_length).unwrap();
//! assert_eq!(removed, "tiny");
//! assert_eq!(smaller.len(), 1);
//! assert_eq!(tree.len(), 2); // the old tree is untouched
//! ```

use std::fmt;
use std::rc::Rc;

use crate::display::{self, Row};
use crate::node::{normalize_key, InvariantViolation, Link, Node};
use crate::preorder::{self, Nodes, Preorder};
use crate::traits::{HeapError, Oracle, PreorderError};

/// A persistent height-biased leftist tree of string keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    root: Link,
}

impl Tree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self { root: None }
    }

    fn from_link(root: Link) -> Self {
        Self { root }
    }

    /// Rebuilds a tree from its pre-order token stream (see [`preorder`](crate::preorder)).
    pub fn from_preorder<I, S>(tokens: I) -> Result<Self, PreorderError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        preorder::build(tokens).map(Self::from_link)
    }

    /// Lazy pre-order token stream with `""` for each null child.
    pub fn to_preorder(&self) -> Preorder<'_> {
        Preorder::new(self.root())
    }

    /// Nodes in pre-order index order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes::new(self.root())
    }

    /// Keys in pre-order index order.
    pub fn keys(&self) -> impl Iterator<Item = &str> + '_ {
        self.nodes().map(Node::key)
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    pub fn len(&self) -> usize {
        self.root.as_ref().map_or(0, |root| root.size())
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns true iff the tree is non-empty and `index < len()`.
    pub fn is_valid_index(&self, index: usize) -> bool {
        index < self.len()
    }

    /// The highest-priority key.
    pub fn peek(&self) -> Option<&str> {
        self.root().map(Node::key)
    }

    /// Key at the given pre-order index.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.locate(index).map(Node::key)
    }

    /// Rows of the indexed text rendering, one per item.
    pub fn rows(&self) -> Vec<Row> {
        display::rows(self.root())
    }

    /// Checks the leftist, rank and size invariants of every node.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        self.root().map_or(Ok(()), Node::check_invariants)
    }

    /// Melds two trees, asking the oracle along both right spines.
    pub fn merge<O: Oracle>(&self, other: &Tree, oracle: &mut O) -> Tree {
        match (&self.root, &other.root) {
            (None, _) => other.clone(),
            (_, None) => self.clone(),
            (Some(x), Some(y)) => Self::from_link(Some(merge(x, y, oracle))),
        }
    }

    /// Inserts a key and returns the new tree with the key's pre-order index.
    ///
    /// An empty key is stored as [`BLANK_KEY`](crate::node::BLANK_KEY).
    pub fn insert<O: Oracle>(&self, key: &str, oracle: &mut O) -> (Tree, usize) {
        self.insert_rc(normalize_key(key), oracle)
    }

    fn insert_rc<O: Oracle>(&self, key: Rc<str>, oracle: &mut O) -> (Tree, usize) {
        let leaf = Node::leaf(Rc::clone(&key));
        let root = match &self.root {
            None => leaf,
            Some(root) => merge(root, &leaf, oracle),
        };
        let tree = Self::from_link(Some(root));
        // The key allocation is fresh, so pointer identity finds exactly the new node.
        let index = tree
            .nodes()
            .position(|node| node.holds_key(&key))
            .expect("inserted key is reachable from the new root");
        (tree, index)
    }

    /// Removes the item at `index`, returning the new tree and the removed key.
    ///
    /// The removed node's children are merged in its place.
    pub fn delete<O: Oracle>(
        &self,
        index: usize,
        oracle: &mut O,
    ) -> Result<(Tree, String), HeapError> {
        let root = self.checked_root(index)?;
        let (root, key) = delete_at(root, index, oracle);
        Ok((Self::from_link(root), key.to_string()))
    }

    /// Removes the item at `index` and inserts its key again, letting the
    /// oracle place it from scratch. Returns the new tree, the key and its new
    /// index.
    pub fn move_item<O: Oracle>(
        &self,
        index: usize,
        oracle: &mut O,
    ) -> Result<(Tree, String, usize), HeapError> {
        let root = self.checked_root(index)?;
        let (root, key) = delete_at(root, index, oracle);
        let (tree, new_index) = Self::from_link(root).insert_rc(Rc::from(&*key), oracle);
        Ok((tree, key.to_string(), new_index))
    }

    /// Replaces the key at `index` without consulting the oracle.
    ///
    /// The item keeps its position even if the new text would compare
    /// differently. Only the path to the item is copied.
    pub fn rename(&self, index: usize, key: &str) -> Result<Tree, HeapError> {
        let root = self.checked_root(index)?;
        Ok(Self::from_link(rename_at(root, index, normalize_key(key))))
    }

    fn checked_root(&self, index: usize) -> Result<&Rc<Node>, HeapError> {
        match &self.root {
            Some(root) if index < root.size() => Ok(root),
            _ => Err(HeapError::IndexOutOfRange {
                index,
                len: self.len(),
            }),
        }
    }

    /// Finds the node at a pre-order index using subtree sizes.
    fn locate(&self, index: usize) -> Option<&Node> {
        let mut node = self.root()?;
        if index >= node.size() {
            return None;
        }

        let mut current = 0;
        while current != index {
            let left_start = current + 1;
            let right_start = left_start + node.left_size();
            if index < right_start {
                node = node.left()?;
                current = left_start;
            } else {
                node = node.right()?;
                current = right_start;
            }
        }
        Some(node)
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

/// Merges two non-empty trees.
///
/// One oracle call decides which root wins; the loser is merged as a whole
/// into the winner's lower-rank child, which on a leftist tree is the right
/// one, so recursion only walks right spines.
fn merge<O: Oracle>(x: &Rc<Node>, y: &Rc<Node>, oracle: &mut O) -> Rc<Node> {
    let (winner, loser) = if oracle.is_higher(y.key(), x.key()) {
        (y, x)
    } else {
        (x, y)
    };

    let Some(right) = winner.right_link() else {
        return Node::build(
            winner.key_rc(),
            winner.left_link().clone(),
            Some(Rc::clone(loser)),
        );
    };

    match winner.left_link() {
        Some(left) if left.rank() < right.rank() => {
            let merged = merge(left, loser, oracle);
            Node::build(winner.key_rc(), Some(merged), Some(Rc::clone(right)))
        }
        left => {
            let merged = merge(right, loser, oracle);
            Node::build(winner.key_rc(), left.clone(), Some(merged))
        }
    }
}

/// Which child of a parent the path continues into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Side {
    Left,
    Right,
}

/// Walks from `root` to the node at pre-order index `target`, returning the
/// ancestors with the side taken at each, and the node itself.
///
/// The caller guarantees `target < root.size()`.
fn path_to(root: &Rc<Node>, target: usize) -> (Vec<(&Rc<Node>, Side)>, &Rc<Node>) {
    let mut path = Vec::new();
    let mut node = root;
    let mut current = 0;
    while current != target {
        let left_start = current + 1;
        let right_start = left_start + node.left_size();
        match (node.left_link(), node.right_link()) {
            (Some(left), _) if target < right_start => {
                path.push((node, Side::Left));
                node = left;
                current = left_start;
            }
            (_, Some(right)) => {
                path.push((node, Side::Right));
                node = right;
                current = right_start;
            }
            _ => unreachable!("index {target} lies outside the subtree at {current}"),
        }
    }
    (path, node)
}

/// Copies each ancestor on `path`, bottom-up, with the child on the path
/// replaced by `replacement`.
fn rebuild_path(path: Vec<(&Rc<Node>, Side)>, replacement: Link) -> Link {
    path.into_iter()
        .rev()
        .fold(replacement, |child, (parent, side)| {
            let node = match side {
                Side::Left => Node::build(parent.key_rc(), child, parent.right_link().clone()),
                Side::Right => Node::build(parent.key_rc(), parent.left_link().clone(), child),
            };
            Some(node)
        })
}

/// Deletes the node at `target`, merging its children in its place.
fn delete_at<O: Oracle>(root: &Rc<Node>, target: usize, oracle: &mut O) -> (Link, Rc<str>) {
    let (path, node) = path_to(root, target);
    let replacement = match (node.left_link(), node.right_link()) {
        (Some(left), Some(right)) => Some(merge(left, right, oracle)),
        (left, None) => left.clone(),
        (None, right) => right.clone(),
    };
    (rebuild_path(path, replacement), node.key_rc())
}

/// Copies the path to `target` with the key at `target` replaced.
fn rename_at(root: &Rc<Node>, target: usize, key: Rc<str>) -> Link {
    let (path, node) = path_to(root, target);
    rebuild_path(path, Some(node.with_key(key)))
}
