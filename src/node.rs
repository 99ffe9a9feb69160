//! Nodes of the persistent leftist tree.
//!
//! A node is immutable once built. Every structural change rebuilds the
//! nodes on the path from the root to the change and shares everything else
//! through `Rc`, so an older root stays a valid view of the older heap.
//!
//! # Invariants
//!
//! For every node, with the rank of a null subtree taken as 0:
//! - `rank(left) >= rank(right)` (leftist property)
//! - `size = 1 + size(left) + size(right)`
//! - `rank = 1 + rank(right)` when both children exist, otherwise `rank = 1`
//! - a node never has a right child without a left child
//!
//! [`Node::build`] is the only way to make a node and derives `rank` and
//! `size` from the children it is given, so the invariants hold by
//! construction.

use std::rc::Rc;

use thiserror::Error;

use crate::preorder::{Nodes, Preorder};
use crate::rank::{checked_increment, Rank};

/// Placeholder stored in place of an empty key.
///
/// The empty string marks a null child in the pre-order stream, so a real
/// key may never be empty.
pub const BLANK_KEY: &str = " ";

/// Stored in place of each line break in a key, since saved heaps hold one
/// token per line.
pub const LINE_BREAK_REPLACEMENT: char = ' ';

pub(crate) type Link = Option<Rc<Node>>;

/// Node in a height-biased leftist tree.
///
/// Left spines can be as long as the tree, so equality, dropping and the
/// invariant check all walk with an explicit stack.
#[derive(Debug)]
pub struct Node {
    key: Rc<str>,
    left: Link,
    right: Link,
    rank: Rank,
    size: usize,
}

impl Node {
    /// Builds a node from a key and up to two children.
    ///
    /// The children may be given in either order: the one with the larger
    /// rank becomes the left child (ties keep the given order), and a lone
    /// child is always stored on the left.
    pub(crate) fn build(key: Rc<str>, a: Link, b: Link) -> Rc<Node> {
        let (left, right, rank, size) = match (a, b) {
            (Some(a), Some(b)) => {
                let (hi, lo) = if a.rank < b.rank { (b, a) } else { (a, b) };
                let rank = checked_increment(lo.rank);
                let size = 1 + hi.size + lo.size;
                (Some(hi), Some(lo), rank, size)
            }
            (Some(only), None) | (None, Some(only)) => {
                let size = 1 + only.size;
                (Some(only), None, 1, size)
            }
            (None, None) => (None, None, 1, 1),
        };
        Rc::new(Node {
            key,
            left,
            right,
            rank,
            size,
        })
    }

    /// Builds a childless node.
    pub(crate) fn leaf(key: Rc<str>) -> Rc<Node> {
        Self::build(key, None, None)
    }

    /// Copy of this node with a different key and the same children.
    pub(crate) fn with_key(&self, key: Rc<str>) -> Rc<Node> {
        Rc::new(Node {
            key,
            left: self.left.clone(),
            right: self.right.clone(),
            rank: self.rank,
            size: self.size,
        })
    }

    /// The item's display text.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Shared handle to the key, used to rebuild the node without copying text.
    pub(crate) fn key_rc(&self) -> Rc<str> {
        Rc::clone(&self.key)
    }

    /// Returns true if this node stores exactly the given key allocation.
    pub(crate) fn holds_key(&self, key: &Rc<str>) -> bool {
        Rc::ptr_eq(&self.key, key)
    }

    pub fn left(&self) -> Option<&Node> {
        self.left.as_deref()
    }

    pub fn right(&self) -> Option<&Node> {
        self.right.as_deref()
    }

    pub(crate) fn left_link(&self) -> &Link {
        &self.left
    }

    pub(crate) fn right_link(&self) -> &Link {
        &self.right
    }

    /// Null-path length: edges to the nearest descendant with fewer than two
    /// children, counted so that a leaf has rank 1.
    pub fn rank(&self) -> Rank {
        self.rank
    }

    /// Number of nodes in this subtree, including this one.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Size of the left subtree, 0 if absent.
    pub(crate) fn left_size(&self) -> usize {
        self.left.as_ref().map_or(0, |left| left.size)
    }

    /// Returns true if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.left.is_none()
    }

    /// Walks the whole subtree and reports the first broken invariant.
    pub fn check_invariants(&self) -> Result<(), InvariantViolation> {
        // Reversed pre-order reaches both subtrees before their parent, right
        // subtree first, so each node finds its children's sizes on top of
        // the stack with the left one uppermost.
        let nodes: Vec<&Node> = Nodes::new(Some(self)).collect();
        let mut sizes: Vec<usize> = Vec::new();
        for node in nodes.into_iter().rev() {
            let left_size = if node.left.is_some() { sizes.pop() } else { None };
            let right_size = if node.right.is_some() { sizes.pop() } else { None };
            sizes.push(node.check(left_size.unwrap_or(0), right_size.unwrap_or(0))?);
        }
        Ok(())
    }

    /// Checks this node alone, given the counted sizes of its subtrees.
    fn check(&self, left_size: usize, right_size: usize) -> Result<usize, InvariantViolation> {
        if self.key.is_empty() {
            return Err(InvariantViolation::EmptyKey);
        }

        let left_rank = self.left().map_or(0, Node::rank);
        let right_rank = self.right().map_or(0, Node::rank);
        if left_rank < right_rank {
            return Err(InvariantViolation::Leftist {
                key: self.key().to_owned(),
                left: left_rank,
                right: right_rank,
            });
        }

        let expected_rank = match (self.left(), self.right()) {
            (Some(_), Some(right)) => right.rank + 1,
            _ => 1,
        };
        if self.rank != expected_rank {
            return Err(InvariantViolation::Rank {
                key: self.key().to_owned(),
                recorded: self.rank,
                expected: expected_rank,
            });
        }

        let actual = 1 + left_size + right_size;
        if self.size != actual {
            return Err(InvariantViolation::Size {
                key: self.key().to_owned(),
                recorded: self.size,
                actual,
            });
        }

        Ok(actual)
    }
}

impl PartialEq for Node {
    /// Same keys in the same shape. Rank and size follow from the shape.
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self, other) || Preorder::new(Some(self)).eq(Preorder::new(Some(other)))
    }
}

impl Eq for Node {}

impl Drop for Node {
    fn drop(&mut self) {
        let mut orphans: Vec<Rc<Node>> = Vec::new();
        orphans.extend(self.left.take());
        orphans.extend(self.right.take());
        while let Some(child) = orphans.pop() {
            // Children still shared with another tree stay alive untouched.
            if let Ok(mut child) = Rc::try_unwrap(child) {
                orphans.extend(child.left.take());
                orphans.extend(child.right.take());
            }
        }
    }
}

/// A broken tree invariant, as found by [`Node::check_invariants`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("node {key:?} has left rank {left} below right rank {right}")]
    Leftist { key: String, left: Rank, right: Rank },
    #[error("node {key:?} records rank {recorded} but its children give {expected}")]
    Rank {
        key: String,
        recorded: Rank,
        expected: Rank,
    },
    #[error("node {key:?} records size {recorded} but its subtree holds {actual} nodes")]
    Size {
        key: String,
        recorded: usize,
        actual: usize,
    },
    #[error("a node has an empty key")]
    EmptyKey,
}

/// Turns user text into a stored key.
///
/// An empty key becomes [`BLANK_KEY`]. Each line break (`\r\n`, `\n` or a
/// lone `\r`) becomes one [`LINE_BREAK_REPLACEMENT`].
pub(crate) fn normalize_key(key: &str) -> Rc<str> {
    if key.is_empty() {
        return Rc::from(BLANK_KEY);
    }
    if !key.contains(['\n', '\r']) {
        return Rc::from(key);
    }
    let single_line: String = key
        .replace("\r\n", "\n")
        .chars()
        .map(|c| match c {
            '\n' | '\r' => LINE_BREAK_REPLACEMENT,
            c => c,
        })
        .collect();
    Rc::from(single_line)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(key: &str) -> Rc<Node> {
        Node::leaf(Rc::from(key))
    }

    #[test]
    fn test_leaf() {
        let node = leaf("a");
        assert_eq!(node.rank(), 1);
        assert_eq!(node.size(), 1);
        assert!(node.is_leaf());
        assert!(node.check_invariants().is_ok());
    }

    #[test]
    fn test_single_child_goes_left() {
        let node = Node::build(Rc::from("a"), None, Some(leaf("b")));
        assert_eq!(node.left().map(Node::key), Some("b"));
        assert!(node.right().is_none());
        assert_eq!(node.rank(), 1);
        assert_eq!(node.size(), 2);
    }

    #[test]
    fn test_children_sorted_by_rank() {
        let deep = Node::build(Rc::from("b"), Some(leaf("c")), Some(leaf("d")));
        assert_eq!(deep.rank(), 2);

        let node = Node::build(Rc::from("a"), Some(leaf("e")), Some(Rc::clone(&deep)));
        assert_eq!(node.left().map(Node::key), Some("b"));
        assert_eq!(node.right().map(Node::key), Some("e"));
        assert_eq!(node.rank(), 2);
        assert_eq!(node.size(), 5);
        assert!(node.check_invariants().is_ok());
    }

    #[test]
    fn test_equal_ranks_keep_order() {
        let node = Node::build(Rc::from("a"), Some(leaf("b")), Some(leaf("c")));
        assert_eq!(node.left().map(Node::key), Some("b"));
        assert_eq!(node.right().map(Node::key), Some("c"));
    }

    #[test]
    fn test_with_key_keeps_shape() {
        let node = Node::build(Rc::from("a"), Some(leaf("b")), Some(leaf("c")));
        let renamed = node.with_key(Rc::from("z"));
        assert_eq!(renamed.key(), "z");
        assert_eq!(renamed.rank(), node.rank());
        assert_eq!(renamed.size(), node.size());
        assert!(Rc::ptr_eq(
            renamed.left_link().as_ref().unwrap(),
            node.left_link().as_ref().unwrap()
        ));
    }

    #[test]
    fn test_check_detects_leftist_violation() {
        let bad = Node {
            key: Rc::from("a"),
            left: None,
            right: Some(leaf("b")),
            rank: 1,
            size: 2,
        };
        assert!(matches!(
            bad.check_invariants(),
            Err(InvariantViolation::Leftist { left: 0, right: 1, .. })
        ));
    }

    #[test]
    fn test_check_detects_bad_size() {
        let bad = Node {
            key: Rc::from("a"),
            left: Some(leaf("b")),
            right: None,
            rank: 1,
            size: 3,
        };
        assert!(matches!(
            bad.check_invariants(),
            Err(InvariantViolation::Size { recorded: 3, actual: 2, .. })
        ));
    }

    #[test]
    fn test_normalize_key() {
        assert_eq!(&*normalize_key(""), BLANK_KEY);
        assert_eq!(&*normalize_key("task"), "task");
    }

    #[test]
    fn test_normalize_key_replaces_line_breaks() {
        assert_eq!(&*normalize_key("line1\nline2"), "line1 line2");
        assert_eq!(&*normalize_key("line1\r\nline2"), "line1 line2");
        assert_eq!(&*normalize_key("trailing\r"), "trailing ");
        assert_eq!(&*normalize_key("\n"), " ");
    }

    /// Left-leaning chain of `depth` nodes.
    fn chain(depth: usize) -> Rc<Node> {
        let mut node = leaf("0");
        for i in 1..depth {
            node = Node::build(Rc::from(i.to_string()), Some(node), None);
        }
        node
    }

    #[test]
    fn test_deep_chain_checks_compares_and_drops() {
        let a = chain(200_000);
        let b = chain(200_000);
        assert_eq!(a.size(), 200_000);
        assert!(a.check_invariants().is_ok());
        assert_eq!(a, b);
        drop(a);
        drop(b);
    }

    #[test]
    fn test_drop_keeps_shared_children() {
        let shared = chain(10);
        let parent = Node::build(Rc::from("p"), Some(Rc::clone(&shared)), None);
        drop(parent);
        assert_eq!(shared.size(), 10);
        assert!(shared.check_invariants().is_ok());
    }

    #[test]
    fn test_equality_compares_shape() {
        let left = Node::build(Rc::from("a"), Some(leaf("b")), None);
        let other = Node::build(Rc::from("a"), Some(leaf("c")), None);
        assert_eq!(left, Node::build(Rc::from("a"), Some(leaf("b")), None));
        assert_ne!(left, other);
        assert_ne!(left, leaf("a"));
    }
}
