//! Indexed, line-based rendering of the tree.
//!
//! Front-ends draw one row per item, in pre-order, so that the number at the
//! start of each row is exactly the index accepted by `delete`, `move_item`
//! and `rename`:
//!
//! ```text
//! 0╚╦write report
//! 1 ╠╦call bank
//! 2 ║╚═renew passport
//! 3 ╚═water plants
//! ```
//!
//! Colors and terminal handling belong to the front-end; a [`Row`] keeps the
//! index, the branch drawing and the key apart so they can be styled
//! separately.

use std::fmt;

use crate::node::Node;

const LAST_CHILD: char = '╚';
const MIDDLE_CHILD: char = '╠';
const CONTINUES: char = '║';
const LEAF: char = '═';
const BRANCH: char = '╦';

/// One rendered line of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    /// Pre-order index of the item on this line.
    pub index: usize,
    /// Width the index is right-aligned to, shared by every row of a rendering.
    pub width: usize,
    /// Box-drawing prefix connecting the item to its parent.
    pub branch: String,
    /// The item's key.
    pub key: String,
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:>width$}{}{}",
            self.index,
            self.branch,
            self.key,
            width = self.width
        )
    }
}

/// Renders the subtree rooted at `root`, one row per node.
pub(crate) fn rows(root: Option<&Node>) -> Vec<Row> {
    let Some(root) = root else {
        return Vec::new();
    };

    let width = index_width(root.size());
    let mut rows = Vec::with_capacity(root.size());
    // Pending subtrees with the prefix drawn so far and whether each is the
    // last child of its parent; the left child is pushed last so it is drawn first.
    let mut pending = vec![(root, String::new(), true)];

    while let Some((node, mut prefix, is_last_child)) = pending.pop() {
        let mut branch = prefix.clone();
        if is_last_child {
            branch.push(LAST_CHILD);
            prefix.push(' ');
        } else {
            branch.push(MIDDLE_CHILD);
            prefix.push(CONTINUES);
        }
        branch.push(if node.is_leaf() { LEAF } else { BRANCH });

        rows.push(Row {
            index: rows.len(),
            width,
            branch,
            key: node.key().to_owned(),
        });

        if let Some(right) = node.right() {
            pending.push((right, prefix.clone(), true));
        }
        if let Some(left) = node.left() {
            pending.push((left, prefix, node.right().is_none()));
        }
    }
    rows
}

/// Number of decimal digits in the largest index of a tree of `size` nodes.
fn index_width(size: usize) -> usize {
    size.saturating_sub(1)
        .checked_ilog10()
        .map_or(1, |digits| digits as usize + 1)
}
