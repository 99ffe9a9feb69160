//! Pre-order traversal and reconstruction.
//!
//! The pre-order token stream is both the persistence format and the basis
//! of positional addressing: a node's index is its position in the stream
//! once the null markers are skipped.
//!
//! Each node emits its key followed by the tokens of its left and right
//! subtrees; each null child emits [`NULL_TOKEN`]. A leaf therefore emits its
//! key and two trailing null tokens, and the empty tree is a single null
//! token.
//!
//! ```rust
//! use comparison_heap::Tree;
//!
//! let tree = Tree::from_preorder(["a", "b", "", "", ""]).unwrap();
//! let tokens: Vec<&str> = tree.to_preorder().collect();
//! assert_eq!(tokens, ["a", "b", "", "", ""]);
//! ```

use std::iter::FusedIterator;
use std::rc::Rc;

use crate::node::{Link, Node};
use crate::traits::PreorderError;

/// Token standing for a null child.
pub const NULL_TOKEN: &str = "";

/// Lazy pre-order token stream over a tree, null markers included.
///
/// Cloning the iterator saves its current position; asking the tree for a
/// new one starts again from the root.
#[derive(Debug, Clone)]
pub struct Preorder<'a> {
    stack: Vec<Option<&'a Node>>,
}

impl<'a> Preorder<'a> {
    pub(crate) fn new(root: Option<&'a Node>) -> Self {
        Self { stack: vec![root] }
    }
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        match self.stack.pop()? {
            None => Some(NULL_TOKEN),
            Some(node) => {
                self.stack.push(node.right());
                self.stack.push(node.left());
                Some(node.key())
            }
        }
    }
}

impl FusedIterator for Preorder<'_> {}

/// Pre-order iterator over the nodes themselves, skipping null children.
///
/// The n-th node yielded is the node at pre-order index n.
#[derive(Debug, Clone)]
pub struct Nodes<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Nodes<'a> {
    pub(crate) fn new(root: Option<&'a Node>) -> Self {
        Self {
            stack: root.into_iter().collect(),
        }
    }
}

impl<'a> Iterator for Nodes<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.right());
        self.stack.extend(node.left());
        Some(node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.stack.iter().map(|node| node.size()).sum();
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Nodes<'_> {}

impl FusedIterator for Nodes<'_> {}

/// Rebuilds a tree from a pre-order token stream.
///
/// Blank tokens after the tree is complete are ignored; anything else is an
/// error, as is a stream that runs out before every node has both children.
pub(crate) fn build<I, S>(tokens: I) -> Result<Link, PreorderError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tokens = tokens.into_iter();
    let mut consumed = 0;
    let root = build_subtree(&mut tokens, &mut consumed)?;

    for (offset, token) in tokens.enumerate() {
        let token = token.as_ref();
        if token != NULL_TOKEN {
            return Err(PreorderError::TrailingTokens {
                position: consumed + offset,
                token: token.to_owned(),
            });
        }
    }

    Ok(root)
}

/// Builds one complete subtree from the front of `tokens`.
///
/// Nodes whose children are still being read wait on `open`, each with its
/// left child once that is complete.
fn build_subtree<I, S>(tokens: &mut I, consumed: &mut usize) -> Result<Link, PreorderError>
where
    I: Iterator<Item = S>,
    S: AsRef<str>,
{
    let mut open: Vec<(Rc<str>, Option<Link>)> = Vec::new();

    'tokens: loop {
        let token = tokens
            .next()
            .ok_or(PreorderError::Truncated { consumed: *consumed })?;
        *consumed += 1;

        let token = token.as_ref();
        if token != NULL_TOKEN {
            open.push((Rc::from(token), None));
            continue;
        }

        let mut complete: Link = None;
        while let Some((key, left)) = open.pop() {
            match left {
                None => {
                    open.push((key, Some(complete)));
                    continue 'tokens;
                }
                Some(left) => complete = Some(Node::build(key, left, complete)),
            }
        }
        return Ok(complete);
    }
}
