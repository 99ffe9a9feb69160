//! Reading and writing heaps as newline-delimited pre-order text.
//!
//! One token per line, each followed by `\n`; a blank line is a null child.
//! A saved empty heap is a single blank line. A file with no lines at all is
//! also read as an empty heap so that a freshly created file can be opened.
//!
//! ```text
//! write report
//! call bank
//! renew passport
//!
//!
//!
//! water plants
//!
//!
//! ```

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use crate::traits::PreorderError;
use crate::tree::Tree;

/// Reads a tree from a pre-order text stream.
///
/// # Errors
///
/// Returns [`PreorderError::Truncated`] if the stream ends before the tree is
/// complete, [`PreorderError::TrailingTokens`] if an item follows a complete
/// tree, or [`PreorderError::Io`] if reading fails.
pub fn read_tree<R: BufRead>(reader: R) -> Result<Tree, PreorderError> {
    let lines = reader.lines().collect::<io::Result<Vec<String>>>()?;
    if lines.is_empty() {
        return Ok(Tree::new());
    }
    Tree::from_preorder(lines)
}

/// Writes a tree as pre-order text, one token per line.
///
/// # Errors
///
/// Returns [`io::ErrorKind::InvalidInput`] if a key contains a line break,
/// which can only happen for a tree built with
/// [`Tree::from_preorder`]; keys added through `insert` and `rename` never
/// do. Tokens before the offending key may already have been written.
pub fn write_tree<W: Write>(tree: &Tree, mut writer: W) -> io::Result<()> {
    for token in tree.to_preorder() {
        if token.contains(['\n', '\r']) {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("key {token:?} spans more than one line"),
            ));
        }
        writeln!(writer, "{token}")?;
    }
    writer.flush()
}

/// Loads a tree from a file.
pub fn load(path: impl AsRef<Path>) -> Result<Tree, PreorderError> {
    let file = File::open(path)?;
    read_tree(BufReader::new(file))
}

/// Saves a tree to a file, replacing any previous contents.
pub fn save(tree: &Tree, path: impl AsRef<Path>) -> io::Result<()> {
    let file = File::create(path)?;
    write_tree(tree, BufWriter::new(file))
}
