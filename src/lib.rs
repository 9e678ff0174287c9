//! An ordered binary search tree that works as a multiset: every inserted
//! value is kept, duplicates included, and traversal visits values in
//! ascending order.
//!
//! Each node carries a parent back-reference besides its two child links,
//! and every position in the tree is expressed as the full ancestor path
//! from the root down to the current node. Stepping to a neighboring value
//! is therefore cheap in both directions. The paths power [`Cursor`] and
//! [`CursorMut`], the bidirectional cursors, and [`Iter`], which plugs into
//! the standard iterator machinery.
//!
//! The ordering invariants are:
//!
//! 1. For every node, the values in its left subtree are strictly less than
//!    its own value.
//! 2. For every node, the values in its right subtree are greater than or
//!    equal to its own value. Equal values are deliberately routed right,
//!    which is how duplicates are kept.
//!
//! > Lookups stop at the first match on the way down, so with duplicates
//! > present [`Tree::find`] lands on the matching node closest to the root.
//!
//! # Examples
//!
//! ```
//! use bstree::Tree;
//!
//! let mut tree = Tree::new();
//! for value in [3, 1, 4, 1, 5] {
//!     tree.insert(value);
//! }
//!
//! assert_eq!(tree.len(), 5);
//! assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 1, 3, 4, 5]);
//!
//! // Values come back out through an exclusive cursor.
//! let mut cursor = tree.find_mut(&4);
//! assert_eq!(cursor.remove_current(), Ok(4));
//! ```
//!
//! # Removal and node identity
//!
//! Removing a value whose node has two children does not unlink that node.
//! The value of its in-order successor is moved into it and the successor's
//! node is freed instead. Cursors make this safe to observe: after
//! [`CursorMut::remove_current`] the cursor rests at the removed value's
//! in-order successor, whichever node object ends up holding it.
//!
//! # Sorting through the tree
//!
//! Inserting a sequence and reading it back off a forward traversal sorts
//! it, duplicates preserved:
//!
//! ```
//! use bstree::Tree;
//!
//! let mut values = [9, 2, 6, 2, 8];
//! let tree: Tree<i32> = values.iter().copied().collect();
//!
//! for (slot, sorted) in values.iter_mut().zip(tree.iter()) {
//!     *slot = *sorted;
//! }
//! assert_eq!(values, [2, 2, 6, 8, 9]);
//! ```

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod error;
mod iter;
mod node;
mod path;
mod tree;

#[cfg(test)]
mod test;

pub use error::{Error, Result};
pub use iter::{Cursor, CursorMut, Iter};
pub use tree::Tree;
