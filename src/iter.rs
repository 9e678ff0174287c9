//! Cursors and iterators over a [`Tree`].

use std::fmt;
use std::iter::FusedIterator;
use std::marker::PhantomData;

use crate::error::{Error, Result};
use crate::path::NodePath;
use crate::tree::Tree;

/// A read-only position in a [`Tree`].
///
/// A cursor records the full ancestor path from the root to its current
/// node, so stepping to a neighbor never re-descends from the root. The
/// shared borrow it holds keeps the tree unchanged for the cursor's whole
/// lifetime; a cursor can never dangle.
///
/// Obtained from [`Tree::first`], [`Tree::last`], and [`Tree::find`].
pub struct Cursor<'a, T> {
    tree: &'a Tree<T>,
    path: NodePath<T>,
}

/// An exclusive position in a [`Tree`], and the only way to remove values.
///
/// Steps and reads like [`Cursor`]; additionally supports
/// [`CursorMut::remove_current`]. The exclusive borrow means nothing else
/// can observe or mutate the tree while the cursor exists, which is what
/// keeps removal through it sound.
///
/// Obtained from [`Tree::first_mut`], [`Tree::last_mut`], and
/// [`Tree::find_mut`].
pub struct CursorMut<'a, T> {
    tree: &'a mut Tree<T>,
    path: NodePath<T>,
}

macro_rules! cursor_impl {
    ($cursor:ident) => {
        impl<'a, T> $cursor<'a, T> {
            /// The value at the cursor position.
            ///
            /// # Errors
            ///
            /// [`Error::ExhaustedCursor`] when the cursor is at the end
            /// position and names no value.
            pub fn value(&self) -> Result<&T> {
                let node = self.path.current().ok_or(Error::ExhaustedCursor)?;
                // SAFETY: the node is live and unmutated for as long as
                // this cursor borrows the tree.
                Ok(unsafe { &(*node.as_ptr()).value })
            }

            /// Steps to the in-order successor and returns the value there,
            /// or `None` once the cursor reaches the end.
            ///
            /// The end position absorbs every further step in either
            /// direction.
            pub fn move_next<'b>(&'b mut self) -> Option<&'b T> {
                // SAFETY: the path's nodes are live and in sync with the
                // tree for as long as this cursor borrows it.
                unsafe { self.path.step_forward() };
                self.value().ok()
            }

            /// Steps to the in-order predecessor and returns the value
            /// there, or `None` once the cursor reaches the end.
            ///
            /// The end absorbs steps rather than wrapping around, so
            /// backward traversal starts from [`Tree::last`], not from an
            /// exhausted forward cursor.
            pub fn move_prev<'b>(&'b mut self) -> Option<&'b T> {
                // SAFETY: the path's nodes are live and in sync with the
                // tree for as long as this cursor borrows it.
                unsafe { self.path.step_backward() };
                self.value().ok()
            }

            /// Whether the cursor is at the end position.
            pub fn is_end(&self) -> bool {
                self.path.is_end()
            }

            /// The tree this cursor walks.
            pub fn tree(&self) -> &Tree<T> {
                self.tree
            }
        }
    };
}

cursor_impl! {Cursor}
cursor_impl! {CursorMut}

// Cloning snapshots the whole ancestor path; the copies step independently.
impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree,
            path: self.path.clone(),
        }
    }
}

impl<T> fmt::Debug for Cursor<'_, T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value() {
            Ok(value) => f.debug_tuple("Cursor").field(value).finish(),
            Err(_) => f.write_str("Cursor(end)"),
        }
    }
}

/// Cursors compare equal when they sit on the same node. The ancestor
/// history below the current node does not participate, and all exhausted
/// cursors are equal to each other.
impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        self.path.same_position(&other.path)
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<'a, T> CursorMut<'a, T> {
    /// Removes the value at the cursor and hands it back.
    ///
    /// The cursor ends up at the removed value's in-order successor, so
    /// repeated calls drain the tree in ascending order. When the removed
    /// node had two children, the successor's value is moved into the node
    /// the cursor already names and the successor's own node is freed
    /// instead; the cursor keeps pointing at the same node object with its
    /// new value.
    ///
    /// # Errors
    ///
    /// [`Error::RemoveAtEnd`] when the cursor is at the end position.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let mut tree: Tree<i32> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
    /// let mut cursor = tree.find_mut(&5);
    ///
    /// assert_eq!(cursor.remove_current(), Ok(5));
    /// // The cursor rests at the removed value's successor.
    /// assert_eq!(cursor.value(), Ok(&7));
    ///
    /// drop(cursor);
    /// let remaining: Vec<i32> = tree.iter().copied().collect();
    /// assert_eq!(remaining, [1, 3, 4, 7, 8, 9]);
    /// ```
    pub fn remove_current(&mut self) -> Result<T> {
        // SAFETY: the path was built from this tree, and the exclusive
        // borrow means every structural change since then went through this
        // cursor, which kept the path in sync.
        unsafe { self.tree.remove_at(&mut self.path) }
    }
}

/// A double-ended iterator over the values of a [`Tree`] in ascending
/// order.
///
/// Two paths walk toward each other, one from the smallest value and one
/// from the largest, and stop once they meet, so each value is yielded
/// exactly once no matter how calls to the two ends are interleaved.
///
/// Obtained from [`Tree::iter`].
pub struct Iter<'a, T> {
    fwd: NodePath<T>,
    bwd: NodePath<T>,
    done: bool,
    tree: PhantomData<&'a Tree<T>>,
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            fwd: self.fwd.clone(),
            bwd: self.bwd.clone(),
            done: self.done,
            tree: PhantomData,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.fwd.current()?;
        if self.fwd.same_position(&self.bwd) {
            // Met the back path: this is the last unyielded value.
            self.done = true;
        } else {
            // SAFETY: the path's nodes are live for the tree borrow held by
            // this iterator.
            unsafe { self.fwd.step_forward() };
        }
        // SAFETY: the tree is borrowed shared for 'a, so the node outlives
        // the returned reference and cannot be mutated under it.
        Some(unsafe { &(*current.as_ptr()).value })
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let current = self.bwd.current()?;
        if self.bwd.same_position(&self.fwd) {
            self.done = true;
        } else {
            // SAFETY: the path's nodes are live for the tree borrow held by
            // this iterator.
            unsafe { self.bwd.step_backward() };
        }
        // SAFETY: as in `next`.
        Some(unsafe { &(*current.as_ptr()).value })
    }
}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> Tree<T> {
    /// A cursor at the smallest value, or the end cursor for an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let tree: Tree<i32> = [2, 1, 3].into_iter().collect();
    /// let mut cursor = tree.first();
    ///
    /// assert_eq!(cursor.value(), Ok(&1));
    /// assert_eq!(cursor.move_next(), Some(&2));
    /// ```
    pub fn first(&self) -> Cursor<'_, T> {
        let path = self.min_path();
        Cursor { tree: self, path }
    }

    /// A cursor at the largest value, or the end cursor for an empty tree.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let tree: Tree<i32> = [2, 1, 3].into_iter().collect();
    /// let mut cursor = tree.last();
    ///
    /// assert_eq!(cursor.value(), Ok(&3));
    /// assert_eq!(cursor.move_prev(), Some(&2));
    /// ```
    pub fn last(&self) -> Cursor<'_, T> {
        let path = self.max_path();
        Cursor { tree: self, path }
    }

    /// An exclusive cursor at the smallest value.
    ///
    /// Together with [`CursorMut::remove_current`] this drains the tree in
    /// ascending order.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let mut tree: Tree<i32> = [2, 1, 2].into_iter().collect();
    /// let mut cursor = tree.first_mut();
    ///
    /// let mut drained = Vec::new();
    /// while let Ok(value) = cursor.remove_current() {
    ///     drained.push(value);
    /// }
    ///
    /// drop(cursor);
    /// assert_eq!(drained, [1, 2, 2]);
    /// assert!(tree.is_empty());
    /// ```
    pub fn first_mut(&mut self) -> CursorMut<'_, T> {
        let path = self.min_path();
        CursorMut { tree: self, path }
    }

    /// An exclusive cursor at the largest value.
    pub fn last_mut(&mut self) -> CursorMut<'_, T> {
        let path = self.max_path();
        CursorMut { tree: self, path }
    }

    /// A cursor at the highest node holding a value equal to `value`, or
    /// the end cursor when there is none.
    ///
    /// With duplicates present this finds the one closest to the root;
    /// the others sit in its right subtree.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let tree: Tree<i32> = [5, 3, 8].into_iter().collect();
    ///
    /// assert_eq!(tree.find(&3).value(), Ok(&3));
    /// assert!(tree.find(&4).is_end());
    /// ```
    pub fn find(&self, value: &T) -> Cursor<'_, T>
    where
        T: Ord,
    {
        let path = self.find_path(value);
        Cursor { tree: self, path }
    }

    /// The exclusive counterpart of [`Tree::find`], for removing a looked-up
    /// value.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let mut tree: Tree<i32> = [5, 3, 8].into_iter().collect();
    ///
    /// assert_eq!(tree.find_mut(&3).remove_current(), Ok(3));
    /// assert!(!tree.contains(&3));
    /// ```
    pub fn find_mut(&mut self, value: &T) -> CursorMut<'_, T>
    where
        T: Ord,
    {
        let path = self.find_path(value);
        CursorMut { tree: self, path }
    }

    /// Visits every value in ascending order.
    ///
    /// The iterator is double-ended: iterating from the back visits values
    /// in descending order, and however the two ends are mixed, every value
    /// comes out exactly once.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let tree: Tree<i32> = [2, 3, 1].into_iter().collect();
    ///
    /// assert_eq!(tree.iter().copied().collect::<Vec<_>>(), [1, 2, 3]);
    /// assert_eq!(tree.iter().rev().copied().collect::<Vec<_>>(), [3, 2, 1]);
    /// ```
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            fwd: self.min_path(),
            bwd: self.max_path(),
            done: false,
            tree: PhantomData,
        }
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
