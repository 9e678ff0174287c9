//! The tree itself: structure ownership and every structural mutation.

use std::alloc::{self, Layout};
use std::cmp::Ordering;
use std::fmt;
use std::mem;
use std::ptr::NonNull;

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::node::{Link, Node, STACK_DEPTH};
use crate::path::NodePath;

/// An ordered binary search tree that keeps every value it is given,
/// duplicates included.
///
/// Values only need [`Ord`]; the element is its own ordering key. Equal
/// values are routed to the right on insertion, so duplicates form a chain
/// in the right subtree of the first one inserted. Lookups walk top-down and
/// stop at the first match.
///
/// All traversal state lives in the cursor types ([`Cursor`],
/// [`CursorMut`]) and in [`Iter`], each of which records its position as the
/// full ancestor path to the current node. Structural changes flow through
/// the tree: insertion, removal through [`CursorMut::remove_current`],
/// [`Tree::clear`], and the clone methods.
///
/// [`Cursor`]: crate::Cursor
/// [`CursorMut`]: crate::CursorMut
/// [`Iter`]: crate::Iter
/// [`CursorMut::remove_current`]: crate::CursorMut::remove_current
///
/// # Examples
///
/// ```
/// use bstree::Tree;
///
/// let mut tree = Tree::new();
/// tree.insert(2);
/// tree.insert(1);
/// tree.insert(2);
///
/// assert_eq!(tree.len(), 3);
/// assert!(tree.contains(&1));
///
/// let sorted: Vec<i32> = tree.iter().copied().collect();
/// assert_eq!(sorted, [1, 2, 2]);
/// ```
pub struct Tree<T> {
    // A bare link rather than an owned node so the tree can be moved around
    // without touching the children's parent pointers.
    root: Link<T>,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Tree<T> {
    fn drop(&mut self) {
        self.clear();
    }
}

impl<T> Clone for Tree<T>
where
    T: Clone,
{
    fn clone(&self) -> Self {
        match self.try_clone() {
            Ok(tree) => tree,
            Err(_) => alloc::handle_alloc_error(Layout::new::<Node<T>>()),
        }
    }

    fn clone_from(&mut self, source: &Self) {
        if self.try_clone_from(source).is_err() {
            alloc::handle_alloc_error(Layout::new::<Node<T>>());
        }
    }
}

impl<T> fmt::Debug for Tree<T>
where
    T: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T> Tree<T> {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self { root: None }
    }

    /// The number of stored values, duplicates included.
    ///
    /// The count is derived from the node graph on demand, so this is O(n).
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let tree: Tree<i32> = [3, 1, 3].into_iter().collect();
    /// assert_eq!(tree.len(), 3);
    /// ```
    pub fn len(&self) -> usize {
        // SAFETY: every reachable node is live and `&self` rules out
        // mutation during the walk.
        unsafe { Node::subtree_size(self.root) }
    }

    /// Whether the tree holds no values.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Whether some stored value compares equal to `value`.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let tree: Tree<i32> = [2, 4].into_iter().collect();
    /// assert!(tree.contains(&4));
    /// assert!(!tree.contains(&3));
    /// ```
    pub fn contains(&self, value: &T) -> bool
    where
        T: Ord,
    {
        !self.find_path(value).is_end()
    }

    /// Inserts `value`, keeping the search order.
    ///
    /// Equal values descend to the right, so inserting a duplicate places it
    /// in the right subtree of the matching value that sits highest in the
    /// tree. On allocation failure this aborts through
    /// [`std::alloc::handle_alloc_error`]; use [`Tree::try_insert`] to
    /// handle that case instead.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let mut tree = Tree::new();
    /// tree.insert("pear");
    /// tree.insert("apple");
    ///
    /// assert_eq!(tree.iter().next(), Some(&"apple"));
    /// ```
    pub fn insert(&mut self, value: T)
    where
        T: Ord,
    {
        if self.try_insert(value).is_err() {
            alloc::handle_alloc_error(Layout::new::<Node<T>>());
        }
    }

    /// Inserts `value`, reporting allocation failure instead of aborting.
    ///
    /// # Errors
    ///
    /// [`Error::AllocationFailed`] when no node could be allocated. The tree
    /// is unchanged in that case; the value is dropped.
    pub fn try_insert(&mut self, value: T) -> Result<()>
    where
        T: Ord,
    {
        let Some(root) = self.root else {
            self.root = Some(Node::try_alloc(value)?);
            return Ok(());
        };
        // SAFETY: the descent only touches live children of this tree and
        // `&mut self` rules out concurrent access.
        unsafe {
            let mut current = root;
            loop {
                // Strictly-less goes left; everything else, equal values
                // included, goes right.
                if value < current.as_ref().value {
                    match current.as_ref().left {
                        Some(left) => current = left,
                        None => {
                            Node::attach_left(current, Some(Node::try_alloc(value)?));
                            return Ok(());
                        }
                    }
                } else {
                    match current.as_ref().right {
                        Some(right) => current = right,
                        None => {
                            Node::attach_right(current, Some(Node::try_alloc(value)?));
                            return Ok(());
                        }
                    }
                }
            }
        }
    }

    /// Drops every value and frees every node, leaving the tree empty.
    ///
    /// Iterative; safe to call on arbitrarily deep trees.
    ///
    /// # Examples
    ///
    /// ```
    /// use bstree::Tree;
    ///
    /// let mut tree: Tree<i32> = (0..50).collect();
    /// tree.clear();
    /// assert!(tree.is_empty());
    /// ```
    pub fn clear(&mut self) {
        // SAFETY: the tree exclusively owns every reachable node. Taking the
        // root first leaves the tree empty and valid even if a value's drop
        // panics midway.
        unsafe { Node::free_subtree(self.root.take()) };
    }

    /// Deep-copies this tree, reporting allocation failure.
    ///
    /// # Errors
    ///
    /// [`Error::AllocationFailed`] when a node could not be allocated.
    pub fn try_clone(&self) -> Result<Self>
    where
        T: Clone,
    {
        let mut tree = Self::new();
        tree.try_clone_from(self)?;
        Ok(tree)
    }

    /// Replaces this tree's content with a deep copy of `source`.
    ///
    /// The copy walks `source` in pre-order with an explicit stack and wires
    /// each copied node to its parent as it goes, so parent pointers are
    /// rebuilt rather than copied.
    ///
    /// # Errors
    ///
    /// [`Error::AllocationFailed`] when a node could not be allocated. The
    /// destination then holds a valid tree containing the values copied so
    /// far, not its previous content.
    pub fn try_clone_from(&mut self, source: &Self) -> Result<()>
    where
        T: Clone,
    {
        self.clear();
        let Some(src_root) = source.root else {
            return Ok(());
        };
        let mut stack: SmallVec<[CloneFrame<T>; STACK_DEPTH]> = SmallVec::new();
        stack.push(CloneFrame {
            src: src_root,
            dst_parent: None,
            to_left: false,
        });
        while let Some(frame) = stack.pop() {
            // SAFETY: source nodes are live behind `&source`, and every
            // destination node was allocated by this loop and is reachable
            // only through `self`.
            unsafe {
                let src = frame.src.as_ref();
                let node = Node::try_alloc(src.value.clone())?;
                match frame.dst_parent {
                    None => self.root = Some(node),
                    Some(parent) if frame.to_left => Node::attach_left(parent, Some(node)),
                    Some(parent) => Node::attach_right(parent, Some(node)),
                }
                if let Some(left) = src.left {
                    stack.push(CloneFrame {
                        src: left,
                        dst_parent: Some(node),
                        to_left: true,
                    });
                }
                if let Some(right) = src.right {
                    stack.push(CloneFrame {
                        src: right,
                        dst_parent: Some(node),
                        to_left: false,
                    });
                }
            }
        }
        Ok(())
    }

    /// Walks top-down comparing three ways, collecting the ancestor path.
    /// Stops at the first value that is neither less nor greater, which with
    /// right-routed duplicates is the highest matching node. A miss returns
    /// the end path.
    pub(crate) fn find_path(&self, value: &T) -> NodePath<T>
    where
        T: Ord,
    {
        let mut path = NodePath::end();
        let mut current = self.root;
        while let Some(node) = current {
            path.push(node);
            // SAFETY: `node` is a live node of this tree, unmutated while
            // `&self` is held.
            let node = unsafe { node.as_ref() };
            match value.cmp(&node.value) {
                Ordering::Less => current = node.left,
                Ordering::Greater => current = node.right,
                Ordering::Equal => return path,
            }
        }
        NodePath::end()
    }

    /// The path to the smallest value, or the end path for an empty tree.
    pub(crate) fn min_path(&self) -> NodePath<T> {
        // SAFETY: the root and its left-child chain are live nodes of this
        // tree, unmutated while `&self` is held.
        unsafe { NodePath::descend_min(self.root) }
    }

    /// The path to the largest value, or the end path for an empty tree.
    pub(crate) fn max_path(&self) -> NodePath<T> {
        // SAFETY: the root and its right-child chain are live nodes of this
        // tree, unmutated while `&self` is held.
        unsafe { NodePath::descend_max(self.root) }
    }

    /// Unlinks the node at the top of `path` and returns its value, leaving
    /// `path` at the in-order successor of the removed value.
    ///
    /// With two children the node object itself stays where it is: the
    /// successor's value is moved into it and the successor's node, which
    /// has no left child by construction, is spliced out and freed. With at
    /// most one child the path is repositioned first, while the pointers are
    /// still intact, and then the child is spliced into the parent's slot
    /// (or made the root).
    ///
    /// # Errors
    ///
    /// [`Error::RemoveAtEnd`] when `path` is the end position.
    ///
    /// # Safety
    ///
    /// `path` must have been built from this tree and kept in sync with
    /// every structural change since.
    pub(crate) unsafe fn remove_at(&mut self, path: &mut NodePath<T>) -> Result<T> {
        let Some(target) = path.current() else {
            return Err(Error::RemoveAtEnd);
        };
        let (left, right) = {
            let node = target.as_ref();
            (node.left, node.right)
        };

        if let (Some(_), Some(right)) = (left, right) {
            let mut succ = right;
            while let Some(next) = succ.as_ref().left {
                succ = next;
            }
            let succ_right = succ.as_ref().right;
            let succ_parent = succ
                .as_ref()
                .parent
                .expect("a successor sits strictly below the node being removed");
            if succ_parent.as_ref().left == Some(succ) {
                Node::attach_left(succ_parent, succ_right);
            } else {
                Node::attach_right(succ_parent, succ_right);
            }
            let succ_value = Node::take_value(succ);
            // `path` still names `target`, which now holds the successor's
            // value. That keeps the cursor at the removed value's successor
            // without walking anywhere.
            return Ok(mem::replace(&mut (*target.as_ptr()).value, succ_value));
        }

        // Zero or one child. Reposition the path before splicing, while the
        // climb can still read the original pointers.
        path.pop();
        if let Some(right) = right {
            path.push_min_from(right);
        } else {
            let mut child = target;
            while let Some(parent) = path.current() {
                if parent.as_ref().right != Some(child) {
                    break;
                }
                path.pop();
                child = parent;
            }
        }

        let child = left.or(right);
        match target.as_ref().parent {
            None => {
                self.root = child;
                if let Some(mut child) = child {
                    child.as_mut().parent = None;
                }
            }
            Some(parent) => {
                if parent.as_ref().left == Some(target) {
                    Node::attach_left(parent, child);
                } else {
                    Node::attach_right(parent, child);
                }
            }
        }
        Ok(Node::take_value(target))
    }
}

impl<T> FromIterator<T> for Tree<T>
where
    T: Ord,
{
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<T> Extend<T> for Tree<T>
where
    T: Ord,
{
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.insert(value);
        }
    }
}

// SAFETY: every node is owned exclusively by its tree and reachable only
// through it, so moving or sharing the tree moves or shares exactly the
// values it stores. Only the raw pointers keep the auto traits away.
unsafe impl<T> Send for Tree<T> where T: Send {}
unsafe impl<T> Sync for Tree<T> where T: Sync {}

/// One pending copy during [`Tree::try_clone_from`]: a source subtree root
/// and the destination slot it attaches to.
struct CloneFrame<T> {
    src: NonNull<Node<T>>,
    dst_parent: Link<T>,
    to_left: bool,
}

#[cfg(test)]
impl<T> Tree<T> {
    /// Walks the whole graph asserting the search order and that every
    /// child's parent pointer names the node it hangs from.
    pub(crate) fn validate(&self)
    where
        T: Ord,
    {
        // SAFETY: all nodes are live and `&self` blocks mutation for the
        // duration of the walk.
        unsafe {
            let Some(root) = self.root else {
                return;
            };
            assert!(root.as_ref().parent.is_none(), "root must not have a parent");
            let mut stack: Vec<(NonNull<Node<T>>, Option<&T>, Option<&T>)> =
                vec![(root, None, None)];
            while let Some((node, lower, upper)) = stack.pop() {
                let n = node.as_ref();
                if let Some(lower) = lower {
                    assert!(lower <= &n.value, "right-subtree value below its ancestor");
                }
                if let Some(upper) = upper {
                    assert!(&n.value < upper, "left-subtree value not below its ancestor");
                }
                if let Some(left) = n.left {
                    assert_eq!(left.as_ref().parent, Some(node), "left child disowns parent");
                    stack.push((left, lower, Some(&n.value)));
                }
                if let Some(right) = n.right {
                    assert_eq!(right.as_ref().parent, Some(node), "right child disowns parent");
                    stack.push((right, Some(&n.value), upper));
                }
            }
        }
    }
}


#[cfg(test)]
mod quicktests {
    use super::*;
    use crate::test::quick::Op;

    /// Drives the same operations into a tree and a sorted vector so the two
    /// can be compared as multisets afterwards.
    fn do_ops<T>(ops: &[Op<T>], tree: &mut Tree<T>, model: &mut Vec<T>)
    where
        T: Ord + Clone + std::fmt::Debug,
    {
        for op in ops {
            match op {
                Op::Insert(value) => {
                    tree.insert(value.clone());
                    let at = model.partition_point(|m| m <= value);
                    model.insert(at, value.clone());
                }
                Op::Remove(value) => {
                    let removed = tree.find_mut(value).remove_current().ok();
                    let expected = model
                        .iter()
                        .position(|m| m == value)
                        .map(|at| model.remove(at));
                    assert_eq!(removed, expected);
                }
            }
        }
    }

    quickcheck::quickcheck! {
        fn fuzz_multiset_operations_i8(ops: Vec<Op<i8>>) -> bool {
            let mut tree = Tree::new();
            let mut model = Vec::new();

            do_ops(&ops, &mut tree, &mut model);
            tree.validate();

            tree.iter().copied().collect::<Vec<_>>() == model
        }
    }

    quickcheck::quickcheck! {
        fn insertion_preserves_duplicates(xs: Vec<i8>) -> bool {
            let tree: Tree<i8> = xs.iter().copied().collect();
            tree.validate();

            let mut expected = xs;
            expected.sort_unstable();
            tree.iter().copied().collect::<Vec<_>>() == expected
        }
    }
}
