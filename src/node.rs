//! Node layout and the raw-pointer plumbing shared by the tree and its
//! cursors.

use std::alloc::{self, Layout};
use std::ptr::NonNull;

use smallvec::SmallVec;

use crate::error::{Error, Result};

/// Inline capacity for traversal stacks. Paths only spill to the heap past
/// this depth, which a near-balanced tree reaches somewhere beyond a billion
/// nodes.
pub(crate) const STACK_DEPTH: usize = 32;

/// An explicit stack of node pointers used by the iterative walks.
pub(crate) type NodeStack<T> = SmallVec<[NonNull<Node<T>>; STACK_DEPTH]>;

/// A nullable edge in the node graph. `None` is an absent child, an absent
/// parent (the root), or an empty tree.
pub(crate) type Link<T> = Option<NonNull<Node<T>>>;

/// A single tree node.
///
/// The `left` and `right` edges own the nodes they point to. `parent` is a
/// back-reference only so that deletion and the cursors can walk upward; it
/// is never used to free memory. `Node` deliberately has no `Drop` impl:
/// all freeing happens through [`Node::free_subtree`] and
/// [`Node::take_value`], and the latter relies on being able to move the
/// value out of a freed node by destructuring.
pub(crate) struct Node<T> {
    pub(crate) value: T,
    pub(crate) left: Link<T>,
    pub(crate) right: Link<T>,
    pub(crate) parent: Link<T>,
}

impl<T> Node<T> {
    /// Allocates a detached node holding `value`.
    ///
    /// This is the only allocation site in the crate. Exhaustion surfaces as
    /// [`Error::AllocationFailed`] so callers can choose between propagating
    /// it and calling [`std::alloc::handle_alloc_error`].
    pub(crate) fn try_alloc(value: T) -> Result<NonNull<Self>> {
        let layout = Layout::new::<Self>();
        // SAFETY: `Node<T>` holds three pointers besides `value`, so the
        // layout is never zero-sized.
        let raw = unsafe { alloc::alloc(layout) }.cast::<Self>();
        let Some(node) = NonNull::new(raw) else {
            return Err(Error::AllocationFailed);
        };
        // SAFETY: `node` was just allocated with `Self`'s layout and nothing
        // else aliases it.
        unsafe {
            node.as_ptr().write(Self {
                value,
                left: None,
                right: None,
                parent: None,
            });
        }
        Ok(node)
    }

    /// Frees `node` and returns the value it held.
    ///
    /// # Safety
    ///
    /// `node` must have come from [`Node::try_alloc`], must not have been
    /// freed already, and no pointer to it may be dereferenced afterwards.
    pub(crate) unsafe fn take_value(node: NonNull<Self>) -> T {
        // `try_alloc` goes through the global allocator with `Self`'s layout,
        // which is exactly the `Box` contract. Destructuring moves the value
        // out; the links are `Copy` and need no cleanup.
        let Self { value, .. } = *Box::from_raw(node.as_ptr());
        value
    }

    /// Makes `child` the left child of `parent`, wiring the back-reference
    /// when the child is present. Performs no ordering checks.
    ///
    /// # Safety
    ///
    /// Both pointers must refer to live nodes of the same tree with no
    /// outstanding references into either.
    pub(crate) unsafe fn attach_left(mut parent: NonNull<Self>, child: Link<T>) {
        parent.as_mut().left = child;
        if let Some(mut child) = child {
            child.as_mut().parent = Some(parent);
        }
    }

    /// Mirror of [`Node::attach_left`] for the right edge.
    ///
    /// # Safety
    ///
    /// Same contract as [`Node::attach_left`].
    pub(crate) unsafe fn attach_right(mut parent: NonNull<Self>, child: Link<T>) {
        parent.as_mut().right = child;
        if let Some(mut child) = child {
            child.as_mut().parent = Some(parent);
        }
    }

    /// Counts the nodes reachable from `link`, the linked node included.
    ///
    /// Size is derived from the node graph on demand rather than cached, so
    /// this is O(n). The walk uses an explicit stack; a degenerate chain of
    /// nodes cannot overflow the call stack.
    ///
    /// # Safety
    ///
    /// Every node reachable from `link` must be live and must not be mutated
    /// while the walk runs.
    pub(crate) unsafe fn subtree_size(link: Link<T>) -> usize {
        let mut stack = NodeStack::<T>::new();
        stack.extend(link);
        let mut count = 0;
        while let Some(node) = stack.pop() {
            count += 1;
            let node = node.as_ref();
            stack.extend(node.left);
            stack.extend(node.right);
        }
        count
    }

    /// Frees every node reachable from `link`, children before parents.
    ///
    /// A node's children are detached before being pushed, so each node is
    /// popped at most twice: once to schedule its children and once, bare, to
    /// be freed.
    ///
    /// # Safety
    ///
    /// Every node reachable from `link` must be live and allocated by
    /// [`Node::try_alloc`], and none of them may be reachable from anywhere
    /// else once this returns.
    pub(crate) unsafe fn free_subtree(link: Link<T>) {
        let mut stack = NodeStack::<T>::new();
        stack.extend(link);
        while let Some(mut node) = stack.pop() {
            let left = node.as_mut().left.take();
            let right = node.as_mut().right.take();
            if left.is_none() && right.is_none() {
                drop(Box::from_raw(node.as_ptr()));
            } else {
                stack.push(node);
                stack.extend(left);
                stack.extend(right);
            }
        }
    }
}
