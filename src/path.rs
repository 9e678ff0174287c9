//! The ancestor-path stack that gives cursors their position.

use std::ptr::NonNull;

use crate::node::{Link, Node, NodeStack};

/// A position in the tree, held as the full ancestor path from the root down
/// to the current node. The top of the stack is the current node; everything
/// below it is there so that stepping can walk upward without consulting the
/// root again.
///
/// The empty path is the end position. Stepping off either edge of the tree
/// pops the whole path, and an empty path absorbs every further step, so the
/// end is shared by forward and backward traversal.
///
/// A path holds pointers but no borrow; the cursor types wrap it together
/// with the tree borrow that keeps the pointers alive.
pub(crate) struct NodePath<T> {
    stack: NodeStack<T>,
}

// Manual impl: cloning copies pointers, so no `T: Clone` bound is wanted.
impl<T> Clone for NodePath<T> {
    fn clone(&self) -> Self {
        Self {
            stack: self.stack.clone(),
        }
    }
}

impl<T> NodePath<T> {
    /// The exhausted path, shared by `end` and `rend`.
    pub(crate) fn end() -> Self {
        Self {
            stack: NodeStack::new(),
        }
    }

    /// The current node, or `None` at the end position.
    pub(crate) fn current(&self) -> Link<T> {
        self.stack.last().copied()
    }

    pub(crate) fn is_end(&self) -> bool {
        self.stack.is_empty()
    }

    /// Positions are equal when they name the same node; the ancestor
    /// history below the top never matters, and all end positions are equal.
    pub(crate) fn same_position(&self, other: &Self) -> bool {
        self.current() == other.current()
    }

    pub(crate) fn push(&mut self, node: NonNull<Node<T>>) {
        self.stack.push(node);
    }

    pub(crate) fn pop(&mut self) -> Link<T> {
        self.stack.pop()
    }

    /// The path to the smallest node of the tree under `root`.
    ///
    /// # Safety
    ///
    /// `root` and every node on its left-child chain must be live.
    pub(crate) unsafe fn descend_min(root: Link<T>) -> Self {
        let mut path = Self::end();
        if let Some(root) = root {
            path.push_min_from(root);
        }
        path
    }

    /// The path to the largest node of the tree under `root`.
    ///
    /// # Safety
    ///
    /// `root` and every node on its right-child chain must be live.
    pub(crate) unsafe fn descend_max(root: Link<T>) -> Self {
        let mut path = Self::end();
        if let Some(root) = root {
            path.push_max_from(root);
        }
        path
    }

    /// Pushes `node` and then its chain of left children, leaving the
    /// minimum of `node`'s subtree on top.
    ///
    /// # Safety
    ///
    /// `node` and its left-child chain must be live.
    pub(crate) unsafe fn push_min_from(&mut self, node: NonNull<Node<T>>) {
        let mut next = node;
        loop {
            self.stack.push(next);
            match next.as_ref().left {
                Some(left) => next = left,
                None => break,
            }
        }
    }

    /// Mirror of [`NodePath::push_min_from`]: pushes `node` and its chain of
    /// right children, leaving the subtree maximum on top.
    ///
    /// # Safety
    ///
    /// `node` and its right-child chain must be live.
    pub(crate) unsafe fn push_max_from(&mut self, node: NonNull<Node<T>>) {
        let mut next = node;
        loop {
            self.stack.push(next);
            match next.as_ref().right {
                Some(right) => next = right,
                None => break,
            }
        }
    }

    /// Advances to the in-order successor. The end position absorbs the
    /// step.
    ///
    /// With a right child, the successor is the minimum of that subtree.
    /// Without one, it is the first ancestor reached from a left child; if
    /// the climb pops everything, the current node was the maximum and the
    /// path becomes the end position.
    ///
    /// # Safety
    ///
    /// Every node on the path, and every node reachable from the current
    /// node's right child, must be live.
    pub(crate) unsafe fn step_forward(&mut self) {
        let Some(current) = self.current() else {
            return;
        };
        if let Some(right) = current.as_ref().right {
            self.push_min_from(right);
            return;
        }
        let mut child = self
            .pop()
            .expect("a current node implies a non-empty path");
        while let Some(&parent) = self.stack.last() {
            if parent.as_ref().right != Some(child) {
                break;
            }
            self.stack.pop();
            child = parent;
        }
    }

    /// Steps to the in-order predecessor. The end position absorbs the
    /// step; backward traversal starts from the maximum, not from the end.
    ///
    /// # Safety
    ///
    /// Every node on the path, and every node reachable from the current
    /// node's left child, must be live.
    pub(crate) unsafe fn step_backward(&mut self) {
        let Some(current) = self.current() else {
            return;
        };
        if let Some(left) = current.as_ref().left {
            self.push_max_from(left);
            return;
        }
        let mut child = self
            .pop()
            .expect("a current node implies a non-empty path");
        while let Some(&parent) = self.stack.last() {
            if parent.as_ref().left != Some(child) {
                break;
            }
            self.stack.pop();
            child = parent;
        }
    }
}
