//! Error types for tree operations.

use thiserror::Error;

/// Errors that can occur while operating on a [`Tree`](crate::Tree).
///
/// Every failure is reported synchronously by the operation that hit it and
/// is fatal to that operation only. The tree itself is left in a valid
/// (possibly partially updated, see [`Tree::try_clone_from`]) state.
///
/// [`Tree::try_clone_from`]: crate::Tree::try_clone_from
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The global allocator could not provide storage for a node.
    ///
    /// Returned by the `try_` allocation APIs. The infallible counterparts
    /// (`insert`, `clone`) convert this into a call to
    /// [`std::alloc::handle_alloc_error`] instead.
    #[error("failed to allocate a tree node")]
    AllocationFailed,

    /// A cursor at the end position was dereferenced.
    ///
    /// The end position names no node, so there is no value to return.
    #[error("cursor is exhausted and refers to no element")]
    ExhaustedCursor,

    /// Removal was attempted through a cursor at the end position.
    #[error("cannot remove through an exhausted cursor")]
    RemoveAtEnd,
}

/// A `Result` alias defaulting to this crate's [`Error`] type.
pub type Result<T> = std::result::Result<T, Error>;
