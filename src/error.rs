//! Errors reported by [`Tree`](crate::Tree) and its cursors.
//!
//! Lookups that miss never fail: they hand back an off-the-end cursor or `None`. Likewise
//! inserting a duplicate key or erasing a missing one is reported through the return value. The
//! variants below cover the remaining cases, which are all caller contract violations (stepping
//! past the end, using a cursor whose node was deleted) plus the one configuration conflict a
//! merge can run into.

use thiserror::Error;

use crate::config::AllocStrategy;

/// Errors that can occur while operating on a tree through cursors or when combining trees.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The cursor is positioned off the end of its ordering, so there is no key to read and no
    /// node to step from.
    #[error("cursor is positioned off the end of its ordering")]
    OffTheEnd,

    /// The node the cursor points at has been removed from the tree since the cursor was taken.
    ///
    /// Note that a node with two children survives its own deletion: its slot takes over the key
    /// of its in-order successor and it is the successor's slot that is released. A cursor on
    /// such a node stays valid and observes the successor's key.
    #[error("cursor refers to a node that has been removed from the tree")]
    StaleCursor,

    /// The cursor was taken from a different tree.
    #[error("cursor belongs to a different tree")]
    ForeignCursor,

    /// Two trees with different allocation strategies cannot share nodes.
    #[error("cannot merge a tree using {theirs:?} allocation into one using {ours:?} allocation")]
    AllocatorMismatch {
        /// The strategy of the tree being merged into.
        ours: AllocStrategy,
        /// The strategy of the tree whose keys would have been moved.
        theirs: AllocStrategy,
    },
}

/// A Result type alias using this crate's [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
