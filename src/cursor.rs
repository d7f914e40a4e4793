//! Cursors and iterators over a [`Tree`].
//!
//! A [`Cursor`] borrows its tree and points at one node, or off the end, of one ordering walked in
//! one direction. It can step both ways: `move_next` goes one step in the cursor's direction and
//! `move_prev` goes one step back. A reverse cursor visits the same nodes as a forward one, from
//! back to front.
//!
//! A [`CursorHandle`] is the same position without the borrow. Handles are what the mutating
//! methods of [`Tree`] hand out and accept, and they outlive changes to the tree. Turning one back
//! into a cursor with [`Tree::cursor`] checks that its node is still in the tree.
//!
//! The [`Iter`] and [`IntoIter`] types are ordinary Rust iterators built on the same step rules.

use std::fmt;
use std::iter::FusedIterator;

use crate::arena::{Arena, NodeId, StoreId};
use crate::error::{Error, Result};
use crate::order::{self, Direction, Order};
use crate::tree::Tree;

/// A cursor position that does not borrow its tree.
///
/// Handles compare equal when they come from the same tree and share ordering, direction and
/// position. In particular, all off-the-end handles of one tree, ordering and direction are
/// equal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CursorHandle {
    pub(crate) store: StoreId,
    pub(crate) order: Order,
    pub(crate) direction: Direction,
    pub(crate) node: Option<NodeId>,
}

impl CursorHandle {
    /// The ordering this handle walks.
    pub fn order(&self) -> Order {
        self.order
    }

    /// The direction this handle walks its ordering in.
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Whether this handle is positioned off the end of its ordering.
    pub fn is_end(&self) -> bool {
        self.node.is_none()
    }
}

/// A bidirectional cursor over one ordering of a [`Tree`].
///
/// # Examples
///
/// ```
/// use ordtree::{Order, Tree};
///
/// let tree: Tree<i32> = [2, 1, 3].into_iter().collect();
///
/// let mut cursor = tree.begin(Order::Pre);
/// let mut keys = Vec::new();
/// while cursor != tree.end(Order::Pre) {
///     keys.push(*cursor.key()?);
///     cursor.move_next()?;
/// }
/// assert_eq!(keys, [2, 1, 3]);
///
/// // Stepping past the end is reported rather than undefined.
/// assert!(cursor.move_next().is_err());
/// # Ok::<(), ordtree::Error>(())
/// ```
pub struct Cursor<'a, T> {
    pub(crate) tree: &'a Tree<T>,
    pub(crate) handle: CursorHandle,
}

impl<'a, T> Cursor<'a, T> {
    /// The key at the cursor.
    ///
    /// # Errors
    ///
    /// [`Error::OffTheEnd`] if the cursor is off the end of its ordering.
    pub fn key(&self) -> Result<&'a T> {
        let tree = self.tree;
        match self.handle.node {
            Some(id) => Ok(&tree.arena[id].key),
            None => Err(Error::OffTheEnd),
        }
    }

    /// Moves one step in the cursor's direction. Moving from the last node lands off the end.
    ///
    /// # Errors
    ///
    /// [`Error::OffTheEnd`] if the cursor is already off the end. The cursor is left unchanged.
    pub fn move_next(&mut self) -> Result<()> {
        let id = self.handle.node.ok_or(Error::OffTheEnd)?;
        let handle = &mut self.handle;
        handle.node = order::step(&self.tree.arena, handle.order, handle.direction, id);
        Ok(())
    }

    /// Moves one step against the cursor's direction. Moving from the first node lands off the
    /// end.
    ///
    /// # Errors
    ///
    /// [`Error::OffTheEnd`] if the cursor is off the end. The cursor is left unchanged.
    pub fn move_prev(&mut self) -> Result<()> {
        let id = self.handle.node.ok_or(Error::OffTheEnd)?;
        let handle = &mut self.handle;
        handle.node = order::step(
            &self.tree.arena,
            handle.order,
            handle.direction.reversed(),
            id,
        );
        Ok(())
    }

    /// Whether the cursor is off the end of its ordering.
    pub fn is_end(&self) -> bool {
        self.handle.is_end()
    }

    /// The ordering this cursor walks.
    pub fn order(&self) -> Order {
        self.handle.order
    }

    /// The direction this cursor walks its ordering in.
    pub fn direction(&self) -> Direction {
        self.handle.direction
    }

    /// Detaches the cursor's position from the borrow of the tree.
    pub fn handle(&self) -> CursorHandle {
        self.handle
    }
}

impl<T> Clone for Cursor<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Cursor<'_, T> {}

impl<T> PartialEq for Cursor<'_, T> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.tree, other.tree) && self.handle == other.handle
    }
}

impl<T> Eq for Cursor<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("order", &self.handle.order)
            .field("direction", &self.handle.direction)
            .field("key", &self.key().ok())
            .finish()
    }
}

/// An iterator over the keys of a [`Tree`] in one ordering. Iterating it backwards walks the
/// ordering in reverse.
///
/// Created by [`Tree::iter`] and [`Tree::iter_order`].
pub struct Iter<'a, T> {
    arena: &'a Arena<T>,
    order: Order,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(tree: &'a Tree<T>, order: Order) -> Self {
        Self {
            arena: &tree.arena,
            order,
            front: order::first(&tree.arena, order, tree.root),
            back: order::last(&tree.arena, order, tree.root),
            remaining: tree.len(),
        }
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            order: self.order,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.front?;
        self.remaining -= 1;
        self.front = order::successor(self.arena, self.order, id);
        Some(&self.arena[id].key)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let id = self.back?;
        self.remaining -= 1;
        self.back = order::predecessor(self.arena, self.order, id);
        Some(&self.arena[id].key)
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.clone()).finish()
    }
}

/// An owning iterator over the keys of a [`Tree`] in ascending order.
///
/// Created by the [`IntoIterator`] implementation of [`Tree`].
#[derive(Debug)]
pub struct IntoIter<T> {
    pub(crate) keys: std::vec::IntoIter<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.keys.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.keys.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.keys.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
