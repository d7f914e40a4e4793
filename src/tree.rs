//! An ordered set backed by an unbalanced Binary Search Tree.
//!
//! # Examples
//!
//! ```
//! use ordtree::{Order, Tree};
//!
//! let mut tree = Tree::new();
//!
//! // Nothing in here yet.
//! assert!(tree.find(&1).is_end());
//!
//! let (_, inserted) = tree.insert(1);
//! assert!(inserted);
//! assert_eq!(tree.find(&1).key(), Ok(&1));
//!
//! // Keys are unique - inserting one again does nothing.
//! let (_, inserted) = tree.insert(1);
//! assert!(!inserted);
//! assert_eq!(tree.len(), 1);
//!
//! // Removing a key hands it back.
//! assert_eq!(tree.extract(&1), Some(1));
//! assert!(tree.is_empty());
//! ```
//!
//! The tree never rebalances: its shape is decided entirely by the order keys arrive in. That
//! shape is observable through the pre-order and post-order traversals and through equality,
//! which compares shapes as well as keys.

use std::cmp::Ordering;
use std::fmt;

use tracing::{debug, trace, warn};

use crate::arena::{Arena, Node, NodeId};
use crate::config::TreeConfig;
use crate::cursor::{Cursor, CursorHandle, IntoIter, Iter};
use crate::error::{Error, Result};
use crate::order::{self, Direction, Order};
use crate::util::Side;

/// An ordered set of unique keys stored in an unbalanced Binary Search Tree.
///
/// Besides lookups, insertion and deletion, the tree can be walked in-order, pre-order and
/// post-order, each forwards and backwards, through [`Cursor`]s or [`Iter`]s.
pub struct Tree<T> {
    pub(crate) root: Option<NodeId>,
    size: usize,
    pub(crate) arena: Arena<T>,
    config: TreeConfig,
}

impl<T> Default for Tree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Tree<T> {
    /// Generate a new, empty `Tree`.
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Generate a new, empty `Tree` with the given settings.
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            root: None,
            size: 0,
            arena: Arena::new(&config),
            config,
        }
    }

    /// The settings this tree was created with.
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// The number of keys in the tree.
    pub fn len(&self) -> usize {
        self.size
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The largest number of keys a tree can hold.
    pub fn max_len(&self) -> usize {
        u32::MAX as usize
    }

    /// Counts keys by walking the whole tree in-order. Always agrees with [`Tree::len`], which is
    /// O(1).
    pub fn count_in_order(&self) -> usize {
        let mut count = 0;
        let mut current = order::first(&self.arena, Order::In, self.root);
        while let Some(id) = current {
            count += 1;
            current = order::successor(&self.arena, Order::In, id);
        }
        count
    }

    /// A cursor at the first node of `order`, or off the end if the tree is empty.
    pub fn begin(&self, order: Order) -> Cursor<'_, T> {
        self.start(order, Direction::Forward)
    }

    /// The off-the-end cursor of `order`.
    pub fn end(&self, order: Order) -> Cursor<'_, T> {
        self.cursor_to(order, Direction::Forward, None)
    }

    /// A reverse cursor at the last node of `order`, or off the end if the tree is empty.
    pub fn rbegin(&self, order: Order) -> Cursor<'_, T> {
        self.start(order, Direction::Reverse)
    }

    /// The off-the-end reverse cursor of `order`.
    pub fn rend(&self, order: Order) -> Cursor<'_, T> {
        self.cursor_to(order, Direction::Reverse, None)
    }

    /// Turns a handle back into a cursor.
    ///
    /// # Errors
    ///
    /// [`Error::ForeignCursor`] if the handle came from another tree and [`Error::StaleCursor`]
    /// if its node has since been removed.
    pub fn cursor(&self, handle: CursorHandle) -> Result<Cursor<'_, T>> {
        self.check(handle)?;
        Ok(Cursor { tree: self, handle })
    }

    /// The key a handle points at.
    ///
    /// # Errors
    ///
    /// As for [`Tree::cursor`], plus [`Error::OffTheEnd`] for an off-the-end handle.
    pub fn key_at(&self, handle: CursorHandle) -> Result<&T> {
        self.cursor(handle)?.key()
    }

    /// Iterates over the keys in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        self.iter_order(Order::In)
    }

    /// Iterates over the keys in `order`. Use [`Iterator::rev`] to walk it backwards.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::{Order, Tree};
    ///
    /// let tree: Tree<i32> = [5, 3, 8, 1].into_iter().collect();
    ///
    /// assert!(tree.iter_order(Order::Pre).eq(&[5, 3, 1, 8]));
    /// assert!(tree.iter_order(Order::Post).rev().eq(&[5, 8, 3, 1]));
    /// ```
    pub fn iter_order(&self, order: Order) -> Iter<'_, T> {
        Iter::new(self, order)
    }

    /// Removes every key.
    pub fn clear(&mut self) {
        let released = self.release_post_order();
        debug!(released, "cleared tree");
    }

    /// Exchanges the contents of two trees without touching any node. Handles follow their
    /// nodes into the other tree.
    pub fn swap(&mut self, other: &mut Tree<T>) {
        std::mem::swap(self, other);
    }

    fn start(&self, order: Order, direction: Direction) -> Cursor<'_, T> {
        let node = order::start(&self.arena, order, direction, self.root);
        self.cursor_to(order, direction, node)
    }

    fn cursor_to(
        &self,
        order: Order,
        direction: Direction,
        node: Option<NodeId>,
    ) -> Cursor<'_, T> {
        Cursor {
            tree: self,
            handle: self.handle(order, direction, node),
        }
    }

    fn handle(&self, order: Order, direction: Direction, node: Option<NodeId>) -> CursorHandle {
        CursorHandle {
            store: self.arena.id(),
            order,
            direction,
            node,
        }
    }

    fn check(&self, handle: CursorHandle) -> Result<()> {
        let store = self.arena.id();
        if !handle.store.same_store(store) {
            return Err(Error::ForeignCursor);
        }
        // Taken before an emptied store started over.
        if handle.store != store {
            return Err(Error::StaleCursor);
        }
        match handle.node {
            Some(id) if self.arena.get(id).is_none() => Err(Error::StaleCursor),
            _ => Ok(()),
        }
    }

    /// Releases every node, children before parents, using an explicit stack so that a tree
    /// shaped like a long chain can't overflow the call stack. Returns how many were released.
    fn release_post_order(&mut self) -> usize {
        let mut released = 0;
        let mut stack: Vec<(NodeId, bool)> = Vec::new();
        stack.extend(self.root.take().map(|root| (root, false)));
        while let Some((id, children_done)) = stack.pop() {
            if children_done {
                drop(self.arena.free(id));
                released += 1;
                continue;
            }
            let node = &self.arena[id];
            stack.push((id, true));
            stack.extend(node.right.map(|r| (r, false)));
            stack.extend(node.left.map(|l| (l, false)));
        }
        self.size = 0;
        released
    }

    /// Removes every key, handing them back in ascending order.
    fn drain_in_order(&mut self) -> Vec<T> {
        let mut ids = Vec::with_capacity(self.size);
        let mut current = order::first(&self.arena, Order::In, self.root);
        while let Some(id) = current {
            ids.push(id);
            current = order::successor(&self.arena, Order::In, id);
        }

        self.root = None;
        self.size = 0;
        ids.into_iter().map(|id| self.arena.free(id).key).collect()
    }

    /// Copies the shape and keys of this tree into `arena`, returning the new root.
    fn copy_into(&self, arena: &mut Arena<T>) -> Option<NodeId>
    where
        T: Clone,
    {
        let root = self.root?;
        let new_root = arena.alloc(Node::leaf(self.arena[root].key.clone(), None));
        let mut stack = vec![(root, new_root)];
        while let Some((source, copy)) = stack.pop() {
            for side in [Side::Left, Side::Right] {
                if let Some(child) = self.arena[source].child(side) {
                    let child_copy =
                        arena.alloc(Node::leaf(self.arena[child].key.clone(), Some(copy)));
                    *arena[copy].child_mut(side) = Some(child_copy);
                    stack.push((child, child_copy));
                }
            }
        }
        Some(new_root)
    }

    /// Unlinks a node that has at most one child by splicing that child into its place, then
    /// releases it.
    fn unlink(&mut self, id: NodeId) -> T {
        let node = self.arena.free(id);
        debug_assert!(node.left.is_none() || node.right.is_none());

        let child = node.left.or(node.right);
        if let Some(child) = child {
            self.arena[child].parent = node.parent;
        }
        match node.parent {
            None => self.root = child,
            Some(parent) => {
                let parent = &mut self.arena[parent];
                if parent.left == Some(id) {
                    parent.left = child;
                } else {
                    parent.right = child;
                }
            }
        }
        node.key
    }

    /// Deletes `id`'s key from the tree. Returns the key along with the id of the node that was
    /// actually released.
    ///
    /// A node with two children is not released itself: its in-order successor (the minimum of
    /// its right subtree, which has no left child) is unlinked instead and the successor's key is
    /// moved into `id`.
    fn remove(&mut self, id: NodeId) -> (T, NodeId) {
        let node = &self.arena[id];
        let removed = match (node.left, node.right) {
            (Some(_), Some(right)) => {
                let successor = order::extreme(&self.arena, right, Side::Left);
                let successor_key = self.unlink(successor);
                let key = std::mem::replace(&mut self.arena[id].key, successor_key);
                (key, successor)
            }
            _ => (self.unlink(id), id),
        };
        self.size -= 1;
        trace!(size = self.size, "removed node");
        removed
    }
}

impl<T: Ord> Tree<T> {
    /// Iterative descent from the root.
    fn search(&self, key: &T) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            current = match key.cmp(&node.key) {
                Ordering::Less => node.left,
                Ordering::Equal => return Some(id),
                Ordering::Greater => node.right,
            };
        }
        None
    }

    /// Whether `key` is in the tree.
    pub fn contains(&self, key: &T) -> bool {
        self.search(key).is_some()
    }

    /// The stored key equal to `key`, if any.
    pub fn get(&self, key: &T) -> Option<&T> {
        self.search(key).map(|id| &self.arena[id].key)
    }

    /// An in-order cursor at `key`, or the in-order off-the-end cursor if the tree does not
    /// contain it.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::{Order, Tree};
    ///
    /// let tree: Tree<i32> = [40, 11, 8, 45, 5].into_iter().collect();
    ///
    /// assert_eq!(tree.find(&5), tree.begin(Order::In));
    /// assert_eq!(tree.find(&2), tree.end(Order::In));
    /// ```
    pub fn find(&self, key: &T) -> Cursor<'_, T> {
        self.cursor_to(Order::In, Direction::Forward, self.search(key))
    }

    /// An in-order cursor at the key just below `key`.
    ///
    /// Only keys present in the tree have bounds: if `key` is missing, or it is the smallest key,
    /// the in-order off-the-end cursor is returned.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::{Order, Tree};
    ///
    /// let tree: Tree<i32> = [13, 45, -1, 3, 14].into_iter().collect();
    ///
    /// assert_eq!(tree.lower_bound(&3).key(), Ok(&-1));
    /// assert_eq!(tree.lower_bound(&-1), tree.end(Order::In));
    /// assert_eq!(tree.lower_bound(&5), tree.end(Order::In));
    /// ```
    pub fn lower_bound(&self, key: &T) -> Cursor<'_, T> {
        let node = self
            .search(key)
            .and_then(|id| order::predecessor(&self.arena, Order::In, id));
        self.cursor_to(Order::In, Direction::Forward, node)
    }

    /// An in-order cursor at the key just above `key`.
    ///
    /// Only keys present in the tree have bounds: if `key` is missing, or it is the largest key,
    /// the in-order off-the-end cursor is returned.
    pub fn upper_bound(&self, key: &T) -> Cursor<'_, T> {
        let node = self
            .search(key)
            .and_then(|id| order::successor(&self.arena, Order::In, id));
        self.cursor_to(Order::In, Direction::Forward, node)
    }

    /// Inserts `key` as a new leaf unless an equal key is already present. Returns an in-order
    /// handle at the key and whether it was inserted. The tree is not rebalanced.
    ///
    /// # Panics
    ///
    /// When the node store has no slot left to address, i.e. after [`Tree::max_len`] slots. A
    /// recycling store only gets there by holding that many keys. An appending store counts every
    /// slot used since it was last empty.
    pub fn insert(&mut self, key: T) -> (CursorHandle, bool) {
        let mut slot = None;
        let mut current = self.root;
        while let Some(id) = current {
            let node = &self.arena[id];
            let side = match key.cmp(&node.key) {
                Ordering::Less => Side::Left,
                Ordering::Equal => {
                    return (self.handle(Order::In, Direction::Forward, Some(id)), false)
                }
                Ordering::Greater => Side::Right,
            };
            slot = Some((id, side));
            current = node.child(side);
        }

        let parent = slot.map(|(parent, _)| parent);
        let id = self.arena.alloc(Node::leaf(key, parent));
        match slot {
            Some((parent, side)) => *self.arena[parent].child_mut(side) = Some(id),
            None => self.root = Some(id),
        }
        self.size += 1;
        trace!(size = self.size, "inserted node");

        if cfg!(debug_assertions) {
            if let Some(parent) = parent {
                let parent = &self.arena[parent];
                assert!(parent.left.map_or(true, |l| self.arena[l].key < parent.key));
                assert!(parent.right.map_or(true, |r| self.arena[r].key > parent.key));
            }
        }

        (self.handle(Order::In, Direction::Forward, Some(id)), true)
    }

    /// Inserts every key from `keys` in sequence order, skipping duplicates.
    ///
    /// # Panics
    ///
    /// As for [`Tree::insert`].
    pub fn insert_many<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
    {
        for key in keys {
            self.insert(key);
        }
    }

    /// Replaces the contents of the tree with `keys`, inserted in sequence order.
    pub fn assign<I>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
    {
        self.clear();
        self.insert_many(keys);
        debug!(len = self.size, "assigned tree");
    }

    /// Removes `key` from the tree. Returns how many keys were removed, which is `0` or `1`.
    pub fn erase(&mut self, key: &T) -> usize {
        usize::from(self.extract(key).is_some())
    }

    /// Removes `key` from the tree and hands it back.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::Tree;
    ///
    /// let mut tree: Tree<i32> = [2, 1].into_iter().collect();
    ///
    /// assert_eq!(tree.extract(&2), Some(2));
    /// assert_eq!(tree.extract(&2), None);
    /// assert_eq!(tree.len(), 1);
    /// ```
    pub fn extract(&mut self, key: &T) -> Option<T> {
        let id = self.search(key)?;
        Some(self.remove(id).0)
    }

    /// Removes the key a handle points at and returns a handle to where the cursor would have
    /// moved next, in the handle's own ordering and direction. An off-the-end handle is returned
    /// unchanged.
    ///
    /// Every other handle to the released node goes stale. When the erased node had two
    /// children, the key of its in-order successor moves into it and the successor's node is the
    /// one released; if that successor was the next position, the returned handle points at the
    /// erased node's id, which now holds that key.
    ///
    /// # Errors
    ///
    /// [`Error::ForeignCursor`] or [`Error::StaleCursor`] if the handle is not valid for this
    /// tree. Nothing is removed in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::Tree;
    ///
    /// let mut tree: Tree<i32> = [25, 11, 26].into_iter().collect();
    ///
    /// let at_11 = tree.find(&11).handle();
    /// let next = tree.erase_at(at_11)?;
    ///
    /// assert_eq!(tree.key_at(next), Ok(&25));
    /// assert_eq!(tree.len(), 2);
    /// # Ok::<(), ordtree::Error>(())
    /// ```
    pub fn erase_at(&mut self, handle: CursorHandle) -> Result<CursorHandle> {
        self.check(handle)?;
        let Some(id) = handle.node else {
            return Ok(handle);
        };

        let next = order::step(&self.arena, handle.order, handle.direction, id);
        let (_, released) = self.remove(id);
        let next = match next {
            Some(next) if next == released => Some(id),
            next => next,
        };
        Ok(CursorHandle { node: next, ..handle })
    }

    /// Moves every key of `other` into this tree, in ascending order, skipping keys this tree
    /// already has. `other` is left empty.
    ///
    /// # Errors
    ///
    /// [`Error::AllocatorMismatch`] if the trees were configured with different allocation
    /// strategies. Neither tree is modified in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use ordtree::Tree;
    ///
    /// let mut tree: Tree<i32> = [20, 23, 6, 2, 3, 9, 25].into_iter().collect();
    /// let mut other: Tree<i32> = [40, 11, 2, 45].into_iter().collect();
    ///
    /// tree.merge(&mut other)?;
    ///
    /// assert!(tree.iter().eq(&[2, 3, 6, 9, 11, 20, 23, 25, 40, 45]));
    /// assert!(other.is_empty());
    /// # Ok::<(), ordtree::Error>(())
    /// ```
    pub fn merge(&mut self, other: &mut Tree<T>) -> Result<()> {
        let ours = self.config.strategy;
        let theirs = other.config.strategy;
        if ours != theirs {
            warn!(?ours, ?theirs, "refusing to merge trees with different allocation strategies");
            return Err(Error::AllocatorMismatch { ours, theirs });
        }

        let before = self.size;
        let incoming = other.drain_in_order();
        let offered = incoming.len();
        self.insert_many(incoming);
        debug!(offered, added = self.size - before, "merged trees");
        Ok(())
    }

    /// Checks the structural invariants of the tree, panicking if one is broken:
    ///
    /// - the root has no parent and every child points back at its parent,
    /// - keys are strictly ascending in-order,
    /// - the stored size matches the number of reachable nodes.
    ///
    /// Intended for tests.
    pub fn assert_invariants(&self) {
        let mut reachable = 0;
        let mut stack: Vec<NodeId> = self.root.into_iter().collect();
        if let Some(root) = self.root {
            assert!(self.arena[root].parent.is_none(), "root has a parent");
        }
        while let Some(id) = stack.pop() {
            reachable += 1;
            let node = &self.arena[id];
            for child in [node.left, node.right].into_iter().flatten() {
                assert_eq!(self.arena[child].parent, Some(id), "child does not point at parent");
                stack.push(child);
            }
        }
        assert_eq!(reachable, self.size, "size does not match reachable nodes");
        assert_eq!(self.arena.len(), self.size, "node store holds unreachable nodes");
        assert_eq!(self.count_in_order(), self.size, "in-order walk misses nodes");

        let mut keys = self.iter();
        if let Some(mut previous) = keys.next() {
            for key in keys {
                assert!(previous < key, "in-order keys are not strictly ascending");
                previous = key;
            }
        }
    }
}

impl<T: Clone> Clone for Tree<T> {
    fn clone(&self) -> Self {
        let mut arena = Arena::new(&self.config);
        let root = self.copy_into(&mut arena);
        debug!(len = self.size, "cloned tree");
        Self {
            root,
            size: self.size,
            arena,
            config: self.config,
        }
    }

    /// Copies `source` into this tree, keeping this tree's configuration. Handles into this tree
    /// go stale.
    fn clone_from(&mut self, source: &Self) {
        self.clear();
        self.root = source.copy_into(&mut self.arena);
        self.size = source.size;
        debug!(len = self.size, "copied tree");
    }
}

/// Trees are equal when they hold the same keys in the same shape, that is when their pre-order
/// sequences match. Two trees holding the same keys inserted in a different order may differ.
impl<T: PartialEq> PartialEq for Tree<T> {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size && self.iter_order(Order::Pre).eq(other.iter_order(Order::Pre))
    }
}

impl<T: Eq> Eq for Tree<T> {}

impl<T: fmt::Debug> fmt::Debug for Tree<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: Ord> FromIterator<T> for Tree<T> {
    fn from_iter<I: IntoIterator<Item = T>>(keys: I) -> Self {
        let mut tree = Tree::new();
        tree.insert_many(keys);
        tree
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for Tree<T> {
    fn from(keys: [T; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<T: Ord> Extend<T> for Tree<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, keys: I) {
        self.insert_many(keys);
    }
}

impl<'a, T> IntoIterator for &'a Tree<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T> IntoIterator for Tree<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(mut self) -> IntoIter<T> {
        IntoIter {
            keys: self.drain_in_order().into_iter(),
        }
    }
}

/// Exchanges the contents of two trees. See [`Tree::swap`].
pub fn swap<T>(a: &mut Tree<T>, b: &mut Tree<T>) {
    a.swap(b);
}
