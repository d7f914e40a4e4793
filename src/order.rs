//! Step rules for walking a tree in one of the three depth-first orderings.
//!
//! Every function here works purely from the links of the node it is given (its children and its
//! parent) so a cursor can move one step in either direction without a stack and without going
//! back to the root. `None` stands for the off-the-end position.
//!
//! Several rules are mirror images of each other, which is why most helpers take a [`Side`]:
//!
//! | ordering   | forward                      | backward                     |
//! |------------|------------------------------|------------------------------|
//! | in-order   | `in_order_step(Right)`       | `in_order_step(Left)`        |
//! | pre-order  | `dive(Left)`                 | `rise(Left)`                 |
//! | post-order | `rise(Right)`                | `dive(Right)`                |

use crate::arena::{Arena, NodeId};
use crate::util::Side;

/// One of the three depth-first orderings of a binary tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Order {
    /// Left subtree, node, right subtree. Visits keys in ascending order.
    In,
    /// Node, left subtree, right subtree.
    Pre,
    /// Left subtree, right subtree, node.
    Post,
}

impl Order {
    /// All orderings, handy for exhaustive checks.
    pub const ALL: [Order; 3] = [Order::In, Order::Pre, Order::Post];
}

/// Which way a cursor's `move_next` walks through its ordering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// From the ordering's first node towards its last.
    #[default]
    Forward,
    /// From the ordering's last node towards its first.
    Reverse,
}

impl Direction {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            Self::Forward => Self::Reverse,
            Self::Reverse => Self::Forward,
        }
    }
}

/// The node following `id` in `order`.
pub(crate) fn successor<T>(arena: &Arena<T>, order: Order, id: NodeId) -> Option<NodeId> {
    match order {
        Order::In => in_order_step(arena, id, Side::Right),
        Order::Pre => dive(arena, id, Side::Left),
        Order::Post => rise(arena, id, Side::Right),
    }
}

/// The node preceding `id` in `order`.
pub(crate) fn predecessor<T>(arena: &Arena<T>, order: Order, id: NodeId) -> Option<NodeId> {
    match order {
        Order::In => in_order_step(arena, id, Side::Left),
        Order::Pre => rise(arena, id, Side::Left),
        Order::Post => dive(arena, id, Side::Right),
    }
}

/// One step in `direction`: forward cursors follow the ordering, reverse cursors walk it back.
pub(crate) fn step<T>(
    arena: &Arena<T>,
    order: Order,
    direction: Direction,
    id: NodeId,
) -> Option<NodeId> {
    match direction {
        Direction::Forward => successor(arena, order, id),
        Direction::Reverse => predecessor(arena, order, id),
    }
}

/// The first node of `order` in the tree rooted at `root`.
pub(crate) fn first<T>(arena: &Arena<T>, order: Order, root: Option<NodeId>) -> Option<NodeId> {
    let root = root?;
    Some(match order {
        Order::In => extreme(arena, root, Side::Left),
        Order::Pre => root,
        Order::Post => leaf_from(arena, root, Side::Left),
    })
}

/// The last node of `order` in the tree rooted at `root`.
pub(crate) fn last<T>(arena: &Arena<T>, order: Order, root: Option<NodeId>) -> Option<NodeId> {
    let root = root?;
    Some(match order {
        Order::In => extreme(arena, root, Side::Right),
        Order::Pre => leaf_from(arena, root, Side::Right),
        Order::Post => root,
    })
}

/// Where a cursor walking in `direction` starts.
pub(crate) fn start<T>(
    arena: &Arena<T>,
    order: Order,
    direction: Direction,
    root: Option<NodeId>,
) -> Option<NodeId> {
    match direction {
        Direction::Forward => first(arena, order, root),
        Direction::Reverse => last(arena, order, root),
    }
}

/// Follows `side` links from `id` as far as they go. `Left` finds the subtree's minimum, `Right`
/// its maximum.
pub(crate) fn extreme<T>(arena: &Arena<T>, mut id: NodeId, side: Side) -> NodeId {
    while let Some(child) = arena[id].child(side) {
        id = child;
    }
    id
}

/// Descends from `id` to a leaf, preferring `side` and taking the other child only when `side` is
/// missing. Preferring `Left` finds the subtree's first post-order node, preferring `Right` its
/// last pre-order node.
fn leaf_from<T>(arena: &Arena<T>, mut id: NodeId, side: Side) -> NodeId {
    loop {
        let node = &arena[id];
        match node.child(side).or_else(|| node.child(side.opposite())) {
            Some(child) => id = child,
            None => return id,
        }
    }
}

/// In-order step towards `side`: the nearest node on that side of `id`.
fn in_order_step<T>(arena: &Arena<T>, id: NodeId, side: Side) -> Option<NodeId> {
    if let Some(child) = arena[id].child(side) {
        return Some(extreme(arena, child, side.opposite()));
    }

    // No subtree on that side, so the answer is the first ancestor we reach from the other side.
    let mut current = id;
    while let Some(parent) = arena[current].parent {
        if arena[parent].child(side) != Some(current) {
            return Some(parent);
        }
        current = parent;
    }
    None
}

/// Visits children before climbing: goes to the `first` child, else the other child, else climbs
/// until an ancestor has an unvisited subtree on the `first.opposite()` side and moves into it.
///
/// `dive(Left)` is the pre-order successor and `dive(Right)` the post-order predecessor.
fn dive<T>(arena: &Arena<T>, id: NodeId, first: Side) -> Option<NodeId> {
    let node = &arena[id];
    if let Some(child) = node.child(first).or_else(|| node.child(first.opposite())) {
        return Some(child);
    }

    let second = first.opposite();
    let mut current = id;
    while let Some(parent) = arena[current].parent {
        match arena[parent].child(second) {
            Some(sibling) if sibling != current => return Some(sibling),
            _ => current = parent,
        }
    }
    None
}

/// Moves towards the parent: if `id` is its parent's `side` child, or the parent has no `side`
/// child, the answer is the parent itself. Otherwise it is the leaf reached from the `side`
/// sibling preferring `side.opposite()`.
///
/// `rise(Right)` is the post-order successor and `rise(Left)` the pre-order predecessor.
fn rise<T>(arena: &Arena<T>, id: NodeId, side: Side) -> Option<NodeId> {
    let parent = arena[id].parent?;
    match arena[parent].child(side) {
        Some(sibling) if sibling != id => Some(leaf_from(arena, sibling, side.opposite())),
        _ => Some(parent),
    }
}
