//! The node store backing a [`Tree`](crate::Tree).
//!
//! Every key lives in its own [`Node`] inside a slot of an [`Arena`]. Nodes refer to each other
//! through [`NodeId`]s: the `left` and `right` links are the owning direction of the tree and the
//! `parent` link is a plain back-reference used to walk upwards. Because ids are just indices, no
//! link keeps a node alive and there are no ownership cycles.
//!
//! Each slot carries a generation that is bumped whenever its node is released. A [`NodeId`]
//! records the generation it was issued with, so looking up an id whose node has since been
//! released fails instead of silently reading whatever node now occupies the slot. A slot whose
//! generation would wrap is retired rather than reused.
//!
//! An [`AllocStrategy::Append`] store never reuses slots while it holds nodes. Once its last node
//! is released it starts over from an empty slot vector under a new [`StoreId`] epoch, so ids
//! handed out before that point can still be told apart.

use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::config::{AllocStrategy, TreeConfig};
use crate::util::Side;

/// Source of [`StoreId`]s. Every arena ever created gets a distinct one.
static NEXT_STORE_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies one arena so that ids and cursors from another tree can be rejected. The epoch
/// changes whenever the arena drops its slots and starts over.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct StoreId {
    store: u64,
    epoch: u64,
}

impl StoreId {
    fn fresh() -> Self {
        Self {
            store: NEXT_STORE_ID.fetch_add(1, Ordering::Relaxed),
            epoch: 0,
        }
    }

    fn next_epoch(self) -> Self {
        Self {
            epoch: self.epoch + 1,
            ..self
        }
    }

    /// Whether both ids name the same arena, in any epoch.
    pub(crate) fn same_store(self, other: StoreId) -> bool {
        self.store == other.store
    }
}

/// A generation-checked reference to a node slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) struct NodeId {
    index: u32,
    generation: u32,
}

pub(crate) struct Node<T> {
    pub(crate) key: T,
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) parent: Option<NodeId>,
}

impl<T> Node<T> {
    /// A leaf hanging off `parent`.
    pub(crate) fn leaf(key: T, parent: Option<NodeId>) -> Self {
        Self {
            key,
            left: None,
            right: None,
            parent,
        }
    }

    pub(crate) fn child(&self, side: Side) -> Option<NodeId> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub(crate) fn child_mut(&mut self, side: Side) -> &mut Option<NodeId> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }
}

enum Slot<T> {
    Occupied {
        generation: u32,
        node: Node<T>,
    },
    Vacant {
        generation: u32,
        next_free: Option<u32>,
    },
}

pub(crate) struct Arena<T> {
    slots: Vec<Slot<T>>,
    free_head: Option<u32>,
    len: usize,
    strategy: AllocStrategy,
    id: StoreId,
}

impl<T> Arena<T> {
    pub(crate) fn new(config: &TreeConfig) -> Self {
        Self {
            slots: Vec::with_capacity(config.capacity),
            free_head: None,
            len: 0,
            strategy: config.strategy,
            id: StoreId::fresh(),
        }
    }

    pub(crate) fn id(&self) -> StoreId {
        self.id
    }

    /// Number of live nodes.
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    /// Moves `node` into a slot and returns its id.
    ///
    /// # Panics
    ///
    /// When the arena already holds `u32::MAX` slots.
    pub(crate) fn alloc(&mut self, node: Node<T>) -> NodeId {
        self.len += 1;
        if let Some(index) = self.free_head {
            let slot = &mut self.slots[index as usize];
            let Slot::Vacant {
                generation,
                next_free,
            } = *slot
            else {
                unreachable!("free list points at an occupied slot");
            };
            self.free_head = next_free;
            *slot = Slot::Occupied { generation, node };
            return NodeId { index, generation };
        }

        let index = u32::try_from(self.slots.len()).expect("node store exhausted");
        self.slots.push(Slot::Occupied {
            generation: 0,
            node,
        });
        NodeId {
            index,
            generation: 0,
        }
    }

    /// Releases the node behind `id` and hands it back. The slot's generation is bumped so `id`
    /// and any copies of it are stale from now on.
    ///
    /// A recycled slot goes back on the free list unless its generation is exhausted, in which
    /// case it stays vacant for good. An append store that becomes empty starts over, see
    /// [`Arena::restart`].
    ///
    /// # Panics
    ///
    /// When `id` is already stale.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<T> {
        let reusable = self.strategy == AllocStrategy::Recycle && id.generation < u32::MAX;
        let next_free = if reusable { self.free_head } else { None };
        let slot = &mut self.slots[id.index as usize];
        match slot {
            Slot::Occupied { generation, .. } if *generation == id.generation => {}
            _ => panic!("released a node that is not in the store: {id:?}"),
        }
        let vacant = Slot::Vacant {
            generation: id.generation.saturating_add(1),
            next_free,
        };
        let Slot::Occupied { node, .. } = std::mem::replace(slot, vacant) else {
            unreachable!("slot was checked to be occupied");
        };
        if reusable {
            self.free_head = Some(id.index);
        }
        self.len -= 1;
        if self.len == 0 && self.strategy == AllocStrategy::Append {
            self.restart();
        }
        node
    }

    /// Drops every slot and moves to a new epoch. Only valid once no node is live.
    fn restart(&mut self) {
        debug_assert_eq!(self.len, 0);
        self.slots.clear();
        self.free_head = None;
        self.id = self.id.next_epoch();
    }

    /// Number of slots ever handed out in the current epoch, live or not.
    #[cfg(test)]
    pub(crate) fn slot_count(&self) -> usize {
        self.slots.len()
    }

    /// Looks up a node, returning `None` if `id` is stale.
    pub(crate) fn get(&self, id: NodeId) -> Option<&Node<T>> {
        match self.slots.get(id.index as usize)? {
            Slot::Occupied { generation, node } if *generation == id.generation => Some(node),
            _ => None,
        }
    }

    pub(crate) fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<T>> {
        match self.slots.get_mut(id.index as usize)? {
            Slot::Occupied { generation, node } if *generation == id.generation => Some(node),
            _ => None,
        }
    }
}

impl<T> Index<NodeId> for Arena<T> {
    type Output = Node<T>;

    fn index(&self, id: NodeId) -> &Node<T> {
        self.get(id).expect("tree links only point at live nodes")
    }
}

impl<T> IndexMut<NodeId> for Arena<T> {
    fn index_mut(&mut self, id: NodeId) -> &mut Node<T> {
        self.get_mut(id).expect("tree links only point at live nodes")
    }
}
