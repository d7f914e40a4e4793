//! Construction-time settings for a [`Tree`](crate::Tree).

/// How the node store hands out slots for new nodes.
///
/// Both strategies allocate one node per key and release it when the key leaves the tree. They
/// differ in what happens to a released slot. Trees can only exchange nodes through
/// [`Tree::merge`](crate::Tree::merge) when they use the same strategy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum AllocStrategy {
    /// Released slots go on a free list and are reused by later inserts. Each reuse bumps the
    /// slot's generation so cursors into the old node are still detected as stale.
    #[default]
    Recycle,
    /// Released slots are not reused while the tree holds keys, so memory held by the store only
    /// grows until the tree next becomes empty. At that point the store drops its slots and
    /// starts over, and handles taken earlier report [`Error::StaleCursor`](crate::Error).
    Append,
}

/// Settings for a [`Tree`](crate::Tree).
///
/// # Examples
///
/// ```
/// use ordtree::{AllocStrategy, Tree, TreeConfig};
///
/// let config = TreeConfig::new()
///     .with_strategy(AllocStrategy::Append)
///     .with_capacity(64);
/// let mut tree = Tree::with_config(config);
/// tree.insert(1);
///
/// assert_eq!(tree.config().strategy, AllocStrategy::Append);
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TreeConfig {
    /// Slot allocation strategy of the node store.
    pub strategy: AllocStrategy,
    /// Number of nodes to reserve room for up front.
    pub capacity: usize,
}

impl TreeConfig {
    /// The default configuration: recycled slots, nothing reserved.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the allocation strategy.
    pub fn with_strategy(mut self, strategy: AllocStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Sets how many nodes to reserve room for.
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }
}
