//! Property tests comparing [`ordtree::Tree`] against `std::collections::BTreeSet`.

mod tree;

use ordtree::Order;
use quickcheck::{Arbitrary, Gen};

/// An enum for the various kinds of "things" to do to
/// a tree in a quicktest.
#[derive(Copy, Clone, Debug)]
pub(crate) enum Op<K> {
    /// Insert the K into the tree
    Insert(K),
    /// Remove the K from the tree
    Remove(K),
    /// Extract the K from the tree
    Extract(K),
    /// Compare iterators in an ordering
    Iter(Order),
}

impl<K> Arbitrary for Op<K>
where
    K: Arbitrary,
{
    /// Tells quickcheck how to randomly choose an operation
    fn arbitrary(g: &mut Gen) -> Self {
        match g.choose(&[0, 1, 2, 3]).unwrap() {
            0 => Op::Insert(K::arbitrary(g)),
            1 => Op::Remove(K::arbitrary(g)),
            2 => Op::Extract(K::arbitrary(g)),
            3 => Op::Iter(*g.choose(&Order::ALL).unwrap()),
            _ => unreachable!(),
        }
    }
}
