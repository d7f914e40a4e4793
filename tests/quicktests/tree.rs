use ordtree::{AllocStrategy, Order, Tree, TreeConfig};
use quickcheck_macros::quickcheck;

use std::collections::{BTreeSet, HashSet};

use crate::Op;

/// Applies a set of operations to a tree and a `BTreeSet`.
/// This way we can ensure that after a random smattering of inserts
/// and deletes we have the same set of keys in both.
fn do_ops<K>(ops: &[Op<K>], bst: &mut Tree<K>, set: &mut BTreeSet<K>)
where
    K: Ord + Clone + std::fmt::Debug,
{
    for op in ops {
        match op {
            Op::Insert(k) => {
                let (_, inserted) = bst.insert(k.clone());
                assert_eq!(inserted, set.insert(k.clone()));
            }
            Op::Remove(k) => {
                assert_eq!(bst.erase(k), usize::from(set.remove(k)));
            }
            Op::Extract(k) => {
                assert_eq!(bst.extract(k), set.take(k));
            }
            Op::Iter(order) => {
                let forward: Vec<_> = bst.iter_order(*order).collect();
                let mut backward: Vec<_> = bst.iter_order(*order).rev().collect();
                backward.reverse();
                assert_eq!(forward, backward);
            }
        }
        assert_eq!(bst.len(), set.len());
    }
}

/// Collects keys by stepping a cursor from its begin to its end.
fn walk(tree: &Tree<i16>, order: Order, reverse: bool) -> Vec<i16> {
    let (mut cursor, end) = if reverse {
        (tree.rbegin(order), tree.rend(order))
    } else {
        (tree.begin(order), tree.end(order))
    };
    let mut keys = Vec::with_capacity(tree.len());
    while cursor != end {
        keys.push(*cursor.key().unwrap());
        cursor.move_next().unwrap();
    }
    keys
}

#[quickcheck]
fn fuzz_multiple_operations_i16(ops: Vec<Op<i16>>) -> bool {
    let mut tree = Tree::new();
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set);
    tree.assert_invariants();
    tree.len() == set.len() && tree.iter().eq(set.iter())
}

#[quickcheck]
fn fuzz_multiple_operations_append(ops: Vec<Op<i8>>) -> bool {
    let mut tree = Tree::with_config(TreeConfig::new().with_strategy(AllocStrategy::Append));
    let mut set = BTreeSet::new();

    do_ops(&ops, &mut tree, &mut set);
    tree.assert_invariants();
    tree.iter().eq(set.iter())
}

#[quickcheck]
fn contains(xs: Vec<i8>) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();

    xs.iter().all(|x| tree.contains(x))
}

#[quickcheck]
fn contains_not(xs: Vec<i8>, nots: Vec<i8>) -> bool {
    let tree: Tree<i8> = xs.iter().copied().collect();
    let added: HashSet<_> = xs.into_iter().collect();
    let nots: HashSet<_> = nots.into_iter().collect();
    let mut nots = nots.difference(&added);

    nots.all(|x| tree.find(x) == tree.end(Order::In))
}

#[quickcheck]
fn with_deletions(xs: Vec<i8>, deletes: Vec<i8>) -> bool {
    let mut tree: Tree<i8> = xs.iter().copied().collect();
    for delete in &deletes {
        tree.erase(delete);
    }

    let mut still_present = xs;
    for delete in &deletes {
        // We may have inserted the same value multiple times - delete each one.
        while let Some(pos) = still_present.iter().position(|x| x == delete) {
            still_present.swap_remove(pos);
        }
    }

    tree.assert_invariants();
    deletes.iter().all(|x| !tree.contains(x)) && still_present.iter().all(|x| tree.contains(x))
}

#[quickcheck]
fn in_order_is_sorted(xs: Vec<i16>) -> bool {
    let tree: Tree<i16> = xs.iter().copied().collect();
    let sorted: BTreeSet<i16> = xs.into_iter().collect();

    walk(&tree, Order::In, false) == sorted.into_iter().collect::<Vec<_>>()
}

#[quickcheck]
fn reverse_cursors_mirror_forward_cursors(xs: Vec<i16>) -> bool {
    let tree: Tree<i16> = xs.into_iter().collect();

    Order::ALL.into_iter().all(|order| {
        let mut forward = walk(&tree, order, false);
        forward.reverse();
        forward == walk(&tree, order, true) && forward.len() == tree.len()
    })
}

#[quickcheck]
fn duplicate_insert_changes_nothing(xs: Vec<i16>, key: i16) -> bool {
    let mut tree: Tree<i16> = xs.into_iter().collect();
    tree.insert(key);
    let before = tree.clone();

    let (_, inserted) = tree.insert(key);
    !inserted && tree == before
}

#[quickcheck]
fn extract_then_insert_restores_keys(xs: Vec<i16>, key: i16) -> bool {
    let mut tree: Tree<i16> = xs.into_iter().collect();
    tree.insert(key);
    let before: Vec<i16> = tree.iter().copied().collect();

    let extracted = tree.extract(&key);
    let missing = !tree.contains(&key);
    tree.insert(key);

    extracted == Some(key) && missing && tree.iter().copied().eq(before)
}

#[quickcheck]
fn equality_is_reflexive_and_symmetric(xs: Vec<i8>, ys: Vec<i8>) -> bool {
    let a: Tree<i8> = xs.into_iter().collect();
    let b: Tree<i8> = ys.into_iter().collect();

    a == a && (a == b) == (b == a)
}

#[quickcheck]
fn insertion_order_never_changes_the_key_set(xs: Vec<i8>) -> bool {
    let forward: Tree<i8> = xs.iter().copied().collect();
    let backward: Tree<i8> = xs.iter().rev().copied().collect();

    forward.iter().eq(backward.iter())
}

#[quickcheck]
fn merge_is_set_union(xs: Vec<i8>, ys: Vec<i8>) -> bool {
    let mut a: Tree<i8> = xs.iter().copied().collect();
    let mut b: Tree<i8> = ys.iter().copied().collect();
    let union: BTreeSet<i8> = xs.into_iter().chain(ys).collect();

    a.merge(&mut b).unwrap();
    a.assert_invariants();
    b.is_empty() && a.iter().eq(union.iter())
}
