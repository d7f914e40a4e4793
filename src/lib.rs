//! This crate exposes an ordered set backed by an unbalanced Binary Search Tree (BST) whose
//! cursors can walk the tree in any of the three depth-first orderings, in either direction.
//!
//! ## Binary Search Tree
//!
//! A Binary Search Tree is a data structure supporting operations to
//! insert, find, and delete stored records. BSTs are typically defined
//! recursively using the notion of a `Node`. Here a `Node` stores a single key
//! and links to up to two child `Node`s and to its parent. The most important
//! invariants of a BST are:
//!
//! 1. For every `Node` in a BST, all the `Node`s in its left subtree have a
//!    key less than its own key.
//! 2. For every `Node` in a BST, all the `Node`s in its right subtree have a
//!    key greater than its own key.
//!
//! > Note that some `Node`s have no children. These `Node`s are called "leaf nodes".
//!
//! Searching for a key takes `O(height)`. This tree does not rebalance, so inserting keys in
//! sorted order builds a chain whose height equals the number of keys. Nothing in the crate
//! recurses on the height of the tree, so such chains are slow but safe.
//!
//! ## Traversals
//!
//! Besides the sorted (in-order) traversal, the tree can be walked pre-order (node, left,
//! right) and post-order (left, right, node). Cursors step through any of these from the parent
//! and child links of the node they sit on, without keeping a stack, so they can go forwards and
//! backwards at any point:
//!
//! ```
//! use ordtree::{Order, Tree};
//!
//! let tree: Tree<i32> = [15, 5, 16, 3, 8].into_iter().collect();
//!
//! assert!(tree.iter_order(Order::In).eq(&[3, 5, 8, 15, 16]));
//! assert!(tree.iter_order(Order::Pre).eq(&[15, 5, 3, 8, 16]));
//! assert!(tree.iter_order(Order::Post).eq(&[3, 8, 5, 16, 15]));
//!
//! let mut cursor = tree.rbegin(Order::Pre);
//! assert_eq!(cursor.key(), Ok(&16));
//! cursor.move_next()?;
//! assert_eq!(cursor.key(), Ok(&8));
//! # Ok::<(), ordtree::Error>(())
//! ```
//!
//! Nodes live in a generation-checked store, so a [`CursorHandle`] kept across a deletion is
//! reported as stale instead of reading a freed node.

#![deny(missing_docs, clippy::clone_on_ref_ptr)]

mod arena;
pub mod config;
pub mod cursor;
pub mod error;
pub mod order;
pub mod tree;
mod util;


pub use config::{AllocStrategy, TreeConfig};
pub use cursor::{Cursor, CursorHandle, IntoIter, Iter};
pub use error::{Error, Result};
pub use order::{Direction, Order};
pub use tree::{swap, Tree};
