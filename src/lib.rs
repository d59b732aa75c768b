//! Package implement a red-black tree index for ordered, unique keys and a
//! persistent word dictionary built on top of it.
//!
//! [rbt::Index] is the core, it supports insert, lookup, in-order
//! iteration and structural queries like height, black-height and size.
//! Every successful insert keeps the red-black invariants intact:
//!
//! * Root node is always black.
//! * A red node never has a red child.
//! * Every path from a node to its absent children carries the same number
//!   of black nodes.
//!
//! Which bounds the tree height to `2 * log2(n + 1)` for `n` keys.
//!
//! Inserting a key that is already present is not an error, it is reported
//! as [rbt::Insert::AlreadyExists] and leaves the index untouched.
//!
//! [dict::Dict] keeps words in an `Index<String>` and persists them to a
//! text file, one word per line, in sorted order.

#[macro_use]
mod error;

pub mod dict;
pub mod rbt;
pub mod util;

pub use crate::error::{Error, Result};
