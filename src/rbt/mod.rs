//! Module implement a red-black tree, with parent links, for ordered
//! unique keys.

mod depth;
mod index;
mod node;
mod stats;

pub use depth::Depth;
pub use index::{black_height, height, size, Index, Insert, Iter, MAX_TREE_DEPTH};
pub use node::{Color, NodeRef};
pub use stats::Stats;

use node::Node;
