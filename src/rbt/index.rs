// Module ``index`` implement a [red-black tree][rbt] for ordered,
// unique keys.
//
// Nodes are held in an arena owned by the [Index], child and parent links
// are offsets into that arena. The parent link is a plain back-reference,
// ownership flows only from the index to its arena.
//
// [Index] is single threaded, mutations take `&mut self` and reads take
// `&self`. Applications sharing an index across threads shall wrap it
// inside a lock of their choice.
//
// [rbt]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use std::{borrow::Borrow, cmp::Ordering, fmt, io, mem};

use crate::{
    err_at,
    rbt::{Depth, Node, NodeRef, Stats},
    Result,
};

/// Paths longer than this are reported as fatal by `validate()`.
pub const MAX_TREE_DEPTH: usize = 128;

/// Outcome of [Index::insert].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Insert {
    /// Key was added to the index.
    Inserted,
    /// Key was already present, index is left untouched.
    AlreadyExists,
}

impl Insert {
    pub fn is_inserted(&self) -> bool {
        matches!(self, Insert::Inserted)
    }
}

/// Index type for ordered, unique keys, backed by a red-black tree.
#[derive(Clone)]
pub struct Index<K> {
    name: String,
    root: Option<usize>,
    nodes: Vec<Node<K>>,
}

impl<K> Index<K> {
    pub fn new(name: &str) -> Index<K> {
        Index {
            name: name.to_string(),
            root: None,
            nodes: Vec::default(),
        }
    }
}

impl<K> Index<K> {
    /// Return number of keys in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Return whether index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Return a read-only handle to the root node, None if index is empty.
    pub fn as_root(&self) -> Option<NodeRef<K>> {
        self.root.map(|id| NodeRef {
            nodes: &self.nodes,
            id,
        })
    }

    /// Return the tree height, refer to [height].
    pub fn to_height(&self) -> usize {
        height(self.as_root())
    }

    /// Return the black-height of root, refer to [black_height].
    pub fn to_black_height(&self) -> usize {
        black_height(self.as_root())
    }

    /// Iterate over all keys in ascending order. Each call starts a fresh
    /// walk from the root.
    pub fn iter(&self) -> Iter<K> {
        let mut iter = Iter {
            nodes: &self.nodes,
            stack: Vec::default(),
        };
        iter.push_left(self.root);
        iter
    }

    /// Return statistics computed from the current shape of the tree.
    /// Depth distribution is available only from [Index::validate].
    pub fn to_stats(&self) -> Stats {
        let mut stats = Stats::new(&self.name);
        stats.node_size = mem::size_of::<Node<K>>();
        stats.n_count = self.len();
        stats.height = self.to_height();
        stats.blacks = self.to_black_height();
        stats
    }
}

impl<K> Index<K>
where
    K: Ord,
{
    /// Insert `key` into index. If key is already present the index is left
    /// untouched and [Insert::AlreadyExists] is returned.
    pub fn insert(&mut self, key: K) -> Insert {
        let (mut parent, mut is_left) = (None, false);

        let mut curr = self.root;
        while let Some(id) = curr {
            parent = Some(id);
            let node = &self.nodes[id];
            curr = match key.cmp(&node.key) {
                Ordering::Less => {
                    is_left = true;
                    node.left
                }
                Ordering::Greater => {
                    is_left = false;
                    node.right
                }
                Ordering::Equal => return Insert::AlreadyExists,
            };
        }

        let id = self.nodes.len();
        self.nodes.push(Node::new(key, parent));
        match parent {
            None => self.root = Some(id),
            Some(p) if is_left => self.nodes[p].left = Some(id),
            Some(p) => self.nodes[p].right = Some(id),
        }

        fix_insert(&mut self.nodes, &mut self.root, id);

        Insert::Inserted
    }

    /// Get the key from index, that compares equal to `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut curr = self.root;
        while let Some(id) = curr {
            let node = &self.nodes[id];
            curr = match node.key.borrow().cmp(key) {
                Ordering::Less => node.right,
                Ordering::Greater => node.left,
                Ordering::Equal => return Some(&node.key),
            };
        }
        None
    }

    #[inline]
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.get(key).is_some()
    }

    /// Validate red-black tree invariants:
    ///
    /// * Root node is always black in color.
    /// * No consecutive red nodes on any path.
    /// * Same number of black nodes on every path to an absent child.
    /// * Keys are in strictly ascending order, in-order.
    /// * Every child's parent link points back to the node holding it.
    /// * Longest path to an absent child is within twice the shortest.
    ///
    /// On success return [Stats] along with the depth distribution.
    pub fn validate(&self) -> Result<Stats>
    where
        K: fmt::Debug,
    {
        if let Some(root) = self.root {
            let node = &self.nodes[root];
            if node.is_red() {
                err_at!(Fatal, msg: "root node must be black")?;
            }
            if node.parent.is_some() {
                err_at!(Fatal, msg: "root node has a parent {:?}", node.parent)?;
            }
        }

        let mut depths = Depth::default();
        let (blacks, n_count) =
            validate_tree(&self.nodes, self.root, None, false, 0, 0, &mut depths)?;

        if n_count != self.nodes.len() {
            err_at!(Fatal, msg: "reachable {} != {}", n_count, self.nodes.len())?;
        }
        if blacks != self.to_black_height() {
            let bh = self.to_black_height();
            err_at!(Fatal, msg: "black height {} != leftmost {}", blacks, bh)?;
        }
        if !depths.is_balanced() {
            let (min, max) = (depths.to_min(), depths.to_max());
            err_at!(Fatal, msg: "unbalanced paths min:{} max:{}", min, max)?;
        }

        let mut prev: Option<&K> = None;
        for key in self.iter() {
            match prev {
                Some(prev) if prev.ge(key) => {
                    err_at!(Fatal, msg: "sort order {:?} >= {:?}", prev, key)?;
                }
                _ => (),
            }
            prev = Some(key);
        }

        let mut stats = self.to_stats();
        stats.depths = Some(depths);
        Ok(stats)
    }
}

impl<K> Index<K>
where
    K: fmt::Display,
{
    /// Pre-order dump of the tree, one node per line, with its color and
    /// an indentation reflecting its depth. Meant for diagnostics.
    pub fn pretty_print<W>(&self, w: &mut W) -> Result<()>
    where
        W: io::Write,
    {
        match self.root {
            Some(root) => print_node(&self.nodes, Some(root), "", true, w),
            None => err_at!(IOError, writeln!(w, "Tree is empty")),
        }
    }
}

impl<'a, K> IntoIterator for &'a Index<K> {
    type Item = &'a K;
    type IntoIter = Iter<'a, K>;

    fn into_iter(self) -> Iter<'a, K> {
        self.iter()
    }
}

/// Return number of nodes on the longest path from `node` to an absent
/// child. ZERO for an absent node.
pub fn height<K>(node: Option<NodeRef<K>>) -> usize {
    let mut stack: Vec<(NodeRef<K>, usize)> = node.into_iter().map(|n| (n, 1)).collect();

    let mut max = 0;
    while let Some((node, depth)) = stack.pop() {
        max = usize::max(max, depth);
        stack.extend(node.as_left().map(|n| (n, depth + 1)));
        stack.extend(node.as_right().map(|n| (n, depth + 1)));
    }
    max
}

/// Return number of black nodes, including `node`, along the leftmost path
/// to an absent child. Same as any other path for a valid tree.
pub fn black_height<K>(node: Option<NodeRef<K>>) -> usize {
    let (mut blacks, mut node) = (0, node);
    while let Some(nref) = node {
        if nref.is_black() {
            blacks += 1;
        }
        node = nref.as_left();
    }
    blacks
}

/// Return number of nodes in the sub-tree rooted at `node`.
pub fn size<K>(node: Option<NodeRef<K>>) -> usize {
    let mut stack: Vec<NodeRef<K>> = node.into_iter().collect();

    let mut n = 0;
    while let Some(node) = stack.pop() {
        n += 1;
        stack.extend(node.as_left());
        stack.extend(node.as_right());
    }
    n
}

#[inline]
fn is_red<K>(nodes: &[Node<K>], id: Option<usize>) -> bool {
    id.map_or(false, |id| nodes[id].is_red())
}

// Restore root-is-black and no-consecutive-reds after `node` is linked
// in as a red leaf. Only a red parent can break them.
fn fix_insert<K>(nodes: &mut [Node<K>], root: &mut Option<usize>, mut node: usize) {
    loop {
        let parent = match nodes[node].parent {
            Some(parent) if nodes[parent].is_red() => parent,
            _ => break,
        };
        // red parent is never the root, hence grand is always there.
        let grand = match nodes[parent].parent {
            Some(grand) => grand,
            None => break,
        };

        let parent_is_left = nodes[grand].left == Some(parent);
        let uncle = match parent_is_left {
            true => nodes[grand].right,
            false => nodes[grand].left,
        };

        if is_red(nodes, uncle) {
            nodes[parent].set_black();
            if let Some(uncle) = uncle {
                nodes[uncle].set_black();
            }
            nodes[grand].set_red();
            node = grand;
            continue;
        }

        // bring inner grand-child to the outside, parent and node swap roles.
        let (child, parent) = match parent_is_left {
            true if nodes[parent].right == Some(node) => {
                rotate_left(nodes, root, parent);
                (parent, node)
            }
            false if nodes[parent].left == Some(node) => {
                rotate_right(nodes, root, parent);
                (parent, node)
            }
            _ => (node, parent),
        };

        nodes[parent].set_black();
        nodes[grand].set_red();
        match parent_is_left {
            true => rotate_right(nodes, root, grand),
            false => rotate_left(nodes, root, grand),
        }
        node = child;
    }

    if let Some(root) = *root {
        nodes[root].set_black();
    }
}

//              (i)                       (i)
//               |                         |
//             pivot                     child
//              /  \                      / \
//             /    \                    /   \
//            /      \                  /     \
//          left    child           pivot     c-r
//                   / \            /  \
//                 c-l c-r       left  c-l
//
fn rotate_left<K>(nodes: &mut [Node<K>], root: &mut Option<usize>, pivot: usize) {
    debug_assert!(nodes[pivot].right.is_some(), "rotate_left(): no right child");
    let child = match nodes[pivot].right {
        Some(child) => child,
        None => return,
    };

    let inner = nodes[child].left;
    nodes[pivot].right = inner;
    if let Some(inner) = inner {
        nodes[inner].parent = Some(pivot);
    }

    replace_child(nodes, root, pivot, child);

    nodes[child].left = Some(pivot);
    nodes[pivot].parent = Some(child);
}

//              (i)                       (i)
//               |                         |
//             pivot                     child
//              /  \                      / \
//             /    \                    /   \
//            /      \                  /     \
//         child    right            c-l     pivot
//          / \                               / \
//        c-l c-r                          c-r  right
//
fn rotate_right<K>(nodes: &mut [Node<K>], root: &mut Option<usize>, pivot: usize) {
    debug_assert!(nodes[pivot].left.is_some(), "rotate_right(): no left child");
    let child = match nodes[pivot].left {
        Some(child) => child,
        None => return,
    };

    let inner = nodes[child].right;
    nodes[pivot].left = inner;
    if let Some(inner) = inner {
        nodes[inner].parent = Some(pivot);
    }

    replace_child(nodes, root, pivot, child);

    nodes[child].right = Some(pivot);
    nodes[pivot].parent = Some(child);
}

// Move `child` into the position held by `pivot`, under pivot's parent or
// as the new root.
fn replace_child<K>(
    nodes: &mut [Node<K>],
    root: &mut Option<usize>,
    pivot: usize,
    child: usize,
) {
    let up = nodes[pivot].parent;
    nodes[child].parent = up;
    match up {
        None => *root = Some(child),
        Some(up) if nodes[up].left == Some(pivot) => nodes[up].left = Some(child),
        Some(up) => nodes[up].right = Some(child),
    }
}

fn print_node<K, W>(
    nodes: &[Node<K>],
    id: Option<usize>,
    indent: &str,
    last: bool,
    w: &mut W,
) -> Result<()>
where
    K: fmt::Display,
    W: io::Write,
{
    let node = match id {
        Some(id) => &nodes[id],
        None => return Ok(()),
    };

    let branch = if last { "R----" } else { "L----" };
    err_at!(
        IOError,
        writeln!(w, "{}{}{}({})", indent, branch, node.key, node.color)
    )?;

    let indent = format!("{}{}", indent, if last { "   " } else { "|  " });
    print_node(nodes, node.left, &indent, false, w)?;
    print_node(nodes, node.right, &indent, true, w)
}

// Return (black-count, node-count) for the sub-tree at `id`, black-count
// includes every black node from root down to an absent child.
fn validate_tree<K>(
    nodes: &[Node<K>],
    id: Option<usize>,
    parent: Option<usize>,
    fromred: bool,
    mut n_blacks: usize,
    depth: usize,
    depths: &mut Depth,
) -> Result<(usize, usize)>
where
    K: Ord + fmt::Debug,
{
    let (id, node) = match id {
        Some(id) => (id, &nodes[id]),
        None => {
            depths.sample(depth);
            return Ok((n_blacks, 0));
        }
    };

    if node.parent != parent {
        let (k, p) = (&node.key, node.parent);
        err_at!(Fatal, msg: "key {:?} parent {:?} != {:?}", k, p, parent)?;
    }
    if node.left.is_some() && node.left == node.right {
        err_at!(Fatal, msg: "key {:?} same left and right child", node.key)?;
    }

    let red = node.is_red();
    if fromred && red {
        err_at!(Fatal, msg: "consecutive reds at {:?}", node.key)?;
    }
    if !red {
        n_blacks += 1;
    }

    if depth > MAX_TREE_DEPTH {
        err_at!(Fatal, msg: "tree exceeds max_depth {}", depth)?;
    }

    if let Some(left) = node.left {
        if nodes[left].key.ge(&node.key) {
            let (lk, nk) = (&nodes[left].key, &node.key);
            err_at!(Fatal, msg: "left:{:?}, parent:{:?}", lk, nk)?;
        }
    }
    if let Some(right) = node.right {
        if nodes[right].key.le(&node.key) {
            let (rk, nk) = (&nodes[right].key, &node.key);
            err_at!(Fatal, msg: "right:{:?}, parent:{:?}", rk, nk)?;
        }
    }

    let p = Some(id);
    let (lb, lc) = validate_tree(nodes, node.left, p, red, n_blacks, depth + 1, depths)?;
    let (rb, rc) = validate_tree(nodes, node.right, p, red, n_blacks, depth + 1, depths)?;

    if lb != rb {
        err_at!(Fatal, msg: "unbalanced blacks l:{}, r:{} at {:?}", lb, rb, node.key)?;
    }

    Ok((lb, lc + rc + 1))
}

/// Iterator type, to walk the index in ascending key order.
pub struct Iter<'a, K> {
    nodes: &'a [Node<K>],
    stack: Vec<usize>,
}

impl<'a, K> Iter<'a, K> {
    fn push_left(&mut self, mut id: Option<usize>) {
        while let Some(i) = id {
            self.stack.push(i);
            id = self.nodes[i].left;
        }
    }
}

impl<'a, K> Iterator for Iter<'a, K> {
    type Item = &'a K;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        let node = &self.nodes[id];
        self.push_left(node.right);
        Some(&node.key)
    }
}

#[cfg(test)]
#[path = "index_test.rs"]
mod index_test;
