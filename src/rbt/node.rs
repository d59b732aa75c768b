use std::fmt;

/// Color of a node. Absent children count as black.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Color::Red => write!(f, "RED"),
            Color::Black => write!(f, "BLACK"),
        }
    }
}

// Node corresponds to a single key in Index instance. Links are offsets
// into the index's node arena.
#[derive(Clone)]
pub struct Node<K> {
    pub key: K,
    pub color: Color,
    pub parent: Option<usize>, // back-link, not owning
    pub left: Option<usize>,   // store: left child
    pub right: Option<usize>,  // store: right child
}

impl<K> Node<K> {
    /// New nodes are always red.
    pub fn new(key: K, parent: Option<usize>) -> Node<K> {
        Node {
            key,
            color: Color::Red,
            parent,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub fn set_red(&mut self) {
        self.color = Color::Red
    }

    #[inline]
    pub fn set_black(&mut self) {
        self.color = Color::Black
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }
}

/// Read-only handle to a node inside an [Index], obtained from
/// [Index::as_root] and by walking its children.
///
/// [Index]: crate::rbt::Index
/// [Index::as_root]: crate::rbt::Index::as_root
pub struct NodeRef<'a, K> {
    pub(crate) nodes: &'a [Node<K>],
    pub(crate) id: usize,
}

impl<'a, K> Clone for NodeRef<'a, K> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, K> Copy for NodeRef<'a, K> {}

impl<'a, K> NodeRef<'a, K> {
    #[inline]
    fn as_node(&self) -> &'a Node<K> {
        &self.nodes[self.id]
    }

    #[inline]
    fn to_ref(&self, id: Option<usize>) -> Option<NodeRef<'a, K>> {
        id.map(|id| NodeRef {
            nodes: self.nodes,
            id,
        })
    }

    pub fn as_key(&self) -> &'a K {
        &self.as_node().key
    }

    pub fn to_color(&self) -> Color {
        self.as_node().color
    }

    pub fn is_black(&self) -> bool {
        self.as_node().is_black()
    }

    pub fn is_red(&self) -> bool {
        self.as_node().is_red()
    }

    pub fn as_left(&self) -> Option<NodeRef<'a, K>> {
        self.to_ref(self.as_node().left)
    }

    pub fn as_right(&self) -> Option<NodeRef<'a, K>> {
        self.to_ref(self.as_node().right)
    }

    pub fn as_parent(&self) -> Option<NodeRef<'a, K>> {
        self.to_ref(self.as_node().parent)
    }
}

impl<'a, K> fmt::Debug for NodeRef<'a, K>
where
    K: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}({})", self.as_key(), self.to_color())
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
