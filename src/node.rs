//! Tree nodes: the four adaptive inner tiers plus the leaf.
//!
//! Inner nodes carry a compressed prefix of up to [`MAX_PREFIX_LEN`] bytes;
//! longer shared runs are represented by chains of single-child nodes, built
//! when leaves split. Leaves own a full copy of their key alongside the
//! value, so descent never has to reconstruct key bytes from the path.

use crate::mapping::direct::Direct;
use crate::mapping::indexed::Indexed;
use crate::mapping::sorted_keyed::SortedKeyed;
use crate::mapping::{ChildMapping, ChildSlot};
use crate::slice::OwnedSlice;

/// Physical capacity of the per-node compressed prefix.
pub(crate) const MAX_PREFIX_LEN: usize = 8;

/// Key byte at `pos`, reading positions at or past the end as 0. The
/// implicit zero terminator is what gives a key that is a strict prefix of
/// another key its own leaf position.
#[inline(always)]
pub(crate) fn key_byte(key: &[u8], pos: usize) -> u8 {
    if pos < key.len() {
        key[pos]
    } else {
        0
    }
}

/// Length of the common run of two keys' terminated byte streams, starting
/// at `depth`. Bounded so that two keys equal under zero padding cannot
/// produce an unbounded run.
pub(crate) fn common_key_run(a: &[u8], b: &[u8], depth: usize) -> usize {
    let cap = (a.len().max(b.len()) + 1).saturating_sub(depth);
    let mut n = 0;
    while n < cap && key_byte(a, depth + n) == key_byte(b, depth + n) {
        n += 1;
    }
    n
}

/// Compressed prefix: a run of key bytes shared by every key below a node.
#[derive(Clone, Default)]
pub(crate) struct Prefix {
    len: u8,
    data: [u8; MAX_PREFIX_LEN],
}

impl Prefix {
    /// Captures `len` bytes of `key` starting at `depth`, zero-padded past
    /// the key's end.
    pub fn from_key(key: &[u8], depth: usize, len: usize) -> Self {
        debug_assert!(len <= MAX_PREFIX_LEN);
        let mut data = [0; MAX_PREFIX_LEN];
        for (i, b) in data.iter_mut().enumerate().take(len) {
            *b = key_byte(key, depth + i);
        }
        Self {
            len: len as u8,
            data,
        }
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len as usize
    }

    #[inline(always)]
    pub fn at(&self, pos: usize) -> u8 {
        debug_assert!(pos < self.len());
        self.data[pos]
    }

    /// A new prefix holding only the first `n` bytes of this one.
    pub fn front(&self, n: usize) -> Self {
        debug_assert!(n <= self.len());
        let mut data = [0; MAX_PREFIX_LEN];
        data[..n].copy_from_slice(&self.data[..n]);
        Self { len: n as u8, data }
    }

    /// Drops the first `n` bytes, shifting the remainder down.
    pub fn strip_front(&mut self, n: usize) {
        debug_assert!(n <= self.len());
        let len = self.len();
        let remaining = len - n;
        self.data.copy_within(n..len, 0);
        for b in &mut self.data[remaining..] {
            *b = 0;
        }
        self.len = remaining as u8;
    }

    /// How many stored prefix bytes match `key` starting at `depth`, under
    /// the zero-terminated read.
    pub fn common_prefix_len(&self, key: &[u8], depth: usize) -> usize {
        let mut n = 0;
        while n < self.len() && self.data[n] == key_byte(key, depth + n) {
            n += 1;
        }
        n
    }

    /// Concatenation `parent ++ [byte] ++ child`, when it fits the capacity.
    pub fn merged(parent: &Prefix, byte: u8, child: &Prefix) -> Option<Prefix> {
        let total = parent.len() + 1 + child.len();
        if total > MAX_PREFIX_LEN {
            return None;
        }
        let mut data = [0; MAX_PREFIX_LEN];
        data[..parent.len()].copy_from_slice(&parent.data[..parent.len()]);
        data[parent.len()] = byte;
        data[parent.len() + 1..total].copy_from_slice(&child.data[..child.len()]);
        Some(Prefix {
            len: total as u8,
            data,
        })
    }
}

/// Inner-node header plus the tier-specific child storage.
pub(crate) struct Inner<M> {
    pub prefix: Prefix,
    pub children: M,
}

pub(crate) struct Leaf {
    pub key: OwnedSlice,
    pub value: OwnedSlice,
}

impl Leaf {
    /// Full-key match: equal total length and byte-equal from `depth` on.
    /// The length check is what keeps a strict-prefix key from
    /// misclassifying as a match.
    pub fn matches_from(&self, key: &[u8], depth: usize) -> bool {
        if self.key.len() != key.len() {
            return false;
        }
        let d = depth.min(key.len());
        self.key.as_bytes()[d..] == key[d..]
    }
}

/// Node tier tags, exposed for introspection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Node4,
    Node16,
    Node48,
    Node256,
    Leaf,
}

pub(crate) enum Node {
    Node4(Inner<SortedKeyed<Box<Node>, 4>>),
    Node16(Inner<SortedKeyed<Box<Node>, 16>>),
    Node48(Inner<Indexed<Box<Node>>>),
    Node256(Inner<Direct<Box<Node>>>),
    Leaf(Leaf),
}

impl Node {
    pub fn new_leaf(key: OwnedSlice, value: OwnedSlice) -> Self {
        Node::Leaf(Leaf { key, value })
    }

    /// A fresh narrowest-tier inner node with the given prefix.
    pub fn new_inner(prefix: Prefix) -> Self {
        Node::Node4(Inner {
            prefix,
            children: SortedKeyed::new(),
        })
    }

    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Node4(_) => NodeKind::Node4,
            Node::Node16(_) => NodeKind::Node16,
            Node::Node48(_) => NodeKind::Node48,
            Node::Node256(_) => NodeKind::Node256,
            Node::Leaf(_) => NodeKind::Leaf,
        }
    }

    #[inline(always)]
    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn prefix(&self) -> &Prefix {
        match self {
            Node::Node4(inner) => &inner.prefix,
            Node::Node16(inner) => &inner.prefix,
            Node::Node48(inner) => &inner.prefix,
            Node::Node256(inner) => &inner.prefix,
            Node::Leaf(_) => unreachable!("leaves have no prefix"),
        }
    }

    pub fn prefix_mut(&mut self) -> &mut Prefix {
        match self {
            Node::Node4(inner) => &mut inner.prefix,
            Node::Node16(inner) => &mut inner.prefix,
            Node::Node48(inner) => &mut inner.prefix,
            Node::Node256(inner) => &mut inner.prefix,
            Node::Leaf(_) => unreachable!("leaves have no prefix"),
        }
    }

    pub fn find_child(&self, key: u8) -> Option<&Node> {
        let child = match self {
            Node::Node4(inner) => inner.children.find_child(key),
            Node::Node16(inner) => inner.children.find_child(key),
            Node::Node48(inner) => inner.children.find_child(key),
            Node::Node256(inner) => inner.children.find_child(key),
            Node::Leaf(_) => None,
        };
        child.map(|c| &**c)
    }

    pub fn find_child_mut(&mut self, key: u8) -> Option<&mut Node> {
        self.find_slot_mut(key).and_then(|slot| slot.as_deref_mut())
    }

    pub fn find_slot_mut(&mut self, key: u8) -> Option<&mut ChildSlot<Box<Node>>> {
        match self {
            Node::Node4(inner) => inner.children.find_slot_mut(key),
            Node::Node16(inner) => inner.children.find_slot_mut(key),
            Node::Node48(inner) => inner.children.find_slot_mut(key),
            Node::Node256(inner) => inner.children.find_slot_mut(key),
            Node::Leaf(_) => None,
        }
    }

    /// Adds `child` under `key`. The caller grows a full node first.
    pub fn add_child(&mut self, key: u8, child: Node) {
        debug_assert!(!self.is_full());
        let child = Box::new(child);
        match self {
            Node::Node4(inner) => inner.children.add_child(key, child),
            Node::Node16(inner) => inner.children.add_child(key, child),
            Node::Node48(inner) => inner.children.add_child(key, child),
            Node::Node256(inner) => inner.children.add_child(key, child),
            Node::Leaf(_) => unreachable!("leaves have no children"),
        }
    }

    pub fn is_full(&self) -> bool {
        match self {
            Node::Node4(inner) => inner.children.is_full(),
            Node::Node16(inner) => inner.children.is_full(),
            Node::Node48(inner) => inner.children.is_full(),
            Node::Node256(inner) => inner.children.is_full(),
            Node::Leaf(_) => unreachable!("leaves have no children"),
        }
    }

    pub fn num_children(&self) -> usize {
        match self {
            Node::Node4(inner) => inner.children.num_children(),
            Node::Node16(inner) => inner.children.num_children(),
            Node::Node48(inner) => inner.children.num_children(),
            Node::Node256(inner) => inner.children.num_children(),
            Node::Leaf(_) => 0,
        }
    }

    /// Replaces this node with its next-wider tier, keeping prefix and
    /// children.
    pub fn grow(&mut self) {
        let grown = match self {
            Node::Node4(inner) => {
                let prefix = std::mem::take(&mut inner.prefix);
                let children = SortedKeyed::from_resized(&mut inner.children);
                Node::Node16(Inner { prefix, children })
            }
            Node::Node16(inner) => {
                let prefix = std::mem::take(&mut inner.prefix);
                let children = Indexed::from_sorted(&mut inner.children);
                Node::Node48(Inner { prefix, children })
            }
            Node::Node48(inner) => {
                let prefix = std::mem::take(&mut inner.prefix);
                let children = Direct::from_indexed(&mut inner.children);
                Node::Node256(Inner { prefix, children })
            }
            Node::Node256(_) => unreachable!("widest tier never grows"),
            Node::Leaf(_) => unreachable!("leaves have no children"),
        };
        *self = grown;
    }

    /// Detaches the child under `key`, then shrinks this node if it fell
    /// below its tier's threshold.
    pub fn remove_child(&mut self, key: u8) -> Option<Box<Node>> {
        let removed = match self {
            Node::Node4(inner) => inner.children.remove_child(key),
            Node::Node16(inner) => inner.children.remove_child(key),
            Node::Node48(inner) => inner.children.remove_child(key),
            Node::Node256(inner) => inner.children.remove_child(key),
            Node::Leaf(_) => None,
        };
        if removed.is_some() {
            self.shrink();
        }
        removed
    }

    /// Moves to the next-narrower tier when underfilled. A 4-way node left
    /// with a single child collapses into that child where the merged prefix
    /// fits; otherwise the single-child hop is kept.
    fn shrink(&mut self) {
        match self {
            Node::Node4(inner) if inner.children.num_children() == 1 => {
                let merged = {
                    let (byte, child) = inner.children.only_child();
                    match &**child {
                        Node::Leaf(_) => Some(None),
                        other => Prefix::merged(&inner.prefix, byte, other.prefix()).map(Some),
                    }
                };
                if let Some(new_prefix) = merged {
                    let (_, mut child) = inner.children.take_only_child();
                    if let Some(p) = new_prefix {
                        *child.prefix_mut() = p;
                    }
                    *self = *child;
                }
            }
            Node::Node16(inner) if inner.children.num_children() < 5 => {
                let prefix = std::mem::take(&mut inner.prefix);
                let children = SortedKeyed::from_resized(&mut inner.children);
                *self = Node::Node4(Inner { prefix, children });
            }
            Node::Node48(inner) if inner.children.num_children() < 17 => {
                let prefix = std::mem::take(&mut inner.prefix);
                let children = SortedKeyed::from_indexed(&mut inner.children);
                *self = Node::Node16(Inner { prefix, children });
            }
            Node::Node256(inner) if inner.children.num_children() < 49 => {
                let prefix = std::mem::take(&mut inner.prefix);
                let children = Indexed::from_direct(&mut inner.children);
                *self = Node::Node48(Inner { prefix, children });
            }
            _ => {}
        }
    }

    /// Visits every direct child, in ascending key-byte order.
    pub fn for_each_child(&self, f: &mut dyn FnMut(&Node)) {
        match self {
            Node::Node4(inner) => {
                for (_, c) in inner.children.iter() {
                    f(c);
                }
            }
            Node::Node16(inner) => {
                for (_, c) in inner.children.iter() {
                    f(c);
                }
            }
            Node::Node48(inner) => {
                for (_, c) in inner.children.iter() {
                    f(c);
                }
            }
            Node::Node256(inner) => {
                for (_, c) in inner.children.iter() {
                    f(c);
                }
            }
            Node::Leaf(_) => {}
        }
    }
}
