//! The tree engine: insert, search, remove over adaptively encoded nodes.
//!
//! The tree owns its root slot and mutates through `&mut self`; structural
//! replacement of a node is an owned swap behind its slot, performed by the
//! single writer as one logical step. Readers hold `&self`, so the borrow
//! rules keep lookups and mutations from overlapping.

use crate::mapping::ChildSlot;
use crate::node::{common_key_run, key_byte, Leaf, Node, Prefix, MAX_PREFIX_LEN};
use crate::slice::{OwnedSlice, Slice};

/// In-memory ordered index from byte-string keys to byte-string values.
///
/// Keys navigate with an implicit zero terminator, so a key that is a
/// strict prefix of another key gets its own leaf. The one constraint this
/// places on callers: two distinct keys must remain distinct under
/// trailing-zero padding (`"a"` and `"a\0"` cannot coexist).
pub struct AdaptiveRadixTree {
    root: ChildSlot<Box<Node>>,
    size: usize,
}

/// Outcome of inspecting a slot during insertion descent, computed before
/// any mutation so the borrows stay disjoint.
enum Step {
    Empty,
    LeafMatched,
    LeafSplit,
    PathSplit(usize),
    Consumed(usize),
}

impl Default for AdaptiveRadixTree {
    fn default() -> Self {
        Self::new()
    }
}

impl AdaptiveRadixTree {
    pub fn new() -> Self {
        Self {
            root: None,
            size: 0,
        }
    }

    /// Number of distinct live keys.
    pub fn size(&self) -> usize {
        self.size
    }

    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    pub(crate) fn root_node(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    /// Inserts `key` mapping to `value`, overwriting any previous value for
    /// the same key. The key is copied into the leaf; the value is owned by
    /// the tree until overwritten or removed.
    pub fn insert<'k, K, V>(&mut self, key: K, value: V)
    where
        K: Into<Slice<'k>>,
        V: Into<OwnedSlice>,
    {
        let key = key.into();
        let leaf = Node::new_leaf(key.to_owned(), value.into());
        let updated = Self::insert_recurse(&mut self.root, key.as_bytes(), leaf, 0);
        if !updated {
            self.size += 1;
        }
    }

    /// Returns true when an existing key's value was overwritten.
    fn insert_recurse(
        slot: &mut ChildSlot<Box<Node>>,
        key: &[u8],
        leaf: Node,
        depth: usize,
    ) -> bool {
        let step = match slot.as_deref() {
            None => Step::Empty,
            Some(Node::Leaf(existing)) => {
                if existing.matches_from(key, depth) {
                    Step::LeafMatched
                } else {
                    Step::LeafSplit
                }
            }
            Some(node) => {
                let p = node.prefix().common_prefix_len(key, depth);
                if p < node.prefix().len() {
                    Step::PathSplit(p)
                } else {
                    Step::Consumed(p)
                }
            }
        };

        match step {
            Step::Empty => {
                *slot = Some(Box::new(leaf));
                false
            }
            Step::LeafMatched => {
                let Node::Leaf(new_leaf) = leaf else {
                    unreachable!("insertion carries a leaf")
                };
                let Some(Node::Leaf(existing)) = slot.as_deref_mut() else {
                    unreachable!("slot held a matching leaf")
                };
                existing.value = new_leaf.value;
                true
            }
            Step::LeafSplit => {
                let old = slot.take().expect("slot held a leaf");
                let Node::Leaf(old_leaf) = *old else {
                    unreachable!("slot held a leaf")
                };
                let Node::Leaf(new_leaf) = leaf else {
                    unreachable!("insertion carries a leaf")
                };
                *slot = Some(Box::new(Self::join_leaves(old_leaf, new_leaf, depth)));
                false
            }
            Step::PathSplit(p) => {
                // The compressed path diverges from the key at offset p:
                // a new narrow parent keeps the first p bytes, the existing
                // node keeps what follows its (p+1)th byte.
                let mut old = slot.take().expect("slot held an inner node");
                let parent_prefix = old.prefix().front(p);
                let old_byte = old.prefix().at(p);
                old.prefix_mut().strip_front(p + 1);

                let new_byte = key_byte(key, depth + p);
                assert_ne!(
                    old_byte, new_byte,
                    "keys must stay distinct under trailing-zero padding"
                );

                let mut parent = Node::new_inner(parent_prefix);
                parent.add_child(old_byte, *old);
                parent.add_child(new_byte, leaf);
                *slot = Some(Box::new(parent));
                false
            }
            Step::Consumed(p) => {
                let node = slot.as_deref_mut().expect("slot held an inner node");
                let byte = key_byte(key, depth + p);
                if node.find_child(byte).is_none() {
                    if node.is_full() {
                        node.grow();
                    }
                    node.add_child(byte, leaf);
                    return false;
                }
                let child = node.find_slot_mut(byte).expect("child present");
                Self::insert_recurse(child, key, leaf, depth + p + 1)
            }
        }
    }

    /// Joins two non-matching leaves under a new inner path starting at
    /// `depth`. A common run longer than the prefix capacity becomes a chain
    /// of single-child nodes, so a stored prefix never exceeds the capacity.
    fn join_leaves(old: Leaf, new: Leaf, depth: usize) -> Node {
        let run = common_key_run(old.key.as_bytes(), new.key.as_bytes(), depth);
        let ka = old.key.clone();
        if run > MAX_PREFIX_LEN {
            // The byte after the full prefix is still shared: hop over it.
            let prefix = Prefix::from_key(ka.as_bytes(), depth, MAX_PREFIX_LEN);
            let hop_byte = key_byte(ka.as_bytes(), depth + MAX_PREFIX_LEN);
            let mut hop = Node::new_inner(prefix);
            let below = Self::join_leaves(old, new, depth + MAX_PREFIX_LEN + 1);
            hop.add_child(hop_byte, below);
            return hop;
        }
        let kb = new.key.clone();
        let old_byte = key_byte(ka.as_bytes(), depth + run);
        let new_byte = key_byte(kb.as_bytes(), depth + run);
        assert_ne!(
            old_byte, new_byte,
            "keys must stay distinct under trailing-zero padding"
        );

        let prefix = Prefix::from_key(ka.as_bytes(), depth, run);
        let mut parent = Node::new_inner(prefix);
        parent.add_child(old_byte, Node::Leaf(old));
        parent.add_child(new_byte, Node::Leaf(new));
        parent
    }

    /// Looks up `key`, returning a view of its value.
    pub fn search<'k, K>(&self, key: K) -> Option<Slice<'_>>
    where
        K: Into<Slice<'k>>,
    {
        let key = key.into();
        let kb = key.as_bytes();
        let mut node = self.root.as_deref()?;
        let mut depth = 0;
        loop {
            if let Node::Leaf(leaf) = node {
                return leaf.matches_from(kb, depth).then(|| leaf.value.as_slice());
            }
            let p = node.prefix().common_prefix_len(kb, depth);
            if p < node.prefix().len() {
                return None;
            }
            depth += p;
            node = node.find_child(key_byte(kb, depth))?;
            depth += 1;
        }
    }

    /// Removes `key` if present; absent keys are a no-op.
    pub fn remove<'k, K>(&mut self, key: K)
    where
        K: Into<Slice<'k>>,
    {
        let key = key.into();
        let kb = key.as_bytes();

        let root_leaf_matches = matches!(
            self.root.as_deref(),
            Some(Node::Leaf(leaf)) if leaf.matches_from(kb, 0)
        );
        if root_leaf_matches {
            self.root = None;
            self.size -= 1;
            return;
        }

        let Some(root) = self.root.as_deref_mut() else {
            return;
        };
        if root.is_leaf() {
            return;
        }
        if Self::remove_recurse(root, kb, 0) {
            if !root.is_leaf() && root.num_children() == 0 {
                self.root = None;
            }
            self.size -= 1;
        }
    }

    /// Removes the leaf for `key` below the inner node `node`. Returns true
    /// when a leaf was detached.
    fn remove_recurse(node: &mut Node, key: &[u8], depth: usize) -> bool {
        let p = node.prefix().common_prefix_len(key, depth);
        if p < node.prefix().len() {
            return false;
        }
        let byte = key_byte(key, depth + p);

        let (child_is_inner, leaf_matches) = match node.find_child(byte) {
            None => return false,
            Some(Node::Leaf(leaf)) => (false, leaf.matches_from(key, depth + p + 1)),
            Some(_) => (true, false),
        };

        if !child_is_inner {
            if !leaf_matches {
                return false;
            }
            let removed = node.remove_child(byte);
            debug_assert!(removed.is_some());
            return true;
        }

        let child = node.find_child_mut(byte).expect("child present");
        if !Self::remove_recurse(child, key, depth + p + 1) {
            return false;
        }
        // A single-child hop whose subtree just emptied gets pruned here;
        // the parent level above applies the same check in turn.
        let emptied = matches!(
            node.find_child(byte),
            Some(child) if !child.is_leaf() && child.num_children() == 0
        );
        if emptied {
            node.remove_child(byte);
        }
        true
    }
}
