//! Read-only introspection of tree shape: per-tier node counts, height,
//! and child-slot density. Gathered by a full walk, so intended for tests
//! and diagnostics rather than hot paths.

use crate::node::{Node, NodeKind};
use crate::tree::AdaptiveRadixTree;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TreeStats {
    pub node4_count: usize,
    pub node16_count: usize,
    pub node48_count: usize,
    pub node256_count: usize,
    pub leaf_count: usize,
    pub value_count: usize,
    pub total_children: usize,
    pub max_height: usize,
}

impl TreeStats {
    pub fn kind_count(&self, kind: NodeKind) -> usize {
        match kind {
            NodeKind::Node4 => self.node4_count,
            NodeKind::Node16 => self.node16_count,
            NodeKind::Node48 => self.node48_count,
            NodeKind::Node256 => self.node256_count,
            NodeKind::Leaf => self.leaf_count,
        }
    }

    pub fn inner_node_count(&self) -> usize {
        self.node4_count + self.node16_count + self.node48_count + self.node256_count
    }

    /// Occupied fraction of all inner-node child slots.
    pub fn density(&self) -> f64 {
        let capacity = self.node4_count * 4
            + self.node16_count * 16
            + self.node48_count * 48
            + self.node256_count * 256;
        if capacity == 0 {
            return 0.0;
        }
        self.total_children as f64 / capacity as f64
    }
}

impl AdaptiveRadixTree {
    /// Walks the whole tree and tallies its shape.
    pub fn stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        if let Some(root) = self.root_node() {
            gather(root, 1, &mut stats);
        }
        stats
    }
}

fn gather(node: &Node, height: usize, stats: &mut TreeStats) {
    stats.max_height = stats.max_height.max(height);
    match node.kind() {
        NodeKind::Node4 => stats.node4_count += 1,
        NodeKind::Node16 => stats.node16_count += 1,
        NodeKind::Node48 => stats.node48_count += 1,
        NodeKind::Node256 => stats.node256_count += 1,
        NodeKind::Leaf => {
            stats.leaf_count += 1;
            stats.value_count += 1;
        }
    }
    stats.total_children += node.num_children();
    node.for_each_child(&mut |child| gather(child, height + 1, stats));
}
