//! An Adaptive Radix Tree: an in-memory ordered index from variable-length
//! byte-string keys to byte-string values.
//!
//! Inner nodes adapt their encoding to their fan-out, stepping through
//! 4-, 16-, 48- and 256-way tiers as children accumulate and back down as
//! they drain. Runs of key bytes with no branching are compressed into
//! per-node prefixes, so lookup cost tracks key length rather than tree
//! population.
//!
//! ```
//! use art_index::AdaptiveRadixTree;
//!
//! let mut tree = AdaptiveRadixTree::new();
//! tree.insert("hello", "world");
//! tree.insert("help", "me");
//!
//! assert_eq!(tree.search("hello").unwrap().as_bytes(), b"world");
//! assert_eq!(tree.search("help").unwrap().as_bytes(), b"me");
//! assert!(tree.search("hel").is_none());
//! assert_eq!(tree.size(), 2);
//!
//! tree.remove("help");
//! assert!(tree.search("help").is_none());
//! ```

mod mapping;
mod node;
pub mod slice;
pub mod stats;
pub mod tree;

pub use node::NodeKind;
pub use slice::{OwnedSlice, Slice};
pub use stats::TreeStats;
pub use tree::AdaptiveRadixTree;
