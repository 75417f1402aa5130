//! Per-tier child storage for inner nodes.
//!
//! Each tier holds up to `width()` children in pointer-sized slots. A slot is
//! either empty or owns exactly one child, so structural replacement is a
//! plain `Option` swap.

pub(crate) mod direct;
pub(crate) mod indexed;
pub(crate) mod sorted_keyed;

/// A child slot: empty, or owning one live child.
pub(crate) type ChildSlot<N> = Option<N>;

/// Contract shared by the four inner-node tiers.
pub(crate) trait ChildMapping<N> {
    /// Capacity of this tier.
    fn width(&self) -> usize;

    /// Adds a child under `key`. The key must not already be present and the
    /// tier must not be full.
    fn add_child(&mut self, key: u8, child: N);

    fn find_child(&self, key: u8) -> Option<&N>;

    /// Mutable access to the slot holding `key`'s child. Returns `Some` only
    /// for an occupied slot.
    fn find_slot_mut(&mut self, key: u8) -> Option<&mut ChildSlot<N>>;

    /// Detaches and returns the child under `key`, if any.
    fn remove_child(&mut self, key: u8) -> Option<N>;

    fn num_children(&self) -> usize;

    fn is_full(&self) -> bool {
        self.num_children() == self.width()
    }
}
