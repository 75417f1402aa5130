//! 256-way tier: child slots indexed directly by key byte.
//!
//! Terminal tier. `is_full()` is hard-wired false, so the engine never asks
//! it to grow.

use crate::mapping::indexed::Indexed;
use crate::mapping::{ChildMapping, ChildSlot};

pub(crate) struct Direct<N> {
    children: Box<[ChildSlot<N>; 256]>,
    num_children: u16,
}

impl<N> Default for Direct<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Direct<N> {
    pub fn new() -> Self {
        Self {
            children: Box::new([const { None }; 256]),
            num_children: 0,
        }
    }

    /// Drains a full 48-way tier into a fresh direct one, placing each child
    /// at its byte index.
    pub fn from_indexed(old: &mut Indexed<N>) -> Self {
        let mut new = Self::new();
        for (key, child) in old.drain() {
            new.children[key as usize] = Some(child);
            new.num_children += 1;
        }
        new
    }

    /// Detaches every child in ascending byte order.
    pub fn drain(&mut self) -> impl Iterator<Item = (u8, N)> + '_ {
        (0usize..256).filter_map(move |byte| {
            let child = self.children[byte].take()?;
            self.num_children -= 1;
            Some((byte as u8, child))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &N)> {
        self.children
            .iter()
            .enumerate()
            .filter_map(|(byte, slot)| slot.as_ref().map(|c| (byte as u8, c)))
    }
}

impl<N> ChildMapping<N> for Direct<N> {
    fn width(&self) -> usize {
        256
    }

    fn add_child(&mut self, key: u8, child: N) {
        debug_assert!(self.children[key as usize].is_none());
        self.children[key as usize] = Some(child);
        self.num_children += 1;
    }

    fn find_child(&self, key: u8) -> Option<&N> {
        self.children[key as usize].as_ref()
    }

    fn find_slot_mut(&mut self, key: u8) -> Option<&mut ChildSlot<N>> {
        if self.children[key as usize].is_none() {
            return None;
        }
        Some(&mut self.children[key as usize])
    }

    fn remove_child(&mut self, key: u8) -> Option<N> {
        let child = self.children[key as usize].take();
        if child.is_some() {
            self.num_children -= 1;
        }
        child
    }

    fn num_children(&self) -> usize {
        self.num_children as usize
    }

    /// Terminal tier; never reports full, never grows.
    fn is_full(&self) -> bool {
        false
    }
}
