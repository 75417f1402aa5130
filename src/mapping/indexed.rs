//! 48-way tier: a 256-entry byte index into a packed array of child slots.
//!
//! `index[byte]` holds `position + 1` into `children`, with 0 meaning absent.
//! Adds take the first free packed position; the packed array is never
//! compacted, so positions freed by removals are reused.

use crate::mapping::direct::Direct;
use crate::mapping::sorted_keyed::SortedKeyed;
use crate::mapping::{ChildMapping, ChildSlot};

pub(crate) struct Indexed<N> {
    index: Box<[u8; 256]>,
    children: Box<[ChildSlot<N>; 48]>,
    num_children: u8,
}

impl<N> Default for Indexed<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Indexed<N> {
    pub fn new() -> Self {
        Self {
            index: Box::new([0; 256]),
            children: Box::new([const { None }; 48]),
            num_children: 0,
        }
    }

    /// Drains a full 16-way tier into a fresh 48-way one.
    pub fn from_sorted(old: &mut SortedKeyed<N, 16>) -> Self {
        let mut new = Self::new();
        for (key, child) in old.drain() {
            let pos = new.num_children;
            new.index[key as usize] = pos + 1;
            new.children[pos as usize] = Some(child);
            new.num_children += 1;
        }
        new
    }

    /// Drains an underfilled 256-way tier into a fresh 48-way one.
    pub fn from_direct(old: &mut Direct<N>) -> Self {
        debug_assert!(old.num_children() <= 48);
        let mut new = Self::new();
        for (key, child) in old.drain() {
            let pos = new.num_children;
            new.index[key as usize] = pos + 1;
            new.children[pos as usize] = Some(child);
            new.num_children += 1;
        }
        new
    }

    /// Detaches every child in ascending byte order.
    pub fn drain(&mut self) -> impl Iterator<Item = (u8, N)> + '_ {
        (0usize..256).filter_map(move |byte| {
            let pos = self.index[byte];
            if pos == 0 {
                return None;
            }
            self.index[byte] = 0;
            let child = self.children[pos as usize - 1].take()?;
            self.num_children -= 1;
            Some((byte as u8, child))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &N)> {
        (0usize..256).filter_map(move |byte| {
            let pos = self.index[byte];
            if pos == 0 {
                return None;
            }
            self.children[pos as usize - 1]
                .as_ref()
                .map(|c| (byte as u8, c))
        })
    }
}

impl<N> ChildMapping<N> for Indexed<N> {
    fn width(&self) -> usize {
        48
    }

    fn add_child(&mut self, key: u8, child: N) {
        debug_assert!(!self.is_full());
        debug_assert_eq!(self.index[key as usize], 0);
        let pos = self
            .children
            .iter()
            .position(|slot| slot.is_none())
            .expect("tier not full");
        self.index[key as usize] = pos as u8 + 1;
        self.children[pos] = Some(child);
        self.num_children += 1;
    }

    fn find_child(&self, key: u8) -> Option<&N> {
        let pos = self.index[key as usize];
        if pos == 0 {
            return None;
        }
        self.children[pos as usize - 1].as_ref()
    }

    fn find_slot_mut(&mut self, key: u8) -> Option<&mut ChildSlot<N>> {
        let pos = self.index[key as usize];
        if pos == 0 {
            return None;
        }
        Some(&mut self.children[pos as usize - 1])
    }

    fn remove_child(&mut self, key: u8) -> Option<N> {
        let pos = self.index[key as usize];
        if pos == 0 {
            return None;
        }
        self.index[key as usize] = 0;
        let child = self.children[pos as usize - 1].take();
        if child.is_some() {
            self.num_children -= 1;
        }
        child
    }

    fn num_children(&self) -> usize {
        self.num_children as usize
    }
}

#[cfg(test)]
mod tests {
    use crate::mapping::indexed::Indexed;
    use crate::mapping::sorted_keyed::SortedKeyed;
    use crate::mapping::ChildMapping;

    #[test]
    fn add_find_remove() {
        let mut m = Indexed::<u16>::new();
        for key in 0u8..48 {
            m.add_child(key, key as u16 * 2);
        }
        assert_eq!(m.num_children(), 48);
        assert!(m.is_full());
        for key in 0u8..48 {
            assert_eq!(m.find_child(key), Some(&(key as u16 * 2)));
        }
        assert_eq!(m.find_child(200), None);
        assert_eq!(m.remove_child(17), Some(34));
        assert_eq!(m.remove_child(17), None);
        assert_eq!(m.num_children(), 47);
        assert!(!m.is_full());
    }

    #[test]
    fn freed_positions_are_reused() {
        let mut m = Indexed::<u16>::new();
        for key in 0u8..48 {
            m.add_child(key, key as u16);
        }
        assert_eq!(m.remove_child(5), Some(5));
        m.add_child(99, 990);
        assert!(m.is_full());
        assert_eq!(m.find_child(99), Some(&990));
        assert_eq!(m.find_child(5), None);
    }

    #[test]
    fn from_sorted_preserves_children() {
        let mut sorted = SortedKeyed::<u16, 16>::new();
        for key in (0u8..16).rev() {
            sorted.add_child(key * 10, key as u16);
        }
        let m = Indexed::from_sorted(&mut sorted);
        assert_eq!(sorted.num_children(), 0);
        assert_eq!(m.num_children(), 16);
        for key in 0u8..16 {
            assert_eq!(m.find_child(key * 10), Some(&(key as u16)));
        }
    }

    #[test]
    fn drain_yields_byte_order() {
        let mut m = Indexed::<u16>::new();
        for key in [200u8, 3, 77] {
            m.add_child(key, key as u16);
        }
        let drained: Vec<u8> = m.drain().map(|(k, _)| k).collect();
        assert_eq!(drained, vec![3, 77, 200]);
        assert_eq!(m.num_children(), 0);
    }
}
