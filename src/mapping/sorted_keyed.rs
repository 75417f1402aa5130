//! 4- and 16-way tiers: parallel sorted `keys`/`children` arrays.
//!
//! Keys stay sorted ascending with no duplicates; insert shifts higher
//! entries right, remove shifts them left. Lookup is a linear scan for the
//! narrow width and a binary search for the wide one.

use crate::mapping::indexed::Indexed;
use crate::mapping::{ChildMapping, ChildSlot};

pub(crate) struct SortedKeyed<N, const WIDTH: usize> {
    keys: [u8; WIDTH],
    children: Box<[ChildSlot<N>; WIDTH]>,
    num_children: u8,
}

impl<N, const WIDTH: usize> Default for SortedKeyed<N, WIDTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, const WIDTH: usize> SortedKeyed<N, WIDTH> {
    pub fn new() -> Self {
        Self {
            keys: [0; WIDTH],
            children: Box::new([const { None }; WIDTH]),
            num_children: 0,
        }
    }

    /// Drains another sorted tier of a different width into a fresh one.
    /// Covers both the 4 to 16 growth and the 16 to 4 shrink.
    pub fn from_resized<const OLD_WIDTH: usize>(old: &mut SortedKeyed<N, OLD_WIDTH>) -> Self {
        debug_assert!(old.num_children as usize <= WIDTH);
        let mut new = Self::new();
        for i in 0..old.num_children as usize {
            new.keys[i] = old.keys[i];
            new.children[i] = old.children[i].take();
        }
        new.num_children = old.num_children;
        old.num_children = 0;
        new
    }

    /// Drains a 48-way tier into a fresh 16-way one. Walking the index table
    /// in byte order yields the children already sorted.
    pub fn from_indexed(old: &mut Indexed<N>) -> Self {
        debug_assert!(old.num_children() <= WIDTH);
        let mut new = Self::new();
        for (key, child) in old.drain() {
            let i = new.num_children as usize;
            new.keys[i] = key;
            new.children[i] = Some(child);
            new.num_children += 1;
        }
        new
    }

    /// Key and a borrow of the only child. Panics unless exactly one child is
    /// present.
    pub fn only_child(&self) -> (u8, &N) {
        debug_assert_eq!(self.num_children, 1);
        let child = self.children[0].as_ref().expect("child slot occupied");
        (self.keys[0], child)
    }

    /// Key and ownership of the only child, leaving the tier empty.
    pub fn take_only_child(&mut self) -> (u8, N) {
        debug_assert_eq!(self.num_children, 1);
        let child = self.children[0].take().expect("child slot occupied");
        self.num_children = 0;
        (self.keys[0], child)
    }

    /// Detaches every child in ascending key order.
    pub fn drain(&mut self) -> impl Iterator<Item = (u8, N)> + '_ {
        let n = self.num_children as usize;
        (0..n).filter_map(move |i| {
            let child = self.children[i].take()?;
            self.num_children -= 1;
            Some((self.keys[i], child))
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = (u8, &N)> {
        self.keys[..self.num_children as usize]
            .iter()
            .zip(self.children.iter())
            .map(|(k, c)| (*k, c.as_ref().expect("child slot occupied")))
    }

    fn key_position(&self, key: u8) -> Option<usize> {
        let live = &self.keys[..self.num_children as usize];
        if WIDTH <= 4 {
            live.iter().position(|k| *k == key)
        } else {
            live.binary_search(&key).ok()
        }
    }

    fn insert_position(&self, key: u8) -> usize {
        self.keys[..self.num_children as usize]
            .iter()
            .position(|k| *k > key)
            .unwrap_or(self.num_children as usize)
    }
}

impl<N, const WIDTH: usize> ChildMapping<N> for SortedKeyed<N, WIDTH> {
    fn width(&self) -> usize {
        WIDTH
    }

    fn add_child(&mut self, key: u8, child: N) {
        debug_assert!(!self.is_full());
        debug_assert!(self.key_position(key).is_none());
        let idx = self.insert_position(key);
        for i in (idx..self.num_children as usize).rev() {
            self.keys[i + 1] = self.keys[i];
            self.children[i + 1] = self.children[i].take();
        }
        self.keys[idx] = key;
        self.children[idx] = Some(child);
        self.num_children += 1;
    }

    fn find_child(&self, key: u8) -> Option<&N> {
        let idx = self.key_position(key)?;
        self.children[idx].as_ref()
    }

    fn find_slot_mut(&mut self, key: u8) -> Option<&mut ChildSlot<N>> {
        let idx = self.key_position(key)?;
        Some(&mut self.children[idx])
    }

    fn remove_child(&mut self, key: u8) -> Option<N> {
        let idx = self.key_position(key)?;
        let child = self.children[idx].take();
        for i in idx..self.num_children as usize - 1 {
            self.keys[i] = self.keys[i + 1];
            self.children[i] = self.children[i + 1].take();
        }
        self.keys[self.num_children as usize - 1] = 0;
        self.num_children -= 1;
        child
    }

    fn num_children(&self) -> usize {
        self.num_children as usize
    }
}

#[cfg(test)]
mod tests {
    use crate::mapping::sorted_keyed::SortedKeyed;
    use crate::mapping::{ChildMapping, ChildSlot};

    #[test]
    fn add_find_remove() {
        let mut m = SortedKeyed::<u8, 4>::new();
        m.add_child(3, 30);
        m.add_child(1, 10);
        m.add_child(4, 40);
        m.add_child(2, 20);
        assert_eq!(m.num_children(), 4);
        assert!(m.is_full());
        assert_eq!(m.find_child(1), Some(&10));
        assert_eq!(m.find_child(2), Some(&20));
        assert_eq!(m.find_child(3), Some(&30));
        assert_eq!(m.find_child(4), Some(&40));
        assert_eq!(m.find_child(5), None);
        assert_eq!(m.remove_child(2), Some(20));
        assert_eq!(m.remove_child(2), None);
        assert_eq!(m.find_child(2), None);
        assert_eq!(m.find_child(4), Some(&40));
        assert_eq!(m.num_children(), 3);
    }

    #[test]
    fn keys_stay_sorted() {
        let mut m = SortedKeyed::<u8, 16>::new();
        for key in [9u8, 3, 12, 0, 7, 255, 1] {
            m.add_child(key, key);
        }
        let collected: Vec<u8> = m.iter().map(|(k, _)| k).collect();
        assert_eq!(collected, vec![0, 1, 3, 7, 9, 12, 255]);
    }

    #[test]
    fn resize_preserves_children() {
        let mut small = SortedKeyed::<u8, 4>::new();
        for key in [2u8, 4, 1, 3] {
            small.add_child(key, key + 100);
        }
        let grown = SortedKeyed::<u8, 16>::from_resized(&mut small);
        assert_eq!(small.num_children(), 0);
        assert_eq!(grown.num_children(), 4);
        for key in 1u8..=4 {
            assert_eq!(grown.find_child(key), Some(&(key + 100)));
        }
    }

    #[test]
    fn slot_access_allows_replacement() {
        let mut m = SortedKeyed::<u8, 4>::new();
        m.add_child(7, 70);
        let slot: &mut ChildSlot<u8> = m.find_slot_mut(7).unwrap();
        *slot = Some(71);
        assert_eq!(m.find_child(7), Some(&71));
        assert!(m.find_slot_mut(8).is_none());
    }
}
