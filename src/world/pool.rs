//! Fixed-capacity entity arena.
//!
//! Every live entity is tagged with the chunk that spawned it, so a chunk
//! leaving the window is retired with one linear scan. Slots are reused,
//! never reallocated, and a [`SlotId`] stays valid for as long as its
//! owning chunk stays loaded.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub usize);

#[derive(Clone, Debug, PartialEq)]
struct Slot<T> {
    chunk: i32,
    item: T,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Pool<T> {
    slots: Box<[Option<Slot<T>>]>,
}

impl<T> Pool<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: (0..capacity).map(|_| None).collect(),
        }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Put `item` in the first free slot. `None` when the pool is full.
    pub fn spawn(&mut self, chunk: i32, item: T) -> Option<SlotId> {
        let idx = self.slots.iter().position(Option::is_none)?;
        self.slots[idx] = Some(Slot { chunk, item });
        Some(SlotId(idx))
    }

    /// Free every slot owned by `chunk`; returns how many were freed.
    pub fn retire_chunk(&mut self, chunk: i32) -> usize {
        let mut freed = 0;
        for slot in self.slots.iter_mut() {
            if slot.as_ref().is_some_and(|s| s.chunk == chunk) {
                *slot = None;
                freed += 1;
            }
        }
        freed
    }

    /// Free one slot regardless of its owner.
    pub fn release(&mut self, id: SlotId) -> Option<T> {
        self.slots.get_mut(id.0)?.take().map(|s| s.item)
    }

    pub fn clear(&mut self) {
        self.slots.iter_mut().for_each(|s| *s = None);
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.slots.get(id.0)?.as_ref().map(|s| &s.item)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.slots.get_mut(id.0)?.as_mut().map(|s| &mut s.item)
    }

    /// Chunk that owns the entity in `id`.
    pub fn owner(&self, id: SlotId) -> Option<i32> {
        self.slots.get(id.0)?.as_ref().map(|s| s.chunk)
    }

    /// Live entities in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|s| (SlotId(i), &s.item)))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (SlotId, &mut T)> + '_ {
        self.slots
            .iter_mut()
            .enumerate()
            .filter_map(|(i, s)| s.as_mut().map(|s| (SlotId(i), &mut s.item)))
    }

    /// Live entities owned by `chunk`.
    pub fn owned_by(&self, chunk: i32) -> impl Iterator<Item = (SlotId, &T)> + '_ {
        self.slots.iter().enumerate().filter_map(move |(i, s)| match s {
            Some(s) if s.chunk == chunk => Some((SlotId(i), &s.item)),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_uses_first_free_slot() {
        let mut p = Pool::new(3);
        assert_eq!(p.spawn(0, 'a'), Some(SlotId(0)));
        assert_eq!(p.spawn(1, 'b'), Some(SlotId(1)));
        assert_eq!(p.spawn(0, 'c'), Some(SlotId(2)));
        assert_eq!(p.spawn(2, 'd'), None);

        p.release(SlotId(1));
        assert_eq!(p.spawn(5, 'e'), Some(SlotId(1)));
        assert_eq!(p.owner(SlotId(1)), Some(5));
    }

    #[test]
    fn retire_frees_only_that_chunk() {
        let mut p = Pool::new(4);
        p.spawn(3, 30);
        p.spawn(4, 40);
        p.spawn(3, 31);
        p.spawn(4, 41);

        assert_eq!(p.retire_chunk(3), 2);
        assert_eq!(p.active_count(), 2);
        let left: Vec<_> = p.iter().collect();
        assert_eq!(left, vec![(SlotId(1), &40), (SlotId(3), &41)]);
        assert_eq!(p.retire_chunk(3), 0);
    }

    #[test]
    fn owned_by_filters_and_iter_mut_edits() {
        let mut p = Pool::new(4);
        p.spawn(1, 10);
        p.spawn(2, 20);
        p.spawn(1, 11);
        for (_, v) in p.iter_mut() {
            *v += 1;
        }
        let ones: Vec<_> = p.owned_by(1).map(|(_, v)| *v).collect();
        assert_eq!(ones, vec![11, 12]);
        assert_eq!(p.get(SlotId(1)), Some(&21));
        assert_eq!(p.get(SlotId(3)), None);
    }
}
