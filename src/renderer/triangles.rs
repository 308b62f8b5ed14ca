//! Bounded per-frame triangle storage and its producer/consumer pair.

use super::RasterTriangle;

/// Fixed-capacity triangle array plus a fill count.
///
/// Slots past `len()` keep whatever an earlier frame left there; they are
/// overwritten lazily and never read.
#[derive(Debug)]
pub struct TriangleList {
    slots: Box<[RasterTriangle]>,
    len: usize,
    dropped: usize,
}

impl TriangleList {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: vec![RasterTriangle::default(); capacity].into_boxed_slice(),
            len: 0,
            dropped: 0,
        }
    }

    /// Append `tri`. Returns `false` (and counts the drop) when full.
    #[inline]
    pub fn push(&mut self, tri: RasterTriangle) -> bool {
        match self.slots.get_mut(self.len) {
            Some(slot) => {
                *slot = tri;
                self.len += 1;
                true
            }
            None => {
                self.dropped += 1;
                false
            }
        }
    }

    /// Logically empty the list; slot contents are left alone.
    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
        self.dropped = 0;
    }

    #[inline(always)]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline(always)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Submissions rejected since the last `clear`.
    #[inline(always)]
    pub fn dropped(&self) -> usize {
        self.dropped
    }

    /// The valid prefix.
    #[inline]
    pub fn as_slice(&self) -> &[RasterTriangle] {
        &self.slots[..self.len]
    }

    /// The first `count` triangles (clamped to the valid prefix).
    #[inline]
    pub fn first(&self, count: usize) -> &[RasterTriangle] {
        &self.slots[..count.min(self.len)]
    }

    /// Address of the backing storage, to tell the two lists apart.
    #[inline]
    pub fn storage_ptr(&self) -> *const RasterTriangle {
        self.slots.as_ptr()
    }
}

/// Two triangle lists: `current` is being rasterized, `next` is being
/// filled by new submissions.
#[derive(Debug)]
pub struct TriangleLists {
    current: Box<TriangleList>,
    next: Box<TriangleList>,
}

impl TriangleLists {
    pub fn new(capacity: usize) -> Self {
        Self {
            current: Box::new(TriangleList::with_capacity(capacity)),
            next: Box::new(TriangleList::with_capacity(capacity)),
        }
    }

    /// Append to the `next` list; `false` when it is full.
    #[inline]
    pub fn submit(&mut self, tri: RasterTriangle) -> bool {
        self.next.push(tri)
    }

    /// Triangles accumulated for the frame being built.
    #[inline]
    pub fn pending(&self) -> usize {
        self.next.len()
    }

    pub fn begin_frame(&mut self) {
        self.next.clear();
    }

    /// `next` becomes `current` (keeping its count); the old `current`
    /// becomes an empty `next`.
    pub fn swap_lists(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
        self.next.clear();
    }

    #[inline]
    pub fn current(&self) -> &TriangleList {
        &self.current
    }

    #[inline]
    pub fn next(&self) -> &TriangleList {
        &self.next
    }

    #[inline]
    pub fn next_mut(&mut self) -> &mut TriangleList {
        &mut self.next
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{Rgb, ScreenVertex};

    fn tri(tag: i16) -> RasterTriangle {
        let v = |x, y| ScreenVertex {
            x,
            y,
            z: 100,
            color: Rgb::WHITE,
        };
        RasterTriangle::new(v(tag, 0), v(tag + 1, 0), v(tag, 1))
    }

    #[test]
    fn push_rejects_when_full() {
        let mut list = TriangleList::with_capacity(2);
        assert!(list.push(tri(0)));
        assert!(list.push(tri(1)));
        assert!(!list.push(tri(2)));
        assert!(!list.push(tri(3)));
        assert_eq!(list.len(), 2);
        assert_eq!(list.dropped(), 2);
        assert_eq!(list.as_slice(), &[tri(0), tri(1)]);
    }

    #[test]
    fn clear_keeps_stale_slots_out_of_view() {
        let mut list = TriangleList::with_capacity(4);
        list.push(tri(0));
        list.push(tri(1));
        list.clear();
        assert!(list.as_slice().is_empty());
        list.push(tri(7));
        assert_eq!(list.as_slice(), &[tri(7)]);
        assert_eq!(list.first(10), &[tri(7)]);
    }

    #[test]
    fn swap_carries_count_and_empties_next() {
        let mut lists = TriangleLists::new(8);
        lists.submit(tri(0));
        lists.submit(tri(1));
        lists.submit(tri(2));
        assert_eq!(lists.pending(), 3);

        lists.swap_lists();
        assert_eq!(lists.current().len(), 3);
        assert_eq!(lists.pending(), 0);
        assert_eq!(lists.current().as_slice()[2], tri(2));
    }

    #[test]
    fn double_swap_restores_assignment() {
        let mut lists = TriangleLists::new(4);
        let cur = lists.current().storage_ptr();
        let nxt = lists.next().storage_ptr();

        lists.swap_lists();
        assert_eq!(lists.current().storage_ptr(), nxt);
        lists.swap_lists();
        assert_eq!(lists.current().storage_ptr(), cur);
        assert_eq!(lists.next().storage_ptr(), nxt);
        assert_eq!(lists.current().len(), 0);
        assert_eq!(lists.next().len(), 0);
    }

    #[test]
    fn begin_frame_resets_only_next() {
        let mut lists = TriangleLists::new(4);
        lists.submit(tri(0));
        lists.swap_lists();
        lists.submit(tri(1));
        lists.begin_frame();
        assert_eq!(lists.pending(), 0);
        assert_eq!(lists.current().len(), 1);
    }
}
