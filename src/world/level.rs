//! Side-scrolling tile level kept in a circular buffer of chunks.
//!
//! The buffer holds `buffered_chunks` chunks side by side. As the window
//! slides, the chunk that falls off one end is overwritten in place by the
//! chunk that enters at the other, so the buffer slot of world chunk `c`
//! is `(chunk_offset + (c - first_chunk)) % buffered_chunks`.

use std::ops::RangeInclusive;

use super::{pool::Pool, rng::ChunkRng};
use crate::{
    config::LevelConfig,
    renderer::{Overlay, Rgb},
    scene::{Diamond, SpriteRenderer},
};

/// Collectible resting on top of a solid tile, in world pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LevelGem {
    pub x: i32,
    pub y: i32,
    pub kind: u8,
    pub collected: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Level {
    cfg: LevelConfig,
    /// `rows × (chunk_tiles · buffered_chunks)`, row-major.
    solid: Box<[bool]>,
    /// Buffer slot holding the leftmost loaded chunk.
    chunk_offset: usize,
    /// World id of the leftmost loaded chunk; never negative.
    first_chunk: i32,
    gems: Pool<LevelGem>,
}

/// First platform row, counted from the top.
const PLATFORM_START_FROM_BOTTOM: usize = 4;
/// Platforms stop once they would reach this row.
const PLATFORM_CEILING: usize = 2;

impl Level {
    /// Load chunks `0..buffered_chunks` into slots `0..buffered_chunks`.
    pub fn new(cfg: &LevelConfig) -> Self {
        let width = cfg.chunk_tiles * cfg.buffered_chunks;
        let mut level = Self {
            cfg: cfg.clone(),
            solid: vec![false; width * cfg.rows].into_boxed_slice(),
            chunk_offset: 0,
            first_chunk: 0,
            gems: Pool::new(cfg.max_gems),
        };
        level.reload(0);
        level
    }

    #[inline]
    fn buffer_width(&self) -> usize {
        self.cfg.chunk_tiles * self.cfg.buffered_chunks
    }

    #[inline]
    fn set(&mut self, bx: usize, ty: usize, v: bool) {
        let w = self.buffer_width();
        self.solid[ty * w + bx] = v;
    }

    #[inline]
    fn get(&self, bx: usize, ty: usize) -> bool {
        self.solid[ty * self.buffer_width() + bx]
    }

    #[inline]
    pub fn window(&self) -> RangeInclusive<i32> {
        self.first_chunk..=self.first_chunk + self.cfg.buffered_chunks as i32 - 1
    }

    #[inline]
    pub fn gems(&self) -> &Pool<LevelGem> {
        &self.gems
    }

    /// Buffer slot currently holding world chunk `chunk`, if loaded.
    pub fn slot_of(&self, chunk: i32) -> Option<usize> {
        let n = self.cfg.buffered_chunks;
        let rel = chunk.checked_sub(self.first_chunk)?;
        if rel < 0 || rel as usize >= n {
            return None;
        }
        Some((self.chunk_offset + rel as usize) % n)
    }

    /// Is the tile at world column `world_tx`, row `ty` solid?
    ///
    /// Rows below the grid count as solid floor, rows above as open sky.
    /// Columns in chunks that are not loaded are empty.
    pub fn is_solid(&self, world_tx: i32, ty: i32) -> bool {
        if ty < 0 {
            return false;
        }
        if ty as usize >= self.cfg.rows {
            return true;
        }
        let w = self.cfg.chunk_tiles as i32;
        let chunk = world_tx.div_euclid(w);
        let local = world_tx.rem_euclid(w) as usize;
        match self.slot_of(chunk) {
            Some(slot) => self.get(slot * self.cfg.chunk_tiles + local, ty as usize),
            None => false,
        }
    }

    /// Fill buffer `slot` with world chunk `chunk` and spawn its gems.
    pub fn generate_chunk(&mut self, chunk: i32, slot: usize) {
        let (w, rows) = (self.cfg.chunk_tiles, self.cfg.rows);
        let base = slot * w;
        let mut rng = ChunkRng::for_chunk(self.cfg.seed, chunk);

        for ty in 0..rows {
            for x in 0..w {
                self.set(base + x, ty, false);
            }
        }
        for x in 0..w {
            self.set(base + x, rows - 1, true);
        }

        // platforms, climbing at least two rows at a time
        let mut row = rows.saturating_sub(PLATFORM_START_FROM_BOTTOM);
        while row > PLATFORM_CEILING {
            let px = rng.below(w as u32 - 2) as usize;
            let len = rng.below(4) as usize + 2;
            for x in px..(px + len).min(w) {
                self.set(base + x, row, true);
            }
            row = row.saturating_sub(rng.below(2) as usize + 2);
        }

        // gems on empty cells with ground right below
        let world_x0 = chunk.saturating_mul(self.cfg.chunk_span() as i32);
        let t = self.cfg.tile_size as i32;
        let mut skipped = 0;
        for ty in 0..rows - 1 {
            for x in 0..w {
                if self.get(base + x, ty) || !self.get(base + x, ty + 1) {
                    continue;
                }
                if rng.below(4) != 0 {
                    continue;
                }
                let gem = LevelGem {
                    x: world_x0.saturating_add(x as i32 * t + t / 2),
                    y: ty as i32 * t + t / 2,
                    kind: rng.below(3) as u8,
                    collected: false,
                };
                if self.gems.spawn(chunk, gem).is_none() {
                    skipped += 1;
                }
            }
        }
        if skipped > 0 {
            log::debug!("level chunk {chunk}: gem pool full, {skipped} skipped");
        }
        log::trace!("level chunk {chunk} → slot {slot}");
    }

    /// Rightmost chunk the window may start at: every loaded world pixel
    /// still fits an `i32`.
    fn last_first_chunk(&self) -> i32 {
        let span = self.cfg.chunk_span().max(1);
        (i32::MAX as usize / span).saturating_sub(self.cfg.buffered_chunks) as i32
    }

    /// Drop every chunk and load a fresh window starting at `first`.
    fn reload(&mut self, first: i32) {
        self.gems.clear();
        self.first_chunk = first;
        self.chunk_offset = 0;
        for i in 0..self.cfg.buffered_chunks {
            self.generate_chunk(first + i as i32, i);
        }
    }

    /// Slide the window so it starts one chunk behind the camera (never
    /// left of chunk 0, never so far right that world pixels leave `i32`).
    /// `camera_x` is the left screen edge in world pixels.
    pub fn update_chunks(&mut self, camera_x: f32) {
        let n = self.cfg.buffered_chunks;
        let cam = (camera_x / self.cfg.chunk_span() as f32).floor() as i32;
        let want = cam.saturating_sub(1).clamp(0, self.last_first_chunk());

        if (want - self.first_chunk).unsigned_abs() as usize >= n {
            log::trace!("level window jumped to chunk {want}");
            self.reload(want);
            return;
        }

        while self.first_chunk < want {
            self.gems.retire_chunk(self.first_chunk);
            self.first_chunk += 1;
            self.chunk_offset = (self.chunk_offset + 1) % n;
            let chunk = self.first_chunk + n as i32 - 1;
            let slot = (self.chunk_offset + n - 1) % n;
            self.generate_chunk(chunk, slot);
        }
        while self.first_chunk > want {
            self.gems.retire_chunk(self.first_chunk + n as i32 - 1);
            self.first_chunk -= 1;
            self.chunk_offset = (self.chunk_offset + n - 1) % n;
            self.generate_chunk(self.first_chunk, self.chunk_offset);
        }
    }

    /// Collect gems whose centre lies within `radius` pixels of `(x, y)`.
    /// Returns the points earned.
    pub fn collect_gems(&mut self, x: i32, y: i32, radius: i32) -> u32 {
        let mut points = 0;
        for (_, g) in self.gems.iter_mut() {
            let (dx, dy) = (x - g.x, y - g.y);
            if !g.collected && dx * dx + dy * dy < radius * radius {
                g.collected = true;
                points += (g.kind as u32 + 1) * 10;
            }
        }
        points
    }

    /// Paint visible tiles and gems with the view's left edge at
    /// `camera_x`. The caller fills the background first.
    pub fn draw(&self, target: &mut Overlay<'_>, camera_x: i32, time_ms: u32) {
        let t = self.cfg.tile_size as i32;
        let first_tx = camera_x.div_euclid(t);
        let last_tx = first_tx + target.width() as i32 / t + 1;

        for tx in first_tx..=last_tx {
            for ty in 0..self.cfg.rows as i32 {
                if !self.is_solid(tx, ty) {
                    continue;
                }
                let (px, py) = (tx * t - camera_x, ty * t);
                target.fill_rect(px, py, t, t, DIRT);
                target.fill_rect(px, py, t, 3.min(t), GRASS);
                if (tx + ty).rem_euclid(2) == 0 {
                    target.put_pixel(px + 2, py + 5, SPECKLE);
                    target.put_pixel(px + 7, py + 8, SPECKLE);
                }
            }
        }

        let w = target.width() as i32;
        for (_, g) in self.gems.iter() {
            let sx = g.x - camera_x;
            if g.collected || sx < -5 || sx > w + 5 {
                continue;
            }
            let mut sprite = Diamond::gem(g.kind, time_ms);
            // flat world: every gem is in front of everything
            sprite.draw(sx, g.y, 1.0, 0, target);
        }
    }
}

const DIRT: Rgb = Rgb::new(100, 70, 50);
const GRASS: Rgb = Rgb::new(80, 160, 60);
const SPECKLE: Rgb = Rgb::new(80, 55, 40);

/// Sky gradient of the side-scrolling view.
pub fn sky_color(y: usize) -> Rgb {
    Rgb::new(
        (30 + y / 4).min(255) as u8,
        (40 + y / 3).min(255) as u8,
        (80 + y / 2).min(255) as u8,
    )
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    fn cfg() -> LevelConfig {
        LevelConfig::default()
    }

    /// World columns of one chunk as a row-major grid of booleans.
    fn chunk_grid(level: &Level, chunk: i32) -> Vec<bool> {
        let c = &level.cfg;
        let x0 = chunk * c.chunk_tiles as i32;
        (0..c.rows as i32)
            .flat_map(|ty| (0..c.chunk_tiles as i32).map(move |x| (x0 + x, ty)))
            .map(|(tx, ty)| level.is_solid(tx, ty))
            .collect()
    }

    #[test]
    fn same_seed_same_level() {
        assert_eq!(Level::new(&cfg()), Level::new(&cfg()));
        let other = Level::new(&LevelConfig {
            seed: 1,
            ..cfg()
        });
        assert_ne!(chunk_grid(&Level::new(&cfg()), 0), chunk_grid(&other, 0));
    }

    #[test]
    fn regenerating_into_another_slot_reproduces_the_chunk() {
        let mut level = Level::new(&LevelConfig {
            max_gems: 200,
            ..cfg()
        });
        let span = cfg().chunk_span() as f32;
        let before = chunk_grid(&level, 6);
        assert!(before.iter().all(|&s| !s), "chunk 6 is not loaded yet");

        // slide in one chunk at a time
        level.update_chunks(3.0 * span);
        assert_eq!(level.window(), 2..=6);
        assert_eq!(level.slot_of(6), Some(1));
        let grid = chunk_grid(&level, 6);
        let gems: Vec<LevelGem> = level.gems().owned_by(6).map(|(_, g)| *g).collect();

        // jump away and back: chunk 6 is rebuilt in another slot
        level.update_chunks(100.0 * span);
        assert_eq!(level.window(), 99..=103);
        level.update_chunks(7.0 * span);
        assert_eq!(level.window(), 6..=10);
        assert_eq!(level.slot_of(6), Some(0));

        assert_eq!(chunk_grid(&level, 6), grid);
        let again: Vec<LevelGem> = level.gems().owned_by(6).map(|(_, g)| *g).collect();
        assert_eq!(again, gems);
    }

    #[test]
    fn floor_and_platform_rules() {
        let level = Level::new(&cfg());
        let c = cfg();
        for chunk in level.window() {
            let x0 = chunk * c.chunk_tiles as i32;
            for x in x0..x0 + c.chunk_tiles as i32 {
                assert!(level.is_solid(x, c.rows as i32 - 1));
                // nothing between the floor and the first platform row
                for ty in c.rows - 3..c.rows - 1 {
                    assert!(!level.is_solid(x, ty as i32));
                }
                // nothing at or above the ceiling
                for ty in 0..=PLATFORM_CEILING {
                    assert!(!level.is_solid(x, ty as i32));
                }
            }
        }
    }

    #[test]
    fn out_of_grid_and_unloaded() {
        let level = Level::new(&cfg());
        assert!(level.is_solid(3, 20));
        assert!(level.is_solid(3, 1000));
        assert!(!level.is_solid(3, -1));
        // chunk 5 onwards is not loaded, nor is anything left of 0
        assert!(!level.is_solid(55, 19));
        assert!(!level.is_solid(-1, 19));
    }

    #[test]
    fn slots_wrap_as_the_window_slides() {
        let mut level = Level::new(&cfg());
        let span = cfg().chunk_span() as f32;
        assert_eq!(level.slot_of(0), Some(0));

        level.update_chunks(2.0 * span);
        assert_eq!(level.window(), 1..=5);
        // chunk 5 took over chunk 0's slot
        assert_eq!(level.slot_of(5), Some(0));
        assert_eq!(level.slot_of(1), Some(1));
        assert_eq!(level.slot_of(0), None);

        level.update_chunks(3.0 * span);
        assert_eq!(level.slot_of(6), Some(1));
        assert_eq!(level.slot_of(2), Some(2));

        level.update_chunks(2.0 * span);
        assert_eq!(level.window(), 1..=5);
        assert_eq!(level.slot_of(1), Some(1));
        assert_eq!(level.slot_of(5), Some(0));
    }

    #[test]
    fn window_never_goes_left_of_zero() {
        let mut level = Level::new(&cfg());
        level.update_chunks(0.0);
        assert_eq!(level.window(), 0..=4);
        level.update_chunks(-500.0);
        assert_eq!(level.window(), 0..=4);
    }

    #[test]
    fn far_off_cameras_stay_in_range() {
        let mut level = Level::new(&LevelConfig {
            max_gems: 200,
            ..cfg()
        });
        level.update_chunks(-1.0e12);
        assert_eq!(level.window(), 0..=4);
        level.update_chunks(f32::NEG_INFINITY);
        assert_eq!(level.window(), 0..=4);

        let last = level.last_first_chunk();
        level.update_chunks(3.0e9);
        assert_eq!(level.window(), last..=last + 4);
        level.update_chunks(f32::INFINITY);
        assert_eq!(level.window(), last..=last + 4);

        let span = cfg().chunk_span() as i32;
        assert!(level.gems().active_count() > 0);
        for (id, g) in level.gems().iter() {
            assert_eq!(Some(g.x.div_euclid(span)), level.gems().owner(id));
        }

        // far-left columns are simply not loaded
        assert!(!level.is_solid(i32::MIN, 19));
        assert_eq!(level.slot_of(i32::MIN), None);
    }

    #[test]
    fn gems_follow_their_chunk() {
        let mut level = Level::new(&cfg());
        let span = cfg().chunk_span() as i32;
        for (_, g) in level.gems().iter() {
            assert!(g.x >= 0 && g.x < 5 * span);
            assert!(g.kind < 3);
        }
        level.update_chunks(4.0 * span as f32);
        assert_eq!(level.window(), 3..=7);
        for (id, g) in level.gems().iter() {
            let owner = level.gems().owner(id).unwrap();
            assert!((3..=7).contains(&owner));
            assert_eq!(g.x.div_euclid(span), owner);
        }
    }

    #[test]
    fn gems_rest_on_ground() {
        let level = Level::new(&cfg());
        let t = cfg().tile_size as i32;
        for (_, g) in level.gems().iter() {
            let (tx, ty) = (g.x.div_euclid(t), g.y.div_euclid(t));
            assert!(!level.is_solid(tx, ty));
            assert!(level.is_solid(tx, ty + 1));
        }
    }
}
