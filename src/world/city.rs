//! Endless street of procedurally placed buildings and gems.
//!
//! The city runs along +X. It is cut into chunks of `chunk_tiles` tiles; a
//! sliding window of chunks around the camera is kept alive and everything
//! outside it is forgotten, since any chunk can be rebuilt from
//! `(seed, chunk id)` alone.

use std::ops::RangeInclusive;

use glam::Vec3;
use smallvec::SmallVec;

use super::{Camera, pool::Pool, rng::ChunkRng};
use crate::{
    config::CityConfig,
    renderer::{Overlay, Rgb, TriangleList},
    scene::{Diamond, draw_billboard, draw_cube},
};

pub const WALL_COLORS: [Rgb; 6] = [
    Rgb::new(180, 100, 100),
    Rgb::new(100, 130, 180),
    Rgb::new(150, 150, 120),
    Rgb::new(120, 160, 120),
    Rgb::new(180, 150, 100),
    Rgb::new(140, 140, 160),
];

/// Darker companion of each wall colour.
pub const ROOF_COLORS: [Rgb; 6] = [
    Rgb::new(120, 60, 60),
    Rgb::new(60, 80, 120),
    Rgb::new(100, 100, 80),
    Rgb::new(80, 110, 80),
    Rgb::new(130, 100, 60),
    Rgb::new(100, 100, 120),
];

/// Height above the street at which gems float.
const GEM_HEIGHT: f32 = 0.5;
const GEM_SIZE: f32 = 1.0;
/// Camera chunks are clamped to `±CHUNK_LIMIT` so the window edges and the
/// one-chunk steps towards them stay inside `i32`.
const CHUNK_LIMIT: i32 = i32::MAX / 2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Building {
    /// Centre of the footprint.
    pub x: f32,
    pub z: f32,
    pub width: f32,
    pub depth: f32,
    pub height: f32,
    /// Index into [`WALL_COLORS`] / [`ROOF_COLORS`].
    pub palette: u8,
}

impl Building {
    #[inline]
    pub fn wall(&self) -> Rgb {
        WALL_COLORS[self.palette as usize]
    }

    #[inline]
    pub fn roof(&self) -> Rgb {
        ROOF_COLORS[self.palette as usize]
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gem {
    pub pos: Vec3,
    /// 0 red, 1 green, 2 blue.
    pub kind: u8,
    pub collected: bool,
}

impl Gem {
    #[inline]
    pub fn points(&self) -> u32 {
        (self.kind as u32 + 1) * 10
    }
}

/// Everything one chunk contributes, before it is placed in the pools.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ChunkLayout {
    pub buildings: SmallVec<[Building; 20]>,
    pub gems: SmallVec<[Gem; 10]>,
}

/// Lay out `chunk` for the seed in `cfg`.
///
/// Pure: the result depends on nothing but `cfg` and `chunk`. Per tile the
/// draws are: skip (1 in 4), left building (2 in 3), right building
/// (2 in 3), gem (1 in 5).
pub fn chunk_layout(cfg: &CityConfig, chunk: i32) -> ChunkLayout {
    let mut rng = ChunkRng::for_chunk(cfg.seed, chunk);
    let mut out = ChunkLayout::default();
    let start_x = chunk as f32 * cfg.chunk_span();

    for tx in 0..cfg.chunk_tiles {
        if rng.below(4) == 0 {
            continue;
        }
        let x = start_x + tx as f32 * cfg.tile_size;

        if rng.below(3) != 0 {
            let z = -4.0 - rng.below(3) as f32;
            out.buildings.push(building(&mut rng, x, z));
        }
        if rng.below(3) != 0 {
            let z = 4.0 + rng.below(3) as f32;
            out.buildings.push(building(&mut rng, x, z));
        }
        if rng.below(5) == 0 {
            let gx = x + rng.below(100) as f32 / 50.0 - 1.0;
            let gz = rng.below(100) as f32 / 50.0 - 1.0;
            out.gems.push(Gem {
                pos: Vec3::new(gx, GEM_HEIGHT, gz),
                kind: rng.below(3) as u8,
                collected: false,
            });
        }
    }
    out
}

fn building(rng: &mut ChunkRng, x: f32, z: f32) -> Building {
    let width = 1.5 + rng.below(100) as f32 / 100.0;
    let depth = 1.5 + rng.below(100) as f32 / 100.0;
    let height = 2.0 + rng.below(8) as f32;
    let palette = rng.below(WALL_COLORS.len() as u32) as u8;
    Building {
        x,
        z,
        width,
        depth,
        height,
        palette,
    }
}

/// Owned city state: the loaded chunk window and its entity pools.
#[derive(Clone, Debug, PartialEq)]
pub struct City {
    cfg: CityConfig,
    left: i32,
    right: i32,
    buildings: Pool<Building>,
    gems: Pool<Gem>,
}

impl City {
    /// Build the initial window around chunk 0.
    pub fn new(cfg: &CityConfig) -> Self {
        let mut city = Self {
            cfg: cfg.clone(),
            left: -cfg.chunks_behind,
            right: cfg.chunks_ahead,
            buildings: Pool::new(cfg.max_buildings),
            gems: Pool::new(cfg.max_gems),
        };
        for c in city.window() {
            city.generate_chunk(c);
        }
        city
    }

    #[inline]
    pub fn window(&self) -> RangeInclusive<i32> {
        self.left..=self.right
    }

    #[inline]
    pub fn buildings(&self) -> &Pool<Building> {
        &self.buildings
    }

    #[inline]
    pub fn gems(&self) -> &Pool<Gem> {
        &self.gems
    }

    /// Chunk containing world X coordinate `x`, clamped to
    /// `±CHUNK_LIMIT`.
    #[inline]
    pub fn chunk_of(&self, x: f32) -> i32 {
        ((x / self.cfg.chunk_span()).floor() as i32).clamp(-CHUNK_LIMIT, CHUNK_LIMIT)
    }

    /// Spawn the entities of `chunk`. Entities that find no free slot are
    /// skipped. Returns how many were placed.
    pub fn generate_chunk(&mut self, chunk: i32) -> usize {
        let layout = chunk_layout(&self.cfg, chunk);
        let mut placed = 0;
        let mut skipped = 0;

        for b in layout.buildings {
            match self.buildings.spawn(chunk, b) {
                Some(_) => placed += 1,
                None => skipped += 1,
            }
        }
        for g in layout.gems {
            match self.gems.spawn(chunk, g) {
                Some(_) => placed += 1,
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            log::debug!("city chunk {chunk}: pools full, {skipped} entities skipped");
        }
        log::trace!("city chunk {chunk} generated ({placed} entities)");
        placed
    }

    /// Deactivate everything owned by `chunk`.
    pub fn remove_chunk(&mut self, chunk: i32) -> usize {
        let n = self.buildings.retire_chunk(chunk) + self.gems.retire_chunk(chunk);
        log::trace!("city chunk {chunk} retired ({n} entities)");
        n
    }

    /// Slide the window so that it spans `chunks_behind` chunks behind the
    /// camera's chunk to `chunks_ahead` chunks ahead, one chunk at a time.
    pub fn update_chunks(&mut self, camera_x: f32) {
        let cam = self.chunk_of(camera_x);
        let want_left = cam - self.cfg.chunks_behind;
        let want_right = cam + self.cfg.chunks_ahead;

        while self.left < want_left && self.left <= self.right {
            self.remove_chunk(self.left);
            self.left += 1;
        }
        while self.right > want_right && self.right >= self.left {
            self.remove_chunk(self.right);
            self.right -= 1;
        }
        if self.left > self.right {
            // jumped clear of the old window: restart empty at the new spot
            self.left = want_left;
            self.right = want_left - 1;
        }
        while self.left > want_left {
            self.left -= 1;
            self.generate_chunk(self.left);
        }
        while self.right < want_right {
            self.right += 1;
            self.generate_chunk(self.right);
        }
    }

    /// Does a circle of `radius` at `(x, z)` overlap any building footprint?
    pub fn check_collision(&self, x: f32, z: f32, radius: f32) -> bool {
        self.buildings.iter().any(|(_, b)| {
            (x - b.x).abs() < b.width / 2.0 + radius && (z - b.z).abs() < b.depth / 2.0 + radius
        })
    }

    /// Collect every uncollected gem within `radius` of `(x, z)` and return
    /// the points they are worth.
    pub fn collect_gems(&mut self, x: f32, z: f32, radius: f32) -> u32 {
        let mut points = 0;
        for (_, g) in self.gems.iter_mut() {
            if g.collected {
                continue;
            }
            let (dx, dz) = (x - g.pos.x, z - g.pos.z);
            if dx * dx + dz * dz < radius * radius {
                g.collected = true;
                points += g.points();
            }
        }
        points
    }

    /// Submit one shaded box per live building; returns how many put at
    /// least one face into the list.
    pub fn draw_buildings(&self, camera: &Camera, list: &mut TriangleList) -> usize {
        let mut drawn = 0;
        for (_, b) in self.buildings.iter() {
            let base = Vec3::new(b.x, 0.0, b.z);
            let size = Vec3::new(b.width, b.height, b.depth);
            if !draw_cube(camera, list, base, size, b.roof(), b.wall()).is_empty() {
                drawn += 1;
            }
        }
        drawn
    }

    /// Paint a bobbing diamond for every uncollected gem.
    pub fn draw_gems(&self, camera: &Camera, overlay: &mut Overlay<'_>, time_ms: u32) -> usize {
        let mut drawn = 0;
        for (_, g) in self.gems.iter() {
            if g.collected {
                continue;
            }
            let mut sprite = Diamond::gem(g.kind, time_ms);
            if draw_billboard(camera, g.pos, &mut sprite, GEM_SIZE, overlay) {
                drawn += 1;
            }
        }
        drawn
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
