//! Everything that exists in world space: the view-point and the two
//! procedurally streamed worlds.

mod camera;
mod city;
mod level;
mod pool;
mod rng;

pub use camera::Camera;
pub use city::{Building, ChunkLayout, City, Gem, ROOF_COLORS, WALL_COLORS, chunk_layout};
pub use level::{Level, LevelGem, sky_color};
pub use pool::{Pool, SlotId};
pub use rng::ChunkRng;
