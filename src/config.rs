//! Start-up configuration.
//!
//! Everything here is read once when the renderer and the worlds are built;
//! nothing is resized afterwards.

use thiserror::Error;

/// Problems detected by [`Config::validate`].
#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("screen must be at least 1×1 pixels (got {0}×{1})")]
    EmptyScreen(usize, usize),

    /// Screen coordinates are stored as `i16` inside the guard band.
    #[error("screen {0}×{1} exceeds the rasterizer guard band")]
    ScreenTooLarge(usize, usize),

    #[error("`{0}` must be greater than zero")]
    Zero(&'static str),

    #[error("near plane {near} must be positive and closer than far plane {far}")]
    DepthRange { near: f32, far: f32 },

    #[error("field of view {0}° must lie in (0, 180)")]
    Fov(f32),

    #[error("chunk window must not be negative (behind {behind}, ahead {ahead})")]
    Window { behind: i32, ahead: i32 },
}

/// Frame-buffer size and triangle budget.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Capacity of each of the two triangle lists.
    pub max_triangles: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 120,
            height: 120,
            max_triangles: 1500,
        }
    }
}

/// Projection and third-person follow rule.
#[derive(Clone, Debug, PartialEq)]
pub struct CameraConfig {
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// How far behind the target the eye sits.
    pub follow_distance: f32,
    /// How far above the target the eye sits.
    pub follow_height: f32,
    /// The eye looks at a point this much above the target.
    pub look_lift: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 90.0,
            near: 0.25,
            far: 100.0,
            follow_distance: 8.0,
            follow_height: 4.0,
            look_lift: 1.0,
        }
    }
}

/// 3D city streaming.
#[derive(Clone, Debug, PartialEq)]
pub struct CityConfig {
    pub seed: u32,
    pub chunk_tiles: u32,
    /// World units per tile.
    pub tile_size: f32,
    pub chunks_behind: i32,
    pub chunks_ahead: i32,
    pub max_buildings: usize,
    pub max_gems: usize,
}

impl Default for CityConfig {
    fn default() -> Self {
        Self {
            seed: 12345,
            chunk_tiles: 10,
            tile_size: 2.0,
            chunks_behind: 1,
            chunks_ahead: 2,
            max_buildings: 64,
            max_gems: 50,
        }
    }
}

impl CityConfig {
    /// World units covered by one chunk along X.
    #[inline]
    pub fn chunk_span(&self) -> f32 {
        self.chunk_tiles as f32 * self.tile_size
    }
}

/// 2D side-scrolling level streaming.
#[derive(Clone, Debug, PartialEq)]
pub struct LevelConfig {
    pub seed: u32,
    pub chunk_tiles: usize,
    pub rows: usize,
    /// Pixels per tile.
    pub tile_size: usize,
    /// Chunks kept in the circular tile buffer.
    pub buffered_chunks: usize,
    pub max_gems: usize,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            seed: 34125,
            chunk_tiles: 10,
            rows: 20,
            tile_size: 12,
            buffered_chunks: 5,
            max_gems: 50,
        }
    }
}

impl LevelConfig {
    /// Pixels covered by one chunk along X.
    #[inline]
    pub fn chunk_span(&self) -> usize {
        self.chunk_tiles * self.tile_size
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Config {
    pub render: RenderConfig,
    pub camera: CameraConfig,
    pub city: CityConfig,
    pub level: LevelConfig,
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let r = &self.render;
        if r.width == 0 || r.height == 0 {
            return Err(ConfigError::EmptyScreen(r.width, r.height));
        }
        let band = crate::renderer::GUARD_BAND as usize;
        if r.width > band || r.height > band {
            return Err(ConfigError::ScreenTooLarge(r.width, r.height));
        }
        if r.max_triangles == 0 {
            return Err(ConfigError::Zero("max_triangles"));
        }

        let c = &self.camera;
        if !(c.near > 0.0 && c.near < c.far) {
            return Err(ConfigError::DepthRange {
                near: c.near,
                far: c.far,
            });
        }
        if !(c.fov_degrees > 0.0 && c.fov_degrees < 180.0) {
            return Err(ConfigError::Fov(c.fov_degrees));
        }

        let city = &self.city;
        if city.chunk_tiles == 0 {
            return Err(ConfigError::Zero("city.chunk_tiles"));
        }
        if city.tile_size <= 0.0 {
            return Err(ConfigError::Zero("city.tile_size"));
        }
        if city.chunks_behind < 0 || city.chunks_ahead < 0 {
            return Err(ConfigError::Window {
                behind: city.chunks_behind,
                ahead: city.chunks_ahead,
            });
        }
        if city.max_buildings == 0 {
            return Err(ConfigError::Zero("city.max_buildings"));
        }
        if city.max_gems == 0 {
            return Err(ConfigError::Zero("city.max_gems"));
        }

        let lvl = &self.level;
        for (name, v) in [
            ("level.chunk_tiles", lvl.chunk_tiles),
            ("level.rows", lvl.rows),
            ("level.tile_size", lvl.tile_size),
            ("level.buffered_chunks", lvl.buffered_chunks),
            ("level.max_gems", lvl.max_gems),
        ] {
            if v == 0 {
                return Err(ConfigError::Zero(name));
            }
        }
        // platform x is drawn from `chunk_tiles - 2`
        if lvl.chunk_tiles < 3 {
            return Err(ConfigError::Zero("level.chunk_tiles - 2"));
        }
        Ok(())
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        assert_eq!(Config::default().validate(), Ok(()));
    }

    #[test]
    fn rejects_inverted_depth_range() {
        let mut cfg = Config::default();
        cfg.camera.near = 10.0;
        cfg.camera.far = 5.0;
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::DepthRange { .. })
        ));
    }

    #[test]
    fn rejects_empty_pools_and_screens() {
        let mut cfg = Config::default();
        cfg.city.max_gems = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::Zero("city.max_gems")));

        let mut cfg = Config::default();
        cfg.render.width = 0;
        assert_eq!(cfg.validate(), Err(ConfigError::EmptyScreen(0, 120)));
    }

    #[test]
    fn rejects_negative_window() {
        let mut cfg = Config::default();
        cfg.city.chunks_behind = -1;
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::Window {
                behind: -1,
                ahead: 2
            })
        );
    }
}
