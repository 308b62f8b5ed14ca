use glam::Vec3;

use crate::{
    math::FIXED_POINT_FACTOR,
    renderer::{Overlay, Rgb},
    world::Camera,
};

/// Anchors projected further than this outside the screen are skipped.
const OFFSCREEN_MARGIN: i32 = 50;
/// Closer than this to the eye a sprite would fill the screen.
const MIN_DISTANCE: f32 = 0.5;
/// Pixels per world unit of `base_size` at distance 1.
const SCALE_PER_UNIT: f32 = 40.0;
/// Below this scale a sprite is not worth drawing.
const MIN_SCALE: f32 = 0.5;

/// Something that can paint itself at a projected anchor.
///
/// Implementors own the pixel art and must depth-test every pixel through
/// [`Overlay::depth_test`] so rasterized geometry can hide them.
pub trait SpriteRenderer {
    fn draw(&mut self, x: i32, y: i32, scale: f32, depth: u8, target: &mut Overlay<'_>);
}

/// Place a camera-facing sprite at `pos`.
///
/// Returns `false` when the anchor is not visible, too far off-screen, too
/// close to the eye or too small after perspective scaling; the sprite is
/// not called in that case.
pub fn draw_billboard<S: SpriteRenderer + ?Sized>(
    camera: &Camera,
    pos: Vec3,
    sprite: &mut S,
    base_size: f32,
    target: &mut Overlay<'_>,
) -> bool {
    let Some(v) = camera.project(pos) else {
        return false;
    };
    let (x, y) = (v.x as i32, v.y as i32);
    let (w, h) = (target.width() as i32, target.height() as i32);
    if x < -OFFSCREEN_MARGIN
        || x >= w + OFFSCREEN_MARGIN
        || y < -OFFSCREEN_MARGIN
        || y >= h + OFFSCREEN_MARGIN
    {
        return false;
    }

    let dist = pos.distance(camera.position());
    if dist < MIN_DISTANCE {
        return false;
    }
    let scale = base_size * SCALE_PER_UNIT / dist;
    if scale < MIN_SCALE {
        return false;
    }

    let depth = (v.z as i32 * 255 / FIXED_POINT_FACTOR).min(255) as u8;
    sprite.draw(x, y, scale, depth, target);
    true
}

/// Filled diamond with a bright highlight on the upper centre column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Diamond {
    pub color: Rgb,
    /// Vertical bob in pixels per unit of scale.
    pub bob: f32,
}

/// Gem colours indexed by gem type.
pub const GEM_COLORS: [Rgb; 3] = [
    Rgb::new(255, 50, 50),
    Rgb::new(50, 255, 50),
    Rgb::new(50, 150, 255),
];

impl Diamond {
    pub fn new(color: Rgb) -> Self {
        Self { color, bob: 0.0 }
    }

    /// Gem of `kind` bobbing with the clock at `time_ms`.
    pub fn gem(kind: u8, time_ms: u32) -> Self {
        Self {
            color: GEM_COLORS[kind as usize % GEM_COLORS.len()],
            bob: (time_ms as f32 / 200.0).sin() * 2.0,
        }
    }
}

impl SpriteRenderer for Diamond {
    fn draw(&mut self, x: i32, y: i32, scale: f32, depth: u8, target: &mut Overlay<'_>) {
        let y = y + (self.bob * scale) as i32;
        let size = ((3.0 * scale) as i32).max(1);
        let shine = self.color.brighten(50);

        for dy in -size..=size {
            let half = size - dy.abs();
            for dx in -half..=half {
                let (px, py) = (x + dx, y + dy);
                if !target.depth_test(px, py, depth) {
                    continue;
                }
                let c = if dx.abs() <= 1 && dy < 0 {
                    shine
                } else {
                    self.color
                };
                target.put_pixel(px, py, c);
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CameraConfig;
    use crate::renderer::Stage;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(i32, i32, f32, u8)>,
    }

    impl SpriteRenderer for Recorder {
        fn draw(&mut self, x: i32, y: i32, scale: f32, depth: u8, _: &mut Overlay<'_>) {
            self.calls.push((x, y, scale, depth));
        }
    }

    fn cam() -> Camera {
        let mut c = Camera::new(&CameraConfig::default(), 120, 120);
        c.look_at(Vec3::ZERO, Vec3::Z);
        c
    }

    #[test]
    fn nearer_billboards_are_larger() {
        let cam = cam();
        let mut stage = Stage::new(120, 120, 1);
        let mut ov = Overlay::new(&mut stage.color, &mut stage.depth);
        let mut rec = Recorder::default();

        assert!(draw_billboard(&cam, Vec3::new(0.0, 0.0, 1.0), &mut rec, 1.5, &mut ov));
        assert!(draw_billboard(&cam, Vec3::new(0.0, 0.0, 10.0), &mut rec, 1.5, &mut ov));

        let (near, far) = (rec.calls[0], rec.calls[1]);
        assert!((near.2 - 60.0).abs() < 1e-3);
        assert!((far.2 - 6.0).abs() < 1e-3);
        assert!(near.3 < far.3);
        assert_eq!((far.0, far.1), (59, 59));
    }

    #[test]
    fn tiny_and_hidden_billboards_are_culled() {
        let cam = cam();
        let mut stage = Stage::new(120, 120, 1);
        let mut ov = Overlay::new(&mut stage.color, &mut stage.depth);
        let mut rec = Recorder::default();

        // scale 0.02 * 40 / 10 = 0.08
        assert!(!draw_billboard(&cam, Vec3::new(0.0, 0.0, 10.0), &mut rec, 0.02, &mut ov));
        // behind the eye
        assert!(!draw_billboard(&cam, Vec3::new(0.0, 0.0, -3.0), &mut rec, 1.5, &mut ov));
        // far off to the side
        assert!(!draw_billboard(&cam, Vec3::new(40.0, 0.0, 5.0), &mut rec, 1.5, &mut ov));
        assert!(rec.calls.is_empty());
    }

    #[test]
    fn diamond_is_occluded_by_nearer_depth() {
        let mut stage = Stage::new(20, 20, 1);
        // a wall at depth 10 covering the left half
        for y in 0..20 {
            for x in 0..10 {
                stage.depth.depth_test(x, y, 10);
            }
        }
        let mut ov = Overlay::new(&mut stage.color, &mut stage.depth);
        let mut gem = Diamond::new(Rgb::new(50, 150, 255));
        gem.draw(10, 10, 1.0, 40, &mut ov);

        // right half painted, left half hidden
        assert_eq!(ov.pixel(11, 10), Some(Rgb::new(50, 150, 255)));
        assert_eq!(ov.pixel(9, 10), Some(Rgb::BLACK));
        // highlight above the centre
        assert_eq!(ov.pixel(10, 8), Some(Rgb::new(100, 200, 255)));
        // outside the diamond
        assert_eq!(ov.pixel(13, 13), Some(Rgb::BLACK));
    }

    #[test]
    fn gem_palette_wraps() {
        assert_eq!(Diamond::gem(1, 0).color, GEM_COLORS[1]);
        assert_eq!(Diamond::gem(4, 0).color, GEM_COLORS[1]);
        assert_eq!(Diamond::gem(0, 0).bob, 0.0);
    }
}
