//! What the frame builder gets to touch.

use super::{ColorBuffer, DepthBuffer, Rgb, TriangleList};

/// One triangle list together with the colour and depth buffers it is
/// rasterized into. The pipeline moves whole stages between threads.
#[derive(Debug)]
pub struct Stage {
    pub triangles: TriangleList,
    pub color: ColorBuffer,
    pub depth: DepthBuffer,
}

impl Stage {
    pub fn new(width: usize, height: usize, max_triangles: usize) -> Self {
        Self {
            triangles: TriangleList::with_capacity(max_triangles),
            color: ColorBuffer::new(width, height),
            depth: DepthBuffer::new(width, height),
        }
    }
}

/// Builder-side view of one frame: the list being filled and the finished
/// image that sprites and UI may be drawn over.
pub struct Frame<'a> {
    pub triangles: &'a mut TriangleList,
    pub overlay: Overlay<'a>,
}

/// Post-rasterization drawing surface.
///
/// Sprites test against the depth the rasterizer left behind, so they are
/// hidden by nearer geometry.
pub struct Overlay<'a> {
    color: &'a mut ColorBuffer,
    depth: &'a mut DepthBuffer,
}

impl<'a> Overlay<'a> {
    pub fn new(color: &'a mut ColorBuffer, depth: &'a mut DepthBuffer) -> Self {
        debug_assert_eq!(color.width(), depth.width());
        debug_assert_eq!(color.height(), depth.height());
        Self { color, depth }
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.color.width()
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.color.height()
    }

    /// Strictly-nearer test; records `z` when it passes.
    #[inline]
    pub fn depth_test(&mut self, x: i32, y: i32, z: u8) -> bool {
        self.depth.depth_test(x, y, z)
    }

    #[inline]
    pub fn put_pixel(&mut self, x: i32, y: i32, color: Rgb) {
        self.color.put(x, y, color);
    }

    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgb> {
        self.color.get(x, y)
    }

    /// Solid rectangle, no depth test. Used for HUD elements.
    pub fn fill_rect(&mut self, x: i32, y: i32, w: i32, h: i32, color: Rgb) {
        for py in y..y + h {
            for px in x..x + w {
                self.color.put(px, py, color);
            }
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overlay_respects_rasterized_depth() {
        let mut stage = Stage::new(4, 4, 1);
        stage.depth.depth_test(1, 1, 50);

        let mut ov = Overlay::new(&mut stage.color, &mut stage.depth);
        let red = Rgb::new(255, 0, 0);
        if ov.depth_test(1, 1, 80) {
            ov.put_pixel(1, 1, red);
        }
        if ov.depth_test(2, 1, 80) {
            ov.put_pixel(2, 1, red);
        }
        assert_eq!(ov.pixel(1, 1), Some(Rgb::BLACK));
        assert_eq!(ov.pixel(2, 1), Some(red));
    }

    #[test]
    fn fill_rect_clips() {
        let mut stage = Stage::new(4, 4, 1);
        let mut ov = Overlay::new(&mut stage.color, &mut stage.depth);
        ov.fill_rect(2, 2, 10, 10, Rgb::WHITE);
        assert_eq!(ov.pixel(3, 3), Some(Rgb::WHITE));
        assert_eq!(ov.pixel(1, 3), Some(Rgb::BLACK));
        assert_eq!(stage.color.pixels().iter().filter(|&&p| p != 0).count(), 4);
    }
}
