//! Single-threaded front end: rasterize at `end_frame`, on the caller's
//! thread.

use std::time::Instant;

use super::{
    ColorBuffer, DepthBuffer, DoubleBuffer, Frame, FrameDriver, FrameStats, Overlay, PipelineError,
    TriangleLists, render_to_buffer,
};
use crate::config::RenderConfig;

pub struct SyncRenderer {
    lists: TriangleLists,
    color: DoubleBuffer<ColorBuffer>,
    depth: DoubleBuffer<DepthBuffer>,
}

impl SyncRenderer {
    pub fn new(cfg: &RenderConfig) -> Self {
        let (w, h) = (cfg.width, cfg.height);
        Self {
            lists: TriangleLists::new(cfg.max_triangles),
            color: DoubleBuffer::new(ColorBuffer::new(w, h), ColorBuffer::new(w, h)),
            depth: DoubleBuffer::new(DepthBuffer::new(w, h), DepthBuffer::new(w, h)),
        }
    }

    /// Depth left behind by the last pass (what overlays test against).
    pub fn display_depth(&self) -> &DepthBuffer {
        self.depth.front()
    }
}

impl FrameDriver for SyncRenderer {
    fn begin_frame(&mut self) {
        self.lists.begin_frame();
    }

    fn frame(&mut self) -> Frame<'_> {
        Frame {
            triangles: self.lists.next_mut(),
            overlay: Overlay::new(self.color.front_mut(), self.depth.front_mut()),
        }
    }

    fn end_frame(&mut self) -> Result<FrameStats, PipelineError> {
        let dropped = self.lists.next().dropped();
        if dropped > 0 {
            log::debug!("triangle list full, {dropped} triangles dropped");
        }
        self.lists.swap_lists();

        let start = Instant::now();
        let tris = self.lists.current().as_slice();
        render_to_buffer(tris, self.color.back_mut(), self.depth.back_mut());
        let raster_time = start.elapsed();

        self.color.swap();
        self.depth.swap();

        log::trace!("sync frame: {} triangles in {:?}", tris.len(), raster_time);
        Ok(FrameStats {
            triangles: self.lists.current().len(),
            dropped,
            raster_time,
        })
    }

    fn display(&self) -> &ColorBuffer {
        self.color.front()
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::raster::background_color;
    use crate::renderer::{DEPTH_CLEAR, RasterTriangle, Rgb, ScreenVertex};

    fn small() -> RenderConfig {
        RenderConfig {
            width: 16,
            height: 16,
            max_triangles: 4,
        }
    }

    fn quad_half(color: Rgb) -> RasterTriangle {
        let v = |x, y| ScreenVertex { x, y, z: 300, color };
        RasterTriangle::new(v(1, 11), v(11, 11), v(11, 1))
    }

    #[test]
    fn empty_frame_shows_background() {
        let mut r = SyncRenderer::new(&small());
        r.begin_frame();
        let stats = r.end_frame().unwrap();
        assert_eq!(stats.triangles, 0);
        for y in 0..16 {
            assert_eq!(r.display().get(5, y), Some(background_color(y as usize)));
        }
        assert!(r.display_depth().samples().iter().all(|&s| s == DEPTH_CLEAR));
    }

    #[test]
    fn submitted_triangle_is_visible_after_end_frame() {
        let mut r = SyncRenderer::new(&small());
        let red = Rgb::new(255, 0, 0);
        r.begin_frame();
        r.frame().triangles.push(quad_half(red));
        let stats = r.end_frame().unwrap();
        assert_eq!(stats.triangles, 1);
        assert_eq!(r.display().get(9, 9), Some(red));

        // next frame submits nothing: the triangle is gone
        r.begin_frame();
        r.end_frame().unwrap();
        assert_eq!(r.display().get(9, 9), Some(background_color(9)));
    }

    #[test]
    fn overflow_is_reported() {
        let mut r = SyncRenderer::new(&small());
        r.begin_frame();
        {
            let mut f = r.frame();
            for _ in 0..6 {
                f.triangles.push(quad_half(Rgb::WHITE));
            }
        }
        let stats = r.end_frame().unwrap();
        assert_eq!(stats.triangles, 4);
        assert_eq!(stats.dropped, 2);
    }
}
