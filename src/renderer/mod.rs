//! Rendering layer.
//!
//! *Scene code never rasterizes anything itself.* It projects geometry,
//! appends [`RasterTriangle`]s to the frame's bounded list and hands control
//! to a type that implements [`FrameDriver`]:
//!
//! * [`SyncRenderer`] rasterizes on the calling thread at `end_frame`.
//! * [`Pipeline`] ships the list to a dedicated renderer thread and lets the
//!   caller build the next frame while pixels are being filled.
//!
//! Both drive the very same [`raster`] core, so output is identical; only
//! the latency differs (the pipeline shows each frame one frame later).

use std::time::Duration;

pub mod buffers;
pub mod frame;
pub mod pipeline;
pub mod raster;
pub mod sync;
pub mod triangles;

pub use buffers::{ColorBuffer, DEPTH_CLEAR, DepthBuffer, DoubleBuffer};
pub use frame::{Frame, Overlay, Stage};
pub use pipeline::{Pipeline, PipelineError};
pub use raster::{fill_background, rasterize, render_to_buffer};
pub use sync::SyncRenderer;
pub use triangles::{TriangleList, TriangleLists};

/// Pixel format of the software frame-buffer (0x00RRGGBB).
pub type Rgba = u32;

/// Screen coordinates are clamped to `±GUARD_BAND` before they are narrowed
/// to `i16`; edge-function products then stay comfortably inside `i32`.
pub const GUARD_BAND: i32 = 4096;

/// 8-bit colour triple used for vertex colours.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Multiply every channel by `k` (clamped to 0‥1).
    pub fn shade(self, k: f32) -> Self {
        let k = k.clamp(0.0, 1.0);
        Self {
            r: (self.r as f32 * k) as u8,
            g: (self.g as f32 * k) as u8,
            b: (self.b as f32 * k) as u8,
        }
    }

    pub fn halve(self) -> Self {
        Self::new(self.r / 2, self.g / 2, self.b / 2)
    }

    /// Add `amount` to every channel, saturating at 255.
    pub fn brighten(self, amount: u8) -> Self {
        Self::new(
            self.r.saturating_add(amount),
            self.g.saturating_add(amount),
            self.b.saturating_add(amount),
        )
    }

    #[inline(always)]
    pub const fn to_rgba(self) -> Rgba {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline(always)]
    pub const fn from_rgba(px: Rgba) -> Self {
        Self::new((px >> 16) as u8, (px >> 8) as u8, px as u8)
    }
}

/// A projected vertex: pixel position, depth in `1..=FIXED_POINT_FACTOR`
/// and a colour for Gouraud interpolation.
///
/// Only [`crate::world::Camera::project`] creates these.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScreenVertex {
    pub x: i16,
    pub y: i16,
    pub z: u16,
    pub color: Rgb,
}

impl ScreenVertex {
    #[inline]
    pub fn with_color(self, color: Rgb) -> Self {
        Self { color, ..self }
    }
}

/// Flattened, pointer-free triangle record (28 bytes).
///
/// It lives in exactly one [`TriangleList`] slot and is copied, never
/// referenced, when the list changes hands between threads.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RasterTriangle {
    pub x: [i16; 3],
    pub y: [i16; 3],
    pub z: [u16; 3],
    pub r: [u8; 3],
    pub g: [u8; 3],
    pub b: [u8; 3],
    _pad: u8,
}

const _: () = assert!(std::mem::size_of::<RasterTriangle>() == 28);

impl RasterTriangle {
    pub fn new(v0: ScreenVertex, v1: ScreenVertex, v2: ScreenVertex) -> Self {
        let vs = [v0, v1, v2];
        Self {
            x: vs.map(|v| v.x),
            y: vs.map(|v| v.y),
            z: vs.map(|v| v.z),
            r: vs.map(|v| v.color.r),
            g: vs.map(|v| v.color.g),
            b: vs.map(|v| v.color.b),
            _pad: 0,
        }
    }

    /// Twice the signed screen-space area; positive means front-facing.
    #[inline]
    pub fn signed_area(&self) -> i32 {
        let [x1, x2, x3] = self.x.map(i32::from);
        let [y1, y2, y3] = self.y.map(i32::from);
        (x3 - x1) * (y2 - y1) - (y3 - y1) * (x2 - x1)
    }
}

/// What one `end_frame` accomplished.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameStats {
    /// Triangles handed to the rasterizer this frame.
    pub triangles: usize,
    /// Submissions rejected because the list was full.
    pub dropped: usize,
    /// Time the most recently *finished* rasterization pass took.
    pub raster_time: Duration,
}

/// Scheduling front end around the shared rasterizer.
///
/// Per frame the caller does:
///
/// 1. `begin_frame()`
/// 2. project geometry into `frame().triangles`
/// 3. `end_frame()` – hand the list over; afterwards `display()` holds a
///    finished image
/// 4. draw sprites/UI through `frame().overlay`, present `display()`
pub trait FrameDriver {
    fn begin_frame(&mut self);

    /// Borrow the builder-side buffers.
    fn frame(&mut self) -> Frame<'_>;

    fn end_frame(&mut self) -> Result<FrameStats, PipelineError>;

    /// The buffer that is safe to present right now.
    fn display(&self) -> &ColorBuffer;
}

/*──────────────────────────────── Tests ───────────────────────────────*/
