//! Fixed-size pixel and depth storage.
//!
//! Buffers are allocated once and only ever change *role*: swapping a
//! [`DoubleBuffer`] exchanges two boxes, it never copies pixels.

use super::{Rgb, Rgba};

/// Cleared depth value; smaller is nearer.
pub const DEPTH_CLEAR: u8 = 0xFF;

/// Row-major `0x00RRGGBB` frame-buffer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorBuffer {
    width: usize,
    height: usize,
    pixels: Box<[Rgba]>,
}

impl ColorBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width * height].into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Whole frame, ready for `minifb::Window::update_with_buffer`.
    #[inline]
    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgba] {
        &mut self.pixels
    }

    /// One scan-line.
    #[inline]
    pub fn row_mut(&mut self, y: usize) -> &mut [Rgba] {
        let start = y * self.width;
        &mut self.pixels[start..start + self.width]
    }

    pub fn fill(&mut self, px: Rgba) {
        self.pixels.fill(px);
    }

    /// Bounds-checked read; `None` outside the buffer.
    pub fn get(&self, x: i32, y: i32) -> Option<Rgb> {
        self.index(x, y).map(|i| Rgb::from_rgba(self.pixels[i]))
    }

    /// Bounds-checked write; off-screen pixels are ignored.
    #[inline]
    pub fn put(&mut self, x: i32, y: i32, color: Rgb) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color.to_rgba();
        }
    }

    /// Pack into RGB565 for the handheld panel. `out` must hold
    /// `width * height` entries.
    pub fn to_rgb565(&self, out: &mut [u16]) {
        debug_assert_eq!(out.len(), self.pixels.len());
        for (dst, &px) in out.iter_mut().zip(self.pixels.iter()) {
            let c = Rgb::from_rgba(px);
            *dst = ((c.r as u16 & 0xF8) << 8) | ((c.g as u16 & 0xFC) << 3) | (c.b as u16 >> 3);
        }
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }
}

/// One byte of depth per pixel.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DepthBuffer {
    width: usize,
    height: usize,
    samples: Box<[u8]>,
}

impl DepthBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            samples: vec![DEPTH_CLEAR; width * height].into_boxed_slice(),
        }
    }

    #[inline(always)]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline(always)]
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.samples.fill(DEPTH_CLEAR);
    }

    #[inline]
    pub fn samples(&self) -> &[u8] {
        &self.samples
    }

    #[inline]
    pub(crate) fn samples_mut(&mut self) -> &mut [u8] {
        &mut self.samples
    }

    /// Stored depth, or [`DEPTH_CLEAR`] outside the buffer.
    pub fn read(&self, x: i32, y: i32) -> u8 {
        self.index(x, y)
            .map(|i| self.samples[i])
            .unwrap_or(DEPTH_CLEAR)
    }

    /// Overlay depth test: passes when `z` is strictly nearer than what is
    /// stored, and records `z` on pass. Off-screen always fails.
    #[inline]
    pub fn depth_test(&mut self, x: i32, y: i32, z: u8) -> bool {
        match self.index(x, y) {
            Some(i) if z < self.samples[i] => {
                self.samples[i] = z;
                true
            }
            _ => false,
        }
    }

    #[inline(always)]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(y as usize * self.width + x as usize)
    }
}

/// Two instances of `T`: `front` is read/presented, `back` is written.
#[derive(Debug)]
pub struct DoubleBuffer<T> {
    front: Box<T>,
    back: Box<T>,
}

impl<T> DoubleBuffer<T> {
    pub fn new(front: T, back: T) -> Self {
        Self {
            front: Box::new(front),
            back: Box::new(back),
        }
    }

    #[inline]
    pub fn front(&self) -> &T {
        &self.front
    }

    #[inline]
    pub fn front_mut(&mut self) -> &mut T {
        &mut self.front
    }

    #[inline]
    pub fn back(&self) -> &T {
        &self.back
    }

    #[inline]
    pub fn back_mut(&mut self) -> &mut T {
        &mut self.back
    }

    /// Exchange roles. Only the two boxes move.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.front, &mut self.back);
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
