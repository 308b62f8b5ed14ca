//! Edge-function triangle rasterizer with perspective-correct depth and
//! Gouraud colour.
//!
//! Every front end (synchronous or pipelined) funnels through
//! [`render_to_buffer`]; nothing else writes rasterized pixels.

use super::{ColorBuffer, DepthBuffer, RasterTriangle, Rgb};
use crate::math::FIXED_POINT_FACTOR;

const ONE: i64 = FIXED_POINT_FACTOR as i64;

/// Sky gradient colour for scan-line `y`.
#[inline]
pub fn background_color(y: usize) -> Rgb {
    Rgb::new(
        (40 + y / 6).min(255) as u8,
        (60 + y / 4).min(255) as u8,
        (120 + y / 3).min(255) as u8,
    )
}

pub fn fill_background(color: &mut ColorBuffer) {
    for y in 0..color.height() {
        let px = background_color(y).to_rgba();
        color.row_mut(y).fill(px);
    }
}

/// One full pass: clear depth, paint the background, rasterize `tris` in
/// submission order.
pub fn render_to_buffer(tris: &[RasterTriangle], color: &mut ColorBuffer, depth: &mut DepthBuffer) {
    depth.clear();
    fill_background(color);
    for tri in tris {
        rasterize(tri, color, depth);
    }
}

/// Rasterize one triangle; returns the number of pixels written.
///
/// * Back-facing and degenerate triangles (area ≤ 0) write nothing.
/// * A pixel is written when its depth is nearer than **or equal to** the
///   stored sample, so on exact ties the later triangle wins.
pub fn rasterize(tri: &RasterTriangle, color: &mut ColorBuffer, depth: &mut DepthBuffer) -> usize {
    debug_assert_eq!(color.width(), depth.width());
    debug_assert_eq!(color.height(), depth.height());

    let [x1, x2, x3] = tri.x.map(i32::from);
    let [y1, y2, y3] = tri.y.map(i32::from);

    let area = tri.signed_area();
    if area <= 0 {
        return 0;
    }

    // inclusive bounding box, clipped to the buffer
    let x_min = x1.min(x2).min(x3).max(0);
    let x_max = x1.max(x2).max(x3).min(color.width() as i32 - 1);
    let y_min = y1.min(y2).min(y3).max(0);
    let y_max = y1.max(y2).max(y3).min(color.height() as i32 - 1);
    if x_max < x_min || y_max < y_min {
        return 0;
    }

    // reciprocal depth per vertex: 1/z is affine in screen space
    let zi = tri.z.map(|z| {
        let z = (z as i64).clamp(1, ONE);
        ONE * ONE / z
    });

    let area = area as i64;
    let width = color.width();
    let pixels = color.pixels_mut();
    let samples = depth.samples_mut();
    let mut written = 0;

    for y in y_min..=y_max {
        // A triangle is convex, so its pixels on a row form one run: once
        // we have been inside, the first miss ends the row.
        let mut inside = false;

        for x in x_min..=x_max {
            let e1 = (x - x2) * (y3 - y2) - (y - y2) * (x3 - x2);
            let e2 = (x - x3) * (y1 - y3) - (y - y3) * (x1 - x3);
            let e3 = (x - x1) * (y2 - y1) - (y - y1) * (x2 - x1);
            if e1 < 0 || e2 < 0 || e3 < 0 {
                if inside {
                    break;
                }
                continue;
            }
            inside = true;

            let w1 = ONE * e1 as i64 / area;
            let w2 = ONE * e2 as i64 / area;
            let w3 = ONE - w1 - w2;

            let zi_interp = w1 * zi[0] + w2 * zi[1] + w3 * zi[2];
            if zi_interp <= 0 {
                continue;
            }
            let z = ONE * ONE * ONE / zi_interp;
            let z8 = (z * 255 / ONE).clamp(0, 255) as u8;

            let idx = y as usize * width + x as usize;
            if z8 > samples[idx] {
                continue;
            }
            samples[idx] = z8;

            let lerp = |c: [u8; 3]| -> u8 {
                ((w1 * c[0] as i64 + w2 * c[1] as i64 + w3 * c[2] as i64) / ONE).clamp(0, 255) as u8
            };
            pixels[idx] = Rgb::new(lerp(tri.r), lerp(tri.g), lerp(tri.b)).to_rgba();
            written += 1;
        }
    }
    written
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::{DEPTH_CLEAR, ScreenVertex};

    const W: usize = 16;
    const H: usize = 16;

    fn buffers() -> (ColorBuffer, DepthBuffer) {
        let mut c = ColorBuffer::new(W, H);
        fill_background(&mut c);
        (c, DepthBuffer::new(W, H))
    }

    fn v(x: i16, y: i16, z: u16, color: Rgb) -> ScreenVertex {
        ScreenVertex { x, y, z, color }
    }

    /// Counter-clockwise (front-facing) right triangle covering the lower
    /// right half of a 10×10 square.
    fn front_tri(z: u16, color: Rgb) -> RasterTriangle {
        RasterTriangle::new(v(1, 11, z, color), v(11, 11, z, color), v(11, 1, z, color))
    }

    #[test]
    fn back_facing_and_degenerate_write_nothing() {
        let (mut c, mut d) = buffers();
        let before = c.clone();
        let red = Rgb::new(255, 0, 0);

        let back = RasterTriangle::new(v(1, 11, 100, red), v(11, 1, 100, red), v(11, 11, 100, red));
        assert!(back.signed_area() < 0);
        assert_eq!(rasterize(&back, &mut c, &mut d), 0);

        let line = RasterTriangle::new(v(0, 0, 100, red), v(5, 5, 100, red), v(10, 10, 100, red));
        assert_eq!(line.signed_area(), 0);
        assert_eq!(rasterize(&line, &mut c, &mut d), 0);

        assert_eq!(c, before);
        assert!(d.samples().iter().all(|&s| s == DEPTH_CLEAR));
    }

    #[test]
    fn front_facing_fills_with_flat_color() {
        let (mut c, mut d) = buffers();
        let green = Rgb::new(0, 200, 0);
        let n = rasterize(&front_tri(512, green), &mut c, &mut d);
        assert!(n > 40, "only {n} pixels");
        // a pixel well inside the lower-right half
        assert_eq!(c.get(9, 9), Some(green));
        // upper-left half untouched
        assert_eq!(c.get(2, 3), Some(background_color(3)));
        // 512/1024 of the range → 127
        assert_eq!(d.read(9, 9), 127);
    }

    #[test]
    fn depth_never_increases_within_a_pass() {
        let (mut c, mut d) = buffers();
        let near = front_tri(200, Rgb::new(255, 0, 0));
        let far = front_tri(900, Rgb::new(0, 0, 255));

        rasterize(&near, &mut c, &mut d);
        let after_near = d.clone();
        let written = rasterize(&far, &mut c, &mut d);

        assert_eq!(written, 0);
        for (a, b) in after_near.samples().iter().zip(d.samples()) {
            assert!(b <= a);
        }
        assert_eq!(c.get(9, 9), Some(Rgb::new(255, 0, 0)));
    }

    #[test]
    fn later_triangle_wins_exact_ties() {
        let (mut c, mut d) = buffers();
        rasterize(&front_tri(400, Rgb::new(255, 0, 0)), &mut c, &mut d);
        rasterize(&front_tri(400, Rgb::new(0, 0, 255)), &mut c, &mut d);
        assert_eq!(c.get(9, 9), Some(Rgb::new(0, 0, 255)));
    }

    #[test]
    fn gouraud_blends_vertex_colors() {
        let (mut c, mut d) = buffers();
        let tri = RasterTriangle::new(
            v(1, 11, 500, Rgb::new(255, 0, 0)),
            v(11, 11, 500, Rgb::new(0, 255, 0)),
            v(11, 1, 500, Rgb::new(0, 0, 255)),
        );
        rasterize(&tri, &mut c, &mut d);
        let px = c.get(9, 9).unwrap();
        // mixed, no channel saturated
        assert!(px.r > 0 && px.g > 0 && px.b > 0);
        assert!(px.r < 255 && px.g < 255 && px.b < 255);
    }

    #[test]
    fn clips_to_buffer_bounds() {
        let (mut c, mut d) = buffers();
        let white = Rgb::WHITE;
        let huge = RasterTriangle::new(v(-100, 100, 300, white), v(100, 100, 300, white), v(100, -100, 300, white));
        let n = rasterize(&huge, &mut c, &mut d);
        assert!(n > 0 && n <= W * H);
    }

    #[test]
    fn empty_pass_is_background_only() {
        let mut c = ColorBuffer::new(W, H);
        let mut d = DepthBuffer::new(W, H);
        d.depth_test(3, 3, 10);

        render_to_buffer(&[], &mut c, &mut d);

        for y in 0..H as i32 {
            for x in 0..W as i32 {
                assert_eq!(c.get(x, y), Some(background_color(y as usize)));
            }
        }
        assert!(d.samples().iter().all(|&s| s == DEPTH_CLEAR));
    }
}
