use bitflags::bitflags;
use glam::Vec3;

use crate::{
    renderer::{RasterTriangle, Rgb, ScreenVertex, TriangleList},
    world::Camera,
};

bitflags! {
    /// Which faces of a box made it into the triangle list.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
    pub struct Faces: u8 {
        const FRONT  = 0x01;
        const BACK   = 0x02;
        const LEFT   = 0x04;
        const RIGHT  = 0x08;
        const TOP    = 0x10;
        const BOTTOM = 0x20;
    }
}

/// Unit box corners: base centred on the origin, top at y = 1.
const CORNERS: [Vec3; 8] = [
    Vec3::new(-0.5, 0.0, -0.5),
    Vec3::new(0.5, 0.0, -0.5),
    Vec3::new(0.5, 1.0, -0.5),
    Vec3::new(-0.5, 1.0, -0.5),
    Vec3::new(-0.5, 0.0, 0.5),
    Vec3::new(0.5, 0.0, 0.5),
    Vec3::new(0.5, 1.0, 0.5),
    Vec3::new(-0.5, 1.0, 0.5),
];

enum Shade {
    Side(f32),
    Top,
    Bottom,
}

/// Counter-clockwise seen from outside. For the four walls, quad
/// corners 1 and 2 are the upper edge.
const FACES: [(Faces, [usize; 4], Shade); 6] = [
    (Faces::FRONT, [1, 2, 3, 0], Shade::Side(0.7)),
    (Faces::BACK, [4, 7, 6, 5], Shade::Side(0.9)),
    (Faces::LEFT, [0, 3, 7, 4], Shade::Side(0.6)),
    (Faces::RIGHT, [5, 6, 2, 1], Shade::Side(1.0)),
    (Faces::TOP, [2, 6, 7, 3], Shade::Top),
    (Faces::BOTTOM, [5, 1, 0, 4], Shade::Bottom),
];

/// Fake sky light on the upper edge of every wall.
const TOP_EDGE_BOOST: u8 = 30;

/// Submit a shaded box standing on `base` (centre of its bottom face).
///
/// A face is emitted only if all four of its corners project; there is no
/// clipping. Back faces are left to the rasterizer's area test.
pub fn draw_cube(
    camera: &Camera,
    list: &mut TriangleList,
    base: Vec3,
    size: Vec3,
    top: Rgb,
    side: Rgb,
) -> Faces {
    let projected = CORNERS.map(|c| camera.project(base + c * size));

    let mut emitted = Faces::empty();
    for (face, idx, shade) in &FACES {
        let Some([v0, v1, v2, v3]) = quad(&projected, *idx) else {
            continue;
        };

        let (base_color, edge) = match shade {
            Shade::Side(k) => (side.shade(*k), side.shade(*k).brighten(TOP_EDGE_BOOST)),
            Shade::Top => (top, top),
            Shade::Bottom => (side.halve(), side.halve()),
        };
        let v0 = v0.with_color(base_color);
        let v1 = v1.with_color(edge);
        let v2 = v2.with_color(edge);
        let v3 = v3.with_color(base_color);

        let a = list.push(RasterTriangle::new(v0, v1, v2));
        let b = list.push(RasterTriangle::new(v0, v2, v3));
        if a && b {
            emitted |= *face;
        }
    }
    emitted
}

#[inline]
fn quad(projected: &[Option<ScreenVertex>; 8], idx: [usize; 4]) -> Option<[ScreenVertex; 4]> {
    Some([
        projected[idx[0]]?,
        projected[idx[1]]?,
        projected[idx[2]]?,
        projected[idx[3]]?,
    ])
}

/// Side of one ground tile in world units.
pub const GROUND_TILE: f32 = 4.0;
const GROUND_RADIUS: i32 = 5;
const GROUND_DARK: Rgb = Rgb::new(60, 60, 70);
const GROUND_LIGHT: Rgb = Rgb::new(80, 80, 90);

/// Checkerboard of flat slabs around `centre`, tops flush with y = 0.
/// Returns the number of tiles that put at least one face on screen.
pub fn draw_ground(camera: &Camera, list: &mut TriangleList, centre: Vec3) -> usize {
    let gx0 = (centre.x / GROUND_TILE).floor() as i32;
    let gz0 = (centre.z / GROUND_TILE).floor() as i32;
    let size = Vec3::new(GROUND_TILE, 0.5, GROUND_TILE);

    let mut drawn = 0;
    for gx in gx0 - GROUND_RADIUS..=gx0 + GROUND_RADIUS {
        for gz in gz0 - GROUND_RADIUS..=gz0 + GROUND_RADIUS {
            let color = if (gx + gz) & 1 == 0 {
                GROUND_DARK
            } else {
                GROUND_LIGHT
            };
            let base = Vec3::new(
                gx as f32 * GROUND_TILE + GROUND_TILE / 2.0,
                -0.5,
                gz as f32 * GROUND_TILE + GROUND_TILE / 2.0,
            );
            if !draw_cube(camera, list, base, size, color, color).is_empty() {
                drawn += 1;
            }
        }
    }
    drawn
}

/*──────────────────────────────── Tests ───────────────────────────────*/
