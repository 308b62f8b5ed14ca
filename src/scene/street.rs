use glam::Vec3;

use super::{Diamond, draw_billboard, draw_ground};
use crate::{
    renderer::{Overlay, Rgb, TriangleList},
    world::{Camera, City},
};

const MARKER_COLOR: Rgb = Rgb::new(255, 220, 100);
const MARKER_SIZE: f32 = 1.5;
/// The follow target is drawn this far above the street.
const MARKER_LIFT: f32 = 0.5;

/// Submit the ground around `focus` and every loaded building.
/// Returns the number of triangles the list accepted.
pub fn draw_street(camera: &Camera, city: &City, list: &mut TriangleList, focus: Vec3) -> usize {
    let before = list.len();
    draw_ground(camera, list, focus);
    city.draw_buildings(camera, list);
    list.len() - before
}

/// Paint gem sprites and a marker for the follow target over the finished
/// image. Returns how many sprites were drawn.
pub fn draw_street_sprites(
    camera: &Camera,
    city: &City,
    overlay: &mut Overlay<'_>,
    focus: Vec3,
    time_ms: u32,
) -> usize {
    let mut drawn = city.draw_gems(camera, overlay, time_ms);
    let mut marker = Diamond::new(MARKER_COLOR);
    if draw_billboard(camera, focus + Vec3::Y * MARKER_LIFT, &mut marker, MARKER_SIZE, overlay) {
        drawn += 1;
    }
    drawn
}
