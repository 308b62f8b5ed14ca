//! Primitive builders on top of [`crate::world::Camera::project`].
//!
//! Boxes go into the frame's triangle list and are rasterized later;
//! billboards are painted straight onto the finished image through an
//! [`crate::renderer::Overlay`].

mod billboard;
mod cube;
mod street;

pub use billboard::{Diamond, GEM_COLORS, SpriteRenderer, draw_billboard};
pub use cube::{Faces, GROUND_TILE, draw_cube, draw_ground};
pub use street::{draw_street, draw_street_sprites};
