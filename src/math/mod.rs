//! Fixed-point helpers shared by projection and rasterization.
//!
//! Floats are used once per frame to build the view-projection matrix;
//! everything per-vertex and per-pixel afterwards is integer maths in
//! units of [`FIXED_POINT_FACTOR`].

mod basis;
mod fixed;

pub use basis::Basis;
pub use fixed::{
    FIXED_POINT_FACTOR, Fixed, FixedMat4, mat4_from_rows, matrix_multiply, matrix_to_fixed,
    to_fixed,
};
