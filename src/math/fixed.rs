use glam::{Mat4, Vec4};

/// Real value scaled by [`FIXED_POINT_FACTOR`].
pub type Fixed = i32;

/// 1.0 in fixed-point units.
pub const FIXED_POINT_FACTOR: Fixed = 1024;

/// Truncating float → fixed conversion (matches a C-style cast).
#[inline(always)]
pub fn to_fixed(v: f32) -> Fixed {
    (v * FIXED_POINT_FACTOR as f32) as Fixed
}

/// Build a matrix from row-major data.
///
/// glam stores columns; the projection code thinks in rows applied to a
/// column vector, so every constructor goes through here.
pub fn mat4_from_rows(rows: [[f32; 4]; 4]) -> Mat4 {
    Mat4::from_cols_array_2d(&rows).transpose()
}

/// `a · b` – apply `b` first, then `a`.
#[inline]
pub fn matrix_multiply(a: &Mat4, b: &Mat4) -> Mat4 {
    *a * *b
}

/// Row-major 4×4 matrix of fixed-point entries.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FixedMat4(pub [[Fixed; 4]; 4]);

impl FixedMat4 {
    /// Transform a fixed-point point `(x, y, z, 1)`.
    ///
    /// Products are widened to `i64` and re-divided by the factor, so the
    /// result is still in fixed units.
    #[inline]
    pub fn transform_point(&self, x: Fixed, y: Fixed, z: Fixed) -> [i64; 4] {
        let (x, y, z) = (x as i64, y as i64, z as i64);
        let one = FIXED_POINT_FACTOR as i64;
        let mut out = [0i64; 4];
        for (row, o) in self.0.iter().zip(out.iter_mut()) {
            let acc = row[0] as i64 * x + row[1] as i64 * y + row[2] as i64 * z + row[3] as i64 * one;
            *o = acc / one;
        }
        out
    }
}

/// Convert every entry of `m` to fixed point.
pub fn matrix_to_fixed(m: &Mat4) -> FixedMat4 {
    let mut out = [[0; 4]; 4];
    for (r, row) in out.iter_mut().enumerate() {
        let src: Vec4 = m.row(r);
        for (c, v) in row.iter_mut().enumerate() {
            *v = to_fixed(src[c]);
        }
    }
    FixedMat4(out)
}

/*──────────────────────────────── Tests ───────────────────────────────*/
