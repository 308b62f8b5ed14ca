use glam::Vec3;

/// Orthonormal camera axes in world space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Basis {
    pub right: Vec3,
    pub up: Vec3,
    pub forward: Vec3,
}

impl Basis {
    /// Axes for a camera with the given heading and tilt.
    ///
    /// Left-handed, Y up: yaw 0 looks along +Z, positive yaw turns towards
    /// +X, positive pitch looks up.
    pub fn from_yaw_pitch(yaw: f32, pitch: f32) -> Self {
        let (sy, cy) = yaw.sin_cos();
        let (sp, cp) = pitch.sin_cos();
        let forward = Vec3::new(sy * cp, sp, cy * cp);
        // straight up/down leaves Y × forward undefined; fall back to the
        // heading's horizontal right vector
        let right = Vec3::Y
            .cross(forward)
            .try_normalize()
            .unwrap_or(Vec3::new(cy, 0.0, -sy));
        let up = forward.cross(right);
        Self { right, up, forward }
    }
}
