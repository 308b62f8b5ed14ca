use glam::Vec3;

use crate::{
    config::CameraConfig,
    math::{
        Basis, FIXED_POINT_FACTOR, FixedMat4, mat4_from_rows, matrix_multiply, matrix_to_fixed,
        to_fixed,
    },
    renderer::{GUARD_BAND, Rgb, ScreenVertex},
};

/// World coordinates are clamped to this before conversion so that the
/// fixed-point products stay inside `i64` with room to spare.
const WORLD_LIMIT: f32 = 1.0e6;

/// Third-person view-point.
///
/// * Left-handed, Y up; yaw 0 looks along +Z.
/// * `yaw`/`pitch` are never set directly: they are derived from a look-at
///   target every frame, see [`Camera::update_third_person`].
#[derive(Clone, Debug)]
pub struct Camera {
    pos: Vec3,
    yaw: f32,
    pitch: f32,
    basis: Basis,

    follow_distance: f32,
    follow_height: f32,
    look_lift: f32,

    /// Rows 2 and 3 of the projection are fixed at construction.
    projection: glam::Mat4,
    view_proj: FixedMat4,

    width: i64,
    height: i64,
}

impl Camera {
    pub fn new(cfg: &CameraConfig, width: usize, height: usize) -> Self {
        let focal = 1.0 / (cfg.fov_degrees.to_radians() * 0.5).tan();
        let aspect = width as f32 / height as f32;
        let depth = cfg.far - cfg.near;

        // w = view z; z = (view z - near) / (far - near), i.e. linear depth
        // in 0‥1 so the 8-bit buffer gets even resolution over the range
        let projection = mat4_from_rows([
            [focal / aspect, 0.0, 0.0, 0.0],
            [0.0, focal, 0.0, 0.0],
            [0.0, 0.0, 1.0 / depth, -cfg.near / depth],
            [0.0, 0.0, 1.0, 0.0],
        ]);

        let mut cam = Self {
            pos: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            basis: Basis::from_yaw_pitch(0.0, 0.0),
            follow_distance: cfg.follow_distance,
            follow_height: cfg.follow_height,
            look_lift: cfg.look_lift,
            projection,
            view_proj: FixedMat4::default(),
            width: width as i64,
            height: height as i64,
        };
        cam.rebuild();
        cam
    }

    /// Place the eye behind and above `target` (relative to the target's
    /// heading) and look at a point just above it.
    ///
    /// The eye is kept within `±WORLD_LIMIT` on every axis, like projected
    /// points; past that the view no longer follows the target.
    pub fn update_third_person(&mut self, target: Vec3, target_yaw: f32) {
        let (s, c) = target_yaw.sin_cos();
        let eye = target - Vec3::new(s, 0.0, c) * self.follow_distance
            + Vec3::Y * self.follow_height;
        self.look_at(eye, target + Vec3::Y * self.look_lift);
    }

    /// Put the eye at `eye` (clamped to `±WORLD_LIMIT`) looking at `target`.
    pub fn look_at(&mut self, eye: Vec3, target: Vec3) {
        let eye = eye.clamp(Vec3::splat(-WORLD_LIMIT), Vec3::splat(WORLD_LIMIT));
        let d = target - eye;
        self.pos = eye;
        self.yaw = d.x.atan2(d.z);
        self.pitch = d.y.atan2((d.x * d.x + d.z * d.z).sqrt());
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.basis = Basis::from_yaw_pitch(self.yaw, self.pitch);
        let Basis { right, up, forward } = self.basis;
        let eye = self.pos;
        let view = mat4_from_rows([
            [right.x, right.y, right.z, -right.dot(eye)],
            [up.x, up.y, up.z, -up.dot(eye)],
            [forward.x, forward.y, forward.z, -forward.dot(eye)],
            [0.0, 0.0, 0.0, 1.0],
        ]);
        self.view_proj = matrix_to_fixed(&matrix_multiply(&self.projection, &view));
    }

    /// Project a world point to pixel coordinates plus depth.
    ///
    /// `None` when the point is behind the eye (w ≤ 0) or its depth falls
    /// outside `(0, FIXED_POINT_FACTOR]`. Depth is linear, so the `w` divide
    /// only applies to x and y.
    pub fn project(&self, p: Vec3) -> Option<ScreenVertex> {
        let p = p.clamp(Vec3::splat(-WORLD_LIMIT), Vec3::splat(WORLD_LIMIT));
        let [cx, cy, cz, w] = self
            .view_proj
            .transform_point(to_fixed(p.x), to_fixed(p.y), to_fixed(p.z));
        if w <= 0 {
            return None;
        }
        let one = FIXED_POINT_FACTOR as i64;
        if cz <= 0 || cz > one {
            return None;
        }

        // normalised device coordinates, fixed point
        let nx = cx * one / w;
        let ny = cy * one / w;

        let band = GUARD_BAND as i64;
        let sx = ((nx + one) * (self.width - 1) / (2 * one)).clamp(-band, band);
        let sy = ((one - ny) * (self.height - 1) / (2 * one)).clamp(-band, band);

        Some(ScreenVertex {
            x: sx as i16,
            y: sy as i16,
            z: cz as u16,
            color: Rgb::WHITE,
        })
    }

    #[inline]
    pub fn position(&self) -> Vec3 {
        self.pos
    }

    #[inline]
    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    #[inline]
    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    #[inline]
    pub fn basis(&self) -> &Basis {
        &self.basis
    }

    /// Combined fixed-point matrix used by [`Camera::project`].
    #[inline]
    pub fn view_projection(&self) -> &FixedMat4 {
        &self.view_proj
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
