//! Viewer camera: perspective projection with zoom, orbit-style control, and
//! screen-to-world picking rays.

use crate::core::constants::*;
use crate::core::hit_test::Ray;
use crate::core::input::Viewport;
use glam::{Mat4, Vec2, Vec3};

/// Simple right-handed camera description with perspective projection.
#[derive(Clone, Debug)]
pub struct Camera {
    pub eye: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub aspect: f32,
    pub fovy_radians: f32,
    pub znear: f32,
    pub zfar: f32,
    /// >1 narrows the field of view, like a lens zoom.
    pub zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            eye: camera_position(),
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect: 1.0,
            fovy_radians: CAMERA_FOV_DEG.to_radians(),
            znear: CAMERA_ZNEAR,
            zfar: CAMERA_ZFAR,
            zoom: ZOOM_DEFAULT,
        }
    }
}

impl Camera {
    /// Field of view after zoom.
    pub fn effective_fovy(&self) -> f32 {
        let zoom = self.zoom.max(f32::EPSILON);
        2.0 * ((self.fovy_radians * 0.5).tan() / zoom).atan()
    }

    /// Compute the clip-space projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.effective_fovy(), self.aspect, self.znear, self.zfar)
    }

    /// Compute the view matrix that transforms world to view space.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

/// Orbit control around a target point (rotate, dolly, pan).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::looking_from(camera_position(), Vec3::ZERO)
    }
}

impl OrbitCamera {
    pub fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(ORBIT_MIN_DISTANCE);
        Self {
            target,
            distance,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sy, cy) = self.yaw.sin_cos();
        let (sp, cp) = self.pitch.sin_cos();
        self.target + Vec3::new(cp * sy, sp, cp * cy) * self.distance
    }

    /// Drag by `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.yaw -= delta.x * ORBIT_ROTATE_SPEED;
        self.pitch =
            (self.pitch + delta.y * ORBIT_ROTATE_SPEED).clamp(-ORBIT_PITCH_LIMIT, ORBIT_PITCH_LIMIT);
    }

    /// Wheel delta; positive moves away.
    pub fn dolly(&mut self, wheel_delta: f32) {
        if !wheel_delta.is_finite() {
            return;
        }
        let factor = (1.0 + wheel_delta * ORBIT_DOLLY_SPEED).max(0.1);
        self.distance = (self.distance * factor).clamp(ORBIT_MIN_DISTANCE, ORBIT_MAX_DISTANCE);
    }

    /// Slide the target in the view plane by `delta` pixels.
    pub fn pan(&mut self, delta: Vec2, viewport: Viewport) {
        let forward = (self.target - self.eye()).normalize_or_zero();
        let right = forward.cross(Vec3::Y).normalize_or_zero();
        let up = right.cross(forward);
        let scale = self.distance / viewport.height as f32;
        self.target += (-right * delta.x + up * delta.y) * scale;
    }

    pub fn apply_to(&self, camera: &mut Camera) {
        camera.eye = self.eye();
        camera.target = self.target;
    }
}

/// World-space picking ray through pixel `px` of `viewport`.
pub fn screen_to_world_ray(viewport: Viewport, px: Vec2, inv_view_proj: Mat4) -> Ray {
    let ndc = viewport.to_ndc(px);
    let near = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 0.0));
    let far = inv_view_proj.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
    Ray::new(near, far - near)
}
