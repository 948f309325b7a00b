//! Spatial queries used by the foam wipe: vertex proximity and ray picking.

use crate::core::mesh::MeshDescriptor;
use glam::{Mat4, Vec3};

/// Does any vertex, moved into world space by `world`, lie strictly within
/// `radius` of `point`?
///
/// Stops at the first match. Empty buffers and non-positive or non-finite
/// radii never match.
pub fn test_proximity(point: Vec3, vertices: &[Vec3], world: &Mat4, radius: f32) -> bool {
    if radius <= 0.0 || !radius.is_finite() || !point.is_finite() {
        return false;
    }
    let r2 = radius * radius;
    vertices
        .iter()
        .any(|v| world.transform_point3(*v).distance_squared(point) < r2)
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub dir: Vec3,
}

impl Ray {
    pub fn new(origin: Vec3, dir: Vec3) -> Self {
        Self {
            origin,
            dir: dir.normalize_or_zero(),
        }
    }

    #[inline]
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.dir * t
    }
}

/// Möller–Trumbore; both faces count since foam is double-sided.
pub fn ray_triangle(ray: &Ray, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
    const EPS: f32 = 1e-7;
    let e1 = b - a;
    let e2 = c - a;
    let p = ray.dir.cross(e2);
    let det = e1.dot(p);
    if det.abs() < EPS {
        return None;
    }
    let inv = 1.0 / det;
    let s = ray.origin - a;
    let u = s.dot(p) * inv;
    if !(0.0..=1.0).contains(&u) {
        return None;
    }
    let q = s.cross(e1);
    let v = ray.dir.dot(q) * inv;
    if v < 0.0 || u + v > 1.0 {
        return None;
    }
    let t = e2.dot(q) * inv;
    (t > EPS).then_some(t)
}

/// Nearest hit distance along `ray` against `mesh` placed by `world`.
pub fn raycast_mesh(ray: &Ray, mesh: &MeshDescriptor, world: &Mat4) -> Option<f32> {
    let mut best: Option<f32> = None;
    for [a, b, c] in mesh.triangles() {
        let hit = ray_triangle(
            ray,
            world.transform_point3(a),
            world.transform_point3(b),
            world.transform_point3(c),
        );
        if let Some(t) = hit {
            match best {
                Some(bt) if t >= bt => {}
                _ => best = Some(t),
            }
        }
    }
    best
}

/// World-space point where `ray` first meets any of the candidates.
pub fn pick_point<'a, I>(ray: &Ray, candidates: I) -> Option<Vec3>
where
    I: IntoIterator<Item = (&'a MeshDescriptor, Mat4)>,
{
    let mut best: Option<f32> = None;
    for (mesh, world) in candidates {
        if let Some(t) = raycast_mesh(ray, mesh, &world) {
            match best {
                Some(bt) if t >= bt => {}
                _ => best = Some(t),
            }
        }
    }
    best.map(|t| ray.at(t))
}
