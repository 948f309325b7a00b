//! Immutable mesh descriptors.
//!
//! Geometry is decoded once by the host page and handed over as flat buffers.
//! After that it is never mutated: visibility and material overrides live in
//! side tables keyed by [`MeshId`] (see `foam`), and foam layers reuse the
//! same descriptors with their own transforms instead of cloning geometry.

use crate::core::error::{Result, ShowroomError};
use glam::{Mat4, Quat, Vec3};
use std::rc::Rc;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MeshId(pub u32);

/// Local placement of a mesh inside the model.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Unpack `[px, py, pz, qx, qy, qz, qw, sx, sy, sz]`.
    pub fn from_packed(packed: &[f32]) -> Option<Self> {
        if packed.len() != 10 || packed.iter().any(|v| !v.is_finite()) {
            return None;
        }
        let rotation = Quat::from_xyzw(packed[3], packed[4], packed[5], packed[6]);
        if rotation.length_squared() < 1e-12 {
            return None;
        }
        Some(Self {
            position: Vec3::new(packed[0], packed[1], packed[2]),
            rotation: rotation.normalize(),
            scale: Vec3::new(packed[7], packed[8], packed[9]),
        })
    }
}

#[derive(Clone, Debug)]
pub struct MeshDescriptor {
    pub id: MeshId,
    pub name: String,
    pub positions: Rc<[Vec3]>,
    pub normals: Rc<[Vec3]>,
    pub indices: Rc<[u32]>,
    pub transform: Transform,
}

impl MeshDescriptor {
    pub fn new(
        id: MeshId,
        name: impl Into<String>,
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        transform: Transform,
    ) -> Result<Self> {
        let name = name.into();
        if let Some(bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(ShowroomError::asset(
                name,
                format!("index {} out of range for {} vertices", bad, positions.len()),
            ));
        }
        if indices.len() % 3 != 0 {
            return Err(ShowroomError::asset(
                name,
                format!("index count {} is not a multiple of 3", indices.len()),
            ));
        }
        let normals = compute_normals(&positions, &indices);
        Ok(Self {
            id,
            name,
            positions: positions.into(),
            normals: normals.into(),
            indices: indices.into(),
            transform,
        })
    }

    /// Build from the flat buffers the host page passes across the JS boundary.
    pub fn from_flat(
        id: MeshId,
        name: &str,
        positions: &[f32],
        indices: &[u32],
        transform: &[f32],
    ) -> Result<Self> {
        if positions.len() % 3 != 0 {
            return Err(ShowroomError::asset(
                name,
                format!("position buffer length {} is not a multiple of 3", positions.len()),
            ));
        }
        if positions.iter().any(|v| !v.is_finite()) {
            return Err(ShowroomError::asset(name, "non-finite vertex position"));
        }
        let transform = Transform::from_packed(transform)
            .ok_or_else(|| ShowroomError::asset(name, "transform must be 10 finite floats"))?;
        let points = positions
            .chunks_exact(3)
            .map(|c| Vec3::new(c[0], c[1], c[2]))
            .collect();
        Self::new(id, name, points, indices.to_vec(), transform)
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Triangle corners; an unindexed mesh is read as a plain triangle list.
    pub fn triangles(&self) -> impl Iterator<Item = [Vec3; 3]> + '_ {
        let indexed = !self.indices.is_empty();
        let count = if indexed {
            self.indices.len() / 3
        } else {
            self.positions.len() / 3
        };
        (0..count).map(move |t| {
            if indexed {
                [
                    self.positions[self.indices[t * 3] as usize],
                    self.positions[self.indices[t * 3 + 1] as usize],
                    self.positions[self.indices[t * 3 + 2] as usize],
                ]
            } else {
                [
                    self.positions[t * 3],
                    self.positions[t * 3 + 1],
                    self.positions[t * 3 + 2],
                ]
            }
        })
    }
}

/// Area-weighted vertex normals. Vertices no triangle touches get +Y.
pub fn compute_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut acc = vec![Vec3::ZERO; positions.len()];
    let mut add_tri = |a: usize, b: usize, c: usize| {
        let n = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        acc[a] += n;
        acc[b] += n;
        acc[c] += n;
    };
    if indices.is_empty() {
        for t in 0..positions.len() / 3 {
            add_tri(t * 3, t * 3 + 1, t * 3 + 2);
        }
    } else {
        for tri in indices.chunks_exact(3) {
            add_tri(tri[0] as usize, tri[1] as usize, tri[2] as usize);
        }
    }
    acc.into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

/// The loaded model: an ordered list of meshes sharing one root placement.
#[derive(Clone, Debug, Default)]
pub struct ModelAsset {
    meshes: Vec<MeshDescriptor>,
}

impl ModelAsset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_id(&self) -> MeshId {
        MeshId(self.meshes.len() as u32)
    }

    pub fn push(&mut self, mesh: MeshDescriptor) {
        self.meshes.push(mesh);
    }

    pub fn meshes(&self) -> &[MeshDescriptor] {
        &self.meshes
    }

    pub fn get(&self, id: MeshId) -> Option<&MeshDescriptor> {
        self.meshes.iter().find(|m| m.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = MeshId> + '_ {
        self.meshes.iter().map(|m| m.id)
    }

    pub fn len(&self) -> usize {
        self.meshes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }
}
