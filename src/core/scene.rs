//! Per-frame scene composition for the model viewer.
//!
//! The composer owns the camera, the lighting rig and the viewer settings,
//! and every animation frame turns the model plus the foam stack into a flat
//! list of draw items. The GPU side only rasterizes what it is handed.

use crate::core::camera::{screen_to_world_ray, Camera, OrbitCamera};
use crate::core::constants::*;
use crate::core::foam::{FoamStack, LayerId};
use crate::core::hit_test::{pick_point, Ray};
use crate::core::input::Viewport;
use crate::core::mesh::{MeshDescriptor, MeshId, ModelAsset};
use glam::{Mat4, Vec2, Vec3};

/// Slider-backed viewer settings; setters clamp to the slider ranges.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewerSettings {
    scale: f32,
    zoom: f32,
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            scale: SCALE_DEFAULT,
            zoom: ZOOM_DEFAULT,
        }
    }
}

impl ViewerSettings {
    pub fn scale(&self) -> f32 {
        self.scale
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn set_scale(&mut self, scale: f32) {
        if scale.is_finite() {
            self.scale = scale.clamp(SCALE_MIN, SCALE_MAX);
        }
    }

    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.zoom = zoom.clamp(ZOOM_MIN, ZOOM_MAX);
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionalLight {
    pub position: Vec3,
    pub intensity: f32,
}

impl DirectionalLight {
    /// Direction the light travels (towards the origin).
    pub fn direction(&self) -> Vec3 {
        (-self.position).normalize_or_zero()
    }
}

/// Rectangular ceiling light aimed at `target`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AreaLight {
    pub position: Vec3,
    pub target: Vec3,
    pub size: [f32; 2],
    pub intensity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightingRig {
    pub ambient: f32,
    pub directional: DirectionalLight,
    pub area: AreaLight,
}

impl Default for LightingRig {
    fn default() -> Self {
        Self {
            ambient: AMBIENT_INTENSITY,
            directional: DirectionalLight {
                position: Vec3::from_array(DIRECTIONAL_POSITION),
                intensity: DIRECTIONAL_INTENSITY,
            },
            area: AreaLight {
                position: Vec3::from_array(AREA_POSITION),
                target: Vec3::ZERO,
                size: AREA_SIZE,
                intensity: AREA_INTENSITY,
            },
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawPass {
    Opaque,
    Foam,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DrawItem {
    pub mesh: MeshId,
    pub layer: Option<LayerId>,
    pub world: Mat4,
    pub color: [f32; 4],
    pub pass: DrawPass,
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct SceneFrame {
    pub viewport: Viewport,
    pub view_proj: Mat4,
    pub eye: Vec3,
    pub lights: LightingRig,
    pub draws: Vec<DrawItem>,
}

impl SceneFrame {
    pub fn foam_draws(&self) -> impl Iterator<Item = &DrawItem> {
        self.draws.iter().filter(|d| d.pass == DrawPass::Foam)
    }
}

/// Per-draw uniform slots to allocate for `needed` draws: unchanged while
/// they fit, otherwise the next power of two, never past `limit`.
pub fn grow_draw_capacity(current: usize, needed: usize, limit: usize) -> usize {
    if needed <= current {
        return current;
    }
    needed.next_power_of_two().min(limit).max(current)
}

/// Rasterizer behind the composer.
pub trait SceneRenderer {
    type Error: std::fmt::Debug;

    fn render(&mut self, frame: &SceneFrame, model: &ModelAsset) -> Result<(), Self::Error>;
}

#[derive(Clone, Debug, Default)]
pub struct ViewerSceneComposer {
    pub settings: ViewerSettings,
    pub orbit: OrbitCamera,
    pub lights: LightingRig,
    camera: Camera,
}

impl ViewerSceneComposer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Model placement: fixed offset, uniform slider scale.
    pub fn root_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            Vec3::splat(self.settings.scale()),
            glam::Quat::IDENTITY,
            model_position(),
        )
    }

    /// Camera as of the latest settings and orbit state.
    pub fn camera(&self, viewport: Viewport) -> Camera {
        let mut cam = self.camera.clone();
        cam.aspect = viewport.aspect();
        cam.zoom = self.settings.zoom();
        self.orbit.apply_to(&mut cam);
        cam
    }

    pub fn pointer_ray(&self, viewport: Viewport, px: Vec2) -> Ray {
        let inv = self.camera(viewport).view_proj().inverse();
        screen_to_world_ray(viewport, px, inv)
    }

    /// Foam instances still showing, with their world matrices.
    pub fn foam_candidates<'a>(
        &self,
        model: &'a ModelAsset,
        foam: &FoamStack,
    ) -> Vec<(&'a MeshDescriptor, Mat4)> {
        let root = self.root_matrix();
        let mut out = Vec::new();
        for (index, layer) in foam.layers().iter().enumerate() {
            for mesh in model.meshes() {
                if !foam.is_hidden(index, mesh.id) {
                    out.push((mesh, layer.world_matrix(root, mesh)));
                }
            }
        }
        out
    }

    /// Where the pointer at `px` lands on visible foam.
    pub fn pick_foam(
        &self,
        viewport: Viewport,
        px: Vec2,
        model: &ModelAsset,
        foam: &FoamStack,
    ) -> Option<Vec3> {
        let ray = self.pointer_ray(viewport, px);
        pick_point(&ray, self.foam_candidates(model, foam))
    }

    /// Build this frame's draw list: the model first, then each foam layer's
    /// unwiped meshes, oldest layer first.
    pub fn compose(&self, viewport: Viewport, model: &ModelAsset, foam: &FoamStack) -> SceneFrame {
        let camera = self.camera(viewport);
        let root = self.root_matrix();
        let mut draws = Vec::with_capacity(model.len() * (1 + foam.len()));
        for mesh in model.meshes() {
            draws.push(DrawItem {
                mesh: mesh.id,
                layer: None,
                world: root * mesh.transform.matrix(),
                color: MODEL_BASE_COLOR,
                pass: DrawPass::Opaque,
            });
        }
        for (index, layer) in foam.layers().iter().enumerate() {
            for mesh in model.meshes() {
                if foam.is_hidden(index, mesh.id) {
                    continue;
                }
                draws.push(DrawItem {
                    mesh: mesh.id,
                    layer: Some(layer.id),
                    world: layer.world_matrix(root, mesh),
                    color: FOAM_COLOR,
                    pass: DrawPass::Foam,
                });
            }
        }
        SceneFrame {
            viewport,
            view_proj: camera.view_proj(),
            eye: camera.eye,
            lights: self.lights,
            draws,
        }
    }
}
