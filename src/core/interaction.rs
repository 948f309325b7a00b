//! Pointer-driven foam wiping.

use crate::core::constants::{
    HOVER_RADIUS_DEFAULT, RADIUS_MAX, RADIUS_MIN, RAG_RADIUS_DEFAULT, RADIUS_STEP,
};
use crate::core::foam::{FoamStack, LayerId};
use crate::core::hit_test::test_proximity;
use crate::core::input::{InputSource, Modifiers, PointerKind, PointerSample};
use crate::core::mesh::{MeshId, ModelAsset};
use glam::Mat4;
use smallvec::SmallVec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum InteractionMode {
    /// Shift + pointer move wipes continuously.
    #[default]
    HoverWipe,
    /// Each pointer press wipes once, modifiers ignored.
    RagWipe,
}

impl InteractionMode {
    pub fn toggled(self) -> Self {
        match self {
            InteractionMode::HoverWipe => InteractionMode::RagWipe,
            InteractionMode::RagWipe => InteractionMode::HoverWipe,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            InteractionMode::HoverWipe => "Hover wipe (hold Shift)",
            InteractionMode::RagWipe => "Rag wipe (click)",
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct WipeOutcome {
    /// Meshes newly hidden by this event, per layer.
    pub hidden: SmallVec<[(LayerId, MeshId); 8]>,
    /// Whether the event was one the active mode listens to.
    pub evaluated: bool,
}

impl WipeOutcome {
    pub fn needs_redraw(&self) -> bool {
        !self.hidden.is_empty()
    }
}

#[derive(Clone, Debug)]
pub struct FoamInteractionController {
    mode: InteractionMode,
    hover_radius: f32,
    rag_radius: f32,
    press_active: bool,
}

impl Default for FoamInteractionController {
    fn default() -> Self {
        Self {
            mode: InteractionMode::default(),
            hover_radius: HOVER_RADIUS_DEFAULT,
            rag_radius: RAG_RADIUS_DEFAULT,
            press_active: false,
        }
    }
}

impl FoamInteractionController {
    pub fn new(mode: InteractionMode, hover_radius: f32, rag_radius: f32) -> Self {
        let mut c = Self {
            mode,
            ..Default::default()
        };
        c.hover_radius = clamp_radius(hover_radius);
        c.rag_radius = clamp_radius(rag_radius);
        c
    }

    pub fn mode(&self) -> InteractionMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: InteractionMode) {
        if mode != self.mode {
            log::info!("[foam] mode -> {:?}", mode);
        }
        self.mode = mode;
        self.press_active = false;
    }

    pub fn toggle_mode(&mut self) -> InteractionMode {
        self.set_mode(self.mode.toggled());
        self.mode
    }

    /// Radius used by the active mode.
    pub fn radius(&self) -> f32 {
        match self.mode {
            InteractionMode::HoverWipe => self.hover_radius,
            InteractionMode::RagWipe => self.rag_radius,
        }
    }

    pub fn set_radius(&mut self, radius: f32) {
        let r = clamp_radius(radius);
        match self.mode {
            InteractionMode::HoverWipe => self.hover_radius = r,
            InteractionMode::RagWipe => self.rag_radius = r,
        }
    }

    pub fn nudge_radius(&mut self, steps: i32) {
        self.set_radius(self.radius() + steps as f32 * RADIUS_STEP);
    }

    /// Whether an event of this kind would run a wipe right now. Does not
    /// change press tracking, so callers can skip picking for events the
    /// active mode ignores.
    pub fn would_trigger(&self, kind: PointerKind, modifiers: Modifiers, input: &dyn InputSource) -> bool {
        match (self.mode, kind) {
            (InteractionMode::HoverWipe, PointerKind::Move) => modifiers.union(input.modifiers()).shift,
            (InteractionMode::RagWipe, PointerKind::Down) => !self.press_active,
            _ => false,
        }
    }

    fn triggers(&mut self, sample: &PointerSample, input: &dyn InputSource) -> bool {
        let fire = self.would_trigger(sample.kind, sample.modifiers, input);
        match (self.mode, sample.kind) {
            (InteractionMode::RagWipe, PointerKind::Down) => self.press_active = true,
            (InteractionMode::RagWipe, PointerKind::Up) => self.press_active = false,
            _ => {}
        }
        fire
    }

    /// Run one pointer event against every foam layer.
    ///
    /// Every visible mesh within the radius is hidden, not only the nearest.
    pub fn handle(
        &mut self,
        sample: &PointerSample,
        input: &dyn InputSource,
        model: &ModelAsset,
        root: Mat4,
        foam: &mut FoamStack,
    ) -> WipeOutcome {
        let mut out = WipeOutcome::default();
        if !self.triggers(sample, input) {
            return out;
        }
        out.evaluated = true;
        let radius = self.radius();
        let point = match sample.world_point {
            Some(p) if radius > 0.0 => p,
            _ => return out,
        };
        for index in 0..foam.len() {
            let layer = &foam.layers()[index];
            let layer_id = layer.id;
            let hits: SmallVec<[MeshId; 8]> = model
                .meshes()
                .iter()
                .filter(|m| !foam.is_hidden(index, m.id))
                .filter(|m| test_proximity(point, &m.positions, &layer.world_matrix(root, m), radius))
                .map(|m| m.id)
                .collect();
            for id in hits {
                if foam.mark_hidden(index, id) {
                    out.hidden.push((layer_id, id));
                }
            }
        }
        if out.needs_redraw() {
            log::debug!("[foam] wiped {} mesh(es)", out.hidden.len());
        }
        out
    }
}

fn clamp_radius(r: f32) -> f32 {
    if r.is_finite() {
        r.clamp(RADIUS_MIN, RADIUS_MAX)
    } else {
        RADIUS_MIN
    }
}
