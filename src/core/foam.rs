//! Foam layers and the hidden sets the wipe writes into.

use crate::core::constants::{FOAM_LAYER_INFLATE_STEP, FOAM_SCALE_FACTOR, MAX_FOAM_LAYERS};
use crate::core::error::{Result, ShowroomError};
use crate::core::mesh::{MeshDescriptor, MeshId};
use fnv::FnvHashSet;
use glam::{Mat4, Vec3};
use instant::Instant;

/// Which meshes have had their foam wiped away.
///
/// Wiping only goes one way: a mesh leaves the set through [`reset_all`]
/// and nothing else.
///
/// [`reset_all`]: FoamLayerState::reset_all
#[derive(Clone, Debug, Default)]
pub struct FoamLayerState {
    hidden: FnvHashSet<MeshId>,
}

impl FoamLayerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if the mesh was visible before this call.
    pub fn mark_hidden(&mut self, id: MeshId) -> bool {
        self.hidden.insert(id)
    }

    pub fn is_hidden(&self, id: MeshId) -> bool {
        self.hidden.contains(&id)
    }

    pub fn reset_all(&mut self) {
        self.hidden.clear();
    }

    pub fn hidden_count(&self) -> usize {
        self.hidden.len()
    }

    pub fn hides_all<I: IntoIterator<Item = MeshId>>(&self, ids: I) -> bool {
        ids.into_iter().all(|id| self.hidden.contains(&id))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum WipeSharing {
    /// One hidden set for every layer: wiping a mesh clears it everywhere.
    #[default]
    Shared,
    /// Each layer keeps its own hidden set.
    Independent,
}

#[derive(Clone, Debug)]
pub struct FoamLayer {
    pub id: LayerId,
    pub scale_factor: f32,
    pub created_at: Instant,
    hidden: FoamLayerState,
}

impl FoamLayer {
    /// Foam for `mesh`: the mesh's own placement, inflated in its local space.
    pub fn world_matrix(&self, root: Mat4, mesh: &MeshDescriptor) -> Mat4 {
        root * mesh.transform.matrix() * Mat4::from_scale(Vec3::splat(self.scale_factor))
    }
}

/// The stack of applied foam layers, oldest first.
#[derive(Clone, Debug, Default)]
pub struct FoamStack {
    sharing: WipeSharing,
    shared: FoamLayerState,
    layers: Vec<FoamLayer>,
    next_id: u32,
}

impl FoamStack {
    pub fn new(sharing: WipeSharing) -> Self {
        Self {
            sharing,
            ..Default::default()
        }
    }

    pub fn sharing(&self) -> WipeSharing {
        self.sharing
    }

    /// Switching modes would leave the two kinds of sets disagreeing, so
    /// all foam goes with it.
    pub fn set_sharing(&mut self, sharing: WipeSharing) {
        if sharing != self.sharing {
            self.sharing = sharing;
            self.clear();
        }
    }

    /// Scale factor the next `apply_layer` should use so stacked layers
    /// don't z-fight.
    pub fn next_scale_factor(&self) -> f32 {
        FOAM_SCALE_FACTOR + FOAM_LAYER_INFLATE_STEP * self.layers.len() as f32
    }

    pub fn apply_layer(&mut self, scale_factor: f32) -> Result<LayerId> {
        if !scale_factor.is_finite() || scale_factor <= 0.0 {
            return Err(ShowroomError::DegenerateInput(
                "foam scale factor must be positive",
            ));
        }
        if self.layers.len() >= MAX_FOAM_LAYERS {
            let dropped = self.layers.remove(0);
            log::info!("[foam] dropping oldest layer {:?}", dropped.id);
        }
        let id = LayerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        if self.sharing == WipeSharing::Shared {
            self.shared.reset_all();
        }
        self.layers.push(FoamLayer {
            id,
            scale_factor,
            created_at: Instant::now(),
            hidden: FoamLayerState::new(),
        });
        log::info!(
            "[foam] applied layer {:?} (scale {:.3}, {} total)",
            id,
            scale_factor,
            self.layers.len()
        );
        Ok(id)
    }

    pub fn clear(&mut self) {
        self.layers.clear();
        self.shared.reset_all();
    }

    pub fn layers(&self) -> &[FoamLayer] {
        &self.layers
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn index_of(&self, id: LayerId) -> Option<usize> {
        self.layers.iter().position(|l| l.id == id)
    }

    /// The set the layer at `index` reads and writes.
    pub fn hidden_set(&self, index: usize) -> Option<&FoamLayerState> {
        let layer = self.layers.get(index)?;
        Some(match self.sharing {
            WipeSharing::Shared => &self.shared,
            WipeSharing::Independent => &layer.hidden,
        })
    }

    pub fn is_hidden(&self, index: usize, id: MeshId) -> bool {
        self.hidden_set(index).is_some_and(|s| s.is_hidden(id))
    }

    pub fn mark_hidden(&mut self, index: usize, id: MeshId) -> bool {
        match self.sharing {
            WipeSharing::Shared if index < self.layers.len() => self.shared.mark_hidden(id),
            WipeSharing::Shared => false,
            WipeSharing::Independent => self
                .layers
                .get_mut(index)
                .is_some_and(|l| l.hidden.mark_hidden(id)),
        }
    }

    pub fn is_fully_wiped<I: IntoIterator<Item = MeshId>>(&self, index: usize, ids: I) -> bool {
        self.hidden_set(index).is_some_and(|s| s.hides_all(ids))
    }

    /// Drop every layer with nothing left on it. Returns how many went.
    pub fn retire_wiped_layers(&mut self, ids: &[MeshId]) -> usize {
        if ids.is_empty() || self.layers.is_empty() {
            return 0;
        }
        let before = self.layers.len();
        match self.sharing {
            WipeSharing::Shared => {
                if self.shared.hides_all(ids.iter().copied()) {
                    self.layers.clear();
                }
            }
            WipeSharing::Independent => {
                self.layers
                    .retain(|l| !l.hidden.hides_all(ids.iter().copied()));
            }
        }
        if self.layers.is_empty() {
            self.shared.reset_all();
        }
        let retired = before - self.layers.len();
        if retired > 0 {
            log::info!("[foam] {} layer(s) fully wiped", retired);
        }
        retired
    }
}
