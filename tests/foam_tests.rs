// Host-side tests for foam layers and the wipe controller.

use glam::{Mat4, Vec3};
use rc390_showroom::core::*;

struct FixedInput {
    held: Modifiers,
}

impl InputSource for FixedInput {
    fn modifiers(&self) -> Modifiers {
        self.held
    }

    fn viewport(&self) -> Viewport {
        Viewport::new(800, 600)
    }
}

const NO_KEYS: FixedInput = FixedInput {
    held: Modifiers {
        shift: false,
        alt: false,
        ctrl: false,
    },
};

fn patch(id: u32, at: Vec3) -> MeshDescriptor {
    MeshDescriptor::new(
        MeshId(id),
        format!("patch{}", id),
        vec![at, at + Vec3::new(0.1, 0.0, 0.0), at + Vec3::new(0.0, 0.1, 0.0)],
        vec![0, 1, 2],
        Transform::default(),
    )
    .unwrap()
}

/// Mesh A at the origin, mesh B far off to the side.
fn two_mesh_model() -> ModelAsset {
    let mut model = ModelAsset::new();
    model.push(patch(0, Vec3::ZERO));
    model.push(patch(1, Vec3::new(10.0, 0.0, 0.0)));
    model
}

const A: MeshId = MeshId(0);
const B: MeshId = MeshId(1);

fn hover_at(point: Vec3, shift: bool) -> PointerSample {
    let mods = if shift {
        Modifiers::SHIFT
    } else {
        Modifiers::default()
    };
    PointerSample::new(PointerKind::Move, mods, Some(point))
}

#[test]
fn mark_hidden_is_idempotent() {
    let mut state = FoamLayerState::new();
    assert!(state.mark_hidden(A));
    assert!(!state.mark_hidden(A));
    assert!(state.is_hidden(A));
    assert_eq!(state.hidden_count(), 1);
}

#[test]
fn reset_all_restores_visibility() {
    let mut state = FoamLayerState::new();
    state.mark_hidden(A);
    state.mark_hidden(B);
    state.reset_all();
    assert!(!state.is_hidden(A));
    assert!(!state.is_hidden(B));
    assert_eq!(state.hidden_count(), 0);
}

#[test]
fn apply_layer_rejects_bad_scale() {
    let mut foam = FoamStack::default();
    assert_eq!(
        foam.apply_layer(0.0),
        Err(ShowroomError::DegenerateInput("foam scale factor must be positive"))
    );
    assert!(foam.apply_layer(f32::NAN).is_err());
    assert!(foam.is_empty());
}

#[test]
fn apply_layer_caps_stack_and_drops_oldest() {
    let mut foam = FoamStack::default();
    let first = foam.apply_layer(1.01).unwrap();
    for _ in 1..MAX_FOAM_LAYERS {
        foam.apply_layer(foam.next_scale_factor()).unwrap();
    }
    assert_eq!(foam.len(), MAX_FOAM_LAYERS);
    foam.apply_layer(foam.next_scale_factor()).unwrap();
    assert_eq!(foam.len(), MAX_FOAM_LAYERS);
    assert_eq!(foam.index_of(first), None);
}

#[test]
fn stacked_layers_inflate_progressively() {
    let mut foam = FoamStack::default();
    let s0 = foam.next_scale_factor();
    foam.apply_layer(s0).unwrap();
    let s1 = foam.next_scale_factor();
    assert!(s1 > s0);
    assert_eq!(s0, FOAM_SCALE_FACTOR);
}

#[test]
fn zero_radius_never_hides() {
    let model = two_mesh_model();
    let mut foam = FoamStack::default();
    foam.apply_layer(1.01).unwrap();
    let mut ctl = FoamInteractionController::new(InteractionMode::HoverWipe, 0.0, 0.0);
    let out = ctl.handle(&hover_at(Vec3::ZERO, true), &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);
    assert!(out.evaluated);
    assert!(!out.needs_redraw());
    assert!(!foam.is_hidden(0, A));
}

#[test]
fn missing_world_point_is_a_no_op() {
    let model = two_mesh_model();
    let mut foam = FoamStack::default();
    foam.apply_layer(1.01).unwrap();
    let mut ctl = FoamInteractionController::default();
    let sample = PointerSample::new(PointerKind::Move, Modifiers::SHIFT, None);
    let out = ctl.handle(&sample, &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);
    assert!(!out.needs_redraw());
}

#[test]
fn hover_requires_shift() {
    let model = two_mesh_model();
    let mut foam = FoamStack::default();
    foam.apply_layer(1.01).unwrap();
    let mut ctl = FoamInteractionController::default();
    let out = ctl.handle(&hover_at(Vec3::ZERO, false), &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);
    assert!(!out.evaluated);
    assert!(!foam.is_hidden(0, A));
}

#[test]
fn shift_from_input_source_counts() {
    let model = two_mesh_model();
    let mut foam = FoamStack::default();
    foam.apply_layer(1.01).unwrap();
    let mut ctl = FoamInteractionController::default();
    let held = FixedInput {
        held: Modifiers::SHIFT,
    };
    let out = ctl.handle(&hover_at(Vec3::ZERO, false), &held, &model, Mat4::IDENTITY, &mut foam);
    assert!(out.needs_redraw());
    assert!(foam.is_hidden(0, A));
    assert!(!foam.is_hidden(0, B));
}

#[test]
fn shared_hover_wipe_hides_mesh_in_every_layer() {
    let model = two_mesh_model();
    let mut foam = FoamStack::new(WipeSharing::Shared);
    foam.apply_layer(foam.next_scale_factor()).unwrap();
    foam.apply_layer(foam.next_scale_factor()).unwrap();
    let mut ctl = FoamInteractionController::default();

    let out = ctl.handle(&hover_at(Vec3::ZERO, true), &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);

    assert!(out.needs_redraw());
    assert!(foam.is_hidden(0, A));
    assert!(foam.is_hidden(1, A));
    assert!(!foam.is_hidden(0, B));
    assert!(!foam.is_hidden(1, B));
}

#[test]
fn every_mesh_in_range_is_hidden() {
    let mut model = ModelAsset::new();
    model.push(patch(0, Vec3::ZERO));
    model.push(patch(1, Vec3::new(0.02, 0.0, 0.0)));
    let mut foam = FoamStack::default();
    foam.apply_layer(1.0).unwrap();
    let mut ctl = FoamInteractionController::default();
    let out = ctl.handle(&hover_at(Vec3::ZERO, true), &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);
    assert_eq!(out.hidden.len(), 2);
}

#[test]
fn independent_layers_track_their_own_wipes() {
    let model = two_mesh_model();
    let mut foam = FoamStack::new(WipeSharing::Independent);
    let l0 = foam.apply_layer(1.01).unwrap();
    let l1 = foam.apply_layer(1.015).unwrap();
    let mut ctl = FoamInteractionController::default();
    let out = ctl.handle(&hover_at(Vec3::ZERO, true), &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);
    assert_eq!(out.hidden.as_slice(), &[(l0, A), (l1, A)]);

    // a fresh layer starts fully covered
    foam.apply_layer(1.02).unwrap();
    assert!(!foam.is_hidden(2, A));
    assert!(foam.is_hidden(0, A));
}

#[test]
fn shared_mode_new_layer_resets_wipes() {
    let model = two_mesh_model();
    let mut foam = FoamStack::new(WipeSharing::Shared);
    foam.apply_layer(1.01).unwrap();
    let mut ctl = FoamInteractionController::default();
    ctl.handle(&hover_at(Vec3::ZERO, true), &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);
    assert!(foam.is_hidden(0, A));
    foam.apply_layer(1.015).unwrap();
    assert!(!foam.is_hidden(0, A));
    assert!(!foam.is_hidden(1, A));
}

#[test]
fn rag_wipes_once_per_press() {
    let model = two_mesh_model();
    let mut foam = FoamStack::new(WipeSharing::Independent);
    foam.apply_layer(1.01).unwrap();
    let mut ctl = FoamInteractionController::default();
    ctl.set_mode(InteractionMode::RagWipe);

    let down_b = PointerSample::new(PointerKind::Down, Modifiers::default(), Some(Vec3::new(10.0, 0.0, 0.0)));
    let down_a = PointerSample::new(PointerKind::Down, Modifiers::default(), Some(Vec3::ZERO));
    let up = PointerSample::new(PointerKind::Up, Modifiers::default(), None);

    let first = ctl.handle(&down_b, &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);
    assert!(first.evaluated);
    assert!(foam.is_hidden(0, B));

    // still held: ignored
    let repeat = ctl.handle(&down_a, &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);
    assert!(!repeat.evaluated);
    assert!(!foam.is_hidden(0, A));

    ctl.handle(&up, &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);
    let second = ctl.handle(&down_a, &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);
    assert!(second.needs_redraw());
    assert!(foam.is_hidden(0, A));
}

#[test]
fn rag_ignores_pointer_moves() {
    let model = two_mesh_model();
    let mut foam = FoamStack::default();
    foam.apply_layer(1.01).unwrap();
    let mut ctl = FoamInteractionController::default();
    ctl.toggle_mode();
    let out = ctl.handle(&hover_at(Vec3::ZERO, true), &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);
    assert!(!out.evaluated);
}

#[test]
fn would_trigger_skips_ignored_events() {
    let mut ctl = FoamInteractionController::default();
    let shift = FixedInput { held: Modifiers::SHIFT };

    assert!(!ctl.would_trigger(PointerKind::Move, Modifiers::default(), &NO_KEYS));
    assert!(ctl.would_trigger(PointerKind::Move, Modifiers::SHIFT, &NO_KEYS));
    assert!(ctl.would_trigger(PointerKind::Move, Modifiers::default(), &shift));
    assert!(!ctl.would_trigger(PointerKind::Down, Modifiers::SHIFT, &NO_KEYS));

    ctl.set_mode(InteractionMode::RagWipe);
    assert!(!ctl.would_trigger(PointerKind::Move, Modifiers::SHIFT, &shift));
    assert!(!ctl.would_trigger(PointerKind::Up, Modifiers::default(), &NO_KEYS));
    assert!(ctl.would_trigger(PointerKind::Down, Modifiers::default(), &NO_KEYS));
}

#[test]
fn would_trigger_does_not_consume_the_press() {
    let model = two_mesh_model();
    let mut foam = FoamStack::default();
    foam.apply_layer(1.01).unwrap();
    let mut ctl = FoamInteractionController::default();
    ctl.set_mode(InteractionMode::RagWipe);

    assert!(ctl.would_trigger(PointerKind::Down, Modifiers::default(), &NO_KEYS));
    assert!(ctl.would_trigger(PointerKind::Down, Modifiers::default(), &NO_KEYS));
    let down = PointerSample::new(PointerKind::Down, Modifiers::default(), Some(Vec3::ZERO));
    let out = ctl.handle(&down, &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);
    assert!(out.needs_redraw());

    // held press: nothing to pick until release
    assert!(!ctl.would_trigger(PointerKind::Down, Modifiers::default(), &NO_KEYS));
    let up = PointerSample::new(PointerKind::Up, Modifiers::default(), None);
    ctl.handle(&up, &NO_KEYS, &model, Mat4::IDENTITY, &mut foam);
    assert!(ctl.would_trigger(PointerKind::Down, Modifiers::default(), &NO_KEYS));
}

#[test]
fn radius_is_per_mode_and_clamped() {
    let mut ctl = FoamInteractionController::default();
    assert_eq!(ctl.radius(), HOVER_RADIUS_DEFAULT);
    ctl.set_radius(5.0);
    assert_eq!(ctl.radius(), RADIUS_MAX);
    ctl.toggle_mode();
    assert_eq!(ctl.radius(), RAG_RADIUS_DEFAULT);
    ctl.set_radius(-1.0);
    assert_eq!(ctl.radius(), RADIUS_MIN);
    ctl.toggle_mode();
    assert_eq!(ctl.radius(), RADIUS_MAX);
}

#[test]
fn fully_wiped_layers_retire() {
    let model = two_mesh_model();
    let ids: Vec<MeshId> = model.ids().collect();
    let mut foam = FoamStack::new(WipeSharing::Independent);
    foam.apply_layer(1.01).unwrap();
    foam.apply_layer(1.015).unwrap();
    foam.mark_hidden(0, A);
    foam.mark_hidden(0, B);
    foam.mark_hidden(1, A);
    assert!(foam.is_fully_wiped(0, ids.iter().copied()));
    assert_eq!(foam.retire_wiped_layers(&ids), 1);
    assert_eq!(foam.len(), 1);
    assert!(foam.is_hidden(0, A));
}

#[test]
fn switching_sharing_clears_everything() {
    let mut foam = FoamStack::new(WipeSharing::Shared);
    foam.apply_layer(1.01).unwrap();
    foam.mark_hidden(0, A);
    foam.set_sharing(WipeSharing::Independent);
    assert!(foam.is_empty());
    assert_eq!(foam.sharing(), WipeSharing::Independent);
}

#[test]
fn clear_removes_layers_and_wipes() {
    let mut foam = FoamStack::default();
    foam.apply_layer(1.01).unwrap();
    foam.mark_hidden(0, A);
    foam.clear();
    assert!(foam.is_empty());
    foam.apply_layer(1.01).unwrap();
    assert!(!foam.is_hidden(0, A));
}
