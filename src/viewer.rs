use crate::constants::*;
use crate::core::{
    DragState, FoamInteractionController, FoamStack, InputSource, KeyAction, KeyState, MeshDescriptor,
    ModelAsset, Modifiers, PointerKind, PointerSample, SceneRenderer, ShowroomError,
    ViewerSceneComposer, Viewport, WipeOutcome, WipeSharing, ZOOM_STEP,
};
use crate::dom::{self, Listener};
use crate::events;
use crate::frame::FrameLoop;
use crate::overlay;
use crate::render::GpuState;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys as web;

/// Everything the viewer's event handlers and frame loop share.
pub(crate) struct ViewerState {
    pub(crate) document: web::Document,
    pub(crate) model: ModelAsset,
    pub(crate) foam: FoamStack,
    pub(crate) composer: ViewerSceneComposer,
    pub(crate) controller: FoamInteractionController,
    pub(crate) keys: KeyState,
    pub(crate) drag: DragState,
    pub(crate) loaded: bool,
}

impl ViewerState {
    fn new(document: web::Document) -> Self {
        Self {
            document,
            model: ModelAsset::new(),
            foam: FoamStack::default(),
            composer: ViewerSceneComposer::new(),
            controller: FoamInteractionController::default(),
            keys: KeyState::default(),
            drag: Default::default(),
            loaded: false,
        }
    }

    pub(crate) fn viewport(&self) -> Viewport {
        self.keys.viewport()
    }

    /// Resolve a pointer event against visible foam and run the wipe.
    pub(crate) fn pointer(&mut self, kind: PointerKind, px: Vec2, modifiers: Modifiers) -> WipeOutcome {
        if !self.loaded {
            return WipeOutcome::default();
        }
        // picking scans every foam triangle; skip it for ignored events
        let point = if self.controller.would_trigger(kind, modifiers, &self.keys) {
            self.composer
                .pick_foam(self.viewport(), px, &self.model, &self.foam)
        } else {
            None
        };
        let sample = PointerSample::new(kind, modifiers, point);
        let root = self.composer.root_matrix();
        let outcome = self
            .controller
            .handle(&sample, &self.keys, &self.model, root, &mut self.foam);
        if outcome.needs_redraw() {
            let ids: Vec<_> = self.model.ids().collect();
            let retired = self.foam.retire_wiped_layers(&ids);
            if retired > 0 {
                log::info!("[foam] {} layer(s) fully washed off", retired);
                self.refresh_hint();
            }
        }
        outcome
    }

    pub(crate) fn apply_foam(&mut self) -> Result<(), ShowroomError> {
        let scale = self.foam.next_scale_factor();
        self.foam.apply_layer(scale)?;
        self.refresh_hint();
        Ok(())
    }

    pub(crate) fn clear_foam(&mut self) {
        self.foam.clear();
        log::info!("[foam] cleared");
        self.refresh_hint();
    }

    pub(crate) fn toggle_mode(&mut self) {
        self.controller.toggle_mode();
        dom::set_slider_value(&self.document, RADIUS_SLIDER_ID, self.controller.radius());
        self.refresh_hint();
    }

    pub(crate) fn set_scale(&mut self, scale: f32) {
        self.composer.settings.set_scale(scale);
        let v = self.composer.settings.scale();
        dom::set_text(&self.document, SCALE_LABEL_ID, &format!("{:.1}", v));
    }

    pub(crate) fn set_zoom(&mut self, zoom: f32) {
        self.composer.settings.set_zoom(zoom);
        let v = self.composer.settings.zoom();
        dom::set_text(&self.document, ZOOM_LABEL_ID, &format!("{:.1}", v));
    }

    pub(crate) fn set_radius(&mut self, radius: f32) {
        self.controller.set_radius(radius);
        dom::set_text(
            &self.document,
            RADIUS_LABEL_ID,
            &format!("{:.2}", self.controller.radius()),
        );
        self.refresh_hint();
    }

    /// Keyboard shortcuts that belong to the viewer. Returns false for keys
    /// it does not own.
    pub(crate) fn key_action(&mut self, action: KeyAction) -> bool {
        match action {
            KeyAction::ToggleWipeMode => self.toggle_mode(),
            KeyAction::ApplyFoam => {
                if let Err(e) = self.apply_foam() {
                    log::warn!("[foam] {}", e);
                }
            }
            KeyAction::ClearFoam => self.clear_foam(),
            KeyAction::ZoomIn | KeyAction::ZoomOut => {
                let step = if action == KeyAction::ZoomIn { ZOOM_STEP } else { -ZOOM_STEP };
                let zoom = self.composer.settings.zoom() + step;
                self.set_zoom(zoom);
                dom::set_slider_value(&self.document, ZOOM_SLIDER_ID, self.composer.settings.zoom());
            }
            KeyAction::RadiusDown | KeyAction::RadiusUp => {
                let steps = if action == KeyAction::RadiusUp { 1 } else { -1 };
                self.controller.nudge_radius(steps);
                let r = self.controller.radius();
                self.set_radius(r);
                dom::set_slider_value(&self.document, RADIUS_SLIDER_ID, r);
            }
            KeyAction::ToggleHelp => overlay::toggle_help(&self.document),
            KeyAction::TogglePlayback => return false,
        }
        true
    }

    pub(crate) fn refresh_hint(&self) {
        overlay::update_mode_hint(
            &self.document,
            self.controller.mode().label(),
            self.controller.radius(),
            self.foam.len(),
        );
    }
}

struct ViewerRuntime {
    state: Rc<RefCell<ViewerState>>,
    frame: FrameLoop,
    _listeners: Vec<Listener>,
}

/// The mounted model viewer. Dropping or unmounting it stops the frame loop
/// and removes every listener it installed.
#[wasm_bindgen]
pub struct ViewerHandle {
    inner: Option<ViewerRuntime>,
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

impl ViewerHandle {
    fn state(&self) -> Result<&Rc<RefCell<ViewerState>>, JsValue> {
        self.inner
            .as_ref()
            .map(|rt| &rt.state)
            .ok_or_else(|| JsValue::from_str("viewer is unmounted"))
    }
}

#[wasm_bindgen]
impl ViewerHandle {
    /// Hand over one decoded mesh. `transform` is position xyz, rotation
    /// quaternion xyzw, scale xyz. Returns the mesh id.
    pub fn add_mesh(
        &self,
        name: &str,
        positions: &[f32],
        indices: &[u32],
        transform: &[f32],
    ) -> Result<u32, JsValue> {
        let state = self.state()?;
        let mut st = state.borrow_mut();
        let id = st.model.next_id();
        match MeshDescriptor::from_flat(id, name, positions, indices, transform) {
            Ok(mesh) => {
                st.model.push(mesh);
                Ok(id.0)
            }
            Err(e) => {
                log::error!("[viewer] {}", e);
                overlay::show_loading(&st.document, &format!("Failed to load model: {}", e));
                Err(js_err(e))
            }
        }
    }

    /// Mark the model complete; hides the loading overlay.
    pub fn finish_loading(&self) -> Result<(), JsValue> {
        let state = self.state()?;
        let mut st = state.borrow_mut();
        if st.model.is_empty() {
            let e = ShowroomError::asset("model", "no meshes were provided");
            overlay::show_loading(&st.document, &format!("Failed to load model: {}", e));
            return Err(js_err(e));
        }
        st.loaded = true;
        overlay::hide_loading(&st.document);
        st.refresh_hint();
        log::info!("[viewer] model ready: {} meshes", st.model.len());
        Ok(())
    }

    pub fn set_scale(&self, scale: f32) -> Result<(), JsValue> {
        self.state()?.borrow_mut().set_scale(scale);
        Ok(())
    }

    pub fn set_zoom(&self, zoom: f32) -> Result<(), JsValue> {
        self.state()?.borrow_mut().set_zoom(zoom);
        Ok(())
    }

    pub fn set_radius(&self, radius: f32) -> Result<(), JsValue> {
        self.state()?.borrow_mut().set_radius(radius);
        Ok(())
    }

    /// Returns the new mode's label.
    pub fn toggle_mode(&self) -> Result<String, JsValue> {
        let state = self.state()?;
        let mut st = state.borrow_mut();
        st.toggle_mode();
        Ok(st.controller.mode().label().to_string())
    }

    pub fn apply_foam(&self) -> Result<usize, JsValue> {
        let state = self.state()?;
        let mut st = state.borrow_mut();
        st.apply_foam().map_err(js_err)?;
        Ok(st.foam.len())
    }

    pub fn clear_foam(&self) -> Result<(), JsValue> {
        self.state()?.borrow_mut().clear_foam();
        Ok(())
    }

    /// Give every new foam layer its own wipe record instead of sharing one.
    pub fn set_independent_wipes(&self, independent: bool) -> Result<(), JsValue> {
        let sharing = if independent {
            WipeSharing::Independent
        } else {
            WipeSharing::Shared
        };
        let state = self.state()?;
        let mut st = state.borrow_mut();
        st.foam.set_sharing(sharing);
        st.refresh_hint();
        Ok(())
    }

    pub fn foam_layers(&self) -> usize {
        self.state().map(|s| s.borrow().foam.len()).unwrap_or(0)
    }

    pub fn is_mounted(&self) -> bool {
        self.inner.as_ref().is_some_and(|rt| rt.frame.is_running())
    }

    /// Stop rendering and detach from the page. Safe to call twice.
    pub fn unmount(&mut self) {
        if let Some(rt) = self.inner.take() {
            rt.frame.stop();
            log::info!("[viewer] unmounted");
        }
    }
}

fn wire_controls(state: &Rc<RefCell<ViewerState>>, listeners: &mut Vec<Listener>) {
    let document = state.borrow().document.clone();
    let s = state.clone();
    listeners.extend(dom::add_slider_listener(&document, SCALE_SLIDER_ID, move |v| {
        s.borrow_mut().set_scale(v)
    }));
    let s = state.clone();
    listeners.extend(dom::add_slider_listener(&document, ZOOM_SLIDER_ID, move |v| {
        s.borrow_mut().set_zoom(v)
    }));
    let s = state.clone();
    listeners.extend(dom::add_slider_listener(&document, RADIUS_SLIDER_ID, move |v| {
        s.borrow_mut().set_radius(v)
    }));
    let s = state.clone();
    listeners.extend(dom::add_click_listener(&document, MODE_TOGGLE_ID, move || {
        s.borrow_mut().toggle_mode()
    }));
    let s = state.clone();
    listeners.extend(dom::add_click_listener(&document, APPLY_FOAM_ID, move || {
        if let Err(e) = s.borrow_mut().apply_foam() {
            log::warn!("[foam] {}", e);
        }
    }));
    let s = state.clone();
    listeners.extend(dom::add_click_listener(&document, CLEAR_FOAM_ID, move || {
        s.borrow_mut().clear_foam()
    }));

    let st = state.borrow();
    dom::set_slider_value(&document, SCALE_SLIDER_ID, st.composer.settings.scale());
    dom::set_slider_value(&document, ZOOM_SLIDER_ID, st.composer.settings.zoom());
    dom::set_slider_value(&document, RADIUS_SLIDER_ID, st.controller.radius());
}

async fn mount(canvas_id: &str) -> anyhow::Result<ViewerHandle> {
    let document = dom::window_document().ok_or_else(|| anyhow::anyhow!("no document"))?;
    let canvas = dom::canvas_by_id(&document, canvas_id)?;
    overlay::show_loading(&document, "Loading model...");
    dom::sync_canvas_backing_size(&canvas);

    let gpu = GpuState::new(&canvas).await?;
    let gpu = Rc::new(RefCell::new(gpu));

    let state = Rc::new(RefCell::new(ViewerState::new(document.clone())));
    state.borrow_mut().keys.viewport = Viewport::new(canvas.width(), canvas.height());

    let mut listeners = Vec::new();
    wire_controls(&state, &mut listeners);
    listeners.extend(events::wire_pointer(&canvas, &state));
    listeners.extend(events::wire_viewer_keys(&state));
    let resize_canvas = canvas.clone();
    listeners.extend(dom::listen_window("resize", move |_: web::Event| {
        dom::sync_canvas_backing_size(&resize_canvas);
    }));

    let frame_state = state.clone();
    let frame_canvas = canvas.clone();
    let frame = FrameLoop::start(move || {
        let viewport = Viewport::new(frame_canvas.width(), frame_canvas.height());
        let scene = {
            let mut st = frame_state.borrow_mut();
            st.keys.viewport = viewport;
            st.composer.compose(viewport, &st.model, &st.foam)
        };
        let st = frame_state.borrow();
        // surface errors are transient; the next frame reconfigures
        if let Err(e) = gpu.borrow_mut().render(&scene, &st.model) {
            log::warn!("[viewer] frame skipped: {:?}", e);
        }
    });

    log::info!("[viewer] mounted on #{}", canvas_id);
    Ok(ViewerHandle {
        inner: Some(ViewerRuntime {
            state,
            frame,
            _listeners: listeners,
        }),
    })
}

/// Mount the model viewer on `canvas_id` (default `viewer-canvas`).
#[wasm_bindgen]
pub async fn mount_viewer(canvas_id: Option<String>) -> Result<ViewerHandle, JsValue> {
    let id = canvas_id.unwrap_or_else(|| VIEWER_CANVAS_ID.to_string());
    mount(&id).await.map_err(|e| {
        log::error!("[viewer] init error: {:?}", e);
        if let Some(doc) = dom::window_document() {
            overlay::show_loading(&doc, &format!("Viewer unavailable: {}", e));
        }
        JsValue::from_str(&format!("{:#}", e))
    })
}
