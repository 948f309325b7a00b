use crate::core::{Modifiers, PointerKind};
use crate::dom::{self, Listener};
use crate::viewer::ViewerState;
use glam::Vec2;
use std::cell::RefCell;
use std::rc::Rc;
use web_sys as web;

/// Pointer position in canvas backing pixels.
fn pointer_canvas_px(ev: &web::MouseEvent, canvas: &web::HtmlCanvasElement) -> Vec2 {
    let rect = canvas.get_bounding_client_rect();
    let sx = canvas.width() as f64 / rect.width().max(1.0);
    let sy = canvas.height() as f64 / rect.height().max(1.0);
    Vec2::new(
        ((ev.client_x() as f64 - rect.left()) * sx) as f32,
        ((ev.client_y() as f64 - rect.top()) * sy) as f32,
    )
}

fn modifiers(ev: &web::MouseEvent) -> Modifiers {
    Modifiers {
        shift: ev.shift_key(),
        alt: ev.alt_key(),
        ctrl: ev.ctrl_key(),
    }
}

/// Pointer move/down/up and wheel on the viewer canvas.
///
/// Wipes run first; a press that does not wipe starts an orbit drag
/// (alt-drag pans).
pub(crate) fn wire_pointer(
    canvas: &web::HtmlCanvasElement,
    state: &Rc<RefCell<ViewerState>>,
) -> Vec<Listener> {
    let mut out = Vec::new();

    let s = state.clone();
    let c = canvas.clone();
    out.extend(dom::listen(canvas.as_ref(), "pointermove", move |ev: web::PointerEvent| {
        let px = pointer_canvas_px(&ev, &c);
        let mods = modifiers(&ev);
        let mut st = s.borrow_mut();
        st.pointer(PointerKind::Move, px, mods);
        if st.drag.active {
            let delta = px - st.drag.last;
            st.drag.last = px;
            let viewport = st.viewport();
            if mods.alt {
                st.composer.orbit.pan(delta, viewport);
            } else {
                st.composer.orbit.rotate(delta);
            }
        }
    }));

    let s = state.clone();
    let c = canvas.clone();
    out.extend(dom::listen(canvas.as_ref(), "pointerdown", move |ev: web::PointerEvent| {
        let px = pointer_canvas_px(&ev, &c);
        let mut st = s.borrow_mut();
        let outcome = st.pointer(PointerKind::Down, px, modifiers(&ev));
        if !outcome.needs_redraw() {
            st.drag.active = true;
            st.drag.last = px;
            _ = c.set_pointer_capture(ev.pointer_id());
        }
        ev.prevent_default();
    }));

    let s = state.clone();
    let c = canvas.clone();
    out.extend(dom::listen(canvas.as_ref(), "pointerup", move |ev: web::PointerEvent| {
        let px = pointer_canvas_px(&ev, &c);
        let mut st = s.borrow_mut();
        st.pointer(PointerKind::Up, px, modifiers(&ev));
        if st.drag.active {
            st.drag.active = false;
            _ = c.release_pointer_capture(ev.pointer_id());
        }
    }));

    // a cancelled pointer never sends pointerup
    let s = state.clone();
    out.extend(dom::listen(canvas.as_ref(), "pointercancel", move |ev: web::PointerEvent| {
        let mut st = s.borrow_mut();
        st.pointer(PointerKind::Up, Vec2::ZERO, modifiers(&ev));
        st.drag.active = false;
    }));

    let s = state.clone();
    out.extend(dom::listen(canvas.as_ref(), "wheel", move |ev: web::WheelEvent| {
        s.borrow_mut().composer.orbit.dolly(ev.delta_y() as f32);
        ev.prevent_default();
    }));

    out
}
