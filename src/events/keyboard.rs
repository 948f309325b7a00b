use crate::core::{action_for_key, KeyAction};
use crate::dom::{self, Listener};
use crate::viewer::ViewerState;
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::JsCast;
use web_sys as web;

/// Typing into a form field should not trigger shortcuts.
fn is_editable_target(ev: &web::KeyboardEvent) -> bool {
    ev.target()
        .and_then(|t| t.dyn_into::<web::HtmlElement>().ok())
        .map(|el| {
            let tag = el.tag_name();
            (tag.eq_ignore_ascii_case("input") && el.get_attribute("type").as_deref() != Some("range"))
                || tag.eq_ignore_ascii_case("textarea")
                || el.is_content_editable()
        })
        .unwrap_or(false)
}

/// Modifier tracking plus the viewer's shortcuts.
pub(crate) fn wire_viewer_keys(state: &Rc<RefCell<ViewerState>>) -> Vec<Listener> {
    let mut out = Vec::new();

    let s = state.clone();
    out.extend(dom::listen_window("keydown", move |ev: web::KeyboardEvent| {
        let key = ev.key();
        let mut st = s.borrow_mut();
        if st.keys.key_changed(&key, true) {
            return;
        }
        if is_editable_target(&ev) {
            return;
        }
        let Some(action) = action_for_key(&key) else {
            return;
        };
        // only the stepping keys auto-repeat
        let steps = matches!(
            action,
            KeyAction::RadiusDown | KeyAction::RadiusUp | KeyAction::ZoomIn | KeyAction::ZoomOut
        );
        if ev.repeat() && !steps {
            return;
        }
        if st.key_action(action) {
            log::debug!("[keys] {:?}", action);
            ev.prevent_default();
        }
    }));

    let s = state.clone();
    out.extend(dom::listen_window("keyup", move |ev: web::KeyboardEvent| {
        s.borrow_mut().keys.key_changed(&ev.key(), false);
    }));

    // keyups are lost while the window is unfocused
    let s = state.clone();
    out.extend(dom::listen_window("blur", move |_: web::Event| {
        s.borrow_mut().keys.release_all();
    }));

    out
}

/// Space toggles the visualizer's playback.
pub(crate) fn wire_playback_key(mut toggle: impl FnMut() + 'static) -> Option<Listener> {
    dom::listen_window("keydown", move |ev: web::KeyboardEvent| {
        if ev.repeat() || is_editable_target(&ev) {
            return;
        }
        if action_for_key(&ev.key()) == Some(KeyAction::TogglePlayback) {
            ev.prevent_default();
            log::debug!("[keys] {:?}", KeyAction::TogglePlayback);
            toggle();
        }
    })
}
