use crate::constants::{HELP_OVERLAY_ID, LOADING_OVERLAY_ID, MODE_HINT_ID};
use web_sys as web;

#[inline]
fn show_id(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        let cl = el.class_list();
        _ = cl.remove_1("hidden");
        // fallback for environments without CSS class
        _ = el.set_attribute("style", "");
    }
}

#[inline]
fn hide_id(document: &web::Document, id: &str) {
    if let Some(el) = document.get_element_by_id(id) {
        let cl = el.class_list();
        _ = cl.add_1("hidden");
        // fallback
        _ = el.set_attribute("style", "display:none");
    }
}

#[inline]
fn is_hidden_id(document: &web::Document, id: &str) -> bool {
    if let Some(el) = document.get_element_by_id(id) {
        if el.class_list().contains("hidden") {
            return true;
        }
        return el
            .get_attribute("style")
            .map(|s| s.contains("display:none"))
            .unwrap_or(false);
    }
    false
}

/// Loading indicator over the viewer, with an optional status line.
pub fn show_loading(document: &web::Document, message: &str) {
    if let Some(el) = document.get_element_by_id(LOADING_OVERLAY_ID) {
        el.set_text_content(Some(message));
    }
    show_id(document, LOADING_OVERLAY_ID);
}

pub fn hide_loading(document: &web::Document) {
    hide_id(document, LOADING_OVERLAY_ID);
}

pub fn toggle_help(document: &web::Document) {
    if is_hidden_id(document, HELP_OVERLAY_ID) {
        show_id(document, HELP_OVERLAY_ID);
    } else {
        hide_id(document, HELP_OVERLAY_ID);
    }
}

/// Update the hint line with the wipe mode, radius and foam count
pub fn update_mode_hint(document: &web::Document, mode_label: &str, radius: f32, layers: usize) {
    if let Some(el) = document.get_element_by_id(MODE_HINT_ID) {
        let foam_text = match layers {
            0 => "No foam".to_string(),
            1 => "1 foam layer".to_string(),
            n => format!("{} foam layers", n),
        };
        el.set_text_content(Some(&format!(
            "{} • Radius: {:.2} • {}",
            mode_label, radius, foam_text
        )));
    }
}
