use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys as web;

#[inline]
pub fn window_document() -> Option<web::Document> {
    web::window().and_then(|w| w.document())
}

/// A live event listener; removed from its target when dropped.
pub struct Listener {
    target: web::EventTarget,
    event: &'static str,
    closure: Closure<dyn FnMut(web::Event)>,
}

impl Drop for Listener {
    fn drop(&mut self) {
        _ = self
            .target
            .remove_event_listener_with_callback(self.event, self.closure.as_ref().unchecked_ref());
    }
}

/// Attach `handler` to `target`. The listener lives as long as the guard.
pub fn listen<E, F>(target: &web::EventTarget, event: &'static str, mut handler: F) -> Option<Listener>
where
    E: JsCast,
    F: FnMut(E) + 'static,
{
    let closure = Closure::wrap(Box::new(move |ev: web::Event| {
        if let Ok(ev) = ev.dyn_into::<E>() {
            handler(ev);
        }
    }) as Box<dyn FnMut(web::Event)>);
    match target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref()) {
        Ok(()) => Some(Listener {
            target: target.clone(),
            event,
            closure,
        }),
        Err(e) => {
            log::warn!("addEventListener({}) failed: {:?}", event, e);
            None
        }
    }
}

pub fn listen_window<E, F>(event: &'static str, handler: F) -> Option<Listener>
where
    E: JsCast,
    F: FnMut(E) + 'static,
{
    let window = web::window()?;
    listen(window.as_ref(), event, handler)
}

#[inline]
pub fn add_click_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut() + 'static,
) -> Option<Listener> {
    let el = document.get_element_by_id(element_id)?;
    listen(el.as_ref(), "click", move |_: web::Event| handler())
}

/// Call `handler` with the slider's numeric value on every `input` event.
pub fn add_slider_listener(
    document: &web::Document,
    element_id: &str,
    mut handler: impl FnMut(f32) + 'static,
) -> Option<Listener> {
    let input = document
        .get_element_by_id(element_id)?
        .dyn_into::<web::HtmlInputElement>()
        .ok()?;
    let source = input.clone();
    listen(input.as_ref(), "input", move |_: web::Event| {
        if let Ok(v) = source.value().parse::<f32>() {
            handler(v);
        }
    })
}

pub fn set_slider_value(document: &web::Document, element_id: &str, value: f32) {
    if let Some(input) = document
        .get_element_by_id(element_id)
        .and_then(|el| el.dyn_into::<web::HtmlInputElement>().ok())
    {
        input.set_value(&format!("{:.2}", value));
    }
}

pub fn set_text(document: &web::Document, element_id: &str, text: &str) {
    if let Some(el) = document.get_element_by_id(element_id) {
        el.set_text_content(Some(text));
    }
}

pub fn sync_canvas_backing_size(canvas: &web::HtmlCanvasElement) {
    if let Some(w) = web::window() {
        let dpr = w.device_pixel_ratio();
        let rect = canvas.get_bounding_client_rect();
        let w_px = (rect.width() * dpr) as u32;
        let h_px = (rect.height() * dpr) as u32;
        canvas.set_width(w_px.max(1));
        canvas.set_height(h_px.max(1));
    }
}

pub fn canvas_by_id(document: &web::Document, id: &str) -> anyhow::Result<web::HtmlCanvasElement> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| anyhow::anyhow!("missing #{}", id))?
        .dyn_into::<web::HtmlCanvasElement>()
        .map_err(|e| anyhow::anyhow!(format!("#{} is not a canvas: {:?}", id, e)))
}
