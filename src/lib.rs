//! RC390 showroom: the interactive core of a browser motorcycle showcase.
//!
//! `core` is plain Rust (scene state, foam wiping, audio sampling, the
//! radial visualizer physics) and builds everywhere. The browser surfaces
//! that drive it through WebGPU, WebAudio and the DOM only exist on wasm32.

pub mod core;

#[cfg(target_arch = "wasm32")]
mod audio;
#[cfg(target_arch = "wasm32")]
mod constants;
#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod events;
#[cfg(target_arch = "wasm32")]
mod frame;
#[cfg(target_arch = "wasm32")]
mod overlay;
#[cfg(target_arch = "wasm32")]
mod render;
#[cfg(target_arch = "wasm32")]
mod viewer;
#[cfg(target_arch = "wasm32")]
mod visualizer;

#[cfg(target_arch = "wasm32")]
pub use viewer::{mount_viewer, ViewerHandle};
#[cfg(target_arch = "wasm32")]
pub use visualizer::{mount_visualizer, VisualizerHandle};

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen::prelude::wasm_bindgen(start)]
pub fn start() -> Result<(), wasm_bindgen::JsValue> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
    log::info!("rc390-showroom starting");
    Ok(())
}
