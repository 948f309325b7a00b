/// Web front-end constants: DOM hooks, assets and GPU sizing.
///
/// Tuning for the interaction core lives in `core::constants`; these only
/// matter to the browser surfaces.
// Element ids the page is expected to provide (all optional except canvases)
pub const VIEWER_CANVAS_ID: &str = "viewer-canvas";
pub const VISUALIZER_CANVAS_ID: &str = "visualizer-canvas";
pub const LOADING_OVERLAY_ID: &str = "loading-overlay";
pub const HELP_OVERLAY_ID: &str = "help-overlay";
pub const MODE_HINT_ID: &str = "mode-hint";
pub const SCALE_SLIDER_ID: &str = "scale-slider";
pub const ZOOM_SLIDER_ID: &str = "zoom-slider";
pub const RADIUS_SLIDER_ID: &str = "radius-slider";
pub const SCALE_LABEL_ID: &str = "scale-value";
pub const ZOOM_LABEL_ID: &str = "zoom-value";
pub const RADIUS_LABEL_ID: &str = "radius-value";
pub const MODE_TOGGLE_ID: &str = "mode-toggle";
pub const APPLY_FOAM_ID: &str = "apply-foam";
pub const CLEAR_FOAM_ID: &str = "clear-foam";
pub const VISUALIZER_TOGGLE_ID: &str = "visualizer-toggle";

// Assets
pub const ENGINE_AUDIO_SRC: &str = "/assets/audio/mixkit-motorcycle-engine-doing-gearshift-2725.wav";

// Fresh media elements to try when the analysis graph refuses one
pub const AUDIO_CONNECT_ATTEMPTS: u32 = 2;

// Viewer clear color (dark garage)
pub const CLEAR_COLOR: [f64; 3] = [0.05, 0.05, 0.06];

// Per-draw uniforms are bound with dynamic offsets in one buffer that grows
// with the draw list
pub const INITIAL_DRAW_SLOTS: usize = 1024;
pub const DRAW_UNIFORM_STRIDE: u64 = 256; // WebGPU minUniformBufferOffsetAlignment

// Visualizer styling
pub const VIZ_RING_COLOR: &str = "#ffffff";
pub const VIZ_ACCENT_COLOR: &str = "#ffb300";
pub const VIZ_LINE_WIDTH: f64 = 2.0;
pub const VIZ_PLATE_WIDTH: f64 = 4.0; // tangential half-width of a plate
