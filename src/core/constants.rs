use glam::Vec3;

// Shared tuning constants for the showroom core (host-testable, no web APIs).

// Viewer controls (slider ranges and defaults)
pub const SCALE_MIN: f32 = 0.2;
pub const SCALE_MAX: f32 = 3.0;
pub const SCALE_DEFAULT: f32 = 2.0;
pub const ZOOM_MIN: f32 = 0.5;
pub const ZOOM_MAX: f32 = 3.0;
pub const ZOOM_DEFAULT: f32 = 1.0;
pub const ZOOM_STEP: f32 = 0.1; // keyboard +/- increment

// Scene layout
pub const MODEL_POSITION: [f32; 3] = [0.0, -0.6, 0.0];
pub const CAMERA_POSITION: [f32; 3] = [2.0, 2.0, 5.0];
pub const CAMERA_FOV_DEG: f32 = 50.0;
pub const CAMERA_ZNEAR: f32 = 0.1;
pub const CAMERA_ZFAR: f32 = 100.0;

// Orbit control limits
pub const ORBIT_MIN_DISTANCE: f32 = 1.0;
pub const ORBIT_MAX_DISTANCE: f32 = 20.0;
pub const ORBIT_PITCH_LIMIT: f32 = 1.45; // just shy of straight up/down (radians)
pub const ORBIT_ROTATE_SPEED: f32 = 0.005; // radians per pixel dragged
pub const ORBIT_DOLLY_SPEED: f32 = 0.001; // fraction of distance per wheel unit

// Lighting rig
pub const AMBIENT_INTENSITY: f32 = 0.5;
pub const DIRECTIONAL_POSITION: [f32; 3] = [2.0, 5.0, 2.0];
pub const DIRECTIONAL_INTENSITY: f32 = 1.2;
pub const AREA_POSITION: [f32; 3] = [0.0, 5.0, 0.0];
pub const AREA_SIZE: [f32; 2] = [6.0, 6.0];
pub const AREA_INTENSITY: f32 = 8.0;

// Materials
pub const MODEL_BASE_COLOR: [f32; 4] = [0.92, 0.45, 0.08, 1.0]; // KTM orange
pub const FOAM_COLOR: [f32; 4] = [1.0, 1.0, 1.0, 0.7];

// Foam
pub const FOAM_SCALE_FACTOR: f32 = 1.01; // each layer sits just outside the body
pub const FOAM_LAYER_INFLATE_STEP: f32 = 0.005; // extra inflation per stacked layer
pub const MAX_FOAM_LAYERS: usize = 4;

// Wipe radii (world units, after model scale)
pub const RADIUS_MIN: f32 = 0.0;
pub const RADIUS_MAX: f32 = 1.0;
pub const RADIUS_STEP: f32 = 0.02;
pub const HOVER_RADIUS_DEFAULT: f32 = 0.08;
pub const RAG_RADIUS_DEFAULT: f32 = 0.25;

// Audio analysis
pub const ANALYSER_FFT_SIZE: u32 = 256;
pub const SAMPLE_LEN: usize = 128; // fft_size / 2 time-domain bytes pulled per refresh
pub const SAMPLE_REFRESH_FRAMES: u32 = 20; // refresh the buffer every N animation frames
pub const SILENCE_BYTE: u8 = 128; // time-domain midpoint

// Radial visualizer
pub const VISUALIZER_SIZE_PX: f32 = 320.0;
pub const BAR_COUNT: usize = 64;
pub const RIM_INSET_PX: f32 = 8.0; // outer rim radius = size/2 - inset
pub const INNER_RING_INSET_PX: f32 = 38.0; // bars start at size/2 - inset
pub const MIN_BAR_LENGTH_PX: f32 = 4.0;
pub const MAX_BAR_LENGTH_PX: f32 = 22.0;
pub const EXPANSION_MULTIPLIER: f32 = 1.0;
pub const DEAD_ZONE: f32 = 0.05; // amplitudes below this draw the minimum bar
pub const PLATE_GRAVITY: f32 = 0.35; // px/frame^2 at silence
pub const PLATE_PUSH: f32 = 2.5; // px/frame launch speed when a bar catches a plate
pub const PLATE_SPAWN_OFFSET: f32 = 0.0; // plates start resting on their bar

#[inline]
pub fn model_position() -> Vec3 {
    Vec3::from_array(MODEL_POSITION)
}

#[inline]
pub fn camera_position() -> Vec3 {
    Vec3::from_array(CAMERA_POSITION)
}
