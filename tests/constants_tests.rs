// Host-side tests for tuning constants and their relationships.

use rc390_showroom::core::*;

#[test]
#[allow(clippy::assertions_on_constants)]
fn slider_defaults_sit_inside_their_ranges() {
    assert!(SCALE_MIN < SCALE_MAX);
    assert!((SCALE_MIN..=SCALE_MAX).contains(&SCALE_DEFAULT));
    assert!(ZOOM_MIN < ZOOM_MAX);
    assert!((ZOOM_MIN..=ZOOM_MAX).contains(&ZOOM_DEFAULT));
    assert!((RADIUS_MIN..=RADIUS_MAX).contains(&HOVER_RADIUS_DEFAULT));
    assert!((RADIUS_MIN..=RADIUS_MAX).contains(&RAG_RADIUS_DEFAULT));
    assert!(RADIUS_STEP > 0.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn foam_layers_sit_outside_the_body() {
    assert!(FOAM_SCALE_FACTOR > 1.0);
    assert!(FOAM_LAYER_INFLATE_STEP > 0.0);
    assert!(MAX_FOAM_LAYERS >= 1);
    assert!(FOAM_COLOR[3] > 0.0 && FOAM_COLOR[3] < 1.0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn visualizer_geometry_is_consistent() {
    let half = VISUALIZER_SIZE_PX / 2.0;
    // bars at full length stay inside the rim
    assert!(half - INNER_RING_INSET_PX + MIN_BAR_LENGTH_PX + MAX_BAR_LENGTH_PX <= half - RIM_INSET_PX);
    assert!(RIM_INSET_PX < INNER_RING_INSET_PX);
    assert!(DEAD_ZONE >= 0.0 && DEAD_ZONE < 1.0);
    assert!(PLATE_GRAVITY > 0.0 && PLATE_PUSH > 0.0);
    assert!(BAR_COUNT > 0);
}

#[test]
#[allow(clippy::assertions_on_constants)]
fn analyser_buffer_matches_fft_size() {
    assert_eq!(SAMPLE_LEN as u32, ANALYSER_FFT_SIZE / 2);
    assert!(SAMPLE_REFRESH_FRAMES >= 1);
}

#[test]
fn camera_and_model_placement() {
    assert_eq!(model_position().y, -0.6);
    assert_eq!(camera_position().length_squared(), 33.0);
    assert!(ORBIT_MIN_DISTANCE <= camera_position().length());
    assert!(camera_position().length() <= ORBIT_MAX_DISTANCE);
}
