// Host-side tests for the radial bar / plate simulator.

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rc390_showroom::core::*;

fn loud(len: usize) -> AudioSample {
    AudioSample::from_bytes(vec![255; len])
}

fn zeroed(len: usize) -> AudioSample {
    AudioSample::from_bytes(vec![0; len])
}

#[test]
fn canvas_geometry_matches_ring_insets() {
    let cfg = VisualizerConfig::for_canvas(320.0);
    assert_eq!(cfg.inner_radius, 160.0 - INNER_RING_INSET_PX);
    assert_eq!(cfg.max_radius, 160.0 - RIM_INSET_PX);
    assert_eq!(cfg.min_radius, cfg.inner_radius);
    assert!(cfg.is_valid());
    assert_eq!(VisualizerConfig::default(), cfg);
}

#[test]
fn bar_length_respects_dead_zone() {
    let cfg = VisualizerConfig::default();
    assert_eq!(cfg.bar_length(0.0), cfg.min_bar_length);
    assert_eq!(cfg.bar_length(cfg.dead_zone * 0.5), cfg.min_bar_length);
    assert_eq!(cfg.bar_length(1.0), cfg.min_bar_length + cfg.max_bar_length);
}

#[test]
fn sustained_max_input_converges_to_tip() {
    let cfg = VisualizerConfig::default();
    let mut sim = RadialParticleSimulator::new();
    let sample = loud(BAR_COUNT);
    for _ in 0..10 {
        sim.tick(&sample, BAR_COUNT, &cfg);
    }
    let tip = cfg.inner_radius + cfg.bar_length(1.0);
    for i in 0..BAR_COUNT {
        let p = sim.particle(i).unwrap();
        assert!((p.radius - tip).abs() < 1e-4, "bar {} radius {}", i, p.radius);
        assert_eq!(p.radial_velocity, 0.0);
    }
}

#[test]
fn abrupt_drop_falls_monotonically_then_rests() {
    let cfg = VisualizerConfig::default();
    let mut sim = RadialParticleSimulator::new();
    for _ in 0..10 {
        sim.tick(&loud(BAR_COUNT), BAR_COUNT, &cfg);
    }
    let low_tip = cfg.inner_radius + cfg.min_bar_length;
    let mut prev = sim.particle(0).unwrap().radius;
    for _ in 0..200 {
        let frame = sim.tick(&zeroed(BAR_COUNT), BAR_COUNT, &cfg);
        let r = frame[0].particle_radius;
        assert!(r <= prev + 1e-6, "plate rose from {} to {}", prev, r);
        assert!(r >= low_tip - 1e-4);
        prev = r;
    }
    let p = sim.particle(0).unwrap();
    assert!((p.radius - low_tip).abs() < 1e-4);
    assert_eq!(p.radial_velocity, 0.0);
}

#[test]
fn rising_bar_launches_plate_without_passing_rim() {
    let cfg = VisualizerConfig::default();
    let mut sim = RadialParticleSimulator::new();
    sim.tick(&zeroed(BAR_COUNT), BAR_COUNT, &cfg);
    sim.tick(&loud(BAR_COUNT), BAR_COUNT, &cfg);
    let launched = sim.particle(3).unwrap();
    assert_eq!(launched.radial_velocity, cfg.push);
    for _ in 0..20 {
        sim.tick(&loud(BAR_COUNT), BAR_COUNT, &cfg);
        let p = sim.particle(3).unwrap();
        assert!(p.radius <= cfg.max_radius + 1e-4);
    }
}

#[test]
fn plate_rests_on_floor_above_short_bars() {
    let base = VisualizerConfig::default();
    let cfg = VisualizerConfig {
        min_radius: base.inner_radius + 60.0,
        max_radius: base.inner_radius + 90.0,
        ..base
    };
    let tip = cfg.inner_radius + cfg.bar_length(0.0);
    assert!(cfg.min_radius > tip);
    let mut sim = RadialParticleSimulator::new();
    for _ in 0..5 {
        sim.tick(&zeroed(BAR_COUNT), BAR_COUNT, &cfg);
        let p = sim.particle(0).unwrap();
        assert_eq!(p.radius, cfg.min_radius);
        assert_eq!(p.radial_velocity, 0.0);
    }
}

#[test]
fn ceiling_falls_back_to_tip_when_rim_is_lower() {
    let base = VisualizerConfig::default();
    let cfg = VisualizerConfig {
        max_radius: base.inner_radius + 1.0,
        ..base
    };
    let tip = cfg.inner_radius + cfg.bar_length(1.0);
    assert!(cfg.max_radius < tip);
    let mut sim = RadialParticleSimulator::new();
    sim.tick(&zeroed(BAR_COUNT), BAR_COUNT, &cfg);
    sim.tick(&loud(BAR_COUNT), BAR_COUNT, &cfg);
    assert_eq!(sim.particle(0).unwrap().radial_velocity, cfg.push);
    for _ in 0..10 {
        sim.tick(&loud(BAR_COUNT), BAR_COUNT, &cfg);
        let p = sim.particle(0).unwrap();
        assert_eq!(p.radius, tip);
        assert_eq!(p.radial_velocity, 0.0);
    }
}

#[test]
fn bar_count_change_resets_state() {
    let cfg = VisualizerConfig::default();
    let mut used = RadialParticleSimulator::new();
    for _ in 0..5 {
        used.tick(&loud(64), 64, &cfg);
    }
    let mut fresh = RadialParticleSimulator::new();
    let a = used.tick(&zeroed(32), 32, &cfg).to_vec();
    let b = fresh.tick(&zeroed(32), 32, &cfg).to_vec();
    assert_eq!(used.bar_count(), 32);
    assert_eq!(a, b);
}

#[test]
fn degenerate_input_returns_last_frame() {
    let cfg = VisualizerConfig::default();
    let mut sim = RadialParticleSimulator::new();
    let last = sim.tick(&loud(16), 16, &cfg).to_vec();

    assert_eq!(sim.tick(&zeroed(16), 0, &cfg), last.as_slice());

    let broken = VisualizerConfig {
        gravity: f32::NAN,
        ..cfg
    };
    assert_eq!(sim.tick(&zeroed(16), 16, &broken), last.as_slice());
}

#[test]
fn short_samples_read_as_silence() {
    let cfg = VisualizerConfig::default();
    let mut sim = RadialParticleSimulator::new();
    let frame = sim.tick(&loud(4), 8, &cfg);
    assert_eq!(frame[3].bar_length, cfg.bar_length(1.0));
    assert_eq!(frame[7].bar_length, cfg.bar_length(SILENCE_BYTE as f32 / 255.0));
}

#[test]
fn idle_silence_matches_live_silence() {
    let cfg = VisualizerConfig::default();
    let mut idle = RadialParticleSimulator::new();
    let mut live = RadialParticleSimulator::new();
    let flat = AudioSample::from_bytes(vec![SILENCE_BYTE; BAR_COUNT]);
    for _ in 0..30 {
        idle.tick(&AudioSample::silent(SAMPLE_LEN), BAR_COUNT, &cfg);
        live.tick(&flat, BAR_COUNT, &cfg);
    }
    assert_eq!(idle.frame(), live.frame());
}

#[test]
fn angles_spread_evenly() {
    let cfg = VisualizerConfig::default();
    let mut sim = RadialParticleSimulator::new();
    let frame = sim.tick(&zeroed(4), 4, &cfg);
    let step = std::f32::consts::TAU / 4.0;
    for (i, bar) in frame.iter().enumerate() {
        assert!((bar.angle - i as f32 * step).abs() < 1e-6);
    }
}

#[test]
fn bar_segment_starts_on_inner_ring() {
    let bar = BarFrame {
        angle: 0.0,
        bar_length: 10.0,
        particle_radius: 130.0,
    };
    let center = Vec2::new(160.0, 160.0);
    let (a, b) = bar.segment(center, 120.0);
    assert!((a - Vec2::new(280.0, 160.0)).length() < 1e-4);
    assert!((b - Vec2::new(290.0, 160.0)).length() < 1e-4);
    assert!((bar.plate_point(center) - Vec2::new(290.0, 160.0)).length() < 1e-4);
}

#[test]
fn simulation_is_deterministic() {
    let cfg = VisualizerConfig::default();
    let mut rng = StdRng::seed_from_u64(390);
    let samples: Vec<AudioSample> = (0..120)
        .map(|_| AudioSample::from_bytes((0..BAR_COUNT).map(|_| rng.gen::<u8>()).collect()))
        .collect();

    let run = || {
        let mut sim = RadialParticleSimulator::new();
        let mut last = Vec::new();
        for s in &samples {
            last = sim.tick(s, BAR_COUNT, &cfg).to_vec();
        }
        last
    };
    assert_eq!(run(), run());
}
