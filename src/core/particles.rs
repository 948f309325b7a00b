//! Radial audio bars with inertial "plates" riding on their tips.
//!
//! Each bar's length follows the sampled amplitude. A plate sits above every
//! bar: when the bar outgrows it the plate is launched outward, otherwise it
//! falls back under gravity that weakens as the signal gets louder.

use crate::core::constants::*;
use crate::core::sampling::AudioSample;
use glam::Vec2;
use std::f32::consts::TAU;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualizerConfig {
    /// Radius where bars start (canvas px).
    pub inner_radius: f32,
    pub min_bar_length: f32,
    pub max_bar_length: f32,
    pub expansion_multiplier: f32,
    pub dead_zone: f32,
    pub gravity: f32,
    pub push: f32,
    pub spawn_offset: f32,
    /// Plates never drop below this radius.
    pub min_radius: f32,
    /// Plates never fly past this radius (the rim).
    pub max_radius: f32,
}

impl Default for VisualizerConfig {
    fn default() -> Self {
        Self::for_canvas(VISUALIZER_SIZE_PX)
    }
}

impl VisualizerConfig {
    /// Ring geometry for a square canvas of `size` px.
    pub fn for_canvas(size: f32) -> Self {
        let half = size * 0.5;
        let inner_radius = (half - INNER_RING_INSET_PX).max(0.0);
        Self {
            inner_radius,
            min_bar_length: MIN_BAR_LENGTH_PX,
            max_bar_length: MAX_BAR_LENGTH_PX,
            expansion_multiplier: EXPANSION_MULTIPLIER,
            dead_zone: DEAD_ZONE,
            gravity: PLATE_GRAVITY,
            push: PLATE_PUSH,
            spawn_offset: PLATE_SPAWN_OFFSET,
            min_radius: inner_radius,
            max_radius: (half - RIM_INSET_PX).max(inner_radius),
        }
    }

    pub fn is_valid(&self) -> bool {
        let vals = [
            self.inner_radius,
            self.min_bar_length,
            self.max_bar_length,
            self.expansion_multiplier,
            self.dead_zone,
            self.gravity,
            self.push,
            self.spawn_offset,
            self.min_radius,
            self.max_radius,
        ];
        vals.iter().all(|v| v.is_finite() && *v >= 0.0) && self.max_radius >= self.min_radius
    }

    /// Bar length for amplitude `v` in [0, 1].
    #[inline]
    pub fn bar_length(&self, v: f32) -> f32 {
        if v < self.dead_zone {
            self.min_bar_length
        } else {
            self.min_bar_length + v * self.max_bar_length * self.expansion_multiplier
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ParticleState {
    pub radius: f32,
    pub radial_velocity: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BarFrame {
    pub angle: f32,
    pub bar_length: f32,
    pub particle_radius: f32,
}

impl BarFrame {
    /// Canvas-space start and end of the bar.
    pub fn segment(&self, center: Vec2, inner_radius: f32) -> (Vec2, Vec2) {
        let dir = Vec2::from_angle(self.angle);
        (
            center + dir * inner_radius,
            center + dir * (inner_radius + self.bar_length),
        )
    }

    pub fn plate_point(&self, center: Vec2) -> Vec2 {
        center + Vec2::from_angle(self.angle) * self.particle_radius
    }
}

#[derive(Clone, Debug, Default)]
pub struct RadialParticleSimulator {
    particles: Vec<Option<ParticleState>>,
    frame: Vec<BarFrame>,
}

impl RadialParticleSimulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bar_count(&self) -> usize {
        self.particles.len()
    }

    pub fn particle(&self, index: usize) -> Option<ParticleState> {
        self.particles.get(index).copied().flatten()
    }

    /// Most recent frame.
    pub fn frame(&self) -> &[BarFrame] {
        &self.frame
    }

    pub fn reset(&mut self) {
        self.particles.clear();
        self.frame.clear();
    }

    /// Advance one animation frame.
    ///
    /// Degenerate input (no bars, a broken config) leaves state alone and
    /// hands back the last good frame.
    pub fn tick(
        &mut self,
        sample: &AudioSample,
        bar_count: usize,
        config: &VisualizerConfig,
    ) -> &[BarFrame] {
        if bar_count == 0 || !config.is_valid() {
            return &self.frame;
        }
        if bar_count != self.particles.len() {
            if !self.particles.is_empty() {
                log::debug!(
                    "[viz] bar count {} -> {}, resetting plates",
                    self.particles.len(),
                    bar_count
                );
            }
            self.particles = vec![None; bar_count];
        }
        self.frame.clear();
        for i in 0..bar_count {
            let v = sample.amplitude(i).clamp(0.0, 1.0);
            let bar_length = config.bar_length(v);
            let tip = config.inner_radius + bar_length;
            let p = self.particles[i].get_or_insert(ParticleState {
                radius: tip - config.spawn_offset,
                radial_velocity: 0.0,
            });
            step_plate(p, tip, v, config);
            self.frame.push(BarFrame {
                angle: i as f32 / bar_count as f32 * TAU,
                bar_length,
                particle_radius: p.radius,
            });
        }
        &self.frame
    }
}

fn step_plate(p: &mut ParticleState, tip: f32, v: f32, config: &VisualizerConfig) {
    if p.radius < tip {
        // bar caught up: carry the plate and fling it
        p.radius = tip;
        p.radial_velocity = p.radial_velocity.max(config.push);
        return;
    }
    p.radial_velocity -= config.gravity * (1.0 - v);
    p.radius += p.radial_velocity;
    if p.radius < tip {
        p.radius = tip;
        p.radial_velocity = 0.0;
    }
    if p.radius < config.min_radius {
        p.radius = config.min_radius;
        p.radial_velocity = 0.0;
    }
    let ceiling = config.max_radius.max(tip);
    if p.radius > ceiling {
        p.radius = ceiling;
        p.radial_velocity = 0.0;
    }
}
