//! Procedural ground shimmer.
//!
//! Four summed sinusoids over time and the sample point, attenuated by the sample height. The
//! result drives the ground material's normal-scale each frame. A second, slower pulse drives
//! emissive intensity and transmission.

use nalgebra::{Vector2, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        ATTENUATION_MAX, ATTENUATION_MIN, ATTENUATION_SCALE, PULSE_EMISSIVE_AMPLITUDE,
        PULSE_EMISSIVE_BASE, PULSE_TIME_STEP, PULSE_TRANSMISSION_AMPLITUDE,
        PULSE_TRANSMISSION_BASE, WAVE_BASE_SCALE, WAVE_MAX_SUM, WAVE_PRIMARY, WAVE_QUATERNARY,
        WAVE_REFERENCE_FPS, WAVE_SECONDARY, WAVE_TERTIARY, WAVE_TIME_STEP,
    },
    locomotion::finite_or,
};

/// How the wave clock advances.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WaveTiming {
    /// A fixed `time_step` per frame, whatever the frame duration (animation speed follows the
    /// frame rate).
    #[default]
    FixedPerFrame,
    /// `time_step` scaled by `dt * reference_fps`: same look at the reference rate, frame-rate
    /// independent elsewhere.
    DeltaScaled,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveSettings {
    pub base_scale: f32,
    pub time_step: f32,
    pub timing: WaveTiming,
}

impl Default for WaveSettings {
    fn default() -> Self {
        Self {
            base_scale: WAVE_BASE_SCALE,
            time_step: WAVE_TIME_STEP,
            timing: WaveTiming::FixedPerFrame,
        }
    }
}

impl WaveSettings {
    pub fn normalize(&mut self) {
        self.base_scale = finite_or(self.base_scale, WAVE_BASE_SCALE).max(0.0);
        self.time_step = finite_or(self.time_step, WAVE_TIME_STEP).max(0.0);
    }
}

/// Height-based attenuation, `clamp(1 / (y * 0.1), 0.2, 1.0)`.
///
/// A height at or below zero (or non-finite) has no meaningful distance and takes the floor.
#[inline]
pub fn attenuation(height: f32) -> f32 {
    if !height.is_finite() || height <= 0.0 {
        return ATTENUATION_MIN;
    }
    (1.0 / (height * ATTENUATION_SCALE)).clamp(ATTENUATION_MIN, ATTENUATION_MAX)
}

/// Unattenuated sum of the four wave terms, always within `±WAVE_MAX_SUM`.
#[inline]
pub fn raw_sum(time: f32, position: Vector3<f32>) -> f32 {
    let (x, z) = (position.x, position.z);

    let (a1, f1, p1) = WAVE_PRIMARY;
    let (a2, f2, p2) = WAVE_SECONDARY;
    let (a3, f3, p3) = WAVE_TERTIARY;
    let (a4, f4, p4) = WAVE_QUATERNARY;

    a1 * (f1 * time + x * 0.05 + p1).sin()
        + a2 * (f2 * time + z * 0.08 + p2).sin()
        + a3 * (f3 * time + (x + z) * 0.1 + p3).sin()
        + a4 * (f4 * time + z * 0.05 + p4).cos()
}

/// Attenuated displacement around zero.
pub fn displacement(time: f32, position: Vector3<f32>) -> f32 {
    let sum = raw_sum(time, position);
    if !sum.is_finite() {
        return 0.0;
    }
    sum * attenuation(position.y)
}

/// Normal-perturbation magnitude: `base_scale + displacement(time, position)`.
pub fn sample(time: f32, position: Vector3<f32>, base_scale: f32) -> f32 {
    base_scale + displacement(time, position)
}

/// Inclusive bounds of [`sample`] for a given base scale.
pub fn sample_bounds(base_scale: f32) -> (f32, f32) {
    (base_scale - WAVE_MAX_SUM, base_scale + WAVE_MAX_SUM)
}

/// Monotonic time accumulator for the wave field, owned by the scene context.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WaveClock {
    time: f32,
}

impl WaveClock {
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance one frame and return the new time.
    pub fn tick(&mut self, dt_seconds: f32, settings: &WaveSettings) -> f32 {
        let step = match settings.timing {
            WaveTiming::FixedPerFrame => settings.time_step,
            WaveTiming::DeltaScaled => {
                settings.time_step * dt_seconds.max(0.0) * WAVE_REFERENCE_FPS
            }
        };
        if step.is_finite() {
            self.time += step;
        }
        self.time
    }
}

/// Per-frame values handed to the ground material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GroundUniforms {
    pub normal_scale: Vector2<f32>,
    pub emissive_intensity: f32,
    pub transmission: f32,
}

/// Slow emissive/transmission breathing of the ground material.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct GroundPulse {
    time: f32,
}

impl GroundPulse {
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Advance one frame, returning `(emissive_intensity, transmission)`.
    pub fn tick(&mut self) -> (f32, f32) {
        self.time += PULSE_TIME_STEP;
        (
            PULSE_EMISSIVE_BASE + self.time.sin() * PULSE_EMISSIVE_AMPLITUDE,
            PULSE_TRANSMISSION_BASE + (self.time * 0.5).sin() * PULSE_TRANSMISSION_AMPLITUDE,
        )
    }
}
