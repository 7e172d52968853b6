//! Cinematic camera: three scripted paths, cycled on a timer and blended with eased smoothing.

use nalgebra::{Point3, Vector3};
use serde::{Deserialize, Serialize};

use crate::{
    constants::{
        CAMERA_BASE_SMOOTH_FACTOR, CAMERA_MAX_TILT, CAMERA_MIN_SMOOTH_FACTOR,
        CAMERA_MODE_INTERVAL, CAMERA_START_POSITION, CAMERA_TILT_FACTOR,
        CAMERA_TRANSITION_DURATION, FOLLOW_FALLBACK_TARGET,
    },
    locomotion::finite_or,
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CameraMode {
    #[default]
    Orbit,
    Dramatic,
    Follow,
}

impl CameraMode {
    /// Cycle order: orbit → dramatic → follow → orbit.
    pub fn next(self) -> Self {
        match self {
            CameraMode::Orbit => CameraMode::Dramatic,
            CameraMode::Dramatic => CameraMode::Follow,
            CameraMode::Follow => CameraMode::Orbit,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            CameraMode::Orbit => "orbit",
            CameraMode::Dramatic => "dramatic",
            CameraMode::Follow => "follow",
        }
    }
}

/// A circular path around the origin with a vertical bob.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CirclePath {
    pub radius: f32,
    /// Radians per second.
    pub angular_speed: f32,
    pub height: f32,
    pub bob_amplitude: f32,
    /// Radians per second of the bob.
    pub bob_frequency: f32,
}

impl CirclePath {
    pub fn position_at(&self, time: f32) -> Point3<f32> {
        let angle = time * self.angular_speed;
        Point3::new(
            angle.sin() * self.radius,
            self.height + (time * self.bob_frequency).sin() * self.bob_amplitude,
            angle.cos() * self.radius,
        )
    }

    fn normalize(&mut self) {
        self.radius = finite_or(self.radius, 20.0).max(0.0);
        self.angular_speed = finite_or(self.angular_speed, 0.0);
        self.height = finite_or(self.height, 8.0);
        self.bob_amplitude = finite_or(self.bob_amplitude, 0.0).max(0.0);
        self.bob_frequency = finite_or(self.bob_frequency, 0.0);
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraPathSettings {
    pub orbit: CirclePath,
    /// Height of the fixed orbit look-at point above the origin.
    pub orbit_look_height: f32,
    pub dramatic: CirclePath,
    /// Fraction of the camera height the dramatic look-at point sits at.
    pub dramatic_look_ratio: f32,
    pub follow_distance: f32,
    pub follow_height: f32,
    pub follow_look_offset: [f32; 3],
    pub mode_interval: f32,
    pub transition_duration: f32,
    pub base_smooth_factor: f32,
    pub min_smooth_factor: f32,
    pub tilt_factor: f32,
    pub max_tilt: f32,
}

impl Default for CameraPathSettings {
    fn default() -> Self {
        Self {
            orbit: CirclePath {
                radius: 20.0,
                angular_speed: 0.1,
                height: 8.0,
                bob_amplitude: 1.0,
                bob_frequency: 0.5,
            },
            orbit_look_height: 2.0,
            dramatic: CirclePath {
                radius: 35.0,
                angular_speed: 0.05,
                height: 15.0,
                bob_amplitude: 4.0,
                bob_frequency: 0.3,
            },
            dramatic_look_ratio: 0.3,
            follow_distance: 10.0,
            follow_height: 5.0,
            follow_look_offset: [0.0, 1.0, 0.0],
            mode_interval: CAMERA_MODE_INTERVAL,
            transition_duration: CAMERA_TRANSITION_DURATION,
            base_smooth_factor: CAMERA_BASE_SMOOTH_FACTOR,
            min_smooth_factor: CAMERA_MIN_SMOOTH_FACTOR,
            tilt_factor: CAMERA_TILT_FACTOR,
            max_tilt: CAMERA_MAX_TILT,
        }
    }
}

impl CameraPathSettings {
    pub fn normalize(&mut self) {
        self.orbit.normalize();
        self.dramatic.normalize();
        self.orbit_look_height = finite_or(self.orbit_look_height, 2.0);
        self.dramatic_look_ratio = finite_or(self.dramatic_look_ratio, 0.3);
        self.follow_distance = finite_or(self.follow_distance, 10.0).max(0.0);
        self.follow_height = finite_or(self.follow_height, 5.0);
        for v in &mut self.follow_look_offset {
            *v = finite_or(*v, 0.0);
        }
        self.mode_interval = finite_or(self.mode_interval, CAMERA_MODE_INTERVAL).max(0.1);
        self.transition_duration =
            finite_or(self.transition_duration, CAMERA_TRANSITION_DURATION).max(0.0);
        self.min_smooth_factor =
            finite_or(self.min_smooth_factor, CAMERA_MIN_SMOOTH_FACTOR).clamp(1.0e-4, 1.0);
        self.base_smooth_factor = finite_or(self.base_smooth_factor, CAMERA_BASE_SMOOTH_FACTOR)
            .clamp(self.min_smooth_factor, 1.0);
        self.tilt_factor = finite_or(self.tilt_factor, CAMERA_TILT_FACTOR);
        self.max_tilt = finite_or(self.max_tilt, CAMERA_MAX_TILT).abs();
    }
}

/// Quadratic ease-in/out on `[0, 1]`.
#[inline]
pub fn ease_in_out_quad(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        2.0 * t * t
    } else {
        -1.0 + (4.0 - 2.0 * t) * t
    }
}

/// `clamp((now - start) / (end - start), 0, 1)`; an empty window is already complete.
#[inline]
pub fn transition_progress(now: f32, start: f32, end: f32) -> f32 {
    let span = end - start;
    if span <= 0.0 || !span.is_finite() {
        return 1.0;
    }
    ((now - start) / span).clamp(0.0, 1.0)
}

/// Lerp factor for this frame: `base * (1 - ease(progress))`, floored so it stays in `(0, 1]`.
#[inline]
pub fn smoothing_factor(progress: f32, settings: &CameraPathSettings) -> f32 {
    let eased = settings.base_smooth_factor * (1.0 - ease_in_out_quad(progress));
    eased.max(settings.min_smooth_factor).clamp(f32::MIN_POSITIVE, 1.0)
}

/// Target placement for one mode, before blending.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraTarget {
    pub position: Point3<f32>,
    pub look_at: Point3<f32>,
}

/// Where `mode` wants the camera at `time`.
///
/// `current` only matters for follow mode, which trails along the current bearing to the
/// target. A missing follow target falls back to [`FOLLOW_FALLBACK_TARGET`].
pub fn mode_target(
    mode: CameraMode,
    time: f32,
    current: Point3<f32>,
    follow_target: Option<Point3<f32>>,
    settings: &CameraPathSettings,
) -> CameraTarget {
    match mode {
        CameraMode::Orbit => CameraTarget {
            position: settings.orbit.position_at(time),
            look_at: Point3::new(0.0, settings.orbit_look_height, 0.0),
        },
        CameraMode::Dramatic => {
            let position = settings.dramatic.position_at(time);
            CameraTarget {
                position,
                look_at: Point3::new(0.0, position.y * settings.dramatic_look_ratio, 0.0),
            }
        }
        CameraMode::Follow => {
            let target = follow_target.unwrap_or_else(|| Point3::from(FOLLOW_FALLBACK_TARGET));
            let bearing = (current.x - target.x).atan2(current.z - target.z);
            let offset = Vector3::new(
                bearing.sin() * settings.follow_distance,
                settings.follow_height,
                bearing.cos() * settings.follow_distance,
            );
            CameraTarget {
                position: target + offset,
                look_at: target + Vector3::from(settings.follow_look_offset),
            }
        }
    }
}

/// Camera placement produced by one [`CameraRig::advance`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraFrame {
    pub position: Point3<f32>,
    pub look_at: Point3<f32>,
    /// Banking angle about the view axis (radians).
    pub tilt: f32,
    pub mode: CameraMode,
}

/// Live cinematic camera state.
#[derive(Clone, Debug)]
pub struct CameraRig {
    settings: CameraPathSettings,
    position: Point3<f32>,
    look_at: Point3<f32>,
    tilt: f32,
    mode: CameraMode,
    time: f32,
    mode_started_at: f32,
    transition: (f32, f32),
    placed: bool,
}

impl CameraRig {
    /// Settings are normalized on the way in; a rig never runs with a non-positive interval.
    pub fn new(mut settings: CameraPathSettings) -> Self {
        settings.normalize();
        Self {
            settings,
            position: Point3::from(CAMERA_START_POSITION),
            look_at: Point3::origin(),
            tilt: 0.0,
            mode: CameraMode::Orbit,
            time: 0.0,
            mode_started_at: 0.0,
            transition: (0.0, settings.transition_duration),
            placed: false,
        }
    }

    pub fn mode(&self) -> CameraMode {
        self.mode
    }

    pub fn time(&self) -> f32 {
        self.time
    }

    pub fn position(&self) -> Point3<f32> {
        self.position
    }

    pub fn transition_window(&self) -> (f32, f32) {
        self.transition
    }

    pub fn settings(&self) -> &CameraPathSettings {
        &self.settings
    }

    /// Advance by `dt` seconds and blend toward the current mode's target.
    ///
    /// The first call after construction places the camera on its target directly; every later
    /// call moves it by a convex combination of current and target.
    pub fn advance(&mut self, dt: f32, follow_target: Option<Point3<f32>>) -> CameraFrame {
        if dt.is_finite() && dt > 0.0 {
            self.time += dt;
        }
        self.cycle_mode();

        if !self.is_finite() {
            log::warn!("camera rig state went non-finite; snapping to target");
            self.placed = false;
            self.tilt = 0.0;
        }

        let target = mode_target(
            self.mode,
            self.time,
            self.position,
            follow_target,
            &self.settings,
        );

        if !self.placed {
            self.position = target.position;
            self.look_at = target.look_at;
            self.tilt = 0.0;
            self.placed = true;
            return self.frame();
        }

        let progress = transition_progress(self.time, self.transition.0, self.transition.1);
        let factor = smoothing_factor(progress, &self.settings);

        let delta = target.position - self.position;
        self.position += delta * factor;
        self.look_at += (target.look_at - self.look_at) * factor;

        let max_tilt = self.settings.max_tilt;
        let tilt_target = (-delta.x * self.settings.tilt_factor).clamp(-max_tilt, max_tilt);
        self.tilt += (tilt_target - self.tilt) * factor;

        self.frame()
    }

    /// Continue from an externally chosen placement, e.g. the view the user was looking through.
    /// The next [`advance`](Self::advance) blends away from here instead of snapping.
    pub fn place(&mut self, position: Point3<f32>, look_at: Point3<f32>) {
        if position.iter().chain(look_at.iter()).all(|v| v.is_finite()) {
            self.position = position;
            self.look_at = look_at;
            self.tilt = 0.0;
            self.placed = true;
        }
    }

    fn cycle_mode(&mut self) {
        if self.settings.mode_interval.is_nan() || self.settings.mode_interval <= 0.0 {
            return;
        }
        while self.time - self.mode_started_at >= self.settings.mode_interval {
            self.mode_started_at += self.settings.mode_interval;
            self.mode = self.mode.next();
            self.transition = (
                self.mode_started_at,
                self.mode_started_at + self.settings.transition_duration,
            );
            log::debug!(
                "camera mode -> {} at t={:.2}s",
                self.mode.as_str(),
                self.mode_started_at
            );
        }
    }

    fn is_finite(&self) -> bool {
        self.position.iter().all(|v| v.is_finite())
            && self.look_at.iter().all(|v| v.is_finite())
            && self.tilt.is_finite()
    }

    fn frame(&self) -> CameraFrame {
        CameraFrame {
            position: self.position,
            look_at: self.look_at,
            tilt: self.tilt,
            mode: self.mode,
        }
    }

    #[cfg(test)]
    fn force_position(&mut self, position: Point3<f32>) {
        self.position = position;
    }
}
