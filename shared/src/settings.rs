//! Scene settings document.
//!
//! Every field has a default, so a settings file only needs the values it overrides:
//!
//! ```toml
//! [locomotion]
//! run_speed = 30.0
//!
//! [wave]
//! timing = "delta_scaled"
//!
//! [camera]
//! mode_interval = 20.0
//! ```

use std::{fmt, fs, io, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    camera_path::CameraPathSettings, locomotion::LocomotionSettings, locomotion::finite_or,
    physics::PhysicsSettings, wave::WaveSettings,
};

/// Exponential fog.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FogSettings {
    /// sRGB, `0xRRGGBB`.
    pub color: u32,
    pub density: f32,
}

impl Default for FogSettings {
    fn default() -> Self {
        Self {
            color: 0x001a2f,
            density: 0.005,
        }
    }
}

/// Background star shell.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldSettings {
    pub count: u32,
    /// Inner radius of the shell.
    pub radius: f32,
    /// Shell thickness beyond `radius`.
    pub depth: f32,
    /// Size of each star point.
    pub size: f32,
}

impl Default for StarfieldSettings {
    fn default() -> Self {
        Self {
            count: 5_000,
            radius: 300.0,
            depth: 50.0,
            size: 0.4,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightSettings {
    /// Ambient brightness in the renderer's units.
    pub ambient_brightness: f32,
    pub directional_position: [f32; 3],
    /// Directional illuminance (lux).
    pub directional_illuminance: f32,
    pub shadows: bool,
}

impl Default for LightSettings {
    fn default() -> Self {
        Self {
            ambient_brightness: 500.0,
            directional_position: [10.0, 10.0, 10.0],
            directional_illuminance: 2_000.0,
            shadows: true,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneSettings {
    pub locomotion: LocomotionSettings,
    pub wave: WaveSettings,
    pub camera: CameraPathSettings,
    pub physics: PhysicsSettings,
    pub fog: FogSettings,
    pub stars: StarfieldSettings,
    pub lights: LightSettings,
}

#[derive(Debug)]
pub enum SettingsError {
    Io(io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::Io(err) => write!(f, "failed to read settings: {err}"),
            SettingsError::Parse(err) => write!(f, "invalid settings: {err}"),
        }
    }
}

impl std::error::Error for SettingsError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SettingsError::Io(err) => Some(err),
            SettingsError::Parse(err) => Some(err),
        }
    }
}

impl From<io::Error> for SettingsError {
    fn from(err: io::Error) -> Self {
        SettingsError::Io(err)
    }
}

impl From<toml::de::Error> for SettingsError {
    fn from(err: toml::de::Error) -> Self {
        SettingsError::Parse(err)
    }
}

impl SceneSettings {
    /// Parse a TOML document; the result is normalized.
    pub fn from_toml_str(contents: &str) -> Result<Self, SettingsError> {
        let mut settings: Self = toml::from_str(contents)?;
        settings.normalize();
        Ok(settings)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let contents = fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Clamp every value into a usable range; non-finite values fall back to defaults.
    pub fn normalize(&mut self) {
        self.locomotion.normalize();
        self.wave.normalize();
        self.camera.normalize();
        self.physics.normalize();

        // The body and the eye offset must agree on the sphere size.
        self.physics.player_radius = self.locomotion.sphere_radius;

        self.fog.color &= 0x00ff_ffff;
        self.fog.density = finite_or(self.fog.density, 0.005).max(0.0);

        self.stars.count = self.stars.count.min(100_000);
        self.stars.radius = finite_or(self.stars.radius, 300.0).max(1.0);
        self.stars.depth = finite_or(self.stars.depth, 50.0).max(0.0);
        self.stars.size = finite_or(self.stars.size, 0.4).max(0.0);

        self.lights.ambient_brightness = finite_or(self.lights.ambient_brightness, 500.0).max(0.0);
        for v in &mut self.lights.directional_position {
            *v = finite_or(*v, 10.0);
        }
        self.lights.directional_illuminance =
            finite_or(self.lights.directional_illuminance, 2_000.0).max(0.0);
    }
}

/// Split `0xRRGGBB` into sRGB channels in `[0, 1]`.
pub fn rgb_channels(color: u32) -> [f32; 3] {
    [
        ((color >> 16) & 0xff) as f32 / 255.0,
        ((color >> 8) & 0xff) as f32 / 255.0,
        (color & 0xff) as f32 / 255.0,
    ]
}
