/// Scene configuration
///
/// Every tunable of the backdrop lives here with its built-in default, so a
/// front-end can run with `SceneConfig::default()` or override any subset of
/// fields from JSON.
use log::debug;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::theme::{Theme, ThemeError};

/// Errors raised while loading configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("malformed configuration: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Theme(#[from] ThemeError),
    #[error("invalid `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// Top-level backdrop configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    pub theme: ThemeConfig,
    pub camera: CameraConfig,
    pub particles: ParticleConfig,
    pub skills: SkillConfig,
    pub motion: MotionConfig,
    pub surface: SurfaceConfig,
    pub page: PageConfig,
}

/// Styling contract with the page stylesheet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Background and fog color; matches the page's `--bg-navy` token
    pub background: String,
    /// Particle, wireframe and point-light tint
    pub accent: String,
    pub fog_near: f32,
    pub fog_far: f32,
    /// Custom properties consulted by `Theme::from_css`
    pub background_token: String,
    pub accent_token: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background: "#0a192f".to_string(),
            accent: "#64ffda".to_string(),
            fog_near: 10.0,
            fog_far: 50.0,
            background_token: "--bg-navy".to_string(),
            accent_token: "--teal".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Vertical field of view in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance from the origin along +Z
    pub distance: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 75.0,
            near: 0.1,
            far: 1000.0,
            distance: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParticleConfig {
    pub count: usize,
    /// Edge length of the cube the stars are scattered in
    pub spread: f32,
    pub size: f32,
    pub opacity: f32,
}

impl Default for ParticleConfig {
    fn default() -> Self {
        Self {
            count: 1000,
            spread: 60.0,
            size: 0.05,
            opacity: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillConfig {
    pub count: usize,
    /// Offset ranges per axis, centered on the group origin
    pub spread: [f32; 3],
    /// Per-frame shape spin is drawn from `-max_spin / 2 .. max_spin / 2`
    pub max_spin: f32,
    pub opacity: f32,
    /// Group z while hidden
    pub parked_z: f32,
    /// Group z once flown in
    pub near_z: f32,
    /// Seconds for the fly-in and spin-in
    pub enter_duration: f64,
    /// Seconds for the fly-out
    pub exit_duration: f64,
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            count: 6,
            spread: [10.0, 10.0, 5.0],
            max_spin: 0.02,
            opacity: 0.3,
            parked_z: -20.0,
            near_z: 5.0,
            enter_duration: 2.0,
            exit_duration: 1.0,
        }
    }
}

/// Rates and gains applied by the frame updater
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Star-field yaw per second
    pub drift_rate: f32,
    /// Star-field rotation per unit of pointer offset
    pub particle_parallax: f32,
    /// Group yaw added every rendered frame
    pub group_spin_per_frame: f32,
    /// Group tilt per unit of pointer offset
    pub group_parallax: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            drift_rate: 0.05,
            particle_parallax: 0.1,
            group_spin_per_frame: 0.005,
            group_parallax: 0.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    pub antialias: bool,
    pub max_pixel_ratio: f32,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            antialias: true,
            max_pixel_ratio: 2.0,
        }
    }
}

/// DOM hooks used by the web front-end
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub canvas_id: String,
    pub skills_section_id: String,
    pub menu_toggle_selector: String,
    pub menu_selector: String,
    pub close_menu_selector: String,
    pub nav_link_selector: String,
    pub reveal_selector: String,
    pub active_class: String,
    /// Visible fraction at which a reveal element activates
    pub reveal_threshold: f32,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            canvas_id: "bg-canvas".to_string(),
            skills_section_id: "skills".to_string(),
            menu_toggle_selector: ".menu-toggle".to_string(),
            menu_selector: ".mobile-menu".to_string(),
            close_menu_selector: ".close-menu".to_string(),
            nav_link_selector: ".mobile-nav-links a".to_string(),
            reveal_selector: ".reveal".to_string(),
            active_class: "active".to_string(),
            reveal_threshold: 0.1,
        }
    }
}

impl SceneConfig {
    /// Parse a (possibly partial) JSON document; missing fields keep defaults
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: SceneConfig = serde_json::from_str(json)?;
        config.validate()?;
        debug!("loaded scene config: {:?}", config);
        Ok(config)
    }

    /// Reject values the camera, surface or tweens cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        let camera = &self.camera;
        if !(camera.fov_degrees > 0.0 && camera.fov_degrees < 180.0) {
            return Err(invalid(
                "camera.fov_degrees",
                format!("{} is outside (0, 180)", camera.fov_degrees),
            ));
        }
        if !(camera.near > 0.0) {
            return Err(invalid("camera.near", format!("{} must be positive", camera.near)));
        }
        if !(camera.near < camera.far) {
            return Err(invalid(
                "camera.far",
                format!("{} must be beyond near plane {}", camera.far, camera.near),
            ));
        }
        if !(self.surface.max_pixel_ratio > 0.0) {
            return Err(invalid(
                "surface.max_pixel_ratio",
                format!("{} must be positive", self.surface.max_pixel_ratio),
            ));
        }
        if !(self.skills.enter_duration >= 0.0) {
            return Err(invalid(
                "skills.enter_duration",
                format!("{} must not be negative", self.skills.enter_duration),
            ));
        }
        if !(self.skills.exit_duration >= 0.0) {
            return Err(invalid(
                "skills.exit_duration",
                format!("{} must not be negative", self.skills.exit_duration),
            ));
        }
        Ok(())
    }

    /// Resolve the configured color literals
    pub fn theme(&self) -> Result<Theme, ThemeError> {
        Theme::from_hex(&self.theme.background, &self.theme.accent)
    }

    /// Parse JSON and resolve its colors in one step
    pub fn load(json: &str) -> Result<(Self, Theme), ConfigError> {
        let config = Self::from_json(json)?;
        let theme = config.theme()?;
        Ok((config, theme))
    }
}
