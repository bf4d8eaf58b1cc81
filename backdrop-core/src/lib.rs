/// Backdrop Core Library - Scene state and animation logic
///
/// This library provides the platform-free core of the animated page
/// backdrop: scene construction, the skill-group visibility state machine,
/// tweens, the per-frame updater and the page-chrome state. Front-ends feed
/// it input events and a time source, and supply a `SceneRenderer`.

pub mod app;
pub mod chrome;
pub mod config;
pub mod frame;
pub mod geometry;
pub mod input;
pub mod pointer;
pub mod projection;
pub mod scene;
pub mod theme;
pub mod transform;
pub mod tween;
pub mod viewport;
pub mod visibility;

// Re-export commonly used types
pub use app::{Backdrop, SceneRenderer};
pub use chrome::{MobileMenu, PageChrome, RevealTracker};
pub use config::{ConfigError, SceneConfig};
pub use geometry::{ShapeKind, Wireframe};
pub use input::{Control, EventKind, InputEvent, InputSource};
pub use pointer::PointerState;
pub use projection::Camera;
pub use scene::{ParticleField, Scene, SkillGroup, SkillShape};
pub use theme::{Color, Theme, ThemeError};
pub use transform::{Pose, RotationState, Transform};
pub use tween::{Easing, Tween};
pub use viewport::{Rect, SurfaceSize, Viewport};
pub use visibility::{VisibilityController, VisibilityState};
