/// Application state for the animated backdrop
///
/// `Backdrop` owns the camera, scene, pointer and visibility state. Events
/// come in through `Backdrop::input_source`; each display refresh calls
/// `Backdrop::update` followed by `Backdrop::render`.
use log::{debug, info};
use rand::Rng;

use crate::config::{MotionConfig, SceneConfig};
use crate::frame;
use crate::input::{EventKind, InputEvent, InputSource};
use crate::pointer::PointerState;
use crate::projection::Camera;
use crate::scene::Scene;
use crate::theme::Theme;
use crate::viewport::{SurfaceSize, Viewport};
use crate::visibility::{VisibilityController, VisibilityState};

/// Drawing backend for a built scene
pub trait SceneRenderer {
    type Error;

    /// Draw one frame into a surface of `size` device pixels.
    ///
    /// Implementations resize their backing store when `size` changes.
    fn render(&mut self, scene: &Scene, camera: &Camera, size: SurfaceSize) -> Result<(), Self::Error>;
}

pub struct Backdrop {
    scene: Scene,
    camera: Camera,
    motion: MotionConfig,
    max_pixel_ratio: f32,
    viewport: Viewport,
    surface: SurfaceSize,
    pointer: PointerState,
    visibility: VisibilityController,
    frames: u64,
}

impl Backdrop {
    pub fn new<R: Rng + ?Sized>(
        config: &SceneConfig,
        theme: &Theme,
        viewport: Viewport,
        device_pixel_ratio: f32,
        rng: &mut R,
    ) -> Self {
        let scene = Scene::build(config, theme, rng);
        let camera = Camera::new(&config.camera, viewport);
        let max_pixel_ratio = config.surface.max_pixel_ratio;
        let surface = SurfaceSize::for_viewport(viewport, device_pixel_ratio, max_pixel_ratio);
        info!(
            "backdrop ready: viewport {}x{}, surface {}x{}",
            viewport.width, viewport.height, surface.width, surface.height
        );

        Self {
            scene,
            camera,
            motion: config.motion.clone(),
            max_pixel_ratio,
            viewport,
            surface,
            pointer: PointerState::default(),
            visibility: VisibilityController::new(&config.skills),
            frames: 0,
        }
    }

    /// Handlers for pointer, scroll and resize events
    pub fn input_source() -> InputSource<Self> {
        let mut source = InputSource::new();
        source
            .on(EventKind::PointerMove, Self::on_pointer_move)
            .on(EventKind::Scroll, Self::on_scroll)
            .on(EventKind::Resize, Self::on_resize);
        source
    }

    fn on_pointer_move(backdrop: &mut Self, event: &InputEvent, _now: f64) {
        if let InputEvent::PointerMove { client_x, client_y } = *event {
            backdrop.pointer = PointerState::from_client(client_x, client_y, backdrop.viewport);
        }
    }

    fn on_scroll(backdrop: &mut Self, event: &InputEvent, now: f64) {
        if let InputEvent::Scroll { section } = event {
            let visible = section.intersects_vertically(backdrop.viewport.height);
            backdrop
                .visibility
                .on_scroll(visible, &mut backdrop.scene.skills, now);
        }
    }

    fn on_resize(backdrop: &mut Self, event: &InputEvent, _now: f64) {
        if let InputEvent::Resize {
            viewport,
            device_pixel_ratio,
        } = *event
        {
            backdrop.resize(viewport, device_pixel_ratio);
        }
    }

    /// Match camera aspect and surface size to the viewport; idempotent
    pub fn resize(&mut self, viewport: Viewport, device_pixel_ratio: f32) {
        self.viewport = viewport;
        self.camera.resize(viewport);
        self.surface = SurfaceSize::for_viewport(viewport, device_pixel_ratio, self.max_pixel_ratio);
        debug!(
            "resized to {}x{} (surface {}x{})",
            viewport.width, viewport.height, self.surface.width, self.surface.height
        );
    }

    /// Advance tweens and per-frame motion to `elapsed` seconds since start
    pub fn update(&mut self, elapsed: f64) {
        self.visibility.advance(&mut self.scene.skills, elapsed);
        frame::advance_scene(&mut self.scene, elapsed, self.pointer, &self.motion);
        self.frames += 1;
    }

    /// Issue one render call for the current state
    pub fn render<R: SceneRenderer>(&self, renderer: &mut R) -> Result<(), R::Error> {
        renderer.render(&self.scene, &self.camera, self.surface)
    }

    /// `update` then `render`, as run once per display refresh
    pub fn frame<R: SceneRenderer>(&mut self, elapsed: f64, renderer: &mut R) -> Result<(), R::Error> {
        self.update(elapsed);
        self.render(renderer)
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn surface(&self) -> SurfaceSize {
        self.surface
    }

    pub fn pointer(&self) -> PointerState {
        self.pointer
    }

    pub fn visibility(&self) -> VisibilityState {
        self.visibility.state()
    }

    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}
