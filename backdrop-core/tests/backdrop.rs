use backdrop_core::{
    Backdrop, Camera, Control, InputEvent, PageChrome, Rect, Scene, SceneConfig, SceneRenderer,
    SurfaceSize, VisibilityState, Viewport,
};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Stand-in surface that records what each render call saw
#[derive(Default)]
struct Recorder {
    frames: Vec<(bool, f32, SurfaceSize)>,
}

impl SceneRenderer for Recorder {
    type Error = String;

    fn render(&mut self, scene: &Scene, _camera: &Camera, size: SurfaceSize) -> Result<(), String> {
        self.frames
            .push((scene.skills.visible, scene.skills.pose.position.z, size));
        Ok(())
    }
}

struct Failing;

impl SceneRenderer for Failing {
    type Error = &'static str;

    fn render(&mut self, _: &Scene, _: &Camera, _: SurfaceSize) -> Result<(), Self::Error> {
        Err("context lost")
    }
}

/// Builds the projection every frame, like a real surface would
struct Projecting {
    frames: usize,
}

impl SceneRenderer for Projecting {
    type Error = String;

    fn render(&mut self, scene: &Scene, camera: &Camera, _size: SurfaceSize) -> Result<(), String> {
        let view_projection = camera.view_projection();
        if view_projection.iter().any(|v| !v.is_finite()) {
            return Err("non-finite projection".to_string());
        }
        for star in scene.particles.positions.iter().take(10) {
            camera.project_to_screen(star, &nalgebra::Matrix4::identity(), 100, 100);
        }
        self.frames += 1;
        Ok(())
    }
}

const VIEWPORT: Viewport = Viewport {
    width: 1024.0,
    height: 768.0,
};

fn backdrop() -> Backdrop {
    let config = SceneConfig::default();
    let theme = config.theme().unwrap();
    Backdrop::new(&config, &theme, VIEWPORT, 1.0, &mut StdRng::seed_from_u64(99))
}

fn scroll(top: f32) -> InputEvent {
    InputEvent::Scroll {
        section: Rect::band(top, top + 600.0, VIEWPORT),
    }
}

#[test]
fn section_at_fold_enters_once() {
    let mut backdrop = backdrop();
    let source = Backdrop::input_source();
    let mut recorder = Recorder::default();

    source.dispatch(&mut backdrop, &scroll(900.0), 0.0);
    backdrop.frame(0.016, &mut recorder).unwrap();
    assert_eq!(backdrop.visibility(), VisibilityState::Hidden);

    source.dispatch(&mut backdrop, &scroll(767.0), 0.1);
    assert_eq!(backdrop.visibility(), VisibilityState::Entering);
    let lift_z = backdrop.scene().skills.pose.position.z;

    // Further scrolling while entering changes nothing
    for (i, top) in [700.0, 650.0, 600.0].iter().enumerate() {
        source.dispatch(&mut backdrop, &scroll(*top), 0.1 + i as f64 * 0.01);
    }
    assert_eq!(backdrop.scene().skills.pose.position.z, lift_z);

    let mut t = 0.1;
    while t < 2.2 {
        t += 1.0 / 60.0;
        backdrop.frame(t, &mut recorder).unwrap();
    }

    assert_eq!(backdrop.visibility(), VisibilityState::Visible);
    assert_eq!(backdrop.scene().skills.pose.position.z, 5.0);
    assert!(!recorder.frames[0].0);
    assert!(recorder.frames.last().unwrap().0);
    // z only ever grows during the fly-in
    let depths: Vec<f32> = recorder.frames[1..].iter().map(|f| f.1).collect();
    assert!(depths.windows(2).all(|w| w[1] >= w[0]));
}

#[test]
fn leaving_the_section_parks_the_group() {
    let mut backdrop = backdrop();
    let source = Backdrop::input_source();
    let mut recorder = Recorder::default();

    source.dispatch(&mut backdrop, &scroll(100.0), 0.0);
    backdrop.frame(2.5, &mut recorder).unwrap();

    source.dispatch(&mut backdrop, &scroll(-900.0), 3.0);
    assert_eq!(backdrop.visibility(), VisibilityState::Exiting);
    backdrop.frame(3.5, &mut recorder).unwrap();
    assert!(backdrop.scene().skills.visible);
    backdrop.frame(4.0, &mut recorder).unwrap();

    assert_eq!(backdrop.visibility(), VisibilityState::Hidden);
    let (visible, z, _) = *recorder.frames.last().unwrap();
    assert!(!visible);
    assert_eq!(z, -20.0);
}

#[test]
fn render_sees_resized_surface() {
    let mut backdrop = backdrop();
    let source = Backdrop::input_source();
    let mut recorder = Recorder::default();

    let resize = InputEvent::Resize {
        viewport: Viewport::new(500.0, 400.0),
        device_pixel_ratio: 2.5,
    };
    source.dispatch(&mut backdrop, &resize, 0.0);
    source.dispatch(&mut backdrop, &resize, 0.0);
    backdrop.frame(0.1, &mut recorder).unwrap();

    assert_eq!(recorder.frames[0].2, SurfaceSize { width: 1000, height: 800 });
    assert!((backdrop.camera().aspect - 1.25).abs() < 1e-6);
}

#[test]
fn render_errors_propagate() {
    let mut backdrop = backdrop();
    assert_eq!(backdrop.frame(0.0, &mut Failing), Err("context lost"));
}

#[test]
fn chrome_and_scene_share_one_event_stream() {
    let mut backdrop = backdrop();
    let mut chrome = PageChrome::<usize>::new(0.1);
    let scene_source = Backdrop::input_source();
    let chrome_source = PageChrome::input_source();

    let events = [
        InputEvent::Click(Control::MenuToggle),
        scroll(300.0),
        InputEvent::Click(Control::NavLink),
    ];
    for event in &events {
        scene_source.dispatch(&mut backdrop, event, 0.0);
        chrome_source.dispatch(&mut chrome, event, 0.0);
    }

    assert!(!chrome.menu.is_active());
    assert_eq!(backdrop.visibility(), VisibilityState::Entering);
}

#[test]
fn zero_width_resize_keeps_rendering() {
    let mut backdrop = backdrop();
    let mut renderer = Projecting { frames: 0 };

    backdrop.resize(Viewport::new(0.0, 768.0), 1.0);
    assert_eq!(backdrop.camera().aspect, 1.0);
    backdrop.frame(0.1, &mut renderer).unwrap();

    backdrop.resize(Viewport::new(1024.0, 0.0), 1.0);
    backdrop.frame(0.2, &mut renderer).unwrap();
    assert_eq!(renderer.frames, 2);
}
