/// Backdrop Web - WASM front-end for the animated page backdrop
///
/// Wires DOM events into `backdrop-core`, runs the requestAnimationFrame
/// loop and draws with WebGL2.
use std::cell::{Cell, RefCell};
use std::rc::Rc;

use backdrop_core::{
    Backdrop, Control, InputEvent, InputSource, PageChrome, SceneConfig, VisibilityState,
};
use log::{debug, info, warn};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, HtmlCanvasElement, MouseEvent, Window};

pub mod dom;
pub mod gl;

use gl::WebGlRenderer;

/// Everything the event handlers and the frame loop share
struct Page {
    config: SceneConfig,
    backdrop: Backdrop,
    chrome: PageChrome<usize>,
    scene_input: InputSource<Backdrop>,
    chrome_input: InputSource<PageChrome<usize>>,
    renderer: WebGlRenderer,
    started_ms: f64,
    window: Window,
    skills_section: Option<Element>,
    mobile_menu: Option<Element>,
    reveal_elements: Vec<Element>,
}

impl Page {
    fn now(&self) -> f64 {
        let now_ms = self
            .window
            .performance()
            .map(|p| p.now())
            .unwrap_or(self.started_ms);
        (now_ms - self.started_ms) / 1000.0
    }

    fn dispatch(&mut self, event: InputEvent) {
        let now = self.now();
        self.scene_input.dispatch(&mut self.backdrop, &event, now);
        self.chrome_input.dispatch(&mut self.chrome, &event, now);

        if let (InputEvent::Click(_), Some(menu)) = (event, &self.mobile_menu) {
            dom::set_class(menu, &self.config.page.active_class, self.chrome.menu.is_active());
        }
    }

    fn on_scroll(&mut self) {
        if let Some(section) = &self.skills_section {
            let section = dom::bounding_rect(section);
            self.dispatch(InputEvent::Scroll { section });
        }
        self.check_reveals();
    }

    fn on_resize(&mut self) {
        let viewport = dom::viewport(&self.window);
        let device_pixel_ratio = self.window.device_pixel_ratio() as f32;
        self.dispatch(InputEvent::Resize {
            viewport,
            device_pixel_ratio,
        });
        self.check_reveals();
    }

    fn check_reveals(&mut self) {
        let viewport = dom::viewport(&self.window);
        let ratios: Vec<(usize, f32)> = self
            .reveal_elements
            .iter()
            .enumerate()
            .filter(|(i, _)| self.chrome.reveals.is_pending(i))
            .map(|(i, el)| (i, dom::bounding_rect(el).visible_ratio(viewport)))
            .collect();

        for i in self.chrome.check_reveals(ratios) {
            dom::set_class(&self.reveal_elements[i], &self.config.page.active_class, true);
        }
    }

    fn frame(&mut self) -> Result<(), JsValue> {
        let elapsed = self.now();
        self.backdrop.frame(elapsed, &mut self.renderer)
    }
}

/// Handle returned to JavaScript; owns the running page state
#[wasm_bindgen]
pub struct WebBackdrop {
    page: Rc<RefCell<Page>>,
    started: Cell<bool>,
}

/// Claim the one-time start; false on every later call
fn claim_start(started: &Cell<bool>) -> bool {
    !started.replace(true)
}

#[wasm_bindgen]
impl WebBackdrop {
    /// Build the scene on the configured canvas.
    ///
    /// `config_json` may override any subset of the defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<WebBackdrop, JsValue> {
        let (config, theme) = match config_json.as_deref() {
            Some(json) => SceneConfig::load(json),
            None => {
                let config = SceneConfig::default();
                config.theme().map(|theme| (config, theme)).map_err(Into::into)
            }
        }
        .map_err(|e| JsValue::from_str(&e.to_string()))?;

        let window = dom::window()?;
        let document = dom::document()?;
        let canvas: HtmlCanvasElement = document
            .get_element_by_id(&config.page.canvas_id)
            .ok_or_else(|| JsValue::from_str(&format!("missing #{}", config.page.canvas_id)))?
            .dyn_into()?;

        let seed = (js_sys::Math::random() * u64::MAX as f64) as u64;
        let backdrop = Backdrop::new(
            &config,
            &theme,
            dom::viewport(&window),
            window.device_pixel_ratio() as f32,
            &mut SmallRng::seed_from_u64(seed),
        );
        let renderer = WebGlRenderer::new(canvas, backdrop.scene(), config.surface.antialias)?;

        let mut chrome = PageChrome::new(config.page.reveal_threshold);
        let reveal_elements = dom::query_all(&document, &config.page.reveal_selector);
        for i in 0..reveal_elements.len() {
            chrome.reveals.observe(i);
        }

        let started_ms = window.performance().map(|p| p.now()).unwrap_or(0.0);
        let page = Page {
            skills_section: document.get_element_by_id(&config.page.skills_section_id),
            mobile_menu: dom::query(&document, &config.page.menu_selector),
            reveal_elements,
            backdrop,
            chrome,
            scene_input: Backdrop::input_source(),
            chrome_input: PageChrome::input_source(),
            renderer,
            started_ms,
            window,
            config,
        };

        Ok(WebBackdrop {
            page: Rc::new(RefCell::new(page)),
            started: Cell::new(false),
        })
    }

    /// Register DOM listeners and start the animation loop.
    ///
    /// Only the first call does anything; listeners and the frame loop are
    /// never installed twice.
    pub fn start(&self) -> Result<(), JsValue> {
        if !claim_start(&self.started) {
            warn!("backdrop already started");
            return Ok(());
        }

        let document = dom::document()?;
        let window = dom::window()?;
        let page_config = self.page.borrow().config.page.clone();

        listen(&window, "mousemove", &self.page, |page, event| {
            if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
                page.dispatch(InputEvent::PointerMove {
                    client_x: mouse.client_x() as f32,
                    client_y: mouse.client_y() as f32,
                });
            }
        })?;
        listen(&window, "scroll", &self.page, |page, _| page.on_scroll())?;
        listen(&window, "resize", &self.page, |page, _| page.on_resize())?;

        // Missing menu controls are skipped without failing setup
        let clicks = [
            (&page_config.menu_toggle_selector, Control::MenuToggle),
            (&page_config.close_menu_selector, Control::CloseMenu),
            (&page_config.nav_link_selector, Control::NavLink),
        ];
        for (selector, control) in clicks {
            for element in dom::query_all(&document, selector) {
                listen(&element, "click", &self.page, move |page, _| {
                    page.dispatch(InputEvent::Click(control))
                })?;
            }
        }

        // Reveal whatever is already on screen
        self.page.borrow_mut().check_reveals();
        start_frame_loop(window, self.page.clone())?;

        info!("backdrop started");
        Ok(())
    }

    /// Current skill-group state, for debugging from the console
    pub fn visibility(&self) -> String {
        let state: VisibilityState = self.page.borrow().backdrop.visibility();
        format!("{:?}", state)
    }

    #[wasm_bindgen(js_name = "revealedCount")]
    pub fn revealed_count(&self) -> usize {
        self.page.borrow().chrome.revealed_count()
    }
}

/// Attach a listener that runs `handler` against the shared page state
fn listen<F>(
    target: &web_sys::EventTarget,
    event: &str,
    page: &Rc<RefCell<Page>>,
    mut handler: F,
) -> Result<(), JsValue>
where
    F: FnMut(&mut Page, &web_sys::Event) + 'static,
{
    let page = page.clone();
    let closure = Closure::wrap(Box::new(move |event: web_sys::Event| {
        handler(&mut page.borrow_mut(), &event);
    }) as Box<dyn FnMut(web_sys::Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    // Listeners live for the lifetime of the page
    closure.forget();
    Ok(())
}

/// Drive `Page::frame` from requestAnimationFrame until the page unloads
fn start_frame_loop(window: Window, page: Rc<RefCell<Page>>) -> Result<(), JsValue> {
    // The closure reschedules itself, so it must be reachable from inside
    let f: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
    let g = f.clone();
    let raf_window = window.clone();

    *g.borrow_mut() = Some(Closure::wrap(Box::new(move || {
        if let Err(e) = page.borrow_mut().frame() {
            log::error!("render failed, stopping animation: {:?}", e);
            return;
        }

        if let Some(callback) = f.borrow().as_ref() {
            if let Err(e) = raf_window.request_animation_frame(callback.as_ref().unchecked_ref()) {
                log::error!("requestAnimationFrame failed: {:?}", e);
            }
        }
    }) as Box<dyn FnMut()>));

    if let Some(callback) = g.borrow().as_ref() {
        window.request_animation_frame(callback.as_ref().unchecked_ref())?;
    }
    debug!("frame loop scheduled");
    Ok(())
}

#[wasm_bindgen(start)]
pub fn main() -> Result<(), JsValue> {
    // Setup panic hook for better error messages in browser console
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_is_claimed_once() {
        let started = Cell::new(false);
        assert!(claim_start(&started));
        assert!(!claim_start(&started));
        assert!(!claim_start(&started));
        assert!(started.get());
    }
}
