/// DOM lookups and conversions shared by the event wiring
use backdrop_core::{Rect, Viewport};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, Window};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("no window"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("no document"))
}

pub fn viewport(window: &Window) -> Viewport {
    let extent = |value: Result<JsValue, JsValue>| {
        value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as f32
    };
    Viewport::new(extent(window.inner_width()), extent(window.inner_height()))
}

pub fn bounding_rect(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect::new(
        rect.top() as f32,
        rect.bottom() as f32,
        rect.left() as f32,
        rect.right() as f32,
    )
}

/// First element matching `selector`, or `None` when absent or invalid
pub fn query(document: &Document, selector: &str) -> Option<Element> {
    document.query_selector(selector).ok().flatten()
}

/// Every element matching `selector`; an invalid selector yields none
pub fn query_all(document: &Document, selector: &str) -> Vec<Element> {
    let Ok(nodes) = document.query_selector_all(selector) else {
        return Vec::new();
    };
    (0..nodes.length())
        .filter_map(|i| nodes.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub fn set_class(element: &Element, class: &str, on: bool) {
    let classes = element.class_list();
    let result = if on {
        classes.add_1(class)
    } else {
        classes.remove_1(class)
    };
    if let Err(e) = result {
        log::warn!("could not update class `{}`: {:?}", class, e);
    }
}
