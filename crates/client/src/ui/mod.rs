// DOM overlays: connection error banner and worm counter
use wasm_bindgen::JsValue;
use web_sys::{Document, Element};

pub struct UI {
    document: Document,
}

impl UI {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn get_el(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    /// Show the error banner with `message`.
    pub fn show_error(&self, message: &str) {
        if let Some(el) = self.get_el("error") {
            el.set_text_content(Some(message));
            el.class_list()
                .remove(&js_sys::Array::of1(&JsValue::from("hidden")))
                .ok();
        }
    }

    pub fn hide_error(&self) {
        if let Some(el) = self.get_el("error") {
            el.class_list()
                .add(&js_sys::Array::of1(&JsValue::from("hidden")))
                .ok();
        }
    }

    pub fn update_worm_count(&self, worms: usize) {
        if let Some(el) = self.get_el("wormCount") {
            el.set_inner_html(&worms.to_string());
        }
    }
}
