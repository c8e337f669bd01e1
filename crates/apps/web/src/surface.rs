//! [`Surface`] over the live DOM.
//!
//! Missing elements are skipped with a debug log; the page markup decides
//! which panels exist.

use layers::Mode;
use panels::GaugeReading;
use tracing::debug;
use view::{Legend, Section, Surface, dom};
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement, HtmlTextAreaElement};

pub struct DomSurface {
    document: Document,
}

impl DomSurface {
    pub fn new(document: Document) -> Self {
        Self { document }
    }

    fn element(&self, id: &str) -> Option<Element> {
        let el = self.document.get_element_by_id(id);
        if el.is_none() {
            debug!(id, "element not found");
        }
        el
    }

    fn query(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn set_class(el: &Element, class: &str, on: bool) {
        let list = el.class_list();
        let _ = if on { list.add_1(class) } else { list.remove_1(class) };
    }

    fn set_style_display(&self, id: &str, display: &str) {
        if let Some(el) = self.element(id).and_then(|e| e.dyn_into::<HtmlElement>().ok()) {
            let _ = el.style().set_property("display", display);
        }
    }
}

impl Surface for DomSurface {
    fn has_section(&self, section: Section) -> bool {
        self.document
            .get_element_by_id(section.container_id())
            .is_some()
    }

    fn set_section_active(&mut self, section: Section, active: bool) {
        if let Some(el) = self.element(section.container_id()) {
            Self::set_class(&el, "active", active);
        }
    }

    fn set_nav_active(&mut self, section: Section, active: bool) {
        let selector = format!(".nav-btn[data-section=\"{}\"]", section.as_str());
        if let Some(el) = self.query(&selector) {
            Self::set_class(&el, "active", active);
        }
    }

    fn set_legend_visible(&mut self, legend: Legend, visible: bool) {
        self.set_style_display(legend.element_id(), if visible { "block" } else { "none" });
    }

    fn set_mode_button_active(&mut self, mode: Mode, active: bool) {
        let selector = format!(".mode-btn[data-mode=\"{}\"]", mode.as_str());
        if let Some(el) = self.query(&selector) {
            Self::set_class(&el, "active", active);
        }
    }

    fn set_html(&mut self, id: &str, html: &str) {
        if let Some(el) = self.element(id) {
            el.set_inner_html(html);
        }
    }

    fn append_html(&mut self, id: &str, html: &str) {
        if let Some(el) = self.element(id) {
            let _ = el.insert_adjacent_html("beforeend", html);
            if id == dom::CHATBOT_MESSAGES {
                el.set_scroll_top(el.scroll_height());
            }
        }
    }

    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(el) = self.element(id) {
            el.set_text_content(Some(text));
        }
    }

    fn set_value(&mut self, id: &str, value: &str) {
        let Some(el) = self.element(id) else {
            return;
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        }
    }

    fn value(&self, id: &str) -> String {
        let Some(el) = self.element(id) else {
            return String::new();
        };
        if let Some(input) = el.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = el.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = el.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn selected(&self, name: &str) -> Option<String> {
        let selector = format!("input[name=\"{name}\"]:checked");
        self.query(&selector)
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
            .map(|input| input.value())
    }

    fn set_display(&mut self, id: &str, display: &str) {
        self.set_style_display(id, display);
    }

    fn alert(&mut self, message: &str) {
        if let Some(window) = web_sys::window() {
            let _ = window.alert_with_message(message);
        }
    }

    fn set_gauge(&mut self, reading: &GaugeReading) {
        let g = reading.geometry;
        if let Some(el) = self.element(&reading.gauge_element()) {
            let style = format!(
                "stroke-dasharray: {}; stroke-dashoffset: {}",
                g.circumference, g.dash_offset
            );
            let _ = el.set_attribute("style", &style);
        }
        if let Some(el) = self.element(&reading.text_element()) {
            el.set_text_content(Some(&g.text.to_string()));
        }
    }
}
