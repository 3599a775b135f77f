use tracing::warn;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement};

use crate::config::VizConfig;
use crate::page::{Display, Page};

/// [`Page`] backed by the live document.
///
/// Opacity and offset are remembered on the Rust side so tweens never have
/// to parse CSS back out of the element.
pub struct DomPage {
    body: Option<HtmlElement>,
    overlay: Option<HtmlElement>,
    surgical_button: Option<Element>,
    opacity: f32,
    offset: f32,
}

impl DomPage {
    pub fn new(document: &Document, config: &VizConfig) -> Self {
        Self {
            body: document.body(),
            overlay: document
                .get_element_by_id(&config.overlay_id)
                .and_then(|el| el.dyn_into::<HtmlElement>().ok()),
            surgical_button: document.get_element_by_id(&config.surgical_toggle_id),
            opacity: 1.0,
            offset: 0.0,
        }
    }

    fn set_overlay_style(&self, name: &str, value: &str) {
        if let Some(overlay) = &self.overlay {
            log_failure(overlay.style().set_property(name, value), name);
        }
    }
}

fn log_failure(result: Result<(), JsValue>, what: &str) {
    if let Err(err) = result {
        warn!(what, ?err, "DOM update failed");
    }
}

impl Page for DomPage {
    fn overlay_display(&self) -> Option<Display> {
        let overlay = self.overlay.as_ref()?;
        let display = overlay.style().get_property_value("display").unwrap_or_default();
        Some(if display == "block" {
            Display::Shown
        } else {
            Display::Hidden
        })
    }

    fn set_overlay_display(&mut self, display: Display) {
        let value = match display {
            Display::Shown => "block",
            Display::Hidden => "none",
        };
        self.set_overlay_style("display", value);
    }

    fn overlay_opacity(&self) -> f32 {
        self.opacity
    }

    fn set_overlay_opacity(&mut self, opacity: f32) {
        self.opacity = opacity;
        self.set_overlay_style("opacity", &opacity.to_string());
    }

    fn overlay_offset(&self) -> f32 {
        self.offset
    }

    fn set_overlay_offset(&mut self, offset: f32) {
        self.offset = offset;
        self.set_overlay_style("transform", &format!("translateX({offset}px)"));
    }

    fn set_body_class(&mut self, class: &str, on: bool) {
        if let Some(body) = &self.body {
            log_failure(body.class_list().toggle_with_force(class, on).map(|_| ()), "body class");
        }
    }

    fn set_surgical_button(&mut self, label: &str, from_class: &str, to_class: &str) {
        if let Some(button) = &self.surgical_button {
            button.set_text_content(Some(label));
            log_failure(button.class_list().replace(from_class, to_class).map(|_| ()), "button class");
        }
    }
}
