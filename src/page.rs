//! The slice of the host page the interaction handlers touch.

use std::collections::BTreeSet;

pub const SURGICAL_BODY_CLASS: &str = "surgical-mode";
pub const SURGICAL_START_LABEL: &str = "START SURGICAL AR";
pub const SURGICAL_STOP_LABEL: &str = "STOP SURGICAL AR";
pub const BUTTON_IDLE_CLASS: &str = "btn-primary";
pub const BUTTON_ACTIVE_CLASS: &str = "btn-danger";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Shown,
    Hidden,
}

pub trait Page {
    /// `None` when the page has no overlay panel.
    fn overlay_display(&self) -> Option<Display>;
    fn set_overlay_display(&mut self, display: Display);
    fn overlay_opacity(&self) -> f32;
    fn set_overlay_opacity(&mut self, opacity: f32);
    fn overlay_offset(&self) -> f32;
    fn set_overlay_offset(&mut self, offset: f32);
    fn set_body_class(&mut self, class: &str, on: bool);
    /// Relabels the surgical button and swaps `from_class` for `to_class`.
    fn set_surgical_button(&mut self, label: &str, from_class: &str, to_class: &str);
}

#[derive(Debug, Clone, PartialEq)]
pub struct OverlayStyle {
    pub display: Display,
    pub opacity: f32,
    pub offset: f32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonState {
    pub label: String,
    pub classes: BTreeSet<String>,
}

/// Page model kept entirely in memory, for headless runs.
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryPage {
    pub overlay: Option<OverlayStyle>,
    pub body_classes: BTreeSet<String>,
    pub surgical_button: Option<ButtonState>,
}

impl Default for MemoryPage {
    /// Hidden overlay and an idle surgical button, like a freshly loaded page.
    fn default() -> Self {
        Self {
            overlay: Some(OverlayStyle {
                display: Display::Hidden,
                opacity: 1.0,
                offset: 0.0,
            }),
            body_classes: BTreeSet::new(),
            surgical_button: Some(ButtonState {
                label: SURGICAL_START_LABEL.to_string(),
                classes: BTreeSet::from([BUTTON_IDLE_CLASS.to_string()]),
            }),
        }
    }
}

impl Page for MemoryPage {
    fn overlay_display(&self) -> Option<Display> {
        self.overlay.as_ref().map(|o| o.display)
    }

    fn set_overlay_display(&mut self, display: Display) {
        if let Some(overlay) = &mut self.overlay {
            overlay.display = display;
        }
    }

    fn overlay_opacity(&self) -> f32 {
        self.overlay.as_ref().map_or(1.0, |o| o.opacity)
    }

    fn set_overlay_opacity(&mut self, opacity: f32) {
        if let Some(overlay) = &mut self.overlay {
            overlay.opacity = opacity;
        }
    }

    fn overlay_offset(&self) -> f32 {
        self.overlay.as_ref().map_or(0.0, |o| o.offset)
    }

    fn set_overlay_offset(&mut self, offset: f32) {
        if let Some(overlay) = &mut self.overlay {
            overlay.offset = offset;
        }
    }

    fn set_body_class(&mut self, class: &str, on: bool) {
        if on {
            self.body_classes.insert(class.to_string());
        } else {
            self.body_classes.remove(class);
        }
    }

    fn set_surgical_button(&mut self, label: &str, from_class: &str, to_class: &str) {
        if let Some(button) = &mut self.surgical_button {
            button.label = label.to_string();
            // Same as DOMTokenList.replace: no-op when `from_class` is absent.
            if button.classes.remove(from_class) {
                button.classes.insert(to_class.to_string());
            }
        }
    }
}
