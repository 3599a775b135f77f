//! NeuroScope 3D: a decorative rotating "brain" of curved fibers around a
//! wireframe core, rendered with WebGL2 from wasm.
//!
//! Everything outside [`wasm`] is plain Rust and builds on the host, which is
//! where the tests run.

pub mod app;
pub mod config;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod icosphere;
pub mod interaction;
pub mod page;
pub mod render;
pub mod scene;
pub mod tween;

pub use app::{App, AppState, FrameOutcome};
pub use config::VizConfig;
pub use error::VizError;
pub use frame::CancelToken;

// Only compile browser-specific code when targeting wasm32.
#[cfg(target_arch = "wasm32")]
pub mod wasm {
    use std::cell::RefCell;

    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;

    use crate::config::VizConfig;
    use crate::error::VizError;
    use crate::frame::CancelToken;

    mod console;
    mod dom;
    mod render;
    mod shell;

    pub use dom::DomPage;
    pub use render::WebGlRenderer;
    pub use shell::launch;

    /// Attribute on `<html>` holding optional JSON for [`VizConfig`].
    pub const CONFIG_ATTRIBUTE: &str = "data-neuroscope";

    thread_local! {
        static RUNNING: RefCell<Option<CancelToken>> = const { RefCell::new(None) };
    }

    #[wasm_bindgen(start)]
    pub fn main() -> Result<(), JsValue> {
        console_error_panic_hook::set_once();

        let window = web_sys::window().ok_or(VizError::NoWindow)?;
        let document = window.document().ok_or(VizError::NoDocument)?;

        if document.ready_state() == "loading" {
            let ready = Closure::once(move || {
                if let Err(err) = boot() {
                    tracing::error!(%err, "startup failed");
                    wasm_bindgen::throw_str(&err.to_string());
                }
            });
            document.add_event_listener_with_callback("DOMContentLoaded", ready.as_ref().unchecked_ref())?;
            ready.forget();
        } else {
            boot()?;
        }
        Ok(())
    }

    /// Stops the frame loop; the last drawn frame stays on screen.
    #[wasm_bindgen]
    pub fn stop() {
        RUNNING.with(|running| {
            if let Some(token) = running.borrow_mut().take() {
                token.cancel();
            }
        });
    }

    fn boot() -> Result<(), VizError> {
        let config = read_config()?;
        console::init(config.level_filter());
        let token = launch(&config)?;
        RUNNING.with(|running| *running.borrow_mut() = Some(token));
        Ok(())
    }

    fn read_config() -> Result<VizConfig, VizError> {
        let document = web_sys::window()
            .ok_or(VizError::NoWindow)?
            .document()
            .ok_or(VizError::NoDocument)?;
        match document
            .document_element()
            .and_then(|root| root.get_attribute(CONFIG_ATTRIBUTE))
        {
            Some(json) => VizConfig::from_json(&json),
            None => Ok(VizConfig::default()),
        }
    }
}
