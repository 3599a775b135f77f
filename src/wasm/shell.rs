//! Startup and event wiring in the browser.

use std::cell::RefCell;
use std::rc::Rc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{debug, error, info};
use wasm_bindgen::{closure::Closure, JsCast};
use web_sys::{Document, HtmlCanvasElement, Window};

use super::dom::DomPage;
use super::render::WebGlRenderer;
use crate::app::{App, FrameOutcome};
use crate::config::VizConfig;
use crate::error::VizError;
use crate::frame::CancelToken;
use crate::render::SceneRenderer;

type BrowserApp = App<DomPage, WebGlRenderer>;
type SharedApp = Rc<RefCell<BrowserApp>>;

/// Mounts a canvas, composes the scene, wires the toggles and starts the
/// frame loop. The returned token stops the loop.
pub fn launch(config: &VizConfig) -> Result<CancelToken, VizError> {
    let window = web_sys::window().ok_or(VizError::NoWindow)?;
    let document = window.document().ok_or(VizError::NoDocument)?;

    let mount = document
        .get_element_by_id(&config.mount_id)
        .ok_or_else(|| VizError::MountNotFound(config.mount_id.clone()))?;
    let canvas: HtmlCanvasElement = document
        .create_element("canvas")?
        .dyn_into()
        .map_err(|_| VizError::Js("created element is not a canvas".into()))?;
    mount.append_child(&canvas)?;

    let mut renderer = WebGlRenderer::new(canvas, window.device_pixel_ratio())?;
    let (width, height) = viewport_size(&window)?;
    renderer.set_size(width, height);

    let seed = config.seed.unwrap_or_else(random_seed);
    let mut app = App::new(
        DomPage::new(&document, config),
        renderer,
        &mut StdRng::seed_from_u64(seed),
        CancelToken::new(),
    );
    let token = app.cancel_token();
    app.renderer.upload(&app.scene.group)?;
    let app = Rc::new(RefCell::new(app));

    wire_toggles(&document, config, &app)?;
    listen_resize(&window, &app)?;
    run(app)?;

    info!(seed, width, height, "visualization started");
    Ok(token)
}

fn random_seed() -> u64 {
    let word = || (js_sys::Math::random() * f64::from(u32::MAX)) as u64;
    (word() << 32) | word()
}

fn viewport_size(window: &Window) -> Result<(u32, u32), VizError> {
    let width = window.inner_width()?.as_f64().unwrap_or(0.0);
    let height = window.inner_height()?.as_f64().unwrap_or(0.0);
    Ok((width as u32, height as u32))
}

/// Attaches `handler` to clicks on `#id`. A missing element is not an error;
/// the feature just stays unwired.
fn on_click(document: &Document, id: &str, handler: impl FnMut() + 'static) -> Result<(), VizError> {
    let Some(element) = document.get_element_by_id(id) else {
        debug!(id, "toggle element missing, not wired");
        return Ok(());
    };
    let closure = Closure::<dyn FnMut()>::new(handler);
    element.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn wire_toggles(document: &Document, config: &VizConfig, app: &SharedApp) -> Result<(), VizError> {
    let fibers = app.clone();
    on_click(document, &config.fiber_toggle_id, move || fibers.borrow_mut().toggle_fibers())?;

    if document.get_element_by_id(&config.overlay_id).is_some() {
        let overlay = app.clone();
        on_click(document, &config.overlay_toggle_id, move || overlay.borrow_mut().toggle_overlay())?;
    } else {
        debug!(id = %config.overlay_id, "overlay container missing, overlay toggle not wired");
    }

    let surgical = app.clone();
    on_click(document, &config.surgical_toggle_id, move || surgical.borrow_mut().toggle_surgical())?;
    Ok(())
}

fn listen_resize(window: &Window, app: &SharedApp) -> Result<(), VizError> {
    let app = app.clone();
    let closure = Closure::<dyn FnMut()>::new(move || {
        let Some(window) = web_sys::window() else {
            return;
        };
        match viewport_size(&window) {
            Ok((width, height)) => app.borrow_mut().resize(width, height),
            Err(err) => error!(%err, "cannot read viewport size"),
        }
    });
    window.add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

fn request_frame(callback: &Closure<dyn FnMut(f64)>) -> Result<i32, VizError> {
    Ok(web_sys::window()
        .ok_or(VizError::NoWindow)?
        .request_animation_frame(callback.as_ref().unchecked_ref())?)
}

/// Frame loop on `requestAnimationFrame`. The callback holds the slot it is
/// stored in so it can reschedule itself; cancelling simply stops the
/// rescheduling.
fn run(app: SharedApp) -> Result<(), VizError> {
    let slot: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let this = slot.clone();
    *slot.borrow_mut() = Some(Closure::new(move |timestamp: f64| {
        let outcome = app.borrow_mut().frame(timestamp);
        match outcome {
            Ok(FrameOutcome::Rendered) => {
                if let Some(callback) = this.borrow().as_ref() {
                    if let Err(err) = request_frame(callback) {
                        error!(%err, "cannot schedule next frame");
                    }
                }
            }
            Ok(FrameOutcome::Stopped) => info!("frame loop stopped"),
            Err(err) => error!(%err, "render failed, frame loop stopped"),
        }
    }));

    if let Some(callback) = slot.borrow().as_ref() {
        request_frame(callback)?;
    }
    Ok(())
}
