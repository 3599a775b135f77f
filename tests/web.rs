#![cfg(target_arch = "wasm32")]

use neuroscope::page::{Display, Page};
use neuroscope::wasm::{launch, DomPage};
use neuroscope::{VizConfig, VizError};
use wasm_bindgen::JsCast;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn document() -> web_sys::Document {
    web_sys::window().unwrap().document().unwrap()
}

fn add_element(tag: &str, id: &str) -> web_sys::HtmlElement {
    let document = document();
    let el = document.create_element(tag).unwrap();
    el.set_id(id);
    document.body().unwrap().append_child(&el).unwrap();
    el.dyn_into().unwrap()
}

#[wasm_bindgen_test]
fn missing_mount_is_reported() {
    let config = VizConfig {
        mount_id: "no-such-mount".into(),
        ..VizConfig::default()
    };
    let err = launch(&config).unwrap_err();
    assert!(matches!(err, VizError::MountNotFound(id) if id == "no-such-mount"));
}

#[wasm_bindgen_test]
fn dom_page_drives_overlay_and_button() {
    let config = VizConfig {
        overlay_id: "test-overlay".into(),
        surgical_toggle_id: "test-surgical".into(),
        ..VizConfig::default()
    };
    let overlay = add_element("div", "test-overlay");
    let button = add_element("button", "test-surgical");
    button.set_class_name("btn btn-primary");

    let mut page = DomPage::new(&document(), &config);
    assert_eq!(page.overlay_display(), Some(Display::Hidden));

    page.set_overlay_display(Display::Shown);
    page.set_overlay_offset(50.0);
    assert_eq!(page.overlay_display(), Some(Display::Shown));
    assert_eq!(overlay.style().get_property_value("transform").unwrap(), "translateX(50px)");

    page.set_surgical_button("STOP SURGICAL AR", "btn-primary", "btn-danger");
    assert_eq!(button.text_content().as_deref(), Some("STOP SURGICAL AR"));
    assert!(button.class_list().contains("btn-danger"));
    assert!(!button.class_list().contains("btn-primary"));

    page.set_body_class("surgical-mode", true);
    assert!(document().body().unwrap().class_list().contains("surgical-mode"));
    page.set_body_class("surgical-mode", false);
    assert!(!document().body().unwrap().class_list().contains("surgical-mode"));
}

#[wasm_bindgen_test]
fn dom_page_without_overlay() {
    let config = VizConfig {
        overlay_id: "absent-overlay".into(),
        ..VizConfig::default()
    };
    let page = DomPage::new(&document(), &config);
    assert_eq!(page.overlay_display(), None);
}

#[wasm_bindgen_test]
fn launch_tolerates_missing_toggles() {
    let mount = add_element("div", "test-mount");
    let config = VizConfig {
        mount_id: "test-mount".into(),
        fiber_toggle_id: "absent-tracts".into(),
        overlay_toggle_id: "absent-mri".into(),
        overlay_id: "absent-container".into(),
        surgical_toggle_id: "absent-surgical".into(),
        seed: Some(1),
        ..VizConfig::default()
    };

    let launched = launch(&config);
    assert!(launched.is_ok(), "{:?}", launched.as_ref().err());
    assert!(mount.query_selector("canvas").unwrap().is_some());
    launched.unwrap().cancel();
}
