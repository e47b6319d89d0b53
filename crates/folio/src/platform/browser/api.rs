//! Functions exported to page scripts (`folioReloadContent()`, ...).
//!
//! They act on the instances in the [`registry`](super::registry) and do nothing
//! but warn when nothing is installed yet.

use wasm_bindgen::JsValue;
use wasm_bindgen::prelude::wasm_bindgen;
use zoon::{Task, println};

use super::{BrowserEnvironment, registry};
use crate::navigation::{NavigationManager, NavigationOptions};

fn warn_missing(what: &str) {
    web_sys::console::warn_1(&JsValue::from_str(&format!("{what} is not installed")));
}

fn with_navigation(f: impl FnOnce(&NavigationManager<BrowserEnvironment>)) {
    match registry::navigation() {
        Some(navigation) => f(&navigation),
        None => warn_missing("NavigationManager"),
    }
}

/// Fetches and renders both documents again.
#[wasm_bindgen(js_name = folioReloadContent)]
pub fn reload_content() {
    match registry::content_loader() {
        Some(loader) => Task::start(async move { loader.load().await }),
        None => warn_missing("ContentLoader"),
    }
}

/// Returns whether the manager is initialized afterwards.
#[wasm_bindgen(js_name = folioNavigationInit)]
pub fn navigation_init() -> bool {
    let mut initialized = false;
    with_navigation(|navigation| {
        let _ = navigation.init();
        initialized = navigation.is_initialized();
    });
    initialized
}

#[wasm_bindgen(js_name = folioNavigationDestroy)]
pub fn navigation_destroy() {
    with_navigation(|navigation| navigation.destroy());
}

#[wasm_bindgen(js_name = folioNavigationUpdate)]
pub fn navigation_update() {
    with_navigation(|navigation| navigation.update_active_link());
}

/// Accepts a plain object such as `{ scrollOffset: 80, activeClass: "current" }`.
#[wasm_bindgen(js_name = folioNavigationUpdateConfig)]
pub fn navigation_update_config(options: JsValue) -> Result<(), JsValue> {
    let options: NavigationOptions = serde_wasm_bindgen::from_value(options)?;
    with_navigation(|navigation| {
        navigation.update_config(options);
        println!("Navigation config updated: {:?}", navigation.config());
    });
    Ok(())
}
