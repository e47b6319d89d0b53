//! Browser platform: the `web-sys` environment, the instance registry and the
//! startup sequence.

pub mod api;
pub mod environment;
pub mod registry;

use std::rc::Rc;

use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use zoon::{Task, eprintln};

use crate::loader::{ContentLoader, LoaderConfig};
use crate::navigation::{NavigationManager, NavigationOptions};

pub use environment::BrowserEnvironment;

/// Runs `f` once the DOM is parsed. Runs it immediately if that already happened,
/// which is the usual case once the wasm module finishes instantiating.
pub fn on_document_ready(f: impl FnOnce() + 'static) {
    let Some(document) = web_sys::window().and_then(|window| window.document()) else {
        eprintln!("No document available, page scripts not started");
        return;
    };
    if document.ready_state() != "loading" {
        f();
        return;
    }
    let callback = Closure::once_into_js(f);
    if let Err(error) =
        document.add_event_listener_with_callback("DOMContentLoaded", callback.unchecked_ref())
    {
        eprintln!("Failed to listen for DOMContentLoaded: {error:?}");
    }
}

/// Starts both page components, each on its own document-ready hook.
pub fn start() {
    on_document_ready(start_content_loader);
    on_document_ready(start_navigation);
}

pub fn start_content_loader() {
    let Some(env) = BrowserEnvironment::new() else {
        eprintln!("Content loader not started: no window/document");
        return;
    };
    let loader = Rc::new(ContentLoader::new(Rc::new(env), LoaderConfig::default()));
    registry::install_content_loader(loader.clone());
    Task::start(async move { loader.load().await });
}

pub fn start_navigation() {
    let Some(env) = BrowserEnvironment::new() else {
        eprintln!("Navigation not started: no window/document");
        return;
    };
    let navigation = NavigationManager::new(Rc::new(env), NavigationOptions::default());
    if let Some(previous) = registry::install_navigation(navigation.clone()) {
        previous.destroy();
    }
    // Failures are already logged as warnings; the manager just stays inert.
    let _ = navigation.init();
}
