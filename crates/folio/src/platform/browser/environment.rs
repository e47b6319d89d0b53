//! [`Environment`] backed by the real page.

use futures::FutureExt;
use futures::future::LocalBoxFuture;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{
    Document, Element, Event, EventTarget, HtmlElement, Response, ScrollBehavior, ScrollToOptions,
    Window,
};
use zoon::{eprintln, println};

use crate::environment::{Bounds, ClickAction, Environment, FetchResponse, Level, Viewport};

pub struct BrowserEnvironment {
    window: Window,
    document: Document,
}

impl BrowserEnvironment {
    /// `None` outside a browsing context (workers, native builds).
    pub fn new() -> Option<Self> {
        let window = web_sys::window()?;
        let document = window.document()?;
        Some(Self { window, document })
    }

    fn add_listener(
        &self,
        target: EventTarget,
        event_type: &'static str,
        closure: Closure<dyn FnMut(Event)>,
    ) -> EventListenerHandle {
        if let Err(error) =
            target.add_event_listener_with_callback(event_type, closure.as_ref().unchecked_ref())
        {
            eprintln!("Failed to add '{event_type}' listener: {}", js_error(error));
        }
        EventListenerHandle {
            target,
            event_type,
            closure,
        }
    }
}

/// Keeps the listener closure alive; dropping it removes the listener.
pub struct EventListenerHandle {
    target: EventTarget,
    event_type: &'static str,
    closure: Closure<dyn FnMut(Event)>,
}

impl Drop for EventListenerHandle {
    fn drop(&mut self) {
        let _ = self.target.remove_event_listener_with_callback(
            self.event_type,
            self.closure.as_ref().unchecked_ref(),
        );
    }
}

fn js_error(value: JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|error| String::from(error.message()))
        })
        .unwrap_or_else(|| format!("{value:?}"))
}

impl Environment for BrowserEnvironment {
    type Element = Element;
    type Listener = EventListenerHandle;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_selector(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        let Ok(nodes) = self.document.query_selector_all(selector) else {
            return Vec::new();
        };
        (0..nodes.length())
            .filter_map(|index| nodes.get(index))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect()
    }

    fn attribute(&self, element: &Element, name: &str) -> Option<String> {
        element.get_attribute(name)
    }

    fn set_inner_html(&self, element: &Element, html: &str) {
        element.set_inner_html(html);
    }

    fn remove_element(&self, element: &Element) {
        element.remove();
    }

    fn set_class(&self, element: &Element, class: &str, enabled: bool) {
        let class_list = element.class_list();
        let result = if enabled {
            class_list.add_1(class)
        } else {
            class_list.remove_1(class)
        };
        if let Err(error) = result {
            eprintln!("Failed to toggle class '{class}': {}", js_error(error));
        }
    }

    fn bounds(&self, element: &Element) -> Bounds {
        let rect = element.get_bounding_client_rect();
        let scroll_y = self.window.scroll_y().unwrap_or(0.0);
        let height = element
            .dyn_ref::<HtmlElement>()
            .map(|element| f64::from(element.offset_height()))
            .unwrap_or_else(|| rect.height());
        Bounds {
            top: rect.top() + scroll_y,
            height,
        }
    }

    fn viewport(&self) -> Viewport {
        Viewport {
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
            inner_height: self
                .window
                .inner_height()
                .ok()
                .and_then(|height| height.as_f64())
                .unwrap_or(0.0),
            document_height: self
                .document
                .body()
                .map(|body| f64::from(body.offset_height()))
                .unwrap_or(0.0),
        }
    }

    fn scroll_to(&self, top: f64) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<FetchResponse, String>> {
        let request = self.window.fetch_with_str(url);
        async move {
            let response: Response = JsFuture::from(request)
                .await
                .map_err(js_error)?
                .dyn_into()
                .map_err(js_error)?;
            let status = response.status();
            let body = JsFuture::from(response.text().map_err(js_error)?)
                .await
                .map_err(js_error)?
                .as_string()
                .unwrap_or_default();
            Ok(FetchResponse { status, body })
        }
        .boxed_local()
    }

    fn on_scroll(&self, mut handler: Box<dyn FnMut()>) -> EventListenerHandle {
        let closure = Closure::<dyn FnMut(Event)>::new(move |_event: Event| handler());
        self.add_listener(self.window.clone().into(), "scroll", closure)
    }

    fn on_click(
        &self,
        element: &Element,
        mut handler: Box<dyn FnMut() -> ClickAction>,
    ) -> EventListenerHandle {
        let closure = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            if handler() == ClickAction::Suppress {
                event.prevent_default();
            }
        });
        self.add_listener(element.clone().into(), "click", closure)
    }

    fn request_animation_frame(&self, callback: Box<dyn FnOnce()>) {
        let callback = Closure::once_into_js(move || callback());
        if let Err(error) = self.window.request_animation_frame(callback.unchecked_ref()) {
            eprintln!("Failed to request animation frame: {}", js_error(error));
        }
    }

    fn log(&self, level: Level, message: &str) {
        match level {
            Level::Info => println!("{message}"),
            Level::Warn => web_sys::console::warn_1(&JsValue::from_str(message)),
            Level::Error => eprintln!("{message}"),
        }
    }
}
