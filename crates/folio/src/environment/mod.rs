//! The DOM capabilities the page components need, behind one trait.
//!
//! `platform::browser::BrowserEnvironment` is the real implementation.
//! Unit tests use the in-memory `fake::FakeEnvironment`.

#[cfg(test)]
pub(crate) mod fake;

use futures::future::LocalBoxFuture;

/// Diagnostic severity for [`Environment::log`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
}

/// Layout box of an element in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    /// Distance from the top of the document.
    pub top: f64,
    pub height: f64,
}

impl Bounds {
    pub fn contains(&self, position: f64) -> bool {
        position >= self.top && position < self.top + self.height
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_y: f64,
    pub inner_height: f64,
    pub document_height: f64,
}

/// What a click listener wants done with the browser's default action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickAction {
    FollowDefault,
    Suppress,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub body: String,
}

impl FetchResponse {
    /// Same rule as `Response.ok`.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Everything the loader and the navigation manager may do to a page.
///
/// Listener registrations return a `Listener` handle; dropping it detaches the
/// listener.
pub trait Environment: 'static {
    type Element: Clone + 'static;
    type Listener: 'static;

    fn element_by_id(&self, id: &str) -> Option<Self::Element>;

    /// First match; an invalid selector matches nothing.
    fn query_selector(&self, selector: &str) -> Option<Self::Element>;

    /// All matches in document order; an invalid selector matches nothing.
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Element>;

    fn attribute(&self, element: &Self::Element, name: &str) -> Option<String>;

    fn set_inner_html(&self, element: &Self::Element, html: &str);

    fn remove_element(&self, element: &Self::Element);

    fn set_class(&self, element: &Self::Element, class: &str, enabled: bool);

    fn bounds(&self, element: &Self::Element) -> Bounds;

    fn viewport(&self) -> Viewport;

    /// Smooth-scrolls the viewport to a document offset.
    fn scroll_to(&self, top: f64);

    /// `Err` carries the network failure message; HTTP error statuses are `Ok`.
    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<FetchResponse, String>>;

    fn on_scroll(&self, handler: Box<dyn FnMut()>) -> Self::Listener;

    fn on_click(
        &self,
        element: &Self::Element,
        handler: Box<dyn FnMut() -> ClickAction>,
    ) -> Self::Listener;

    fn request_animation_frame(&self, callback: Box<dyn FnOnce()>);

    fn log(&self, level: Level, message: &str);
}
