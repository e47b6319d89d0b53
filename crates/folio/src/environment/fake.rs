//! In-memory page used by the unit tests.
//!
//! Elements are indices into a node table. Selector matching is literal: an element
//! matches the selectors it was tagged with, plus `#<id>`.

use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::rc::{Rc, Weak};

use futures::FutureExt;
use futures::channel::oneshot;
use futures::future::{self, LocalBoxFuture};

use super::{Bounds, ClickAction, Environment, FetchResponse, Level, Viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FakeElement(usize);

#[derive(Default)]
struct Node {
    id: Option<String>,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    inner_html: String,
    bounds: Bounds,
    selectors: Vec<String>,
    removed: bool,
}

type ScrollHandler = Rc<RefCell<Box<dyn FnMut()>>>;
type ClickHandler = Rc<RefCell<Box<dyn FnMut() -> ClickAction>>>;

#[derive(Default)]
struct State {
    nodes: Vec<Node>,
    viewport: Viewport,
    responses: HashMap<String, Result<FetchResponse, String>>,
    fetched: Vec<String>,
    hold_fetches: bool,
    held_fetches: Vec<(String, oneshot::Sender<Result<FetchResponse, String>>)>,
    next_listener_id: u64,
    scroll_handlers: Vec<(u64, ScrollHandler)>,
    click_handlers: Vec<(u64, FakeElement, ClickHandler)>,
    frames: Vec<Box<dyn FnOnce()>>,
    scroll_requests: Vec<f64>,
    logs: Vec<(Level, String)>,
}

impl State {
    fn route(&self, url: &str) -> Result<FetchResponse, String> {
        self.responses
            .get(url)
            .cloned()
            .unwrap_or_else(|| Err(format!("no route for {url}")))
    }
}

#[derive(Clone, Default)]
pub struct FakeEnvironment {
    state: Rc<RefCell<State>>,
}

pub struct FakeListener {
    id: u64,
    state: Weak<RefCell<State>>,
}

impl Drop for FakeListener {
    fn drop(&mut self) {
        if let Some(state) = self.state.upgrade() {
            let mut state = state.borrow_mut();
            state.scroll_handlers.retain(|(id, _)| *id != self.id);
            state.click_handlers.retain(|(id, _, _)| *id != self.id);
        }
    }
}

impl FakeEnvironment {
    pub fn new() -> Self {
        Self::default()
    }

    // --- page setup ---

    pub fn add_element(&self, id: Option<&str>) -> FakeElement {
        let mut state = self.state.borrow_mut();
        state.nodes.push(Node {
            id: id.map(str::to_string),
            ..Node::default()
        });
        FakeElement(state.nodes.len() - 1)
    }

    /// Element matching `selector`, with an optional id and layout box.
    pub fn add_matching(&self, selector: &str, id: Option<&str>, top: f64, height: f64) -> FakeElement {
        let element = self.add_element(id);
        self.tag(element, selector);
        self.set_bounds(element, top, height);
        element
    }

    /// Navigation link with an `href`.
    pub fn add_link(&self, selector: &str, href: &str) -> FakeElement {
        let element = self.add_element(None);
        self.tag(element, selector);
        self.set_attribute(element, "href", href);
        element
    }

    pub fn tag(&self, element: FakeElement, selector: &str) {
        self.state.borrow_mut().nodes[element.0]
            .selectors
            .push(selector.to_string());
    }

    pub fn set_attribute(&self, element: FakeElement, name: &str, value: &str) {
        self.state.borrow_mut().nodes[element.0]
            .attributes
            .insert(name.to_string(), value.to_string());
    }

    pub fn set_bounds(&self, element: FakeElement, top: f64, height: f64) {
        self.state.borrow_mut().nodes[element.0].bounds = Bounds { top, height };
    }

    pub fn set_viewport(&self, scroll_y: f64, inner_height: f64, document_height: f64) {
        self.state.borrow_mut().viewport = Viewport {
            scroll_y,
            inner_height,
            document_height,
        };
    }

    pub fn respond(&self, url: &str, status: u16, body: &str) {
        self.state.borrow_mut().responses.insert(
            url.to_string(),
            Ok(FetchResponse {
                status,
                body: body.to_string(),
            }),
        );
    }

    pub fn fail(&self, url: &str, message: &str) {
        self.state
            .borrow_mut()
            .responses
            .insert(url.to_string(), Err(message.to_string()));
    }

    /// Later fetches stay pending until [`release_fetch`](Self::release_fetch).
    pub fn hold_fetches(&self) {
        self.state.borrow_mut().hold_fetches = true;
    }

    /// Settles the oldest held fetch of `url` with its route. Returns `false`
    /// when nothing was waiting on that URL.
    pub fn release_fetch(&self, url: &str) -> bool {
        let (sender, response) = {
            let mut state = self.state.borrow_mut();
            let Some(index) = state.held_fetches.iter().position(|(held, _)| held == url) else {
                return false;
            };
            let (_, sender) = state.held_fetches.remove(index);
            (sender, state.route(url))
        };
        let _ = sender.send(response);
        true
    }

    pub fn held_fetch_count(&self) -> usize {
        self.state.borrow().held_fetches.len()
    }

    // --- driving events ---

    /// Moves the viewport and dispatches one scroll event.
    pub fn scroll(&self, scroll_y: f64) {
        self.state.borrow_mut().viewport.scroll_y = scroll_y;
        let handlers: Vec<ScrollHandler> = self
            .state
            .borrow()
            .scroll_handlers
            .iter()
            .map(|(_, handler)| handler.clone())
            .collect();
        for handler in handlers {
            (handler.borrow_mut())();
        }
    }

    /// Runs the queued animation frames, returns how many ran.
    pub fn run_frames(&self) -> usize {
        let frames = std::mem::take(&mut self.state.borrow_mut().frames);
        let count = frames.len();
        for frame in frames {
            frame();
        }
        count
    }

    /// `None` when no listener is attached to the element.
    pub fn click(&self, element: FakeElement) -> Option<ClickAction> {
        let handlers: Vec<ClickHandler> = self
            .state
            .borrow()
            .click_handlers
            .iter()
            .filter(|(_, target, _)| *target == element)
            .map(|(_, _, handler)| handler.clone())
            .collect();
        let mut outcome = None;
        for handler in handlers {
            let action = (handler.borrow_mut())();
            if action == ClickAction::Suppress || outcome.is_none() {
                outcome = Some(action);
            }
        }
        outcome
    }

    // --- inspection ---

    pub fn inner_html(&self, element: FakeElement) -> String {
        self.state.borrow().nodes[element.0].inner_html.clone()
    }

    pub fn has_class(&self, element: FakeElement, class: &str) -> bool {
        self.state.borrow().nodes[element.0].classes.contains(class)
    }

    pub fn is_removed(&self, element: FakeElement) -> bool {
        self.state.borrow().nodes[element.0].removed
    }

    pub fn pending_frames(&self) -> usize {
        self.state.borrow().frames.len()
    }

    pub fn scroll_listener_count(&self) -> usize {
        self.state.borrow().scroll_handlers.len()
    }

    pub fn click_listener_count(&self) -> usize {
        self.state.borrow().click_handlers.len()
    }

    pub fn scroll_requests(&self) -> Vec<f64> {
        self.state.borrow().scroll_requests.clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.state.borrow().fetched.clone()
    }

    pub fn logs(&self, level: Level) -> Vec<String> {
        self.state
            .borrow()
            .logs
            .iter()
            .filter(|(logged, _)| *logged == level)
            .map(|(_, message)| message.clone())
            .collect()
    }

    fn matches(node: &Node, selector: &str) -> bool {
        if node.removed {
            return false;
        }
        if node.selectors.iter().any(|tagged| tagged == selector) {
            return true;
        }
        match (selector.strip_prefix('#'), &node.id) {
            (Some(id), Some(node_id)) => !id.is_empty() && id == node_id,
            _ => false,
        }
    }
}

impl Environment for FakeEnvironment {
    type Element = FakeElement;
    type Listener = FakeListener;

    fn element_by_id(&self, id: &str) -> Option<FakeElement> {
        self.state
            .borrow()
            .nodes
            .iter()
            .position(|node| !node.removed && node.id.as_deref() == Some(id))
            .map(FakeElement)
    }

    fn query_selector(&self, selector: &str) -> Option<FakeElement> {
        self.query_selector_all(selector).into_iter().next()
    }

    fn query_selector_all(&self, selector: &str) -> Vec<FakeElement> {
        self.state
            .borrow()
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| Self::matches(node, selector))
            .map(|(index, _)| FakeElement(index))
            .collect()
    }

    fn attribute(&self, element: &FakeElement, name: &str) -> Option<String> {
        let state = self.state.borrow();
        let node = &state.nodes[element.0];
        if name == "id" {
            return node.id.clone();
        }
        node.attributes.get(name).cloned()
    }

    fn set_inner_html(&self, element: &FakeElement, html: &str) {
        self.state.borrow_mut().nodes[element.0].inner_html = html.to_string();
    }

    fn remove_element(&self, element: &FakeElement) {
        self.state.borrow_mut().nodes[element.0].removed = true;
    }

    fn set_class(&self, element: &FakeElement, class: &str, enabled: bool) {
        let mut state = self.state.borrow_mut();
        let classes = &mut state.nodes[element.0].classes;
        if enabled {
            classes.insert(class.to_string());
        } else {
            classes.remove(class);
        }
    }

    fn bounds(&self, element: &FakeElement) -> Bounds {
        self.state.borrow().nodes[element.0].bounds
    }

    fn viewport(&self) -> Viewport {
        self.state.borrow().viewport
    }

    fn scroll_to(&self, top: f64) {
        self.state.borrow_mut().scroll_requests.push(top);
    }

    fn fetch(&self, url: &str) -> LocalBoxFuture<'static, Result<FetchResponse, String>> {
        let mut state = self.state.borrow_mut();
        state.fetched.push(url.to_string());
        if state.hold_fetches {
            let (sender, receiver) = oneshot::channel();
            state.held_fetches.push((url.to_string(), sender));
            return receiver
                .map(|response| response.unwrap_or_else(|_| Err("fetch abandoned".to_string())))
                .boxed_local();
        }
        future::ready(state.route(url)).boxed_local()
    }

    fn on_scroll(&self, handler: Box<dyn FnMut()>) -> FakeListener {
        let mut state = self.state.borrow_mut();
        state.next_listener_id += 1;
        let id = state.next_listener_id;
        state.scroll_handlers.push((id, Rc::new(RefCell::new(handler))));
        FakeListener {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    fn on_click(
        &self,
        element: &FakeElement,
        handler: Box<dyn FnMut() -> ClickAction>,
    ) -> FakeListener {
        let mut state = self.state.borrow_mut();
        state.next_listener_id += 1;
        let id = state.next_listener_id;
        state
            .click_handlers
            .push((id, *element, Rc::new(RefCell::new(handler))));
        FakeListener {
            id,
            state: Rc::downgrade(&self.state),
        }
    }

    fn request_animation_frame(&self, callback: Box<dyn FnOnce()>) {
        self.state.borrow_mut().frames.push(callback);
    }

    fn log(&self, level: Level, message: &str) {
        self.state
            .borrow_mut()
            .logs
            .push((level, message.to_string()));
    }
}
