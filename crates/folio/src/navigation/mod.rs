//! Scroll-synchronized navigation bar.
//!
//! [`NavigationManager`] marks the link of the section in view as active and turns
//! clicks on in-page links into smooth, header-aware scrolls.
//!
//! Scroll events are coalesced: at most one recomputation is queued per animation
//! frame, however many scroll events arrive in between.

pub mod active;
mod config;

pub use config::{NavigationConfig, NavigationOptions};

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use crate::environment::{ClickAction, Environment, Level};
use active::SectionLayout;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitError {
    AlreadyInitialized,
    NoLinks,
    NoSections,
}

impl fmt::Display for InitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InitError::AlreadyInitialized => write!(f, "NavigationManager is already initialized"),
            InitError::NoLinks => write!(f, "No navigation links found"),
            InitError::NoSections => write!(f, "No sections found"),
        }
    }
}

impl std::error::Error for InitError {}

struct State<E: Environment> {
    config: NavigationConfig,
    links: Vec<E::Element>,
    sections: Vec<E::Element>,
    header: Option<E::Element>,
    initialized: bool,
    listeners: Vec<E::Listener>,
}

/// Cheap to clone; clones share the same state and listeners.
pub struct NavigationManager<E: Environment> {
    env: Rc<E>,
    state: Rc<RefCell<State<E>>>,
    frame_pending: Rc<Cell<bool>>,
}

impl<E: Environment> Clone for NavigationManager<E> {
    fn clone(&self) -> Self {
        Self {
            env: self.env.clone(),
            state: self.state.clone(),
            frame_pending: self.frame_pending.clone(),
        }
    }
}

impl<E: Environment> NavigationManager<E> {
    pub fn new(env: Rc<E>, options: NavigationOptions) -> Self {
        Self {
            env,
            state: Rc::new(RefCell::new(State {
                config: NavigationConfig::with_options(options),
                links: Vec::new(),
                sections: Vec::new(),
                header: None,
                initialized: false,
                listeners: Vec::new(),
            })),
            frame_pending: Rc::new(Cell::new(false)),
        }
    }

    pub fn config(&self) -> NavigationConfig {
        self.state.borrow().config.clone()
    }

    pub fn is_initialized(&self) -> bool {
        self.state.borrow().initialized
    }

    /// Resolves links, sections and header, attaches listeners and marks the
    /// initial active link. Failures are logged as warnings and leave the
    /// manager inert.
    pub fn init(&self) -> Result<(), InitError> {
        let result = self.try_init();
        if let Err(error) = result {
            self.env.log(Level::Warn, &error.to_string());
        }
        result
    }

    fn try_init(&self) -> Result<(), InitError> {
        let config = {
            let state = self.state.borrow();
            if state.initialized {
                return Err(InitError::AlreadyInitialized);
            }
            state.config.clone()
        };

        let links = self.env.query_selector_all(&config.nav_selector);
        let sections = self.env.query_selector_all(&config.section_selector);
        let header = self.env.query_selector(&config.header_selector);

        if links.is_empty() {
            return Err(InitError::NoLinks);
        }
        if sections.is_empty() {
            return Err(InitError::NoSections);
        }

        let listeners = self.attach_listeners(&links);
        {
            let mut state = self.state.borrow_mut();
            state.links = links;
            state.sections = sections;
            state.header = header;
            state.listeners = listeners;
            state.initialized = true;
        }
        self.update_active_link();
        Ok(())
    }

    fn attach_listeners(&self, links: &[E::Element]) -> Vec<E::Listener> {
        let mut listeners = Vec::with_capacity(links.len() + 1);

        let env = Rc::downgrade(&self.env);
        let state = Rc::downgrade(&self.state);
        let frame_pending = self.frame_pending.clone();
        listeners.push(self.env.on_scroll(Box::new(move || {
            if frame_pending.get() {
                return;
            }
            let Some(scheduler) = env.upgrade() else {
                return;
            };
            frame_pending.set(true);
            let env = env.clone();
            let state = state.clone();
            let frame_pending = frame_pending.clone();
            scheduler.request_animation_frame(Box::new(move || {
                frame_pending.set(false);
                if let (Some(env), Some(state)) = (env.upgrade(), state.upgrade()) {
                    if state.borrow().initialized {
                        apply_active_link(&*env, &state);
                    }
                }
            }));
        })));

        for link in links {
            let env = Rc::downgrade(&self.env);
            let state = Rc::downgrade(&self.state);
            let link_for_handler = link.clone();
            listeners.push(self.env.on_click(
                link,
                Box::new(move || match (env.upgrade(), state.upgrade()) {
                    (Some(env), Some(state)) => handle_link_click(&*env, &state, &link_for_handler),
                    _ => ClickAction::FollowDefault,
                }),
            ));
        }

        listeners
    }

    /// Recomputes the active link from the current scroll position.
    pub fn update_active_link(&self) {
        apply_active_link(&*self.env, &self.state);
    }

    /// Smooth-scrolls so `target` sits just below the header.
    pub fn scroll_to_section(&self, target: &E::Element) {
        scroll_to_section(&*self.env, &self.state, target);
    }

    /// Shallow-merges `options` into the configuration. Listeners and resolved
    /// elements are kept; call [`destroy`](Self::destroy) and [`init`](Self::init)
    /// after changing selectors.
    pub fn update_config(&self, options: NavigationOptions) {
        self.state.borrow_mut().config.merge(options);
    }

    /// Detaches every listener. No-op unless initialized.
    pub fn destroy(&self) {
        let listeners = {
            let mut state = self.state.borrow_mut();
            if !state.initialized {
                return;
            }
            state.initialized = false;
            std::mem::take(&mut state.listeners)
        };
        drop(listeners);
    }
}

fn apply_active_link<E: Environment>(env: &E, state: &RefCell<State<E>>) {
    let state = state.borrow();
    let layouts: Vec<SectionLayout> = state
        .sections
        .iter()
        .map(|section| SectionLayout {
            id: env.attribute(section, "id"),
            bounds: env.bounds(section),
        })
        .collect();
    let candidate = active::candidate_section(&layouts, env.viewport(), state.config.scroll_offset);

    let active_class = &state.config.active_class;
    for link in &state.links {
        env.set_class(link, active_class, false);
        let href = env.attribute(link, "href");
        if active::link_targets(href.as_deref(), candidate.as_deref()) {
            env.set_class(link, active_class, true);
        }
    }
}

fn handle_link_click<E: Environment>(env: &E, state: &RefCell<State<E>>, link: &E::Element) -> ClickAction {
    let Some(href) = env.attribute(link, "href").filter(|href| href.starts_with('#')) else {
        return ClickAction::FollowDefault;
    };

    // The default jump stays suppressed even when the target is missing.
    let Some(target) = env.query_selector(&href) else {
        env.log(Level::Warn, &format!("Target element not found: {href}"));
        return ClickAction::Suppress;
    };

    scroll_to_section(env, state, &target);
    ClickAction::Suppress
}

fn scroll_to_section<E: Environment>(env: &E, state: &RefCell<State<E>>, target: &E::Element) {
    let header_height = state
        .borrow()
        .header
        .as_ref()
        .map(|header| env.bounds(header).height)
        .unwrap_or(0.0);
    env.scroll_to(env.bounds(target).top - header_height);
}
