//! The page's single loader and navigation manager.
//!
//! Installed once by [`super::start`]; [`super::api`] reaches them from page scripts.

use std::cell::RefCell;
use std::rc::Rc;

use super::BrowserEnvironment;
use crate::loader::ContentLoader;
use crate::navigation::NavigationManager;

thread_local! {
    static CONTENT_LOADER: RefCell<Option<Rc<ContentLoader<BrowserEnvironment>>>> =
        const { RefCell::new(None) };
    static NAVIGATION: RefCell<Option<NavigationManager<BrowserEnvironment>>> =
        const { RefCell::new(None) };
}

/// Returns the loader it replaced, if any.
pub fn install_content_loader(
    loader: Rc<ContentLoader<BrowserEnvironment>>,
) -> Option<Rc<ContentLoader<BrowserEnvironment>>> {
    CONTENT_LOADER.with(|slot| slot.borrow_mut().replace(loader))
}

pub fn content_loader() -> Option<Rc<ContentLoader<BrowserEnvironment>>> {
    CONTENT_LOADER.with(|slot| slot.borrow().clone())
}

/// Returns the manager it replaced, if any. The caller decides whether to destroy it.
pub fn install_navigation(
    navigation: NavigationManager<BrowserEnvironment>,
) -> Option<NavigationManager<BrowserEnvironment>> {
    NAVIGATION.with(|slot| slot.borrow_mut().replace(navigation))
}

pub fn navigation() -> Option<NavigationManager<BrowserEnvironment>> {
    NAVIGATION.with(|slot| slot.borrow().clone())
}
