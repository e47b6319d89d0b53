//! Client-side scripting for a static academic site.
//!
//! Two independent components drive the page:
//!
//! - [`loader::ContentLoader`] fetches the publication and presentation documents
//!   and renders them into their containers.
//! - [`navigation::NavigationManager`] keeps the navigation bar in sync with the
//!   scroll position and turns in-page anchor clicks into smooth scrolls.
//!
//! Neither touches the DOM directly. Everything goes through an
//! [`environment::Environment`], which the `browser` platform implements with
//! `web-sys` and the unit tests implement with an in-memory fake.

pub mod environment;
pub mod loader;
pub mod markup;
pub mod model;
pub mod navigation;

#[cfg(feature = "browser")]
pub mod platform;

#[cfg(feature = "browser")]
pub use zoon;

pub use environment::{Bounds, ClickAction, Environment, FetchResponse, Level, Viewport};
pub use loader::{ContentLoader, LoadError, LoaderConfig};
pub use model::{Link, Presentation, Publication};
pub use navigation::{InitError, NavigationConfig, NavigationManager, NavigationOptions};
