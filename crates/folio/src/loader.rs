//! Fetches both data documents and renders them into their containers.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use futures::future;
use serde::Deserialize;

use crate::environment::{Environment, FetchResponse, Level};
use crate::markup;
use crate::model::{self, Presentation, Publication};

/// Where the documents come from and which elements receive them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LoaderConfig {
    pub publications_url: String,
    pub presentations_url: String,
    pub publications_container: String,
    pub presentations_container: String,
    pub publications_placeholder: String,
    pub presentations_placeholder: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            publications_url: "./assets/data/publications.json".to_string(),
            presentations_url: "./assets/data/presentations.json".to_string(),
            publications_container: "publications-container".to_string(),
            presentations_container: "presentations-container".to_string(),
            publications_placeholder: "publications-loading".to_string(),
            presentations_placeholder: "presentations-loading".to_string(),
        }
    }
}

/// Why a load fell back to the generic warning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadError {
    /// The server answered with a non-2xx status.
    Status { url: String, status: u16 },
    /// The request itself failed.
    Network { url: String, message: String },
    /// The body is not the expected JSON shape.
    Parse { url: String, message: String },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadError::Status { url, status } => {
                write!(f, "failed to load {url}: HTTP status {status}")
            }
            LoadError::Network { url, message } => {
                write!(f, "failed to fetch {url}: {message}")
            }
            LoadError::Parse { url, message } => {
                write!(f, "failed to parse {url}: {message}")
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Owns the loaded records and renders them.
///
/// Every `load` replaces whatever a previous one rendered.
pub struct ContentLoader<E: Environment> {
    env: Rc<E>,
    config: LoaderConfig,
    publications: RefCell<Vec<Publication>>,
    presentations: RefCell<Vec<Presentation>>,
}

impl<E: Environment> ContentLoader<E> {
    pub fn new(env: Rc<E>, config: LoaderConfig) -> Self {
        Self {
            env,
            config,
            publications: RefCell::new(Vec::new()),
            presentations: RefCell::new(Vec::new()),
        }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    pub fn publications(&self) -> Vec<Publication> {
        self.publications.borrow().clone()
    }

    pub fn presentations(&self) -> Vec<Presentation> {
        self.presentations.borrow().clone()
    }

    /// Fetches, stores and renders both documents, or shows the warning in both
    /// containers. Placeholders are removed either way.
    pub async fn load(&self) {
        match self.fetch_documents().await {
            Ok((publications, presentations)) => {
                self.env.log(
                    Level::Info,
                    &format!(
                        "Loaded {} publications and {} presentations",
                        publications.len(),
                        presentations.len()
                    ),
                );
                *self.publications.borrow_mut() = publications;
                *self.presentations.borrow_mut() = presentations;
                self.render_publications();
                self.render_presentations();
            }
            Err(error) => {
                self.env.log(Level::Error, &format!("Error loading data: {error}"));
                self.show_error_message();
            }
        }
        self.remove_placeholders();
    }

    async fn fetch_documents(&self) -> Result<(Vec<Publication>, Vec<Presentation>), LoadError> {
        let publications_url = &self.config.publications_url;
        let presentations_url = &self.config.presentations_url;

        let (publications_response, presentations_response) = future::join(
            self.env.fetch(publications_url),
            self.env.fetch(presentations_url),
        )
        .await;

        let publications_response = checked(publications_url, publications_response)?;
        let presentations_response = checked(presentations_url, presentations_response)?;

        let publications = model::parse_publications(&publications_response.body)
            .map_err(|error| parse_error(publications_url, error))?;
        let presentations = model::parse_presentations(&presentations_response.body)
            .map_err(|error| parse_error(presentations_url, error))?;

        Ok((publications, presentations))
    }

    pub fn render_publications(&self) {
        let html = markup::render_publications(&self.publications.borrow());
        self.replace_content(&self.config.publications_container, &html);
    }

    pub fn render_presentations(&self) {
        let html = markup::render_presentations(&self.presentations.borrow());
        self.replace_content(&self.config.presentations_container, &html);
    }

    pub fn show_error_message(&self) {
        let html = markup::render_load_error();
        self.replace_content(&self.config.publications_container, &html);
        self.replace_content(&self.config.presentations_container, &html);
    }

    fn replace_content(&self, container_id: &str, html: &str) {
        if let Some(container) = self.env.element_by_id(container_id) {
            self.env.set_inner_html(&container, html);
        }
    }

    fn remove_placeholders(&self) {
        for placeholder_id in [
            &self.config.publications_placeholder,
            &self.config.presentations_placeholder,
        ] {
            if let Some(placeholder) = self.env.element_by_id(placeholder_id) {
                self.env.remove_element(&placeholder);
            }
        }
    }
}

fn checked(url: &str, response: Result<FetchResponse, String>) -> Result<FetchResponse, LoadError> {
    let response = response.map_err(|message| LoadError::Network {
        url: url.to_string(),
        message,
    })?;
    if !response.is_success() {
        return Err(LoadError::Status {
            url: url.to_string(),
            status: response.status,
        });
    }
    Ok(response)
}

fn parse_error(url: &str, error: serde_json::Error) -> LoadError {
    LoadError::Parse {
        url: url.to_string(),
        message: error.to_string(),
    }
}
