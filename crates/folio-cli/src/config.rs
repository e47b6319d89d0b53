//! `Folio.toml` at the site root. Every key is optional.
//!
//! ```toml
//! base_url = "https://example.github.io"
//!
//! [data]
//! publications = "assets/data/publications.json"
//! presentations = "assets/data/presentations.json"
//!
//! [sitemap]
//! documents = ["assets/documents/CV.pdf"]
//! output = "sitemap.xml"
//!
//! [inspire]
//! api_base = "https://inspirehep.net/api"
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

pub const CONFIG_FILE_NAME: &str = "Folio.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub base_url: Option<String>,
    pub data: DataConfig,
    pub sitemap: SitemapConfig,
    pub inspire: InspireConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub publications: PathBuf,
    pub presentations: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        let loader = folio::LoaderConfig::default();
        Self {
            publications: PathBuf::from(loader.publications_url.trim_start_matches("./")),
            presentations: PathBuf::from(loader.presentations_url.trim_start_matches("./")),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SitemapConfig {
    /// Site-relative paths of standalone documents worth indexing (CV, thesis, ...).
    pub documents: Vec<String>,
    pub output: PathBuf,
}

impl Default for SitemapConfig {
    fn default() -> Self {
        Self {
            documents: Vec::new(),
            output: PathBuf::from("sitemap.xml"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InspireConfig {
    pub api_base: String,
}

impl Default for InspireConfig {
    fn default() -> Self {
        Self {
            api_base: "https://inspirehep.net/api".to_string(),
        }
    }
}

impl SiteConfig {
    /// Reads `explicit`, or `<root>/Folio.toml` when it exists, or falls back to defaults.
    pub fn load(root: &Path, explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => path.to_path_buf(),
            None => {
                let candidate = root.join(CONFIG_FILE_NAME);
                if !candidate.exists() {
                    log::debug!("No {CONFIG_FILE_NAME} in {}, using defaults", root.display());
                    return Ok(Self::default());
                }
                candidate
            }
        };
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let config = Self::parse(&content).with_context(|| format!("Invalid {}", path.display()))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }
}
