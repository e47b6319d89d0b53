pub mod check;
pub mod citations;
pub mod render;
pub mod sitemap;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use folio::{Presentation, Publication};

use crate::config::SiteConfig;

pub fn publications_path(root: &Path, config: &SiteConfig) -> PathBuf {
    root.join(&config.data.publications)
}

pub fn presentations_path(root: &Path, config: &SiteConfig) -> PathBuf {
    root.join(&config.data.presentations)
}

pub fn read_publications(path: &Path) -> Result<Vec<Publication>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    folio::model::parse_publications(&content)
        .with_context(|| format!("Invalid publications document {}", path.display()))
}

pub fn read_presentations(path: &Path) -> Result<Vec<Presentation>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    folio::model::parse_presentations(&content)
        .with_context(|| format!("Invalid presentations document {}", path.display()))
}
