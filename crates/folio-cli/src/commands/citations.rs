//! Citations commands - INSPIRE-HEP metadata updates and coverage report

use std::ffi::OsString;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use folio::{Link, Publication};
use serde_json::Value;

use super::{publications_path, read_publications};
use crate::config::SiteConfig;
use crate::inspire::{InspireClient, PaperMetadata};

const RETRY_PAUSE: Duration = Duration::from_millis(1000);

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn backup_path(path: &Path) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(".bak");
    PathBuf::from(name)
}

pub async fn update(root: &Path, config: &SiteConfig, backup: bool, delay_ms: u64) -> Result<()> {
    let path = publications_path(root, config);
    let mut publications = read_publications(&path)?;
    let client = InspireClient::new(&config.inspire.api_base, RETRY_PAUSE)?;

    if backup {
        let backup = backup_path(&path);
        std::fs::copy(&path, &backup).with_context(|| format!("Failed to back up to {}", backup.display()))?;
        log::info!("Backup saved: {}", backup.display());
    }

    println!("Current status:\n{}", CitationReport::new(&publications, timestamp()));
    println!("Updating {} publications...", publications.len());
    let total = publications.len();
    let mut updated_count = 0;
    let mut failed_count = 0;

    for (index, publication) in publications.iter_mut().enumerate() {
        let short_title: String = publication.title.chars().take(60).collect();
        println!("[{}/{total}] Processing: {short_title}", index + 1);

        match client.find(publication).await {
            Some(paper) => {
                let changes = merge(publication, &paper, &timestamp());
                if changes.is_empty() {
                    log::info!("No changes (citations: {})", publication.citations);
                } else {
                    log::info!("Updated: {}", changes.join(", "));
                    updated_count += 1;
                }
            }
            None => {
                log::warn!("Could not find INSPIRE-HEP data for '{short_title}'");
                failed_count += 1;
            }
        }

        if index + 1 < total {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }

    let json = serde_json::to_string_pretty(&publications)?;
    std::fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

    println!("Update completed!");
    println!("Updated: {updated_count} publications");
    println!("Failed: {failed_count} publications");
    println!("File saved: {}", path.display());
    println!("Updated status:\n{}", CitationReport::new(&publications, timestamp()));
    Ok(())
}

fn is_blank(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(text)) => text.is_empty(),
        Some(_) => false,
    }
}

/// Folds an INSPIRE record into a publication and describes what changed.
pub fn merge(publication: &mut Publication, paper: &PaperMetadata, updated_at: &str) -> Vec<String> {
    let mut changes = Vec::new();

    if publication.citations != paper.citations {
        changes.push(format!("citations: {} -> {}", publication.citations, paper.citations));
    }
    publication.citations = paper.citations;
    publication
        .extra
        .insert("last_updated".to_string(), Value::from(updated_at));

    if publication.title.is_empty() {
        if let Some(title) = &paper.title {
            publication.title = title.clone();
            changes.push("title: updated".to_string());
        }
    }
    if publication.authors.is_empty() {
        if let Some(authors) = &paper.authors {
            publication.authors = authors.clone();
            changes.push("authors: updated".to_string());
        }
    }
    if is_blank(publication.extra.get("inspire_id")) && !paper.inspire_id.is_empty() {
        changes.push(format!("inspire_id: None -> {}", paper.inspire_id));
        publication
            .extra
            .insert("inspire_id".to_string(), Value::from(paper.inspire_id.as_str()));
    }
    if !paper.urls.is_empty() {
        if let Ok(urls) = serde_json::to_value(&paper.urls) {
            publication.extra.insert("urls".to_string(), urls);
        }
    }

    if let Some(doi) = &paper.doi {
        if !publication.has_link_of_type("doi") {
            publication.links.push(Link {
                r#type: "doi".to_string(),
                url: format!("https://doi.org/{doi}"),
                text: format!("{} {}, {} ({})", paper.journal, paper.volume, paper.pages, paper.year),
            });
        }
    }
    if let Some(arxiv_id) = &paper.arxiv_id {
        if !publication.has_link_of_type("arxiv") {
            publication.links.push(Link {
                r#type: "arxiv".to_string(),
                url: format!("https://arxiv.org/abs/{arxiv_id}"),
                text: format!("arXiv:{arxiv_id}"),
            });
        }
    }

    changes
}

#[derive(Debug, Clone, PartialEq)]
pub struct CitationReport {
    pub total_publications: usize,
    pub total_citations: u64,
    pub with_inspire_id: usize,
    pub coverage: String,
    pub last_update: String,
}

impl CitationReport {
    pub fn new(publications: &[Publication], last_update: String) -> Self {
        let with_inspire_id = publications
            .iter()
            .filter(|publication| publication.extra_str("inspire_id").is_some())
            .count();
        let coverage = if publications.is_empty() {
            0.0
        } else {
            with_inspire_id as f64 / publications.len() as f64 * 100.0
        };
        Self {
            total_publications: publications.len(),
            total_citations: publications.iter().map(|publication| publication.citations).sum(),
            with_inspire_id,
            coverage: format!("{coverage:.1}%"),
            last_update,
        }
    }
}

impl fmt::Display for CitationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "  total_publications: {}", self.total_publications)?;
        writeln!(f, "  total_citations: {}", self.total_citations)?;
        writeln!(f, "  with_inspire_id: {}", self.with_inspire_id)?;
        writeln!(f, "  coverage: {}", self.coverage)?;
        write!(f, "  last_update: {}", self.last_update)
    }
}

pub fn report(root: &Path, config: &SiteConfig) -> Result<()> {
    let publications = read_publications(&publications_path(root, config))?;
    println!("{}", CitationReport::new(&publications, timestamp()));
    Ok(())
}
