//! INSPIRE-HEP literature API client and the lookup chain used to match a
//! publication record to an INSPIRE record.

use std::collections::HashSet;
use std::sync::LazyLock;
use std::time::Duration;

use anyhow::{Context, Result};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use folio::Publication;

/// Title searches only accept a hit above this word-set similarity.
pub const TITLE_SIMILARITY_THRESHOLD: f64 = 0.8;

static ARXIV_NEW_STYLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{4}\.\d{4,5})").unwrap());
static ARXIV_OLD_STYLE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"([a-z-]+/\d{7})").unwrap());
static DOI_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"doi\.org/(.+)").unwrap());
static DOI_BARE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(10\.\d+/.+)").unwrap());
static PUNCTUATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^\w\s]").unwrap());
static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").unwrap());

/// `arXiv:2410.01204` -> `2410.01204`, `hep-ph/0123456` stays as is.
pub fn extract_arxiv_id(text: &str) -> Option<String> {
    [&*ARXIV_NEW_STYLE, &*ARXIV_OLD_STYLE]
        .into_iter()
        .find_map(|pattern| pattern.captures(text))
        .map(|captures| captures[1].to_string())
}

/// `https://doi.org/10.1103/PhysRevD.1.2` -> `10.1103/PhysRevD.1.2`.
pub fn extract_doi(text: &str) -> Option<String> {
    [&*DOI_URL, &*DOI_BARE]
        .into_iter()
        .find_map(|pattern| pattern.captures(text))
        .map(|captures| captures[1].to_string())
}

/// First five words of the title with punctuation blanked out.
pub fn title_query(title: &str) -> String {
    PUNCTUATION
        .replace_all(title, " ")
        .split_whitespace()
        .take(5)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Jaccard index of the lowercase word sets.
pub fn title_similarity(left: &str, right: &str) -> f64 {
    let words = |title: &str| -> HashSet<String> {
        WORD.find_iter(&title.to_lowercase())
            .map(|word| word.as_str().to_string())
            .collect()
    };
    let left = words(left);
    let right = words(right);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    let intersection = left.intersection(&right).count();
    let union = left.union(&right).count();
    intersection as f64 / union as f64
}

// --- API shapes ---

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: Hits,
}

#[derive(Debug, Deserialize)]
struct Hits {
    total: u64,
    #[serde(default)]
    hits: Vec<Record>,
}

#[derive(Debug, Deserialize)]
pub struct Record {
    id: Value,
    #[serde(default)]
    metadata: Metadata,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Metadata {
    titles: Vec<TitleEntry>,
    citation_count: u64,
    authors: Vec<AuthorEntry>,
    publication_info: Vec<PublicationInfo>,
    preprint_date: Option<String>,
    arxiv_eprints: Vec<ArxivEprint>,
    dois: Vec<DoiEntry>,
    urls: Vec<UrlEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TitleEntry {
    title: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AuthorEntry {
    full_name: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PublicationInfo {
    journal_title: Option<String>,
    journal_volume: Option<String>,
    page_start: Option<String>,
    page_end: Option<String>,
    artid: Option<String>,
    year: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ArxivEprint {
    value: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DoiEntry {
    value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlEntry {
    pub description: String,
    pub value: String,
}

/// What gets merged back into a publication record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PaperMetadata {
    pub inspire_id: String,
    pub citations: u64,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub journal: String,
    pub volume: String,
    pub pages: String,
    pub year: String,
    pub arxiv_id: Option<String>,
    pub doi: Option<String>,
    pub urls: Vec<UrlEntry>,
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn non_empty(text: &str) -> Option<String> {
    (!text.is_empty()).then(|| text.to_string())
}

impl Record {
    pub fn title(&self) -> &str {
        self.metadata
            .titles
            .first()
            .map(|entry| entry.title.as_str())
            .unwrap_or_default()
    }

    pub fn to_metadata(&self) -> PaperMetadata {
        let metadata = &self.metadata;
        let authors = metadata
            .authors
            .iter()
            .map(|author| author.full_name.as_str())
            .filter(|name| !name.is_empty())
            .collect::<Vec<_>>()
            .join(", ");

        let mut paper = PaperMetadata {
            inspire_id: value_to_string(&self.id),
            citations: metadata.citation_count,
            title: non_empty(self.title()),
            authors: non_empty(&authors),
            urls: metadata.urls.clone(),
            ..PaperMetadata::default()
        };

        if let Some(info) = metadata.publication_info.first() {
            paper.journal = info.journal_title.clone().unwrap_or_default();
            paper.volume = info.journal_volume.clone().unwrap_or_default();
            paper.pages = match (&info.page_start, &info.page_end, &info.artid) {
                (Some(start), Some(end), _) => format!("{start}-{end}"),
                (Some(start), None, _) => start.clone(),
                (None, _, Some(artid)) => artid.clone(),
                (None, _, None) => String::new(),
            };
            paper.year = info.year.as_ref().map(value_to_string).unwrap_or_default();
        }
        if paper.year.is_empty() {
            if let Some(preprint_date) = &metadata.preprint_date {
                paper.year = preprint_date.chars().take(4).collect();
            }
        }
        if let Some(eprint) = metadata.arxiv_eprints.first() {
            paper.arxiv_id = non_empty(&eprint.value);
        }
        if let Some(doi) = metadata.dois.first() {
            paper.doi = non_empty(&doi.value);
        }
        paper
    }
}

// --- client ---

pub struct InspireClient {
    http: reqwest::Client,
    api_base: String,
    /// Pause after an arXiv or DOI attempt that found nothing.
    retry_pause: Duration,
}

impl InspireClient {
    pub fn new(api_base: &str, retry_pause: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(concat!("folio-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            retry_pause,
        })
    }

    pub async fn by_inspire_id(&self, inspire_id: &str) -> Result<PaperMetadata> {
        let url = format!("{}/literature/{inspire_id}", self.api_base);
        let mut record: Record = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("Unexpected response from {url}"))?;
        record.id = Value::from(inspire_id);
        Ok(record.to_metadata())
    }

    async fn search(&self, query: &str, size: u32) -> Result<Vec<Record>> {
        let url = format!("{}/literature", self.api_base);
        let response: SearchResponse = self
            .http
            .get(&url)
            .query(&[("q", query), ("size", &size.to_string())])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("Unexpected search response for '{query}'"))?;
        if response.hits.total == 0 {
            return Ok(Vec::new());
        }
        Ok(response.hits.hits)
    }

    pub async fn by_arxiv(&self, arxiv_id: &str) -> Result<Option<PaperMetadata>> {
        let hits = self.search(&format!("eprint:{arxiv_id}"), 1).await?;
        Ok(hits.first().map(Record::to_metadata))
    }

    pub async fn by_doi(&self, doi: &str) -> Result<Option<PaperMetadata>> {
        let hits = self.search(&format!("doi:{doi}"), 1).await?;
        Ok(hits.first().map(Record::to_metadata))
    }

    pub async fn by_title(&self, title: &str) -> Result<Option<PaperMetadata>> {
        let hits = self.search(&format!("title:\"{}\"", title_query(title)), 5).await?;
        Ok(hits
            .iter()
            .find(|hit| title_similarity(title, hit.title()) > TITLE_SIMILARITY_THRESHOLD)
            .map(Record::to_metadata))
    }

    /// Stored INSPIRE id, then arXiv links, then DOI links, then the title.
    /// Lookup errors are logged and the next method is tried.
    pub async fn find(&self, publication: &Publication) -> Option<PaperMetadata> {
        if let Some(inspire_id) = publication.extra_str("inspire_id") {
            match self.by_inspire_id(inspire_id).await {
                Ok(paper) => return Some(paper),
                Err(error) => log::warn!("INSPIRE-HEP ID lookup failed for {inspire_id}: {error:#}"),
            }
        }

        for link in publication.links.iter().filter(|link| link.r#type == "arxiv") {
            let Some(arxiv_id) = extract_arxiv_id(&link.text) else {
                continue;
            };
            match self.by_arxiv(&arxiv_id).await {
                Ok(Some(paper)) => return Some(paper),
                Ok(None) => {}
                Err(error) => log::warn!("arXiv search failed for {arxiv_id}: {error:#}"),
            }
            tokio::time::sleep(self.retry_pause).await;
        }

        for link in publication.links.iter().filter(|link| link.r#type == "doi") {
            let Some(doi) = extract_doi(&link.url) else {
                continue;
            };
            match self.by_doi(&doi).await {
                Ok(Some(paper)) => return Some(paper),
                Ok(None) => {}
                Err(error) => log::warn!("DOI search failed for {doi}: {error:#}"),
            }
            tokio::time::sleep(self.retry_pause).await;
        }

        if !publication.title.is_empty() {
            match self.by_title(&publication.title).await {
                Ok(found) => return found,
                Err(error) => log::warn!("Title search failed for '{}': {error:#}", publication.title),
            }
        }
        None
    }
}
