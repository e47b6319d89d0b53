//! Sitemap command - writes sitemap.xml for the main page and standalone documents

use std::path::Path;
use std::time::SystemTime;

use anyhow::{Context, Result, anyhow};
use chrono::{DateTime, Local, NaiveDate};
use folio::markup::escape_text;

use super::{presentations_path, publications_path};
use crate::config::SiteConfig;

const SITEMAP_NAMESPACE: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: NaiveDate,
    pub changefreq: &'static str,
    pub priority: &'static str,
}

pub fn run(root: &Path, config: &SiteConfig, base_url: Option<&str>, output: Option<&Path>) -> Result<()> {
    let base_url = base_url
        .or(config.base_url.as_deref())
        .ok_or_else(|| anyhow!("No base URL: pass --base-url or set base_url in the configuration"))?;

    let entries = collect(root, config, base_url);
    let output = root.join(output.unwrap_or(&config.sitemap.output));
    std::fs::write(&output, to_xml(&entries))
        .with_context(|| format!("Failed to write {}", output.display()))?;

    println!("Sitemap generated: {}", output.display());
    println!("Total URLs: {}", entries.len());
    for entry in &entries {
        println!("  - {} (last modified: {})", entry.loc, entry.lastmod.format("%Y-%m-%d"));
    }
    Ok(())
}

/// Modification date in local time, or today when the file is missing.
fn file_date(path: &Path) -> NaiveDate {
    std::fs::metadata(path)
        .and_then(|metadata| metadata.modified())
        .map(|modified| DateTime::<Local>::from(modified).date_naive())
        .unwrap_or_else(|_| DateTime::<Local>::from(SystemTime::now()).date_naive())
}

pub fn collect(root: &Path, config: &SiteConfig, base_url: &str) -> Vec<SitemapEntry> {
    let base_url = base_url.trim_end_matches('/');

    let mut main_page = SitemapEntry {
        loc: format!("{base_url}/"),
        lastmod: file_date(&root.join("index.html")),
        changefreq: "monthly",
        priority: "1.0",
    };
    // Data files aren't listed, but newer data means the main page changed.
    for data_file in [publications_path(root, config), presentations_path(root, config)] {
        if data_file.exists() {
            main_page.lastmod = main_page.lastmod.max(file_date(&data_file));
        }
    }

    let mut entries = vec![main_page];
    for document in &config.sitemap.documents {
        let document = document.trim_start_matches('/');
        let path = root.join(document);
        if !path.exists() {
            log::warn!("Skipping missing document {}", path.display());
            continue;
        }
        entries.push(SitemapEntry {
            loc: format!("{base_url}/{document}"),
            lastmod: file_date(&path),
            changefreq: "monthly",
            priority: "0.8",
        });
    }
    entries
}

pub fn to_xml(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!("<urlset xmlns=\"{SITEMAP_NAMESPACE}\">\n"));
    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", escape_text(&entry.loc)));
        xml.push_str(&format!("    <lastmod>{}</lastmod>\n", entry.lastmod.format("%Y-%m-%d")));
        xml.push_str(&format!("    <changefreq>{}</changefreq>\n", entry.changefreq));
        xml.push_str(&format!("    <priority>{}</priority>\n", entry.priority));
        xml.push_str("  </url>\n");
    }
    xml.push_str("</urlset>\n");
    xml
}
