//! Check command - parses both data files the way the browser does

use std::path::Path;

use anyhow::{Result, bail};

use super::{presentations_path, publications_path, read_presentations, read_publications};
use crate::config::SiteConfig;

pub fn run(root: &Path, config: &SiteConfig) -> Result<()> {
    let mut failures = 0;

    let path = publications_path(root, config);
    match read_publications(&path) {
        Ok(publications) => {
            let missing_links = publications.iter().filter(|p| p.links.is_empty()).count();
            println!("{}: {} publications", path.display(), publications.len());
            if missing_links > 0 {
                log::info!("{missing_links} publications have no links");
            }
        }
        Err(error) => {
            eprintln!("FAIL: {error:#}");
            failures += 1;
        }
    }

    let path = presentations_path(root, config);
    match read_presentations(&path) {
        Ok(presentations) => {
            let with_slides = presentations.iter().filter(|p| p.url.is_some()).count();
            println!(
                "{}: {} presentations ({with_slides} with slides)",
                path.display(),
                presentations.len()
            );
        }
        Err(error) => {
            eprintln!("FAIL: {error:#}");
            failures += 1;
        }
    }

    if failures > 0 {
        bail!("{failures} data file(s) failed to parse");
    }
    println!("OK");
    Ok(())
}
