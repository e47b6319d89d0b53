//! Render command - standalone HTML preview built with the browser's markup code

use std::path::Path;

use anyhow::{Context, Result};
use folio::markup;

use super::{presentations_path, publications_path, read_presentations, read_publications};
use crate::config::SiteConfig;

pub fn run(root: &Path, config: &SiteConfig, output: &Path) -> Result<()> {
    let publications = read_publications(&publications_path(root, config))?;
    let presentations = read_presentations(&presentations_path(root, config))?;

    let html = preview_page(
        &markup::render_publications(&publications),
        &markup::render_presentations(&presentations),
    );
    std::fs::write(output, html).with_context(|| format!("Failed to write {}", output.display()))?;

    println!(
        "Preview with {} publications and {} presentations saved to: {}",
        publications.len(),
        presentations.len(),
        output.display()
    );
    Ok(())
}

fn preview_page(publications: &str, presentations: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Folio preview</title>
</head>
<body>
<section id="publications">
<h2>Publications</h2>
<div id="publications-container">
{publications}</div>
</section>
<section id="presentations">
<h2>Presentations</h2>
<div id="presentations-container">
{presentations}</div>
</section>
</body>
</html>
"#
    )
}
