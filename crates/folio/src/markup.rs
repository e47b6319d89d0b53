//! HTML fragments for the publication and presentation sections.
//!
//! Every record field is treated as untrusted: text goes through [`escape_text`],
//! URLs through [`escape_attribute`], and the link type is reduced to a safe class
//! token before it becomes part of `class="ai ai-..."`.

use std::fmt::Write;

use crate::model::{Link, Presentation, Publication};

/// Shown in both containers when loading fails. Deliberately says nothing about the cause.
pub const LOAD_ERROR_MESSAGE: &str =
    "Unable to load content. Please refresh the page or contact the administrator.";

pub fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for character in value.chars() {
        match character {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

/// Attribute values are always double-quoted, so the text escaping is sufficient.
pub fn escape_attribute(value: &str) -> String {
    escape_text(value)
}

/// `arxiv` -> `arxiv`, `"><script` -> `script`.
pub fn class_token(value: &str) -> String {
    value
        .chars()
        .filter(|character| character.is_ascii_alphanumeric() || matches!(character, '-' | '_'))
        .collect()
}

pub fn render_publications(publications: &[Publication]) -> String {
    let mut html = String::new();
    for publication in publications {
        render_publication(&mut html, publication);
    }
    html
}

fn render_publication(html: &mut String, publication: &Publication) {
    let _ = write!(
        html,
        r#"<div class="card-item links">
  <div class="card-item-header">
    <h4 class="fw-bold mb-0">{title}</h4>
    <span class="badge">{citations} citations</span>
  </div>
  <p class="mb-0">{authors}</p>
"#,
        title = escape_text(&publication.title),
        citations = publication.citations,
        authors = escape_text(&publication.authors),
    );

    let conference = publication.conference.as_deref().filter(|conference| !conference.is_empty());
    if let Some(conference) = conference {
        let place_and_date = [publication.location.as_deref(), publication.date.as_deref()]
            .into_iter()
            .flatten()
            .filter(|part| !part.is_empty())
            .map(escape_text)
            .collect::<Vec<_>>()
            .join(", ");
        let _ = write!(
            html,
            r#"  <p class="mb-0 conference" style="color: var(--text-muted)">
    {conference}<br>
    {place_and_date}
  </p>
"#,
            conference = escape_text(conference),
        );
    }

    html.push_str(r#"  <p class="mb-0 link-list" style="color: var(--text-muted)">"#);
    html.push('\n');
    for link in &publication.links {
        render_link(html, link);
    }
    html.push_str("  </p>\n</div>\n");
}

fn render_link(html: &mut String, link: &Link) {
    let _ = writeln!(
        html,
        r#"    <a href="{url}" target="_blank" rel="noopener noreferrer"><i class="ai ai-{icon}"></i> {text}</a>"#,
        url = escape_attribute(&link.url),
        icon = class_token(&link.r#type),
        text = escape_text(&link.text),
    );
}

pub fn render_presentations(presentations: &[Presentation]) -> String {
    let mut html = String::new();
    for presentation in presentations {
        render_presentation(&mut html, presentation);
    }
    html
}

fn render_presentation(html: &mut String, presentation: &Presentation) {
    let pdf_link = presentation
        .url
        .as_deref()
        .filter(|url| !url.is_empty())
        .map(|url| {
            format!(
                r#" <a href="{url}" target="_blank" rel="noopener noreferrer" class="pdf-link" title="View PDF" style="margin-left: 0.5rem; color: var(--text-muted); font-size: 1.5rem;"><i class="fa-solid fa-file-pdf"></i></a>"#,
                url = escape_attribute(url),
            )
        })
        .unwrap_or_default();

    let _ = write!(
        html,
        r#"<div class="card-item links">
  <div class="card-item-header">
    <h4 class="fw-bold mb-0">{title}{pdf_link}</h4>
    <span class="badge">{kind}</span>
  </div>
  <p class="mb-0">{author}</p>
  <p class="mb-0" style="color: var(--text-muted)">
    {event}<br>
    {location}, {date}
  </p>
</div>
"#,
        title = escape_text(&presentation.title),
        kind = escape_text(&presentation.r#type),
        author = escape_text(&presentation.author),
        event = escape_text(&presentation.event),
        location = escape_text(&presentation.location),
        date = escape_text(&presentation.date),
    );
}

pub fn render_load_error() -> String {
    format!(
        r#"<div class="alert alert-warning" role="alert">
  <i class="fas fa-exclamation-triangle"></i>
  {LOAD_ERROR_MESSAGE}
</div>
"#
    )
}
