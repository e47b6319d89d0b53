//! Records loaded from the site's data documents.
//!
//! Records are read whole, never mutated by the browser, and dropped with the page.
//! Publications keep unknown keys in `extra` so maintenance tooling can rewrite the
//! file without losing fields the browser doesn't care about.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of `publications.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Publication {
    pub title: String,
    pub authors: String,
    #[serde(default)]
    pub citations: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default)]
    pub links: Vec<Link>,
    /// Fields owned by tooling (`inspire_id`, `last_updated`, `urls`, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Publication {
    pub fn new(title: impl Into<String>, authors: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            authors: authors.into(),
            citations: 0,
            conference: None,
            location: None,
            date: None,
            links: Vec::new(),
            extra: Map::new(),
        }
    }

    /// Text value of a tooling field, `None` when absent or empty.
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra
            .get(key)
            .and_then(Value::as_str)
            .filter(|value| !value.is_empty())
    }

    pub fn has_link_of_type(&self, link_type: &str) -> bool {
        self.links.iter().any(|link| link.r#type == link_type)
    }
}

/// External link shown under a publication (`arxiv`, `doi`, `inspire`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Link {
    /// Icon key, rendered as `ai ai-<type>`.
    pub r#type: String,
    pub url: String,
    pub text: String,
}

/// One entry of `presentations.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Presentation {
    pub title: String,
    pub author: String,
    /// Category badge ("Talk", "Poster", ...).
    pub r#type: String,
    pub event: String,
    pub location: String,
    pub date: String,
    /// Slides PDF.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

/// Decodes a whole publications document.
pub fn parse_publications(json: &str) -> serde_json::Result<Vec<Publication>> {
    serde_json::from_str(json)
}

/// Decodes a whole presentations document.
pub fn parse_presentations(json: &str) -> serde_json::Result<Vec<Presentation>> {
    serde_json::from_str(json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn publication_defaults_and_extra_fields() {
        let publications = parse_publications(
            r#"[{
                "title": "Dark matter",
                "authors": "A. Author",
                "inspire_id": "123456",
                "urls": [{"description": "x", "value": "y"}]
            }]"#,
        )
        .unwrap();

        let publication = &publications[0];
        assert_eq!(publication.citations, 0);
        assert!(publication.links.is_empty());
        assert!(publication.conference.is_none());
        assert_eq!(publication.extra_str("inspire_id"), Some("123456"));
        assert!(publication.extra.contains_key("urls"));
    }

    #[test]
    fn publication_round_trip_keeps_unknown_fields() {
        let json = r#"[{"title":"T","authors":"A","citations":3,"links":[],"last_updated":"2024-01-01 00:00:00"}]"#;
        let publications = parse_publications(json).unwrap();
        let written = serde_json::to_value(&publications).unwrap();

        assert_eq!(written[0]["last_updated"], "2024-01-01 00:00:00");
        assert_eq!(written[0]["citations"], 3);
        assert!(written[0].get("conference").is_none());
    }

    #[test]
    fn tooling_fields_keep_file_order() {
        let json = r#"[{"title":"T","authors":"A","links":[],"urls":[],"inspire_id":"1","last_updated":"x"}]"#;
        let mut publications = parse_publications(json).unwrap();
        publications[0].extra.insert("arxiv_categories".into(), Value::from("hep-ph"));
        let written = serde_json::to_string(&publications).unwrap();

        let urls = written.find("\"urls\"").unwrap();
        let inspire_id = written.find("\"inspire_id\"").unwrap();
        let last_updated = written.find("\"last_updated\"").unwrap();
        let appended = written.find("\"arxiv_categories\"").unwrap();
        assert!(urls < inspire_id && inspire_id < last_updated && last_updated < appended);
    }

    #[test]
    fn missing_required_field_is_a_parse_error() {
        assert!(parse_publications(r#"[{"title": "No authors"}]"#).is_err());
        assert!(parse_presentations(r#"[{"title": "T", "author": "A"}]"#).is_err());
        assert!(parse_presentations(r#"{"not": "a list"}"#).is_err());
    }

    #[test]
    fn presentation_type_and_optional_url() {
        let presentations = parse_presentations(
            r#"[
                {"title":"T","author":"A","type":"Talk","event":"E","location":"L","date":"D","url":"slides.pdf"},
                {"title":"T2","author":"A","type":"Poster","event":"E","location":"L","date":"D"}
            ]"#,
        )
        .unwrap();

        assert_eq!(presentations[0].r#type, "Talk");
        assert_eq!(presentations[0].url.as_deref(), Some("slides.pdf"));
        assert_eq!(presentations[1].url, None);
    }

    #[test]
    fn extra_str_ignores_empty_values() {
        let mut publication = Publication::new("T", "A");
        publication.extra.insert("inspire_id".into(), Value::from(""));
        assert_eq!(publication.extra_str("inspire_id"), None);
    }
}
