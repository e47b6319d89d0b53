use serde::Deserialize;

#[derive(Debug, Clone, PartialEq)]
pub struct NavigationConfig {
    pub nav_selector: String,
    /// Sections are expected to carry an `id`; links point at `#<id>`.
    pub section_selector: String,
    pub header_selector: String,
    /// Pixels added to the scroll position before testing section ranges.
    pub scroll_offset: f64,
    pub active_class: String,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            nav_selector: ".navbar-nav .nav-link".to_string(),
            section_selector: "section[id]".to_string(),
            header_selector: ".navbar".to_string(),
            scroll_offset: 100.0,
            active_class: "active".to_string(),
        }
    }
}

impl NavigationConfig {
    pub fn with_options(options: NavigationOptions) -> Self {
        let mut config = Self::default();
        config.merge(options);
        config
    }

    /// Shallow merge: every supplied option replaces its key, the rest stay.
    pub fn merge(&mut self, options: NavigationOptions) {
        let NavigationOptions {
            nav_selector,
            section_selector,
            header_selector,
            scroll_offset,
            active_class,
        } = options;
        if let Some(nav_selector) = nav_selector {
            self.nav_selector = nav_selector;
        }
        if let Some(section_selector) = section_selector {
            self.section_selector = section_selector;
        }
        if let Some(header_selector) = header_selector {
            self.header_selector = header_selector;
        }
        if let Some(scroll_offset) = scroll_offset {
            self.scroll_offset = scroll_offset;
        }
        if let Some(active_class) = active_class {
            self.active_class = active_class;
        }
    }
}

/// Partial configuration as passed from page scripts (`{ scrollOffset: 80 }`).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NavigationOptions {
    pub nav_selector: Option<String>,
    pub section_selector: Option<String>,
    pub header_selector: Option<String>,
    pub scroll_offset: Option<f64>,
    pub active_class: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_options_keep_defaults() {
        let config = NavigationConfig::with_options(NavigationOptions {
            scroll_offset: Some(60.0),
            ..NavigationOptions::default()
        });

        assert_eq!(config.scroll_offset, 60.0);
        assert_eq!(config.nav_selector, ".navbar-nav .nav-link");
        assert_eq!(config.active_class, "active");
    }

    #[test]
    fn merge_overrides_key_by_key() {
        let mut config = NavigationConfig::default();
        config.merge(NavigationOptions {
            active_class: Some("current".into()),
            ..NavigationOptions::default()
        });
        config.merge(NavigationOptions {
            header_selector: Some("header".into()),
            ..NavigationOptions::default()
        });

        assert_eq!(config.active_class, "current");
        assert_eq!(config.header_selector, "header");
        assert_eq!(config.section_selector, "section[id]");
    }

    #[test]
    fn options_from_camel_case_json_ignore_unknown_keys() {
        let options: NavigationOptions =
            serde_json::from_str(r#"{"navSelector": "nav a", "scrollOffset": 80, "somethingElse": true}"#)
                .unwrap();

        assert_eq!(options.nav_selector.as_deref(), Some("nav a"));
        assert_eq!(options.scroll_offset, Some(80.0));
        assert_eq!(options.active_class, None);
    }
}
