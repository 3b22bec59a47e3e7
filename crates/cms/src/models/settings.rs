//! Singleton page settings

use super::shared::Seo;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HomepageSettings {
    #[serde(default)]
    pub hero_title: Option<String>,
    #[serde(default)]
    pub hero_subtitle: Option<String>,
    #[serde(default)]
    pub about_title: Option<String>,
    #[serde(default)]
    pub about_text: Option<String>,
    #[serde(default)]
    pub cta_label: Option<String>,
    #[serde(default)]
    pub cta_url: Option<String>,
    #[serde(default)]
    pub seo: Option<Seo>,
}

/// Copy and SEO for one listing page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSettings {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub empty_state_message: Option<String>,
    #[serde(default)]
    pub seo: Option<Seo>,
}

/// Listing pages that carry their own settings singleton
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Faculty,
    Research,
    Projects,
    Publications,
    Alumni,
    Partners,
    News,
}

impl PageKind {
    pub const ALL: [PageKind; 7] = [
        PageKind::Faculty,
        PageKind::Research,
        PageKind::Projects,
        PageKind::Publications,
        PageKind::Alumni,
        PageKind::Partners,
        PageKind::News,
    ];

    /// Backend singleton resource
    pub fn resource(&self) -> &'static str {
        match self {
            PageKind::Faculty => "faculty-page",
            PageKind::Research => "research-page",
            PageKind::Projects => "projects-page",
            PageKind::Publications => "publications-page",
            PageKind::Alumni => "alumni-page",
            PageKind::Partners => "partners-page",
            PageKind::News => "news-page",
        }
    }

    /// Heading used when the settings are unavailable
    pub fn default_title(&self) -> &'static str {
        match self {
            PageKind::Faculty => "Faculty",
            PageKind::Research => "Research Lines",
            PageKind::Projects => "Projects",
            PageKind::Publications => "Publications",
            PageKind::Alumni => "Alumni",
            PageKind::Partners => "Partners",
            PageKind::News => "News",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.resource())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_page_resources_are_distinct_singletons() {
        let resources: HashSet<&str> = PageKind::ALL.iter().map(|k| k.resource()).collect();
        assert_eq!(resources.len(), PageKind::ALL.len());
        assert!(resources.iter().all(|r| r.ends_with("-page")));
    }

    #[test]
    fn test_page_settings_tolerate_missing_fields() {
        let settings: PageSettings = serde_json::from_value(serde_json::json!({ "title": "Alumni" })).unwrap();
        assert_eq!(settings.title.as_deref(), Some("Alumni"));
        assert!(settings.seo.is_none());
    }
}
