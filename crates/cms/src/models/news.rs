//! News item

use super::shared::{lenient_date, Media, Taxonomy};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewsItem {
    pub id: u64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub excerpt: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub publish_date: Option<NaiveDate>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default)]
    pub pinned: bool,
    #[serde(default)]
    pub cover_image: Option<Media>,
    #[serde(default)]
    pub category: Option<Taxonomy>,
}

impl NewsItem {
    /// Excerpt, or the opening of the body cut at a word boundary
    pub fn teaser(&self, max_chars: usize) -> Option<String> {
        if let Some(excerpt) = self.excerpt.as_deref().filter(|e| !e.trim().is_empty()) {
            return Some(excerpt.to_string());
        }

        let content = self.content.as_deref()?.trim();
        if content.chars().count() <= max_chars {
            return Some(content.to_string());
        }

        let cut: String = content.chars().take(max_chars).collect();
        let cut = match cut.rfind(' ') {
            Some(space) => &cut[..space],
            None => cut.as_str(),
        };
        Some(format!("{}...", cut.trim_end()))
    }
}
