//! Shapes shared by several content types

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

/// A resolved upload; `url` is always absolute
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    #[serde(default)]
    pub id: Option<u64>,
    pub url: String,
    #[serde(default)]
    pub alternative_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub formats: BTreeMap<String, MediaFormat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaFormat {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl Media {
    /// URL of a named rendition (`thumbnail`, `small`, ...) or the original
    pub fn format_url(&self, format: &str) -> &str {
        self.formats
            .get(format)
            .map(|f| f.url.as_str())
            .unwrap_or(&self.url)
    }

    /// Alt text, falling back to the given caption
    pub fn alt_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.alternative_text.as_deref().filter(|a| !a.is_empty()).unwrap_or(fallback)
    }
}

/// Lookup record used only to categorize others (sector, degree level, ...)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Taxonomy {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
}

/// Embedded SEO component
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seo {
    #[serde(default)]
    pub meta_title: Option<String>,
    #[serde(default)]
    pub meta_description: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,
    #[serde(default, rename = "canonicalURL", alias = "canonicalUrl")]
    pub canonical_url: Option<String>,
    #[serde(default)]
    pub prevent_indexing: bool,
    #[serde(default)]
    pub share_image: Option<Media>,
}

/// Treat `null` like an absent field for collection-valued components
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Accept `YYYY-MM-DD` dates as well as full timestamps
pub(crate) fn lenient_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.as_deref().and_then(parse_date))
}

pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let prefix = raw.get(..10)?;
    NaiveDate::parse_from_str(prefix, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 18);
        assert_eq!(parse_date("2024-03-18"), expected);
        assert_eq!(parse_date("2024-03-18T14:05:00.000Z"), expected);
        assert_eq!(parse_date("18/03/2024"), None);
        assert_eq!(parse_date("2024"), None);
    }

    #[test]
    fn test_media_format_fallback() {
        let media: Media = serde_json::from_value(json!({
            "url": "http://cms/uploads/a.jpg",
            "formats": { "small": { "url": "http://cms/uploads/small_a.jpg" } }
        }))
        .unwrap();

        assert_eq!(media.format_url("small"), "http://cms/uploads/small_a.jpg");
        assert_eq!(media.format_url("large"), "http://cms/uploads/a.jpg");
        assert_eq!(media.alt_or("Portrait"), "Portrait");
    }

    #[test]
    fn test_seo_canonical_alias() {
        let seo: Seo = serde_json::from_value(json!({ "metaTitle": "t", "canonicalURL": "https://x" })).unwrap();
        assert_eq!(seo.canonical_url.as_deref(), Some("https://x"));
        assert!(seo.share_image.is_none());
    }
}
