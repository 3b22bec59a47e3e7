//! Publication

use super::{FacultyMember, ResearchLine};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Publication venue kind
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublicationType {
    Journal,
    Conference,
    Chapter,
    Book,
    Thesis,
    #[serde(other)]
    Other,
}

impl PublicationType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PublicationType::Journal => "journal",
            PublicationType::Conference => "conference",
            PublicationType::Chapter => "chapter",
            PublicationType::Book => "book",
            PublicationType::Thesis => "thesis",
            PublicationType::Other => "other",
        }
    }

    /// Human label for filter dropdowns and group headings
    pub fn label(&self) -> &'static str {
        match self {
            PublicationType::Journal => "Journal article",
            PublicationType::Conference => "Conference paper",
            PublicationType::Chapter => "Book chapter",
            PublicationType::Book => "Book",
            PublicationType::Thesis => "Thesis",
            PublicationType::Other => "Other",
        }
    }
}

impl fmt::Display for PublicationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Publication {
    pub id: u64,
    pub title: String,
    pub slug: String,
    /// Author list as printed, e.g. `Souza, A.; Lima, B.`
    #[serde(default)]
    pub authors: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, rename = "type")]
    pub kind: Option<PublicationType>,

    // Venue
    #[serde(default)]
    pub journal: Option<String>,
    #[serde(default)]
    pub conference: Option<String>,
    #[serde(default)]
    pub volume: Option<String>,
    #[serde(default)]
    pub issue: Option<String>,
    #[serde(default)]
    pub pages: Option<String>,
    #[serde(default)]
    pub publisher: Option<String>,
    #[serde(default)]
    pub doi: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default, rename = "abstract")]
    pub abstract_text: Option<String>,
    #[serde(default)]
    pub keywords: Option<String>,

    // Bibliometrics
    #[serde(default)]
    pub citation_count: Option<u32>,
    #[serde(default)]
    pub qualis: Option<String>,
    #[serde(default)]
    pub quartile: Option<String>,

    // Preformatted citations
    #[serde(default)]
    pub bibtex: Option<String>,
    #[serde(default)]
    pub apa: Option<String>,
    #[serde(default)]
    pub abnt: Option<String>,

    #[serde(default)]
    pub featured: bool,

    #[serde(default)]
    pub author_records: Option<Vec<FacultyMember>>,
    #[serde(default)]
    pub research_line: Option<Box<ResearchLine>>,
}

impl Publication {
    /// Journal or conference name, whichever is set
    pub fn venue(&self) -> Option<&str> {
        self.journal
            .as_deref()
            .or(self.conference.as_deref())
            .filter(|v| !v.trim().is_empty())
    }

    pub fn kind_or_other(&self) -> PublicationType {
        self.kind.unwrap_or(PublicationType::Other)
    }

    /// `https://doi.org/...` link when a DOI is present
    pub fn doi_url(&self) -> Option<String> {
        let doi = self.doi.as_deref()?.trim();
        if doi.is_empty() {
            return None;
        }
        if doi.starts_with("http://") || doi.starts_with("https://") {
            return Some(doi.to_string());
        }
        Some(format!("https://doi.org/{}", doi.trim_start_matches("doi:")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unknown_type_maps_to_other() {
        let publication: Publication = serde_json::from_value(json!({
            "id": 1, "title": "T", "slug": "t", "type": "patent"
        }))
        .unwrap();
        assert_eq!(publication.kind, Some(PublicationType::Other));
    }

    #[test]
    fn test_venue_and_doi() {
        let publication: Publication = serde_json::from_value(json!({
            "id": 1, "title": "T", "slug": "t",
            "type": "conference", "conference": "SBBD", "doi": "doi:10.1000/xyz"
        }))
        .unwrap();

        assert_eq!(publication.venue(), Some("SBBD"));
        assert_eq!(publication.doi_url().as_deref(), Some("https://doi.org/10.1000/xyz"));
        assert_eq!(publication.kind_or_other().label(), "Conference paper");
    }
}
