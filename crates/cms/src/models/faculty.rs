//! Faculty member

use super::shared::{null_as_default, Media};
use super::{Project, Publication, ResearchLine};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacultyMember {
    pub id: u64,
    pub name: String,
    pub slug: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub office: Option<String>,
    #[serde(default)]
    pub lattes: Option<String>,
    #[serde(default)]
    pub orcid: Option<String>,
    #[serde(default)]
    pub google_scholar: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub short_bio: Option<String>,

    // Academic metrics
    #[serde(default)]
    pub citation_count: Option<u32>,
    #[serde(default)]
    pub h_index: Option<u32>,
    #[serde(default)]
    pub publication_count: Option<u32>,

    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub photo: Option<Media>,

    // Relations: `None` when not populated or null, `Some(vec![])` when empty
    #[serde(default)]
    pub research_lines: Option<Vec<ResearchLine>>,
    #[serde(default)]
    pub projects: Option<Vec<Project>>,
    #[serde(default)]
    pub publications: Option<Vec<Publication>>,

    // Components
    #[serde(default, deserialize_with = "null_as_default")]
    pub education: Vec<Education>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub awards: Vec<Award>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub advisees: Vec<Advisee>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Education {
    pub degree: String,
    #[serde(default)]
    pub institution: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Award {
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Advisee {
    pub name: String,
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub year: Option<i32>,
}

impl FacultyMember {
    /// Short bio, or the first paragraph of the full bio
    pub fn summary(&self) -> Option<&str> {
        self.short_bio
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| self.bio.as_deref().and_then(|b| b.split("\n\n").next()))
    }
}
