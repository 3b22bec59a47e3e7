//! Research line

use super::shared::Media;
use super::{FacultyMember, Project, Publication};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchLine {
    pub id: u64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub short_description: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default)]
    pub order: Option<i32>,
    #[serde(default)]
    pub cover_image: Option<Media>,
    #[serde(default)]
    pub faculty_members: Option<Vec<FacultyMember>>,
    #[serde(default)]
    pub projects: Option<Vec<Project>>,
    #[serde(default)]
    pub publications: Option<Vec<Publication>>,
}
