//! Alumnus

use super::shared::{Media, Taxonomy};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Alumnus {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub slug: Option<String>,

    // Thesis
    #[serde(default)]
    pub thesis_title: Option<String>,
    #[serde(default)]
    pub defense_year: Option<i32>,
    #[serde(default)]
    pub advisor: Option<String>,

    // Current position
    #[serde(default)]
    pub current_position: Option<String>,
    #[serde(default)]
    pub current_institution: Option<String>,

    #[serde(default)]
    pub lattes: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub photo: Option<Media>,
    #[serde(default)]
    pub degree_level: Option<Taxonomy>,
    #[serde(default)]
    pub sector: Option<Taxonomy>,
}

impl Alumnus {
    pub fn degree_level_name(&self) -> Option<&str> {
        self.degree_level.as_ref().map(|t| t.name.as_str())
    }

    pub fn sector_name(&self) -> Option<&str> {
        self.sector.as_ref().map(|t| t.name.as_str())
    }
}
