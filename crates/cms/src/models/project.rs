//! Research project

use super::shared::{lenient_date, Media};
use super::{FacultyMember, Publication, ResearchLine};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: u64,
    pub title: String,
    pub slug: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub description: Option<String>,

    // Funding
    #[serde(default)]
    pub funding_agency: Option<String>,
    #[serde(default)]
    pub funding_amount: Option<f64>,
    #[serde(default)]
    pub status: Option<String>,

    #[serde(default, deserialize_with = "lenient_date")]
    pub start_date: Option<NaiveDate>,
    #[serde(default, deserialize_with = "lenient_date")]
    pub end_date: Option<NaiveDate>,
    /// Percent complete, 0-100
    #[serde(default)]
    pub progress: Option<f64>,

    #[serde(default)]
    pub cover_image: Option<Media>,
    #[serde(default)]
    pub coordinator: Option<Box<FacultyMember>>,
    #[serde(default)]
    pub team: Option<Vec<FacultyMember>>,
    #[serde(default)]
    pub research_lines: Option<Vec<ResearchLine>>,
    #[serde(default)]
    pub publications: Option<Vec<Publication>>,
}

impl Project {
    /// Progress clamped to 0-100
    pub fn progress_percent(&self) -> Option<u8> {
        self.progress.map(|p| p.clamp(0.0, 100.0).round() as u8)
    }

    /// `2021 - 2024`, `2021 - present`, or `None` without a start date
    pub fn period(&self) -> Option<String> {
        let start = self.start_date?;
        Some(match self.end_date {
            Some(end) => format!("{} - {}", start.format("%Y"), end.format("%Y")),
            None => format!("{} - present", start.format("%Y")),
        })
    }
}
