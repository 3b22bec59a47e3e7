//! Typed view models
//!
//! Deserialized from flat records. Relations reuse the top-level type of the
//! related content so a populated relation has the same shape as a direct
//! fetch; to-many relations are `Option<Vec<_>>` so "not populated / null"
//! and "empty" stay distinct.

mod alumnus;
mod faculty;
mod news;
mod partner;
mod project;
mod publication;
mod research_line;
mod settings;
mod shared;

pub use alumnus::Alumnus;
pub use faculty::{Advisee, Award, Education, FacultyMember};
pub use news::NewsItem;
pub use partner::{FundedProject, Partner};
pub use project::Project;
pub use publication::{Publication, PublicationType};
pub use research_line::ResearchLine;
pub use settings::{HomepageSettings, PageKind, PageSettings};
pub use shared::{Media, MediaFormat, Seo, Taxonomy};

/// Collection types addressable by slug
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    Faculty,
    ResearchLine,
    Project,
    Publication,
    Alumnus,
    Partner,
    News,
}

impl ContentType {
    /// Types with a detail route
    pub const ROUTED: [ContentType; 5] = [
        ContentType::Faculty,
        ContentType::ResearchLine,
        ContentType::Project,
        ContentType::Publication,
        ContentType::News,
    ];

    /// Backend collection resource
    pub fn resource(&self) -> &'static str {
        match self {
            ContentType::Faculty => "faculty-members",
            ContentType::ResearchLine => "research-lines",
            ContentType::Project => "projects",
            ContentType::Publication => "publications",
            ContentType::Alumnus => "alumni",
            ContentType::Partner => "partners",
            ContentType::News => "news-items",
        }
    }

    /// Site path prefix for detail pages
    pub fn route_prefix(&self) -> &'static str {
        match self {
            ContentType::Faculty => "/faculty",
            ContentType::ResearchLine => "/research",
            ContentType::Project => "/projects",
            ContentType::Publication => "/publications",
            ContentType::Alumnus => "/alumni",
            ContentType::Partner => "/partners",
            ContentType::News => "/news",
        }
    }
}
