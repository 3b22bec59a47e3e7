//! LabSite Content Layer
//!
//! Everything between the page handlers and the headless CMS:
//! - Query-string building for filters, populate, sort and pagination
//! - The fetch seam (`ContentSource`) and its HTTP client
//! - Envelope classification and flattening into plain records
//! - Typed models and accessors with per-type defaults
//! - Page-boundary fallback helpers

pub mod client;
pub mod content;
pub mod envelope;
pub mod fallback;
pub mod flatten;
pub mod media;
pub mod models;
pub mod query;
pub mod source;

// Re-export commonly used types
pub use client::CmsClient;
pub use content::ContentApi;
pub use fallback::{Fallback, Section};
pub use query::{FilterNode, Populate, PopulateNode, QueryConfig};
pub use source::{ContentSource, StaticContentSource};
