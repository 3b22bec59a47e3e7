//! LabSite List Controller
//!
//! Client-side list behavior for the listing pages:
//! - Free-text search and independent facet filters
//! - Grouping into sorted sections with counts
//! - CSV and BibTeX export

pub mod export;
pub mod filter;
pub mod group;
mod listable;

// Re-export commonly used types
pub use export::{alumni_columns, publication_columns, to_bibtex, to_csv, Column};
pub use filter::{facet_values, Choice, FacetValues, ListFilter, Listable};
pub use group::{group_by, Group, SortOrder};
