//! LabSite Common Library
//!
//! Shared code for the LabSite crates including:
//! - Configuration management
//! - Error types and handling
//! - Metrics and observability

pub mod config;
pub mod errors;
pub mod metrics;

// Re-export commonly used types
pub use config::AppConfig;
pub use errors::{AppError, Result};

/// Application version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Path prefix of the CMS REST API
pub const CMS_API_PREFIX: &str = "api";

/// Default page size used when enumerating whole collections
pub const DEFAULT_PAGE_SIZE: u32 = 100;
