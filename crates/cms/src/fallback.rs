//! Page-boundary degradation
//!
//! Accessors return `Result`; pages decide per section whether a failure
//! means "render the empty state" instead of failing the whole response.

use labsite_common::errors::{AppError, Result};
use labsite_common::metrics::record_fallback;

/// Outcome of loading one page section
#[derive(Debug, Clone, PartialEq)]
pub enum Section<T> {
    Loaded(T),
    /// The backend could not provide this section
    Unavailable,
}

impl<T> Section<T> {
    pub fn is_loaded(&self) -> bool {
        matches!(self, Section::Loaded(_))
    }

    pub fn loaded(self) -> Option<T> {
        match self {
            Section::Loaded(value) => Some(value),
            Section::Unavailable => None,
        }
    }
}

impl<T: Default> Section<T> {
    pub fn unwrap_or_default(self) -> T {
        self.loaded().unwrap_or_default()
    }
}

/// Extension for accessor results at the page boundary
pub trait Fallback<T> {
    /// The value, or `T::default()` after logging the failure
    fn or_fallback(self, section: &str) -> T
    where
        T: Default;

    /// The value as a `Section`, logging the failure
    fn into_section(self, section: &str) -> Section<T>;
}

impl<T> Fallback<T> for Result<T> {
    fn or_fallback(self, section: &str) -> T
    where
        T: Default,
    {
        self.into_section(section).unwrap_or_default()
    }

    fn into_section(self, section: &str) -> Section<T> {
        match self {
            Ok(value) => Section::Loaded(value),
            Err(e) => {
                report(section, &e);
                Section::Unavailable
            }
        }
    }
}

fn report(section: &str, error: &AppError) {
    if error.is_unavailable() {
        tracing::warn!(section = section, error = %error, "Section rendered without backend content");
    } else {
        tracing::error!(section = section, error = %error, "Section failed to load");
    }
    record_fallback(section);
}
