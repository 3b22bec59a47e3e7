//! Search and facet filtering
//!
//! A `ListFilter` holds one value per facet. Facets are independent and a
//! record is shown only when every facet accepts it.

use std::borrow::Borrow;
use std::collections::BTreeSet;

/// Fields a list page can search, filter and group on
pub trait Listable {
    /// Text fields the free-text search looks at
    fn search_text(&self) -> Vec<&str>;

    /// Primary categorical facet (publication type, degree level, ...)
    fn category(&self) -> Option<&str> {
        None
    }

    fn year(&self) -> Option<i32> {
        None
    }

    /// Secondary categorical facet (research line, sector, ...)
    fn taxonomy(&self) -> Option<&str> {
        None
    }
}

/// Value of a categorical facet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Choice<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Choice<T> {
    pub fn accepts<Q>(&self, value: Option<&Q>) -> bool
    where
        T: Borrow<Q>,
        Q: PartialEq + ?Sized,
    {
        match self {
            Choice::All => true,
            Choice::Only(expected) => value == Some(expected.borrow()),
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }
}

impl Choice<String> {
    /// From a query parameter; empty or `all` selects everything
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            None | Some("") => Choice::All,
            Some(v) if v.eq_ignore_ascii_case("all") => Choice::All,
            Some(v) => Choice::Only(v.to_string()),
        }
    }
}

impl Choice<i32> {
    /// From a query parameter; anything that is not a year selects everything
    pub fn from_param(param: Option<&str>) -> Self {
        param
            .and_then(|v| v.trim().parse().ok())
            .map_or(Choice::All, Choice::Only)
    }
}

/// Current filter state of one list page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilter {
    pub search: String,
    pub category: Choice<String>,
    pub year: Choice<i32>,
    pub taxonomy: Choice<String>,
}

impl ListFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, text: &str) -> Self {
        self.search = text.to_string();
        self
    }

    pub fn category(mut self, category: Choice<String>) -> Self {
        self.category = category;
        self
    }

    pub fn year(mut self, year: Choice<i32>) -> Self {
        self.year = year;
        self
    }

    pub fn taxonomy(mut self, taxonomy: Choice<String>) -> Self {
        self.taxonomy = taxonomy;
        self
    }

    /// Reset every facet
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// True when any facet narrows the list
    pub fn is_active(&self) -> bool {
        !self.search.trim().is_empty()
            || !self.category.is_all()
            || !self.year.is_all()
            || !self.taxonomy.is_all()
    }

    pub fn matches<T: Listable>(&self, record: &T) -> bool {
        self.matches_search(record)
            && self.category.accepts(record.category())
            && self.year.accepts(record.year().as_ref())
            && self.taxonomy.accepts(record.taxonomy())
    }

    fn matches_search<T: Listable>(&self, record: &T) -> bool {
        let needle = self.search.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        record
            .search_text()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    /// Records passing every facet, in input order
    pub fn apply<'a, T: Listable>(&self, records: &'a [T]) -> Vec<&'a T> {
        let visible: Vec<&T> = records.iter().filter(|r| self.matches(*r)).collect();
        tracing::debug!(total = records.len(), visible = visible.len(), "List filtered");
        visible
    }
}

/// Distinct values present for each facet, for filter dropdowns
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetValues {
    /// Sorted ascending
    pub categories: Vec<String>,
    /// Most recent first
    pub years: Vec<i32>,
    /// Sorted ascending
    pub taxonomies: Vec<String>,
}

pub fn facet_values<T: Listable>(records: &[T]) -> FacetValues {
    let mut categories = BTreeSet::new();
    let mut years = BTreeSet::new();
    let mut taxonomies = BTreeSet::new();

    for record in records {
        if let Some(category) = record.category() {
            categories.insert(category.to_string());
        }
        if let Some(year) = record.year() {
            years.insert(year);
        }
        if let Some(taxonomy) = record.taxonomy() {
            taxonomies.insert(taxonomy.to_string());
        }
    }

    FacetValues {
        categories: categories.into_iter().collect(),
        years: years.into_iter().rev().collect(),
        taxonomies: taxonomies.into_iter().collect(),
    }
}
