//! Backend query configuration
//!
//! Describes filters, population, sort order, pagination and field
//! selection, and serializes them into the bracketed query-string
//! convention of the content backend:
//!
//! ```text
//! filters[slug][$eq]=nlp&populate[0]=photo&sort[0]=name:asc&pagination[pageSize]=25
//! ```
//!
//! Operators are passed through as plain keys; rejecting invalid queries is
//! the backend's job.

mod qs;

pub use qs::QsValue;

use std::collections::BTreeMap;

/// Filters keyed by field (or operator) name
pub type FilterTree = BTreeMap<String, FilterNode>;

/// A node in a nested filter expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterNode {
    /// Operand, e.g. the `nlp` in `[slug][$eq]=nlp`
    Value(String),
    /// Field, relation or operator keys below this point
    Branch(FilterTree),
    /// Operand list, for `$in`, `$or`, `$and`
    List(Vec<FilterNode>),
}

impl FilterNode {
    /// `{ op: value }`
    pub fn op(operator: &str, value: impl ToString) -> Self {
        let mut tree = FilterTree::new();
        tree.insert(operator.to_string(), FilterNode::Value(value.to_string()));
        FilterNode::Branch(tree)
    }

    pub fn eq(value: impl ToString) -> Self {
        Self::op("$eq", value)
    }

    /// Case-insensitive substring match
    pub fn contains(value: impl ToString) -> Self {
        Self::op("$containsi", value)
    }

    /// `{ $in: [values...] }`
    pub fn any_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let list = values
            .into_iter()
            .map(|v| FilterNode::Value(v.to_string()))
            .collect();
        let mut tree = FilterTree::new();
        tree.insert("$in".to_string(), FilterNode::List(list));
        FilterNode::Branch(tree)
    }

    /// Drop branches and lists that would encode to nothing
    fn prune(self) -> Option<Self> {
        match self {
            FilterNode::Value(value) => Some(FilterNode::Value(value)),
            FilterNode::Branch(tree) => {
                let tree: FilterTree = tree
                    .into_iter()
                    .filter_map(|(key, node)| node.prune().map(|node| (key, node)))
                    .collect();
                (!tree.is_empty()).then_some(FilterNode::Branch(tree))
            }
            FilterNode::List(items) => {
                let items: Vec<FilterNode> = items.into_iter().filter_map(FilterNode::prune).collect();
                (!items.is_empty()).then_some(FilterNode::List(items))
            }
        }
    }

    fn to_qs(&self) -> QsValue {
        match self {
            FilterNode::Value(value) => QsValue::Leaf(value.clone()),
            FilterNode::Branch(tree) => QsValue::Map(
                tree.iter().map(|(key, node)| (key.clone(), node.to_qs())).collect(),
            ),
            FilterNode::List(items) => QsValue::List(items.iter().map(FilterNode::to_qs).collect()),
        }
    }

    fn from_qs(value: &QsValue) -> Self {
        match value {
            QsValue::Leaf(value) => FilterNode::Value(value.clone()),
            QsValue::Map(children) => FilterNode::Branch(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), FilterNode::from_qs(child)))
                    .collect(),
            ),
            QsValue::List(items) => FilterNode::List(items.iter().map(FilterNode::from_qs).collect()),
        }
    }

    /// Merge `other` into `self`; branches merge key by key, anything else is replaced
    fn merge(&mut self, other: FilterNode) {
        match (self, other) {
            (FilterNode::Branch(mine), FilterNode::Branch(theirs)) => {
                for (key, node) in theirs {
                    match mine.get_mut(&key) {
                        Some(existing) => existing.merge(node),
                        None => {
                            mine.insert(key, node);
                        }
                    }
                }
            }
            (slot, other) => *slot = other,
        }
    }
}

/// Which relations and media the backend should include
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Populate {
    /// `populate=*`: every first-level relation
    All,
    /// `populate[0]=a&populate[1]=b`
    Fields(Vec<String>),
    /// Per-relation settings, e.g. `populate[team][populate][0]=photo`
    Nested(BTreeMap<String, PopulateNode>),
}

/// Settings for one populated relation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PopulateNode {
    pub fields: Vec<String>,
    pub populate: Option<Box<Populate>>,
}

impl PopulateNode {
    /// Populate the relation with the given nested population
    pub fn with(populate: Populate) -> Self {
        Self {
            fields: Vec::new(),
            populate: Some(Box::new(populate)),
        }
    }

    fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.populate.as_deref().map_or(true, Populate::is_empty)
    }
}

impl Populate {
    /// `Populate::Fields` from string slices
    pub fn fields(names: &[&str]) -> Self {
        Populate::Fields(names.iter().map(|n| n.to_string()).collect())
    }

    /// Start an empty nested populate tree
    pub fn nested() -> Self {
        Populate::Nested(BTreeMap::new())
    }

    /// Add a relation to a nested tree (converting `Fields` if needed)
    pub fn relation(self, name: &str, node: PopulateNode) -> Self {
        let mut tree = match self {
            Populate::Nested(tree) => tree,
            Populate::Fields(names) => names
                .into_iter()
                .map(|n| (n, PopulateNode::default()))
                .collect(),
            Populate::All => BTreeMap::new(),
        };
        tree.insert(name.to_string(), node);
        Populate::Nested(tree)
    }

    fn is_empty(&self) -> bool {
        match self {
            Populate::All => false,
            Populate::Fields(names) => names.is_empty(),
            Populate::Nested(tree) => tree.is_empty(),
        }
    }

    fn to_qs(&self) -> QsValue {
        match self {
            Populate::All => QsValue::Leaf("*".to_string()),
            Populate::Fields(names) => {
                QsValue::List(names.iter().map(|n| QsValue::Leaf(n.clone())).collect())
            }
            Populate::Nested(tree) => QsValue::Map(
                tree.iter()
                    .map(|(name, node)| (name.clone(), node_to_qs(node)))
                    .collect(),
            ),
        }
    }

    fn from_qs(value: &QsValue) -> Option<Self> {
        match value {
            QsValue::Leaf(raw) if raw == "*" => Some(Populate::All),
            QsValue::Leaf(raw) => Some(Populate::Fields(split_list(raw))),
            QsValue::List(items) => Some(Populate::Fields(
                items.iter().filter_map(|i| i.as_leaf().map(String::from)).collect(),
            )),
            QsValue::Map(children) => Some(Populate::Nested(
                children
                    .iter()
                    .map(|(name, child)| (name.clone(), node_from_qs(child)))
                    .collect(),
            )),
        }
    }
}

fn node_to_qs(node: &PopulateNode) -> QsValue {
    if node.is_empty() {
        return QsValue::Leaf("true".to_string());
    }

    let mut children = BTreeMap::new();
    if !node.fields.is_empty() {
        children.insert(
            "fields".to_string(),
            QsValue::List(node.fields.iter().map(|f| QsValue::Leaf(f.clone())).collect()),
        );
    }
    if let Some(populate) = node.populate.as_deref().filter(|p| !p.is_empty()) {
        children.insert("populate".to_string(), populate.to_qs());
    }
    QsValue::Map(children)
}

fn node_from_qs(value: &QsValue) -> PopulateNode {
    let Some(children) = value.as_map() else {
        return PopulateNode::default();
    };

    PopulateNode {
        fields: children.get("fields").map(leaf_list).unwrap_or_default(),
        populate: children
            .get("populate")
            .and_then(Populate::from_qs)
            .map(Box::new),
    }
}

/// Page-based or offset-based pagination
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pagination {
    Page { page: u32, page_size: u32 },
    Offset { start: u32, limit: u32 },
}

const DEFAULT_BACKEND_PAGE_SIZE: u32 = 25;

impl Pagination {
    fn to_qs(self) -> QsValue {
        let mut map = BTreeMap::new();
        match self {
            Pagination::Page { page, page_size } => {
                map.insert("page".to_string(), QsValue::Leaf(page.to_string()));
                map.insert("pageSize".to_string(), QsValue::Leaf(page_size.to_string()));
            }
            Pagination::Offset { start, limit } => {
                map.insert("start".to_string(), QsValue::Leaf(start.to_string()));
                map.insert("limit".to_string(), QsValue::Leaf(limit.to_string()));
            }
        }
        QsValue::Map(map)
    }

    fn from_qs(value: &QsValue) -> Option<Self> {
        let map = value.as_map()?;
        let number = |key: &str| map.get(key).and_then(QsValue::as_leaf).and_then(|v| v.parse().ok());

        if map.contains_key("page") || map.contains_key("pageSize") {
            return Some(Pagination::Page {
                page: number("page").unwrap_or(1),
                page_size: number("pageSize").unwrap_or(DEFAULT_BACKEND_PAGE_SIZE),
            });
        }
        if map.contains_key("start") || map.contains_key("limit") {
            return Some(Pagination::Offset {
                start: number("start").unwrap_or(0),
                limit: number("limit").unwrap_or(DEFAULT_BACKEND_PAGE_SIZE),
            });
        }
        None
    }
}

/// A complete request description for one backend call
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryConfig {
    pub filters: FilterTree,
    pub populate: Option<Populate>,
    /// `field:asc` / `field:desc`, in priority order
    pub sort: Vec<String>,
    pub pagination: Option<Pagination>,
    /// Restrict returned scalar attributes
    pub fields: Vec<String>,
}

impl QueryConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter at a dotted path, e.g. `("researchLine.slug", FilterNode::eq("nlp"))`
    ///
    /// Filters at the same path merge; conflicting operands are replaced.
    /// A filter with no operands (e.g. an empty `$in`) is ignored.
    pub fn filter(mut self, path: &str, node: FilterNode) -> Self {
        let Some(node) = node.prune() else {
            return self;
        };
        let mut segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
        let Some(first) = segments.first().copied() else {
            return self;
        };
        segments.remove(0);

        let node = segments.iter().rev().fold(node, |inner, segment| {
            let mut tree = FilterTree::new();
            tree.insert(segment.to_string(), inner);
            FilterNode::Branch(tree)
        });

        match self.filters.get_mut(first) {
            Some(existing) => existing.merge(node),
            None => {
                self.filters.insert(first.to_string(), node);
            }
        }
        self
    }

    /// Shorthand for an `$eq` filter
    pub fn filter_eq(self, path: &str, value: impl ToString) -> Self {
        self.filter(path, FilterNode::eq(value))
    }

    /// Match records satisfying any of the given filter trees (`$or`)
    pub fn filter_any(mut self, alternatives: Vec<FilterTree>) -> Self {
        let list = alternatives.into_iter().map(FilterNode::Branch).collect();
        if let Some(node) = FilterNode::List(list).prune() {
            self.filters.insert("$or".to_string(), node);
        }
        self
    }

    pub fn populate(mut self, populate: Populate) -> Self {
        self.populate = Some(populate);
        self
    }

    pub fn sort(mut self, keys: &[&str]) -> Self {
        self.sort = keys.iter().map(|k| k.to_string()).collect();
        self
    }

    pub fn page(mut self, page: u32, page_size: u32) -> Self {
        self.pagination = Some(Pagination::Page { page, page_size });
        self
    }

    /// First `limit` records
    pub fn limit(mut self, limit: u32) -> Self {
        self.pagination = Some(Pagination::Offset { start: 0, limit });
        self
    }

    pub fn fields(mut self, names: &[&str]) -> Self {
        self.fields = names.iter().map(|n| n.to_string()).collect();
        self
    }

    /// Layer caller overrides over type defaults
    ///
    /// Filters merge per top-level key with the override winning; sort is
    /// replaced when the override has one; populate, pagination and fields
    /// are replaced when set.
    pub fn merge(mut self, overrides: QueryConfig) -> Self {
        for (key, node) in overrides.filters {
            self.filters.insert(key, node);
        }
        if !overrides.sort.is_empty() {
            self.sort = overrides.sort;
        }
        if overrides.populate.is_some() {
            self.populate = overrides.populate;
        }
        if overrides.pagination.is_some() {
            self.pagination = overrides.pagination;
        }
        if !overrides.fields.is_empty() {
            self.fields = overrides.fields;
        }
        self
    }

    /// True when the config adds nothing to the request
    pub fn is_empty(&self) -> bool {
        self.to_query_string().is_empty()
    }

    /// Serialize to the backend's query-string format (without leading `?`)
    pub fn to_query_string(&self) -> String {
        let mut entries: Vec<(&str, QsValue)> = Vec::new();

        if !self.filters.is_empty() {
            entries.push((
                "filters",
                QsValue::Map(
                    self.filters.iter().map(|(k, v)| (k.clone(), v.to_qs())).collect(),
                ),
            ));
        }
        if let Some(populate) = self.populate.as_ref().filter(|p| !p.is_empty()) {
            entries.push(("populate", populate.to_qs()));
        }
        if !self.sort.is_empty() {
            entries.push((
                "sort",
                QsValue::List(self.sort.iter().map(|s| QsValue::Leaf(s.clone())).collect()),
            ));
        }
        if let Some(pagination) = self.pagination {
            entries.push(("pagination", pagination.to_qs()));
        }
        if !self.fields.is_empty() {
            entries.push((
                "fields",
                QsValue::List(self.fields.iter().map(|f| QsValue::Leaf(f.clone())).collect()),
            ));
        }

        qs::encode(&entries)
    }

    /// Parse a query string produced by [`QueryConfig::to_query_string`]
    ///
    /// Unknown top-level keys are ignored.
    pub fn parse(query: &str) -> Self {
        let decoded = qs::decode(query);
        let mut config = QueryConfig::new();

        if let Some(QsValue::Map(filters)) = decoded.get("filters") {
            config.filters = filters
                .iter()
                .map(|(key, value)| (key.clone(), FilterNode::from_qs(value)))
                .collect();
        }
        config.populate = decoded.get("populate").and_then(Populate::from_qs);
        config.sort = decoded.get("sort").map(leaf_list).unwrap_or_default();
        config.pagination = decoded.get("pagination").and_then(Pagination::from_qs);
        config.fields = decoded.get("fields").map(leaf_list).unwrap_or_default();

        config
    }
}

/// Read a list-ish value: a list of leaves or one comma-separated leaf
fn leaf_list(value: &QsValue) -> Vec<String> {
    match value {
        QsValue::Leaf(raw) => split_list(raw),
        QsValue::List(items) => items.iter().filter_map(|i| i.as_leaf().map(String::from)).collect(),
        QsValue::Map(_) => Vec::new(),
    }
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decoded(config: &QueryConfig) -> String {
        let encoded = config.to_query_string();
        form_urlencoded::parse(encoded.as_bytes())
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join("&")
    }

    #[test]
    fn test_empty_config_is_empty_string() {
        let config = QueryConfig::new();
        assert_eq!(config.to_query_string(), "");
        assert!(config.is_empty());
    }

    #[test]
    fn test_slug_filter_serialization() {
        let config = QueryConfig::new().filter_eq("slug", "machine-learning");
        assert_eq!(decoded(&config), "filters[slug][$eq]=machine-learning");
    }

    #[test]
    fn test_relation_filter_serialization() {
        let config = QueryConfig::new()
            .filter("researchLine.slug", FilterNode::eq("nlp"))
            .filter("year", FilterNode::op("$gte", 2020))
            .filter("year", FilterNode::op("$lte", 2024));

        assert_eq!(
            decoded(&config),
            "filters[researchLine][slug][$eq]=nlp&filters[year][$gte]=2020&filters[year][$lte]=2024"
        );
    }

    #[test]
    fn test_full_config_serialization() {
        let config = QueryConfig::new()
            .populate(
                Populate::nested()
                    .relation("coordinator", PopulateNode::with(Populate::fields(&["photo"])))
                    .relation("coverImage", PopulateNode::default()),
            )
            .sort(&["startDate:desc"])
            .page(2, 10)
            .fields(&["title", "slug"]);

        assert_eq!(
            decoded(&config),
            "populate[coordinator][populate][0]=photo&populate[coverImage]=true\
             &sort[0]=startDate:desc&pagination[page]=2&pagination[pageSize]=10\
             &fields[0]=title&fields[1]=slug"
        );
    }

    #[test]
    fn test_wildcard_populate() {
        let config = QueryConfig::new().populate(Populate::All);
        assert_eq!(config.to_query_string(), "populate=*");
    }

    #[test]
    fn test_omitted_keys_absent() {
        let config = QueryConfig::new()
            .populate(Populate::Fields(vec![]))
            .sort(&[]);
        assert_eq!(config.to_query_string(), "");
    }

    #[test]
    fn test_unknown_operator_passes_through() {
        let config = QueryConfig::new().filter("title", FilterNode::op("$bogus", "x"));
        assert_eq!(decoded(&config), "filters[title][$bogus]=x");
    }

    #[test]
    fn test_round_trip_full_config() {
        let mut alt_a = FilterTree::new();
        alt_a.insert("title".to_string(), FilterNode::contains("graph, networks"));
        let mut alt_b = FilterTree::new();
        alt_b.insert("authors".to_string(), FilterNode::contains("Silva & Souza"));

        let config = QueryConfig::new()
            .filter("researchLine.slug", FilterNode::eq("nlp"))
            .filter("id", FilterNode::any_of([3, 5, 8]))
            .filter_any(vec![alt_a, alt_b])
            .populate(
                Populate::nested()
                    .relation("authorRecords", PopulateNode {
                        fields: vec!["name".to_string(), "slug".to_string()],
                        populate: Some(Box::new(Populate::fields(&["photo"]))),
                    })
                    .relation("researchLine", PopulateNode::default()),
            )
            .sort(&["year:desc", "title:asc"])
            .limit(50)
            .fields(&["title", "year"]);

        let parsed = QueryConfig::parse(&config.to_query_string());
        assert_eq!(parsed, config);
    }

    #[test]
    fn test_empty_filters_are_ignored() {
        let mut empty_branch = FilterTree::new();
        empty_branch.insert("title".to_string(), FilterNode::Branch(FilterTree::new()));

        let config = QueryConfig::new()
            .filter("id", FilterNode::any_of(Vec::<u32>::new()))
            .filter_any(vec![FilterTree::new(), empty_branch])
            .filter_eq("slug", "x");

        assert_eq!(config.filters.len(), 1);
        assert_eq!(decoded(&config), "filters[slug][$eq]=x");
        assert_eq!(QueryConfig::parse(&config.to_query_string()), config);
    }

    #[test]
    fn test_round_trip_wildcard_and_page() {
        let config = QueryConfig::new().populate(Populate::All).page(3, 12);
        assert_eq!(QueryConfig::parse(&config.to_query_string()), config);
    }

    #[test]
    fn test_parse_comma_separated_forms() {
        let parsed = QueryConfig::parse("?populate=photo,projects&sort=name:asc,order:desc");
        assert_eq!(parsed.populate, Some(Populate::fields(&["photo", "projects"])));
        assert_eq!(parsed.sort, vec!["name:asc", "order:desc"]);
    }

    #[test]
    fn test_merge_overrides() {
        let defaults = QueryConfig::new()
            .filter_eq("featured", true)
            .populate(Populate::fields(&["coverImage"]))
            .sort(&["publishDate:desc"]);

        let overrides = QueryConfig::new()
            .filter_eq("category.slug", "events")
            .limit(3);

        let merged = defaults.merge(overrides);
        assert_eq!(merged.filters.len(), 2);
        assert_eq!(merged.sort, vec!["publishDate:desc"]);
        assert_eq!(merged.pagination, Some(Pagination::Offset { start: 0, limit: 3 }));
        assert_eq!(merged.populate, Some(Populate::fields(&["coverImage"])));
    }

    #[test]
    fn test_merge_override_replaces_same_filter_key() {
        let defaults = QueryConfig::new().filter_eq("featured", true);
        let merged = defaults.merge(QueryConfig::new().filter_eq("featured", false));
        assert_eq!(merged.filters["featured"], FilterNode::eq(false));
    }
}
