//! Bracketed nested query-string encoding
//!
//! Maps a tree of values onto `key[child][0]=value` pairs and back.
//! Keys and values are form-urlencoded; the tree itself does no validation.

use std::collections::BTreeMap;

/// One node of a nested query-string tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QsValue {
    Leaf(String),
    Map(BTreeMap<String, QsValue>),
    List(Vec<QsValue>),
}

impl QsValue {
    /// Push every `path=value` pair below this node onto `out`
    pub fn flatten_into(&self, prefix: &str, out: &mut Vec<(String, String)>) {
        match self {
            QsValue::Leaf(value) => out.push((prefix.to_string(), value.clone())),
            QsValue::Map(children) => {
                for (key, child) in children {
                    child.flatten_into(&format!("{}[{}]", prefix, key), out);
                }
            }
            QsValue::List(items) => {
                for (index, item) in items.iter().enumerate() {
                    item.flatten_into(&format!("{}[{}]", prefix, index), out);
                }
            }
        }
    }

    pub fn as_leaf(&self) -> Option<&str> {
        match self {
            QsValue::Leaf(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, QsValue>> {
        match self {
            QsValue::Map(children) => Some(children),
            _ => None,
        }
    }
}

/// Encode top-level `(name, tree)` entries into a query string
pub fn encode(entries: &[(&str, QsValue)]) -> String {
    let mut pairs = Vec::new();
    for (name, value) in entries {
        value.flatten_into(name, &mut pairs);
    }

    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in &pairs {
        serializer.append_pair(key, value);
    }
    serializer.finish()
}

/// Decode a query string into top-level trees keyed by name
///
/// A map whose keys are exactly `0..n` is read back as a list.
pub fn decode(query: &str) -> BTreeMap<String, QsValue> {
    let query = query.strip_prefix('?').unwrap_or(query);
    let mut root = RawNode::default();

    for (key, value) in form_urlencoded::parse(query.as_bytes()) {
        let segments = split_key(&key);
        root.insert(&segments, value.into_owned());
    }

    root.children
        .into_iter()
        .map(|(key, node)| (key, node.into_value()))
        .collect()
}

/// Split `a[b][c]` into `["a", "b", "c"]`; unbalanced keys stay whole
fn split_key(key: &str) -> Vec<String> {
    let Some(open) = key.find('[') else {
        return vec![key.to_string()];
    };

    let mut segments = vec![key[..open].to_string()];
    let mut rest = &key[open..];

    while let Some(stripped) = rest.strip_prefix('[') {
        match stripped.find(']') {
            Some(close) => {
                segments.push(stripped[..close].to_string());
                rest = &stripped[close + 1..];
            }
            None => return vec![key.to_string()],
        }
    }

    if !rest.is_empty() {
        return vec![key.to_string()];
    }

    segments
}

#[derive(Default)]
struct RawNode {
    leaf: Option<String>,
    children: BTreeMap<String, RawNode>,
}

impl RawNode {
    fn insert(&mut self, path: &[String], value: String) {
        match path.split_first() {
            None => self.leaf = Some(value),
            Some((head, tail)) => self
                .children
                .entry(head.clone())
                .or_default()
                .insert(tail, value),
        }
    }

    fn into_value(self) -> QsValue {
        if self.children.is_empty() {
            return QsValue::Leaf(self.leaf.unwrap_or_default());
        }

        let mut indexed: Vec<(usize, RawNode)> = Vec::with_capacity(self.children.len());
        let mut all_indices = true;
        for key in self.children.keys() {
            if key.is_empty() || !key.bytes().all(|b| b.is_ascii_digit()) {
                all_indices = false;
                break;
            }
        }

        if all_indices {
            for (key, node) in self.children {
                // digits only, checked above
                let index = key.parse::<usize>().unwrap_or(usize::MAX);
                indexed.push((index, node));
            }
            indexed.sort_by_key(|(index, _)| *index);

            let contiguous = indexed.iter().enumerate().all(|(i, (index, _))| i == *index);
            if contiguous {
                return QsValue::List(indexed.into_iter().map(|(_, node)| node.into_value()).collect());
            }

            return QsValue::Map(
                indexed
                    .into_iter()
                    .map(|(index, node)| (index.to_string(), node.into_value()))
                    .collect(),
            );
        }

        QsValue::Map(
            self.children
                .into_iter()
                .map(|(key, node)| (key, node.into_value()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(value: &str) -> QsValue {
        QsValue::Leaf(value.to_string())
    }

    #[test]
    fn test_split_key() {
        assert_eq!(split_key("sort"), vec!["sort"]);
        assert_eq!(split_key("filters[slug][$eq]"), vec!["filters", "slug", "$eq"]);
        assert_eq!(split_key("broken[key"), vec!["broken[key"]);
        assert_eq!(split_key("trailing[a]b"), vec!["trailing[a]b"]);
    }

    #[test]
    fn test_encode_nested_map_and_list() {
        let mut slug = BTreeMap::new();
        slug.insert("$eq".to_string(), leaf("deep learning"));
        let mut filters = BTreeMap::new();
        filters.insert("slug".to_string(), QsValue::Map(slug));

        let encoded = encode(&[
            ("filters", QsValue::Map(filters)),
            ("sort", QsValue::List(vec![leaf("year:desc"), leaf("title:asc")])),
        ]);

        assert_eq!(
            encoded,
            "filters%5Bslug%5D%5B%24eq%5D=deep+learning&sort%5B0%5D=year%3Adesc&sort%5B1%5D=title%3Aasc"
        );
    }

    #[test]
    fn test_decode_lists_and_maps() {
        let decoded = decode("sort[1]=b&sort[0]=a&pagination[page]=2&populate=*");

        assert_eq!(decoded["sort"], QsValue::List(vec![leaf("a"), leaf("b")]));
        assert_eq!(decoded["populate"], leaf("*"));
        let pagination = decoded["pagination"].as_map().unwrap();
        assert_eq!(pagination["page"], leaf("2"));
    }

    #[test]
    fn test_decode_sparse_indices_stay_map() {
        let decoded = decode("ids[0]=a&ids[2]=c");
        let ids = decoded["ids"].as_map().unwrap();
        assert_eq!(ids.len(), 2);
        assert_eq!(ids["2"], leaf("c"));
    }

    #[test]
    fn test_empty_containers_are_omitted() {
        let encoded = encode(&[
            ("filters", QsValue::Map(BTreeMap::new())),
            ("sort", QsValue::List(vec![])),
        ]);
        assert_eq!(encoded, "");
    }
}
