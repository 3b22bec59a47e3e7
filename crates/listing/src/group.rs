//! Grouping for sectioned lists (publications by year, alumni by degree)

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

/// Records sharing one key, in input order
#[derive(Debug, Clone, PartialEq)]
pub struct Group<'a, K, T> {
    pub key: K,
    pub items: Vec<&'a T>,
}

impl<K, T> Group<'_, K, T> {
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// Bucket records by `key_fn` in one pass, groups ordered by key
pub fn group_by<'a, T, K, F, I>(records: I, key_fn: F, order: SortOrder) -> Vec<Group<'a, K, T>>
where
    I: IntoIterator<Item = &'a T>,
    T: 'a,
    K: Ord,
    F: Fn(&T) -> K,
{
    let mut buckets: BTreeMap<K, Vec<&'a T>> = BTreeMap::new();
    for record in records {
        buckets.entry(key_fn(record)).or_default().push(record);
    }

    let groups = buckets.into_iter().map(|(key, items)| Group { key, items });
    match order {
        SortOrder::Ascending => groups.collect(),
        SortOrder::Descending => groups.rev().collect(),
    }
}
