//! Envelope flattening
//!
//! Turns `{ id, attributes: { rel: { data: {...} } } }` into
//! `{ id, ..., rel: {...} }`. Relation expansion is bounded by an explicit
//! depth: depth 1 resolves direct relations and drops the related records'
//! own relation fields, which keeps cyclic graphs such as
//! publication -> author -> publication finite.

use crate::envelope::{
    Attribute, Component, Envelope, MediaData, MediaEnvelope, RelationData, ResponseData,
};
use crate::media::resolve_media_url;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use url::Url;

/// Relation depth used by list pages
pub const DEFAULT_DEPTH: usize = 1;

/// An entity with no wrapper envelope left
#[derive(Debug, Clone, PartialEq)]
pub struct FlatRecord {
    pub id: u64,
    pub fields: Map<String, Value>,
}

impl FlatRecord {
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// `{ "id": .., ...fields }`
    pub fn to_json(&self) -> Value {
        let mut object = self.fields.clone();
        object.insert("id".to_string(), Value::from(self.id));
        Value::Object(object)
    }
}

/// Flattened top-level `data`
#[derive(Debug, Clone, PartialEq)]
pub enum FlatData {
    Null,
    One(FlatRecord),
    Many(Vec<FlatRecord>),
}

impl FlatData {
    /// Records in backend order; `Null` is empty
    pub fn into_records(self) -> Vec<FlatRecord> {
        match self {
            FlatData::Null => Vec::new(),
            FlatData::One(record) => vec![record],
            FlatData::Many(records) => records,
        }
    }
}

/// Pure envelope-to-record converter
#[derive(Debug, Clone)]
pub struct Flattener {
    base_url: Url,
    depth: usize,
}

impl Flattener {
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url,
            depth: DEFAULT_DEPTH,
        }
    }

    /// Number of relation hops to resolve
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn flatten_data(&self, data: &ResponseData) -> FlatData {
        match data {
            ResponseData::Null => FlatData::Null,
            ResponseData::One(entity) => FlatData::One(self.flatten(entity)),
            ResponseData::Many(entities) => {
                FlatData::Many(entities.iter().map(|e| self.flatten(e)).collect())
            }
        }
    }

    pub fn flatten(&self, entity: &Envelope) -> FlatRecord {
        self.flatten_at(entity, self.depth)
    }

    fn flatten_at(&self, entity: &Envelope, depth: usize) -> FlatRecord {
        FlatRecord {
            id: entity.id,
            fields: self.flatten_attributes(&entity.attributes, depth),
        }
    }

    fn flatten_attributes(&self, attributes: &BTreeMap<String, Attribute>, depth: usize) -> Map<String, Value> {
        let mut fields = Map::new();
        for (name, attribute) in attributes {
            if let Some(value) = self.flatten_attribute(attribute, depth) {
                fields.insert(name.clone(), value);
            }
        }
        fields
    }

    /// `None` drops the field (relations past the depth limit)
    fn flatten_attribute(&self, attribute: &Attribute, depth: usize) -> Option<Value> {
        match attribute {
            Attribute::Scalar(value) => Some(value.clone()),
            Attribute::Component(Component::Object(fields)) => {
                Some(Value::Object(self.flatten_attributes(fields, depth)))
            }
            Attribute::Component(Component::List(entries)) => Some(Value::Array(
                entries
                    .iter()
                    .map(|fields| Value::Object(self.flatten_attributes(fields, depth)))
                    .collect(),
            )),
            Attribute::Media(MediaData::One(media)) => Some(self.flatten_media(media)),
            Attribute::Media(MediaData::Many(media)) => {
                Some(Value::Array(media.iter().map(|m| self.flatten_media(m)).collect()))
            }
            Attribute::Relation(_) if depth == 0 => None,
            Attribute::Relation(RelationData::Null) => Some(Value::Null),
            Attribute::Relation(RelationData::One(entity)) => {
                Some(self.flatten_at(entity, depth - 1).to_json())
            }
            Attribute::Relation(RelationData::Many(entities)) => Some(Value::Array(
                entities
                    .iter()
                    .map(|e| self.flatten_at(e, depth - 1).to_json())
                    .collect(),
            )),
        }
    }

    fn flatten_media(&self, media: &MediaEnvelope) -> Value {
        let mut object = Map::new();
        if let Some(id) = media.id {
            object.insert("id".to_string(), Value::from(id));
        }
        object.insert("url".to_string(), Value::from(resolve_media_url(&self.base_url, &media.url)));
        object.insert("alternativeText".to_string(), optional(media.alternative_text.clone()));
        object.insert("caption".to_string(), optional(media.caption.clone()));
        object.insert("width".to_string(), optional(media.width));
        object.insert("height".to_string(), optional(media.height));
        object.insert("mime".to_string(), optional(media.mime.clone()));

        if let Some(formats) = &media.formats {
            let formats: Map<String, Value> = formats
                .iter()
                .map(|(name, format)| {
                    let mut entry = Map::new();
                    entry.insert("url".to_string(), Value::from(resolve_media_url(&self.base_url, &format.url)));
                    entry.insert("width".to_string(), optional(format.width));
                    entry.insert("height".to_string(), optional(format.height));
                    (name.clone(), Value::Object(entry))
                })
                .collect();
            object.insert("formats".to_string(), Value::Object(formats));
        }

        Value::Object(object)
    }
}

fn optional<T: Into<Value>>(value: Option<T>) -> Value {
    value.map(Into::into).unwrap_or(Value::Null)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::ResponseEnvelope;
    use serde_json::json;

    fn flattener() -> Flattener {
        Flattener::new(Url::parse("http://localhost:1337").unwrap())
    }

    fn envelope(value: Value) -> Envelope {
        Envelope::parse(&value).unwrap()
    }

    fn contains_envelope_keys(value: &Value) -> bool {
        match value {
            Value::Object(object) => {
                object.contains_key("attributes")
                    || object.contains_key("data")
                    || object.values().any(contains_envelope_keys)
            }
            Value::Array(items) => items.iter().any(contains_envelope_keys),
            _ => false,
        }
    }

    #[test]
    fn test_null_and_empty_relations_stay_distinct() {
        let record = flattener().flatten(&envelope(json!({
            "id": 1,
            "attributes": {
                "coordinator": { "data": null },
                "team": { "data": [] }
            }
        })));

        assert_eq!(record.get("coordinator"), Some(&Value::Null));
        assert_eq!(record.get("team"), Some(&json!([])));
    }

    #[test]
    fn test_absent_fields_stay_absent() {
        let record = flattener().flatten(&envelope(json!({ "id": 4, "attributes": { "title": "x" } })));
        assert!(record.get("coverImage").is_none());
        assert_eq!(record.to_json(), json!({ "id": 4, "title": "x" }));
    }

    #[test]
    fn test_relation_flattened_one_level() {
        let record = flattener().flatten(&envelope(json!({
            "id": 10,
            "attributes": {
                "title": "Attention Is All You Need",
                "authorRecords": { "data": [{
                    "id": 3,
                    "attributes": {
                        "name": "Ana Souza",
                        "publications": { "data": [{ "id": 10, "attributes": { "title": "loop" } }] },
                        "photo": { "data": { "id": 8, "attributes": { "url": "/uploads/ana.jpg", "mime": "image/jpeg", "width": 200, "height": 200 } } }
                    }
                }] }
            }
        })));

        let json = record.to_json();
        let author = &json["authorRecords"][0];
        assert_eq!(author["id"], 3);
        assert_eq!(author["name"], "Ana Souza");
        // nested relation dropped at depth 1, media kept
        assert!(author.get("publications").is_none());
        assert_eq!(author["photo"]["url"], "http://localhost:1337/uploads/ana.jpg");
        assert!(!contains_envelope_keys(&json));
    }

    #[test]
    fn test_depth_two_keeps_second_level() {
        let entity = envelope(json!({
            "id": 1,
            "attributes": {
                "projects": { "data": [{
                    "id": 2,
                    "attributes": {
                        "title": "P",
                        "researchLines": { "data": [{ "id": 5, "attributes": { "title": "NLP", "projects": { "data": [] } } }] }
                    }
                }] }
            }
        }));

        let json = flattener().depth(2).flatten(&entity).to_json();
        let line = &json["projects"][0]["researchLines"][0];
        assert_eq!(line["title"], "NLP");
        assert!(line.get("projects").is_none());
    }

    #[test]
    fn test_depth_zero_drops_relations() {
        let json = flattener()
            .depth(0)
            .flatten(&envelope(json!({
                "id": 1,
                "attributes": { "title": "t", "researchLine": { "data": null } }
            })))
            .to_json();
        assert_eq!(json, json!({ "id": 1, "title": "t" }));
    }

    #[test]
    fn test_upload_without_mime_is_media() {
        let entity = envelope(json!({
            "id": 1,
            "attributes": {
                "name": "Ana",
                "photo": { "data": { "id": 2, "attributes": { "url": "/uploads/a.png", "width": 10, "height": 10 } } }
            }
        }));

        let json = flattener().depth(1).flatten(&entity).to_json();
        assert_eq!(json["photo"]["url"], "http://localhost:1337/uploads/a.png");

        let json = flattener().depth(0).flatten(&entity).to_json();
        assert_eq!(json["photo"]["url"], "http://localhost:1337/uploads/a.png");
    }

    #[test]
    fn test_component_media_resolved() {
        let json = flattener()
            .flatten(&envelope(json!({
                "id": 1,
                "attributes": {
                    "seo": {
                        "id": 2,
                        "metaTitle": "Home",
                        "shareImage": { "data": { "id": 3, "attributes": {
                            "url": "/uploads/share.png",
                            "mime": "image/png",
                            "formats": { "thumbnail": { "url": "/uploads/thumb_share.png", "width": 156, "height": 82 } }
                        } } }
                    }
                }
            })))
            .to_json();

        assert_eq!(json["seo"]["metaTitle"], "Home");
        assert_eq!(json["seo"]["shareImage"]["url"], "http://localhost:1337/uploads/share.png");
        assert_eq!(
            json["seo"]["shareImage"]["formats"]["thumbnail"]["url"],
            "http://localhost:1337/uploads/thumb_share.png"
        );
    }

    #[test]
    fn test_flatten_does_not_mutate_input() {
        let body = json!({ "data": { "id": 1, "attributes": { "line": { "data": { "id": 2, "attributes": {} } } } } });
        let response = ResponseEnvelope::parse(&body).unwrap();
        let before = response.clone();

        let first = flattener().flatten_data(&response.data);
        let second = flattener().flatten_data(&response.data);

        assert_eq!(response, before);
        assert_eq!(first, second);
    }
}
