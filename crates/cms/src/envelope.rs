//! Wire representation of backend responses
//!
//! The backend wraps every entity as `{ id, attributes: {...} }` and every
//! relation or media field as `{ data: <entity | [entity] | null> }`. These
//! types make each shape explicit so the flattener can be a total function
//! over them instead of probing JSON ad hoc.

use labsite_common::errors::{AppError, Result};
use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Top level `{ data, meta }` body
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub data: ResponseData,
    pub meta: ResponseMeta,
}

/// What `data` held at the top level
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseData {
    Null,
    One(Envelope),
    Many(Vec<Envelope>),
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct ResponseMeta {
    #[serde(default)]
    pub pagination: Option<PaginationMeta>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationMeta {
    #[serde(default)]
    pub page: Option<u32>,
    #[serde(default)]
    pub page_size: Option<u32>,
    #[serde(default)]
    pub page_count: Option<u32>,
    #[serde(default)]
    pub total: Option<u64>,
}

/// One entity: identifier plus classified attributes
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub id: u64,
    pub attributes: BTreeMap<String, Attribute>,
}

/// A single attribute of an entity or component
#[derive(Debug, Clone, PartialEq)]
pub enum Attribute {
    /// Text, numbers, dates, booleans, plain arrays
    Scalar(Value),
    /// Embedded structured value, walked for nested media and relations
    Component(Component),
    Relation(RelationData),
    Media(MediaData),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Component {
    Object(BTreeMap<String, Attribute>),
    List(Vec<BTreeMap<String, Attribute>>),
}

/// Contents of a relation wrapper
///
/// `{ data: null }` cannot be told apart from an empty media field and is
/// always read as a null relation; both flatten to `null`.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationData {
    Null,
    One(Box<Envelope>),
    Many(Vec<Envelope>),
}

#[derive(Debug, Clone, PartialEq)]
pub enum MediaData {
    One(MediaEnvelope),
    Many(Vec<MediaEnvelope>),
}

/// An uploaded file as the backend describes it
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MediaEnvelope {
    #[serde(default)]
    pub id: Option<u64>,
    pub url: String,
    #[serde(default)]
    pub alternative_text: Option<String>,
    #[serde(default)]
    pub caption: Option<String>,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default)]
    pub mime: Option<String>,
    #[serde(default)]
    pub formats: Option<BTreeMap<String, MediaFormatEnvelope>>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct MediaFormatEnvelope {
    pub url: String,
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub height: Option<u32>,
}

impl ResponseEnvelope {
    /// Classify a parsed response body
    ///
    /// Fails when `data` is missing or any entity lacks `id`/`attributes`.
    pub fn parse(body: &Value) -> Result<Self> {
        let object = body
            .as_object()
            .ok_or_else(|| AppError::malformed(format!("expected a JSON object, got {}", kind(body))))?;

        let data = object
            .get("data")
            .ok_or_else(|| AppError::malformed("response has no `data` key"))?;

        let data = match data {
            Value::Null => ResponseData::Null,
            Value::Array(items) => ResponseData::Many(
                items.iter().map(Envelope::parse).collect::<Result<Vec<_>>>()?,
            ),
            Value::Object(_) => ResponseData::One(Envelope::parse(data)?),
            other => {
                return Err(AppError::malformed(format!(
                    "`data` must be an object, array or null, got {}",
                    kind(other)
                )))
            }
        };

        let meta = match object.get("meta") {
            Some(meta) if !meta.is_null() => {
                serde_json::from_value(meta.clone()).map_err(|e| AppError::malformed(format!("invalid `meta`: {}", e)))?
            }
            _ => ResponseMeta::default(),
        };

        Ok(Self { data, meta })
    }

    /// Total number of pages reported by the backend, if any
    pub fn page_count(&self) -> Option<u32> {
        self.meta.pagination.and_then(|p| p.page_count)
    }
}

impl Envelope {
    /// Parse a `{ id, attributes }` entity
    pub fn parse(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| AppError::malformed(format!("entity must be an object, got {}", kind(value))))?;

        let id = object
            .get("id")
            .and_then(Value::as_u64)
            .ok_or_else(|| AppError::malformed("entity has no numeric `id`"))?;

        let attributes = object
            .get("attributes")
            .and_then(Value::as_object)
            .ok_or_else(|| AppError::malformed(format!("entity {} has no `attributes` object", id)))?;

        Ok(Self {
            id,
            attributes: parse_attributes(attributes)?,
        })
    }
}

fn parse_attributes(object: &Map<String, Value>) -> Result<BTreeMap<String, Attribute>> {
    object
        .iter()
        .map(|(key, value)| Ok((key.clone(), Attribute::parse(value)?)))
        .collect()
}

impl Attribute {
    /// Classify one attribute value
    pub fn parse(value: &Value) -> Result<Self> {
        match value {
            Value::Object(object) if is_wrapper(object) => {
                let data = object.get("data").unwrap_or(&Value::Null);
                parse_wrapped(data)
            }
            Value::Object(object) => Ok(Attribute::Component(Component::Object(parse_attributes(object)?))),
            Value::Array(items) if !items.is_empty() && items.iter().all(Value::is_object) => {
                let entries = items
                    .iter()
                    .filter_map(Value::as_object)
                    .map(parse_attributes)
                    .collect::<Result<Vec<_>>>()?;
                Ok(Attribute::Component(Component::List(entries)))
            }
            other => Ok(Attribute::Scalar(other.clone())),
        }
    }
}

/// `{ data }` or `{ data, meta }` and nothing else
fn is_wrapper(object: &Map<String, Value>) -> bool {
    object.contains_key("data") && object.keys().all(|k| k == "data" || k == "meta")
}

fn parse_wrapped(data: &Value) -> Result<Attribute> {
    match data {
        Value::Null => Ok(Attribute::Relation(RelationData::Null)),
        Value::Object(_) if is_media(data) => Ok(Attribute::Media(MediaData::One(parse_media(data)?))),
        Value::Object(_) => Ok(Attribute::Relation(RelationData::One(Box::new(Envelope::parse(data)?)))),
        Value::Array(items) if !items.is_empty() && items.iter().all(is_media) => {
            let media = items.iter().map(parse_media).collect::<Result<Vec<_>>>()?;
            Ok(Attribute::Media(MediaData::Many(media)))
        }
        Value::Array(items) => {
            let related = items.iter().map(Envelope::parse).collect::<Result<Vec<_>>>()?;
            Ok(Attribute::Relation(RelationData::Many(related)))
        }
        other => Err(AppError::malformed(format!(
            "relation `data` must be an object, array or null, got {}",
            kind(other)
        ))),
    }
}

/// Attributes only upload entities carry next to `url`
const UPLOAD_MARKERS: [&str; 6] = ["mime", "hash", "ext", "width", "formats", "provider"];

/// Upload entities carry a string `url` plus at least one upload marker
fn is_media(value: &Value) -> bool {
    value
        .get("attributes")
        .and_then(Value::as_object)
        .map(|attrs| {
            attrs.get("url").map_or(false, Value::is_string)
                && UPLOAD_MARKERS.iter().any(|marker| attrs.contains_key(*marker))
        })
        .unwrap_or(false)
}

fn parse_media(value: &Value) -> Result<MediaEnvelope> {
    let id = value.get("id").and_then(Value::as_u64);
    let attributes = value
        .get("attributes")
        .cloned()
        .ok_or_else(|| AppError::malformed("media entity has no `attributes`"))?;

    let mut media: MediaEnvelope = serde_json::from_value(attributes)
        .map_err(|e| AppError::malformed(format!("invalid media attributes: {}", e)))?;
    media.id = media.id.or(id);
    Ok(media)
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
