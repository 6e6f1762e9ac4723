use std::collections::BTreeMap;
use std::fmt::{self, Display};

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde_json::Value as JsonValue;
use thiserror::Error;

use crate::path;

/// A record document as ingested from the catalog.
///
/// Objects are kept in a `BTreeMap` so that iteration order, and therefore
/// every flattened view derived from a tree, is deterministic. Numbers keep
/// the integer / float split from the wire: `Int` when the literal fits an
/// `i64`, `Number` otherwise.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Object(BTreeMap<String, Node>),
    Array(Vec<Node>),
    Text(String),
    Int(i64),
    Number(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Null,
}

/// Discriminant of a [`Node`], used in diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Object,
    Array,
    Text,
    Int,
    Number,
    Boolean,
    Date,
    DateTime,
    Null,
}

impl Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeKind::Object => "object",
            NodeKind::Array => "array",
            NodeKind::Text => "string",
            NodeKind::Int => "integer",
            NodeKind::Number => "float",
            NodeKind::Boolean => "boolean",
            NodeKind::Date => "date",
            NodeKind::DateTime => "datetime",
            NodeKind::Null => "null",
        };
        write!(f, "{name}")
    }
}

/// Controls promotion of ISO-8601 strings to date nodes during ingestion.
///
/// JSON has no date type; the catalog serialises dates as strings, and
/// template cells want real date values. Detection runs on every string in
/// the document, so identifiers and titles must not look like timestamps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DateDetection {
    /// Promote `YYYY-MM-DD` to [`Node::Date`] and full ISO-8601 timestamps
    /// (with or without a UTC offset) to [`Node::DateTime`].
    #[default]
    Iso8601,
    /// Keep every string as [`Node::Text`].
    Off,
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("malformed document JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The literal is representable as neither `i64` nor `f64` without loss.
    #[error("unsupported value `{literal}` at `{path}`")]
    UnsupportedType { path: String, literal: String },
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Node::Object(_) => NodeKind::Object,
            Node::Array(_) => NodeKind::Array,
            Node::Text(_) => NodeKind::Text,
            Node::Int(_) => NodeKind::Int,
            Node::Number(_) => NodeKind::Number,
            Node::Boolean(_) => NodeKind::Boolean,
            Node::Date(_) => NodeKind::Date,
            Node::DateTime(_) => NodeKind::DateTime,
            Node::Null => NodeKind::Null,
        }
    }

    /// Ingest a parsed JSON document.
    pub fn from_json(value: JsonValue, dates: DateDetection) -> Result<Self, IngestError> {
        convert(value, dates, String::new())
    }

    /// Parse and ingest a JSON document in one step.
    pub fn from_json_str(data: &str, dates: DateDetection) -> Result<Self, IngestError> {
        Self::from_json(serde_json::from_str(data)?, dates)
    }
}

fn convert(value: JsonValue, dates: DateDetection, at: String) -> Result<Node, IngestError> {
    Ok(match value {
        JsonValue::Null => Node::Null,
        JsonValue::Bool(b) => Node::Boolean(b),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Node::Int(i)
            } else if n.is_u64() {
                // refuse integers that would round through f64
                return Err(IngestError::UnsupportedType {
                    path: at,
                    literal: n.to_string(),
                });
            } else if let Some(f) = n.as_f64() {
                Node::Number(f)
            } else {
                return Err(IngestError::UnsupportedType {
                    path: at,
                    literal: n.to_string(),
                });
            }
        }
        JsonValue::String(s) => match dates {
            DateDetection::Iso8601 => detect_date(&s).unwrap_or(Node::Text(s)),
            DateDetection::Off => Node::Text(s),
        },
        JsonValue::Array(items) => {
            let mut out = Vec::with_capacity(items.len());
            for (index, item) in items.into_iter().enumerate() {
                let child = path::join(&at, &index.to_string());
                out.push(convert(item, dates, child)?);
            }
            Node::Array(out)
        }
        JsonValue::Object(fields) => {
            let mut out = BTreeMap::new();
            for (key, field) in fields {
                let child = path::join(&at, &key);
                out.insert(key, convert(field, dates, child)?);
            }
            Node::Object(out)
        }
    })
}

fn detect_date(text: &str) -> Option<Node> {
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        return Some(Node::Date(date));
    }
    if let Ok(stamp) = DateTime::parse_from_rfc3339(text) {
        return Some(Node::DateTime(stamp.naive_utc()));
    }
    if let Ok(stamp) = NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(Node::DateTime(stamp));
    }
    None
}
