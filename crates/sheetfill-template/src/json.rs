//! On-disk JSON form of a grid.
//!
//! Cell values are type-tagged so integers, floats, text, and dates all
//! survive a round trip. Unknown optional fields default rather than
//! fail, keeping hand-authored templates forgiving.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sheetfill_common::Scalar;

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub(crate) struct JsonGrid {
    #[serde(default = "default_version")]
    pub(crate) version: u32,
    #[serde(default)]
    pub(crate) sheets: BTreeMap<String, JsonSheet>,
}

fn default_version() -> u32 {
    1
}

#[derive(Serialize, Deserialize, Debug, Default, Clone)]
pub(crate) struct JsonSheet {
    #[serde(default)]
    pub(crate) cells: Vec<JsonCell>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct JsonCell {
    pub(crate) row: u32,
    pub(crate) col: u32,
    #[serde(default)]
    pub(crate) value: Option<JsonCellValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(tag = "type", content = "value")]
pub(crate) enum JsonCellValue {
    Int(i64),
    Number(f64),
    Text(String),
    Date(String),
    DateTime(String),
    Empty,
}

pub(crate) fn scalar_to_json(value: &Scalar) -> JsonCellValue {
    match value {
        Scalar::Int(i) => JsonCellValue::Int(*i),
        Scalar::Number(n) => JsonCellValue::Number(*n),
        Scalar::Text(s) => JsonCellValue::Text(s.clone()),
        Scalar::Date(d) => JsonCellValue::Date(d.to_string()),
        Scalar::DateTime(dt) => JsonCellValue::DateTime(dt.to_string()),
        Scalar::Empty => JsonCellValue::Empty,
    }
}

pub(crate) fn json_to_scalar(value: &JsonCellValue) -> Scalar {
    match value {
        JsonCellValue::Int(i) => Scalar::Int(*i),
        JsonCellValue::Number(n) => Scalar::Number(*n),
        JsonCellValue::Text(s) => Scalar::Text(s.clone()),
        JsonCellValue::Date(s) => {
            let date = chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .unwrap_or_else(|_| chrono::NaiveDate::default());
            Scalar::Date(date)
        }
        JsonCellValue::DateTime(s) => {
            let stamp = chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f")
                .or_else(|_| chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f"))
                .unwrap_or_else(|_| chrono::NaiveDateTime::default());
            Scalar::DateTime(stamp)
        }
        JsonCellValue::Empty => Scalar::Empty,
    }
}
