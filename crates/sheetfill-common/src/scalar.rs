use std::fmt::{self, Display};

use chrono::{NaiveDate, NaiveDateTime};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::Node;

/// A value as it lands in a grid cell.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Number(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Empty,
}

impl Scalar {
    pub fn is_empty(&self) -> bool {
        matches!(self, Scalar::Empty)
    }
}

impl Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Number(n) => write!(f, "{n}"),
            Scalar::Text(s) => write!(f, "{s}"),
            Scalar::Date(d) => write!(f, "{d}"),
            Scalar::DateTime(dt) => write!(f, "{dt}"),
            Scalar::Empty => write!(f, ""),
        }
    }
}

impl Node {
    /// Collapse a node to the value its cell receives.
    ///
    /// Leaves pass through unchanged. Containers collapse to a marker: an
    /// array becomes the count of its elements and an object becomes
    /// `Int(1)`, so a placeholder pointed at a container reads as a
    /// presence/size signal. Booleans become `Int(1)` / `Int(0)` and `Null`
    /// becomes `Empty`.
    pub fn to_scalar(&self) -> Scalar {
        match self {
            Node::Object(_) => Scalar::Int(1),
            Node::Array(items) => Scalar::Int(items.len() as i64),
            Node::Text(s) => Scalar::Text(s.clone()),
            Node::Int(i) => Scalar::Int(*i),
            Node::Number(n) => Scalar::Number(*n),
            Node::Boolean(b) => Scalar::Int(i64::from(*b)),
            Node::Date(d) => Scalar::Date(*d),
            Node::DateTime(dt) => Scalar::DateTime(*dt),
            Node::Null => Scalar::Empty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DateDetection;
    use serde_json::json;

    fn coerced(value: serde_json::Value) -> Scalar {
        Node::from_json(value, DateDetection::Iso8601)
            .expect("ingest")
            .to_scalar()
    }

    #[test]
    fn leaves_pass_through() {
        assert_eq!(coerced(json!(42)), Scalar::Int(42));
        assert_eq!(coerced(json!(15.5)), Scalar::Number(15.5));
        assert_eq!(coerced(json!("ca")), Scalar::Text("ca".into()));
        assert_eq!(
            coerced(json!("2014-12-31")),
            Scalar::Date(NaiveDate::from_ymd_opt(2014, 12, 31).expect("date"))
        );
    }

    #[test]
    fn containers_collapse_to_markers() {
        assert_eq!(coerced(json!([10, 20, 30])), Scalar::Int(3));
        assert_eq!(coerced(json!([])), Scalar::Int(0));
        assert_eq!(coerced(json!({"any": "thing"})), Scalar::Int(1));
        assert_eq!(coerced(json!({})), Scalar::Int(1));
    }

    #[test]
    fn booleans_and_null_normalise() {
        assert_eq!(coerced(json!(true)), Scalar::Int(1));
        assert_eq!(coerced(json!(false)), Scalar::Int(0));
        assert_eq!(coerced(json!(null)), Scalar::Empty);
    }

    #[test]
    fn display_matches_cell_text() {
        assert_eq!(Scalar::Int(2014).to_string(), "2014");
        assert_eq!(Scalar::Number(2014.0).to_string(), "2014");
        assert_eq!(Scalar::Text("oda".into()).to_string(), "oda");
        assert_eq!(Scalar::Empty.to_string(), "");
    }
}
