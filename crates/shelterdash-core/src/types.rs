//! Scalar field values.
//!
//! Records are schema-less documents on the wire; every field value is one of
//! these scalars. Serialized untagged so documents stay plain JSON.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
}

impl Scalar {
    pub fn is_null(&self) -> bool {
        matches!(self, Scalar::Null)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Scalar::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric view; `Int` widens to `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(i) => Some(*i as f64),
            Scalar::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Convert a JSON value; arrays and objects are not scalars.
    pub fn from_json(value: &serde_json::Value) -> Result<Self> {
        use serde_json::Value;
        match value {
            Value::Null => Ok(Scalar::Null),
            Value::Bool(b) => Ok(Scalar::Bool(*b)),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Ok(Scalar::Int(i)),
                None => n
                    .as_f64()
                    .map(Scalar::Float)
                    .ok_or_else(|| Error::InvalidInput(format!("unrepresentable number {n}"))),
            },
            Value::String(s) => Ok(Scalar::Str(s.clone())),
            other => Err(Error::InvalidInput(format!(
                "expected a scalar value, got {other}"
            ))),
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        use serde_json::Value;
        match self {
            Scalar::Null => Value::Null,
            Scalar::Bool(b) => Value::Bool(*b),
            Scalar::Int(i) => Value::from(*i),
            Scalar::Float(f) => Value::from(*f),
            Scalar::Str(s) => Value::String(s.clone()),
        }
    }

    /// Infer a scalar from raw text (CSV cells, CLI literals).
    ///
    /// Integers, then floats, then `true`/`false`; anything else stays a string.
    pub fn infer(raw: &str) -> Self {
        let trimmed = raw.trim();
        if let Ok(i) = trimmed.parse::<i64>() {
            return Scalar::Int(i);
        }
        if !trimmed.is_empty() {
            if let Ok(f) = trimmed.parse::<f64>() {
                if f.is_finite() {
                    return Scalar::Float(f);
                }
            }
        }
        match trimmed {
            "true" => Scalar::Bool(true),
            "false" => Scalar::Bool(false),
            _ => Scalar::Str(raw.to_string()),
        }
    }

    /// Total order used by table sorting.
    ///
    /// Nulls sort first, numbers compare numerically across `Int`/`Float`
    /// with NaN last, then mixed types order by type rank.
    pub fn total_cmp(&self, other: &Scalar) -> Ordering {
        use Scalar::*;
        match (self, other) {
            (Null, Null) => Ordering::Equal,
            (Null, _) => Ordering::Less,
            (_, Null) => Ordering::Greater,
            (Bool(x), Bool(y)) => x.cmp(y),
            (Int(x), Int(y)) => x.cmp(y),
            (Int(_) | Float(_), Int(_) | Float(_)) => {
                let (x, y) = (self.as_f64().unwrap_or(f64::NAN), other.as_f64().unwrap_or(f64::NAN));
                if x.is_nan() && y.is_nan() {
                    Ordering::Equal
                } else if x.is_nan() {
                    Ordering::Greater
                } else if y.is_nan() {
                    Ordering::Less
                } else {
                    x.partial_cmp(&y).unwrap_or(Ordering::Equal)
                }
            }
            (Str(x), Str(y)) => x.cmp(y),
            _ => type_rank(self).cmp(&type_rank(other)),
        }
    }
}

fn type_rank(s: &Scalar) -> u8 {
    match s {
        Scalar::Null => 0,
        Scalar::Bool(_) => 1,
        Scalar::Int(_) | Scalar::Float(_) => 2,
        Scalar::Str(_) => 3,
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scalar::Null => Ok(()),
            Scalar::Bool(b) => write!(f, "{b}"),
            Scalar::Int(i) => write!(f, "{i}"),
            Scalar::Float(x) => write!(f, "{x}"),
            Scalar::Str(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Scalar {
    fn from(s: &str) -> Self {
        Scalar::Str(s.to_string())
    }
}

impl From<String> for Scalar {
    fn from(s: String) -> Self {
        Scalar::Str(s)
    }
}

impl From<i64> for Scalar {
    fn from(i: i64) -> Self {
        Scalar::Int(i)
    }
}

impl From<f64> for Scalar {
    fn from(f: f64) -> Self {
        Scalar::Float(f)
    }
}

impl From<bool> for Scalar {
    fn from(b: bool) -> Self {
        Scalar::Bool(b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn untagged_json_roundtrips_plain_values() {
        let values: Vec<Scalar> = serde_json::from_str(r#"[null, true, 3, 2.5, "Lab"]"#).unwrap();
        assert_eq!(
            values,
            vec![
                Scalar::Null,
                Scalar::Bool(true),
                Scalar::Int(3),
                Scalar::Float(2.5),
                Scalar::Str("Lab".into())
            ]
        );
        assert_eq!(serde_json::to_string(&values).unwrap(), r#"[null,true,3,2.5,"Lab"]"#);
    }

    #[test]
    fn infer_prefers_integers_then_floats() {
        assert_eq!(Scalar::infer("42"), Scalar::Int(42));
        assert_eq!(Scalar::infer("52.142857"), Scalar::Float(52.142857));
        assert_eq!(Scalar::infer("A746874"), Scalar::Str("A746874".into()));
        assert_eq!(Scalar::infer(""), Scalar::Str(String::new()));
        assert_eq!(Scalar::infer("NaN"), Scalar::Str("NaN".into()));
    }

    #[test]
    fn total_cmp_mixes_ints_and_floats_numerically() {
        assert_eq!(Scalar::Int(2).total_cmp(&Scalar::Float(2.5)), Ordering::Less);
        assert_eq!(Scalar::Float(3.0).total_cmp(&Scalar::Int(3)), Ordering::Equal);
        assert_eq!(Scalar::Null.total_cmp(&Scalar::Int(0)), Ordering::Less);
        assert_eq!(Scalar::Float(f64::NAN).total_cmp(&Scalar::Float(1.0)), Ordering::Greater);
        assert_eq!(Scalar::Int(9).total_cmp(&Scalar::Str("a".into())), Ordering::Less);
    }

    #[test]
    fn from_json_rejects_containers() {
        assert!(Scalar::from_json(&serde_json::json!([1, 2])).is_err());
        assert!(Scalar::from_json(&serde_json::json!({"a": 1})).is_err());
    }
}
