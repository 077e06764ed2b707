//! Structured record predicates.
//!
//! A `Query` holds at most one predicate per field; all predicates must hold
//! (implicit AND). The empty query matches every record. The store document
//! form mirrors the usual document-database shape:
//! `{"breed": {"$in": [...]}, "sex_upon_outcome": "...", "age": {"$gte": a, "$lte": b}}`.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::category::AgeRange;
use crate::error::{Error, Result};
use crate::record::{fields, AnimalRecord};
use crate::types::Scalar;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// Field equals the value.
    Eq(Scalar),
    /// String field is one of the members. An empty set matches nothing.
    In(BTreeSet<String>),
    /// Numeric field within the inclusive bounds.
    Range { lo: Option<f64>, hi: Option<f64> },
}

impl Predicate {
    pub fn matches(&self, value: Option<&Scalar>) -> bool {
        let Some(value) = value else {
            return false;
        };
        match self {
            Predicate::Eq(expected) => match (expected.as_f64(), value.as_f64()) {
                (Some(a), Some(b)) => a == b,
                _ => expected == value,
            },
            Predicate::In(members) => value.as_str().is_some_and(|s| members.contains(s)),
            Predicate::Range { lo, hi } => value.as_f64().is_some_and(|v| {
                lo.map_or(true, |lo| v >= lo) && hi.map_or(true, |hi| v <= hi)
            }),
        }
    }

    fn to_document(&self) -> Value {
        match self {
            Predicate::Eq(v) => v.to_json(),
            Predicate::In(members) => {
                let list = members.iter().cloned().map(Value::String).collect();
                let mut op = Map::new();
                op.insert("$in".to_string(), Value::Array(list));
                Value::Object(op)
            }
            Predicate::Range { lo, hi } => {
                let mut op = Map::new();
                if let Some(lo) = lo {
                    op.insert("$gte".to_string(), Value::from(*lo));
                }
                if let Some(hi) = hi {
                    op.insert("$lte".to_string(), Value::from(*hi));
                }
                Value::Object(op)
            }
        }
    }

    fn from_document(field: &str, value: &Value) -> Result<Self> {
        let Value::Object(ops) = value else {
            return Ok(Predicate::Eq(Scalar::from_json(value)?));
        };

        if let Some(list) = ops.get("$in") {
            if ops.len() != 1 {
                return Err(Error::InvalidInput(format!(
                    "field '{field}': $in cannot be combined with other operators"
                )));
            }
            let Value::Array(items) = list else {
                return Err(Error::InvalidInput(format!(
                    "field '{field}': $in expects an array"
                )));
            };
            let members = items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        Error::InvalidInput(format!("field '{field}': $in expects strings"))
                    })
                })
                .collect::<Result<BTreeSet<_>>>()?;
            return Ok(Predicate::In(members));
        }

        if let Some(eq) = ops.get("$eq") {
            if ops.len() != 1 {
                return Err(Error::InvalidInput(format!(
                    "field '{field}': $eq cannot be combined with other operators"
                )));
            }
            return Ok(Predicate::Eq(Scalar::from_json(eq)?));
        }

        let mut lo = None;
        let mut hi = None;
        for (op, bound) in ops {
            let n = bound.as_f64().ok_or_else(|| {
                Error::InvalidInput(format!("field '{field}': {op} expects a number"))
            })?;
            match op.as_str() {
                "$gte" => lo = Some(n),
                "$lte" => hi = Some(n),
                other => {
                    return Err(Error::InvalidInput(format!(
                        "field '{field}': unsupported operator '{other}'"
                    )))
                }
            }
        }
        if lo.is_none() && hi.is_none() {
            return Err(Error::InvalidInput(format!(
                "field '{field}': empty operator object"
            )));
        }
        Ok(Predicate::Range { lo, hi })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Query {
    predicates: BTreeMap<String, Predicate>,
}

impl Query {
    /// The empty query (matches everything).
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style: set (or replace) the predicate on `field`.
    pub fn with(mut self, field: impl Into<String>, predicate: Predicate) -> Self {
        self.predicates.insert(field.into(), predicate);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.predicates.is_empty()
    }

    pub fn len(&self) -> usize {
        self.predicates.len()
    }

    pub fn get(&self, field: &str) -> Option<&Predicate> {
        self.predicates.get(field)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Predicate)> {
        self.predicates.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Breed allow-list, if the query constrains breed by membership.
    pub fn breeds(&self) -> Option<&BTreeSet<String>> {
        match self.predicates.get(fields::BREED) {
            Some(Predicate::In(set)) => Some(set),
            _ => None,
        }
    }

    pub fn sex(&self) -> Option<&str> {
        match self.predicates.get(fields::SEX_UPON_OUTCOME) {
            Some(Predicate::Eq(Scalar::Str(s))) => Some(s),
            _ => None,
        }
    }

    /// Age range in weeks, when both bounds are set.
    pub fn age_range(&self) -> Option<AgeRange> {
        match self.predicates.get(fields::AGE_UPON_OUTCOME_IN_WEEKS) {
            Some(Predicate::Range {
                lo: Some(lo),
                hi: Some(hi),
            }) => Some(AgeRange::new(*lo, *hi)),
            _ => None,
        }
    }

    pub fn matches(&self, record: &AnimalRecord) -> bool {
        self.predicates
            .iter()
            .all(|(field, p)| p.matches(record.get(field).as_ref()))
    }

    pub fn to_document(&self) -> Value {
        let doc = self
            .predicates
            .iter()
            .map(|(field, p)| (field.clone(), p.to_document()))
            .collect::<Map<_, _>>();
        Value::Object(doc)
    }

    pub fn from_document(doc: &Value) -> Result<Self> {
        let Value::Object(entries) = doc else {
            return Err(Error::InvalidInput("query must be a JSON object".to_string()));
        };
        let mut query = Query::new();
        for (field, value) in entries {
            if field.starts_with('$') {
                return Err(Error::InvalidInput(format!(
                    "top-level operator '{field}' is not supported"
                )));
            }
            query = query.with(field.clone(), Predicate::from_document(field, value)?);
        }
        Ok(query)
    }
}
