//! `AnimalRecord`: typed view of one shelter outcome document.
//!
//! The fields every part of the dashboard relies on are typed and optional;
//! anything else in the document lands in `extra` and round-trips unchanged.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::id::RecordId;
use crate::types::Scalar;

/// Field names of the typed columns, in table order.
pub mod fields {
    pub const ID: &str = "_id";
    pub const NAME: &str = "name";
    pub const ANIMAL_TYPE: &str = "animal_type";
    pub const BREED: &str = "breed";
    pub const SEX_UPON_OUTCOME: &str = "sex_upon_outcome";
    pub const AGE_UPON_OUTCOME_IN_WEEKS: &str = "age_upon_outcome_in_weeks";
    pub const LOCATION_LAT: &str = "location_lat";
    pub const LOCATION_LONG: &str = "location_long";

    pub const TYPED: &[&str] = &[
        NAME,
        ANIMAL_TYPE,
        BREED,
        SEX_UPON_OUTCOME,
        AGE_UPON_OUTCOME_IN_WEEKS,
        LOCATION_LAT,
        LOCATION_LONG,
    ];
}

/// `$set`-style change map: field name → new value.
pub type Changes = BTreeMap<String, Scalar>;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnimalRecord {
    /// Store-internal identifier; never shown to the rendering layer.
    #[serde(rename = "_id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub animal_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub breed: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sex_upon_outcome: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age_upon_outcome_in_weeks: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location_long: Option<f64>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, Scalar>,
}

impl AnimalRecord {
    /// Parse a JSON document (one store line, one CLI payload).
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        if !value.is_object() {
            return Err(Error::InvalidInput(
                "record must be a JSON object".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// True when the record carries no domain field at all (the id is ignored).
    pub fn is_empty(&self) -> bool {
        self.fields().next().is_none()
    }

    /// Copy without the store-internal identifier.
    pub fn without_id(&self) -> Self {
        Self {
            id: None,
            ..self.clone()
        }
    }

    /// Look up any field by name, typed or extra. Absent fields are `None`.
    pub fn get(&self, field: &str) -> Option<Scalar> {
        let text = |v: &Option<String>| v.clone().map(Scalar::Str);
        let num = |v: &Option<f64>| v.map(Scalar::Float);
        match field {
            fields::ID => self.id.as_ref().map(|id| Scalar::Str(id.to_string())),
            fields::NAME => text(&self.name),
            fields::ANIMAL_TYPE => text(&self.animal_type),
            fields::BREED => text(&self.breed),
            fields::SEX_UPON_OUTCOME => text(&self.sex_upon_outcome),
            fields::AGE_UPON_OUTCOME_IN_WEEKS => num(&self.age_upon_outcome_in_weeks),
            fields::LOCATION_LAT => num(&self.location_lat),
            fields::LOCATION_LONG => num(&self.location_long),
            other => self.extra.get(other).cloned(),
        }
    }

    /// Domain fields (no id) in column order: typed fields first, then extras
    /// alphabetically.
    pub fn fields(&self) -> impl Iterator<Item = (&str, Scalar)> + '_ {
        fields::TYPED
            .iter()
            .filter_map(move |name| self.get(name).map(|v| (*name, v)))
            .chain(self.extra.iter().map(|(k, v)| (k.as_str(), v.clone())))
    }

    /// Return a copy with `changes` applied, plus whether any value differed.
    ///
    /// `Null` clears a field. Typed fields only accept values of their type
    /// (ints are accepted for numeric fields); the id cannot be changed.
    pub fn with_changes(&self, changes: &Changes) -> Result<(Self, bool)> {
        let mut next = self.clone();
        for (field, value) in changes {
            next.set(field, value)?;
        }
        let changed = next != *self;
        Ok((next, changed))
    }

    fn set(&mut self, field: &str, value: &Scalar) -> Result<()> {
        fn text(field: &str, value: &Scalar) -> Result<Option<String>> {
            match value {
                Scalar::Null => Ok(None),
                Scalar::Str(s) => Ok(Some(s.clone())),
                other => Err(Error::InvalidInput(format!(
                    "field '{field}' expects a string, got {other:?}"
                ))),
            }
        }
        fn num(field: &str, value: &Scalar) -> Result<Option<f64>> {
            match value {
                Scalar::Null => Ok(None),
                v => v.as_f64().map(Some).ok_or_else(|| {
                    Error::InvalidInput(format!("field '{field}' expects a number, got {v:?}"))
                }),
            }
        }

        match field {
            fields::ID => {
                return Err(Error::InvalidInput(
                    "the record identifier cannot be changed".to_string(),
                ))
            }
            fields::NAME => self.name = text(field, value)?,
            fields::ANIMAL_TYPE => self.animal_type = text(field, value)?,
            fields::BREED => self.breed = text(field, value)?,
            fields::SEX_UPON_OUTCOME => self.sex_upon_outcome = text(field, value)?,
            fields::AGE_UPON_OUTCOME_IN_WEEKS => {
                self.age_upon_outcome_in_weeks = num(field, value)?
            }
            fields::LOCATION_LAT => self.location_lat = num(field, value)?,
            fields::LOCATION_LONG => self.location_long = num(field, value)?,
            other => {
                if value.is_null() {
                    self.extra.remove(other);
                } else {
                    self.extra.insert(other.to_string(), value.clone());
                }
            }
        }
        Ok(())
    }
}
