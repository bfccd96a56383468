//! Raw field definitions
//!
//! The flat, prefix-keyed mapping an application author writes for one
//! field. Keys route to consumers by convention:
//!
//! - `name`: optional canonical identifier; without one the field is
//!   structural-only and not retrievable by name
//! - `schema`, `form`, `help`: gate booleans; exactly `false` excludes the
//!   field from that view (default on)
//! - `dt_tabular`: gates the tabular view; `dt_data` controls the derived
//!   `data` attribute
//! - other `dt_`-prefixed keys: tabular attributes, prefix stripped
//! - `form_`-prefixed keys: form attributes, prefix stripped
//! - `help_`-prefixed keys: help attributes, prefix stripped
//! - everything else: schema attributes, passed through verbatim

use std::collections::BTreeMap;

use serde::de::{self, Deserializer};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::errors::{DefinitionError, DefinitionResult};
use super::value::{json_type_name, AttrValue, RowContext};

/// Key holding the canonical field name
pub(crate) const NAME_KEY: &str = "name";
/// Gate key for the schema view
pub(crate) const SCHEMA_GATE: &str = "schema";
/// Gate key for the form view
pub(crate) const FORM_GATE: &str = "form";
/// Gate key for the help view
pub(crate) const HELP_GATE: &str = "help";
/// Gate key for the tabular view
pub(crate) const TABULAR_GATE: &str = "dt_tabular";
/// Key controlling the derived tabular `data` attribute
pub(crate) const DATA_KEY: &str = "dt_data";
/// Prefix routing a key to the tabular view
pub(crate) const TABULAR_PREFIX: &str = "dt_";
/// Prefix routing a key to the form view
pub(crate) const FORM_PREFIX: &str = "form_";
/// Prefix routing a key to the help view
pub(crate) const HELP_PREFIX: &str = "help_";

/// A raw field definition
#[derive(Clone, Debug, Default)]
pub struct RawDef {
    attrs: BTreeMap<String, AttrValue>,
}

impl RawDef {
    /// Empty definition
    pub fn new() -> Self {
        Self::default()
    }

    /// Definition with `name` already set
    pub fn named(name: impl Into<String>) -> Self {
        Self::new().set(NAME_KEY, name.into())
    }

    /// Sets one plain JSON attribute, builder style
    #[must_use]
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.attrs.insert(key.into(), AttrValue::Json(value.into()));
        self
    }

    /// Sets one row-context callback attribute, builder style
    #[must_use]
    pub fn set_context<F>(mut self, key: impl Into<String>, callback: F) -> Self
    where
        F: Fn(&Value) -> RowContext + Send + Sync + 'static,
    {
        self.attrs.insert(key.into(), AttrValue::context(callback));
        self
    }

    /// Builds a definition from a JSON value
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::NotAnObject` unless the value is a JSON
    /// object.
    pub fn from_value(value: Value) -> DefinitionResult<Self> {
        match value {
            Value::Object(map) => Ok(map.into()),
            other => Err(DefinitionError::NotAnObject {
                actual: json_type_name(&other),
            }),
        }
    }

    /// Returns the attribute stored under `key`
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.attrs.get(key)
    }

    /// Whether an attribute is stored under `key`
    pub fn contains_key(&self, key: &str) -> bool {
        self.attrs.contains_key(key)
    }

    /// Number of attributes
    pub fn len(&self) -> usize {
        self.attrs.len()
    }

    /// Whether the definition has no attributes
    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty()
    }

    /// Iterates over all attributes
    pub fn iter(&self) -> impl Iterator<Item = (&str, &AttrValue)> {
        self.attrs.iter().map(|(key, value)| (key.as_str(), value))
    }
}

impl From<serde_json::Map<String, Value>> for RawDef {
    fn from(map: serde_json::Map<String, Value>) -> Self {
        Self {
            attrs: map
                .into_iter()
                .map(|(key, value)| (key, AttrValue::Json(value)))
                .collect(),
        }
    }
}

impl TryFrom<Value> for RawDef {
    type Error = DefinitionError;

    fn try_from(value: Value) -> DefinitionResult<Self> {
        Self::from_value(value)
    }
}

// Callback attributes are runtime-only: serialization emits the plain JSON
// attributes and skips callbacks; deserialization never produces callbacks.
impl Serialize for RawDef {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let json_attrs: Vec<_> = self
            .attrs
            .iter()
            .filter_map(|(key, value)| value.as_json().map(|json| (key, json)))
            .collect();
        let mut map = serializer.serialize_map(Some(json_attrs.len()))?;
        for (key, value) in json_attrs {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawDef {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Self::from_value(value).map_err(de::Error::custom)
    }
}
