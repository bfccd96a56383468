//! Ordered field collections
//!
//! A `FieldSet` owns an ordered sequence of field definitions. Order is
//! significant: it drives tabular column order and the insertion-point
//! extension. Fields are never removed.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde_json::Value;

use super::errors::{SetError, SetResult};
use super::input::FieldInput;
use crate::definition::{FieldDef, JsonMap, RawDef, TabularAttrs};

/// An ordered collection of field definitions
///
/// Expected usage is build once, extend during a bounded assembly phase,
/// then read many times. Extension mutates in place and needs external
/// synchronization if interleaved with reads from other threads.
#[derive(Debug, Default)]
pub struct FieldSet {
    fields: Vec<Arc<FieldDef>>,
}

impl FieldSet {
    /// Empty collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Collection from a flat sequence of definitions, in order
    pub fn from_defs(defs: impl IntoIterator<Item = RawDef>) -> Self {
        Self {
            fields: defs.into_iter().map(FieldDef::new).collect(),
        }
    }

    /// Collection from one definition or a (possibly nested) list
    pub fn from_input(input: impl Into<FieldInput>) -> Self {
        Self::from_defs(input.into().flatten())
    }

    /// Collection from a JSON value: one object, or an array flattened
    /// recursively with null entries skipped and malformed entries skipped
    /// with a warning
    ///
    /// # Errors
    ///
    /// Returns `SetError::InvalidInput` when the value is neither an object
    /// nor an array.
    pub fn from_value(value: Value) -> SetResult<Self> {
        Ok(Self::from_input(FieldInput::from_value(value)?))
    }

    /// Number of fields
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the collection holds no field
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Fields in collection order
    pub fn iter(&self) -> impl Iterator<Item = &Arc<FieldDef>> {
        self.fields.iter()
    }

    /// First field whose name matches, scanning in collection order
    ///
    /// Fields without a name are never retrievable here.
    pub fn by_name(&self, name: &str) -> Option<&Arc<FieldDef>> {
        self.fields.iter().find(|field| field.name() == Some(name))
    }

    /// Ordered names of all named fields, duplicates kept
    pub fn names(&self) -> Vec<&str> {
        self.fields.iter().filter_map(|field| field.name()).collect()
    }

    /// Appends definitions at the end of the collection
    pub fn append(&mut self, fields: impl Into<FieldInput>) {
        let defs = fields.into().flatten();
        self.fields.extend(defs.into_iter().map(FieldDef::new));
    }

    /// Inserts definitions immediately before the named field
    ///
    /// No-op on empty input. The anchor is resolved before any mutation, so
    /// a failed call leaves the collection unchanged.
    ///
    /// # Errors
    ///
    /// Returns `SetError::AnchorNotFound` when no field has the anchor name.
    pub fn insert_before(&mut self, anchor: &str, fields: impl Into<FieldInput>) -> SetResult<()> {
        self.insert_at(anchor, 0, fields.into())
    }

    /// Inserts definitions immediately after the named field
    ///
    /// Same contract as [`insert_before`](Self::insert_before).
    ///
    /// # Errors
    ///
    /// Returns `SetError::AnchorNotFound` when no field has the anchor name.
    pub fn insert_after(&mut self, anchor: &str, fields: impl Into<FieldInput>) -> SetResult<()> {
        self.insert_at(anchor, 1, fields.into())
    }

    fn insert_at(&mut self, anchor: &str, offset: usize, input: FieldInput) -> SetResult<()> {
        let defs = input.flatten();
        if defs.is_empty() {
            return Ok(());
        }
        let position = self
            .fields
            .iter()
            .position(|field| field.name() == Some(anchor))
            .ok_or_else(|| SetError::AnchorNotFound {
                anchor: anchor.to_string(),
            })?;
        let at = position + offset;
        self.fields.splice(at..at, defs.into_iter().map(FieldDef::new));
        Ok(())
    }

    /// Schema view: field name to schema attributes
    ///
    /// Later fields overwrite earlier ones on duplicate names.
    pub fn to_schema(&self) -> BTreeMap<String, JsonMap> {
        self.keyed_view(FieldDef::to_schema)
    }

    /// Form view: field name to form attributes
    pub fn to_form(&self) -> BTreeMap<String, JsonMap> {
        self.keyed_view(FieldDef::to_form)
    }

    /// Help view: field name to help attributes
    ///
    /// Only fields that declared at least one help attribute appear.
    pub fn to_help(&self) -> BTreeMap<String, JsonMap> {
        let mut result = BTreeMap::new();
        for field in &self.fields {
            let (Some(name), Some(attrs)) = (field.name(), field.to_help()) else {
                continue;
            };
            if attrs.is_empty() {
                continue;
            }
            result.insert(name.to_string(), attrs);
        }
        result
    }

    /// Tabular view: ordered column mappings, positional
    ///
    /// Not keyed by name since columns may omit `name` entirely.
    pub fn to_tabular(&self) -> Vec<TabularAttrs> {
        self.fields.iter().filter_map(|field| field.to_tabular()).collect()
    }

    fn keyed_view(
        &self,
        project: impl Fn(&FieldDef) -> Option<JsonMap>,
    ) -> BTreeMap<String, JsonMap> {
        let mut result = BTreeMap::new();
        for field in &self.fields {
            let (Some(name), Some(attrs)) = (field.name(), project(field)) else {
                continue;
            };
            result.insert(name.to_string(), attrs);
        }
        result
    }
}

impl<'a> IntoIterator for &'a FieldSet {
    type Item = &'a Arc<FieldDef>;
    type IntoIter = std::slice::Iter<'a, Arc<FieldDef>>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_set() -> FieldSet {
        FieldSet::from_value(json!([
            { "name": "id", "type": "string" },
            { "name": "age", "min": 0, "dt_sortable": true, "help_short": "Age in years" },
            { "dt_render": "actions" }
        ]))
        .unwrap()
    }

    #[test]
    fn test_by_name_first_match() {
        let set = sample_set();
        assert_eq!(set.by_name("age").unwrap().name(), Some("age"));
        assert!(set.by_name("missing").is_none());

        let dup = FieldSet::from_defs([RawDef::named("x").set("a", 1), RawDef::named("x").set("b", 2)]);
        let found = dup.by_name("x").unwrap();
        assert!(found.raw().contains_key("a"));
    }

    #[test]
    fn test_names_skip_nameless_fields() {
        let set = sample_set();
        assert_eq!(set.names(), ["id", "age"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_append() {
        let mut set = sample_set();
        set.append(RawDef::named("extra"));
        assert_eq!(set.names(), ["id", "age", "extra"]);

        set.append(FieldInput::List(Vec::new()));
        assert_eq!(set.len(), 4);
    }

    #[test]
    fn test_insert_before_and_after() {
        let mut set = sample_set();
        set.insert_before("age", RawDef::named("email")).unwrap();
        assert_eq!(set.names(), ["id", "email", "age"]);

        set.insert_after("id", vec![RawDef::named("a"), RawDef::named("b")])
            .unwrap();
        assert_eq!(set.names(), ["id", "a", "b", "email", "age"]);
    }

    #[test]
    fn test_insert_unknown_anchor_leaves_set_unchanged() {
        let mut set = sample_set();
        let err = set.insert_before("ghost", RawDef::named("x")).unwrap_err();
        assert!(matches!(err, SetError::AnchorNotFound { .. }));
        assert_eq!(set.names(), ["id", "age"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_insert_empty_input_is_noop_even_with_bad_anchor() {
        let mut set = sample_set();
        set.insert_before("ghost", FieldInput::List(Vec::new())).unwrap();
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_keyed_views() {
        let set = sample_set();
        let schema = set.to_schema();
        assert_eq!(schema.len(), 2);
        assert_eq!(schema["age"], json!({ "min": 0 }).as_object().cloned().unwrap());

        // only "age" declared help attributes
        let help = set.to_help();
        assert_eq!(help.len(), 1);
        assert!(help.contains_key("age"));
    }

    #[test]
    fn test_duplicate_names_last_wins_in_keyed_views() {
        let set = FieldSet::from_defs([RawDef::named("x").set("a", 1), RawDef::named("x").set("b", 2)]);
        let schema = set.to_schema();
        assert_eq!(schema["x"], json!({ "b": 2 }).as_object().cloned().unwrap());
    }

    #[test]
    fn test_tabular_view_is_positional() {
        let set = sample_set();
        let columns = set.to_tabular();
        assert_eq!(columns.len(), 3);
        assert_eq!(columns[0]["data"].as_json(), Some(&json!("id")));
        assert_eq!(columns[1]["sortable"].as_json(), Some(&json!(true)));
        assert!(!columns[2].contains_key("data"));
    }
}
