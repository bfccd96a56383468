//! Nested field-definition input
//!
//! Collections accept one definition, a list, or arbitrarily nested lists;
//! construction flattens recursively, preserving order. The JSON entry
//! point is lenient: a malformed entry inside a large field list is skipped
//! with a warning rather than failing the whole construction.

use log::warn;
use serde_json::Value;

use super::errors::{SetError, SetResult};
use crate::definition::{json_type_name, RawDef};

/// One definition or a nested list of them
#[derive(Clone, Debug)]
pub enum FieldInput {
    /// A single raw definition
    Def(RawDef),
    /// A nested list, flattened in order
    List(Vec<FieldInput>),
}

impl FieldInput {
    /// Flattens into a definition sequence, preserving order
    pub fn flatten(self) -> Vec<RawDef> {
        let mut out = Vec::new();
        self.flatten_into(&mut out);
        out
    }

    fn flatten_into(self, out: &mut Vec<RawDef>) {
        match self {
            FieldInput::Def(def) => out.push(def),
            FieldInput::List(items) => {
                for item in items {
                    item.flatten_into(out);
                }
            }
        }
    }

    /// Whether flattening would yield no definition at all
    pub fn is_empty(&self) -> bool {
        match self {
            FieldInput::Def(_) => false,
            FieldInput::List(items) => items.iter().all(FieldInput::is_empty),
        }
    }

    /// Lenient parse from a JSON value
    ///
    /// An object is one definition; an array is recursed in order. Inside
    /// an array, `null` entries are skipped silently and any entry that is
    /// neither an object nor an array is skipped with a warning.
    ///
    /// # Errors
    ///
    /// Returns `SetError::InvalidInput` when the top-level value itself is
    /// neither an object nor an array.
    pub fn from_value(value: Value) -> SetResult<Self> {
        match value {
            Value::Object(map) => Ok(FieldInput::Def(map.into())),
            Value::Array(items) => Ok(FieldInput::List(collect_entries(items))),
            other => Err(SetError::InvalidInput {
                actual: json_type_name(&other),
            }),
        }
    }
}

fn collect_entries(items: Vec<Value>) -> Vec<FieldInput> {
    let mut out = Vec::new();
    for item in items {
        match item {
            Value::Null => {}
            Value::Object(map) => out.push(FieldInput::Def(map.into())),
            Value::Array(nested) => out.push(FieldInput::List(collect_entries(nested))),
            other => {
                warn!(
                    "skipping field definition entry: expected an object or array, got {}",
                    json_type_name(&other)
                );
            }
        }
    }
    out
}

impl From<RawDef> for FieldInput {
    fn from(def: RawDef) -> Self {
        FieldInput::Def(def)
    }
}

impl<T: Into<FieldInput>> From<Vec<T>> for FieldInput {
    fn from(items: Vec<T>) -> Self {
        FieldInput::List(items.into_iter().map(Into::into).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn names(input: FieldInput) -> Vec<String> {
        input
            .flatten()
            .into_iter()
            .filter_map(|def| {
                def.get("name")
                    .and_then(|attr| attr.as_json())
                    .and_then(|v| v.as_str())
                    .map(String::from)
            })
            .collect()
    }

    #[test]
    fn test_nested_lists_flatten_in_order() {
        let input = FieldInput::from(vec![
            FieldInput::from(vec![RawDef::named("a")]),
            FieldInput::from(RawDef::named("b")),
            FieldInput::from(vec![vec![RawDef::named("c")]]),
        ]);
        assert_eq!(names(input), ["a", "b", "c"]);
    }

    #[test]
    fn test_from_value_flattens_and_skips_junk() {
        let input = FieldInput::from_value(json!([
            [{ "name": "a" }],
            null,
            "junk",
            { "name": "b" },
            [[{ "name": "c" }], 42]
        ]))
        .unwrap();
        assert_eq!(names(input), ["a", "b", "c"]);
    }

    #[test]
    fn test_from_value_rejects_top_level_scalars() {
        for junk in [json!(null), json!(1), json!("x"), json!(true)] {
            let err = FieldInput::from_value(junk).unwrap_err();
            assert!(matches!(err, SetError::InvalidInput { .. }));
        }
    }

    #[test]
    fn test_is_empty() {
        assert!(FieldInput::List(Vec::new()).is_empty());
        assert!(FieldInput::from(vec![FieldInput::List(Vec::new())]).is_empty());
        assert!(!FieldInput::from(RawDef::new()).is_empty());
    }
}
