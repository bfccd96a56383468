//! Attribute values
//!
//! A definition attribute is either a plain JSON value or, for the tabular
//! surface, a row-context callback. Callbacks are shared by reference:
//! cloning a definition clones the `Arc`, never the callback state.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::field::FieldDef;

/// Attribute mapping produced by the projection operations
pub type JsonMap = serde_json::Map<String, Value>;

/// Row-context callback, invoked by a tabular rendering layer with one row value
pub type ContextFn = Arc<dyn Fn(&Value) -> RowContext + Send + Sync>;

/// What a row-context callback produces
///
/// Application callbacks fill `attrs` and leave `field` unset; the tabular
/// projection rebinds the callback so that `field` carries the originating
/// definition by the time the rendering layer sees the result.
#[derive(Clone, Debug, Default)]
pub struct RowContext {
    /// Context attributes handed to the rendering template
    pub attrs: JsonMap,
    /// Back-reference to the definition that produced the column
    pub field: Option<Arc<FieldDef>>,
}

impl RowContext {
    /// Context carrying the given attributes and no back-reference
    pub fn new(attrs: JsonMap) -> Self {
        Self { attrs, field: None }
    }
}

/// One attribute value in a raw definition or a tabular column mapping
#[derive(Clone)]
pub enum AttrValue {
    /// Plain JSON value
    Json(Value),
    /// Row-context callback (tabular surface only)
    Context(ContextFn),
}

impl AttrValue {
    /// Wraps a row-context callback
    pub fn context<F>(callback: F) -> Self
    where
        F: Fn(&Value) -> RowContext + Send + Sync + 'static,
    {
        AttrValue::Context(Arc::new(callback))
    }

    /// Returns the plain JSON value, if this attribute holds one
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            AttrValue::Json(value) => Some(value),
            AttrValue::Context(_) => None,
        }
    }

    /// Returns the callback, if this attribute holds one
    pub fn as_context(&self) -> Option<&ContextFn> {
        match self {
            AttrValue::Json(_) => None,
            AttrValue::Context(callback) => Some(callback),
        }
    }

    /// Whether this attribute is a row-context callback
    pub fn is_context(&self) -> bool {
        matches!(self, AttrValue::Context(_))
    }

    // Gate keys disable a surface only when set to exactly `false`; any
    // other value, including a missing key, leaves the surface on.
    pub(crate) fn is_false(&self) -> bool {
        matches!(self, AttrValue::Json(Value::Bool(false)))
    }
}

impl fmt::Debug for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Json(value) => write!(f, "Json({value})"),
            AttrValue::Context(_) => f.write_str("Context(..)"),
        }
    }
}

impl From<Value> for AttrValue {
    fn from(value: Value) -> Self {
        AttrValue::Json(value)
    }
}

/// JSON type name for diagnostics
pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_only_exact_false_is_false() {
        assert!(AttrValue::Json(json!(false)).is_false());
        assert!(!AttrValue::Json(json!(true)).is_false());
        assert!(!AttrValue::Json(json!(0)).is_false());
        assert!(!AttrValue::Json(json!("false")).is_false());
        assert!(!AttrValue::Json(json!(null)).is_false());
        assert!(!AttrValue::context(|_| RowContext::default()).is_false());
    }

    #[test]
    fn test_accessors() {
        let json = AttrValue::Json(json!(42));
        assert_eq!(json.as_json(), Some(&json!(42)));
        assert!(json.as_context().is_none());

        let callback = AttrValue::context(|_| RowContext::default());
        assert!(callback.is_context());
        assert!(callback.as_json().is_none());
        assert!(callback.as_context().is_some());
    }

    #[test]
    fn test_json_type_names() {
        assert_eq!(json_type_name(&json!(null)), "null");
        assert_eq!(json_type_name(&json!(true)), "bool");
        assert_eq!(json_type_name(&json!(1.5)), "number");
        assert_eq!(json_type_name(&json!("x")), "string");
        assert_eq!(json_type_name(&json!([])), "array");
        assert_eq!(json_type_name(&json!({})), "object");
    }
}
