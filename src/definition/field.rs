//! Field definition wrapper and per-surface projections
//!
//! A `FieldDef` wraps one raw definition and derives the four consumer
//! views from it on demand. Projections are pure and deterministic; a field
//! that does not participate in a view projects to `None`.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Weak};

use serde_json::Value;

use super::errors::DefinitionResult;
use super::raw::{
    RawDef, DATA_KEY, FORM_GATE, FORM_PREFIX, HELP_GATE, HELP_PREFIX, NAME_KEY, SCHEMA_GATE,
    TABULAR_GATE, TABULAR_PREFIX,
};
use super::value::{AttrValue, ContextFn, JsonMap};

/// Derived tabular attribute carrying the field name
const DATA_ATTR: &str = "data";
/// Tabular attribute holding the row-context callback
const TMPL_CONTEXT_ATTR: &str = "tmplContext";

/// The four consumer views a field can participate in
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Surface {
    /// Persistence/validation schema
    Schema,
    /// Tabular/grid display
    Tabular,
    /// Input-form renderer
    Form,
    /// Help/documentation
    Help,
}

impl Surface {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Surface::Schema => "schema",
            Surface::Tabular => "tabular",
            Surface::Form => "form",
            Surface::Help => "help",
        }
    }
}

impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A tabular column mapping; unlike the other views it may carry a callback
pub type TabularAttrs = BTreeMap<String, AttrValue>;

/// Wraps one raw definition and derives the four consumer views from it
///
/// Immutable after construction: the constructor takes ownership of the raw
/// definition, so later caller mutation cannot leak in. Callback attributes
/// stay shared by reference through their `Arc`. Handles are always
/// `Arc<FieldDef>` so a tabular callback can carry an identity-preserving
/// back-reference to the definition that produced it.
#[derive(Debug)]
pub struct FieldDef {
    raw: RawDef,
    this: Weak<FieldDef>,
}

impl FieldDef {
    /// Wraps a raw definition
    pub fn new(raw: RawDef) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            raw,
            this: this.clone(),
        })
    }

    /// Wraps a definition supplied as a JSON value
    ///
    /// # Errors
    ///
    /// Returns `DefinitionError::NotAnObject` unless the value is a JSON
    /// object.
    pub fn from_value(value: Value) -> DefinitionResult<Arc<Self>> {
        Ok(Self::new(RawDef::from_value(value)?))
    }

    /// The raw definition this field was declared with
    pub fn raw(&self) -> &RawDef {
        &self.raw
    }

    /// The canonical field name, if the definition carries a usable one
    ///
    /// Only a non-empty JSON string counts; a missing, empty or non-string
    /// `name` marks the field structural-only and not retrievable by name.
    pub fn name(&self) -> Option<&str> {
        match self.raw.get(NAME_KEY)? {
            AttrValue::Json(Value::String(name)) if !name.is_empty() => Some(name),
            _ => None,
        }
    }

    // A gate key disables its view only when set to exactly `false`.
    fn gate_open(&self, key: &str) -> bool {
        !self.raw.get(key).is_some_and(AttrValue::is_false)
    }

    fn has_tabular_key(&self) -> bool {
        self.raw.iter().any(|(key, _)| key.starts_with(TABULAR_PREFIX))
    }

    /// Whether this field appears in the schema view
    pub fn participates_in_schema(&self) -> bool {
        self.name().is_some() && self.gate_open(SCHEMA_GATE)
    }

    /// Whether this field appears in the form view
    pub fn participates_in_form(&self) -> bool {
        self.name().is_some() && self.gate_open(FORM_GATE)
    }

    /// Whether this field appears in the help view
    pub fn participates_in_help(&self) -> bool {
        self.name().is_some() && self.gate_open(HELP_GATE)
    }

    /// Whether this field appears in the tabular view
    ///
    /// A name is not required here: a nameless field with any `dt_`-prefixed
    /// key still yields a column (display-only columns).
    pub fn participates_in_tabular(&self) -> bool {
        self.gate_open(TABULAR_GATE) && (self.name().is_some() || self.has_tabular_key())
    }

    /// Whether this field appears in the given view
    pub fn participates_in(&self, surface: Surface) -> bool {
        match surface {
            Surface::Schema => self.participates_in_schema(),
            Surface::Tabular => self.participates_in_tabular(),
            Surface::Form => self.participates_in_form(),
            Surface::Help => self.participates_in_help(),
        }
    }

    /// Schema view: every key the other views did not claim, verbatim
    ///
    /// Unprefixed non-reserved keys belong to the schema view by default, so
    /// unknown keys route here rather than erroring.
    pub fn to_schema(&self) -> Option<JsonMap> {
        self.participates_in_schema().then(|| self.schema_attrs())
    }

    /// Form view: `form_`-prefixed keys, prefix stripped
    pub fn to_form(&self) -> Option<JsonMap> {
        self.participates_in_form()
            .then(|| self.prefixed_attrs(FORM_PREFIX))
    }

    /// Help view: `help_`-prefixed keys, prefix stripped
    ///
    /// May be empty; the collection-level aggregation filters out fields
    /// that declared no help attributes.
    pub fn to_help(&self) -> Option<JsonMap> {
        self.participates_in_help()
            .then(|| self.prefixed_attrs(HELP_PREFIX))
    }

    /// Tabular view: the column mapping handed to a grid rendering layer
    ///
    /// Seeds a `data` attribute with the field name unless `dt_data` is
    /// exactly `false`; strips the `dt_` prefix from the remaining tabular
    /// keys, renaming `template` to `tmpl` and `templateContext` to
    /// `tmplContext`. A `tmplContext` callback is rebound so its result
    /// carries this definition under `field`.
    pub fn to_tabular(&self) -> Option<TabularAttrs> {
        if !self.participates_in_tabular() {
            return None;
        }
        let mut res = TabularAttrs::new();
        if let Some(name) = self.name() {
            if self.gate_open(DATA_KEY) {
                res.insert(DATA_ATTR.to_string(), AttrValue::Json(Value::from(name)));
            }
        }
        for (key, value) in self.raw.iter() {
            if key == DATA_KEY {
                continue;
            }
            let Some(stripped) = key.strip_prefix(TABULAR_PREFIX) else {
                continue;
            };
            let column_key = match stripped {
                "template" => "tmpl",
                "templateContext" => TMPL_CONTEXT_ATTR,
                other => other,
            };
            let attr = match value {
                AttrValue::Context(callback) if column_key == TMPL_CONTEXT_ATTR => {
                    AttrValue::Context(self.bind_context(callback))
                }
                other => other.clone(),
            };
            res.insert(column_key.to_string(), attr);
        }
        Some(res)
    }

    // Rebinds a row-context callback so its result carries this definition.
    // The handle is captured strongly at projection time: a rendering layer
    // that outlives the collection still sees a live back-reference.
    fn bind_context(&self, callback: &ContextFn) -> ContextFn {
        let inner = Arc::clone(callback);
        let field = self.this.upgrade();
        Arc::new(move |row: &Value| {
            let mut ctx = inner(row);
            ctx.field = field.clone();
            ctx
        })
    }

    fn schema_attrs(&self) -> JsonMap {
        let mut res = JsonMap::new();
        for (key, value) in self.raw.iter() {
            if key == NAME_KEY || key == SCHEMA_GATE {
                continue;
            }
            if key.starts_with(TABULAR_PREFIX)
                || key.starts_with(FORM_PREFIX)
                || key.starts_with(HELP_PREFIX)
            {
                continue;
            }
            // callbacks are tabular-only and have no JSON rendition
            if let Some(json) = value.as_json() {
                res.insert(key.to_string(), json.clone());
            }
        }
        res
    }

    fn prefixed_attrs(&self, prefix: &str) -> JsonMap {
        let mut res = JsonMap::new();
        for (key, value) in self.raw.iter() {
            if let Some(stripped) = key.strip_prefix(prefix) {
                if let Some(json) = value.as_json() {
                    res.insert(stripped.to_string(), json.clone());
                }
            }
        }
        res
    }
}
