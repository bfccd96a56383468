//! Field definition subsystem
//!
//! Each data field is declared once as a flat, prefix-keyed definition and
//! projected on demand into four independent consumer views.
//!
//! # Design principles
//!
//! - Definitions are immutable after construction
//! - Projections are pure and deterministic
//! - Only the exact value `false` closes a participation gate
//! - Unrecognized keys route to the schema view (the default bucket)
//! - Key semantics beyond the prefix convention are the consumer's business

mod errors;
mod field;
mod raw;
mod value;

pub use errors::{DefinitionError, DefinitionResult, ErrorKind};
pub use field::{FieldDef, Surface, TabularAttrs};
pub use raw::RawDef;
pub use value::{AttrValue, ContextFn, JsonMap, RowContext};

pub(crate) use value::json_type_name;
