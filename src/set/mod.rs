//! Field set subsystem
//!
//! Gathers an ordered collection of field definitions built from possibly
//! nested input, with by-name lookup, insertion-point extension and
//! whole-of-collection projections.

mod errors;
mod input;
mod set;

pub use errors::{SetError, SetResult};
pub use input::FieldInput;
pub use set::FieldSet;
