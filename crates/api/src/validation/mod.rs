//! Request validation: a gate that runs an ordered list of field rules
//! and collapses failures into one categorized error.

pub mod gate;
pub mod job;
pub mod user;

pub use gate::{ErrorKind, FieldRule, ValidationGate, Violation};
