//! Validation and filtering system
//!
//! Request bodies are filtered (trim, blank to absent), type checked, then
//! validated against the rules declared on the payload structs.

pub mod filters;
pub mod validated;
pub mod validators;

pub use validated::{Payload, Validated};
