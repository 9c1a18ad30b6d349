//! Candidate validation
//!
//! Field-level validators work on raw JSON values so they apply equally to
//! HTTP payloads and to normalized extraction output.

pub mod candidate;
pub mod validators;

pub use candidate::{REQUIRED_FIELDS, validate_candidate};
