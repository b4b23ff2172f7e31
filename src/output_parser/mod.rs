//! Best-effort parsing for messy model output.
//!
//! Generative backends are *supposed* to return JSON but routinely wrap it
//! in markdown fences, leave trailing commas, use single quotes, or break
//! string literals across raw newlines. [`parse_value`] runs an ordered
//! fallback chain where later stages are progressively more permissive and
//! only run when the earlier, safer stages fail.

pub mod error;
pub mod extract;
pub mod json;
pub mod repair;

pub use error::ParseError;
pub use json::parse_value;
