//! API schema types for request/response definitions.
//!
//! Each sub-module defines the response types for a specific API domain.
//! Types use serde derives for JSON serialization.

pub mod common;
pub mod programs;
