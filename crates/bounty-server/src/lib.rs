//! HTTP/JSON API server for bug-bounty program records.
//!
//! Provides a REST API to list (sorted and paginated), create, fetch and
//! delete programs. This crate contains the query validator, payload
//! validation, the program service, API schema types, error handling, and
//! route definitions.

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod query;
pub mod router;
pub mod schema;
pub mod service;
pub mod state;
pub mod validation;
