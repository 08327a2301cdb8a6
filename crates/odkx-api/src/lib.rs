//! # odkx-api
//!
//! Read-only HTTP facade over an ODK-X style table data service.
//!
//! This crate is responsible for:
//! - Serving row, attachment and survey question views of upstream tables
//! - Mapping upstream failures onto stable JSON error payloads
//! - Propagating request IDs and tracing every request
//! - Generating an `OpenAPI` document for the surface

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod config;
pub mod context;
pub mod error;
pub mod openapi;
pub mod router;
pub mod routes;
pub mod server;
pub mod state;

pub use openapi::{TablesApiDoc, openapi, openapi_json};
pub use router::tables_router;
pub use state::{TablesConfig, TablesState};
