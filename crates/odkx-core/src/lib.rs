//! # odkx-core
//!
//! Core types for the odkx-tables facade.
//!
//! This crate provides:
//!
//! - **Resources**: upstream table, row and file manifest entities as they
//!   appear on the wire
//! - **Client Trait**: the `TableDataClient` seam used to reach the upstream
//!   service, plus an in-memory implementation for tests and local runs
//! - **Reshaping**: row value flattening, attachment keying and survey
//!   question extraction from form definitions
//! - **Error Types**: shared error definitions and result types
//!
//! ## Example
//!
//! ```rust
//! use odkx_core::reshape::survey::extract_survey_questions;
//!
//! let questions = extract_survey_questions(
//!     r#"{"xlsx":{"survey":[{"name":"q1","type":"text","_row_num":3}]}}"#,
//! )
//! .unwrap();
//! assert_eq!(questions["q1"].row_num, 3);
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rust_2018_idioms)]
#![warn(clippy::pedantic)]
#![cfg_attr(test, allow(clippy::expect_used, clippy::unwrap_used))]

pub mod client;
pub mod error;
pub mod field;
pub mod observability;
pub mod resource;
pub mod reshape;

pub use client::{MemoryTableClient, Snapshot, TableDataClient};
pub use error::{Error, Result};
