//! Route handlers for the table facade.

pub mod health;
pub mod openapi;
pub mod questions;
pub mod rows;
