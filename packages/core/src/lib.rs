//! Core data model for the graphloom workspace
//!
//! This crate defines the value-level vocabulary shared by the pagination
//! and loader packages: dynamically-typed scalar values, foreign-key
//! tuples, named-column rows, and immutable relationship descriptors.
//!
//! Nothing here is async and nothing here talks to a backend; the types
//! in this crate are built once when a schema is assembled and are then
//! read by the batching and pagination layers.

mod descriptor;
mod error;
mod row;
mod scalar;

pub use descriptor::{
    Cardinality, KeyColumnPair, OrderDirection, RelationshipDescriptor, RelationshipId,
    SecondaryTable, SortColumn,
};
pub use error::{CoreError, CoreResult};
pub use row::{FetchedRow, Row};
pub use scalar::{Key, ScalarValue};
