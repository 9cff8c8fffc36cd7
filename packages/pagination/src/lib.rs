//! Relay-style cursor pagination for graphloom
//!
//! This crate turns Relay `first`/`after`/`last`/`before` arguments into
//! concrete fetch slices and assembles the resulting rows back into the
//! connection wire shape (`edges` + `pageInfo`).
//!
//! Two pagination modes are supported:
//!
//! - **Offset mode**: position cursors wrap a zero-based row index into a
//!   fixed ordering. Backward pagination (`last`) needs the total row
//!   count; forward pagination detects further pages with a one-extra-row
//!   sentinel instead.
//! - **Keyset mode**: cursors wrap the sort-column values of the
//!   last-seen row and pagination seeks past them, never counting rows.
//!
//! Both modes produce byte-identical connection shapes; only the cursor
//! contents differ.

pub mod cursor;

mod args;
mod connection;
mod error;
mod planner;

pub use args::{PaginationArgs, PaginationSignature};
pub use connection::{Connection, Edge, PageInfo};
pub use error::{PaginationError, PaginationResult};
pub use planner::{
    KeysetPlan, OffsetPlan, OffsetSlice, PaginationPlan, PaginationPlanner, SeekPredicate,
};
