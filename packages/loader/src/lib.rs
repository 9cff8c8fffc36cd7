//! Batched relationship loading for graphloom
//!
//! This crate is the request-coalescing engine that turns per-parent
//! relationship fan-out into one backend fetch per batch, solving the
//! N+1 problem for resolver-style callers.
//!
//! The flow: a caller asks the [`Loader`] registry for the
//! [`BatchCoordinator`] of relationship R with pagination arguments P,
//! then calls [`BatchCoordinator::load`] with a parent key. The
//! coordinator queues the request; at the next scheduling boundary it
//! issues exactly one backend fetch for all queued keys (plus at most
//! one count fetch for backward offset pagination), groups the returned
//! rows back by parent key, and resolves every queued request.
//!
//! The backend stays behind the [`RelationFetcher`] seam: this crate
//! builds [`QuerySpec`] values describing what to fetch and never talks
//! to a storage engine directly.

mod batch;
mod config;
mod error;
mod fetch;
mod group;
mod loaded;
mod registry;

pub use batch::BatchCoordinator;
pub use config::LoaderConfig;
pub use error::{LoadError, LoadResult};
pub use fetch::{CountSpec, FetchError, FetchResult, QuerySpec, RelationFetcher, Slice};
pub use group::group_by_parent;
pub use loaded::{Loaded, Page};
pub use registry::Loader;
