//! Loader error types
//!
//! Errors are cloneable because one batch failure fans out to every
//! request waiting on that batch. Errors never cross from one
//! coordinator into another; a failed batch only rejects its own
//! waiters.

use graphloom_core::{CoreError, RelationshipId};
use graphloom_pagination::PaginationError;
use thiserror::Error;

use crate::fetch::FetchError;

/// Errors surfaced by relationship loads
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LoadError {
    /// Pagination argument validation or planning failed
    #[error(transparent)]
    Pagination(#[from] PaginationError),

    /// The backend fetch for a batch failed; every request in that
    /// batch receives this error
    #[error(transparent)]
    Fetch(#[from] FetchError),

    /// A misconfigured relationship descriptor
    #[error(transparent)]
    Descriptor(#[from] CoreError),

    /// Fetched rows are missing a remote key column named by the
    /// descriptor
    #[error("rows for relationship `{relationship}` are missing key column `{column}`")]
    MissingKeyColumn {
        relationship: RelationshipId,
        column: String,
    },

    /// A junction-table fetch returned a row without its parent key
    #[error("junction row for relationship `{relationship}` is missing its parent key")]
    MissingJunctionKey { relationship: RelationshipId },

    /// A row is missing a declared sort column, so its keyset cursor
    /// cannot be built
    #[error("row is missing sort column `{column}`")]
    MissingSortColumn { column: String },

    /// `load_connection` was called on a to-one relationship
    #[error("relationship `{relationship}` is to-one and has no connection shape")]
    NotACollection { relationship: RelationshipId },

    /// The surrounding operation was cancelled before the batch flushed
    #[error("batch for relationship `{relationship}` was cancelled before it resolved")]
    Cancelled { relationship: RelationshipId },

    /// Invalid loader configuration value
    #[error("invalid value for {name}: {value}")]
    Configuration { name: &'static str, value: String },
}

/// Result type for loader operations
pub type LoadResult<T> = Result<T, LoadError>;
