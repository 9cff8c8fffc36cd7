//! The backend fetch seam
//!
//! Storage engines are external collaborators: the loader describes what
//! it needs as a [`QuerySpec`] and the backend translates that into its
//! own query language. The backend must apply the requested ordering and
//! slice exactly; this layer imposes no timeout, backends surface their
//! own failures as [`FetchError`]s.

use futures_util::future::BoxFuture;
use graphloom_core::{FetchedRow, Key, RelationshipId, SecondaryTable, SortColumn};
use graphloom_pagination::SeekPredicate;
use thiserror::Error;

/// A backend fetch failure
///
/// Opaque to this layer; carries the backend's own description. The same
/// error instance is delivered to every request in the failed batch.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("backend fetch failed: {0}")]
pub struct FetchError(String);

impl FetchError {
    /// Wrap a backend error message
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Result type for backend fetches
pub type FetchResult<T> = Result<T, FetchError>;

/// The row window requested from the backend
#[derive(Debug, Clone, PartialEq)]
pub enum Slice {
    /// Offset window over the fixed row order
    Offset {
        /// Rows to skip
        offset: u64,
        /// Rows in the page
        limit: u64,
        /// When set, return up to `limit + 1` rows; the extra row is a
        /// sentinel for next-page detection and is trimmed by the caller
        fetch_extra: bool,
    },
    /// Keyset seek over the declared sort columns
    ///
    /// The backend always returns up to `limit + 1` rows. For backward
    /// seeks the rows must arrive in reversed sort order; the caller
    /// restores display order.
    Keyset {
        /// Seek past this cursor tuple, absent on the first page
        seek: Option<SeekPredicate>,
        /// Rows in the page
        limit: u64,
        /// Whether this is a backward (reversed-order) fetch
        backward: bool,
    },
}

/// One backend fetch, fully described
///
/// For junction relationships, `junction` carries the many-to-many join:
/// the backend joins parent key, junction table and target table, keys
/// the predicate on `key_columns` (the junction's parent columns), and
/// returns each target row paired with its parent key value.
#[derive(Debug, Clone, PartialEq)]
pub struct QuerySpec {
    /// Relationship being fetched
    pub relationship: RelationshipId,
    /// Requested parent keys, in first-appearance order
    pub keys: Vec<Key>,
    /// Columns the key predicate applies to: the remote columns of the
    /// relationship, or the junction table's parent columns
    pub key_columns: Vec<String>,
    /// Ordering the backend must apply (empty means natural row order)
    pub order_by: Vec<SortColumn>,
    /// Row window to return
    pub slice: Slice,
    /// Junction-table join for many-to-many relationships
    pub junction: Option<SecondaryTable>,
}

/// One backend count, for backward offset pagination
#[derive(Debug, Clone, PartialEq)]
pub struct CountSpec {
    /// Relationship being counted
    pub relationship: RelationshipId,
    /// Parent keys the count is restricted to
    pub keys: Vec<Key>,
    /// Columns the key predicate applies to
    pub key_columns: Vec<String>,
    /// Junction-table join for many-to-many relationships
    pub junction: Option<SecondaryTable>,
}

/// Narrow interface to the storage engine
///
/// Implementations translate specs into backend queries. Methods return
/// boxed futures so the loader can hold backends behind `dyn`.
pub trait RelationFetcher: Send + Sync {
    /// Fetch the rows described by `spec`
    fn fetch_rows<'a>(&'a self, spec: &'a QuerySpec) -> BoxFuture<'a, FetchResult<Vec<FetchedRow>>>;

    /// Count the rows described by `spec`
    fn count_rows<'a>(&'a self, spec: &'a CountSpec) -> BoxFuture<'a, FetchResult<u64>>;
}
