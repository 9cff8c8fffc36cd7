//! Error types for descriptor construction

use thiserror::Error;

/// Errors raised while building relationship descriptors
///
/// These are programmer errors: they indicate a misconfigured schema and
/// are surfaced at schema-build time, before any load is issued.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// A relationship must name at least one local/remote column pair
    #[error("relationship `{relationship}` has no local/remote key pairs")]
    EmptyKeyPairs { relationship: String },

    /// Junction table parent columns must line up with the key pairs
    #[error(
        "junction table `{table}` on `{relationship}` must map {expected} parent column(s), got {actual}"
    )]
    JunctionColumnMismatch {
        relationship: String,
        table: String,
        expected: usize,
        actual: usize,
    },

    /// Junction table must name the target-side join columns
    #[error("junction table `{table}` on `{relationship}` has no target columns")]
    JunctionMissingTargetColumns { relationship: String, table: String },
}

/// Result type for descriptor construction
pub type CoreResult<T> = Result<T, CoreError>;
