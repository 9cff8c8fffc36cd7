//! Pagination error types
//!
//! All of these are input validation errors surfaced to the caller
//! before any backend work happens, with the exception of
//! [`PaginationError::CountRequired`], which guards an internal planner
//! invariant.

use thiserror::Error;

/// Errors produced while validating and planning pagination arguments
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PaginationError {
    /// `first` and `last` are mutually exclusive
    #[error("cannot provide both `first` and `last`")]
    FirstAndLast,

    /// `first` paginates forward and cannot combine with `before`
    #[error("`first` cannot be provided with `before`")]
    FirstWithBefore,

    /// `last` paginates backward and cannot combine with `after`
    #[error("`last` cannot be provided with `after`")]
    LastWithAfter,

    /// Page size arguments must be non-negative
    #[error("argument `{name}` must be non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: i32 },

    /// Page size arguments are clamped by configuration
    #[error("argument `{name}` cannot be higher than {max}, got {value}")]
    AmountTooLarge {
        name: &'static str,
        value: i32,
        max: i32,
    },

    /// A supplied cursor failed to decode or was of the wrong kind
    ///
    /// Silently ignoring a bad cursor would return a wrong page, so this
    /// is a hard error.
    #[error("malformed `{name}` cursor")]
    MalformedCursor { name: &'static str },

    /// Backward offset pagination was resolved without a total row count
    #[error("total row count required to resolve backward pagination")]
    CountRequired,

    /// A keyset cursor payload could not be serialized
    #[error("failed to encode keyset cursor: {0}")]
    CursorEncode(String),
}

/// Result type for pagination operations
pub type PaginationResult<T> = Result<T, PaginationError>;
