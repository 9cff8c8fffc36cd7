//! Relay pagination arguments and their validation

use serde::{Deserialize, Serialize};

use crate::error::{PaginationError, PaginationResult};

/// Relay-style pagination arguments
///
/// All fields are optional. `first` pairs only with `after` (forward
/// pagination) and `last` pairs only with `before` (backward pagination);
/// other combinations are input errors.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PaginationArgs {
    /// Number of items from the front of the window
    pub first: Option<i32>,
    /// Opaque cursor to start after (exclusive)
    pub after: Option<String>,
    /// Number of items from the back of the window
    pub last: Option<i32>,
    /// Opaque cursor to end before (exclusive)
    pub before: Option<String>,
}

impl PaginationArgs {
    /// Arguments with no pagination applied (default page size)
    pub fn none() -> Self {
        Self::default()
    }

    /// Forward pagination: `first` with an optional `after` cursor
    pub fn forward(first: i32, after: Option<String>) -> Self {
        Self {
            first: Some(first),
            after,
            ..Self::default()
        }
    }

    /// Backward pagination: `last` with an optional `before` cursor
    pub fn backward(last: i32, before: Option<String>) -> Self {
        Self {
            last: Some(last),
            before,
            ..Self::default()
        }
    }

    /// Whether any pagination argument is present
    pub fn is_empty(&self) -> bool {
        self.first.is_none() && self.after.is_none() && self.last.is_none() && self.before.is_none()
    }

    /// Validate argument combinations and page sizes
    ///
    /// Rejects `first`+`last`, `first`+`before`, `last`+`after`, negative
    /// amounts, and amounts above `max_page_size`. Cursor contents are
    /// checked later, by the planner, once the pagination mode is known.
    pub fn validate(&self, max_page_size: i32) -> PaginationResult<()> {
        if self.first.is_some() && self.last.is_some() {
            return Err(PaginationError::FirstAndLast);
        }
        if self.first.is_some() && self.before.is_some() {
            return Err(PaginationError::FirstWithBefore);
        }
        if self.last.is_some() && self.after.is_some() {
            return Err(PaginationError::LastWithAfter);
        }
        for (name, amount) in [("first", self.first), ("last", self.last)] {
            if let Some(value) = amount {
                if value < 0 {
                    return Err(PaginationError::NegativeAmount { name, value });
                }
                if value > max_page_size {
                    return Err(PaginationError::AmountTooLarge {
                        name,
                        value,
                        max: max_page_size,
                    });
                }
            }
        }
        Ok(())
    }
}

/// Normalized identity of one pagination configuration
///
/// Two `load()` calls share a batch only when their pagination arguments
/// are identical; the signature is the coordinator cache key alongside
/// the relationship id. Argument equality is already canonical (absent
/// fields are `None`), so the signature simply wraps the arguments.
pub type PaginationSignature = PaginationArgs;
