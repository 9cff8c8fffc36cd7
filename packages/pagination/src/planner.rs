//! Pagination planning: arguments to concrete fetch slices
//!
//! The planner picks the pagination mode from the relationship's declared
//! ordering (keyset when sort columns exist, offset otherwise), then
//! decodes and validates the supplied cursors for that mode.
//!
//! Offset plans resolve to an `offset`+`limit` window. Backward offset
//! pagination (`last`) needs the total row count, which the plan reports
//! via [`OffsetPlan::needs_count`]; the caller runs one count fetch and
//! feeds it back into [`OffsetPlan::resolve`]. Forward offset pagination
//! skips counting and detects further pages with a one-extra-row
//! sentinel.
//!
//! Keyset plans carry the decoded seek tuple and always fetch one row
//! beyond the limit instead of counting. Backward keyset fetches run in
//! reversed sort order; [`KeysetPlan::finish`] reverses the slice back
//! into forward display order.

use graphloom_core::{ScalarValue, SortColumn};
use serde::{Deserialize, Serialize};

use crate::args::PaginationArgs;
use crate::cursor;
use crate::error::{PaginationError, PaginationResult};

/// Plans pagination arguments against a relationship's declared ordering
pub struct PaginationPlanner;

impl PaginationPlanner {
    /// Validate arguments and build a plan
    ///
    /// `order_by` is the relationship's declared ordering: empty selects
    /// offset mode, non-empty selects keyset mode. Cursors of the wrong
    /// kind for the selected mode are malformed-cursor errors.
    pub fn plan(
        args: &PaginationArgs,
        order_by: &[SortColumn],
        max_page_size: i32,
    ) -> PaginationResult<PaginationPlan> {
        args.validate(max_page_size)?;
        let max_page_size = max_page_size.max(0) as u64;

        if order_by.is_empty() {
            let start = match &args.after {
                Some(after) => {
                    let index = cursor::decode_position(after)
                        .ok_or(PaginationError::MalformedCursor { name: "after" })?;
                    index + 1
                }
                None => 0,
            };
            let before = match &args.before {
                Some(before) => Some(
                    cursor::decode_position(before)
                        .ok_or(PaginationError::MalformedCursor { name: "before" })?,
                ),
                None => None,
            };
            Ok(PaginationPlan::Offset(OffsetPlan {
                start,
                before,
                first: args.first.map(|n| n as u64),
                last: args.last.map(|n| n as u64),
                max_page_size,
            }))
        } else {
            let decode = |name: &'static str, value: &Option<String>| -> PaginationResult<_> {
                match value {
                    Some(raw) => {
                        let tuple = cursor::decode_keyset(raw)
                            .filter(|tuple| tuple.len() == order_by.len())
                            .ok_or(PaginationError::MalformedCursor { name })?;
                        Ok(Some(tuple))
                    }
                    None => Ok(None),
                }
            };
            Ok(PaginationPlan::Keyset(KeysetPlan {
                after: decode("after", &args.after)?,
                before: decode("before", &args.before)?,
                first: args.first.map(|n| n as u64),
                last: args.last.map(|n| n as u64),
                order_by: order_by.to_vec(),
                max_page_size,
            }))
        }
    }
}

/// A validated pagination plan for one coordinator
#[derive(Debug, Clone, PartialEq)]
pub enum PaginationPlan {
    /// Position-cursor pagination over a fixed row order
    Offset(OffsetPlan),
    /// Seek pagination over declared sort columns
    Keyset(KeysetPlan),
}

/// Offset-mode plan: decoded cursor indices plus page size arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetPlan {
    /// First addressable row index (`after` index + 1, or 0)
    start: u64,
    /// Exclusive end of the addressable window, from `before`
    before: Option<u64>,
    first: Option<u64>,
    last: Option<u64>,
    max_page_size: u64,
}

impl OffsetPlan {
    /// Whether resolving this plan requires the total row count
    ///
    /// Only backward pagination needs it; forward pagination uses the
    /// extra-row sentinel instead of a count query.
    pub fn needs_count(&self) -> bool {
        self.last.is_some()
    }

    /// Resolve the plan into a concrete offset/limit window
    ///
    /// `total` must be supplied when [`needs_count`](Self::needs_count)
    /// is true.
    pub fn resolve(&self, total: Option<u64>) -> PaginationResult<OffsetSlice> {
        if let Some(last) = self.last {
            let total = total.ok_or(PaginationError::CountRequired)?;
            // Window of addressable rows ends at `before` (exclusive) or
            // at the end of the result set.
            let window = match self.before {
                Some(before) => before.min(total),
                None => total,
            };
            Ok(OffsetSlice {
                offset: window.saturating_sub(last),
                limit: last.min(window),
                total: Some(total),
                fetch_extra: false,
            })
        } else {
            let mut limit = self.first.unwrap_or(self.max_page_size);
            if let Some(before) = self.before {
                // `before` without `last` bounds the window: rows in
                // [start, before), further capped by `first`.
                limit = limit.min(before.saturating_sub(self.start));
            }
            Ok(OffsetSlice {
                offset: self.start,
                limit,
                total,
                fetch_extra: total.is_none(),
            })
        }
    }
}

/// A resolved offset-mode fetch window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OffsetSlice {
    /// Number of rows to skip
    pub offset: u64,
    /// Number of rows in the page
    pub limit: u64,
    /// Total row count, when one was fetched
    pub total: Option<u64>,
    /// Whether the fetch should return one extra sentinel row beyond
    /// `limit` to detect a next page
    pub fetch_extra: bool,
}

impl OffsetSlice {
    /// Trim a fetched row set to the page window
    ///
    /// Returns the kept rows and whether a sentinel row past the window
    /// was present.
    pub fn trim<T>(&self, mut rows: Vec<T>) -> (Vec<T>, bool) {
        let extra = self.fetch_extra && rows.len() as u64 > self.limit;
        rows.truncate(self.limit as usize);
        (rows, extra)
    }

    /// Whether rows exist before this page
    pub fn has_previous_page(&self) -> bool {
        self.offset > 0
    }

    /// Whether rows exist after this page
    ///
    /// Uses the total count when known, otherwise the sentinel result
    /// from [`trim`](Self::trim).
    pub fn has_next_page(&self, kept: usize, extra: bool) -> bool {
        match self.total {
            Some(total) => self.offset + (kept as u64) < total,
            None => extra,
        }
    }
}

/// Seek predicate for a keyset fetch
///
/// Forward seeks select rows whose sort tuple orders after `tuple`;
/// backward seeks select rows ordering before it. Comparison is
/// lexicographic in the declared sort-column order, honoring each
/// column's direction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeekPredicate {
    /// Sort-column values of the cursor row
    pub tuple: Vec<ScalarValue>,
    /// Seek direction: `true` selects rows ordering before the tuple
    pub backward: bool,
}

/// Keyset-mode plan: decoded seek tuples plus page size arguments
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetPlan {
    after: Option<Vec<ScalarValue>>,
    before: Option<Vec<ScalarValue>>,
    first: Option<u64>,
    last: Option<u64>,
    order_by: Vec<SortColumn>,
    max_page_size: u64,
}

impl KeysetPlan {
    /// Whether this plan paginates backward
    pub fn backward(&self) -> bool {
        self.last.is_some() || self.before.is_some()
    }

    /// Page size for this plan; the fetch requests one row more
    pub fn limit(&self) -> u64 {
        self.first.or(self.last).unwrap_or(self.max_page_size)
    }

    /// The declared sort columns, in order
    pub fn order_by(&self) -> &[SortColumn] {
        &self.order_by
    }

    /// The seek predicate, if a cursor was supplied
    pub fn seek(&self) -> Option<SeekPredicate> {
        if self.backward() {
            self.before.as_ref().map(|tuple| SeekPredicate {
                tuple: tuple.clone(),
                backward: true,
            })
        } else {
            self.after.as_ref().map(|tuple| SeekPredicate {
                tuple: tuple.clone(),
                backward: false,
            })
        }
    }

    /// Trim the sentinel row and restore forward display order
    ///
    /// Backward fetches arrive in reversed sort order; after trimming the
    /// sentinel, the slice is reversed back so callers always see forward
    /// order. Returns the rows and the page-boundary flags
    /// `(has_previous_page, has_next_page)`.
    pub fn finish<T>(&self, mut rows: Vec<T>) -> (Vec<T>, bool, bool) {
        let limit = self.limit();
        let extra = rows.len() as u64 > limit;
        rows.truncate(limit as usize);

        if self.backward() {
            rows.reverse();
            (rows, extra, self.before.is_some())
        } else {
            (rows, self.after.is_some(), extra)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use rstest::rstest;

    fn offset_plan(args: &PaginationArgs) -> OffsetPlan {
        match PaginationPlanner::plan(args, &[], 100).unwrap() {
            PaginationPlan::Offset(plan) => plan,
            PaginationPlan::Keyset(_) => panic!("expected offset plan"),
        }
    }

    fn keyset_plan(args: &PaginationArgs) -> KeysetPlan {
        let order_by = vec![SortColumn::asc("name")];
        match PaginationPlanner::plan(args, &order_by, 100).unwrap() {
            PaginationPlan::Keyset(plan) => plan,
            PaginationPlan::Offset(_) => panic!("expected keyset plan"),
        }
    }

    #[test]
    fn test_default_args_use_max_page_size() {
        let slice = offset_plan(&PaginationArgs::none()).resolve(None).unwrap();
        assert_eq!(slice.offset, 0);
        assert_eq!(slice.limit, 100);
        assert!(slice.fetch_extra);
    }

    #[test]
    fn test_first_after_window() {
        let after = cursor::encode_position(2);
        let args = PaginationArgs::forward(4, Some(after));
        let slice = offset_plan(&args).resolve(None).unwrap();
        // after index 2 means the window starts at row 3
        assert_eq!(slice.offset, 3);
        assert_eq!(slice.limit, 4);
    }

    #[rstest]
    // last=3 over 10 rows: the final 3 rows
    #[case(3, None, 10, 7, 3)]
    // last=4 before index 7: rows 3..7
    #[case(4, Some(7), 10, 3, 4)]
    // last larger than the window clamps to it
    #[case(5, Some(3), 10, 0, 3)]
    // last larger than the result set clamps to the set
    #[case(20, None, 10, 0, 10)]
    fn test_last_resolution(
        #[case] last: i32,
        #[case] before_index: Option<u64>,
        #[case] total: u64,
        #[case] offset: u64,
        #[case] limit: u64,
    ) {
        let before = before_index.map(cursor::encode_position);
        let plan = offset_plan(&PaginationArgs::backward(last, before));
        assert!(plan.needs_count());
        let slice = plan.resolve(Some(total)).unwrap();
        assert_eq!(slice.offset, offset);
        assert_eq!(slice.limit, limit);
        assert!(!slice.fetch_extra);
    }

    #[test]
    fn test_has_next_page_against_known_total() {
        let plan = offset_plan(&PaginationArgs::backward(3, None));
        let slice = plan.resolve(Some(10)).unwrap();
        assert!(slice.has_previous_page());
        assert!(!slice.has_next_page(3, false));

        let before = cursor::encode_position(7);
        let plan = offset_plan(&PaginationArgs::backward(4, Some(before)));
        let slice = plan.resolve(Some(10)).unwrap();
        // Rows 3..7 of 10: more rows follow the window
        assert!(slice.has_next_page(4, false));
    }

    #[test]
    fn test_before_without_last_bounds_window() {
        let before = cursor::encode_position(5);
        let args = PaginationArgs {
            before: Some(before),
            ..Default::default()
        };
        let plan = offset_plan(&args);
        assert!(!plan.needs_count());
        let slice = plan.resolve(None).unwrap();
        // All rows before index 5: the window [0, 5)
        assert_eq!(slice.offset, 0);
        assert_eq!(slice.limit, 5);
    }

    #[test]
    fn test_last_without_total_is_an_error() {
        let plan = offset_plan(&PaginationArgs::backward(3, None));
        assert_matches!(plan.resolve(None), Err(PaginationError::CountRequired));
    }

    #[test]
    fn test_malformed_after_cursor_rejected() {
        let args = PaginationArgs::forward(3, Some("garbage".into()));
        assert_matches!(
            PaginationPlanner::plan(&args, &[], 100),
            Err(PaginationError::MalformedCursor { name: "after" })
        );
    }

    #[test]
    fn test_keyset_cursor_in_offset_mode_rejected() {
        let keyset = cursor::encode_keyset(&[ScalarValue::Int(1)]).unwrap();
        let args = PaginationArgs::forward(3, Some(keyset));
        assert_matches!(
            PaginationPlanner::plan(&args, &[], 100),
            Err(PaginationError::MalformedCursor { name: "after" })
        );
    }

    #[test]
    fn test_keyset_tuple_arity_must_match_ordering() {
        let after = cursor::encode_keyset(&[ScalarValue::Int(1), ScalarValue::Int(2)]).unwrap();
        let args = PaginationArgs::forward(3, Some(after));
        let order_by = vec![SortColumn::asc("name")];
        assert_matches!(
            PaginationPlanner::plan(&args, &order_by, 100),
            Err(PaginationError::MalformedCursor { name: "after" })
        );
    }

    #[test]
    fn test_keyset_forward_seek() {
        let after = cursor::encode_keyset(&[ScalarValue::Text("m".into())]).unwrap();
        let plan = keyset_plan(&PaginationArgs::forward(3, Some(after)));
        assert!(!plan.backward());
        assert_eq!(plan.limit(), 3);
        let seek = plan.seek().unwrap();
        assert!(!seek.backward);
        assert_eq!(seek.tuple, vec![ScalarValue::Text("m".into())]);
    }

    #[test]
    fn test_keyset_finish_forward_trims_sentinel() {
        let plan = keyset_plan(&PaginationArgs::forward(2, None));
        let (rows, has_prev, has_next) = plan.finish(vec![1, 2, 3]);
        assert_eq!(rows, vec![1, 2]);
        assert!(!has_prev);
        assert!(has_next);
    }

    #[test]
    fn test_keyset_finish_backward_restores_order() {
        let before = cursor::encode_keyset(&[ScalarValue::Int(9)]).unwrap();
        let plan = keyset_plan(&PaginationArgs::backward(2, Some(before)));
        // Backward fetch arrives in reversed sort order: 8, 7, 6
        let (rows, has_prev, has_next) = plan.finish(vec![8, 7, 6]);
        assert_eq!(rows, vec![7, 8]);
        assert!(has_prev);
        assert!(has_next);
    }

    #[test]
    fn test_keyset_finish_backward_without_more_rows() {
        let plan = keyset_plan(&PaginationArgs::backward(5, None));
        let (rows, has_prev, has_next) = plan.finish(vec![3, 2, 1]);
        assert_eq!(rows, vec![1, 2, 3]);
        assert!(!has_prev);
        assert!(!has_next);
    }
}
