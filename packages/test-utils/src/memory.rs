//! In-memory relation fetcher
//!
//! A table of pre-inserted rows per relationship, with call counters and
//! failure injection for asserting loader behavior.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering as AtomicOrdering};
use std::sync::Mutex;

use futures_util::future::BoxFuture;
use graphloom_core::{FetchedRow, Key, OrderDirection, RelationshipId, Row, ScalarValue, SortColumn};
use graphloom_loader::{CountSpec, FetchError, FetchResult, QuerySpec, RelationFetcher, Slice};
use graphloom_pagination::SeekPredicate;

/// In-memory backend implementing the loader's fetch contract
#[derive(Default)]
pub struct MemoryBackend {
    tables: Mutex<HashMap<RelationshipId, Vec<FetchedRow>>>,
    fetch_calls: AtomicUsize,
    count_calls: AtomicUsize,
    fetch_error: Mutex<Option<String>>,
    panic_on_fetch: AtomicBool,
}

impl MemoryBackend {
    /// Create an empty backend
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert rows for a relationship, in natural (insertion) order
    pub fn insert_rows(&self, relationship: impl Into<RelationshipId>, rows: Vec<FetchedRow>) {
        self.tables
            .lock()
            .unwrap()
            .entry(relationship.into())
            .or_default()
            .extend(rows);
    }

    /// Number of `fetch_rows` calls made so far
    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(AtomicOrdering::SeqCst)
    }

    /// Number of `count_rows` calls made so far
    pub fn count_calls(&self) -> usize {
        self.count_calls.load(AtomicOrdering::SeqCst)
    }

    /// Make every subsequent fetch and count fail with this message
    pub fn fail_fetches(&self, message: impl Into<String>) {
        *self.fetch_error.lock().unwrap() = Some(message.into());
    }

    /// Clear a previously injected failure
    pub fn clear_failure(&self) {
        *self.fetch_error.lock().unwrap() = None;
    }

    /// Make the next fetch panic, tearing down its flush task
    ///
    /// One-shot: the flag clears when it fires, so later fetches
    /// succeed. Used to assert that pending requests are rejected with
    /// a cancellation error instead of hanging, and that the loader
    /// stays usable afterwards.
    pub fn panic_on_fetch(&self) {
        self.panic_on_fetch.store(true, AtomicOrdering::SeqCst);
    }

    /// Rows for `relationship` whose key matches one of `keys`
    fn matching(
        &self,
        relationship: &RelationshipId,
        keys: &[Key],
        key_columns: &[String],
        junction: bool,
    ) -> Vec<FetchedRow> {
        let wanted: HashSet<&Key> = keys.iter().collect();
        let tables = self.tables.lock().unwrap();
        let Some(rows) = tables.get(relationship) else {
            return Vec::new();
        };
        rows.iter()
            .filter(|row| {
                let key = if junction {
                    row.parent_key.clone()
                } else {
                    Some(row_key(&row.node, key_columns))
                };
                key.as_ref().is_some_and(|key| wanted.contains(key))
            })
            .cloned()
            .collect()
    }

    fn injected_failure(&self) -> Option<FetchError> {
        self.fetch_error
            .lock()
            .unwrap()
            .as_ref()
            .map(FetchError::new)
    }
}

impl RelationFetcher for MemoryBackend {
    fn fetch_rows<'a>(&'a self, spec: &'a QuerySpec) -> BoxFuture<'a, FetchResult<Vec<FetchedRow>>> {
        Box::pin(async move {
            if self.panic_on_fetch.swap(false, AtomicOrdering::SeqCst) {
                panic!("fetch panic injected by test");
            }
            self.fetch_calls.fetch_add(1, AtomicOrdering::SeqCst);
            if let Some(err) = self.injected_failure() {
                return Err(err);
            }

            let mut rows = self.matching(
                &spec.relationship,
                &spec.keys,
                &spec.key_columns,
                spec.junction.is_some(),
            );
            sort_rows(&mut rows, &spec.order_by);

            let rows = match &spec.slice {
                Slice::Offset {
                    offset,
                    limit,
                    fetch_extra,
                } => {
                    let take = *limit + u64::from(*fetch_extra);
                    rows.into_iter()
                        .skip(*offset as usize)
                        .take(take as usize)
                        .collect()
                }
                Slice::Keyset {
                    seek,
                    limit,
                    backward,
                } => {
                    if *backward {
                        rows.reverse();
                    }
                    let rows: Vec<FetchedRow> = match seek {
                        Some(predicate) => rows
                            .into_iter()
                            .filter(|row| seek_matches(&row.node, &spec.order_by, predicate))
                            .collect(),
                        None => rows,
                    };
                    rows.into_iter().take(*limit as usize + 1).collect()
                }
            };
            Ok(rows)
        })
    }

    fn count_rows<'a>(&'a self, spec: &'a CountSpec) -> BoxFuture<'a, FetchResult<u64>> {
        Box::pin(async move {
            self.count_calls.fetch_add(1, AtomicOrdering::SeqCst);
            if let Some(err) = self.injected_failure() {
                return Err(err);
            }
            let rows = self.matching(
                &spec.relationship,
                &spec.keys,
                &spec.key_columns,
                spec.junction.is_some(),
            );
            Ok(rows.len() as u64)
        })
    }
}

/// Build a row's key from the named key columns, NULL for absent ones
fn row_key(row: &Row, key_columns: &[String]) -> Key {
    Key::new(
        key_columns
            .iter()
            .map(|column| row.get(column).cloned().unwrap_or(ScalarValue::Null))
            .collect(),
    )
}

/// Stable sort honoring each column's declared direction
fn sort_rows(rows: &mut [FetchedRow], order_by: &[SortColumn]) {
    if order_by.is_empty() {
        return;
    }
    rows.sort_by(|a, b| compare_rows(&a.node, &b.node, order_by));
}

/// Lexicographic comparison in declared sort order
fn compare_rows(a: &Row, b: &Row, order_by: &[SortColumn]) -> Ordering {
    for sort in order_by {
        let left = a.get(&sort.column).unwrap_or(&ScalarValue::Null);
        let right = b.get(&sort.column).unwrap_or(&ScalarValue::Null);
        let mut ord = left.compare(right).unwrap_or(Ordering::Equal);
        if sort.direction == OrderDirection::Desc {
            ord = ord.reverse();
        }
        if ord != Ordering::Equal {
            return ord;
        }
    }
    Ordering::Equal
}

/// Whether a row lies past the seek tuple in traversal direction
fn seek_matches(row: &Row, order_by: &[SortColumn], predicate: &SeekPredicate) -> bool {
    let mut ord = Ordering::Equal;
    for (sort, target) in order_by.iter().zip(&predicate.tuple) {
        let value = row.get(&sort.column).unwrap_or(&ScalarValue::Null);
        let mut column_ord = value.compare(target).unwrap_or(Ordering::Equal);
        if sort.direction == OrderDirection::Desc {
            column_ord = column_ord.reverse();
        }
        if column_ord != Ordering::Equal {
            ord = column_ord;
            break;
        }
    }
    if predicate.backward {
        ord == Ordering::Less
    } else {
        ord == Ordering::Greater
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spec(keys: Vec<Key>, slice: Slice, order_by: Vec<SortColumn>) -> QuerySpec {
        QuerySpec {
            relationship: "Team.heroes".into(),
            keys,
            key_columns: vec!["team_id".into()],
            order_by,
            slice,
            junction: None,
        }
    }

    fn seed(backend: &MemoryBackend) {
        backend.insert_rows(
            "Team.heroes",
            (0..5)
                .map(|i| {
                    FetchedRow::node(Row::new().with("team_id", 1i64).with("id", i as i64))
                })
                .collect(),
        );
    }

    #[tokio::test]
    async fn test_offset_slice_with_sentinel() {
        let backend = MemoryBackend::new();
        seed(&backend);
        let rows = backend
            .fetch_rows(&spec(
                vec![Key::single(1i64)],
                Slice::Offset {
                    offset: 1,
                    limit: 2,
                    fetch_extra: true,
                },
                Vec::new(),
            ))
            .await
            .unwrap();
        // limit + sentinel
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].node.get("id"), Some(&ScalarValue::Int(1)));
    }

    #[tokio::test]
    async fn test_keyset_backward_fetch_is_reversed() {
        let backend = MemoryBackend::new();
        seed(&backend);
        let order_by = vec![SortColumn::asc("id")];
        let rows = backend
            .fetch_rows(&spec(
                vec![Key::single(1i64)],
                Slice::Keyset {
                    seek: Some(SeekPredicate {
                        tuple: vec![ScalarValue::Int(4)],
                        backward: true,
                    }),
                    limit: 2,
                    backward: true,
                },
                order_by,
            ))
            .await
            .unwrap();
        let ids: Vec<_> = rows.iter().map(|r| r.node.get("id").unwrap()).collect();
        // Reversed order, rows strictly before the tuple, limit + 1
        assert_eq!(
            ids,
            vec![
                &ScalarValue::Int(3),
                &ScalarValue::Int(2),
                &ScalarValue::Int(1)
            ]
        );
    }

    #[tokio::test]
    async fn test_injected_failure() {
        let backend = MemoryBackend::new();
        seed(&backend);
        backend.fail_fetches("boom");
        let result = backend
            .fetch_rows(&spec(
                vec![Key::single(1i64)],
                Slice::Offset {
                    offset: 0,
                    limit: 10,
                    fetch_extra: false,
                },
                Vec::new(),
            ))
            .await;
        assert!(result.is_err());
    }
}
