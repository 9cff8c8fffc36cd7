//! The request-coalescing batch coordinator
//!
//! One coordinator exists per (relationship, pagination signature) pair
//! and lives for one logical operation. `load()` calls issued during one
//! scheduling window join the same batch; the first call schedules a
//! flush task that yields once (or sleeps the configured delay) and then
//! drains the batch with exactly one backend fetch. Batches are consumed
//! atomically and never reused, and a coordinator flushes at most one
//! batch at a time.
//!
//! Every pending request is resolved exactly once: with its grouped
//! result on success, with the same shared error if the fetch fails, or
//! with a cancellation error if the flush task is torn down before it
//! resolves. Dangling futures are not possible: dropping a batch drops
//! its reply channels, which wakes every waiter.

use std::collections::HashMap;
use std::sync::Arc;

use graphloom_core::{Cardinality, Key, RelationshipDescriptor, Row};
use graphloom_pagination::{Connection, PaginationPlan};
use tokio::sync::{oneshot, Mutex};

use crate::config::LoaderConfig;
use crate::error::{LoadError, LoadResult};
use crate::fetch::{CountSpec, QuerySpec, RelationFetcher, Slice};
use crate::group::group_by_parent;
use crate::loaded::{CursorStyle, Loaded, Page};

/// One key's slot in an open batch, with every request waiting on it
struct Slot {
    key: Key,
    waiters: Vec<oneshot::Sender<LoadResult<Loaded>>>,
}

/// The batch currently collecting requests
#[derive(Default)]
struct OpenBatch {
    /// Slots in first-appearance order
    slots: Vec<Slot>,
    /// Key to slot index, for duplicate-request dedup
    index: HashMap<Key, usize>,
}

impl OpenBatch {
    fn join(&mut self, key: Key, tx: oneshot::Sender<LoadResult<Loaded>>) {
        match self.index.get(&key) {
            Some(&i) => self.slots[i].waiters.push(tx),
            None => {
                self.index.insert(key.clone(), self.slots.len());
                self.slots.push(Slot {
                    key,
                    waiters: vec![tx],
                });
            }
        }
    }
}

struct CoordinatorState {
    open: Option<OpenBatch>,
    /// Whether a flush task currently owns the drain loop
    flush_running: bool,
    /// Resolved results retained for the coordinator's lifetime
    cache: HashMap<Key, Loaded>,
}

/// The DataLoader engine for one (relationship, pagination) pair
pub struct BatchCoordinator {
    descriptor: Arc<RelationshipDescriptor>,
    plan: PaginationPlan,
    fetcher: Arc<dyn RelationFetcher>,
    config: LoaderConfig,
    state: Mutex<CoordinatorState>,
}

impl BatchCoordinator {
    pub(crate) fn new(
        descriptor: Arc<RelationshipDescriptor>,
        plan: PaginationPlan,
        fetcher: Arc<dyn RelationFetcher>,
        config: LoaderConfig,
    ) -> Arc<Self> {
        Arc::new(Self {
            descriptor,
            plan,
            fetcher,
            config,
            state: Mutex::new(CoordinatorState {
                open: None,
                flush_running: false,
                cache: HashMap::new(),
            }),
        })
    }

    /// The relationship this coordinator loads
    pub fn descriptor(&self) -> &RelationshipDescriptor {
        &self.descriptor
    }

    /// Load the related rows for one parent key
    ///
    /// Joins the currently open batch (creating one if needed); a
    /// request for a key already pending in the open batch shares its
    /// slot. Keys with a NULL component resolve immediately to the
    /// empty result without touching the backend.
    pub async fn load(self: &Arc<Self>, key: Key) -> LoadResult<Loaded> {
        if key.has_null() {
            return Ok(self.empty_result());
        }

        let rx = {
            let mut state = self.state.lock().await;
            if self.config.cache_resolved {
                if let Some(hit) = state.cache.get(&key) {
                    return Ok(hit.clone());
                }
            }

            let (tx, rx) = oneshot::channel();
            state.open.get_or_insert_with(OpenBatch::default).join(key, tx);

            if !state.flush_running {
                state.flush_running = true;
                tokio::spawn(Arc::clone(self).run_flushes());
            }
            rx
        };

        match rx.await {
            Ok(result) => result,
            Err(_) => Err(LoadError::Cancelled {
                relationship: self.descriptor.id().clone(),
            }),
        }
    }

    /// Load one parent key's page as a Relay connection
    ///
    /// Only meaningful for to-many relationships.
    pub async fn load_connection(self: &Arc<Self>, key: Key) -> LoadResult<Connection<Row>> {
        match self.load(key).await? {
            Loaded::Many(page) => page.connection(),
            Loaded::One(_) => Err(LoadError::NotACollection {
                relationship: self.descriptor.id().clone(),
            }),
        }
    }

    fn empty_result(&self) -> Loaded {
        match self.descriptor.cardinality() {
            Cardinality::ToOne => Loaded::One(None),
            Cardinality::ToMany => Loaded::Many(Page::empty()),
        }
    }

    /// Drain loop owned by the flush task
    ///
    /// Takes batches one at a time so a coordinator never has two
    /// fetches in flight; exits once no batch is waiting. The guard
    /// keeps `flush_running` truthful even if this task unwinds
    /// mid-flush: without it, a panicking backend would leave the flag
    /// set and every later `load()` would queue without ever scheduling
    /// a flush.
    async fn run_flushes(self: Arc<Self>) {
        let mut guard = FlushGuard::arm(Arc::clone(&self));
        loop {
            self.coalesce_window().await;
            {
                let mut state = self.state.lock().await;
                match state.open.take() {
                    Some(batch) => {
                        drop(state);
                        self.flush(batch).await;
                    }
                    None => {
                        state.flush_running = false;
                        guard.disarm();
                        return;
                    }
                }
            }
        }
    }

    async fn coalesce_window(&self) {
        if self.config.batch_delay.is_zero() {
            tokio::task::yield_now().await;
        } else {
            tokio::time::sleep(self.config.batch_delay).await;
        }
    }

    /// Resolve one batch with a single backend fetch
    async fn flush(&self, batch: OpenBatch) {
        let keys: Vec<Key> = batch.slots.iter().map(|slot| slot.key.clone()).collect();
        tracing::debug!(
            relationship = %self.descriptor.id(),
            keys = keys.len(),
            "flushing batch"
        );

        match self.execute(&keys).await {
            Ok(results) => {
                let mut state = self.state.lock().await;
                for (slot, loaded) in batch.slots.into_iter().zip(results) {
                    if self.config.cache_resolved {
                        state.cache.insert(slot.key, loaded.clone());
                    }
                    for tx in slot.waiters {
                        let _ = tx.send(Ok(loaded.clone()));
                    }
                }
            }
            Err(err) => {
                tracing::debug!(
                    relationship = %self.descriptor.id(),
                    error = %err,
                    "batch fetch failed"
                );
                for slot in batch.slots {
                    for tx in slot.waiters {
                        let _ = tx.send(Err(err.clone()));
                    }
                }
            }
        }
    }

    /// Build and run the backend fetch, returning one result per key in
    /// request order
    async fn execute(&self, keys: &[Key]) -> LoadResult<Vec<Loaded>> {
        let (rows, style, has_previous_page, has_next_page) = match &self.plan {
            PaginationPlan::Offset(plan) => {
                let total = if plan.needs_count() {
                    Some(self.fetcher.count_rows(&self.count_spec(keys)).await?)
                } else {
                    None
                };
                let slice = plan.resolve(total)?;
                let spec = self.query_spec(
                    keys,
                    Slice::Offset {
                        offset: slice.offset,
                        limit: slice.limit,
                        fetch_extra: slice.fetch_extra,
                    },
                );
                let fetched = self.fetcher.fetch_rows(&spec).await?;
                let (rows, extra) = slice.trim(fetched);
                let has_next = slice.has_next_page(rows.len(), extra);
                (
                    rows,
                    CursorStyle::Position { base: slice.offset },
                    slice.has_previous_page(),
                    has_next,
                )
            }
            PaginationPlan::Keyset(plan) => {
                let spec = self.query_spec(
                    keys,
                    Slice::Keyset {
                        seek: plan.seek(),
                        limit: plan.limit(),
                        backward: plan.backward(),
                    },
                );
                let fetched = self.fetcher.fetch_rows(&spec).await?;
                let (rows, has_prev, has_next) = plan.finish(fetched);
                let columns = plan
                    .order_by()
                    .iter()
                    .map(|sort| sort.column.clone())
                    .collect();
                (rows, CursorStyle::Keyset { columns }, has_prev, has_next)
            }
        };

        tracing::debug!(
            relationship = %self.descriptor.id(),
            rows = rows.len(),
            "batch fetched"
        );

        let mut grouped = group_by_parent(rows, &self.descriptor)?;
        Ok(keys
            .iter()
            .map(|key| {
                let rows = grouped.remove(key).unwrap_or_default();
                match self.descriptor.cardinality() {
                    Cardinality::ToOne => Loaded::One(rows.into_iter().next()),
                    Cardinality::ToMany => Loaded::Many(Page {
                        rows,
                        style: style.clone(),
                        has_previous_page,
                        has_next_page,
                    }),
                }
            })
            .collect())
    }

    /// The columns the key predicate applies to: junction parent
    /// columns for many-to-many, remote columns otherwise
    fn key_columns(&self) -> Vec<String> {
        match self.descriptor.secondary_table() {
            Some(secondary) => secondary.parent_columns.clone(),
            None => self.descriptor.remote_columns(),
        }
    }

    fn query_spec(&self, keys: &[Key], slice: Slice) -> QuerySpec {
        let order_by = match &self.plan {
            PaginationPlan::Offset(_) => self.descriptor.ordering().to_vec(),
            PaginationPlan::Keyset(plan) => plan.order_by().to_vec(),
        };
        QuerySpec {
            relationship: self.descriptor.id().clone(),
            keys: keys.to_vec(),
            key_columns: self.key_columns(),
            order_by,
            slice,
            junction: self.descriptor.secondary_table().cloned(),
        }
    }

    fn count_spec(&self, keys: &[Key]) -> CountSpec {
        CountSpec {
            relationship: self.descriptor.id().clone(),
            keys: keys.to_vec(),
            key_columns: self.key_columns(),
            junction: self.descriptor.secondary_table().cloned(),
        }
    }
}

/// Restores coordinator state when the flush task exits abnormally
///
/// Armed for the lifetime of a flush task and disarmed on its normal
/// exit. If the task unwinds instead, the guard clears `flush_running`
/// and, when requests queued up in the meantime, schedules a fresh
/// flush task so they still resolve.
struct FlushGuard {
    coordinator: Option<Arc<BatchCoordinator>>,
}

impl FlushGuard {
    fn arm(coordinator: Arc<BatchCoordinator>) -> Self {
        Self {
            coordinator: Some(coordinator),
        }
    }

    fn disarm(&mut self) {
        self.coordinator = None;
    }
}

impl Drop for FlushGuard {
    fn drop(&mut self) {
        let Some(coordinator) = self.coordinator.take() else {
            return;
        };
        // Runs during unwind; without a runtime (shutdown) there are no
        // waiters left to recover.
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };
        tracing::debug!(
            relationship = %coordinator.descriptor.id(),
            "flush task exited abnormally, restoring coordinator state"
        );
        handle.spawn(async move {
            let mut state = coordinator.state.lock().await;
            if state.open.is_some() {
                tokio::spawn(Arc::clone(&coordinator).run_flushes());
            } else {
                state.flush_running = false;
            }
        });
    }
}
