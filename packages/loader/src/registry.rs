//! The relationship registry
//!
//! One [`Loader`] exists per logical operation (e.g. one GraphQL
//! request). It lazily creates one [`BatchCoordinator`] per distinct
//! (relationship, pagination signature) pair, so fan-out against the
//! same relationship with the same pagination shares a batch while
//! different paginations never conflate. Coordinators are never shared
//! across `Loader` instances.

use std::sync::Arc;

use dashmap::DashMap;
use graphloom_core::{Key, RelationshipDescriptor, RelationshipId};
use graphloom_pagination::{PaginationArgs, PaginationPlanner, PaginationSignature};

use crate::batch::BatchCoordinator;
use crate::config::LoaderConfig;
use crate::error::LoadResult;
use crate::fetch::{CountSpec, RelationFetcher};
use crate::loaded::Loaded;

/// Creates and caches batch coordinators for relationship loads
pub struct Loader {
    fetcher: Arc<dyn RelationFetcher>,
    config: LoaderConfig,
    coordinators: DashMap<(RelationshipId, PaginationSignature), Arc<BatchCoordinator>>,
}

impl Loader {
    /// Create a loader with default configuration
    pub fn new(fetcher: Arc<dyn RelationFetcher>) -> Self {
        Self::with_config(fetcher, LoaderConfig::default())
    }

    /// Create a loader with explicit configuration
    pub fn with_config(fetcher: Arc<dyn RelationFetcher>, config: LoaderConfig) -> Self {
        Self {
            fetcher,
            config,
            coordinators: DashMap::new(),
        }
    }

    /// Retrieve or create the coordinator for a relationship and
    /// pagination configuration
    ///
    /// Pagination arguments are validated here, before any coordinator
    /// exists: invalid combinations and malformed cursors fail fast and
    /// never reach the backend.
    pub fn loader_for(
        &self,
        descriptor: &Arc<RelationshipDescriptor>,
        args: &PaginationArgs,
    ) -> LoadResult<Arc<BatchCoordinator>> {
        let key = (descriptor.id().clone(), args.clone());
        if let Some(existing) = self.coordinators.get(&key) {
            return Ok(existing.clone());
        }

        let plan =
            PaginationPlanner::plan(args, descriptor.ordering(), self.config.max_page_size)?;
        tracing::debug!(relationship = %descriptor.id(), "creating batch coordinator");

        let coordinator = self
            .coordinators
            .entry(key)
            .or_insert_with(|| {
                BatchCoordinator::new(
                    descriptor.clone(),
                    plan,
                    self.fetcher.clone(),
                    self.config.clone(),
                )
            })
            .clone();
        Ok(coordinator)
    }

    /// Convenience: resolve one key through the appropriate coordinator
    pub async fn load(
        &self,
        descriptor: &Arc<RelationshipDescriptor>,
        args: &PaginationArgs,
        key: Key,
    ) -> LoadResult<Loaded> {
        self.loader_for(descriptor, args)?.load(key).await
    }

    /// Count the related rows for one parent key
    pub async fn count_for(
        &self,
        descriptor: &RelationshipDescriptor,
        key: &Key,
    ) -> LoadResult<u64> {
        let key_columns = match descriptor.secondary_table() {
            Some(secondary) => secondary.parent_columns.clone(),
            None => descriptor.remote_columns(),
        };
        let spec = CountSpec {
            relationship: descriptor.id().clone(),
            keys: vec![key.clone()],
            key_columns,
            junction: descriptor.secondary_table().cloned(),
        };
        Ok(self.fetcher.count_rows(&spec).await?)
    }
}
