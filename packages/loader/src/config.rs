//! Loader configuration

use std::env;
use std::time::Duration;

use crate::error::{LoadError, LoadResult};

/// Default maximum page size, applied when `first`/`last` is absent
pub const DEFAULT_MAX_PAGE_SIZE: i32 = 100;

/// Configuration for a [`Loader`](crate::Loader) and its coordinators
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Maximum (and default) page size for paginated loads
    pub max_page_size: i32,

    /// Extra time a batch stays open collecting requests
    ///
    /// Zero means "one scheduler tick": the flush task yields once and
    /// then drains the batch, which coalesces every `load()` issued
    /// synchronously in the current execution step. A non-zero delay
    /// widens the window to catch loads issued from sibling tasks.
    pub batch_delay: Duration,

    /// Retain resolved results for the coordinator's lifetime
    ///
    /// With caching on, a later `load()` for an already-resolved key
    /// returns instantly without joining a new batch. The cache is never
    /// shared across coordinators or pagination signatures.
    pub cache_resolved: bool,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_page_size: DEFAULT_MAX_PAGE_SIZE,
            batch_delay: Duration::ZERO,
            cache_resolved: true,
        }
    }
}

impl LoaderConfig {
    /// Load configuration from the environment, falling back to defaults
    ///
    /// Recognized variables: `GRAPHLOOM_MAX_PAGE_SIZE`,
    /// `GRAPHLOOM_BATCH_DELAY_MS`, `GRAPHLOOM_CACHE_RESOLVED`.
    pub fn from_env() -> LoadResult<Self> {
        let mut config = Self::default();

        if let Ok(value) = env::var("GRAPHLOOM_MAX_PAGE_SIZE") {
            let parsed: i32 = value.parse().map_err(|_| LoadError::Configuration {
                name: "GRAPHLOOM_MAX_PAGE_SIZE",
                value: value.clone(),
            })?;
            if parsed <= 0 {
                return Err(LoadError::Configuration {
                    name: "GRAPHLOOM_MAX_PAGE_SIZE",
                    value,
                });
            }
            config.max_page_size = parsed;
        }

        if let Ok(value) = env::var("GRAPHLOOM_BATCH_DELAY_MS") {
            let millis: u64 = value.parse().map_err(|_| LoadError::Configuration {
                name: "GRAPHLOOM_BATCH_DELAY_MS",
                value: value.clone(),
            })?;
            config.batch_delay = Duration::from_millis(millis);
        }

        if let Ok(value) = env::var("GRAPHLOOM_CACHE_RESOLVED") {
            config.cache_resolved = match value.as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(LoadError::Configuration {
                        name: "GRAPHLOOM_CACHE_RESOLVED",
                        value,
                    })
                }
            };
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoaderConfig::default();
        assert_eq!(config.max_page_size, DEFAULT_MAX_PAGE_SIZE);
        assert_eq!(config.batch_delay, Duration::ZERO);
        assert!(config.cache_resolved);
    }
}
