//! Shared test utilities for the graphloom workspace
//!
//! This crate provides an in-memory [`RelationFetcher`] implementation
//! so loader and pagination behavior can be tested without a database.
//! The backend honors the full fetch contract: key predicates, declared
//! ordering, offset and keyset slices (including the one-extra-row
//! sentinel and reversed backward fetches), and junction-table row
//! pairing.
//!
//! # Example
//!
//! ```rust,ignore
//! use graphloom_test_utils::MemoryBackend;
//!
//! #[tokio::test]
//! async fn test_with_memory_backend() {
//!     let backend = MemoryBackend::new();
//!     backend.insert_rows("Team.heroes", rows);
//!
//!     // Hand Arc::new(backend) to a Loader
//! }
//! ```
//!
//! [`RelationFetcher`]: graphloom_loader::RelationFetcher

mod memory;

pub use memory::MemoryBackend;
