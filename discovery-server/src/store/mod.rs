//! TTL-aware key-value storage
//!
//! Cluster records live in a [`Store`], keyed by cluster ID. Every value is
//! wrapped in a [`StoredValue`] envelope that carries its expiry deadline, so
//! expiry survives process restarts. Expired entries are hidden and removed on
//! read, and purged in bulk by the background sweeper.

pub mod disk;
pub mod memory;
pub mod sweeper;
pub mod types;

pub use disk::DiskStore;
pub use memory::MemoryStore;
pub use sweeper::start_ttl_sweeper;
pub use types::{KVPair, StoredValue};

use crate::core::Result;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;

/// Generic store capability used by the cluster manager
pub trait Store: Send + Sync {
    /// Same as `put`, but fails with `AlreadyExists` if the key is present
    fn create(&self, key: &str, value: Vec<u8>, ttl: u64) -> Result<KVPair>;

    /// Unconditional upsert. `ttl > 0` (seconds) sets a new expiry deadline;
    /// `ttl == 0` keeps whatever deadline the key already had.
    fn put(&self, key: &str, value: Vec<u8>, ttl: u64) -> Result<KVPair>;

    /// Returns the pair for `key` or `NotFound`
    fn get(&self, key: &str) -> Result<KVPair>;

    /// Removes `key`; absent keys are not an error
    fn delete(&self, key: &str) -> Result<()>;

    /// Removes every expired entry, returning how many were removed
    fn purge_expired(&self) -> Result<usize>;
}

/// Storage backend selection in configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    #[default]
    Disk,
    Memory,
}

/// Open the configured backend
pub fn open_store(backend: StoreBackend, path: &Path) -> Result<Arc<dyn Store>> {
    match backend {
        StoreBackend::Disk => Ok(Arc::new(DiskStore::open(path)?)),
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
    }
}
