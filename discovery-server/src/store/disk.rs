use super::types::{KVPair, StoredValue, now_millis};
use super::Store;
use crate::core::{DiscoveryError, Result};
use crate::metrics;
use fjall::{Config, Keyspace, PartitionCreateOptions, PartitionHandle, PersistMode};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Partition holding the cluster records
const CLUSTERS_PARTITION: &str = "clusters";

/// Durable store backed by an embedded fjall keyspace.
///
/// Each mutation is a single journal write followed by an fsync, so a returned
/// `Ok` means the value is on disk. Mutations are serialized by a store-wide
/// lock because `create` is a check-then-write. A keyspace directory must be
/// owned by a single process.
pub struct DiskStore {
    keyspace: Keyspace,
    partition: PartitionHandle,
    lock: Mutex<()>,
    path: PathBuf,
}

impl DiskStore {
    /// Open (or create) the keyspace at `path`
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        info!("Opening disk store at {}", path.display());

        let keyspace = Config::new(&path).open()?;
        let partition =
            keyspace.open_partition(CLUSTERS_PARTITION, PartitionCreateOptions::default())?;

        Ok(Self {
            keyspace,
            partition,
            lock: Mutex::new(()),
            path,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self, key: &str) -> Result<Option<StoredValue>> {
        match self.partition.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(StoredValue::decode(&bytes)?)),
            None => Ok(None),
        }
    }

    fn write(&self, key: &str, value: &StoredValue) -> Result<()> {
        self.partition.insert(key.as_bytes(), value.encode()?)?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.partition.remove(key.as_bytes())?;
        self.keyspace.persist(PersistMode::SyncAll)?;
        Ok(())
    }

    /// Upsert under an already-held store lock
    fn put_locked(&self, key: &str, value: Vec<u8>, ttl: u64, now: i64) -> Result<KVPair> {
        let previous = self.read(key)?.filter(|p| !p.is_expired(now));
        let stored = StoredValue::replacing(value, ttl, previous.as_ref(), now);
        self.write(key, &stored)?;
        Ok(stored.into_pair(key, now))
    }
}

impl Store for DiskStore {
    fn create(&self, key: &str, value: Vec<u8>, ttl: u64) -> Result<KVPair> {
        debug!("CREATE key={}, size={}, ttl={}", key, value.len(), ttl);

        let now = now_millis();
        let _guard = self.lock.lock();
        match self.read(key)? {
            Some(existing) if !existing.is_expired(now) => {
                Err(DiscoveryError::AlreadyExists(key.to_string()))
            }
            _ => {
                let stored = StoredValue::new(value, ttl, now);
                self.write(key, &stored)?;
                Ok(stored.into_pair(key, now))
            }
        }
    }

    fn put(&self, key: &str, value: Vec<u8>, ttl: u64) -> Result<KVPair> {
        debug!("PUT key={}, size={}, ttl={}", key, value.len(), ttl);

        let now = now_millis();
        let _guard = self.lock.lock();
        self.put_locked(key, value, ttl, now)
    }

    fn get(&self, key: &str) -> Result<KVPair> {
        let now = now_millis();
        match self.read(key)? {
            None => Err(DiscoveryError::NotFound(key.to_string())),
            Some(value) if !value.is_expired(now) => Ok(value.into_pair(key, now)),
            Some(_) => {
                // Re-check under the lock, a concurrent put may have refreshed it
                let _guard = self.lock.lock();
                match self.read(key)? {
                    Some(value) if !value.is_expired(now) => Ok(value.into_pair(key, now)),
                    Some(_) => {
                        debug!("Key expired: {}", key);
                        self.remove(key)?;
                        metrics::EXPIRED_KEYS_TOTAL.inc();
                        Err(DiscoveryError::NotFound(key.to_string()))
                    }
                    None => Err(DiscoveryError::NotFound(key.to_string())),
                }
            }
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        debug!("DELETE key={}", key);

        let _guard = self.lock.lock();
        self.remove(key)
    }

    fn purge_expired(&self) -> Result<usize> {
        let now = now_millis();
        let _guard = self.lock.lock();

        let mut expired_keys = Vec::new();
        for item in self.partition.iter() {
            let (key, bytes) = item?;
            if StoredValue::decode(&bytes)?.is_expired(now) {
                expired_keys.push(key);
            }
        }

        if expired_keys.is_empty() {
            return Ok(0);
        }

        for key in &expired_keys {
            self.partition.remove(&key[..])?;
        }
        self.keyspace.persist(PersistMode::SyncAll)?;
        metrics::EXPIRED_KEYS_TOTAL.inc_by(expired_keys.len() as u64);

        Ok(expired_keys.len())
    }
}
