use super::types::{KVPair, StoredValue, now_millis};
use super::Store;
use crate::core::{DiscoveryError, Result};
use crate::metrics;
use parking_lot::RwLock;
use radix_trie::{Trie, TrieCommon};
use std::sync::Arc;
use tracing::debug;

/// In-memory store using a radix trie, for tests and ephemeral deployments
#[derive(Clone)]
pub struct MemoryStore {
    data: Arc<RwLock<Trie<String, StoredValue>>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(Trie::new())),
        }
    }

    /// Number of stored entries, including expired ones not yet purged
    pub fn len(&self) -> usize {
        self.data.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Insert under an already-held write lock
    fn insert(
        data: &mut Trie<String, StoredValue>,
        key: &str,
        value: Vec<u8>,
        ttl: u64,
        now: i64,
    ) -> KVPair {
        let stored = {
            let previous = data.get(key).filter(|p| !p.is_expired(now));
            StoredValue::replacing(value, ttl, previous, now)
        };
        let pair = stored.clone().into_pair(key, now);
        data.insert(key.to_string(), stored);
        pair
    }
}

impl Store for MemoryStore {
    fn create(&self, key: &str, value: Vec<u8>, ttl: u64) -> Result<KVPair> {
        debug!("CREATE key={}, size={}, ttl={}", key, value.len(), ttl);

        let now = now_millis();
        let mut data = self.data.write();
        if data.get(key).is_some_and(|v| !v.is_expired(now)) {
            return Err(DiscoveryError::AlreadyExists(key.to_string()));
        }
        // A stale entry must not lend its deadline to the new key
        data.remove(key);
        Ok(Self::insert(&mut data, key, value, ttl, now))
    }

    fn put(&self, key: &str, value: Vec<u8>, ttl: u64) -> Result<KVPair> {
        debug!("PUT key={}, size={}, ttl={}", key, value.len(), ttl);

        let now = now_millis();
        let mut data = self.data.write();
        Ok(Self::insert(&mut data, key, value, ttl, now))
    }

    fn get(&self, key: &str) -> Result<KVPair> {
        let now = now_millis();
        {
            let data = self.data.read();
            match data.get(key) {
                None => return Err(DiscoveryError::NotFound(key.to_string())),
                Some(value) if !value.is_expired(now) => {
                    return Ok(value.clone().into_pair(key, now));
                }
                Some(_) => {}
            }
        }

        // Expired: re-check under the write lock, a concurrent put may have refreshed it
        let mut data = self.data.write();
        match data.get(key) {
            Some(value) if !value.is_expired(now) => Ok(value.clone().into_pair(key, now)),
            Some(_) => {
                debug!("Key expired: {}", key);
                data.remove(key);
                metrics::EXPIRED_KEYS_TOTAL.inc();
                Err(DiscoveryError::NotFound(key.to_string()))
            }
            None => Err(DiscoveryError::NotFound(key.to_string())),
        }
    }

    fn delete(&self, key: &str) -> Result<()> {
        debug!("DELETE key={}", key);
        self.data.write().remove(key);
        Ok(())
    }

    fn purge_expired(&self) -> Result<usize> {
        let now = now_millis();
        let mut data = self.data.write();

        let expired_keys: Vec<String> = data
            .iter()
            .filter(|(_, v)| v.is_expired(now))
            .map(|(k, _)| k.clone())
            .collect();

        for key in &expired_keys {
            data.remove(key);
        }
        metrics::EXPIRED_KEYS_TOTAL.inc_by(expired_keys.len() as u64);

        Ok(expired_keys.len())
    }
}
