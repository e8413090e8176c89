use crate::core::Result;
use serde::{Deserialize, Serialize};

/// Current wall-clock time in unix milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Result of an operation on the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KVPair {
    pub key: String,
    pub value: Vec<u8>,
    /// Seconds until expiry, 0 when the key never expires
    pub ttl: u64,
}

/// Stored value with its expiry deadline, the envelope persisted per key
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredValue {
    /// Raw payload
    pub data: Vec<u8>,
    /// Expiry deadline in unix milliseconds
    pub expires_at: Option<i64>,
}

impl StoredValue {
    /// Create a stored value expiring `ttl_secs` after `now`; 0 never expires
    pub fn new(data: Vec<u8>, ttl_secs: u64, now: i64) -> Self {
        Self {
            data,
            expires_at: deadline(ttl_secs, now),
        }
    }

    /// Value written by a put over `previous`. A zero TTL keeps the previous deadline.
    pub fn replacing(data: Vec<u8>, ttl_secs: u64, previous: Option<&StoredValue>, now: i64) -> Self {
        let expires_at = match deadline(ttl_secs, now) {
            Some(at) => Some(at),
            None => previous.and_then(|p| p.expires_at),
        };
        Self { data, expires_at }
    }

    /// Check if the value has expired
    pub fn is_expired(&self, now: i64) -> bool {
        self.expires_at.is_some_and(|at| now >= at)
    }

    /// Remaining TTL in whole seconds, rounded up
    pub fn remaining_ttl_secs(&self, now: i64) -> u64 {
        match self.expires_at {
            Some(at) if at > now => ((at - now) as u64).div_ceil(1000),
            _ => 0,
        }
    }

    pub fn into_pair(self, key: &str, now: i64) -> KVPair {
        let ttl = self.remaining_ttl_secs(now);
        KVPair {
            key: key.to_string(),
            value: self.data,
            ttl,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(bincode::serde::encode_to_vec(
            self,
            bincode::config::standard(),
        )?)
    }

    pub fn decode(bytes: &[u8]) -> Result<Self> {
        let (value, _) =
            bincode::serde::decode_from_slice::<Self, _>(bytes, bincode::config::standard())?;
        Ok(value)
    }
}

fn deadline(ttl_secs: u64, now: i64) -> Option<i64> {
    if ttl_secs == 0 {
        return None;
    }
    let ttl_ms = i64::try_from(ttl_secs.saturating_mul(1000)).unwrap_or(i64::MAX);
    Some(now.saturating_add(ttl_ms))
}
