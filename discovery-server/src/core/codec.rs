//! Cluster record wire formats
//!
//! The stored bytes of a cluster are produced by a [`Serializer`]. JSON is the
//! default; MessagePack (named fields) is available for smaller records.
//! Both honour the empty-field omission of [`Cluster`]'s serde attributes.

use super::error::Result;
use super::types::Cluster;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Encodes and decodes cluster records
pub trait Serializer: Send + Sync {
    fn encode(&self, cluster: &Cluster) -> Result<Vec<u8>>;
    fn decode(&self, bytes: &[u8]) -> Result<Cluster>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct JsonSerializer;

impl Serializer for JsonSerializer {
    fn encode(&self, cluster: &Cluster) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(cluster)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Cluster> {
        Ok(serde_json::from_slice(bytes)?)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct MsgPackSerializer;

impl Serializer for MsgPackSerializer {
    fn encode(&self, cluster: &Cluster) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec_named(cluster)?)
    }

    fn decode(&self, bytes: &[u8]) -> Result<Cluster> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

/// Serializer selection in configuration
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SerializerKind {
    #[default]
    Json,
    Msgpack,
}

impl SerializerKind {
    pub fn build(self) -> Arc<dyn Serializer> {
        match self {
            Self::Json => Arc::new(JsonSerializer),
            Self::Msgpack => Arc::new(MsgPackSerializer),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::DiscoveryError;
    use crate::core::types::{ClusterCreateOpts, Node};
    use chrono::Utc;

    fn sample_cluster() -> Cluster {
        let opts = ClusterCreateOpts {
            account_id: "123".to_string(),
            name: "bootstrap".to_string(),
            size: 5,
            ttl: 0,
        };
        let mut cluster = Cluster::new("c-1".to_string(), &opts, Utc::now());
        let mut node = Node::new("controller-uuid-1", "node-1", "10.0.1.4");
        node.created_at = Utc::now();
        node.updated_at = node.created_at;
        cluster.nodes.push(node);
        cluster
    }

    #[test]
    fn test_json_round_trip() {
        let cluster = sample_cluster();
        let bytes = JsonSerializer.encode(&cluster).unwrap();
        assert_eq!(JsonSerializer.decode(&bytes).unwrap(), cluster);
    }

    #[test]
    fn test_msgpack_round_trip() {
        let cluster = sample_cluster();
        let bytes = MsgPackSerializer.encode(&cluster).unwrap();
        assert_eq!(MsgPackSerializer.decode(&bytes).unwrap(), cluster);
    }

    #[test]
    fn test_empty_nodes_omitted_and_restored() {
        let cluster = Cluster::new("c-2".to_string(), &ClusterCreateOpts::default(), Utc::now());
        let bytes = JsonSerializer.encode(&cluster).unwrap();
        let text = String::from_utf8(bytes.clone()).unwrap();
        assert!(!text.contains("nodes"));
        assert!(!text.contains("accountID"));

        let decoded = JsonSerializer.decode(&bytes).unwrap();
        assert!(decoded.nodes.is_empty());
        assert_eq!(decoded, cluster);
    }

    #[test]
    fn test_malformed_bytes_are_encoding_errors() {
        let err = JsonSerializer.decode(b"{not json").unwrap_err();
        assert!(matches!(err, DiscoveryError::Encoding(_)));

        let err = MsgPackSerializer.decode(&[0xc1]).unwrap_err();
        assert!(matches!(err, DiscoveryError::Encoding(_)));
    }

    #[test]
    fn test_kind_from_config() {
        let kind: SerializerKind = serde_yaml::from_str("msgpack").unwrap();
        assert_eq!(kind, SerializerKind::Msgpack);
        let cluster = sample_cluster();
        let serializer = kind.build();
        let bytes = serializer.encode(&cluster).unwrap();
        assert_eq!(serializer.decode(&bytes).unwrap(), cluster);
    }
}
