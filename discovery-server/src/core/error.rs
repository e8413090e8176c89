use thiserror::Error;

/// Reasons a node registration payload is rejected before touching the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("node address missing")]
    AddressMissing,

    #[error("invalid node address")]
    InvalidAddress,

    #[error("node name missing")]
    NameMissing,
}

/// Main error type for discovery operations
#[derive(Debug, Error)]
pub enum DiscoveryError {
    #[error("Key not found: {0}")]
    NotFound(String),

    #[error("Key already exists: {0}")]
    AlreadyExists(String),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("node name already present: name {name} exists in cluster {cluster_id}")]
    NodeNamePresent { name: String, cluster_id: String },

    #[error("node address already present: address {address} exists in cluster {cluster_id}")]
    NodeAddressPresent { address: String, cluster_id: String },

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

impl DiscoveryError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }

    /// Conflicts and validation failures are caller-input problems
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::NodeNamePresent { .. } | Self::NodeAddressPresent { .. }
        )
    }
}

impl From<serde_json::Error> for DiscoveryError {
    fn from(e: serde_json::Error) -> Self {
        DiscoveryError::Encoding(e.to_string())
    }
}

impl From<rmp_serde::encode::Error> for DiscoveryError {
    fn from(e: rmp_serde::encode::Error) -> Self {
        DiscoveryError::Encoding(e.to_string())
    }
}

impl From<rmp_serde::decode::Error> for DiscoveryError {
    fn from(e: rmp_serde::decode::Error) -> Self {
        DiscoveryError::Encoding(e.to_string())
    }
}

impl From<bincode::error::EncodeError> for DiscoveryError {
    fn from(e: bincode::error::EncodeError) -> Self {
        DiscoveryError::Encoding(e.to_string())
    }
}

impl From<bincode::error::DecodeError> for DiscoveryError {
    fn from(e: bincode::error::DecodeError) -> Self {
        DiscoveryError::Encoding(e.to_string())
    }
}

impl From<fjall::Error> for DiscoveryError {
    fn from(e: fjall::Error) -> Self {
        DiscoveryError::Storage(e.to_string())
    }
}

/// Result type alias for discovery operations
pub type Result<T> = std::result::Result<T, DiscoveryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_messages() {
        let err: DiscoveryError = ValidationError::AddressMissing.into();
        assert_eq!(err.to_string(), "node address missing");
        assert!(err.is_client_error());
    }

    #[test]
    fn test_conflict_message_names_cluster() {
        let err = DiscoveryError::NodeNamePresent {
            name: "node4".to_string(),
            cluster_id: "abc".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "node name already present: name node4 exists in cluster abc"
        );
        assert!(!err.is_not_found());
    }
}
