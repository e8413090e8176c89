//! Cluster lifecycle management
//!
//! Bootstrap rendezvous records:
//! - Cluster creation with generated IDs and optional expiry
//! - Node registration with per-cluster name/address uniqueness
//! - Idempotent re-registration of the same node

pub mod manager;
pub mod validation;

pub use manager::{ClusterManager, DefaultManager};
pub use validation::{is_valid_address, validate_node};
