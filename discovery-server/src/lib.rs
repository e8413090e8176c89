pub mod cluster;
pub mod config;
pub mod core;
pub mod metrics;
pub mod server;
pub mod store;
pub mod version;

// Re-export commonly used types
pub use cluster::{ClusterManager, DefaultManager};
pub use config::ServerConfig;
pub use core::{
    Cluster, ClusterCreateOpts, DiscoveryError, IdGenerator, JsonSerializer, MsgPackSerializer,
    Node, Serializer, SerializerKind, UuidGenerator, ValidationError,
};
pub use server::{ApiError, AppState, create_router};
pub use store::{DiskStore, KVPair, MemoryStore, Store, StoreBackend, start_ttl_sweeper};
pub use version::VersionInfo;
