pub mod codec;
pub mod error;
pub mod id;
pub mod types;

pub use codec::{JsonSerializer, MsgPackSerializer, Serializer, SerializerKind};
pub use error::{DiscoveryError, Result, ValidationError};
pub use id::{IdGenerator, UuidGenerator};
pub use types::{Cluster, ClusterCreateOpts, DEFAULT_CLUSTER_SIZE, Node};
