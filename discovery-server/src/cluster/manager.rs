use super::validation::validate_node;
use crate::core::{
    Cluster, ClusterCreateOpts, DiscoveryError, IdGenerator, Node, Result, Serializer,
    UuidGenerator,
};
use crate::metrics;
use crate::store::Store;
use chrono::Utc;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Cluster lifecycle operations
pub trait ClusterManager: Send + Sync {
    /// Create a new cluster
    fn create(&self, opts: ClusterCreateOpts) -> Result<Cluster>;

    /// Get cluster by ID
    fn get(&self, id: &str) -> Result<Cluster>;

    /// Register a node with a cluster and return the updated cluster
    fn register_node(&self, cluster_id: &str, node: Node) -> Result<Cluster>;

    /// Overwrite the stored record with `cluster`
    fn update(&self, cluster: &Cluster) -> Result<()>;

    /// Delete cluster by ID
    fn delete(&self, id: &str) -> Result<()>;
}

/// How an incoming node relates to one already registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Clash {
    SameNode,
    Name,
    Address,
}

/// Cluster manager over a [`Store`] and a [`Serializer`].
///
/// Registrations and updates are read-modify-write sequences on a whole
/// record; they run under one manager-wide lock, across all clusters.
pub struct DefaultManager {
    lock: Mutex<()>,
    store: Arc<dyn Store>,
    serializer: Arc<dyn Serializer>,
    ids: Arc<dyn IdGenerator>,
}

impl DefaultManager {
    pub fn new(store: Arc<dyn Store>, serializer: Arc<dyn Serializer>) -> Self {
        Self {
            lock: Mutex::new(()),
            store,
            serializer,
            ids: Arc::new(UuidGenerator),
        }
    }

    /// Replace the cluster ID source
    pub fn with_id_generator(mut self, ids: Arc<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    fn load(&self, id: &str) -> Result<Cluster> {
        let pair = self.store.get(id)?;
        self.serializer.decode(&pair.value)
    }

    fn clash(existing: &Node, node: &Node) -> Option<Clash> {
        if existing.is_same_registration(node) {
            Some(Clash::SameNode)
        } else if existing.name == node.name {
            Some(Clash::Name)
        } else if existing.advertise_address == node.advertise_address {
            Some(Clash::Address)
        } else {
            None
        }
    }
}

/// Time an operation and record its outcome
fn observe<T>(operation: &str, f: impl FnOnce() -> Result<T>) -> Result<T> {
    let start = Instant::now();
    let result = f();
    let status = match &result {
        Ok(_) => "success",
        Err(DiscoveryError::NotFound(_)) => "not_found",
        Err(DiscoveryError::Validation(_)) => "invalid",
        Err(DiscoveryError::NodeNamePresent { .. } | DiscoveryError::NodeAddressPresent { .. }) => {
            "conflict"
        }
        Err(_) => "error",
    };
    metrics::record_cluster_op(operation, status, start.elapsed().as_secs_f64());
    result
}

impl ClusterManager for DefaultManager {
    fn create(&self, opts: ClusterCreateOpts) -> Result<Cluster> {
        observe("create", || {
            let cluster = Cluster::new(self.ids.generate(), &opts, Utc::now());
            let bytes = self.serializer.encode(&cluster)?;
            self.store.create(&cluster.id, bytes, opts.ttl)?;

            info!(
                "New cluster created id={}, size={}, ttl={}",
                cluster.id, cluster.size, opts.ttl
            );
            Ok(cluster)
        })
    }

    fn get(&self, id: &str) -> Result<Cluster> {
        observe("get", || self.load(id))
    }

    fn register_node(&self, cluster_id: &str, mut node: Node) -> Result<Cluster> {
        observe("register", || {
            validate_node(&node)?;

            let _guard = self.lock.lock();
            let mut cluster = self.load(cluster_id)?;

            let clash = cluster
                .nodes
                .iter()
                .find_map(|existing| Self::clash(existing, &node));

            match clash {
                Some(Clash::SameNode) => {
                    debug!(
                        "Node {} already registered in cluster {}",
                        node.name, cluster_id
                    );
                    return Ok(cluster);
                }
                Some(Clash::Name) => {
                    return Err(DiscoveryError::NodeNamePresent {
                        name: node.name,
                        cluster_id: cluster_id.to_string(),
                    });
                }
                Some(Clash::Address) => {
                    return Err(DiscoveryError::NodeAddressPresent {
                        address: node.advertise_address,
                        cluster_id: cluster_id.to_string(),
                    });
                }
                None => {}
            }

            let now = Utc::now();
            node.created_at = now;
            node.updated_at = now;
            cluster.updated_at = now;

            info!(
                "Registering node name={}, address={} in cluster {}",
                node.name, node.advertise_address, cluster_id
            );
            cluster.nodes.push(node);

            let bytes = self.serializer.encode(&cluster)?;
            self.store.put(&cluster.id, bytes, 0)?;

            Ok(cluster)
        })
    }

    fn update(&self, cluster: &Cluster) -> Result<()> {
        observe("update", || {
            let _guard = self.lock.lock();

            let bytes = self.serializer.encode(cluster)?;
            self.store.put(&cluster.id, bytes, 0)?;
            Ok(())
        })
    }

    fn delete(&self, id: &str) -> Result<()> {
        observe("delete", || {
            self.store.delete(id)?;
            debug!("Cluster deleted id={}", id);
            Ok(())
        })
    }
}
