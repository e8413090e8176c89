use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Member count assumed when a cluster is created without one
pub const DEFAULT_CLUSTER_SIZE: u32 = 3;

fn is_zero(v: &u32) -> bool {
    *v == 0
}

/// Rendezvous record shared by the nodes bootstrapping a cluster
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cluster {
    /// Cluster ID used for joining or getting cluster status
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    /// Expected member count
    #[serde(default, skip_serializing_if = "is_zero")]
    pub size: u32,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(rename = "accountID", default, skip_serializing_if = "String::is_empty")]
    pub account_id: String,

    /// Registered members, in registration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nodes: Vec<Node>,

    #[serde(default)]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Cluster {
    /// Build a fresh cluster record, applying the size default
    pub fn new(id: String, opts: &ClusterCreateOpts, now: DateTime<Utc>) -> Self {
        let size = if opts.size == 0 {
            DEFAULT_CLUSTER_SIZE
        } else {
            opts.size
        };

        Self {
            id,
            size,
            name: opts.name.clone(),
            account_id: opts.account_id.clone(),
            nodes: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// A member's registration record, supplied by the joining process
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Node {
    /// Node/controller UUID chosen by the caller
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub id: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,

    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub advertise_address: String,

    #[serde(default)]
    pub created_at: DateTime<Utc>,

    #[serde(default)]
    pub updated_at: DateTime<Utc>,
}

impl Node {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        advertise_address: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            advertise_address: advertise_address.into(),
            ..Default::default()
        }
    }

    /// Same logical node: name, address and id all match
    pub fn is_same_registration(&self, other: &Node) -> bool {
        self.name == other.name
            && self.advertise_address == other.advertise_address
            && self.id == other.id
    }
}

/// Optional fields when creating a cluster
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClusterCreateOpts {
    pub account_id: String,
    pub name: String,
    pub size: u32,
    /// Seconds until the cluster expires, 0 keeps it forever
    pub ttl: u64,
}
