//! Cache inventory records and the trait that lists them
//!
//! Records carry only the fields discovery correlates on. `AwsInventory`
//! fills them from the ElastiCache API; tests use in-memory inventories.

use crate::utils::InventoryError;

/// One cache node as reported by DescribeCacheClusters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheClusterRecord {
    pub id: String,
    pub engine: String,
    /// Resource identifier used for tag lookups
    pub arn: String,
    pub transit_encryption: bool,
}

/// Primary (or configuration) endpoint of a replication group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointRecord {
    pub address: String,
    pub port: u16,
}

/// One replication group as reported by DescribeReplicationGroups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplicationGroupRecord {
    pub description: String,
    /// Member cluster ids in API order
    pub member_clusters: Vec<String>,
    pub primary_endpoint: EndpointRecord,
}

/// Key/value tag on a cluster resource
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceTag {
    pub key: String,
    pub value: String,
}

/// Source of cluster, replication group and tag records
///
/// Each call is a single attempt; callers decide which failures are fatal.
pub trait CacheInventory {
    fn list_clusters(&self) -> Result<Vec<CacheClusterRecord>, InventoryError>;

    fn list_replication_groups(&self) -> Result<Vec<ReplicationGroupRecord>, InventoryError>;

    fn list_tags(&self, resource: &str) -> Result<Vec<ResourceTag>, InventoryError>;
}
