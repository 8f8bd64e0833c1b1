//! ElastiCache-backed inventory
//!
//! The SDK is async; this tool does one thing at a time, so each call is
//! driven to completion on a private current-thread runtime.

use aws_sdk_elasticache::config::Region;
use aws_sdk_elasticache::error::DisplayErrorContext;
use aws_sdk_elasticache::types::{CacheCluster, Endpoint, ReplicationGroup};
use aws_sdk_elasticache::Client;
use tokio::runtime::Runtime;
use tracing::{debug, warn};

use super::descriptor::DEFAULT_PORT;
use super::inventory::{
    CacheClusterRecord, CacheInventory, EndpointRecord, ReplicationGroupRecord, ResourceTag,
};
use crate::utils::InventoryError;

/// Inventory of the account's ElastiCache resources in one region
pub struct AwsInventory {
    runtime: Runtime,
    client: Client,
}

impl AwsInventory {
    /// Load credentials from the default chain and target `region`
    ///
    /// An empty region leaves region selection to the SDK's own chain.
    pub fn connect(region: &str) -> Result<Self, InventoryError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;

        let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest());
        if !region.is_empty() {
            loader = loader.region(Region::new(region.to_string()));
        }
        let config = runtime.block_on(loader.load());
        debug!("ElastiCache client region: {:?}", config.region());

        Ok(Self {
            client: Client::new(&config),
            runtime,
        })
    }
}

fn request_failed<E: std::error::Error>(operation: &str, err: E) -> InventoryError {
    InventoryError::Request {
        operation: operation.to_string(),
        message: DisplayErrorContext(err).to_string(),
    }
}

fn cluster_record(cluster: &CacheCluster) -> CacheClusterRecord {
    CacheClusterRecord {
        id: cluster.cache_cluster_id().unwrap_or_default().to_string(),
        engine: cluster.engine().unwrap_or_default().to_string(),
        arn: cluster.arn().unwrap_or_default().to_string(),
        transit_encryption: cluster.transit_encryption_enabled().unwrap_or(false),
    }
}

fn endpoint_record(endpoint: &Endpoint) -> Option<EndpointRecord> {
    Some(EndpointRecord {
        address: endpoint.address()?.to_string(),
        port: endpoint
            .port()
            .and_then(|p| u16::try_from(p).ok())
            .unwrap_or(DEFAULT_PORT),
    })
}

/// Primary endpoint of the first node group, else the configuration endpoint
fn group_record(group: &ReplicationGroup) -> Option<ReplicationGroupRecord> {
    let endpoint = group
        .node_groups()
        .first()
        .and_then(|node_group| node_group.primary_endpoint())
        .or(group.configuration_endpoint())
        .and_then(endpoint_record)?;

    Some(ReplicationGroupRecord {
        description: group.description().unwrap_or_default().to_string(),
        member_clusters: group.member_clusters().to_vec(),
        primary_endpoint: endpoint,
    })
}

impl CacheInventory for AwsInventory {
    fn list_clusters(&self) -> Result<Vec<CacheClusterRecord>, InventoryError> {
        let mut records = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let output = self
                .runtime
                .block_on(
                    self.client
                        .describe_cache_clusters()
                        .set_marker(marker.take())
                        .send(),
                )
                .map_err(|e| request_failed("DescribeCacheClusters", e))?;

            records.extend(output.cache_clusters().iter().map(cluster_record));
            match output.marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }
        debug!("Listed {} cache clusters", records.len());
        Ok(records)
    }

    fn list_replication_groups(&self) -> Result<Vec<ReplicationGroupRecord>, InventoryError> {
        let mut records = Vec::new();
        let mut marker: Option<String> = None;
        loop {
            let output = self
                .runtime
                .block_on(
                    self.client
                        .describe_replication_groups()
                        .set_marker(marker.take())
                        .send(),
                )
                .map_err(|e| request_failed("DescribeReplicationGroups", e))?;

            for group in output.replication_groups() {
                match group_record(group) {
                    Some(record) => records.push(record),
                    None => warn!(
                        "Replication group {} has no endpoint yet, skipping",
                        group.replication_group_id().unwrap_or("<unknown>")
                    ),
                }
            }
            match output.marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }
        debug!("Listed {} replication groups", records.len());
        Ok(records)
    }

    fn list_tags(&self, resource: &str) -> Result<Vec<ResourceTag>, InventoryError> {
        let output = self
            .runtime
            .block_on(
                self.client
                    .list_tags_for_resource()
                    .resource_name(resource)
                    .send(),
            )
            .map_err(|e| request_failed("ListTagsForResource", e))?;

        Ok(output
            .tag_list()
            .iter()
            .map(|tag| ResourceTag {
                key: tag.key().unwrap_or_default().to_string(),
                value: tag.value().unwrap_or_default().to_string(),
            })
            .collect())
    }
}
