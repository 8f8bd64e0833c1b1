//! Server discovery
//!
//! Correlates cache clusters with replication groups to build the list of
//! servers offered to the operator:
//!
//! 1. clusters are filtered by engine and indexed by id
//! 2. each replication group is matched through its first member cluster
//! 3. the matched cluster supplies the TLS flag and the `Name` tag
//!
//! Groups whose first member is missing from the index are dropped. Output
//! keeps the order replication groups were listed in.

pub mod aws;
pub mod descriptor;
pub mod inventory;
pub mod region;

use std::collections::HashMap;

use tracing::{debug, warn};

pub use aws::AwsInventory;
pub use descriptor::{ServerDescriptor, DEFAULT_PORT};
pub use inventory::{
    CacheClusterRecord, CacheInventory, EndpointRecord, ReplicationGroupRecord, ResourceTag,
};
pub use region::{RegionResolver, METADATA_BASE_URL};

use crate::utils::DiscoveryError;

/// Engine label discovery looks for by default
pub const DEFAULT_ENGINE: &str = "redis";

/// List connectable servers of `engine` from `inventory`
pub fn discover<I: CacheInventory + ?Sized>(
    inventory: &I,
    engine: &str,
) -> Result<Vec<ServerDescriptor>, DiscoveryError> {
    let clusters = inventory
        .list_clusters()
        .map_err(|e| DiscoveryError::PermissionDenied {
            operation: "describe cache clusters".to_string(),
            message: e.to_string(),
        })?;

    let mut by_id: HashMap<String, CacheClusterRecord> = HashMap::new();
    for cluster in clusters {
        if cluster.engine.eq_ignore_ascii_case(engine) {
            debug!("Found {} cluster {}", cluster.engine, cluster.id);
            by_id.insert(cluster.id.clone(), cluster);
        }
    }

    let groups = inventory
        .list_replication_groups()
        .map_err(|e| DiscoveryError::PermissionDenied {
            operation: "describe replication groups".to_string(),
            message: e.to_string(),
        })?;

    let mut servers = Vec::new();
    for group in groups {
        let Some(cluster) = group
            .member_clusters
            .first()
            .and_then(|id| by_id.get(id))
        else {
            debug!(
                "Skipping replication group '{}': no {} member cluster",
                group.description, engine
            );
            continue;
        };

        debug!(
            "{} - {}",
            group.description, group.primary_endpoint.address
        );

        let name = match inventory.list_tags(&cluster.arn) {
            Ok(tags) => name_from_tags(&tags).unwrap_or(group.description),
            Err(e) => {
                warn!("Tag lookup for {} failed: {}", cluster.arn, e);
                group.description
            }
        };

        servers.push(ServerDescriptor {
            endpoint: group.primary_endpoint.address,
            port: group.primary_endpoint.port,
            name,
            encrypted: cluster.transit_encryption,
        });
    }

    Ok(servers)
}

/// Value of the last tag keyed `name`, in any case
fn name_from_tags(tags: &[ResourceTag]) -> Option<String> {
    tags.iter()
        .rev()
        .find(|tag| tag.key.eq_ignore_ascii_case("name"))
        .map(|tag| tag.value.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::InventoryError;
    use std::cell::RefCell;

    #[derive(Default)]
    struct MockInventory {
        clusters: Vec<CacheClusterRecord>,
        groups: Vec<ReplicationGroupRecord>,
        tags: HashMap<String, Vec<ResourceTag>>,
        fail_clusters: bool,
        fail_groups: bool,
        fail_tags_for: Vec<String>,
        tag_calls: RefCell<Vec<String>>,
    }

    fn failure(operation: &str) -> InventoryError {
        InventoryError::Request {
            operation: operation.to_string(),
            message: "AccessDenied".to_string(),
        }
    }

    impl CacheInventory for MockInventory {
        fn list_clusters(&self) -> Result<Vec<CacheClusterRecord>, InventoryError> {
            if self.fail_clusters {
                return Err(failure("DescribeCacheClusters"));
            }
            Ok(self.clusters.clone())
        }

        fn list_replication_groups(&self) -> Result<Vec<ReplicationGroupRecord>, InventoryError> {
            if self.fail_groups {
                return Err(failure("DescribeReplicationGroups"));
            }
            Ok(self.groups.clone())
        }

        fn list_tags(&self, resource: &str) -> Result<Vec<ResourceTag>, InventoryError> {
            self.tag_calls.borrow_mut().push(resource.to_string());
            if self.fail_tags_for.iter().any(|r| r == resource) {
                return Err(failure("ListTagsForResource"));
            }
            Ok(self.tags.get(resource).cloned().unwrap_or_default())
        }
    }

    fn cluster(id: &str, engine: &str, tls: bool) -> CacheClusterRecord {
        CacheClusterRecord {
            id: id.to_string(),
            engine: engine.to_string(),
            arn: format!("arn:aws:elasticache:us-east-1:123456789012:cluster:{}", id),
            transit_encryption: tls,
        }
    }

    fn group(description: &str, members: &[&str], address: &str) -> ReplicationGroupRecord {
        ReplicationGroupRecord {
            description: description.to_string(),
            member_clusters: members.iter().map(|m| m.to_string()).collect(),
            primary_endpoint: EndpointRecord {
                address: address.to_string(),
                port: 6379,
            },
        }
    }

    fn tag(key: &str, value: &str) -> ResourceTag {
        ResourceTag {
            key: key.to_string(),
            value: value.to_string(),
        }
    }

    fn arn(id: &str) -> String {
        cluster(id, "redis", false).arn
    }

    #[test]
    fn test_group_matched_through_first_member_only() {
        let inventory = MockInventory {
            clusters: vec![cluster("a-001", "redis", true), cluster("b-002", "redis", false)],
            groups: vec![
                group("first", &["a-001", "a-002"], "a.cache"),
                // second member matches but the first does not
                group("second", &["b-001", "b-002"], "b.cache"),
            ],
            ..Default::default()
        };

        let servers = discover(&inventory, "redis").unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].endpoint, "a.cache");
        assert_eq!(servers[0].name, "first");
        assert!(servers[0].encrypted);
    }

    #[test]
    fn test_non_target_engine_is_dropped() {
        let inventory = MockInventory {
            clusters: vec![
                cluster("mc-001", "memcached", false),
                cluster("r-001", "REDIS", false),
            ],
            groups: vec![
                group("memcache group", &["mc-001"], "mc.cache"),
                group("redis group", &["r-001"], "r.cache"),
            ],
            ..Default::default()
        };

        let servers = discover(&inventory, "redis").unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "redis group");
    }

    #[test]
    fn test_engine_filter_matching_nothing_is_empty_not_error() {
        let inventory = MockInventory {
            clusters: vec![cluster("v-001", "valkey", true)],
            groups: vec![group("valkey group", &["v-001"], "v.cache")],
            ..Default::default()
        };
        assert!(discover(&inventory, "redis").unwrap().is_empty());
        assert_eq!(discover(&inventory, "Valkey").unwrap().len(), 1);
    }

    #[test]
    fn test_group_without_members_is_skipped() {
        let inventory = MockInventory {
            clusters: vec![cluster("a-001", "redis", false)],
            groups: vec![
                group("creating", &[], "pending.cache"),
                group("ready", &["a-001"], "a.cache"),
            ],
            ..Default::default()
        };

        let servers = discover(&inventory, "redis").unwrap();
        assert_eq!(servers.len(), 1);
        assert_eq!(servers[0].name, "ready");
    }

    #[test]
    fn test_name_tag_overrides_description_case_insensitively() {
        let mut tags = HashMap::new();
        tags.insert(arn("a-001"), vec![tag("team", "payments"), tag("NAME", "sessions")]);
        let inventory = MockInventory {
            clusters: vec![cluster("a-001", "redis", false), cluster("b-001", "redis", false)],
            groups: vec![
                group("Session cache", &["a-001"], "a.cache"),
                group("Rate limiter", &["b-001"], "b.cache"),
            ],
            tags,
            ..Default::default()
        };

        let servers = discover(&inventory, "redis").unwrap();
        assert_eq!(servers[0].name, "sessions");
        assert_eq!(servers[1].name, "Rate limiter");
    }

    #[test]
    fn test_tag_failure_keeps_description() {
        let mut tags = HashMap::new();
        // Present but must not be read: the lookup fails for this resource
        tags.insert(arn("a-001"), vec![tag("Name", "should-not-appear")]);
        let inventory = MockInventory {
            clusters: vec![cluster("a-001", "redis", true), cluster("b-001", "redis", false)],
            groups: vec![
                group("Session cache", &["a-001"], "a.cache"),
                group("Rate limiter", &["b-001"], "b.cache"),
            ],
            tags,
            fail_tags_for: vec![arn("a-001")],
            ..Default::default()
        };

        let servers = discover(&inventory, "redis").unwrap();
        assert_eq!(servers.len(), 2);
        assert_eq!(servers[0].name, "Session cache");
        assert_eq!(servers[1].name, "Rate limiter");
    }

    #[test]
    fn test_encryption_mirrors_cluster_not_endpoint() {
        let inventory = MockInventory {
            clusters: vec![cluster("a-001", "redis", false), cluster("b-001", "redis", true)],
            groups: vec![
                group("a", &["a-001"], "localhost"),
                group("b", &["b-001"], "localhost"),
            ],
            ..Default::default()
        };

        let servers = discover(&inventory, "redis").unwrap();
        assert!(!servers[0].encrypted);
        assert!(servers[1].encrypted);
    }

    #[test]
    fn test_order_follows_group_listing() {
        let inventory = MockInventory {
            clusters: vec![
                cluster("c-001", "redis", false),
                cluster("a-001", "redis", false),
                cluster("b-001", "redis", false),
            ],
            groups: vec![
                group("zulu", &["c-001"], "z.cache"),
                group("alpha", &["a-001"], "a.cache"),
                group("mike", &["b-001"], "m.cache"),
            ],
            ..Default::default()
        };

        let names: Vec<String> = discover(&inventory, "redis")
            .unwrap()
            .into_iter()
            .map(|s| s.name)
            .collect();
        assert_eq!(names, vec!["zulu", "alpha", "mike"]);
        assert_eq!(
            *inventory.tag_calls.borrow(),
            vec![arn("c-001"), arn("a-001"), arn("b-001")]
        );
    }

    #[test]
    fn test_cluster_listing_failure_is_permission_error() {
        let inventory = MockInventory {
            fail_clusters: true,
            ..Default::default()
        };
        let err = discover(&inventory, "redis").unwrap_err();
        assert!(err.to_string().contains("describe cache clusters"));
    }

    #[test]
    fn test_group_listing_failure_is_permission_error() {
        let inventory = MockInventory {
            clusters: vec![cluster("a-001", "redis", false)],
            fail_groups: true,
            ..Default::default()
        };
        let err = discover(&inventory, "redis").unwrap_err();
        assert!(err.to_string().contains("describe replication groups"));
        assert!(inventory.tag_calls.borrow().is_empty());
    }
}
