//! Region resolution from the EC2 instance metadata service (IMDSv2)

use std::time::Duration;

use tracing::{debug, warn};

/// Link-local address of the instance metadata service
pub const METADATA_BASE_URL: &str = "http://169.254.169.254";

const TOKEN_PATH: &str = "/latest/api/token";
const AVAILABILITY_ZONE_PATH: &str = "/latest/meta-data/placement/availability-zone";
const TOKEN_TTL_HEADER: &str = "X-aws-ec2-metadata-token-ttl-seconds";
const TOKEN_HEADER: &str = "X-aws-ec2-metadata-token";
const TOKEN_TTL_SECONDS: &str = "21600";

/// Resolves the region to query when none was given on the command line
#[derive(Debug, Clone)]
pub struct RegionResolver {
    base_url: String,
    timeout: Duration,
}

impl RegionResolver {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Return `explicit` if set, otherwise ask the metadata service
    ///
    /// Failures yield an empty string; the caller reports it and carries on.
    pub fn resolve(&self, explicit: &str) -> String {
        if !explicit.is_empty() {
            return explicit.to_string();
        }

        match self.availability_zone() {
            Ok(zone) => {
                debug!("Instance availability zone: {}", zone);
                region_from_zone(&zone)
            }
            Err(e) => {
                warn!("Could not read region from instance metadata: {}", e);
                String::new()
            }
        }
    }

    fn availability_zone(&self) -> Result<String, reqwest::Error> {
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .no_proxy()
            .build()?;

        let token = client
            .put(format!("{}{}", self.base_url, TOKEN_PATH))
            .header(TOKEN_TTL_HEADER, TOKEN_TTL_SECONDS)
            .send()?
            .error_for_status()?
            .text()?;

        client
            .get(format!("{}{}", self.base_url, AVAILABILITY_ZONE_PATH))
            .header(TOKEN_HEADER, token)
            .send()?
            .error_for_status()?
            .text()
    }
}

/// Strip the zone letter: `us-east-1a` -> `us-east-1`
pub fn region_from_zone(zone: &str) -> String {
    let zone = zone.trim();
    match zone.chars().last() {
        Some(c) if c.is_ascii_lowercase() => zone[..zone.len() - 1].to_string(),
        _ => zone.to_string(),
    }
}
