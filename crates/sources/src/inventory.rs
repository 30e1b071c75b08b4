//! Cloud compute inventory client (fleet side).
//!
//! Speaks the provider's read-only inventory API: tag-filtered instance
//! listings (paginated), batch instance lookup by id, and load-balancer
//! health states. All filtering offered here happens server-side; the
//! adapters in [`crate::adapter`] decide what to do with the records.

use crate::error::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use ureq::Agent;

/// Default per-request deadline. The monitoring harness has its own
/// timeout; staying well under it keeps the verdict ours, not theirs.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the compute inventory API.
pub struct InventoryClient {
    /// HTTP agent for requests.
    agent: Agent,
    /// Inventory API base URL.
    base_url: String,
}

impl InventoryClient {
    /// Create a client with an explicit request deadline.
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self {
            agent,
            base_url: trim_base(base_url.into()),
        }
    }

    /// Create a client with the default deadline (useful for testing URL
    /// construction without a config in hand).
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    /// Get the current API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn instances_url(&self) -> String {
        format!("{}/v1/instances", self.base_url)
    }

    fn balancer_health_url(&self, balancer: &str) -> String {
        format!("{}/v1/balancers/{}/health", self.base_url, balancer)
    }

    /// List every instance carrying the exact tag key/value pair.
    ///
    /// Follows continuation tokens until the server stops returning one.
    /// A failed page fails the whole listing; no partial results.
    pub fn instances_by_tag(&self, key: &str, value: &str) -> Result<Vec<InstanceRecord>> {
        let url = self.instances_url();
        let mut instances = Vec::new();
        let mut page_token: Option<String> = None;

        loop {
            log::debug!("GET {url} tag {key}={value} token {page_token:?}");
            let mut request = self
                .agent
                .get(&url)
                .header("User-Agent", "driftcheck")
                .query("tag_key", key)
                .query("tag_value", value);
            if let Some(token) = &page_token {
                request = request.query("page_token", token);
            }

            let page: InstancePage = request.call()?.body_mut().read_json()?;
            instances.extend(page.instances);

            match page.next_token {
                Some(token) if !token.is_empty() => page_token = Some(token),
                _ => break,
            }
        }

        Ok(instances)
    }

    /// Look up full instance records for a batch of instance ids.
    pub fn instances_by_id(&self, ids: &[String]) -> Result<Vec<InstanceRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.instances_url();
        log::debug!("GET {url} ids {ids:?}");
        let mut request = self.agent.get(&url).header("User-Agent", "driftcheck");
        for id in ids {
            request = request.query("id", id);
        }

        let page: InstancePage = request.call()?.body_mut().read_json()?;
        Ok(page.instances)
    }

    /// Health states for every target registered with a load balancer.
    pub fn balancer_health(&self, balancer: &str) -> Result<Vec<HealthState>> {
        let url = self.balancer_health_url(balancer);
        log::debug!("GET {url}");
        let page: HealthPage = self
            .agent
            .get(&url)
            .header("User-Agent", "driftcheck")
            .call()?
            .body_mut()
            .read_json()?;
        Ok(page.states)
    }
}

fn trim_base(base_url: String) -> String {
    base_url.trim_end_matches('/').to_string()
}

// =============================================================================
// Inventory API response types
// =============================================================================

#[derive(Debug, Deserialize)]
struct InstancePage {
    instances: Vec<InstanceRecord>,
    #[serde(default)]
    next_token: Option<String>,
}

/// One compute instance as the inventory reports it.
#[derive(Debug, Clone, Deserialize)]
pub struct InstanceRecord {
    /// Provider-assigned instance id.
    pub id: String,
    /// Private network address. Absent while an instance is still
    /// provisioning; such records are dropped by the adapters.
    #[serde(default)]
    pub private_address: Option<String>,
    /// Instance tags.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[derive(Debug, Deserialize)]
struct HealthPage {
    states: Vec<HealthState>,
}

/// Health of one load-balancer target.
#[derive(Debug, Clone, Deserialize)]
pub struct HealthState {
    /// Instance id of the target.
    pub instance_id: String,
    /// Literal health state string, e.g. `"InService"` or `"OutOfService"`.
    pub state: String,
}
