//! Service-discovery directory client (cluster side).
//!
//! Two read paths into the discovery layer: the service catalog (already
//! filtered to one service, optionally one tag) and the raw gossip member
//! list from the local agent (unfiltered; the adapter filters client-side).

use crate::error::Result;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;
use ureq::Agent;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the service-discovery HTTP API.
pub struct DirectoryClient {
    /// HTTP agent for requests.
    agent: Agent,
    /// Directory API base URL.
    base_url: String,
}

impl DirectoryClient {
    /// Create a client with an explicit request deadline.
    #[must_use]
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self {
            agent,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Create a client with the default deadline.
    #[must_use]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    /// Get the current API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn catalog_url(&self, service: &str) -> String {
        format!("{}/v1/catalog/service/{}", self.base_url, service)
    }

    fn members_url(&self) -> String {
        format!("{}/v1/agent/members", self.base_url)
    }

    /// Instances registered in the catalog for a named service, optionally
    /// restricted to one service tag. The catalog does the filtering and
    /// only returns instances it presumes reachable.
    pub fn catalog_service(
        &self,
        service: &str,
        tag: Option<&str>,
    ) -> Result<Vec<CatalogRecord>> {
        let url = self.catalog_url(service);
        log::debug!("GET {url} tag {tag:?}");
        let mut request = self.agent.get(&url).header("User-Agent", "driftcheck");
        if let Some(tag) = tag {
            request = request.query("tag", tag);
        }

        let records: Vec<CatalogRecord> = request.call()?.body_mut().read_json()?;
        Ok(records)
    }

    /// The full gossip member list as the local agent sees it, every
    /// status included. Callers filter.
    pub fn agent_members(&self) -> Result<Vec<GossipRecord>> {
        let url = self.members_url();
        log::debug!("GET {url}");
        let records: Vec<GossipRecord> = self
            .agent
            .get(&url)
            .header("User-Agent", "driftcheck")
            .call()?
            .body_mut()
            .read_json()?;
        Ok(records)
    }
}

// =============================================================================
// Directory API response types
// =============================================================================

/// One catalog entry for a service.
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogRecord {
    /// Node name the service instance runs on.
    pub node: String,
    /// Node network address.
    pub address: String,
    /// Tags registered on the service instance.
    #[serde(default)]
    pub service_tags: Vec<String>,
}

/// One gossip member as reported by the agent.
#[derive(Debug, Clone, Deserialize)]
pub struct GossipRecord {
    /// Member (node) name.
    pub name: String,
    /// Member network address.
    pub address: String,
    /// Gossip state string: `"alive"`, `"failed"`, `"left"`, ...
    pub status: String,
    /// Member tag map.
    #[serde(default)]
    pub tags: BTreeMap<String, String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_url() {
        let client = DirectoryClient::with_base_url("http://127.0.0.1:8500");
        assert_eq!(
            client.catalog_url("web"),
            "http://127.0.0.1:8500/v1/catalog/service/web"
        );
    }

    #[test]
    fn test_members_url() {
        let client = DirectoryClient::with_base_url("http://127.0.0.1:8500/");
        assert_eq!(
            client.members_url(),
            "http://127.0.0.1:8500/v1/agent/members"
        );
    }

    #[test]
    fn test_catalog_record_decoding() {
        let body = r#"[
            {"node": "web-1", "address": "10.0.0.1", "service_tags": ["primary"]},
            {"node": "web-2", "address": "10.0.0.2"}
        ]"#;
        let records: Vec<CatalogRecord> = serde_json::from_str(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].service_tags, vec!["primary"]);
        assert!(records[1].service_tags.is_empty());
    }

    #[test]
    fn test_gossip_record_decoding() {
        let body = r#"[
            {"name": "web-1", "address": "10.0.0.1", "status": "alive", "tags": {"role": "web"}},
            {"name": "web-2", "address": "10.0.0.2", "status": "failed"}
        ]"#;
        let records: Vec<GossipRecord> = serde_json::from_str(body).unwrap();
        assert_eq!(records[0].status, "alive");
        assert_eq!(records[0].tags.get("role").map(String::as_str), Some("web"));
        assert_eq!(records[1].status, "failed");
        assert!(records[1].tags.is_empty());
    }
}
