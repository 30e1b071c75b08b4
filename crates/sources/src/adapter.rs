//! The four interchangeable role-filter policies.
//!
//! Each adapter owns a client plus its filter parameters and produces the
//! normalized member list for one side of the reconciliation. Which pair
//! runs is a front-end configuration decision, not an engine one.

use crate::directory::{CatalogRecord, DirectoryClient, GossipRecord};
use crate::error::Result;
use crate::inventory::{InstanceRecord, InventoryClient};
use crate::Source;
use recon::Member;

/// Load-balancer health state that counts as serving.
const IN_SERVICE: &str = "InService";

/// Gossip status that counts as participating.
const ALIVE: &str = "alive";

// =============================================================================
// Fleet side
// =============================================================================

/// Fleet adapter: every instance carrying an exact tag key/value pair.
///
/// The inventory query does the filtering server-side; nothing is dropped
/// here except records with no address yet.
pub struct TagQuery {
    client: InventoryClient,
    key: String,
    value: String,
}

impl TagQuery {
    pub fn new(client: InventoryClient, key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            client,
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Source for TagQuery {
    fn fetch(&self) -> Result<Vec<Member>> {
        let records = self.client.instances_by_tag(&self.key, &self.value)?;
        Ok(records.into_iter().filter_map(instance_member).collect())
    }

    fn name(&self) -> &'static str {
        "inventory tag query"
    }
}

/// Fleet adapter: instances a load balancer currently reports `InService`,
/// resolved back to full instance records by batch id lookup.
pub struct BalancerHealth {
    client: InventoryClient,
    balancer: String,
}

impl BalancerHealth {
    pub fn new(client: InventoryClient, balancer: impl Into<String>) -> Self {
        Self {
            client,
            balancer: balancer.into(),
        }
    }
}

impl Source for BalancerHealth {
    fn fetch(&self) -> Result<Vec<Member>> {
        let states = self.client.balancer_health(&self.balancer)?;
        let ids: Vec<String> = states
            .into_iter()
            .filter(|s| s.state == IN_SERVICE)
            .map(|s| s.instance_id)
            .collect();
        let records = self.client.instances_by_id(&ids)?;
        Ok(records.into_iter().filter_map(instance_member).collect())
    }

    fn name(&self) -> &'static str {
        "balancer health query"
    }
}

/// Normalize an inventory record, dropping instances that have no private
/// address yet (still provisioning, or already torn down).
fn instance_member(record: InstanceRecord) -> Option<Member> {
    let address = record.private_address.filter(|a| !a.is_empty())?;
    Some(Member {
        address,
        label: record.id,
        attributes: record.tags,
        alive: None,
    })
}

// =============================================================================
// Cluster side
// =============================================================================

/// Cluster adapter: the service catalog's view of one named service,
/// optionally restricted to a service tag. Filtering is server-side.
pub struct CatalogQuery {
    client: DirectoryClient,
    service: String,
    tag: Option<String>,
}

impl CatalogQuery {
    pub fn new(
        client: DirectoryClient,
        service: impl Into<String>,
        tag: Option<String>,
    ) -> Self {
        Self {
            client,
            service: service.into(),
            tag,
        }
    }
}

impl Source for CatalogQuery {
    fn fetch(&self) -> Result<Vec<Member>> {
        let records = self
            .client
            .catalog_service(&self.service, self.tag.as_deref())?;
        Ok(records.into_iter().filter_map(catalog_member).collect())
    }

    fn name(&self) -> &'static str {
        "catalog service query"
    }
}

fn catalog_member(record: CatalogRecord) -> Option<Member> {
    if record.address.is_empty() {
        return None;
    }
    Some(Member::new(record.address, record.node))
}

/// Cluster adapter: the raw gossip member list, filtered client-side to
/// members that are alive AND carry the expected tag key/value pair.
pub struct GossipMembers {
    client: DirectoryClient,
    key: String,
    value: String,
}

impl GossipMembers {
    pub fn new(
        client: DirectoryClient,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            client,
            key: key.into(),
            value: value.into(),
        }
    }
}

impl Source for GossipMembers {
    fn fetch(&self) -> Result<Vec<Member>> {
        let records = self.client.agent_members()?;
        Ok(records
            .into_iter()
            .filter_map(gossip_member)
            .filter(|m| member_matches(m, &self.key, &self.value))
            .collect())
    }

    fn name(&self) -> &'static str {
        "gossip member query"
    }
}

fn gossip_member(record: GossipRecord) -> Option<Member> {
    if record.address.is_empty() {
        return None;
    }
    let alive = record.status == ALIVE;
    let mut member = Member::new(record.address, record.name).with_alive(alive);
    member.attributes = record.tags;
    Some(member)
}

fn member_matches(member: &Member, key: &str, value: &str) -> bool {
    member.alive == Some(true) && member.attributes.get(key).map(String::as_str) == Some(value)
}
