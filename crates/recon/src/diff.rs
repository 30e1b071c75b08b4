//! Symmetric set difference between two membership views.

use crate::member::Member;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// The two one-sided differences between a fleet listing and a cluster
/// listing. Built by [`reconcile`], consumed immediately by the classifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reconciliation {
    /// Members the inventory reports that the discovery layer has no entry
    /// for. The stronger signal: a machine exists but never joined.
    pub only_in_fleet: Vec<Member>,
    /// Members the discovery layer reports that the inventory does not
    /// currently match to the role. Usually stale entries or tagging lag.
    pub only_in_cluster: Vec<Member>,
}

impl Reconciliation {
    /// True when both sides agree exactly.
    pub fn is_converged(&self) -> bool {
        self.only_in_fleet.is_empty() && self.only_in_cluster.is_empty()
    }

    /// Total number of drifted members across both directions.
    pub fn drift_count(&self) -> usize {
        self.only_in_fleet.len() + self.only_in_cluster.len()
    }
}

/// Compute the membership drift between two record sequences.
///
/// Both sequences are indexed by `address`; a duplicate address within one
/// sequence keeps the last record observed (last-write-wins). The two
/// difference lists come back sorted by address so repeated runs over the
/// same inputs produce identical output.
///
/// Pure and total: empty inputs yield empty differences, and there is no
/// failure path. O(n + m) via two hash-map builds plus two linear scans.
pub fn reconcile(
    fleet: impl IntoIterator<Item = Member>,
    cluster: impl IntoIterator<Item = Member>,
) -> Reconciliation {
    let fleet_set = index_by_address(fleet);
    let cluster_set = index_by_address(cluster);

    let mut only_in_fleet: Vec<Member> = fleet_set
        .iter()
        .filter(|(address, _)| !cluster_set.contains_key(*address))
        .map(|(_, member)| member.clone())
        .collect();
    let mut only_in_cluster: Vec<Member> = cluster_set
        .iter()
        .filter(|(address, _)| !fleet_set.contains_key(*address))
        .map(|(_, member)| member.clone())
        .collect();

    only_in_fleet.sort_by(|a, b| a.address.cmp(&b.address));
    only_in_cluster.sort_by(|a, b| a.address.cmp(&b.address));

    Reconciliation {
        only_in_fleet,
        only_in_cluster,
    }
}

/// Build the address -> member map for one side. Last write wins on
/// duplicate addresses.
fn index_by_address(members: impl IntoIterator<Item = Member>) -> HashMap<String, Member> {
    let mut set = HashMap::new();
    for member in members {
        set.insert(member.address.clone(), member);
    }
    set
}

#[cfg(test)]
mod tests {
    use super::*;

    fn members(addresses: &[&str]) -> Vec<Member> {
        addresses
            .iter()
            .map(|address| Member::new(*address, format!("m-{address}")))
            .collect()
    }

    #[test]
    fn test_identical_sets_are_converged() {
        let result = reconcile(
            members(&["10.0.0.1", "10.0.0.2"]),
            members(&["10.0.0.2", "10.0.0.1"]),
        );
        assert!(result.is_converged());
        assert_eq!(result.drift_count(), 0);
    }

    #[test]
    fn test_left_difference() {
        let result = reconcile(
            members(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]),
            members(&["10.0.0.2", "10.0.0.3"]),
        );
        assert_eq!(result.only_in_fleet.len(), 1);
        assert_eq!(result.only_in_fleet[0].address, "10.0.0.1");
        assert!(result.only_in_cluster.is_empty());
    }

    #[test]
    fn test_right_difference() {
        let result = reconcile(
            members(&["10.0.0.2", "10.0.0.3"]),
            members(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]),
        );
        assert!(result.only_in_fleet.is_empty());
        assert_eq!(result.only_in_cluster.len(), 1);
        assert_eq!(result.only_in_cluster[0].address, "10.0.0.1");
    }

    #[test]
    fn test_both_empty() {
        let result = reconcile(vec![], vec![]);
        assert!(result.is_converged());
    }

    #[test]
    fn test_empty_fleet_yields_full_cluster_difference() {
        let result = reconcile(vec![], members(&["10.0.0.1", "10.0.0.2"]));
        assert!(result.only_in_fleet.is_empty());
        assert_eq!(result.only_in_cluster.len(), 2);
    }

    #[test]
    fn test_empty_cluster_yields_full_fleet_difference() {
        let result = reconcile(members(&["10.0.0.1", "10.0.0.2"]), vec![]);
        assert_eq!(result.only_in_fleet.len(), 2);
        assert!(result.only_in_cluster.is_empty());
    }

    #[test]
    fn test_duplicate_address_keeps_last_record() {
        let fleet = vec![
            Member::new("10.0.0.1", "i-1"),
            Member::new("10.0.0.1", "i-2"),
        ];
        let result = reconcile(fleet, vec![]);
        assert_eq!(result.only_in_fleet.len(), 1);
        assert_eq!(result.only_in_fleet[0].label, "i-2");
    }

    #[test]
    fn test_idempotent_over_same_inputs() {
        let fleet = members(&["10.0.0.1", "10.0.0.3", "10.0.0.5"]);
        let cluster = members(&["10.0.0.2", "10.0.0.3"]);
        let first = reconcile(fleet.clone(), cluster.clone());
        let second = reconcile(fleet, cluster);
        assert_eq!(first, second);
    }

    #[test]
    fn test_differences_sorted_by_address() {
        let result = reconcile(members(&["10.0.0.9", "10.0.0.2", "10.0.0.5"]), vec![]);
        let addresses: Vec<&str> = result
            .only_in_fleet
            .iter()
            .map(|m| m.address.as_str())
            .collect();
        assert_eq!(addresses, vec!["10.0.0.2", "10.0.0.5", "10.0.0.9"]);
    }
}
