//! Composes the two configured sources, fetches them in parallel, and turns
//! the result into a verdict. The only place where retrieval failure and
//! reconciliation meet.

use crate::cli::CheckArgs;
use crate::config::FileConfig;
use anyhow::{bail, Context, Result};
use recon::{classify, reconcile, Policy, Reconciliation, Verdict};
use sources::{
    BalancerHealth, CatalogQuery, DirectoryClient, GossipMembers, InventoryClient, Source,
    TagQuery,
};
use std::time::Duration;

/// Directory agents conventionally listen on localhost next to the check.
const DEFAULT_DIRECTORY_ADDR: &str = "http://127.0.0.1:8500";

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// A fully-configured drift check: one source per side plus the policy.
pub struct Check {
    fleet: Box<dyn Source>,
    cluster: Box<dyn Source>,
    policy: Policy,
}

impl std::fmt::Debug for Check {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Check").field("policy", &self.policy).finish_non_exhaustive()
    }
}

/// What one run produced. `drift` is present only when both fetches
/// succeeded and reconciliation actually ran.
pub struct Outcome {
    pub verdict: Verdict,
    pub drift: Option<Reconciliation>,
}

impl Outcome {
    fn unknown(message: String) -> Self {
        Self {
            verdict: Verdict::unknown(message),
            drift: None,
        }
    }
}

impl Check {
    pub fn new(fleet: Box<dyn Source>, cluster: Box<dyn Source>, policy: Policy) -> Self {
        Self {
            fleet,
            cluster,
            policy,
        }
    }

    /// Build the check from CLI flags layered over the config file.
    ///
    /// Everything that can fail here is a configuration error, detected
    /// before any network call is made.
    pub fn from_args(args: &CheckArgs, file: &FileConfig) -> Result<Self> {
        let timeout = Duration::from_secs(
            args.timeout
                .or(file.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );

        let fleet: Box<dyn Source> = if let Some(raw) = &args.fleet_tag {
            let (key, value) = parse_tag(raw)?;
            let client = InventoryClient::new(inventory_addr(args, file)?, timeout);
            Box::new(TagQuery::new(client, key, value))
        } else if let Some(balancer) = &args.balancer {
            let client = InventoryClient::new(inventory_addr(args, file)?, timeout);
            Box::new(BalancerHealth::new(client, balancer))
        } else {
            bail!("a fleet filter is required: --fleet-tag or --balancer");
        };

        let cluster: Box<dyn Source> = if let Some(service) = &args.service {
            let client = DirectoryClient::new(directory_addr(args, file), timeout);
            Box::new(CatalogQuery::new(client, service, args.service_tag.clone()))
        } else if args.members {
            let raw = args
                .member_tag
                .as_ref()
                .or(args.fleet_tag.as_ref())
                .context("--members needs a tag pair: set --member-tag or --fleet-tag")?;
            let (key, value) = parse_tag(raw)?;
            let client = DirectoryClient::new(directory_addr(args, file), timeout);
            Box::new(GossipMembers::new(client, key, value))
        } else {
            bail!("a cluster filter is required: --service or --members");
        };

        let policy = Policy {
            on_fleet_only: args.on_fleet_only.severity(),
            on_cluster_only: args.on_cluster_only.severity(),
        };

        Ok(Self::new(fleet, cluster, policy))
    }

    /// Fetch both sides in parallel, then reconcile and classify.
    ///
    /// The fetches are independent and read-only, so they run concurrently.
    /// Any fetch failure aborts the run with an unknown verdict carrying
    /// the original error text; no partial reconciliation is attempted.
    pub fn run(&self) -> Outcome {
        let (fleet, cluster) = rayon::join(|| self.fleet.fetch(), || self.cluster.fetch());

        let fleet = match fleet {
            Ok(members) => members,
            Err(err) => return Outcome::unknown(format!("{} unavailable: {err}", self.fleet.name())),
        };
        let cluster = match cluster {
            Ok(members) => members,
            Err(err) => {
                return Outcome::unknown(format!("{} unavailable: {err}", self.cluster.name()));
            }
        };

        log::info!(
            "fetched {} fleet member(s), {} cluster member(s)",
            fleet.len(),
            cluster.len()
        );

        let drift = reconcile(fleet, cluster);
        let verdict = classify(&drift, &self.policy);
        Outcome {
            verdict,
            drift: Some(drift),
        }
    }
}

/// Split a `KEY=VALUE` role-filter argument.
fn parse_tag(raw: &str) -> Result<(String, String)> {
    match raw.split_once('=') {
        Some((key, value)) if !key.is_empty() && !value.is_empty() => {
            Ok((key.to_string(), value.to_string()))
        }
        _ => bail!("invalid tag filter '{raw}': expected KEY=VALUE"),
    }
}

fn inventory_addr(args: &CheckArgs, file: &FileConfig) -> Result<String> {
    args.inventory_addr
        .clone()
        .or_else(|| file.inventory_addr.clone())
        .context("inventory API address required: set --inventory-addr, INVENTORY_ADDR, or the config file")
}

fn directory_addr(args: &CheckArgs, file: &FileConfig) -> String {
    args.directory_addr
        .clone()
        .or_else(|| file.directory_addr.clone())
        .unwrap_or_else(|| DEFAULT_DIRECTORY_ADDR.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use recon::Severity;
    use sources::MockSource;

    fn check(fleet: MockSource, cluster: MockSource) -> Check {
        Check::new(Box::new(fleet), Box::new(cluster), Policy::default())
    }

    #[test]
    fn test_matching_membership_is_ok() {
        let outcome = check(
            MockSource::with_addresses(&["10.0.0.1", "10.0.0.2"]),
            MockSource::with_addresses(&["10.0.0.1", "10.0.0.2"]),
        )
        .run();
        assert_eq!(outcome.verdict.severity, Severity::Ok);
        assert_eq!(outcome.verdict.message, "OK");
        assert!(outcome.drift.unwrap().is_converged());
    }

    #[test]
    fn test_unregistered_instances_are_critical() {
        let outcome = check(
            MockSource::with_addresses(&["10.0.0.1", "10.0.0.2", "10.0.0.3"]),
            MockSource::with_addresses(&["10.0.0.1"]),
        )
        .run();
        assert_eq!(outcome.verdict.severity, Severity::Critical);
        assert!(outcome.verdict.message.contains("10.0.0.2"));
        assert!(outcome.verdict.message.contains("10.0.0.3"));
    }

    #[test]
    fn test_stale_cluster_members_are_warning() {
        let outcome = check(
            MockSource::with_addresses(&["10.0.0.1"]),
            MockSource::with_addresses(&["10.0.0.1", "10.0.0.2"]),
        )
        .run();
        assert_eq!(outcome.verdict.severity, Severity::Warning);
        assert!(outcome.verdict.message.contains("10.0.0.2"));
    }

    #[test]
    fn test_fleet_fetch_failure_is_unknown_without_reconciliation() {
        let outcome = check(
            MockSource::failing("simulated transport error"),
            MockSource::with_addresses(&["10.0.0.1"]),
        )
        .run();
        assert_eq!(outcome.verdict.severity, Severity::Unknown);
        assert!(outcome.verdict.message.contains("simulated transport error"));
        assert!(outcome.drift.is_none());
    }

    #[test]
    fn test_cluster_fetch_failure_is_unknown() {
        let outcome = check(
            MockSource::with_addresses(&["10.0.0.1"]),
            MockSource::failing("connection refused"),
        )
        .run();
        assert_eq!(outcome.verdict.severity, Severity::Unknown);
        assert!(outcome.verdict.message.contains("connection refused"));
    }

    #[test]
    fn test_parse_tag() {
        assert_eq!(
            parse_tag("role=web").unwrap(),
            ("role".to_string(), "web".to_string())
        );
        assert!(parse_tag("role").is_err());
        assert!(parse_tag("=web").is_err());
        assert!(parse_tag("role=").is_err());
    }

    #[test]
    fn test_parse_tag_keeps_extra_equals_in_value() {
        assert_eq!(
            parse_tag("env=prod=eu").unwrap(),
            ("env".to_string(), "prod=eu".to_string())
        );
    }

    fn args_for(fleet_tag: Option<&str>, service: Option<&str>) -> CheckArgs {
        use crate::cli::DriftAction;
        CheckArgs {
            fleet_tag: fleet_tag.map(str::to_string),
            balancer: None,
            service: service.map(str::to_string),
            service_tag: None,
            members: false,
            member_tag: None,
            inventory_addr: None,
            directory_addr: None,
            on_fleet_only: DriftAction::Critical,
            on_cluster_only: DriftAction::Warning,
            timeout: None,
            config: None,
            details: false,
        }
    }

    #[test]
    fn test_from_args_requires_inventory_addr() {
        let args = args_for(Some("role=web"), Some("web"));
        let err = Check::from_args(&args, &FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("inventory API address"));
    }

    #[test]
    fn test_from_args_rejects_malformed_tag() {
        let mut args = args_for(Some("roleweb"), Some("web"));
        args.inventory_addr = Some("http://inventory.internal".to_string());
        let err = Check::from_args(&args, &FileConfig::default()).unwrap_err();
        assert!(err.to_string().contains("expected KEY=VALUE"));
    }

    #[test]
    fn test_from_args_falls_back_to_config_file_addr() {
        let args = args_for(Some("role=web"), Some("web"));
        let file = FileConfig {
            inventory_addr: Some("http://inventory.internal".to_string()),
            ..Default::default()
        };
        assert!(Check::from_args(&args, &file).is_ok());
    }
}
