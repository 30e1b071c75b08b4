//! Mapping drift into the monitoring harness's severity vocabulary.

use crate::diff::Reconciliation;
use crate::member::Member;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Check severity, in the conventional monitoring-plugin vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    /// Both sides agree.
    Ok,
    /// Drift worth looking at, not paging over.
    Warning,
    /// Drift that means a machine is not serving.
    Critical,
    /// The check itself could not run (fetch or configuration failure).
    Unknown,
}

impl Severity {
    /// Process exit code expected by the monitoring harness.
    pub fn exit_code(self) -> i32 {
        match self {
            Self::Ok => 0,
            Self::Warning => 1,
            Self::Critical => 2,
            Self::Unknown => 3,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Ok => "OK",
            Self::Warning => "WARNING",
            Self::Critical => "CRITICAL",
            Self::Unknown => "UNKNOWN",
        };
        write!(f, "{label}")
    }
}

/// Which drift directions are checked, and at what severity.
///
/// The observed deployments disagree on this: most treat fleet-only drift as
/// critical and cluster-only drift as a warning, some collapse any mismatch
/// to critical, and the single-direction checks ignore one side entirely.
/// `None` means that direction is not checked at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Policy {
    /// Severity when the inventory has members the directory lacks.
    pub on_fleet_only: Option<Severity>,
    /// Severity when the directory has members the inventory lacks.
    pub on_cluster_only: Option<Severity>,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            on_fleet_only: Some(Severity::Critical),
            on_cluster_only: Some(Severity::Warning),
        }
    }
}

/// The check's final output: one severity, one line of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub severity: Severity,
    pub message: String,
}

impl Verdict {
    /// Verdict for a run that could not reconcile at all. The original
    /// error text is kept so operators can tell an API problem from drift.
    pub fn unknown(message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Unknown,
            message: message.into(),
        }
    }
}

/// Classify a reconciliation result under a policy.
///
/// Priority order, first match wins: fleet-only drift outranks cluster-only
/// drift regardless of the severities configured for each, because a machine
/// the discovery layer never registered is the stronger operational signal.
pub fn classify(result: &Reconciliation, policy: &Policy) -> Verdict {
    if let Some(severity) = policy.on_fleet_only {
        if !result.only_in_fleet.is_empty() {
            let addresses: Vec<&str> = result
                .only_in_fleet
                .iter()
                .map(|m| m.address.as_str())
                .collect();
            return Verdict {
                severity,
                message: format!(
                    "{} instance(s) left from cluster: [{}]",
                    addresses.len(),
                    addresses.join(", ")
                ),
            };
        }
    }

    if let Some(severity) = policy.on_cluster_only {
        if !result.only_in_cluster.is_empty() {
            let names: Vec<String> = result
                .only_in_cluster
                .iter()
                .map(Member::display_name)
                .collect();
            return Verdict {
                severity,
                message: format!(
                    "{} member(s) not properly registered: [{}]",
                    names.len(),
                    names.join(", ")
                ),
            };
        }
    }

    Verdict {
        severity: Severity::Ok,
        message: "OK".to_string(),
    }
}
