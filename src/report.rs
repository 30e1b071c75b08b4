//! Verdict rendering - the plugin line the harness parses, plus an
//! interactive breakdown for humans.

use colored::Colorize;
use recon::{Reconciliation, Verdict};

/// The single status line consumed by the monitoring harness.
pub fn plugin_line(verdict: &Verdict) -> String {
    format!("{}: {}", verdict.severity, verdict.message)
}

/// Per-direction drift listing for interactive diagnosis.
pub fn display_details(drift: &Reconciliation) {
    if drift.is_converged() {
        println!();
        println!("  {} fleet and cluster agree", "✓".green());
        return;
    }

    if !drift.only_in_fleet.is_empty() {
        println!();
        println!("{}", "In fleet, missing from cluster".bold());
        for member in &drift.only_in_fleet {
            println!("  {} {}", "-".red(), member.display_name());
        }
    }

    if !drift.only_in_cluster.is_empty() {
        println!();
        println!("{}", "In cluster, missing from fleet".bold());
        for member in &drift.only_in_cluster {
            println!("  {} {}", "+".yellow(), member.display_name());
        }
    }

    println!();
    println!(
        "Summary: {} drifted member(s)",
        drift.drift_count().to_string().bold()
    );
}
