//! # recon
//!
//! Membership reconciliation engine for driftcheck.
//!
//! This crate answers one question: given two independently-sourced views of
//! the same fleet - one from a cloud inventory, one from a service-discovery
//! directory - which members appear on only one side?
//!
//! ## Core Concepts
//!
//! - **Member**: a normalized, address-keyed view of a fleet member
//! - **Reconciliation**: the two one-sided differences between two member lists
//! - **Policy**: which drift directions are checked, and at what severity
//! - **Verdict**: the final (severity, message) pair handed to the monitoring harness
//!
//! ## Example
//!
//! ```
//! use recon::{classify, reconcile, Member, Policy, Severity};
//!
//! let fleet = vec![Member::new("10.0.0.1", "i-1"), Member::new("10.0.0.2", "i-2")];
//! let cluster = vec![Member::new("10.0.0.1", "node-1")];
//!
//! let result = reconcile(fleet, cluster);
//! assert_eq!(result.only_in_fleet.len(), 1);
//!
//! let verdict = classify(&result, &Policy::default());
//! assert_eq!(verdict.severity, Severity::Critical);
//! ```
//!
//! Everything here is pure computation: no I/O, no failure path. Source
//! retrieval errors are the caller's problem and become an `Unknown` verdict
//! at the front end, never inside this crate.

pub mod diff;
pub mod member;
pub mod verdict;

pub use diff::{reconcile, Reconciliation};
pub use member::Member;
pub use verdict::{classify, Policy, Severity, Verdict};
