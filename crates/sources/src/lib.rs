//! # sources
//!
//! Membership retrieval for driftcheck.
//!
//! A [`Source`] produces the list of members one system believes are
//! participating in a role, already filtered and normalized to
//! [`recon::Member`]. Two families exist:
//!
//! - **Fleet side** ([`InventoryClient`]): the cloud provider's compute
//!   inventory, queried by exact tag filter, or by load-balancer health
//!   status resolved back to instances.
//! - **Cluster side** ([`DirectoryClient`]): the service-discovery layer,
//!   queried through its service catalog or its live gossip member list.
//!
//! All four adapters are interchangeable behind the trait; the front end
//! picks a pair by configuration. Retrieval is strictly all-or-nothing:
//! any transport, status, or decode failure surfaces as [`SourceError`]
//! and no partial member list is ever returned.
//!
//! # Testing
//!
//! Use [`MockSource`] for tests without network access:
//!
//! ```
//! use sources::{MockSource, Source};
//! use recon::Member;
//!
//! let source = MockSource::with_members(vec![Member::new("10.0.0.1", "i-1")]);
//! assert_eq!(source.fetch().unwrap().len(), 1);
//! ```

pub mod adapter;
pub mod directory;
pub mod error;
pub mod inventory;
pub mod mock;

pub use adapter::{BalancerHealth, CatalogQuery, GossipMembers, TagQuery};
pub use directory::DirectoryClient;
pub use error::{Result, SourceError};
pub use inventory::InventoryClient;
pub use mock::MockSource;

use recon::Member;

/// A membership source: one side of the reconciliation.
///
/// Implementations apply their source-specific role filter before
/// returning, so the reconciler only ever sees records that matter.
pub trait Source: Send + Sync {
    /// Retrieve the filtered member list.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the underlying retrieval fails for any
    /// reason; callers must treat that as "source unavailable" and skip
    /// reconciliation entirely.
    fn fetch(&self) -> Result<Vec<Member>>;

    /// Short name for log lines and error context.
    fn name(&self) -> &'static str;
}
