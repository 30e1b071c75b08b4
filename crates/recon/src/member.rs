//! The normalized, address-keyed record both sources are reduced to.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A fleet member as seen by one source, keyed by network address.
///
/// The address is the join key: it is the only field guaranteed comparable
/// across two independently-operated systems. Everything else is either
/// display material (`label`) or input to an adapter's filter predicate
/// (`attributes`, `alive`) - the reconciler itself never looks at them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// Network address (IPv4/IPv6 string form). Always present; adapters
    /// drop records without one before they get here.
    pub address: String,
    /// Display identifier (instance id, node name). Reporting only.
    pub label: String,
    /// Role/tag key-value pairs, consulted by adapter filters.
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
    /// Liveness as reported by the source, when the source reports one.
    /// `None` for sources whose query already implies liveness.
    #[serde(default)]
    pub alive: Option<bool>,
}

impl Member {
    /// Create a member with just the join key and display label.
    pub fn new(address: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            label: label.into(),
            attributes: BTreeMap::new(),
            alive: None,
        }
    }

    /// Builder-style attribute insertion.
    #[must_use]
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    /// Builder-style liveness flag.
    #[must_use]
    pub fn with_alive(mut self, alive: bool) -> Self {
        self.alive = Some(alive);
        self
    }

    /// Human-readable form: `label(address)`, or just the address when the
    /// source provided no label.
    pub fn display_name(&self) -> String {
        if self.label.is_empty() {
            self.address.clone()
        } else {
            format!("{}({})", self.label, self.address)
        }
    }
}
