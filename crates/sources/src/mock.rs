//! Mock source for testing without network access.

use crate::error::{Result, SourceError};
use crate::Source;
use recon::Member;

/// In-memory [`Source`] that returns a fixed member list, or a fixed
/// failure, for driving the runner and classifier in tests.
#[derive(Debug, Clone, Default)]
pub struct MockSource {
    members: Vec<Member>,
    failure: Option<String>,
}

impl MockSource {
    /// A source that succeeds with the given members.
    #[must_use]
    pub fn with_members(members: Vec<Member>) -> Self {
        Self {
            members,
            failure: None,
        }
    }

    /// A source that succeeds with members built from bare addresses.
    #[must_use]
    pub fn with_addresses(addresses: &[&str]) -> Self {
        Self::with_members(
            addresses
                .iter()
                .map(|address| Member::new(*address, format!("m-{address}")))
                .collect(),
        )
    }

    /// A source whose fetch always fails with the given message.
    #[must_use]
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            members: Vec::new(),
            failure: Some(message.into()),
        }
    }
}

impl Source for MockSource {
    fn fetch(&self) -> Result<Vec<Member>> {
        match &self.failure {
            Some(message) => Err(SourceError::Http {
                message: message.clone(),
                status: None,
            }),
            None => Ok(self.members.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
