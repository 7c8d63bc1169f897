use std::sync::Arc;

use crate::traits::{ByHandle, ByHandleOrId, Identifiable, SharedComparator};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which built-in identity strategy a forest hands to the nodes it creates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(tag = "kind", rename_all = "camelCase")
)]
pub enum IdentityPolicy {
    /// Same handle only.
    Handle,
    /// Same handle, or equal entity ids.
    HandleOrId {
        /// Treat two idless nodes as the same entity.
        #[cfg_attr(feature = "serde", serde(rename = "absentIdsMatch", default))]
        absent_ids_match: bool,
    },
}

impl Default for IdentityPolicy {
    fn default() -> Self {
        IdentityPolicy::HandleOrId {
            absent_ids_match: false,
        }
    }
}

impl IdentityPolicy {
    pub fn comparator<T>(self) -> SharedComparator<T>
    where
        T: Identifiable + 'static,
    {
        match self {
            IdentityPolicy::Handle => Arc::new(ByHandle),
            IdentityPolicy::HandleOrId { absent_ids_match } => {
                Arc::new(ByHandleOrId { absent_ids_match })
            }
        }
    }
}

/// Forest-wide settings.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "camelCase", default)
)]
pub struct ForestConfig {
    pub identity: IdentityPolicy,
}

impl ForestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_identity(mut self, identity: IdentityPolicy) -> Self {
        self.identity = identity;
        self
    }
}
