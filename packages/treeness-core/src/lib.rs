#![forbid(unsafe_code)]
//! Single-parent tree capability for arbitrary entity types.
//! Entities live in a [`Forest`] arena; the tree relation is kept as handles,
//! guarded against cycles and dual parentage under a pluggable identity strategy.

pub mod attributes;
pub mod config;
pub mod day_of_week;
pub mod error;
pub mod forest;
pub mod hierarchy;
pub mod ids;
pub mod property;
pub mod traits;
pub mod traversal;

pub use attributes::{
    Attribute, Describable, Gps, HasGps, HasStreetAddress, StreetAddress, Versionable,
};
pub use config::{ForestConfig, IdentityPolicy};
pub use day_of_week::DayOfWeek;
pub use error::{Error, Result};
pub use forest::Forest;
pub use hierarchy::{Hierarchical, Search};
pub use ids::{ForestId, NodeId};
pub use property::{PropertySource, PropertyValue};
pub use traits::{
    from_fn, ByHandle, ByHandleOrId, Comparator, FromFn, Identifiable, NodeRef, SharedComparator,
};
pub use traversal::{Ancestors, Preorder};
