use std::fmt;
use std::sync::Arc;

use crate::ids::NodeId;

/// A node as presented to an identity comparator: its handle plus a borrow of the entity.
pub struct NodeRef<'a, T> {
    pub id: NodeId<T>,
    pub entity: &'a T,
}

impl<T> Clone for NodeRef<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeRef<'_, T> {}

impl<T: fmt::Debug> fmt::Debug for NodeRef<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("id", &self.id)
            .field("entity", self.entity)
            .finish()
    }
}

/// Pluggable identity strategy: decides whether two nodes denote the same entity.
///
/// Attach, detach and containment checks must all agree on one definition of
/// sameness, so the same comparator is threaded through every structural call.
pub trait Comparator<T>: Send + Sync {
    fn same(&self, a: NodeRef<'_, T>, b: NodeRef<'_, T>) -> bool;
}

pub type SharedComparator<T> = Arc<dyn Comparator<T>>;

/// Entities that expose an opaque identifier.
pub trait Identifiable {
    type Id: PartialEq;

    fn id(&self) -> Option<&Self::Id>;
}

/// Reference identity: two nodes are the same only if they are the same handle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ByHandle;

impl<T> Comparator<T> for ByHandle {
    fn same(&self, a: NodeRef<'_, T>, b: NodeRef<'_, T>) -> bool {
        a.id == b.id
    }
}

/// Reference identity, or equal entity ids.
///
/// With `absent_ids_match` set, two nodes that both lack an id are also treated
/// as the same entity. That conflates every idless node in duplicate and
/// circularity checks, so it is off unless asked for via [`ByHandleOrId::legacy`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ByHandleOrId {
    pub absent_ids_match: bool,
}

impl ByHandleOrId {
    pub fn strict() -> Self {
        Self {
            absent_ids_match: false,
        }
    }

    pub fn legacy() -> Self {
        Self {
            absent_ids_match: true,
        }
    }
}

impl<T: Identifiable> Comparator<T> for ByHandleOrId {
    fn same(&self, a: NodeRef<'_, T>, b: NodeRef<'_, T>) -> bool {
        if a.id == b.id {
            return true;
        }
        match (a.entity.id(), b.entity.id()) {
            (Some(x), Some(y)) => x == y,
            (None, None) => self.absent_ids_match,
            _ => false,
        }
    }
}

/// Comparator backed by a closure, see [`from_fn`].
#[derive(Clone, Copy)]
pub struct FromFn<F>(F);

/// Wrap a closure as a [`Comparator`].
///
/// ```
/// use treeness_core::{from_fn, Forest, NodeRef};
///
/// let by_name = from_fn(|a: NodeRef<'_, String>, b: NodeRef<'_, String>| a.entity == b.entity);
/// let mut forest = Forest::with_comparator(by_name);
/// let x = forest.insert("x".to_string());
/// let y = forest.insert("x".to_string());
/// assert!(forest.set_parent(x, y).is_err());
/// ```
pub fn from_fn<T, F>(f: F) -> FromFn<F>
where
    F: Fn(NodeRef<'_, T>, NodeRef<'_, T>) -> bool + Send + Sync,
{
    FromFn(f)
}

impl<T, F> Comparator<T> for FromFn<F>
where
    F: Fn(NodeRef<'_, T>, NodeRef<'_, T>) -> bool + Send + Sync,
{
    fn same(&self, a: NodeRef<'_, T>, b: NodeRef<'_, T>) -> bool {
        (self.0)(a, b)
    }
}

impl<F> fmt::Debug for FromFn<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FromFn(..)")
    }
}
