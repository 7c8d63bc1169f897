use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};

use generational_arena::Index;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Tag distinguishing one forest from another. Handles carry it so a node from
/// one forest can never be resolved against another forest's arena.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ForestId(u64);

impl ForestId {
    pub(crate) fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, AtomicOrdering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

/// Typed handle to a node stored in a [`Forest`](crate::Forest).
///
/// Handles are plain indices: copying one never touches the node, and the
/// tree relation only ever stores handles, never the entities themselves.
/// The phantom entity type makes mixing node types a compile error.
pub struct NodeId<T> {
    forest: ForestId,
    index: Index,
    _entity: PhantomData<fn() -> T>,
}

impl<T> NodeId<T> {
    pub(crate) fn new(forest: ForestId, index: Index) -> Self {
        Self {
            forest,
            index,
            _entity: PhantomData,
        }
    }

    /// Forest this handle was issued by.
    pub fn forest(&self) -> ForestId {
        self.forest
    }

    pub(crate) fn index(&self) -> Index {
        self.index
    }

    /// Arena slot and generation, mostly useful for diagnostics.
    pub fn raw_parts(&self) -> (usize, u64) {
        self.index.into_raw_parts()
    }
}

// Manual impls: deriving would require the same bounds on `T`.
impl<T> Clone for NodeId<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodeId<T> {}

impl<T> PartialEq for NodeId<T> {
    fn eq(&self, other: &Self) -> bool {
        self.forest == other.forest && self.index == other.index
    }
}

impl<T> Eq for NodeId<T> {}

impl<T> Hash for NodeId<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.forest.hash(state);
        self.index.hash(state);
    }
}

impl<T> PartialOrd for NodeId<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for NodeId<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.forest, self.raw_parts()).cmp(&(other.forest, other.raw_parts()))
    }
}

impl<T> fmt::Debug for NodeId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.raw_parts();
        f.debug_struct("NodeId")
            .field("forest", &self.forest.0)
            .field("slot", &slot)
            .field("generation", &generation)
            .finish()
    }
}

impl<T> fmt::Display for NodeId<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.raw_parts();
        write!(f, "{}:{}v{}", self.forest.0, slot, generation)
    }
}
