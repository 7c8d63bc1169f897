use std::collections::HashSet;
use std::sync::Arc;

use generational_arena::Arena;
use tracing::{debug, instrument};

use crate::config::ForestConfig;
use crate::error::{Error, Result};
use crate::hierarchy::{Hierarchical, Search};
use crate::ids::{ForestId, NodeId};
use crate::traits::{Comparator, Identifiable, NodeRef, SharedComparator};

struct NodeState<T> {
    parent: Option<NodeId<T>>,
    children: Vec<NodeId<T>>,
    comparator: SharedComparator<T>,
}

struct Slot<T> {
    entity: T,
    state: NodeState<T>,
}

/// Arena of entities that may be arranged into single-parent trees.
///
/// The forest owns node storage; the tree relation itself is only handles.
/// Every mutation validates all preconditions before writing anything, so a
/// failed call leaves both endpoints exactly as they were.
pub struct Forest<T> {
    id: ForestId,
    nodes: Arena<Slot<T>>,
    default_comparator: SharedComparator<T>,
}

impl<T> Forest<T>
where
    T: Identifiable + 'static,
{
    pub fn new() -> Self {
        Self::with_config(ForestConfig::default())
    }

    pub fn with_config(config: ForestConfig) -> Self {
        Self::with_shared_comparator(config.identity.comparator())
    }
}

impl<T> Default for Forest<T>
where
    T: Identifiable + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Forest<T> {
    /// Forest whose nodes default to `comparator`, for entity types without ids.
    pub fn with_comparator<C>(comparator: C) -> Self
    where
        C: Comparator<T> + 'static,
    {
        Self::with_shared_comparator(Arc::new(comparator))
    }

    pub fn with_shared_comparator(comparator: SharedComparator<T>) -> Self {
        Self {
            id: ForestId::next(),
            nodes: Arena::new(),
            default_comparator: comparator,
        }
    }

    pub fn id(&self) -> ForestId {
        self.id
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Whether `node` was issued by this forest and is still live.
    pub fn contains(&self, node: NodeId<T>) -> bool {
        node.forest() == self.id && self.nodes.contains(node.index())
    }

    /// Store a new, detached node.
    pub fn insert(&mut self, entity: T) -> NodeId<T> {
        let index = self.nodes.insert(Slot {
            entity,
            state: NodeState {
                parent: None,
                children: Vec::new(),
                comparator: Arc::clone(&self.default_comparator),
            },
        });
        NodeId::new(self.id, index)
    }

    /// Release a node's storage and hand the entity back. Only detached
    /// leaves can be removed, so no handle in the forest is left dangling.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, node: NodeId<T>) -> Result<T> {
        let state = &self.slot(node, "node")?.state;
        if state.parent.is_some() {
            return Err(Error::IllegalArgument("node still has a parent".into()));
        }
        if !state.children.is_empty() {
            return Err(Error::IllegalArgument("node still has children".into()));
        }
        self.nodes
            .remove(node.index())
            .map(|slot| slot.entity)
            .ok_or_else(|| Error::missing("node"))
    }

    pub fn entity(&self, node: NodeId<T>) -> Result<&T> {
        Ok(&self.slot(node, "node")?.entity)
    }

    pub fn entity_mut(&mut self, node: NodeId<T>) -> Result<&mut T> {
        Ok(&mut self.slot_mut(node, "node")?.entity)
    }

    /// Every node without a parent, in storage order.
    pub fn roots(&self) -> Vec<NodeId<T>> {
        self.nodes
            .iter()
            .filter(|(_, slot)| slot.state.parent.is_none())
            .map(|(index, _)| NodeId::new(self.id, index))
            .collect()
    }

    pub fn default_comparator(&self) -> SharedComparator<T> {
        Arc::clone(&self.default_comparator)
    }

    /// Change the identity strategy used by operations invoked on `node`.
    pub fn set_comparator<C>(&mut self, node: NodeId<T>, comparator: C) -> Result<()>
    where
        C: Comparator<T> + 'static,
    {
        self.set_shared_comparator(node, Arc::new(comparator))
    }

    pub fn set_shared_comparator(&mut self, node: NodeId<T>, comparator: SharedComparator<T>) -> Result<()> {
        self.slot_mut(node, "node")?.state.comparator = comparator;
        Ok(())
    }

    /// Attach `node` under `parent`, using the parent's comparator.
    pub fn set_parent(&mut self, node: NodeId<T>, parent: NodeId<T>) -> Result<()> {
        let comparator = self.comparator_of(parent, "parent")?;
        self.set_parent_with(node, parent, &*comparator)
    }

    /// Attach `node` under `parent`, deciding node identity with `comparator`.
    #[instrument(level = "debug", skip(self, comparator))]
    pub fn set_parent_with(
        &mut self,
        node: NodeId<T>,
        parent: NodeId<T>,
        comparator: &dyn Comparator<T>,
    ) -> Result<()> {
        if let Err(err) = self.check_attach(node, parent, comparator) {
            debug!(%node, %parent, %err, "attach rejected");
            return Err(err);
        }
        self.commit_attach(node, parent);
        debug!(%node, %parent, "attached");
        Ok(())
    }

    /// Attach `child` under `parent`, using `parent`'s comparator. Returns `parent`.
    pub fn add_child(&mut self, parent: NodeId<T>, child: NodeId<T>) -> Result<NodeId<T>> {
        let comparator = self.comparator_of(parent, "parent")?;
        self.add_child_with(parent, child, &*comparator)
    }

    pub fn add_child_with(
        &mut self,
        parent: NodeId<T>,
        child: NodeId<T>,
        comparator: &dyn Comparator<T>,
    ) -> Result<NodeId<T>> {
        self.resolve(child, "child")?;
        self.set_parent_with(child, parent, comparator)?;
        Ok(parent)
    }

    /// Detach `node` from its parent, if it has one. Returns `node`.
    #[instrument(level = "debug", skip(self))]
    pub fn unset_parent(&mut self, node: NodeId<T>) -> Result<NodeId<T>> {
        if let Some(parent) = self.slot(node, "node")?.state.parent {
            let comparator = self.comparator_of(parent, "parent")?;
            self.remove_child_with(parent, node, &*comparator)?;
        }
        Ok(node)
    }

    /// Detach `child` from `parent`, using `parent`'s comparator. Returns `parent`.
    pub fn remove_child(&mut self, parent: NodeId<T>, child: NodeId<T>) -> Result<NodeId<T>> {
        let comparator = self.comparator_of(parent, "parent")?;
        self.remove_child_with(parent, child, &*comparator)
    }

    #[instrument(level = "debug", skip(self, comparator))]
    pub fn remove_child_with(
        &mut self,
        parent: NodeId<T>,
        child: NodeId<T>,
        comparator: &dyn Comparator<T>,
    ) -> Result<NodeId<T>> {
        let position = match self.check_detach(parent, child, comparator) {
            Ok(position) => position,
            Err(err) => {
                debug!(%parent, %child, %err, "detach rejected");
                return Err(err);
            }
        };
        let removed = self.commit_detach(parent, position);
        debug!(%parent, child = ?removed, "detached");
        Ok(parent)
    }

    /// Validate invariants: child and parent links agree, no duplicate child
    /// entries, every handle resolves, and no ancestor chain loops.
    /// Intended for tests and debugging.
    pub fn validate_invariants(&self) -> Result<()> {
        for (index, slot) in self.nodes.iter() {
            let id = NodeId::new(self.id, index);
            let mut seen = HashSet::new();
            for child in &slot.state.children {
                if !seen.insert(*child) {
                    return Err(Error::IllegalArgument("duplicate child entry".into()));
                }
                match self.nodes.get(child.index()) {
                    Some(child_slot) if child_slot.state.parent == Some(id) => {}
                    Some(_) => return Err(Error::IllegalArgument("child parent mismatch".into())),
                    None => return Err(Error::IllegalArgument("child not present in forest".into())),
                }
            }
            if let Some(parent) = slot.state.parent {
                match self.nodes.get(parent.index()) {
                    Some(parent_slot) if parent_slot.state.children.contains(&id) => {}
                    Some(_) => return Err(Error::IllegalArgument("parent does not list child".into())),
                    None => return Err(Error::IllegalArgument("parent not present in forest".into())),
                }
            }
        }

        for (index, _) in self.nodes.iter() {
            if self.has_cycle_from(NodeId::new(self.id, index)) {
                return Err(Error::TreeCircularity("cycle detected".into()));
            }
        }
        Ok(())
    }

    fn has_cycle_from(&self, start: NodeId<T>) -> bool {
        let mut visited = HashSet::new();
        let mut current = Some(start);
        while let Some(n) = current {
            if !visited.insert(n) {
                return true;
            }
            current = self.nodes.get(n.index()).and_then(|s| s.state.parent);
        }
        false
    }

    fn slot(&self, node: NodeId<T>, arg: &str) -> Result<&Slot<T>> {
        self.check_forest(node, arg)?;
        self.nodes.get(node.index()).ok_or_else(|| Error::missing(arg))
    }

    fn slot_mut(&mut self, node: NodeId<T>, arg: &str) -> Result<&mut Slot<T>> {
        self.check_forest(node, arg)?;
        self.nodes.get_mut(node.index()).ok_or_else(|| Error::missing(arg))
    }

    fn check_forest(&self, node: NodeId<T>, arg: &str) -> Result<()> {
        if node.forest() != self.id {
            return Err(Error::IllegalArgument(format!(
                "{arg} must be the same type of node as this"
            )));
        }
        Ok(())
    }

    fn comparator_of(&self, node: NodeId<T>, arg: &str) -> Result<SharedComparator<T>> {
        Ok(Arc::clone(&self.slot(node, arg)?.state.comparator))
    }

    /// Phase one of an attach: every precondition, nothing written.
    fn check_attach(&self, node: NodeId<T>, parent: NodeId<T>, comparator: &dyn Comparator<T>) -> Result<()> {
        let this = self.slot(node, "node")?;
        if parent.forest() == self.id && !self.nodes.contains(parent.index()) {
            return Err(Error::missing("parent"));
        }
        if this.state.parent.is_some() {
            return Err(Error::IllegalArgument("this already has a parent".into()));
        }
        let parent_ref = self.resolve(parent, "parent")?;
        let this_ref = NodeRef {
            id: node,
            entity: &this.entity,
        };

        if comparator.same(parent_ref, this_ref) {
            return Err(Error::TreeCircularity("parent is this".into()));
        }
        let search = Search::recursive().using(comparator);
        if self.contains_child(node, parent, search)? {
            return Err(Error::TreeCircularity("parent already contained by this".into()));
        }
        if self.contained_by_parent(node, parent, search)? {
            return Err(Error::TreeCircularity("parent already contains this".into()));
        }
        if self.exists_in_tree_with(parent, node, comparator)? {
            return Err(Error::TreeCircularity("this already exists in tree".into()));
        }
        // `node` has no parent, so it can only be above `parent` as that tree's root.
        // Checked by handle so a permissive comparator can never close a loop.
        if self.root(parent)? == node {
            return Err(Error::TreeCircularity("parent already contained by this".into()));
        }
        Ok(())
    }

    /// Phase two of an attach. Both sides are written under one `&mut` borrow,
    /// so no caller can observe one link without the other.
    fn commit_attach(&mut self, node: NodeId<T>, parent: NodeId<T>) {
        if let Some(slot) = self.nodes.get_mut(node.index()) {
            slot.state.parent = Some(parent);
        }
        if let Some(slot) = self.nodes.get_mut(parent.index()) {
            slot.state.children.push(node);
        }
    }

    /// Phase one of a detach. Returns the position of the child entry to remove.
    ///
    /// An entry that is `child` itself is preferred over one that merely
    /// compares equal, so the entry removed is always one whose parent link
    /// points back at `parent`.
    fn check_detach(&self, parent: NodeId<T>, child: NodeId<T>, comparator: &dyn Comparator<T>) -> Result<usize> {
        let parent_ref = self.resolve(parent, "parent")?;
        let child_ref = self.resolve(child, "child")?;
        let children = self.child_slice(parent)?;

        let position = match children.iter().position(|&c| c == child) {
            Some(position) => Some(position),
            None => {
                let mut found = None;
                for (position, &candidate) in children.iter().enumerate() {
                    if comparator.same(child_ref, self.resolve(candidate, "child")?) {
                        found = Some(position);
                        break;
                    }
                }
                found
            }
        };
        let Some(position) = position else {
            return Err(Error::IllegalArgument("this does not contain child".into()));
        };

        let holds_parent = match self.parent(child)? {
            Some(current) => comparator.same(parent_ref, self.resolve(current, "parent")?),
            None => false,
        };
        if !holds_parent {
            return Err(Error::IllegalArgument("child's parent is not this".into()));
        }
        Ok(position)
    }

    /// Phase two of a detach: drop the child entry and clear its parent link.
    fn commit_detach(&mut self, parent: NodeId<T>, position: usize) -> Option<NodeId<T>> {
        let removed = self
            .nodes
            .get_mut(parent.index())
            .map(|slot| slot.state.children.remove(position))?;
        if let Some(slot) = self.nodes.get_mut(removed.index()) {
            slot.state.parent = None;
        }
        Some(removed)
    }
}

impl<T> Hierarchical<T> for Forest<T> {
    fn resolve(&self, node: NodeId<T>, arg: &str) -> Result<NodeRef<'_, T>> {
        let slot = self.slot(node, arg)?;
        Ok(NodeRef {
            id: node,
            entity: &slot.entity,
        })
    }

    fn parent(&self, node: NodeId<T>) -> Result<Option<NodeId<T>>> {
        Ok(self.slot(node, "node")?.state.parent)
    }

    fn child_slice(&self, node: NodeId<T>) -> Result<&[NodeId<T>]> {
        Ok(&self.slot(node, "node")?.state.children)
    }

    fn comparator(&self, node: NodeId<T>) -> Result<SharedComparator<T>> {
        self.comparator_of(node, "node")
    }
}
