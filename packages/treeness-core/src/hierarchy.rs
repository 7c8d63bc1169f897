//! Read side of the tree capability: containment checks, traversal and projection.
//!
//! Implementors only supply handle resolution and the raw `parent`/`children`
//! relation; every query here is derived from those four accessors.

use std::collections::HashMap;

use crate::error::Result;
use crate::ids::NodeId;
use crate::property::{PropertySource, PropertyValue};
use crate::traits::{Comparator, NodeRef, SharedComparator};
use crate::traversal::{Ancestors, Preorder};

/// Options for [`Hierarchical::contains_child`] and [`Hierarchical::contained_by_parent`].
///
/// Defaults to a recursive search using the invoked-on node's comparator.
pub struct Search<'c, T> {
    recursive: bool,
    comparator: Option<&'c dyn Comparator<T>>,
}

impl<'c, T> Search<'c, T> {
    /// Search the whole subtree (or the whole ancestor chain).
    pub fn recursive() -> Self {
        Self {
            recursive: true,
            comparator: None,
        }
    }

    /// Only look one level away: direct children, or the immediate parent.
    pub fn direct() -> Self {
        Self {
            recursive: false,
            comparator: None,
        }
    }

    /// Override the identity strategy for this search.
    pub fn using(mut self, comparator: &'c dyn Comparator<T>) -> Self {
        self.comparator = Some(comparator);
        self
    }

    pub fn is_recursive(&self) -> bool {
        self.recursive
    }
}

impl<T> Default for Search<'_, T> {
    fn default() -> Self {
        Self::recursive()
    }
}

impl<T> Clone for Search<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Search<'_, T> {}

/// Hierarchy capability over nodes of a single entity type.
pub trait Hierarchical<T> {
    /// Resolve a handle to the node it denotes. `arg` names the argument in error messages.
    fn resolve(&self, node: NodeId<T>, arg: &str) -> Result<NodeRef<'_, T>>;

    fn parent(&self, node: NodeId<T>) -> Result<Option<NodeId<T>>>;

    /// Children in insertion order, borrowed.
    fn child_slice(&self, node: NodeId<T>) -> Result<&[NodeId<T>]>;

    /// Identity strategy configured for `node`.
    fn comparator(&self, node: NodeId<T>) -> Result<SharedComparator<T>>;

    fn is_root(&self, node: NodeId<T>) -> Result<bool> {
        Ok(self.parent(node)?.is_none())
    }

    fn child_count(&self, node: NodeId<T>) -> Result<usize> {
        Ok(self.child_slice(node)?.len())
    }

    /// Copy of the child sequence.
    fn children(&self, node: NodeId<T>) -> Result<Vec<NodeId<T>>> {
        Ok(self.child_slice(node)?.to_vec())
    }

    /// Topmost ancestor of `node`, or `node` itself when it has no parent.
    fn root(&self, node: NodeId<T>) -> Result<NodeId<T>> {
        let mut current = node;
        while let Some(parent) = self.parent(current)? {
            current = parent;
        }
        Ok(current)
    }

    fn ancestors(&self, node: NodeId<T>) -> Result<Ancestors<'_, T, Self>> {
        Ok(Ancestors::new(self, self.parent(node)?))
    }

    fn preorder(&self, node: NodeId<T>) -> Result<Preorder<'_, T, Self>> {
        self.resolve(node, "node")?;
        Ok(Preorder::new(self, node))
    }

    /// Whether `target` is a child of `node` (or, when recursive, anywhere below it).
    ///
    /// Each level is compared in full before descending, and the search stops
    /// at the first match.
    fn contains_child(&self, node: NodeId<T>, target: NodeId<T>, search: Search<'_, T>) -> Result<bool> {
        let target = self.resolve(target, "target")?;
        let configured;
        let comparator: &dyn Comparator<T> = match search.comparator {
            Some(comparator) => comparator,
            None => {
                configured = self.comparator(node)?;
                &*configured
            }
        };

        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let children = self.child_slice(current)?;
            for &child in children {
                if comparator.same(target, self.resolve(child, "child")?) {
                    return Ok(true);
                }
            }
            if search.recursive {
                stack.extend(children.iter().rev().copied());
            }
        }
        Ok(false)
    }

    /// Whether `target` is the parent of `node` (or, when recursive, any ancestor).
    /// A root is contained by nothing.
    fn contained_by_parent(&self, node: NodeId<T>, target: NodeId<T>, search: Search<'_, T>) -> Result<bool> {
        let target = self.resolve(target, "target")?;
        let configured;
        let comparator: &dyn Comparator<T> = match search.comparator {
            Some(comparator) => comparator,
            None => {
                configured = self.comparator(node)?;
                &*configured
            }
        };

        let mut current = self.parent(node)?;
        while let Some(ancestor) = current {
            if comparator.same(target, self.resolve(ancestor, "parent")?) {
                return Ok(true);
            }
            if !search.recursive {
                return Ok(false);
            }
            current = self.parent(ancestor)?;
        }
        Ok(false)
    }

    /// Whether `target` appears anywhere below the root of `node`'s tree,
    /// using `node`'s comparator.
    fn exists_in_tree(&self, node: NodeId<T>, target: NodeId<T>) -> Result<bool> {
        let comparator = self.comparator(node)?;
        self.exists_in_tree_with(node, target, &*comparator)
    }

    fn exists_in_tree_with(
        &self,
        node: NodeId<T>,
        target: NodeId<T>,
        comparator: &dyn Comparator<T>,
    ) -> Result<bool> {
        let root = self.root(node)?;
        self.contains_child(root, target, Search::recursive().using(comparator))
    }

    /// All descendants of `node`, excluding `node`: its direct children first,
    /// then each child's own expansion in child order.
    fn children_recursively(&self, node: NodeId<T>) -> Result<Vec<NodeId<T>>> {
        let mut all = Vec::new();
        // nodes whose children are still to be emitted; the first child's
        // expansion is finished before its next sibling's starts
        let mut pending = vec![node];
        while let Some(current) = pending.pop() {
            let children = self.child_slice(current)?;
            all.extend_from_slice(children);
            pending.extend(children.iter().rev().copied());
        }
        Ok(all)
    }

    /// Preorder handles of the subtree rooted at `node`, `node` first.
    fn as_node_list(&self, node: NodeId<T>) -> Result<Vec<NodeId<T>>> {
        Ok(self.preorder(node)?.collect())
    }

    /// Preorder projection of the subtree rooted at `node` through `transform`.
    fn as_node_list_with<'a, U, F>(&'a self, node: NodeId<T>, mut transform: F) -> Result<Vec<U>>
    where
        T: 'a,
        F: FnMut(NodeRef<'a, T>) -> U,
    {
        self.preorder(node)?
            .map(move |id| self.resolve(id, "node").map(&mut transform))
            .collect()
    }

    /// Map from each node's `name` property to its handle. When two nodes share
    /// a value, the later one in preorder wins; nodes without the property are skipped.
    fn as_node_map_by_property(
        &self,
        node: NodeId<T>,
        name: &str,
    ) -> Result<HashMap<PropertyValue, NodeId<T>>>
    where
        T: PropertySource,
    {
        let mut map = HashMap::new();
        for id in self.preorder(node)? {
            if let Some(key) = self.resolve(id, "node")?.entity.property(name) {
                map.insert(key, id);
            }
        }
        Ok(map)
    }

    /// Like [`as_node_map_by_property`](Self::as_node_map_by_property), but keys
    /// and stores the transformed values.
    fn as_node_map_by_property_with<'a, U, F>(
        &'a self,
        node: NodeId<T>,
        name: &str,
        transform: F,
    ) -> Result<HashMap<PropertyValue, U>>
    where
        T: 'a,
        U: PropertySource,
        F: FnMut(NodeRef<'a, T>) -> U,
    {
        let mut map = HashMap::new();
        for value in self.as_node_list_with(node, transform)? {
            if let Some(key) = value.property(name) {
                map.insert(key, value);
            }
        }
        Ok(map)
    }
}
