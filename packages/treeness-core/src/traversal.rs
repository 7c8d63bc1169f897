use crate::hierarchy::Hierarchical;
use crate::ids::NodeId;

/// Depth-first preorder walk of a subtree, starting with the subtree root.
pub struct Preorder<'a, T, H: ?Sized> {
    tree: &'a H,
    stack: Vec<NodeId<T>>,
}

impl<'a, T, H> Preorder<'a, T, H>
where
    H: Hierarchical<T> + ?Sized,
{
    pub(crate) fn new(tree: &'a H, start: NodeId<T>) -> Self {
        Self {
            tree,
            stack: vec![start],
        }
    }
}

impl<T, H> Iterator for Preorder<'_, T, H>
where
    H: Hierarchical<T> + ?Sized,
{
    type Item = NodeId<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Ok(children) = self.tree.child_slice(current) {
            // reversed so the first child is visited first
            self.stack.extend(children.iter().rev().copied());
        }
        Some(current)
    }
}

/// Walk up the parent chain, nearest ancestor first. The start node itself is not yielded.
pub struct Ancestors<'a, T, H: ?Sized> {
    tree: &'a H,
    next: Option<NodeId<T>>,
}

impl<'a, T, H> Ancestors<'a, T, H>
where
    H: Hierarchical<T> + ?Sized,
{
    pub(crate) fn new(tree: &'a H, first: Option<NodeId<T>>) -> Self {
        Self { tree, next: first }
    }
}

impl<T, H> Iterator for Ancestors<'_, T, H>
where
    H: Hierarchical<T> + ?Sized,
{
    type Item = NodeId<T>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.parent(current).ok().flatten();
        Some(current)
    }
}
