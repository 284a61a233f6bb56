use generational_arena::{Arena, Index};
use tracing::instrument;

use crate::entities::{Algorithm, Effector};

/// Attachment payload for skeleton nodes.
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    /// Target attachment, if this node is a chain end.
    pub effector: Option<Effector>,
    /// Strategy attachment governing subtrees at or below this node.
    pub algorithm: Option<Algorithm>,
}

/// Jointed node in the arena-based skeleton hierarchy.
#[derive(Debug)]
pub struct SkeletonNode {
    /// Attachments carried by this node
    pub data: NodeData,
    /// Index of parent node in the arena, None for the tree root
    pub parent: Option<Index>,
    /// Indices of child nodes in the arena, in insertion order
    pub children: Vec<Index>,
}

/// Arena-based skeleton tree.
///
/// Uses a generational arena for memory-safe node references and O(1)
/// lookups; a node's [`Index`] is its stable identity and is what the
/// marking pass keys on. One arena holds one complete skeleton.
#[derive(Debug, Default)]
pub struct SkeletonArena {
    /// Arena storage for all skeleton nodes
    arena: Arena<SkeletonNode>,
    /// Index of the root node, None for an empty skeleton
    root: Option<Index>,
}

impl SkeletonArena {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
            root: None,
        }
    }

    /// Insert a node under `parent` (or as the root when `parent` is None).
    #[instrument(level = "trace", skip(self))]
    pub fn insert_node(&mut self, data: NodeData, parent: Option<Index>) -> Index {
        let node = SkeletonNode {
            data,
            parent,
            children: Vec::new(),
        };
        let node_idx = self.arena.insert(node);

        if let Some(parent_idx) = parent {
            if let Some(parent) = self.arena.get_mut(parent_idx) {
                parent.children.push(node_idx);
            }
        } else {
            self.root = Some(node_idx);
        }

        node_idx
    }

    /// Shorthand for inserting a node with no attachments.
    pub fn insert_bare(&mut self, parent: Option<Index>) -> Index {
        self.insert_node(NodeData::default(), parent)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node(&self, idx: Index) -> Option<&SkeletonNode> {
        self.arena.get(idx)
    }

    #[instrument(level = "trace", skip(self))]
    pub fn get_node_mut(&mut self, idx: Index) -> Option<&mut SkeletonNode> {
        self.arena.get_mut(idx)
    }

    pub fn root(&self) -> Option<Index> {
        self.root
    }

    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Attach an effector, replacing any previous one. Ignored for stale
    /// indices, matching [`insert_node`](Self::insert_node) tolerance.
    #[instrument(level = "trace", skip(self, effector))]
    pub fn attach_effector(&mut self, idx: Index, effector: Effector) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.data.effector = Some(effector);
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn detach_effector(&mut self, idx: Index) -> Option<Effector> {
        self.arena.get_mut(idx).and_then(|n| n.data.effector.take())
    }

    /// Attach an algorithm, replacing any previous one.
    #[instrument(level = "trace", skip(self, algorithm))]
    pub fn attach_algorithm(&mut self, idx: Index, algorithm: Algorithm) {
        if let Some(node) = self.arena.get_mut(idx) {
            node.data.algorithm = Some(algorithm);
        }
    }

    #[instrument(level = "trace", skip(self))]
    pub fn detach_algorithm(&mut self, idx: Index) -> Option<Algorithm> {
        self.arena
            .get_mut(idx)
            .and_then(|n| n.data.algorithm.take())
    }

    /// Pre-order (root first, left-to-right) traversal.
    pub fn iter(&self) -> TreeIterator {
        TreeIterator::new(self)
    }

    /// Post-order (children before parents) traversal.
    pub fn iter_postorder(&self) -> PostOrderIterator {
        PostOrderIterator::new(self)
    }

    /// Walk from `start` toward the tree root, `start` included.
    pub fn ancestors(&self, start: Index) -> AncestorIterator {
        AncestorIterator {
            arena: self,
            next: Some(start),
        }
    }

    #[instrument(level = "debug", skip(self))]
    pub fn depth(&self) -> usize {
        if let Some(root) = self.root {
            self.calculate_depth(root)
        } else {
            0
        }
    }

    fn calculate_depth(&self, node_idx: Index) -> usize {
        if let Some(node) = self.get_node(node_idx) {
            1 + node
                .children
                .iter()
                .map(|&child| self.calculate_depth(child))
                .max()
                .unwrap_or(0)
        } else {
            0
        }
    }

    /// Collects all leaf nodes (nodes with no children) in the tree.
    #[instrument(level = "debug", skip(self))]
    pub fn leaf_nodes(&self) -> Vec<Index> {
        let mut leaves = Vec::new();
        if let Some(root) = self.root {
            self.collect_leaves(root, &mut leaves);
        }
        leaves
    }

    fn collect_leaves(&self, node_idx: Index, leaves: &mut Vec<Index>) {
        if let Some(node) = self.get_node(node_idx) {
            if node.children.is_empty() {
                leaves.push(node_idx);
            } else {
                for &child in &node.children {
                    self.collect_leaves(child, leaves);
                }
            }
        }
    }
}

impl std::ops::Index<Index> for SkeletonArena {
    type Output = SkeletonNode;

    /// # Panics
    ///
    /// Panics if `idx` is stale. Indices produced by iterating the same
    /// arena within one rebuild are always live.
    fn index(&self, idx: Index) -> &SkeletonNode {
        &self.arena[idx]
    }
}

pub struct TreeIterator<'a> {
    arena: &'a SkeletonArena,
    stack: Vec<Index>,
}

impl<'a> TreeIterator<'a> {
    fn new(arena: &'a SkeletonArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push(root);
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for TreeIterator<'a> {
    type Item = (Index, &'a SkeletonNode);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(current_idx) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                // Push children in reverse order for left-to-right traversal
                for &child in node.children.iter().rev() {
                    self.stack.push(child);
                }
                return Some((current_idx, node));
            }
        }
        None
    }
}

pub struct PostOrderIterator<'a> {
    arena: &'a SkeletonArena,
    stack: Vec<(Index, bool)>,
}

impl<'a> PostOrderIterator<'a> {
    fn new(arena: &'a SkeletonArena) -> Self {
        let mut stack = Vec::new();
        if let Some(root) = arena.root() {
            stack.push((root, false));
        }
        Self { arena, stack }
    }
}

impl<'a> Iterator for PostOrderIterator<'a> {
    type Item = (Index, &'a SkeletonNode);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some((current_idx, visited)) = self.stack.pop() {
            if let Some(node) = self.arena.get_node(current_idx) {
                if !visited {
                    self.stack.push((current_idx, true));
                    for &child in node.children.iter().rev() {
                        self.stack.push((child, false));
                    }
                } else {
                    return Some((current_idx, node));
                }
            }
        }
        None
    }
}

pub struct AncestorIterator<'a> {
    arena: &'a SkeletonArena,
    next: Option<Index>,
}

impl<'a> Iterator for AncestorIterator<'a> {
    type Item = Index;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.arena.get_node(current).and_then(|n| n.parent);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::SolverKind;

    // root
    // ├── child1
    // │   └── grandchild1
    // └── child2
    fn small_tree() -> (SkeletonArena, Index, Index, Index, Index) {
        let mut arena = SkeletonArena::new();
        let root = arena.insert_bare(None);
        let child1 = arena.insert_bare(Some(root));
        let child2 = arena.insert_bare(Some(root));
        let grandchild1 = arena.insert_bare(Some(child1));
        (arena, root, child1, child2, grandchild1)
    }

    #[test]
    fn insert_wires_parent_and_children() {
        let (arena, root, child1, child2, grandchild1) = small_tree();

        assert_eq!(arena.root(), Some(root));
        assert_eq!(arena[root].children, vec![child1, child2]);
        assert_eq!(arena[child1].children, vec![grandchild1]);
        assert_eq!(arena[grandchild1].parent, Some(child1));
        assert_eq!(arena.node_count(), 4);
    }

    #[test]
    fn preorder_visits_root_first() {
        let (arena, root, child1, child2, grandchild1) = small_tree();

        let order: Vec<Index> = arena.iter().map(|(idx, _)| idx).collect();
        assert_eq!(order, vec![root, child1, grandchild1, child2]);
    }

    #[test]
    fn postorder_visits_children_before_parents() {
        let (arena, root, child1, child2, grandchild1) = small_tree();

        let order: Vec<Index> = arena.iter_postorder().map(|(idx, _)| idx).collect();
        assert_eq!(order, vec![grandchild1, child1, child2, root]);
    }

    #[test]
    fn ancestors_walk_includes_start_and_root() {
        let (arena, root, child1, _child2, grandchild1) = small_tree();

        let chain: Vec<Index> = arena.ancestors(grandchild1).collect();
        assert_eq!(chain, vec![grandchild1, child1, root]);
    }

    #[test]
    fn depth_and_leaves() {
        let (arena, _root, _child1, child2, grandchild1) = small_tree();

        assert_eq!(arena.depth(), 3);
        assert_eq!(arena.leaf_nodes(), vec![grandchild1, child2]);
    }

    #[test]
    fn attach_and_detach_roundtrip() {
        let (mut arena, _root, child1, _child2, grandchild1) = small_tree();

        arena.attach_effector(grandchild1, Effector::with_chain_length(2));
        arena.attach_algorithm(child1, Algorithm::new(SolverKind::TwoBone));

        assert!(arena[grandchild1].data.effector.is_some());
        assert!(arena[child1].data.algorithm.is_some());

        let effector = arena.detach_effector(grandchild1).unwrap();
        assert_eq!(effector.chain_length, 2);
        assert!(arena[grandchild1].data.effector.is_none());
        assert!(arena.detach_effector(grandchild1).is_none());

        let algorithm = arena.detach_algorithm(child1).unwrap();
        assert_eq!(algorithm.kind, SolverKind::TwoBone);
    }

    #[test]
    fn empty_arena_iterates_nothing() {
        let arena = SkeletonArena::new();
        assert_eq!(arena.iter().count(), 0);
        assert_eq!(arena.iter_postorder().count(), 0);
        assert_eq!(arena.depth(), 0);
        assert!(arena.leaf_nodes().is_empty());
    }
}
