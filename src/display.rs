/*
Rendering lives behind a trait so the arena type stays free of any
terminal concern; implement TreeDisplay for other tree shapes as needed.
 */
use generational_arena::Index;
use termtree::Tree;

use crate::arena::SkeletonArena;

pub trait TreeDisplay {
    fn to_tree_string(&self) -> Tree<String>;
}

impl TreeDisplay for SkeletonArena {
    fn to_tree_string(&self) -> Tree<String> {
        if let Some(root_idx) = self.root() {
            let mut tree = Tree::new(node_label(self, root_idx));

            fn build_tree(arena: &SkeletonArena, node_idx: Index, parent_tree: &mut Tree<String>) {
                if let Some(node) = arena.get_node(node_idx) {
                    for &child_idx in &node.children {
                        let mut child_tree = Tree::new(node_label(arena, child_idx));
                        build_tree(arena, child_idx, &mut child_tree);
                        parent_tree.push(child_tree);
                    }
                }
            }

            build_tree(self, root_idx, &mut tree);
            tree
        } else {
            Tree::new("empty skeleton".to_string())
        }
    }
}

fn node_label(arena: &SkeletonArena, idx: Index) -> String {
    let (slot, _generation) = idx.into_raw_parts();
    let mut label = format!("node{slot}");
    if let Some(node) = arena.get_node(idx) {
        if let Some(effector) = &node.data.effector {
            if effector.is_unbounded() {
                label.push_str(" [effector]");
            } else {
                label.push_str(&format!(" [effector len={}]", effector.chain_length));
            }
        }
        if let Some(algorithm) = &node.data.algorithm {
            label.push_str(&format!(" [{}]", algorithm.kind));
        }
    }
    label
}
