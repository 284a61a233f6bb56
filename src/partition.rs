//! Subtree extraction: carve the marked region into independently
//! solvable subtrees and pair each with its governing algorithm.
//!
//! Chain length limits can isolate parts of the tree, splitting it into
//! nested subtrees which must be solved in order. Emission is post-order,
//! so a nested subtree's entry always precedes the entry of the subtree
//! it is nested in.

use std::collections::HashMap;

use generational_arena::Index;
use tracing::{error, instrument};

use crate::arena::SkeletonArena;
use crate::entities::Algorithm;
use crate::errors::{JoblistError, JoblistResult};
use crate::marking::Mark;

/// An independently solvable region: one root plus the chain terminals
/// reachable without crossing into a nested subtree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subtree {
    pub root: Index,
    /// Chain terminals in traversal order.
    pub leaves: Vec<Index>,
}

impl Subtree {
    fn new(root: Index) -> Self {
        Self {
            root,
            leaves: Vec::new(),
        }
    }

    /// Leaf-to-root node paths, one per leaf, root included.
    ///
    /// This is the shape numerical solvers consume a subtree in.
    pub fn chains(&self, tree: &SkeletonArena) -> Vec<Vec<Index>> {
        self.leaves
            .iter()
            .map(|&leaf| {
                let mut path = Vec::new();
                for idx in tree.ancestors(leaf) {
                    path.push(idx);
                    if idx == self.root {
                        break;
                    }
                }
                path
            })
            .collect()
    }
}

/// Split the marked region of the tree into (subtree, algorithm) pairs,
/// ordered so nested subtrees come before the subtrees enclosing them.
#[instrument(level = "debug", skip(tree, marks))]
pub fn partition(
    tree: &SkeletonArena,
    marks: &HashMap<Index, Mark>,
) -> JoblistResult<Vec<(Subtree, Algorithm)>> {
    let mut result = Vec::new();
    if let Some(root) = tree.root() {
        descend(tree, root, None, marks, &mut result)?;
    }
    Ok(result)
}

fn descend(
    tree: &SkeletonArena,
    idx: Index,
    mut current: Option<&mut Subtree>,
    marks: &HashMap<Index, Mark>,
    result: &mut Vec<(Subtree, Algorithm)>,
) -> JoblistResult<()> {
    match marks.get(&idx) {
        // Unmarked nodes belong to no subtree. A marked region can still
        // sit below one (a truncated chain), so keep descending, but the
        // current subtree context must not cross the unmarked gap.
        None => {
            for &child in &tree[idx].children {
                descend(tree, child, None, marks, result)?;
            }
        }

        Some(Mark::Section) => {
            for &child in &tree[idx].children {
                descend(tree, child, current.as_deref_mut(), marks, result)?;
            }
        }

        // A chain can continue past its nominal end when a nested, shorter
        // chain begins further down, so an End node keeps descending with
        // the same context.
        Some(Mark::End) => {
            if let Some(subtree) = current.as_deref_mut() {
                subtree.leaves.push(idx);
            }
            for &child in &tree[idx].children {
                descend(tree, child, current.as_deref_mut(), marks, result)?;
            }
        }

        Some(Mark::Begin) => {
            begin_subtree(tree, idx, marks, result)?;
        }

        Some(Mark::BeginAndEnd) => {
            if let Some(subtree) = current.as_deref_mut() {
                subtree.leaves.push(idx);
            }
            begin_subtree(tree, idx, marks, result)?;
        }
    }

    Ok(())
}

/// Open a new subtree rooted at `idx`, process its children, then emit it
/// with its governing algorithm. Children first: nested subtrees land in
/// the result before this one.
fn begin_subtree(
    tree: &SkeletonArena,
    idx: Index,
    marks: &HashMap<Index, Mark>,
    result: &mut Vec<(Subtree, Algorithm)>,
) -> JoblistResult<()> {
    let mut subtree = Subtree::new(idx);
    for &child in &tree[idx].children {
        descend(tree, child, Some(&mut subtree), marks, result)?;
    }

    let algorithm = resolve_algorithm(tree, idx).ok_or_else(|| {
        error!(node = ?idx, "no algorithm assigned to subtree");
        JoblistError::NoAlgorithmForSubtree(idx)
    })?;

    result.push((subtree, algorithm.clone()));
    Ok(())
}

/// The governing algorithm is the first one found walking upward from the
/// subtree root, the root node of the whole tree included.
fn resolve_algorithm(tree: &SkeletonArena, idx: Index) -> Option<&Algorithm> {
    tree.ancestors(idx)
        .find_map(|ancestor| tree[ancestor].data.algorithm.as_ref())
}
