//! Chain marking: classify every node an effector chain can reach.
//!
//! For each effector node the marker walks toward the tree root, bounded
//! by the effector's chain length, and records a [`Mark`] per visited
//! node. The marks are transient: the partitioner consumes them during
//! the same rebuild and they are discarded afterwards.

use std::collections::hash_map::Entry;
use std::collections::HashMap;

use generational_arena::Index;
use tracing::{error, instrument, warn};

use crate::arena::SkeletonArena;
use crate::errors::{JoblistError, JoblistResult};

/// Per-node classification computed during one partition pass.
///
/// `End`-type marks denote the effector-bearing end of a chain; `Begin`-
/// type marks denote where a walk stops advancing toward the root.
/// `BeginAndEnd` is a node that is simultaneously a chain terminus and a
/// subtree root (an effector on a branching node, or a one-node chain).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mark {
    /// Interior chain node, passes straight through to a subtree.
    Section,
    /// Root of a new subtree.
    Begin,
    /// Chain terminus, leaf of the enclosing subtree.
    End,
    /// Chain terminus that also roots a nested subtree.
    BeginAndEnd,
}

/// Collect every node with an effector attached, in post-order.
///
/// Any traversal visiting each node once would do; post-order keeps the
/// mark-merge outcome deterministic (children's chains are walked before
/// their ancestors').
#[instrument(level = "debug", skip(tree))]
pub fn collect_effector_nodes(tree: &SkeletonArena) -> Vec<Index> {
    tree.iter_postorder()
        .filter(|(_, node)| node.data.effector.is_some())
        .map(|(idx, _)| idx)
        .collect()
}

/// Walk each effector's chain toward the root and build the mark map.
///
/// Fails with [`JoblistError::InvalidConfiguration`] if a walk reaches a
/// leaf node carrying no effector, which cannot happen on a tree that was
/// not mutated mid-rebuild.
#[instrument(level = "debug", skip(tree, effector_nodes))]
pub fn mark_chains(
    tree: &SkeletonArena,
    effector_nodes: &[Index],
) -> JoblistResult<HashMap<Index, Mark>> {
    let mut marks = HashMap::new();

    for &start in effector_nodes {
        let Some(effector) = tree[start].data.effector.as_ref() else {
            continue;
        };
        // None = unbounded, walk to the tree root
        let mut counter = match effector.chain_length {
            0 => None,
            n => Some(n),
        };

        let mut idx = start;
        loop {
            let node = &tree[idx];
            let is_chain_end = counter == Some(0) || node.parent.is_none();
            let mark = classify(
                idx,
                node.data.algorithm.is_some(),
                node.data.effector.is_some(),
                !node.children.is_empty(),
                is_chain_end,
            )?;

            match marks.entry(idx) {
                // Section is the universal pass-through state and takes
                // precedence over any previously recorded boundary mark.
                Entry::Occupied(mut existing) => {
                    if mark == Mark::Section {
                        existing.insert(Mark::Section);
                    }
                }
                Entry::Vacant(slot) => {
                    slot.insert(mark);
                }
            }

            if is_chain_end {
                break;
            }
            let Some(parent) = node.parent else { break };
            idx = parent;
            if let Some(remaining) = counter.as_mut() {
                *remaining -= 1;
            }
        }
    }

    Ok(marks)
}

/// Classify one visited node from the four chain-walk booleans.
fn classify(
    idx: Index,
    has_algorithm: bool,
    has_effector: bool,
    has_children: bool,
    is_chain_end: bool,
) -> JoblistResult<Mark> {
    match (has_algorithm, has_effector, has_children, is_chain_end) {
        // A walk only ever visits an effector node or an ancestor of one,
        // so an effector-less leaf here means the tree changed under us.
        (_, false, false, _) => {
            error!(
                node = ?idx,
                "found a leaf node with no effector attached during chain marking"
            );
            Err(JoblistError::InvalidConfiguration(idx))
        }

        (false, false, true, false) => Ok(Mark::Section),
        (false, false, true, true) => Ok(Mark::Begin),
        (false, true, false, _) => Ok(Mark::End),
        (false, true, true, _) => Ok(Mark::BeginAndEnd),

        (true, false, true, false) => {
            warn!(node = ?idx, "attached algorithm is unused here");
            Ok(Mark::Section)
        }
        (true, false, true, true) => {
            warn!(node = ?idx, "attached algorithm is unused here");
            Ok(Mark::Begin)
        }
        (true, true, false, false) => Ok(Mark::Begin),
        (true, true, false, true) => Ok(Mark::BeginAndEnd),
        (true, true, true, _) => Ok(Mark::BeginAndEnd),
    }
}
