use generational_arena::Index;
use thiserror::Error;

/// Failures surfaced by a job-list rebuild.
///
/// Every variant is a synchronous return value; a rebuild that fails
/// leaves the previous job list untouched.
#[derive(Error, Debug)]
pub enum JoblistError {
    /// Expected early-out, not a fault: the tree carries no effectors at
    /// all. Callers usually treat this as a valid empty result.
    #[error("no effectors were found in the tree, job list is empty")]
    NoEffectorsFound,

    /// User configuration error: an effector's chain reaches no ancestor
    /// with an algorithm attached.
    #[error("no algorithm assigned to subtree starting at node {0:?}")]
    NoAlgorithmForSubtree(Index),

    /// Invariant violation: chain marking visited a leaf node that carries
    /// no effector. Unreachable on a well-formed tree; indicates the tree
    /// was mutated during the rebuild.
    #[error("leaf node {0:?} with no effector was visited during chain marking")]
    InvalidConfiguration(Index),

    /// The solver factory refused to build a job for a subtree.
    #[error("solver construction failed for subtree at node {node:?}: {reason}")]
    SolverConstruction { node: Index, reason: String },
}

pub type JoblistResult<T> = Result<T, JoblistError>;
