//! Attachment entities carried by skeleton nodes.
//!
//! The partitioning core only looks at attachment *presence* and at the
//! effector's `chain_length`; every other field is carried through to the
//! solver seam untouched.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Solving strategy families understood by downstream solvers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    /// Closed-form single-bone solver.
    OneBone,
    /// Closed-form two-bone (trigonometric) solver.
    TwoBone,
    /// Iterative FABRIK solver for arbitrary chain lengths.
    Fabrik,
}

impl fmt::Display for SolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolverKind::OneBone => write!(f, "one-bone"),
            SolverKind::TwoBone => write!(f, "two-bone"),
            SolverKind::Fabrik => write!(f, "fabrik"),
        }
    }
}

/// Target attachment: some chain of ancestor nodes must be bent so that
/// the carrying node reaches `target_position`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Effector {
    /// Target position in model space.
    pub target_position: [f32; 3],
    /// Blend weight applied by the solver, 0.0..=1.0.
    pub weight: f32,
    /// Number of ancestors the chain may span. 0 means unlimited: the
    /// chain runs all the way to the tree root.
    pub chain_length: u32,
}

impl Default for Effector {
    fn default() -> Self {
        Self::unbounded()
    }
}

impl Effector {
    /// Effector whose chain runs to the tree root.
    pub fn unbounded() -> Self {
        Self {
            target_position: [0.0; 3],
            weight: 1.0,
            chain_length: 0,
        }
    }

    /// Effector whose chain spans at most `chain_length` ancestors.
    pub fn with_chain_length(chain_length: u32) -> Self {
        Self {
            chain_length,
            ..Self::unbounded()
        }
    }

    pub fn is_unbounded(&self) -> bool {
        self.chain_length == 0
    }
}

/// Strategy attachment: names the solver for the subtree rooted at or
/// above the carrying node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Algorithm {
    pub kind: SolverKind,
    /// Iteration cap for iterative solvers.
    pub max_iterations: u16,
    /// Convergence threshold on the target distance.
    pub tolerance: f32,
}

impl Algorithm {
    pub fn new(kind: SolverKind) -> Self {
        Self {
            kind,
            max_iterations: 20,
            tolerance: 1e-3,
        }
    }
}
