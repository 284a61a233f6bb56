//! Skeleton partitioning core for inverse-kinematics solving.
//!
//! Given a skeleton (a tree of jointed nodes) where some nodes carry an
//! *effector* (a target a chain of ancestors must bend toward, with an
//! optional chain length limit) and some carry an *algorithm* (the
//! solving strategy for the region at or above them), this crate computes
//! the minimal, correctly-ordered set of independent solver jobs.
//!
//! # Architecture
//!
//! ```text
//! SkeletonArena ──► effector scan ──► chain marks ──► subtrees ──► JobList
//! ```
//!
//! Effector chains are walked toward the root and every visited node gets
//! a [`Mark`](marking::Mark); overlapping chains merge. The marked region
//! is then carved into disjoint [`Subtree`](partition::Subtree)s, each
//! paired with its governing [`Algorithm`](entities::Algorithm), in an
//! order where nested subtrees precede the subtrees relying on their
//! result. A [`SolverFactory`](joblist::SolverFactory) turns each pair
//! into an opaque job owned by the [`JobList`](joblist::JobList).
//!
//! Numerical solving itself is out of scope; the factory trait is the
//! seam to it. Everything runs synchronously on the calling thread, and
//! the tree must not be mutated while a rebuild is in progress.

pub mod arena;
pub mod display;
pub mod entities;
pub mod errors;
pub mod joblist;
pub mod marking;
pub mod partition;
pub mod util;

pub use arena::{NodeData, SkeletonArena, SkeletonNode};
pub use display::TreeDisplay;
pub use entities::{Algorithm, Effector, SolverKind};
pub use errors::{JoblistError, JoblistResult};
pub use joblist::{JobList, SolverFactory};
pub use marking::{collect_effector_nodes, mark_chains, Mark};
pub use partition::{partition, Subtree};
