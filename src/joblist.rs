//! Ordered solver job list, rebuilt atomically from a skeleton.
//!
//! The list owns the jobs the solver factory produces, one per subtree,
//! in dependency order: a subtree nested inside another has its job come
//! first. A rebuild either fully replaces the job sequence or leaves it
//! untouched; no partial state is ever observable.

use std::fmt::Display;

use tracing::{debug, instrument, warn};

use crate::arena::SkeletonArena;
use crate::entities::Algorithm;
use crate::errors::{JoblistError, JoblistResult};
use crate::marking::{collect_effector_nodes, mark_chains};
use crate::partition::{partition, Subtree};

/// Seam to the numerical solving layer: turns a (subtree, algorithm) pair
/// into an opaque solver job.
pub trait SolverFactory {
    type Job;
    type Error: Display;

    fn create(&mut self, subtree: &Subtree, algorithm: &Algorithm)
        -> Result<Self::Job, Self::Error>;
}

/// Ordered collection of solver jobs for one skeleton.
///
/// The list's lifetime is independent of the tree it was built from, but
/// its contents only stay meaningful while the tree is unchanged; call
/// [`update`](Self::update) after attaching or detaching effectors or
/// algorithms, or after editing the node hierarchy.
pub struct JobList<F: SolverFactory> {
    jobs: Vec<F::Job>,
}

impl<F: SolverFactory> JobList<F> {
    /// Build a job list for `tree`. Fails like [`update`](Self::update);
    /// in particular a tree without effectors yields
    /// [`JoblistError::NoEffectorsFound`] rather than an empty list.
    pub fn create(tree: &SkeletonArena, factory: &mut F) -> JoblistResult<Self> {
        let mut joblist = Self { jobs: Vec::new() };
        joblist.update(tree, factory)?;
        Ok(joblist)
    }

    /// Recompute the job sequence from scratch.
    ///
    /// On any failure the previously held jobs are kept as they were; the
    /// old sequence is dropped only once scanning, marking, partitioning
    /// and job construction have all succeeded.
    #[instrument(level = "debug", skip_all)]
    pub fn update(&mut self, tree: &SkeletonArena, factory: &mut F) -> JoblistResult<()> {
        let effector_nodes = collect_effector_nodes(tree);
        if effector_nodes.is_empty() {
            warn!("no effectors were found in the tree, job list is left unchanged");
            return Err(JoblistError::NoEffectorsFound);
        }

        let marks = mark_chains(tree, &effector_nodes)?;
        let subtrees = partition(tree, &marks)?;

        let mut jobs = Vec::with_capacity(subtrees.len());
        for (subtree, algorithm) in &subtrees {
            let job = factory
                .create(subtree, algorithm)
                .map_err(|e| JoblistError::SolverConstruction {
                    node: subtree.root,
                    reason: e.to_string(),
                })?;
            jobs.push(job);
        }

        debug!(
            effectors = effector_nodes.len(),
            jobs = jobs.len(),
            "job list rebuilt"
        );
        self.jobs = jobs;
        Ok(())
    }

    /// The jobs in guaranteed dependency order (nested before enclosing).
    pub fn jobs(&self) -> &[F::Job] {
        &self.jobs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, F::Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }
}

impl<'a, F: SolverFactory> IntoIterator for &'a JobList<F> {
    type Item = &'a F::Job;
    type IntoIter = std::slice::Iter<'a, F::Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.jobs.iter()
    }
}
