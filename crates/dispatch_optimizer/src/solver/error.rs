use thiserror::Error;

#[derive(Error, Debug)]
pub enum SolverError {
    /// A committed route failed its final re-check. This is a bug in the
    /// insertion search, never a property of the input.
    #[error("committed route of courier {courier_id} is not feasible")]
    InfeasibleRoute { courier_id: u64 },

    #[error("failed to build the insertion thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}
