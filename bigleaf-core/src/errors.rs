use crate::canopy::workspace::Leaf;
use crate::control::PhotosynthesisPathway;
use thiserror::Error;

/// Error type for unrecoverable canopy simulation failures.
///
/// Both variants are fatal to the simulated day: no partial result is
/// produced and nothing is retried. Callers decide whether to abort the whole
/// run or skip the affected day.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CanopyError {
    #[error("{0:?} photosynthesis is not implemented; only the C3 pathway is supported")]
    UnimplementedPathway(PhotosynthesisPathway),
    #[error(
        "leaf energy balance failed to converge for the {leaf:?} leaf after \
         {iterations} iterations (last temperature step {last_step:.4} deg C)"
    )]
    ConvergenceFailure {
        leaf: Leaf,
        iterations: usize,
        last_step: f64,
    },
}

/// Convenience type for `Result<T, CanopyError>`.
pub type CanopyResult<T> = Result<T, CanopyError>;
