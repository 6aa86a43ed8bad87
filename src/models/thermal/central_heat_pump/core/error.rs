use thiserror::Error;
use twine_solvers::equation::bisection;
use uom::si::f64::Power;

use crate::support::thermo::PropertyError;

use super::{config::ConfigError, loops::LoopKind};

/// Errors that can occur during a wrapper call.
#[derive(Debug, Error)]
pub enum SimulateError {
    /// Sizing found a configuration problem.
    #[error("configuration error")]
    Config(#[from] ConfigError),

    /// A loop fluid property lookup failed.
    #[error("fluid property error")]
    Property(#[from] PropertyError),

    /// The heating duty solve encountered an error.
    #[error("bisection solver error")]
    Bisection(#[from] bisection::Error),

    /// The heating duty solve reached the iteration limit without converging.
    #[error("heating duty solve hit iteration limit: residual={residual:?}")]
    MaxIters {
        /// Best condenser duty residual achieved.
        residual: Power,

        /// Iteration count performed by the solver.
        iters: usize,
    },

    /// A solve arrived for a loop whose initialization call has not run.
    #[error("wrapper is not initialized for the {0:?} loop")]
    NotInitialized(LoopKind),

    /// The wrapper has autosized fields and was asked to solve before sizing.
    #[error("wrapper `{0}` has autosized fields that were never sized")]
    NotSized(String),
}
