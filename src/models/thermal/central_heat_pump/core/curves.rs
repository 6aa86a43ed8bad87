//! Performance-curve lookup used by the unit solves.
//!
//! Units reference three curves per reference set: capacity ratio as a
//! function of temperature, EIR ratio as a function of temperature, and EIR
//! ratio as a function of part-load ratio. Evaluation is delegated to a
//! [`PerformanceCurves`] implementation so hosts can plug in their own curve
//! manager; [`CurveLibrary`] is the bundled one.

mod library;

pub use library::{Curve, CurveLibrary, CurveShape};

/// Handle to a curve resolved at configuration load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CurveId(usize);

impl CurveId {
    /// Creates a handle from a host-defined index.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the index behind this handle.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Black-box evaluator for published performance curves.
///
/// Evaluators may be asked for points outside a curve's nominal range and
/// must still return a value. Clamping negative capacity or EIR ratios is the
/// caller's job.
pub trait PerformanceCurves {
    /// Resolves a curve name to a handle.
    fn find(&self, name: &str) -> Option<CurveId>;

    /// Evaluates a single-variable curve.
    fn evaluate(&self, id: CurveId, x: f64) -> f64;

    /// Evaluates a two-variable curve.
    fn evaluate2(&self, id: CurveId, x: f64, y: f64) -> f64;

    /// Returns the `(min, max)` input domain of the curve's first variable.
    fn domain(&self, id: CurveId) -> (f64, f64);
}
