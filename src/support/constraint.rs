//! Validated numeric values.
//!
//! A unit's motor efficiency must lie in `[0, 1]`, a wrapper's ancillary
//! power cannot be negative, and reference capacities and COPs must be
//! positive. Configuration checks such values once as they are loaded; the
//! records then hold them as [`Constrained<T, C>`] so nothing downstream has
//! to check again.
//!
//! - [`NonNegative`]: zero or greater
//! - [`StrictlyPositive`]: greater than zero
//! - [`UnitInterval`]: `0 ≤ x ≤ 1`
//!
//! A new rule is a zero-sized marker implementing [`Constraint<T>`].

mod non_negative;
mod strictly_positive;
mod unit_interval;

use std::marker::PhantomData;

use thiserror::Error;

pub use non_negative::NonNegative;
pub use strictly_positive::StrictlyPositive;
pub use unit_interval::{UnitBounds, UnitInterval};

/// A rule a value must satisfy.
pub trait Constraint<T> {
    /// # Errors
    ///
    /// Returns the [`ConstraintError`] describing why `value` is rejected.
    fn check(value: &T) -> Result<(), ConstraintError>;
}

/// Why a value was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ConstraintError {
    #[error("value must not be negative")]
    Negative,
    #[error("value must not be zero")]
    Zero,
    #[error("value is not a number")]
    NotANumber,
    #[error("value is below the minimum allowed")]
    BelowMinimum,
    #[error("value is above the maximum allowed")]
    AboveMaximum,
}

/// A value known to satisfy `C`.
///
/// # Example
///
/// ```
/// use twine_central_plant::support::constraint::{Constrained, UnitInterval};
///
/// let efficiency = Constrained::<_, UnitInterval>::new(0.95).unwrap();
/// assert_eq!(efficiency.into_inner(), 0.95);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Constrained<T, C: Constraint<T>> {
    value: T,
    _marker: PhantomData<C>,
}

impl<T, C: Constraint<T>> Constrained<T, C> {
    /// # Errors
    ///
    /// Returns an error if `value` breaks the constraint.
    pub fn new(value: T) -> Result<Self, ConstraintError> {
        C::check(&value)?;
        Ok(Self {
            value,
            _marker: PhantomData,
        })
    }

    pub fn into_inner(self) -> T {
        self.value
    }
}
