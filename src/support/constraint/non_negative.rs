use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Zero or greater.
///
/// Zero is meaningful (a wrapper without ancillary equipment), a negative
/// value is a configuration mistake.
///
/// ```
/// use twine_central_plant::support::constraint::NonNegative;
/// use uom::si::{f64::Power, power::watt};
///
/// assert!(NonNegative::new(Power::new::<watt>(0.0)).is_ok());
/// assert!(NonNegative::new(-1.0).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative;

impl NonNegative {
    /// # Errors
    ///
    /// Returns an error if the value is negative or `NaN`.
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, NonNegative>, ConstraintError> {
        Constrained::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for NonNegative {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater | Ordering::Equal) => Ok(()),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::Power, power::watt};

    #[test]
    fn ancillary_power() {
        let power = NonNegative::new(Power::new::<watt>(250.0)).expect("positive power");
        assert_eq!(power.into_inner(), Power::new::<watt>(250.0));
        assert!(NonNegative::new(Power::new::<watt>(0.0)).is_ok());
        assert_eq!(
            NonNegative::new(Power::new::<watt>(-0.5)).unwrap_err(),
            ConstraintError::Negative
        );
    }

    #[test]
    fn rejects_nan() {
        assert_eq!(
            NonNegative::new(f64::NAN).unwrap_err(),
            ConstraintError::NotANumber
        );
    }
}
