use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is strictly positive (`x > 0`).
///
/// Used for every quantity that ends up as a divisor: the SI R-value, the
/// building heat capacity, heating system efficiency, and the timestep.
///
/// # Examples
///
/// ```
/// use hearth_core::constraint::{ConstraintError, StrictlyPositive};
/// use uom::si::{f64::Time, time::second};
///
/// let dt = StrictlyPositive::new(Time::new::<second>(600.0)).unwrap();
/// assert_eq!(dt.into_inner().get::<second>(), 600.0);
///
/// assert_eq!(
///     StrictlyPositive::new(Time::new::<second>(0.0)).unwrap_err(),
///     ConstraintError::Zero,
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct StrictlyPositive;

impl StrictlyPositive {
    /// Constructs `Constrained<T, StrictlyPositive>` if the value is greater than zero.
    ///
    /// # Errors
    ///
    /// Fails if the value is zero, negative, or not a number.
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, StrictlyPositive>, ConstraintError> {
        Constrained::<T, StrictlyPositive>::new(value)
    }
}

impl<T: PartialOrd + Zero> Constraint<T> for StrictlyPositive {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match value.partial_cmp(&T::zero()) {
            Some(Ordering::Greater) => Ok(()),
            Some(Ordering::Equal) => Err(ConstraintError::Zero),
            Some(Ordering::Less) => Err(ConstraintError::Negative),
            None => Err(ConstraintError::NotANumber),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use uom::si::{f64::HeatCapacity, heat_capacity::joule_per_kelvin};

    #[test]
    fn floats() {
        assert!(StrictlyPositive::new(1e-9).is_ok());
        assert_eq!(StrictlyPositive::new(0.0).unwrap_err(), ConstraintError::Zero);
        assert_eq!(
            StrictlyPositive::new(-3.0).unwrap_err(),
            ConstraintError::Negative
        );
        assert_eq!(
            StrictlyPositive::new(f64::NAN).unwrap_err(),
            ConstraintError::NotANumber
        );
    }

    #[test]
    fn heat_capacity() {
        let capacity = HeatCapacity::new::<joule_per_kelvin>(5.0e7);
        assert!(StrictlyPositive::new(capacity).is_ok());

        let zero = HeatCapacity::new::<joule_per_kelvin>(0.0);
        assert!(StrictlyPositive::new(zero).is_err());
    }
}
