use std::cmp::Ordering;

use uom::si::{f64::Ratio, ratio::ratio};

use super::{Constrained, Constraint, ConstraintError};

/// Types with well-defined `0` and `1` bounds.
///
/// Implemented for `f64` and `uom::si::f64::Ratio`.
pub trait UnitBounds: PartialOrd + Sized {
    fn zero() -> Self;
    fn one() -> Self;
}

impl UnitBounds for f64 {
    fn zero() -> Self {
        0.0
    }

    fn one() -> Self {
        1.0
    }
}

impl UnitBounds for Ratio {
    fn zero() -> Self {
        Ratio::new::<ratio>(0.0)
    }

    fn one() -> Self {
        Ratio::new::<ratio>(1.0)
    }
}

/// Marker type enforcing that a value lies in the closed unit interval: `0 ≤ x ≤ 1`.
///
/// Used for fractions such as a window's solar heat gain coefficient.
///
/// # Examples
///
/// ```
/// use hearth_core::constraint::{ConstraintError, UnitInterval};
///
/// assert!(UnitInterval::new(0.0).is_ok());
/// assert!(UnitInterval::new(1.0).is_ok());
/// assert_eq!(UnitInterval::new(1.2).unwrap_err(), ConstraintError::AboveMaximum);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UnitInterval;

impl UnitInterval {
    /// Constructs `Constrained<T, UnitInterval>` if `0 ≤ value ≤ 1`.
    ///
    /// # Errors
    ///
    /// - [`ConstraintError::BelowMinimum`] if less than zero.
    /// - [`ConstraintError::AboveMaximum`] if greater than one.
    /// - [`ConstraintError::NotANumber`] if comparison is undefined (e.g., NaN).
    pub fn new<T: UnitBounds>(value: T) -> Result<Constrained<T, UnitInterval>, ConstraintError> {
        Constrained::<T, UnitInterval>::new(value)
    }
}

impl<T: UnitBounds> Constraint<T> for UnitInterval {
    fn check(value: &T) -> Result<(), ConstraintError> {
        match (value.partial_cmp(&T::zero()), value.partial_cmp(&T::one())) {
            (None, _) | (_, None) => Err(ConstraintError::NotANumber),
            (Some(Ordering::Less), _) => Err(ConstraintError::BelowMinimum),
            (_, Some(Ordering::Greater)) => Err(ConstraintError::AboveMaximum),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::ratio::percent;

    #[test]
    fn floats_within_bounds() {
        assert!(UnitInterval::new(0.0).is_ok());
        assert!(UnitInterval::new(0.5).is_ok());
        assert!(UnitInterval::new(1.0).is_ok());
    }

    #[test]
    fn floats_out_of_range() {
        assert_eq!(
            UnitInterval::new(-0.1).unwrap_err(),
            ConstraintError::BelowMinimum
        );
        assert_eq!(
            UnitInterval::new(1.1).unwrap_err(),
            ConstraintError::AboveMaximum
        );
        assert_eq!(
            UnitInterval::new(f64::NAN).unwrap_err(),
            ConstraintError::NotANumber
        );
    }

    #[test]
    fn uom_ratio() {
        let shgc = UnitInterval::new(Ratio::new::<percent>(40.0)).unwrap();
        assert_relative_eq!(shgc.into_inner().get::<ratio>(), 0.4);

        assert!(UnitInterval::new(Ratio::new::<percent>(140.0)).is_err());
    }
}
