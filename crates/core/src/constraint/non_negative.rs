use std::cmp::Ordering;

use num_traits::Zero;

use super::{Constrained, Constraint, ConstraintError};

/// Marker type enforcing that a value is zero or greater (`x ≥ 0`).
///
/// # Examples
///
/// ```
/// use hearth_core::constraint::NonNegative;
/// use uom::si::{f64::Power, power::watt};
///
/// assert!(NonNegative::new(Power::new::<watt>(0.0)).is_ok());
/// assert!(NonNegative::new(Power::new::<watt>(-1.0)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct NonNegative;

impl NonNegative {
    /// Constructs `Constrained<T, NonNegative>` if the value is zero or greater.
    ///
    /// # Errors
    ///
    /// Fails if the value is negative or not a number.
    pub fn new<T: PartialOrd + Zero>(
        value: T,
    ) -> Result<Constrained<T, NonNegative>, ConstraintError> {
        Constrained::<T, NonNegative>::new(value)
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

    use uom::si::{area::square_meter, f64::Area};

    #[test]
    fn floats() {
        assert!(NonNegative::new(2.0).is_ok(), "Positive value is ok");
        assert!(NonNegative::new(0.0).is_ok(), "Zero value is ok");
        assert_eq!(NonNegative::new(-2.0).unwrap_err(), ConstraintError::Negative);
        assert_eq!(
            NonNegative::new(f64::NAN).unwrap_err(),
            ConstraintError::NotANumber
        );
    }

    #[test]
    fn window_area() {
        assert!(NonNegative::new(Area::new::<square_meter>(0.0)).is_ok());
        assert!(NonNegative::new(Area::new::<square_meter>(-0.5)).is_err());
    }
}
