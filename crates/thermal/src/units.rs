//! Unit helpers shared by the thermal model.
//!
//! Everything inside the model is a `uom` quantity. [`imperial`] covers the
//! plain-number conversions needed at the edges.

pub mod imperial;

use uom::si::{
    f64::{TemperatureInterval, ThermodynamicTemperature},
    temperature_interval::kelvin as delta_kelvin,
    thermodynamic_temperature::kelvin as abs_kelvin,
};

/// Extension method for `ThermodynamicTemperature` to compute a temperature difference.
pub trait TemperatureOps {
    /// Returns the difference `self - other` as a `TemperatureInterval`.
    ///
    /// `uom` keeps absolute temperatures and temperature differences apart,
    /// and subtracting two absolute temperatures directly does not yield an
    /// interval. Both values are converted to kelvin before subtracting, so
    /// inputs may use any temperature unit.
    fn minus(self, other: Self) -> TemperatureInterval;
}

impl TemperatureOps for ThermodynamicTemperature {
    fn minus(self, other: Self) -> TemperatureInterval {
        TemperatureInterval::new::<delta_kelvin>(
            self.get::<abs_kelvin>() - other.get::<abs_kelvin>(),
        )
    }
}
