//! Dead-band thermostat and the HVAC mode it selects.

use std::{convert::Infallible, fmt};

use hearth_core::Model;
use uom::si::f64::ThermodynamicTemperature;

use crate::profile::{ProfileError, finite_celsius};

/// What the HVAC system is doing during a timestep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HvacMode {
    Heating,
    Cooling,
    Off,
}

impl HvacMode {
    /// Lowercase name, as used in reports.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HvacMode::Heating => "heating",
            HvacMode::Cooling => "cooling",
            HvacMode::Off => "off",
        }
    }
}

impl fmt::Display for HvacMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A two-setpoint thermostat with no hysteresis.
///
/// Below the heating setpoint the system heats, above the cooling setpoint it
/// cools, and anywhere in between (setpoints included) it is off. The system
/// always runs at full capacity when on.
///
/// # Examples
///
/// ```
/// use hearth_thermal::{HvacMode, Thermostat};
/// use uom::si::{f64::ThermodynamicTemperature, thermodynamic_temperature::degree_celsius};
///
/// fn celsius(value: f64) -> ThermodynamicTemperature {
///     ThermodynamicTemperature::new::<degree_celsius>(value)
/// }
///
/// let thermostat = Thermostat::new(celsius(20.0), celsius(25.0)).unwrap();
///
/// assert_eq!(thermostat.mode(celsius(18.0)), HvacMode::Heating);
/// assert_eq!(thermostat.mode(celsius(22.0)), HvacMode::Off);
/// assert_eq!(thermostat.mode(celsius(27.0)), HvacMode::Cooling);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Thermostat {
    heating_setpoint: ThermodynamicTemperature,
    cooling_setpoint: ThermodynamicTemperature,
}

impl Thermostat {
    /// Creates a thermostat.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if either setpoint is not finite, or if the
    /// heating setpoint is above the cooling setpoint.
    pub fn new(
        heating_setpoint: ThermodynamicTemperature,
        cooling_setpoint: ThermodynamicTemperature,
    ) -> Result<Self, ProfileError> {
        let heating_celsius = finite_celsius("heating setpoint", heating_setpoint)?;
        let cooling_celsius = finite_celsius("cooling setpoint", cooling_setpoint)?;

        if heating_setpoint > cooling_setpoint {
            return Err(ProfileError::InvertedSetpoints {
                heating_celsius,
                cooling_celsius,
            });
        }

        Ok(Self {
            heating_setpoint,
            cooling_setpoint,
        })
    }

    #[must_use]
    pub fn heating_setpoint(&self) -> ThermodynamicTemperature {
        self.heating_setpoint
    }

    #[must_use]
    pub fn cooling_setpoint(&self) -> ThermodynamicTemperature {
        self.cooling_setpoint
    }

    /// Selects the HVAC mode for the given indoor temperature.
    #[must_use]
    pub fn mode(&self, indoor: ThermodynamicTemperature) -> HvacMode {
        if indoor < self.heating_setpoint {
            HvacMode::Heating
        } else if indoor > self.cooling_setpoint {
            HvacMode::Cooling
        } else {
            HvacMode::Off
        }
    }
}

impl Model for Thermostat {
    type Input = ThermodynamicTemperature;
    type Output = HvacMode;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(self.mode(*input))
    }
}
