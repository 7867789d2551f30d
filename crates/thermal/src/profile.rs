//! The building being simulated.

use std::fmt;

use hearth_core::constraint::{
    Constrained, ConstraintError, NonNegative, StrictlyPositive, UnitInterval,
};
use thiserror::Error;
use uom::si::{
    f64::{
        Area, HeatCapacity, HeatTransfer, Length, Power, ThermalConductance,
        ThermodynamicTemperature, Time, Volume,
    },
    area::square_meter,
    heat_capacity::joule_per_kelvin,
    heat_transfer::watt_per_square_meter_kelvin,
    length::meter,
    power::watt,
    thermodynamic_temperature::degree_celsius,
    time::hour,
    volume::cubic_meter,
};

use crate::{heating_system::HeatingSystemModel, hvac::Thermostat};

/// Divides ACH50 (air changes per hour at 50 Pa) to estimate natural infiltration.
///
/// This is the Lawrence Berkeley Laboratory rule of thumb for a typical
/// single-story house in a moderate climate.
pub const LBL_INFILTRATION_FACTOR: f64 = 17.0;

/// Imperial R-value (ft²·°F·h/Btu) per SI R-value (m²·K/W).
pub const R_VALUE_IMPERIAL_PER_SI: f64 = 5.67;

/// Effective heat capacity of the building per unit of conditioned volume, in J/(m³·K).
///
/// Lumps the air, framing, drywall and furnishings into one number.
pub const BUILDING_HEAT_CAPACITY_PER_VOLUME: f64 = 1.0e5;

/// Volumetric heat capacity of air, in J/(m³·K).
pub const AIR_VOLUMETRIC_HEAT_CAPACITY: f64 = 1200.0;

/// Geographic coordinates in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Location {
    latitude: f64,
    longitude: f64,
}

impl Location {
    /// Creates a location.
    ///
    /// # Errors
    ///
    /// Returns [`ProfileError::InvalidLocation`] if latitude is outside
    /// `[-90, 90]` or longitude is outside `[-180, 180]` (which also rejects
    /// non-finite values).
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ProfileError> {
        if (-90.0..=90.0).contains(&latitude) && (-180.0..=180.0).contains(&longitude) {
            Ok(Self {
                latitude,
                longitude,
            })
        } else {
            Err(ProfileError::InvalidLocation {
                latitude,
                longitude,
            })
        }
    }

    #[must_use]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    #[must_use]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Largest coordinate difference between two locations, in degrees.
    #[must_use]
    pub fn max_offset(&self, other: &Location) -> f64 {
        (self.latitude - other.latitude)
            .abs()
            .max((self.longitude - other.longitude).abs())
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Unvalidated building and HVAC inputs.
///
/// Turn into a [`BuildingThermalProfile`] with [`BuildingThermalProfile::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileConfig {
    pub location: Location,
    pub heating_setpoint: ThermodynamicTemperature,
    pub cooling_setpoint: ThermodynamicTemperature,
    /// Constant full-power HVAC rate.
    pub hvac_capacity: Power,
    /// Conditioned floor area of a single story.
    pub floor_area: Area,
    pub ceiling_height: Length,
    /// Wall insulation R-value in imperial units (ft²·°F·h/Btu).
    pub wall_r_value: f64,
    /// Air changes per hour at 50 Pa, from a blower door test.
    pub ach50: f64,
    /// South-facing window area.
    pub window_area: Area,
    /// Window solar heat gain coefficient.
    pub window_shgc: f64,
    pub heating_system: HeatingSystemModel,
}

/// An error building a [`BuildingThermalProfile`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ProfileError {
    #[error("invalid {parameter}: {source}")]
    InvalidParameter {
        parameter: &'static str,
        #[source]
        source: ConstraintError,
    },
    #[error("{parameter} must be finite")]
    NotFinite { parameter: &'static str },
    #[error(
        "heating setpoint ({heating_celsius:.2} °C) is above cooling setpoint ({cooling_celsius:.2} °C)"
    )]
    InvertedSetpoints {
        heating_celsius: f64,
        cooling_celsius: f64,
    },
    #[error("location ({latitude}, {longitude}) is outside the valid coordinate range")]
    InvalidLocation { latitude: f64, longitude: f64 },
}

/// The thermal description of a single-zone house.
///
/// Holds validated inputs and derives the physical quantities the energy
/// balance needs. Every quantity that ends up as a divisor is guaranteed
/// strictly positive, and the setpoints always form a valid dead band.
///
/// Profiles are never mutated. The `with_*` methods return modified copies,
/// which is how an "after" scenario is derived from a "before" one.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildingThermalProfile {
    location: Location,
    thermostat: Thermostat,
    hvac_capacity: Constrained<Power, NonNegative>,
    floor_area: Constrained<Area, StrictlyPositive>,
    ceiling_height: Constrained<Length, StrictlyPositive>,
    wall_r_value: Constrained<f64, StrictlyPositive>,
    ach50: Constrained<f64, NonNegative>,
    window_area: Constrained<Area, NonNegative>,
    window_shgc: Constrained<f64, UnitInterval>,
    heating_system: HeatingSystemModel,
}

impl BuildingThermalProfile {
    /// Validates a configuration and builds a profile from it.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if any input is out of range: non-finite
    /// values, non-positive floor area, ceiling height or R-value, negative
    /// capacity, ACH50 or window area, an SHGC outside `[0, 1]`, or a heating
    /// setpoint above the cooling setpoint.
    pub fn new(config: ProfileConfig) -> Result<Self, ProfileError> {
        let ProfileConfig {
            location,
            heating_setpoint,
            cooling_setpoint,
            hvac_capacity,
            floor_area,
            ceiling_height,
            wall_r_value,
            ach50,
            window_area,
            window_shgc,
            heating_system,
        } = config;

        let thermostat = Thermostat::new(heating_setpoint, cooling_setpoint)?;

        Ok(Self {
            location,
            thermostat,
            hvac_capacity: constrain("HVAC capacity", hvac_capacity.get::<watt>(), hvac_capacity)?,
            floor_area: constrain("floor area", floor_area.get::<square_meter>(), floor_area)?,
            ceiling_height: constrain(
                "ceiling height",
                ceiling_height.get::<meter>(),
                ceiling_height,
            )?,
            wall_r_value: constrain("wall R-value", wall_r_value, wall_r_value)?,
            ach50: constrain("ACH50", ach50, ach50)?,
            window_area: constrain("window area", window_area.get::<square_meter>(), window_area)?,
            window_shgc: constrain("window SHGC", window_shgc, window_shgc)?,
            heating_system,
        })
    }

    /// Returns a copy of this profile using a different heating system.
    #[must_use]
    pub fn with_heating_system(&self, heating_system: HeatingSystemModel) -> Self {
        Self {
            heating_system,
            ..self.clone()
        }
    }

    /// Returns a copy of this profile with a different ACH50, as after air sealing.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if `ach50` is negative or not finite.
    pub fn with_ach50(&self, ach50: f64) -> Result<Self, ProfileError> {
        Ok(Self {
            ach50: constrain("ACH50", ach50, ach50)?,
            ..self.clone()
        })
    }

    /// Returns a copy of this profile with a different wall R-value (imperial).
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if `wall_r_value` is not strictly positive.
    pub fn with_wall_r_value(&self, wall_r_value: f64) -> Result<Self, ProfileError> {
        Ok(Self {
            wall_r_value: constrain("wall R-value", wall_r_value, wall_r_value)?,
            ..self.clone()
        })
    }

    /// Returns a copy of this profile with different thermostat setpoints.
    ///
    /// # Errors
    ///
    /// Returns a [`ProfileError`] if the setpoints are not finite or inverted.
    pub fn with_setpoints(
        &self,
        heating_setpoint: ThermodynamicTemperature,
        cooling_setpoint: ThermodynamicTemperature,
    ) -> Result<Self, ProfileError> {
        Ok(Self {
            thermostat: Thermostat::new(heating_setpoint, cooling_setpoint)?,
            ..self.clone()
        })
    }

    #[must_use]
    pub fn location(&self) -> Location {
        self.location
    }

    #[must_use]
    pub fn thermostat(&self) -> Thermostat {
        self.thermostat
    }

    #[must_use]
    pub fn heating_setpoint(&self) -> ThermodynamicTemperature {
        self.thermostat.heating_setpoint()
    }

    #[must_use]
    pub fn cooling_setpoint(&self) -> ThermodynamicTemperature {
        self.thermostat.cooling_setpoint()
    }

    #[must_use]
    pub fn hvac_capacity(&self) -> Power {
        self.hvac_capacity.get()
    }

    #[must_use]
    pub fn floor_area(&self) -> Area {
        self.floor_area.get()
    }

    #[must_use]
    pub fn ceiling_height(&self) -> Length {
        self.ceiling_height.get()
    }

    /// Wall insulation R-value in imperial units (ft²·°F·h/Btu).
    #[must_use]
    pub fn wall_r_value(&self) -> f64 {
        self.wall_r_value.get()
    }

    #[must_use]
    pub fn ach50(&self) -> f64 {
        self.ach50.get()
    }

    #[must_use]
    pub fn window_area(&self) -> Area {
        self.window_area.get()
    }

    #[must_use]
    pub fn window_shgc(&self) -> f64 {
        self.window_shgc.get()
    }

    #[must_use]
    pub fn heating_system(&self) -> &HeatingSystemModel {
        &self.heating_system
    }

    /// Conditioned volume: floor area times ceiling height.
    #[must_use]
    pub fn building_volume(&self) -> Volume {
        self.floor_area() * self.ceiling_height()
    }

    /// Perimeter of a square footprint with the profile's floor area.
    #[must_use]
    pub fn building_perimeter(&self) -> Length {
        Length::new::<meter>(4.0 * self.floor_area().get::<square_meter>().sqrt())
    }

    /// Area that conducts heat to the outdoors: the walls plus the roof.
    #[must_use]
    pub fn envelope_area(&self) -> Area {
        self.building_perimeter() * self.ceiling_height() + self.floor_area()
    }

    /// Natural (unpressurized) air changes per hour.
    #[must_use]
    pub fn ach_natural(&self) -> f64 {
        self.ach50() / LBL_INFILTRATION_FACTOR
    }

    /// Wall insulation R-value in SI units (m²·K/W).
    #[must_use]
    pub fn wall_r_value_si(&self) -> f64 {
        self.wall_r_value() / R_VALUE_IMPERIAL_PER_SI
    }

    /// Effective heat capacity of the whole building.
    #[must_use]
    pub fn building_heat_capacity(&self) -> HeatCapacity {
        HeatCapacity::new::<joule_per_kelvin>(
            self.building_volume().get::<cubic_meter>() * BUILDING_HEAT_CAPACITY_PER_VOLUME,
        )
    }

    /// Heat flow through the envelope per kelvin of indoor/outdoor difference.
    #[must_use]
    pub fn envelope_conductance(&self) -> ThermalConductance {
        HeatTransfer::new::<watt_per_square_meter_kelvin>(1.0 / self.wall_r_value_si())
            * self.envelope_area()
    }

    /// Heat carried by infiltrating air per kelvin of indoor/outdoor difference.
    #[must_use]
    pub fn infiltration_conductance(&self) -> ThermalConductance {
        let air = HeatCapacity::new::<joule_per_kelvin>(
            self.building_volume().get::<cubic_meter>() * AIR_VOLUMETRIC_HEAT_CAPACITY,
        );
        air * self.ach_natural() / Time::new::<hour>(1.0)
    }

    /// How quickly the building drifts toward the outdoor temperature.
    ///
    /// Timesteps longer than this make the explicit update inaccurate.
    #[must_use]
    pub fn thermal_time_constant(&self) -> Time {
        self.building_heat_capacity()
            / (self.envelope_conductance() + self.infiltration_conductance())
    }
}

/// Checks that `raw` is finite, then applies the constraint `C` to `value`.
fn constrain<T, C>(parameter: &'static str, raw: f64, value: T) -> Result<Constrained<T, C>, ProfileError>
where
    C: hearth_core::constraint::Constraint<T>,
{
    if !raw.is_finite() {
        return Err(ProfileError::NotFinite { parameter });
    }
    Constrained::new(value).map_err(|source| ProfileError::InvalidParameter { parameter, source })
}

/// Returns `temperature` in °C if it is finite.
pub(crate) fn finite_celsius(
    parameter: &'static str,
    temperature: ThermodynamicTemperature,
) -> Result<f64, ProfileError> {
    let celsius = temperature.get::<degree_celsius>();
    if celsius.is_finite() {
        Ok(celsius)
    } else {
        Err(ProfileError::NotFinite { parameter })
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{thermal_conductance::watt_per_kelvin, time::second};

    use crate::heating_system::HeatingSystemModel;

    /// A 2000 ft² single-story house with 9 ft ceilings, R-10 walls and
    /// ACH50 of 17, kept at 72 °F by a 10 kW furnace.
    pub(crate) fn reference_config() -> ProfileConfig {
        ProfileConfig {
            location: Location::new(42.36, -71.06).unwrap(),
            heating_setpoint: ThermodynamicTemperature::new::<degree_celsius>(
                (72.0 - 32.0) * 5.0 / 9.0,
            ),
            cooling_setpoint: ThermodynamicTemperature::new::<degree_celsius>(
                (72.0 - 32.0) * 5.0 / 9.0,
            ),
            hvac_capacity: Power::new::<watt>(10_000.0),
            floor_area: Area::new::<square_meter>(185.8),
            ceiling_height: Length::new::<meter>(2.74),
            wall_r_value: 10.0,
            ach50: 17.0,
            window_area: Area::new::<square_meter>(9.29),
            window_shgc: 0.5,
            heating_system: HeatingSystemModel::natural_gas(),
        }
    }

    pub(crate) fn reference_profile() -> BuildingThermalProfile {
        BuildingThermalProfile::new(reference_config()).unwrap()
    }

    #[test]
    fn derived_geometry() {
        let profile = reference_profile();

        assert_relative_eq!(profile.building_volume().get::<cubic_meter>(), 185.8 * 2.74);
        assert_relative_eq!(
            profile.building_perimeter().get::<meter>(),
            4.0 * 185.8_f64.sqrt(),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            profile.envelope_area().get::<square_meter>(),
            4.0 * 185.8_f64.sqrt() * 2.74 + 185.8,
            epsilon = 1e-9
        );
    }

    #[test]
    fn derived_thermal_quantities() {
        let profile = reference_profile();

        assert_relative_eq!(profile.ach_natural(), 1.0);
        assert_relative_eq!(profile.wall_r_value_si(), 10.0 / 5.67);
        assert_relative_eq!(
            profile.building_heat_capacity().get::<joule_per_kelvin>(),
            185.8 * 2.74 * 1.0e5,
            epsilon = 1e-3
        );
    }

    #[test]
    fn conductances_and_time_constant() {
        let profile = reference_profile();

        let envelope = profile.envelope_area().get::<square_meter>() * 5.67 / 10.0;
        let infiltration = 185.8 * 2.74 * 1.0 / 3600.0 * 1200.0;

        assert_relative_eq!(profile.envelope_conductance().get::<watt_per_kelvin>(), envelope, epsilon = 1e-9);
        assert_relative_eq!(
            profile.infiltration_conductance().get::<watt_per_kelvin>(),
            infiltration,
            epsilon = 1e-9
        );

        let tau = 185.8 * 2.74 * 1.0e5 / (envelope + infiltration);
        assert_relative_eq!(
            profile.thermal_time_constant().get::<second>(),
            tau,
            max_relative = 1e-12
        );
    }

    #[test]
    fn rejects_non_positive_divisors() {
        let config = ProfileConfig {
            wall_r_value: 0.0,
            ..reference_config()
        };
        assert_eq!(
            BuildingThermalProfile::new(config),
            Err(ProfileError::InvalidParameter {
                parameter: "wall R-value",
                source: ConstraintError::Zero,
            })
        );

        let config = ProfileConfig {
            floor_area: Area::new::<square_meter>(-1.0),
            ..reference_config()
        };
        assert!(matches!(
            BuildingThermalProfile::new(config),
            Err(ProfileError::InvalidParameter {
                parameter: "floor area",
                source: ConstraintError::Negative,
            })
        ));

        let config = ProfileConfig {
            ceiling_height: Length::new::<meter>(0.0),
            ..reference_config()
        };
        assert!(BuildingThermalProfile::new(config).is_err());
    }

    #[test]
    fn rejects_out_of_range_inputs() {
        let config = ProfileConfig {
            window_shgc: 1.5,
            ..reference_config()
        };
        assert!(matches!(
            BuildingThermalProfile::new(config),
            Err(ProfileError::InvalidParameter {
                source: ConstraintError::AboveMaximum,
                ..
            })
        ));

        let config = ProfileConfig {
            ach50: f64::NAN,
            ..reference_config()
        };
        assert_eq!(
            BuildingThermalProfile::new(config),
            Err(ProfileError::NotFinite { parameter: "ACH50" })
        );

        let config = ProfileConfig {
            hvac_capacity: Power::new::<watt>(-5.0),
            ..reference_config()
        };
        assert!(BuildingThermalProfile::new(config).is_err());
    }

    #[test]
    fn zero_capacity_and_window_are_allowed() {
        let config = ProfileConfig {
            hvac_capacity: Power::new::<watt>(0.0),
            window_area: Area::new::<square_meter>(0.0),
            ach50: 0.0,
            ..reference_config()
        };
        assert!(BuildingThermalProfile::new(config).is_ok());
    }

    #[test]
    fn rejects_inverted_setpoints() {
        let config = ProfileConfig {
            heating_setpoint: ThermodynamicTemperature::new::<degree_celsius>(24.0),
            cooling_setpoint: ThermodynamicTemperature::new::<degree_celsius>(20.0),
            ..reference_config()
        };
        assert!(matches!(
            BuildingThermalProfile::new(config),
            Err(ProfileError::InvertedSetpoints { .. })
        ));
    }

    #[test]
    fn rejects_invalid_locations() {
        assert!(Location::new(91.0, 0.0).is_err());
        assert!(Location::new(0.0, -180.5).is_err());
        assert!(Location::new(f64::NAN, 0.0).is_err());
        assert!(Location::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn builders_return_modified_copies() {
        let before = reference_profile();
        let after = before
            .with_ach50(5.0)
            .unwrap()
            .with_heating_system(HeatingSystemModel::heat_pump());

        assert_relative_eq!(before.ach50(), 17.0);
        assert_eq!(before.heating_system().id(), "natural_gas");
        assert_relative_eq!(after.ach50(), 5.0);
        assert_eq!(after.heating_system().id(), "heat_pump");
        assert_eq!(after.floor_area(), before.floor_area());

        assert!(before.with_wall_r_value(-3.0).is_err());
    }
}
