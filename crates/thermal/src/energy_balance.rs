//! The per-timestep energy balance of a single-zone building.

use std::convert::Infallible;

use hearth_core::{
    Model,
    constraint::{Constrained, ConstraintError, StrictlyPositive},
};
use jiff::civil::DateTime;
use uom::{
    ConstZero,
    si::{
        energy::{joule, kilowatt_hour},
        f64::{
            Energy, HeatCapacity, HeatFluxDensity, TemperatureInterval, ThermodynamicTemperature,
            Time,
        },
        heat_capacity::joule_per_kelvin,
        temperature_interval::kelvin as delta_kelvin,
        time::{hour, second},
        volume::cubic_meter,
    },
};

use crate::{
    hvac::HvacMode,
    profile::{AIR_VOLUMETRIC_HEAT_CAPACITY, BuildingThermalProfile},
    units::TemperatureOps,
};

/// Default timestep, in seconds.
///
/// Ten minutes, even when the weather is hourly.
pub const DEFAULT_TIMESTEP_SECONDS: f64 = 600.0;

/// Conditions at the start of a timestep.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestepInput {
    pub timestamp: DateTime,
    pub indoor_temperature: ThermodynamicTemperature,
    pub outdoor_temperature: ThermodynamicTemperature,
    /// Solar irradiance on the south-facing windows.
    pub irradiance: HeatFluxDensity,
}

/// Everything that happened to the building during one timestep.
///
/// Energies are gains to the indoor air over the timestep: positive values
/// warm the building, negative values cool it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimestepRecord {
    pub timestamp: DateTime,
    pub outdoor_temperature: ThermodynamicTemperature,
    pub indoor_temperature_before: ThermodynamicTemperature,
    pub indoor_temperature_after: ThermodynamicTemperature,
    /// Outdoor minus indoor, at the start of the timestep.
    pub temperature_difference: TemperatureInterval,
    pub conduction: Energy,
    pub air_change: Energy,
    pub solar: Energy,
    /// Heat delivered by the HVAC system; negative while cooling.
    pub hvac: Energy,
    pub net: Energy,
    pub delta_t: TemperatureInterval,
    pub hvac_mode: HvacMode,
    /// Energy consumed by the heating system, never negative.
    pub hvac_energy_use: Energy,
}

impl TimestepRecord {
    /// HVAC energy consumption in kWh.
    #[must_use]
    pub fn hvac_energy_use_kwh(&self) -> f64 {
        self.hvac_energy_use.get::<kilowatt_hour>()
    }
}

/// Advances a building's indoor temperature by one explicit Euler step.
///
/// The building is a single thermal node. Over a timestep `dt` it gains:
///
/// - conduction through walls and roof, `ΔT · A / R · dt`
/// - the heat carried in by infiltrating air, `ΔT · V · ACH / 3600 · dt · 1200`
/// - solar gain through south windows, `A_win · SHGC · G · dt`
/// - HVAC output at full capacity, positive when heating and negative when cooling
///
/// where `ΔT` is outdoor minus indoor at the start of the step. The sum,
/// divided by the building heat capacity, is the indoor temperature change.
///
/// The HVAC mode is chosen from the indoor temperature at the start of the
/// step, so the thermostat reacts one step late. With a timestep much shorter
/// than the building's thermal time constant this lag is negligible.
///
/// Stepping is infallible. The profile guarantees a positive R-value and heat
/// capacity, and the timestep is checked when the engine is built.
#[derive(Debug, Clone, Copy)]
pub struct EnergyBalance<'a> {
    profile: &'a BuildingThermalProfile,
    timestep: Constrained<Time, StrictlyPositive>,
}

impl<'a> EnergyBalance<'a> {
    /// Creates an engine for `profile` stepping by `timestep`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConstraintError`] if `timestep` is zero, negative, NaN or
    /// infinite.
    pub fn new(profile: &'a BuildingThermalProfile, timestep: Time) -> Result<Self, ConstraintError> {
        if timestep.value.is_infinite() {
            return Err(ConstraintError::Infinite);
        }
        Ok(Self {
            profile,
            timestep: StrictlyPositive::new(timestep)?,
        })
    }

    #[must_use]
    pub fn profile(&self) -> &'a BuildingThermalProfile {
        self.profile
    }

    #[must_use]
    pub fn timestep(&self) -> Time {
        self.timestep.get()
    }

    /// Advances the building by one timestep.
    #[must_use]
    pub fn advance(&self, input: &TimestepInput) -> TimestepRecord {
        let profile = self.profile;
        let dt = self.timestep.get();

        let indoor = input.indoor_temperature;
        let temperature_difference = input.outdoor_temperature.minus(indoor);

        let conduction = profile.envelope_conductance() * temperature_difference * dt;

        let exchanged_volume = profile.building_volume().get::<cubic_meter>()
            * profile.ach_natural()
            * (dt.get::<second>() / Time::new::<hour>(1.0).get::<second>());
        let exchanged_air =
            HeatCapacity::new::<joule_per_kelvin>(exchanged_volume * AIR_VOLUMETRIC_HEAT_CAPACITY);
        let air_change: Energy = exchanged_air * temperature_difference;

        let solar = profile.window_area() * input.irradiance * profile.window_shgc() * dt;

        let hvac_mode = profile.thermostat().mode(indoor);
        let full_power = profile.hvac_capacity() * dt;
        let hvac = match hvac_mode {
            HvacMode::Heating => full_power,
            HvacMode::Cooling => -full_power,
            HvacMode::Off => Energy::ZERO,
        };

        let net = conduction + air_change + solar + hvac;
        let delta_t = TemperatureInterval::new::<delta_kelvin>(
            net.get::<joule>() / profile.building_heat_capacity().get::<joule_per_kelvin>(),
        );

        TimestepRecord {
            timestamp: input.timestamp,
            outdoor_temperature: input.outdoor_temperature,
            indoor_temperature_before: indoor,
            indoor_temperature_after: indoor + delta_t,
            temperature_difference,
            conduction,
            air_change,
            solar,
            hvac,
            net,
            delta_t,
            hvac_mode,
            hvac_energy_use: profile.heating_system().energy_use(hvac),
        }
    }
}

impl Model for EnergyBalance<'_> {
    type Input = TimestepInput;
    type Output = TimestepRecord;
    type Error = Infallible;

    fn call(&self, input: &Self::Input) -> Result<Self::Output, Self::Error> {
        Ok(self.advance(input))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::{
        energy::megajoule,
        heat_flux_density::watt_per_square_meter,
        thermodynamic_temperature::degree_celsius,
    };

    use crate::profile::{ProfileConfig, tests::reference_config};

    fn celsius(value: f64) -> ThermodynamicTemperature {
        ThermodynamicTemperature::new::<degree_celsius>(value)
    }

    fn input(indoor: f64, outdoor: f64, irradiance: f64) -> TimestepInput {
        TimestepInput {
            timestamp: jiff::civil::date(2023, 1, 15).at(6, 0, 0, 0),
            indoor_temperature: celsius(indoor),
            outdoor_temperature: celsius(outdoor),
            irradiance: HeatFluxDensity::new::<watt_per_square_meter>(irradiance),
        }
    }

    fn reference_profile() -> BuildingThermalProfile {
        BuildingThermalProfile::new(reference_config()).unwrap()
    }

    fn default_engine(profile: &BuildingThermalProfile) -> EnergyBalance<'_> {
        EnergyBalance::new(profile, Time::new::<second>(DEFAULT_TIMESTEP_SECONDS)).unwrap()
    }

    #[test]
    fn cold_morning_heats_at_full_power() {
        let profile = reference_profile();
        let engine = default_engine(&profile);

        let record = engine.advance(&input(22.2, 0.0, 0.0));

        assert_eq!(record.hvac_mode, HvacMode::Heating);
        assert_relative_eq!(record.hvac.get::<megajoule>(), 6.0, epsilon = 1e-12);
        assert!(record.conduction < Energy::ZERO);
        assert!(record.air_change < Energy::ZERO);
        assert_eq!(record.solar, Energy::ZERO);

        let hvac_only = 6.0e6 / profile.building_heat_capacity().get::<joule_per_kelvin>();
        let after = record.indoor_temperature_after.get::<degree_celsius>();
        assert!(after < 22.2 + hvac_only);

        // 6 MJ of gas heat at 80% efficiency.
        assert_relative_eq!(record.hvac_energy_use_kwh(), 6.0 / 3.6 / 0.8, epsilon = 1e-12);
    }

    #[test]
    fn flows_match_closed_form() {
        let profile = reference_profile();
        let engine = default_engine(&profile);

        let record = engine.advance(&input(22.2, 0.0, 300.0));

        let dt = 600.0;
        let diff = -22.2;
        let envelope_area = 4.0 * 185.8_f64.sqrt() * 2.74 + 185.8;
        let volume = 185.8 * 2.74;

        assert_relative_eq!(
            record.conduction.get::<joule>(),
            diff * envelope_area / (10.0 / 5.67) * dt,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            record.air_change.get::<joule>(),
            diff * (dt * volume * 1.0 / 3600.0) * 1200.0,
            max_relative = 1e-9
        );
        assert_relative_eq!(
            record.solar.get::<joule>(),
            9.29 * 0.5 * 300.0 * dt,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            record.net.get::<joule>(),
            (record.conduction + record.air_change + record.solar + record.hvac).get::<joule>()
        );
        assert_relative_eq!(
            record.delta_t.get::<delta_kelvin>(),
            record.net.get::<joule>() / (volume * 1.0e5),
            max_relative = 1e-9
        );
        assert_relative_eq!(
            record.indoor_temperature_after.get::<degree_celsius>(),
            22.2 + record.delta_t.get::<delta_kelvin>(),
            epsilon = 1e-9
        );
    }

    #[test]
    fn equilibrium_stays_put() {
        let config = ProfileConfig {
            heating_setpoint: celsius(20.0),
            cooling_setpoint: celsius(20.0),
            ..reference_config()
        };
        let profile = BuildingThermalProfile::new(config).unwrap();
        let engine = default_engine(&profile);

        let record = engine.advance(&input(20.0, 20.0, 0.0));

        assert_eq!(record.hvac_mode, HvacMode::Off);
        assert_relative_eq!(record.delta_t.get::<delta_kelvin>(), 0.0, epsilon = 1e-12);
        assert_relative_eq!(record.hvac_energy_use_kwh(), 0.0);
    }

    #[test]
    fn hot_afternoon_cools() {
        let config = ProfileConfig {
            heating_setpoint: celsius(20.0),
            cooling_setpoint: celsius(24.0),
            heating_system: crate::HeatingSystemModel::heat_pump(),
            ..reference_config()
        };
        let profile = BuildingThermalProfile::new(config).unwrap();
        let engine = default_engine(&profile);

        let record = engine.advance(&input(26.0, 33.0, 600.0));

        assert_eq!(record.hvac_mode, HvacMode::Cooling);
        assert!(record.hvac < Energy::ZERO);
        assert!(record.conduction > Energy::ZERO);
        assert!(record.solar > Energy::ZERO);
        assert!(record.hvac_energy_use > Energy::ZERO);
        assert_relative_eq!(record.hvac_energy_use_kwh(), 6.0 / 3.6 / 4.0, epsilon = 1e-12);
    }

    #[test]
    fn sign_and_range_properties() {
        let profile = reference_profile();
        let engine = EnergyBalance::new(&profile, Time::new::<second>(900.0)).unwrap();

        for indoor in [-10.0, 15.0, 22.2222, 30.0] {
            for outdoor in [-25.0, 0.0, 22.2222, 40.0] {
                for irradiance in [0.0, 150.0, 900.0] {
                    let record = engine.advance(&input(indoor, outdoor, irradiance));
                    let diff = record.temperature_difference.get::<delta_kelvin>();
                    let conduction = record.conduction.get::<joule>();

                    assert!(diff * conduction >= 0.0, "conduction follows the difference");
                    assert!(record.solar >= Energy::ZERO);
                    assert!(record.hvac_energy_use_kwh() >= 0.0);
                }
            }
        }
    }

    #[test]
    fn rejects_bad_timesteps() {
        let profile = reference_profile();

        assert_eq!(
            EnergyBalance::new(&profile, Time::new::<second>(0.0)).unwrap_err(),
            ConstraintError::Zero
        );
        assert_eq!(
            EnergyBalance::new(&profile, Time::new::<second>(-60.0)).unwrap_err(),
            ConstraintError::Negative
        );
        assert_eq!(
            EnergyBalance::new(&profile, Time::new::<second>(f64::NAN)).unwrap_err(),
            ConstraintError::NotANumber
        );
        assert_eq!(
            EnergyBalance::new(&profile, Time::new::<second>(f64::INFINITY)).unwrap_err(),
            ConstraintError::Infinite
        );
    }

    #[test]
    fn longer_steps_move_further() {
        let profile = reference_profile();
        let short = default_engine(&profile);
        let long = EnergyBalance::new(&profile, Time::new::<hour>(1.0)).unwrap();

        let a = short.advance(&input(22.2, 0.0, 0.0));
        let b = long.advance(&input(22.2, 0.0, 0.0));

        assert_relative_eq!(
            b.net.get::<joule>(),
            6.0 * a.net.get::<joule>(),
            max_relative = 1e-12
        );
    }

    #[test]
    fn usable_as_a_model() {
        let profile = reference_profile();
        let engine = default_engine(&profile);
        let input = input(18.0, 5.0, 0.0);

        assert_eq!(engine.call(&input).unwrap(), engine.advance(&input));
    }
}
