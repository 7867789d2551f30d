//! Fixtures shared by this crate's unit tests.

use hearth_thermal::{BuildingThermalProfile, HeatingSystemModel, Location, ProfileConfig};
use jiff::{SignedDuration, civil::DateTime};
use uom::si::{
    area::square_meter,
    f64::{Area, Length, Power, ThermodynamicTemperature},
    length::meter,
    power::watt,
    thermodynamic_temperature::degree_celsius,
};

use crate::weather::{Reading, WeatherSeries};

pub(crate) fn celsius(value: f64) -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<degree_celsius>(value)
}

/// A 2000 ft² house with R-10 walls, held between 20 °C and 24 °C.
pub(crate) fn config(heating_system: HeatingSystemModel) -> ProfileConfig {
    ProfileConfig {
        location: Location::new(42.36, -71.06).unwrap(),
        heating_setpoint: celsius(20.0),
        cooling_setpoint: celsius(24.0),
        hvac_capacity: Power::new::<watt>(10_000.0),
        floor_area: Area::new::<square_meter>(185.8),
        ceiling_height: Length::new::<meter>(2.74),
        wall_r_value: 10.0,
        ach50: 16.0,
        window_area: Area::new::<square_meter>(9.29),
        window_shgc: 0.5,
        heating_system,
    }
}

pub(crate) fn profile() -> BuildingThermalProfile {
    BuildingThermalProfile::new(config(HeatingSystemModel::natural_gas())).unwrap()
}

/// Hourly readings starting at `start`, one per value.
pub(crate) fn hourly(start: DateTime, values: impl IntoIterator<Item = f64>) -> Vec<Reading> {
    values
        .into_iter()
        .zip(0_i64..)
        .map(|(value, hour)| Reading::new(start + SignedDuration::from_hours(hour), value))
        .collect()
}

/// A constant-temperature, sunless hourly series of `hours` samples.
pub(crate) fn steady_weather(start: DateTime, hours: usize, outdoor: f64) -> WeatherSeries {
    WeatherSeries::align(
        &hourly(start, std::iter::repeat_n(outdoor, hours)),
        &hourly(start, std::iter::repeat_n(0.0, hours)),
    )
    .unwrap()
}
