//! Shared fixtures for the cross-crate tests: a reference house and a
//! synthetic hourly year of weather.

use std::f64::consts::PI;

use hearth_sim::weather::{RawWeather, Reading};
use hearth_thermal::{BuildingThermalProfile, HeatingSystemModel, Location, ProfileConfig};
use jiff::{SignedDuration, civil::DateTime};
use uom::si::{
    area::square_meter,
    f64::{Area, Length, Power, ThermodynamicTemperature},
    length::meter,
    power::watt,
    thermodynamic_temperature::degree_celsius,
};

/// Hours in the non-leap year used by [`synthetic_year`].
pub const HOURS_IN_YEAR: usize = 8760;

pub fn location() -> Location {
    Location::new(40.75, -73.99).expect("valid coordinates")
}

/// The default 2000 ft² house from the configuration file, held between
/// 20 °C and 24 °C.
pub fn house(heating_system: HeatingSystemModel) -> BuildingThermalProfile {
    BuildingThermalProfile::new(ProfileConfig {
        location: location(),
        heating_setpoint: ThermodynamicTemperature::new::<degree_celsius>(20.0),
        cooling_setpoint: ThermodynamicTemperature::new::<degree_celsius>(24.0),
        hvac_capacity: Power::new::<watt>(10_000.0),
        floor_area: Area::new::<square_meter>(185.806_08),
        ceiling_height: Length::new::<meter>(2.7432),
        wall_r_value: 10.0,
        ach50: 16.0,
        window_area: Area::new::<square_meter>(9.290_304),
        window_shgc: 0.5,
        heating_system,
    })
    .expect("valid house")
}

/// The first hour of the synthetic year.
pub fn year_start() -> DateTime {
    jiff::civil::date(2023, 1, 1).at(0, 0, 0, 0)
}

/// Outdoor temperature (°C) for hour `hour` of the synthetic year.
///
/// A seasonal swing from about -3 °C in mid-January to 25 °C in mid-July,
/// plus a ±5 °C daily swing peaking mid-afternoon.
pub fn outdoor_temperature(hour: usize) -> f64 {
    let day = (hour / 24) as f64;
    let hour_of_day = (hour % 24) as f64;
    let seasonal = 11.0 - 14.0 * (2.0 * PI * (day - 15.0) / 365.0).cos();
    let daily = 5.0 * (2.0 * PI * (hour_of_day - 9.0) / 24.0).sin();
    seasonal + daily
}

/// Irradiance (W/m²) on a south window for hour `hour` of the synthetic year.
///
/// Zero at night; a half-sine from 06:00 to 18:00 that is stronger in winter,
/// when the sun is low enough to shine into south windows.
pub fn window_irradiance(hour: usize) -> f64 {
    let day = (hour / 24) as f64;
    let hour_of_day = (hour % 24) as f64;
    if !(6.0..18.0).contains(&hour_of_day) {
        return 0.0;
    }
    let peak = 450.0 + 150.0 * (2.0 * PI * (day - 15.0) / 365.0).cos();
    peak * (PI * (hour_of_day - 6.0) / 12.0).sin()
}

/// A full hourly year of synthetic weather.
pub fn synthetic_year() -> RawWeather {
    let readings = |value: fn(usize) -> f64| {
        (0..HOURS_IN_YEAR)
            .map(|hour| {
                let offset = SignedDuration::from_hours(hour as i64);
                Reading::new(year_start() + offset, value(hour))
            })
            .collect::<Vec<_>>()
    };

    RawWeather {
        temperature: readings(outdoor_temperature),
        irradiance: readings(window_irradiance),
    }
}

/// The synthetic year as a JSON weather file for the command-line front end.
pub fn synthetic_year_json(latitude: f64, longitude: f64) -> String {
    let weather = synthetic_year();
    serde_json::json!({
        "latitude": latitude,
        "longitude": longitude,
        "temperature": weather.temperature,
        "irradiance": weather.irradiance,
    })
    .to_string()
}
