//! Command-line front end for Hearth.
//!
//! Reads a TOML configuration, loads weather from a JSON file, runs the
//! before/after comparison and renders a [`Report`].

pub mod config;
pub mod provider;
pub mod report;

use hearth_sim::{
    Error, compare_scenarios,
    weather::{fetch_weather, resolve_location},
};
use hearth_thermal::{BuildingThermalProfile, Location};
use tracing::info;

use crate::{
    config::{Config, LocationConfig},
    provider::{JsonWeatherFile, StaticGeocoder},
    report::Report,
};

/// Resolves the configured location, geocoding a postal code if needed.
///
/// # Errors
///
/// Fails if the coordinates are invalid or the postal code is unknown.
pub fn locate(config: &Config) -> Result<Location, Error> {
    match &config.location {
        LocationConfig::Coordinates(coordinates) => Ok(coordinates.to_location()?),
        LocationConfig::PostalCode { postal_code } => {
            let geocoder = StaticGeocoder::from_config(&config.geocode)?;
            Ok(resolve_location(&geocoder, postal_code)?)
        }
    }
}

/// Runs the before/after comparison described by `config`.
///
/// # Errors
///
/// Returns an [`Error`] if the configuration is physically invalid, the
/// location or weather cannot be obtained, or the weather does not line up.
pub fn run(config: &Config) -> Result<Report, Error> {
    let location = locate(config)?;
    info!(%location, "resolved location");

    let weather = fetch_weather(&JsonWeatherFile::new(&config.weather.path), location)?;

    let registry = config.registry()?;
    let before = BuildingThermalProfile::new(config.scenario_config(
        &config.before,
        location,
        &registry,
    )?)?;
    let after = BuildingThermalProfile::new(config.scenario_config(
        &config.after,
        location,
        &registry,
    )?)?;

    let options = config.simulation.options();
    let months = config.simulation.months()?;
    let result = compare_scenarios(&before, &after, &weather, &options, months)?;

    Ok(Report::new(
        location,
        &weather,
        months,
        (&before, &after),
        &result,
    ))
}
