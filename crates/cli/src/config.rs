//! The TOML configuration file.
//!
//! Building inputs are imperial, the way homeowners know their house: square
//! feet, feet, °F and kW. They are converted to SI when profiles are built.
//!
//! ```toml
//! [location]
//! postal_code = "10001"
//!
//! [geocode.postal_codes]
//! "10001" = { latitude = 40.75, longitude = -73.99 }
//!
//! [weather]
//! path = "weather/nyc-2019.json"
//!
//! [building]
//! heating_setpoint_f = 68
//! cooling_setpoint_f = 76
//!
//! [simulation]
//! excluded_months = [6, 7, 8, 9]
//!
//! [before]
//! heating_system = "natural_gas"
//!
//! [after]
//! heating_system = "heat_pump"
//! ach50 = 5
//! ```

use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
};

use hearth_sim::{
    ConfigurationError, MonthFilter,
    aggregate::InvalidMonth,
    simulate::{InitialIndoor, SimulationOptions, TimestepPolicy},
};
use hearth_thermal::{
    HeatingSystemModel, HeatingSystemRegistry, Location, ProfileConfig, Tariff,
    units::imperial::{fahrenheit_to_celsius, feet_to_meters, square_feet_to_square_meters},
};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;
use uom::si::{
    area::square_meter,
    f64::{Area, Length, Mass, Power, ThermodynamicTemperature, Time},
    length::meter,
    mass::ton,
    power::kilowatt,
    thermodynamic_temperature::degree_celsius,
    time::minute,
};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

/// A complete run: where, which weather, which house, and the two
/// configurations to compare.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    pub location: LocationConfig,
    #[serde(default)]
    pub geocode: GeocodeConfig,
    pub weather: WeatherConfig,
    #[serde(default)]
    pub building: BuildingConfig,
    #[serde(default)]
    pub simulation: SimulationConfig,
    /// Heating systems beyond the built-in ones.
    #[serde(default)]
    pub heating_systems: Vec<HeatingSystemConfig>,
    pub before: ScenarioConfig,
    pub after: ScenarioConfig,
}

/// Where the house is: a postal code to geocode, or coordinates.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum LocationConfig {
    PostalCode { postal_code: String },
    Coordinates(CoordinatesConfig),
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct CoordinatesConfig {
    pub latitude: f64,
    pub longitude: f64,
}

impl CoordinatesConfig {
    /// Validates the coordinates.
    ///
    /// # Errors
    ///
    /// Fails if either coordinate is out of range.
    pub fn to_location(self) -> Result<Location, hearth_thermal::ProfileError> {
        Location::new(self.latitude, self.longitude)
    }
}

/// A local postal-code table.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct GeocodeConfig {
    #[serde(default)]
    pub postal_codes: BTreeMap<String, CoordinatesConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherConfig {
    /// JSON weather file; relative paths are resolved against the config file.
    pub path: PathBuf,
}

/// Building inputs, with defaults for a typical 2000 ft² house.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildingConfig {
    pub floor_area_sqft: f64,
    pub ceiling_height_ft: f64,
    /// Imperial R-value (ft²·°F·h/Btu).
    pub wall_r_value: f64,
    pub ach50: f64,
    pub hvac_capacity_kw: f64,
    pub window_area_sqft: f64,
    pub window_shgc: f64,
    pub heating_setpoint_f: f64,
    pub cooling_setpoint_f: f64,
}

impl Default for BuildingConfig {
    fn default() -> Self {
        Self {
            floor_area_sqft: 2000.0,
            ceiling_height_ft: 9.0,
            wall_r_value: 10.0,
            ach50: 16.0,
            hvac_capacity_kw: 10.0,
            window_area_sqft: 100.0,
            window_shgc: 0.5,
            heating_setpoint_f: 68.0,
            cooling_setpoint_f: 76.0,
        }
    }
}

/// Per-scenario replacements for [`BuildingConfig`] fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingOverrides {
    pub floor_area_sqft: Option<f64>,
    pub ceiling_height_ft: Option<f64>,
    pub wall_r_value: Option<f64>,
    pub ach50: Option<f64>,
    pub hvac_capacity_kw: Option<f64>,
    pub window_area_sqft: Option<f64>,
    pub window_shgc: Option<f64>,
    pub heating_setpoint_f: Option<f64>,
    pub cooling_setpoint_f: Option<f64>,
}

impl BuildingConfig {
    /// Returns `self` with every field set in `overrides` replaced.
    #[must_use]
    pub fn with_overrides(&self, overrides: &BuildingOverrides) -> Self {
        Self {
            floor_area_sqft: overrides.floor_area_sqft.unwrap_or(self.floor_area_sqft),
            ceiling_height_ft: overrides.ceiling_height_ft.unwrap_or(self.ceiling_height_ft),
            wall_r_value: overrides.wall_r_value.unwrap_or(self.wall_r_value),
            ach50: overrides.ach50.unwrap_or(self.ach50),
            hvac_capacity_kw: overrides.hvac_capacity_kw.unwrap_or(self.hvac_capacity_kw),
            window_area_sqft: overrides.window_area_sqft.unwrap_or(self.window_area_sqft),
            window_shgc: overrides.window_shgc.unwrap_or(self.window_shgc),
            heating_setpoint_f: overrides.heating_setpoint_f.unwrap_or(self.heating_setpoint_f),
            cooling_setpoint_f: overrides.cooling_setpoint_f.unwrap_or(self.cooling_setpoint_f),
        }
    }

    /// Converts to SI profile inputs.
    #[must_use]
    pub fn profile_config(
        &self,
        location: Location,
        heating_system: HeatingSystemModel,
    ) -> ProfileConfig {
        ProfileConfig {
            location,
            heating_setpoint: fahrenheit(self.heating_setpoint_f),
            cooling_setpoint: fahrenheit(self.cooling_setpoint_f),
            hvac_capacity: Power::new::<kilowatt>(self.hvac_capacity_kw),
            floor_area: Area::new::<square_meter>(square_feet_to_square_meters(
                self.floor_area_sqft,
            )),
            ceiling_height: Length::new::<meter>(feet_to_meters(self.ceiling_height_ft)),
            wall_r_value: self.wall_r_value,
            ach50: self.ach50,
            window_area: Area::new::<square_meter>(square_feet_to_square_meters(
                self.window_area_sqft,
            )),
            window_shgc: self.window_shgc,
            heating_system,
        }
    }
}

fn fahrenheit(value: f64) -> ThermodynamicTemperature {
    ThermodynamicTemperature::new::<degree_celsius>(fahrenheit_to_celsius(value))
}

/// Run settings.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    pub timestep_minutes: f64,
    /// Step by the weather series' own spacing instead of `timestep_minutes`.
    pub timestep_from_series: bool,
    /// Starting indoor temperature; the heating setpoint if absent.
    pub initial_indoor_f: Option<f64>,
    pub excluded_months: Vec<i8>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            timestep_minutes: 10.0,
            timestep_from_series: false,
            initial_indoor_f: None,
            excluded_months: Vec::new(),
        }
    }
}

impl SimulationConfig {
    #[must_use]
    pub fn options(&self) -> SimulationOptions {
        let timestep = if self.timestep_from_series {
            TimestepPolicy::SeriesCadence
        } else {
            TimestepPolicy::Fixed(Time::new::<minute>(self.timestep_minutes))
        };
        let initial_indoor = self
            .initial_indoor_f
            .map_or(InitialIndoor::HeatingSetpoint, |f| {
                InitialIndoor::Temperature(fahrenheit(f))
            });

        SimulationOptions {
            timestep,
            initial_indoor,
        }
    }

    /// The months that count toward the totals.
    ///
    /// # Errors
    ///
    /// Fails if an excluded month is outside `1..=12`.
    pub fn months(&self) -> Result<MonthFilter, InvalidMonth> {
        MonthFilter::excluding(self.excluded_months.iter().copied())
    }
}

/// A custom heating system with a linear tariff.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeatingSystemConfig {
    pub id: String,
    pub label: String,
    pub efficiency: f64,
    /// Billing unit, such as "gallon".
    pub unit: String,
    pub kwh_per_unit: f64,
    pub price_per_unit: f64,
    pub co2_tons_per_unit: f64,
}

impl HeatingSystemConfig {
    /// Builds the heating system model.
    ///
    /// # Errors
    ///
    /// Fails if the efficiency, conversion factor, price or emission factor
    /// is out of range.
    pub fn to_model(&self) -> Result<HeatingSystemModel, ConfigurationError> {
        let invalid = |source| ConfigurationError::InvalidHeatingSystem {
            id: self.id.clone(),
            source,
        };
        let tariff = Tariff::new(
            self.unit.clone(),
            self.kwh_per_unit,
            self.price_per_unit,
            Mass::new::<ton>(self.co2_tons_per_unit),
        )
        .map_err(invalid)?;

        HeatingSystemModel::new(self.id.clone(), self.label.clone(), self.efficiency, tariff)
            .map_err(invalid)
    }
}

/// One side of the comparison.
///
/// Building overrides sit next to `heating_system` in the same table.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(from = "ScenarioTable")]
pub struct ScenarioConfig {
    pub heating_system: String,
    pub overrides: BuildingOverrides,
}

/// `[before]`/`[after]` as written. Listed field by field so a misspelled
/// override is a parse error.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioTable {
    heating_system: String,
    floor_area_sqft: Option<f64>,
    ceiling_height_ft: Option<f64>,
    wall_r_value: Option<f64>,
    ach50: Option<f64>,
    hvac_capacity_kw: Option<f64>,
    window_area_sqft: Option<f64>,
    window_shgc: Option<f64>,
    heating_setpoint_f: Option<f64>,
    cooling_setpoint_f: Option<f64>,
}

impl From<ScenarioTable> for ScenarioConfig {
    fn from(table: ScenarioTable) -> Self {
        Self {
            heating_system: table.heating_system,
            overrides: BuildingOverrides {
                floor_area_sqft: table.floor_area_sqft,
                ceiling_height_ft: table.ceiling_height_ft,
                wall_r_value: table.wall_r_value,
                ach50: table.ach50,
                hvac_capacity_kw: table.hvac_capacity_kw,
                window_area_sqft: table.window_area_sqft,
                window_shgc: table.window_shgc,
                heating_setpoint_f: table.heating_setpoint_f,
                cooling_setpoint_f: table.cooling_setpoint_f,
            },
        }
    }
}

impl Config {
    /// Reads and parses a configuration file.
    ///
    /// A relative weather path is resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be read or is not a valid configuration.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if config.weather.path.is_relative() {
            if let Some(dir) = path.parent() {
                config.weather.path = dir.join(&config.weather.path);
            }
        }

        debug!(path = %path.display(), weather = %config.weather.path.display(), "loaded configuration");
        Ok(config)
    }

    /// The built-in heating systems plus any configured ones.
    ///
    /// # Errors
    ///
    /// Fails if a configured system is invalid or reuses an identifier.
    pub fn registry(&self) -> Result<HeatingSystemRegistry, ConfigurationError> {
        self.heating_systems.iter().try_fold(
            HeatingSystemRegistry::with_reference_systems(),
            |registry, system| Ok(registry.register(system.to_model()?)?),
        )
    }

    /// Profile inputs for one scenario.
    ///
    /// # Errors
    ///
    /// Fails if the scenario names an unknown heating system.
    pub fn scenario_config(
        &self,
        scenario: &ScenarioConfig,
        location: Location,
        registry: &HeatingSystemRegistry,
    ) -> Result<ProfileConfig, ConfigurationError> {
        let system = registry.get(&scenario.heating_system)?.clone();
        Ok(self
            .building
            .with_overrides(&scenario.overrides)
            .profile_config(location, system))
    }
}
