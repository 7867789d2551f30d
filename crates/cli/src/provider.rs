//! Concrete weather and geocoding sources backed by local files.

use std::{
    collections::BTreeMap,
    convert::Infallible,
    fs,
    path::{Path, PathBuf},
};

use hearth_sim::weather::{Geocoder, RawWeather, WeatherProvider};
use hearth_thermal::{Location, ProfileError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::config::GeocodeConfig;

/// How far, in degrees, a weather file's coordinates may be from the
/// requested location.
pub const LOCATION_TOLERANCE_DEGREES: f64 = 0.5;

/// The on-disk weather file format.
///
/// Temperatures are in °C and irradiance in W/m², with civil timestamps:
///
/// ```json
/// {
///   "latitude": 40.75,
///   "longitude": -73.99,
///   "temperature": [{ "timestamp": "2019-01-01T00:00:00", "value": -1.5 }],
///   "irradiance": [{ "timestamp": "2019-01-01T00:00:00", "value": 0.0 }]
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherFile {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(flatten)]
    pub weather: RawWeather,
}

/// Error type for the weather file provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to read weather file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse weather file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("weather file {path} has invalid coordinates")]
    Coordinates {
        path: PathBuf,
        #[source]
        source: ProfileError,
    },

    #[error("weather file is for {found}, too far from {requested}")]
    LocationMismatch { requested: Location, found: Location },
}

/// Reads weather from a JSON file.
#[derive(Debug, Clone)]
pub struct JsonWeatherFile {
    path: PathBuf,
}

impl JsonWeatherFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WeatherProvider for JsonWeatherFile {
    type Error = ProviderError;

    fn fetch(&self, location: Location) -> Result<RawWeather, Self::Error> {
        let content = fs::read_to_string(&self.path).map_err(|source| ProviderError::Read {
            path: self.path.clone(),
            source,
        })?;
        let file: WeatherFile =
            serde_json::from_str(&content).map_err(|source| ProviderError::Parse {
                path: self.path.clone(),
                source,
            })?;

        let found = Location::new(file.latitude, file.longitude).map_err(|source| {
            ProviderError::Coordinates {
                path: self.path.clone(),
                source,
            }
        })?;
        if location.max_offset(&found) > LOCATION_TOLERANCE_DEGREES {
            return Err(ProviderError::LocationMismatch {
                requested: location,
                found,
            });
        }

        info!(
            path = %self.path.display(),
            readings = file.weather.temperature.len(),
            "loaded weather file"
        );
        Ok(file.weather)
    }
}

/// Looks postal codes up in a fixed table.
#[derive(Debug, Clone, Default)]
pub struct StaticGeocoder {
    table: BTreeMap<String, Location>,
}

impl StaticGeocoder {
    /// Builds a geocoder from the configuration's postal-code table.
    ///
    /// # Errors
    ///
    /// Fails if any entry has out-of-range coordinates.
    pub fn from_config(config: &GeocodeConfig) -> Result<Self, ProfileError> {
        let table = config
            .postal_codes
            .iter()
            .map(|(code, coordinates)| Ok((code.clone(), coordinates.to_location()?)))
            .collect::<Result<_, ProfileError>>()?;
        Ok(Self { table })
    }

    /// Returns `self` with one more entry.
    #[must_use]
    pub fn with_entry(mut self, postal_code: impl Into<String>, location: Location) -> Self {
        self.table.insert(postal_code.into(), location);
        self
    }
}

impl Geocoder for StaticGeocoder {
    type Error = Infallible;

    fn locate(&self, postal_code: &str) -> Result<Option<Location>, Self::Error> {
        let found = self.table.get(postal_code.trim()).copied();
        debug!(postal_code, found = found.is_some(), "geocoded postal code");
        Ok(found)
    }
}
