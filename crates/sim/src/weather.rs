//! Weather input: validated series and the traits that supply them.

use std::{error::Error as StdError, fmt};

use hearth_thermal::Location;
use jiff::{SignedDuration, civil::DateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};
use uom::si::{
    f64::{HeatFluxDensity, ThermodynamicTemperature, Time},
    heat_flux_density::watt_per_square_meter,
    thermodynamic_temperature::degree_celsius,
    time::second,
};

/// One timestamped value of a raw series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub timestamp: DateTime,
    pub value: f64,
}

impl Reading {
    #[must_use]
    pub fn new(timestamp: DateTime, value: f64) -> Self {
        Self { timestamp, value }
    }
}

/// Unvalidated weather as a provider returns it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawWeather {
    /// Outdoor dry-bulb temperature, in °C.
    pub temperature: Vec<Reading>,
    /// Solar irradiance on the south-facing windows, in W/m².
    pub irradiance: Vec<Reading>,
}

/// The conditions outside the building at one timestamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeatherSample {
    pub timestamp: DateTime,
    pub outdoor_temperature: ThermodynamicTemperature,
    pub irradiance: HeatFluxDensity,
}

/// Which raw series a problem was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesKind {
    Temperature,
    Irradiance,
}

impl fmt::Display for SeriesKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SeriesKind::Temperature => "temperature",
            SeriesKind::Irradiance => "irradiance",
        })
    }
}

/// Why two raw series cannot be combined into a [`WeatherSeries`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AlignmentError {
    #[error("{0} series is empty")]
    EmptySeries(SeriesKind),

    #[error("temperature series has {temperature} readings but irradiance series has {irradiance}")]
    LengthMismatch { temperature: usize, irradiance: usize },

    #[error("series disagree at index {index}: temperature at {temperature}, irradiance at {irradiance}")]
    TimestampMismatch {
        index: usize,
        temperature: DateTime,
        irradiance: DateTime,
    },

    #[error("timestamp {timestamp} at index {index} does not follow {previous}")]
    NotChronological {
        index: usize,
        previous: DateTime,
        timestamp: DateTime,
    },

    #[error("gap at index {index}: {previous} is followed by {timestamp}, expected a step of {cadence:?}")]
    Gap {
        index: usize,
        previous: DateTime,
        timestamp: DateTime,
        cadence: SignedDuration,
    },

    #[error("invalid {series} reading {value} at {timestamp}")]
    InvalidSample {
        series: SeriesKind,
        timestamp: DateTime,
        value: f64,
    },

    #[error("{samples} readings from {first} to {last} do not cover the calendar year {year}")]
    IncompleteYear {
        year: i16,
        first: DateTime,
        last: DateTime,
        samples: usize,
    },
}

/// A validated, chronologically ordered weather series.
///
/// Guarantees:
///
/// - at least one sample
/// - strictly increasing timestamps with a uniform cadence
/// - finite temperatures and finite, non-negative irradiance
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSeries {
    samples: Vec<WeatherSample>,
    cadence: Option<SignedDuration>,
}

impl WeatherSeries {
    /// Aligns a temperature series (°C) with an irradiance series (W/m²).
    ///
    /// Nothing is interpolated or skipped: the two series must already share
    /// every timestamp, and a missing hour anywhere rejects the whole series.
    ///
    /// # Errors
    ///
    /// Returns the first [`AlignmentError`] found, checking emptiness, then
    /// lengths, then each index in order.
    pub fn align(temperature: &[Reading], irradiance: &[Reading]) -> Result<Self, AlignmentError> {
        if temperature.is_empty() {
            return Err(AlignmentError::EmptySeries(SeriesKind::Temperature));
        }
        if irradiance.is_empty() {
            return Err(AlignmentError::EmptySeries(SeriesKind::Irradiance));
        }
        if temperature.len() != irradiance.len() {
            return Err(AlignmentError::LengthMismatch {
                temperature: temperature.len(),
                irradiance: irradiance.len(),
            });
        }

        let mut samples = Vec::with_capacity(temperature.len());
        let mut cadence: Option<SignedDuration> = None;

        for (index, (t, g)) in temperature.iter().zip(irradiance).enumerate() {
            if t.timestamp != g.timestamp {
                return Err(AlignmentError::TimestampMismatch {
                    index,
                    temperature: t.timestamp,
                    irradiance: g.timestamp,
                });
            }
            if !t.value.is_finite() {
                return Err(AlignmentError::InvalidSample {
                    series: SeriesKind::Temperature,
                    timestamp: t.timestamp,
                    value: t.value,
                });
            }
            if !(g.value.is_finite() && g.value >= 0.0) {
                return Err(AlignmentError::InvalidSample {
                    series: SeriesKind::Irradiance,
                    timestamp: g.timestamp,
                    value: g.value,
                });
            }

            if let Some(previous) = samples.last().map(|s: &WeatherSample| s.timestamp) {
                let step = t.timestamp.duration_since(previous);
                if step <= SignedDuration::ZERO {
                    return Err(AlignmentError::NotChronological {
                        index,
                        previous,
                        timestamp: t.timestamp,
                    });
                }
                match cadence {
                    None => cadence = Some(step),
                    Some(expected) if expected != step => {
                        return Err(AlignmentError::Gap {
                            index,
                            previous,
                            timestamp: t.timestamp,
                            cadence: expected,
                        });
                    }
                    Some(_) => {}
                }
            }

            samples.push(WeatherSample {
                timestamp: t.timestamp,
                outdoor_temperature: ThermodynamicTemperature::new::<degree_celsius>(t.value),
                irradiance: HeatFluxDensity::new::<watt_per_square_meter>(g.value),
            });
        }

        debug!(samples = samples.len(), ?cadence, "aligned weather series");
        Ok(Self { samples, cadence })
    }

    #[must_use]
    pub fn samples(&self) -> &[WeatherSample] {
        &self.samples
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Spacing between samples, or `None` for a single sample.
    #[must_use]
    pub fn cadence(&self) -> Option<SignedDuration> {
        self.cadence
    }

    /// Spacing between samples as a `uom` time.
    #[must_use]
    pub fn cadence_time(&self) -> Option<Time> {
        self.cadence
            .map(|cadence| Time::new::<second>(cadence.as_secs_f64()))
    }

    #[must_use]
    pub fn first_timestamp(&self) -> DateTime {
        self.samples[0].timestamp
    }

    #[must_use]
    pub fn last_timestamp(&self) -> DateTime {
        self.samples[self.samples.len() - 1].timestamp
    }

    /// Checks that the series spans exactly one calendar year.
    ///
    /// The first sample must fall on January 1 at midnight and the last one
    /// cadence before the next January 1. Together with the uniform cadence
    /// checked by [`WeatherSeries::align`], this means no timestamp in the
    /// year is missing, including the first and last.
    ///
    /// # Errors
    ///
    /// Returns [`AlignmentError::IncompleteYear`] otherwise.
    pub fn ensure_calendar_year(&self) -> Result<(), AlignmentError> {
        let first = self.first_timestamp();
        let last = self.last_timestamp();
        let year = first.year();
        let incomplete = || AlignmentError::IncompleteYear {
            year,
            first,
            last,
            samples: self.len(),
        };

        let cadence = self.cadence.ok_or_else(incomplete)?;
        let start = DateTime::new(year, 1, 1, 0, 0, 0, 0).map_err(|_| incomplete())?;
        let end = DateTime::new(year + 1, 1, 1, 0, 0, 0, 0).map_err(|_| incomplete())?;

        let expected = end.duration_since(start).as_nanos() / cadence.as_nanos();
        let complete = first == start
            && last.checked_add(cadence).is_ok_and(|next| next == end)
            && i128::try_from(self.len()).is_ok_and(|samples| samples == expected);

        if complete {
            Ok(())
        } else {
            warn!(year, %first, %last, samples = self.len(), "weather does not cover a full year");
            Err(incomplete())
        }
    }
}

impl TryFrom<&RawWeather> for WeatherSeries {
    type Error = AlignmentError;

    fn try_from(raw: &RawWeather) -> Result<Self, Self::Error> {
        WeatherSeries::align(&raw.temperature, &raw.irradiance)
    }
}

/// Supplies a year of weather for a location.
///
/// Implementations own any network access, caching, timeouts and retries.
pub trait WeatherProvider {
    type Error: StdError + Send + Sync + 'static;

    /// Fetches raw hourly weather for `location`.
    ///
    /// # Errors
    ///
    /// Returns the provider's own error if the data cannot be obtained.
    fn fetch(&self, location: Location) -> Result<RawWeather, Self::Error>;
}

/// Turns a postal code into coordinates.
pub trait Geocoder {
    type Error: StdError + Send + Sync + 'static;

    /// Looks up `postal_code`, returning `Ok(None)` if it is unknown.
    ///
    /// # Errors
    ///
    /// Returns the geocoder's own error if the lookup itself fails.
    fn locate(&self, postal_code: &str) -> Result<Option<Location>, Self::Error>;
}

/// A failure outside the simulator that prevents a run.
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("postal code `{0}` was not found")]
    PostalCodeNotFound(String),

    #[error("geocoding `{postal_code}` failed")]
    Geocoder {
        postal_code: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("fetching weather for {location} failed")]
    WeatherProvider {
        location: Location,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },
}

/// Resolves a postal code with `geocoder`.
///
/// # Errors
///
/// Returns [`UpstreamError::PostalCodeNotFound`] if the geocoder has no answer,
/// or [`UpstreamError::Geocoder`] if it fails.
pub fn resolve_location<G: Geocoder>(
    geocoder: &G,
    postal_code: &str,
) -> Result<Location, UpstreamError> {
    match geocoder.locate(postal_code) {
        Ok(Some(location)) => Ok(location),
        Ok(None) => {
            warn!(postal_code, "postal code not found");
            Err(UpstreamError::PostalCodeNotFound(postal_code.to_owned()))
        }
        Err(source) => Err(UpstreamError::Geocoder {
            postal_code: postal_code.to_owned(),
            source: Box::new(source),
        }),
    }
}

/// Fetches weather for `location` and validates it.
///
/// # Errors
///
/// Returns [`crate::Error::UpstreamUnavailable`] if the provider fails, or
/// [`crate::Error::DataAlignment`] if its series do not line up.
pub fn fetch_weather<P: WeatherProvider>(
    provider: &P,
    location: Location,
) -> Result<WeatherSeries, crate::Error> {
    let raw = provider
        .fetch(location)
        .map_err(|source| UpstreamError::WeatherProvider {
            location,
            source: Box::new(source),
        })?;

    WeatherSeries::try_from(&raw).map_err(|error| {
        warn!(%location, %error, "rejected weather series");
        error.into()
    })
}
