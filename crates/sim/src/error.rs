use hearth_core::constraint::ConstraintError;
use hearth_thermal::{ProfileError, RegistryError};
use thiserror::Error;

use crate::{aggregate::InvalidMonth, weather::{AlignmentError, UpstreamError}};

/// Errors that can stop a simulation run.
#[derive(Debug, Error)]
pub enum Error {
    /// The building, HVAC or run settings are physically invalid.
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    /// The weather series cannot be simulated as given.
    #[error("weather data error: {0}")]
    DataAlignment(#[from] AlignmentError),

    /// A geocoder or weather provider failed, or had no answer.
    #[error("upstream data unavailable: {0}")]
    UpstreamUnavailable(#[from] UpstreamError),
}

/// Invalid physical inputs or run settings.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigurationError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    HeatingSystem(#[from] RegistryError),

    #[error(transparent)]
    Month(#[from] InvalidMonth),

    #[error("invalid heating system `{id}`: {source}")]
    InvalidHeatingSystem {
        id: String,
        #[source]
        source: ConstraintError,
    },

    #[error("invalid timestep: {0}")]
    Timestep(#[source] ConstraintError),

    #[error("a single reading has no cadence to step by")]
    UndefinedCadence,

    #[error("initial indoor temperature must be finite, got {celsius} °C")]
    InitialIndoor { celsius: f64 },
}

impl From<ProfileError> for Error {
    fn from(error: ProfileError) -> Self {
        Error::Configuration(error.into())
    }
}

impl From<RegistryError> for Error {
    fn from(error: RegistryError) -> Self {
        Error::Configuration(error.into())
    }
}

impl From<InvalidMonth> for Error {
    fn from(error: InvalidMonth) -> Self {
        Error::Configuration(error.into())
    }
}
