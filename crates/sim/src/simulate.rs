//! Steps the energy balance through a weather series.
//!
//! A run is a fold over the weather samples in chronological order, with the
//! indoor temperature as the accumulator: each step starts from the indoor
//! temperature the previous step ended at.
//!
//! # Example
//!
//! ```
//! use hearth_sim::{
//!     WeatherSeries,
//!     simulate::{Action, Event, InitialIndoor, SimulationOptions, Status, simulate},
//!     weather::Reading,
//! };
//! use hearth_thermal::{BuildingThermalProfile, HeatingSystemModel, Location, ProfileConfig};
//! use jiff::{SignedDuration, civil::date};
//! use uom::si::{
//!     area::square_meter,
//!     f64::{Area, Length, Power, ThermodynamicTemperature},
//!     length::meter,
//!     power::watt,
//!     thermodynamic_temperature::degree_celsius,
//! };
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! fn celsius(value: f64) -> ThermodynamicTemperature {
//!     ThermodynamicTemperature::new::<degree_celsius>(value)
//! }
//!
//! // A house whose heat stays off: both setpoints far below the weather.
//! let profile = BuildingThermalProfile::new(ProfileConfig {
//!     location: Location::new(40.75, -73.99)?,
//!     heating_setpoint: celsius(-40.0),
//!     cooling_setpoint: celsius(40.0),
//!     hvac_capacity: Power::new::<watt>(10_000.0),
//!     floor_area: Area::new::<square_meter>(185.8),
//!     ceiling_height: Length::new::<meter>(2.74),
//!     wall_r_value: 10.0,
//!     ach50: 16.0,
//!     window_area: Area::new::<square_meter>(9.29),
//!     window_shgc: 0.5,
//!     heating_system: HeatingSystemModel::natural_gas(),
//! })?;
//!
//! let start = date(2023, 1, 1).at(0, 0, 0, 0);
//! let hours = |value: f64| -> Vec<Reading> {
//!     (0..48)
//!         .map(|h| Reading::new(start + SignedDuration::from_hours(h), value))
//!         .collect()
//! };
//! let weather = WeatherSeries::align(&hours(-10.0), &hours(0.0))?;
//! let options =
//!     SimulationOptions::default().with_initial_indoor(InitialIndoor::Temperature(celsius(20.0)));
//!
//! // Stop as soon as the house drops below 19 °C.
//! let solution = simulate(&profile, &weather, &options, |event: &Event| {
//!     (event.snapshot.output.indoor_temperature_after < celsius(19.0))
//!         .then_some(Action::StopEarly)
//! })?;
//!
//! assert_eq!(solution.status, Status::StoppedByObserver);
//! assert!(solution.steps() < weather.len());
//! # Ok(())
//! # }
//! ```

mod action;
mod event;
mod solution;

use std::ops::ControlFlow;

pub use action::Action;
pub use event::Event;
pub use solution::{Solution, Status};

use hearth_core::{Observer, Snapshot};
use hearth_thermal::{
    BuildingThermalProfile, EnergyBalance, TimestepInput, TimestepRecord,
    energy_balance::DEFAULT_TIMESTEP_SECONDS,
};
use tracing::{debug, info, warn};
use uom::si::{
    f64::{ThermodynamicTemperature, Time},
    thermodynamic_temperature::degree_celsius,
    time::second,
};

use crate::{
    ConfigurationError, Error,
    weather::{Reading, WeatherSeries},
};

/// How long each simulated timestep is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimestepPolicy {
    /// A fixed timestep, regardless of the weather cadence.
    ///
    /// Each weather sample is simulated for exactly one timestep.
    Fixed(Time),

    /// The spacing of the weather series.
    SeriesCadence,
}

impl Default for TimestepPolicy {
    /// Ten minutes.
    fn default() -> Self {
        TimestepPolicy::Fixed(Time::new::<second>(DEFAULT_TIMESTEP_SECONDS))
    }
}

impl TimestepPolicy {
    /// Resolves the policy against a weather series.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UndefinedCadence`] for
    /// [`TimestepPolicy::SeriesCadence`] on a single-sample series.
    pub fn resolve(self, weather: &WeatherSeries) -> Result<Time, ConfigurationError> {
        match self {
            TimestepPolicy::Fixed(dt) => Ok(dt),
            TimestepPolicy::SeriesCadence => weather
                .cadence_time()
                .ok_or(ConfigurationError::UndefinedCadence),
        }
    }
}

/// Indoor temperature at the start of the first timestep.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum InitialIndoor {
    /// Start at the heating setpoint.
    #[default]
    HeatingSetpoint,

    /// Start at a given temperature.
    Temperature(ThermodynamicTemperature),
}

impl InitialIndoor {
    /// Resolves the starting indoor temperature for `profile`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::InitialIndoor`] for a NaN or infinite
    /// temperature.
    pub fn resolve(
        self,
        profile: &BuildingThermalProfile,
    ) -> Result<ThermodynamicTemperature, ConfigurationError> {
        match self {
            InitialIndoor::HeatingSetpoint => Ok(profile.heating_setpoint()),
            InitialIndoor::Temperature(temperature) if temperature.value.is_finite() => {
                Ok(temperature)
            }
            InitialIndoor::Temperature(temperature) => Err(ConfigurationError::InitialIndoor {
                celsius: temperature.get::<degree_celsius>(),
            }),
        }
    }
}

/// Settings for a simulation run.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SimulationOptions {
    pub timestep: TimestepPolicy,
    pub initial_indoor: InitialIndoor,
}

impl SimulationOptions {
    /// Returns `self` with the given timestep policy, keeping other fields unchanged.
    #[must_use]
    pub fn with_timestep(self, timestep: TimestepPolicy) -> Self {
        Self { timestep, ..self }
    }

    /// Returns `self` with the given initial condition, keeping other fields unchanged.
    #[must_use]
    pub fn with_initial_indoor(self, initial_indoor: InitialIndoor) -> Self {
        Self {
            initial_indoor,
            ..self
        }
    }
}

/// Simulates `profile` through `weather`, reporting each step to `observer`.
///
/// The observer receives an [`Event`] after every timestep and may return
/// [`Action::StopEarly`] to end the run. The returned [`Solution`] holds the
/// records simulated so far either way.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if the timestep cannot be resolved or is
/// not strictly positive.
pub fn simulate<Obs>(
    profile: &BuildingThermalProfile,
    weather: &WeatherSeries,
    options: &SimulationOptions,
    mut observer: Obs,
) -> Result<Solution, Error>
where
    Obs: Observer<Event, Action>,
{
    let dt = options.timestep.resolve(weather)?;
    let engine = EnergyBalance::new(profile, dt).map_err(ConfigurationError::Timestep)?;

    let time_constant = profile.thermal_time_constant();
    if dt > time_constant {
        warn!(
            timestep_s = dt.get::<second>(),
            time_constant_s = time_constant.get::<second>(),
            "timestep exceeds the building's thermal time constant; results may oscillate"
        );
    }

    info!(
        samples = weather.len(),
        timestep_s = dt.get::<second>(),
        heating_system = profile.heating_system().id(),
        start = %weather.first_timestamp(),
        "starting simulation"
    );

    let mut records: Vec<TimestepRecord> = Vec::with_capacity(weather.len());
    let initial = options.initial_indoor.resolve(profile)?;

    let flow = weather
        .samples()
        .iter()
        .enumerate()
        .try_fold(initial, |indoor, (step, sample)| {
            if records
                .last()
                .is_some_and(|last| last.timestamp.month() != sample.timestamp.month())
            {
                debug!(
                    step,
                    year = sample.timestamp.year(),
                    month = sample.timestamp.month(),
                    "entering month"
                );
            }

            let input = TimestepInput {
                timestamp: sample.timestamp,
                indoor_temperature: indoor,
                outdoor_temperature: sample.outdoor_temperature,
                irradiance: sample.irradiance,
            };
            let record = engine.advance(&input);
            records.push(record);

            let event = Event {
                step,
                snapshot: Snapshot::new(input, record),
            };
            match observer.observe(&event) {
                Some(Action::StopEarly) => ControlFlow::Break(()),
                None => ControlFlow::Continue(record.indoor_temperature_after),
            }
        });

    let status = if flow.is_break() {
        Status::StoppedByObserver
    } else {
        Status::Complete
    };

    info!(steps = records.len(), ?status, "simulation finished");
    Ok(Solution { status, records })
}

/// Simulates `profile` through `weather` without observation.
///
/// # Errors
///
/// See [`simulate`].
pub fn simulate_unobserved(
    profile: &BuildingThermalProfile,
    weather: &WeatherSeries,
    options: &SimulationOptions,
) -> Result<Vec<TimestepRecord>, Error> {
    simulate(profile, weather, options, ()).map(|solution| solution.records)
}

/// Aligns two raw series covering one calendar year and simulates `profile`
/// through them.
///
/// # Errors
///
/// Returns [`Error::DataAlignment`] if the series do not line up or miss any
/// timestamp of the year, or [`Error::Configuration`] for an unusable
/// timestep.
pub fn simulate_year(
    profile: &BuildingThermalProfile,
    temperature: &[Reading],
    irradiance: &[Reading],
    options: &SimulationOptions,
) -> Result<Vec<TimestepRecord>, Error> {
    let weather = WeatherSeries::align(temperature, irradiance)?;
    weather.ensure_calendar_year()?;
    simulate_unobserved(profile, &weather, options)
}
