//! Runs a building thermal profile through a year of weather.
//!
//! The pieces, in the order data flows through them:
//!
//! - [`weather`]: validated, aligned outdoor temperature and irradiance
//!   series, and the provider traits that supply them
//! - [`simulate`]: steps the energy balance through the series
//! - [`aggregate`]: monthly and yearly HVAC energy totals
//! - [`economics`]: energy to cost and CO2, and before/after deltas
//! - [`scenario`]: two configurations over the same weather, side by side

pub mod aggregate;
pub mod economics;
mod error;
pub mod scenario;
pub mod simulate;
pub mod weather;

#[cfg(test)]
mod test_support;

pub use aggregate::{
    MonthFilter, MonthlyEnergyBalance, MonthlyEnergyFlows, monthly_flows, monthly_totals,
    yearly_total,
};
pub use economics::{AnnualComparison, AnnualDelta, AnnualSummary, annualize, compare};
pub use error::{ConfigurationError, Error};
pub use scenario::{ScenarioComparison, ScenarioOutcome, compare_scenarios, run_scenario};
pub use simulate::{InitialIndoor, SimulationOptions, TimestepPolicy, simulate, simulate_year};
pub use weather::{Geocoder, WeatherProvider, WeatherSeries};
