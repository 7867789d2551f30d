//! Two building configurations over the same weather, side by side.

use std::{panic, thread};

use hearth_thermal::{BuildingThermalProfile, TimestepRecord};
use tracing::info;

use crate::{
    Error,
    aggregate::{
        MonthFilter, MonthlyEnergyBalance, MonthlyEnergyFlows, monthly_flows, monthly_totals,
        yearly_total,
    },
    economics::{AnnualComparison, AnnualSummary, annualize},
    simulate::{SimulationOptions, simulate_unobserved},
    weather::WeatherSeries,
};

/// The aggregated result of simulating one configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioOutcome {
    pub monthly: MonthlyEnergyBalance,
    pub flows: MonthlyEnergyFlows,
    pub summary: AnnualSummary,
}

/// Before and after outcomes plus the annual comparison between them.
#[derive(Debug, Clone, PartialEq)]
pub struct ScenarioComparison {
    pub before: ScenarioOutcome,
    pub after: ScenarioOutcome,
    pub comparison: AnnualComparison,
}

/// Simulates one configuration and aggregates it.
///
/// # Errors
///
/// Returns an [`Error`] if the simulation cannot run.
pub fn run_scenario(
    profile: &BuildingThermalProfile,
    weather: &WeatherSeries,
    options: &SimulationOptions,
    months: MonthFilter,
) -> Result<ScenarioOutcome, Error> {
    let records = simulate_unobserved(profile, weather, options)?;
    Ok(outcome(profile, &records, months))
}

fn outcome(
    profile: &BuildingThermalProfile,
    records: &[TimestepRecord],
    months: MonthFilter,
) -> ScenarioOutcome {
    let monthly = monthly_totals(records, months);
    let summary = annualize(yearly_total(&monthly), profile.heating_system());

    ScenarioOutcome {
        flows: monthly_flows(records, months),
        monthly,
        summary,
    }
}

/// Simulates `before` and `after` over the same weather and compares them.
///
/// The two runs share nothing mutable and execute on separate threads.
///
/// # Errors
///
/// Returns the first [`Error`] from either run, checking `before` first.
pub fn compare_scenarios(
    before: &BuildingThermalProfile,
    after: &BuildingThermalProfile,
    weather: &WeatherSeries,
    options: &SimulationOptions,
    months: MonthFilter,
) -> Result<ScenarioComparison, Error> {
    let (before, after) = thread::scope(|scope| {
        let handle = scope.spawn(|| run_scenario(before, weather, options, months));
        let after = run_scenario(after, weather, options, months);
        let before = handle
            .join()
            .unwrap_or_else(|payload| panic::resume_unwind(payload));
        (before, after)
    });
    let (before, after) = (before?, after?);

    let comparison = AnnualComparison::new(before.summary.clone(), after.summary.clone());
    info!(
        before = %comparison.before.heating_system,
        after = %comparison.after.heating_system,
        delta_kwh = comparison.difference.kwh,
        delta_cost = comparison.difference.cost,
        "compared scenarios"
    );

    Ok(ScenarioComparison {
        before,
        after,
        comparison,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use hearth_thermal::HeatingSystemModel;
    use jiff::civil::date;

    use crate::test_support::{profile, steady_weather};

    #[test]
    fn heat_pump_beats_gas_on_the_same_house() {
        let gas = profile();
        let heat_pump = gas.with_heating_system(HeatingSystemModel::heat_pump());
        let weather = steady_weather(date(2023, 1, 1).at(0, 0, 0, 0), 24 * 60, -2.0);

        let result = compare_scenarios(
            &gas,
            &heat_pump,
            &weather,
            &SimulationOptions::default(),
            MonthFilter::all(),
        )
        .unwrap();

        // Same building, same delivered heat: consumption scales with efficiency.
        assert_relative_eq!(
            result.after.summary.kwh() * 4.0,
            result.before.summary.kwh() * 0.8,
            max_relative = 1e-9
        );
        assert!(result.comparison.difference.energy.value < 0.0);
        assert_eq!(
            result.comparison.difference.energy,
            result.after.summary.energy - result.before.summary.energy
        );
        assert_eq!(result.before.monthly.len(), 2);
        assert_eq!(result.after.flows.len(), 2);
    }

    #[test]
    fn air_sealing_reduces_use() {
        let leaky = profile();
        let sealed = leaky.with_ach50(3.0).unwrap();
        let weather = steady_weather(date(2023, 12, 1).at(0, 0, 0, 0), 24 * 14, -8.0);

        let result = compare_scenarios(
            &leaky,
            &sealed,
            &weather,
            &SimulationOptions::default(),
            MonthFilter::heating_season(),
        )
        .unwrap();

        assert!(result.after.summary.energy < result.before.summary.energy);
        assert!(result.comparison.difference.cost < 0.0);
    }

    #[test]
    fn matches_sequential_runs() {
        let before = profile();
        let after = before.with_heating_system(HeatingSystemModel::electric_radiator());
        let weather = steady_weather(date(2023, 3, 1).at(0, 0, 0, 0), 48, 3.0);
        let options = SimulationOptions::default();

        let parallel =
            compare_scenarios(&before, &after, &weather, &options, MonthFilter::all()).unwrap();
        let sequential = run_scenario(&after, &weather, &options, MonthFilter::all()).unwrap();

        assert_eq!(parallel.after, sequential);
    }
}
