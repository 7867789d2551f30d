//! What the `hearth` binary prints.

use std::{collections::BTreeMap, fmt};

use hearth_sim::{
    MonthFilter, ScenarioComparison, ScenarioOutcome, WeatherSeries, economics::Rounded,
};
use hearth_thermal::{BuildingThermalProfile, Location};
use jiff::civil::DateTime;
use serde::Serialize;
use uom::si::energy::{kilowatt_hour, megajoule};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// The result of a before/after run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub location: Coordinates,
    pub weather: WeatherSpan,
    /// Months that count toward the totals.
    pub months: Vec<i8>,
    pub before: ScenarioReport,
    pub after: ScenarioReport,
    /// After minus before, rounded for display.
    pub difference: Figures,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct WeatherSpan {
    pub start: DateTime,
    pub end: DateTime,
    pub samples: usize,
}

/// Rounded annual figures.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Figures {
    pub kwh: f64,
    pub cost: f64,
    pub co2_tons: f64,
}

impl From<Rounded> for Figures {
    fn from(rounded: Rounded) -> Self {
        Self {
            kwh: rounded.kwh,
            cost: rounded.cost,
            co2_tons: rounded.co2_tons,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScenarioReport {
    pub heating_system: String,
    pub label: String,
    pub annual: Figures,
    pub monthly_kwh: BTreeMap<i8, f64>,
    pub monthly_flows: BTreeMap<i8, FlowReport>,
}

/// One month's energy flows. Gains in MJ, HVAC use in kWh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FlowReport {
    pub conduction_mj: f64,
    pub air_change_mj: f64,
    pub solar_mj: f64,
    pub hvac_mj: f64,
    pub heating_kwh: f64,
    pub cooling_kwh: f64,
}

impl ScenarioReport {
    fn new(profile: &BuildingThermalProfile, outcome: &ScenarioOutcome) -> Self {
        Self {
            heating_system: profile.heating_system().id().to_owned(),
            label: profile.heating_system().label().to_owned(),
            annual: outcome.summary.rounded().into(),
            monthly_kwh: outcome
                .monthly
                .iter()
                .map(|(month, energy)| (month, energy.get::<kilowatt_hour>()))
                .collect(),
            monthly_flows: outcome
                .flows
                .iter()
                .map(|(month, flows)| {
                    let report = FlowReport {
                        conduction_mj: flows.conduction.get::<megajoule>(),
                        air_change_mj: flows.air_change.get::<megajoule>(),
                        solar_mj: flows.solar.get::<megajoule>(),
                        hvac_mj: flows.hvac.get::<megajoule>(),
                        heating_kwh: flows.heating_use.get::<kilowatt_hour>(),
                        cooling_kwh: flows.cooling_use.get::<kilowatt_hour>(),
                    };
                    (month, report)
                })
                .collect(),
        }
    }
}

impl Report {
    #[must_use]
    pub fn new(
        location: Location,
        weather: &WeatherSeries,
        months: MonthFilter,
        profiles: (&BuildingThermalProfile, &BuildingThermalProfile),
        result: &ScenarioComparison,
    ) -> Self {
        Self {
            location: Coordinates {
                latitude: location.latitude(),
                longitude: location.longitude(),
            },
            weather: WeatherSpan {
                start: weather.first_timestamp(),
                end: weather.last_timestamp(),
                samples: weather.len(),
            },
            months: months.months().collect(),
            before: ScenarioReport::new(profiles.0, &result.before),
            after: ScenarioReport::new(profiles.1, &result.after),
            difference: result.comparison.difference.rounded().into(),
        }
    }
}

fn month_name(month: i8) -> &'static str {
    usize::try_from(month - 1)
        .ok()
        .and_then(|index| MONTH_NAMES.get(index))
        .copied()
        .unwrap_or("???")
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Location: {:.4}, {:.4}",
            self.location.latitude, self.location.longitude
        )?;
        writeln!(
            f,
            "Weather:  {} to {} ({} samples)",
            self.weather.start, self.weather.end, self.weather.samples
        )?;
        writeln!(f)?;

        writeln!(
            f,
            "{:<16}{:>20}{:>20}{:>14}",
            "", self.before.label, self.after.label, "Difference"
        )?;
        let rows: [(&str, fn(&Figures) -> f64, usize); 3] = [
            ("Energy (kWh)", |x| x.kwh, 0),
            ("Cost", |x| x.cost, 0),
            ("CO2 (t)", |x| x.co2_tons, 2),
        ];
        for (name, value, precision) in rows {
            writeln!(
                f,
                "{name:<16}{:>20.precision$}{:>20.precision$}{:>+14.precision$}",
                value(&self.before.annual),
                value(&self.after.annual),
                value(&self.difference),
            )?;
        }
        writeln!(f)?;

        writeln!(f, "Monthly HVAC energy (kWh)")?;
        for month in &self.months {
            let before = self.before.monthly_kwh.get(month);
            let after = self.after.monthly_kwh.get(month);
            if let (Some(before), Some(after)) = (before, after) {
                writeln!(f, "{:<16}{before:>20.0}{after:>20.0}", month_name(*month))?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_names() {
        assert_eq!(month_name(1), "Jan");
        assert_eq!(month_name(12), "Dec");
        assert_eq!(month_name(0), "???");
    }
}
