//! Annual energy, cost and CO2 per heating system, and before/after deltas.
//!
//! Everything here is computed unrounded. Rounding is a presentation step
//! applied with [`AnnualSummary::rounded`] and [`AnnualDelta::rounded`].

use hearth_thermal::HeatingSystemModel;
use uom::si::{
    energy::kilowatt_hour,
    f64::{Energy, Mass},
    mass::ton,
};

/// A configuration's yearly HVAC energy use, cost and emissions.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualSummary {
    pub heating_system: String,
    pub energy: Energy,
    pub cost: f64,
    pub co2: Mass,
}

/// Prices and charges emissions for a year of HVAC energy use.
#[must_use]
pub fn annualize(yearly: Energy, system: &HeatingSystemModel) -> AnnualSummary {
    AnnualSummary {
        heating_system: system.id().to_owned(),
        energy: yearly,
        cost: system.cost(yearly),
        co2: system.co2(yearly),
    }
}

/// The change from one configuration to another, `after - before`.
///
/// Negative values mean the "after" configuration uses less energy, costs
/// less, or emits less.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnnualDelta {
    pub energy: Energy,
    /// Change in HVAC energy use in kWh, taken between the two summaries'
    /// kWh figures so it matches them exactly.
    pub kwh: f64,
    pub cost: f64,
    pub co2: Mass,
}

/// Computes `after - before`, field by field.
#[must_use]
pub fn compare(before: &AnnualSummary, after: &AnnualSummary) -> AnnualDelta {
    AnnualDelta {
        energy: after.energy - before.energy,
        kwh: after.kwh() - before.kwh(),
        cost: after.cost - before.cost,
        co2: after.co2 - before.co2,
    }
}

/// Two configurations and the change between them.
#[derive(Debug, Clone, PartialEq)]
pub struct AnnualComparison {
    pub before: AnnualSummary,
    pub after: AnnualSummary,
    pub difference: AnnualDelta,
}

impl AnnualComparison {
    #[must_use]
    pub fn new(before: AnnualSummary, after: AnnualSummary) -> Self {
        let difference = compare(&before, &after);
        Self {
            before,
            after,
            difference,
        }
    }
}

/// Figures rounded for display: kWh and cost to whole numbers, CO2 to
/// hundredths of a metric ton.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rounded {
    pub kwh: f64,
    pub cost: f64,
    pub co2_tons: f64,
}

impl Rounded {
    fn new(kwh: f64, cost: f64, co2: Mass) -> Self {
        Self {
            kwh: kwh.round(),
            cost: cost.round(),
            co2_tons: (co2.get::<ton>() * 100.0).round() / 100.0,
        }
    }
}

impl AnnualSummary {
    /// HVAC energy use in kWh.
    #[must_use]
    pub fn kwh(&self) -> f64 {
        self.energy.get::<kilowatt_hour>()
    }

    #[must_use]
    pub fn rounded(&self) -> Rounded {
        Rounded::new(self.kwh(), self.cost, self.co2)
    }
}

impl AnnualDelta {
    #[must_use]
    pub fn rounded(&self) -> Rounded {
        Rounded::new(self.kwh, self.cost, self.co2)
    }
}
