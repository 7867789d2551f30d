//! Monthly and yearly totals of a simulated series.

use std::collections::BTreeMap;

use hearth_thermal::{HvacMode, TimestepRecord};
use thiserror::Error;
use tracing::debug;
use uom::{ConstZero, si::f64::Energy};

/// A month number outside `1..=12`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("month {0} is outside 1..=12")]
pub struct InvalidMonth(pub i8);

/// Which calendar months count toward the totals.
///
/// # Examples
///
/// ```
/// use hearth_sim::MonthFilter;
///
/// let season = MonthFilter::heating_season();
/// assert!(season.includes(1));
/// assert!(!season.includes(7));
///
/// assert_eq!(MonthFilter::excluding([6, 7, 8, 9]).unwrap(), season);
/// assert!(MonthFilter::only([13]).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthFilter {
    /// Bit `m` is set when month `m` is included.
    mask: u16,
}

const ALL_MONTHS: u16 = 0b1_1111_1111_1110;
const SUMMER: u16 = (1 << 6) | (1 << 7) | (1 << 8) | (1 << 9);

impl MonthFilter {
    /// Includes every month.
    #[must_use]
    pub fn all() -> Self {
        Self { mask: ALL_MONTHS }
    }

    /// Excludes June through September, when a heating system sits idle.
    #[must_use]
    pub fn heating_season() -> Self {
        Self {
            mask: ALL_MONTHS & !SUMMER,
        }
    }

    /// Includes every month except `months`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMonth`] for a month outside `1..=12`.
    pub fn excluding(months: impl IntoIterator<Item = i8>) -> Result<Self, InvalidMonth> {
        Ok(Self {
            mask: ALL_MONTHS & !mask_of(months)?,
        })
    }

    /// Includes only `months`.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidMonth`] for a month outside `1..=12`.
    pub fn only(months: impl IntoIterator<Item = i8>) -> Result<Self, InvalidMonth> {
        Ok(Self {
            mask: mask_of(months)?,
        })
    }

    /// Whether `month` counts toward the totals.
    #[must_use]
    pub fn includes(&self, month: i8) -> bool {
        (1..=12).contains(&month) && self.mask & (1 << month) != 0
    }

    /// The included months, in calendar order.
    pub fn months(&self) -> impl Iterator<Item = i8> + '_ {
        (1..=12).filter(|&month| self.includes(month))
    }
}

impl Default for MonthFilter {
    fn default() -> Self {
        Self::all()
    }
}

fn mask_of(months: impl IntoIterator<Item = i8>) -> Result<u16, InvalidMonth> {
    months.into_iter().try_fold(0_u16, |mask, month| {
        if (1..=12).contains(&month) {
            Ok(mask | (1 << month))
        } else {
            Err(InvalidMonth(month))
        }
    })
}

/// HVAC energy use summed by calendar month.
///
/// Holds only months that were both included by the filter and present in
/// the records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyEnergyBalance {
    months: BTreeMap<i8, Energy>,
}

impl MonthlyEnergyBalance {
    /// Energy used in `month`, if it was aggregated.
    #[must_use]
    pub fn get(&self, month: i8) -> Option<Energy> {
        self.months.get(&month).copied()
    }

    /// Energy used in `month` in kWh, if it was aggregated.
    #[must_use]
    pub fn get_kwh(&self, month: i8) -> Option<f64> {
        self.get(month)
            .map(|energy| energy.get::<uom::si::energy::kilowatt_hour>())
    }

    /// Months and their totals, in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (i8, Energy)> + '_ {
        self.months.iter().map(|(&month, &energy)| (month, energy))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.months.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Sum over all months held.
    #[must_use]
    pub fn total(&self) -> Energy {
        self.months.values().fold(Energy::ZERO, |sum, &energy| sum + energy)
    }
}

/// Groups records by calendar month and sums their HVAC energy use.
///
/// Records in months the filter excludes are skipped entirely.
#[must_use]
pub fn monthly_totals(records: &[TimestepRecord], months: MonthFilter) -> MonthlyEnergyBalance {
    let mut totals = BTreeMap::new();

    for record in records {
        let month = record.timestamp.month();
        if months.includes(month) {
            *totals.entry(month).or_insert(Energy::ZERO) += record.hvac_energy_use;
        }
    }

    debug!(months = totals.len(), "aggregated monthly HVAC energy");
    MonthlyEnergyBalance { months: totals }
}

/// Yearly HVAC energy use: the sum of every month in `monthly`.
#[must_use]
pub fn yearly_total(monthly: &MonthlyEnergyBalance) -> Energy {
    monthly.total()
}

/// Where a month's heat came from and went to.
///
/// Flow components are signed gains to the building, as in
/// [`TimestepRecord`]. HVAC energy use is split by mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyFlows {
    pub conduction: Energy,
    pub air_change: Energy,
    pub solar: Energy,
    pub hvac: Energy,
    pub heating_use: Energy,
    pub cooling_use: Energy,
}

impl Default for EnergyFlows {
    fn default() -> Self {
        Self {
            conduction: Energy::ZERO,
            air_change: Energy::ZERO,
            solar: Energy::ZERO,
            hvac: Energy::ZERO,
            heating_use: Energy::ZERO,
            cooling_use: Energy::ZERO,
        }
    }
}

impl EnergyFlows {
    fn add(&mut self, record: &TimestepRecord) {
        self.conduction += record.conduction;
        self.air_change += record.air_change;
        self.solar += record.solar;
        self.hvac += record.hvac;
        match record.hvac_mode {
            HvacMode::Heating => self.heating_use += record.hvac_energy_use,
            HvacMode::Cooling => self.cooling_use += record.hvac_energy_use,
            HvacMode::Off => {}
        }
    }

    /// Net gain over the month: the sum of the four flow components.
    #[must_use]
    pub fn net(&self) -> Energy {
        self.conduction + self.air_change + self.solar + self.hvac
    }
}

/// Energy flow components summed by calendar month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyEnergyFlows {
    months: BTreeMap<i8, EnergyFlows>,
}

impl MonthlyEnergyFlows {
    #[must_use]
    pub fn get(&self, month: i8) -> Option<&EnergyFlows> {
        self.months.get(&month)
    }

    /// Months and their flows, in calendar order.
    pub fn iter(&self) -> impl Iterator<Item = (i8, &EnergyFlows)> + '_ {
        self.months.iter().map(|(&month, flows)| (month, flows))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.months.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }
}

/// Groups records by calendar month and sums each energy flow.
#[must_use]
pub fn monthly_flows(records: &[TimestepRecord], months: MonthFilter) -> MonthlyEnergyFlows {
    let mut flows: BTreeMap<i8, EnergyFlows> = BTreeMap::new();

    for record in records {
        let month = record.timestamp.month();
        if months.includes(month) {
            flows.entry(month).or_default().add(record);
        }
    }

    MonthlyEnergyFlows { months: flows }
}
