use hearth_thermal::TimestepRecord;
use uom::si::f64::ThermodynamicTemperature;

/// Indicates how a run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Every weather sample was simulated.
    Complete,

    /// Stopped early due to an observer action.
    StoppedByObserver,
}

/// The result of a simulation run.
#[derive(Debug, Clone)]
pub struct Solution {
    /// How the run ended.
    pub status: Status,

    /// One record per simulated sample, in chronological order.
    pub records: Vec<TimestepRecord>,
}

impl Solution {
    /// Number of timesteps simulated.
    #[must_use]
    pub fn steps(&self) -> usize {
        self.records.len()
    }

    /// Indoor temperature at the end of the last simulated step.
    #[must_use]
    pub fn final_indoor_temperature(&self) -> Option<ThermodynamicTemperature> {
        self.records.last().map(|record| record.indoor_temperature_after)
    }
}
