use hearth_core::Snapshot;
use hearth_thermal::{TimestepInput, TimestepRecord};

/// Event emitted by the simulator after each timestep.
#[derive(Debug, Clone, Copy)]
pub struct Event {
    /// Zero-based index of the weather sample just simulated.
    pub step: usize,

    /// The engine input and the resulting record.
    pub snapshot: Snapshot<TimestepInput, TimestepRecord>,
}
