/// Control actions an observer can return to the simulator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Stop the run and return the records so far.
    StopEarly,
}
