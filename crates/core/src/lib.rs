//! Core traits and types for the Hearth building energy model.
//!
//! This crate defines the small set of abstractions the thermal engine and
//! the simulators build on:
//!
//! - [`Model`]: a deterministic callable that maps a typed input to a typed output
//! - [`Snapshot`]: a captured input/output pair from a model call
//! - [`Observer`]: receives simulator events and optionally returns control actions
//! - [`constraint`]: numeric invariants (strictly positive, non-negative,
//!   unit interval) checked once at construction

pub mod constraint;

mod model;
mod observer;

pub use model::{Model, Snapshot};
pub use observer::Observer;
