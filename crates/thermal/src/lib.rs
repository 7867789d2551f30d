//! Single-zone lumped-capacitance thermal model of a house.
//!
//! The whole building is treated as one thermal node: a heat capacity that
//! exchanges energy with the outdoors through its envelope and through air
//! leakage, gains heat from sun through south-facing windows, and is heated
//! or cooled by an HVAC system running at full capacity.
//!
//! - [`BuildingThermalProfile`]: validated building and HVAC inputs plus the
//!   physical quantities derived from them
//! - [`Thermostat`] and [`HvacMode`]: dead-band mode selection
//! - [`HeatingSystemModel`] and [`HeatingSystemRegistry`]: efficiency and
//!   tariff models for the equipment that turns HVAC energy into bills
//! - [`EnergyBalance`]: the per-timestep energy balance

pub mod energy_balance;
pub mod heating_system;
pub mod hvac;
pub mod profile;
pub mod units;

pub use energy_balance::{EnergyBalance, TimestepInput, TimestepRecord};
pub use heating_system::{HeatingSystemModel, HeatingSystemRegistry, RegistryError, Tariff};
pub use hvac::{HvacMode, Thermostat};
pub use profile::{BuildingThermalProfile, Location, ProfileConfig, ProfileError};
