//! Heating equipment: how much purchased energy it takes to deliver heat, and
//! what that energy costs in money and CO2.

use std::collections::BTreeMap;

use hearth_core::constraint::{ConstraintError, NonNegative, StrictlyPositive};
use thiserror::Error;
use uom::si::{
    energy::kilowatt_hour,
    f64::{Energy, Mass},
    mass::ton,
};

/// Kilowatt-hours per therm of natural gas.
pub const KWH_PER_THERM: f64 = 29.3;

/// Price of natural gas, per therm.
pub const NATURAL_GAS_PRICE_PER_THERM: f64 = 1.0092;

/// CO2 emitted burning one therm of natural gas, in metric tons.
pub const NATURAL_GAS_CO2_TONS_PER_THERM: f64 = 0.0053;

/// Price of grid electricity, per kWh.
pub const ELECTRICITY_PRICE_PER_KWH: f64 = 0.1921;

/// CO2 emitted generating one kWh of grid electricity, in metric tons.
pub const ELECTRICITY_CO2_TONS_PER_KWH: f64 = 0.000_305;

/// A linear tariff for one fuel.
///
/// Energy is converted into the fuel's billing unit, then priced and charged
/// for emissions at a fixed rate per unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Tariff {
    unit: String,
    kwh_per_unit: f64,
    price_per_unit: f64,
    co2_per_unit: Mass,
}

impl Tariff {
    /// Creates a tariff.
    ///
    /// # Errors
    ///
    /// Fails if `kwh_per_unit` is not strictly positive, or if the price or
    /// emission factor is negative.
    pub fn new(
        unit: impl Into<String>,
        kwh_per_unit: f64,
        price_per_unit: f64,
        co2_per_unit: Mass,
    ) -> Result<Self, ConstraintError> {
        Ok(Self {
            unit: unit.into(),
            kwh_per_unit: StrictlyPositive::new(kwh_per_unit)?.into_inner(),
            price_per_unit: NonNegative::new(price_per_unit)?.into_inner(),
            co2_per_unit: NonNegative::new(co2_per_unit)?.into_inner(),
        })
    }

    /// Natural gas billed by the therm.
    #[must_use]
    pub fn natural_gas() -> Self {
        Self {
            unit: "therm".into(),
            kwh_per_unit: KWH_PER_THERM,
            price_per_unit: NATURAL_GAS_PRICE_PER_THERM,
            co2_per_unit: Mass::new::<ton>(NATURAL_GAS_CO2_TONS_PER_THERM),
        }
    }

    /// Grid electricity billed by the kWh.
    #[must_use]
    pub fn electricity() -> Self {
        Self {
            unit: "kWh".into(),
            kwh_per_unit: 1.0,
            price_per_unit: ELECTRICITY_PRICE_PER_KWH,
            co2_per_unit: Mass::new::<ton>(ELECTRICITY_CO2_TONS_PER_KWH),
        }
    }

    /// Name of the billing unit.
    #[must_use]
    pub fn unit(&self) -> &str {
        &self.unit
    }

    #[must_use]
    pub fn kwh_per_unit(&self) -> f64 {
        self.kwh_per_unit
    }

    #[must_use]
    pub fn price_per_unit(&self) -> f64 {
        self.price_per_unit
    }

    #[must_use]
    pub fn co2_per_unit(&self) -> Mass {
        self.co2_per_unit
    }

    /// Number of billing units needed to supply `energy`.
    #[must_use]
    pub fn units(&self, energy: Energy) -> f64 {
        energy.get::<kilowatt_hour>() / self.kwh_per_unit
    }

    /// Cost of purchasing `energy`.
    #[must_use]
    pub fn cost(&self, energy: Energy) -> f64 {
        self.units(energy) * self.price_per_unit
    }

    /// CO2 emitted supplying `energy`.
    #[must_use]
    pub fn co2(&self, energy: Energy) -> Mass {
        self.co2_per_unit * self.units(energy)
    }
}

/// A type of heating (and cooling) equipment.
///
/// The efficiency divides the heat the building needs into the energy the
/// equipment consumes: 0.8 for a furnace that loses a fifth of its fuel up the
/// flue, 4.0 for a heat pump moving four units of heat per unit of work.
#[derive(Debug, Clone, PartialEq)]
pub struct HeatingSystemModel {
    id: String,
    label: String,
    efficiency: f64,
    tariff: Tariff,
}

impl HeatingSystemModel {
    /// Creates a heating system model.
    ///
    /// # Errors
    ///
    /// Fails if `efficiency` is not strictly positive.
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        efficiency: f64,
        tariff: Tariff,
    ) -> Result<Self, ConstraintError> {
        Ok(Self {
            id: id.into(),
            label: label.into(),
            efficiency: StrictlyPositive::new(efficiency)?.into_inner(),
            tariff,
        })
    }

    /// A gas furnace.
    #[must_use]
    pub fn natural_gas() -> Self {
        Self {
            id: "natural_gas".into(),
            label: "Natural Gas".into(),
            efficiency: 0.8,
            tariff: Tariff::natural_gas(),
        }
    }

    /// An air-source heat pump.
    #[must_use]
    pub fn heat_pump() -> Self {
        Self {
            id: "heat_pump".into(),
            label: "Heat Pump".into(),
            efficiency: 4.0,
            tariff: Tariff::electricity(),
        }
    }

    /// Electric resistance heating.
    #[must_use]
    pub fn electric_radiator() -> Self {
        Self {
            id: "electric_radiator".into(),
            label: "Electric Radiator".into(),
            efficiency: 1.0,
            tariff: Tariff::electricity(),
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }

    #[must_use]
    pub fn efficiency(&self) -> f64 {
        self.efficiency
    }

    #[must_use]
    pub fn tariff(&self) -> &Tariff {
        &self.tariff
    }

    /// Energy the equipment consumes to deliver `delivered` to the building.
    ///
    /// Delivered energy is signed (cooling is negative); consumption is not.
    #[must_use]
    pub fn energy_use(&self, delivered: Energy) -> Energy {
        delivered.abs() / self.efficiency
    }

    /// Cost of `consumed` energy.
    #[must_use]
    pub fn cost(&self, consumed: Energy) -> f64 {
        self.tariff.cost(consumed)
    }

    /// CO2 emitted for `consumed` energy.
    #[must_use]
    pub fn co2(&self, consumed: Energy) -> Mass {
        self.tariff.co2(consumed)
    }
}

/// An error looking up or registering a heating system.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("heating system `{0}` is already registered")]
    Duplicate(String),
    #[error("unknown heating system `{id}` (known: {known})")]
    Unknown { id: String, known: String },
}

/// An immutable set of heating systems, keyed by identifier.
///
/// Built up front and then only read. Registration consumes the registry and
/// returns the extended one, so a registry never changes while it is shared.
///
/// # Examples
///
/// ```
/// use hearth_thermal::{HeatingSystemModel, HeatingSystemRegistry, Tariff};
/// use uom::si::{f64::Mass, mass::kilogram};
///
/// let oil = HeatingSystemModel::new(
///     "heating_oil",
///     "Heating Oil",
///     0.85,
///     Tariff::new("gallon", 40.6, 3.5, Mass::new::<kilogram>(10.2)).unwrap(),
/// )
/// .unwrap();
///
/// let registry = HeatingSystemRegistry::with_reference_systems()
///     .register(oil)
///     .unwrap();
///
/// assert_eq!(registry.get("heat_pump").unwrap().efficiency(), 4.0);
/// assert_eq!(registry.get("heating_oil").unwrap().label(), "Heating Oil");
/// assert!(registry.get("coal").is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeatingSystemRegistry {
    systems: BTreeMap<String, HeatingSystemModel>,
}

impl HeatingSystemRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the natural gas, heat pump and electric
    /// radiator reference systems.
    #[must_use]
    pub fn with_reference_systems() -> Self {
        let systems = [
            HeatingSystemModel::natural_gas(),
            HeatingSystemModel::heat_pump(),
            HeatingSystemModel::electric_radiator(),
        ]
        .into_iter()
        .map(|system| (system.id.clone(), system))
        .collect();

        Self { systems }
    }

    /// Returns this registry extended with `system`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Duplicate`] if a system with the same
    /// identifier is already registered.
    pub fn register(mut self, system: HeatingSystemModel) -> Result<Self, RegistryError> {
        if self.systems.contains_key(system.id()) {
            return Err(RegistryError::Duplicate(system.id));
        }
        self.systems.insert(system.id.clone(), system);
        Ok(self)
    }

    /// Looks up a system by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Unknown`] if no such system is registered.
    pub fn get(&self, id: &str) -> Result<&HeatingSystemModel, RegistryError> {
        self.systems.get(id).ok_or_else(|| RegistryError::Unknown {
            id: id.to_owned(),
            known: self.systems.keys().cloned().collect::<Vec<_>>().join(", "),
        })
    }

    /// Iterates over the registered systems in identifier order.
    pub fn iter(&self) -> impl Iterator<Item = &HeatingSystemModel> {
        self.systems.values()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.systems.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.systems.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use approx::assert_relative_eq;
    use uom::si::energy::megajoule;

    fn kwh(value: f64) -> Energy {
        Energy::new::<kilowatt_hour>(value)
    }

    #[test]
    fn natural_gas_economics() {
        let gas = HeatingSystemModel::natural_gas();
        let consumed = kwh(10_000.0);

        assert_relative_eq!(gas.cost(consumed), 10_000.0 / 29.3 * 1.0092, epsilon = 1e-9);
        assert_relative_eq!(
            gas.co2(consumed).get::<ton>(),
            10_000.0 / 29.3 * 0.0053,
            epsilon = 1e-12
        );
    }

    #[test]
    fn heat_pump_economics() {
        let heat_pump = HeatingSystemModel::heat_pump();
        let consumed = kwh(2_500.0);

        assert_relative_eq!(heat_pump.cost(consumed), 2_500.0 * 0.1921, epsilon = 1e-9);
        assert_relative_eq!(
            heat_pump.co2(consumed).get::<ton>(),
            2_500.0 * 0.000_305,
            epsilon = 1e-12
        );
    }

    #[test]
    fn radiator_uses_electricity_at_unit_efficiency() {
        let radiator = HeatingSystemModel::electric_radiator();
        assert_relative_eq!(radiator.efficiency(), 1.0);
        assert_eq!(radiator.tariff(), &Tariff::electricity());
    }

    #[test]
    fn energy_use_is_unsigned() {
        let gas = HeatingSystemModel::natural_gas();
        let heating = Energy::new::<megajoule>(6.0);
        let cooling = -heating;

        assert_relative_eq!(gas.energy_use(heating).get::<megajoule>(), 7.5);
        assert_relative_eq!(gas.energy_use(cooling).get::<megajoule>(), 7.5);
    }

    #[test]
    fn custom_system_validation() {
        let tariff = Tariff::electricity();
        assert_eq!(
            HeatingSystemModel::new("broken", "Broken", 0.0, tariff.clone()).unwrap_err(),
            ConstraintError::Zero
        );
        assert!(HeatingSystemModel::new("ok", "Ok", 0.95, tariff).is_ok());

        assert!(Tariff::new("unit", 0.0, 1.0, Mass::new::<ton>(0.0)).is_err());
        assert!(Tariff::new("unit", 1.0, -1.0, Mass::new::<ton>(0.0)).is_err());
        assert!(Tariff::new("unit", 1.0, 1.0, Mass::new::<ton>(-0.1)).is_err());
    }

    #[test]
    fn registry_lookup() {
        let registry = HeatingSystemRegistry::with_reference_systems();
        assert_eq!(registry.len(), 3);

        let ids: Vec<_> = registry.iter().map(HeatingSystemModel::id).collect();
        assert_eq!(ids, ["electric_radiator", "heat_pump", "natural_gas"]);

        let err = registry.get("wood_stove").unwrap_err();
        assert_eq!(
            err,
            RegistryError::Unknown {
                id: "wood_stove".into(),
                known: "electric_radiator, heat_pump, natural_gas".into(),
            }
        );
    }

    #[test]
    fn registry_rejects_duplicates() {
        let registry = HeatingSystemRegistry::with_reference_systems();
        let err = registry
            .register(HeatingSystemModel::heat_pump())
            .unwrap_err();
        assert_eq!(err, RegistryError::Duplicate("heat_pump".into()));
    }

    #[test]
    fn registries_are_independent() {
        let empty = HeatingSystemRegistry::new();
        let full = empty.clone().register(HeatingSystemModel::heat_pump()).unwrap();

        assert!(empty.is_empty());
        assert_eq!(full.len(), 1);
    }
}
