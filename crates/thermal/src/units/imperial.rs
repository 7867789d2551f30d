//! Conversions for the imperial inputs users tend to know their house by.
//!
//! The thermal model works in SI throughout. These helpers exist for the
//! edges, where floor areas come in square feet and thermostats in °F.

/// Meters per foot.
pub const METERS_PER_FOOT: f64 = 0.3048;

/// Square meters per square foot.
pub const SQUARE_METERS_PER_SQUARE_FOOT: f64 = 0.092_903_04;

#[must_use]
pub fn feet_to_meters(feet: f64) -> f64 {
    feet * METERS_PER_FOOT
}

#[must_use]
pub fn meters_to_feet(meters: f64) -> f64 {
    meters / METERS_PER_FOOT
}

#[must_use]
pub fn square_feet_to_square_meters(square_feet: f64) -> f64 {
    square_feet * SQUARE_METERS_PER_SQUARE_FOOT
}

#[must_use]
pub fn fahrenheit_to_celsius(fahrenheit: f64) -> f64 {
    (fahrenheit - 32.0) * 5.0 / 9.0
}

#[must_use]
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}
