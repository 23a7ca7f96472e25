//! Physical constants, in SI units unless otherwise stated

/// Speed of light in vacuum, units of m/s
pub const SPEED_OF_LIGHT: f64 = 2.99792458e8;
/// The absolute value of the electron charge, units of C
pub const ELEMENTARY_CHARGE: f64 = 1.602176634e-19;
/// Electronvolt, units of J
pub const ELECTRONVOLT: f64 = ELEMENTARY_CHARGE;
/// Reduced Planck constant, units of J s
pub const REDUCED_PLANCK_CONSTANT: f64 = 1.054571817e-34;
/// hbar c, units of J m
pub const HBAR_C: f64 = REDUCED_PLANCK_CONSTANT * SPEED_OF_LIGHT;
/// Boltzmann constant, units of J/K
pub const BOLTZMANN_CONSTANT: f64 = 1.380649e-23;
/// Megaparsec, units of m
pub const MEGAPARSEC: f64 = 3.0856775814913673e22;
/// Present-day temperature of the cosmic microwave background, units of K
pub const CMB_TEMPERATURE: f64 = 2.72548;
