//! Fixed-sample numerical integration

use std::fmt;
use std::error::Error;

mod romberg;
mod trapezoid;

pub use romberg::*;
pub use trapezoid::*;

/// Why did an integration over tabulated samples fail?
#[derive(Clone, PartialEq)]
pub enum QuadratureError {
    /// Romberg integration needs 2^k + 1 samples
    SampleCount(usize),
    /// Fewer than two samples, or mismatched abscissae and ordinates
    Shape(usize, usize),
}

impl fmt::Display for QuadratureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QuadratureError::SampleCount(n) => write!(f, "Romberg integration requires 2^k + 1 samples, got {}", n),
            QuadratureError::Shape(nx, ny) => write!(f, "cannot integrate {} ordinates over {} abscissae", ny, nx),
        }
    }
}

impl fmt::Debug for QuadratureError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for QuadratureError {}

/// Average spacing of `x` in log space, i.e. the step
/// of the equivalent uniform grid in ln(x).
pub fn mean_log_spacing(x: &[f64]) -> f64 {
    match x.len() {
        0 | 1 => 0.0,
        n => (x[n-1].ln() - x[0].ln()) / ((n - 1) as f64),
    }
}
