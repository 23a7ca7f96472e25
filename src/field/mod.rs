//! Representation of the photon backgrounds that nucleons interact with

use std::fmt;
use std::error::Error;
use std::path::PathBuf;

use enum_dispatch::enum_dispatch;

mod blackbody;
mod tabulated;
mod catalog;

pub use self::blackbody::*;
pub use self::tabulated::*;
pub use self::catalog::*;

/// An isotropic photon background, as seen by the propagation engine.
#[enum_dispatch]
pub trait PhotonField {
    /// Returns the differential photon number density dn/de, in units of
    /// 1/m^3/J, at photon energy `eps` (in J) and redshift `z`.
    /// Must be non-negative.
    fn density(&self, eps: f64, z: f64) -> f64;

    /// Returns the redshifts at which the field is defined,
    /// in increasing order, or `None` if the field has no
    /// redshift history of its own.
    fn redshifts(&self) -> Option<&[f64]>;
}

/// The kinds of photon field that can be requested in the
/// input configuration.
#[enum_dispatch(PhotonField)]
pub enum Background {
    Blackbody,
    TabulatedField,
}

/// Why could a photon field not be constructed?
pub enum FieldError {
    File(PathBuf, String),
    Parse(usize, String),
    Shape(String),
    Parameter(String, String),
    Kind(String, String),
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FieldError::File(path, cause) => write!(f, "unable to read photon field table '{}': {}", path.display(), cause),
            FieldError::Parse(line, s) => write!(f, "malformed photon field table, line {}: '{}'", line, s),
            FieldError::Shape(cause) => write!(f, "invalid photon field table: {}", cause),
            FieldError::Parameter(name, cause) => write!(f, "invalid photon field '{}': {}", name, cause),
            FieldError::Kind(name, kind) => write!(f, "photon field '{}' has unknown type '{}', expected 'blackbody' or 'table'", name, kind),
        }
    }
}

impl fmt::Debug for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for FieldError {}

impl FieldError {
    /// Attributes an invalid parameter to the named field.
    pub fn in_field(self, name: &str) -> Self {
        match self {
            FieldError::Parameter(_, cause) => FieldError::Parameter(name.to_owned(), cause),
            e => e,
        }
    }
}
