//! Isotropic thermal photon gas

use std::f64::consts;
use crate::constants::*;
use super::{PhotonField, FieldError};

/// A Planckian photon gas of temperature `temperature` (K),
/// redshifting self-similarly, i.e. with T(z) = T (1 + z).
pub struct Blackbody {
    temperature: f64,
    redshifts: Option<Vec<f64>>,
}

impl Blackbody {
    /// A blackbody of the given temperature, with no redshift
    /// history. The temperature must be positive and finite.
    pub fn new(temperature: f64) -> Result<Self, FieldError> {
        if !(temperature > 0.0) || !temperature.is_finite() {
            return Err(FieldError::Parameter(
                "blackbody".to_owned(),
                format!("temperature must be positive and finite, got {} K", temperature),
            ));
        }

        Ok(Self {
            temperature,
            redshifts: None,
        })
    }

    /// The cosmic microwave background.
    ///
    /// Its evolution is handled analytically by the propagation
    /// engine, so it declares no redshifts.
    pub fn cmb() -> Self {
        Self {
            temperature: CMB_TEMPERATURE,
            redshifts: None,
        }
    }

    /// Declares that rates should also be tabulated at
    /// the given redshifts, which must be finite, non-negative
    /// and strictly increasing.
    pub fn with_redshifts(self, redshifts: Vec<f64>) -> Result<Self, FieldError> {
        if !redshifts.iter().all(|z| z.is_finite() && *z >= 0.0) || !redshifts.windows(2).all(|w| w[1] > w[0]) {
            return Err(FieldError::Parameter(
                "blackbody".to_owned(),
                format!("redshifts must be non-negative and strictly increasing, got {:?}", redshifts),
            ));
        }

        Ok(Self {
            redshifts: Some(redshifts),
            ..self
        })
    }

    /// dn/de at z = 0
    fn present_density(&self, eps: f64) -> f64 {
        if eps <= 0.0 {
            return 0.0;
        }
        let x = eps / (BOLTZMANN_CONSTANT * self.temperature);
        let n = eps * eps / (consts::PI.powi(2) * HBAR_C.powi(3) * x.exp_m1());
        // exp(x) overflows far above the thermal peak
        if n.is_finite() { n } else { 0.0 }
    }
}

impl PhotonField for Blackbody {
    fn density(&self, eps: f64, z: f64) -> f64 {
        let scale = 1.0 + z;
        scale * scale * self.present_density(eps / scale)
    }

    fn redshifts(&self) -> Option<&[f64]> {
        self.redshifts.as_deref()
    }
}
