//! Photopion interaction rates of nucleons in isotropic photon backgrounds

use crate::constants::*;
use crate::cross_section::{CrossSectionTable, CrossSections};
use crate::field::PhotonField;
use crate::quadrature::*;

mod grid;

pub use grid::*;

/// Rates that cannot be evaluated, because the photon density vanishes
/// or the interaction is kinematically forbidden, are zero.
fn sanitize(rate: f64) -> f64 {
    if rate.is_finite() { rate } else { 0.0 }
}

/// The part of the rate integrand that depends only on the cross
/// section, F(e') / e', where F(e') = ∫ x σ(x) dx from the first
/// tabulated energy, together with the log-spacing of the table.
struct Kernel<'a> {
    eps: &'a [f64],
    weight: Vec<f64>,
    dx: f64,
}

impl<'a> Kernel<'a> {
    fn new(table: &'a CrossSectionTable) -> Result<Self, QuadratureError> {
        let eps = table.energies();
        let eps_sigma: Vec<f64> = eps.iter()
            .zip(table.cross_sections().iter())
            .map(|(e, s)| e * s)
            .collect();

        // Starts from zero at the first tabulated point, so nothing
        // below the table (i.e. below threshold) contributes.
        let weight = cumulative_trapezoid(eps, &eps_sigma)?
            .iter()
            .zip(eps.iter())
            .map(|(f, e)| f / e)
            .collect();

        Ok(Self {
            eps,
            weight,
            dx: mean_log_spacing(eps),
        })
    }
}

/// Returns the interaction rate (inverse mean free path, in 1/Mpc) of a
/// nucleon with Lorentz factor `gamma[i]`, with the given cross section,
/// in the photon field `field` at redshift `redshift` (zero if `None`).
///
/// For an isotropic photon gas with density n(e) = dn/de,
/// ```text
///   1/λ = 1/(2 γ^2) ∫ de n(e)/e^2 ∫_0^{2γe} de' e' σ(e'),
/// ```
/// which, on changing variable to the rest-frame energy e' = 2γe, becomes
/// ```text
///   1/λ = (1/γ) ∫ d(ln e') n(e'/2γ) F(e') / e'.
/// ```
/// The outer integral is performed over the tabulated energies by
/// Romberg's method, and so the table must have 2^k + 1 samples,
/// spaced uniformly in log(e').
///
/// Non-finite rates are replaced by zero.
pub fn compute_rate<F>(table: &CrossSectionTable, gamma: &[f64], field: &F, redshift: Option<f64>) -> Result<Vec<f64>, QuadratureError>
where F: PhotonField + ?Sized {
    let kernel = Kernel::new(table)?;
    let z = redshift.unwrap_or(0.0);
    let mut y = vec![0.0; kernel.eps.len()];

    gamma.iter()
        .map(|&g| -> Result<f64, QuadratureError> {
            for (y, (e, w)) in y.iter_mut().zip(kernel.eps.iter().zip(kernel.weight.iter())) {
                *y = field.density(e / (2.0 * g), z) * w;
            }
            let rate = romberg(&y, kernel.dx)? * MEGAPARSEC / g;
            Ok(sanitize(rate))
        })
        .collect()
}

/// Proton and neutron rates, in 1/Mpc, over a grid of Lorentz factors.
#[derive(Clone,Debug,PartialEq)]
pub struct NucleonRates {
    pub proton: Vec<f64>,
    pub neutron: Vec<f64>,
}

impl NucleonRates {
    /// Evaluates the rates of both nucleon species in `field` at `redshift`.
    pub fn compute<F>(xs: &CrossSections, grid: &LorentzFactorGrid, field: &F, redshift: Option<f64>) -> Result<Self, QuadratureError>
    where F: PhotonField + ?Sized {
        Ok(Self {
            proton: compute_rate(&xs.proton, grid.values(), field, redshift)?,
            neutron: compute_rate(&xs.neutron, grid.values(), field, redshift)?,
        })
    }
}
