//! Sampling of the Lorentz factor and redshift

/// Smallest tabulated Lorentz factor, log10
pub const LOG10_GAMMA_MIN: f64 = 6.0;
/// Largest tabulated Lorentz factor, log10
pub const LOG10_GAMMA_MAX: f64 = 16.0;
/// Number of tabulated Lorentz factors
pub const GRID_POINTS: usize = 251;

/// Redshift lists longer than this are thinned out...
pub const MAX_REDSHIFTS: usize = 100;
/// ...by retaining only every `REDSHIFT_STRIDE`th.
pub const REDSHIFT_STRIDE: usize = 10;

/// Nucleon Lorentz factors at which rates are tabulated,
/// logarithmically spaced.
#[derive(Clone,Debug)]
pub struct LorentzFactorGrid {
    log10_gamma: Vec<f64>,
    gamma: Vec<f64>,
}

impl LorentzFactorGrid {
    pub fn new() -> Self {
        let step = (LOG10_GAMMA_MAX - LOG10_GAMMA_MIN) / ((GRID_POINTS - 1) as f64);
        let log10_gamma: Vec<f64> = (0..GRID_POINTS)
            .map(|i| LOG10_GAMMA_MIN + (i as f64) * step)
            .collect();
        let gamma = log10_gamma.iter()
            .map(|lg| 10.0f64.powf(*lg))
            .collect();
        Self {log10_gamma, gamma}
    }

    pub fn log10_values(&self) -> &[f64] {
        &self.log10_gamma
    }

    pub fn values(&self) -> &[f64] {
        &self.gamma
    }

    pub fn len(&self) -> usize {
        self.gamma.len()
    }
}

impl Default for LorentzFactorGrid {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the redshifts at which rates should be tabulated, given
/// those at which a field is defined: all of them, unless there are
/// more than `MAX_REDSHIFTS`, in which case every `REDSHIFT_STRIDE`th,
/// starting from the first.
pub fn sampled_redshifts(z: &[f64]) -> Vec<f64> {
    if z.len() > MAX_REDSHIFTS {
        z.iter().step_by(REDSHIFT_STRIDE).copied().collect()
    } else {
        z.to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lorentz_factor_grid() {
        let grid = LorentzFactorGrid::new();
        assert_eq!(grid.len(), 251);
        assert_eq!(grid.log10_values().len(), 251);
        assert!((grid.values()[0] / 1.0e6 - 1.0).abs() < 1.0e-15);
        assert!((grid.values()[250] / 1.0e16 - 1.0).abs() < 1.0e-12);
        assert!(grid.values().windows(2).all(|w| w[1] > w[0]));

        // uniform in log space
        let lg = grid.log10_values();
        for (i, lg) in lg.iter().enumerate() {
            assert!((lg - (6.0 + 0.04 * (i as f64))).abs() < 1.0e-12);
        }
        assert_eq!(format!("{:.2}", lg[1]), "6.04");
        assert_eq!(format!("{:.2}", lg[250]), "16.00");
    }

    #[test]
    fn redshift_thinning() {
        let z: Vec<f64> = (0..100).map(|i| 0.01 * (i as f64)).collect();
        assert_eq!(sampled_redshifts(&z), z);

        let z: Vec<f64> = (0..101).map(|i| 0.01 * (i as f64)).collect();
        let thinned = sampled_redshifts(&z);
        assert_eq!(thinned.len(), 11);
        assert_eq!(thinned[0], z[0]);
        assert_eq!(thinned[1], z[10]);
        assert_eq!(thinned[10], z[100]);

        let z: Vec<f64> = (0..250).map(|i| 0.02 * (i as f64)).collect();
        let thinned = sampled_redshifts(&z);
        assert_eq!(thinned.len(), 25);
        assert!(thinned.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(thinned[24], z[240]);

        assert!(sampled_redshifts(&[]).is_empty());
    }
}
