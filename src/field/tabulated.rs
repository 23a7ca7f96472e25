//! Empirical photon backgrounds, tabulated in energy and redshift

use std::path::Path;
use super::{PhotonField, FieldError};

/// A photon field defined by a table of densities, at a set of
/// photon energies and (optionally) redshifts.
/// Outside the tabulated range the density is zero.
pub struct TabulatedField {
    ln_energy: Vec<f64>,
    z: Vec<f64>,
    /// dn/de in 1/m^3/J, indexed as [energy][redshift]
    table: Vec<Vec<f64>>,
    evolving: bool,
}

impl TabulatedField {
    /// Constructs a field from photon energies (J), redshifts and
    /// densities (1/m^3/J), where `density[i][j]` is the density at
    /// `energy[i]` and `redshifts[j]`. If `redshifts` is `None`, each
    /// row must contain a single density and the field does not evolve.
    pub fn new(energy: Vec<f64>, redshifts: Option<Vec<f64>>, density: Vec<Vec<f64>>) -> Result<Self, FieldError> {
        let evolving = redshifts.is_some();
        let z = redshifts.unwrap_or_else(|| vec![0.0]);

        if energy.len() < 2 {
            return Err(FieldError::Shape(format!("{} photon energies given, at least 2 are required", energy.len())));
        }

        if z.is_empty() {
            return Err(FieldError::Shape("no redshifts given".to_owned()));
        }

        if energy.len() != density.len() {
            return Err(FieldError::Shape(format!("{} photon energies but {} rows of densities", energy.len(), density.len())));
        }

        if let Some(row) = density.iter().position(|row| row.len() != z.len()) {
            return Err(FieldError::Shape(format!("row {} has {} densities, expected {}", row, density[row].len(), z.len())));
        }

        if !energy.iter().all(|&e| e > 0.0) || !energy.windows(2).all(|w| w[1] > w[0]) {
            return Err(FieldError::Shape("photon energies must be positive and strictly increasing".to_owned()));
        }

        if !z.windows(2).all(|w| w[1] > w[0]) {
            return Err(FieldError::Shape("redshifts must be strictly increasing".to_owned()));
        }

        if !density.iter().flatten().all(|&n| n.is_finite() && n >= 0.0) {
            return Err(FieldError::Shape("densities must be finite and non-negative".to_owned()));
        }

        Ok(Self {
            ln_energy: energy.iter().map(|e| e.ln()).collect(),
            z,
            table: density,
            evolving,
        })
    }

    /// Loads a field table from `path`; see `TabulatedField::parse`.
    pub fn from_file<P: AsRef<Path>>(path: P, energy_unit: f64, density_unit: f64) -> Result<Self, FieldError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| FieldError::File(path.to_owned(), e.to_string()))?;
        Self::parse(&contents, energy_unit, density_unit)
    }

    /// Parses a whitespace-delimited table, in which each line gives a
    /// photon energy followed by the density dn/de at each redshift.
    /// The redshifts are listed on the first line, which begins with `z`.
    /// If that line is absent, the field is taken to be non-evolving and
    /// each line must contain exactly two columns.
    ///
    /// Energies are multiplied by `energy_unit` and densities by
    /// `density_unit` to convert them to J and 1/m^3/J respectively.
    /// Blank lines and those starting with '#' are skipped.
    pub fn parse(contents: &str, energy_unit: f64, density_unit: f64) -> Result<Self, FieldError> {
        let mut redshifts: Option<Vec<f64>> = None;
        let mut energy = Vec::new();
        let mut density = Vec::new();

        let parse_all = |line: &str, words: &[&str]| -> Result<Vec<f64>, FieldError> {
            words.iter()
                .map(|s| s.parse::<f64>())
                .collect::<Result<Vec<f64>, _>>()
                .map_err(|_| FieldError::Parse(0, line.to_owned()))
        };

        for (i, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let words: Vec<&str> = line.split_whitespace().collect();
            let with_line_number = |e: FieldError| match e {
                FieldError::Parse(_, s) => FieldError::Parse(i + 1, s),
                e => e,
            };

            if words[0] == "z" {
                if redshifts.is_some() || !energy.is_empty() {
                    return Err(FieldError::Parse(i + 1, line.to_owned()));
                }
                redshifts = Some(parse_all(line, &words[1..]).map_err(with_line_number)?);
                continue;
            }

            let values = parse_all(line, &words).map_err(with_line_number)?;
            let columns = redshifts.as_ref().map_or(1, |z| z.len());
            if values.len() != columns + 1 {
                return Err(FieldError::Parse(i + 1, line.to_owned()));
            }

            energy.push(values[0] * energy_unit);
            density.push(values[1..].iter().map(|n| n * density_unit).collect());
        }

        Self::new(energy, redshifts, density)
    }

    /// Locates `x` in the increasing sequence `xs`, returning the index
    /// of the interval that contains it and the fractional position
    /// within that interval.
    fn locate(x: f64, xs: &[f64]) -> Option<(usize, f64)> {
        let n = xs.len();
        if !(x >= xs[0] && x <= xs[n-1]) {
            return None;
        }
        let i = xs.partition_point(|&v| v <= x).saturating_sub(1).min(n - 2);
        let t = (x - xs[i]) / (xs[i+1] - xs[i]);
        Some((i, t))
    }
}

impl PhotonField for TabulatedField {
    fn density(&self, eps: f64, z: f64) -> f64 {
        if eps <= 0.0 {
            return 0.0;
        }

        let (ie, de) = match Self::locate(eps.ln(), &self.ln_energy) {
            Some(loc) => loc,
            None => return 0.0,
        };

        let (iz, dz) = if self.z.len() == 1 {
            if self.evolving && z != self.z[0] {
                return 0.0;
            }
            (0, 0.0)
        } else {
            match Self::locate(z, &self.z) {
                Some(loc) => loc,
                None => return 0.0,
            }
        };

        let jz = (iz + 1).min(self.z.len() - 1);
        let corners = [
            self.table[ie][iz],
            self.table[ie+1][iz],
            self.table[ie][jz],
            self.table[ie+1][jz],
        ];
        let weights = [
            (1.0 - de) * (1.0 - dz),
            de * (1.0 - dz),
            (1.0 - de) * dz,
            de * dz,
        ];

        if corners.iter().all(|&n| n > 0.0) {
            // densities span many orders of magnitude: interpolate logarithmically
            corners.iter()
                .zip(weights.iter())
                .map(|(n, w)| w * n.ln())
                .sum::<f64>()
                .exp()
        } else {
            corners.iter()
                .zip(weights.iter())
                .map(|(n, w)| w * n)
                .sum::<f64>()
        }
    }

    fn redshifts(&self) -> Option<&[f64]> {
        if self.evolving {
            Some(&self.z)
        } else {
            None
        }
    }
}
