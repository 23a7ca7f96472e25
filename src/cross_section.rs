//! Photopion production cross sections of free nucleons

use std::fmt;
use std::error::Error;
use std::path::{Path, PathBuf};

use crate::constants::*;

/// Number of samples retained from each table, 2^11 + 1,
/// as required by the Romberg integration of the rates.
pub const TABLE_LENGTH: usize = 2049;

/// Tabulated photon energies are given in GeV...
const ENERGY_SCALE: f64 = 1.0e9 * ELECTRONVOLT;
/// ...and cross sections in units of 1e-34 m^2.
const CROSS_SECTION_SCALE: f64 = 1.0e-34;

#[derive(Copy,Clone,PartialEq,Eq,Debug)]
pub enum Nucleon {
    Proton,
    Neutron,
}

impl fmt::Display for Nucleon {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Nucleon::Proton => write!(f, "proton"),
            Nucleon::Neutron => write!(f, "neutron"),
        }
    }
}

/// Why did loading a cross section table fail?
pub enum CrossSectionError {
    File(PathBuf, String),
    Parse(Nucleon, usize, String),
    Length(Nucleon, usize),
}

impl fmt::Display for CrossSectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CrossSectionError::File(path, cause) => write!(f, "unable to read cross section table '{}': {}", path.display(), cause),
            CrossSectionError::Parse(species, line, s) => write!(f, "malformed {} cross section, line {}: '{}'", species, line, s),
            CrossSectionError::Length(species, n) => write!(f, "{} cross section has {} rows, at least {} are required", species, n, TABLE_LENGTH),
        }
    }
}

impl fmt::Debug for CrossSectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for CrossSectionError {}

/// Photon energies in the nucleon rest frame (J) and the
/// corresponding cross sections (m^2), in increasing order
/// of energy.
#[derive(Clone,Debug)]
pub struct CrossSectionTable {
    species: Nucleon,
    energy: Vec<f64>,
    sigma: Vec<f64>,
}

impl CrossSectionTable {
    /// Loads a whitespace-delimited table of photon energy (GeV)
    /// and cross section (1e-34 m^2) from `path`.
    pub fn from_file<P: AsRef<Path>>(path: P, species: Nucleon) -> Result<Self, CrossSectionError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|e| CrossSectionError::File(path.to_owned(), e.to_string()))?;
        Self::parse(&contents, species)
    }

    /// Parses the contents of a cross section table, converting
    /// to SI units and retaining only the first `TABLE_LENGTH` rows.
    /// Blank lines and those starting with '#' are skipped.
    pub fn parse(contents: &str, species: Nucleon) -> Result<Self, CrossSectionError> {
        let mut energy = Vec::new();
        let mut sigma = Vec::new();

        for (i, line) in contents.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let mut columns = line.split_whitespace().map(|s| s.parse::<f64>());
            match (columns.next(), columns.next()) {
                (Some(Ok(e)), Some(Ok(s))) => {
                    energy.push(e * ENERGY_SCALE);
                    sigma.push(s * CROSS_SECTION_SCALE);
                },
                _ => return Err(CrossSectionError::Parse(species, i + 1, line.to_owned())),
            }
        }

        Self::from_samples(species, energy, sigma)
    }

    /// Constructs a table from samples that are already in SI units,
    /// truncating them to `TABLE_LENGTH`.
    pub fn from_samples(species: Nucleon, mut energy: Vec<f64>, mut sigma: Vec<f64>) -> Result<Self, CrossSectionError> {
        let rows = energy.len().min(sigma.len());
        if rows < TABLE_LENGTH {
            return Err(CrossSectionError::Length(species, rows));
        }

        energy.truncate(TABLE_LENGTH);
        sigma.truncate(TABLE_LENGTH);

        Ok(Self {species, energy, sigma})
    }

    pub fn species(&self) -> Nucleon {
        self.species
    }

    /// Tabulated photon energies, in joules
    pub fn energies(&self) -> &[f64] {
        &self.energy
    }

    /// Tabulated cross sections, in m^2
    pub fn cross_sections(&self) -> &[f64] {
        &self.sigma
    }

    pub fn len(&self) -> usize {
        self.energy.len()
    }
}

/// The pair of tables used for every photon field.
pub struct CrossSections {
    pub proton: CrossSectionTable,
    pub neutron: CrossSectionTable,
}

impl CrossSections {
    pub fn load<P: AsRef<Path>>(proton: P, neutron: P) -> Result<Self, CrossSectionError> {
        Ok(Self {
            proton: CrossSectionTable::from_file(proton, Nucleon::Proton)?,
            neutron: CrossSectionTable::from_file(neutron, Nucleon::Neutron)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;
    use super::*;

    fn synthetic_table(rows: usize) -> String {
        let mut s = String::from("# eps [GeV]\tsigma [1e-34 m^2]\n");
        for i in 0..rows {
            let e = 0.15 * 10.0f64.powf(3.0 * (i as f64) / 2048.0);
            s.push_str(&format!("{:.8e}\t{:.4e}\n", e, 100.0 + (i as f64)));
        }
        s
    }

    #[test]
    fn truncates_to_table_length() {
        for rows in [2049, 2050, 3000].iter() {
            let table = CrossSectionTable::parse(&synthetic_table(*rows), Nucleon::Proton).unwrap();
            println!("{} rows => {} samples", rows, table.len());
            assert_eq!(table.len(), TABLE_LENGTH);
            assert_eq!(table.energies().len(), table.cross_sections().len());
        }
    }

    #[test]
    fn converts_units() {
        let table = CrossSectionTable::parse(&synthetic_table(2049), Nucleon::Neutron).unwrap();
        let e0 = 0.15e9 * ELECTRONVOLT;
        let err = ((table.energies()[0] - e0) / e0).abs();
        println!("eps[0] = {:.6e} J, expected {:.6e} J", table.energies()[0], e0);
        assert!(err < 1.0e-8);
        assert!((table.cross_sections()[0] - 1.0e-32).abs() < 1.0e-40);
        assert_eq!(table.species(), Nucleon::Neutron);
    }

    #[test]
    fn too_few_rows() {
        let result = CrossSectionTable::parse(&synthetic_table(2048), Nucleon::Proton);
        match result {
            Err(CrossSectionError::Length(Nucleon::Proton, 2048)) => {},
            _ => panic!("expected a length error"),
        }
    }

    #[test]
    fn malformed_row() {
        let mut s = synthetic_table(2049);
        s.push_str("0.5 abc\n");
        match CrossSectionTable::parse(&s, Nucleon::Proton) {
            Err(CrossSectionError::Parse(_, line, _)) => assert_eq!(line, 2051),
            _ => panic!("expected a parse error"),
        }
    }

    #[test]
    fn missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = CrossSections::load(dir.path().join("xs_proton.txt"), dir.path().join("xs_neutron.txt"));
        assert!(result.is_err());
        if let Err(e) = result {
            println!("{}", e);
        }
    }

    #[test]
    fn load_both_species() {
        let dir = tempfile::tempdir().unwrap();
        let proton = dir.path().join("xs_proton.txt");
        let neutron = dir.path().join("xs_neutron.txt");
        for path in [&proton, &neutron].iter() {
            let mut file = std::fs::File::create(path).unwrap();
            file.write_all(synthetic_table(2100).as_bytes()).unwrap();
        }
        let xs = CrossSections::load(&proton, &neutron).unwrap();
        assert_eq!(xs.proton.species(), Nucleon::Proton);
        assert_eq!(xs.neutron.species(), Nucleon::Neutron);
        assert_eq!(xs.proton.len(), TABLE_LENGTH);
        assert_eq!(xs.neutron.len(), TABLE_LENGTH);
    }
}
