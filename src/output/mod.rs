//! Writes tabulated interaction rates to plain-text files

use std::fs;
use std::path::{Path, PathBuf};

use crate::rate::{LorentzFactorGrid, NucleonRates};

mod error;

pub use error::*;

const COLUMNS: &str = "log10(gamma)\t1/lambda_proton [1/Mpc]\t1/lambda_neutron [1/Mpc]";

/// Returns the crate version and the short git SHA of the source
/// it was built from, if that was recorded at build time.
pub fn revision() -> Result<String, OutputError> {
    let sha = option_env!("VERGEN_GIT_SHA_SHORT").ok_or(OutputError::Revision)?;
    Ok(format!("{} ({})", env!("CARGO_PKG_VERSION"), sha))
}

/// Formats `x` in scientific notation with six digits after the point
/// and an explicitly signed exponent of at least two digits,
/// e.g. `1.234560e-05`.
pub fn scientific(x: f64) -> String {
    let s = format!("{:.6e}", x);
    match s.split_once('e') {
        Some((mantissa, exponent)) => {
            let (sign, digits) = match exponent.strip_prefix('-') {
                Some(digits) => ('-', digits),
                None => ('+', exponent),
            };
            format!("{}e{}{:0>2}", mantissa, sign, digits)
        },
        None => s,
    }
}

/// Name of the file holding the rates in the present-day field.
pub fn static_filename(name: &str) -> String {
    format!("rate_{}.txt", name)
}

/// Name of the file holding the redshift-dependent rates:
/// 'IRB' in the field name becomes 'IRBz'. Fields without 'IRB'
/// in their name get a '_z' suffix instead, so that the two files
/// never collide.
pub fn redshift_filename(name: &str) -> String {
    if name.contains("IRB") {
        format!("rate_{}.txt", name.replace("IRB", "IRBz"))
    } else {
        format!("rate_{}_z.txt", name)
    }
}

/// Creates the output directory, and its parents, if they do not
/// already exist.
pub fn create_directory(dir: &Path) -> Result<(), OutputError> {
    fs::create_dir_all(dir).map_err(|e| OutputError::directory(dir, &e))
}

/// Rates of protons and neutrons as a function of Lorentz factor
/// and, optionally, redshift, ready to be written to file.
pub struct RateTable {
    info: String,
    redshift_dependent: bool,
    rows: Vec<String>,
}

impl RateTable {
    /// A table of present-day rates, in the field described by `info`.
    pub fn new(info: &str) -> Self {
        Self {
            info: info.to_owned(),
            redshift_dependent: false,
            rows: vec![],
        }
    }

    /// A table of rates at a sequence of redshifts, which gains
    /// an additional, leading column.
    pub fn redshift_dependent(info: &str) -> Self {
        Self {
            redshift_dependent: true,
            ..Self::new(info)
        }
    }

    /// Appends a block of rows, one per Lorentz factor.
    /// `redshift` is ignored unless the table is redshift-dependent.
    pub fn push(&mut self, redshift: f64, grid: &LorentzFactorGrid, rates: &NucleonRates) {
        let redshift_dependent = self.redshift_dependent;
        let rows = grid.log10_values().iter()
            .zip(rates.proton.iter().zip(rates.neutron.iter()))
            .map(|(lg, (p, n))| {
                let line = format!("{:.2}\t{}\t{}", lg, scientific(*p), scientific(*n));
                if redshift_dependent {
                    format!("{:.2}\t{}", redshift, line)
                } else {
                    line
                }
            });
        self.rows.extend(rows);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    fn header(&self, revision: Option<&str>) -> String {
        let mut lines = vec![];

        if self.redshift_dependent {
            lines.push(format!("Photo-pion interaction rate with the {} (redshift dependent)", self.info));
        } else {
            lines.push(format!("Photo-pion interaction rate with the {}", self.info));
        }

        if let Some(rev) = revision {
            lines.push(format!("Produced with photopion version: {}", rev));
        }

        if self.redshift_dependent {
            lines.push(format!("z\t{}", COLUMNS));
        } else {
            lines.push(COLUMNS.to_owned());
        }

        lines.iter()
            .map(|line| format!("# {}\n", line))
            .collect()
    }

    /// The complete contents of the output file.
    pub fn to_text(&self, revision: Option<&str>) -> String {
        let mut text = self.header(revision);
        for row in self.rows.iter() {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    /// Writes the table to `path`, replacing any existing file.
    /// The contents go to a temporary file alongside, which is then
    /// renamed, so `path` never holds a partial table.
    pub fn write(&self, path: &Path, revision: Option<&str>) -> Result<(), OutputError> {
        let tmp = {
            let mut tmp = path.as_os_str().to_owned();
            tmp.push(".tmp");
            PathBuf::from(tmp)
        };

        fs::write(&tmp, self.to_text(revision))
            .and_then(|_| fs::rename(&tmp, path))
            .map_err(|e| {
                let _ = fs::remove_file(&tmp);
                OutputError::write(path, &e)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rates(grid: &LorentzFactorGrid, scale: f64) -> NucleonRates {
        let proton: Vec<f64> = grid.log10_values().iter()
            .map(|lg| if *lg < 11.0 { 0.0 } else { scale * 10.0f64.powf(lg - 12.0) })
            .collect();
        let neutron = proton.iter().map(|r| 1.5 * r).collect();
        NucleonRates {proton, neutron}
    }

    #[test]
    fn c_style_exponent() {
        assert_eq!(scientific(1.23456e-5), "1.234560e-05");
        assert_eq!(scientific(0.0), "0.000000e+00");
        assert_eq!(scientific(3.0), "3.000000e+00");
        assert_eq!(scientific(-2.5e12), "-2.500000e+12");
        assert_eq!(scientific(1.0e-300), "1.000000e-300");
        assert_eq!(scientific(6.02214076e23), "6.022141e+23");
    }

    #[test]
    fn file_names() {
        assert_eq!(static_filename("CMB"), "rate_CMB.txt");
        assert_eq!(static_filename("IRB_Gilmore12"), "rate_IRB_Gilmore12.txt");
        assert_eq!(redshift_filename("IRB_Gilmore12"), "rate_IRBz_Gilmore12.txt");
        assert_eq!(redshift_filename("URB_Protheroe96"), "rate_URB_Protheroe96_z.txt");
        assert_ne!(redshift_filename("CMB"), static_filename("CMB"));
    }

    #[test]
    fn static_table() {
        let grid = LorentzFactorGrid::new();
        let mut table = RateTable::new("cosmic microwave background radiation");
        table.push(0.0, &grid, &rates(&grid, 1.0));
        assert_eq!(table.len(), 251);

        let text = table.to_text(Some("0.3.0 (abc1234)"));
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3 + 251);
        assert_eq!(lines[0], "# Photo-pion interaction rate with the cosmic microwave background radiation");
        assert_eq!(lines[1], "# Produced with photopion version: 0.3.0 (abc1234)");
        assert_eq!(lines[2], "# log10(gamma)\t1/lambda_proton [1/Mpc]\t1/lambda_neutron [1/Mpc]");
        assert_eq!(lines[3], "6.00\t0.000000e+00\t0.000000e+00");
        assert_eq!(lines[3 + 150], "12.00\t1.000000e+00\t1.500000e+00");
        assert!(lines[253].starts_with("16.00\t"));
        assert!(lines[3..].iter().all(|l| l.split('\t').count() == 3));

        // header is written without the stamp if it's unavailable
        let text = table.to_text(None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2 + 251);
        assert!(lines[1].starts_with("# log10(gamma)"));
        assert!(!text.contains("Produced with"));
    }

    #[test]
    fn redshift_dependent_table() {
        let grid = LorentzFactorGrid::new();
        let mut table = RateTable::redshift_dependent("infrared background");
        for (i, z) in [0.0, 0.25, 1.0].iter().enumerate() {
            table.push(*z, &grid, &rates(&grid, (i + 1) as f64));
        }
        assert_eq!(table.len(), 3 * 251);

        let text = table.to_text(None);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "# Photo-pion interaction rate with the infrared background (redshift dependent)");
        assert_eq!(lines[1], "# z\tlog10(gamma)\t1/lambda_proton [1/Mpc]\t1/lambda_neutron [1/Mpc]");

        // z-major, then ascending gamma
        assert_eq!(lines[2], "0.00\t6.00\t0.000000e+00\t0.000000e+00");
        assert!(lines[2 + 251].starts_with("0.25\t6.00\t"));
        assert_eq!(lines[2 + 2 * 251 + 150], "1.00\t12.00\t3.000000e+00\t4.500000e+00");
        assert!(lines[2..].iter().all(|l| l.split('\t').count() == 4));
    }

    #[test]
    fn atomic_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("nested").join("output");
        create_directory(&out).unwrap();
        // idempotent
        create_directory(&out).unwrap();

        let path = out.join(static_filename("CMB"));
        std::fs::write(&path, "stale contents\n").unwrap();

        let grid = LorentzFactorGrid::new();
        let mut table = RateTable::new("cosmic microwave background radiation");
        table.push(0.0, &grid, &rates(&grid, 2.0));

        table.write(&path, None).unwrap();
        let first = std::fs::read_to_string(&path).unwrap();
        table.write(&path, None).unwrap();
        let second = std::fs::read_to_string(&path).unwrap();

        assert!(!first.contains("stale"));
        assert_eq!(first, second);

        // nothing left behind but the table itself
        let entries: Vec<_> = std::fs::read_dir(&out).unwrap().collect();
        assert_eq!(entries.len(), 1);
    }

    #[test]
    fn failed_write_leaves_nothing_behind() {
        let dir = tempfile::tempdir().unwrap();
        // a directory in the way of the table
        let path = dir.path().join("rate_CMB.txt");
        std::fs::create_dir(&path).unwrap();
        std::fs::write(path.join("contents.txt"), "keep me\n").unwrap();

        let grid = LorentzFactorGrid::new();
        let mut table = RateTable::new("cosmic microwave background radiation");
        table.push(0.0, &grid, &rates(&grid, 1.0));

        let result = table.write(&path, None);
        assert!(result.is_err());
        if let Err(e) = result {
            println!("{}", e);
        }

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap()
            .map(|entry| entry.unwrap().file_name())
            .collect();
        assert_eq!(entries, vec![std::ffi::OsString::from("rate_CMB.txt")]);
        assert!(path.join("contents.txt").exists());
    }

    #[test]
    fn unwritable_location() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("rate_CMB.txt");
        let table = RateTable::new("cosmic microwave background radiation");
        let result = table.write(&path, None);
        assert!(result.is_err());
        if let Err(e) = result {
            println!("{}", e);
        }
    }
}
