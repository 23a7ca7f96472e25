use std::error::Error;
use std::path::{Path, PathBuf};
use std::time::Instant;

use colored::Colorize;

mod constants;
mod cross_section;
mod field;
mod input;
mod output;
mod quadrature;
mod rate;

use cross_section::*;
use field::*;
use input::*;
use output::*;
use rate::*;

const DEFAULT_PROTON_TABLE: &str = "tables/PPP/xs_proton.txt";
const DEFAULT_NEUTRON_TABLE: &str = "tables/PPP/xs_neutron.txt";
const DEFAULT_OUTPUT_DIRECTORY: &str = "data/PhotoPionProduction";

/// Reads a path from the configuration, falling back to `default`
/// if the key is absent.
fn read_path(config: &Config, key: &str, default: &str) -> Result<PathBuf, InputError> {
    if config.contains(key) {
        let path: String = config.read(key)?;
        Ok(PathBuf::from(path))
    } else {
        Ok(PathBuf::from(default))
    }
}

/// Tabulates the interaction rates of nucleons in a single photon field.
/// The present-day rates are always written; if the field has a redshift
/// history, a second table is written with the rates at each (sampled)
/// redshift. Returns the paths of the files written.
fn tabulate(field: &NamedField, xs: &CrossSections, grid: &LorentzFactorGrid, dir: &Path, revision: Option<&str>) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    let background = field.field();
    let mut written = vec![];

    let rates = NucleonRates::compute(xs, grid, background, None)?;
    let mut table = RateTable::new(field.info());
    table.push(0.0, grid, &rates);

    let path = dir.join(static_filename(field.name()));
    table.write(&path, revision)?;
    println!("{} {} ({} rows)", "Wrote".bold().bright_green(), path.display(), table.len());
    written.push(path);

    let redshifts = match background.redshifts() {
        Some(z) if !z.is_empty() => sampled_redshifts(z),
        _ => return Ok(written),
    };

    let start = Instant::now();
    let mut table = RateTable::redshift_dependent(field.info());

    for (i, z) in redshifts.iter().enumerate() {
        let rates = NucleonRates::compute(xs, grid, background, Some(*z))?;
        table.push(*z, grid, &rates);
        println!(
            "\t... z = {:.2} [{}/{}], ettc {}",
            z, i + 1, redshifts.len(),
            PrettyDuration::from(ettc(start, i + 1, redshifts.len()))
        );
    }

    let path = dir.join(redshift_filename(field.name()));
    table.write(&path, revision)?;
    println!("{} {} ({} rows)", "Wrote".bold().bright_green(), path.display(), table.len());
    written.push(path);

    Ok(written)
}

fn main() -> Result<(), Box<dyn Error>> {
    let args: Vec<String> = std::env::args().collect();

    let mut config = match args.get(1) {
        Some(path) => {
            println!("{} configuration from {}...", "Reading".bold().cyan(), path.bold().blue());
            Config::from_file(Path::new(path))?
        },
        None => Config::from_string("---\n")?,
    };

    config.with_context("constants")?;

    let proton = read_path(&config, "input:proton", DEFAULT_PROTON_TABLE)?;
    let neutron = read_path(&config, "input:neutron", DEFAULT_NEUTRON_TABLE)?;
    let dir = read_path(&config, "output:directory", DEFAULT_OUTPUT_DIRECTORY)?;

    println!(
        "{} cross sections from {} and {}...",
        "Loading".bold().cyan(),
        proton.display().to_string().bold().blue(),
        neutron.display().to_string().bold().blue()
    );
    let xs = CrossSections::load(&proton, &neutron)?;
    for table in [&xs.proton, &xs.neutron].iter() {
        println!("\t... {} cross section sampled at {} energies", table.species(), table.len());
    }

    let fields = catalog(&config)?;
    let grid = LorentzFactorGrid::new();
    println!("\t... tabulating {} field(s) at {} Lorentz factors", fields.len(), grid.len());

    let revision = match revision() {
        Ok(rev) => Some(rev),
        Err(e) => {
            eprintln!("{}: {}, tables will not be stamped.", "Warning".bold().yellow(), e);
            None
        },
    };

    create_directory(&dir)?;

    let runtime = Instant::now();

    for field in fields.iter() {
        let start = Instant::now();
        println!("{} {}...", "Processing".bold().cyan(), field.name().bold().blue());
        tabulate(field, &xs, &grid, &dir, revision.as_deref())?;
        println!(
            "{} {} in {}.",
            "Completed".bold().bright_green(),
            field.name(),
            PrettyDuration::from(start.elapsed())
        );
    }

    println!(
        "{} {} field(s), total runtime {}.",
        "Finished".bold().bright_green(),
        fields.len(),
        PrettyDuration::from(runtime.elapsed())
    );

    Ok(())
}
