//! The set of photon fields for which rate tables are generated

use std::error::Error;

use crate::constants::*;
use crate::input::{Config, InputError};
use super::{Background, Blackbody, FieldError, TabulatedField};

/// A photon field together with the name that identifies its
/// output files and the description written into their headers.
pub struct NamedField {
    name: String,
    info: String,
    field: Background,
}

impl NamedField {
    pub fn new<F: Into<Background>>(name: &str, info: &str, field: F) -> Self {
        Self {
            name: name.to_owned(),
            info: info.to_owned(),
            field: field.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn info(&self) -> &str {
        &self.info
    }

    pub fn field(&self) -> &Background {
        &self.field
    }
}

/// Loads the photon fields listed in the `fields` section of the
/// input configuration, in the order they are given.
/// If there is no such section, the catalog consists of the CMB alone.
pub fn catalog(config: &Config) -> Result<Vec<NamedField>, Box<dyn Error>> {
    if !config.contains("fields") {
        let cmb = NamedField::new("CMB", "cosmic microwave background radiation", Blackbody::cmb());
        return Ok(vec![cmb]);
    }

    let mut fields = vec![];

    for name in config.keys("fields")? {
        let path = format!("fields:{}", name);
        let kind: String = config.read(format!("{}:type", path))?;
        let info: String = config.read(format!("{}:info", path))
            .unwrap_or_else(|_| name.clone());

        let field: Background = match kind.as_str() {
            "blackbody" | "thermal" => {
                let temperature = read_or(config, &format!("{}:temperature", path), CMB_TEMPERATURE)?;
                let bb = Blackbody::new(temperature)
                    .map_err(|e| e.in_field(&name))?;
                if config.contains(format!("{}:redshifts", path)) {
                    let z = config.read_loop(format!("{}:redshifts", path))?;
                    bb.with_redshifts(z)
                        .map_err(|e| e.in_field(&name))?
                        .into()
                } else {
                    bb.into()
                }
            },
            "table" | "tabulated" => {
                let file: String = config.read(format!("{}:file", path))?;
                let energy_unit: f64 = read_or(config, &format!("{}:energy_unit", path), ELECTRONVOLT)?;
                let density_unit: f64 = read_or(config, &format!("{}:density_unit", path), 1.0e6 / ELECTRONVOLT)?;
                TabulatedField::from_file(&file, energy_unit, density_unit)?.into()
            },
            _ => return Err(FieldError::Kind(name.clone(), kind.clone()).into()),
        };

        fields.push(NamedField::new(&name, &info, field));
    }

    Ok(fields)
}

/// Reads an optional value, which is an error only if it is present
/// but cannot be parsed.
fn read_or(config: &Config, path: &str, default: f64) -> Result<f64, InputError> {
    if config.contains(path) {
        config.read(path)
    } else {
        Ok(default)
    }
}
