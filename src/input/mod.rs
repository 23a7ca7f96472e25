//! Parse input configuration file

use std::path::Path;
use yaml_rust::{YamlLoader, yaml::Yaml};
use evalexpr::*;

use crate::constants::*;

mod error;
mod types;
mod timing;

pub use error::*;
use types::*;
pub use timing::*;

/// Longest loop that `Config::read_loop` will expand.
const MAX_LOOP_STEPS: f64 = 1.0e6;

/// Represents the input configuration, which defines values
/// for the run parameters and the photon fields to be tabulated.
pub struct Config {
    input: Yaml,
    ctx: HashMapContext,
}

impl Config {
    /// Loads a configuration file.
    /// Fails if the file cannot be opened or if it is not
    /// YAML-formatted.
    pub fn from_file(path: &Path) -> Result<Self, InputError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| InputError::file(&path.display().to_string(), &e.to_string()))?;
        Self::from_string(&contents)
    }

    /// Loads a YAML configuration from a string.
    /// Fails if the string is not formatted correctly.
    pub fn from_string(s: &str) -> Result<Self, InputError> {
        let input = YamlLoader::load_from_str(s)
            .map_err(|e| InputError::file("<string>", &e.to_string()))?;
        // an empty document is a valid, if uninteresting, configuration
        let input = input.into_iter()
            .next()
            .unwrap_or(Yaml::Hash(Default::default()));

        Ok(Config {
            input,
            ctx: HashMapContext::new(),
        })
    }

    /// Loads automatic values for physical constants, units and
    /// special functions.
    /// Also loads and evaluates mathematical expressions
    /// that are given in the specified `section`.
    pub fn with_context(&mut self, section: &str) -> Result<&mut Self, InputError> {
        use helper::context_function;

        let mut ctx = context_map! {
            "c" => SPEED_OF_LIGHT,
            "hbar_c" => HBAR_C,
            "kB" => BOLTZMANN_CONSTANT,
            "T_cmb" => CMB_TEMPERATURE,
            "J" => 1.0,
            "eV" => ELECTRONVOLT,
            "meV" => 1.0e-3 * ELECTRONVOLT,
            "keV" => 1.0e3 * ELECTRONVOLT,
            "MeV" => 1.0e6 * ELECTRONVOLT,
            "GeV" => 1.0e9 * ELECTRONVOLT,
            "erg" => 1.0e-7,
            "K" => 1.0,
            "m" => 1.0,
            "cm" => 1.0e-2,
            "Mpc" => MEGAPARSEC,
            "pi" => std::f64::consts::PI,
        }.map_err(|_| InputError::conversion(section, "default constants"))?;

        context_function!(ctx, section, "sqrt",   f64::sqrt);
        context_function!(ctx, section, "cbrt",   f64::cbrt);
        context_function!(ctx, section, "abs",    f64::abs);
        context_function!(ctx, section, "exp",    f64::exp);
        context_function!(ctx, section, "ln",     f64::ln);
        context_function!(ctx, section, "log10",  f64::log10);
        context_function!(ctx, section, "floor",  f64::floor);
        context_function!(ctx, section, "ceil",   f64::ceil);
        context_function!(ctx, section, "round",  f64::round);

        self.ctx = ctx;

        // Read in from 'constants' block if it exists
        if self.input[section].is_badvalue() {
            return Ok(self);
        }

        let block = self.input[section].as_hash()
            .ok_or_else(|| InputError::conversion(section, section))?;

        for (a, b) in block {
            // grab the value, if possible
            let (key, value) = match (a, b) {
                (Yaml::String(k), Yaml::Integer(i)) => (Some(k), Some(*i as f64)),
                (Yaml::String(k), Yaml::Real(s)) => (Some(k), s.parse::<f64>().ok()),
                (Yaml::String(k), Yaml::String(s)) => (Some(k), eval_number_with_context(s, &self.ctx).ok()),
                _ => (None, None),
            };

            // insert it into the context so it's available for the next read
            match (key, value) {
                (Some(k), Some(v)) => {
                    self.ctx.set_value(k.clone(), Value::from(v))
                        .map_err(|_| InputError::conversion(section, k))?
                },
                // found a key, value pair but parsing failed
                (Some(k), None) => return Err(InputError::conversion(section, k)),
                _ => {},
            }
        }

        Ok(self)
    }

    /// Follows a path of colon-separated sections,
    /// e.g. `'section:subsection:key'`, to a YAML node.
    fn locate(&self, path: &str) -> Result<&Yaml, InputError> {
        path.split(':')
            .try_fold(&self.input, |y, s| {
                if y[s].is_badvalue() {
                    Err(InputError::location(path, s))
                } else {
                    Ok(&y[s])
                }
            })
    }

    /// Returns `true` if the configuration contains the given
    /// colon-separated path.
    pub fn contains<S: AsRef<str>>(&self, path: S) -> bool {
        self.locate(path.as_ref()).is_ok()
    }

    /// Locates a key-value pair in the configuration file and attempts
    /// to parse the value as the specified type.
    /// The path to the key-value pair is specified by a string of colon-separated
    /// sections, e.g. `'section:subsection:subsubsection:key'`.
    pub fn read<T, S>(&self, path: S) -> Result<T, InputError>
    where
        T: FromYaml,
        S: AsRef<str>,
    {
        let path = path.as_ref();
        let value = self.locate(path)?;
        let last = path.rsplit(':').next().unwrap_or(path);
        T::from_yaml(value.clone(), &self.ctx)
            .map_err(|_| InputError::conversion(path, last))
    }

    /// Returns the keys of the section at the given path, in
    /// the order they appear in the file.
    pub fn keys<S: AsRef<str>>(&self, path: S) -> Result<Vec<String>, InputError> {
        let path = path.as_ref();
        let section = self.locate(path)?
            .as_hash()
            .ok_or_else(|| InputError::conversion(path, path))?;

        section.keys()
            .map(|k| match k {
                Yaml::String(s) => Ok(s.clone()),
                Yaml::Integer(i) => Ok(i.to_string()),
                _ => Err(InputError::conversion(path, "key")),
            })
            .collect()
    }

    /// Locates a key-value pair in the configuration file and attempts
    /// to parse it as a looped variable, returning a Vec of the values.
    /// The loop is defined by a `start`, `stop` and `step`, and includes
    /// `stop` if it is an integer number of steps from `start`:
    ///
    /// ```
    /// let text: &str = "---
    ///     z:
    ///         start: 0.0
    ///         stop: 0.5
    ///         step: 0.1
    /// ";
    ///
    /// let values: Vec<f64> = Config::from_string(&text).unwrap()
    ///     .read_loop("z").unwrap();
    ///
    /// assert_eq!(values.len(), 6);
    /// ```
    ///
    /// A plain value or list of values is also accepted.
    pub fn read_loop<S: AsRef<str>>(&self, path: S) -> Result<Vec<f64>, InputError> {
        let key = path.as_ref();

        if !self.contains(format!("{}:start", key)) {
            return self.read(key);
        }

        let start: f64 = self.read(format!("{}:start", key))?;
        let stop: f64 = self.read(format!("{}:stop", key))?;
        let step: f64 = self.read(format!("{}:step", key))?;

        if !(step > 0.0) || !(stop >= start) {
            return Err(InputError::conversion(key, "step"));
        }

        // tolerate rounding error in (stop - start) / step
        let n = ((stop - start) / step + 1.0e-9).floor();
        if !n.is_finite() || n > MAX_LOOP_STEPS {
            return Err(InputError::conversion(key, "step"));
        }

        let v = (0..=(n as usize))
            .map(|i| start + (i as f64) * step)
            .collect();

        Ok(v)
    }
}

mod helper {
    macro_rules! context_function {
        ($ctx:expr, $section:expr, $name:literal, $func:expr) => {
            $ctx.set_function(
                $name.to_string(),
                Function::new(|arg| {
                    let x = arg.as_number()?;
                    Ok(Value::Float($func(x)))
                })
            ).map_err(|_| InputError::conversion($section, $name))?
        };
    }

    pub(super) use context_function;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_parser() {
        let text = "---
        input:
          proton: tables/PPP/xs_proton.txt

        fields:
          CMB:
            type: blackbody
            temperature: T_cmb
          hot:
            type: blackbody
            temperature: 2.0 * T0
            redshifts: [0.0, z1, 1.0]
          IRB_test:
            type: table
            density_unit: 1.0 / (cm^3 * eV)

        constants:
          T0: 10
          z1: T0 / 20

        deep:
          nested:
            section:
              key: 1.0
        ";

        let mut config = Config::from_string(&text).unwrap();
        config.with_context("constants").unwrap();

        let path: String = config.read("input:proton").unwrap();
        assert_eq!(path, "tables/PPP/xs_proton.txt");

        // Evaluates math expr with built-in constants
        let t: f64 = config.read("fields:CMB:temperature").unwrap();
        assert_eq!(t, CMB_TEMPERATURE);

        // ...and user-defined constants
        let t: f64 = config.read("fields:hot:temperature").unwrap();
        assert_eq!(t, 20.0);

        let unit: f64 = config.read("fields:IRB_test:density_unit").unwrap();
        let target = 1.0 / (1.0e-6 * ELECTRONVOLT);
        println!("unit = {:.6e}, target = {:.6e}", unit, target);
        assert!(((unit - target) / target).abs() < 1.0e-12);

        // array of f64
        let z: Vec<f64> = config.read("fields:hot:redshifts").unwrap();
        assert_eq!(z, vec![0.0, 0.5, 1.0]);

        // keys in order of appearance
        let names = config.keys("fields").unwrap();
        assert_eq!(names, vec!["CMB", "hot", "IRB_test"]);

        let key: f64 = config.read("deep:nested:section:key").unwrap();
        assert_eq!(key, 1.0);

        assert!(config.contains("fields:hot:redshifts"));
        assert!(!config.contains("fields:CMB:redshifts"));

        let missing: Result<f64, _> = config.read("fields:CMB:missing");
        assert_eq!(missing.err().map(|e| e.kind()), Some(InputErrorKind::Location));

        let wrong: Result<f64, _> = config.read("input:proton");
        assert_eq!(wrong.err().map(|e| e.kind()), Some(InputErrorKind::Conversion));
    }

    #[test]
    fn bad_constant() {
        let text = "---
        constants:
          a: b * 2.0
        ";
        let mut config = Config::from_string(&text).unwrap();
        assert!(config.with_context("constants").is_err());
    }

    #[test]
    fn looper() {
        // Test extraction of single value
        let text: &str = "---
        field:
            z: 0.5
        ";
        let config = Config::from_string(&text).unwrap();
        let z: Vec<f64> = config.read_loop("field:z").unwrap();
        assert_eq!(z, vec![0.5]);

        // Test extraction of looped values
        let text: &str = "---
        field:
            z:
                start: 0.0
                stop: 1.0
                step: 0.1
        ";
        let config = Config::from_string(&text).unwrap();
        let z: Vec<f64> = config.read_loop("field:z").unwrap();
        println!("z = {:?}", z);
        assert_eq!(z.len(), 11);
        assert_eq!(z[0], 0.0);
        assert!((z[10] - 1.0).abs() < 1.0e-12);

        let text: &str = "---
        field:
            z:
                start: 1.0
                stop: 0.0
                step: 0.1
        ";
        let config = Config::from_string(&text).unwrap();
        assert!(config.read_loop("field:z").is_err());

        // too many steps to be sensible
        let text: &str = "---
        field:
            z:
                start: 0.0
                stop: 1.0
                step: 1.0e-30
        ";
        let config = Config::from_string(&text).unwrap();
        let result = config.read_loop("field:z");
        assert_eq!(result.err().map(|e| e.kind()), Some(InputErrorKind::Conversion));
    }
}
