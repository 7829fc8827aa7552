//! Configuration types for loading hill scenarios from YAML.
//!
//! This module defines a thin, `serde`-deserializable representation of a
//! simulation scenario. A scenario consists of:
//!
//! - [`EngineConfig`]     – integrator and numerical tunables
//! - [`ParametersConfig`] – rider, bike and hill parameters
//! - [`HillConfig`]       – built-in hill (by index or name) or a formula
//! - [`OutputConfig`]     – optional trajectory file
//! - [`ScenarioConfig`]   – top-level wrapper used to load a scenario from YAML
//!
//! Every section and every field is optional; missing values fall back to the
//! reference rider (60 kg rider, 10 kg bike, 18 km/h, beta 1.2, 15 m by 60 m
//! linear hill, dt 0.001 s, Euler).
//!
//! # YAML format
//!
//! ```yaml
//! engine:
//!   integrator: "rk4"       # or "euler"
//!   derivative_step: 1.0e-6 # finite difference step h
//!   epsilon: 1.0e-6         # end of hill / normal force / speed threshold
//!   max_iterations: 10000000
//!
//! parameters:
//!   m1: 60.0                # rider mass, kg
//!   m2: 10.0                # bike mass, kg
//!   v0_kmh: 18.0            # initial speed, km/h
//!   beta: 1.2               # drag coefficient
//!   H: 15.0                 # hill height, m
//!   L: 60.0                 # hill length, m
//!   dt: 0.001               # time step, s
//!
//! hill:
//!   builtin: linear         # index 0..=3 or name
//!   # expression: "(H/L)*(L-x)*cos(2*pi*x/L)"
//!
//! output:
//!   trajectory: trajectory.txt
//! ```

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::error::SimResult;
use crate::simulation::integrator::IntegrationMethod;

/// Integrator choice and numerical tunables
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    #[serde(default)]
    pub integrator: IntegrationMethod, // time integrator used to advance the rider
    pub derivative_step: Option<f64>, // finite difference step `h`
    pub epsilon: Option<f64>,         // termination and flat-curvature threshold
    pub max_iterations: Option<u64>,  // safety cap on integration steps
}

/// Physical parameters of rider, bike and hill
#[allow(non_snake_case)]
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ParametersConfig {
    pub m1: Option<f64>,     // rider mass, kg
    pub m2: Option<f64>,     // bike mass, kg
    pub v0_kmh: Option<f64>, // initial speed, km/h
    pub beta: Option<f64>,   // drag coefficient
    pub H: Option<f64>,      // hill height, m
    pub L: Option<f64>,      // hill length, m
    pub dt: Option<f64>,     // time step, s
}

/// Built-in hill key: listing index or name
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum HillKey {
    Index(usize),
    Name(String),
}

/// Which hill to ride
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub enum HillConfig {
    #[serde(rename = "builtin")]
    Builtin(HillKey),

    #[serde(rename = "expression")] // formula in `x`, may use `pi`, `H` and `L`
    Expression(String),
}

impl Default for HillConfig {
    fn default() -> Self {
        HillConfig::Builtin(HillKey::Index(0))
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct OutputConfig {
    pub trajectory: Option<PathBuf>, // `time position height` lines, one per iteration
}

/// Top-level scenario configuration loaded from YAML.
#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub parameters: ParametersConfig,
    #[serde(default)]
    pub hill: HillConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

impl ScenarioConfig {
    pub fn from_yaml_str(text: &str) -> SimResult<Self> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_yaml_file(path: &Path) -> SimResult<Self> {
        debug!(path = %path.display(), "loading scenario");
        let file = File::open(path)?;
        let reader = BufReader::new(file);
        Ok(serde_yaml::from_reader(reader)?)
    }
}
