//! Build a fully-initialized run from configuration
//!
//! Takes a `ScenarioConfig` (YAML-facing) and produces a runtime `Scenario`
//! containing:
//! - numerical and physical parameters (`SimulationParams`)
//! - the hill to ride (`Hill`)
//! - where to write the trajectory, if anywhere

use std::path::PathBuf;

use tracing::info;

use crate::configuration::config::{HillConfig, HillKey, ScenarioConfig};
use crate::error::{SimError, SimResult};
use crate::expression;
use crate::simulation::engine;
use crate::simulation::hills::{BuiltinHill, Hill};
use crate::simulation::params::{kmh_to_ms, SimulationParams};
use crate::simulation::states::SimulationResult;
use crate::simulation::trajectory::TrajectorySink;

#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub params: SimulationParams,
    pub hill: Hill,
    pub trajectory: Option<PathBuf>,
}

impl Scenario {
    pub fn build_scenario(cfg: ScenarioConfig) -> SimResult<Self> {
        // Parameters (runtime) from ParametersConfig + EngineConfig, defaults for gaps
        let defaults = SimulationParams::default();
        let p_cfg = cfg.parameters;
        let e_cfg = cfg.engine;
        let params = SimulationParams {
            m1: p_cfg.m1.unwrap_or(defaults.m1),
            m2: p_cfg.m2.unwrap_or(defaults.m2),
            v0: p_cfg.v0_kmh.map_or(defaults.v0, kmh_to_ms),
            beta: p_cfg.beta.unwrap_or(defaults.beta),
            H: p_cfg.H.unwrap_or(defaults.H),
            L: p_cfg.L.unwrap_or(defaults.L),
            dt: p_cfg.dt.unwrap_or(defaults.dt),
            method: e_cfg.integrator,
            h: e_cfg.derivative_step.unwrap_or(defaults.h),
            epsilon: e_cfg.epsilon.unwrap_or(defaults.epsilon),
            max_iterations: e_cfg.max_iterations.unwrap_or(defaults.max_iterations),
        };

        let hill = resolve_hill(&cfg.hill)?;

        Ok(Self {
            params,
            hill,
            trajectory: cfg.output.trajectory,
        })
    }

    /// Parameter and hill checks, run before any integration
    pub fn validate(&self) -> SimResult<()> {
        self.params.validate()?;
        self.hill.validate(&self.params)
    }

    pub fn run(&self, sink: Option<&mut dyn TrajectorySink>) -> SimResult<SimulationResult> {
        self.validate()?;
        info!(hill = %self.hill.describe(), "running scenario");
        Ok(engine::run(&self.hill, &self.params, sink))
    }
}

/// Map the hill section onto a runtime `Hill`
pub fn resolve_hill(cfg: &HillConfig) -> SimResult<Hill> {
    match cfg {
        HillConfig::Builtin(HillKey::Index(index)) => BuiltinHill::from_index(*index)
            .map(Hill::Builtin)
            .ok_or_else(|| SimError::config(format!("no built-in hill with index {index}"))),
        HillConfig::Builtin(HillKey::Name(name)) => BuiltinHill::lookup(name)
            .map(Hill::Builtin)
            .ok_or_else(|| SimError::config(format!("no built-in hill named `{name}`"))),
        HillConfig::Expression(text) => Ok(Hill::Expression(expression::compile(text)?)),
    }
}
