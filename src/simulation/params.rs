//! Physical and numerical parameters for one simulation run
//!
//! `SimulationParams` holds:
//! - rider and bike masses, initial speed and drag coefficient,
//! - hill height `H` and length `L`,
//! - integration step `dt` and method,
//! - numerical tunables: differentiation step `h`, threshold `epsilon`, iteration cap

use crate::error::{SimError, SimResult};
use crate::simulation::integrator::IntegrationMethod;

/// Standard gravity, m/s^2
pub const G: f64 = 9.80665;

pub const DEFAULT_M1: f64 = 60.0;
pub const DEFAULT_M2: f64 = 10.0;
pub const DEFAULT_V0_KMH: f64 = 18.0;
pub const DEFAULT_BETA: f64 = 1.2;
pub const DEFAULT_H: f64 = 15.0;
pub const DEFAULT_L: f64 = 60.0;
pub const DEFAULT_DT: f64 = 0.001;
pub const DEFAULT_DERIVATIVE_STEP: f64 = 1e-6;
pub const DEFAULT_EPSILON: f64 = 1e-6;
pub const DEFAULT_MAX_ITERATIONS: u64 = 10_000_000;

/// km/h -> m/s
pub fn kmh_to_ms(v: f64) -> f64 {
    v / 3.6
}

#[allow(non_snake_case)]
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationParams {
    pub m1: f64,   // rider mass
    pub m2: f64,   // bike mass
    pub v0: f64,   // initial speed, m/s
    pub beta: f64, // drag coefficient
    pub H: f64,    // hill height
    pub L: f64,    // hill length
    pub dt: f64,   // time step
    pub method: IntegrationMethod,
    pub h: f64,       // finite difference step
    pub epsilon: f64, // threshold for the end of hill, normal force, speed and flat curvature
    pub max_iterations: u64,
}

impl Default for SimulationParams {
    fn default() -> Self {
        Self {
            m1: DEFAULT_M1,
            m2: DEFAULT_M2,
            v0: kmh_to_ms(DEFAULT_V0_KMH),
            beta: DEFAULT_BETA,
            H: DEFAULT_H,
            L: DEFAULT_L,
            dt: DEFAULT_DT,
            method: IntegrationMethod::Euler,
            h: DEFAULT_DERIVATIVE_STEP,
            epsilon: DEFAULT_EPSILON,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SimulationParams {
    /// Total moving mass `M = m1 + m2`
    pub fn total_mass(&self) -> f64 {
        self.m1 + self.m2
    }

    /// Reject configurations that would make the run loop meaningless
    pub fn validate(&self) -> SimResult<()> {
        let finite = [
            ("m1", self.m1),
            ("m2", self.m2),
            ("v0", self.v0),
            ("beta", self.beta),
            ("H", self.H),
            ("L", self.L),
            ("dt", self.dt),
            ("h", self.h),
            ("epsilon", self.epsilon),
        ];
        for (name, value) in finite {
            if !value.is_finite() {
                return Err(SimError::invalid_parameter(name, format!("must be finite, got {value}")));
            }
        }

        if self.dt <= 0.0 {
            return Err(SimError::invalid_parameter("dt", format!("must be > 0, got {}", self.dt)));
        }
        if self.L <= 0.0 {
            return Err(SimError::invalid_parameter("L", format!("must be > 0, got {}", self.L)));
        }
        if self.v0 < 0.0 {
            return Err(SimError::invalid_parameter("v0", format!("must be >= 0, got {}", self.v0)));
        }
        if self.m1 < 0.0 || self.m2 < 0.0 || self.total_mass() <= 0.0 {
            return Err(SimError::invalid_parameter(
                "m1 + m2",
                format!("masses must be >= 0 with a positive sum, got {} and {}", self.m1, self.m2),
            ));
        }
        if self.h <= 0.0 {
            return Err(SimError::invalid_parameter("h", format!("must be > 0, got {}", self.h)));
        }
        if self.epsilon < 0.0 {
            return Err(SimError::invalid_parameter("epsilon", format!("must be >= 0, got {}", self.epsilon)));
        }
        if self.max_iterations == 0 {
            return Err(SimError::invalid_parameter("max_iterations", "must be at least 1"));
        }
        Ok(())
    }
}
