//! Fixed-step time integrators for the rider state
//!
//! Both schemes advance the packed state `[x, v]` of an autonomous system:
//! the derivative depends on the state only, never on time, since the hill is
//! static.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use super::states::NVec2;

/// Which integrator advances the state
/// `integrator: "euler"` or `integrator: "rk4"`
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IntegrationMethod {
    #[default]
    #[serde(rename = "euler")] // explicit (forward) Euler, first order
    Euler,

    #[serde(rename = "rk4")] // classical 4th-order Runge–Kutta, four derivative evaluations per step
    Rk4,
}

impl IntegrationMethod {
    pub const ALL: [IntegrationMethod; 2] = [IntegrationMethod::Euler, IntegrationMethod::Rk4];

    /// Advance `s` by one step of size `dt`
    pub fn step<F>(self, s: &NVec2, f: F, dt: f64) -> NVec2
    where
        F: Fn(&NVec2) -> NVec2,
    {
        match self {
            IntegrationMethod::Euler => euler_step(s, f, dt),
            IntegrationMethod::Rk4 => rk4_step(s, f, dt),
        }
    }
}

impl fmt::Display for IntegrationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntegrationMethod::Euler => f.write_str("euler"),
            IntegrationMethod::Rk4 => f.write_str("rk4"),
        }
    }
}

impl FromStr for IntegrationMethod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "euler" => Ok(IntegrationMethod::Euler),
            "rk4" => Ok(IntegrationMethod::Rk4),
            other => Err(format!("unknown integration method `{other}` (expected `euler` or `rk4`)")),
        }
    }
}

/// Forward Euler: `s_n+1 = s_n + dt * f(s_n)`
pub fn euler_step<F>(s: &NVec2, f: F, dt: f64) -> NVec2
where
    F: Fn(&NVec2) -> NVec2,
{
    s + f(s) * dt
}

/// Classical RK4:
/// k1 = f(s), k2 = f(s + dt/2 k1), k3 = f(s + dt/2 k2), k4 = f(s + dt k3),
/// s_n+1 = s_n + dt/6 (k1 + 2 k2 + 2 k3 + k4)
pub fn rk4_step<F>(s: &NVec2, f: F, dt: f64) -> NVec2
where
    F: Fn(&NVec2) -> NVec2,
{
    let half_dt = 0.5 * dt;

    let k1 = f(s);
    let k2 = f(&(s + k1 * half_dt));
    let k3 = f(&(s + k2 * half_dt));
    let k4 = f(&(s + k3 * dt));

    s + (k1 + k2 * 2.0 + k3 * 2.0 + k4) * (dt / 6.0)
}
