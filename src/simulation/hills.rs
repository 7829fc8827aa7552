//! Hill profiles: height as a function of horizontal position
//!
//! [`HillProfile`] is the seam the engine works against. [`Hill`] covers the
//! built-in closed forms and compiled user expressions; any
//! `Fn(f64, &SimulationParams) -> f64` closure is a profile as well.

use std::f64::consts::PI;
use std::fmt;

use crate::error::{SimError, SimResult};
use crate::expression::{Bindings, Expression};
use crate::simulation::params::SimulationParams;

/// Pure map `x -> y` for a given parameter set
pub trait HillProfile {
    fn height(&self, x: f64, params: &SimulationParams) -> f64;
}

impl<F> HillProfile for F
where
    F: Fn(f64, &SimulationParams) -> f64,
{
    fn height(&self, x: f64, params: &SimulationParams) -> f64 {
        self(x, params)
    }
}

/// Radius of the arc through both ends of an `H` by `L` hill
fn arc_radius(params: &SimulationParams) -> f64 {
    (params.H * params.H + params.L * params.L) / (2.0 * params.H)
}

pub fn linear(x: f64, params: &SimulationParams) -> f64 {
    (params.H / params.L) * (params.L - x)
}

pub fn circular_arc_left(x: f64, params: &SimulationParams) -> f64 {
    let r = arc_radius(params);
    params.H - r + (r * r - x * x).sqrt()
}

pub fn circular_arc_right(x: f64, params: &SimulationParams) -> f64 {
    let r = arc_radius(params);
    let u = params.L - x;
    r - (r * r - u * u).sqrt()
}

pub fn cosine_modulated(x: f64, params: &SimulationParams) -> f64 {
    (params.H / params.L) * (params.L - x) * (2.0 * PI * x / params.L).cos()
}

/// Built-in hill shapes, in listing order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuiltinHill {
    Linear,
    CircularArcLeft,
    CircularArcRight,
    CosineModulated,
}

impl BuiltinHill {
    pub const ALL: [BuiltinHill; 4] = [
        BuiltinHill::Linear,
        BuiltinHill::CircularArcLeft,
        BuiltinHill::CircularArcRight,
        BuiltinHill::CosineModulated,
    ];

    pub fn name(self) -> &'static str {
        match self {
            BuiltinHill::Linear => "linear",
            BuiltinHill::CircularArcLeft => "arc-left",
            BuiltinHill::CircularArcRight => "arc-right",
            BuiltinHill::CosineModulated => "cosine",
        }
    }

    pub fn formula(self) -> &'static str {
        match self {
            BuiltinHill::Linear => "y(x) = (H/L)*(L-x)",
            BuiltinHill::CircularArcLeft => "y(x) = H-R+sqrt(R*R-x*x); R=(H*H+L*L)/(2*H)",
            BuiltinHill::CircularArcRight => "y(x) = R-sqrt(R*R-(L-x)*(L-x)); R=(H*H+L*L)/(2*H)",
            BuiltinHill::CosineModulated => "y(x) = (H/L)*(L-x)*cos(2*pi*x/L)",
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Look up by listing index or by name
    pub fn lookup(key: &str) -> Option<Self> {
        let key = key.trim();
        if let Ok(index) = key.parse::<usize>() {
            return Self::from_index(index);
        }
        Self::ALL.into_iter().find(|hill| hill.name().eq_ignore_ascii_case(key))
    }

    fn height(self, x: f64, params: &SimulationParams) -> f64 {
        match self {
            BuiltinHill::Linear => linear(x, params),
            BuiltinHill::CircularArcLeft => circular_arc_left(x, params),
            BuiltinHill::CircularArcRight => circular_arc_right(x, params),
            BuiltinHill::CosineModulated => cosine_modulated(x, params),
        }
    }
}

impl fmt::Display for BuiltinHill {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Hill {
    Builtin(BuiltinHill),
    Expression(Expression),
}

impl Hill {
    /// Check that the hill is defined for these parameters before a run.
    ///
    /// Arcs need `H > 0` and a radius that covers `[0, L]` plus the
    /// difference stencil, which rules out `H == L`. Expressions are sampled
    /// over `[0, L]` at the profile extent step and must evaluate to finite
    /// heights everywhere.
    pub fn validate(&self, params: &SimulationParams) -> SimResult<()> {
        match self {
            Hill::Builtin(BuiltinHill::CircularArcLeft | BuiltinHill::CircularArcRight) => {
                if params.H <= 0.0 {
                    return Err(SimError::InvalidHill(format!("circular arc hills need H > 0, got {}", params.H)));
                }
                let r = arc_radius(params);
                let reach = params.L + params.epsilon + params.h;
                if r <= reach {
                    return Err(SimError::InvalidHill(format!(
                        "arc radius {r} does not exceed the ridden span {reach} (H = {}, L = {})",
                        params.H, params.L
                    )));
                }
                Ok(())
            }
            Hill::Builtin(_) => Ok(()),
            Hill::Expression(expr) => {
                let bindings = Bindings::hill(params.H, params.L);
                let steps = (params.L / DEFAULT_EXTENT_STEP).ceil() as u64;
                for i in 0..=steps {
                    let x = (i as f64 * DEFAULT_EXTENT_STEP).min(params.L);
                    let y = expr
                        .evaluate_with(x, &bindings)
                        .map_err(|e| SimError::InvalidHill(format!("`{expr}` at x = {x}: {e}")))?;
                    if !y.is_finite() {
                        return Err(SimError::InvalidHill(format!("`{expr}` is not finite at x = {x}")));
                    }
                }
                Ok(())
            }
        }
    }

    pub fn describe(&self) -> String {
        match self {
            Hill::Builtin(builtin) => format!("{}: {}", builtin.name(), builtin.formula()),
            Hill::Expression(expr) => format!("y(x) = {expr}"),
        }
    }
}

impl From<BuiltinHill> for Hill {
    fn from(builtin: BuiltinHill) -> Self {
        Hill::Builtin(builtin)
    }
}

impl HillProfile for Hill {
    fn height(&self, x: f64, params: &SimulationParams) -> f64 {
        match self {
            Hill::Builtin(builtin) => builtin.height(x, params),
            // validated hills only fail between sample points; NaN then
            // propagates into the run instead of a panic
            Hill::Expression(expr) => expr
                .evaluate_with(x, &Bindings::hill(params.H, params.L))
                .unwrap_or(f64::NAN),
        }
    }
}

pub const DEFAULT_EXTENT_STEP: f64 = 0.001;

/// Lowest and highest sampled height of a profile
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: f64,
    pub max: f64,
}

/// Sample `profile` on `[x_min, x_max]` every `step` and track the extremes
pub fn profile_extent<P>(profile: &P, params: &SimulationParams, x_min: f64, x_max: f64, step: f64) -> Extent
where
    P: HillProfile + ?Sized,
{
    let mut extent = Extent {
        min: f64::INFINITY,
        max: f64::NEG_INFINITY,
    };
    if step <= 0.0 || x_max < x_min {
        return extent;
    }

    let steps = ((x_max - x_min) / step).floor() as u64;
    for i in 0..=steps {
        let y = profile.height(x_min + i as f64 * step, params);
        extent.min = extent.min.min(y);
        extent.max = extent.max.max(y);
    }
    extent
}
