//! Contact check between the rider and the hill surface
//!
//! Uses the local slope and curvature of the profile to estimate the normal
//! force, then classifies the current state as still riding, detached or
//! stopped. The check always runs on the pre-step state.

use crate::simulation::derivative::{first_derivative, second_derivative};
use crate::simulation::hills::HillProfile;
use crate::simulation::params::{SimulationParams, G};
use crate::simulation::states::{GroundState, State};

/// Local geometry and the resulting normal force
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub slope: f64,     // dy/dx
    pub curvature: f64, // d2y/dx2
    pub radius: f64,    // osculating circle radius, infinite on flat sections
    pub normal_force: f64,
}

/// Curvature radius `(1 + dy^2)^1.5 / |ddy|`, infinite when `|ddy| < epsilon`
pub fn curvature_radius(dy: f64, ddy: f64, epsilon: f64) -> f64 {
    if ddy.abs() < epsilon {
        return f64::INFINITY;
    }
    (1.0 + dy * dy).powf(1.5) / ddy.abs()
}

/// `N = M g cos(theta) - M v^2 / R`
pub fn normal_force(v: f64, dy: f64, radius: f64, params: &SimulationParams) -> f64 {
    let m = params.total_mass();
    let theta = dy.atan();
    let weight_component = m * G * theta.cos();
    if radius.is_infinite() {
        // no centripetal demand on a straight section
        return weight_component;
    }
    weight_component - m * v * v / radius
}

/// Evaluate slope, curvature and normal force at the rider's position
pub fn contact<P>(profile: &P, state: &State, params: &SimulationParams) -> Contact
where
    P: HillProfile + ?Sized,
{
    let y = |x: f64| profile.height(x, params);
    let slope = first_derivative(y, state.x, params.h);
    let curvature = second_derivative(y, state.x, params.h);
    let radius = curvature_radius(slope, curvature, params.epsilon);
    Contact {
        slope,
        curvature,
        radius,
        normal_force: normal_force(state.v, slope, radius, params),
    }
}

/// Terminal transition for the current state, if any.
///
/// The normal force is checked first: a rider that left the ground is
/// `Detached` even if it is also slow enough to count as stopped. A NaN normal
/// force means the surface is undefined around `x`, which also counts as
/// `Detached`.
pub fn check<P>(profile: &P, state: &State, params: &SimulationParams) -> Option<GroundState>
where
    P: HillProfile + ?Sized,
{
    let contact = contact(profile, state, params);
    if contact.normal_force.is_nan() || contact.normal_force <= params.epsilon {
        return Some(GroundState::Detached);
    }
    if state.v <= params.epsilon {
        return Some(GroundState::Stopped);
    }
    None
}
