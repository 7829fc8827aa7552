//! Tangential forces on the rider and the resulting state derivative
//!
//! Each term implements [`TangentialForce`] and reports the force along the
//! path, positive when it pushes the rider forward. [`ForceSet`] sums the
//! terms; [`ForceModel`] turns the sum into `(dx/dt, dv/dt)`.

use crate::simulation::derivative::first_derivative;
use crate::simulation::hills::HillProfile;
use crate::simulation::params::{SimulationParams, G};
use crate::simulation::states::{NVec2, State};

/// Trait for forces acting along the hill surface
pub trait TangentialForce {
    fn force(&self, v: f64, slope: f64, params: &SimulationParams) -> f64;
}

/// Gravity projected onto the slope: `-M g sin(theta)` with `theta = atan(dy)`
pub struct SlopeGravity;

impl TangentialForce for SlopeGravity {
    fn force(&self, _v: f64, slope: f64, params: &SimulationParams) -> f64 {
        // sin(atan(dy)) = dy / sqrt(1 + dy^2)
        let sin_theta = slope / (1.0 + slope * slope).sqrt();
        params.total_mass() * G * -sin_theta
    }
}

/// Linear drag `beta * m1^(2/3) * v`, opposing motion
pub struct RiderDrag;

impl TangentialForce for RiderDrag {
    fn force(&self, v: f64, _slope: f64, params: &SimulationParams) -> f64 {
        -(params.beta * params.m1.powf(2.0 / 3.0) * v)
    }
}

/// Collection of tangential force terms
pub struct ForceSet {
    terms: Vec<Box<dyn TangentialForce + Send + Sync>>,
}

impl ForceSet {
    /// Create an empty force set
    pub fn new() -> Self {
        Self { terms: Vec::new() }
    }

    /// Gravity along the slope plus rider drag
    pub fn standard() -> Self {
        Self::new().with(SlopeGravity).with(RiderDrag)
    }

    /// Add a force term
    pub fn with<T>(mut self, term: T) -> Self
    where
        T: TangentialForce + Send + Sync + 'static,
    {
        self.terms.push(Box::new(term));
        self
    }

    /// Net tangential force
    pub fn total(&self, v: f64, slope: f64, params: &SimulationParams) -> f64 {
        self.terms.iter().map(|term| term.force(v, slope, params)).sum()
    }
}

impl Default for ForceSet {
    fn default() -> Self {
        Self::standard()
    }
}

/// State derivative of a rider on a given hill
pub struct ForceModel<'a, P: ?Sized> {
    pub profile: &'a P,
    pub params: &'a SimulationParams,
    pub forces: &'a ForceSet,
}

impl<'a, P> ForceModel<'a, P>
where
    P: HillProfile + ?Sized,
{
    pub fn new(profile: &'a P, params: &'a SimulationParams, forces: &'a ForceSet) -> Self {
        Self { profile, params, forces }
    }

    /// Local slope `dy/dx` at `x`
    pub fn slope(&self, x: f64) -> f64 {
        first_derivative(|x| self.profile.height(x, self.params), x, self.params.h)
    }

    /// Tangential acceleration `a = F_net / M`
    pub fn acceleration(&self, state: &State) -> f64 {
        let slope = self.slope(state.x);
        self.forces.total(state.v, slope, self.params) / self.params.total_mass()
    }

    /// `(dx/dt, dv/dt) = (v, a)` for the packed state `[x, v]`
    pub fn derivatives(&self, s: &NVec2) -> NVec2 {
        let state = State::from_vector(*s);
        NVec2::new(state.v, self.acceleration(&state))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::hills::linear;
    use approx::assert_relative_eq;

    fn no_drag() -> SimulationParams {
        SimulationParams { beta: 0.0, ..Default::default() }
    }

    #[test]
    fn gravity_pulls_downhill() {
        let p = no_drag();
        // descending slope -> forward push, ascending -> backward
        assert!(SlopeGravity.force(0.0, -0.25, &p) > 0.0);
        assert!(SlopeGravity.force(0.0, 0.25, &p) < 0.0);
        assert_eq!(SlopeGravity.force(0.0, 0.0, &p), 0.0);
    }

    #[test]
    fn gravity_on_steep_slope_approaches_weight() {
        let p = no_drag();
        let f = SlopeGravity.force(0.0, -1e6, &p);
        assert_relative_eq!(f, p.total_mass() * G, max_relative = 1e-9);
    }

    #[test]
    fn drag_opposes_motion_and_scales_with_speed() {
        let p = SimulationParams::default();
        let f1 = RiderDrag.force(1.0, 0.0, &p);
        let f2 = RiderDrag.force(2.0, 0.0, &p);
        assert!(f1 < 0.0);
        assert_relative_eq!(f2, 2.0 * f1);
        assert_relative_eq!(-f1, 1.2 * 60f64.powf(2.0 / 3.0));
    }

    #[test]
    fn force_set_sums_terms() {
        let p = SimulationParams::default();
        let set = ForceSet::standard();
        let expected = SlopeGravity.force(3.0, -0.25, &p) + RiderDrag.force(3.0, -0.25, &p);
        assert_relative_eq!(set.total(3.0, -0.25, &p), expected);
        assert_eq!(ForceSet::new().total(3.0, -0.25, &p), 0.0);
    }

    #[test]
    fn acceleration_on_linear_hill_matches_closed_form() {
        let p = no_drag();
        let forces = ForceSet::standard();
        let model = ForceModel::new(&linear, &p, &forces);

        let slope = -p.H / p.L;
        let expected = -G * slope / (1.0 + slope * slope).sqrt();
        assert_relative_eq!(model.acceleration(&State::new(20.0, 5.0)), expected, max_relative = 1e-6);
    }

    #[test]
    fn derivative_carries_velocity_into_position() {
        let p = SimulationParams::default();
        let forces = ForceSet::standard();
        let model = ForceModel::new(&linear, &p, &forces);
        let d = model.derivatives(&NVec2::new(10.0, 4.0));
        assert_eq!(d.x, 4.0);
        assert!(d.y.is_finite());
    }
}
