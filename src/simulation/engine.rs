//! Run loop for one rider on one hill
//!
//! A [`Rider`] owns the mutable state of a run and exposes the single step
//! (contact check, then one integration step). [`simulate`] drives a rider to
//! one of the terminal ground states, optionally tracing every sample into a
//! [`TrajectorySink`].

use tracing::{debug, info, warn};

use crate::error::SimResult;
use crate::simulation::constraint;
use crate::simulation::forces::{ForceModel, ForceSet};
use crate::simulation::hills::HillProfile;
use crate::simulation::params::SimulationParams;
use crate::simulation::states::{GroundState, SimulationResult, State};
use crate::simulation::trajectory::TrajectorySink;

/// Outcome of a single [`Rider::step`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    Advanced,
    Terminal(GroundState),
}

/// A rider sliding down `profile`
pub struct Rider<'a, P: ?Sized> {
    profile: &'a P,
    params: &'a SimulationParams,
    forces: ForceSet,
    state: State,
    t: f64,
    iterations: u64,
}

impl<'a, P> Rider<'a, P>
where
    P: HillProfile + ?Sized,
{
    /// Place a rider at `x = 0` with speed `v0`
    pub fn new(profile: &'a P, params: &'a SimulationParams) -> Self {
        Self::with_forces(profile, params, ForceSet::standard())
    }

    pub fn with_forces(profile: &'a P, params: &'a SimulationParams, forces: ForceSet) -> Self {
        Self {
            profile,
            params,
            forces,
            state: State::new(0.0, params.v0),
            t: 0.0,
            iterations: 0,
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Height of the hill under the rider
    pub fn height(&self) -> f64 {
        self.profile.height(self.state.x, self.params)
    }

    /// True once the rider is past the end of the hill
    pub fn past_end(&self) -> bool {
        self.state.x > self.params.L + self.params.epsilon
    }

    /// Check contact on the current state; if still riding, advance one `dt`.
    ///
    /// A step that would leave `x` or `v` non-finite is not taken: the rider
    /// keeps its last finite state and the run ends as `Detached`.
    pub fn step(&mut self) -> StepOutcome {
        if let Some(ground_state) = constraint::check(self.profile, &self.state, self.params) {
            return StepOutcome::Terminal(ground_state);
        }

        let model = ForceModel::new(self.profile, self.params, &self.forces);
        let next = self
            .params
            .method
            .step(&self.state.to_vector(), |s| model.derivatives(s), self.params.dt);

        if !next.iter().all(|c| c.is_finite()) {
            warn!(
                x = self.state.x,
                v = self.state.v,
                "hill profile undefined along the next step, leaving the ground"
            );
            return StepOutcome::Terminal(GroundState::Detached);
        }

        self.state = State::from_vector(next);
        self.t += self.params.dt;
        self.iterations += 1;
        StepOutcome::Advanced
    }

    fn result(&self, ground_state: GroundState, iteration_cap_reached: bool) -> SimulationResult {
        SimulationResult {
            final_velocity: self.state.v,
            time: self.t,
            x: self.state.x,
            ground_state,
            iterations: self.iterations,
            iteration_cap_reached,
        }
    }
}

/// Validate `params` and run to completion.
///
/// Validation is the only failure; a validated run always ends in a
/// `GroundState`.
pub fn simulate<P>(
    profile: &P,
    params: &SimulationParams,
    sink: Option<&mut dyn TrajectorySink>,
) -> SimResult<SimulationResult>
where
    P: HillProfile + ?Sized,
{
    params.validate()?;
    Ok(run(profile, params, sink))
}

/// Run loop on already validated parameters
pub fn run<P>(profile: &P, params: &SimulationParams, mut sink: Option<&mut dyn TrajectorySink>) -> SimulationResult
where
    P: HillProfile + ?Sized,
{
    info!(
        method = %params.method,
        dt = params.dt,
        v0 = params.v0,
        height = params.H,
        length = params.L,
        "starting run"
    );

    let mut rider = Rider::new(profile, params);

    let result = loop {
        if rider.past_end() {
            break rider.result(GroundState::Finished, false);
        }
        if rider.iterations() >= params.max_iterations {
            warn!(
                iterations = rider.iterations(),
                x = rider.state().x,
                v = rider.state().v,
                "iteration cap reached before the end of the hill"
            );
            break rider.result(GroundState::Stopped, true);
        }

        if let Some(s) = sink.as_deref_mut() {
            let state = rider.state();
            if let Err(e) = s.record(rider.time(), state.x, rider.height()) {
                warn!("trajectory write failed, dropping trajectory output: {e}");
                sink = None;
            }
        }

        if let StepOutcome::Terminal(ground_state) = rider.step() {
            break rider.result(ground_state, false);
        }
    };

    debug!(iterations = result.iterations, "run loop finished");
    info!(
        ground_state = %result.ground_state,
        t = result.time,
        v = result.final_velocity,
        x = result.x,
        "run finished"
    );
    result
}
