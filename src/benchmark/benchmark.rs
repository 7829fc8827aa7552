//! Side-by-side runs of the integration methods
//!
//! Every entry point takes a whole [`Scenario`] and validates it (parameters
//! and hill) once before any run, then reruns the same hill with the method
//! and `dt` swapped in.

use std::time::{Duration, Instant};

use crate::error::SimResult;
use crate::simulation::engine;
use crate::simulation::hills::HillProfile;
use crate::simulation::integrator::IntegrationMethod;
use crate::simulation::params::{SimulationParams, G};
use crate::simulation::scenario::Scenario;
use crate::simulation::states::SimulationResult;

/// One run of a convergence sweep
#[derive(Debug, Clone, Copy)]
pub struct ConvergenceRow {
    pub method: IntegrationMethod,
    pub dt: f64,
    pub result: SimulationResult,
    pub elapsed: Duration,
}

/// Drag-free speed at `x` from energy conservation: `sqrt(v0^2 + 2 g (y(0) - y(x)))`
pub fn energy_speed<P>(profile: &P, params: &SimulationParams, x: f64) -> f64
where
    P: HillProfile + ?Sized,
{
    let drop = profile.height(0.0, params) - profile.height(x, params);
    (params.v0 * params.v0 + 2.0 * G * drop).sqrt()
}

/// Same hill and parameters, once per integration method
pub fn compare_methods(scenario: &Scenario) -> SimResult<[SimulationResult; 2]> {
    scenario.validate()?;
    let [euler, rk4] = IntegrationMethod::ALL.map(|method| {
        let p = SimulationParams { method, ..scenario.params.clone() };
        engine::run(&scenario.hill, &p, None)
    });
    Ok([euler, rk4])
}

/// Run both methods at `dt, dt/2, dt/4, ...` (`levels` values) and time each run
pub fn convergence_study(scenario: &Scenario, levels: usize) -> SimResult<Vec<ConvergenceRow>> {
    scenario.validate()?;
    let params = &scenario.params;

    let mut rows = Vec::with_capacity(levels * IntegrationMethod::ALL.len());
    let mut dt = params.dt;
    for _ in 0..levels {
        for method in IntegrationMethod::ALL {
            let p = SimulationParams { method, dt, ..params.clone() };

            let t0 = Instant::now();
            let result = engine::run(&scenario.hill, &p, None);
            let elapsed = t0.elapsed();

            rows.push(ConvergenceRow { method, dt, result, elapsed });
        }
        dt *= 0.5;
    }
    Ok(rows)
}

/// Print a convergence sweep as a table
pub fn bench_methods(scenario: &Scenario, levels: usize) -> SimResult<()> {
    let rows = convergence_study(scenario, levels)?;

    println!("{:>6} {:>12} {:>10} {:>14} {:>12} {:>10}", "method", "dt", "state", "v (m/s)", "t (s)", "wall (s)");
    for row in rows {
        println!(
            "{:>6} {:>12.3e} {:>10} {:>14.8} {:>12.4} {:>10.6}",
            row.method.to_string(),
            row.dt,
            format!("{:?}", row.result.ground_state),
            row.result.final_velocity,
            row.result.time,
            row.elapsed.as_secs_f64()
        );
    }
    Ok(())
}
