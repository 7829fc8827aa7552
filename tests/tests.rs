use approx::{assert_abs_diff_eq, assert_relative_eq};
use std::path::PathBuf;

use hillsim::simulation::hills::{circular_arc_left, circular_arc_right, cosine_modulated, linear};
use hillsim::{
    energy_speed, simulate, GroundState, IntegrationMethod, Rider, Scenario, ScenarioConfig, SimulationParams,
    StepOutcome, TextTrajectory, G,
};

/// Drag-free reference rider: 60 kg + 10 kg at 5 m/s on a 15 m by 60 m hill
pub fn frictionless_params(method: IntegrationMethod) -> SimulationParams {
    SimulationParams {
        m1: 60.0,
        m2: 10.0,
        v0: 5.0,
        beta: 0.0,
        H: 15.0,
        L: 60.0,
        dt: 0.001,
        method,
        ..Default::default()
    }
}

/// Step a rider a fixed number of times and return `(x, v)`
pub fn state_after(params: &SimulationParams, steps: usize) -> (f64, f64) {
    let mut rider = Rider::new(&circular_arc_left, params);
    for _ in 0..steps {
        assert_eq!(rider.step(), StepOutcome::Advanced);
    }
    let s = rider.state();
    (s.x, s.v)
}

pub fn scenario_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("scenarios").join(name)
}

// ==================================================================================
// Physics tests
// ==================================================================================

#[test]
fn frictionless_linear_hill_matches_energy_conservation() {
    for method in IntegrationMethod::ALL {
        let p = frictionless_params(method);
        let r = simulate(&linear, &p, None).unwrap();

        let expected = (p.v0 * p.v0 + 2.0 * G * p.H).sqrt();
        let percent_diff = ((r.final_velocity - expected) / expected).abs() * 100.0;

        assert_eq!(r.ground_state, GroundState::Finished, "{method}");
        assert!(percent_diff < 5.0, "{method}: {} vs {expected} ({percent_diff}%)", r.final_velocity);
        assert!(r.x > p.L);
    }
}

#[test]
fn rk4_is_at_least_as_accurate_as_euler_on_a_curved_hill() {
    // reference: the same equations solved with a 100x finer RK4 step
    let reference = {
        let p = SimulationParams { dt: 0.0001, ..frictionless_params(IntegrationMethod::Rk4) };
        state_after(&p, 50_000)
    };

    for dt in [0.05_f64, 0.01] {
        let steps = (5.0 / dt).round() as usize;
        let euler = state_after(&SimulationParams { dt, ..frictionless_params(IntegrationMethod::Euler) }, steps);
        let rk4 = state_after(&SimulationParams { dt, ..frictionless_params(IntegrationMethod::Rk4) }, steps);

        let euler_err = (euler.1 - reference.1).abs();
        let rk4_err = (rk4.1 - reference.1).abs();
        assert!(rk4_err <= euler_err, "dt = {dt}: rk4 {rk4_err} > euler {euler_err}");

        let euler_x_err = (euler.0 - reference.0).abs();
        let rk4_x_err = (rk4.0 - reference.0).abs();
        assert!(rk4_x_err <= euler_x_err, "dt = {dt}: rk4 {rk4_x_err} > euler {euler_x_err}");
    }
}

#[test]
fn identical_inputs_give_bit_identical_results() {
    for method in IntegrationMethod::ALL {
        let p = SimulationParams { method, ..Default::default() };
        let a = simulate(&cosine_modulated, &p, None).unwrap();
        let b = simulate(&cosine_modulated, &p, None).unwrap();

        assert_eq!(a.final_velocity.to_bits(), b.final_velocity.to_bits());
        assert_eq!(a.time.to_bits(), b.time.to_bits());
        assert_eq!(a.x.to_bits(), b.x.to_bits());
        assert_eq!(a.ground_state, b.ground_state);
        assert_eq!(a.iterations, b.iterations);
    }
}

#[test]
fn flat_frictionless_ground_keeps_speed() {
    for method in IntegrationMethod::ALL {
        let p = SimulationParams { H: 0.0, ..frictionless_params(method) };

        let mut rider = Rider::new(&linear, &p);
        while !rider.past_end() {
            assert_eq!(rider.step(), StepOutcome::Advanced);
            assert_abs_diff_eq!(rider.state().v, p.v0, epsilon = 1e-9);
        }

        let r = simulate(&linear, &p, None).unwrap();
        assert_eq!(r.ground_state, GroundState::Finished);
        assert_abs_diff_eq!(r.final_velocity, p.v0, epsilon = 1e-9);
        assert_abs_diff_eq!(r.time, p.L / p.v0, epsilon = 2.0 * p.dt);
    }
}

#[test]
fn fast_rider_on_steep_arc_detaches() {
    for method in IntegrationMethod::ALL {
        let p = SimulationParams { H: 40.0, L: 30.0, v0: 20.0, method, ..Default::default() };
        let r = simulate(&circular_arc_right, &p, None).unwrap();
        assert_eq!(r.ground_state, GroundState::Detached);
        assert!(r.x < p.L);
    }
}

#[test]
fn heavy_drag_on_flat_ground_stops_the_rider() {
    for method in IntegrationMethod::ALL {
        let p = SimulationParams { H: 0.0, beta: 10.0, v0: 1.0, method, ..Default::default() };
        let r = simulate(&linear, &p, None).unwrap();
        assert_eq!(r.ground_state, GroundState::Stopped);
        assert!(r.final_velocity <= p.epsilon);
        assert!(!r.iteration_cap_reached);
        assert!(r.x < p.L);
    }
}

#[test]
fn reference_rider_leaves_the_cosine_crest() {
    let p = SimulationParams::default();
    let r = simulate(&cosine_modulated, &p, None).unwrap();
    assert_eq!(r.ground_state, GroundState::Detached);
    assert!(r.x > 0.0 && r.x < p.L);
}

#[test]
fn drag_slows_the_rider_below_the_energy_bound() {
    let p = SimulationParams { method: IntegrationMethod::Rk4, ..Default::default() };
    let r = simulate(&linear, &p, None).unwrap();
    assert_eq!(r.ground_state, GroundState::Finished);
    assert!(r.final_velocity < energy_speed(&linear, &p, r.x));
}

// ==================================================================================
// Trajectory tests
// ==================================================================================

#[test]
fn trajectory_has_one_line_per_step() {
    let p = SimulationParams { L: 5.0, ..Default::default() };
    let mut sink = TextTrajectory::new(Vec::new());
    let r = simulate(&linear, &p, Some(&mut sink)).unwrap();
    let text = String::from_utf8(sink.into_inner().unwrap()).unwrap();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len() as u64, r.iterations);
    assert_eq!(lines[0], "0 0 15");

    for line in lines {
        let fields: Vec<f64> = line.split(' ').map(|f| f.parse().unwrap()).collect();
        assert_eq!(fields.len(), 3);
        assert_relative_eq!(fields[2], linear(fields[1], &p), epsilon = 1e-9);
    }
}

// ==================================================================================
// Scenario tests
// ==================================================================================

#[test]
fn shipped_default_scenario_finishes() {
    let cfg = ScenarioConfig::from_yaml_file(&scenario_path("default.yaml")).unwrap();
    let scenario = Scenario::build_scenario(cfg).unwrap();
    assert_eq!(scenario.params, SimulationParams::default());
    assert_eq!(scenario.run(None).unwrap().ground_state, GroundState::Finished);
}

#[test]
fn shipped_detach_scenario_detaches() {
    let cfg = ScenarioConfig::from_yaml_file(&scenario_path("detach.yaml")).unwrap();
    let scenario = Scenario::build_scenario(cfg).unwrap();
    assert_eq!(scenario.params.method, IntegrationMethod::Rk4);
    assert_eq!(scenario.run(None).unwrap().ground_state, GroundState::Detached);
}

#[test]
fn shipped_custom_scenario_validates_and_terminates() {
    let cfg = ScenarioConfig::from_yaml_file(&scenario_path("custom.yaml")).unwrap();
    let scenario = Scenario::build_scenario(cfg).unwrap();
    assert!(scenario.trajectory.is_some());
    scenario.validate().unwrap();

    let r = scenario.run(None).unwrap();
    assert!(!r.iteration_cap_reached);
}
