//! Core state types for the hill simulation.
//!
//! Defines:
//! - `State`            rider position and path speed, packed as `NVec2` for the integrators
//! - `GroundState`      terminal classification of a run
//! - `SimulationResult` the single value a run produces

use std::fmt;

use nalgebra::Vector2;
pub type NVec2 = Vector2<f64>;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct State {
    pub x: f64, // horizontal position
    pub v: f64, // speed along the path
}

impl State {
    pub fn new(x: f64, v: f64) -> Self {
        Self { x, v }
    }

    /// Pack as `[x, v]` so the integrators can use vector arithmetic
    pub fn to_vector(self) -> NVec2 {
        NVec2::new(self.x, self.v)
    }

    pub fn from_vector(s: NVec2) -> Self {
        Self { x: s.x, v: s.y }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroundState {
    Finished, // passed the end of the hill
    Stopped,  // speed decayed to zero
    Detached, // normal force vanished, rider left the surface
}

impl fmt::Display for GroundState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            GroundState::Finished => "finished",
            GroundState::Stopped => "stopped",
            GroundState::Detached => "detached from the ground",
        };
        f.write_str(text)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationResult {
    pub final_velocity: f64,
    pub time: f64,
    pub x: f64,
    pub ground_state: GroundState,
    pub iterations: u64, // completed integration steps
    pub iteration_cap_reached: bool,
}

impl SimulationResult {
    /// Multi-line human readable report, one quantity per line
    pub fn report(&self) -> String {
        format!(
            "t = {} s\nv = {} m/s ({} km/h)\nx = {} m",
            self.time,
            self.final_velocity,
            self.final_velocity * 3.6,
            self.x
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_vector_packing_keeps_order() {
        let s = State::new(1.5, -2.0);
        let v = s.to_vector();
        assert_eq!(v.x, 1.5);
        assert_eq!(v.y, -2.0);
        assert_eq!(State::from_vector(v), s);
    }

    #[test]
    fn ground_state_display() {
        assert_eq!(GroundState::Finished.to_string(), "finished");
        assert_eq!(GroundState::Stopped.to_string(), "stopped");
        assert_eq!(GroundState::Detached.to_string(), "detached from the ground");
    }

    #[test]
    fn report_converts_to_kmh() {
        let r = SimulationResult {
            final_velocity: 10.0,
            time: 2.0,
            x: 60.0,
            ground_state: GroundState::Finished,
            iterations: 2000,
            iteration_cap_reached: false,
        };
        let report = r.report();
        assert!(report.contains("t = 2 s"));
        assert!(report.contains("(36 km/h)"));
        assert!(report.contains("x = 60 m"));
    }
}
