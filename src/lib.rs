pub mod simulation;
pub mod configuration;
pub mod expression;
pub mod benchmark;
pub mod error;

pub use simulation::states::{State, GroundState, SimulationResult, NVec2};
pub use simulation::params::{SimulationParams, G};
pub use simulation::hills::{Hill, BuiltinHill, HillProfile, Extent, profile_extent};
pub use simulation::forces::{ForceModel, ForceSet, TangentialForce, SlopeGravity, RiderDrag};
pub use simulation::integrator::{IntegrationMethod, euler_step, rk4_step};
pub use simulation::engine::{simulate, Rider, StepOutcome};
pub use simulation::trajectory::{TrajectorySink, TextTrajectory};
pub use simulation::scenario::Scenario;

pub use configuration::config::{ScenarioConfig, EngineConfig, ParametersConfig, HillConfig, HillKey, OutputConfig};

pub use expression::{compile, Expression, ExprError};
pub use error::{SimError, SimResult};

pub use benchmark::benchmark::{bench_methods, compare_methods, convergence_study, energy_speed};
