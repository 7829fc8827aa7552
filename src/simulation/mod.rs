pub mod states;
pub mod params;
pub mod derivative;
pub mod hills;
pub mod forces;
pub mod constraint;
pub mod integrator;
pub mod trajectory;
pub mod engine;
pub mod scenario;
