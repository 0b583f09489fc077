// Re-export all public modules
pub mod shared;
pub mod simulation_engine;
pub mod topology;
pub mod rendering;
pub mod engine_runner;

// Re-export commonly used types at the crate root
pub use engine_runner::{EngineRunConfig, EngineRunner};
pub use shared::{ConfigError, DecisionReason, Prefix, RouterId, RunnerError};
pub use simulation_engine::{
    compare_routes, is_better, run_rounds, RoundSnapshot, Route, Router, RouterSet, SimulationEngine,
};
pub use topology::{RouterBuilder, TopologyGenerator};
