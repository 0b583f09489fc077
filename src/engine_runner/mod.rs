pub mod engine_run_config;
pub mod engine_runner;

pub use engine_run_config::{EngineRunConfig, OriginConfig, RouterConfig};
pub use engine_runner::EngineRunner;
